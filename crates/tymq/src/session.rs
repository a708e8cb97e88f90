// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client session and reply channel.
//!
//! A [`Session`] is created once per process and passed to every command.
//! Registration is an irreversible `Unset -> Registered` transition: it
//! picks a random client identifier, binds the private reply endpoint,
//! starts the acceptor, and announces both to the middleend.
//!
//! Synchronous commands (`get`, `empty`, `accept_type`) share one physical
//! reply connection. Replies carry no length prefix (the reader knows how
//! many bytes to take from the shape it asked for), so an exclusive lock
//! is held for the whole send-then-read exchange. Concurrent callers queue
//! on the lock; mutual exclusion is guaranteed, FIFO fairness is not.

use crate::codec::{self, CodecError};
use crate::config::ClientConfig;
use crate::endpoint::ReplyEndpoint;
use crate::error::{ClientError, Result};
use crate::protocol::{self, Command};
use crate::transport;
use crate::types::{TypeDesc, Value};
use parking_lot::{Condvar, Mutex};
use std::io::{self, Read};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A registered (or not-yet-registered) client of the middleend.
pub struct Session {
    config: ClientConfig,
    state: Mutex<SessionState>,
    reply: Arc<ReplySlot>,
    /// Serializes synchronous exchanges on the single reply connection.
    exchange: Mutex<()>,
}

enum SessionState {
    Unset,
    Registered {
        id: Uuid,
        /// Keeps the reply endpoint's backing directory alive for the
        /// session's lifetime.
        _endpoint: ReplyEndpoint,
    },
}

impl Session {
    /// Create a session with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a session with a custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            config,
            state: Mutex::new(SessionState::Unset),
            reply: Arc::new(ReplySlot::new()),
            exchange: Mutex::new(()),
        })
    }

    /// Configuration this session was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether `register` has completed.
    pub fn is_registered(&self) -> bool {
        matches!(&*self.state.lock(), SessionState::Registered { .. })
    }

    /// Register this client under `name`.
    ///
    /// Generates the client identifier, binds the private reply endpoint,
    /// starts the acceptor that resolves the reply channel, and announces
    /// name and endpoint to the middleend. Fails with
    /// [`ClientError::AlreadyRegistered`] on a second call; the transition
    /// is irreversible for the process lifetime.
    pub fn register(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        if let SessionState::Registered { id, .. } = &*state {
            return Err(ClientError::AlreadyRegistered(*id));
        }

        let id = Uuid::new_v4();
        let (endpoint, listener) = ReplyEndpoint::create(&self.config.endpoint_prefix)?;
        spawn_acceptor(listener, Arc::clone(&self.reply))?;

        let path_bytes = endpoint.path().as_os_str().as_encoded_bytes();
        let frame = protocol::register_frame(&id, name, path_bytes);
        transport::deliver(&self.config.middleend_socket, &frame)?;

        log::debug!("[Session::register] registered as {} ({})", name, id);
        *state = SessionState::Registered {
            id,
            _endpoint: endpoint,
        };
        Ok(())
    }

    /// Deliver a typed message to a named target mailbox.
    ///
    /// Fire-and-forget: no acknowledgement is awaited. Encoding failures
    /// are reported before any bytes leave the process.
    // TODO: confirm against a deployed middleend that Send never writes an
    // acknowledgement to the reply channel; a peer that does would shift
    // every later synchronous reply by one byte.
    pub fn send(&self, desc: &TypeDesc, target: &str, value: &Value) -> Result<()> {
        let id = self.client_id()?;
        let value_bytes = codec::encode(desc, value)?;
        let frame = protocol::send_frame(&id, target, &desc.encode(), &value_bytes);
        transport::deliver(&self.config.middleend_socket, &frame)
    }

    /// Fetch the next message of the given shape from this client's
    /// mailbox. Blocks until the middleend replies (or the configured
    /// deadline passes).
    pub fn get(&self, desc: &TypeDesc) -> Result<Value> {
        let id = self.client_id()?;
        let frame = protocol::typed_frame(&id, Command::Get, &desc.encode());

        let _guard = self.exchange.lock();
        transport::deliver(&self.config.middleend_socket, &frame)?;
        let conn = self.reply_connection()?;
        let mut reader = &conn;
        codec::decode_from(desc, &mut reader).map_err(|e| match e {
            CodecError::Io(io) => self.map_reply_io(io),
            other => ClientError::Codec(other),
        })
    }

    /// Ask whether this client's mailbox for the given shape is empty.
    pub fn empty(&self, desc: &TypeDesc) -> Result<bool> {
        let id = self.client_id()?;
        let frame = protocol::typed_frame(&id, Command::Empty, &desc.encode());

        let _guard = self.exchange.lock();
        transport::deliver(&self.config.middleend_socket, &frame)?;
        let conn = self.reply_connection()?;
        let flag = self.read_reply_byte(&conn)?;
        Ok(flag != 0)
    }

    /// Offer a type for this client's mailbox.
    ///
    /// The middleend answers with a single byte: `0` accepts the offer,
    /// anything else surfaces as [`ClientError::Rejected`].
    pub fn accept_type(&self, desc: &TypeDesc) -> Result<()> {
        let id = self.client_id()?;
        let frame = protocol::typed_frame(&id, Command::AcceptType, &desc.encode());

        let _guard = self.exchange.lock();
        transport::deliver(&self.config.middleend_socket, &frame)?;
        let conn = self.reply_connection()?;
        let flag = self.read_reply_byte(&conn)?;
        if flag == 0 {
            Ok(())
        } else {
            Err(ClientError::Rejected)
        }
    }

    fn client_id(&self) -> Result<Uuid> {
        match &*self.state.lock() {
            SessionState::Registered { id, .. } => Ok(*id),
            SessionState::Unset => Err(ClientError::NotRegistered),
        }
    }

    /// Wait for the reply channel to be connected and hand back a reading
    /// handle with the configured deadline applied.
    fn reply_connection(&self) -> Result<UnixStream> {
        let conn = self.reply.wait_connected(self.config.reply_timeout)?;
        conn.set_read_timeout(self.config.reply_timeout)?;
        Ok(conn)
    }

    fn read_reply_byte(&self, conn: &UnixStream) -> Result<u8> {
        let mut byte = [0u8; 1];
        let mut reader = conn;
        reader
            .read_exact(&mut byte)
            .map_err(|e| self.map_reply_io(e))?;
        Ok(byte[0])
    }

    fn map_reply_io(&self, e: io::Error) -> ClientError {
        match (self.config.reply_timeout, e.kind()) {
            (Some(d), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                ClientError::Timeout(d)
            }
            _ => ClientError::Io(e),
        }
    }
}

/// Single-assignment slot for the reply connection.
///
/// The acceptor resolves it exactly once; every waiter observes the same
/// connection afterwards. This replaces ad-hoc wait/signal bookkeeping with
/// one promise-shaped primitive.
struct ReplySlot {
    conn: Mutex<Option<UnixStream>>,
    ready: Condvar,
}

impl ReplySlot {
    fn new() -> Self {
        Self {
            conn: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn resolve(&self, conn: UnixStream) {
        let mut slot = self.conn.lock();
        if slot.is_some() {
            log::warn!("[ReplySlot::resolve] reply connection already set, dropping duplicate");
            return;
        }
        *slot = Some(conn);
        self.ready.notify_all();
    }

    /// Block until resolved, then return a cloned handle to the shared
    /// connection. Clones share the socket, so callers must hold the
    /// session's exchange lock while reading.
    fn wait_connected(&self, deadline: Option<Duration>) -> Result<UnixStream> {
        let mut slot = self.conn.lock();
        match deadline {
            None => {
                while slot.is_none() {
                    self.ready.wait(&mut slot);
                }
            }
            Some(d) => {
                let until = Instant::now() + d;
                while slot.is_none() {
                    if self.ready.wait_until(&mut slot, until).timed_out() {
                        return Err(ClientError::Timeout(d));
                    }
                }
            }
        }
        match slot.as_ref() {
            Some(conn) => conn.try_clone().map_err(ClientError::Io),
            None => Err(ClientError::Io(io::Error::other(
                "reply slot empty after wakeup",
            ))),
        }
    }
}

/// Perform exactly one accept on the reply endpoint and resolve the slot.
///
/// A failed accept leaves every future synchronous command permanently
/// unable to complete, so it is treated as unrecoverable and terminates
/// the process.
fn spawn_acceptor(listener: UnixListener, slot: Arc<ReplySlot>) -> Result<()> {
    std::thread::Builder::new()
        .name("tymq-reply-acceptor".to_string())
        .spawn(move || match listener.accept() {
            Ok((conn, _)) => {
                log::debug!("[reply-acceptor] reply channel connected");
                slot.resolve(conn);
            }
            Err(e) => {
                log::error!("[reply-acceptor] accept failed on reply endpoint: {}", e);
                std::process::exit(1);
            }
        })
        .map_err(ClientError::Io)?;
    Ok(())
}
