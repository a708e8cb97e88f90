// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process fake middleend for integration tests.
//!
//! Listens on a temp-dir Unix socket, parses each command frame, and
//! forwards it to the test over a channel. On `Register` it connects back
//! to the advertised reply endpoint; a test-supplied responder decides
//! which frames get reply bytes written to that connection.

#![allow(dead_code)] // each test binary uses a different subset

use std::io::{Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use tempfile::TempDir;

pub const HEADER_LEN: usize = 25;

pub const CODE_REGISTER: u8 = 0;
pub const CODE_SEND: u8 = 1;
pub const CODE_GET: u8 = 2;
pub const CODE_EMPTY: u8 = 3;
pub const CODE_ACCEPT_TYPE: u8 = 4;

/// A parsed command frame as seen by the middleend.
pub struct Frame {
    pub client_id: [u8; 16],
    pub code: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    fn parse(bytes: &[u8]) -> Frame {
        assert!(bytes.len() >= HEADER_LEN, "frame shorter than header");
        let client_id = bytes[..16].try_into().expect("client id");
        let code = bytes[16];
        let declared = u64::from_be_bytes(bytes[17..25].try_into().expect("size")) as usize;
        let payload = bytes[HEADER_LEN..].to_vec();
        assert_eq!(declared, payload.len(), "declared payload size");
        Frame {
            client_id,
            code,
            payload,
        }
    }

    /// Reply endpoint path advertised by a `Register` frame.
    pub fn register_reply_path(&self) -> PathBuf {
        assert_eq!(self.code, CODE_REGISTER);
        let name_len = u32::from_be_bytes(self.payload[..4].try_into().expect("name len")) as usize;
        let path_bytes = &self.payload[4 + name_len..];
        PathBuf::from(std::ffi::OsStr::from_bytes(path_bytes))
    }

    /// Client name advertised by a `Register` frame.
    pub fn register_name(&self) -> String {
        assert_eq!(self.code, CODE_REGISTER);
        let name_len = u32::from_be_bytes(self.payload[..4].try_into().expect("name len")) as usize;
        String::from_utf8(self.payload[4..4 + name_len].to_vec()).expect("utf8 name")
    }
}

/// Fake middleend service.
pub struct FakeMiddleend {
    _dir: TempDir,
    pub socket_path: PathBuf,
    pub frames: Receiver<Frame>,
}

impl FakeMiddleend {
    /// Spawn the service; `respond` returns the reply bytes (if any) to
    /// write to the client's reply endpoint after a frame arrives.
    pub fn spawn<F>(mut respond: F) -> Self
    where
        F: FnMut(&Frame) -> Option<Vec<u8>> + Send + 'static,
    {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().expect("tempdir");
        let socket_path = dir.path().join("middleend.sock");
        let listener = UnixListener::bind(&socket_path).expect("bind middleend socket");
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut reply_conn: Option<UnixStream> = None;
            for conn in listener.incoming() {
                let Ok(mut conn) = conn else { break };
                let mut bytes = Vec::new();
                if conn.read_to_end(&mut bytes).is_err() {
                    break;
                }
                let frame = Frame::parse(&bytes);
                if frame.code == CODE_REGISTER {
                    let path = frame.register_reply_path();
                    reply_conn = Some(UnixStream::connect(path).expect("dial reply endpoint"));
                }
                let reply = respond(&frame);
                if tx.send(frame).is_err() {
                    break;
                }
                if let (Some(reply), Some(rc)) = (reply, reply_conn.as_mut()) {
                    rc.write_all(&reply).expect("write reply");
                }
            }
        });

        Self {
            _dir: dir,
            socket_path,
            frames: rx,
        }
    }

    /// Spawn a service that never replies.
    pub fn spawn_silent() -> Self {
        Self::spawn(|_| None)
    }
}
