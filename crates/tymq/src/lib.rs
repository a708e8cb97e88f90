// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # tymq - Typed message-passing middleend client
//!
//! Client library for exchanging strongly-typed messages with a local
//! middleend service over Unix-domain sockets. Message shapes are described
//! by a small recursive type language (scalars, records, fixed-length
//! sequences, shape-resolved variants); every payload is serialized against
//! its declared type, and the type description itself travels on the wire
//! so the receiver can validate independently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tymq::{ScalarKind, Session, TypeDesc, Value};
//!
//! fn main() -> tymq::Result<()> {
//!     let session = Session::new()?;
//!     session.register("sensor-feed")?;
//!
//!     let reading = TypeDesc::record(vec![
//!         TypeDesc::scalar(ScalarKind::Int64),
//!         TypeDesc::scalar(ScalarKind::Float64),
//!     ]);
//!
//!     // Tell the middleend what this client's mailbox accepts.
//!     session.accept_type(&reading)?;
//!
//!     // Deliver a typed message to another client's mailbox.
//!     let value = Value::record(vec![Value::Int64(1702900000), Value::Float64(23.5)]);
//!     session.send(&reading, "dashboard", &value)?;
//!
//!     // Fetch the next message of that shape from our own mailbox.
//!     if !session.empty(&reading)? {
//!         let msg = session.get(&reading)?;
//!         println!("got {:?}", msg);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |                        Session & Reply Channel                   |
//! |   register / send / get / empty / accept_type, exchange lock     |
//! +------------------------------------------------------------------+
//! |                        Transport & Framing                       |
//! |   25-byte command header | per-command payloads | UDS dialing    |
//! +------------------------------------------------------------------+
//! |                           Codec Engine                           |
//! |   big-endian type-directed encode/decode, variant resolution     |
//! +------------------------------------------------------------------+
//! |                        Type Descriptor Model                     |
//! |   Scalar / Record / Sequence / Variant, self-describing encoding |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - Type descriptors and runtime values (start here)
//! - [`codec`] - Type-directed payload encoding/decoding
//! - [`protocol`] - Command header and frame layouts
//! - [`session`] - Registration, reply channel, synchronous commands
//! - [`config`] - Client configuration
//! - [`endpoint`] - Private reply endpoint lifecycle

/// Type-directed payload codec (big-endian wire form, variant resolution).
pub mod codec;
/// Client configuration.
pub mod config;
/// Private reply endpoint (temp-dir backed Unix socket, cleanup on exit).
pub mod endpoint;
/// Client error types.
pub mod error;
/// Command wire framing (header and per-command payload layouts).
pub mod protocol;
/// Client session: registration, reply channel, command surface.
pub mod session;
/// Wire type system: descriptors and runtime values.
pub mod types;

mod transport;

pub use codec::{decode, decode_from, encode, CodecError, ShapeViolation};
pub use config::{ClientConfig, DEFAULT_SOCKET_PATH};
pub use error::{ClientError, Result};
pub use protocol::Command;
pub use session::Session;
pub use types::{Category, RecordBuilder, ScalarKind, TypeDesc, Value};
