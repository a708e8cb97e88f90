// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Command wire framing.
//!
//! Every outbound message starts with a fixed 25-byte header:
//!
//! ```text
//! [client-id: 16][command-code: 1][payload-size: 8 BE]
//! ```
//!
//! followed by a command-specific payload. Numeric fields are big-endian.
//! One message travels per connection; the middleend reads to EOF.

use uuid::Uuid;

/// Fixed command header length in bytes.
pub const HEADER_LEN: usize = 25;

/// Command codes, one per middleend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Announce this client and its private reply endpoint.
    Register = 0,
    /// Deliver a typed message to a named target mailbox.
    Send = 1,
    /// Fetch the next message of a given shape.
    Get = 2,
    /// Ask whether the mailbox for a given shape is empty.
    Empty = 3,
    /// Offer a type for this client's mailbox.
    AcceptType = 4,
}

impl Command {
    /// Wire code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Build the fixed command header.
///
/// Callers guarantee the client id comes from a registered session; an
/// unset identifier never reaches this layer.
fn header(client_id: &Uuid, command: Command, payload_len: u64) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[..16].copy_from_slice(client_id.as_bytes());
    out[16] = command.code();
    out[17..].copy_from_slice(&payload_len.to_be_bytes());
    out
}

fn frame(client_id: &Uuid, command: Command, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&header(client_id, command, payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

/// `Register` frame: `[name-len:4 BE][name][reply-endpoint path]`.
///
/// The reply path has no length prefix; it runs to the end of the payload.
pub fn register_frame(client_id: &Uuid, name: &str, reply_path: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + name.len() + reply_path.len());
    payload.extend_from_slice(&(name.len() as u32).to_be_bytes());
    payload.extend_from_slice(name.as_bytes());
    payload.extend_from_slice(reply_path);
    frame(client_id, Command::Register, &payload)
}

/// `Send` frame:
/// `[target-len:4 BE][typedesc-len:4 BE][target][typedesc][serialized value]`.
pub fn send_frame(
    client_id: &Uuid,
    target: &str,
    type_bytes: &[u8],
    value_bytes: &[u8],
) -> Vec<u8> {
    let mut payload =
        Vec::with_capacity(4 + 4 + target.len() + type_bytes.len() + value_bytes.len());
    payload.extend_from_slice(&(target.len() as u32).to_be_bytes());
    payload.extend_from_slice(&(type_bytes.len() as u32).to_be_bytes());
    payload.extend_from_slice(target.as_bytes());
    payload.extend_from_slice(type_bytes);
    payload.extend_from_slice(value_bytes);
    frame(client_id, Command::Send, &payload)
}

/// `Get` / `Empty` / `AcceptType` frame: the payload is the encoded type
/// descriptor alone.
pub fn typed_frame(client_id: &Uuid, command: Command, type_bytes: &[u8]) -> Vec<u8> {
    frame(client_id, command, type_bytes)
}
