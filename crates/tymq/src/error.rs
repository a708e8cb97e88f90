// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client error types.

use crate::codec::CodecError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the middleend.
#[derive(Debug)]
pub enum ClientError {
    /// A command was issued before the session was registered.
    NotRegistered,

    /// `register` was called on an already-registered session.
    AlreadyRegistered(Uuid),

    /// Configuration error.
    Config(String),

    /// Dialing the middleend socket failed.
    Dial { path: PathBuf, source: io::Error },

    /// I/O failure on an established connection or on the reply endpoint.
    Io(io::Error),

    /// Payload or descriptor could not be encoded/decoded.
    Codec(CodecError),

    /// The middleend explicitly rejected the offered type.
    Rejected,

    /// No reply arrived within the configured deadline.
    Timeout(Duration),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered => {
                write!(f, "Client identifier is not set: register before issuing commands")
            }
            Self::AlreadyRegistered(id) => {
                write!(f, "Attempt to register twice, client identifier is already set: {}", id)
            }
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Dial { path, source } => {
                write!(f, "Failed to dial middleend socket {}: {}", path.display(), source)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Codec(e) => write!(f, "{}", e),
            Self::Rejected => write!(f, "Middleend rejected the offered type"),
            Self::Timeout(d) => write!(f, "Reply timed out after {:?}", d),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dial { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CodecError> for ClientError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
