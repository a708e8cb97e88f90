// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Well-known middleend command socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/tymq.sock";

/// Configuration for a middleend client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Well-known socket the middleend listens on for commands.
    pub middleend_socket: PathBuf,

    /// Deadline for synchronous replies.
    ///
    /// The protocol has no cancellation of its own: with `None` (the
    /// default), a command that never receives a reply blocks its caller
    /// forever. Set a deadline to surface [`ClientError::Timeout`] instead.
    ///
    /// [`ClientError::Timeout`]: crate::error::ClientError::Timeout
    pub reply_timeout: Option<Duration>,

    /// Prefix for the temporary directory backing the private reply
    /// endpoint.
    pub endpoint_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            middleend_socket: PathBuf::from(DEFAULT_SOCKET_PATH),
            reply_timeout: None,
            endpoint_prefix: "tymq-reply".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given middleend socket path.
    pub fn new(middleend_socket: impl Into<PathBuf>) -> Self {
        Self {
            middleend_socket: middleend_socket.into(),
            ..Default::default()
        }
    }

    /// Builder: set the reply deadline.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = Some(timeout);
        self
    }

    /// Builder: set the reply endpoint directory prefix.
    pub fn with_endpoint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.endpoint_prefix = prefix.into();
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.middleend_socket.as_os_str().is_empty() {
            return Err("middleend_socket must not be empty");
        }
        if self.endpoint_prefix.is_empty() {
            return Err("endpoint_prefix must not be empty");
        }
        if self.reply_timeout.is_some_and(|t| t.is_zero()) {
            return Err("reply_timeout must be > 0 when set");
        }
        Ok(())
    }
}
