// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Outbound delivery to the middleend socket.

use crate::error::ClientError;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;

/// Deliver one framed command on a fresh connection.
///
/// The middleend treats each connection as one message: the frame is
/// written in full and the socket closed, so messages never split or
/// coalesce across connections.
pub(crate) fn deliver(path: &Path, frame: &[u8]) -> Result<(), ClientError> {
    let mut stream = UnixStream::connect(path).map_err(|e| ClientError::Dial {
        path: path.to_path_buf(),
        source: e,
    })?;
    stream.write_all(frame)?;
    stream.flush()?;
    log::trace!("[transport] delivered {} bytes to {}", frame.len(), path.display());
    Ok(())
}
