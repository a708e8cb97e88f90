// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Private reply endpoint.
//!
//! Each registered client advertises one fresh Unix socket where the
//! middleend delivers replies. The socket lives in its own temporary
//! directory so the path is unpredictable and cleanup is a single
//! directory removal: dropping the endpoint covers normal and error exits,
//! and a termination-signal listener covers SIGINT/SIGTERM.

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOCKET_FILE_NAME: &str = "reply.sock";

/// Handle to the private reply endpoint's backing resources.
///
/// The advertised path stays valid for as long as this handle is alive;
/// dropping it removes the backing directory.
#[derive(Debug)]
pub struct ReplyEndpoint {
    _dir: TempDir,
    path: PathBuf,
}

impl ReplyEndpoint {
    /// Create a fresh endpoint and return it together with its listener.
    ///
    /// The listener is handed to the caller (the session's acceptor task);
    /// the returned handle owns only the filesystem resources.
    pub fn create(prefix: &str) -> io::Result<(Self, UnixListener)> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let path = dir.path().join(SOCKET_FILE_NAME);
        let listener = UnixListener::bind(&path)?;
        spawn_signal_cleanup(dir.path().to_path_buf())?;
        log::debug!("[ReplyEndpoint::create] listening on {}", path.display());
        Ok((Self { _dir: dir, path }, listener))
    }

    /// Advertised endpoint path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Remove the endpoint directory and exit when a termination signal
/// arrives. Drop-based cleanup never runs on SIGINT/SIGTERM, so the
/// signal path has to unlink the socket itself.
fn spawn_signal_cleanup(dir: PathBuf) -> io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::Builder::new()
        .name("tymq-signal-cleanup".to_string())
        .spawn(move || {
            if signals.forever().next().is_some() {
                let _ = std::fs::remove_dir_all(&dir);
                std::process::exit(0);
            }
        })?;
    Ok(())
}
