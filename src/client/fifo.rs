//! Named pipe transport to the daemon.
//!
//! The daemon owns a pre-created FIFO and is its sole reader. The pipe is
//! opened write-only and non-blocking, so a missing reader fails the open with
//! `ENXIO` instead of hanging.

use crate::error::{Error, Result};
use crate::protocol::ControlMessage;
use std::io::ErrorKind;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::unix::pipe;
use tracing::debug;

/// The daemon's named pipe.
#[derive(Debug, Clone)]
pub struct FifoEndpoint {
    pub path: PathBuf,
    timeout: Duration,
}

impl FifoEndpoint {
    pub fn new(path: PathBuf, timeout: Duration) -> Self {
        Self { path, timeout }
    }

    /// Verify the pipe, open it, write one message, then close.
    pub async fn send(&self, message: &ControlMessage) -> Result<()> {
        self.ensure_fifo().await?;
        let mut sender = self.open()?;
        super::write_bounded(&mut sender, message, &self.path, self.timeout).await
    }

    /// The path must exist and be a named pipe before any I/O happens.
    async fn ensure_fifo(&self) -> Result<()> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.file_type().is_fifo() => Ok(()),
            Ok(_) => Err(Error::InvalidEndpoint(self.path.clone())),
            Err(e) => {
                debug!("Cannot stat {}: {}", self.path.display(), e);
                Err(Error::InvalidEndpoint(self.path.clone()))
            }
        }
    }

    fn open(&self) -> Result<pipe::Sender> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&self.path)
            .map_err(|source| {
                if source.raw_os_error() == Some(libc::ENXIO) {
                    debug!("No reader attached to {}", self.path.display());
                }
                Error::DaemonUnavailable {
                    path: self.path.clone(),
                    source,
                }
            })?;

        // The pipe may have been swapped for another file type since the stat.
        pipe::Sender::from_file(file).map_err(|source| match source.kind() {
            ErrorKind::InvalidInput => Error::InvalidEndpoint(self.path.clone()),
            _ => Error::DaemonUnavailable {
                path: self.path.clone(),
                source,
            },
        })
    }
}
