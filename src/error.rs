//! Error taxonomy for a single statusctl invocation.

use std::path::PathBuf;
use std::time::Duration;

/// Everything that can stop a control message from reaching the daemon.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("usage: statusctl <segment> [action] (got {count} arguments)")]
    InvalidArguments { count: usize },

    #[error("message is {len} bytes, the daemon accepts at most {limit}")]
    MessageTooLong { len: usize, limit: usize },

    #[error("{} is not a fifo.", .0.display())]
    InvalidEndpoint(PathBuf),

    #[error("statusd is not running")]
    DaemonUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write message to {}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {after:?} while {phase}")]
    Timeout {
        phase: &'static str,
        after: Duration,
    },
}

impl Error {
    /// Process exit code for this failure. Usage errors share clap's code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArguments { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
