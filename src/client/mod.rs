//! Client module for statusctl.
//!
//! The client is a one-shot process that:
//! - Opens the daemon's socket or named pipe
//! - Writes a single control message
//! - Closes the connection, whether or not the write succeeded

pub mod fifo;
pub mod socket;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::protocol::{framing, ControlMessage};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tracing::{debug, warn};

/// Enum-based endpoint for the two daemon transports.
pub enum Endpoint {
    Socket(socket::SocketEndpoint),
    Fifo(fifo::FifoEndpoint),
}

impl Endpoint {
    /// Open the endpoint, write the message and close it.
    pub async fn send(&self, message: &ControlMessage) -> Result<()> {
        match self {
            Endpoint::Socket(e) => e.send(message).await,
            Endpoint::Fifo(e) => e.send(message).await,
        }
    }

    /// Get the transport name.
    pub fn transport(&self) -> &'static str {
        match self {
            Endpoint::Socket(_) => "socket",
            Endpoint::Fifo(_) => "fifo",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Endpoint::Socket(e) => &e.path,
            Endpoint::Fifo(e) => &e.path,
        }
    }
}

/// Create an endpoint from configuration.
pub fn create_endpoint(config: &EndpointConfig) -> Endpoint {
    let path = config.path().clone();
    let timeout = config.timeout();
    match config {
        EndpointConfig::Socket { .. } => {
            Endpoint::Socket(socket::SocketEndpoint::new(path, timeout))
        }
        EndpointConfig::Fifo { .. } => Endpoint::Fifo(fifo::FifoEndpoint::new(path, timeout)),
    }
}

/// Sends control messages to the status daemon.
pub struct StatusClient {
    endpoint: Endpoint,
}

impl StatusClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(create_endpoint(config))
    }

    /// Deliver one message. Nothing is retried.
    pub async fn send(&self, message: &ControlMessage) -> Result<()> {
        if message.is_truncated() {
            warn!(message = message.as_str(), "message truncated to fit the daemon buffer");
        }
        debug!(
            transport = self.endpoint.transport(),
            path = %self.endpoint.path().display(),
            message = message.as_str(),
            "sending control message"
        );
        self.endpoint.send(message).await?;
        debug!("message delivered");
        Ok(())
    }
}

/// Write the message within `timeout`, mapping failures to the client taxonomy.
async fn write_bounded<W>(
    writer: &mut W,
    message: &ControlMessage,
    path: &Path,
    timeout: Duration,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    tokio::time::timeout(timeout, framing::write_message(writer, message))
        .await
        .map_err(|_| Error::Timeout {
            phase: "writing the message",
            after: timeout,
        })?
        .map_err(|source| Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        })
}

/// Stand-in daemons for tests.
#[cfg(test)]
pub mod testing {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::UnixListener;

    /// A socket daemon bound inside its own temp directory.
    ///
    /// The directory, and with it the socket file, is removed on drop.
    pub struct StubDaemon {
        pub path: PathBuf,
        listener: UnixListener,
        _temp_dir: TempDir,
    }

    impl StubDaemon {
        pub fn bind() -> Self {
            let temp_dir = TempDir::new().expect("failed to create temp dir");
            let path = temp_dir.path().join("statusd.socket");
            let listener = UnixListener::bind(&path).expect("failed to bind stub socket");
            Self {
                path,
                listener,
                _temp_dir: temp_dir,
            }
        }

        /// Accept one connection and read until the client closes it.
        pub async fn receive(&self) -> Vec<u8> {
            let read = async {
                let (mut stream, _) = self.listener.accept().await.expect("accept failed");
                let mut buf = Vec::new();
                stream.read_to_end(&mut buf).await.expect("read failed");
                buf
            };
            tokio::time::timeout(Duration::from_secs(5), read)
                .await
                .expect("stub daemon timed out waiting for a message")
        }

        /// Whether any client connected within `wait`.
        pub async fn connected_within(&self, wait: Duration) -> bool {
            tokio::time::timeout(wait, self.listener.accept()).await.is_ok()
        }
    }

    /// Create a named pipe at `path`.
    pub fn mkfifo(path: &Path) {
        let c_path = CString::new(path.as_os_str().as_bytes()).expect("path contains NUL");
        let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
        assert_eq!(rc, 0, "mkfifo failed: {}", std::io::Error::last_os_error());
    }
}
