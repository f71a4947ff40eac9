//! Unix socket transport to the daemon.

use crate::error::{Error, Result};
use crate::protocol::ControlMessage;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tracing::debug;

/// The daemon's listening socket.
#[derive(Debug, Clone)]
pub struct SocketEndpoint {
    pub path: PathBuf,
    timeout: Duration,
}

impl SocketEndpoint {
    pub fn new(path: PathBuf, timeout: Duration) -> Self {
        Self { path, timeout }
    }

    /// Connect, write one message, then close.
    pub async fn send(&self, message: &ControlMessage) -> Result<()> {
        let mut stream = self.connect().await?;
        super::write_bounded(&mut stream, message, &self.path, self.timeout).await?;

        // Bytes are already queued; shutdown only signals EOF.
        if let Err(e) = stream.shutdown().await {
            debug!("Socket shutdown failed: {}", e);
        }
        Ok(())
    }

    /// Connect with timeout. No retry.
    async fn connect(&self) -> Result<UnixStream> {
        let stream = tokio::time::timeout(self.timeout, UnixStream::connect(&self.path))
            .await
            .map_err(|_| Error::Timeout {
                phase: "connecting to statusd",
                after: self.timeout,
            })?
            .map_err(|source| Error::DaemonUnavailable {
                path: self.path.clone(),
                source,
            })?;

        debug!("Connected to {}", self.path.display());
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubDaemon;
    use crate::config::MessageConfig;

    fn message(segment: &str, token: &str) -> ControlMessage {
        ControlMessage::format(segment, token, &MessageConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_is_byte_exact() {
        let daemon = StubDaemon::bind();
        let endpoint = SocketEndpoint::new(daemon.path.clone(), Duration::from_secs(1));

        endpoint.send(&message("vol", "up")).await.unwrap();

        assert_eq!(daemon.receive().await, b"vol,up");
    }

    #[tokio::test]
    async fn test_one_message_per_connection() {
        let daemon = StubDaemon::bind();
        let endpoint = SocketEndpoint::new(daemon.path.clone(), Duration::from_secs(1));

        endpoint.send(&message("wifi", "1")).await.unwrap();
        endpoint.send(&message("wifi", "3")).await.unwrap();

        assert_eq!(daemon.receive().await, b"wifi,1");
        assert_eq!(daemon.receive().await, b"wifi,3");
    }

    #[tokio::test]
    async fn test_missing_socket_reports_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statusd.socket");
        let endpoint = SocketEndpoint::new(path.clone(), Duration::from_secs(1));

        let err = endpoint.send(&message("vol", "up")).await.unwrap_err();

        assert!(matches!(err, Error::DaemonUnavailable { .. }));
        assert!(err.to_string().contains("not running"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_stale_socket_reports_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statusd.socket");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        let endpoint = SocketEndpoint::new(path, Duration::from_secs(1));

        let err = endpoint.send(&message("vol", "up")).await.unwrap_err();

        match err {
            Error::DaemonUnavailable { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::ConnectionRefused)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
