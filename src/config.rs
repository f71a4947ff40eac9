//! Configuration management for statusctl.
//!
//! Configuration is loaded from `~/.config/statusctl/config.toml`, or from the
//! file named by `STATUSCTL_CONFIG`. A missing file means built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Well-known socket the daemon listens on.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/statusd.socket";
/// Well-known named pipe the daemon reads from.
pub const DEFAULT_FIFO_PATH: &str = "/tmp/statusd.pipe";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where the daemon listens.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Message size policy.
    #[serde(default)]
    pub message: MessageConfig,
}

/// Daemon endpoint selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum EndpointConfig {
    /// Unix domain stream socket.
    Socket {
        #[serde(default = "default_socket_path")]
        path: PathBuf,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
    /// Named pipe, opened write-only and non-blocking.
    Fifo {
        #[serde(default = "default_fifo_path")]
        path: PathBuf,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig::Socket {
            path: default_socket_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl EndpointConfig {
    /// Get the endpoint path.
    pub fn path(&self) -> &PathBuf {
        match self {
            EndpointConfig::Socket { path, .. } => path,
            EndpointConfig::Fifo { path, .. } => path,
        }
    }

    /// Bound applied separately to connecting and to writing.
    pub fn timeout(&self) -> Duration {
        match self {
            EndpointConfig::Socket { timeout_ms, .. } => Duration::from_millis(*timeout_ms),
            EndpointConfig::Fifo { timeout_ms, .. } => Duration::from_millis(*timeout_ms),
        }
    }
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

fn default_fifo_path() -> PathBuf {
    PathBuf::from(DEFAULT_FIFO_PATH)
}

fn default_timeout_ms() -> u64 {
    2000
}

/// What to do when `segment,token` exceeds `max_len`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Fail the invocation.
    #[default]
    Reject,
    /// Cut the token at the last character boundary that fits.
    Truncate,
}

/// Message size policy.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// Maximum payload in bytes. The daemon reads into a 32-byte buffer with a terminator.
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    #[serde(default)]
    pub overflow: Overflow,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            max_len: default_max_len(),
            overflow: Overflow::default(),
        }
    }
}

fn default_max_len() -> usize {
    31
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("statusctl"))
            .context("Could not determine config directory")
    }

    /// Get the config file path, honoring `STATUSCTL_CONFIG`.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os("STATUSCTL_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
