//! Wire format shared with the status daemon.
//!
//! A message is a bare `segment,token` text line: no length prefix, no trailing
//! newline or terminator. The daemon splits on the first separator.

use crate::config::{MessageConfig, Overflow};
use crate::error::{Error, Result};

/// Separator between segment and token.
pub const SEPARATOR: char = ',';

/// A formatted control message that fits the daemon's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    text: String,
    truncated: bool,
}

impl ControlMessage {
    /// Compose `segment,token`, enforcing the configured size limit.
    ///
    /// Truncation only ever shortens the token; a segment that leaves no room
    /// for the separator is rejected under either policy.
    pub fn format(segment: &str, token: &str, policy: &MessageConfig) -> Result<Self> {
        let mut text = String::with_capacity(segment.len() + 1 + token.len());
        text.push_str(segment);
        text.push(SEPARATOR);
        text.push_str(token);

        let limit = policy.max_len;
        if text.len() <= limit {
            return Ok(Self {
                text,
                truncated: false,
            });
        }

        let head = segment.len() + SEPARATOR.len_utf8();
        match policy.overflow {
            Overflow::Truncate if head <= limit => {
                let mut cut = limit;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
                Ok(Self {
                    text,
                    truncated: true,
                })
            }
            _ => Err(Error::MessageTooLong {
                len: text.len(),
                limit,
            }),
        }
    }

    /// Whether `format` had to drop bytes to fit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Framing for messages: raw bytes in a single logical send.
pub mod framing {
    use super::ControlMessage;
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    /// Write the whole message, retrying short writes, then flush.
    pub async fn write_message<W>(writer: &mut W, message: &ControlMessage) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(message.as_bytes()).await?;
        writer.flush().await
    }
}
