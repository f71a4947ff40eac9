//! Resolution of the segment and token from the command line.
//!
//! The status bar runs `statusctl <segment>` on clicks, exporting the clicked
//! button in `$BUTTON`, and scripts run `statusctl <segment> <action>`.

use crate::error::{Error, Result};

/// Environment variable holding the clicked button.
pub const BUTTON_VAR: &str = "BUTTON";

/// Payload sent alongside the segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Explicit second argument.
    Action(String),
    /// Value of `$BUTTON`, empty when unset.
    Button(String),
}

impl Token {
    pub fn as_str(&self) -> &str {
        match self {
            Token::Action(s) | Token::Button(s) => s,
        }
    }
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub segment: String,
    pub token: Token,
}

/// Map positional arguments to an invocation.
///
/// `button` is only called for the one-argument form.
pub fn resolve<F>(args: &[String], button: F) -> Result<Invocation>
where
    F: FnOnce() -> Option<String>,
{
    match args {
        [segment] => Ok(Invocation {
            segment: segment.clone(),
            token: Token::Button(button().unwrap_or_default()),
        }),
        [segment, action] => Ok(Invocation {
            segment: segment.clone(),
            token: Token::Action(action.clone()),
        }),
        _ => Err(Error::InvalidArguments { count: args.len() }),
    }
}

/// Read `$BUTTON` from the process environment.
pub fn button_from_env() -> Option<String> {
    std::env::var_os(BUTTON_VAR).map(|v| v.to_string_lossy().into_owned())
}
