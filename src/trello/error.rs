//! Remote invocation error types.
//!
//! Every variant renders an opaque message. The remote service's response
//! body is never captured, so it cannot leak into tool results or logs.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by a single outbound Trello call.
#[derive(Error, Diagnostic, Debug)]
pub enum TrelloError {
    #[error("Trello API request failed with status {status}")]
    #[diagnostic(code(trello_mcp::trello::status))]
    Status { status: u16 },

    #[error("Trello API request failed: {reason}")]
    #[diagnostic(code(trello_mcp::trello::transport))]
    Transport { reason: &'static str },

    #[error("Trello API returned a response that is not valid JSON")]
    #[diagnostic(code(trello_mcp::trello::decode))]
    Decode,

    #[error("Invalid Trello API URL: {message}")]
    #[diagnostic(
        code(trello_mcp::trello::invalid_url),
        help("Check the configured Trello base URL")
    )]
    InvalidUrl { message: String },
}

impl TrelloError {
    /// HTTP status reported by the remote service, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrelloError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TrelloError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL, which carries the credentials.
        let reason = if e.is_timeout() {
            "request timed out"
        } else if e.is_connect() {
            "connection failed"
        } else if e.is_decode() {
            return TrelloError::Decode;
        } else {
            "transport error"
        };
        TrelloError::Transport { reason }
    }
}

/// Result type for remote invocations.
pub type TrelloResult<T> = Result<T, TrelloError>;
