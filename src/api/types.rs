//! Exchange types — the comment record, the draft, and operation errors.
//!
//! Wire field names are fixed by the comment service: the message text
//! travels as `say` and the creation time as `created_at`.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

/// Longest message body the client will send, in characters.
pub const MAX_BODY_CHARS: usize = 500;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Stable machine-readable classification of an error, used for diagnostics.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    /// Whether a manual re-trigger of the same operation may succeed.
    fn retryable(&self) -> bool;
}

// =============================================================================
// ERRORS
// =============================================================================

/// Local precondition failure on a draft. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The draft is empty or contains only whitespace.
    #[error("message is empty")]
    Empty,

    /// The draft exceeds [`MAX_BODY_CHARS`].
    #[error("message is {actual} characters; the limit is {max}")]
    TooLong { max: usize, actual: usize },
}

/// Errors produced by a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The draft failed validation; no request was sent.
    #[error("invalid message: {0}")]
    Validation(#[from] ValidationError),

    /// Another submission is still in flight; no request was sent.
    #[error("a submission is already in flight")]
    Busy,

    /// The request could not be delivered or its response could not be read.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },
}

impl SubmitError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced when listing comments.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be delivered or its response could not be read.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the comment list shape.
    #[error("API response parse failed: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_VALIDATION_EMPTY",
            Self::TooLong { .. } => "E_VALIDATION_TOO_LONG",
        }
    }

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Busy => "E_BUSY",
            Self::Transport(_) => "E_API_REQUEST",
            Self::Status { .. } => "E_API_RESPONSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Busy | Self::Transport(_) | Self::Status { .. })
    }
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_API_REQUEST",
            Self::Status { .. } => "E_API_RESPONSE",
            Self::Decode(_) => "E_API_PARSE",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

// =============================================================================
// COMMENT
// =============================================================================

/// A server-persisted message. Created only by the service; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "say")]
    pub body: String,
    /// ISO-8601 timestamp exactly as transmitted.
    pub created_at: String,
}

/// Request body for `POST {base}/api`.
#[derive(Debug, Serialize)]
pub(crate) struct SayRequest<'a> {
    pub say: &'a str,
}

// =============================================================================
// DRAFT
// =============================================================================

/// The user's in-progress, unsent message text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
}

impl Draft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check the draft against the send preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the draft is blank or too long.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        validate_body(&self.text)
    }
}

/// Check a message body against the send preconditions.
///
/// The body itself is returned unchanged; trimming is only used to detect
/// blank input.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] for blank text and
/// [`ValidationError::TooLong`] above [`MAX_BODY_CHARS`].
pub fn validate_body(text: &str) -> Result<&str, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    let actual = text.chars().count();
    if actual > MAX_BODY_CHARS {
        return Err(ValidationError::TooLong { max: MAX_BODY_CHARS, actual });
    }
    Ok(text)
}
