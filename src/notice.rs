//! Notices — user-facing effects derived from operation results.
//!
//! A renderer shows alerts and follows navigation; it never sees error
//! detail. The detail goes to the log with its error code instead.

use crate::api::{ErrorCode, FetchError, SubmitError, ValidationError};
use crate::screens::{RefreshOutcome, SubmitOutcome};

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;

pub const SEND_FAILED: &str = "Failed to send message. Please check your connection and try again.";
pub const FETCH_FAILED: &str = "Failed to fetch messages. Please check your connection and try again.";
pub const SENT: &str = "You've successfully added your message, look at the feed for your contributions.";
pub const EMPTY_MESSAGE: &str = "Please enter a message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Feed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking, dismissible message.
    Alert { title: &'static str, message: String },
    Navigate(Route),
}

impl Notice {
    fn alert(title: &'static str, message: impl Into<String>) -> Self {
        Self::Alert { title, message: message.into() }
    }
}

/// Effects for the result of a compose-screen submit.
#[must_use]
pub fn for_submit(result: &Result<SubmitOutcome, SubmitError>) -> Vec<Notice> {
    match result {
        Ok(SubmitOutcome::ShowFeed) => vec![Notice::alert("Sent", SENT), Notice::Navigate(Route::Feed)],
        Err(SubmitError::Busy) => Vec::new(),
        Err(SubmitError::Validation(e)) => vec![Notice::alert("Error", validation_message(e))],
        Err(e) => {
            tracing::warn!(code = e.error_code(), retryable = e.retryable(), status = e.status(), error = %e, "failed to send message");
            vec![Notice::alert("Error", SEND_FAILED)]
        }
    }
}

/// Effects for the result of a feed refresh.
#[must_use]
pub fn for_refresh(result: &Result<RefreshOutcome, FetchError>) -> Vec<Notice> {
    match result {
        Ok(_) => Vec::new(),
        Err(e) => {
            tracing::warn!(code = e.error_code(), retryable = e.retryable(), status = e.status(), error = %e, "failed to fetch messages");
            vec![Notice::alert("Error", FETCH_FAILED)]
        }
    }
}

fn validation_message(e: &ValidationError) -> String {
    match e {
        ValidationError::Empty => EMPTY_MESSAGE.to_string(),
        ValidationError::TooLong { max, .. } => format!("Messages are limited to {max} characters"),
    }
}
