//! Comment service HTTP client.
//!
//! Thin wrapper over `POST {base}/api` and `GET {base}/api/comments`.
//! Pure parsing in `parse_comments` for testability.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::config::{ConfigError, ExchangeConfig};
use super::types::{Comment, FetchError, SayRequest, SubmitError, validate_body};

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the comment service.
///
/// Clones share the same connection pool and the same submission guard.
#[derive(Clone)]
pub struct CommentClient {
    http: reqwest::Client,
    submit_url: String,
    comments_url: String,
    submitting: Arc<AtomicBool>,
}

impl CommentClient {
    /// Build a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ExchangeConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            submit_url: config.submit_url(),
            comments_url: config.comments_url(),
            submitting: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Send `text` as a new comment.
    ///
    /// The text is sent as typed; surrounding whitespace is only considered
    /// when checking for a blank message.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] or [`SubmitError::Busy`] without
    /// touching the network, or a transport/status error from the service.
    pub async fn submit(&self, text: &str) -> Result<(), SubmitError> {
        let say = validate_body(text)?;
        let _guard = SubmitGuard::acquire(&self.submitting).ok_or(SubmitError::Busy)?;

        tracing::debug!(url = %self.submit_url, chars = say.chars().count(), "submitting comment");
        let response = self
            .http
            .post(&self.submit_url)
            .json(&SayRequest { say })
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %body, "comment submission rejected");
            return Err(SubmitError::Status { status: status.as_u16(), body });
        }

        tracing::info!(status = status.as_u16(), "comment submitted");
        Ok(())
    }

    /// Fetch all comments in server order.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or decode error; never a partial list.
    pub async fn list(&self) -> Result<Vec<Comment>, FetchError> {
        tracing::debug!(url = %self.comments_url, "fetching comments");
        let response = self
            .http
            .get(&self.comments_url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %text, "comment fetch rejected");
            return Err(FetchError::Status { status: status.as_u16(), body: text });
        }

        let comments = parse_comments(&text)?;
        tracing::debug!(count = comments.len(), "comments fetched");
        Ok(comments)
    }
}

#[async_trait::async_trait]
impl super::CommentApi for CommentClient {
    async fn submit(&self, text: &str) -> Result<(), SubmitError> {
        CommentClient::submit(self, text).await
    }

    async fn list(&self) -> Result<Vec<Comment>, FetchError> {
        CommentClient::list(self).await
    }
}

// =============================================================================
// SUBMIT GUARD
// =============================================================================

/// Holds the submission flag; releases it on drop, whatever the outcome.
struct SubmitGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_comments(json: &str) -> Result<Vec<Comment>, FetchError> {
    serde_json::from_str::<Vec<Comment>>(json).map_err(|e| FetchError::Decode(e.to_string()))
}
