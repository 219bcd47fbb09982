//! API — message exchange with the comment service.
//!
//! DESIGN
//! ======
//! `CommentClient` is the only type that talks HTTP. Screens depend on the
//! `CommentApi` trait instead, so their state transitions can be exercised
//! with an in-memory double.

pub mod client;
pub mod config;
pub mod types;

pub use client::CommentClient;
pub use config::{ConfigError, ExchangeConfig, Platform, PlatformEndpoints, Timeouts};
pub use types::{Comment, Draft, ErrorCode, FetchError, MAX_BODY_CHARS, SubmitError, ValidationError};

/// The two operations the comment service offers.
#[async_trait::async_trait]
pub trait CommentApi: Send + Sync {
    /// Send `text` as a new comment.
    async fn submit(&self, text: &str) -> Result<(), SubmitError>;

    /// Fetch all comments in server order.
    async fn list(&self) -> Result<Vec<Comment>, FetchError>;
}
