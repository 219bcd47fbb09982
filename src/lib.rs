//! saybox — client for a small "say something" comment service.
//!
//! ARCHITECTURE
//! ============
//! - `api`: the message exchange client (`POST /api`, `GET /api/comments`),
//!   its typed errors and its configuration.
//! - `screens`: compose and feed screen state over the `CommentApi` trait.
//! - `notice`: maps operation results to alerts and navigation.

pub mod api;
pub mod notice;
pub mod screens;
