//! Per-screen state for the compose and feed views.
//!
//! DESIGN
//! ======
//! Each screen owns its own state behind a `std::sync::Mutex` that is never
//! held across an await. Operations move through
//! `Idle -> Pending -> {Succeeded, Failed}`; the renderer acknowledges the
//! terminal phase to return to `Idle`.
//!
//! The compose screen refuses a second submit while one is pending (the
//! submit control is disabled), and ignores draft edits during that time.
//!
//! The feed screen tickets every refresh. A response is applied only if its
//! ticket is newer than the last applied one, so a slow early response can
//! never overwrite a newer list.
//!
//! Both operations may be dropped mid-flight (screen unmount, timeout). A
//! drop guard settles the state in that case: a cancelled submit returns the
//! compose screen to `Idle` with the draft kept, and a cancelled refresh no
//! longer counts as in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{Comment, CommentApi, Draft, ErrorCode, FetchError, SubmitError};

#[cfg(test)]
#[path = "screens_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    fn acknowledged(self) -> Self {
        match self {
            Self::Succeeded | Self::Failed => Self::Idle,
            other => other,
        }
    }
}

// =============================================================================
// COMPOSE
// =============================================================================

/// What the renderer should do after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Switch to the feed view.
    ShowFeed,
}

#[derive(Debug, Default)]
struct ComposeState {
    draft: Draft,
    phase: Phase,
}

/// State of the compose view: one draft and its submission.
pub struct ComposeScreen {
    api: Arc<dyn CommentApi>,
    state: Mutex<ComposeState>,
}

impl ComposeScreen {
    #[must_use]
    pub fn new(api: Arc<dyn CommentApi>) -> Self {
        Self { api, state: Mutex::new(ComposeState::default()) }
    }

    fn lock(&self) -> MutexGuard<'_, ComposeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn draft(&self) -> String {
        self.lock().draft.text().to_string()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Replace the draft text. Returns `false` while a submission is pending.
    pub fn set_draft(&self, text: impl Into<String>) -> bool {
        let mut state = self.lock();
        if state.phase == Phase::Pending {
            return false;
        }
        state.draft.set(text);
        true
    }

    /// Mark the last terminal phase as seen.
    pub fn acknowledge(&self) {
        let mut state = self.lock();
        state.phase = state.phase.acknowledged();
    }

    /// Submit the current draft.
    ///
    /// On success the draft is cleared. On any failure it is kept so the
    /// user can resubmit.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Busy`] while a submission is pending,
    /// [`SubmitError::Validation`] for an unusable draft, or the client's
    /// error for a failed request.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let text = {
            let mut state = self.lock();
            if state.phase == Phase::Pending {
                return Err(SubmitError::Busy);
            }
            let text = state.draft.validate()?.to_string();
            state.phase = Phase::Pending;
            text
        };
        let pending = PendingSubmit { screen: self, settled: false };

        let result = self.api.submit(&text).await;

        let mut state = self.lock();
        match result {
            Ok(()) => {
                state.draft.clear();
                pending.settle(&mut state, Phase::Succeeded);
                Ok(SubmitOutcome::ShowFeed)
            }
            Err(e) => {
                tracing::debug!(code = e.error_code(), "submission failed; draft kept");
                pending.settle(&mut state, Phase::Failed);
                Err(e)
            }
        }
    }
}

/// Leaves `Pending` if the submit future is dropped before it resolves.
struct PendingSubmit<'a> {
    screen: &'a ComposeScreen,
    settled: bool,
}

impl PendingSubmit<'_> {
    fn settle(mut self, state: &mut ComposeState, phase: Phase) {
        state.phase = phase;
        self.settled = true;
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.screen.lock();
        if state.phase == Phase::Pending {
            state.phase = Phase::Idle;
        }
        tracing::debug!("submission cancelled; draft kept");
    }
}

// =============================================================================
// FEED
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The displayed list was replaced; carries the new length.
    Updated(usize),
    /// A newer refresh already applied; this response was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct FeedState {
    comments: Vec<Comment>,
    last_error: Option<String>,
    issued: u64,
    applied: u64,
    in_flight: usize,
    acknowledged: bool,
}

impl FeedState {
    fn phase(&self) -> Phase {
        if self.in_flight > 0 {
            Phase::Pending
        } else if self.applied == 0 || self.acknowledged {
            Phase::Idle
        } else if self.last_error.is_some() {
            Phase::Failed
        } else {
            Phase::Succeeded
        }
    }
}

/// State of the feed view: the displayed comments and their refreshes.
pub struct FeedScreen {
    api: Arc<dyn CommentApi>,
    state: Mutex<FeedState>,
}

impl FeedScreen {
    #[must_use]
    pub fn new(api: Arc<dyn CommentApi>) -> Self {
        Self { api, state: Mutex::new(FeedState::default()) }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Comments currently displayed, in server order.
    #[must_use]
    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    /// Message of the most recently applied failure, cleared by a success.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Mark the last terminal phase as seen.
    pub fn acknowledge(&self) {
        self.lock().acknowledged = true;
    }

    /// Fetch the comment list and apply it if no newer refresh has.
    ///
    /// A failed refresh leaves the displayed list untouched.
    ///
    /// # Errors
    ///
    /// Returns the client's [`FetchError`] when this refresh is the newest
    /// to resolve. Failures of superseded refreshes are discarded.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let ticket = {
            let mut state = self.lock();
            state.issued += 1;
            state.in_flight += 1;
            state.issued
        };
        let in_flight = InFlight { screen: self, settled: false };

        let result = self.api.list().await;

        let mut state = self.lock();
        in_flight.settle(&mut state);
        if ticket <= state.applied {
            tracing::debug!(ticket, applied = state.applied, "discarding superseded comment list");
            return Ok(RefreshOutcome::Superseded);
        }
        state.applied = ticket;
        state.acknowledged = false;

        match result {
            Ok(comments) => {
                let count = comments.len();
                state.comments = comments;
                state.last_error = None;
                Ok(RefreshOutcome::Updated(count))
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Stops counting a refresh as in flight, including when it is dropped.
struct InFlight<'a> {
    screen: &'a FeedScreen,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, state: &mut FeedState) {
        state.in_flight -= 1;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.screen.lock().in_flight -= 1;
            tracing::debug!("comment refresh cancelled");
        }
    }
}
