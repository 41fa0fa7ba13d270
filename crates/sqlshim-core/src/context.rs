//! Per-call cancellation and deadline handle

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Cancellation/deadline context supplied by the caller of every driver
/// operation.
///
/// Wrapping layers pass the same reference through to the driver they wrap.
/// Only the driver doing the I/O acts on it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that is cancelled together with `token`
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, `None` when there is no deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Whether the caller cancelled or the deadline has passed
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.remaining() == Some(Duration::ZERO)
    }
}
