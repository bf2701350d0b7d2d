//! Execution context for topology queries
//!
//! Carries a cancellation token and an optional deadline from the caller down
//! into the etcd and PD clients.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Cancellable, deadline-bound execution context
#[derive(Debug, Clone, Default)]
pub struct TopoContext {
    cancel_token: CancellationToken,
    deadline: Option<Instant>,
}

impl TopoContext {
    /// Context with no deadline and a fresh cancellation token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context driven by an existing cancellation token
    #[must_use]
    pub fn with_cancel_token(cancel_token: CancellationToken) -> Self {
        Self {
            cancel_token,
            deadline: None,
        }
    }

    /// Bound this context by `timeout` from now. An earlier deadline is kept.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(earliest(self.deadline, Instant::now() + timeout));
        self
    }

    /// Child context: cancelled together with `self`, never outlives its deadline
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancel_token: self.cancel_token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Child context with an additional per-request timeout
    #[must_use]
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.child().with_timeout(timeout)
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes. `op` names the operation in timeout errors.
    pub async fn run<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => Err(Error::Cancelled),
            () = deadline => Err(Error::Timeout(format!("{op} exceeded its deadline"))),
            result = fut => result,
        }
    }
}

fn earliest(current: Option<Instant>, candidate: Instant) -> Instant {
    match current {
        Some(current) if current < candidate => current,
        _ => candidate,
    }
}
