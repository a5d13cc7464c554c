//! Per-call cancellation signal
//!
//! `Context` is checked at the entry of `Handler::enabled` and
//! `Handler::handle`. A record already being written is never interrupted.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Reason reported after `Context::cancel`
pub const CANCELED: &str = "context canceled";
/// Reason reported once a deadline has passed
pub const DEADLINE_EXCEEDED: &str = "context deadline exceeded";

#[derive(Debug)]
struct CancelState {
    reason: RwLock<Option<String>>,
    deadline: Option<Instant>,
}

/// Cancellation signal with a reason
///
/// Clones share state: cancelling any clone cancels them all.
///
/// # Example
///
/// ```
/// use rust_color_handler::core::Context;
///
/// let ctx = Context::cancellable();
/// assert!(ctx.err().is_none());
/// ctx.cancel();
/// assert_eq!(ctx.err().as_deref(), Some("context canceled"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    state: Option<Arc<CancelState>>,
}

impl Context {
    /// A context that is never cancelled
    pub fn background() -> Self {
        Self { state: None }
    }

    pub fn cancellable() -> Self {
        Self::with_state(None)
    }

    /// Cancelled automatically once `deadline` passes
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::with_state(Some(deadline))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    fn with_state(deadline: Option<Instant>) -> Self {
        Self {
            state: Some(Arc::new(CancelState {
                reason: RwLock::new(None),
                deadline,
            })),
        }
    }

    pub fn cancel(&self) {
        self.cancel_with(CANCELED);
    }

    /// Cancel with a custom reason; the first reason recorded wins.
    /// Has no effect on a background context.
    pub fn cancel_with(&self, reason: impl Into<String>) {
        if let Some(state) = &self.state {
            let mut current = state.reason.write();
            if current.is_none() {
                *current = Some(reason.into());
            }
        }
    }

    /// The cancellation reason, or `None` while the context is live
    pub fn err(&self) -> Option<String> {
        let state = self.state.as_ref()?;
        if let Some(reason) = state.reason.read().as_ref() {
            return Some(reason.clone());
        }
        match state.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(DEADLINE_EXCEEDED.to_string()),
            _ => None,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.err().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.state.as_ref().and_then(|state| state.deadline)
    }
}
