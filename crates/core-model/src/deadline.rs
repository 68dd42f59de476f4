//! Cooperative cancellation and wall-clock budget, checked between pipeline
//! stages rather than preemptively.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::PipelineError;

/// Shared cancellation flag a caller can flip from another thread to abort
/// a run between stages.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A soft wall-clock budget plus cancellation, checked at stage boundaries
/// by `core-pipeline::analyze`.
#[derive(Debug, Clone)]
pub struct Deadline {
    started_at: Instant,
    budget: Option<Duration>,
    cancellation: CancellationToken,
}

impl Deadline {
    pub fn new(budget: Option<Duration>, cancellation: CancellationToken) -> Self {
        Self {
            started_at: Instant::now(),
            budget,
            cancellation,
        }
    }

    /// Returns an error if the deadline has passed or the run was
    /// cancelled; call between stages, never mid-stage.
    pub fn check(&self) -> Result<(), PipelineError> {
        if self.cancellation.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        if let Some(budget) = self.budget {
            if self.started_at.elapsed() > budget {
                return Err(PipelineError::Timeout);
            }
        }
        Ok(())
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_observed() {
        let token = CancellationToken::new();
        let deadline = Deadline::new(None, token.clone());
        assert!(deadline.check().is_ok());
        token.cancel();
        assert!(matches!(deadline.check(), Err(PipelineError::Cancelled)));
    }

    #[test]
    fn zero_budget_times_out_immediately() {
        let deadline = Deadline::new(Some(Duration::from_secs(0)), CancellationToken::new());
        std::thread::sleep(Duration::from_millis(1));
        assert!(matches!(deadline.check(), Err(PipelineError::Timeout)));
    }
}
