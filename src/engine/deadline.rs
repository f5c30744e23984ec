/// Deadline supervision for solver phases
///
/// A phase runs on the blocking pool with its own `CancellationToken`.
/// If the timer wins the race the token is cancelled and the caller gets
/// `DeadlineError::Elapsed` immediately; the solver observes the token at
/// its next node expansion and stops. Dropping the awaiting future also
/// cancels the token.

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Which solver pass is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
    Optimal,
    Alternative,
}

impl fmt::Display for SolvePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolvePhase::Optimal => f.write_str("optimal"),
            SolvePhase::Alternative => f.write_str("alternative"),
        }
    }
}

/// Supervision failures
#[derive(Error, Debug)]
pub enum DeadlineError {
    #[error("{phase} phase exceeded its deadline of {limit:?}")]
    Elapsed { phase: SolvePhase, limit: Duration },

    #[error("{phase} phase task failed: {message}")]
    Join { phase: SolvePhase, message: String },
}

/// Races phase tasks against an optional fixed limit
#[derive(Debug, Clone, Copy)]
pub struct DeadlineSupervisor {
    limit: Option<Duration>,
}

impl DeadlineSupervisor {
    pub fn new(limit: Option<Duration>) -> Self {
        Self { limit }
    }

    /// Supervisor that never times out
    pub fn unbounded() -> Self {
        Self { limit: None }
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Run one phase on the blocking pool
    ///
    /// # Errors
    /// * `DeadlineError::Elapsed` - the limit passed before `task` returned
    /// * `DeadlineError::Join` - `task` panicked
    pub async fn run<T, F>(&self, phase: SolvePhase, task: F) -> Result<T, DeadlineError>
    where
        F: FnOnce(CancellationToken) -> T + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        let _guard = token.clone().drop_guard();

        let task_token = token.clone();
        let handle = tokio::task::spawn_blocking(move || task(task_token));

        let joined = match self.limit {
            None => handle.await,
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(%phase, limit_ms = limit.as_millis() as u64, "solver phase timed out");
                    token.cancel();
                    return Err(DeadlineError::Elapsed { phase, limit });
                }
            },
        };

        debug!(%phase, "solver phase finished");
        joined.map_err(|err| DeadlineError::Join {
            phase,
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_completes_within_limit() {
        let supervisor = DeadlineSupervisor::new(Some(Duration::from_secs(5)));
        let value = supervisor
            .run(SolvePhase::Optimal, |_cancel| 21 * 2)
            .await
            .unwrap();

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_unbounded_waits() {
        let supervisor = DeadlineSupervisor::unbounded();
        let value = supervisor
            .run(SolvePhase::Alternative, |_cancel| {
                std::thread::sleep(Duration::from_millis(50));
                "done"
            })
            .await
            .unwrap();

        assert_eq!(value, "done");
        assert!(supervisor.limit().is_none());
    }

    #[tokio::test]
    async fn test_elapsed_cancels_task() {
        let supervisor = DeadlineSupervisor::new(Some(Duration::from_millis(50)));
        let observed = Arc::new(AtomicBool::new(false));
        let flag = observed.clone();

        let started = Instant::now();
        let result = supervisor
            .run(SolvePhase::Optimal, move |cancel| {
                // Spin until told to stop
                while !cancel.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                flag.store(true, Ordering::SeqCst);
            })
            .await;

        assert!(matches!(
            result,
            Err(DeadlineError::Elapsed {
                phase: SolvePhase::Optimal,
                ..
            })
        ));
        assert!(started.elapsed() < Duration::from_secs(2));

        // The abandoned task sees the cancellation and winds down
        for _ in 0..100 {
            if observed.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(observed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panic_becomes_join_error() {
        let supervisor = DeadlineSupervisor::new(Some(Duration::from_secs(5)));
        let result: Result<(), _> = supervisor
            .run(SolvePhase::Alternative, |_cancel| panic!("solver bug"))
            .await;

        assert!(matches!(
            result,
            Err(DeadlineError::Join {
                phase: SolvePhase::Alternative,
                ..
            })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = DeadlineError::Elapsed {
            phase: SolvePhase::Optimal,
            limit: Duration::from_millis(5000),
        };
        assert_eq!(err.to_string(), "optimal phase exceeded its deadline of 5s");
    }
}
