//! Bounded polling for long-running server-side jobs.
//!
//! A fixed-interval, fixed-budget probe loop: runs until the probe reports
//! completion or the attempt budget is exhausted, whichever comes first.
//! Both terminal states are distinct values, so callers can tell "job
//! finished" apart from "gave up waiting".

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for a bounded poll.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Total number of probe attempts, including the first.
    pub max_attempts: u32,
    /// Delay between consecutive probes.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

impl PollConfig {
    /// Create a config with the specified attempt budget.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Tight config for tests: few attempts, short interval.
    pub fn quick() -> Self {
        Self {
            max_attempts: 3,
            interval: Duration::from_millis(10),
        }
    }
}

/// Outcome of a bounded poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe observed completion within the budget.
    Completed(T),
    /// The budget ran out before the probe observed completion.
    Exhausted { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            PollOutcome::Completed(value) => Some(value),
            PollOutcome::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollOutcome::Exhausted { .. })
    }
}

/// Drive `probe` until it yields a value or the budget is exhausted.
///
/// The probe returns `Ok(Some(value))` on completion, `Ok(None)` while the
/// job is still running, and `Err` to abort the poll early.
pub async fn poll_until<F, Fut, T, E>(
    config: &PollConfig,
    operation_name: &str,
    probe: F,
) -> Result<PollOutcome<T>, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match probe().await? {
            Some(value) => {
                debug!(
                    operation = operation_name,
                    attempts, "poll observed completion"
                );
                return Ok(PollOutcome::Completed(value));
            }
            None if attempts >= config.max_attempts => {
                warn!(
                    operation = operation_name,
                    attempts, "poll budget exhausted before completion"
                );
                return Ok(PollOutcome::Exhausted { attempts });
            }
            None => sleep(config.interval).await,
        }
    }
}
