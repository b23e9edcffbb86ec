use crate::core::etl::EtlEngine;
use crate::core::retry::RetryPolicy;
use crate::core::Pipeline;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Run cadence and retry settings, passed explicitly to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub owner: String,
    pub retries: u32,
    pub retry_delay: Duration,
    pub interval: Duration,
    /// First run is held back until this instant.
    pub start_at: Option<DateTime<Utc>>,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            owner: "etl".to_string(),
            retries: 2,
            retry_delay: Duration::from_secs(60),
            interval: Duration::from_secs(24 * 60 * 60),
            start_at: None,
        }
    }
}

impl SchedulePolicy {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.retry_delay)
    }
}

/// Shortest interval the scheduler will tick at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Runs the engine once per interval until shut down.
pub struct Scheduler<P: Pipeline> {
    engine: EtlEngine<P>,
    policy: SchedulePolicy,
}

impl<P: Pipeline> Scheduler<P> {
    /// An interval below `MIN_INTERVAL` (including zero) is raised to it.
    pub fn new(engine: EtlEngine<P>, mut policy: SchedulePolicy) -> Self {
        if policy.interval < MIN_INTERVAL {
            tracing::warn!(
                "Schedule interval {:?} is too short, using {:?}",
                policy.interval,
                MIN_INTERVAL
            );
            policy.interval = MIN_INTERVAL;
        }
        let engine = engine.with_retry_policy(policy.retry_policy());
        Self { engine, policy }
    }

    pub fn engine(&self) -> &EtlEngine<P> {
        &self.engine
    }

    /// Returns the number of runs started. A failed run is logged and the
    /// schedule continues. Shutdown during a run abandons it between two
    /// statements; already inserted rows are skipped by the next run.
    pub async fn run_until<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let owner = self.policy.owner.as_str();

        if let Some(start_at) = self.policy.start_at {
            let wait = (start_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            if !wait.is_zero() {
                tracing::info!(owner, "⏳ First run scheduled for {}", start_at);
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = &mut shutdown => {
                        tracing::info!(owner, "Shutdown requested before the first run");
                        return 0;
                    }
                }
            }
        }

        let mut ticker = tokio::time::interval(self.policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut runs = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(owner, "Shutdown requested after {} runs", runs);
                    break;
                }
                _ = ticker.tick() => {
                    runs += 1;
                    tokio::select! {
                        result = self.engine.run() => match result {
                            Ok(report) => tracing::info!(
                                owner,
                                "✅ Run {} finished: {} new books, {} already stored",
                                report.run_id,
                                report.load.inserted,
                                report.load.skipped
                            ),
                            Err(e) => tracing::error!(
                                owner,
                                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                                e,
                                e.category(),
                                e.severity()
                            ),
                        },
                        _ = &mut shutdown => {
                            tracing::warn!(owner, "Shutdown requested during a run; the run was abandoned");
                            break;
                        }
                    }
                }
            }
        }

        runs
    }
}
