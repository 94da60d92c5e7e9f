use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::engine::TickEngine;

/// Handle to a running periodic tick task.
///
/// The first firing happens one full period after scheduling. Late firings
/// are delayed rather than bunched up.
pub(crate) struct ScheduledTicker {
    token: CancellationToken,
    handle: JoinHandle<()>,
    period: Duration,
}

impl ScheduledTicker {
    pub fn spawn(engine: Arc<TickEngine>, period: Duration) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        match engine.tick_unless_cancelled(&task_token) {
                            Some(snapshot) => debug!(sequence = snapshot.sequence, "scheduled tick"),
                            None => break,
                        }
                    }
                }
            }
        });

        info!(interval_ms = period.as_millis() as u64, "simulation ticker started");
        Self {
            token,
            handle,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Cancel the task. Returns once no further tick from it can be
    /// published, including one that was already running.
    pub fn cancel(self, engine: &TickEngine) {
        self.token.cancel();
        self.handle.abort();
        engine.barrier();
        info!(interval_ms = self.period.as_millis() as u64, "simulation ticker stopped");
    }
}
