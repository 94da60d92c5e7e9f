use parking_lot::Mutex;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::domain::Snapshot;
use crate::settings::SettingsStore;
use crate::simulation::{advance, FluctuationTuning};

/// Tick critical section shared by the scheduled task and manual refreshes.
///
/// The RNG mutex doubles as the tick lock: the next snapshot is derived from
/// the latest published one and published before the lock is released, so
/// two ticks never start from the same predecessor and readers only ever see
/// whole snapshots.
pub(crate) struct TickEngine {
    rng: Mutex<StdRng>,
    publisher: watch::Sender<Arc<Snapshot>>,
    tuning: FluctuationTuning,
    settings: Arc<SettingsStore>,
}

impl TickEngine {
    pub fn new(
        initial: Snapshot,
        rng: StdRng,
        tuning: FluctuationTuning,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let (publisher, _) = watch::channel(Arc::new(initial));
        Self {
            rng: Mutex::new(rng),
            publisher,
            tuning,
            settings,
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.publisher.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.publisher.subscribe()
    }

    pub fn tick(&self) -> Arc<Snapshot> {
        let mut rng = self.rng.lock();
        self.advance_locked(&mut rng)
    }

    /// Tick unless `token` was cancelled. Checked under the tick lock, so a
    /// cancellation that completed [`TickEngine::barrier`] can never be
    /// followed by a publish from the cancelled task.
    pub fn tick_unless_cancelled(&self, token: &CancellationToken) -> Option<Arc<Snapshot>> {
        let mut rng = self.rng.lock();
        if token.is_cancelled() {
            return None;
        }
        Some(self.advance_locked(&mut rng))
    }

    /// Wait for an in-flight tick to finish
    pub fn barrier(&self) {
        drop(self.rng.lock());
    }

    fn advance_locked(&self, rng: &mut StdRng) -> Arc<Snapshot> {
        let prev = self.snapshot();
        let next = Arc::new(advance(
            &prev,
            self.settings.fluctuation_range(),
            &self.tuning,
            rng,
        ));
        self.publisher.send_replace(next.clone());
        next
    }
}
