use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::engine::TickEngine;
use super::ticker::ScheduledTicker;
use crate::settings::{SettingsStore, SimulationSettings};

#[derive(Default)]
struct Slot {
    attached: bool,
    ticker: Option<ScheduledTicker>,
}

/// Keeps the ticker in line with the settings while attached.
///
/// Attached and enabled means exactly one ticker at the configured period.
/// Detached or disabled means none. Every transition runs under the slot
/// lock and reads the settings after taking it, so the last transition
/// always reflects the newest values.
pub(crate) struct Schedule {
    engine: Arc<TickEngine>,
    slot: Mutex<Slot>,
}

impl Schedule {
    pub fn new(engine: Arc<TickEngine>) -> Self {
        Self {
            engine,
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot.lock().ticker.is_some()
    }

    /// Attach and bring the ticker in line with `settings`. Returns whether a
    /// ticker runs afterwards.
    pub fn attach(&self, settings: &SettingsStore) -> bool {
        let mut slot = self.slot.lock();
        slot.attached = true;
        self.apply(&mut slot, &settings.settings())
    }

    /// Bring the ticker in line with `settings`. No-op while detached.
    pub fn reconcile(&self, settings: &SettingsStore) -> bool {
        let mut slot = self.slot.lock();
        if !slot.attached {
            return false;
        }
        self.apply(&mut slot, &settings.settings())
    }

    /// Detach and cancel the ticker. No tick from it is published once this
    /// returns.
    pub fn detach(&self) {
        let mut slot = self.slot.lock();
        slot.attached = false;
        if let Some(current) = slot.ticker.take() {
            current.cancel(&self.engine);
        }
    }

    fn apply(&self, slot: &mut Slot, settings: &SimulationSettings) -> bool {
        let period = settings.update_interval();
        let keep = settings.enabled && slot.ticker.as_ref().is_some_and(|t| t.period() == period);
        if !keep {
            if let Some(current) = slot.ticker.take() {
                current.cancel(&self.engine);
            }
            if settings.enabled {
                slot.ticker = Some(ScheduledTicker::spawn(self.engine.clone(), period));
            }
        }
        slot.ticker.is_some()
    }
}

/// Spawn a task that reconciles `schedule` whenever the settings change,
/// including changes made directly on the [`SettingsStore`].
pub(crate) fn follow_settings(
    schedule: Arc<Schedule>,
    settings: Arc<SettingsStore>,
) -> JoinHandle<()> {
    let mut rx = settings.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let running = schedule.reconcile(&settings);
            debug!(running, "settings change applied to ticker");
        }
    })
}
