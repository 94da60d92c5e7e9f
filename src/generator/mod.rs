//! # Telemetry Generator
//!
//! Owns the live [`Snapshot`] and the periodic task that advances it.
//!
//! ## State machine
//!
//! - **Stopped**: no scheduled task exists. Initial state, and the state
//!   whenever the simulation is disabled.
//! - **Running**: a task fires every update interval and performs one tick.
//!
//! [`TelemetryGenerator::start`] enters Running when the settings say the
//! simulation is enabled, and from then on follows the [`SettingsStore`]:
//! disabling stops the task, enabling starts it, and a new interval replaces
//! the task without resetting the snapshot. That holds whether the change
//! goes through [`TelemetryGenerator::toggle`] and friends or straight to the
//! store. [`TelemetryGenerator::stop`] and dropping the generator stop it and
//! end the following.
//!
//! Snapshots are published through a `watch` channel as `Arc<Snapshot>`;
//! consumers either poll [`TelemetryGenerator::snapshot`] or await changes
//! on [`TelemetryGenerator::subscribe`].

mod engine;
mod schedule;
mod ticker;

use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::domain::Snapshot;
use crate::settings::SettingsStore;
use engine::TickEngine;
use schedule::{follow_settings, Schedule};

pub struct TelemetryGenerator {
    engine: Arc<TickEngine>,
    settings: Arc<SettingsStore>,
    schedule: Arc<Schedule>,
    follower: Mutex<Option<JoinHandle<()>>>,
}

impl TelemetryGenerator {
    /// Create a stopped generator starting from [`Snapshot::seed`]
    pub fn new(settings: Arc<SettingsStore>, config: &SimulationConfig) -> Self {
        Self::with_snapshot(settings, config, Snapshot::seed())
    }

    /// Create a stopped generator starting from `initial`
    pub fn with_snapshot(
        settings: Arc<SettingsStore>,
        config: &SimulationConfig,
        initial: Snapshot,
    ) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let engine = Arc::new(TickEngine::new(
            initial,
            rng,
            config.tuning.clone(),
            settings.clone(),
        ));
        Self {
            schedule: Arc::new(Schedule::new(engine.clone())),
            engine,
            settings,
            follower: Mutex::new(None),
        }
    }

    /// Follow the settings and schedule ticking if the simulation is
    /// enabled. Returns whether the generator is running afterwards. Must be
    /// called inside a tokio runtime.
    pub fn start(&self) -> bool {
        {
            let mut follower = self.follower.lock();
            if follower.is_none() {
                *follower = Some(follow_settings(self.schedule.clone(), self.settings.clone()));
            }
        }
        let running = self.schedule.attach(&self.settings);
        if !running {
            info!("simulation disabled, generator stays stopped");
        }
        running
    }

    /// Stop following the settings and cancel the scheduled task, if any. No
    /// tick is published by it once this returns.
    pub fn stop(&self) {
        if let Some(follower) = self.follower.lock().take() {
            follower.abort();
        }
        self.schedule.detach();
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_running()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.engine.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.engine.subscribe()
    }

    /// Advance once, exactly as a scheduled firing would
    pub fn tick(&self) -> Arc<Snapshot> {
        self.engine.tick()
    }

    /// On-demand refresh (pull-to-refresh). Works whether or not the
    /// generator is running.
    pub fn manual_refresh(&self) -> Arc<Snapshot> {
        let snapshot = self.tick();
        debug!(sequence = snapshot.sequence, "manual refresh");
        snapshot
    }

    pub fn is_simulation_enabled(&self) -> bool {
        self.settings.is_enabled()
    }

    /// Flip the enabled flag and start or stop accordingly. Returns the new
    /// flag.
    pub fn toggle(&self) -> bool {
        let enabled = self.settings.toggle();
        if enabled {
            self.start();
        } else {
            self.schedule.reconcile(&self.settings);
        }
        info!(enabled, "simulation toggled");
        enabled
    }

    /// Store a new interval (clamped) and reschedule if running. The current
    /// snapshot is kept. Returns the stored interval in milliseconds.
    pub fn set_update_interval(&self, ms: u64) -> u64 {
        let stored = self.settings.set_update_interval(ms);
        self.schedule.reconcile(&self.settings);
        stored
    }

    /// Store a new fluctuation range (clamped); used from the next tick on
    pub fn set_fluctuation_range(&self, percent: u32) -> u32 {
        self.settings.set_fluctuation_range(percent)
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }
}

impl Drop for TelemetryGenerator {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.get_mut().take() {
            follower.abort();
        }
        self.schedule.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SimulationConfig {
        SimulationConfig {
            random_seed: Some(42),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_starts_stopped() {
        let settings = Arc::new(SettingsStore::in_memory().await);
        let generator = TelemetryGenerator::new(settings, &seeded());
        assert!(!generator.is_running());
        assert_eq!(generator.snapshot().sequence, 0);
    }

    #[tokio::test]
    async fn test_disabled_settings_keep_generator_stopped() {
        let settings = Arc::new(SettingsStore::in_memory().await);
        settings.set_enabled(false);
        let generator = TelemetryGenerator::new(settings, &seeded());
        assert!(!generator.start());
        assert!(!generator.is_running());
    }

    #[tokio::test]
    async fn test_manual_ticks_replace_snapshot() {
        let settings = Arc::new(SettingsStore::in_memory().await);
        let generator = TelemetryGenerator::new(settings, &seeded());

        let before = generator.snapshot();
        let after = generator.manual_refresh();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&after, &generator.snapshot()));
        assert_eq!(after.sequence, 1);
        // the old snapshot is untouched
        assert_eq!(before.sequence, 0);
        assert_eq!(before.daily_usage, 28.5);
    }

    #[tokio::test]
    async fn test_subscribers_see_replacements() {
        let settings = Arc::new(SettingsStore::in_memory().await);
        let generator = TelemetryGenerator::new(settings, &seeded());
        let mut rx = generator.subscribe();

        generator.tick();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().sequence, 1);
    }

    #[tokio::test]
    async fn test_fluctuation_change_delegates_to_settings() {
        let settings = Arc::new(SettingsStore::in_memory().await);
        let generator = TelemetryGenerator::new(settings.clone(), &seeded());
        assert_eq!(generator.set_fluctuation_range(0), 1);
        assert_eq!(settings.fluctuation_range(), 1);
    }

    #[tokio::test]
    async fn test_interval_change_while_stopped_does_not_start() {
        let settings = Arc::new(SettingsStore::in_memory().await);
        let generator = TelemetryGenerator::new(settings.clone(), &seeded());
        assert_eq!(generator.set_update_interval(500), 1000);
        assert!(!generator.is_running());
        assert_eq!(settings.update_interval_ms(), 1000);
    }
}
