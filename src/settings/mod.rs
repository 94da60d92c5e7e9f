//! # Simulation Settings
//!
//! Holds the three user-tunable simulation parameters and keeps them in sync
//! with a [`KeyValueStore`]:
//!
//! - `enabled` — whether the generator ticks on its own
//! - update interval — clamped to 1–10 s
//! - fluctuation range — clamped to 1–20 %
//!
//! Values are read once by [`SettingsStore::load`]. Each setter updates the
//! in-memory copy immediately and queues a write-through; the in-memory copy
//! stays authoritative for the session even if the write later fails.
//!
//! The current values are published on a `watch` channel. Anything that has
//! to follow them, such as the generator's ticker, subscribes with
//! [`SettingsStore::subscribe`] instead of polling.

mod model;
mod writer;

use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use model::{
    SettingKey, SimulationSettings, DEFAULT_FLUCTUATION_PERCENT, DEFAULT_UPDATE_INTERVAL_MS,
    MAX_FLUCTUATION_PERCENT, MAX_UPDATE_INTERVAL_MS, MIN_FLUCTUATION_PERCENT,
    MIN_UPDATE_INTERVAL_MS,
};
use writer::{run_writer, PersistCmd};

use crate::store::{KeyValueStore, MemoryStore};

/// Dropping the store closes the write queue; the worker drains what is
/// already queued and exits.
pub struct SettingsStore {
    state: watch::Sender<SimulationSettings>,
    tx: mpsc::UnboundedSender<PersistCmd>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl SettingsStore {
    /// Read persisted settings and start the write-through worker.
    ///
    /// Each key falls back to its default on its own when missing or
    /// unreadable. Must be called from within a tokio runtime.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let defaults = SimulationSettings::default();

        let enabled = read_key(store.as_ref(), SettingKey::Enabled, defaults.enabled).await;
        let interval: u64 =
            read_key(store.as_ref(), SettingKey::Interval, defaults.update_interval_ms).await;
        let fluctuation: u32 =
            read_key(store.as_ref(), SettingKey::Fluctuation, defaults.fluctuation_percent).await;

        let settings = SimulationSettings {
            enabled,
            update_interval_ms: SimulationSettings::clamp_update_interval(interval),
            fluctuation_percent: SimulationSettings::clamp_fluctuation(fluctuation),
        };

        info!(
            enabled = settings.enabled,
            update_interval_ms = settings.update_interval_ms,
            fluctuation_percent = settings.fluctuation_percent,
            "simulation settings loaded"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(store, rx));

        Self {
            state: watch::Sender::new(settings),
            tx,
            writer: Mutex::new(Some(writer)),
        }
    }

    /// Settings backed by a fresh [`MemoryStore`]
    pub async fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStore::new())).await
    }

    pub fn settings(&self) -> SimulationSettings {
        *self.state.borrow()
    }

    /// Receiver that is notified whenever a setter changes a value
    pub fn subscribe(&self) -> watch::Receiver<SimulationSettings> {
        self.state.subscribe()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn update_interval(&self) -> Duration {
        self.state.borrow().update_interval()
    }

    pub fn update_interval_ms(&self) -> u64 {
        self.state.borrow().update_interval_ms
    }

    pub fn fluctuation_range(&self) -> u32 {
        self.state.borrow().fluctuation_percent
    }

    pub fn set_enabled(&self, value: bool) -> bool {
        self.update(SettingKey::Enabled, |state| state.enabled = value)
            .enabled
    }

    /// Flip `enabled` and return the new value
    pub fn toggle(&self) -> bool {
        self.update(SettingKey::Enabled, |state| state.enabled = !state.enabled)
            .enabled
    }

    /// Store the interval clamped to 1000–10000 ms and return what was stored
    pub fn set_update_interval(&self, ms: u64) -> u64 {
        let clamped = SimulationSettings::clamp_update_interval(ms);
        if clamped != ms {
            debug!(requested_ms = ms, stored_ms = clamped, "update interval clamped");
        }
        self.update(SettingKey::Interval, |state| state.update_interval_ms = clamped)
            .update_interval_ms
    }

    /// Store the fluctuation range clamped to 1–20 % and return what was stored
    pub fn set_fluctuation_range(&self, percent: u32) -> u32 {
        let clamped = SimulationSettings::clamp_fluctuation(percent);
        if clamped != percent {
            debug!(requested = percent, stored = clamped, "fluctuation range clamped");
        }
        self.update(SettingKey::Fluctuation, |state| state.fluctuation_percent = clamped)
            .fluctuation_percent
    }

    /// Wait until every write queued so far has been attempted
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(PersistCmd::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Flush pending writes and stop the worker. Later setters still update
    /// the in-memory values but are no longer persisted.
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(PersistCmd::Shutdown(ack)).is_ok() {
            let _ = done.await;
        }
        let handle = self.writer.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Apply `change` and queue the write while the channel's write lock is
    /// held, so queued writes follow the same order as in-memory updates.
    /// Subscribers are only notified when a value actually changed.
    fn update(
        &self,
        key: SettingKey,
        change: impl FnOnce(&mut SimulationSettings),
    ) -> SimulationSettings {
        let mut updated = SimulationSettings::default();
        self.state.send_if_modified(|state| {
            let before = *state;
            change(state);
            self.persist(key, state.encode(key));
            updated = *state;
            *state != before
        });
        updated
    }

    fn persist(&self, key: SettingKey, value: String) {
        if self.tx.send(PersistCmd::Write { key, value }).is_err() {
            warn!(key = %key, "settings writer stopped, change kept in memory only");
        }
    }
}

async fn read_key<T>(store: &dyn KeyValueStore, key: SettingKey, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match store.get(key.as_ref()).await {
        Ok(Some(raw)) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, raw = %raw, default = ?default, "unparseable setting, using default");
                default
            }
        },
        Ok(None) => {
            debug!(key = %key, default = ?default, "setting not persisted, using default");
            default
        }
        Err(e) => {
            warn!(key = %key, error = %e, default = ?default, "failed to read setting, using default");
            default
        }
    }
}
