//! Live telemetry simulation engine.
//!
//! Produces a continuously evolving, internally consistent synthetic
//! household energy dataset for driving dashboards without a backend:
//! instantaneous power, daily usage, comparative benchmarks, a
//! multi-resolution time series and a per-device usage breakdown.
//!
//! - [`settings`]: persisted, clamped simulation parameters
//! - [`generator`]: the owned snapshot, periodic ticking and its state machine
//! - [`simulation`]: the fluctuation and normalization algorithms
//! - [`store`]: the key/value persistence boundary

pub mod config;
pub mod domain;
pub mod generator;
pub mod settings;
pub mod simulation;
pub mod store;
pub mod telemetry;

pub use domain::{DeviceCategory, DeviceUsage, Resolution, Snapshot, TimeSeries};
pub use generator::TelemetryGenerator;
pub use settings::{SettingsStore, SimulationSettings};
