//! # Telemetry Simulation
//!
//! Pure, synchronous building blocks of the live telemetry simulation.
//!
//! ## Components
//!
//! - **Fluctuation**: bounded uniform noise around a previous value, rounded for display
//! - **Normalize**: whole-percent device shares corrected to sum to exactly 100
//! - **Tuning**: variance multipliers per field and per series resolution
//! - **Step**: [`advance`] turns one [`Snapshot`](crate::domain::Snapshot) into the next
//!
//! Scheduling lives in [`crate::generator`]; nothing here touches a clock or
//! a runtime.
//!
//! ## Usage
//!
//! ```rust
//! use live_telemetry_sim::domain::Snapshot;
//! use live_telemetry_sim::simulation::{advance, FluctuationTuning};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let next = advance(&Snapshot::seed(), 5, &FluctuationTuning::default(), &mut rng);
//! assert_eq!(next.percentage_total(), 100);
//! ```

pub mod fluctuation;
pub mod normalize;
pub mod step;
pub mod tuning;

pub use fluctuation::{fluctuate, percent_change, round_to};
pub use normalize::{normalize_percentages, raw_percentage, PERCENT_TOTAL};
pub use step::advance;
pub use tuning::{FluctuationTuning, ResolutionDamping};
