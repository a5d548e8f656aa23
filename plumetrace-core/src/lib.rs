//! Anomaly classification and wind-driven source backtracking for urban
//! sensor networks
//!
//! ## Overview
//!
//! This crate turns raw environmental sensor feeds into operator-facing
//! state: per-sensor anomaly status, area-level alert rollups, an
//! area-wide wind estimate, and a heuristic backtrace from an abnormal
//! sensor toward the likely pollution origin. It is `no_std`-first so the
//! same classification core runs on gateway hardware and in the
//! city-dashboard backend.
//!
//! ## Data path
//!
//! ```text
//! SensorReading batch
//!       |
//!       v
//! +--------------+    +---------------+    +------------+
//! | StatusMap    |--->| AreaAlerts    |    | WindEstim. |
//! | (classify)   |    | (rollup+msg)  |    | (mean)     |
//! +--------------+    +---------------+    +------------+
//!       |                                        |
//!       +---------------- select ----------------+
//!                           |
//!                           v
//!                  +----------------+
//!                  | Backtracker    |
//!                  | (origin trace) |
//!                  +----------------+
//! ```
//!
//! The [`Engine`] wires these together behind a single `&mut self` entry
//! point per refresh cycle; see its module docs for the concurrency
//! contract.
//!
//! ## Quick start
//!
//! ```
//! use plumetrace_core::{Engine, FixedClock, IdStr, MeasurementKind,
//!     MeasurementSet, SensorReading, SensorStatus};
//!
//! let mut engine: Engine<FixedClock, 64> = Engine::new(FixedClock::new(0));
//!
//! let mut measurements = MeasurementSet::new();
//! measurements.set(MeasurementKind::Temp, 41.5);
//! let reading = SensorReading {
//!     sensor_id: IdStr::new("st-014").unwrap(),
//!     area_id: IdStr::new("riverside").unwrap(),
//!     sub_area_id: None,
//!     position: None,
//!     measured_at: 0,
//!     measurements,
//! };
//!
//! engine.apply_refresh(&[reading]);
//! assert_eq!(engine.status().status_of("st-014"), SensorStatus::Danger);
//! ```
//!
//! ## Feature flags
//!
//! - `std` (default): system clock, `log` output, serde derives
//!
//! With `default-features = false` the crate is `no_std` and allocation
//! free; all collections are `heapless` with compile-time capacities.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alert;
pub mod backtrack;
pub mod classify;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod ident;
pub mod measurement;
pub mod status;
pub mod thresholds;
pub mod time;
pub mod wind;

pub use alert::{AreaAlerts, AreaAlertState, AreaSeverity, PollutionPulse};
pub use backtrack::{
    clamp_display, trace_origin, BacktrackConfig, BacktrackResult, SourceBacktracker,
};
pub use classify::{AbnormalItem, AbnormalItems};
pub use engine::{Engine, RefreshSummary, SelectOutcome};
pub use errors::{EngineError, EngineResult};
pub use ident::IdStr;
pub use measurement::{MeasurementKind, MeasurementSet, Pollutant};
pub use status::{SensorReading, SensorStatus, SensorStatusMap, SensorStatusRecord};
pub use thresholds::{AlertLevel, PollutantTable, ThresholdSpec, ThresholdTable};
pub use time::{TimeSource, Timestamp};
#[cfg(feature = "std")]
pub use time::SystemClock;
pub use time::FixedClock;
pub use wind::{CompassSector, WindEstimate, WindEstimator};

/// Crate version, from Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
