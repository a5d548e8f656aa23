//! Engine constants
//!
//! Centralized numeric limits and defaults. Capacities are compile-time
//! bounds for heapless storage; tune them per deployment rather than
//! scattering magic numbers through the code.

// --- Capacities -----------------------------------------------------------

/// Sensor status map capacity for a full city deployment
///
/// Must be a power of two (index-map requirement). The Seoul S-DoT network
/// reports ~1100 stations per cycle.
pub const CITY_SENSOR_SLOTS: usize = 2048;

/// Maximum number of administrative areas tracked per alert summary
pub const MAX_AREAS: usize = 32;

/// Maximum points recorded along a backtracking path (start + steps)
pub const MAX_TRACE_POINTS: usize = 64;

/// Maximum length of the global alert message in bytes
pub const MAX_ALERT_MESSAGE_LEN: usize = 192;

// --- Backtracking defaults ------------------------------------------------

/// Default per-step travel distance in degrees (~800 m of latitude)
pub const BACKTRACK_STEP_DEG: f32 = 0.008;

/// Default maximum number of backtracking steps
pub const BACKTRACK_MAX_STEPS: u16 = 50;

/// Default maximum on-screen distance between sensor and origin markers,
/// in pixels at zoom scale 1.0
pub const MAX_DISPLAY_DISTANCE_PX: f32 = 120.0;

// --- Alerting -------------------------------------------------------------

/// How long the pollution visual pulse stays active before its single
/// deferred reset, in milliseconds
pub const POLLUTION_PULSE_MS: u64 = 3_000;

/// Maximum distinct measurement names quoted in a danger alert message
pub const MAX_QUOTED_KINDS: usize = 3;
