//! Area-wide wind estimation
//!
//! Reduces every sensor's current wind sample into one scalar estimate for
//! the whole monitored area: arithmetic mean direction and mean speed over
//! all present samples. Fields with zero valid samples in a cycle keep
//! their prior value (stale-but-present), so the estimate only ever
//! improves in coverage, never regresses to `None`.
//!
//! The direction mean is a *linear* average of an angular quantity. Near
//! the 0°/360° wrap it misbehaves (350° and 10° average to 180°). This is
//! the documented behavior of the system being modeled and downstream
//! backtracking depends on it; do not replace it with a circular mean
//! without a coordinated change.

use libm::roundf;

use crate::measurement::{MeasurementKind, MeasurementSet};

/// Area-wide wind estimate
///
/// Direction: 0° = N, 90° = E, 180° = S, 270° = W. Both fields stay `None`
/// until at least one valid sample has ever been seen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindEstimate {
    /// Mean wind direction in degrees
    pub direction_deg: Option<f32>,
    /// Mean wind speed in m/s
    pub speed_ms: Option<f32>,
}

/// Eight-sector compass name for the wind indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompassSector {
    /// North
    N = 0,
    /// Northeast
    Ne = 1,
    /// East
    E = 2,
    /// Southeast
    Se = 3,
    /// South
    S = 4,
    /// Southwest
    Sw = 5,
    /// West
    W = 6,
    /// Northwest
    Nw = 7,
}

impl CompassSector {
    /// Nearest sector for a bearing in degrees
    pub fn from_degrees(degrees: f32) -> Self {
        const SECTORS: [CompassSector; 8] = [
            CompassSector::N,
            CompassSector::Ne,
            CompassSector::E,
            CompassSector::Se,
            CompassSector::S,
            CompassSector::Sw,
            CompassSector::W,
            CompassSector::Nw,
        ];
        let index = (roundf(degrees / 45.0) as i32).rem_euclid(8);
        SECTORS[index as usize]
    }

    /// Short display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::Ne => "NE",
            Self::E => "E",
            Self::Se => "SE",
            Self::S => "S",
            Self::Sw => "SW",
            Self::W => "W",
            Self::Nw => "NW",
        }
    }
}

/// Reduces per-sensor wind samples into the process-wide estimate
#[derive(Debug, Clone, Default)]
pub struct WindEstimator {
    estimate: WindEstimate,
}

impl WindEstimator {
    /// Create an estimator with no estimate yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Current estimate (overwritten wholesale by `update`)
    pub fn estimate(&self) -> WindEstimate {
        self.estimate
    }

    /// Re-estimate from the full current sample set
    ///
    /// A field with zero valid samples retains its prior value.
    pub fn update<'a, I>(&mut self, sets: I)
    where
        I: IntoIterator<Item = &'a MeasurementSet>,
    {
        let mut dir_sum = 0.0f32;
        let mut dir_count = 0u32;
        let mut speed_sum = 0.0f32;
        let mut speed_count = 0u32;

        for set in sets {
            if let Some(dir) = set.get(MeasurementKind::WindDir) {
                dir_sum += dir;
                dir_count += 1;
            }
            if let Some(speed) = set.get(MeasurementKind::WindSpeed) {
                speed_sum += speed;
                speed_count += 1;
            }
        }

        if dir_count > 0 {
            self.estimate.direction_deg = Some(dir_sum / dir_count as f32);
        }
        if speed_count > 0 {
            self.estimate.speed_ms = Some(speed_sum / speed_count as f32);
        }
    }

    /// Forget the estimate (explicit reset lifecycle)
    pub fn reset(&mut self) {
        self.estimate = WindEstimate::default();
    }
}
