//! Threshold tables
//!
//! Two independent tables drive classification:
//!
//! - [`ThresholdTable`]: per measurement kind, an optional warning/danger
//!   pair. Cuts are inclusive (`value >= cut` triggers the level). Wind
//!   direction carries no thresholds; a bearing is never "too high".
//! - [`PollutantTable`]: per pollutant species, one boolean cut point,
//!   strictly exclusive (`value > cut` exceeds). The same species may carry
//!   a different cut here than in the generic table (generic O3 danger is
//!   0.15 ppm while the pollutant cut is 0.1 ppm); both verdicts are kept.
//!
//! Defaults are the production values for the urban network deployment.

use crate::measurement::{
    MeasurementKind, Pollutant, MEASUREMENT_KIND_COUNT, POLLUTANT_COUNT,
};

/// Severity level of a single abnormal measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AlertLevel {
    /// Warning cut reached
    Warning = 0,
    /// Danger cut reached
    Danger = 1,
}

/// Inclusive warning/danger cut points for one measurement kind
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdSpec {
    /// Warning cut, inclusive
    pub warning: f32,
    /// Danger cut, inclusive
    pub danger: f32,
}

impl ThresholdSpec {
    /// Create a spec from warning and danger cuts
    pub const fn new(warning: f32, danger: f32) -> Self {
        Self { warning, danger }
    }

    /// Classify a value against the cuts
    ///
    /// Danger wins at `value >= danger`, warning at `value >= warning`,
    /// otherwise the value is unremarkable.
    pub fn classify(&self, value: f32) -> Option<AlertLevel> {
        if value >= self.danger {
            Some(AlertLevel::Danger)
        } else if value >= self.warning {
            Some(AlertLevel::Warning)
        } else {
            None
        }
    }
}

/// Per-kind threshold configuration (15 entries, `None` = no thresholds)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdTable {
    specs: [Option<ThresholdSpec>; MEASUREMENT_KIND_COUNT],
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let mut table = Self {
            specs: [None; MEASUREMENT_KIND_COUNT],
        };
        // Production cut points for the urban sensor network
        table.set(MeasurementKind::Temp, Some(ThresholdSpec::new(35.0, 40.0)));
        table.set(MeasurementKind::Humidity, Some(ThresholdSpec::new(85.0, 95.0)));
        table.set(MeasurementKind::Light, Some(ThresholdSpec::new(10_000.0, 50_000.0)));
        table.set(MeasurementKind::Noise, Some(ThresholdSpec::new(70.0, 90.0)));
        table.set(MeasurementKind::Vibration, Some(ThresholdSpec::new(5.0, 10.0)));
        table.set(MeasurementKind::Uv, Some(ThresholdSpec::new(6.0, 11.0)));
        // Wind direction is a bearing; intentionally unclassified
        table.set(MeasurementKind::WindDir, None);
        table.set(MeasurementKind::WindSpeed, Some(ThresholdSpec::new(10.0, 20.0)));
        table.set(MeasurementKind::O3, Some(ThresholdSpec::new(0.09, 0.15)));
        table.set(MeasurementKind::Nh3, Some(ThresholdSpec::new(1.0, 5.0)));
        table.set(MeasurementKind::H2s, Some(ThresholdSpec::new(0.02, 0.1)));
        table.set(MeasurementKind::Co, Some(ThresholdSpec::new(9.0, 25.0)));
        table.set(MeasurementKind::No2, Some(ThresholdSpec::new(0.06, 0.2)));
        table.set(MeasurementKind::So2, Some(ThresholdSpec::new(0.05, 0.15)));
        table.set(MeasurementKind::BlackGlobe, Some(ThresholdSpec::new(40.0, 50.0)));
        table
    }
}

impl ThresholdTable {
    /// Table with no thresholds at all (nothing classifies as abnormal)
    pub const fn empty() -> Self {
        Self {
            specs: [None; MEASUREMENT_KIND_COUNT],
        }
    }

    /// Look up the spec for a kind
    pub fn get(&self, kind: MeasurementKind) -> Option<&ThresholdSpec> {
        self.specs[kind as usize].as_ref()
    }

    /// Replace the spec for a kind (`None` disables classification for it)
    pub fn set(&mut self, kind: MeasurementKind, spec: Option<ThresholdSpec>) {
        self.specs[kind as usize] = spec;
    }
}

/// Per-pollutant cut table (8 entries, strict `>` comparison)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PollutantTable {
    cuts: [f32; POLLUTANT_COUNT],
}

impl Default for PollutantTable {
    fn default() -> Self {
        let mut table = Self {
            cuts: [f32::MAX; POLLUTANT_COUNT],
        };
        // "Bad" air-quality grades (PM, O3, CO, NO2, SO2) and odor
        // complaint levels (NH3, H2S)
        table.set(Pollutant::Pm25, 35.0);
        table.set(Pollutant::Pm10, 80.0);
        table.set(Pollutant::O3, 0.1);
        table.set(Pollutant::Nh3, 25.0);
        table.set(Pollutant::H2s, 0.02);
        table.set(Pollutant::Co, 9.0);
        table.set(Pollutant::No2, 0.06);
        table.set(Pollutant::So2, 0.05);
        table
    }
}

impl PollutantTable {
    /// Look up the cut for a pollutant
    pub fn get(&self, pollutant: Pollutant) -> f32 {
        self.cuts[pollutant.slot()]
    }

    /// Replace the cut for a pollutant
    pub fn set(&mut self, pollutant: Pollutant, cut: f32) {
        self.cuts[pollutant.slot()] = cut;
    }
}
