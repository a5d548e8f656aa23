//! Refresh-cycle orchestration
//!
//! The [`Engine`] owns every piece of process-scoped state (the status
//! map, the wind estimate, the pollution pulse and the active backtrack
//! selection) and runs the whole data path single-threaded and
//! run-to-completion:
//!
//! 1. `apply_refresh` takes a whole batch of readings and applies it as one
//!    atomic unit behind `&mut self` (the single in-flight refresh
//!    guarantee: no concurrent refresh can interleave partial writes), then
//!    re-estimates the wind and arms the pollution pulse if any sensor
//!    exceeds a pollutant cut.
//! 2. `area_alerts` derives the per-area summary on demand.
//! 3. `select_sensor` runs the backtracker for a user selection, with
//!    toggle/replace semantics on the active trace.
//!
//! Nothing here suspends; a selection is bounded by `max_steps`
//! point-in-polygon tests and runs synchronously to completion.

use plumetrace_geo::AreaIndex;

use crate::alert::{summarize, AreaAlerts, PollutionPulse};
use crate::backtrack::{BacktrackConfig, BacktrackResult, SourceBacktracker};
use crate::status::{SensorReading, SensorStatusMap};
use crate::thresholds::{PollutantTable, ThresholdTable};
use crate::time::{TimeSource, Timestamp};
use crate::wind::{WindEstimate, WindEstimator};

/// Outcome of one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Readings merged into the status map
    pub updated: u32,
    /// Readings dropped (map capacity exhausted)
    pub dropped: u32,
    /// True when any sensor currently exceeds a pollutant cut
    pub pollution_detected: bool,
    /// Timestamp the cycle completed at
    pub completed_at: Timestamp,
}

/// Outcome of a sensor selection
#[derive(Debug, Clone)]
pub enum SelectOutcome<'a> {
    /// A fresh trace was produced for the selected sensor
    Traced(BacktrackResult<'a>),
    /// The selection toggled the already-active sensor off
    Cleared,
    /// The selection was ignored (normal/unknown sensor, no position, or
    /// no wind estimate yet); any active trace is left as-is
    Ignored,
}

/// Top-level engine owning all process-scoped state
///
/// `N` is the sensor map capacity (power of two); `C` injects the clock
/// that drives `last_measured_at` and the pollution pulse.
#[derive(Debug)]
pub struct Engine<C: TimeSource, const N: usize> {
    thresholds: ThresholdTable,
    pollutants: PollutantTable,
    status: SensorStatusMap<N>,
    wind: WindEstimator,
    pulse: PollutionPulse,
    backtracker: SourceBacktracker,
    clock: C,
}

impl<C: TimeSource, const N: usize> Engine<C, N> {
    /// Create an engine with the default production tables
    pub fn new(clock: C) -> Self {
        Self::with_tables(clock, ThresholdTable::default(), PollutantTable::default())
    }

    /// Create an engine with custom threshold tables
    pub fn with_tables(clock: C, thresholds: ThresholdTable, pollutants: PollutantTable) -> Self {
        Self {
            thresholds,
            pollutants,
            status: SensorStatusMap::new(),
            wind: WindEstimator::new(),
            pulse: PollutionPulse::new(),
            backtracker: SourceBacktracker::new(BacktrackConfig::default()),
            clock,
        }
    }

    /// Replace the backtracking parameters
    pub fn set_backtrack_config(&mut self, config: BacktrackConfig) {
        self.backtracker = SourceBacktracker::new(config);
    }

    /// The canonical status map
    pub fn status(&self) -> &SensorStatusMap<N> {
        &self.status
    }

    /// Current area-wide wind estimate
    pub fn wind(&self) -> WindEstimate {
        self.wind.estimate()
    }

    /// True while the pollution visual pulse is armed
    pub fn pollution_pulse_active(&self) -> bool {
        self.pulse.is_active()
    }

    /// Sensor currently holding the active backtrack trace
    pub fn active_trace(&self) -> Option<&str> {
        self.backtracker.active_sensor()
    }

    /// Mutable clock access (tests drive time through this)
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Apply one refresh batch as a single atomic unit
    ///
    /// Merges every reading, re-estimates the wind from the full updated
    /// map, and arms the pollution pulse when any sensor exceeds a
    /// pollutant cut. Per-reading capacity failures are counted, not
    /// propagated; a refresh cycle never aborts halfway.
    pub fn apply_refresh(&mut self, batch: &[SensorReading]) -> RefreshSummary {
        let now = self.clock.now();
        self.pulse.poll(now);

        let mut updated = 0u32;
        let mut dropped = 0u32;
        for reading in batch {
            match self.status.upsert(reading, &self.thresholds, &self.pollutants) {
                Ok(_) => updated += 1,
                Err(_) => dropped += 1,
            }
        }

        self.wind.update(self.status.iter().map(|r| &r.measurements));

        let pollution_detected = self.status.iter().any(|r| r.pollution_detected);
        if pollution_detected && self.pulse.trigger(now) {
            #[cfg(feature = "std")]
            log::warn!("pollutant cut exceeded, visual pulse armed");
        }

        #[cfg(feature = "std")]
        log::debug!(
            "refresh applied: {updated} updated, {dropped} dropped, {} sensors tracked",
            self.status.len()
        );

        RefreshSummary {
            updated,
            dropped,
            pollution_detected,
            completed_at: now,
        }
    }

    /// Derive the per-area alert summary on demand
    pub fn area_alerts(&self) -> AreaAlerts {
        summarize(&self.status)
    }

    /// Handle a user selecting a sensor for backtracking
    ///
    /// Normal and unknown sensors are ignored (the existing trace, if any,
    /// stays visible), as are selections made before a wind estimate or a
    /// sensor position exists. Otherwise the backtracker's toggle/replace
    /// semantics apply.
    pub fn select_sensor<'a>(
        &mut self,
        sensor_id: &str,
        index: &AreaIndex<'a>,
    ) -> SelectOutcome<'a> {
        let Some(record) = self.status.get(sensor_id) else {
            return SelectOutcome::Ignored;
        };
        if !record.status.is_abnormal() {
            return SelectOutcome::Ignored;
        }
        let Some(position) = record.position else {
            return SelectOutcome::Ignored;
        };
        let Some(direction) = self.wind.estimate().direction_deg else {
            #[cfg(feature = "std")]
            log::debug!("selection ignored: no wind estimate yet");
            return SelectOutcome::Ignored;
        };

        let sensor_id = record.sensor_id;
        match self.backtracker.select(sensor_id, position, direction, index) {
            Some(result) => SelectOutcome::Traced(result),
            None => SelectOutcome::Cleared,
        }
    }

    /// Clear the active backtrack trace (navigation away, replay reset)
    pub fn clear_trace(&mut self) {
        self.backtracker.clear();
    }

    /// Forget all process-scoped state (explicit reset lifecycle)
    pub fn reset(&mut self) {
        self.status.reset();
        self.wind.reset();
        self.pulse.reset();
        self.backtracker.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::IdStr;
    use crate::measurement::{MeasurementKind, MeasurementSet};
    use crate::time::FixedClock;
    use plumetrace_geo::GeoPoint;

    fn reading(id: &str, fill: impl FnOnce(&mut MeasurementSet)) -> SensorReading {
        let mut measurements = MeasurementSet::new();
        fill(&mut measurements);
        SensorReading {
            sensor_id: IdStr::new(id).unwrap(),
            area_id: IdStr::new("central").unwrap(),
            sub_area_id: None,
            position: Some(GeoPoint::new(0.0, 0.0)),
            measured_at: 0,
            measurements,
        }
    }

    #[test]
    fn refresh_counts_and_pollution_flag() {
        let mut engine: Engine<FixedClock, 16> = Engine::new(FixedClock::new(1_000));

        let batch = [
            reading("s1", |m| m.set(MeasurementKind::Temp, 20.0)),
            reading("s2", |m| m.set(MeasurementKind::O3, 0.12)),
        ];
        let summary = engine.apply_refresh(&batch);

        assert_eq!(summary.updated, 2);
        assert_eq!(summary.dropped, 0);
        assert!(summary.pollution_detected);
        assert_eq!(summary.completed_at, 1_000);
        assert!(engine.pollution_pulse_active());
    }

    #[test]
    fn pulse_clears_on_a_later_refresh() {
        let mut engine: Engine<FixedClock, 16> = Engine::new(FixedClock::new(1_000));
        engine.apply_refresh(&[reading("s1", |m| m.set(MeasurementKind::O3, 0.2))]);
        assert!(engine.pollution_pulse_active());

        // Next cycle arrives after the pulse interval; the deferred reset
        // runs first, then the still-polluted sensor re-arms it
        engine.clock_mut().set(5_000);
        engine.apply_refresh(&[]);
        assert!(engine.pollution_pulse_active());

        // With pollution gone the pulse stays clear after expiry
        engine.clock_mut().set(10_000);
        engine.apply_refresh(&[reading("s1", |m| m.set(MeasurementKind::O3, 0.01))]);
        assert!(!engine.pollution_pulse_active());
    }

    #[test]
    fn wind_estimate_survives_sample_gaps() {
        let mut engine: Engine<FixedClock, 16> = Engine::new(FixedClock::new(0));
        engine.apply_refresh(&[reading("s1", |m| {
            m.set(MeasurementKind::WindDir, 90.0);
            m.set(MeasurementKind::WindSpeed, 3.0);
        })]);
        assert_eq!(engine.wind().direction_deg, Some(90.0));

        // s1's next row drops the wind fields; the merged set still holds
        // the old samples, and the estimate stays put either way
        engine.apply_refresh(&[reading("s1", |m| m.set(MeasurementKind::Temp, 21.0))]);
        assert_eq!(engine.wind().direction_deg, Some(90.0));
        assert_eq!(engine.wind().speed_ms, Some(3.0));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut engine: Engine<FixedClock, 16> = Engine::new(FixedClock::new(0));
        engine.apply_refresh(&[reading("s1", |m| m.set(MeasurementKind::O3, 0.2))]);

        engine.reset();
        assert!(engine.status().is_empty());
        assert_eq!(engine.wind().direction_deg, None);
        assert!(!engine.pollution_pulse_active());
        assert_eq!(engine.active_trace(), None);
    }
}
