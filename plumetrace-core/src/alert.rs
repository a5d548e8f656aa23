//! Area alert aggregation and the pollution visual pulse
//!
//! ## Area alerts
//!
//! Groups sensor records by area id and derives one severity per area:
//! `Danger` if any member sensor is in danger, else `Warning` if any member
//! warns, else `Normal`. The global message is prioritized: danger areas,
//! when present, fully determine it; warning areas are only surfaced when no
//! danger exists. Everything is recomputed on demand from the status map,
//! nothing here is persisted.
//!
//! ## Pollution pulse
//!
//! A debounced one-shot visual trigger: {Idle → Active(reset-at) → Idle}.
//! Arming while active is ignored (no overlapping timers, no re-entrant
//! scheduling); the single deferred reset fires on the next `poll` at or
//! after the deadline.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::constants::{MAX_ALERT_MESSAGE_LEN, MAX_AREAS, MAX_QUOTED_KINDS, POLLUTION_PULSE_MS};
use crate::ident::IdStr;
use crate::measurement::MeasurementKind;
use crate::status::{SensorStatus, SensorStatusMap};
use crate::thresholds::AlertLevel;
use crate::time::Timestamp;

/// Derived severity of one administrative area
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AreaSeverity {
    /// No abnormal member sensors
    Normal = 0,
    /// At least one warning-level member
    Warning = 1,
    /// At least one danger-level member
    Danger = 2,
}

/// Alert state derived for one area
#[derive(Debug, Clone, Copy)]
pub struct AreaAlertState {
    /// Area identifier
    pub area_id: IdStr,
    /// Derived severity
    pub severity: AreaSeverity,
    /// Member sensors (including unknowns)
    pub sensor_count: u16,
    /// Members currently at warning
    pub warning_count: u16,
    /// Members currently at danger
    pub danger_count: u16,
    /// Mean temperature over plausible member samples
    pub mean_temp: Option<f32>,
    /// Mean humidity over plausible member samples
    pub mean_humidity: Option<f32>,
    /// Mean noise over plausible member samples
    pub mean_noise: Option<f32>,
}

/// Global alert message type
pub type AlertMessage = String<MAX_ALERT_MESSAGE_LEN>;

/// Full area alert summary for one cycle
#[derive(Debug, Clone, Default)]
pub struct AreaAlerts {
    /// Per-area alert states, in first-seen order
    pub areas: Vec<AreaAlertState, MAX_AREAS>,
    /// Prioritized human-readable message
    pub message: AlertMessage,
}

impl AreaAlerts {
    /// Highest severity across all areas
    pub fn overall_severity(&self) -> AreaSeverity {
        self.areas
            .iter()
            .map(|area| area.severity)
            .max()
            .unwrap_or(AreaSeverity::Normal)
    }
}

#[derive(Default, Clone, Copy)]
struct MeanAccumulator {
    temp_sum: f32,
    temp_n: u32,
    humidity_sum: f32,
    humidity_n: u32,
    noise_sum: f32,
    noise_n: u32,
}

impl MeanAccumulator {
    fn observe(&mut self, set: &crate::measurement::MeasurementSet) {
        // Plausibility windows match the upstream feed's aggregation
        if let Some(t) = set.get(MeasurementKind::Temp) {
            if t > -50.0 && t < 60.0 {
                self.temp_sum += t;
                self.temp_n += 1;
            }
        }
        if let Some(h) = set.get(MeasurementKind::Humidity) {
            if (0.0..=100.0).contains(&h) {
                self.humidity_sum += h;
                self.humidity_n += 1;
            }
        }
        if let Some(n) = set.get(MeasurementKind::Noise) {
            if (0.0..150.0).contains(&n) {
                self.noise_sum += n;
                self.noise_n += 1;
            }
        }
    }

    fn mean(sum: f32, n: u32) -> Option<f32> {
        (n > 0).then(|| sum / n as f32)
    }
}

/// Derive per-area alert states and the global message from the status map
pub fn summarize<const N: usize>(map: &SensorStatusMap<N>) -> AreaAlerts {
    let mut alerts = AreaAlerts::default();
    let mut accumulators: Vec<MeanAccumulator, MAX_AREAS> = Vec::new();
    let mut danger_kinds: Vec<MeasurementKind, MAX_QUOTED_KINDS> = Vec::new();
    let mut total_sensors = 0u32;
    let mut danger_sensors = 0u32;
    let mut warning_sensors = 0u32;

    for record in map.iter() {
        total_sensors += 1;

        let slot = match alerts
            .areas
            .iter()
            .position(|area| area.area_id == record.area_id)
        {
            Some(slot) => slot,
            None => {
                let fresh = AreaAlertState {
                    area_id: record.area_id,
                    severity: AreaSeverity::Normal,
                    sensor_count: 0,
                    warning_count: 0,
                    danger_count: 0,
                    mean_temp: None,
                    mean_humidity: None,
                    mean_noise: None,
                };
                if alerts.areas.push(fresh).is_err() {
                    // Area capacity exhausted; further areas are dropped
                    // from the summary rather than failing the cycle
                    continue;
                }
                let _ = accumulators.push(MeanAccumulator::default());
                alerts.areas.len() - 1
            }
        };

        let area = &mut alerts.areas[slot];
        area.sensor_count += 1;
        accumulators[slot].observe(&record.measurements);

        match record.status {
            SensorStatus::Danger => {
                area.danger_count += 1;
                area.severity = AreaSeverity::Danger;
                danger_sensors += 1;
                for item in record
                    .abnormal_items
                    .iter()
                    .filter(|item| item.level == AlertLevel::Danger)
                {
                    if !danger_kinds.contains(&item.kind) {
                        let _ = danger_kinds.push(item.kind);
                    }
                }
            }
            SensorStatus::Warning => {
                area.warning_count += 1;
                if area.severity < AreaSeverity::Warning {
                    area.severity = AreaSeverity::Warning;
                }
                warning_sensors += 1;
            }
            SensorStatus::Normal | SensorStatus::Unknown => {}
        }
    }

    for (area, acc) in alerts.areas.iter_mut().zip(accumulators.iter()) {
        area.mean_temp = MeanAccumulator::mean(acc.temp_sum, acc.temp_n);
        area.mean_humidity = MeanAccumulator::mean(acc.humidity_sum, acc.humidity_n);
        area.mean_noise = MeanAccumulator::mean(acc.noise_sum, acc.noise_n);
    }

    compose_message(
        &mut alerts.message,
        &alerts.areas,
        &danger_kinds,
        total_sensors,
        danger_sensors,
        warning_sensors,
    );
    alerts
}

/// Write the prioritized global message; truncation on overflow is silent
fn compose_message(
    message: &mut AlertMessage,
    areas: &[AreaAlertState],
    danger_kinds: &[MeasurementKind],
    total_sensors: u32,
    danger_sensors: u32,
    warning_sensors: u32,
) {
    message.clear();

    let danger_areas = areas.iter().filter(|a| a.severity == AreaSeverity::Danger);
    let warning_areas = areas.iter().filter(|a| a.severity == AreaSeverity::Warning);

    if danger_sensors > 0 {
        let _ = message.push_str("[EMERGENCY] ");
        write_area_list(message, danger_areas);
        let _ = message.push_str(": abnormal ");
        for (i, kind) in danger_kinds.iter().enumerate() {
            if i > 0 {
                let _ = message.push_str(", ");
            }
            let _ = message.push_str(kind.name());
        }
        let _ = write!(message, " detected - {danger_sensors} sensors in danger");
    } else if warning_sensors > 0 {
        let _ = message.push_str("[CAUTION] ");
        write_area_list(message, warning_areas);
        let _ = write!(message, " - {warning_sensors} sensors reporting abnormal values");
    } else {
        let _ = write!(message, "All areas normal | active sensors: {total_sensors}");
    }
}

// Every matching area is named; only the quoted measurement kinds are
// capped. The message capacity bounds the total length.
fn write_area_list<'a>(
    message: &mut AlertMessage,
    areas: impl Iterator<Item = &'a AreaAlertState>,
) {
    for (i, area) in areas.enumerate() {
        if i > 0 {
            let _ = message.push_str(", ");
        }
        let _ = message.push_str(area.area_id.as_str());
    }
}

/// State of the debounced pollution visual trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulseState {
    Idle,
    Active { reset_at: Timestamp },
}

/// Debounced one-shot pollution visual trigger
#[derive(Debug, Clone)]
pub struct PollutionPulse {
    state: PulseState,
}

impl Default for PollutionPulse {
    fn default() -> Self {
        Self::new()
    }
}

impl PollutionPulse {
    /// Create the pulse in the idle state
    pub const fn new() -> Self {
        Self {
            state: PulseState::Idle,
        }
    }

    /// True while the visual pulse should be shown
    pub fn is_active(&self) -> bool {
        matches!(self.state, PulseState::Active { .. })
    }

    /// Arm the pulse; returns true only when newly armed
    ///
    /// A trigger while active is ignored outright: the pending reset is
    /// neither extended nor replaced.
    pub fn trigger(&mut self, now: Timestamp) -> bool {
        match self.state {
            PulseState::Active { .. } => false,
            PulseState::Idle => {
                self.state = PulseState::Active {
                    reset_at: now + POLLUTION_PULSE_MS,
                };
                true
            }
        }
    }

    /// Perform the deferred reset once its deadline has passed
    ///
    /// Returns true when the pulse cleared on this call.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.state {
            PulseState::Active { reset_at } if now >= reset_at => {
                self.state = PulseState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Force back to idle (explicit reset lifecycle)
    pub fn reset(&mut self) {
        self.state = PulseState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementSet;
    use crate::status::SensorReading;
    use crate::thresholds::{PollutantTable, ThresholdTable};
    use plumetrace_geo::GeoPoint;

    fn reading(id: &str, area: &str, fill: impl FnOnce(&mut MeasurementSet)) -> SensorReading {
        let mut measurements = MeasurementSet::new();
        fill(&mut measurements);
        SensorReading {
            sensor_id: IdStr::new(id).unwrap(),
            area_id: IdStr::new(area).unwrap(),
            sub_area_id: None,
            position: Some(GeoPoint::new(37.5, 127.0)),
            measured_at: 0,
            measurements,
        }
    }

    fn populated_map() -> SensorStatusMap<16> {
        let thresholds = ThresholdTable::default();
        let pollutants = PollutantTable::default();
        let mut map = SensorStatusMap::new();

        let rows = [
            reading("d1", "gangnam", |m| m.set(MeasurementKind::Temp, 41.0)),
            reading("n1", "gangnam", |m| m.set(MeasurementKind::Temp, 20.0)),
            reading("n2", "gangnam", |m| m.set(MeasurementKind::Temp, 22.0)),
            reading("w1", "mapo", |m| m.set(MeasurementKind::Noise, 75.0)),
            reading("n3", "jongno", |m| m.set(MeasurementKind::Temp, 18.0)),
        ];
        for row in &rows {
            map.upsert(row, &thresholds, &pollutants).unwrap();
        }
        map
    }

    #[test]
    fn one_danger_sensor_outweighs_any_number_of_normals() {
        let alerts = summarize(&populated_map());
        let gangnam = alerts
            .areas
            .iter()
            .find(|a| a.area_id == "gangnam")
            .unwrap();
        assert_eq!(gangnam.severity, AreaSeverity::Danger);
        assert_eq!(gangnam.sensor_count, 3);
        assert_eq!(gangnam.danger_count, 1);
    }

    #[test]
    fn danger_areas_fully_determine_the_message() {
        let alerts = summarize(&populated_map());
        assert!(alerts.message.starts_with("[EMERGENCY] gangnam"));
        assert!(alerts.message.contains("temp"));
        // The warning-only area is not surfaced while danger exists
        assert!(!alerts.message.contains("mapo"));
        assert_eq!(alerts.overall_severity(), AreaSeverity::Danger);
    }

    #[test]
    fn every_danger_area_is_named_in_the_message() {
        let thresholds = ThresholdTable::default();
        let pollutants = PollutantTable::default();
        let mut map: SensorStatusMap<16> = SensorStatusMap::new();

        for (id, area) in [
            ("d1", "gangnam"),
            ("d2", "mapo"),
            ("d3", "jongno"),
            ("d4", "yongsan"),
        ] {
            map.upsert(
                &reading(id, area, |m| m.set(MeasurementKind::Temp, 41.0)),
                &thresholds,
                &pollutants,
            )
            .unwrap();
        }

        let alerts = summarize(&map);
        for area in ["gangnam", "mapo", "jongno", "yongsan"] {
            assert!(alerts.message.contains(area), "missing {area}");
        }
    }

    #[test]
    fn warning_message_when_no_danger() {
        let thresholds = ThresholdTable::default();
        let pollutants = PollutantTable::default();
        let mut map: SensorStatusMap<16> = SensorStatusMap::new();
        map.upsert(
            &reading("w1", "mapo", |m| m.set(MeasurementKind::Noise, 75.0)),
            &thresholds,
            &pollutants,
        )
        .unwrap();

        let alerts = summarize(&map);
        assert!(alerts.message.starts_with("[CAUTION] mapo"));
        assert_eq!(alerts.overall_severity(), AreaSeverity::Warning);
    }

    #[test]
    fn all_normal_message() {
        let thresholds = ThresholdTable::default();
        let pollutants = PollutantTable::default();
        let mut map: SensorStatusMap<16> = SensorStatusMap::new();
        map.upsert(
            &reading("n1", "jongno", |m| m.set(MeasurementKind::Temp, 18.0)),
            &thresholds,
            &pollutants,
        )
        .unwrap();

        let alerts = summarize(&map);
        assert!(alerts.message.starts_with("All areas normal"));
        assert!(alerts.message.contains('1'));
    }

    #[test]
    fn area_means_cover_plausible_samples_only() {
        let thresholds = ThresholdTable::default();
        let pollutants = PollutantTable::default();
        let mut map: SensorStatusMap<16> = SensorStatusMap::new();
        map.upsert(
            &reading("a", "jongno", |m| m.set(MeasurementKind::Temp, 10.0)),
            &thresholds,
            &pollutants,
        )
        .unwrap();
        map.upsert(
            &reading("b", "jongno", |m| m.set(MeasurementKind::Temp, 20.0)),
            &thresholds,
            &pollutants,
        )
        .unwrap();
        // Implausible reading excluded from the mean (but still classified)
        map.upsert(
            &reading("c", "jongno", |m| m.set(MeasurementKind::Temp, 200.0)),
            &thresholds,
            &pollutants,
        )
        .unwrap();

        let alerts = summarize(&map);
        let jongno = alerts.areas.iter().find(|a| a.area_id == "jongno").unwrap();
        assert_eq!(jongno.mean_temp, Some(15.0));
        assert_eq!(jongno.mean_noise, None);
    }

    #[test]
    fn pulse_arms_once_and_ignores_reentry() {
        let mut pulse = PollutionPulse::new();
        assert!(!pulse.is_active());

        assert!(pulse.trigger(1_000));
        assert!(pulse.is_active());

        // Rapid repeated triggers while active are no-ops
        assert!(!pulse.trigger(1_001));
        assert!(!pulse.trigger(2_500));
        assert!(pulse.is_active());
    }

    #[test]
    fn pulse_resets_after_interval_then_rearms() {
        let mut pulse = PollutionPulse::new();
        pulse.trigger(1_000);

        assert!(!pulse.poll(3_999));
        assert!(pulse.is_active());

        assert!(pulse.poll(4_000));
        assert!(!pulse.is_active());

        // After the deferred reset it can arm again
        assert!(pulse.trigger(5_000));
    }
}
