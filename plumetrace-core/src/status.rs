//! Sensor status aggregation
//!
//! ## Overview
//!
//! [`SensorStatusMap`] owns the canonical per-sensor state. Each refresh
//! cycle delivers partial [`SensorReading`]s; `upsert` merges only the
//! present fields into the stored measurement set, then recomputes the
//! abnormal-item list, the pollution flag, and the derived status.
//!
//! Status is a pure function of the current measurements plus the two
//! threshold tables; recomputing from identical inputs is idempotent.
//! Precedence:
//!
//! 1. `Danger` if any abnormal item reached the danger cut
//! 2. else `Warning` if a pollutant exceeded its cut
//! 3. else `Warning` if any abnormal item exists
//! 4. else `Normal`
//!
//! A sensor with no measurements at all reports `Unknown`; records are
//! never removed, they only degrade.

use heapless::FnvIndexMap;
use plumetrace_geo::GeoPoint;

use crate::classify::{abnormal_items, pollution_exceeded, AbnormalItems};
use crate::errors::{EngineError, EngineResult};
use crate::ident::IdStr;
use crate::measurement::MeasurementSet;
use crate::thresholds::{AlertLevel, PollutantTable, ThresholdTable};
use crate::time::Timestamp;

/// Derived per-sensor status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SensorStatus {
    /// No current measurements
    Unknown = 0,
    /// All measurements unremarkable
    Normal = 1,
    /// Warning-level abnormality or pollutant exceeded
    Warning = 2,
    /// At least one danger-level abnormality
    Danger = 3,
}

impl SensorStatus {
    /// True for the statuses that justify a backtracking trace
    pub const fn is_abnormal(&self) -> bool {
        matches!(self, Self::Warning | Self::Danger)
    }
}

/// One batch row: partial measurements plus sensor metadata
#[derive(Debug, Clone, Copy)]
pub struct SensorReading {
    /// Sensor identifier
    pub sensor_id: IdStr,
    /// Administrative area the sensor belongs to
    pub area_id: IdStr,
    /// Sub-area, when the feed provides one
    pub sub_area_id: Option<IdStr>,
    /// Geographic position, when known
    pub position: Option<GeoPoint>,
    /// Measurement timestamp of this row
    pub measured_at: Timestamp,
    /// Partial measurement update (absent kinds are `None`)
    pub measurements: MeasurementSet,
}

/// Canonical per-sensor state, owned by the status map
#[derive(Debug, Clone)]
pub struct SensorStatusRecord {
    /// Sensor identifier
    pub sensor_id: IdStr,
    /// Derived status (see module docs for precedence)
    pub status: SensorStatus,
    /// Abnormal items in canonical kind order
    pub abnormal_items: AbnormalItems,
    /// Pollutant-table verdict, independent of the tiered items
    pub pollution_detected: bool,
    /// Current merged measurement set
    pub measurements: MeasurementSet,
    /// Administrative area
    pub area_id: IdStr,
    /// Sub-area, when known
    pub sub_area_id: Option<IdStr>,
    /// Geographic position, when known
    pub position: Option<GeoPoint>,
    /// Timestamp of the most recent merged reading
    pub last_measured_at: Option<Timestamp>,
}

impl SensorStatusRecord {
    fn empty(reading: &SensorReading) -> Self {
        Self {
            sensor_id: reading.sensor_id,
            status: SensorStatus::Unknown,
            abnormal_items: AbnormalItems::new(),
            pollution_detected: false,
            measurements: MeasurementSet::new(),
            area_id: reading.area_id,
            sub_area_id: reading.sub_area_id,
            position: reading.position,
            last_measured_at: None,
        }
    }

    fn apply(
        &mut self,
        reading: &SensorReading,
        thresholds: &ThresholdTable,
        pollutants: &PollutantTable,
    ) {
        self.measurements.merge_from(&reading.measurements);
        self.area_id = reading.area_id;
        self.sub_area_id = reading.sub_area_id;
        if reading.position.is_some() {
            self.position = reading.position;
        }
        self.last_measured_at = Some(reading.measured_at);
        self.recompute(thresholds, pollutants);
    }

    /// Recompute items, pollution flag and status from current measurements
    pub fn recompute(&mut self, thresholds: &ThresholdTable, pollutants: &PollutantTable) {
        self.abnormal_items = abnormal_items(&self.measurements, thresholds);
        self.pollution_detected = pollution_exceeded(&self.measurements, pollutants);

        self.status = if self.measurements.is_empty() {
            SensorStatus::Unknown
        } else if self
            .abnormal_items
            .iter()
            .any(|item| item.level == AlertLevel::Danger)
        {
            SensorStatus::Danger
        } else if self.pollution_detected {
            SensorStatus::Warning
        } else if !self.abnormal_items.is_empty() {
            SensorStatus::Warning
        } else {
            SensorStatus::Normal
        };
    }
}

/// Owner of all sensor status records
///
/// `N` is the map capacity and must be a power of two (index-map
/// requirement); see `constants::CITY_SENSOR_SLOTS` for the full-city value.
#[derive(Debug, Default)]
pub struct SensorStatusMap<const N: usize> {
    records: FnvIndexMap<IdStr, SensorStatusRecord, N>,
}

impl<const N: usize> SensorStatusMap<N> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            records: FnvIndexMap::new(),
        }
    }

    /// Number of tracked sensors
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no sensor has reported yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merge one reading and recompute the sensor's derived state
    ///
    /// Fields absent from the partial update keep their previous value.
    /// Fails only when a new sensor would exceed the map capacity.
    pub fn upsert(
        &mut self,
        reading: &SensorReading,
        thresholds: &ThresholdTable,
        pollutants: &PollutantTable,
    ) -> EngineResult<&SensorStatusRecord> {
        const WHAT: &str = "sensor status map";
        let key = reading.sensor_id;

        if !self.records.contains_key(&key) {
            let fresh = SensorStatusRecord::empty(reading);
            self.records
                .insert(key, fresh)
                .map_err(|_| EngineError::CapacityExceeded { what: WHAT, capacity: N })?;
        }
        let record = match self.records.get_mut(&key) {
            Some(record) => record,
            // Unreachable: the key was inserted just above
            None => return Err(EngineError::CapacityExceeded { what: WHAT, capacity: N }),
        };

        record.apply(reading, thresholds, pollutants);
        Ok(record)
    }

    /// Look up a sensor's record
    pub fn get(&self, sensor_id: &str) -> Option<&SensorStatusRecord> {
        let key = IdStr::new(sensor_id)?;
        self.records.get(&key)
    }

    /// Derived status for a sensor; `Unknown` when it has never reported
    pub fn status_of(&self, sensor_id: &str) -> SensorStatus {
        self.get(sensor_id)
            .map(|record| record.status)
            .unwrap_or(SensorStatus::Unknown)
    }

    /// Iterate all records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SensorStatusRecord> {
        self.records.values()
    }

    /// Drop all records (explicit reset lifecycle)
    pub fn reset(&mut self) {
        self.records.clear();
    }
}
