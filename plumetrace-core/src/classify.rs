//! Threshold classification and pollution evaluation
//!
//! Two pure functions over a [`MeasurementSet`]:
//!
//! - [`abnormal_items`] applies the tiered [`ThresholdTable`] and emits one
//!   [`AbnormalItem`] per kind that reached a cut, in canonical kind order
//!   so display and tests are deterministic.
//! - [`pollution_exceeded`] applies the boolean [`PollutantTable`]. Note the
//!   asymmetric missing-value policies: a missing value is *skipped* by the
//!   tiered classifier, while an absent pollutant reads as 0 and therefore
//!   counts as not exceeded. Both policies are load-bearing.

use heapless::Vec;

use crate::measurement::{
    MeasurementKind, MeasurementSet, Pollutant, MEASUREMENT_KIND_COUNT,
};
use crate::thresholds::{AlertLevel, PollutantTable, ThresholdTable};

/// Upper bound on abnormal items per sensor (one per kind)
pub const MAX_ABNORMAL_ITEMS: usize = MEASUREMENT_KIND_COUNT;

/// One measurement that reached a warning or danger cut
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbnormalItem {
    /// Which measurement kind
    pub kind: MeasurementKind,
    /// The offending value
    pub value: f32,
    /// Which cut was reached
    pub level: AlertLevel,
}

/// List type holding a sensor's abnormal items in canonical order
pub type AbnormalItems = Vec<AbnormalItem, MAX_ABNORMAL_ITEMS>;

/// Classify a measurement set against the tiered threshold table
///
/// Kinds with no spec (wind direction) and kinds with a missing value are
/// skipped silently: never abnormal, never an error.
pub fn abnormal_items(set: &MeasurementSet, table: &ThresholdTable) -> AbnormalItems {
    let mut items = AbnormalItems::new();
    for kind in MeasurementKind::ALL {
        let Some(spec) = table.get(kind) else {
            continue;
        };
        let Some(value) = set.get(kind) else {
            continue;
        };
        if let Some(level) = spec.classify(value) {
            // Capacity equals the kind count, so this push cannot fail
            let _ = items.push(AbnormalItem { kind, value, level });
        }
    }
    items
}

/// True when any pollutant strictly exceeds its dedicated cut
///
/// Absent pollutants (including PM2.5/PM10, which the measurement set does
/// not carry) read as 0 and never exceed.
pub fn pollution_exceeded(set: &MeasurementSet, table: &PollutantTable) -> bool {
    Pollutant::ALL.iter().any(|&pollutant| {
        let value = pollutant
            .measurement_kind()
            .and_then(|kind| set.get(kind))
            .unwrap_or(0.0);
        value > table.get(pollutant)
    })
}
