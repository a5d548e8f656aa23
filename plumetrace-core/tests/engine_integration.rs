//! Integration tests for the full engine data path
//!
//! Drives complete refresh cycles through classification, area alerts,
//! wind estimation, the pollution pulse, and sensor selection with
//! backtracking, the way the dashboard backend exercises the engine.

use plumetrace_core::{
    AreaSeverity, Engine, FixedClock, IdStr, MeasurementKind, MeasurementSet, SelectOutcome,
    SensorReading, SensorStatus,
};
use plumetrace_geo::{AreaBoundary, AreaIndex, GeoPoint, SubAreaBoundary};

// One 1°x1° monitored square around the origin, split into a northern
// sub-area, mirroring a small district dataset.
const RING: [GeoPoint; 5] = [
    GeoPoint::new(-0.5, -0.5),
    GeoPoint::new(-0.5, 0.5),
    GeoPoint::new(0.5, 0.5),
    GeoPoint::new(0.5, -0.5),
    GeoPoint::new(-0.5, -0.5),
];
const NORTH_RING: [GeoPoint; 5] = [
    GeoPoint::new(0.0, -0.5),
    GeoPoint::new(0.0, 0.5),
    GeoPoint::new(0.5, 0.5),
    GeoPoint::new(0.5, -0.5),
    GeoPoint::new(0.0, -0.5),
];
static RINGS: [&[GeoPoint]; 1] = [&RING];
static NORTH_RINGS: [&[GeoPoint]; 1] = [&NORTH_RING];
static SUBS: [SubAreaBoundary; 1] = [SubAreaBoundary::new("north-half", &NORTH_RINGS)];
static AREAS: [AreaBoundary; 1] = [AreaBoundary::new("central", &RINGS, &SUBS)];

fn index() -> AreaIndex<'static> {
    AreaIndex::new(&AREAS)
}

fn reading(
    id: &str,
    area: &str,
    position: GeoPoint,
    fill: impl FnOnce(&mut MeasurementSet),
) -> SensorReading {
    let mut measurements = MeasurementSet::new();
    fill(&mut measurements);
    SensorReading {
        sensor_id: IdStr::new(id).unwrap(),
        area_id: IdStr::new(area).unwrap(),
        sub_area_id: None,
        position: Some(position),
        measured_at: 0,
        measurements,
    }
}

fn engine() -> Engine<FixedClock, 64> {
    Engine::new(FixedClock::new(0))
}

#[test]
fn refresh_to_alerts_end_to_end() {
    let mut engine = engine();

    let batch = [
        reading("st-01", "central", GeoPoint::new(0.2, 0.0), |m| {
            m.set(MeasurementKind::Temp, 41.0);
            m.set(MeasurementKind::WindDir, 0.0);
            m.set(MeasurementKind::WindSpeed, 2.0);
        }),
        reading("st-02", "central", GeoPoint::new(-0.2, 0.1), |m| {
            m.set(MeasurementKind::Temp, 21.0);
        }),
        reading("st-03", "harbor", GeoPoint::new(0.1, -0.2), |m| {
            m.set(MeasurementKind::Noise, 75.0);
        }),
    ];
    let summary = engine.apply_refresh(&batch);

    assert_eq!(summary.updated, 3);
    assert!(!summary.pollution_detected);
    assert_eq!(engine.status().status_of("st-01"), SensorStatus::Danger);
    assert_eq!(engine.status().status_of("st-02"), SensorStatus::Normal);
    assert_eq!(engine.status().status_of("st-03"), SensorStatus::Warning);

    let alerts = engine.area_alerts();
    assert_eq!(alerts.overall_severity(), AreaSeverity::Danger);
    assert!(alerts.message.starts_with("[EMERGENCY] central"));
    assert!(alerts.message.contains("temp"));

    assert_eq!(engine.wind().direction_deg, Some(0.0));
    assert_eq!(engine.wind().speed_ms, Some(2.0));
}

#[test]
fn selection_traces_toggles_and_ignores() {
    let mut engine = engine();
    let index = index();

    engine.apply_refresh(&[
        reading("danger", "central", GeoPoint::new(0.2, 0.0), |m| {
            m.set(MeasurementKind::Temp, 41.0);
            m.set(MeasurementKind::WindDir, 0.0);
        }),
        reading("calm", "central", GeoPoint::new(-0.2, 0.0), |m| {
            m.set(MeasurementKind::Temp, 20.0);
        }),
    ]);

    // Abnormal sensor with a wind estimate: full trace, exits north
    let result = match engine.select_sensor("danger", &index) {
        SelectOutcome::Traced(result) => result,
        other => panic!("expected a trace, got {other:?}"),
    };
    assert!(result.exited_area);
    assert_eq!(result.resolved_area, Some("central"));
    assert_eq!(result.resolved_sub_area, Some("north-half"));
    assert_eq!(engine.active_trace(), Some("danger"));

    // Selecting a normal sensor is ignored and leaves the trace alone
    assert!(matches!(
        engine.select_sensor("calm", &index),
        SelectOutcome::Ignored
    ));
    assert_eq!(engine.active_trace(), Some("danger"));

    // Unknown id: ignored too
    assert!(matches!(
        engine.select_sensor("nope", &index),
        SelectOutcome::Ignored
    ));

    // Reselecting the active sensor toggles the trace off
    assert!(matches!(
        engine.select_sensor("danger", &index),
        SelectOutcome::Cleared
    ));
    assert_eq!(engine.active_trace(), None);
}

#[test]
fn selection_before_any_wind_estimate_is_ignored() {
    let mut engine = engine();
    let index = index();

    engine.apply_refresh(&[reading("danger", "central", GeoPoint::new(0.0, 0.0), |m| {
        m.set(MeasurementKind::Temp, 41.0);
    })]);

    assert!(matches!(
        engine.select_sensor("danger", &index),
        SelectOutcome::Ignored
    ));
    assert_eq!(engine.active_trace(), None);
}

#[test]
fn pollution_pulse_follows_the_refresh_clock() {
    let mut engine = engine();
    let position = GeoPoint::new(0.0, 0.0);

    let summary = engine.apply_refresh(&[reading("st-01", "central", position, |m| {
        m.set(MeasurementKind::Co, 12.0)
    })]);
    assert!(summary.pollution_detected);
    assert!(engine.pollution_pulse_active());
    assert_eq!(engine.status().status_of("st-01"), SensorStatus::Warning);

    // Pulse holds through refreshes inside the interval
    engine.clock_mut().advance(1_000);
    engine.apply_refresh(&[]);
    assert!(engine.pollution_pulse_active());

    // Once the sensor recovers and the interval elapses, the pulse clears
    engine.apply_refresh(&[reading("st-01", "central", position, |m| {
        m.set(MeasurementKind::Co, 1.0)
    })]);
    engine.clock_mut().advance(3_000);
    let summary = engine.apply_refresh(&[]);
    assert!(!summary.pollution_detected);
    assert!(!engine.pollution_pulse_active());
}

#[test]
fn partial_feeds_accumulate_across_cycles() {
    let mut engine = engine();
    let position = GeoPoint::new(0.1, 0.1);

    engine.apply_refresh(&[reading("st-01", "central", position, |m| {
        m.set(MeasurementKind::Temp, 36.0)
    })]);
    assert_eq!(engine.status().status_of("st-01"), SensorStatus::Warning);

    // Humidity-only update: temperature warning must survive the merge
    engine.apply_refresh(&[reading("st-01", "central", position, |m| {
        m.set(MeasurementKind::Humidity, 96.0)
    })]);

    let record = engine.status().get("st-01").unwrap();
    assert_eq!(record.status, SensorStatus::Danger);
    assert_eq!(record.abnormal_items.len(), 2);
    assert_eq!(record.measurements.get(MeasurementKind::Temp), Some(36.0));
}
