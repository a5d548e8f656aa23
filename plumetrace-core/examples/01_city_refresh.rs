//! City Refresh Cycle Example
//!
//! This example drives the engine the way the dashboard backend does:
//! apply a refresh batch, read back per-sensor status, the area alert
//! rollup and the wind estimate, then select an abnormal sensor to run
//! a source backtrace.
//!
//! ## What You'll Learn
//!
//! - Building sensor readings and applying a refresh batch
//! - Reading per-sensor status and the global alert message
//! - Running the wind-driven source backtracker for a selected sensor
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_city_refresh
//! ```

use plumetrace_core::{
    CompassSector, Engine, IdStr, MeasurementKind, MeasurementSet, SelectOutcome, SensorReading,
    SystemClock,
};
use plumetrace_geo::{AreaBoundary, AreaIndex, GeoPoint, SubAreaBoundary};

// A toy district: one square monitored area with a northern sub-area.
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

fn main() {
    println!("PlumeTrace City Refresh Example");
    println!("===============================\n");

    let index = AreaIndex::new(&AREAS);
    let mut engine: Engine<SystemClock, 64> = Engine::new(SystemClock);

    // One refresh batch: a hot sensor, a quiet one, and a noisy one
    let batch = [
        reading("st-014", "central", GeoPoint::new(0.2, 0.0), |m| {
            m.set(MeasurementKind::Temp, 41.5);
            m.set(MeasurementKind::WindDir, 10.0);
            m.set(MeasurementKind::WindSpeed, 2.5);
        }),
        reading("st-007", "central", GeoPoint::new(-0.2, 0.1), |m| {
            m.set(MeasurementKind::Temp, 21.0);
            m.set(MeasurementKind::Humidity, 48.0);
        }),
        reading("st-021", "harbor", GeoPoint::new(0.1, -0.3), |m| {
            m.set(MeasurementKind::Noise, 76.0);
        }),
    ];

    let summary = engine.apply_refresh(&batch);
    println!(
        "Refresh applied: {} updated, {} dropped",
        summary.updated, summary.dropped
    );

    println!("\nPer-sensor status:");
    for record in engine.status().iter() {
        println!(
            "  {:8} [{}] -> {:?}",
            record.sensor_id,
            record.area_id,
            record.status
        );
        for item in record.abnormal_items.iter() {
            println!(
                "           {} = {} {} ({:?})",
                item.kind.name(),
                item.value,
                item.kind.unit(),
                item.level
            );
        }
    }

    let alerts = engine.area_alerts();
    println!("\nAlert message: {}", alerts.message);

    let wind = engine.wind();
    if let (Some(dir), Some(speed)) = (wind.direction_deg, wind.speed_ms) {
        println!(
            "Wind: {:.0}° ({}) at {:.1} m/s",
            dir,
            CompassSector::from_degrees(dir).name(),
            speed
        );
    }

    // Select the hot sensor and march upwind toward the likely origin
    println!("\nSelecting st-014 for backtracking:");
    match engine.select_sensor("st-014", &index) {
        SelectOutcome::Traced(result) => {
            println!("  {} path points", result.path.len());
            println!("  {result}");
            println!(
                "  origin at ({:.4}, {:.4}), exited area: {}",
                result.origin.lat, result.origin.lng, result.exited_area
            );
        }
        SelectOutcome::Cleared => println!("  trace cleared"),
        SelectOutcome::Ignored => println!("  selection ignored"),
    }

    // Selecting the same sensor again toggles the trace off
    match engine.select_sensor("st-014", &index) {
        SelectOutcome::Cleared => println!("  reselect -> trace cleared"),
        _ => println!("  unexpected outcome"),
    }
}
