//! Wind-driven source backtracking
//!
//! ## Overview
//!
//! Given an abnormal sensor's position and the current area-wide wind
//! direction, the backtracker marches from the sensor in fixed-distance
//! steps along the wind bearing until either the monitored region boundary
//! is crossed or the step budget runs out. The result is a deterministic
//! heuristic estimate of the anomaly's origin, not a dispersion simulation.
//!
//! Two conventions are preserved literally from the system being modeled
//! and must not be "fixed" in isolation:
//!
//! - The step uses the *raw* reported wind direction with no 180° inversion
//!   (`Δlat = cos·step`, `Δlng = sin·step`), while the particle overlay
//!   renders with an inverted bearing. Changing either side alone would
//!   silently flip every historical origin estimate.
//! - Step magnitude is constant regardless of wind speed.
//!
//! ## Display clamping
//!
//! The geographic origin can land far outside the viewport. The rendering
//! layer projects it to screen space and [`clamp_display`] pulls the marker
//! back toward the sensor at a fixed zoom-scaled pixel radius. The clamped
//! point is cosmetic only; area resolution and navigation always use the
//! geographic origin.

use core::fmt;

use heapless::Vec;
use libm::{cosf, sinf};
use plumetrace_geo::{AreaIndex, GeoPoint, ResolvedLocation, ScreenPoint};

use crate::constants::{
    BACKTRACK_MAX_STEPS, BACKTRACK_STEP_DEG, MAX_DISPLAY_DISTANCE_PX, MAX_TRACE_POINTS,
};
use crate::errors::{EngineError, EngineResult};
use crate::ident::IdStr;

/// Backtracking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktrackConfig {
    /// Distance traveled per step, in degrees (~800 m per 0.008°)
    pub step_distance_deg: f32,
    /// Step budget; the march always terminates within this many steps
    pub max_steps: u16,
    /// Maximum sensor-to-origin marker distance at zoom scale 1.0
    pub max_display_px: f32,
}

impl Default for BacktrackConfig {
    fn default() -> Self {
        Self {
            step_distance_deg: BACKTRACK_STEP_DEG,
            max_steps: BACKTRACK_MAX_STEPS,
            max_display_px: MAX_DISPLAY_DISTANCE_PX,
        }
    }
}

impl BacktrackConfig {
    /// Validated constructor
    pub fn new(step_distance_deg: f32, max_steps: u16, max_display_px: f32) -> EngineResult<Self> {
        if !(step_distance_deg.is_finite() && step_distance_deg > 0.0) {
            return Err(EngineError::InvalidConfig("step distance must be positive"));
        }
        if max_steps == 0 {
            return Err(EngineError::InvalidConfig("max steps must be at least 1"));
        }
        if !(max_display_px.is_finite() && max_display_px > 0.0) {
            return Err(EngineError::InvalidConfig("display radius must be positive"));
        }
        Ok(Self {
            step_distance_deg,
            max_steps,
            max_display_px,
        })
    }
}

/// Outcome of one backtracking run
///
/// Resolved ids borrow from the polygon dataset behind the [`AreaIndex`].
#[derive(Debug, Clone)]
pub struct BacktrackResult<'a> {
    /// The traced sensor
    pub sensor_id: IdStr,
    /// Marched points, starting at the sensor position. A step budget
    /// larger than the capacity keeps marching but stops recording; the
    /// origin and resolution always reflect the full march.
    pub path: Vec<GeoPoint, MAX_TRACE_POINTS>,
    /// True when the march crossed the monitored region boundary
    pub exited_area: bool,
    /// Area label for the origin: the final point's area when the march
    /// stayed inside, or the last-known-inside area when it exited
    pub resolved_area: Option<&'a str>,
    /// Sub-area counterpart of `resolved_area`
    pub resolved_sub_area: Option<&'a str>,
    /// Estimated geographic origin (just outside the boundary when exited)
    pub origin: GeoPoint,
}

impl fmt::Display for BacktrackResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.exited_area, self.resolved_area) {
            (true, Some(area)) => {
                write!(f, "estimated origin: outside region (via {area}")?;
                if let Some(sub) = self.resolved_sub_area {
                    write!(f, " {sub}")?;
                }
                f.write_str(")")
            }
            (true, None) => f.write_str("estimated origin: outside region"),
            (false, Some(area)) => {
                write!(f, "estimated origin: near {area}")?;
                if let Some(sub) = self.resolved_sub_area {
                    write!(f, " {sub}")?;
                }
                Ok(())
            }
            (false, None) => f.write_str("estimated origin: unresolved"),
        }
    }
}

/// March upwind from `start` until the region boundary is crossed
///
/// Pure function: terminates within `config.max_steps` iterations and sets
/// `exited_area` exactly once. A start position that already resolves to no
/// area still produces a result (first step lands outside, ids stay `None`).
pub fn trace_origin<'a>(
    sensor_id: IdStr,
    start: GeoPoint,
    wind_direction_deg: f32,
    config: &BacktrackConfig,
    index: &AreaIndex<'a>,
) -> BacktrackResult<'a> {
    let radians = wind_direction_deg.to_radians();
    let dlat = cosf(radians) * config.step_distance_deg;
    let dlng = sinf(radians) * config.step_distance_deg;

    let mut path: Vec<GeoPoint, MAX_TRACE_POINTS> = Vec::new();
    let _ = path.push(start);

    let mut current = start;
    let mut origin = start;
    let mut exited_area = false;
    let mut last_inside = ResolvedLocation::default();

    for _ in 0..config.max_steps {
        current = GeoPoint::new(current.lat + dlat, current.lng + dlng);
        // Recording stops at capacity; the march itself never does
        let _ = path.push(current);

        let location = index.locate(current);
        if location.is_outside() {
            // Crossed the boundary: the origin marker sits just outside
            exited_area = true;
            origin = current;
            break;
        }
        last_inside = location;
        origin = current;
    }

    let resolved = if exited_area {
        last_inside
    } else {
        index.locate(origin)
    };

    BacktrackResult {
        sensor_id,
        path,
        exited_area,
        resolved_area: resolved.area,
        resolved_sub_area: resolved.sub_area,
        origin,
    }
}

/// Clamp the on-screen origin marker toward the sensor marker
///
/// The allowed radius is `max_display_px / zoom_scale`. Cosmetic only:
/// callers must never feed the clamped point back into area resolution.
pub fn clamp_display(
    sensor_px: ScreenPoint,
    origin_px: ScreenPoint,
    zoom_scale: f32,
    max_display_px: f32,
) -> ScreenPoint {
    if zoom_scale <= 0.0 {
        return origin_px;
    }
    let max_distance = max_display_px / zoom_scale;
    let distance = sensor_px.distance_to(origin_px);
    if distance <= max_distance || distance == 0.0 {
        return origin_px;
    }

    let ratio = max_distance / distance;
    ScreenPoint::new(
        sensor_px.x + (origin_px.x - sensor_px.x) * ratio,
        sensor_px.y + (origin_px.y - sensor_px.y) * ratio,
    )
}

/// Active-trace bookkeeping with toggle semantics
///
/// At most one sensor holds the active trace. Selecting it again clears the
/// trace; selecting a different sensor replaces it outright.
#[derive(Debug, Clone, Default)]
pub struct SourceBacktracker {
    config: BacktrackConfig,
    active: Option<IdStr>,
}

impl SourceBacktracker {
    /// Create a backtracker with the given parameters
    pub fn new(config: BacktrackConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Parameters in use
    pub fn config(&self) -> &BacktrackConfig {
        &self.config
    }

    /// Currently traced sensor, if any
    pub fn active_sensor(&self) -> Option<&str> {
        self.active.as_ref().map(IdStr::as_str)
    }

    /// Drop the active trace
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Select a sensor for backtracking
    ///
    /// Returns the fresh trace, or `None` when the selection toggled the
    /// already-active sensor off.
    pub fn select<'a>(
        &mut self,
        sensor_id: IdStr,
        position: GeoPoint,
        wind_direction_deg: f32,
        index: &AreaIndex<'a>,
    ) -> Option<BacktrackResult<'a>> {
        if self.active == Some(sensor_id) {
            self.active = None;
            return None;
        }

        let result = trace_origin(sensor_id, position, wind_direction_deg, &self.config, index);
        self.active = Some(sensor_id);
        Some(result)
    }
}
