//! Point types for geographic and screen coordinates
//!
//! `GeoPoint` is a plain latitude/longitude pair in degrees. The engine only
//! ever adds small per-step deltas to it, so no projection or great-circle
//! math is needed here. `ScreenPoint` is the projected pixel position that the
//! rendering layer hands back for display clamping; the two types are kept
//! distinct so a geographic origin can never be silently replaced by its
//! cosmetic on-screen counterpart.

use libm::sqrtf;

/// Geographic position in degrees (WGS84 latitude / longitude)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude in degrees, positive north
    pub lat: f32,
    /// Longitude in degrees, positive east
    pub lng: f32,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees
    pub const fn new(lat: f32, lng: f32) -> Self {
        Self { lat, lng }
    }
}

/// Projected screen-space position in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate
    pub x: f32,
    /// Vertical pixel coordinate
    pub y: f32,
}

impl ScreenPoint {
    /// Create a point from pixel coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean pixel distance to another screen point
    pub fn distance_to(&self, other: ScreenPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        sqrtf(dx * dx + dy * dy)
    }
}
