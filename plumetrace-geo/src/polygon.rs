//! Ring containment test
//!
//! Even-odd ray casting against a single polygon ring. This is the standard
//! crossing-number algorithm: cast a ray from the query point toward +lng and
//! count edge crossings. Works for convex and concave rings alike; behavior
//! exactly on an edge is unspecified, which is acceptable for administrative
//! boundaries where sensors never sit on the border line itself.

use crate::point::GeoPoint;

/// Test whether `point` lies inside the polygon ring
///
/// The ring may be open or closed (a repeated first vertex is harmless).
/// Rings with fewer than three vertices contain nothing.
pub fn ring_contains(ring: &[GeoPoint], point: GeoPoint) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];

        // Edge straddles the query latitude?
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let t = (point.lat - a.lat) / (b.lat - a.lat);
            let crossing_lng = a.lng + t * (b.lng - a.lng);
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
