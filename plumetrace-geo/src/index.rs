//! Two-level administrative area index
//!
//! Resolves a geographic point to an area (district) and, within it, a
//! sub-area (neighborhood). Lookup is ordered: area polygons are tested first
//! and the first match wins (the dataset is assumed non-overlapping), then
//! only the matched area's own sub-area polygons are consulted. A point that
//! matches no area resolves to `{None, None}`; that is the "exited the
//! monitored region" signal the backtracker terminates on, not a failure.
//!
//! The dataset is borrowed for the lifetime of the index; areas with several
//! disjoint outer rings (islands, exclaves) list one ring per slice entry.

use crate::point::GeoPoint;
use crate::polygon::ring_contains;

/// Sub-area (neighborhood) boundary within one area
#[derive(Debug, Clone, Copy)]
pub struct SubAreaBoundary<'a> {
    /// Stable sub-area identifier
    pub id: &'a str,
    /// Outer rings; containment in any ring counts
    pub rings: &'a [&'a [GeoPoint]],
}

impl<'a> SubAreaBoundary<'a> {
    /// Create a sub-area boundary
    pub const fn new(id: &'a str, rings: &'a [&'a [GeoPoint]]) -> Self {
        Self { id, rings }
    }

    fn contains(&self, point: GeoPoint) -> bool {
        self.rings.iter().any(|ring| ring_contains(ring, point))
    }
}

/// Area (district) boundary with its sub-areas
#[derive(Debug, Clone, Copy)]
pub struct AreaBoundary<'a> {
    /// Stable area identifier
    pub id: &'a str,
    /// Outer rings; containment in any ring counts
    pub rings: &'a [&'a [GeoPoint]],
    /// Sub-area boundaries belonging to this area
    pub sub_areas: &'a [SubAreaBoundary<'a>],
}

impl<'a> AreaBoundary<'a> {
    /// Create an area boundary
    pub const fn new(
        id: &'a str,
        rings: &'a [&'a [GeoPoint]],
        sub_areas: &'a [SubAreaBoundary<'a>],
    ) -> Self {
        Self { id, rings, sub_areas }
    }

    fn contains(&self, point: GeoPoint) -> bool {
        self.rings.iter().any(|ring| ring_contains(ring, point))
    }
}

/// Result of a point lookup against the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedLocation<'a> {
    /// Containing area id, if any
    pub area: Option<&'a str>,
    /// Containing sub-area id, if any (only set when `area` is set)
    pub sub_area: Option<&'a str>,
}

impl<'a> ResolvedLocation<'a> {
    /// True when the point matched no area polygon at all
    pub fn is_outside(&self) -> bool {
        self.area.is_none()
    }
}

/// Ordered point-in-polygon lookup over the full area dataset
#[derive(Debug, Clone, Copy)]
pub struct AreaIndex<'a> {
    areas: &'a [AreaBoundary<'a>],
}

impl<'a> AreaIndex<'a> {
    /// Build an index over a borrowed area dataset
    pub const fn new(areas: &'a [AreaBoundary<'a>]) -> Self {
        Self { areas }
    }

    /// Number of areas in the dataset
    pub const fn len(&self) -> usize {
        self.areas.len()
    }

    /// True when the dataset is empty
    pub const fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Resolve a point to its containing area and sub-area
    ///
    /// First area match wins; sub-areas are only searched within the matched
    /// area. An outside point returns the default `{None, None}` location.
    pub fn locate(&self, point: GeoPoint) -> ResolvedLocation<'a> {
        for area in self.areas {
            if !area.contains(point) {
                continue;
            }
            let sub_area = area
                .sub_areas
                .iter()
                .find(|sub| sub.contains(point))
                .map(|sub| sub.id);
            return ResolvedLocation {
                area: Some(area.id),
                sub_area,
            };
        }
        ResolvedLocation::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two adjacent 10x10 squares sharing the lng=10 edge, the western one
    // with a single sub-area occupying its southern half.
    const WEST_RING: [GeoPoint; 5] = [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 10.0),
        GeoPoint::new(10.0, 10.0),
        GeoPoint::new(10.0, 0.0),
        GeoPoint::new(0.0, 0.0),
    ];
    const EAST_RING: [GeoPoint; 5] = [
        GeoPoint::new(0.0, 10.0),
        GeoPoint::new(0.0, 20.0),
        GeoPoint::new(10.0, 20.0),
        GeoPoint::new(10.0, 10.0),
        GeoPoint::new(0.0, 10.0),
    ];
    const WEST_SOUTH_RING: [GeoPoint; 5] = [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 10.0),
        GeoPoint::new(5.0, 10.0),
        GeoPoint::new(5.0, 0.0),
        GeoPoint::new(0.0, 0.0),
    ];

    static WEST_RINGS: [&[GeoPoint]; 1] = [&WEST_RING];
    static EAST_RINGS: [&[GeoPoint]; 1] = [&EAST_RING];
    static WEST_SOUTH_RINGS: [&[GeoPoint]; 1] = [&WEST_SOUTH_RING];
    static WEST_SUBS: [SubAreaBoundary; 1] =
        [SubAreaBoundary::new("west-south", &WEST_SOUTH_RINGS)];
    static AREAS: [AreaBoundary; 2] = [
        AreaBoundary::new("west", &WEST_RINGS, &WEST_SUBS),
        AreaBoundary::new("east", &EAST_RINGS, &[]),
    ];

    fn index() -> AreaIndex<'static> {
        AreaIndex::new(&AREAS)
    }

    #[test]
    fn resolves_area_and_sub_area() {
        let loc = index().locate(GeoPoint::new(2.0, 5.0));
        assert_eq!(loc.area, Some("west"));
        assert_eq!(loc.sub_area, Some("west-south"));
    }

    #[test]
    fn resolves_area_without_sub_area() {
        // Northern half of "west" is covered by no sub-area polygon
        let loc = index().locate(GeoPoint::new(8.0, 5.0));
        assert_eq!(loc.area, Some("west"));
        assert_eq!(loc.sub_area, None);

        let loc = index().locate(GeoPoint::new(5.0, 15.0));
        assert_eq!(loc.area, Some("east"));
        assert_eq!(loc.sub_area, None);
    }

    #[test]
    fn outside_point_is_not_an_error() {
        let loc = index().locate(GeoPoint::new(50.0, 50.0));
        assert!(loc.is_outside());
        assert_eq!(loc.sub_area, None);
    }

    #[test]
    fn sub_areas_of_other_areas_are_never_consulted() {
        // This point is inside "east"; the west sub-area polygon is not
        // even tested once an area has matched.
        let loc = index().locate(GeoPoint::new(2.0, 15.0));
        assert_eq!(loc.area, Some("east"));
        assert_eq!(loc.sub_area, None);
    }

    #[test]
    fn empty_index_resolves_everything_outside() {
        let index = AreaIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.locate(GeoPoint::new(1.0, 1.0)).is_outside());
    }
}
