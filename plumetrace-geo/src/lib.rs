//! Geographic primitives for PlumeTrace
//!
//! Provides the point types, ring containment test, and the two-level
//! administrative area index that the engine queries while backtracking a
//! detected anomaly against the wind. The polygon dataset itself is supplied
//! by the caller (typically loaded from a GeoJSON-derived table by the
//! rendering layer) and is only ever borrowed here.
//!
//! Key constraints:
//! - `no_std` by default, no heap allocation
//! - Containment queries are pure and bounded by vertex count
//! - A point outside every polygon is a valid answer, not an error
//!
//! ```
//! use plumetrace_geo::{AreaBoundary, AreaIndex, GeoPoint};
//!
//! const RING: [GeoPoint; 5] = [
//!     GeoPoint::new(37.40, 126.80),
//!     GeoPoint::new(37.70, 126.80),
//!     GeoPoint::new(37.70, 127.20),
//!     GeoPoint::new(37.40, 127.20),
//!     GeoPoint::new(37.40, 126.80),
//! ];
//! static RINGS: [&[GeoPoint]; 1] = [&RING];
//! static AREAS: [AreaBoundary; 1] = [AreaBoundary::new("gangnam", &RINGS, &[])];
//!
//! let index = AreaIndex::new(&AREAS);
//! let hit = index.locate(GeoPoint::new(37.55, 127.00));
//! assert_eq!(hit.area, Some("gangnam"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod index;
pub mod point;
pub mod polygon;

pub use index::{AreaBoundary, AreaIndex, ResolvedLocation, SubAreaBoundary};
pub use point::{GeoPoint, ScreenPoint};
pub use polygon::ring_contains;
