//! GeometryCore: stateless 2D primitives for the fold engine.
//!
//! Purpose
//! - Side-of-line classification, segment/line and segment/segment intersection,
//!   polygon area/centroid/validation, single-line polygon split, point-in-polygon.
//! - Everything here is a pure function of its inputs; no shared state.
//!
//! Assumptions and conventions
//! - Points are `nalgebra::Vector2<f64>` (`Point2`); polygons are counter-clockwise.
//! - One fixed tolerance, `EPSILON = 1e-4` world units, for all predicates.
//! - `OnLine` points belong to both sides of a split.
//!
//! Code cross-refs: `crate::model::CellPiece`, `crate::fold::FoldSystem`

pub mod polygon;
pub mod predicates;
pub mod rand;
mod types;
mod util;

pub use polygon::{
    clip_to_rect, line_rect_chord, polygon_area, polygon_centroid, split_by,
    split_polygon_by_line, validate_polygon,
};
pub use predicates::{
    distance_to_segment, point_in_polygon, segment_line_intersection, segments_intersect,
    side_of_line,
};
pub use types::{Line2, Point2, Polygon, Side, SplitResult, EPSILON};
pub use util::convex_hull;
