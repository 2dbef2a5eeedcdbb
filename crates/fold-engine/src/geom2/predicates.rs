//! Point/line/segment predicates.
//!
//! All tests share the fixed `EPSILON`. Normals passed in are assumed to be unit
//! length; `Line2` guarantees that for callers inside the crate.

use super::types::{Point2, Polygon, Side, EPSILON};

#[inline]
fn cross(a: Point2, b: Point2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Classify `point` against the line through `line_point` with normal `line_normal`.
pub fn side_of_line(point: Point2, line_point: Point2, line_normal: Point2) -> Side {
    let distance = (point - line_point).dot(&line_normal);
    if distance.abs() < EPSILON {
        Side::OnLine
    } else if distance > 0.0 {
        Side::Positive
    } else {
        Side::Negative
    }
}

/// Intersection of the segment `seg_start → seg_end` with an infinite line.
///
/// None when the segment is (near-)parallel to the line or the hit parameter lies
/// outside `[0, 1]` beyond `EPSILON`; in-tolerance parameters are clamped.
pub fn segment_line_intersection(
    seg_start: Point2,
    seg_end: Point2,
    line_point: Point2,
    line_normal: Point2,
) -> Option<Point2> {
    let dir = seg_end - seg_start;
    let denom = dir.dot(&line_normal);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (line_point - seg_start).dot(&line_normal) / denom;
    if t < -EPSILON || t > 1.0 + EPSILON {
        return None;
    }
    Some(seg_start + dir * t.clamp(0.0, 1.0))
}

/// Strict interior crossing of segments `a1a2` and `b1b2`.
///
/// Parallel or collinear segments never intersect, and a hit within `EPSILON` of
/// either segment's endpoint does not count: adjacent polygon edges touch there.
pub fn segments_intersect(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> bool {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = cross(r, s);
    if denom.abs() < EPSILON {
        return false;
    }
    let qp = b1 - a1;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    let interior = |x: f64| x > EPSILON && x < 1.0 - EPSILON;
    interior(t) && interior(u)
}

/// Ray-casting parity test; false for polygons with fewer than three vertices.
pub fn point_in_polygon(point: Point2, polygon: &Polygon) -> bool {
    if polygon.is_degenerate() {
        return false;
    }
    let mut inside = false;
    for (a, b) in polygon.edges() {
        if (a.y > point.y) != (b.y > point.y) {
            let x_hit = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_hit {
                inside = !inside;
            }
        }
    }
    inside
}

/// Euclidean distance from `p` to the closed segment `a → b`.
pub fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < EPSILON * EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
