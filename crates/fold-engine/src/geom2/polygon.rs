//! Polygon measures, validation and single-line clipping.
//!
//! Purpose
//! - Area/centroid for piece bookkeeping, `validate_polygon` as the gate every
//!   fold output must pass, and the Sutherland–Hodgman style split that the fold
//!   system builds on.
//!
//! Conventions
//! - Inputs with fewer than three vertices are empty: zero area, no split output.
//! - The split never fails; degenerate outputs are left to callers to discard.
//!
//! Code cross-refs: `predicates::{side_of_line, segment_line_intersection, segments_intersect}`

use nalgebra::Vector2;

use super::predicates::{segment_line_intersection, segments_intersect, side_of_line};
use super::types::{Line2, Point2, Polygon, SplitResult, EPSILON};

#[inline]
fn signed_area2(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let p = vertices[i];
            let q = vertices[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum()
}

/// Shoelace area (absolute value). Zero for fewer than three vertices.
pub fn polygon_area(polygon: &Polygon) -> f64 {
    if polygon.is_degenerate() {
        return 0.0;
    }
    signed_area2(&polygon.vertices).abs() * 0.5
}

/// Area-weighted centroid.
///
/// 0, 1 and 2 vertices give the origin, the point and the midpoint. A (near-)zero
/// signed area falls back to the vertex mean.
pub fn polygon_centroid(polygon: &Polygon) -> Point2 {
    let v = &polygon.vertices;
    match v.len() {
        0 => return Point2::zeros(),
        1 => return v[0],
        2 => return (v[0] + v[1]) * 0.5,
        _ => {}
    }
    let n = v.len();
    let mut area = 0.0;
    let mut acc = Point2::zeros();
    for i in 0..n {
        let p = v[i];
        let q = v[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        area += cross;
        acc += (p + q) * cross;
    }
    area *= 0.5;
    if area.abs() < EPSILON {
        let sum = v.iter().fold(Point2::zeros(), |acc, p| acc + p);
        return sum / n as f64;
    }
    acc / (6.0 * area)
}

/// Simple-polygon check: ≥3 vertices, no zero-length edge, no proper crossing
/// between non-adjacent edges (touching endpoints are fine).
pub fn validate_polygon(polygon: &Polygon) -> bool {
    let v = &polygon.vertices;
    let n = v.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        if (v[(i + 1) % n] - v[i]).norm() < EPSILON {
            return false;
        }
    }
    for i in 0..n {
        let (a1, a2) = (v[i], v[(i + 1) % n]);
        // Skip j = i+1 (shares a2) and, for i = 0, the closing edge (shares a1).
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (v[j], v[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

/// Split along the line through `line_point` with unit normal `line_normal`.
///
/// Each vertex goes to `left` when Positive or OnLine and to `right` when Negative
/// or OnLine. An edge whose endpoints have strictly opposite signs contributes its
/// intersection to both outputs and to `intersections`.
pub fn split_polygon_by_line(
    polygon: &Polygon,
    line_point: Point2,
    line_normal: Point2,
) -> SplitResult {
    let mut out = SplitResult::default();
    if polygon.is_degenerate() {
        return out;
    }
    for (current, next) in polygon.edges() {
        let cur_side = side_of_line(current, line_point, line_normal);
        let next_side = side_of_line(next, line_point, line_normal);
        if cur_side.includes_positive() {
            out.left.vertices.push(current);
        }
        if cur_side.includes_negative() {
            out.right.vertices.push(current);
        }
        if cur_side.code() * next_side.code() < 0 {
            if let Some(hit) = segment_line_intersection(current, next, line_point, line_normal) {
                out.left.vertices.push(hit);
                out.right.vertices.push(hit);
                out.intersections.push(hit);
            }
        }
    }
    out
}

/// `split_polygon_by_line` with a `Line2`.
#[inline]
pub fn split_by(polygon: &Polygon, line: &Line2) -> SplitResult {
    split_polygon_by_line(polygon, line.point, line.normal)
}

/// Clip against the axis-aligned rectangle `[min, max]` (four half-plane splits).
///
/// Exact for convex inputs, which is all the fold system produces.
pub fn clip_to_rect(polygon: &Polygon, min: Point2, max: Point2) -> Polygon {
    let planes = [
        (min, Vector2::new(1.0, 0.0)),
        (max, Vector2::new(-1.0, 0.0)),
        (min, Vector2::new(0.0, 1.0)),
        (max, Vector2::new(0.0, -1.0)),
    ];
    let mut current = polygon.clone();
    for (point, normal) in planes {
        if current.is_degenerate() {
            return Polygon::default();
        }
        current = split_polygon_by_line(&current, point, normal).left;
    }
    current
}

/// Chord of `line` across the rectangle `[min, max]`, or None if it misses.
pub fn line_rect_chord(line: &Line2, min: Point2, max: Point2) -> Option<(Point2, Point2)> {
    let rect = Polygon::rect(min, max);
    let mut hits: Vec<Point2> = Vec::with_capacity(4);
    for (a, b) in rect.edges() {
        if let Some(p) = segment_line_intersection(a, b, line.point, line.normal) {
            if hits.iter().all(|h| (h - p).norm() >= EPSILON) {
                hits.push(p);
            }
        }
    }
    let mut best: Option<(Point2, Point2, f64)> = None;
    for i in 0..hits.len() {
        for j in (i + 1)..hits.len() {
            let d = (hits[i] - hits[j]).norm();
            if best.as_ref().is_none_or(|(_, _, bd)| d > *bd) {
                best = Some((hits[i], hits[j], d));
            }
        }
    }
    let (a, b, _) = best?;
    // Orient the chord along the line direction for stable seam endpoints.
    if (b - a).dot(&line.direction()) >= 0.0 {
        Some((a, b))
    } else {
        Some((b, a))
    }
}
