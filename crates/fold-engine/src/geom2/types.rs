//! Basic 2D types and the fixed tolerance used by every geometric predicate.
//!
//! - `EPSILON`: classification/degeneracy tolerance in world units.
//! - `Side`: result of classifying a point against an oriented line.
//! - `Line2`: infinite line stored as a point plus unit normal.
//! - `Polygon`: cyclic vertex list, counter-clockwise by convention.
//!
//! Code cross-refs: `predicates::{side_of_line, segment_line_intersection}`,
//! `polygon::split_polygon_by_line`

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A 2D position in world units.
pub type Point2 = Vector2<f64>;

/// Tolerance for on-line classification, parallel tests and zero-length edges.
pub const EPSILON: f64 = 1e-4;

/// Which side of an oriented line a point lies on.
///
/// `OnLine` points belong to both sides for every downstream algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Positive,
    Negative,
    OnLine,
}

impl Side {
    /// Sign code (+1, -1, 0) used for crossing detection.
    #[inline]
    pub fn code(self) -> i8 {
        match self {
            Side::Positive => 1,
            Side::Negative => -1,
            Side::OnLine => 0,
        }
    }

    #[inline]
    pub fn includes_positive(self) -> bool {
        matches!(self, Side::Positive | Side::OnLine)
    }

    #[inline]
    pub fn includes_negative(self) -> bool {
        matches!(self, Side::Negative | Side::OnLine)
    }
}

/// Infinite line `{ x : n · (x - p) = 0 }` with unit normal `n`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line2 {
    pub point: Point2,
    pub normal: Point2,
}

impl Line2 {
    /// Line through `point` with the given normal (normalized). None for a zero normal.
    pub fn new(point: Point2, normal: Point2) -> Option<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || norm < EPSILON {
            return None;
        }
        Some(Self {
            point,
            normal: normal / norm,
        })
    }

    /// Line through `a` and `b`; the normal is the left-hand perpendicular of `b - a`.
    pub fn through(a: Point2, b: Point2) -> Option<Self> {
        let d = b - a;
        Self::new(a, Vector2::new(-d.y, d.x))
    }

    /// Unit direction along the line (normal rotated clockwise by 90°).
    #[inline]
    pub fn direction(&self) -> Point2 {
        Vector2::new(self.normal.y, -self.normal.x)
    }

    #[inline]
    pub fn signed_distance(&self, p: Point2) -> f64 {
        (p - self.point).dot(&self.normal)
    }

    #[inline]
    pub fn side(&self, p: Point2) -> Side {
        super::predicates::side_of_line(p, self.point, self.normal)
    }

    /// Mirror image of `p` across the line.
    #[inline]
    pub fn reflect(&self, p: Point2) -> Point2 {
        p - self.normal * (2.0 * self.signed_distance(p))
    }
}

/// Ordered, cyclic vertex list. Fewer than three vertices means degenerate/empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point2>,
}

impl Polygon {
    #[inline]
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle `[min, max]`, counter-clockwise from `min`.
    pub fn rect(min: Point2, max: Point2) -> Self {
        Self::new(vec![
            min,
            Vector2::new(max.x, min.y),
            max,
            Vector2::new(min.x, max.y),
        ])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Edges as `(current, next)` pairs, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    #[inline]
    pub fn area(&self) -> f64 {
        super::polygon::polygon_area(self)
    }

    #[inline]
    pub fn centroid(&self) -> Point2 {
        super::polygon::polygon_centroid(self)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        super::polygon::validate_polygon(self)
    }

    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        super::predicates::point_in_polygon(p, self)
    }

    /// Axis-aligned bounds `(min, max)`; None when empty.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.vertices.first()?;
        let (mut min, mut max) = (first, first);
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Some((min, max))
    }

    /// Mirror across `line`. Vertex order is reversed so the winding stays counter-clockwise.
    pub fn reflected(&self, line: &Line2) -> Polygon {
        Polygon::new(self.vertices.iter().rev().map(|&v| line.reflect(v)).collect())
    }

    /// Drop consecutive vertices closer than `EPSILON` (including the wrap-around pair).
    pub fn dedup_eps(&mut self) {
        self.vertices.dedup_by(|a, b| (*a - *b).norm() < EPSILON);
        while self.vertices.len() > 1 {
            let first = self.vertices[0];
            let last = self.vertices[self.vertices.len() - 1];
            if (first - last).norm() < EPSILON {
                self.vertices.pop();
            } else {
                break;
            }
        }
    }
}

/// Output of `split_polygon_by_line`: `left` is the Positive side, `right` the Negative side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitResult {
    pub left: Polygon,
    pub right: Polygon,
    pub intersections: Vec<Point2>,
}
