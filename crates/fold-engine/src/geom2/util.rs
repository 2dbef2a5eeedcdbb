//! Convex hull for the random polygon draws.
//!
//! Returns a `Polygon` rather than a point list so a draw feeds `split_by`,
//! `clip_to_rect` and the fold tests without another conversion.

use std::cmp::Ordering;

use super::types::{Point2, Polygon, EPSILON};

#[inline]
fn turn(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).perp(&(c - a))
}

fn lexicographic(a: &Point2, b: &Point2) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// One half of the hull: keeps only strict left turns while walking `points`.
/// The last point is left off; it opens the other half.
fn half_chain<'a>(points: impl Iterator<Item = &'a Point2>) -> Vec<Point2> {
    let mut chain: Vec<Point2> = Vec::new();
    for &p in points {
        while let Some(&[a, b]) = chain.last_chunk::<2>() {
            if turn(a, b, p) > 0.0 {
                break;
            }
            chain.pop();
        }
        chain.push(p);
    }
    chain.pop();
    chain
}

/// Counter-clockwise convex hull (monotone chain), collinear points dropped.
///
/// None when fewer than three non-collinear points remain.
pub fn convex_hull(points: &[Point2]) -> Option<Polygon> {
    let mut sorted = points.to_vec();
    sorted.sort_by(lexicographic);
    sorted.dedup_by(|a, b| (*a - *b).norm() < EPSILON);
    if sorted.len() < 3 {
        return None;
    }
    let mut hull = half_chain(sorted.iter());
    hull.extend(half_chain(sorted.iter().rev()));
    (hull.len() >= 3).then(|| Polygon::new(hull))
}
