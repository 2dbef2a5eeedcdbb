//! Seeded random convex polygons and cutting lines.
//!
//! Purpose
//! - Deterministic inputs for the split/clip property tests and the geometry benches.
//!
//! Model
//! - `n` angles spaced evenly around a circle, each jittered by a bounded fraction of
//!   the spacing; each radius jittered around `radius`. The convex hull of the result
//!   is translated to `center`.
//! - A `ReplayToken { seed, index }` picks one reproducible draw out of a stream.
//!
//! Code cross-refs: `util::convex_hull`, `polygon::split_polygon_by_line`

use std::f64::consts::TAU;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Line2, Point2, Polygon};
use super::util::convex_hull;

/// Number of sides to draw. Values below 3 are raised to 3.
#[derive(Clone, Copy, Debug)]
pub enum Sides {
    Exactly(usize),
    /// Uniform over the inclusive range.
    Between(usize, usize),
}

impl Sides {
    fn draw(self, rng: &mut StdRng) -> usize {
        match self {
            Sides::Exactly(n) => n.max(3),
            Sides::Between(lo, hi) => {
                let lo = lo.max(3);
                rng.gen_range(lo..=hi.max(lo))
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ConvexCfg {
    pub sides: Sides,
    /// Fraction of the angular spacing; clamped to [0, 0.49] so angles stay ordered.
    pub angle_jitter: f64,
    /// Relative radius jitter; clamped to [0, 0.9].
    pub radius_jitter: f64,
    pub radius: f64,
    pub center: Point2,
}

impl Default for ConvexCfg {
    fn default() -> Self {
        Self {
            sides: Sides::Exactly(8),
            angle_jitter: 0.3,
            radius_jitter: 0.25,
            radius: 50.0,
            center: Point2::zeros(),
        }
    }
}

/// Reproducible handle on one draw: same token, same polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    fn rng(self) -> StdRng {
        const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;
        let stream = self.index.wrapping_add(1).wrapping_mul(GOLDEN);
        StdRng::seed_from_u64(self.seed.rotate_left(29) ^ stream)
    }
}

/// Counter-clockwise convex polygon, or None if the hull collapses.
pub fn draw_convex_polygon(cfg: ConvexCfg, tok: ReplayToken) -> Option<Polygon> {
    let mut rng = tok.rng();
    let n = cfg.sides.draw(&mut rng);
    let spacing = TAU / n as f64;
    let angle_jitter = cfg.angle_jitter.clamp(0.0, 0.49) * spacing;
    let radius_jitter = cfg.radius_jitter.clamp(0.0, 0.9);
    let radius = cfg.radius.max(1e-3);
    let phase = rng.gen_range(0.0..TAU);

    let mut points = Vec::with_capacity(n);
    for k in 0..n {
        let theta = phase + k as f64 * spacing + rng.gen_range(-1.0f64..=1.0) * angle_jitter;
        let r = radius * (1.0 + rng.gen_range(-1.0f64..=1.0) * radius_jitter);
        points.push(cfg.center + Vector2::new(theta.cos(), theta.sin()) * r);
    }
    convex_hull(&points)
}

/// Line through the interior of `polygon`: anchored between the centroid and a random
/// vertex, with a uniformly random normal.
pub fn draw_line_through(polygon: &Polygon, tok: ReplayToken) -> Option<Line2> {
    if polygon.is_degenerate() {
        return None;
    }
    let mut rng = tok.rng();
    let centroid = polygon.centroid();
    let vertex = polygon.vertices[rng.gen_range(0..polygon.len())];
    let anchor = centroid + (vertex - centroid) * rng.gen_range(0.0f64..0.8);
    let theta = rng.gen_range(0.0..TAU);
    Line2::new(anchor, Vector2::new(theta.cos(), theta.sin()))
}
