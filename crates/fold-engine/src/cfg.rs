//! Tunables of the fold system.
//!
//! The geometric epsilon is not here: it is the fixed `geom2::EPSILON`.

use serde::{Deserialize, Serialize};

/// Fold system configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldCfg {
    /// Seam pick radius as a fraction of the cell size.
    pub pick_tolerance: f64,
    /// Fragments smaller than this fraction of a cell's area are dropped as slivers.
    pub min_piece_area: f64,
    /// Maximum number of undo snapshots kept; oldest are dropped first.
    pub undo_limit: Option<usize>,
}

impl Default for FoldCfg {
    fn default() -> Self {
        Self {
            pick_tolerance: 0.25,
            min_piece_area: 1e-6,
            undo_limit: None,
        }
    }
}

impl FoldCfg {
    #[inline]
    pub fn pick_radius(&self, cell_size: f64) -> f64 {
        self.pick_tolerance * cell_size
    }

    #[inline]
    pub fn sliver_area(&self, cell_size: f64) -> f64 {
        self.min_piece_area * cell_size * cell_size
    }
}
