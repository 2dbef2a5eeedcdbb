//! Data types for fold records, seams, notifications and pending folds.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom2::{distance_to_segment, segments_intersect, Line2, Point2, EPSILON};
use crate::model::{CellPiece, GridCoord, PieceId};

/// Fold identifier; strictly increasing, never recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoldId(pub u32);

impl fmt::Display for FoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Orientation of a fold line relative to the grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldOrientation {
    /// Anchors share a row.
    Horizontal,
    /// Anchors share a column.
    Vertical,
    Diagonal,
}

impl FoldOrientation {
    pub fn between(a: GridCoord, b: GridCoord) -> Self {
        if a.y == b.y {
            FoldOrientation::Horizontal
        } else if a.x == b.x {
            FoldOrientation::Vertical
        } else {
            FoldOrientation::Diagonal
        }
    }
}

/// Boundary segment left behind by a fold; clicking it requests an unfold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seam {
    pub fold_id: FoldId,
    pub start: Point2,
    pub end: Point2,
    pub orientation: FoldOrientation,
}

impl Seam {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[inline]
    pub fn distance_to(&self, p: Point2) -> f64 {
        distance_to_segment(p, self.start, self.end)
    }

    /// Proper crossing of the two seam segments (shared endpoints do not count).
    #[inline]
    pub fn crosses(&self, other: &Seam) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }
}

/// Pre-fold contents of a cell the fold split or emptied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellCapture {
    pub coord: GridCoord,
    pub pieces: Vec<CellPiece>,
}

/// Everything needed to describe and reverse one fold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoldRecord {
    pub id: FoldId,
    pub anchor_a: GridCoord,
    pub anchor_b: GridCoord,
    pub line: Line2,
    pub orientation: FoldOrientation,
    pub seam: Seam,
    /// Cells whose pieces were split or moved, with their pre-fold contents.
    pub captures: Vec<CellCapture>,
    /// Cells that received mirrored pieces (including `created`).
    pub merged_into: Vec<GridCoord>,
    /// Cells that did not exist before the fold.
    pub created: Vec<GridCoord>,
    /// Cells holding a fragment bounded by this fold's line.
    pub seam_cells: Vec<GridCoord>,
}

impl FoldRecord {
    /// Every cell this fold rewrote, and so every cell its reversal rewrites.
    pub fn region(&self) -> BTreeSet<GridCoord> {
        self.captures
            .iter()
            .map(|c| c.coord)
            .chain(self.merged_into.iter().copied())
            .chain(self.created.iter().copied())
            .collect()
    }

    /// True when `other` crosses this fold's seam or rewrote any of the same cells.
    pub fn overlaps(&self, other: &FoldRecord) -> bool {
        if self.seam.crosses(&other.seam) {
            return true;
        }
        let mine = self.region();
        other.region().iter().any(|c| mine.contains(c))
    }
}

/// Why a seam cannot currently be unfolded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnfoldBlocker {
    /// A later fold crosses this seam or rewrote one of its cells.
    LaterFold(FoldId),
    /// The player stands in a cell the unfold would rewrite.
    PlayerInTheWay(GridCoord),
}

impl fmt::Display for UnfoldBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnfoldBlocker::LaterFold(id) => write!(f, "blocked by later fold {id}"),
            UnfoldBlocker::PlayerInTheWay(c) => write!(f, "player is standing in cell {c}"),
        }
    }
}

/// Result of a seam pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeamHit {
    pub fold_id: FoldId,
    pub can_undo: bool,
    pub blocker: Option<UnfoldBlocker>,
    pub distance: f64,
}

/// Notifications for presentation and snapshot glue, drained once per tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FoldEvent {
    PieceAdded {
        coord: GridCoord,
        piece: PieceId,
    },
    PieceRemoved {
        coord: GridCoord,
        piece: PieceId,
    },
    FoldCompleted {
        fold_id: FoldId,
        anchor_a: GridCoord,
        anchor_b: GridCoord,
        orientation: FoldOrientation,
    },
    FoldReversed {
        fold_id: FoldId,
        anchor_a: GridCoord,
        anchor_b: GridCoord,
        orientation: FoldOrientation,
    },
    StateRestored {
        summary: String,
    },
}

/// Change to one captured cell: pieces leaving it and stationary fragments replacing them.
#[derive(Clone, Debug)]
pub(crate) struct CellRewrite {
    pub coord: GridCoord,
    pub remove: Vec<PieceId>,
    pub add: Vec<CellPiece>,
}

/// A fold computed by `FoldSystem::begin_fold`, not yet applied.
///
/// Valid only against the state revision it was computed from; `PieceId`s inside
/// refer to that state.
#[derive(Clone, Debug)]
pub struct PendingFold {
    pub(crate) revision: u64,
    pub(crate) record: FoldRecord,
    pub(crate) rewrites: Vec<CellRewrite>,
    /// Mirrored fragments appended to destination cells, in merge order.
    pub(crate) merges: Vec<(GridCoord, CellPiece)>,
}

impl PendingFold {
    #[inline]
    pub fn fold_id(&self) -> FoldId {
        self.record.id
    }

    #[inline]
    pub fn record(&self) -> &FoldRecord {
        &self.record
    }

    /// Cells that will be rewritten when committed.
    pub fn affected_cells(&self) -> BTreeSet<GridCoord> {
        self.record.region()
    }

    #[inline]
    pub fn merge_count(&self) -> usize {
        self.merges.len()
    }
}
