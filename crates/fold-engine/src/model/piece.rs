//! Typed polygon fragments and the arena that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fold::FoldId;
use crate::geom2::{Line2, Point2, Polygon};

/// Terrain tag of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Empty,
    Wall,
    Water,
    Goal,
}

impl CellType {
    /// Resolution order for a multi-piece cell's dominant type, highest first.
    pub const PRIORITY: [CellType; 4] =
        [CellType::Goal, CellType::Wall, CellType::Water, CellType::Empty];

    /// Legacy integer tags used by level files: 0 Empty, 1 Wall, 2 Water, 3 Goal.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellType::Empty),
            1 => Some(CellType::Wall),
            2 => Some(CellType::Water),
            3 => Some(CellType::Goal),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            CellType::Empty => 0,
            CellType::Wall => 1,
            CellType::Water => 2,
            CellType::Goal => 3,
        }
    }

    /// Impassable for the player.
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, CellType::Wall)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::Empty => "empty",
            CellType::Wall => "wall",
            CellType::Water => "water",
            CellType::Goal => "goal",
        };
        f.write_str(name)
    }
}

/// Arena index of a piece. Never reused within one arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub usize);

/// One typed polygon composing part of a cell.
///
/// Invariants:
/// - `polygon` lies inside the owning cell's square.
/// - `source_fold` is None for pieces seeded from the level.
/// - `seams` lists the folds whose lines bound this piece, oldest first, no duplicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPiece {
    pub polygon: Polygon,
    pub cell_type: CellType,
    pub source_fold: Option<FoldId>,
    pub seams: Vec<FoldId>,
}

impl CellPiece {
    pub fn new(polygon: Polygon, cell_type: CellType) -> Self {
        Self {
            polygon,
            cell_type,
            source_fold: None,
            seams: Vec::new(),
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    #[inline]
    pub fn centroid(&self) -> Point2 {
        self.polygon.centroid()
    }

    /// Same type, provenance and seams with a different outline.
    pub fn with_polygon(&self, polygon: Polygon) -> Self {
        Self {
            polygon,
            cell_type: self.cell_type,
            source_fold: self.source_fold,
            seams: self.seams.clone(),
        }
    }

    /// Record that `fold` bounds this piece.
    pub fn add_seam(&mut self, fold: FoldId) {
        if !self.seams.contains(&fold) {
            self.seams.push(fold);
        }
    }

    /// Mirror image across `line`; provenance is left to the caller.
    pub fn mirrored(&self, line: &Line2) -> Self {
        self.with_polygon(self.polygon.reflected(line))
    }
}

/// Owner of every live piece. Cells refer to pieces by `PieceId`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceArena {
    slots: Vec<Option<CellPiece>>,
    live: usize,
}

impl PieceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, piece: CellPiece) -> PieceId {
        let id = PieceId(self.slots.len());
        self.slots.push(Some(piece));
        self.live += 1;
        id
    }

    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&CellPiece> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn remove(&mut self, id: PieceId) -> Option<CellPiece> {
        let piece = self.slots.get_mut(id.0)?.take()?;
        self.live -= 1;
        Some(piece)
    }

    #[inline]
    pub fn contains(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live pieces.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &CellPiece)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (PieceId(i), p)))
    }
}
