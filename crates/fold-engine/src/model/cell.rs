//! Grid slot composed of one or more pieces.

use std::collections::BTreeSet;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::grid::GridCoord;
use super::piece::{CellType, PieceArena, PieceId};
use crate::geom2::{Point2, Polygon};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct CellEntry {
    id: PieceId,
    cell_type: CellType,
}

/// An addressable grid slot holding an ordered list of pieces.
///
/// Invariants:
/// - Entries keep insertion order; order carries no meaning beyond determinism.
/// - `dominant` is recomputed on every `add_piece`/`remove_piece`.
/// - Inside a `Grid`, a cell is never empty (the grid removes it instead).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    coord: GridCoord,
    size: f64,
    entries: Vec<CellEntry>,
    dominant: CellType,
}

impl Cell {
    pub fn new(coord: GridCoord, size: f64) -> Self {
        Self {
            coord,
            size,
            entries: Vec::new(),
            dominant: CellType::Empty,
        }
    }

    #[inline]
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Lower-left corner of the cell square in world units.
    #[inline]
    pub fn origin(&self) -> Point2 {
        Vector2::new(self.coord.x as f64 * self.size, self.coord.y as f64 * self.size)
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.origin() + Vector2::new(self.size * 0.5, self.size * 0.5)
    }

    /// The full cell square, counter-clockwise.
    pub fn square(&self) -> Polygon {
        let min = self.origin();
        Polygon::rect(min, min + Vector2::new(self.size, self.size))
    }

    pub fn add_piece(&mut self, id: PieceId, cell_type: CellType) {
        self.entries.push(CellEntry { id, cell_type });
        self.refresh_dominant();
    }

    /// Returns false (and changes nothing) if `id` is not in this cell.
    pub fn remove_piece(&mut self, id: PieceId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(pos);
        self.refresh_dominant();
        true
    }

    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    #[inline]
    pub fn contains_piece(&self, id: PieceId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn types(&self) -> BTreeSet<CellType> {
        self.entries.iter().map(|e| e.cell_type).collect()
    }

    #[inline]
    pub fn has_type(&self, t: CellType) -> bool {
        self.entries.iter().any(|e| e.cell_type == t)
    }

    /// Highest-priority type present: Goal > Wall > Water > Empty.
    #[inline]
    pub fn dominant_type(&self) -> CellType {
        self.dominant
    }

    fn refresh_dominant(&mut self) {
        self.dominant = self.resolve_dominant();
    }

    fn resolve_dominant(&self) -> CellType {
        CellType::PRIORITY
            .into_iter()
            .find(|&t| self.has_type(t))
            .unwrap_or(CellType::Empty)
    }

    /// Cached entry types match the arena and `dominant` matches the entries.
    ///
    /// Only a deserialized cell can fail this.
    pub(crate) fn types_in_sync(&self, pieces: &PieceArena) -> bool {
        let entries_match = self
            .entries
            .iter()
            .all(|e| pieces.get(e.id).is_some_and(|p| p.cell_type == e.cell_type));
        entries_match && self.dominant == self.resolve_dominant()
    }

    pub fn total_area(&self, pieces: &PieceArena) -> f64 {
        self.piece_ids()
            .filter_map(|id| pieces.get(id))
            .map(|p| p.area())
            .sum()
    }

    /// Area-weighted mean of piece centroids.
    ///
    /// Zero total area falls back to the first piece's centroid, or to the cell
    /// origin when the cell has no pieces.
    pub fn weighted_centroid(&self, pieces: &PieceArena) -> Point2 {
        let mut area = 0.0;
        let mut acc = Point2::zeros();
        let mut first: Option<Point2> = None;
        for piece in self.piece_ids().filter_map(|id| pieces.get(id)) {
            let a = piece.area();
            let c = piece.centroid();
            first.get_or_insert(c);
            area += a;
            acc += c * a;
        }
        if area > 0.0 {
            acc / area
        } else {
            first.unwrap_or_else(|| self.origin())
        }
    }
}
