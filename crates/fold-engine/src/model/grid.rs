//! Grid addressing, level seeding and piece ownership.
//!
//! Conventions
//! - Cell `(x, y)` covers `[x·s, (x+1)·s] × [y·s, (y+1)·s]` for cell size `s`.
//! - Cells are kept in a `BTreeMap` so every traversal is ordered by `(x, y)`.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use super::cell::Cell;
use super::piece::{CellPiece, CellType, PieceArena, PieceId};
use crate::error::{FoldError, Result};
use crate::geom2::Point2;

/// Integer grid address.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Initial level description consumed once to seed single-piece cells.
///
/// Cells not listed in `cells` are `Empty`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub width: i32,
    pub height: i32,
    pub cell_size: f64,
    pub player_start: GridCoord,
    #[serde(default)]
    pub cells: Vec<(GridCoord, CellType)>,
}

impl LevelLayout {
    /// All-empty layout.
    pub fn empty(width: i32, height: i32, cell_size: f64) -> Self {
        Self {
            width,
            height,
            cell_size,
            player_start: GridCoord::new(0, 0),
            cells: Vec::new(),
        }
    }

    pub fn with_cell(mut self, coord: GridCoord, cell_type: CellType) -> Self {
        self.cells.push((coord, cell_type));
        self
    }

    #[inline]
    pub fn in_bounds(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    /// Structural checks; a missing goal only logs a warning.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(FoldError::InvalidLayout(format!(
                "grid size must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(FoldError::InvalidLayout(format!(
                "cell size must be positive (got {})",
                self.cell_size
            )));
        }
        if !self.in_bounds(self.player_start) {
            return Err(FoldError::InvalidLayout(format!(
                "player start {} is outside the grid",
                self.player_start
            )));
        }
        if let Some((c, _)) = self.cells.iter().find(|(c, _)| !self.in_bounds(*c)) {
            return Err(FoldError::InvalidLayout(format!("cell {c} is outside the grid")));
        }
        if !self.cells.iter().any(|(_, t)| *t == CellType::Goal) {
            warn!(width = self.width, height = self.height, "level has no goal cell");
        }
        Ok(())
    }
}

/// Live grid: cells by coordinate plus the arena owning their pieces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cell_size: f64,
    #[serde(with = "cells_as_list")]
    cells: BTreeMap<GridCoord, Cell>,
    pieces: PieceArena,
}

impl Grid {
    /// Empty grid; cells appear as pieces are added.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: BTreeMap::new(),
            pieces: PieceArena::new(),
        }
    }

    /// One full-square piece per cell of the layout.
    pub fn from_layout(layout: &LevelLayout) -> Result<Self> {
        layout.validate()?;
        let types: BTreeMap<GridCoord, CellType> = layout.cells.iter().copied().collect();
        let mut grid = Grid::new(layout.cell_size);
        for y in 0..layout.height {
            for x in 0..layout.width {
                let coord = GridCoord::new(x, y);
                let t = types.get(&coord).copied().unwrap_or(CellType::Empty);
                let square = Cell::new(coord, layout.cell_size).square();
                grid.add_piece(coord, CellPiece::new(square, t));
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn get_cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.keys().copied()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn pieces(&self) -> &PieceArena {
        &self.pieces
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&CellPiece> {
        self.pieces.get(id)
    }

    /// Pieces of one cell in insertion order.
    pub fn pieces_of(&self, coord: GridCoord) -> impl Iterator<Item = (PieceId, &CellPiece)> + '_ {
        self.cells
            .get(&coord)
            .into_iter()
            .flat_map(|cell| cell.piece_ids())
            .filter_map(|id| self.pieces.get(id).map(|p| (id, p)))
    }

    /// Cell whose square contains `p` (no existence check).
    pub fn coord_at(&self, p: Point2) -> GridCoord {
        GridCoord::new(
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// `(min, max)` corners of the square at `coord`.
    pub fn cell_rect(&self, coord: GridCoord) -> (Point2, Point2) {
        let s = self.cell_size;
        let min = Vector2::new(coord.x as f64 * s, coord.y as f64 * s);
        (min, min + Vector2::new(s, s))
    }

    pub fn cell_center(&self, coord: GridCoord) -> Point2 {
        let (min, max) = self.cell_rect(coord);
        (min + max) * 0.5
    }

    /// Bounding rectangle of all cell squares.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let mut it = self.cells.keys();
        let first = *it.next()?;
        let (mut lo, mut hi) = (first, first);
        for c in it {
            lo = GridCoord::new(lo.x.min(c.x), lo.y.min(c.y));
            hi = GridCoord::new(hi.x.max(c.x), hi.y.max(c.y));
        }
        Some((self.cell_rect(lo).0, self.cell_rect(hi).1))
    }

    /// Append `piece` to the cell at `coord`, creating the cell if needed.
    pub fn add_piece(&mut self, coord: GridCoord, piece: CellPiece) -> PieceId {
        let cell_type = piece.cell_type;
        let id = self.pieces.insert(piece);
        let size = self.cell_size;
        self.cells
            .entry(coord)
            .or_insert_with(|| Cell::new(coord, size))
            .add_piece(id, cell_type);
        id
    }

    /// Detach and return a piece; a cell left without pieces is removed.
    pub fn remove_piece(&mut self, coord: GridCoord, id: PieceId) -> Option<CellPiece> {
        let cell = self.cells.get_mut(&coord)?;
        if !cell.remove_piece(id) {
            return None;
        }
        if cell.is_empty() {
            self.cells.remove(&coord);
        }
        self.pieces.remove(id)
    }

    /// Remove a cell with all its pieces, returning them in insertion order.
    pub fn take_cell(&mut self, coord: GridCoord) -> Vec<(PieceId, CellPiece)> {
        let Some(cell) = self.cells.remove(&coord) else {
            return Vec::new();
        };
        cell.piece_ids()
            .filter_map(|id| self.pieces.remove(id).map(|p| (id, p)))
            .collect()
    }

    pub fn dominant_type(&self, coord: GridCoord) -> Option<CellType> {
        self.cells.get(&coord).map(Cell::dominant_type)
    }

    pub fn total_area(&self, coord: GridCoord) -> Option<f64> {
        self.cells.get(&coord).map(|c| c.total_area(&self.pieces))
    }

    pub fn weighted_centroid(&self, coord: GridCoord) -> Option<Point2> {
        self.cells.get(&coord).map(|c| c.weighted_centroid(&self.pieces))
    }

    /// Dominant type of every cell, ordered by coordinate.
    pub fn dominant_types(&self) -> BTreeMap<GridCoord, CellType> {
        self.cells
            .iter()
            .map(|(c, cell)| (*c, cell.dominant_type()))
            .collect()
    }

    /// Structural consistency: no empty cells, every referenced piece is live, cached
    /// cell types agree with the pieces, and every live piece belongs to one cell.
    pub fn check_consistency(&self) -> std::result::Result<(), &'static str> {
        if self.cells.is_empty() {
            return Err("grid has no cells");
        }
        let mut referenced = 0usize;
        for cell in self.cells.values() {
            if cell.is_empty() {
                return Err("grid contains an empty cell");
            }
            for id in cell.piece_ids() {
                if !self.pieces.contains(id) {
                    return Err("cell references a missing piece");
                }
                referenced += 1;
            }
            if !cell.types_in_sync(&self.pieces) {
                return Err("cell type cache disagrees with its pieces");
            }
        }
        if referenced != self.pieces.len() {
            return Err("piece ownership is inconsistent");
        }
        Ok(())
    }
}

/// Cells serialize as a list (each cell carries its coordinate) so JSON keys stay strings.
mod cells_as_list {
    use super::*;

    pub fn serialize<S: Serializer>(
        cells: &BTreeMap<GridCoord, Cell>,
        s: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        s.collect_seq(cells.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<BTreeMap<GridCoord, Cell>, D::Error> {
        let list = Vec::<Cell>::deserialize(d)?;
        Ok(list.into_iter().map(|c| (c.coord(), c)).collect())
    }
}
