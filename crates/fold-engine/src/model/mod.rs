//! Piece/cell data model.
//!
//! Purpose
//! - `CellPiece`: one typed polygon with fold provenance and bounding seams.
//! - `Cell`: ordered piece ids plus aggregate queries (types, dominant type, area,
//!   weighted centroid).
//! - `Grid`: coordinate → cell map that owns every piece through a `PieceArena`.
//!
//! Code cross-refs: `crate::geom2::Polygon`, `crate::fold::FoldSystem`

mod cell;
mod grid;
mod piece;

pub use cell::Cell;
pub use grid::{Grid, GridCoord, LevelLayout};
pub use piece::{CellPiece, CellType, PieceArena, PieceId};
