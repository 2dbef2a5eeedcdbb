//! FoldSystem: fold transactions, seams, unfold legality and state snapshots.
//!
//! Purpose
//! - `begin_fold` computes a fold (split, mirror, clip-into-destination) without
//!   mutating; `commit_fold` applies it atomically and records a `FoldRecord`.
//! - `unfold_seam` reverses one recorded fold when no later fold overlaps it and the
//!   player is not standing next to its seam.
//! - Snapshots capture grid, history and player state for undo.
//!
//! Assumptions and conventions
//! - The fold line runs through both anchor centers with the normal to the left of a→b.
//!   The Positive side stays put; the Negative side is mirrored onto it.
//! - Mirrored pieces are appended to destination cells, never unioned; each carries
//!   the fold id as `source_fold`.
//! - A fold's region is every cell it rewrote. A later fold whose seam crosses this
//!   one, or whose region shares a cell, blocks unfolding it.
//! - Fold ids start at 1 and are never reused, including across snapshot restores.
//!
//! Code cross-refs: `crate::geom2::split_by`, `crate::model::Grid`,
//! `crate::snapshot::SnapshotHistory`

mod history;
mod plan;
mod system;
mod types;

pub use history::FoldHistory;
pub use system::FoldSystem;
pub use types::{
    CellCapture, FoldEvent, FoldId, FoldOrientation, FoldRecord, PendingFold, Seam, SeamHit,
    UnfoldBlocker,
};

#[cfg(test)]
mod tests;
