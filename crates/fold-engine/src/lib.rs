//! Geometric fold engine for a grid-based 2D puzzle game.
//!
//! Layers, leaves first:
//! - `geom2`: stateless 2D primitives (side tests, intersections, split, clip).
//! - `model`: typed polygon pieces, multi-piece cells and the grid that owns them.
//! - `fold`: fold/unfold transactions, seams, fold history and snapshots.
//! - `snapshot`, `player`, `session`: undo stack, player predicates and the glue
//!   that ties them to a game loop.
//!
//! API Policy
//! - Crate-internal layout may change freely; `api` and `prelude` are the curated
//!   surfaces used by the CLI, benches and examples.

pub mod api;
pub mod cfg;
pub mod error;
pub mod fold;
pub mod geom2;
pub mod model;
pub mod player;
pub mod session;
pub mod snapshot;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::FoldCfg;
pub use error::{FoldError, Result};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::FoldCfg;
    pub use crate::error::{FoldError, Result};
    pub use crate::fold::{FoldEvent, FoldId, FoldOrientation, FoldSystem, SeamHit, UnfoldBlocker};
    pub use crate::geom2::{Line2, Point2, Polygon, Side};
    pub use crate::model::{CellType, GridCoord, LevelLayout};
    pub use crate::player::{Direction, MoveOutcome, PlayerAgent, PlayerState};
    pub use crate::session::GameSession;
    pub use crate::snapshot::{ActionKind, GameSnapshot, SnapshotHistory};
    pub use nalgebra::Vector2 as Vec2;
}
