//! Curated API surface (unstable).
//!
//! - Convenience re-exports for the CLI, benches and examples.
//! - Prefer these over deep module paths so internal moves do not ripple outward.

// 2D geometry
pub use crate::geom2::{
    clip_to_rect, convex_hull, distance_to_segment, line_rect_chord, point_in_polygon,
    polygon_area, polygon_centroid, segment_line_intersection, segments_intersect,
    side_of_line, split_by, split_polygon_by_line, validate_polygon, Line2, Point2, Polygon,
    Side, SplitResult, EPSILON,
};
// Random convex polygons
pub use crate::geom2::rand::{
    draw_convex_polygon, draw_line_through, ConvexCfg, ReplayToken as PolyReplay, Sides,
};
// Piece/cell model
pub use crate::model::{
    Cell, CellPiece, CellType, Grid, GridCoord, LevelLayout, PieceArena, PieceId,
};
// Folding
pub use crate::fold::{
    CellCapture, FoldEvent, FoldHistory, FoldId, FoldOrientation, FoldRecord, FoldSystem,
    PendingFold, Seam, SeamHit, UnfoldBlocker,
};
// Player, snapshots and session glue
pub use crate::player::{
    Direction, MoveOutcome, PlayerAgent, PlayerEvent, PlayerFlags, PlayerState,
};
pub use crate::session::{GameSession, TickEvents};
pub use crate::snapshot::{ActionKind, GameSnapshot, PlayerSnapshot, SnapshotHistory};
pub use crate::{FoldCfg, FoldError};
