use thiserror::Error;

use crate::fold::{FoldId, UnfoldBlocker};
use crate::model::GridCoord;

/// Every way a request against the fold engine can be refused.
///
/// No variant is produced after a mutation has started: a failed request leaves
/// the grid, history and snapshots untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FoldError {
    #[error("fold anchors must be two distinct cells")]
    AnchorsCoincide,
    #[error("anchor {0} is not a cell of the grid")]
    InvalidAnchor(GridCoord),
    #[error("fold line does not cross any cell")]
    NoCellsOnLine,
    #[error("fold would produce invalid geometry in cell {0}")]
    DegenerateGeometry(GridCoord),
    #[error("fold {0} is not in the history")]
    UnknownFold(FoldId),
    #[error("fold {fold} cannot be unfolded: {blocker}")]
    UnfoldBlocked { fold: FoldId, blocker: UnfoldBlocker },
    #[error("pending fold was computed against an outdated state")]
    StalePendingFold,
    #[error("snapshot is malformed: {0}")]
    MalformedSnapshot(&'static str),
    #[error("invalid level layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T> = std::result::Result<T, FoldError>;
