//! Whole-state snapshots and the undo stack that holds them.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FoldError, Result};
use crate::fold::FoldHistory;
use crate::model::{Grid, GridCoord};
use crate::player::PlayerFlags;

/// Kind of action a snapshot was taken for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Move,
    Fold,
    Unfold,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Move => "move",
            ActionKind::Fold => "fold",
            ActionKind::Unfold => "unfold",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: GridCoord,
    pub flags: PlayerFlags,
}

/// Immutable, self-contained copy of grid, fold history and player state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    action: ActionKind,
    summary: String,
    grid: Grid,
    history: FoldHistory,
    player: PlayerSnapshot,
}

impl GameSnapshot {
    pub(crate) fn new(
        action: ActionKind,
        summary: String,
        grid: Grid,
        history: FoldHistory,
        player: PlayerSnapshot,
    ) -> Self {
        Self {
            action,
            summary,
            grid,
            history,
            player,
        }
    }

    #[inline]
    pub fn action(&self) -> ActionKind {
        self.action
    }

    #[inline]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn history(&self) -> &FoldHistory {
        &self.history
    }

    #[inline]
    pub fn player(&self) -> &PlayerSnapshot {
        &self.player
    }

    /// Structural checks run before a restore.
    pub fn validate(&self) -> Result<()> {
        self.grid
            .check_consistency()
            .map_err(FoldError::MalformedSnapshot)?;
        if !self.history.is_well_ordered() {
            return Err(FoldError::MalformedSnapshot("fold ids are not increasing"));
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (ActionKind, String, Grid, FoldHistory, PlayerSnapshot) {
        (
            self.action,
            self.summary,
            self.grid,
            self.history,
            self.player,
        )
    }
}

/// LIFO stack of snapshots, optionally capped (oldest entries dropped first).
#[derive(Clone, Debug, Default)]
pub struct SnapshotHistory {
    stack: VecDeque<GameSnapshot>,
    limit: Option<usize>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            stack: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, snapshot: GameSnapshot) {
        debug!(action = %snapshot.action, summary = %snapshot.summary, "snapshot pushed");
        self.stack.push_back(snapshot);
        if let Some(limit) = self.limit {
            while self.stack.len() > limit {
                self.stack.pop_front();
            }
        }
    }

    /// Hand the most recent snapshot back to the caller.
    pub fn pop(&mut self) -> Option<GameSnapshot> {
        self.stack.pop_back()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn peek(&self) -> Option<&GameSnapshot> {
        self.stack.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
