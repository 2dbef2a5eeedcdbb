//! Player state as seen by the fold engine: a grid position, two flags and moves
//! validated against the live grid.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fold::FoldSystem;
use crate::model::GridCoord;

/// Per-player flags captured in snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFlags {
    pub input_enabled: bool,
    pub goal_reached: bool,
}

impl Default for PlayerFlags {
    fn default() -> Self {
        Self {
            input_enabled: true,
            goal_reached: false,
        }
    }
}

/// What snapshot capture and restore need from a player.
pub trait PlayerAgent {
    fn grid_position(&self) -> GridCoord;
    fn flags(&self) -> PlayerFlags;
    /// Teleport to `position` and overwrite the flags; no movement notification.
    fn restore(&mut self, position: GridCoord, flags: PlayerFlags);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid step; `Up` is +y.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    PositionChanged { old: GridCoord, new: GridCoord },
    GoalReached { at: GridCoord },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: GridCoord, to: GridCoord },
    Blocked { target: GridCoord },
    InputDisabled,
}

impl MoveOutcome {
    #[inline]
    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Minimal player: position, flags and a queue of notifications.
#[derive(Clone, Debug, Default)]
pub struct PlayerState {
    position: GridCoord,
    flags: PlayerFlags,
    events: VecDeque<PlayerEvent>,
}

impl PlayerState {
    pub fn new(position: GridCoord) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[inline]
    pub fn position(&self) -> GridCoord {
        self.position
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.flags.input_enabled = enabled;
    }

    #[inline]
    pub fn goal_reached(&self) -> bool {
        self.flags.goal_reached
    }

    /// Step one cell unless input is disabled or the target is blocked.
    ///
    /// Entering a goal cell sets `goal_reached` and disables input.
    pub fn try_move(&mut self, dir: Direction, system: &FoldSystem) -> MoveOutcome {
        if !self.flags.input_enabled {
            return MoveOutcome::InputDisabled;
        }
        let (dx, dy) = dir.delta();
        let target = self.position.offset(dx, dy);
        if system.is_blocked(target) {
            debug!(from = %self.position, %target, "move blocked");
            return MoveOutcome::Blocked { target };
        }
        let from = self.position;
        self.position = target;
        self.events.push_back(PlayerEvent::PositionChanged {
            old: from,
            new: target,
        });
        if system.is_goal(target) {
            info!(at = %target, "goal reached");
            self.flags.goal_reached = true;
            self.flags.input_enabled = false;
            self.events.push_back(PlayerEvent::GoalReached { at: target });
        }
        MoveOutcome::Moved { from, to: target }
    }

    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain(..).collect()
    }
}

impl PlayerAgent for PlayerState {
    fn grid_position(&self) -> GridCoord {
        self.position
    }

    fn flags(&self) -> PlayerFlags {
        self.flags
    }

    fn restore(&mut self, position: GridCoord, flags: PlayerFlags) {
        self.position = position;
        self.flags = flags;
    }
}
