//! `GameSession`: glue that snapshots every successful action and drives undo.
//!
//! The snapshot pushed for an action is the state captured right before it, so a
//! single `undo` returns exactly to where the action started.

use tracing::{debug, info};

use crate::cfg::FoldCfg;
use crate::error::Result;
use crate::fold::{FoldEvent, FoldId, FoldSystem};
use crate::geom2::Point2;
use crate::model::{GridCoord, LevelLayout};
use crate::player::{Direction, MoveOutcome, PlayerEvent, PlayerState};
use crate::snapshot::{ActionKind, SnapshotHistory};

/// Notifications drained in one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickEvents {
    pub fold: Vec<FoldEvent>,
    pub player: Vec<PlayerEvent>,
}

impl TickEvents {
    pub fn is_empty(&self) -> bool {
        self.fold.is_empty() && self.player.is_empty()
    }
}

#[derive(Debug)]
pub struct GameSession {
    system: FoldSystem,
    player: PlayerState,
    undo: SnapshotHistory,
}

impl GameSession {
    pub fn new(layout: &LevelLayout, cfg: FoldCfg) -> Result<Self> {
        let system = FoldSystem::from_layout(layout, cfg)?;
        Ok(Self {
            system,
            player: PlayerState::new(layout.player_start),
            undo: SnapshotHistory::with_limit(cfg.undo_limit),
        })
    }

    #[inline]
    pub fn system(&self) -> &FoldSystem {
        &self.system
    }

    #[inline]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    #[inline]
    pub fn undo_stack(&self) -> &SnapshotHistory {
        &self.undo
    }

    pub fn fold(&mut self, a: GridCoord, b: GridCoord) -> Result<FoldId> {
        let before = self.system.create_game_snapshot(
            &self.player,
            ActionKind::Fold,
            format!("fold {a} -> {b}"),
        );
        let id = self.system.execute_fold(a, b)?;
        self.undo.push(before);
        Ok(id)
    }

    pub fn unfold(&mut self, id: FoldId) -> Result<()> {
        let before =
            self.system
                .create_game_snapshot(&self.player, ActionKind::Unfold, format!("unfold {id}"));
        self.system.unfold_seam(id)?;
        self.undo.push(before);
        Ok(())
    }

    /// Seam click: unfold the picked seam when legal.
    ///
    /// `Ok(None)` when nothing is within pick range; a blocked seam is an error
    /// carrying the reason.
    pub fn click(&mut self, point: Point2) -> Result<Option<FoldId>> {
        let Some(hit) = self.system.detect_seam_click(point) else {
            debug!(x = point.x, y = point.y, "click hit no seam");
            return Ok(None);
        };
        self.unfold(hit.fold_id)?;
        Ok(Some(hit.fold_id))
    }

    pub fn move_player(&mut self, dir: Direction) -> MoveOutcome {
        let before = self.system.create_game_snapshot(
            &self.player,
            ActionKind::Move,
            format!("move {dir:?}"),
        );
        let outcome = self.player.try_move(dir, &self.system);
        if let MoveOutcome::Moved { from, to } = outcome {
            self.system.on_player_moved(from, to);
            self.undo.push(before);
        }
        outcome
    }

    /// Restore the state from before the most recent action.
    ///
    /// Returns the kind of action undone, or None when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<ActionKind>> {
        let Some(snapshot) = self.undo.pop() else {
            return Ok(None);
        };
        let action = snapshot.action();
        info!(%action, summary = snapshot.summary(), "undo");
        self.system.restore_from_snapshot(snapshot, &mut self.player)?;
        Ok(Some(action))
    }

    /// Drain queued notifications from the fold system and the player.
    pub fn tick(&mut self) -> TickEvents {
        TickEvents {
            fold: self.system.drain_events(),
            player: self.player.drain_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FoldError;
    use crate::fold::UnfoldBlocker;
    use crate::model::CellType;
    use nalgebra::vector;

    fn session(cfg: FoldCfg) -> GameSession {
        let mut layout =
            LevelLayout::empty(4, 4, 10.0).with_cell(GridCoord::new(3, 0), CellType::Goal);
        layout.player_start = GridCoord::new(0, 3);
        GameSession::new(&layout, cfg).unwrap()
    }

    #[test]
    fn undo_returns_to_state_before_each_action() {
        let mut s = session(FoldCfg::default());
        assert_eq!(s.undo(), Ok(None));
        let start = s.system().grid().clone();

        let id = s.fold(GridCoord::new(1, 0), GridCoord::new(1, 3)).unwrap();
        let folded = s.system().grid().clone();
        assert!(s.move_player(Direction::Down).moved());
        assert_eq!(s.undo_stack().len(), 2);

        assert_eq!(s.undo(), Ok(Some(ActionKind::Move)));
        assert_eq!(s.player().position(), GridCoord::new(0, 3));
        assert_eq!(s.system().player_cell(), Some(GridCoord::new(0, 3)));
        assert_eq!(s.system().grid(), &folded);

        assert_eq!(s.undo(), Ok(Some(ActionKind::Fold)));
        assert_eq!(s.system().grid(), &start);
        assert!(!s.system().history().contains(id));
        assert!(!s.undo_stack().can_undo());
    }

    #[test]
    fn failed_actions_push_nothing() {
        let mut s = session(FoldCfg::default());
        assert!(s.fold(GridCoord::new(1, 1), GridCoord::new(1, 1)).is_err());
        assert!(!s.move_player(Direction::Up).moved());
        assert!(s.undo_stack().is_empty());
    }

    #[test]
    fn click_unfolds_or_reports_the_blocker() {
        let mut s = session(FoldCfg::default());
        assert_eq!(s.click(vector![25.0, 20.0]), Ok(None));
        // x = 25 folds column 3 onto column 1; column 0 is untouched.
        let id = s.fold(GridCoord::new(2, 0), GridCoord::new(2, 3)).unwrap();

        // Walk into the column that received the mirrored pieces: (0, 3) -> (1, 3).
        assert!(s.move_player(Direction::Right).moved());
        assert_eq!(
            s.click(vector![25.0, 20.0]),
            Err(FoldError::UnfoldBlocked {
                fold: id,
                blocker: UnfoldBlocker::PlayerInTheWay(GridCoord::new(1, 3)),
            })
        );
        assert_eq!(s.undo_stack().len(), 2);
        assert!(s.move_player(Direction::Left).moved());
        assert_eq!(s.click(vector![25.0, 20.0]), Ok(Some(id)));
        assert!(s.system().history().is_empty());

        let events = s.tick();
        assert!(events
            .fold
            .iter()
            .any(|e| matches!(e, FoldEvent::FoldReversed { fold_id, .. } if *fold_id == id)));
        assert_eq!(events.player.len(), 2);
        assert!(s.tick().is_empty());
    }

    #[test]
    fn undo_limit_caps_the_stack() {
        let cfg = FoldCfg {
            undo_limit: Some(1),
            ..FoldCfg::default()
        };
        let mut s = session(cfg);
        assert!(s.move_player(Direction::Down).moved());
        assert!(s.move_player(Direction::Down).moved());
        assert_eq!(s.undo_stack().len(), 1);
        assert_eq!(s.undo(), Ok(Some(ActionKind::Move)));
        assert_eq!(s.player().position(), GridCoord::new(0, 2));
        assert_eq!(s.undo(), Ok(None));
    }
}
