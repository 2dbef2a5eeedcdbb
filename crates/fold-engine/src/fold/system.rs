//! `FoldSystem`: the stateful orchestrator over grid, history and snapshots.

use tracing::{debug, info, warn};

use super::history::FoldHistory;
use super::plan::plan_fold;
use super::types::{FoldEvent, FoldId, FoldRecord, PendingFold, Seam, SeamHit, UnfoldBlocker};
use crate::cfg::FoldCfg;
use crate::error::{FoldError, Result};
use crate::geom2::Point2;
use crate::model::{Cell, CellPiece, CellType, Grid, GridCoord, LevelLayout, PieceId};
use crate::player::PlayerAgent;
use crate::snapshot::{ActionKind, GameSnapshot, PlayerSnapshot};

/// Owns the live grid and fold history; the single writer of both.
///
/// Every mutating call either completes fully or returns an error without having
/// touched anything. Notifications are queued and handed out by `drain_events`.
#[derive(Debug)]
pub struct FoldSystem {
    cfg: FoldCfg,
    grid: Grid,
    history: FoldHistory,
    player_cell: Option<GridCoord>,
    revision: u64,
    events: Vec<FoldEvent>,
}

impl FoldSystem {
    pub fn new(grid: Grid, cfg: FoldCfg) -> Self {
        Self {
            cfg,
            grid,
            history: FoldHistory::new(),
            player_cell: None,
            revision: 0,
            events: Vec::new(),
        }
    }

    /// Seed a grid from `layout` and place the player at its start cell.
    pub fn from_layout(layout: &LevelLayout, cfg: FoldCfg) -> Result<Self> {
        let grid = Grid::from_layout(layout)?;
        info!(
            cells = grid.cell_count(),
            cell_size = grid.cell_size(),
            "level seeded"
        );
        let mut system = Self::new(grid, cfg);
        system.player_cell = Some(layout.player_start);
        Ok(system)
    }

    #[inline]
    pub fn cfg(&self) -> &FoldCfg {
        &self.cfg
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
    pub fn get_cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.grid.get_cell(coord)
    }

    /// Counter bumped by every grid/history mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn player_cell(&self) -> Option<GridCoord> {
        self.player_cell
    }

    pub fn set_player_cell(&mut self, cell: Option<GridCoord>) {
        self.player_cell = cell;
    }

    /// Position-changed notification from the player.
    pub fn on_player_moved(&mut self, old: GridCoord, new: GridCoord) {
        debug!(%old, %new, "player moved");
        self.player_cell = Some(new);
    }

    // ---- queries for the player -------------------------------------------------

    /// Cell whose square contains `point`, if that cell exists.
    pub fn cell_at(&self, point: Point2) -> Option<GridCoord> {
        let coord = self.grid.coord_at(point);
        self.grid.contains(coord).then_some(coord)
    }

    /// Missing cells and wall-dominated cells block movement.
    pub fn is_blocked(&self, coord: GridCoord) -> bool {
        self.grid
            .dominant_type(coord)
            .is_none_or(CellType::is_solid)
    }

    pub fn is_goal(&self, coord: GridCoord) -> bool {
        self.grid.dominant_type(coord) == Some(CellType::Goal)
    }

    // ---- folding ----------------------------------------------------------------

    /// Validate and compute a fold without applying it.
    pub fn begin_fold(&self, a: GridCoord, b: GridCoord) -> Result<PendingFold> {
        let id = self.history.peek_next_id();
        plan_fold(&self.grid, &self.cfg, id, self.revision, a, b).inspect_err(|err| {
            warn!(anchor_a = %a, anchor_b = %b, %err, "fold rejected");
        })
    }

    /// Apply a pending fold computed against the current revision.
    pub fn commit_fold(&mut self, pending: PendingFold) -> Result<FoldId> {
        if pending.revision != self.revision || pending.record.id != self.history.peek_next_id() {
            warn!(
                pending = pending.revision,
                current = self.revision,
                "stale pending fold"
            );
            return Err(FoldError::StalePendingFold);
        }
        let PendingFold {
            record, rewrites, merges, ..
        } = pending;

        for rewrite in rewrites {
            for piece in rewrite.add {
                self.add_piece(rewrite.coord, piece);
            }
            for id in rewrite.remove {
                self.remove_piece(rewrite.coord, id);
            }
        }
        for (coord, piece) in merges {
            self.add_piece(coord, piece);
        }

        let id = record.id;
        info!(
            fold = %id,
            anchor_a = %record.anchor_a,
            anchor_b = %record.anchor_b,
            orientation = ?record.orientation,
            captured = record.captures.len(),
            merged = record.merged_into.len(),
            created = record.created.len(),
            "fold committed"
        );
        self.events.push(FoldEvent::FoldCompleted {
            fold_id: id,
            anchor_a: record.anchor_a,
            anchor_b: record.anchor_b,
            orientation: record.orientation,
        });
        self.history.push(record);
        self.revision += 1;
        Ok(id)
    }

    /// Fold along the line through the centers of `a` and `b` (begin + commit).
    pub fn execute_fold(&mut self, a: GridCoord, b: GridCoord) -> Result<FoldId> {
        let pending = self.begin_fold(a, b)?;
        self.commit_fold(pending)
    }

    // ---- unfolding --------------------------------------------------------------

    /// Ok when `id` exists and nothing blocks reversing it.
    pub fn can_unfold(&self, id: FoldId) -> Result<()> {
        if !self.history.contains(id) {
            return Err(FoldError::UnknownFold(id));
        }
        match self.history.blocker(id, self.player_cell) {
            Some(blocker) => Err(FoldError::UnfoldBlocked { fold: id, blocker }),
            None => Ok(()),
        }
    }

    /// Geometrically reverse fold `id` and drop it from the history.
    pub fn unfold_seam(&mut self, id: FoldId) -> Result<()> {
        if let Err(err) = self.can_unfold(id) {
            warn!(fold = %id, %err, "unfold rejected");
            return Err(err);
        }
        let Some(record) = self.history.remove(id) else {
            return Err(FoldError::UnknownFold(id));
        };
        self.reverse(&record);

        info!(
            fold = %id,
            restored = record.captures.len(),
            "fold reversed"
        );
        self.events.push(FoldEvent::FoldReversed {
            fold_id: id,
            anchor_a: record.anchor_a,
            anchor_b: record.anchor_b,
            orientation: record.orientation,
        });
        self.revision += 1;
        Ok(())
    }

    fn reverse(&mut self, record: &FoldRecord) {
        for &coord in &record.merged_into {
            let produced: Vec<PieceId> = self
                .grid
                .pieces_of(coord)
                .filter(|(_, p)| p.source_fold == Some(record.id))
                .map(|(pid, _)| pid)
                .collect();
            for pid in produced {
                self.remove_piece(coord, pid);
            }
        }
        for capture in &record.captures {
            for (pid, _) in self.grid.take_cell(capture.coord) {
                self.events.push(FoldEvent::PieceRemoved {
                    coord: capture.coord,
                    piece: pid,
                });
            }
            for piece in &capture.pieces {
                self.add_piece(capture.coord, piece.clone());
            }
        }
    }

    // ---- seams ------------------------------------------------------------------

    pub fn seams(&self) -> impl Iterator<Item = &Seam> {
        self.history.seams()
    }

    /// Nearest seam within the pick radius of `point`; ties go to the later fold.
    pub fn detect_seam_click(&self, point: Point2) -> Option<SeamHit> {
        let radius = self.cfg.pick_radius(self.grid.cell_size());
        let mut best: Option<(&Seam, f64)> = None;
        for seam in self.history.seams() {
            let d = seam.distance_to(point);
            if d > radius {
                continue;
            }
            if best.is_none_or(|(_, bd)| d <= bd) {
                best = Some((seam, d));
            }
        }
        let (seam, distance) = best?;
        let blocker: Option<UnfoldBlocker> = self.history.blocker(seam.fold_id, self.player_cell);
        Some(SeamHit {
            fold_id: seam.fold_id,
            can_undo: blocker.is_none(),
            blocker,
            distance,
        })
    }

    // ---- snapshots --------------------------------------------------------------

    /// Deep copy of grid, history and player state.
    pub fn create_game_snapshot(
        &self,
        player: &impl PlayerAgent,
        action: ActionKind,
        summary: impl Into<String>,
    ) -> GameSnapshot {
        GameSnapshot::new(
            action,
            summary.into(),
            self.grid.clone(),
            self.history.clone(),
            PlayerSnapshot {
                position: player.grid_position(),
                flags: player.flags(),
            },
        )
    }

    /// Replace grid and history wholesale and reposition the player.
    ///
    /// A malformed snapshot is rejected before anything changes.
    pub fn restore_from_snapshot(
        &mut self,
        snapshot: GameSnapshot,
        player: &mut impl PlayerAgent,
    ) -> Result<()> {
        if let Err(err) = snapshot.validate() {
            warn!(%err, "refusing to restore snapshot");
            return Err(err);
        }
        let (action, summary, grid, history, saved) = snapshot.into_parts();
        self.grid = grid;
        self.history.replace_with(history);
        player.restore(saved.position, saved.flags);
        self.player_cell = Some(saved.position);
        self.revision += 1;
        info!(
            ?action,
            %summary,
            folds = self.history.len(),
            cells = self.grid.cell_count(),
            "state restored"
        );
        self.events.push(FoldEvent::StateRestored { summary });
        Ok(())
    }

    // ---- events -----------------------------------------------------------------

    /// Take all notifications queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<FoldEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn add_piece(&mut self, coord: GridCoord, piece: CellPiece) -> PieceId {
        let id = self.grid.add_piece(coord, piece);
        self.events.push(FoldEvent::PieceAdded { coord, piece: id });
        id
    }

    fn remove_piece(&mut self, coord: GridCoord, id: PieceId) {
        if self.grid.remove_piece(coord, id).is_some() {
            self.events.push(FoldEvent::PieceRemoved { coord, piece: id });
        }
    }
}
