use super::*;
use crate::cfg::FoldCfg;
use crate::error::FoldError;
use crate::geom2::{Point2, Polygon};
use crate::model::{Cell, CellPiece, CellType, Grid, GridCoord, LevelLayout};
use crate::player::{PlayerAgent, PlayerFlags, PlayerState};
use crate::snapshot::ActionKind;
use nalgebra::vector;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn c(x: i32, y: i32) -> GridCoord {
    GridCoord::new(x, y)
}

/// 4×4 grid of 10-unit cells: a wall column at x=2, goal at (3, 3), player at (0, 3).
fn level() -> FoldSystem {
    let mut layout = LevelLayout::empty(4, 4, 10.0);
    layout.player_start = c(0, 3);
    for y in 0..4 {
        layout = layout.with_cell(c(2, y), CellType::Wall);
    }
    layout = layout.with_cell(c(3, 3), CellType::Goal);
    FoldSystem::from_layout(&layout, FoldCfg::default()).unwrap()
}

/// `level()` with the player off the board, so no cell is occupied.
fn unoccupied_level() -> FoldSystem {
    let mut sys = level();
    sys.set_player_cell(None);
    sys
}

/// 3×2 grid of empty 10-unit squares plus an extra wall piece in (2, 0).
fn level_with_wall_piece(vertices: Vec<Point2>) -> FoldSystem {
    let mut grid = Grid::new(10.0);
    for y in 0..2 {
        for x in 0..3 {
            let square = Cell::new(c(x, y), 10.0).square();
            grid.add_piece(c(x, y), CellPiece::new(square, CellType::Empty));
        }
    }
    grid.add_piece(c(2, 0), CellPiece::new(Polygon::new(vertices), CellType::Wall));
    FoldSystem::new(grid, FoldCfg::default())
}

fn total_area(sys: &FoldSystem) -> f64 {
    sys.grid()
        .coords()
        .filter_map(|coord| sys.grid().total_area(coord))
        .sum()
}

fn fingerprint(sys: &FoldSystem) -> (usize, BTreeMap<GridCoord, CellType>) {
    (sys.grid().piece_count(), sys.grid().dominant_types())
}

#[test]
fn vertical_fold_mirrors_right_half_onto_left() {
    let mut sys = level();
    let id = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    assert_eq!(id, FoldId(1));

    let grid = sys.grid();
    assert_eq!(grid.cell_count(), 12);
    assert_eq!(grid.piece_count(), 20);
    assert!(!grid.contains(c(2, 0)) && !grid.contains(c(3, 0)));
    // Column 3 hangs past the left edge.
    assert_eq!(grid.get_cell(c(-1, 3)).map(|cell| cell.len()), Some(1));
    // The goal lands on (-1, 3); the wall column lands on column 0.
    assert_eq!(grid.dominant_type(c(-1, 3)), Some(CellType::Goal));
    assert_eq!(grid.dominant_type(c(0, 1)), Some(CellType::Wall));
    assert_eq!(grid.dominant_type(c(1, 1)), Some(CellType::Empty));
    assert!(grid.check_consistency().is_ok());
    assert!((total_area(&sys) - 1600.0).abs() < 1e-6);

    let record = sys.history().get(id).unwrap();
    assert_eq!(record.orientation, FoldOrientation::Vertical);
    assert_eq!(record.captures.len(), 12);
    assert_eq!(record.created, vec![c(-1, 0), c(-1, 1), c(-1, 2), c(-1, 3)]);
    assert_eq!(record.seam_cells, vec![c(1, 0), c(1, 1), c(1, 2), c(1, 3)]);
    assert!((record.seam.start - vector![15.0, 0.0]).norm() < 1e-9);
    assert!((record.seam.end - vector![15.0, 40.0]).norm() < 1e-9);
}

#[test]
fn merged_pieces_carry_provenance_and_seams() {
    let mut sys = level();
    let id = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    let pieces: Vec<_> = sys.grid().pieces_of(c(1, 2)).map(|(_, p)| p.clone()).collect();
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].source_fold, None);
    assert_eq!(pieces[1].source_fold, Some(id));
    assert!(pieces.iter().all(|p| p.seams == vec![id]));
    assert!(pieces.iter().all(|p| (p.area() - 50.0).abs() < 1e-9));
    // Whole pieces moved from column 2 are not bounded by the seam.
    let moved: Vec<_> = sys.grid().pieces_of(c(0, 2)).map(|(_, p)| p.clone()).collect();
    assert_eq!(moved[1].source_fold, Some(id));
    assert!(moved[1].seams.is_empty());
}

#[test]
fn diagonal_fold_reflects_across_the_diagonal() {
    let layout = LevelLayout::empty(2, 2, 10.0).with_cell(c(1, 0), CellType::Water);
    let mut sys = FoldSystem::from_layout(&layout, FoldCfg::default()).unwrap();
    let id = sys.execute_fold(c(0, 0), c(1, 1)).unwrap();
    let record = sys.history().get(id).unwrap();
    assert_eq!(record.orientation, FoldOrientation::Diagonal);
    assert!(record.created.is_empty());

    let grid = sys.grid();
    assert!(!grid.contains(c(1, 0)));
    assert_eq!(grid.cell_count(), 3);
    assert_eq!(grid.piece_count(), 6);
    assert_eq!(grid.dominant_type(c(0, 1)), Some(CellType::Water));
    for coord in [c(0, 0), c(1, 1)] {
        assert!((grid.total_area(coord).unwrap() - 100.0).abs() < 1e-6);
    }
    assert!((total_area(&sys) - 400.0).abs() < 1e-6);
}

#[test]
fn rejected_folds_leave_state_untouched() {
    let mut sys = level();
    let before = fingerprint(&sys);
    let rev = sys.revision();
    assert_eq!(sys.execute_fold(c(1, 1), c(1, 1)), Err(FoldError::AnchorsCoincide));
    assert_eq!(sys.execute_fold(c(1, 1), c(9, 9)), Err(FoldError::InvalidAnchor(c(9, 9))));
    assert_eq!(fingerprint(&sys), before);
    assert_eq!(sys.revision(), rev);
    assert!(sys.history().is_empty());
    assert!(sys.drain_events().is_empty());
}

#[test]
fn refolding_on_an_empty_side_finds_no_cells() {
    let mut sys = level();
    sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    let before = fingerprint(&sys);
    // Everything now lies on the stationary side of x = 15.
    assert_eq!(sys.execute_fold(c(1, 0), c(1, 3)), Err(FoldError::NoCellsOnLine));
    assert_eq!(fingerprint(&sys), before);
    assert_eq!(sys.history().peek_next_id(), FoldId(2));
}

#[test]
fn fold_then_unfold_round_trips() {
    let mut sys = unoccupied_level();
    let before = fingerprint(&sys);
    let grid_before = sys.grid().clone();
    let id = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    sys.unfold_seam(id).unwrap();
    assert_eq!(fingerprint(&sys), before);
    assert!(!sys.history().contains(id));
    for coord in grid_before.coords() {
        let old: Vec<_> = grid_before.pieces_of(coord).map(|(_, p)| p.clone()).collect();
        let new: Vec<_> = sys.grid().pieces_of(coord).map(|(_, p)| p.clone()).collect();
        assert_eq!(old, new, "cell {coord}");
    }
    // Ids are not recycled.
    assert_eq!(sys.execute_fold(c(0, 1), c(1, 1)), Ok(FoldId(2)));
}

#[test]
fn later_fold_blocks_until_reversed() {
    let mut sys = unoccupied_level();
    let first = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    let second = sys.execute_fold(c(0, 1), c(1, 1)).unwrap();
    let seam = |id| sys.history().get(id).unwrap().seam;
    assert!(seam(first).crosses(&seam(second)));

    let before = fingerprint(&sys);
    assert_eq!(
        sys.unfold_seam(first),
        Err(FoldError::UnfoldBlocked {
            fold: first,
            blocker: UnfoldBlocker::LaterFold(second),
        })
    );
    assert_eq!(fingerprint(&sys), before);

    sys.unfold_seam(second).unwrap();
    sys.unfold_seam(first).unwrap();
    assert!(sys.history().is_empty());
    assert_eq!(sys.grid().cell_count(), 16);
    assert_eq!(sys.grid().piece_count(), 16);
}

#[test]
fn player_in_any_rewritten_cell_blocks_unfold() {
    let mut sys = level();
    let id = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    let before = fingerprint(&sys);
    // Split cell, cell merged into, cell created past the edge, cell vacated by the fold.
    for cell in [c(1, 2), c(0, 3), c(-1, 2), c(3, 3)] {
        sys.set_player_cell(Some(cell));
        assert_eq!(
            sys.unfold_seam(id),
            Err(FoldError::UnfoldBlocked {
                fold: id,
                blocker: UnfoldBlocker::PlayerInTheWay(cell),
            })
        );
        assert_eq!(fingerprint(&sys), before);
    }
    sys.set_player_cell(None);
    assert!(sys.unfold_seam(id).is_ok());
}

#[test]
fn player_outside_the_region_does_not_block() {
    let mut sys = level();
    // x = 25 folds column 3 onto column 1 and leaves column 0 alone.
    let id = sys.execute_fold(c(2, 0), c(2, 3)).unwrap();
    let region = sys.history().get(id).unwrap().region();
    assert!(!region.contains(&c(0, 3)));
    assert!(region.contains(&c(1, 3)) && region.contains(&c(3, 3)));
    assert_eq!(sys.player_cell(), Some(c(0, 3)));

    sys.unfold_seam(id).unwrap();
    assert_eq!(sys.grid().cell_count(), 16);
    assert_eq!(sys.grid().piece_count(), 16);
}

#[test]
fn self_intersecting_piece_aborts_the_fold() {
    let symmetric = vec![
        vector![21.0, 1.0],
        vector![29.0, 9.0],
        vector![29.0, 1.0],
        vector![21.0, 9.0],
    ];
    let lopsided = vec![
        vector![21.0, 1.0],
        vector![29.0, 9.0],
        vector![29.0, 3.0],
        vector![21.0, 9.0],
    ];
    // The symmetric bowtie has zero signed area; it must not pass as a sliver.
    for bowtie in [symmetric, lopsided] {
        let mut sys = level_with_wall_piece(bowtie);
        let before = fingerprint(&sys);
        assert_eq!(sys.grid().piece_count(), 7);

        assert_eq!(
            sys.execute_fold(c(1, 0), c(1, 1)),
            Err(FoldError::DegenerateGeometry(c(0, 0)))
        );
        assert_eq!(fingerprint(&sys), before);
        assert_eq!(sys.grid().dominant_type(c(2, 0)), Some(CellType::Wall));
        assert_eq!(sys.revision(), 0);
        assert!(sys.history().is_empty());
        assert_eq!(sys.history().peek_next_id(), FoldId(1));
        assert!(sys.drain_events().is_empty());
    }
}

#[test]
fn unknown_fold_is_reported() {
    let mut sys = level();
    assert_eq!(sys.unfold_seam(FoldId(7)), Err(FoldError::UnknownFold(FoldId(7))));
}

#[test]
fn seam_click_picks_nearest_within_tolerance() {
    let mut sys = unoccupied_level();
    assert!(sys.detect_seam_click(vector![15.0, 20.0]).is_none());
    let id = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();

    let hit = sys.detect_seam_click(vector![15.5, 20.0]).unwrap();
    assert_eq!(hit.fold_id, id);
    assert!(hit.can_undo);
    assert!((hit.distance - 0.5).abs() < 1e-9);
    // Pick radius is 0.25 × 10.
    assert!(sys.detect_seam_click(vector![18.0, 20.0]).is_none());

    sys.on_player_moved(c(0, 3), c(1, 0));
    let blocked = sys.detect_seam_click(vector![15.0, 5.0]).unwrap();
    assert!(!blocked.can_undo);
    assert_eq!(blocked.blocker, Some(UnfoldBlocker::PlayerInTheWay(c(1, 0))));
    // The query mutates nothing.
    assert!(sys.history().contains(id));
}

#[test]
fn stale_pending_fold_is_refused() {
    let mut sys = level();
    let pending = sys.begin_fold(c(1, 0), c(1, 3)).unwrap();
    assert_eq!(pending.fold_id(), FoldId(1));
    assert!(pending.affected_cells().contains(&c(3, 3)));
    assert!(pending.merge_count() > 0);
    assert_eq!(sys.revision(), 0);

    sys.execute_fold(c(0, 1), c(1, 1)).unwrap();
    let before = fingerprint(&sys);
    assert_eq!(sys.commit_fold(pending), Err(FoldError::StalePendingFold));
    assert_eq!(fingerprint(&sys), before);
}

#[test]
fn events_describe_commit_and_reversal() {
    let mut sys = unoccupied_level();
    let id = sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    let events = sys.drain_events();
    let added = events.iter().filter(|e| matches!(e, FoldEvent::PieceAdded { .. })).count();
    let removed = events.iter().filter(|e| matches!(e, FoldEvent::PieceRemoved { .. })).count();
    assert_eq!((added, removed), (16, 12));
    assert_eq!(
        events.last(),
        Some(&FoldEvent::FoldCompleted {
            fold_id: id,
            anchor_a: c(1, 0),
            anchor_b: c(1, 3),
            orientation: FoldOrientation::Vertical,
        })
    );
    assert_eq!(sys.pending_events(), 0);

    sys.unfold_seam(id).unwrap();
    let events = sys.drain_events();
    assert!(matches!(
        events.last(),
        Some(FoldEvent::FoldReversed { fold_id, .. }) if *fold_id == id
    ));
}

#[test]
fn snapshot_restore_is_exact() {
    let mut sys = level();
    let mut player = PlayerState::new(c(0, 3));
    sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    let grid = sys.grid().clone();
    let history = sys.history().clone();

    let snap = sys.create_game_snapshot(&player, ActionKind::Fold, "after first fold");
    assert_eq!(snap.summary(), "after first fold");
    sys.restore_from_snapshot(snap, &mut player).unwrap();
    assert_eq!(sys.grid(), &grid);
    assert_eq!(sys.history(), &history);
    assert_eq!(player.grid_position(), c(0, 3));
    assert_eq!(player.flags(), PlayerFlags::default());
}

#[test]
fn restore_keeps_fold_ids_monotonic() {
    let mut sys = level();
    let mut player = PlayerState::new(c(0, 3));
    let start = sys.create_game_snapshot(&player, ActionKind::Fold, "start");
    assert_eq!(sys.execute_fold(c(1, 0), c(1, 3)), Ok(FoldId(1)));

    sys.restore_from_snapshot(start, &mut player).unwrap();
    assert!(sys.history().is_empty());
    assert_eq!(sys.grid().piece_count(), 16);
    assert_eq!(sys.player_cell(), Some(c(0, 3)));
    assert_eq!(sys.execute_fold(c(1, 0), c(1, 3)), Ok(FoldId(2)));
    assert!(matches!(
        sys.drain_events().iter().find(|e| matches!(e, FoldEvent::StateRestored { .. })),
        Some(FoldEvent::StateRestored { summary }) if summary == "start"
    ));
}

#[test]
fn player_queries_follow_dominant_type() {
    let mut sys = level();
    assert!(sys.is_blocked(c(2, 0)));
    assert!(sys.is_blocked(c(4, 0)));
    assert!(!sys.is_blocked(c(1, 0)));
    assert!(sys.is_goal(c(3, 3)));
    assert_eq!(sys.cell_at(vector![35.0, 35.0]), Some(c(3, 3)));
    assert_eq!(sys.cell_at(vector![-1.0, 5.0]), None);

    sys.execute_fold(c(1, 0), c(1, 3)).unwrap();
    // The goal hangs off the left edge and the wall column now backs column 0.
    assert!(sys.is_goal(c(-1, 3)));
    assert!(sys.is_blocked(c(0, 0)));
    assert!(sys.is_blocked(c(2, 0)));
    assert_eq!(sys.cell_at(vector![-5.0, 35.0]), Some(c(-1, 3)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fold_unfold_restores_grid(
        n in 2i32..6,
        ax in 0i32..6, ay in 0i32..6,
        bx in 0i32..6, by in 0i32..6,
    ) {
        let (a, b) = (c(ax % n, ay % n), c(bx % n, by % n));
        prop_assume!(a != b);
        let layout = LevelLayout::empty(n, n, 10.0)
            .with_cell(c(0, 0), CellType::Goal)
            .with_cell(c(n - 1, 0), CellType::Wall);
        let mut sys = FoldSystem::from_layout(&layout, FoldCfg::default()).unwrap();
        sys.set_player_cell(None);
        let before = fingerprint(&sys);
        let area = total_area(&sys);

        match sys.execute_fold(a, b) {
            Ok(id) => {
                prop_assert!(sys.grid().check_consistency().is_ok());
                prop_assert!((total_area(&sys) - area).abs() < 1e-2);
                sys.unfold_seam(id).unwrap();
                prop_assert_eq!(fingerprint(&sys), before);
                prop_assert!(sys.history().is_empty());
            }
            Err(_) => {
                prop_assert_eq!(fingerprint(&sys), before);
            }
        }
    }
}
