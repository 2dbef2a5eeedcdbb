//! Pure computation of a fold against the current grid.
//!
//! Nothing here mutates: the output is a `PendingFold` that `FoldSystem::commit_fold`
//! applies in one step. Every rejection happens in this module.

use std::collections::BTreeSet;

use tracing::debug;

use super::types::{
    CellCapture, CellRewrite, FoldId, FoldOrientation, FoldRecord, PendingFold, Seam,
};
use crate::cfg::FoldCfg;
use crate::error::{FoldError, Result};
use crate::geom2::{clip_to_rect, line_rect_chord, split_by, Line2, Polygon, Side};
use crate::model::{CellPiece, Grid, GridCoord};

/// How the vertices of a cell's pieces fall relative to the fold line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Straddle {
    positive: bool,
    negative: bool,
}

impl Straddle {
    fn of<'a>(polygons: impl IntoIterator<Item = &'a Polygon>, line: &Line2) -> Self {
        let mut s = Straddle::default();
        for v in polygons.into_iter().flat_map(|p| p.vertices.iter()) {
            match line.side(*v) {
                Side::Positive => s.positive = true,
                Side::Negative => s.negative = true,
                Side::OnLine => {}
            }
        }
        s
    }

    #[inline]
    fn crosses(self) -> bool {
        self.positive && self.negative
    }
}

/// Validate a fragment for insertion into `coord`.
///
/// `Ok(None)` drops a sliver; an invalid outline aborts the whole fold.
///
/// Validation runs before the area test: a self-intersecting outline can have
/// near-zero signed area and must not pass as a sliver.
fn settle(mut polygon: Polygon, coord: GridCoord, sliver: f64) -> Result<Option<Polygon>> {
    polygon.dedup_eps();
    if polygon.is_degenerate() {
        return Ok(None);
    }
    if !polygon.is_valid() {
        debug!(%coord, vertices = polygon.len(), "fragment failed validation");
        return Err(FoldError::DegenerateGeometry(coord));
    }
    if polygon.area() < sliver {
        return Ok(None);
    }
    Ok(Some(polygon))
}

/// Grid cells whose squares the bounding box of `polygon` touches.
fn covered_coords(grid: &Grid, polygon: &Polygon) -> Vec<GridCoord> {
    let Some((min, max)) = polygon.bounds() else {
        return Vec::new();
    };
    let s = grid.cell_size();
    let x0 = (min.x / s).floor() as i32;
    let y0 = (min.y / s).floor() as i32;
    let x1 = ((max.x / s).ceil() as i32 - 1).max(x0);
    let y1 = ((max.y / s).ceil() as i32 - 1).max(y0);
    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| GridCoord::new(x, y)))
        .collect()
}

/// Compute fold `id` along the line through the centers of `a` and `b`.
///
/// Pieces on the Positive side (left of a→b) stay; pieces on the Negative side are
/// mirrored across the line, tagged with `id` and clipped into the cells they land on.
pub(crate) fn plan_fold(
    grid: &Grid,
    cfg: &FoldCfg,
    id: FoldId,
    revision: u64,
    a: GridCoord,
    b: GridCoord,
) -> Result<PendingFold> {
    if a == b {
        return Err(FoldError::AnchorsCoincide);
    }
    for anchor in [a, b] {
        if !grid.contains(anchor) {
            return Err(FoldError::InvalidAnchor(anchor));
        }
    }
    let line = Line2::through(grid.cell_center(a), grid.cell_center(b))
        .ok_or(FoldError::AnchorsCoincide)?;
    let (lo, hi) = grid.bounds().ok_or(FoldError::NoCellsOnLine)?;
    let (start, end) = line_rect_chord(&line, lo, hi).ok_or(FoldError::NoCellsOnLine)?;
    let orientation = FoldOrientation::between(a, b);
    let sliver = cfg.sliver_area(grid.cell_size());

    let mut captures = Vec::new();
    let mut rewrites = Vec::new();
    let mut moving: Vec<(GridCoord, CellPiece)> = Vec::new();
    let mut seam_cells = BTreeSet::new();
    let mut crossed = 0usize;

    for cell in grid.cells() {
        let coord = cell.coord();
        let pieces: Vec<_> = grid.pieces_of(coord).collect();
        let straddle = Straddle::of(pieces.iter().map(|(_, p)| &p.polygon), &line);
        if !straddle.negative {
            continue;
        }
        if straddle.crosses() {
            crossed += 1;
        }

        let mut rewrite = CellRewrite {
            coord,
            remove: Vec::new(),
            add: Vec::new(),
        };
        for (pid, piece) in &pieces {
            let s = Straddle::of([&piece.polygon], &line);
            if !s.negative {
                continue;
            }
            rewrite.remove.push(*pid);
            if !s.positive {
                moving.push((coord, (*piece).clone()));
                continue;
            }
            let split = split_by(&piece.polygon, &line);
            if let Some(kept) = settle(split.left, coord, sliver)? {
                let mut fragment = piece.with_polygon(kept);
                fragment.add_seam(id);
                rewrite.add.push(fragment);
                seam_cells.insert(coord);
            }
            let mut leaving = piece.with_polygon(split.right);
            leaving.add_seam(id);
            moving.push((coord, leaving));
        }
        debug!(
            %coord,
            removed = rewrite.remove.len(),
            kept = rewrite.add.len(),
            "cell captured by fold"
        );
        captures.push(CellCapture {
            coord,
            pieces: pieces.iter().map(|(_, p)| (*p).clone()).collect(),
        });
        rewrites.push(rewrite);
    }

    if crossed == 0 {
        return Err(FoldError::NoCellsOnLine);
    }

    let mut merges = Vec::new();
    let mut merged_into: Vec<GridCoord> = Vec::new();
    let mut created: Vec<GridCoord> = Vec::new();
    for (origin, piece) in moving {
        let mut mirrored = piece.mirrored(&line);
        mirrored.source_fold = Some(id);
        let bounded = mirrored.seams.contains(&id);
        for dest in covered_coords(grid, &mirrored.polygon) {
            let (min, max) = grid.cell_rect(dest);
            let clipped = clip_to_rect(&mirrored.polygon, min, max);
            let Some(polygon) = settle(clipped, dest, sliver)? else {
                continue;
            };
            debug!(from = %origin, to = %dest, area = polygon.area(), "merge fragment");
            if !merged_into.contains(&dest) {
                merged_into.push(dest);
            }
            if !grid.contains(dest) && !created.contains(&dest) {
                created.push(dest);
            }
            if bounded {
                seam_cells.insert(dest);
            }
            merges.push((dest, mirrored.with_polygon(polygon)));
        }
    }

    let record = FoldRecord {
        id,
        anchor_a: a,
        anchor_b: b,
        line,
        orientation,
        seam: Seam {
            fold_id: id,
            start,
            end,
            orientation,
        },
        captures,
        merged_into,
        created,
        seam_cells: seam_cells.into_iter().collect(),
    };
    Ok(PendingFold {
        revision,
        record,
        rewrites,
        merges,
    })
}
