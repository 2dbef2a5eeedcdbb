use anyhow::{Context, Result};
use fold_engine::api::{
    ActionKind, Direction, FoldCfg, FoldId, GameSession, GridCoord, LevelLayout, MoveOutcome,
};
use fold_engine::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scripted level plus the actions to play on it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Scenario {
    pub layout: LevelLayout,
    #[serde(default)]
    pub cfg: FoldCfg,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Action {
    Fold { a: GridCoord, b: GridCoord },
    Unfold { fold: u32 },
    Click { x: f64, y: f64 },
    Move { dir: Direction },
    Undo,
}

#[derive(Debug, Serialize)]
pub struct ActionReport {
    pub index: usize,
    pub action: Action,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct CellReport {
    pub coord: GridCoord,
    pub dominant: String,
    pub pieces: usize,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub version: &'static str,
    pub actions: Vec<ActionReport>,
    pub cells: usize,
    pub pieces: usize,
    pub folds: Vec<u32>,
    pub undo_depth: usize,
    pub player: GridCoord,
    pub goal_reached: bool,
    pub dominant: Vec<CellReport>,
}

pub fn load(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

/// Write pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Play every action in order. Refused actions are reported, not fatal.
///
/// Returns the report, the final session and the kind of the last applied action.
pub fn run(scenario: &Scenario) -> Result<(Report, GameSession, ActionKind)> {
    let mut session =
        GameSession::new(&scenario.layout, scenario.cfg).context("seeding the level")?;
    let mut last = ActionKind::Move;
    let mut reports = Vec::with_capacity(scenario.actions.len());

    for (index, action) in scenario.actions.iter().enumerate() {
        let (ok, detail) = match apply(&mut session, action) {
            Ok((kind, detail)) => {
                if let Some(kind) = kind {
                    last = kind;
                }
                (true, detail)
            }
            Err(err) => (false, err.to_string()),
        };
        if ok {
            tracing::info!(index, ?action, %detail, "action applied");
        } else {
            tracing::warn!(index, ?action, %detail, "action refused");
        }
        for event in session.tick().fold {
            tracing::debug!(index, ?event, "fold event");
        }
        reports.push(ActionReport {
            index,
            action: action.clone(),
            ok,
            detail,
        });
    }

    let report = summarize(&session, reports);
    Ok((report, session, last))
}

fn apply(
    session: &mut GameSession,
    action: &Action,
) -> fold_engine::Result<(Option<ActionKind>, String)> {
    match *action {
        Action::Fold { a, b } => {
            let id = session.fold(a, b)?;
            Ok((Some(ActionKind::Fold), format!("fold {id}")))
        }
        Action::Unfold { fold } => {
            session.unfold(FoldId(fold))?;
            Ok((Some(ActionKind::Unfold), format!("unfolded {}", FoldId(fold))))
        }
        Action::Click { x, y } => match session.click(Vec2::new(x, y))? {
            Some(id) => Ok((Some(ActionKind::Unfold), format!("unfolded {id}"))),
            None => Ok((None, "no seam under the pointer".to_string())),
        },
        Action::Move { dir } => Ok(match session.move_player(dir) {
            MoveOutcome::Moved { to, .. } => (Some(ActionKind::Move), format!("moved to {to}")),
            MoveOutcome::Blocked { target } => (None, format!("blocked at {target}")),
            MoveOutcome::InputDisabled => (None, "input disabled".to_string()),
        }),
        Action::Undo => Ok(match session.undo()? {
            Some(kind) => (None, format!("undid {kind}")),
            None => (None, "nothing to undo".to_string()),
        }),
    }
}

fn summarize(session: &GameSession, actions: Vec<ActionReport>) -> Report {
    let grid = session.system().grid();
    let dominant = grid
        .dominant_types()
        .into_iter()
        .map(|(coord, t)| CellReport {
            coord,
            dominant: t.to_string(),
            pieces: grid.get_cell(coord).map_or(0, |c| c.len()),
        })
        .collect();
    Report {
        version: fold_engine::VERSION,
        actions,
        cells: grid.cell_count(),
        pieces: grid.piece_count(),
        folds: session.system().history().ids().map(|id| id.0).collect(),
        undo_depth: session.undo_stack().len(),
        player: session.player().position(),
        goal_reached: session.player().goal_reached(),
        dominant,
    }
}
