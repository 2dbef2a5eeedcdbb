//! Walk through one fold, a blocked unfold and an undo on a small level.
//!
//! Usage:
//!   cargo run -p fold-engine --example fold_walkthrough
//!
//! Prints the dominant type map after each step (`.` empty, `#` wall, `~` water,
//! `G` goal, blank for missing cells).

use fold_engine::prelude::*;

fn glyph(t: Option<CellType>) -> char {
    match t {
        None => ' ',
        Some(CellType::Empty) => '.',
        Some(CellType::Wall) => '#',
        Some(CellType::Water) => '~',
        Some(CellType::Goal) => 'G',
    }
}

fn show(title: &str, session: &GameSession) {
    println!("-- {title}");
    let grid = session.system().grid();
    let coords: Vec<GridCoord> = grid.coords().collect();
    let span = |f: fn(&GridCoord) -> i32| {
        coords
            .iter()
            .map(f)
            .fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
    };
    let (x0, x1) = span(|c| c.x);
    let (y0, y1) = span(|c| c.y);
    for y in (y0..=y1).rev() {
        let row: String = (x0..=x1)
            .map(|x| glyph(grid.dominant_type(GridCoord::new(x, y))))
            .collect();
        println!("   {row}");
    }
    println!(
        "   cells={} pieces={} folds={} undo={}",
        grid.cell_count(),
        grid.piece_count(),
        session.system().history().len(),
        session.undo_stack().len()
    );
}

fn main() -> Result<()> {
    let mut layout = LevelLayout::empty(5, 3, 1.0)
        .with_cell(GridCoord::new(2, 1), CellType::Wall)
        .with_cell(GridCoord::new(4, 1), CellType::Goal)
        .with_cell(GridCoord::new(3, 0), CellType::Water);
    layout.player_start = GridCoord::new(0, 1);
    let mut session = GameSession::new(&layout, FoldCfg::default())?;
    show("start", &session);

    let first = session.fold(GridCoord::new(3, 0), GridCoord::new(3, 2))?;
    show(&format!("fold {first}"), &session);

    let second = session.fold(GridCoord::new(0, 1), GridCoord::new(1, 1))?;
    show(&format!("fold {second}"), &session);

    match session.unfold(first) {
        Err(err) => println!("-- unfold {first} refused: {err}"),
        Ok(()) => println!("-- unfold {first} succeeded"),
    }

    session.undo()?;
    show("undo", &session);
    session.unfold(first)?;
    show(&format!("unfold {first}"), &session);

    for event in session.tick().fold.iter().rev().take(3) {
        println!("   event: {event:?}");
    }
    Ok(())
}
