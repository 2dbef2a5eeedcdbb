use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fold_engine::api::Grid;
use std::path::PathBuf;
use tracing::Level;

mod scenario;

#[derive(Parser)]
#[command(name = "fold-cli")]
#[command(about = "Scripted driver for the fold engine")]
struct Cmd {
    /// Log verbosity: -v info, -vv debug, -vvv trace (default: warnings only)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Play a scenario and print a JSON report
    Run {
        #[arg(long)]
        scenario: PathBuf,
        /// Also write the final game snapshot here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Seed the scenario's level and report layout problems
    Check {
        #[arg(long)]
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Run { scenario, out } => run(scenario, out),
        Action::Check { scenario } => check(scenario),
    }
}

fn run(path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    tracing::info!(scenario = %path.display(), "run");
    let scenario = scenario::load(&path)?;
    let (report, session, last) = scenario::run(&scenario)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(out) = out {
        let snapshot = session
            .system()
            .create_game_snapshot(session.player(), last, "final state");
        scenario::write_json(&out, &snapshot)?;
        tracing::info!(out = %out.display(), "snapshot written");
    }
    Ok(())
}

fn check(path: PathBuf) -> Result<()> {
    let scenario = scenario::load(&path)?;
    let grid = Grid::from_layout(&scenario.layout)
        .with_context(|| format!("level in {} is invalid", path.display()))?;
    let goals = grid
        .dominant_types()
        .values()
        .filter(|t| **t == fold_engine::api::CellType::Goal)
        .count();
    let obj = serde_json::json!({
        "version": fold_engine::VERSION,
        "cells": grid.cell_count(),
        "goals": goals,
        "actions": scenario.actions.len(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
