#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a Block Slide puzzle and drives it.

mod config;
mod render;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use block_slide_board::{apply, query, Board, Placement};
use block_slide_core::{CellCoord, Command, DragInput, Event, PieceId};
use block_slide_system_drag::DragSession;
use block_slide_system_planner::PathPlanner;
use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "block-slide", version, about = "Inspect and play Block Slide puzzles")]
struct Cli {
    /// Puzzle manifest to load instead of the bundled default.
    #[arg(long, global = true)]
    puzzle: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints the board and the pieces resting on it.
    Show,
    /// Prints every shape in the catalog.
    Shapes {
        /// Half-width of the preview square.
        #[arg(long, default_value_t = 2)]
        radius: u32,
    },
    /// Plans the shortest legal route for a piece without moving it.
    Plan {
        /// Piece to route.
        #[arg(long)]
        piece: u32,
        /// Destination pivot cell as `column,row`.
        #[arg(long, value_parser = parse_cell)]
        to: CellCoord,
    },
    /// Drags a piece toward a cell and releases it.
    Drag {
        /// Piece to drag.
        #[arg(long)]
        piece: u32,
        /// Cell whose anchor the pointer moves to, as `column,row`.
        #[arg(long, value_parser = parse_cell)]
        to: CellCoord,
        /// World point on the ground plane where the piece is released, as `x,z`.
        #[arg(long, value_parser = parse_point)]
        release_at: Option<Vec3>,
        /// Maximum number of drag updates before releasing.
        #[arg(long, default_value_t = 32)]
        max_updates: u32,
    },
}

/// Entry point for the Block Slide command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let mut board = config::load_board(cli.puzzle.as_deref())?;
    match cli.command {
        Commands::Show => print!("{}", render::render_board(&board)?),
        Commands::Shapes { radius } => {
            print!("{}", render::render_shapes(query::shapes(&board), radius)?);
        }
        Commands::Plan { piece, to } => plan(&mut board, PieceId::new(piece), to)?,
        Commands::Drag {
            piece,
            to,
            release_at,
            max_updates,
        } => drag(&mut board, PieceId::new(piece), to, release_at, max_updates)?,
    }
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter `{level}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!(error))
        .context("failed to install tracing subscriber")
}

fn settled_pivot(board: &Board, piece: PieceId) -> Result<CellCoord> {
    let snapshot = query::piece(board, piece)
        .with_context(|| format!("piece {} does not exist", piece.get()))?;
    match snapshot.placement {
        Placement::Settled { pivot } => Ok(pivot),
        Placement::Airborne { .. } => bail!("piece {} is not on the grid", piece.get()),
    }
}

fn plan(board: &mut Board, piece: PieceId, goal: CellCoord) -> Result<()> {
    let start = settled_pivot(board, piece)?;
    let footprint = query::footprint(board, piece)
        .cloned()
        .with_context(|| format!("piece {} has no footprint", piece.get()))?;

    let mut events = Vec::new();
    apply(board, Command::LiftPiece { piece }, &mut events)
        .context("failed to lift piece for planning")?;

    let mut planner = PathPlanner::new();
    let path = planner.find(query::grid(board), start, goal, &footprint);
    if path.is_empty() {
        println!("no legal path from {start} to {goal}");
        return Ok(());
    }

    let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
    println!("{} steps: {}", path.len() - 1, steps.join(" -> "));
    print!("{}", render::render_path(board, &path));
    Ok(())
}

fn drag(
    board: &mut Board,
    piece: PieceId,
    target: CellCoord,
    release_at: Option<Vec3>,
    max_updates: u32,
) -> Result<()> {
    let pivot = settled_pivot(board, piece)?;
    let grid = query::grid(board);
    let grab_point = grid.world_from_coordinate(pivot)?;
    let pointer = grid
        .world_from_coordinate(target)
        .with_context(|| format!("drag target {target} is outside the grid"))?;

    let mut session = DragSession::new();
    let mut events = Vec::new();
    session.handle(
        board,
        DragInput::Grab {
            piece,
            point: grab_point,
        },
        &mut events,
    )?;
    if session.active_piece().is_none() {
        report(&events);
        bail!("piece {} could not be grabbed", piece.get());
    }

    for _ in 0..max_updates {
        let start = events.len();
        session.handle(board, DragInput::Drag { point: pointer }, &mut events)?;
        if matches!(events.get(start), Some(Event::PieceHeld { .. })) {
            break;
        }
    }

    session.handle(board, DragInput::Release { at: release_at }, &mut events)?;
    report(&events);
    print!("{}", render::render_board(board)?);
    Ok(())
}

fn report(events: &[Event]) {
    for event in events {
        if let Some(line) = describe(event) {
            println!("{line}");
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::DragStarted { piece, from } => {
            format!("grabbed {} at {from}", render::piece_label(*piece))
        }
        Event::PieceStepped { piece, from, to, .. } => {
            format!("moved {} {from} -> {to}", render::piece_label(*piece))
        }
        Event::PieceHeld { piece, cell } => {
            format!("{} holds at {cell}", render::piece_label(*piece))
        }
        Event::DragEnded {
            piece,
            pivot,
            outcome,
            ..
        } => format!(
            "released {} at {pivot} ({outcome:?})",
            render::piece_label(*piece)
        ),
        Event::DragRejected { piece, reason } => {
            format!("grab of {} rejected: {reason:?}", render::piece_label(*piece))
        }
        Event::PiecePlaced { .. }
        | Event::PlacementRejected { .. }
        | Event::PieceLifted { .. }
        | Event::PieceSettled { .. }
        | Event::SettleRejected { .. } => return None,
    };
    Some(line)
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{value}`"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(CellCoord::new(column, row))
}

fn parse_point(value: &str) -> Result<Vec3, String> {
    let (x, z) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{value}`"))?;
    let x: f32 = x
        .trim()
        .parse()
        .map_err(|error| format!("invalid x `{x}`: {error}"))?;
    let z: f32 = z
        .trim()
        .parse()
        .map_err(|error| format!("invalid z `{z}`: {error}"))?;
    Ok(Vec3::new(x, 0.0, z))
}
