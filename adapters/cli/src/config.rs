//! Puzzle manifests describing the grid, the shape catalog and the starting
//! pieces.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use block_slide_board::{apply, query, Board, Grid, GridLayout, ShapeCatalog};
use block_slide_core::{CellCoord, Command, Event, ShapeFootprint};
use glam::Vec3;
use serde::Deserialize;
use tracing::info;

/// Puzzle used when no manifest path is provided.
pub(crate) const DEFAULT_PUZZLE: &str = include_str!("../puzzles/default.toml");

/// Builds a board from the manifest at `path`, or from the bundled puzzle.
pub(crate) fn load_board(path: Option<&Path>) -> Result<Board> {
    let (contents, source) = match path {
        Some(path) => (
            fs::read_to_string(path)
                .with_context(|| format!("failed to read puzzle at {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (DEFAULT_PUZZLE.to_owned(), "bundled default".to_owned()),
    };

    let manifest = parse_manifest(&contents)
        .with_context(|| format!("invalid puzzle manifest ({source})"))?;
    let board = manifest.build()?;
    info!(%source, "loaded puzzle");
    Ok(board)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PuzzleManifest {
    #[serde(default)]
    grid: GridSection,
    #[serde(default)]
    shapes: Vec<ShapeSection>,
    #[serde(default)]
    pieces: Vec<PieceSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    columns: Option<u32>,
    rows: Option<u32>,
    cell_size: Option<f32>,
    spacing: Option<f32>,
    centered: Option<bool>,
    anchors: Option<Vec<[f32; 3]>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeSection {
    name: String,
    offsets: ShapeFootprint,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PieceSection {
    shape: String,
    pivot: [u32; 2],
}

fn parse_manifest(contents: &str) -> Result<PuzzleManifest> {
    toml::from_str(contents).context("failed to parse puzzle manifest toml contents")
}

impl PuzzleManifest {
    fn build(self) -> Result<Board> {
        let grid = self.grid.build()?;

        let mut catalog = ShapeCatalog::new();
        for shape in self.shapes {
            let _ = catalog
                .register(shape.name, shape.offsets)
                .context("failed to register shape")?;
        }

        let mut board = Board::new(grid, catalog);
        let mut events = Vec::new();
        for (index, piece) in self.pieces.into_iter().enumerate() {
            let shape = query::shapes(&board)
                .find(&piece.shape)
                .with_context(|| format!("piece {index} uses unknown shape `{}`", piece.shape))?;
            let pivot = CellCoord::new(piece.pivot[0], piece.pivot[1]);

            events.clear();
            apply(&mut board, Command::PlacePiece { shape, pivot }, &mut events)
                .with_context(|| format!("failed to place piece {index}"))?;
            if let Some(Event::PlacementRejected { reason, .. }) = events.first() {
                bail!(
                    "piece {index} (`{}`) does not fit at {pivot}: {reason}",
                    piece.shape
                );
            }
        }

        Ok(board)
    }
}

impl GridSection {
    fn build(&self) -> Result<Grid> {
        let defaults = GridLayout::default();
        let layout = GridLayout {
            columns: self.columns.unwrap_or(defaults.columns),
            rows: self.rows.unwrap_or(defaults.rows),
            cell_size: self.cell_size.unwrap_or(defaults.cell_size),
            spacing: self.spacing.unwrap_or(defaults.spacing),
            centered: self.centered.unwrap_or(defaults.centered),
        };

        let grid = match &self.anchors {
            Some(anchors) => {
                if self.spacing.is_some() || self.centered.is_some() {
                    bail!("`spacing` and `centered` cannot be combined with explicit `anchors`");
                }
                let anchors = anchors
                    .iter()
                    .map(|[x, y, z]| Vec3::new(*x, *y, *z))
                    .collect();
                Grid::new(layout.columns, layout.rows, anchors, layout.cell_size)
            }
            None => layout.build(),
        };
        grid.context("invalid grid section")
    }
}
