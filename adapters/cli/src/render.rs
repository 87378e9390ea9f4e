//! Plain-text rendering of boards, shapes and planned paths.

use std::fmt::{self, Write as _};

use block_slide_board::{query, Board, Placement, ShapeCatalog};
use block_slide_core::{CellCoord, PieceId};

const FREE: char = '.';
const STRAY: char = '?';

/// Single-character label used for a piece on the board diagram.
pub(crate) fn piece_label(piece: PieceId) -> char {
    const LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    usize::try_from(piece.get())
        .ok()
        .map(|index| index % LABELS.len())
        .and_then(|index| LABELS.get(index))
        .map_or(STRAY, |label| char::from(*label))
}

/// Draws the board row by row followed by a legend of every piece.
///
/// Settled pieces are drawn with their label, free cells with `.`. A marked
/// cell that no settled piece covers is drawn as `?`.
pub(crate) fn render_board(board: &Board) -> Result<String, fmt::Error> {
    let mut labels = Vec::new();
    for snapshot in query::pieces(board) {
        for cell in query::covered_cells(board, snapshot.id) {
            labels.push((cell, piece_label(snapshot.id)));
        }
    }

    let view = query::occupancy_view(board);
    let (columns, _) = view.dimensions();
    let mut output = String::new();
    let mut line = String::new();
    for (cell, occupied) in view.iter() {
        let symbol = labels
            .iter()
            .find(|(covered, _)| *covered == cell)
            .map(|(_, label)| *label)
            .unwrap_or(if occupied { STRAY } else { FREE });
        line.push(symbol);
        if cell.column() + 1 == columns {
            output.push_str(&line);
            output.push('\n');
            line.clear();
        }
    }

    let shapes = query::shapes(board);
    for snapshot in query::pieces(board) {
        let name = shapes.name(snapshot.shape).unwrap_or("<unknown>");
        let label = piece_label(snapshot.id);
        match snapshot.placement {
            Placement::Settled { pivot } => writeln!(output, "{label} {name} at {pivot}")?,
            Placement::Airborne { last_pivot } => {
                writeln!(output, "{label} {name} lifted from {last_pivot}")?;
            }
        }
    }
    Ok(output)
}

/// Lists every shape with its footprint preview.
pub(crate) fn render_shapes(catalog: &ShapeCatalog, radius: u32) -> Result<String, fmt::Error> {
    let mut output = String::new();
    for (_, name, footprint) in catalog.iter() {
        writeln!(output, "{name} ({} cells)", footprint.cell_count())?;
        writeln!(output, "{}\n", footprint.preview(radius))?;
    }
    Ok(output)
}

/// Draws the board with the planned pivot path overlaid.
///
/// The start is `S`, the goal `G` and intermediate steps `*`. Occupied cells
/// show the label of the piece covering them.
pub(crate) fn render_path(board: &Board, path: &[CellCoord]) -> String {
    let grid = query::grid(board);
    let mut output = String::new();
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = CellCoord::new(column, row);
            let symbol = match path.iter().position(|step| *step == cell) {
                Some(0) => 'S',
                Some(index) if index + 1 == path.len() => 'G',
                Some(_) => '*',
                None => query::piece_at(board, cell).map_or(FREE, piece_label),
            };
            output.push(symbol);
        }
        output.push('\n');
    }
    output
}
