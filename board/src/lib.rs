#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Block Slide.
//!
//! The [`Board`] owns the grid and every piece resting on it. All occupancy
//! mutations go through [`apply`], which keeps the grid's marked cells equal
//! to the union of the settled pieces' footprints.

use block_slide_core::{CellCoord, Command, Event, PieceId, ShapeFootprint, ShapeId};
use thiserror::Error;
use tracing::{debug, info, warn};

mod grid;
mod layout;
mod pieces;
pub mod placement;
mod shapes;

pub use grid::{Grid, GridError, LayoutError, OccupancyView};
pub use layout::GridLayout;
pub use pieces::Placement;
pub use shapes::ShapeCatalog;

use pieces::PieceRegistry;

/// Contract violations raised while mutating the board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A grid access left the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The command referenced a shape missing from the catalog.
    #[error("shape {shape:?} is not registered")]
    UnknownShape {
        /// Identifier that failed to resolve.
        shape: ShapeId,
    },
    /// The command referenced a piece that does not exist.
    #[error("piece {piece:?} does not exist")]
    UnknownPiece {
        /// Identifier that failed to resolve.
        piece: PieceId,
    },
    /// A lift targeted a piece that is already airborne.
    #[error("piece {piece:?} is already airborne")]
    PieceAirborne {
        /// Identifier of the airborne piece.
        piece: PieceId,
    },
    /// A settle targeted a piece that is already settled.
    #[error("piece {piece:?} is already settled")]
    PieceNotAirborne {
        /// Identifier of the settled piece.
        piece: PieceId,
    },
    /// Two shapes were registered under the same name.
    #[error("shape name `{name}` is registered twice")]
    DuplicateShapeName {
        /// Name that was repeated.
        name: String,
    },
    /// The catalog cannot allocate further shape identifiers.
    #[error("shape catalog is full")]
    CatalogFull,
}

/// Represents the authoritative puzzle board.
#[derive(Debug)]
pub struct Board {
    grid: Grid,
    shapes: ShapeCatalog,
    pieces: PieceRegistry,
}

impl Board {
    /// Creates a board without pieces on top of an empty grid.
    #[must_use]
    pub fn new(grid: Grid, shapes: ShapeCatalog) -> Self {
        Self {
            grid,
            shapes,
            pieces: PieceRegistry::new(),
        }
    }
}

/// Applies the provided command to the board, mutating state deterministically.
///
/// Placements that do not fit are reported through rejection events. Errors
/// are reserved for commands that break the board's contract.
pub fn apply(
    board: &mut Board,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), BoardError> {
    let Board {
        grid,
        shapes,
        pieces,
    } = board;

    match command {
        Command::PlacePiece { shape, pivot } => {
            let footprint = shapes
                .footprint(shape)
                .ok_or(BoardError::UnknownShape { shape })?;

            if let Err(reason) = placement::check(grid, pivot, footprint) {
                warn!(?shape, %pivot, %reason, "rejected piece placement");
                out_events.push(Event::PlacementRejected {
                    shape,
                    pivot,
                    reason,
                });
                return Ok(());
            }

            occupy(grid, pivot, footprint)?;
            let piece = pieces.insert(shape, pivot);
            info!(?piece, ?shape, %pivot, "placed piece");
            out_events.push(Event::PiecePlaced {
                piece,
                shape,
                pivot,
            });
        }
        Command::LiftPiece { piece } => {
            let state = pieces
                .get_mut(piece)
                .ok_or(BoardError::UnknownPiece { piece })?;
            let Placement::Settled { pivot } = state.placement else {
                return Err(BoardError::PieceAirborne { piece });
            };
            let footprint = shapes
                .footprint(state.shape)
                .ok_or(BoardError::UnknownShape { shape: state.shape })?;

            for cell in placement::covered_cells(grid, pivot, footprint)? {
                grid.unmark(cell)?;
            }
            state.placement = Placement::Airborne { last_pivot: pivot };
            debug!(?piece, %pivot, "lifted piece");
            out_events.push(Event::PieceLifted { piece, from: pivot });
        }
        Command::SettlePiece { piece, pivot } => {
            let state = pieces
                .get_mut(piece)
                .ok_or(BoardError::UnknownPiece { piece })?;
            if !matches!(state.placement, Placement::Airborne { .. }) {
                return Err(BoardError::PieceNotAirborne { piece });
            }
            let footprint = shapes
                .footprint(state.shape)
                .ok_or(BoardError::UnknownShape { shape: state.shape })?;

            if let Err(reason) = placement::check(grid, pivot, footprint) {
                warn!(?piece, %pivot, %reason, "rejected piece settle");
                out_events.push(Event::SettleRejected {
                    piece,
                    pivot,
                    reason,
                });
                return Ok(());
            }

            occupy(grid, pivot, footprint)?;
            state.placement = Placement::Settled { pivot };
            debug!(?piece, %pivot, "settled piece");
            out_events.push(Event::PieceSettled { piece, pivot });
        }
    }

    Ok(())
}

fn occupy(grid: &mut Grid, pivot: CellCoord, footprint: &ShapeFootprint) -> Result<(), GridError> {
    for cell in placement::covered_cells(grid, pivot, footprint)? {
        grid.mark(cell)?;
    }
    Ok(())
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use block_slide_core::{CellCoord, PieceId, ShapeFootprint, ShapeId};

    use super::{placement, Board, Grid, OccupancyView, Placement, ShapeCatalog};

    /// Provides read-only access to the board's grid.
    #[must_use]
    pub fn grid(board: &Board) -> &Grid {
        &board.grid
    }

    /// Provides read-only access to the shape catalog.
    #[must_use]
    pub fn shapes(board: &Board) -> &ShapeCatalog {
        &board.shapes
    }

    /// Exposes a read-only view of the occupancy flags.
    #[must_use]
    pub fn occupancy_view(board: &Board) -> OccupancyView<'_> {
        board.grid.occupancy_view()
    }

    /// Captures the state of a single piece.
    #[must_use]
    pub fn piece(board: &Board, piece: PieceId) -> Option<PieceSnapshot> {
        board.pieces.get(piece).map(|state| PieceSnapshot {
            id: piece,
            shape: state.shape,
            placement: state.placement,
        })
    }

    /// Captures every piece in identifier order.
    #[must_use]
    pub fn pieces(board: &Board) -> Vec<PieceSnapshot> {
        board
            .pieces
            .iter()
            .map(|(id, state)| PieceSnapshot {
                id,
                shape: state.shape,
                placement: state.placement,
            })
            .collect()
    }

    /// Footprint of the shape the piece was built from.
    #[must_use]
    pub fn footprint(board: &Board, piece: PieceId) -> Option<&ShapeFootprint> {
        let state = board.pieces.get(piece)?;
        board.shapes.footprint(state.shape)
    }

    /// Cells covered by a settled piece. Airborne pieces cover nothing.
    #[must_use]
    pub fn covered_cells(board: &Board, piece: PieceId) -> Vec<CellCoord> {
        let Some(state) = board.pieces.get(piece) else {
            return Vec::new();
        };
        let Placement::Settled { pivot } = state.placement else {
            return Vec::new();
        };
        board
            .shapes
            .footprint(state.shape)
            .and_then(|footprint| placement::covered_cells(&board.grid, pivot, footprint).ok())
            .unwrap_or_default()
    }

    /// Settled piece covering the cell, if any.
    #[must_use]
    pub fn piece_at(board: &Board, cell: CellCoord) -> Option<PieceId> {
        board
            .pieces
            .iter()
            .map(|(id, _)| id)
            .find(|id| covered_cells(board, *id).contains(&cell))
    }

    /// Immutable representation of a single piece used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PieceSnapshot {
        /// Identifier allocated to the piece by the board.
        pub id: PieceId,
        /// Shape the piece was built from.
        pub shape: ShapeId,
        /// Current resting state of the piece.
        pub placement: Placement,
    }
}
