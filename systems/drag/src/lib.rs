#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drag session that turns pointer input into legal one-cell piece moves.
//!
//! A grab lifts the piece off the grid, every drag update advances the pivot
//! by at most one cell along a legal path toward the pointer, and a release
//! either settles the piece where it was dropped or reverts it to the last
//! cell it legally reached.

use block_slide_board::{apply, placement, query, Board, BoardError, Grid, GridError, Placement};
use block_slide_core::{
    CellCoord, Command, DragInput, DragOutcome, DragRejection, Event, PieceId, ShapeFootprint,
};
use block_slide_system_planner::PathPlanner;
use glam::Vec3;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures that leave a drag unresolved.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DragError {
    /// The board refused a command issued by the session.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// A grid lookup left the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Neither the release cell, the last legal cell nor the origin can hold
    /// the piece any longer.
    #[error("piece {piece:?} has no legal cell to settle on")]
    Stranded {
        /// Piece that remains airborne.
        piece: PieceId,
    },
}

/// Pure system that drives a single drag gesture at a time.
#[derive(Debug, Default)]
pub struct DragSession {
    planner: PathPlanner,
    state: SessionState,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

#[derive(Debug)]
struct ActiveDrag {
    piece: PieceId,
    footprint: ShapeFootprint,
    origin: CellCoord,
    last_valid: CellCoord,
    position: Vec3,
    grab_offset: Vec3,
}

impl DragSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Piece currently held by the session.
    #[must_use]
    pub fn active_piece(&self) -> Option<PieceId> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Dragging(drag) => Some(drag.piece),
        }
    }

    /// Last cell the held piece legally stepped onto.
    #[must_use]
    pub fn last_valid(&self) -> Option<CellCoord> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Dragging(drag) => Some(drag.last_valid),
        }
    }

    /// World position the held piece was last told to move toward.
    #[must_use]
    pub fn position(&self) -> Option<Vec3> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Dragging(drag) => Some(drag.position),
        }
    }

    /// Consumes a single pointer input, mutating the board through commands
    /// and reporting the outcome as events.
    pub fn handle(
        &mut self,
        board: &mut Board,
        input: DragInput,
        out: &mut Vec<Event>,
    ) -> Result<(), DragError> {
        match input {
            DragInput::Grab { piece, point } => self.grab(board, piece, point, out),
            DragInput::Drag { point } => self.drag(board, point, out),
            DragInput::Release { at } => self.release(board, at, out),
        }
    }

    fn grab(
        &mut self,
        board: &mut Board,
        piece: PieceId,
        point: Vec3,
        out: &mut Vec<Event>,
    ) -> Result<(), DragError> {
        if let SessionState::Dragging(active) = &self.state {
            let reason = DragRejection::SessionBusy {
                active: active.piece,
            };
            warn!(?piece, active = ?active.piece, "rejected grab while dragging");
            out.push(Event::DragRejected { piece, reason });
            return Ok(());
        }

        let Some(snapshot) = query::piece(board, piece) else {
            warn!(?piece, "rejected grab of unknown piece");
            out.push(Event::DragRejected {
                piece,
                reason: DragRejection::UnknownPiece,
            });
            return Ok(());
        };
        let Placement::Settled { pivot } = snapshot.placement else {
            warn!(?piece, "rejected grab of airborne piece");
            out.push(Event::DragRejected {
                piece,
                reason: DragRejection::PieceUnavailable,
            });
            return Ok(());
        };
        let footprint = query::footprint(board, piece)
            .cloned()
            .ok_or(BoardError::UnknownShape {
                shape: snapshot.shape,
            })?;

        let position = query::grid(board).world_from_coordinate(pivot)?;
        let grab_offset = Vec3::new(position.x - point.x, 0.0, position.z - point.z);

        apply(board, Command::LiftPiece { piece }, out)?;
        info!(?piece, %pivot, "started drag");
        out.push(Event::DragStarted { piece, from: pivot });

        self.state = SessionState::Dragging(ActiveDrag {
            piece,
            footprint,
            origin: pivot,
            last_valid: pivot,
            position,
            grab_offset,
        });
        Ok(())
    }

    fn drag(&mut self, board: &Board, point: Vec3, out: &mut Vec<Event>) -> Result<(), DragError> {
        let SessionState::Dragging(drag) = &mut self.state else {
            debug!("ignored drag without an active piece");
            return Ok(());
        };

        let grid = query::grid(board);
        let target = clamp_silhouette(grid, &drag.footprint, point + drag.grab_offset);
        let target = Vec3::new(target.x, drag.position.y, target.z);

        let start = grid.coordinate_from_world(drag.position);
        let goal = grid.coordinate_from_world(target);
        let path = self.planner.find(grid, start, goal, &drag.footprint);

        let Some(&next) = path.get(1) else {
            debug!(piece = ?drag.piece, cell = %start, %goal, "held piece in place");
            out.push(Event::PieceHeld {
                piece: drag.piece,
                cell: start,
            });
            return Ok(());
        };

        let anchor = grid.world_from_coordinate(next)?;
        drag.position = Vec3::new(anchor.x, drag.position.y, anchor.z);
        drag.last_valid = next;
        debug!(piece = ?drag.piece, from = %start, to = %next, "stepped piece");
        out.push(Event::PieceStepped {
            piece: drag.piece,
            from: start,
            to: next,
            position: drag.position,
        });
        Ok(())
    }

    fn release(
        &mut self,
        board: &mut Board,
        at: Option<Vec3>,
        out: &mut Vec<Event>,
    ) -> Result<(), DragError> {
        let drag = match std::mem::take(&mut self.state) {
            SessionState::Idle => {
                debug!("ignored release without an active piece");
                return Ok(());
            }
            SessionState::Dragging(drag) => drag,
        };

        let grid = query::grid(board);
        let released = grid.coordinate_from_world(at.unwrap_or(drag.position));
        let resolution = if placement::fits(grid, released, &drag.footprint) {
            Some((released, DragOutcome::Committed))
        } else {
            [drag.last_valid, drag.origin]
                .into_iter()
                .find(|cell| placement::fits(grid, *cell, &drag.footprint))
                .map(|cell| (cell, DragOutcome::Reverted))
        };

        let Some((pivot, outcome)) = resolution else {
            let piece = drag.piece;
            warn!(?piece, cell = %released, "no legal cell left for piece");
            self.state = SessionState::Dragging(drag);
            return Err(DragError::Stranded { piece });
        };

        let anchor = grid.world_from_coordinate(pivot)?;
        let position = Vec3::new(anchor.x, drag.position.y, anchor.z);
        apply(
            board,
            Command::SettlePiece {
                piece: drag.piece,
                pivot,
            },
            out,
        )?;

        match outcome {
            DragOutcome::Committed => info!(piece = ?drag.piece, %pivot, "committed drag"),
            DragOutcome::Reverted => {
                info!(piece = ?drag.piece, %pivot, released = %released, "reverted drag");
            }
        }
        out.push(Event::DragEnded {
            piece: drag.piece,
            pivot,
            position,
            outcome,
        });
        Ok(())
    }
}

/// Shifts a pivot position so the footprint's silhouette stays on the grid.
///
/// Each covered cell sits `dx` grid steps along x and `-dy` grid steps along
/// z from the pivot, using the anchor spacing reported by [`Grid::step`]. The
/// silhouette's extremes are pushed back inside the grid bounds contracted
/// by half a cell, one side at a time. A silhouette wider than the grid ends
/// up aligned with the far edge.
#[must_use]
pub fn clamp_silhouette(grid: &Grid, footprint: &ShapeFootprint, pivot: Vec3) -> Vec3 {
    let (bounds_min, bounds_max) = grid.bounds();
    let half = grid.cell_size() * 0.5;
    let step = grid.step();
    let extent = footprint.extent();

    let (min_x, max_x) = span(pivot.x, extent.min_dx, extent.max_dx, step.x);
    let (min_z, max_z) = span(pivot.z, -extent.max_dy, -extent.min_dy, step.y);

    let mut clamped = pivot;
    if min_x < bounds_min.x + half {
        clamped.x += bounds_min.x + half - min_x;
    }
    if max_x > bounds_max.x - half {
        clamped.x -= max_x - (bounds_max.x - half);
    }
    if min_z < bounds_min.z + half {
        clamped.z += bounds_min.z + half - min_z;
    }
    if max_z > bounds_max.z - half {
        clamped.z -= max_z - (bounds_max.z - half);
    }
    clamped
}

/// World interval covered by grid offsets `low..=high` around `origin`.
fn span(origin: f32, low: i32, high: i32, step: f32) -> (f32, f32) {
    let first = origin + low as f32 * step;
    let last = origin + high as f32 * step;
    (first.min(last), first.max(last))
}
