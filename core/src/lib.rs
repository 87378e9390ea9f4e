#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Block Slide puzzle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative board, and pure systems. Adapters feed [`DragInput`] values
//! into the drag session, every occupancy mutation is expressed as a
//! [`Command`] executed by the board's `apply` entry point, and the outcome of
//! both is broadcast as [`Event`] values that presentation layers react to.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

mod footprint;

pub use footprint::{FootprintExtent, ShapeError, ShapeFootprint};

/// Commands that express all permissible board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places a new piece of the provided shape anchored at the pivot cell.
    PlacePiece {
        /// Shape the piece is built from.
        shape: ShapeId,
        /// Cell the shape's pivot is anchored to.
        pivot: CellCoord,
    },
    /// Lifts a settled piece off the grid, vacating every cell it covers.
    LiftPiece {
        /// Identifier of the piece to lift.
        piece: PieceId,
    },
    /// Settles an airborne piece at the provided pivot, occupying its cells.
    SettlePiece {
        /// Identifier of the airborne piece.
        piece: PieceId,
        /// Cell the piece's pivot should be anchored to.
        pivot: CellCoord,
    },
}

/// Events broadcast by the board and the drag session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new piece was placed on the grid.
    PiecePlaced {
        /// Identifier allocated to the piece.
        piece: PieceId,
        /// Shape the piece was built from.
        shape: ShapeId,
        /// Pivot cell the piece settled at.
        pivot: CellCoord,
    },
    /// Reports that a placement request did not fit the grid.
    PlacementRejected {
        /// Shape requested for placement.
        shape: ShapeId,
        /// Pivot cell provided in the request.
        pivot: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a piece left the grid and its cells were vacated.
    PieceLifted {
        /// Identifier of the lifted piece.
        piece: PieceId,
        /// Pivot the piece occupied before lifting.
        from: CellCoord,
    },
    /// Confirms that an airborne piece settled back onto the grid.
    PieceSettled {
        /// Identifier of the settled piece.
        piece: PieceId,
        /// Pivot cell the piece now occupies.
        pivot: CellCoord,
    },
    /// Reports that an airborne piece could not settle at the requested pivot.
    SettleRejected {
        /// Identifier of the airborne piece.
        piece: PieceId,
        /// Pivot cell provided in the request.
        pivot: CellCoord,
        /// Specific reason the settle failed.
        reason: PlacementError,
    },
    /// Announces that a drag gesture picked up a piece.
    DragStarted {
        /// Identifier of the dragged piece.
        piece: PieceId,
        /// Pivot the piece occupied when grabbed.
        from: CellCoord,
    },
    /// Reports a single legal step taken during a drag.
    PieceStepped {
        /// Identifier of the dragged piece.
        piece: PieceId,
        /// Cell the pivot stepped away from.
        from: CellCoord,
        /// Cell the pivot stepped onto.
        to: CellCoord,
        /// World position presentation layers should move the piece toward.
        position: Vec3,
    },
    /// Reports that the dragged piece stays in place for this update.
    PieceHeld {
        /// Identifier of the dragged piece.
        piece: PieceId,
        /// Cell the pivot remains on.
        cell: CellCoord,
    },
    /// Announces that a drag gesture resolved to a settled placement.
    DragEnded {
        /// Identifier of the dragged piece.
        piece: PieceId,
        /// Pivot cell the piece settled at.
        pivot: CellCoord,
        /// World anchor of the settled pivot.
        position: Vec3,
        /// Whether the release committed or reverted.
        outcome: DragOutcome,
    },
    /// Reports that a grab was refused.
    DragRejected {
        /// Identifier of the piece the grab targeted.
        piece: PieceId,
        /// Specific reason the grab failed.
        reason: DragRejection,
    },
}

/// Pointer-derived inputs consumed by the drag session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragInput {
    /// Starts dragging the piece under the pointer.
    Grab {
        /// Identifier of the piece picked by the pointer.
        piece: PieceId,
        /// World point the pointer projected onto.
        point: Vec3,
    },
    /// Moves the pointer while a drag is active.
    Drag {
        /// World point the pointer projected onto.
        point: Vec3,
    },
    /// Ends the active drag.
    Release {
        /// Current position of the piece as shown by the presentation layer,
        /// when it tracks one separately from the move targets.
        at: Option<Vec3>,
    },
}

/// Resolution of a finished drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragOutcome {
    /// The piece settled at the cell nearest to where it was released.
    Committed,
    /// The release cell did not fit, so the piece returned to its last legal cell.
    Reverted,
}

/// Reasons a grab may be refused by the drag session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragRejection {
    /// Another piece is already being dragged.
    SessionBusy {
        /// Piece currently held by the session.
        active: PieceId,
    },
    /// No piece with the provided identifier exists.
    UnknownPiece,
    /// The piece exists but is not settled on the grid.
    PieceUnavailable,
}

/// Reasons a footprint may not be placed at a pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// At least one covered cell lies outside the grid.
    OutOfBounds,
    /// At least one covered cell is already occupied.
    Occupied,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "footprint leaves the grid"),
            Self::Occupied => write!(f, "footprint overlaps an occupied cell"),
        }
    }
}

/// Orthogonal grid directions, listed in planner expansion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
    /// Toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in the fixed order neighbours are expanded.
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }
}

/// Unique identifier assigned to a piece by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u32);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a shape registered in the board's catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(u32);

impl ShapeId {
    /// Creates a new shape identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Rows increase "downward" in grid space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Shifts the coordinate by signed column and row deltas.
    ///
    /// Returns `None` when either axis would become negative or overflow.
    #[must_use]
    pub fn translate(self, columns: i32, rows: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(columns)?;
        let row = self.row.checked_add_signed(rows)?;
        Some(Self::new(column, row))
    }

    /// Adjacent coordinate one step away in the provided direction.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (columns, rows) = direction.delta();
        self.translate(columns, rows)
    }

    /// Reports whether the two coordinates share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Integer offset of a footprint cell relative to the piece's pivot.
///
/// `dy` points "up" in footprint space, the opposite of grid rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct CellOffset {
    dx: i32,
    dy: i32,
}

impl CellOffset {
    /// Offset of the pivot cell itself.
    pub const PIVOT: CellOffset = CellOffset::new(0, 0);

    /// Creates a new footprint offset.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal offset, positive toward increasing columns.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical offset, positive "up" toward decreasing rows.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }
}

impl From<(i32, i32)> for CellOffset {
    fn from((dx, dy): (i32, i32)) -> Self {
        Self::new(dx, dy)
    }
}

impl From<CellOffset> for (i32, i32) {
    fn from(offset: CellOffset) -> Self {
        (offset.dx, offset.dy)
    }
}

impl fmt::Display for CellOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellOffset, Direction, DragRejection, PieceId, PlacementError};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn translate_rejects_negative_coordinates() {
        let cell = CellCoord::new(0, 2);
        assert_eq!(cell.translate(-1, 0), None);
        assert_eq!(cell.translate(0, -3), None);
        assert_eq!(cell.translate(2, -2), Some(CellCoord::new(2, 0)));
    }

    #[test]
    fn neighbors_follow_expansion_order() {
        let cell = CellCoord::new(1, 1);
        let neighbors: Vec<_> = Direction::ALL
            .iter()
            .filter_map(|direction| cell.neighbor(*direction))
            .collect();

        assert_eq!(
            neighbors,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(1, 2),
                CellCoord::new(0, 1),
                CellCoord::new(2, 1),
            ]
        );
    }

    #[test]
    fn neighbors_stop_at_the_origin_edges() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North), None);
        assert_eq!(corner.neighbor(Direction::West), None);
        assert!(corner.is_adjacent(CellCoord::new(0, 1)));
        assert!(!corner.is_adjacent(CellCoord::new(1, 1)));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_offset_round_trips_through_bincode() {
        assert_round_trip(&CellOffset::new(-2, 3));
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&PlacementError::Occupied);
        assert_round_trip(&DragRejection::SessionBusy {
            active: PieceId::new(4),
        });
    }
}
