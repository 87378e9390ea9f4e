//! Authoritative piece state management utilities.

use std::collections::BTreeMap;

use block_slide_core::{CellCoord, PieceId, ShapeId};

/// Where a piece currently rests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// The piece is committed to a pivot and its covered cells are marked.
    Settled {
        /// Pivot cell the footprint is anchored to.
        pivot: CellCoord,
    },
    /// The piece has been lifted by a drag and occupies no cells.
    Airborne {
        /// Pivot the piece occupied before it was lifted.
        last_pivot: CellCoord,
    },
}

impl Placement {
    /// Pivot of a settled piece.
    #[must_use]
    pub const fn settled_pivot(&self) -> Option<CellCoord> {
        match self {
            Self::Settled { pivot } => Some(*pivot),
            Self::Airborne { .. } => None,
        }
    }
}

/// Snapshot of a piece stored inside the board.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PieceState {
    /// Shape the piece was built from.
    pub(crate) shape: ShapeId,
    /// Current resting state of the piece.
    pub(crate) placement: Placement,
}

/// Registry that stores pieces and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct PieceRegistry {
    entries: BTreeMap<PieceId, PieceState>,
    next_piece_id: PieceId,
}

impl PieceRegistry {
    /// Creates an empty piece registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_piece_id: PieceId::new(0),
        }
    }

    /// Stores a freshly settled piece and returns its identifier.
    pub(crate) fn insert(&mut self, shape: ShapeId, pivot: CellCoord) -> PieceId {
        let id = self.next_piece_id;
        self.next_piece_id = PieceId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            PieceState {
                shape,
                placement: Placement::Settled { pivot },
            },
        );
        id
    }

    pub(crate) fn get(&self, piece: PieceId) -> Option<&PieceState> {
        self.entries.get(&piece)
    }

    pub(crate) fn get_mut(&mut self, piece: PieceId) -> Option<&mut PieceState> {
        self.entries.get_mut(&piece)
    }

    /// Iterates pieces in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (PieceId, &PieceState)> {
        self.entries.iter().map(|(id, state)| (*id, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = PieceRegistry::new();
        let first = registry.insert(ShapeId::new(0), CellCoord::new(0, 0));
        let second = registry.insert(ShapeId::new(0), CellCoord::new(1, 0));

        assert_eq!(first, PieceId::new(0));
        assert_eq!(second, PieceId::new(1));
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn inserted_pieces_start_settled() {
        let mut registry = PieceRegistry::new();
        let piece = registry.insert(ShapeId::new(2), CellCoord::new(3, 4));
        let state = registry.get(piece).expect("piece stored");

        assert_eq!(state.shape, ShapeId::new(2));
        assert_eq!(state.placement.settled_pivot(), Some(CellCoord::new(3, 4)));
    }
}
