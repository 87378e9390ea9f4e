//! Immutable polyomino footprints shared by every piece built from a shape.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellOffset;

/// Authoring errors detected while building a footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The footprint did not list any cells.
    #[error("shape footprint must contain at least one cell")]
    Empty,
    /// The same offset was listed more than once.
    #[error("shape footprint lists offset {offset} more than once")]
    DuplicateOffset {
        /// Offset that appeared twice.
        offset: CellOffset,
    },
}

/// Ordered set of cell offsets describing a piece's shape around its pivot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellOffset>", into = "Vec<CellOffset>")]
pub struct ShapeFootprint {
    offsets: Vec<CellOffset>,
}

impl ShapeFootprint {
    /// Builds a footprint from authored offsets, preserving their order.
    pub fn new(offsets: Vec<CellOffset>) -> Result<Self, ShapeError> {
        if offsets.is_empty() {
            return Err(ShapeError::Empty);
        }

        let mut seen = HashSet::with_capacity(offsets.len());
        for offset in &offsets {
            if !seen.insert(*offset) {
                return Err(ShapeError::DuplicateOffset { offset: *offset });
            }
        }

        Ok(Self { offsets })
    }

    /// Footprint covering only the pivot cell.
    #[must_use]
    pub fn single_cell() -> Self {
        Self {
            offsets: vec![CellOffset::PIVOT],
        }
    }

    /// Offsets in authored order.
    #[must_use]
    pub fn offsets(&self) -> &[CellOffset] {
        &self.offsets
    }

    /// Number of cells the footprint covers.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.offsets.len()
    }

    /// Reports whether the footprint covers the provided offset.
    #[must_use]
    pub fn contains(&self, offset: CellOffset) -> bool {
        self.offsets.contains(&offset)
    }

    /// Smallest rectangle of offsets that contains every cell.
    #[must_use]
    pub fn extent(&self) -> FootprintExtent {
        let mut extent = FootprintExtent {
            min_dx: i32::MAX,
            max_dx: i32::MIN,
            min_dy: i32::MAX,
            max_dy: i32::MIN,
        };
        for offset in &self.offsets {
            extent.min_dx = extent.min_dx.min(offset.dx());
            extent.max_dx = extent.max_dx.max(offset.dx());
            extent.min_dy = extent.min_dy.min(offset.dy());
            extent.max_dy = extent.max_dy.max(offset.dy());
        }
        extent
    }

    /// Renders the footprint on a `(2 * radius + 1)` square character grid.
    ///
    /// Positive `dy` is drawn upward. The pivot is `@` when covered and `+`
    /// otherwise, covered cells are `#` and empty cells are `.`. Offsets that
    /// fall outside the radius are not drawn.
    #[must_use]
    pub fn preview(&self, radius: u32) -> String {
        let radius = i32::try_from(radius).unwrap_or(i32::MAX / 2);
        let mut lines = Vec::new();
        for dy in (-radius..=radius).rev() {
            let line: String = (-radius..=radius)
                .map(|dx| {
                    let offset = CellOffset::new(dx, dy);
                    match (offset == CellOffset::PIVOT, self.contains(offset)) {
                        (true, true) => '@',
                        (true, false) => '+',
                        (false, true) => '#',
                        (false, false) => '.',
                    }
                })
                .collect();
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl TryFrom<Vec<CellOffset>> for ShapeFootprint {
    type Error = ShapeError;

    fn try_from(offsets: Vec<CellOffset>) -> Result<Self, Self::Error> {
        Self::new(offsets)
    }
}

impl From<ShapeFootprint> for Vec<CellOffset> {
    fn from(footprint: ShapeFootprint) -> Self {
        footprint.offsets
    }
}

/// Inclusive offset bounds of a footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FootprintExtent {
    /// Smallest horizontal offset.
    pub min_dx: i32,
    /// Largest horizontal offset.
    pub max_dx: i32,
    /// Smallest vertical offset.
    pub min_dy: i32,
    /// Largest vertical offset.
    pub max_dy: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> ShapeFootprint {
        ShapeFootprint::new(vec![
            CellOffset::new(0, 0),
            CellOffset::new(0, 1),
            CellOffset::new(1, 0),
        ])
        .expect("valid footprint")
    }

    #[test]
    fn rejects_empty_footprint() {
        assert_eq!(ShapeFootprint::new(Vec::new()), Err(ShapeError::Empty));
    }

    #[test]
    fn rejects_duplicate_offsets() {
        let error = ShapeFootprint::new(vec![
            CellOffset::new(0, 0),
            CellOffset::new(1, 0),
            CellOffset::new(1, 0),
        ])
        .expect_err("duplicate offsets must be rejected");

        assert_eq!(
            error,
            ShapeError::DuplicateOffset {
                offset: CellOffset::new(1, 0)
            }
        );
    }

    #[test]
    fn preserves_authored_order() {
        let footprint = l_shape();
        assert_eq!(
            footprint.offsets(),
            &[
                CellOffset::new(0, 0),
                CellOffset::new(0, 1),
                CellOffset::new(1, 0)
            ]
        );
        assert_eq!(footprint.cell_count(), 3);
    }

    #[test]
    fn extent_covers_all_offsets() {
        let footprint = ShapeFootprint::new(vec![
            CellOffset::new(-1, 0),
            CellOffset::new(0, 0),
            CellOffset::new(0, 2),
        ])
        .expect("valid footprint");

        assert_eq!(
            footprint.extent(),
            FootprintExtent {
                min_dx: -1,
                max_dx: 0,
                min_dy: 0,
                max_dy: 2,
            }
        );
    }

    #[test]
    fn preview_draws_positive_dy_upward() {
        let preview = l_shape().preview(1);
        assert_eq!(preview, ".#.\n.@#\n...");
    }

    #[test]
    fn preview_marks_uncovered_pivot() {
        let footprint = ShapeFootprint::new(vec![CellOffset::new(1, 0)]).expect("valid footprint");
        assert_eq!(footprint.preview(1), "...\n.+#\n...");
    }

    #[test]
    fn deserialization_rejects_duplicates() {
        let bytes = bincode::serialize(&vec![(0, 0), (0, 0)]).expect("serialize");
        let decoded: Result<ShapeFootprint, _> = bincode::deserialize(&bytes);
        assert!(decoded.is_err(), "duplicate offsets must fail to decode");
    }

    #[test]
    fn footprint_round_trips_through_bincode() {
        let footprint = l_shape();
        let bytes = bincode::serialize(&footprint).expect("serialize");
        let restored: ShapeFootprint = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, footprint);
    }
}
