//! Footprint fit validation.
//!
//! A footprint fits at a pivot when every covered cell lies inside the grid
//! and is unoccupied. Validation never mutates occupancy, so the planner can
//! probe candidate pivots speculatively.

use block_slide_core::{CellCoord, CellOffset, PlacementError, ShapeFootprint};

use crate::grid::{Grid, GridError};

/// Grid cell covered by `offset` when the footprint is anchored at `pivot`.
///
/// Footprint offsets point "up" along `dy` while grid rows grow "downward",
/// so the vertical component is subtracted.
pub fn covered_cell(
    grid: &Grid,
    pivot: CellCoord,
    offset: CellOffset,
) -> Result<CellCoord, GridError> {
    let column = i64::from(pivot.column()) + i64::from(offset.dx());
    let row = i64::from(pivot.row()) - i64::from(offset.dy());

    let cell = match (u32::try_from(column), u32::try_from(row)) {
        (Ok(column), Ok(row)) => Some(CellCoord::new(column, row)),
        _ => None,
    };

    match cell {
        Some(cell) if grid.is_in_bounds(cell) => Ok(cell),
        _ => Err(GridError::OutOfBounds {
            column,
            row,
            columns: grid.columns(),
            rows: grid.rows(),
        }),
    }
}

/// Every cell covered by the footprint at `pivot`, in footprint order.
///
/// Fails on the first covered cell outside the grid.
pub fn covered_cells(
    grid: &Grid,
    pivot: CellCoord,
    footprint: &ShapeFootprint,
) -> Result<Vec<CellCoord>, GridError> {
    footprint
        .offsets()
        .iter()
        .map(|offset| covered_cell(grid, pivot, *offset))
        .collect()
}

/// Validates the footprint at `pivot`, reporting the first failing reason.
pub fn check(
    grid: &Grid,
    pivot: CellCoord,
    footprint: &ShapeFootprint,
) -> Result<(), PlacementError> {
    for offset in footprint.offsets() {
        let cell = covered_cell(grid, pivot, *offset).map_err(|_| PlacementError::OutOfBounds)?;
        if grid.is_occupied(cell).map_err(|_| PlacementError::OutOfBounds)? {
            return Err(PlacementError::Occupied);
        }
    }
    Ok(())
}

/// Reports whether the footprint can be placed at `pivot`.
#[must_use]
pub fn fits(grid: &Grid, pivot: CellCoord, footprint: &ShapeFootprint) -> bool {
    check(grid, pivot, footprint).is_ok()
}
