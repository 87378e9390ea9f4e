//! Fixed rectangular grid of anchored cells with occupancy flags.

use block_slide_core::CellCoord;
use glam::{Vec2, Vec3};
use thiserror::Error;

/// Contract violations raised when a caller addresses a cell outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside `[0, columns) x [0, rows)`.
    ///
    /// Coordinates are signed so footprint math that underflows the grid can
    /// be reported faithfully.
    #[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Column that was addressed.
        column: i64,
        /// Row that was addressed.
        row: i64,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
}

/// Authoring errors detected while constructing a grid.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The grid must contain at least one column and one row.
    #[error("grid dimensions {columns}x{rows} must both be positive")]
    EmptyGrid {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The anchor list does not provide exactly one anchor per cell.
    #[error("grid expects {expected} anchors but {actual} were provided")]
    AnchorCountMismatch {
        /// Number of cells in the grid.
        expected: usize,
        /// Number of anchors supplied.
        actual: usize,
    },
    /// Cell size must be a positive finite length.
    #[error("cell size must be positive and finite (received {cell_size})")]
    InvalidCellSize {
        /// Provided cell size.
        cell_size: f32,
    },
    /// Spacing between generated cells must be non-negative and finite.
    #[error("cell spacing must be non-negative and finite (received {spacing})")]
    InvalidSpacing {
        /// Provided spacing.
        spacing: f32,
    },
}

#[derive(Clone, Copy, Debug)]
struct GridCell {
    anchor: Vec3,
    occupied: bool,
}

/// Grid of cells stored in row-major order.
///
/// Every coordinate inside the dimensions is backed by exactly one cell whose
/// world anchor never changes after construction. Only occupancy is mutable,
/// and only through [`Grid::mark`] and [`Grid::unmark`].
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    step: Vec2,
    cells: Vec<GridCell>,
}

impl Grid {
    /// Creates a grid from row-major world anchors.
    pub fn new(
        columns: u32,
        rows: u32,
        anchors: Vec<Vec3>,
        cell_size: f32,
    ) -> Result<Self, LayoutError> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid { columns, rows });
        }

        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(LayoutError::InvalidCellSize { cell_size });
        }

        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX);
        if anchors.len() != expected {
            return Err(LayoutError::AnchorCountMismatch {
                expected,
                actual: anchors.len(),
            });
        }

        let step = anchor_step(&anchors, columns, cell_size);
        let cells = anchors
            .into_iter()
            .map(|anchor| GridCell {
                anchor,
                occupied: false,
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            cell_size,
            step,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a single cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Signed world offset between neighbouring anchors.
    ///
    /// `x` is the step along x from one column to the next and `y` the step
    /// along z from one row to the next, measured from the first column and
    /// row. Axes with a single cell, or anchors that coincide, fall back to
    /// the cell size.
    #[must_use]
    pub const fn step(&self) -> Vec2 {
        self.step
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub fn is_in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Coordinate of the cell whose anchor lies nearest to the point.
    ///
    /// Distances are measured in the x/z plane. Ties resolve to the cell
    /// encountered first in row-major order. The scan visits every cell so
    /// irregular anchor layouts map correctly.
    #[must_use]
    pub fn coordinate_from_world(&self, point: Vec3) -> CellCoord {
        let target = planar(point);
        let mut closest = CellCoord::new(0, 0);
        let mut closest_distance = f32::INFINITY;
        let mut cells = self.cells.iter();

        for row in 0..self.rows {
            for column in 0..self.columns {
                let Some(cell) = cells.next() else {
                    return closest;
                };
                let distance = planar(cell.anchor).distance_squared(target);
                if distance < closest_distance {
                    closest_distance = distance;
                    closest = CellCoord::new(column, row);
                }
            }
        }

        closest
    }

    /// World anchor stored for the cell.
    pub fn world_from_coordinate(&self, cell: CellCoord) -> Result<Vec3, GridError> {
        self.cell(cell).map(|cell| cell.anchor)
    }

    /// Reports whether the cell is occupied.
    pub fn is_occupied(&self, cell: CellCoord) -> Result<bool, GridError> {
        self.cell(cell).map(|cell| cell.occupied)
    }

    /// Marks the cell occupied. Marking an occupied cell is a no-op.
    pub fn mark(&mut self, cell: CellCoord) -> Result<(), GridError> {
        self.cell_mut(cell)?.occupied = true;
        Ok(())
    }

    /// Clears the cell's occupied flag. Unmarking a free cell is a no-op.
    pub fn unmark(&mut self, cell: CellCoord) -> Result<(), GridError> {
        self.cell_mut(cell)?.occupied = false;
        Ok(())
    }

    /// Axis-aligned extent of every anchor expanded by half a cell on x and z.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let first = self.cells.first().map_or(Vec3::ZERO, |cell| cell.anchor);
        let (min, max) = self
            .cells
            .iter()
            .fold((first, first), |(min, max), cell| {
                (min.min(cell.anchor), max.max(cell.anchor))
            });

        let half = self.cell_size * 0.5;
        let padding = Vec3::new(half, 0.0, half);
        (min - padding, max + padding)
    }

    /// Size of [`Grid::bounds`] along the x axis.
    #[must_use]
    pub fn width(&self) -> f32 {
        let (min, max) = self.bounds();
        max.x - min.x
    }

    /// Size of [`Grid::bounds`] along the z axis.
    #[must_use]
    pub fn length(&self) -> f32 {
        let (min, max) = self.bounds();
        max.z - min.z
    }

    /// Number of cells currently marked occupied.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.occupied).count()
    }

    /// Captures a read-only view of the occupancy flags.
    #[must_use]
    pub fn occupancy_view(&self) -> OccupancyView<'_> {
        OccupancyView { grid: self }
    }

    fn out_of_bounds(&self, cell: CellCoord) -> GridError {
        GridError::OutOfBounds {
            column: i64::from(cell.column()),
            row: i64::from(cell.row()),
            columns: self.columns,
            rows: self.rows,
        }
    }

    fn cell(&self, cell: CellCoord) -> Result<&GridCell, GridError> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .ok_or_else(|| self.out_of_bounds(cell))
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Result<&mut GridCell, GridError> {
        let error = self.out_of_bounds(cell);
        match self.index(cell) {
            Some(index) => self.cells.get_mut(index).ok_or(error),
            None => Err(error),
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.is_in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Read-only view into the grid's occupancy flags.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    grid: &'a Grid,
}

impl<'a> OccupancyView<'a> {
    /// Reports whether the cell is occupied. Cells outside the grid report `false`.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.grid.is_occupied(cell).unwrap_or(false)
    }

    /// Iterates every cell in row-major order with its occupancy flag.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, bool)> + 'a {
        let grid = self.grid;
        let columns = grid.columns;
        (0..grid.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
            .zip(grid.cells.iter().map(|cell| cell.occupied))
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.grid.columns, self.grid.rows)
    }
}

fn anchor_step(anchors: &[Vec3], columns: u32, cell_size: f32) -> Vec2 {
    let origin = anchors.first().copied().unwrap_or(Vec3::ZERO);
    let measure = |neighbor: Option<&Vec3>, axis: fn(Vec3) -> f32| {
        neighbor
            .map(|anchor| axis(*anchor) - axis(origin))
            .filter(|step| step.abs() > f32::EPSILON)
            .unwrap_or(cell_size)
    };

    let next_row = usize::try_from(columns)
        .ok()
        .and_then(|columns| anchors.get(columns));
    let next_column = if columns > 1 { anchors.get(1) } else { None };
    Vec2::new(
        measure(next_column, |anchor: Vec3| anchor.x),
        measure(next_row, |anchor: Vec3| anchor.z),
    )
}

fn planar(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}
