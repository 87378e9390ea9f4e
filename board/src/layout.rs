//! Generation of evenly spaced grid anchors.

use glam::Vec3;

use crate::grid::{Grid, LayoutError};

const DEFAULT_COLUMNS: u32 = 4;
const DEFAULT_ROWS: u32 = 5;
const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Parameters describing a uniformly spaced grid on the x/z plane.
///
/// Columns advance along +x and rows along +z, so rows that increase
/// "downward" in grid space move away from the viewer in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Number of columns to generate.
    pub columns: u32,
    /// Number of rows to generate.
    pub rows: u32,
    /// Edge length of a single cell in world units.
    pub cell_size: f32,
    /// Gap left between neighbouring cells in world units.
    pub spacing: f32,
    /// Centers the generated anchors around the world origin when set.
    pub centered: bool,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            spacing: 0.0,
            centered: true,
        }
    }
}

impl GridLayout {
    /// Creates an uncentered layout with touching cells.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
            spacing: 0.0,
            centered: false,
        }
    }

    /// Distance between the anchors of two neighbouring cells.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.spacing
    }

    /// Row-major anchors of every cell.
    #[must_use]
    pub fn anchors(&self) -> Vec<Vec3> {
        let pitch = self.pitch();
        let start_x = self.start(self.columns);
        let start_z = self.start(self.rows);

        let mut anchors = Vec::new();
        for row in 0..self.rows {
            for column in 0..self.columns {
                anchors.push(Vec3::new(
                    start_x + column as f32 * pitch,
                    0.0,
                    start_z + row as f32 * pitch,
                ));
            }
        }
        anchors
    }

    /// Builds a grid with every cell unoccupied.
    pub fn build(&self) -> Result<Grid, LayoutError> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(LayoutError::InvalidSpacing {
                spacing: self.spacing,
            });
        }

        Grid::new(self.columns, self.rows, self.anchors(), self.cell_size)
    }

    fn start(&self, count: u32) -> f32 {
        if !self.centered || count == 0 {
            return 0.0;
        }
        -((count - 1) as f32 * self.pitch()) * 0.5
    }
}
