//! Mapping between viewport points and terminal cells

use glam::Vec2;

use crate::{Settings, Viewport};

/// Fixed-size grid of terminal cells laid over the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGrid {
    pub cols: u16,
    pub rows: u16,
    /// Points per column
    pub cell_width: f32,
    /// Points per row
    pub cell_height: f32,
}

impl CellGrid {
    pub fn new(cols: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols,
            rows,
            cell_width,
            cell_height,
        }
    }

    /// Grid using the configured points-per-cell
    pub fn from_settings(cols: u16, rows: u16, settings: &Settings) -> Self {
        Self::new(cols, rows, settings.cell_width, settings.cell_height)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Point at the centre of a cell (where a click on that cell lands)
    pub fn cell_center(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        )
    }

    /// Cell containing `point`, if it is on the grid
    pub fn cell_at(&self, point: Vec2) -> Option<(u16, u16)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / self.cell_width) as u32;
        let row = (point.y / self.cell_height) as u32;
        if col < self.cols as u32 && row < self.rows as u32 {
            Some((col as u16, row as u16))
        } else {
            None
        }
    }

    /// Cells whose centres fall inside a disc, row-major.
    ///
    /// Always yields at least the centre cell so tiny targets stay visible.
    pub fn disc(&self, center: Vec2, radius: f32) -> Vec<(u16, u16)> {
        let Some(middle) = self.cell_at(center) else {
            return Vec::new();
        };

        let reach_cols = (radius / self.cell_width).ceil() as i32 + 1;
        let reach_rows = (radius / self.cell_height).ceil() as i32 + 1;
        let (mc, mr) = (middle.0 as i32, middle.1 as i32);

        let mut cells = Vec::new();
        for row in (mr - reach_rows).max(0)..=(mr + reach_rows).min(self.rows as i32 - 1) {
            for col in (mc - reach_cols).max(0)..=(mc + reach_cols).min(self.cols as i32 - 1) {
                let (col, row) = (col as u16, row as u16);
                if (col, row) == middle
                    || self.cell_center(col, row).distance_squared(center) <= radius * radius
                {
                    cells.push((col, row));
                }
            }
        }
        cells
    }
}
