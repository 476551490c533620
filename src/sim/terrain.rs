//! Destructible barrier bitmaps
//!
//! Each barrier is a grid of solid/empty cells anchored at its top-left corner.
//! Cells only ever go from solid to empty.

use std::ops::RangeInclusive;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Aabb;

/// One barrier's destructible bitmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainMask {
    /// World position of the top-left corner of cell (0, 0)
    origin: Vec2,
    cell_size: f32,
    width: usize,
    height: usize,
    /// Row-major, `true` = solid
    cells: Vec<bool>,
    /// Solid cells left
    remaining: usize,
}

impl TerrainMask {
    /// Build from rows of `'1'` (solid) / anything else (empty)
    pub fn from_shape<S: AsRef<str>>(origin: Vec2, cell_size: f32, shape: &[S]) -> Self {
        let height = shape.len();
        let width = shape.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        let mut cells = vec![false; width * height];
        for (y, row) in shape.iter().enumerate() {
            for (x, ch) in row.as_ref().bytes().enumerate() {
                cells[y * width + x] = ch == b'1';
            }
        }
        let remaining = cells.iter().filter(|&&c| c).count();
        Self {
            origin,
            cell_size,
            width,
            height,
            cells,
            remaining,
        }
    }

    /// Build with the shape horizontally centred on `center_x`
    pub fn centered<S: AsRef<str>>(center_x: f32, top_y: f32, cell_size: f32, shape: &[S]) -> Self {
        let width = shape.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        let origin = Vec2::new(center_x - width as f32 * cell_size / 2.0, top_y);
        Self::from_shape(origin, cell_size, shape)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Solid cells left
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// True once every cell is clear; never reverts
    pub fn is_destroyed(&self) -> bool {
        self.remaining == 0
    }

    /// World-space box covering the whole grid
    pub fn hitbox(&self) -> Aabb {
        let size = Vec2::new(self.width as f32, self.height as f32) * self.cell_size;
        Aabb::new(self.origin, self.origin + size)
    }

    /// Cell coordinates containing a world point (may be out of range)
    pub fn cell_at(&self, point: Vec2) -> (i32, i32) {
        let local = (point - self.origin) / self.cell_size;
        (local.x.floor() as i32, local.y.floor() as i32)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Whether a cell is solid; out-of-range cells are empty
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(false)
    }

    /// Whether `point` lies on the grid with a solid cell within `probe` cells
    /// (square neighbourhood)
    pub fn has_cell_near(&self, point: Vec2, probe: i32) -> bool {
        let (cx, cy) = self.cell_at(point);
        if self.index(cx, cy).is_none() {
            return false;
        }
        let (xs, ys) = self.window(cx, cy, probe);
        ys.into_iter()
            .flat_map(|y| xs.clone().map(move |x| (x, y)))
            .any(|(x, y)| self.is_set(x, y))
    }

    /// Clear every cell within `radius` cells (squared distance) of the cell
    /// under `point`. Returns how many solid cells were cleared.
    pub fn blast(&mut self, point: Vec2, radius: i32) -> usize {
        let (cx, cy) = self.cell_at(point);
        let r2 = i64::from(radius).pow(2);
        let (xs, ys) = self.window(cx, cy, radius);
        let mut cleared = 0;
        for y in ys {
            for x in xs.clone() {
                let (dx, dy) = (i64::from(x - cx), i64::from(y - cy));
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                if let Some(i) = self.index(x, y) {
                    if self.cells[i] {
                        self.cells[i] = false;
                        cleared += 1;
                    }
                }
            }
        }
        self.remaining -= cleared;
        cleared
    }

    /// Cell ranges within `radius` of `(cx, cy)`, clipped to the grid
    fn window(&self, cx: i32, cy: i32, radius: i32) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let radius = radius.max(0);
        let clip = |c: i32, len: usize| {
            let last = len as i32 - 1;
            c.saturating_sub(radius).max(0)..=c.saturating_add(radius).min(last)
        };
        (clip(cx, self.width), clip(cy, self.height))
    }

    /// World-space centre of a cell
    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        self.origin + (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) * self.cell_size
    }
}
