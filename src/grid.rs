//! Cell matrix with a generation-stamped write mask.

use crate::element::ElementHandle;

/// Content of one grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub element: ElementHandle,
    /// Cosmetic palette index; never consulted by movement rules.
    pub color_variant: u8,
}

impl Cell {
    pub fn new(element: ElementHandle, color_variant: u8) -> Self {
        Cell {
            element,
            color_variant,
        }
    }
}

/// Row-major `width * height` cell buffer.
///
/// The write mask stores, per cell, the generation in which it was last
/// claimed. A cell counts as written iff its stamp equals the current
/// generation, so starting a tick is O(1) except once every 255 ticks when the
/// counter wraps and the stamps are cleared.
///
/// Coordinates are not clamped: callers check [`CellGrid::within_bounds`]
/// first, and out-of-range access panics on the index.
#[derive(Clone, Debug)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    empty: ElementHandle,
    written_gen: Vec<u8>,
    generation: u8,
}

impl CellGrid {
    pub fn new(width: usize, height: usize, empty: ElementHandle) -> Self {
        let size = width * height;
        CellGrid {
            width,
            height,
            cells: vec![Cell::new(empty, 0); size],
            empty,
            written_gen: vec![0; size],
            generation: 1,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn flatten_coords(&self, x: isize, y: isize) -> usize {
        y as usize * self.width + x as usize
    }

    #[inline]
    pub fn within_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn get(&self, x: isize, y: isize) -> Cell {
        self.cells[self.flatten_coords(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: isize, y: isize, cell: Cell) {
        let i = self.flatten_coords(x, y);
        self.cells[i] = cell;
    }

    #[inline]
    pub fn get_type(&self, x: isize, y: isize) -> ElementHandle {
        self.get(x, y).element
    }

    #[inline]
    pub fn is_empty(&self, x: isize, y: isize) -> bool {
        self.get_type(x, y) == self.empty
    }

    /// The sentinel cell used for unoccupied positions.
    #[inline]
    pub fn empty_cell(&self) -> Cell {
        Cell::new(self.empty, 0)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Overwrite every cell with `other`'s. Both grids must share dimensions.
    pub fn copy_cells_from(&mut self, other: &CellGrid) {
        self.cells.copy_from_slice(&other.cells);
    }

    /// Reset every cell to empty. The write mask is left alone.
    pub fn clear(&mut self) {
        let empty = self.empty_cell();
        self.cells.fill(empty);
    }

    /// Advance the generation. Must run once per tick before any mask query.
    pub fn begin_tick(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.generation = 1;
            self.written_gen.fill(0);
        }
    }

    #[inline]
    pub fn generation(&self) -> u8 {
        self.generation
    }

    #[inline]
    pub fn is_written(&self, x: isize, y: isize) -> bool {
        self.written_gen[self.flatten_coords(x, y)] == self.generation
    }

    #[inline]
    pub fn mark_written(&mut self, x: isize, y: isize) {
        let i = self.flatten_coords(x, y);
        debug_assert_ne!(
            self.written_gen[i], self.generation,
            "cell ({x}, {y}) claimed twice in one tick"
        );
        self.written_gen[i] = self.generation;
    }
}
