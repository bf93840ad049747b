//! Arena module - manages the game grid and its shrinking boundaries
//!
//! The arena is a 30x20 grid where each cell is empty, a locked block, or a wall.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..29 (left to right), y ranges 0..19 (top to bottom)
//!
//! Two boundary columns, `left` and `right`, bound the playfield. They start
//! outside the grid (-1 and 30) and move inward as the arena shrinks; while
//! inside the grid they are stamped with [`Cell::Wall`].

use log::debug;

use crate::pieces::Matrix;
use crate::types::{Cell, ARENA_HEIGHT, ARENA_WIDTH, MIN_SHRINK_SPAN};

/// Total number of cells in the arena
const ARENA_SIZE: usize = (ARENA_WIDTH as usize) * (ARENA_HEIGHT as usize);

const INITIAL_LEFT: i8 = -1;
const INITIAL_RIGHT: i8 = ARENA_WIDTH as i8;

/// The game arena - 30 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; ARENA_SIZE],
    left: i8,
    right: i8,
}

impl Arena {
    /// Create a new empty arena with unrestricted boundaries
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; ARENA_SIZE],
            left: INITIAL_LEFT,
            right: INITIAL_RIGHT,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= ARENA_WIDTH as i8 || y < 0 || y >= ARENA_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (ARENA_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        ARENA_WIDTH
    }

    pub fn height(&self) -> u8 {
        ARENA_HEIGHT
    }

    /// Leftmost bound column (inclusive). -1 until the first shrink.
    pub fn left(&self) -> i8 {
        self.left
    }

    /// Rightmost bound column (inclusive). `ARENA_WIDTH` until the first shrink.
    pub fn right(&self) -> i8 {
        self.right
    }

    /// Distance between the two boundary columns.
    pub fn span(&self) -> i8 {
        self.right - self.left
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single mino at (x, y) would conflict with the arena.
    ///
    /// Columns outside `[left, right]` or outside the grid collide, as does
    /// anything at or below the floor. Rows above the grid are open.
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        if x < self.left || x > self.right {
            return true;
        }
        if x < 0 || x >= ARENA_WIDTH as i8 || y >= ARENA_HEIGHT as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.get(x, y).map_or(true, |cell| !cell.is_empty())
    }

    /// Check whether `matrix` placed with its top-left corner at (x, y) collides
    pub fn collides(&self, matrix: &Matrix, x: i8, y: i8) -> bool {
        matrix
            .occupied()
            .iter()
            .any(|&(dx, dy, _)| self.is_blocked(x + dx, y + dy))
    }

    /// Write every occupied cell of `matrix` into the arena.
    ///
    /// Callers only merge resting placements; cells falling outside the grid are skipped.
    pub fn merge(&mut self, matrix: &Matrix, x: i8, y: i8) {
        for &(dx, dy, cell) in matrix.occupied().iter() {
            self.set(x + dx, y + dy, cell);
        }
    }

    /// Check if every cell between the boundaries is filled.
    ///
    /// Boundary columns outside the grid count as filled.
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= ARENA_HEIGHT as usize {
            return false;
        }
        (self.left..=self.right).all(|x| {
            self.get(x, y as i8)
                .map_or(true, |cell| !cell.is_empty())
        })
    }

    /// Remove row `y`, shift everything above it down and open a fresh top row
    fn remove_row(&mut self, y: usize) {
        let width = ARENA_WIDTH as usize;

        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        self.cells[..width].fill(Cell::Empty);
        self.set(self.left, 0, Cell::Wall);
        self.set(self.right, 0, Cell::Wall);
    }

    /// Remove every full row, scanning bottom to top.
    ///
    /// After a removal the same row index is examined again, since the rows
    /// above have shifted into it. Returns the number of rows removed.
    pub fn sweep(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = ARENA_HEIGHT as usize;

        while y > 0 {
            if self.is_row_full(y - 1) {
                self.remove_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        if cleared > 0 {
            debug!("swept {} row(s) between columns {}..={}", cleared, self.left, self.right);
        }
        cleared
    }

    /// Clear stale wall markers and stamp the current boundary columns in every row
    pub fn stamp_walls(&mut self) {
        let width = ARENA_WIDTH as usize;
        for y in 0..ARENA_HEIGHT as usize {
            for cell in &mut self.cells[y * width..(y + 1) * width] {
                if *cell == Cell::Wall {
                    *cell = Cell::Empty;
                }
            }
            self.set(self.left, y as i8, Cell::Wall);
            self.set(self.right, y as i8, Cell::Wall);
        }
    }

    /// Move both boundaries one column inward, if the span allows it.
    ///
    /// Returns false (and changes nothing) once `right - left` is down to the minimum.
    pub fn shrink(&mut self) -> bool {
        if self.span() <= MIN_SHRINK_SPAN {
            return false;
        }
        self.left += 1;
        self.right -= 1;
        self.stamp_walls();
        true
    }

    /// Empty every cell and restore the unrestricted boundaries
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
        self.left = INITIAL_LEFT;
        self.right = INITIAL_RIGHT;
        self.stamp_walls();
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write cell tags into a fixed-size grid (used by snapshots).
    pub fn write_tag_grid(&self, out: &mut [[u8; ARENA_WIDTH as usize]; ARENA_HEIGHT as usize]) {
        let width = ARENA_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, tag) in row.iter_mut().enumerate() {
                *tag = self.cells[y * width + x].tag();
            }
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
