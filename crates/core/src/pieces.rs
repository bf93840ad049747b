//! Pieces module - piece matrices and the offset-search rotation
//!
//! Every piece is a small square matrix (2x2, 3x3 or 4x4). Rotation turns the
//! matrix around its own bounding box; when the turned piece does not fit, a
//! short horizontal offset search nudges it sideways before giving up.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, RotateDir};

/// Largest matrix side (the I piece)
pub const MAX_MATRIX: usize = 4;

/// Occupied minos of a matrix: (dx, dy, cell) relative to its top-left corner
pub type Minos = ArrayVec<(i8, i8, Cell), { MAX_MATRIX * MAX_MATRIX }>;

/// A square piece matrix, stored in a fixed 4x4 buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matrix {
    size: u8,
    cells: [[Cell; MAX_MATRIX]; MAX_MATRIX],
}

impl Matrix {
    /// Canonical spawn orientation for a piece kind.
    ///
    /// Returns a fresh copy; rotating it never touches the template.
    pub fn template(kind: PieceKind) -> Self {
        match kind {
            PieceKind::T => Self::from_rows(kind, &[[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
            PieceKind::O => Self::from_rows(kind, &[[1, 1], [1, 1]]),
            PieceKind::L => Self::from_rows(kind, &[[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
            PieceKind::J => Self::from_rows(kind, &[[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
            PieceKind::I => Self::from_rows(
                kind,
                &[[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            PieceKind::S => Self::from_rows(kind, &[[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
            PieceKind::Z => Self::from_rows(kind, &[[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        }
    }

    fn from_rows<const N: usize>(kind: PieceKind, rows: &[[u8; N]; N]) -> Self {
        let mut cells = [[Cell::Empty; MAX_MATRIX]; MAX_MATRIX];
        for (y, row) in rows.iter().enumerate() {
            for (x, &flag) in row.iter().enumerate() {
                if flag != 0 {
                    cells[y][x] = Cell::Block(kind);
                }
            }
        }
        Self {
            size: N as u8,
            cells,
        }
    }

    /// Side length of the matrix
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Cell at (x, y); anything outside the matrix is empty
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x >= self.size as usize || y >= self.size as usize {
            return Cell::Empty;
        }
        self.cells[y][x]
    }

    /// Non-empty cells with their offsets, row by row
    pub fn occupied(&self) -> Minos {
        let n = self.size as usize;
        let mut out = Minos::new();
        for y in 0..n {
            for x in 0..n {
                let cell = self.cells[y][x];
                if !cell.is_empty() {
                    out.push((x as i8, y as i8, cell));
                }
            }
        }
        out
    }

    /// Rotate in place: transpose, then reverse each row (clockwise)
    /// or the row order (counter-clockwise).
    pub fn rotate(&mut self, dir: RotateDir) {
        let n = self.size as usize;
        for y in 0..n {
            for x in 0..y {
                let tmp = self.cells[y][x];
                self.cells[y][x] = self.cells[x][y];
                self.cells[x][y] = tmp;
            }
        }
        match dir {
            RotateDir::Cw => {
                for row in &mut self.cells[..n] {
                    row[..n].reverse();
                }
            }
            RotateDir::Ccw => self.cells[..n].reverse(),
        }
    }

    /// Rotated copy
    pub fn rotated(mut self, dir: RotateDir) -> Self {
        self.rotate(dir);
        self
    }
}

/// Try to rotate a piece, nudging it sideways when the turned shape collides
///
/// Offsets +1, -2, +3, -4, ... are applied cumulatively to `x`, so the
/// candidates are x, x+1, x-1, x+2, ... The search gives up as soon as the
/// next offset exceeds the matrix width.
///
/// `collides(matrix, x)` reports whether a placement conflicts with the arena.
/// Returns `Some((rotated, new_x))` on success, `None` if the rotation is rejected.
pub fn try_rotate(
    matrix: &Matrix,
    x: i8,
    dir: RotateDir,
    collides: impl Fn(&Matrix, i8) -> bool,
) -> Option<(Matrix, i8)> {
    let rotated = matrix.rotated(dir);
    let width = rotated.size() as i8;

    let mut new_x = x;
    let mut offset: i8 = 1;
    while collides(&rotated, new_x) {
        new_x += offset;
        offset = -(offset + offset.signum());
        if offset > width {
            return None;
        }
    }

    Some((rotated, new_x))
}

/// Column that centres a matrix of width `size` between the boundaries
pub fn spawn_x(left: i8, right: i8, size: u8) -> i8 {
    (left + right - size as i8 + 1).div_euclid(2)
}
