//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, persistence).
//!
//! # Arena Dimensions
//!
//! The arena is wider than a classic playfield because it shrinks during play:
//!
//! - **Width**: 30 columns (indexed 0-29)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Boundaries**: start at column -1 and 30 (outside the grid) and move
//!   inward by one column every [`SHRINK_EVERY`] locked pieces
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Host frame interval (~60 FPS) |
//! | `DROP_INTERVAL_MS` | 1000 | Gravity: one row per second |
//!
//! # Examples
//!
//! ```
//! use shrinktris_types::{Cell, GameAction, PieceKind, ARENA_HEIGHT, ARENA_WIDTH};
//!
//! assert_eq!(PieceKind::T.tag(), 1);
//! assert_eq!(Cell::from_tag(8), Some(Cell::Wall));
//! assert_ne!(GameAction::Pause, GameAction::Restart);
//!
//! assert_eq!(ARENA_WIDTH, 30);
//! assert_eq!(ARENA_HEIGHT, 20);
//! ```

/// Arena width in cells (30 columns)
pub const ARENA_WIDTH: u8 = 30;

/// Arena height in cells (20 rows)
pub const ARENA_HEIGHT: u8 = 20;

/// Host frame interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Gravity interval: the active piece falls one row when the drop counter exceeds this.
pub const DROP_INTERVAL_MS: u32 = 1000;

/// Number of locked pieces between two shrink steps.
pub const SHRINK_EVERY: u32 = 25;

/// The arena only shrinks while `right - left` is greater than this.
pub const MIN_SHRINK_SPAN: i8 = 4;

/// Tag stored in the grid for boundary walls.
pub const WALL_TAG: u8 = 8;

/// Line clear scoring table, indexed by rows cleared in a single sweep.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Per-row score for sweeps that clear more rows than [`LINE_SCORES`] covers.
pub const OVERFLOW_LINE_SCORE: u32 = 200;


/// The seven piece kinds
///
/// Each kind carries the color tag it writes into the arena:
/// - **T**: 1
/// - **O**: 2
/// - **L**: 3
/// - **J**: 4
/// - **I**: 5
/// - **S**: 6
/// - **Z**: 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    I,
    S,
    Z,
}

impl PieceKind {
    /// All kinds, ordered by color tag.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Color tag written into the arena for this kind (1-7).
    pub fn tag(&self) -> u8 {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1..=7 => Some(Self::ALL[(tag - 1) as usize]),
            _ => None,
        }
    }
}

/// A cell of the arena (or of a piece matrix)
///
/// Maps onto the integer tags used by renderers and snapshots:
/// `Empty` = 0, `Block(kind)` = 1-7, `Wall` = 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Block(PieceKind),
    /// Boundary wall: indestructible and never part of a cleared row.
    Wall,
}

impl Cell {
    pub fn tag(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Block(kind) => kind.tag(),
            Cell::Wall => WALL_TAG,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Cell::Empty),
            WALL_TAG => Some(Cell::Wall),
            _ => PieceKind::from_tag(tag).map(Cell::Block),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDir {
    Cw,
    Ccw,
}

/// Session lifecycle
///
/// The cycle goes: NotStarted → Playing ⇄ Paused, Playing → GameOver → Playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

impl Phase {
    /// Only `Playing` runs the timed drop and accepts piece input.
    pub fn is_playing(&self) -> bool {
        matches!(self, Phase::Playing)
    }
}

/// Game actions that can be applied to modify game state
///
/// Each action maps to a specific game mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down, locking it if it cannot fall
    SoftDrop,
    /// Drop piece to its ghost row and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Start the game, toggle pause, or restart after game over
    Pause,
    /// Restart after game over
    Restart,
}

/// Core-side event emitted after a piece locks.
///
/// Consumed by observers (the binary uses it to persist high scores).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreLastEvent {
    pub lines_cleared: u32,
    pub line_clear_score: u32,
    /// The boundaries moved inward as part of this lock.
    pub shrunk: bool,
    /// The piece spawned after this lock collided immediately.
    pub game_over: bool,
}
