//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on UI, storage, or terminal I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences
//! - **Testable**: Every rule is reachable through [`GameSession::apply_action`] and [`GameSession::tick`]
//! - **Portable**: Can run in any host loop (terminal, GUI, headless)
//! - **Fast**: Fixed-size arena and piece matrices, no allocation per tick
//!
//! # Module Structure
//!
//! - [`arena`]: 30x20 grid with shrinking boundaries, collision, merge and sweep
//! - [`pieces`]: Piece matrices, transpose/reverse rotation and the offset search
//! - [`rng`]: Uniform piece generation with a one-piece preview
//! - [`scoring`]: Line clear score table
//! - [`session`]: Complete game state, lock sequence and the phase machine
//! - [`snapshot`]: Read-only view handed to renderers
//!
//! # Game Rules
//!
//! - **Gravity**: the piece falls one row once the drop counter passes 1000ms
//! - **Rotation**: matrix turn with sideways nudges (+1, -2, +3, ...), no SRS
//! - **Ghost Piece**: Shows where the current piece will land
//! - **Scoring**: 100/300/500/800 for 1-4 rows, 200 per row beyond that
//! - **Shrinking**: every 25 locked pieces both walls move one column inward
//!
//! # Example
//!
//! ```
//! use shrinktris_core::GameSession;
//! use shrinktris_types::{GameAction, Phase};
//!
//! let mut game = GameSession::new(12345);
//! game.apply_action(GameAction::Pause); // start
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.pieces_placed(), 1);
//! ```

pub mod arena;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use shrinktris_types as types;

// Re-export commonly used types for convenience
pub use arena::Arena;
pub use pieces::{spawn_x, try_rotate, Matrix};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::line_clear_score;
pub use session::{GameSession, Player};
pub use snapshot::{ActiveSnapshot, GameSnapshot, TagGrid};
