//! Terminal rendering for the game.
//!
//! A small game-oriented rendering layer: [`GameView`] paints a
//! [`core::GameSnapshot`] into a [`FrameBuffer`], and [`TerminalRenderer`]
//! flushes framebuffers to the terminal with diffed redraws. No widget
//! toolkit is involved, which keeps aspect ratio (2 columns per cell) and
//! colors fully under our control.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use shrinktris_core as core;
pub use shrinktris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tag_color, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
