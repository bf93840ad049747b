//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Every key
//! press is a discrete action; there is no auto-repeat handling.

pub mod map;

pub use shrinktris_types as types;

pub use map::{handle_key_event, should_quit};
