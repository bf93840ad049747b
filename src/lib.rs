//! Shrinktris (workspace facade crate).
//!
//! Re-exports the workspace crates as `shrinktris::{core,input,store,term,types}`
//! and holds the runtime configuration used by the binary.

pub mod config;

pub use shrinktris_core as core;
pub use shrinktris_input as input;
pub use shrinktris_store as store;
pub use shrinktris_term as term;
pub use shrinktris_types as types;
