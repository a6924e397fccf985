//! Pair-drop puzzle simulation (workspace facade crate).
//!
//! Re-exports the member crates as `puyo_sim::{core, types}` so drivers and
//! integration tests depend on a single package.

pub use puyo_sim_core as core;
pub use puyo_sim_types as types;
