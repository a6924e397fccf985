//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules and state of the pair-drop puzzle. It has
//! **no dependencies** on rendering, input devices, timers or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is reachable through plain method calls
//! - **Portable**: Runs under a terminal, a GUI, a test harness or a bot
//!
//! # Module Structure
//!
//! - [`board`]: grid of empty/colored cells with bounds checks
//! - [`pieces`]: falling pairs, rotation and the move validator
//! - [`rng`]: pair generation from an injectable random source
//! - [`resolve`]: locking and the clear/gravity cascade
//! - [`scoring`]: points per popped group and level pacing
//! - [`game_state`]: the session state machine driven by commands
//! - [`snapshot`]: serializable read-only views for renderers
//!
//! # Game Rules
//!
//! - Pairs spawn at the top of the middle column, partner below the anchor
//! - Four or more orthogonally connected blobs of one color pop
//! - Blobs above popped cells fall, which can form new groups (chains)
//! - Each popped cell is worth 10 points; every group in a chain is scored
//! - A piece that locks with its anchor on the top row ends the game
//!
//! # Example
//!
//! ```
//! use puyo_sim_core::GameState;
//! use puyo_sim_core::types::GameAction;
//!
//! let mut game = GameState::new(12345);
//!
//! game.apply_action(GameAction::MoveLeft);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.pieces_locked(), 1);
//! assert!(!game.is_game_over());
//! ```
//!
//! # Timing
//!
//! The core owns no clock. Call [`GameState::tick`](game_state::GameState::tick)
//! once per gravity interval; [`types::DEFAULT_TICK_MS`] and
//! [`scoring::drop_interval_ms`] are reference cadences.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod resolve;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use puyo_sim_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameState, TickOutcome};
pub use pieces::{is_valid_move, Blob, Piece};
pub use resolve::{find_groups, resolve, ResolveReport};
pub use rng::PieceGenerator;
pub use scoring::{drop_interval_ms, group_score};
pub use snapshot::{GameSnapshot, PieceSnapshot, PlacedBlob};
