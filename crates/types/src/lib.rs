//! Core types module - shared data structures, constants and configuration
//!
//! This module defines the fundamental types used throughout the simulation.
//! All types are plain data with no behavior beyond parsing and validation, so
//! they can be shared by the core, a renderer, or a driver in another process.
//!
//! # Board Dimensions
//!
//! Default playfield (override through [`GameConfig`]):
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Height**: 12 rows (indexed 0-11, row 0 at the top)
//! - **Spawn column**: `width / 2`, anchor on row 0, partner blob below it
//!
//! # Rules Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_PALETTE_SIZE` | 4 | Colors in play |
//! | `DEFAULT_MIN_GROUP_SIZE` | 4 | Connected cells needed to pop |
//! | `DEFAULT_POINTS_PER_CELL` | 10 | Score per popped cell |
//! | `DEFAULT_TICK_MS` | 500 | Reference gravity cadence (owned by the caller) |
//!
//! # Examples
//!
//! ```
//! use puyo_sim_types::{Color, GameAction, GameConfig, Rotation};
//!
//! assert_eq!(Color::from_char('r'), Some(Color::Red));
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! let config = GameConfig::default();
//! assert_eq!((config.width, config.height), (6, 12));
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board width in cells (6 columns)
pub const DEFAULT_BOARD_WIDTH: u8 = 6;

/// Default board height in cells (12 rows)
pub const DEFAULT_BOARD_HEIGHT: u8 = 12;

/// Default number of colors drawn by the piece generator
pub const DEFAULT_PALETTE_SIZE: u8 = 4;

/// Default size a same-colored group must reach before it pops
pub const DEFAULT_MIN_GROUP_SIZE: u8 = 4;

/// Default points awarded per popped cell
pub const DEFAULT_POINTS_PER_CELL: u32 = 10;

/// Reference interval between gravity ticks in milliseconds.
///
/// The core never reads this; drivers use it as their default cadence.
pub const DEFAULT_TICK_MS: u32 = 500;

/// Largest board side accepted by [`GameConfig::validate`]
pub const MAX_BOARD_SIDE: u8 = 64;

/// Maximum number of blobs a single piece can carry
pub const MAX_PIECE_BLOBS: usize = 4;

/// Blob colors, in palette order
///
/// A game with `palette_size = n` draws from the first `n` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl Color {
    /// Every color in palette order
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
    ];

    /// Number of colors the palette can hold
    pub const COUNT: u8 = Self::ALL.len() as u8;

    /// Palette index of this color
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Color at the given palette index
    ///
    /// ```
    /// use puyo_sim_types::Color;
    ///
    /// assert_eq!(Color::from_index(0), Some(Color::Red));
    /// assert_eq!(Color::from_index(4), Some(Color::Purple));
    /// assert_eq!(Color::from_index(5), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Single uppercase letter used by text grids
    pub fn as_char(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
        }
    }

    /// Inverse of [`Color::as_char`]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            'P' => Some(Color::Purple),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// Empty and colored cells are distinct variants; there is no reserved
/// "zero color".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Colored(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_colored(&self) -> bool {
        matches!(self, Cell::Colored(_))
    }

    /// Color of the cell, `None` when empty
    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Colored(c) => Some(*c),
        }
    }

    /// `.` for empty, otherwise the color letter
    pub fn as_char(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Colored(c) => c.as_char(),
        }
    }
}

impl From<Color> for Cell {
    fn from(value: Color) -> Self {
        Cell::Colored(value)
    }
}

/// Orientation of a piece
///
/// - **North**: Spawn orientation, partner blob below the anchor
/// - **East**: Rotated 90° clockwise, partner to the left
/// - **South**: Rotated 180°, partner above
/// - **West**: Rotated 270° clockwise, partner to the right
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use puyo_sim_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    ///
    /// ```
    /// use puyo_sim_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation state as a number in `0..4`
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Horizontal move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta: -1 for left, +1 for right
    pub fn dx(self) -> i16 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Commands a driver can apply to a running game
///
/// Timer ticks and player input both arrive as actions, so a driver that
/// receives them from several sources can queue them and apply them in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Rotate piece 90° clockwise around its anchor
    RotateCw,
    /// Rotate piece 90° counter-clockwise around its anchor
    RotateCcw,
    /// Drop piece one row, locking it if it cannot descend
    SoftDrop,
    /// Drop piece to its resting row and lock it
    HardDrop,
    /// One gravity step from the external clock
    Tick,
    /// Start over with an empty board
    NewGame,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase names)
    ///
    /// ```
    /// use puyo_sim_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATECW"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "tick" => Some(GameAction::Tick),
            "newgame" => Some(GameAction::NewGame),
            _ => None,
        }
    }

    /// camelCase name, inverse of [`GameAction::from_str`]
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Tick => "tick",
            GameAction::NewGame => "newGame",
        }
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// A piece is under player control
    Falling,
    /// The piece could not descend and is being resolved
    Locking,
    /// Terminal until the next `new_game`
    GameOver,
}

/// Event emitted after a piece locks.
///
/// Consumed by observers through `GameState::take_last_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockEvent {
    /// Rows the piece fell during the command that locked it
    pub drop_distance: u32,
    /// Number of clear passes that removed at least one group
    pub chains: u32,
    /// Cells removed across all passes
    pub cleared: u32,
    /// Points added by this lock
    pub score_gained: u32,
    /// The lock ended the game
    pub game_over: bool,
}

/// Rules and dimensions for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Columns
    pub width: u8,
    /// Rows
    pub height: u8,
    /// Colors drawn by the generator (taken from the front of [`Color::ALL`])
    pub palette_size: u8,
    /// Smallest connected group that pops
    pub min_group_size: u8,
    /// Score per popped cell
    pub points_per_cell: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            palette_size: DEFAULT_PALETTE_SIZE,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            points_per_cell: DEFAULT_POINTS_PER_CELL,
        }
    }
}

impl GameConfig {
    /// Check every field against the limits the core relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A spawned pair occupies rows 0 and 1 and must be able to fall.
        if self.width == 0 || self.width > MAX_BOARD_SIDE {
            return Err(ConfigError::Width(self.width));
        }
        if self.height < 3 || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::Height(self.height));
        }
        if self.palette_size == 0 || self.palette_size > Color::COUNT {
            return Err(ConfigError::PaletteSize(self.palette_size));
        }
        if self.min_group_size < 2 {
            return Err(ConfigError::MinGroupSize(self.min_group_size));
        }
        Ok(())
    }

    /// Colors in play
    pub fn palette(&self) -> &'static [Color] {
        let n = (self.palette_size as usize).min(Color::ALL.len());
        &Color::ALL[..n]
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Rejected configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    Width(u8),
    Height(u8),
    PaletteSize(u8),
    MinGroupSize(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Width(w) => {
                write!(f, "board width {w} out of range 1..={MAX_BOARD_SIDE}")
            }
            ConfigError::Height(h) => {
                write!(f, "board height {h} out of range 3..={MAX_BOARD_SIDE}")
            }
            ConfigError::PaletteSize(n) => {
                write!(f, "palette size {n} out of range 1..={}", Color::COUNT)
            }
            ConfigError::MinGroupSize(n) => {
                write!(f, "minimum group size {n} must be at least 2")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
