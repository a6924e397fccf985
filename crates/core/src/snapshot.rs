use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::pieces::Piece;
use crate::types::{Cell, Color, Phase, Rotation, MAX_PIECE_BLOBS};

/// A piece blob at its absolute board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedBlob {
    pub x: i16,
    pub y: i16,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub x: i16,
    pub y: i16,
    pub rotation: Rotation,
    pub blobs: ArrayVec<PlacedBlob, MAX_PIECE_BLOBS>,
}

impl From<&Piece> for PieceSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            x: value.x,
            y: value.y,
            rotation: value.rotation(),
            blobs: value
                .cells()
                .map(|(x, y, color)| PlacedBlob { x, y, color })
                .collect(),
        }
    }
}

/// Read-only view of a session for renderers and remote observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major cells, `height * width` entries
    pub board: Vec<Cell>,
    pub current: Option<PieceSnapshot>,
    /// Resting position of `current` after a hard drop
    pub landing: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
    pub phase: Phase,
    pub game_over: bool,
    pub episode_id: u32,
    pub score: u32,
    pub level: u32,
    pub pieces_locked: u32,
    pub total_cleared: u32,
    pub max_chain: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.board.clear();
        self.current = None;
        self.landing = None;
        self.next = None;
        self.phase = Phase::Falling;
        self.game_over = false;
        self.episode_id = 0;
        self.score = 0;
        self.level = 1;
        self.pieces_locked = 0;
        self.total_cleared = 0;
        self.max_chain = 0;
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }

    /// Cell at (x, y), `None` outside the board
    pub fn cell(&self, x: i16, y: i16) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return None;
        }
        self.board
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            current: None,
            landing: None,
            next: None,
            phase: Phase::Falling,
            game_over: false,
            episode_id: 0,
            score: 0,
            level: 1,
            pieces_locked: 0,
            total_cleared: 0,
            max_chain: 0,
        }
    }
}
