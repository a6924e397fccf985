//! Pieces module - falling pair shapes, rotation and collision checks
//!
//! A piece is an anchor cell plus blob offsets relative to it. Rotation turns
//! every offset by 90° around the anchor; there is no kick table, so a
//! rotation that would collide simply does not happen.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Color, Rotation, MAX_PIECE_BLOBS};

/// One colored blob of a piece, relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Blob {
    pub dx: i16,
    pub dy: i16,
    pub color: Color,
}

impl Blob {
    pub fn new(dx: i16, dy: i16, color: Color) -> Self {
        Self { dx, dy, color }
    }

    /// (dx, dy) -> (-dy, dx)
    fn rotated_cw(self) -> Self {
        Self {
            dx: -self.dy,
            dy: self.dx,
            ..self
        }
    }

    /// (dx, dy) -> (dy, -dx)
    fn rotated_ccw(self) -> Self {
        Self {
            dx: self.dy,
            dy: -self.dx,
            ..self
        }
    }
}

/// Blob list of a piece
pub type Blobs = ArrayVec<Blob, MAX_PIECE_BLOBS>;

/// Active falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub x: i16,
    pub y: i16,
    rotation: Rotation,
    blobs: Blobs,
}

impl Piece {
    /// Standard pair: anchor blob at the origin, partner directly below
    pub fn pair(x: i16, y: i16, anchor: Color, partner: Color) -> Self {
        let mut blobs = Blobs::new();
        blobs.push(Blob::new(0, 0, anchor));
        blobs.push(Blob::new(0, 1, partner));
        Self {
            x,
            y,
            rotation: Rotation::North,
            blobs,
        }
    }

    /// Piece with an arbitrary blob layout, in spawn orientation
    pub fn with_blobs(x: i16, y: i16, blobs: Blobs) -> Self {
        Self {
            x,
            y,
            rotation: Rotation::North,
            blobs,
        }
    }

    /// Rotation state, changed only together with the blob offsets
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Absolute board positions and colors of every blob
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16, Color)> + '_ {
        self.blobs
            .iter()
            .map(move |b| (self.x + b.dx, self.y + b.dy, b.color))
    }

    /// Copy of this piece shifted by (dx, dy)
    pub fn translated(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Copy of this piece turned 90° clockwise around the anchor
    pub fn rotated_cw(&self) -> Self {
        Self {
            rotation: self.rotation.rotate_cw(),
            blobs: self.blobs.iter().map(|b| b.rotated_cw()).collect(),
            ..*self
        }
    }

    /// Copy of this piece turned 90° counter-clockwise around the anchor
    pub fn rotated_ccw(&self) -> Self {
        Self {
            rotation: self.rotation.rotate_ccw(),
            blobs: self.blobs.iter().map(|b| b.rotated_ccw()).collect(),
            ..*self
        }
    }

    /// Check if the piece fits the board after shifting by (dx, dy)
    pub fn fits(&self, board: &Board, dx: i16, dy: i16) -> bool {
        is_valid_move(board, self, dx, dy)
    }
}

/// Decide whether `piece` shifted by (dx, dy) is a legal placement.
///
/// Every blob must stay inside the columns and above the floor. Blobs on
/// rows above the board (y < 0) skip the occupancy check so a piece can
/// hang partly above the spawn row.
pub fn is_valid_move(board: &Board, piece: &Piece, dx: i16, dy: i16) -> bool {
    piece.cells().all(|(x, y, _)| {
        let (x, y) = (x + dx, y + dy);
        if x < 0 || x >= board.width() as i16 || y >= board.height() as i16 {
            return false;
        }
        y < 0 || !board.is_occupied(x, y)
    })
}

/// Rotate clockwise if the turned shape fits in place
pub fn try_rotate_cw(board: &Board, piece: &Piece) -> Option<Piece> {
    let rotated = piece.rotated_cw();
    rotated.fits(board, 0, 0).then_some(rotated)
}

/// Rotate counter-clockwise if the turned shape fits in place
pub fn try_rotate_ccw(board: &Board, piece: &Piece) -> Option<Piece> {
    let rotated = piece.rotated_ccw();
    rotated.fits(board, 0, 0).then_some(rotated)
}

/// Rows the piece can still fall before resting
pub fn drop_distance(board: &Board, piece: &Piece) -> i16 {
    let mut distance = 0;
    while is_valid_move(board, piece, 0, distance + 1) {
        distance += 1;
    }
    distance
}
