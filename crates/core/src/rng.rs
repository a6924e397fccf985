//! RNG module - random pair generation
//!
//! Every new pair spawns at the top of the middle column with two colors drawn
//! independently and uniformly from the palette, so both blobs may share a
//! color. The random source is a type parameter: games default to a seeded
//! PCG stream for reproducible runs, tests and drivers can inject their own.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::pieces::Piece;
use crate::types::{Color, GameConfig};

/// Pair generator
#[derive(Debug, Clone)]
pub struct PieceGenerator<R = Pcg32> {
    rng: R,
    palette: &'static [Color],
    spawn_x: i16,
}

impl PieceGenerator<Pcg32> {
    /// Create a generator with a seeded PCG stream
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> PieceGenerator<R> {
    /// Create a generator drawing from `rng`
    pub fn with_rng(config: &GameConfig, rng: R) -> Self {
        Self {
            rng,
            palette: config.palette(),
            spawn_x: (config.width / 2) as i16,
        }
    }

    /// Draw one palette color
    pub fn next_color(&mut self) -> Color {
        let idx = self.rng.random_range(0..self.palette.len());
        self.palette[idx]
    }

    /// Generate the next pair at the spawn position
    pub fn generate(&mut self) -> Piece {
        let anchor = self.next_color();
        let partner = self.next_color();
        Piece::pair(self.spawn_x, 0, anchor, partner)
    }

    /// Column new pieces spawn in
    pub fn spawn_x(&self) -> i16 {
        self.spawn_x
    }

    /// Access the underlying random source (drivers reuse it for their own choices)
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
