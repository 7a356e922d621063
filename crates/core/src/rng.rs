//! RNG module - uniform piece draws
//!
//! Every draw picks one of the 15 catalog shapes with equal odds, independent of
//! previous draws. A small LCG keeps games reproducible from a seed.

use crate::pieces::PieceKind;
use crate::types::PIECE_COUNT;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high half of the state; the low bits of a power-of-two LCG cycle
    /// with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform catalog draw
#[derive(Debug, Clone)]
pub struct PieceDraw {
    rng: SimpleRng,
    seed: u32,
    drawn: u64,
}

impl PieceDraw {
    /// Create a draw sequence from a seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            seed,
            drawn: 0,
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        self.drawn += 1;
        let index = self.rng.next_range(PIECE_COUNT as u32) as u8;
        // next_range keeps the index below PIECE_COUNT
        PieceKind::ALL[index as usize]
    }

    /// Seed this sequence was created with (for replaying a game)
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of pieces drawn so far
    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

impl Default for PieceDraw {
    fn default() -> Self {
        Self::new(1)
    }
}
