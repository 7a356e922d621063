//! Pieces module - the fixed catalog of 15 shapes
//!
//! Every shape lives in a 3x3 window. `blocks[x][y]` is true when the cell at
//! column `x`, row `y` of the window is part of the shape. The centre cell
//! `(1, 1)` is the anchor that lines up with the targeted board cell.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::types::PIECE_COUNT;

/// 3x3 occupancy window, indexed `[x][y]`
pub type Blocks = [[bool; 3]; 3];

/// Offset of a single block relative to the anchor, each axis in `-1..=1`
pub type BlockOffset = (i32, i32);

/// The 15 catalog shapes, in catalog index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    Line,
    C,
    Plus,
    Dot,
    Square,
    L,
    J,
    S,
    Z,
    T,
    X,
    Corner,
    InverseCorner,
    Double,
    Triple,
}

impl PieceKind {
    /// All kinds, position equals catalog index
    pub const ALL: [PieceKind; PIECE_COUNT as usize] = [
        PieceKind::Line,
        PieceKind::C,
        PieceKind::Plus,
        PieceKind::Dot,
        PieceKind::Square,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
        PieceKind::X,
        PieceKind::Corner,
        PieceKind::InverseCorner,
        PieceKind::Double,
        PieceKind::Triple,
    ];

    /// Look up a kind by catalog index
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrecs_core::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_index(0), Some(PieceKind::Line));
    /// assert_eq!(PieceKind::from_index(14), Some(PieceKind::Triple));
    /// assert_eq!(PieceKind::from_index(15), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Colour value this shape is associated with (`index + 1`)
    pub fn value(&self) -> u8 {
        self.index() + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::Line => "Line",
            PieceKind::C => "C",
            PieceKind::Plus => "Plus",
            PieceKind::Dot => "Dot",
            PieceKind::Square => "Square",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::T => "T",
            PieceKind::X => "X",
            PieceKind::Corner => "Corner",
            PieceKind::InverseCorner => "Inverse Corner",
            PieceKind::Double => "Double",
            PieceKind::Triple => "Triple",
        }
    }

    /// Unrotated occupancy for this kind
    pub fn blocks(&self) -> Blocks {
        let rows: [[u8; 3]; 3] = match self {
            PieceKind::Line => [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
            PieceKind::C => [[0, 0, 0], [1, 1, 1], [1, 0, 1]],
            PieceKind::Plus => [[0, 1, 0], [1, 1, 1], [0, 1, 0]],
            PieceKind::Dot => [[0, 0, 0], [0, 1, 0], [0, 0, 0]],
            PieceKind::Square => [[1, 1, 0], [1, 1, 0], [0, 0, 0]],
            PieceKind::L => [[0, 0, 0], [1, 1, 1], [0, 0, 1]],
            PieceKind::J => [[0, 0, 1], [1, 1, 1], [0, 0, 0]],
            PieceKind::S => [[0, 0, 0], [1, 1, 0], [0, 1, 1]],
            PieceKind::Z => [[0, 0, 0], [0, 1, 1], [1, 1, 0]],
            PieceKind::T => [[1, 0, 0], [1, 1, 0], [1, 0, 0]],
            PieceKind::X => [[1, 0, 1], [0, 1, 0], [1, 0, 1]],
            PieceKind::Corner => [[0, 0, 0], [1, 1, 0], [1, 0, 0]],
            PieceKind::InverseCorner => [[1, 0, 0], [1, 1, 0], [0, 0, 0]],
            PieceKind::Double => [[0, 1, 0], [0, 1, 0], [0, 0, 0]],
            PieceKind::Triple => [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
        };

        let mut blocks = [[false; 3]; 3];
        for (x, column) in rows.iter().enumerate() {
            for (y, &cell) in column.iter().enumerate() {
                blocks[x][y] = cell == 1;
            }
        }
        blocks
    }
}

/// A catalog piece in a given orientation
///
/// Pieces are values: rotating returns a new piece and leaves the original
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    kind: PieceKind,
    blocks: Blocks,
    /// Clockwise quarter turns applied since creation, `0..4`
    rotation: u8,
}

impl Piece {
    /// Create a piece of the given kind in its catalog orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            blocks: kind.blocks(),
            rotation: 0,
        }
    }

    /// Create a piece from its catalog index
    pub fn from_index(index: u8) -> Option<Self> {
        PieceKind::from_index(index).map(Self::new)
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn index(&self) -> u8 {
        self.kind.index()
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    /// Whether window cell `(x, y)` is part of the shape. Outside the window is never filled.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < 3 && y < 3 && self.blocks[x][y]
    }

    /// Rotate clockwise by `quarter_turns` (taken modulo 4)
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        let mut piece = *self;
        for _ in 0..quarter_turns % 4 {
            piece = piece.rotated_once();
        }
        piece
    }

    fn rotated_once(&self) -> Self {
        let mut blocks = [[false; 3]; 3];
        for (x, column) in blocks.iter_mut().enumerate() {
            for (y, cell) in column.iter_mut().enumerate() {
                *cell = self.blocks[y][2 - x];
            }
        }
        Self {
            kind: self.kind,
            blocks,
            rotation: (self.rotation + 1) % 4,
        }
    }

    /// Offsets of the occupied cells relative to the anchor, column-major
    pub fn offsets(&self) -> ArrayVec<BlockOffset, 9> {
        let mut out = ArrayVec::new();
        for x in 0..3 {
            for y in 0..3 {
                if self.blocks[x][y] {
                    out.push((x as i32 - 1, y as i32 - 1));
                }
            }
        }
        out
    }

    /// Number of occupied cells
    pub fn size(&self) -> usize {
        self.blocks.iter().flatten().filter(|&&b| b).count()
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.kind.name(), self.kind.index())
    }
}
