//! Move compiler: face-turn notation (`F`, `R'`, `U2`, ...) and scrambling.

use crate::error::ProtocolError;
use crate::grid::PieceGrid;
use crate::rotation::{rotate_face, Direction, Face};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Number of random moves in a scramble.
pub const SCRAMBLE_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// A quarter turn clockwise as seen from outside the face.
    Plain,
    Prime,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

const fn m(face: Face, turn: Turn) -> Move {
    Move { face, turn }
}

/// All 18 move tokens.
pub const ALL_MOVES: [Move; 18] = [
    m(Face::Red, Turn::Plain),
    m(Face::Red, Turn::Prime),
    m(Face::Red, Turn::Double),
    m(Face::Orange, Turn::Plain),
    m(Face::Orange, Turn::Prime),
    m(Face::Orange, Turn::Double),
    m(Face::White, Turn::Plain),
    m(Face::White, Turn::Prime),
    m(Face::White, Turn::Double),
    m(Face::Yellow, Turn::Plain),
    m(Face::Yellow, Turn::Prime),
    m(Face::Yellow, Turn::Double),
    m(Face::Blue, Turn::Plain),
    m(Face::Blue, Turn::Prime),
    m(Face::Blue, Turn::Double),
    m(Face::Green, Turn::Plain),
    m(Face::Green, Turn::Prime),
    m(Face::Green, Turn::Double),
];

/// Doubled turns of every face. Applying it twice restores the cube.
pub const CHECKERBOARD: [Move; 6] = [
    m(Face::Red, Turn::Double),
    m(Face::Orange, Turn::Double),
    m(Face::White, Turn::Double),
    m(Face::Yellow, Turn::Double),
    m(Face::Blue, Turn::Double),
    m(Face::Green, Turn::Double),
];

fn letter(face: Face) -> char {
    match face {
        Face::Red => 'F',
        Face::Orange => 'B',
        Face::White => 'U',
        Face::Yellow => 'D',
        Face::Blue => 'R',
        Face::Green => 'L',
    }
}

fn face_for_letter(letter: char) -> Option<Face> {
    match letter {
        'F' => Some(Face::Red),
        'B' => Some(Face::Orange),
        'U' => Some(Face::White),
        'D' => Some(Face::Yellow),
        'R' => Some(Face::Blue),
        'L' => Some(Face::Green),
        _ => None,
    }
}

impl Move {
    /// The rotation engine calls this move expands to.
    pub fn turns(self) -> Vec<(Face, Direction)> {
        match self.turn {
            Turn::Plain => vec![(self.face, Direction::Clockwise)],
            Turn::Prime => vec![(self.face, Direction::Counterclockwise)],
            Turn::Double => vec![(self.face, Direction::Clockwise); 2],
        }
    }
}

impl FromStr for Move {
    type Err = ProtocolError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || ProtocolError::UnknownMove(token.to_string());
        let mut chars = token.chars();
        let face = chars.next().and_then(face_for_letter).ok_or_else(unknown)?;
        let turn = match chars.as_str() {
            "" => Turn::Plain,
            "'" => Turn::Prime,
            "2" => Turn::Double,
            _ => return Err(unknown()),
        };
        Ok(Move { face, turn })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.turn {
            Turn::Plain => "",
            Turn::Prime => "'",
            Turn::Double => "2",
        };
        write!(f, "{}{}", letter(self.face), suffix)
    }
}

/// Parse a whitespace separated move script such as `"R U R' U'"`.
pub fn parse_sequence(script: &str) -> Result<Vec<Move>, ProtocolError> {
    script.split_whitespace().map(str::parse).collect()
}

/// Apply moves left to right.
pub fn execute(grid: &mut PieceGrid, moves: &[Move]) {
    for mv in moves {
        for (face, direction) in mv.turns() {
            rotate_face(grid, face, direction);
        }
    }
}

/// Apply [`SCRAMBLE_LENGTH`] moves drawn uniformly with replacement from
/// all 18 tokens. Returns the drawn moves.
pub fn scramble<R: Rng + ?Sized>(grid: &mut PieceGrid, rng: &mut R) -> Vec<Move> {
    let moves: Vec<Move> = (0..SCRAMBLE_LENGTH)
        .map(|_| ALL_MOVES[rng.gen_range(0..ALL_MOVES.len())])
        .collect();
    execute(grid, &moves);
    moves
}
