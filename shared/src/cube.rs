//! The live cube: a piece grid together with the identity map captured when
//! it was created.

use crate::codec::{encode, Snapshot};
use crate::error::CubeError;
use crate::grid::{PieceGrid, PieceId};
use crate::moves::{execute, scramble, Move, CHECKERBOARD};
use crate::oracle::{is_solved, CanonicalMap};
use crate::protocol::FaceRef;
use crate::rotation::{rotate_face, Direction, Face};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Cube {
    grid: PieceGrid,
    canonical: CanonicalMap,
}

impl Cube {
    /// A fresh, painted, solved cube with new piece identities.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = PieceGrid::create(rng);
        let canonical = CanonicalMap::capture(&grid);
        grid.colorize();
        Self { grid, canonical }
    }

    /// A fresh cube with a random scramble applied. Returns the moves used.
    pub fn scrambled<R: Rng + ?Sized>(rng: &mut R) -> (Self, Vec<Move>) {
        let mut cube = Self::new(rng);
        let moves = scramble(&mut cube.grid, rng);
        (cube, moves)
    }

    /// A fresh cube with the checkerboard pattern applied.
    pub fn checkerboard<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cube = Self::new(rng);
        cube.execute(&CHECKERBOARD);
        cube
    }

    pub fn grid(&self) -> &PieceGrid {
        &self.grid
    }

    pub fn canonical(&self) -> &CanonicalMap {
        &self.canonical
    }

    pub fn rotate(&mut self, face: Face, direction: Direction) {
        rotate_face(&mut self.grid, face, direction);
    }

    pub fn execute(&mut self, moves: &[Move]) {
        execute(&mut self.grid, moves);
    }

    pub fn is_solved(&self) -> bool {
        is_solved(&self.grid, &self.canonical)
    }

    pub fn center_id(&self, face: Face) -> Option<&PieceId> {
        self.grid.cell(face.center()).first().map(|piece| &piece.id)
    }

    /// Resolve a face reference against this cube's center pieces.
    pub fn resolve_face(&self, face: &FaceRef) -> Result<Face, CubeError> {
        match face {
            FaceRef::Label(face) => Ok(*face),
            FaceRef::Piece(id) => Face::ALL
                .into_iter()
                .find(|&face| self.center_id(face) == Some(id))
                .ok_or_else(|| CubeError::UnknownFace(id.to_string())),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        encode(&self.grid, &self.canonical)
    }
}
