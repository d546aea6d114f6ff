//! Solved oracle: where every piece started, and whether it is back there.
//!
//! This is a permutation check only. Piece orientation is not compared, so
//! a piece that is in its home slot but visibly twisted still counts as
//! solved.

use crate::grid::{PieceGrid, PieceId, Slot};
use std::collections::HashMap;

/// Home slot of every piece, keyed `"z-x-y-i"`, captured when the grid was
/// created.
#[derive(Debug, Clone, Default)]
pub struct CanonicalMap {
    home: HashMap<PieceId, String>,
}

impl CanonicalMap {
    pub fn capture(grid: &PieceGrid) -> Self {
        let home = grid
            .pieces()
            .map(|(slot, piece)| (piece.id.clone(), slot.canonical_key()))
            .collect();
        Self { home }
    }

    pub fn home_of(&self, id: &PieceId) -> Option<&str> {
        self.home.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.home.len()
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_empty()
    }

    fn is_home(&self, id: &PieceId, slot: Slot) -> bool {
        self.home_of(id) == Some(slot.canonical_key().as_str())
    }
}

/// True iff every piece occupies the slot it was created in.
pub fn is_solved(grid: &PieceGrid, canonical: &CanonicalMap) -> bool {
    grid.pieces()
        .all(|(slot, piece)| canonical.is_home(&piece.id, slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{execute, parse_sequence, scramble};
    use crate::rotation::{rotate_face, Direction, Face};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fresh() -> (PieceGrid, CanonicalMap) {
        let mut grid = PieceGrid::create(&mut StdRng::seed_from_u64(21));
        let canonical = CanonicalMap::capture(&grid);
        grid.colorize();
        (grid, canonical)
    }

    #[test]
    fn test_fresh_grid_is_solved() {
        let (grid, canonical) = fresh();
        assert_eq!(canonical.len(), 54);
        assert!(is_solved(&grid, &canonical));
    }

    #[test]
    fn test_single_turn_unsolves_and_inverse_resolves() {
        for face in Face::ALL {
            let (mut grid, canonical) = fresh();
            rotate_face(&mut grid, face, Direction::Clockwise);
            assert!(!is_solved(&grid, &canonical));
            rotate_face(&mut grid, face, Direction::Counterclockwise);
            assert!(is_solved(&grid, &canonical));
        }
    }

    #[test]
    fn test_home_keys_use_z_x_y_order() {
        let (grid, canonical) = fresh();
        let piece = grid.get(Slot::new(0, 1, 2, 1)).unwrap().unwrap();
        assert_eq!(canonical.home_of(&piece.id), Some("0-2-1-1"));
    }

    #[test]
    fn test_map_from_another_grid_never_matches() {
        let (grid, _) = fresh();
        let other = PieceGrid::create(&mut StdRng::seed_from_u64(22));
        let foreign = CanonicalMap::capture(&other);
        assert!(!is_solved(&grid, &foreign));
    }

    #[test]
    fn test_orientation_is_not_checked() {
        let (mut grid, canonical) = fresh();
        let slot = Slot::new(2, 1, 1, 0);
        let mut twisted = grid.get(slot).unwrap().unwrap().clone();
        twisted.orientation = Face::Red.quarter_turn(Direction::Clockwise);
        grid.set(slot, twisted).unwrap();
        assert!(is_solved(&grid, &canonical));
    }

    #[test]
    fn test_scrambled_grid_is_not_solved() {
        let (mut grid, canonical) = fresh();
        scramble(&mut grid, &mut StdRng::seed_from_u64(1));
        assert!(!is_solved(&grid, &canonical));
    }

    #[test]
    fn test_checkerboard_twice_returns_home() {
        let (mut grid, canonical) = fresh();
        let moves = parse_sequence("F2 B2 U2 D2 R2 L2").unwrap();
        execute(&mut grid, &moves);
        assert!(!is_solved(&grid, &canonical));
        execute(&mut grid, &moves);
        assert!(is_solved(&grid, &canonical));
    }
}
