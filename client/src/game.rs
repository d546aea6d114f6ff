//! Client-side cube state materialized from server snapshots

use log::debug;
use shared::{decode, CodecError, Face, PieceGrid, PieceId, Snapshot};
use std::collections::BTreeMap;

/// Read-only copy of the server's cube.
///
/// Every snapshot replaces the whole local state; the viewer never edits
/// its grid, it only asks the server to.
#[derive(Debug, Default)]
pub struct ViewerState {
    grid: Option<PieceGrid>,
    last: Option<Snapshot>,
    pub snapshots_received: u64,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces local state with a decoded snapshot. A snapshot that fails
    /// to decode leaves the previous state in place.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), CodecError> {
        let grid = decode(snapshot)?;
        self.store(grid, snapshot.clone());
        Ok(())
    }

    pub fn apply_text(&mut self, text: &str) -> Result<(), CodecError> {
        let snapshot = Snapshot::from_json(text)?;
        let grid = decode(&snapshot)?;
        self.store(grid, snapshot);
        Ok(())
    }

    fn store(&mut self, grid: PieceGrid, snapshot: Snapshot) {
        self.grid = Some(grid);
        self.snapshots_received += 1;
        debug!(
            "Applied snapshot {} (solved: {})",
            self.snapshots_received, snapshot.is_solved
        );
        self.last = Some(snapshot);
    }

    pub fn grid(&self) -> Option<&PieceGrid> {
        self.grid.as_ref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.grid.is_some()
    }

    pub fn is_solved(&self) -> bool {
        self.last.as_ref().map_or(false, |snapshot| snapshot.is_solved)
    }

    /// Center table of the last snapshot.
    pub fn centers(&self) -> Option<&BTreeMap<PieceId, Face>> {
        self.last.as_ref().map(|snapshot| &snapshot.centers)
    }

    /// Face turned by a click on this piece, if it is a face center.
    pub fn face_for_piece(&self, id: &PieceId) -> Option<Face> {
        self.last.as_ref().and_then(|snapshot| snapshot.face_of(id))
    }

    pub fn center_of(&self, face: Face) -> Option<&PieceId> {
        self.last.as_ref().and_then(|snapshot| snapshot.center_of(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{Cube, Direction};

    fn snapshot_of(cube: &Cube) -> Snapshot {
        cube.snapshot()
    }

    #[test]
    fn test_empty_state() {
        let state = ViewerState::new();
        assert!(!state.has_snapshot());
        assert!(!state.is_solved());
        assert!(state.centers().is_none());
        assert_eq!(state.center_of(Face::Red), None);
    }

    #[test]
    fn test_apply_snapshot_mirrors_server() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cube = Cube::new(&mut rng);
        cube.rotate(Face::White, Direction::Clockwise);

        let mut state = ViewerState::new();
        state.apply_snapshot(&snapshot_of(&cube)).unwrap();

        assert_eq!(state.grid(), Some(cube.grid()));
        assert!(!state.is_solved());
        assert_eq!(state.snapshots_received, 1);
    }

    #[test]
    fn test_face_lookup_by_center() {
        let mut rng = StdRng::seed_from_u64(3);
        let cube = Cube::new(&mut rng);
        let mut state = ViewerState::new();
        state.apply_snapshot(&snapshot_of(&cube)).unwrap();

        for face in Face::ALL {
            let id = state.center_of(face).cloned().unwrap();
            assert_eq!(state.face_for_piece(&id), Some(face));
        }
        assert_eq!(state.face_for_piece(&PieceId::from("elsewhere")), None);
    }

    #[test]
    fn test_bad_text_keeps_previous_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let cube = Cube::new(&mut rng);
        let mut state = ViewerState::new();
        state
            .apply_text(&snapshot_of(&cube).to_json().unwrap())
            .unwrap();

        assert!(state.apply_text("{\"isSolved\":true}").is_err());
        assert!(state.is_solved());
        assert_eq!(state.grid(), Some(cube.grid()));
        assert_eq!(state.snapshots_received, 1);
    }

    #[test]
    fn test_lookups_follow_latest_snapshot() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = Cube::new(&mut rng);
        let second = Cube::new(&mut rng);
        let mut state = ViewerState::new();

        state.apply_snapshot(&snapshot_of(&first)).unwrap();
        let old_red = state.center_of(Face::Red).cloned().unwrap();

        state.apply_snapshot(&snapshot_of(&second)).unwrap();
        assert_eq!(state.face_for_piece(&old_red), None);
        assert_eq!(state.centers(), Some(&snapshot_of(&second).centers));
        assert_eq!(
            state.center_of(Face::Red),
            snapshot_of(&second).center_of(Face::Red)
        );
    }
}
