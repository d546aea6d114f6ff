//! Authoritative cube session

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Command, Cube, CubeError, Move, Snapshot};

/// The one live cube owned by the server.
///
/// Commands are applied strictly one at a time by the server loop, so a
/// session never needs a lock of its own.
pub struct CubeSession {
    cube: Cube,
    rng: StdRng,
    pub commands_applied: u64,
    pub last_scramble: Vec<Move>,
}

impl CubeSession {
    /// Starts with a fresh solved cube. A seed makes piece ids and
    /// scrambles reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cube = Cube::new(&mut rng);
        info!("Created solved cube with {} pieces", cube.grid().len());

        Self {
            cube,
            rng,
            commands_applied: 0,
            last_scramble: Vec::new(),
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cube.snapshot()
    }

    /// Applies one command. Rejected commands leave the cube untouched.
    pub fn apply(&mut self, command: &Command) -> Result<(), CubeError> {
        match command {
            Command::Rotate { face, rotation } => {
                let resolved = match self.cube.resolve_face(face) {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!("Rejected rotation: {}", e);
                        return Err(e);
                    }
                };
                debug!("Rotating {} {}", resolved, rotation.label());
                self.cube.rotate(resolved, *rotation);
            }
            Command::Reset => {
                self.cube = Cube::new(&mut self.rng);
                info!("Cube reset");
            }
            Command::Scramble => {
                let (cube, moves) = Cube::scrambled(&mut self.rng);
                self.cube = cube;
                debug!(
                    "Scrambled with {}",
                    moves
                        .iter()
                        .map(|m| m.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                );
                self.last_scramble = moves;
                info!("Cube scrambled");
            }
            Command::Checkerboard => {
                self.cube = Cube::checkerboard(&mut self.rng);
                info!("Cube set to checkerboard");
            }
        }

        self.commands_applied += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Direction, Face, FaceRef, PieceId, CHECKERBOARD, SCRAMBLE_LENGTH};

    #[test]
    fn test_session_starts_solved() {
        let session = CubeSession::new(Some(7));
        assert!(session.cube().is_solved());
        assert!(session.snapshot().is_solved);
        assert_eq!(session.commands_applied, 0);
    }

    #[test]
    fn test_rotate_by_label_and_back() {
        let mut session = CubeSession::new(Some(7));
        session
            .apply(&Command::rotate(Face::Blue, Direction::Clockwise))
            .unwrap();
        assert!(!session.cube().is_solved());
        session
            .apply(&Command::rotate(Face::Blue, Direction::Counterclockwise))
            .unwrap();
        assert!(session.cube().is_solved());
        assert_eq!(session.commands_applied, 2);
    }

    #[test]
    fn test_rotate_by_center_id() {
        let mut session = CubeSession::new(Some(7));
        let red = session.cube().center_id(Face::Red).cloned().unwrap();
        let centers = session.snapshot().centers;

        session
            .apply(&Command::rotate(FaceRef::Piece(red), Direction::Clockwise))
            .unwrap();

        let snapshot = session.snapshot();
        assert!(!snapshot.is_solved);
        assert_eq!(snapshot.centers, centers);
    }

    #[test]
    fn test_unknown_face_leaves_cube_untouched() {
        let mut session = CubeSession::new(Some(7));
        let before = session.cube().grid().clone();

        let result = session.apply(&Command::rotate(
            FaceRef::Piece(PieceId::from("not-a-center")),
            Direction::Clockwise,
        ));

        assert_eq!(
            result,
            Err(CubeError::UnknownFace("not-a-center".to_string()))
        );
        assert_eq!(session.cube().grid(), &before);
        assert_eq!(session.commands_applied, 0);
    }

    #[test]
    fn test_reset_issues_new_identities() {
        let mut session = CubeSession::new(Some(7));
        let old_red = session.cube().center_id(Face::Red).cloned();
        session
            .apply(&Command::rotate(Face::White, Direction::Clockwise))
            .unwrap();

        session.apply(&Command::Reset).unwrap();

        assert!(session.cube().is_solved());
        assert_ne!(session.cube().center_id(Face::Red).cloned(), old_red);
    }

    #[test]
    fn test_scramble_records_moves() {
        let mut session = CubeSession::new(Some(7));
        session.apply(&Command::Scramble).unwrap();
        assert_eq!(session.last_scramble.len(), SCRAMBLE_LENGTH);
        assert!(!session.cube().is_solved());
    }

    #[test]
    fn test_checkerboard() {
        let mut session = CubeSession::new(Some(7));
        session.apply(&Command::Checkerboard).unwrap();
        assert!(!session.cube().is_solved());

        for mv in CHECKERBOARD {
            for (face, direction) in mv.turns() {
                session.apply(&Command::rotate(face, direction)).unwrap();
            }
        }
        assert!(session.cube().is_solved());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let first = CubeSession::new(Some(99));
        let second = CubeSession::new(Some(99));
        assert_eq!(first.cube().grid(), second.cube().grid());
    }
}
