//! # Cube State Machine
//!
//! Shared model of a 3x3x3 twisty puzzle whose authoritative copy lives on
//! the server and whose read-only copies live in every viewer.
//!
//! ## Modules
//!
//! - `grid`: the 27 positions, 54 sticker pieces and their geometry
//! - `rotation`: the face table and the quarter-turn routine
//! - `moves`: `F`/`B`/`U`/`D`/`R`/`L` notation, scripts and scrambles
//! - `oracle`: canonical home slots and the solved check
//! - `codec`: snapshots sent to viewers, and their decoding
//! - `protocol`: commands sent by viewers
//! - `cube`: a grid bundled with the identity map it was created with
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use shared::{Cube, Direction, Face};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut cube = Cube::new(&mut rng);
//! cube.rotate(Face::Red, Direction::Clockwise);
//! assert!(!cube.is_solved());
//! cube.rotate(Face::Red, Direction::Counterclockwise);
//! assert!(cube.is_solved());
//! ```

pub mod codec;
pub mod cube;
pub mod error;
pub mod grid;
pub mod moves;
pub mod oracle;
pub mod protocol;
pub mod rotation;

pub use codec::{decode, encode, Snapshot};
pub use cube::Cube;
pub use error::{CodecError, CubeError, GridError, ProtocolError};
pub use grid::{Color, Piece, PieceGrid, PieceId, Position, Slot};
pub use moves::{execute, parse_sequence, scramble, Move, Turn, CHECKERBOARD, SCRAMBLE_LENGTH};
pub use oracle::{is_solved, CanonicalMap};
pub use protocol::{Command, FaceRef};
pub use rotation::{rotate_face, Direction, Face};

/// Default WebSocket port of the cube server.
pub const DEFAULT_PORT: u16 = 8888;
