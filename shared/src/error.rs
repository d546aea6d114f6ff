//! Error types for the cube state machine and its wire formats.

use thiserror::Error;

/// Errors raised by direct piece grid access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("slot ({z}, {y}, {x}) is outside the 3x3x3 grid")]
    OutOfBounds { z: usize, y: usize, x: usize },

    #[error("slot ({z}, {y}, {x}) holds {len} pieces, part {part} does not exist")]
    NoSuchPart {
        z: usize,
        y: usize,
        x: usize,
        part: usize,
        len: usize,
    },
}

/// Errors raised while parsing a client command.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    #[error("event {event} is missing field `{field}`")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },

    #[error("unknown rotation `{0}`")]
    UnknownRotation(String),

    #[error("unknown move token `{0}`")]
    UnknownMove(String),
}

/// Errors raised while rebuilding a grid from a snapshot.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot grid must be 3x3x3, found a {level} of length {len}")]
    Shape { level: &'static str, len: usize },

    #[error("snapshot slot ({z}, {y}, {x}) holds {len} pieces, expected {expected}")]
    Cardinality {
        z: usize,
        y: usize,
        x: usize,
        len: usize,
        expected: usize,
    },

    #[error("piece {id} has {len} geometry values, not a multiple of 3")]
    Geometry { id: String, len: usize },

    #[error("piece {id} has unknown color {color:#08x}")]
    UnknownColor { id: String, color: u32 },

    #[error("piece {id} has unknown euler order `{order}`")]
    UnknownOrder { id: String, order: String },
}

/// Errors raised when applying a command to the live cube.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CubeError {
    #[error("`{0}` is neither a face label nor a face center id")]
    UnknownFace(String),
}
