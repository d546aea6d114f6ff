//! Viewer -> server commands.
//!
//! Commands travel as JSON text: `{"event":"ROTATE","face":"RED",
//! "rotation":"CLOCKWISE"}`, `{"event":"RESET"}`, `{"event":"SCRAMBLE"}`
//! and `{"event":"CHECKERBOARD"}`.

use crate::error::ProtocolError;
use crate::grid::PieceId;
use crate::rotation::{Direction, Face};
use serde::{Deserialize, Serialize};

/// How a ROTATE names its face: by label, or by the id of the face's
/// center piece as listed in the last snapshot's `centers` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceRef {
    Label(Face),
    Piece(PieceId),
}

impl FaceRef {
    pub fn parse(text: &str) -> Self {
        match Face::from_label(text) {
            Some(face) => FaceRef::Label(face),
            None => FaceRef::Piece(PieceId::from(text)),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            FaceRef::Label(face) => face.label(),
            FaceRef::Piece(id) => id.as_str(),
        }
    }
}

impl From<Face> for FaceRef {
    fn from(face: Face) -> Self {
        FaceRef::Label(face)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rotate { face: FaceRef, rotation: Direction },
    Reset,
    Scramble,
    Checkerboard,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireCommand {
    event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    face: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<String>,
}

impl Command {
    pub fn rotate(face: impl Into<FaceRef>, rotation: Direction) -> Self {
        Command::Rotate {
            face: face.into(),
            rotation,
        }
    }

    pub fn event(&self) -> &'static str {
        match self {
            Command::Rotate { .. } => "ROTATE",
            Command::Reset => "RESET",
            Command::Scramble => "SCRAMBLE",
            Command::Checkerboard => "CHECKERBOARD",
        }
    }

    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let wire: WireCommand = serde_json::from_str(text)?;
        match wire.event.as_str() {
            "ROTATE" => {
                let face = wire.face.ok_or(ProtocolError::MissingField {
                    event: "ROTATE",
                    field: "face",
                })?;
                let rotation = wire.rotation.ok_or(ProtocolError::MissingField {
                    event: "ROTATE",
                    field: "rotation",
                })?;
                let rotation = Direction::from_label(&rotation)
                    .ok_or(ProtocolError::UnknownRotation(rotation))?;
                Ok(Command::Rotate {
                    face: FaceRef::parse(&face),
                    rotation,
                })
            }
            "RESET" => Ok(Command::Reset),
            "SCRAMBLE" => Ok(Command::Scramble),
            "CHECKERBOARD" => Ok(Command::Checkerboard),
            _ => Err(ProtocolError::UnknownEvent(wire.event)),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let (face, rotation) = match self {
            Command::Rotate { face, rotation } => (
                Some(face.as_wire().to_string()),
                Some(rotation.label().to_string()),
            ),
            _ => (None, None),
        };
        serde_json::to_string(&WireCommand {
            event: self.event().to_string(),
            face,
            rotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rotate_by_label() {
        let command =
            Command::parse(r#"{"event":"ROTATE","face":"RED","rotation":"CLOCKWISE"}"#).unwrap();
        assert_eq!(command, Command::rotate(Face::Red, Direction::Clockwise));
    }

    #[test]
    fn test_parse_rotate_by_piece_id() {
        let command = Command::parse(
            r#"{"event":"ROTATE","face":"6f1c9a1e-0000-4000-8000-000000000000","rotation":"COUNTERCLOCKWISE"}"#,
        )
        .unwrap();
        match command {
            Command::Rotate {
                face: FaceRef::Piece(id),
                rotation,
            } => {
                assert_eq!(id.as_str(), "6f1c9a1e-0000-4000-8000-000000000000");
                assert_eq!(rotation, Direction::Counterclockwise);
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_plain_events() {
        assert_eq!(Command::parse(r#"{"event":"RESET"}"#).unwrap(), Command::Reset);
        assert_eq!(
            Command::parse(r#"{"event":"SCRAMBLE"}"#).unwrap(),
            Command::Scramble
        );
        assert_eq!(
            Command::parse(r#"{"event":"CHECKERBOARD","extra":1}"#).unwrap(),
            Command::Checkerboard
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Command::parse(r#"{"face":"RED"}"#),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Command::parse(r#"{"event":"SOLVE"}"#),
            Err(ProtocolError::UnknownEvent(e)) if e == "SOLVE"
        ));
        assert!(matches!(
            Command::parse(r#"{"event":"ROTATE","rotation":"CLOCKWISE"}"#),
            Err(ProtocolError::MissingField { field: "face", .. })
        ));
        assert!(matches!(
            Command::parse(r#"{"event":"ROTATE","face":"RED"}"#),
            Err(ProtocolError::MissingField {
                field: "rotation",
                ..
            })
        ));
        assert!(matches!(
            Command::parse(r#"{"event":"ROTATE","face":"RED","rotation":"SIDEWAYS"}"#),
            Err(ProtocolError::UnknownRotation(r)) if r == "SIDEWAYS"
        ));
    }

    #[test]
    fn test_to_json_matches_wire_format() {
        let json = Command::rotate(Face::White, Direction::Counterclockwise)
            .to_json()
            .unwrap();
        assert_eq!(
            json,
            r#"{"event":"ROTATE","face":"WHITE","rotation":"COUNTERCLOCKWISE"}"#
        );
        assert_eq!(Command::Reset.to_json().unwrap(), r#"{"event":"RESET"}"#);
    }

    #[test]
    fn test_face_ref_parse() {
        assert_eq!(FaceRef::parse("BLUE"), FaceRef::Label(Face::Blue));
        assert_eq!(
            FaceRef::parse("blue"),
            FaceRef::Piece(PieceId::from("blue"))
        );
    }
}
