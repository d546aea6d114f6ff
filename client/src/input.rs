//! Terminal input parsing into server commands

use crate::game::ViewerState;
use shared::{parse_sequence, Command, Direction, FaceRef, PieceId, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("unknown direction `{0}`, use cw or ccw")]
    UnknownDirection(String),

    #[error("piece {0} is not a face center")]
    NotACenter(String),

    #[error("{0}")]
    Script(#[from] ProtocolError),
}

/// What a line of input asks the viewer to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Send(Vec<Command>),
    Help,
    Quit,
    Nothing,
}

pub const HELP: &str = "\
commands:
  reset | scramble | checkerboard
  rotate <FACE|center-id> [cw|ccw]
  pick <piece-id> [cw|ccw]
  <moves>   e.g. R U R' U'
  help | quit";

fn parse_direction(word: Option<&str>) -> Result<Direction, InputError> {
    match word {
        None | Some("cw") => Ok(Direction::Clockwise),
        Some("ccw") => Ok(Direction::Counterclockwise),
        Some(other) => Direction::from_label(other)
            .ok_or_else(|| InputError::UnknownDirection(other.to_string())),
    }
}

/// Expands a move script into one ROTATE per quarter turn.
pub fn script_commands(script: &str) -> Result<Vec<Command>, ProtocolError> {
    Ok(parse_sequence(script)?
        .into_iter()
        .flat_map(|mv| mv.turns())
        .map(|(face, direction)| Command::rotate(face, direction))
        .collect())
}

/// Parses one input line. `pick` resolves against the last snapshot's
/// center table, the same way a click on a center sticker does.
pub fn parse_line(line: &str, state: &ViewerState) -> Result<InputAction, InputError> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(InputAction::Nothing);
    };

    let action = match first {
        "quit" | "exit" => InputAction::Quit,
        "help" => InputAction::Help,
        "reset" => InputAction::Send(vec![Command::Reset]),
        "scramble" => InputAction::Send(vec![Command::Scramble]),
        "checkerboard" => InputAction::Send(vec![Command::Checkerboard]),
        "rotate" => {
            let face = words.next().ok_or(InputError::MissingArgument("rotate"))?;
            let direction = parse_direction(words.next())?;
            InputAction::Send(vec![Command::rotate(FaceRef::parse(face), direction)])
        }
        "pick" => {
            let id = words.next().ok_or(InputError::MissingArgument("pick"))?;
            let direction = parse_direction(words.next())?;
            let face = state
                .face_for_piece(&PieceId::from(id))
                .ok_or_else(|| InputError::NotACenter(id.to_string()))?;
            InputAction::Send(vec![Command::rotate(face, direction)])
        }
        _ => InputAction::Send(script_commands(line)?),
    };
    Ok(action)
}
