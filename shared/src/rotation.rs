//! Rotation engine: quarter turns of the six outer faces.
//!
//! Every face is described by one row of a fixed table (normal axis, the
//! layer index held fixed, the outward sign, and the clockwise corner and
//! edge 4-cycles). A single routine turns any face from its row.

use crate::grid::{Axis, Color, PieceGrid, Position};
use nalgebra::{Rotation3, Unit};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Face {
    Red,
    Orange,
    Blue,
    Green,
    White,
    Yellow,
}

/// Turn sense as seen from outside the face, looking at the cube center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Clockwise,
    Counterclockwise,
}

impl Direction {
    pub fn inverse(self) -> Self {
        match self {
            Direction::Clockwise => Direction::Counterclockwise,
            Direction::Counterclockwise => Direction::Clockwise,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Clockwise => "CLOCKWISE",
            Direction::Counterclockwise => "COUNTERCLOCKWISE",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "CLOCKWISE" => Some(Direction::Clockwise),
            "COUNTERCLOCKWISE" => Some(Direction::Counterclockwise),
            _ => None,
        }
    }
}

/// One row of the face table.
#[derive(Debug)]
pub struct FaceTurn {
    pub axis: Axis,
    /// Index along `axis` shared by the face's 9 positions.
    pub fixed: usize,
    /// +1 when the outward normal points along +axis.
    pub sign: i8,
    /// Clockwise order: the group at `corners[k]` moves to `corners[k + 1]`.
    pub corners: [Position; 4],
    pub edges: [Position; 4],
}

const fn p(z: usize, y: usize, x: usize) -> Position {
    Position::new(z, y, x)
}

const RED: FaceTurn = FaceTurn {
    axis: Axis::Z,
    fixed: 2,
    sign: 1,
    corners: [p(2, 0, 0), p(2, 2, 0), p(2, 2, 2), p(2, 0, 2)],
    edges: [p(2, 0, 1), p(2, 1, 0), p(2, 2, 1), p(2, 1, 2)],
};

const ORANGE: FaceTurn = FaceTurn {
    axis: Axis::Z,
    fixed: 0,
    sign: -1,
    corners: [p(0, 0, 0), p(0, 0, 2), p(0, 2, 2), p(0, 2, 0)],
    edges: [p(0, 0, 1), p(0, 1, 2), p(0, 2, 1), p(0, 1, 0)],
};

const BLUE: FaceTurn = FaceTurn {
    axis: Axis::X,
    fixed: 2,
    sign: 1,
    corners: [p(2, 0, 2), p(2, 2, 2), p(0, 2, 2), p(0, 0, 2)],
    edges: [p(1, 0, 2), p(2, 1, 2), p(1, 2, 2), p(0, 1, 2)],
};

const GREEN: FaceTurn = FaceTurn {
    axis: Axis::X,
    fixed: 0,
    sign: -1,
    corners: [p(0, 0, 0), p(0, 2, 0), p(2, 2, 0), p(2, 0, 0)],
    edges: [p(0, 1, 0), p(1, 2, 0), p(2, 1, 0), p(1, 0, 0)],
};

const WHITE: FaceTurn = FaceTurn {
    axis: Axis::Y,
    fixed: 2,
    sign: 1,
    corners: [p(0, 2, 0), p(0, 2, 2), p(2, 2, 2), p(2, 2, 0)],
    edges: [p(0, 2, 1), p(1, 2, 2), p(2, 2, 1), p(1, 2, 0)],
};

const YELLOW: FaceTurn = FaceTurn {
    axis: Axis::Y,
    fixed: 0,
    sign: -1,
    corners: [p(0, 0, 0), p(2, 0, 0), p(2, 0, 2), p(0, 0, 2)],
    edges: [p(0, 0, 1), p(1, 0, 0), p(2, 0, 1), p(1, 0, 2)],
};

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Red,
        Face::Orange,
        Face::Blue,
        Face::Green,
        Face::White,
        Face::Yellow,
    ];

    pub fn turn(self) -> &'static FaceTurn {
        match self {
            Face::Red => &RED,
            Face::Orange => &ORANGE,
            Face::Blue => &BLUE,
            Face::Green => &GREEN,
            Face::White => &WHITE,
            Face::Yellow => &YELLOW,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Face::Red => "RED",
            Face::Orange => "ORANGE",
            Face::Blue => "BLUE",
            Face::Green => "GREEN",
            Face::White => "WHITE",
            Face::Yellow => "YELLOW",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Face::ALL.into_iter().find(|face| face.label() == label)
    }

    pub fn color(self) -> Color {
        match self {
            Face::Red => Color::Red,
            Face::Orange => Color::Orange,
            Face::Blue => Color::Blue,
            Face::Green => Color::Green,
            Face::White => Color::White,
            Face::Yellow => Color::Yellow,
        }
    }

    /// Outward normal as (axis, sign).
    pub fn normal(self) -> (Axis, i8) {
        let turn = self.turn();
        (turn.axis, turn.sign)
    }

    /// The 9 positions of this face's layer.
    pub fn layer(self) -> impl Iterator<Item = Position> {
        let turn = self.turn();
        Position::all().filter(move |position| position.along(turn.axis) == turn.fixed)
    }

    /// Position of the face's center piece. Centers never change slot.
    pub fn center(self) -> Position {
        let turn = self.turn();
        let mut center = [1usize; 3];
        center[turn.axis.index()] = turn.fixed;
        let [x, y, z] = center;
        Position::new(z, y, x)
    }

    /// The world rotation of one quarter turn of this face.
    pub fn quarter_turn(self, direction: Direction) -> Rotation3<f64> {
        let turn = self.turn();
        let sense = match direction {
            Direction::Clockwise => -1.0,
            Direction::Counterclockwise => 1.0,
        };
        let angle = sense * f64::from(turn.sign) * FRAC_PI_2;
        snap(Rotation3::from_axis_angle(&Unit::new_unchecked(turn.axis.unit()), angle))
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Round a quarter-turn composition to its exact integer matrix.
pub fn snap(rotation: Rotation3<f64>) -> Rotation3<f64> {
    Rotation3::from_matrix_unchecked(rotation.into_inner().map(f64::round))
}

/// Turn `face` a quarter in `direction`: reorient the 9 piece groups of the
/// layer, then cycle the corner and edge groups to their new positions.
pub fn rotate_face(grid: &mut PieceGrid, face: Face, direction: Direction) {
    let turn = face.turn();
    let rotation = face.quarter_turn(direction);

    for position in face.layer() {
        for piece in grid.cell_mut(position).iter_mut() {
            piece.orientation = snap(rotation * piece.orientation);
        }
    }

    cycle(grid, &turn.corners, direction);
    cycle(grid, &turn.edges, direction);
}

fn cycle(grid: &mut PieceGrid, ring: &[Position; 4], direction: Direction) {
    let groups: Vec<_> = ring
        .iter()
        .map(|&position| std::mem::take(grid.cell_mut(position)))
        .collect();

    let step = match direction {
        Direction::Clockwise => 1,
        Direction::Counterclockwise => 3,
    };
    for (k, group) in groups.into_iter().enumerate() {
        *grid.cell_mut(ring[(k + step) % 4]) = group;
    }
}
