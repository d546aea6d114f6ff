//! Snapshot codec: the full grid as a viewer-facing message.
//!
//! A snapshot carries the solved flag, the face-center lookup table and
//! every piece record nested layer, row, column, part. Field names match
//! what a three.js scene loader expects (`uuid`, `isSolved`, Euler `_x`).

use crate::error::CodecError;
use crate::grid::{Color, Material, Piece, PieceGrid, PieceId, Position};
use crate::oracle::{is_solved, CanonicalMap};
use crate::rotation::{snap, Face};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "isSolved")]
    pub is_solved: bool,
    /// Center piece id -> face label.
    pub centers: BTreeMap<PieceId, Face>,
    pub cube: Vec<Vec<Vec<Vec<PieceRecord>>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub uuid: PieceId,
    pub geometry: Vec<f32>,
    pub material: MaterialRecord,
    pub rotation: EulerRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub color: u32,
    pub transparent: bool,
    pub opacity: f32,
}

/// Euler angles in radians, in three.js field layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EulerRecord {
    #[serde(rename = "isEuler", default = "euler_tag")]
    pub is_euler: bool,
    #[serde(rename = "_x")]
    pub x: f64,
    #[serde(rename = "_y")]
    pub y: f64,
    #[serde(rename = "_z")]
    pub z: f64,
    #[serde(rename = "_order")]
    pub order: String,
}

fn euler_tag() -> bool {
    true
}

impl EulerRecord {
    pub fn from_rotation(rotation: &Rotation3<f64>) -> Self {
        // nalgebra's (roll, pitch, yaw) composes as Rz * Ry * Rx.
        let (roll, pitch, yaw) = rotation.euler_angles();
        Self {
            is_euler: true,
            x: roll,
            y: pitch,
            z: yaw,
            order: "ZYX".to_string(),
        }
    }

    /// Compose the rotation in the record's axis order. Results are snapped
    /// to quarter turns.
    pub fn to_rotation(&self) -> Option<Rotation3<f64>> {
        let mut axes: Vec<char> = self.order.chars().collect();
        let order = axes.clone();
        axes.sort_unstable();
        if axes != ['X', 'Y', 'Z'] {
            return None;
        }

        let elementary = |axis: char| match axis {
            'X' => Rotation3::from_axis_angle(&Vector3::x_axis(), self.x),
            'Y' => Rotation3::from_axis_angle(&Vector3::y_axis(), self.y),
            _ => Rotation3::from_axis_angle(&Vector3::z_axis(), self.z),
        };
        let rotation = order
            .into_iter()
            .fold(Rotation3::identity(), |acc, axis| acc * elementary(axis));
        Some(snap(rotation))
    }
}

impl From<&Material> for MaterialRecord {
    fn from(material: &Material) -> Self {
        Self {
            color: material.color.hex(),
            transparent: material.transparent,
            opacity: material.opacity,
        }
    }
}

impl From<&Piece> for PieceRecord {
    fn from(piece: &Piece) -> Self {
        Self {
            uuid: piece.id.clone(),
            geometry: piece.geometry.clone(),
            material: MaterialRecord::from(&piece.material),
            rotation: EulerRecord::from_rotation(&piece.orientation),
        }
    }
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Face whose center piece has this id.
    pub fn face_of(&self, id: &PieceId) -> Option<Face> {
        self.centers.get(id).copied()
    }

    pub fn center_of(&self, face: Face) -> Option<&PieceId> {
        self.centers
            .iter()
            .find(|(_, f)| **f == face)
            .map(|(id, _)| id)
    }
}

/// Face label lookup for the six center pieces of `grid`.
pub fn face_centers(grid: &PieceGrid) -> BTreeMap<PieceId, Face> {
    Face::ALL
        .into_iter()
        .filter_map(|face| {
            grid.cell(face.center())
                .first()
                .map(|piece| (piece.id.clone(), face))
        })
        .collect()
}

pub fn encode(grid: &PieceGrid, canonical: &CanonicalMap) -> Snapshot {
    let cube = (0..3)
        .map(|z| {
            (0..3)
                .map(|y| {
                    (0..3)
                        .map(|x| {
                            grid.cell(Position::new(z, y, x))
                                .iter()
                                .map(PieceRecord::from)
                                .collect::<Vec<_>>()
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Snapshot {
        is_solved: is_solved(grid, canonical),
        centers: face_centers(grid),
        cube,
    }
}

fn expect_three<T>(items: &[T], level: &'static str) -> Result<(), CodecError> {
    if items.len() != 3 {
        return Err(CodecError::Shape {
            level,
            len: items.len(),
        });
    }
    Ok(())
}

fn decode_piece(record: &PieceRecord) -> Result<Piece, CodecError> {
    let id = || record.uuid.to_string();
    if record.geometry.len() % 3 != 0 {
        return Err(CodecError::Geometry {
            id: id(),
            len: record.geometry.len(),
        });
    }
    let color = Color::from_hex(record.material.color).ok_or_else(|| CodecError::UnknownColor {
        id: id(),
        color: record.material.color,
    })?;
    let orientation = record
        .rotation
        .to_rotation()
        .ok_or_else(|| CodecError::UnknownOrder {
            id: id(),
            order: record.rotation.order.clone(),
        })?;

    Ok(Piece {
        id: record.uuid.clone(),
        geometry: record.geometry.clone(),
        orientation,
        material: Material {
            color,
            transparent: record.material.transparent,
            opacity: record.material.opacity,
        },
    })
}

/// Rebuild a grid from a snapshot. This is the viewer's half of the codec.
pub fn decode(snapshot: &Snapshot) -> Result<PieceGrid, CodecError> {
    expect_three(&snapshot.cube, "layer list")?;
    let mut cells: [[[Vec<Piece>; 3]; 3]; 3] = Default::default();

    for (z, layer) in snapshot.cube.iter().enumerate() {
        expect_three(layer, "row list")?;
        for (y, row) in layer.iter().enumerate() {
            expect_three(row, "column list")?;
            for (x, records) in row.iter().enumerate() {
                let expected = Position::new(z, y, x).class().capacity();
                if records.len() != expected {
                    return Err(CodecError::Cardinality {
                        z,
                        y,
                        x,
                        len: records.len(),
                        expected,
                    });
                }
                cells[z][y][x] = records
                    .iter()
                    .map(decode_piece)
                    .collect::<Result<Vec<_>, CodecError>>()?;
            }
        }
    }

    Ok(PieceGrid::from_cells(cells))
}
