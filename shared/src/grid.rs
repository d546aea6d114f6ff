//! Piece grid: the 3x3x3 container of sticker pieces and their slots.

use crate::error::GridError;
use crate::rotation::Face;
use nalgebra::{Point3, Rotation3, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half the cube's edge length in world units.
pub const HALF_WIDTH: f32 = 1.25;
/// Edge length of a single sticker quad.
pub const STICKER_SIZE: f32 = 2.0 * HALF_WIDTH / 3.0;
/// Floats per sticker geometry: 6 planes x 4 vertices x 3 components.
pub const GEOMETRY_LEN: usize = 72;

/// Paint tags. `Black` is the neutral body color of unpainted facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    White,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Black,
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::White,
    ];

    pub fn hex(self) -> u32 {
        match self {
            Color::Black => 0x000000,
            Color::Red => 0xff0000,
            Color::Orange => 0xff9000,
            Color::Yellow => 0xffff00,
            Color::Green => 0x00ff00,
            Color::Blue => 0x0000ff,
            Color::White => 0xffffff,
        }
    }

    pub fn from_hex(hex: u32) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.hex() == hex)
    }
}

/// Surface description sent to viewers alongside each piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub transparent: bool,
    pub opacity: f32,
}

impl Material {
    pub fn neutral() -> Self {
        Self::painted(Color::Black)
    }

    pub fn painted(color: Color) -> Self {
        Self {
            color,
            transparent: false,
            opacity: 1.0,
        }
    }
}

/// Stable identity of a sticker piece, formatted like a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bits: u128 = rng.gen();
        // Version 4, RFC 4122 variant.
        let bits = (bits & !(0xf << 76) & !(0x3 << 62)) | (0x4 << 76) | (0x2 << 62);
        let hex = format!("{:032x}", bits);
        Self(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PieceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PieceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Geometric class of a grid position, by how many pieces it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotClass {
    Core,
    Center,
    Edge,
    Corner,
}

impl SlotClass {
    pub fn capacity(self) -> usize {
        match self {
            SlotClass::Core => 0,
            SlotClass::Center => 1,
            SlotClass::Edge => 2,
            SlotClass::Corner => 3,
        }
    }
}

/// A cubie position (layer `z`, row `y`, column `x`), each in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub z: usize,
    pub y: usize,
    pub x: usize,
}

impl Position {
    pub const fn new(z: usize, y: usize, x: usize) -> Self {
        Self { z, y, x }
    }

    /// All 27 positions in layer, row, column order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..3).flat_map(|z| (0..3).flat_map(move |y| (0..3).map(move |x| Position::new(z, y, x))))
    }

    pub fn class(self) -> SlotClass {
        let off_center = [self.z, self.y, self.x]
            .iter()
            .filter(|&&k| k != 1)
            .count();
        match off_center {
            0 => SlotClass::Core,
            1 => SlotClass::Center,
            2 => SlotClass::Edge,
            _ => SlotClass::Corner,
        }
    }

    /// Grid index along `axis`.
    pub fn along(self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// World-space center of the cubie, `(x, y, z)`.
    pub fn world_center(self) -> Vector3<f32> {
        let world = |k: usize| (k as f32 - 1.0) * HALF_WIDTH;
        Vector3::new(world(self.x), world(self.y), world(self.z))
    }

    /// The position whose cubie volume contains `point`.
    pub fn enclosing(point: &Point3<f32>) -> Option<Position> {
        let index = |c: f32| {
            let bound = HALF_WIDTH + 1e-3;
            if c.abs() > bound {
                None
            } else if c < -STICKER_SIZE / 2.0 {
                Some(0)
            } else if c > STICKER_SIZE / 2.0 {
                Some(2)
            } else {
                Some(1)
            }
        };
        Some(Position::new(index(point.z)?, index(point.y)?, index(point.x)?))
    }

    fn check(self) -> Result<(), GridError> {
        if self.z > 2 || self.y > 2 || self.x > 2 {
            return Err(GridError::OutOfBounds {
                z: self.z,
                y: self.y,
                x: self.x,
            });
        }
        Ok(())
    }
}

/// A fully qualified slot: a cubie position plus the part index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub z: usize,
    pub y: usize,
    pub x: usize,
    pub part: usize,
}

impl Slot {
    pub const fn new(z: usize, y: usize, x: usize, part: usize) -> Self {
        Self { z, y, x, part }
    }

    pub fn position(self) -> Position {
        Position::new(self.z, self.y, self.x)
    }

    /// Key used by the canonical identity map, `"z-x-y-i"`.
    pub fn canonical_key(self) -> String {
        format!("{}-{}-{}-{}", self.z, self.x, self.y, self.part)
    }
}

/// One visible sticker. Geometry is local and fixed at creation; the
/// rendered quad is `orientation * geometry` about the cube origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    pub geometry: Vec<f32>,
    pub orientation: Rotation3<f64>,
    pub material: Material,
}

impl Piece {
    pub fn new(id: PieceId, geometry: Vec<f32>) -> Self {
        Self {
            id,
            geometry,
            orientation: Rotation3::identity(),
            material: Material::neutral(),
        }
    }

    pub fn world_vertices(&self) -> Vec<Point3<f32>> {
        self.geometry
            .chunks_exact(3)
            .map(|v| {
                let p = self.orientation * Point3::new(v[0] as f64, v[1] as f64, v[2] as f64);
                Point3::new(p.x as f32, p.y as f32, p.z as f32)
            })
            .collect()
    }

    pub fn world_centroid(&self) -> Point3<f32> {
        let vertices = self.world_vertices();
        if vertices.is_empty() {
            return Point3::origin();
        }
        let sum = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / vertices.len() as f32)
    }

    /// World axis the quad faces and the side it sits on (+1 or -1).
    pub fn facing(&self) -> Option<(Axis, i8)> {
        let vertices = self.world_vertices();
        let first = vertices.first()?;
        [Axis::X, Axis::Y, Axis::Z].into_iter().find_map(|axis| {
            let i = axis.index();
            let flat = vertices.iter().all(|v| (v[i] - first[i]).abs() < 1e-4);
            match (flat, first[i]) {
                (true, c) if c > 1e-4 => Some((axis, 1)),
                (true, c) if c < -1e-4 => Some((axis, -1)),
                _ => None,
            }
        })
    }
}

/// Vertex layout of a box mesh (planes px, nx, py, ny, pz, nz), translated
/// by `offset`.
pub fn box_geometry(size: [f32; 3], offset: Vector3<f32>) -> Vec<f32> {
    let [width, height, depth] = size;
    // (u, v, w, udir, vdir, plane width, plane height, plane depth)
    let planes = [
        (2, 1, 0, -1.0, -1.0, depth, height, width),
        (2, 1, 0, 1.0, -1.0, depth, height, -width),
        (0, 2, 1, 1.0, 1.0, width, depth, height),
        (0, 2, 1, 1.0, -1.0, width, depth, -height),
        (0, 1, 2, 1.0, -1.0, width, height, depth),
        (0, 1, 2, -1.0, -1.0, width, height, -depth),
    ];

    let mut out = Vec::with_capacity(GEOMETRY_LEN);
    for (u, v, w, udir, vdir, pw, ph, pd) in planes {
        for iy in 0..2 {
            let y = iy as f32 * ph - ph / 2.0;
            for ix in 0..2 {
                let x = ix as f32 * pw - pw / 2.0;
                let mut vertex = [0.0f32; 3];
                vertex[u] = x * udir;
                vertex[v] = y * vdir;
                vertex[w] = pd / 2.0;
                out.extend_from_slice(&[
                    vertex[0] + offset.x,
                    vertex[1] + offset.y,
                    vertex[2] + offset.z,
                ]);
            }
        }
    }
    out
}

/// A zero-thickness sticker quad facing `axis`, centered at `center`.
fn quad(axis: Axis, center: Vector3<f32>) -> Vec<f32> {
    let mut size = [STICKER_SIZE; 3];
    size[axis.index()] = 0.0;
    box_geometry(size, center)
}

/// Sticker geometries for one position, in part-index order.
fn part_geometries(position: Position) -> Vec<Vec<f32>> {
    let c = position.world_center();
    let inner = |k: f32| k * 2.0 / 3.0;
    match position.class() {
        SlotClass::Core => Vec::new(),
        SlotClass::Center => {
            let axis = if c.x != 0.0 {
                Axis::X
            } else if c.y != 0.0 {
                Axis::Y
            } else {
                Axis::Z
            };
            vec![quad(axis, c)]
        }
        SlotClass::Edge if c.z != 0.0 => {
            let side = if c.x != 0.0 { Axis::X } else { Axis::Y };
            vec![
                quad(Axis::Z, Vector3::new(inner(c.x), inner(c.y), c.z)),
                quad(side, Vector3::new(c.x, c.y, inner(c.z))),
            ]
        }
        SlotClass::Edge => vec![
            quad(Axis::X, Vector3::new(c.x, inner(c.y), c.z)),
            quad(Axis::Y, Vector3::new(inner(c.x), c.y, c.z)),
        ],
        SlotClass::Corner => vec![
            quad(Axis::Z, Vector3::new(inner(c.x), inner(c.y), c.z)),
            quad(Axis::X, Vector3::new(c.x, inner(c.y), inner(c.z))),
            quad(Axis::Y, Vector3::new(inner(c.x), c.y, inner(c.z))),
        ],
    }
}

/// The 3x3x3 grid of piece groups, indexed `[z][y][x]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieceGrid {
    cells: [[[Vec<Piece>; 3]; 3]; 3],
}

impl PieceGrid {
    /// A solved grid of neutral pieces, each with a fresh identity.
    pub fn create<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = Self::default();
        for position in Position::all() {
            grid.cells[position.z][position.y][position.x] = part_geometries(position)
                .into_iter()
                .map(|geometry| Piece::new(PieceId::generate(rng), geometry))
                .collect();
        }
        grid
    }

    /// Paint the outward facet of every piece in each face's 9 slots with
    /// that face's color, by current occupancy.
    pub fn colorize(&mut self) {
        for face in Face::ALL {
            let (axis, sign) = face.normal();
            for position in face.layer() {
                for piece in self.cell_mut(position) {
                    if piece.facing() == Some((axis, sign)) {
                        piece.material = Material::painted(face.color());
                    }
                }
            }
        }
    }

    pub fn get(&self, slot: Slot) -> Result<Option<&Piece>, GridError> {
        slot.position().check()?;
        Ok(self.cells[slot.z][slot.y][slot.x].get(slot.part))
    }

    /// Replace the piece at an existing part index. Never changes a slot's
    /// piece count.
    pub fn set(&mut self, slot: Slot, piece: Piece) -> Result<Piece, GridError> {
        slot.position().check()?;
        let cell = &mut self.cells[slot.z][slot.y][slot.x];
        let len = cell.len();
        match cell.get_mut(slot.part) {
            Some(existing) => Ok(std::mem::replace(existing, piece)),
            None => Err(GridError::NoSuchPart {
                z: slot.z,
                y: slot.y,
                x: slot.x,
                part: slot.part,
                len,
            }),
        }
    }

    /// Pieces at a position, in part order.
    pub fn cell(&self, position: Position) -> &[Piece] {
        &self.cells[position.z][position.y][position.x]
    }

    pub(crate) fn cell_mut(&mut self, position: Position) -> &mut Vec<Piece> {
        &mut self.cells[position.z][position.y][position.x]
    }

    pub(crate) fn from_cells(cells: [[[Vec<Piece>; 3]; 3]; 3]) -> Self {
        Self { cells }
    }

    /// Every occupied slot with its piece, in layer, row, column, part order.
    pub fn pieces(&self) -> impl Iterator<Item = (Slot, &Piece)> + '_ {
        Position::all().flat_map(move |position| {
            self.cell(position)
                .iter()
                .enumerate()
                .map(move |(part, piece)| {
                    (Slot::new(position.z, position.y, position.x, part), piece)
                })
        })
    }

    pub fn len(&self) -> usize {
        self.pieces().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every position holds as many pieces as its class demands.
    pub fn has_valid_cardinality(&self) -> bool {
        Position::all().all(|position| self.cell(position).len() == position.class().capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn grid() -> PieceGrid {
        PieceGrid::create(&mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_create_has_54_pieces_with_valid_cardinality() {
        let grid = grid();
        assert_eq!(grid.len(), 54);
        assert!(grid.has_valid_cardinality());
        assert!(grid.cell(Position::new(1, 1, 1)).is_empty());
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let grid = grid();
        let ids: HashSet<_> = grid.pieces().map(|(_, p)| p.id.clone()).collect();
        assert_eq!(ids.len(), 54);
    }

    #[test]
    fn test_piece_id_looks_like_uuid_v4() {
        let id = PieceId::generate(&mut StdRng::seed_from_u64(1));
        let parts: Vec<_> = id.as_str().split('-').collect();
        assert_eq!(
            parts.iter().map(|p| p.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(parts[2].starts_with('4'));
        assert!(matches!(parts[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[test]
    fn test_create_is_neutral_until_colorized() {
        let grid = grid();
        assert!(grid
            .pieces()
            .all(|(_, p)| p.material == Material::neutral()));
    }

    #[test]
    fn test_slot_classes() {
        assert_eq!(Position::new(1, 1, 1).class(), SlotClass::Core);
        assert_eq!(Position::new(2, 1, 1).class(), SlotClass::Center);
        assert_eq!(Position::new(2, 0, 1).class(), SlotClass::Edge);
        assert_eq!(Position::new(1, 0, 0).class(), SlotClass::Edge);
        assert_eq!(Position::new(0, 2, 2).class(), SlotClass::Corner);
    }

    #[test]
    fn test_geometry_layout() {
        let grid = grid();
        for (_, piece) in grid.pieces() {
            assert_eq!(piece.geometry.len(), GEOMETRY_LEN);
        }

        // Front top-left corner, z-facing quad.
        let piece = grid.get(Slot::new(2, 2, 0, 0)).unwrap().unwrap();
        let centroid = piece.world_centroid();
        assert_approx_eq!(centroid.x, -STICKER_SIZE, 1e-5);
        assert_approx_eq!(centroid.y, STICKER_SIZE, 1e-5);
        assert_approx_eq!(centroid.z, HALF_WIDTH, 1e-5);
        assert_eq!(piece.facing(), Some((Axis::Z, 1)));
    }

    #[test]
    fn test_box_geometry_first_plane_matches_mesh_layout() {
        let geometry = box_geometry([1.0, 2.0, 0.0], Vector3::zeros());
        // px plane: u = z, v = y, w = x, udir = vdir = -1.
        assert_eq!(&geometry[0..3], &[0.5, 1.0, 0.0]);
        assert_eq!(&geometry[3..6], &[0.5, 1.0, -0.0]);
        assert_eq!(&geometry[6..9], &[0.5, -1.0, 0.0]);
    }

    #[test]
    fn test_every_piece_sits_inside_its_slot() {
        let grid = grid();
        for (slot, piece) in grid.pieces() {
            assert_eq!(
                Position::enclosing(&piece.world_centroid()),
                Some(slot.position()),
                "piece in {:?} drifted",
                slot
            );
        }
    }

    #[test]
    fn test_colorize_paints_nine_per_face() {
        let mut grid = grid();
        grid.colorize();

        let mut counts: HashMap<Color, usize> = HashMap::new();
        for (_, piece) in grid.pieces() {
            *counts.entry(piece.material.color).or_default() += 1;
        }
        assert_eq!(counts.get(&Color::Black), None);
        for face in Face::ALL {
            assert_eq!(counts.get(&face.color()), Some(&9));
        }
    }

    #[test]
    fn test_colorize_follows_part_layout() {
        let mut grid = grid();
        grid.colorize();
        let color = |z, y, x, i| grid.get(Slot::new(z, y, x, i)).unwrap().unwrap().material.color;

        assert_eq!(color(2, 1, 1, 0), Color::Red);
        assert_eq!(color(0, 0, 2, 1), Color::Blue);
        assert_eq!(color(1, 2, 0, 1), Color::White);
        assert_eq!(color(0, 0, 0, 0), Color::Orange);
        assert_eq!(color(0, 0, 0, 1), Color::Green);
        assert_eq!(color(0, 0, 0, 2), Color::Yellow);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = grid();
        assert_eq!(
            grid.get(Slot::new(3, 0, 0, 0)),
            Err(GridError::OutOfBounds { z: 3, y: 0, x: 0 })
        );
        assert_eq!(grid.get(Slot::new(1, 1, 1, 0)), Ok(None));
    }

    #[test]
    fn test_set_replaces_without_changing_cardinality() {
        let mut grid = grid();
        let replacement = Piece::new(PieceId::from("replacement"), vec![0.0; 3]);
        let old = grid.set(Slot::new(2, 1, 1, 0), replacement).unwrap();

        assert_ne!(old.id.as_str(), "replacement");
        assert_eq!(
            grid.get(Slot::new(2, 1, 1, 0)).unwrap().unwrap().id.as_str(),
            "replacement"
        );
        assert!(grid.has_valid_cardinality());

        let err = grid
            .set(Slot::new(2, 1, 1, 1), old)
            .unwrap_err();
        assert_eq!(
            err,
            GridError::NoSuchPart {
                z: 2,
                y: 1,
                x: 1,
                part: 1,
                len: 1
            }
        );
    }

    #[test]
    fn test_canonical_key_order() {
        assert_eq!(Slot::new(2, 0, 1, 1).canonical_key(), "2-1-0-1");
    }

    #[test]
    fn test_color_hex_roundtrip() {
        for color in Color::ALL {
            assert_eq!(Color::from_hex(color.hex()), Some(color));
        }
        assert_eq!(Color::from_hex(0x123456), None);
    }
}
