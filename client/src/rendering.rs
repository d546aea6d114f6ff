//! Text rendering of the cube as an unfolded net
//!
//! ```text
//!       U U U
//!       U U U
//!       U U U
//! L L L F F F R R R B B B
//! L L L F F F R R R B B B
//! L L L F F F R R R B B B
//!       D D D
//!       D D D
//!       D D D
//! ```
//!
//! Stickers are placed by where they are in world space, not by the slot
//! they occupy, so the net shows exactly what a 3D view would show.

use shared::grid::{Axis, Color, STICKER_SIZE};
use shared::{Face, PieceGrid};

const NET_ROWS: usize = 9;
const NET_COLS: usize = 12;

fn glyph(color: Color) -> char {
    match color {
        Color::Black => '.',
        Color::Red => 'R',
        Color::Orange => 'O',
        Color::Yellow => 'Y',
        Color::Green => 'G',
        Color::Blue => 'B',
        Color::White => 'W',
    }
}

/// Top-left cell of each face's 3x3 block in the net.
fn block_origin(face: Face) -> (usize, usize) {
    match face {
        Face::White => (0, 3),
        Face::Green => (3, 0),
        Face::Red => (3, 3),
        Face::Blue => (3, 6),
        Face::Orange => (3, 9),
        Face::Yellow => (6, 3),
    }
}

/// Row and column inside a face block for a sticker at grid offsets
/// `(x, y, z)`, each in -1..=1, as seen looking at that face.
fn block_cell(face: Face, x: i32, y: i32, z: i32) -> (i32, i32) {
    match face {
        Face::White => (z, x),
        Face::Red => (-y, x),
        Face::Blue => (-y, -z),
        Face::Orange => (-y, -x),
        Face::Green => (-y, z),
        Face::Yellow => (-z, x),
    }
}

fn face_on(axis: Axis, sign: i8) -> Face {
    match (axis, sign > 0) {
        (Axis::Z, true) => Face::Red,
        (Axis::Z, false) => Face::Orange,
        (Axis::X, true) => Face::Blue,
        (Axis::X, false) => Face::Green,
        (Axis::Y, true) => Face::White,
        (Axis::Y, false) => Face::Yellow,
    }
}

/// Lays out every painted sticker into a 9x12 character grid.
pub fn net(grid: &PieceGrid) -> [[char; NET_COLS]; NET_ROWS] {
    let mut cells = [[' '; NET_COLS]; NET_ROWS];
    for face in Face::ALL {
        let (row, col) = block_origin(face);
        for r in 0..3 {
            for c in 0..3 {
                cells[row + r][col + c] = glyph(Color::Black);
            }
        }
    }

    for (_, piece) in grid.pieces() {
        if piece.material.color == Color::Black {
            continue;
        }
        let Some((axis, sign)) = piece.facing() else {
            continue;
        };
        let centroid = piece.world_centroid();
        let offset = |v: f32| (v / STICKER_SIZE).round().clamp(-1.0, 1.0) as i32;
        let face = face_on(axis, sign);
        let (r, c) = block_cell(face, offset(centroid.x), offset(centroid.y), offset(centroid.z));
        let (row, col) = block_origin(face);
        cells[row + (r + 1) as usize][col + (c + 1) as usize] = glyph(piece.material.color);
    }
    cells
}

/// Renders the net as text, one sticker per character separated by spaces.
pub fn render_net(grid: &PieceGrid) -> String {
    net(grid)
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_status(is_solved: bool, snapshots: u64) -> String {
    format!(
        "snapshot #{} - {}",
        snapshots,
        if is_solved { "SOLVED" } else { "not solved" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{rotate_face, Direction};

    fn painted() -> PieceGrid {
        let mut grid = PieceGrid::create(&mut StdRng::seed_from_u64(21));
        grid.colorize();
        grid
    }

    fn block(cells: &[[char; NET_COLS]; NET_ROWS], face: Face) -> Vec<char> {
        let (row, col) = block_origin(face);
        (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| cells[row + r][col + c])
            .collect()
    }

    #[test]
    fn test_solved_net_has_uniform_faces() {
        let cells = net(&painted());
        for face in Face::ALL {
            let expected = glyph(face.color());
            assert!(
                block(&cells, face).iter().all(|&c| c == expected),
                "{} block is not uniform",
                face
            );
        }
    }

    #[test]
    fn test_front_turn_moves_left_colors_up() {
        let mut grid = painted();
        rotate_face(&mut grid, Face::Red, Direction::Clockwise);
        let cells = net(&grid);

        // Bottom row of the U block touches the front face.
        let (row, col) = block_origin(Face::White);
        for c in 0..3 {
            assert_eq!(cells[row + 2][col + c], 'G');
        }
        assert!(block(&cells, Face::Red).iter().all(|&c| c == 'R'));
    }

    #[test]
    fn test_every_sticker_lands_once() {
        let mut grid = painted();
        rotate_face(&mut grid, Face::Blue, Direction::Clockwise);
        rotate_face(&mut grid, Face::White, Direction::Counterclockwise);
        let cells = net(&grid);

        let painted: usize = cells
            .iter()
            .flatten()
            .filter(|c| !matches!(c, ' ' | '.'))
            .count();
        assert_eq!(painted, 54);
    }

    #[test]
    fn test_render_text_shape() {
        let text = render_net(&painted());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), NET_ROWS);
        assert_eq!(lines[0], "      W W W");
        assert_eq!(lines[3], "G G G R R R B B B O O O");
        assert!(render_status(true, 3).contains("SOLVED"));
    }
}
