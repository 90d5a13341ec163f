//! Tetromino catalog and rotation
//!
//! Each of the 7 shapes is stored once, in its spawn orientation, as a small
//! 0/1 grid. Other orientations are derived by turning the grid clockwise,
//! so non-square shapes swap width and height on odd rotations.

/// Largest bounding box edge of any catalog shape
const MAX_EDGE: usize = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // long bar
    O, // square
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoType {
    /// All tetromino types in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Canonical (rotation 0) grid for this tetromino
    pub fn base_shape(&self) -> Shape {
        match self {
            TetrominoType::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            TetrominoType::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            TetrominoType::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            TetrominoType::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            TetrominoType::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            TetrominoType::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            TetrominoType::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        }
    }

    /// Grid for this tetromino after `rotation` clockwise quarter turns
    pub fn shape(&self, rotation: Rotation) -> Shape {
        let mut shape = self.base_shape();
        for _ in 0..rotation.index() {
            shape = shape.rotated_cw();
        }
        shape
    }
}

/// A rectangular 0/1 grid of occupied sub-cells, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: [[u8; MAX_EDGE]; MAX_EDGE],
}

impl Shape {
    /// Build a shape from row slices; all rows must share one length
    fn from_rows(rows: &[&[u8]]) -> Self {
        let mut cells = [[0; MAX_EDGE]; MAX_EDGE];
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                cells[y][x] = value;
            }
        }
        Self {
            width: rows.first().map_or(0, |row| row.len()),
            height: rows.len(),
            cells,
        }
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the sub-cell at column `x`, row `y` is occupied
    #[cfg(test)]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y][x] != 0
    }

    /// Turn the grid a quarter clockwise: transpose, then reverse each new row
    pub fn rotated_cw(&self) -> Shape {
        let mut cells = [[0; MAX_EDGE]; MAX_EDGE];
        for y in 0..self.width {
            for x in 0..self.height {
                cells[y][x] = self.cells[self.height - 1 - x][y];
            }
        }
        Shape {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Offsets `(x, y)` of every occupied sub-cell, row by row
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .filter(move |&x| self.cells[y][x] != 0)
                .map(move |x| (x as i32, y as i32))
        })
    }
}

/// Rotation index, always kept in `0..4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(u8);

impl Rotation {
    /// Normalise any requested rotation count into `0..4`
    pub fn new(turns: i64) -> Self {
        Rotation(turns.rem_euclid(4) as u8)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// One quarter turn clockwise
    pub fn cw(&self) -> Rotation {
        Rotation((self.0 + 1) % 4)
    }
}
