//! Game board representation and collision detection

use crate::piece::Position;
use crate::tetromino::Shape;

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// Cell value of an empty square; anything else is the id of the placed piece
pub const EMPTY: u32 = 0;

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[u32; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[EMPTY; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at column `x`, row `y`
    /// Returns None if out of bounds
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
            return None;
        }
        Some(self.cells[y][x])
    }

    /// Set a cell; returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, value: u32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
            return false;
        }
        self.cells[y][x] = value;
        true
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[[u32; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.cells
    }

    /// Check whether `shape` anchored at `position` fits
    ///
    /// Every occupied sub-cell must sit inside the side walls and above the
    /// floor. Sub-cells above the top edge (negative row) are only checked
    /// against the walls, which lets a piece spawn partly out of view.
    pub fn is_valid(&self, shape: &Shape, position: Position) -> bool {
        shape.occupied().all(|(dx, dy)| {
            let x = position.x + dx;
            let y = position.y + dy;
            if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                return false;
            }
            y < 0 || self.cells[y as usize][x as usize] == EMPTY
        })
    }

    /// Write `id` into every occupied sub-cell of `shape` at `position`
    /// Sub-cells above the top edge are dropped.
    pub fn place(&mut self, shape: &Shape, position: Position, id: u32) {
        for (dx, dy) in shape.occupied() {
            let y = position.y + dy;
            if y >= 0 {
                self.set(position.x + dx, y, id);
            }
        }
    }

    /// Clear completed lines and return the number cleared
    ///
    /// Surviving rows keep their order and settle to the bottom; the top is
    /// refilled with empty rows so the height never changes.
    pub fn clear_lines(&mut self) -> usize {
        let mut write_row = BOARD_HEIGHT;

        for read_row in (0..BOARD_HEIGHT).rev() {
            if !self.is_line_full(read_row) {
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
            }
        }

        for row in 0..write_row {
            self.cells[row] = [EMPTY; BOARD_WIDTH];
        }

        write_row
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|&cell| cell != EMPTY)
    }

    /// Check if the board is completely empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell == EMPTY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::{Rotation, TetrominoType};

    fn bar() -> Shape {
        TetrominoType::I.shape(Rotation::new(0))
    }

    fn fill_row(board: &mut Board, y: i32, id: u32) {
        for x in 0..BOARD_WIDTH as i32 {
            board.set(x, y, id);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, 7));
        assert_eq!(board.get(5, 5), Some(7));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_WIDTH as i32, 0), None);
        assert_eq!(board.get(0, BOARD_HEIGHT as i32), None);
        assert!(!board.set(0, BOARD_HEIGHT as i32, 1));
    }

    #[test]
    fn test_bar_spawn_and_floor() {
        let board = Board::new();
        let shape = bar();
        assert!(board.is_valid(&shape, Position::new(3, 0)));
        assert!(board.is_valid(&shape, Position::new(3, 19)));
        assert!(!board.is_valid(&shape, Position::new(3, 20)));
    }

    #[test]
    fn test_walls() {
        let board = Board::new();
        let shape = bar();
        assert!(!board.is_valid(&shape, Position::new(-1, 5)));
        assert!(!board.is_valid(&shape, Position::new(7, 5)));
        // Entirely off either edge
        assert!(!board.is_valid(&shape, Position::new(-10, 5)));
        assert!(!board.is_valid(&shape, Position::new(BOARD_WIDTH as i32, 5)));
    }

    #[test]
    fn test_above_top_skips_content_but_not_walls() {
        let mut board = Board::new();
        fill_row(&mut board, 0, 1);
        let vertical = TetrominoType::I.shape(Rotation::new(1));
        // Bottom sub-cell lands on the filled row 0
        assert!(!board.is_valid(&vertical, Position::new(4, -3)));
        // Wholly above the board and inside the walls
        assert!(board.is_valid(&vertical, Position::new(4, -4)));
        assert!(!board.is_valid(&vertical, Position::new(-1, -4)));
    }

    #[test]
    fn test_collision_with_placed_cells() {
        let mut board = Board::new();
        board.set(4, 10, 3);
        assert!(!board.is_valid(&bar(), Position::new(2, 10)));
        assert!(board.is_valid(&bar(), Position::new(5, 10)));
    }

    #[test]
    fn test_place_drops_cells_above_top() {
        let mut board = Board::new();
        let vertical = TetrominoType::I.shape(Rotation::new(1));
        board.place(&vertical, Position::new(2, -2), 9);
        assert_eq!(board.get(2, 0), Some(9));
        assert_eq!(board.get(2, 1), Some(9));
        assert_eq!(board.rows().iter().flatten().filter(|&&c| c == 9).count(), 2);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::new();
        fill_row(&mut board, 19, 1);
        board.set(0, 18, 2);

        let cleared = board.clear_lines();
        assert_eq!(cleared, 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(0, 19), Some(2));
        assert_eq!(board.get(0, 18), Some(EMPTY));
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
    }

    #[test]
    fn test_clear_fills_gap_with_bar() {
        let mut board = Board::new();
        fill_row(&mut board, 19, 1);
        board.set(5, 19, EMPTY);
        let vertical = TetrominoType::I.shape(Rotation::new(1));
        board.place(&vertical, Position::new(5, 16), 2);

        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.rows()[0], [EMPTY; BOARD_WIDTH]);
        // Three remaining bar cells moved down one row
        for y in 17..20 {
            assert_eq!(board.get(5, y), Some(2));
        }
        assert_eq!(board.get(0, 19), Some(EMPTY));
    }

    #[test]
    fn test_clear_non_adjacent_lines_keeps_order() {
        let mut board = Board::new();
        fill_row(&mut board, 19, 1);
        board.set(3, 18, 2);
        fill_row(&mut board, 17, 1);
        board.set(6, 16, 3);

        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.get(3, 19), Some(2));
        assert_eq!(board.get(6, 18), Some(3));
        assert!(board.rows()[..18].iter().all(|row| *row == [EMPTY; BOARD_WIDTH]));
    }

    #[test]
    fn test_clear_full_board() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i32 {
            fill_row(&mut board, y, 1);
        }
        assert_eq!(board.clear_lines(), BOARD_HEIGHT);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_nothing() {
        let mut board = Board::new();
        board.set(0, 19, 1);
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }
}
