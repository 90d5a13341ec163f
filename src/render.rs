//! Display projection of the session
//!
//! Combines the placed cells with the falling piece into one grid and works
//! out which sides of each occupied cell need an outline. Nothing here feeds
//! back into gameplay.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, EMPTY};
use crate::game::{Phase, Snapshot};

/// One square of the display grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayCell {
    #[default]
    Empty,
    /// Part of a committed piece with this id
    Placed(u32),
    /// Covered by the falling piece
    Falling,
}

impl DisplayCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, DisplayCell::Empty)
    }
}

pub type DisplayGrid = [[DisplayCell; BOARD_WIDTH]; BOARD_HEIGHT];

/// Which sides of a cell border a different occupant or the grid edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// Board plus falling-piece overlay
///
/// Only cells inside the board that are still empty get the overlay, and only
/// while a game is running.
pub fn display_grid(snapshot: &Snapshot) -> DisplayGrid {
    let mut grid = [[DisplayCell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    for (y, row) in snapshot.board.rows().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            if cell != EMPTY {
                grid[y][x] = DisplayCell::Placed(cell);
            }
        }
    }

    if snapshot.phase != Phase::Playing {
        return grid;
    }
    if let Some(active) = &snapshot.active {
        for (x, y) in active.piece().block_positions() {
            if x < 0 || y < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                continue;
            }
            let cell = &mut grid[y as usize][x as usize];
            if cell.is_empty() {
                *cell = DisplayCell::Falling;
            }
        }
    }
    grid
}

/// Outline flags for the cell at column `x`, row `y`
pub fn edges(grid: &DisplayGrid, x: usize, y: usize) -> Edges {
    let cell = grid[y][x];
    if cell.is_empty() {
        return Edges::default();
    }
    Edges {
        top: y == 0 || grid[y - 1][x] != cell,
        right: x == BOARD_WIDTH - 1 || grid[y][x + 1] != cell,
        bottom: y == BOARD_HEIGHT - 1 || grid[y + 1][x] != cell,
        left: x == 0 || grid[y][x - 1] != cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, Game};
    use crate::spawner::Scripted;
    use crate::tetromino::TetrominoType;

    fn started(piece: TetrominoType) -> Game {
        let mut game = Game::with_source(Box::new(Scripted::new(&[piece])));
        game.process_action(Action::Primary);
        game
    }

    #[test]
    fn test_idle_grid_is_board_only() {
        let game = Game::with_source(Box::new(Scripted::new(&[TetrominoType::O])));
        let grid = display_grid(&game.snapshot());
        assert!(grid.iter().flatten().all(DisplayCell::is_empty));
    }

    #[test]
    fn test_falling_piece_overlay() {
        let mut game = started(TetrominoType::O);
        game.board.set(0, 19, 3);
        let grid = display_grid(&game.snapshot());
        assert_eq!(grid[0][4], DisplayCell::Falling);
        assert_eq!(grid[1][5], DisplayCell::Falling);
        assert_eq!(grid[19][0], DisplayCell::Placed(3));
        assert_eq!(grid.iter().flatten().filter(|c| **c == DisplayCell::Falling).count(), 4);
    }

    #[test]
    fn test_overlay_hidden_after_game_over() {
        let mut game = started(TetrominoType::O);
        game.phase = Phase::Over;
        let grid = display_grid(&game.snapshot());
        assert!(grid.iter().flatten().all(DisplayCell::is_empty));
    }

    #[test]
    fn test_overlay_distinct_from_placed_id_two() {
        let mut game = started(TetrominoType::O);
        game.board.set(4, 2, 2);
        let grid = display_grid(&game.snapshot());
        assert_eq!(grid[2][4], DisplayCell::Placed(2));
        assert_ne!(grid[1][4], grid[2][4]);
        assert!(edges(&grid, 4, 1).bottom);
        assert!(edges(&grid, 4, 2).top);
    }

    #[test]
    fn test_edges_of_square() {
        let mut game = started(TetrominoType::O);
        game.process_action(Action::HardDrop);
        game.phase = Phase::Over;
        let grid = display_grid(&game.snapshot());

        let top_left = edges(&grid, 4, 18);
        assert_eq!(top_left, Edges { top: true, right: false, bottom: false, left: true });
        let bottom_right = edges(&grid, 5, 19);
        assert_eq!(bottom_right, Edges { top: false, right: true, bottom: true, left: false });
    }

    #[test]
    fn test_edges_between_neighbouring_pieces() {
        let mut game = started(TetrominoType::O);
        game.board.set(0, 0, 1);
        game.board.set(1, 0, 2);
        let grid = display_grid(&game.snapshot());
        assert!(edges(&grid, 0, 0).right);
        assert!(edges(&grid, 1, 0).left);
        assert_eq!(edges(&grid, 2, 0), Edges::default());
    }
}
