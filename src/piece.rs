//! Active falling piece

use crate::board::Board;
use crate::tetromino::{Rotation, Shape, TetrominoType};

/// Top-left anchor of a piece in board coordinates
/// x grows rightward, y grows downward, row 0 is the top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The piece currently under player control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    pub position: Position,
    pub rotation: Rotation,
}

impl Piece {
    pub fn new(piece_type: TetrominoType, position: Position) -> Self {
        Self {
            piece_type,
            position,
            rotation: Rotation::default(),
        }
    }

    /// Cell layout at the current rotation
    pub fn shape(&self) -> Shape {
        self.piece_type.shape(self.rotation)
    }

    /// Absolute `(x, y)` board coordinates of all 4 blocks
    pub fn block_positions(&self) -> Vec<(i32, i32)> {
        let Position { x, y } = self.position;
        self.shape()
            .occupied()
            .map(|(dx, dy)| (x + dx, y + dy))
            .collect()
    }

    /// The same piece shifted by `(dx, dy)`, if that spot is free
    pub fn moved(&self, dx: i32, dy: i32, board: &Board) -> Option<Piece> {
        let candidate = Piece {
            position: self.position.offset(dx, dy),
            ..*self
        };
        board.is_valid(&candidate.shape(), candidate.position).then_some(candidate)
    }

    /// The same piece turned one step clockwise in place, if that fits
    /// No kicks: a blocked rotation is simply refused
    pub fn rotated(&self, board: &Board) -> Option<Piece> {
        let candidate = Piece {
            rotation: self.rotation.cw(),
            ..*self
        };
        board.is_valid(&candidate.shape(), candidate.position).then_some(candidate)
    }

    /// Lowest reachable position straight down from here
    pub fn dropped(&self, board: &Board) -> Piece {
        let mut piece = *self;
        while let Some(next) = piece.moved(0, 1, board) {
            piece = next;
        }
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_HEIGHT;

    #[test]
    fn test_block_positions() {
        let piece = Piece::new(TetrominoType::O, Position::new(4, 0));
        assert_eq!(piece.block_positions(), vec![(4, 0), (5, 0), (4, 1), (5, 1)]);
    }

    #[test]
    fn test_move_down() {
        let board = Board::new();
        let piece = Piece::new(TetrominoType::T, Position::new(4, 0));
        let moved = piece.moved(0, 1, &board).unwrap();
        assert_eq!(moved.position, Position::new(4, 1));
    }

    #[test]
    fn test_move_into_wall_refused() {
        let board = Board::new();
        let piece = Piece::new(TetrominoType::I, Position::new(0, 5));
        assert!(piece.moved(-1, 0, &board).is_none());
        let piece = Piece::new(TetrominoType::I, Position::new(6, 5));
        assert!(piece.moved(1, 0, &board).is_none());
    }

    #[test]
    fn test_rotation_blocked_at_floor() {
        let board = Board::new();
        // Horizontal bar on the floor cannot stand up without a kick
        let piece = Piece::new(TetrominoType::I, Position::new(3, BOARD_HEIGHT as i32 - 1));
        assert!(piece.rotated(&board).is_none());
    }

    #[test]
    fn test_hard_drop_lands_on_floor() {
        let board = Board::new();
        let piece = Piece::new(TetrominoType::I, Position::new(3, 0));
        let landed = piece.dropped(&board);
        assert_eq!(landed.position.y, BOARD_HEIGHT as i32 - 1);
        assert!(landed.moved(0, 1, &board).is_none());
    }
}
