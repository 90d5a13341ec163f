//! Core game state and logic
//!
//! All mutation goes through [`Game::process_action`]. Each transition builds
//! the next board, piece and score in locals and stores them together at the
//! end, so a frame drawn between two actions always sees a consistent session.

use crate::board::Board;
use crate::piece::{Piece, Position};
use crate::score::Score;
use crate::spawner::{self, PieceSource, UniformSource};
use crate::tetromino::{Rotation, TetrominoType};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing spawned yet, waiting for the start key
    #[default]
    Idle,
    Playing,
    /// Stack reached the top; only a restart leaves this phase
    Over,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    /// One row down; commits the piece when blocked. Also the gravity tick.
    SoftDrop,
    Rotate,
    HardDrop,
    /// Start when idle, hard drop while playing
    Primary,
    Restart,
}

/// Read-only view of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub piece_type: TetrominoType,
    pub position: Position,
    pub rotation: Rotation,
}

impl ActiveSnapshot {
    /// Rebuild the piece this view was taken from
    pub fn piece(&self) -> Piece {
        Piece {
            piece_type: self.piece_type,
            position: self.position,
            rotation: self.rotation,
        }
    }
}

/// Read-only copy of the session for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub active: Option<ActiveSnapshot>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
}

/// The main game struct
pub struct Game {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current_piece: Option<Piece>,
    /// Score tracking
    pub score: Score,
    /// Current lifecycle phase
    pub phase: Phase,
    /// Randomizer for new pieces
    source: Box<dyn PieceSource>,
    /// Id written into the board by the next commit; never reset
    next_piece_id: u32,
    /// Lines removed by the most recent commit
    last_clear: usize,
}

impl Game {
    /// Create an idle game with a randomly seeded piece source
    pub fn new() -> Self {
        Self::with_source(Box::new(UniformSource::new()))
    }

    /// Create an idle game drawing pieces from `source`
    pub fn with_source(source: Box<dyn PieceSource>) -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            score: Score::new(),
            phase: Phase::Idle,
            source,
            next_piece_id: 1,
            last_clear: 0,
        }
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match self.phase {
            Phase::Idle => match action {
                Action::Primary => self.start(),
                Action::Restart => self.restart(),
                _ => {}
            },
            Phase::Playing => match action {
                Action::MoveLeft => self.move_by(-1, 0),
                Action::MoveRight => self.move_by(1, 0),
                Action::SoftDrop => self.soft_drop(),
                Action::Rotate => self.rotate(),
                Action::HardDrop | Action::Primary => self.hard_drop(),
                Action::Restart => self.restart(),
            },
            Phase::Over => {
                if action == Action::Restart {
                    self.restart();
                }
            }
        }
    }

    /// Gravity tick
    pub fn tick_gravity(&mut self) {
        self.process_action(Action::SoftDrop);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Lines removed by the most recent commit
    pub fn last_clear(&self) -> usize {
        self.last_clear
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            active: self.current_piece.map(|piece| ActiveSnapshot {
                piece_type: piece.piece_type,
                position: piece.position,
                rotation: piece.rotation,
            }),
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            phase: self.phase,
        }
    }

    fn start(&mut self) {
        let Some(piece) = spawner::spawn(&self.board, self.source.as_mut()) else {
            return;
        };
        self.current_piece = Some(piece);
        self.phase = Phase::Playing;
        tracing::info!("game started");
    }

    /// Fresh board and score, straight back into play
    fn restart(&mut self) {
        let board = Board::new();
        let Some(piece) = spawner::spawn(&board, self.source.as_mut()) else {
            return;
        };
        self.board = board;
        self.current_piece = Some(piece);
        self.score = Score::new();
        self.last_clear = 0;
        self.phase = Phase::Playing;
        tracing::info!("game restarted");
    }

    /// Shift the piece, or leave everything unchanged if the spot is taken
    fn move_by(&mut self, dx: i32, dy: i32) {
        if let Some(piece) = self.current_piece {
            if let Some(moved) = piece.moved(dx, dy, &self.board) {
                self.current_piece = Some(moved);
            }
        }
    }

    fn rotate(&mut self) {
        if let Some(piece) = self.current_piece {
            if let Some(rotated) = piece.rotated(&self.board) {
                self.current_piece = Some(rotated);
            }
        }
    }

    fn soft_drop(&mut self) {
        let Some(piece) = self.current_piece else {
            return;
        };
        match piece.moved(0, 1, &self.board) {
            Some(moved) => self.current_piece = Some(moved),
            None => self.lock_piece(piece),
        }
    }

    fn hard_drop(&mut self) {
        if let Some(piece) = self.current_piece {
            self.lock_piece(piece.dropped(&self.board));
        }
    }

    /// Commit `piece`, clear lines, score, and spawn the next piece
    ///
    /// Scoring happens before the spawn attempt, so a commit that ends the
    /// game still pays for the lines it cleared and counts them toward the
    /// level shown on the game-over screen.
    fn lock_piece(&mut self, piece: Piece) {
        let id = self.next_piece_id;
        self.next_piece_id += 1;

        let mut board = self.board.clone();
        board.place(&piece.shape(), piece.position, id);
        let cleared = board.clear_lines();

        let mut score = self.score.clone();
        let level_up = score.add_clear(cleared as u32);

        tracing::debug!(id, piece = ?piece.piece_type, cleared, "piece locked");
        if level_up {
            tracing::debug!(level = score.level, "level up");
        }

        let next = spawner::spawn(&board, self.source.as_mut());
        let phase = if next.is_some() { Phase::Playing } else { Phase::Over };

        self.board = board;
        self.score = score;
        self.current_piece = next;
        self.last_clear = cleared;
        self.phase = phase;

        if phase == Phase::Over {
            tracing::info!(
                score = self.score.points,
                level = self.score.level,
                lines = self.score.lines,
                "game over"
            );
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
