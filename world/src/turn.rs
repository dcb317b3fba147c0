//! Turn counter driven by committed player moves.

use maze_escape_core::{CellCoord, Turn};

use crate::maze::MazeModel;

/// Advances time whenever the player commits a move.
///
/// There is no independent ticking: refused moves never reach the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnEngine {
    turn: Turn,
}

impl TurnEngine {
    /// Creates an engine positioned on turn zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn reached so far.
    #[must_use]
    pub const fn current(&self) -> Turn {
        self.turn
    }

    /// Turn at which the next committed move would enter its target cell.
    #[must_use]
    pub const fn upcoming(&self) -> Turn {
        self.turn.next()
    }

    /// Records a committed move: bumps the turn and decays the maze's walls.
    ///
    /// Returns the new turn together with the cells that opened on it.
    pub fn commit_move(&mut self, maze: &mut MazeModel) -> (Turn, Vec<CellCoord>) {
        self.turn = self.turn.next();
        let opened = maze.advance_turn(self.turn);
        (self.turn, opened)
    }
}
