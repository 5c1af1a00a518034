use crate::logic::board::Board;
use crate::logic::eval_constants::{COLS, ROWS};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfBounds,
    ColumnFull,
    GameOver,
    NothingToTakeBack,
    NothingToRedo,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfBounds => "column out of bounds",
            Self::ColumnFull => "column is full",
            Self::GameOver => "game is over",
            Self::NothingToTakeBack => "no move to take back",
            Self::NothingToRedo => "no move to redo",
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for MoveError {}

/// Checks that the player to move may drop a stone into `column`.
pub fn validate_move(board: &Board, column: usize) -> Result<(), MoveError> {
    if board.is_terminal() {
        return Err(MoveError::GameOver);
    }
    if column >= COLS {
        return Err(MoveError::OutOfBounds);
    }
    if board.column_height(column) >= ROWS {
        return Err(MoveError::ColumnFull);
    }
    Ok(())
}

/// Checked move for the player to move.
pub fn try_move(board: &Board, column: usize) -> Result<Board, MoveError> {
    validate_move(board, column)?;
    Ok(board.make_move(column, board.next_player()))
}
