use thiserror::Error;

use crate::{CellCount, Dim};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must have at least one row and one column, got {rows}x{cols}")]
    InvalidDimensions { rows: Dim, cols: Dim },
    #[error("Too many mines: requested {mines} but the board only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("Board too large: {cells} cells, at most {max} allowed")]
    BoardTooLarge { cells: CellCount, max: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Play area does not match the board grid")]
    InvalidPlayArea,
}

pub type Result<T> = core::result::Result<T, GameError>;
