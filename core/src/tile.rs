use serde::{Deserialize, Serialize};

/// Mutable per-cell state stored by the board engine.
///
/// Revealed and flagged are variants of the same enum, so a cell can never be both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

/// What a player is allowed to see of a cell, used by renderers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Open(u8),
    // these are only used to show result after the game finishes:
    Mine,
    Exploded,
    IncorrectFlag,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            Hidden => true,
            Flagged => true,
            Open(_) => false,
            Mine => false,
            Exploded => false,
            IncorrectFlag => true,
        }
    }
}
