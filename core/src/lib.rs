#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod session;
mod snapshot;
mod tile;
mod types;

/// Largest board accepted, in cells. Each cell costs a few bytes across the mine, count and state grids.
pub const MAX_CELLS: CellCount = 1 << 24;

/// Immutable description of a board: its geometry and how many mines it holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Dim,
    pub cols: Dim,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Dim, cols: Dim, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Dim, cols: Dim, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    /// 800x600 play area cut into 40px tiles, with 40 mines.
    pub const fn classic() -> Self {
        Self::new_unchecked(15, 20, 40)
    }

    /// Checks that the board has at least one cell, at most [`MAX_CELLS`], and at least one safe cell.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            log::warn!("Rejected board with empty dimensions {}x{}", self.rows, self.cols);
            return Err(GameError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let cells = self.total_cells();
        if cells > MAX_CELLS {
            log::warn!("Rejected {}x{} board, over {} cells", self.rows, self.cols, MAX_CELLS);
            return Err(GameError::BoardTooLarge {
                cells,
                max: MAX_CELLS,
            });
        }

        if self.mines >= cells {
            log::warn!(
                "Rejected board with {} mines, only {} cells available",
                self.mines,
                cells
            );
            return Err(GameError::TooManyMines {
                mines: self.mines,
                cells,
            });
        }

        Ok(())
    }

    pub const fn size(&self) -> (Dim, Dim) {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Where the mines are, plus the adjacency counts derived from them once at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    config: GameConfig,
    mine_mask: Array2<bool>,
    adjacency: Array2<u8>,
}

impl MineLayout {
    /// Builds a layout from a full mine mask, rejecting masks that break the board invariants.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let rows = Dim::try_from(rows).map_err(|_| GameError::InvalidCoords)?;
        let cols = Dim::try_from(cols).map_err(|_| GameError::InvalidCoords)?;
        let mines = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mines = CellCount::try_from(mines).map_err(|_| GameError::InvalidCoords)?;
        let config = GameConfig::new(rows, cols, mines)?;

        let bounds = mine_mask.dim();
        let adjacency = Array2::from_shape_fn(bounds, |pos| {
            if mine_mask[pos.to_nd_index()] {
                0
            } else {
                // at most 8 neighbours, always fits
                NeighborIter::new(pos, bounds)
                    .filter(|&neighbor| mine_mask[neighbor.to_nd_index()])
                    .count() as u8
            }
        });

        Ok(Self {
            config,
            mine_mask,
            adjacency,
        })
    }

    pub fn from_mine_coords((rows, cols): (Dim, Dim), mine_coords: &[Coord2]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions { rows, cols });
        }

        let mut mine_mask: Array2<bool> = Array2::default([usize::from(rows), usize::from(cols)]);

        for &coords in mine_coords {
            let pos = locate(coords, (rows, cols)).ok_or(GameError::InvalidCoords)?;
            mine_mask[pos.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        self.config
    }

    pub fn locate(&self, coords: Coord2) -> Option<Pos> {
        locate(coords, self.size())
    }

    pub fn size(&self) -> (Dim, Dim) {
        self.config.size()
    }

    pub fn bounds(&self) -> Pos {
        self.mine_mask.dim()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self[pos]
    }

    /// Mines around `pos`; always 0 for a mine cell, where the count carries no meaning.
    pub fn adjacent_mine_count(&self, pos: Pos) -> u8 {
        self.adjacency[pos.to_nd_index()]
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Pos> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|(pos, _)| pos)
    }
}

impl Index<Pos> for MineLayout {
    type Output = bool;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.mine_mask[pos.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoOp,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoOp => false,
            Self::Flagged => true,
            Self::Unflagged => true,
        }
    }

    /// The new flag value, `None` when nothing changed.
    pub const fn flag_value(self) -> Option<bool> {
        match self {
            Self::NoOp => None,
            Self::Flagged => Some(true),
            Self::Unflagged => Some(false),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoOp,
    Safe,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoOp => false,
            Safe => true,
            HitMine => true,
            Won => true,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}
