use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Pixel geometry of the play area. Rows and columns are derived from it by whole tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: u32,
    pub height: u32,
    pub tile_size: u16,
}

impl PlayArea {
    pub const fn classic() -> Self {
        Self {
            width: 800,
            height: 600,
            tile_size: 40,
        }
    }

    /// Smallest play area holding every cell of `config` at `tile_size` pixels each.
    pub fn for_config(config: &GameConfig, tile_size: u16) -> Self {
        Self {
            width: u32::from(config.cols) * u32::from(tile_size),
            height: u32::from(config.rows) * u32::from(tile_size),
            tile_size,
        }
    }

    /// `(rows, cols)` of whole tiles that fit.
    pub fn grid_size(&self) -> Result<(Dim, Dim)> {
        if self.tile_size == 0 {
            return Err(GameError::InvalidPlayArea);
        }
        let tile = u32::from(self.tile_size);
        let rows = Dim::try_from(self.height / tile).map_err(|_| GameError::InvalidPlayArea)?;
        let cols = Dim::try_from(self.width / tile).map_err(|_| GameError::InvalidPlayArea)?;
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidPlayArea);
        }
        Ok((rows, cols))
    }

    /// Maps a pixel to cell coordinates. Pixels left of or above the grid floor to negative cells, so they stay
    /// outside it.
    pub fn cell_at(&self, x: i32, y: i32) -> Coord2 {
        let tile = Coord::from(self.tile_size.max(1));
        (y.div_euclid(tile), x.div_euclid(tile))
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    pub fn from_play_area(area: &PlayArea, mines: CellCount) -> Result<Self> {
        let (rows, cols) = area.grid_size()?;
        Self::new(rows, cols, mines)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    /// Reveals the cell
    Primary,
    /// Toggles the flag
    Secondary,
}

/// A discrete click in pixel space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEvent {
    pub x: i32,
    pub y: i32,
    pub button: PointerButton,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Reveal(RevealOutcome),
    Flag(FlagOutcome),
}

impl EventOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Flag(outcome) => outcome.has_update(),
        }
    }
}

/// Receives the board whenever the front-end wants to draw it.
pub trait RenderSink {
    fn render(&mut self, board: &Board);
}

/// Drives one board at a time, replacing it on restart.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    area: PlayArea,
    placement: Placement,
    seeds: SmallRng,
    board: Board,
    games_started: u32,
}

impl Session {
    /// Starts a session whose boards are all derived from `seed`.
    pub fn new(config: GameConfig, tile_size: u16, seed: u64) -> Result<Self> {
        Self::with_area(config, PlayArea::for_config(&config, tile_size), seed)
    }

    /// Starts a session over `area`, whose whole tiles must form exactly the grid of `config`.
    pub fn with_area(config: GameConfig, area: PlayArea, seed: u64) -> Result<Self> {
        config.validate()?;
        let (rows, cols) = area.grid_size()?;
        if (rows, cols) != config.size() {
            log::warn!(
                "Rejected {:?}: {}x{} tiles do not match a {}x{} board",
                area,
                rows,
                cols,
                config.rows,
                config.cols
            );
            return Err(GameError::InvalidPlayArea);
        }
        let mut seeds = SmallRng::seed_from_u64(seed);
        let board = Self::new_board(config, Placement::default(), &mut seeds)?;
        log::debug!("Session started with {:?} over {:?}", config, area);

        Ok(Self {
            config,
            area,
            placement: Placement::default(),
            seeds,
            board,
            games_started: 1,
        })
    }

    /// Switches to `placement`, regenerating the current board with it.
    pub fn with_placement(mut self, placement: Placement) -> Result<Self> {
        self.placement = placement;
        self.board = Self::new_board(self.config, placement, &mut self.seeds)?;
        Ok(self)
    }

    fn new_board(config: GameConfig, placement: Placement, seeds: &mut SmallRng) -> Result<Board> {
        let seed = seeds.next_u64();
        log::debug!("New board from seed {}", seed);
        Board::generate(
            config,
            RandomMinefieldGenerator::from_seed(seed).with_placement(placement),
        )
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    pub fn handle(&mut self, event: CellEvent) -> EventOutcome {
        let coords = self.area.cell_at(event.x, event.y);
        log::trace!("{:?} at ({}, {}) -> cell {:?}", event.button, event.x, event.y, coords);
        match event.button {
            PointerButton::Primary => EventOutcome::Reveal(self.reveal(coords)),
            PointerButton::Secondary => EventOutcome::Flag(self.toggle_flag(coords)),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let outcome = self.board.reveal(coords);
        if outcome.is_terminal() {
            log::info!("Game {} ended: {:?}", self.games_started, self.board.state());
        }
        outcome
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        self.board.toggle_flag(coords)
    }

    /// Discards the current board and generates a fresh one from the next seed. Accepted in any state.
    pub fn restart(&mut self) -> Result<()> {
        self.board = Self::new_board(self.config, self.placement, &mut self.seeds)?;
        self.games_started += 1;
        Ok(())
    }

    pub fn present(&self, sink: &mut impl RenderSink) {
        sink.render(&self.board);
    }
}
