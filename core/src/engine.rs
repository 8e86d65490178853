use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Moves are accepted
    #[default]
    Playing,
    /// Every safe cell was revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl GameState {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from generation to win or loss. Replaced wholesale on restart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: GameState,
    triggered_mine: Option<Pos>,
}

impl Board {
    pub fn new(mine_layout: MineLayout) -> Self {
        let bounds = mine_layout.bounds();
        Self {
            mine_layout,
            cells: Array2::default(bounds),
            revealed_count: 0,
            flagged_count: 0,
            state: GameState::default(),
            triggered_mine: None,
        }
    }

    pub fn generate(config: GameConfig, generator: impl MinefieldGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    /// Generates a board with rejection-sampled mines from `seed`.
    pub fn from_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::generate(config, RandomMinefieldGenerator::from_seed(seed))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn size(&self) -> (Dim, Dim) {
        self.mine_layout.size()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags; goes negative when the player over-flags.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.mine_layout.mine_count()) - i64::from(self.flagged_count)
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine.map(to_coord2)
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.state_at(coords).is_some_and(CellState::is_revealed)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.state_at(coords).is_some_and(CellState::is_flagged)
    }

    pub fn is_mine(&self, coords: Coord2) -> bool {
        self.mine_layout
            .locate(coords)
            .is_some_and(|pos| self.mine_layout.contains_mine(pos))
    }

    /// Mines around `coords`, `None` outside the grid. Meaningless (0) for mine cells.
    pub fn adjacent_count(&self, coords: Coord2) -> Option<u8> {
        self.mine_layout
            .locate(coords)
            .map(|pos| self.mine_layout.adjacent_mine_count(pos))
    }

    pub fn state_at(&self, coords: Coord2) -> Option<CellState> {
        self.mine_layout
            .locate(coords)
            .map(|pos| self.cells[pos.to_nd_index()])
    }

    /// Player-visible view of a cell. Mines are exposed once the game is over.
    pub fn cell(&self, coords: Coord2) -> Option<CellView> {
        let pos = self.mine_layout.locate(coords)?;
        let has_mine = self.mine_layout.contains_mine(pos);

        Some(match (self.cells[pos.to_nd_index()], has_mine, self.state) {
            (CellState::Revealed, true, _) if self.triggered_mine == Some(pos) => CellView::Exploded,
            (CellState::Revealed, true, _) => CellView::Mine,
            (CellState::Revealed, false, _) => {
                CellView::Open(self.mine_layout.adjacent_mine_count(pos))
            }
            (CellState::Hidden, true, GameState::Lost) => CellView::Mine,
            (CellState::Hidden, true, GameState::Won) => CellView::Flagged,
            (CellState::Hidden, _, _) => CellView::Hidden,
            (CellState::Flagged, false, GameState::Lost) => CellView::IncorrectFlag,
            (CellState::Flagged, _, _) => CellView::Flagged,
        })
    }

    /// True iff every cell without a mine has been revealed. Never changes the board.
    pub fn check_win(&self) -> bool {
        self.cells
            .indexed_iter()
            .all(|(pos, cell)| cell.is_revealed() || self.mine_layout.contains_mine(pos))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        use FlagOutcome::*;

        if self.state.is_finished() {
            return NoOp;
        }
        let Some(pos) = self.mine_layout.locate(coords) else {
            return NoOp;
        };

        let cell = &mut self.cells[pos.to_nd_index()];
        match *cell {
            CellState::Hidden => {
                *cell = CellState::Flagged;
                self.flagged_count += 1;
                Flagged
            }
            CellState::Flagged => {
                *cell = CellState::Hidden;
                self.flagged_count -= 1;
                Unflagged
            }
            CellState::Revealed => NoOp,
        }
    }

    /// Reveals a cell, flooding outwards from cells with no adjacent mines.
    ///
    /// Stale or out-of-grid coordinates are ignored and give [`RevealOutcome::NoOp`]. Revealing a flagged cell
    /// clears its flag.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() {
            return NoOp;
        }
        let Some(pos) = self.mine_layout.locate(coords) else {
            return NoOp;
        };
        if self.cells[pos.to_nd_index()].is_revealed() {
            return NoOp;
        }

        if self.mine_layout.contains_mine(pos) {
            self.open(pos);
            self.triggered_mine = Some(pos);
            self.end_game(GameState::Lost);
            return HitMine;
        }

        self.flood_reveal(coords);

        if self.check_win() {
            self.end_game(GameState::Won);
            Won
        } else {
            Safe
        }
    }

    /// Iterative flood fill over an explicit work-list.
    ///
    /// A zero cell pushes its whole 3x3 block, itself and out-of-grid cells included; the bounds and
    /// already-revealed checks absorb those. Each cell is opened at most once, so the fill ends after at most
    /// `rows * cols` openings. Cells bordering a zero cell can't be mines, so the fill never loses the game.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut pending = Vec::from([start]);
        let mut opened: CellCount = 0;

        while let Some(coords) = pending.pop() {
            let Some(pos) = self.mine_layout.locate(coords) else {
                continue;
            };
            if self.cells[pos.to_nd_index()].is_revealed() {
                continue;
            }
            debug_assert!(!self.mine_layout.contains_mine(pos));

            self.open(pos);
            opened += 1;
            let adjacent_mines = self.mine_layout.adjacent_mine_count(pos);
            log::trace!("Opened cell at {:?}, mine count: {}", coords, adjacent_mines);

            if adjacent_mines == 0 {
                pending.extend(sweep(coords));
            }
        }

        log::debug!("Reveal at {:?} opened {} cells", start, opened);
    }

    fn open(&mut self, pos: Pos) {
        let cell = &mut self.cells[pos.to_nd_index()];
        if cell.is_flagged() {
            self.flagged_count -= 1;
        }
        *cell = CellState::Revealed;
        self.revealed_count += 1;
    }

    fn end_game(&mut self, state: GameState) {
        if self.state.is_finished() {
            return;
        }

        log::debug!("Game ended: {:?}", state);
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: (Dim, Dim), mines: &[Coord2]) -> Board {
        Board::new(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn revealed_cells(board: &Board) -> usize {
        board.cells.iter().filter(|cell| cell.is_revealed()).count()
    }

    #[test]
    fn new_board_starts_hidden_and_playing() {
        let board = Board::from_seed(GameConfig::beginner(), 11).unwrap();

        assert_eq!(board.state(), GameState::Playing);
        assert_eq!(revealed_cells(&board), 0);
        assert_eq!(board.flagged_count(), 0);
        assert_eq!(board.total_mines(), 10);
        assert!(!board.check_win());
    }

    #[test]
    fn from_seed_rejects_bad_config() {
        let config = GameConfig::new_unchecked(2, 2, 4);
        assert_eq!(
            Board::from_seed(config, 0),
            Err(GameError::TooManyMines { mines: 4, cells: 4 })
        );
    }

    #[test]
    fn reveal_hits_mine_and_sets_triggered_cell() {
        let mut board = board((2, 2), &[(0, 0)]);

        let outcome = board.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(board.state(), GameState::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 0)));
        assert!(board.is_revealed((0, 0)));
        assert_eq!(board.cell((0, 0)), Some(CellView::Exploded));
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut board = board((3, 3), &[(2, 2)]);

        let outcome = board.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.cell((0, 0)), Some(CellView::Open(0)));
        assert_eq!(board.cell((1, 1)), Some(CellView::Open(1)));
        assert!(!board.is_revealed((2, 2)));
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // column 2 is a wall of mines, column 1 is the numbered border
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2)];
        let mut board = board((4, 5), &mines);

        assert_eq!(board.reveal((0, 0)), RevealOutcome::Safe);

        for row in 0..4 {
            assert!(board.is_revealed((row, 0)));
            assert!(board.is_revealed((row, 1)));
            assert!(!board.is_revealed((row, 3)));
            assert!(!board.is_revealed((row, 4)));
        }
        assert_eq!(revealed_cells(&board), 8);
        assert_eq!(board.revealed_count(), 8);
    }

    #[test]
    fn numbered_cell_reveals_only_itself() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.reveal((1, 1)), RevealOutcome::Safe);
        assert_eq!(revealed_cells(&board), 1);
        assert_eq!(board.adjacent_count((1, 1)), Some(1));
    }

    #[test]
    fn empty_board_reveals_everything_at_once() {
        let mut board = Board::from_seed(GameConfig::new(5, 5, 0).unwrap(), 9).unwrap();

        assert_eq!(board.reveal((0, 0)), RevealOutcome::Won);
        assert_eq!(revealed_cells(&board), 25);
        assert_eq!(board.state(), GameState::Won);
    }

    #[test]
    fn two_by_two_win_by_revealing_every_safe_cell() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.reveal((0, 1)), RevealOutcome::Safe);
        assert_eq!(board.reveal((1, 0)), RevealOutcome::Safe);
        assert!(!board.check_win());
        assert_eq!(board.reveal((1, 1)), RevealOutcome::Won);
        assert!(board.check_win());
        assert_eq!(board.state(), GameState::Won);
    }

    #[test]
    fn out_of_bounds_is_a_no_op() {
        let mut board = board((3, 3), &[(1, 1)]);

        assert_eq!(board.reveal((-1, -1)), RevealOutcome::NoOp);
        assert_eq!(board.reveal((999, 999)), RevealOutcome::NoOp);
        assert_eq!(board.reveal((0, 3)), RevealOutcome::NoOp);
        assert_eq!(board.toggle_flag((-1, 0)), FlagOutcome::NoOp);
        assert_eq!(board.toggle_flag((3, 3)), FlagOutcome::NoOp);
        assert_eq!(board.adjacent_count((3, 0)), None);
        assert!(!board.is_mine((-1, 0)));
        assert_eq!(revealed_cells(&board), 0);
    }

    #[test]
    fn revealing_twice_is_a_no_op() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.reveal((1, 1)), RevealOutcome::Safe);
        assert_eq!(board.state(), GameState::Playing);
        let before = board.clone();
        assert_eq!(board.reveal((1, 1)), RevealOutcome::NoOp);
        assert_eq!(board, before);
    }

    #[test]
    fn toggle_flag_flips_and_counts() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.toggle_flag((0, 0)), FlagOutcome::Flagged);
        assert!(board.is_flagged((0, 0)));
        assert_eq!(board.mines_left(), 0);

        assert_eq!(board.toggle_flag((0, 0)), FlagOutcome::Unflagged);
        assert!(!board.is_flagged((0, 0)));
        assert_eq!(board.mines_left(), 1);
    }

    #[test]
    fn mines_left_goes_negative_when_overflagged() {
        let mut board = board((2, 2), &[(0, 0)]);

        board.toggle_flag((0, 1));
        board.toggle_flag((1, 0));

        assert_eq!(board.mines_left(), -1);
    }

    #[test]
    fn flagging_a_revealed_cell_is_a_no_op() {
        let mut board = board((2, 2), &[(0, 0)]);

        board.reveal((1, 1));
        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::NoOp);
        assert!(!board.is_flagged((1, 1)));
    }

    #[test]
    fn reveal_clears_flag_on_target_and_flood() {
        let mut board = board((3, 4), &[(0, 3)]);

        board.toggle_flag((2, 0));
        board.toggle_flag((1, 0));
        assert_eq!(board.reveal((1, 0)), RevealOutcome::Won);

        assert!(board.is_revealed((2, 0)));
        assert!(!board.is_flagged((2, 0)));
        assert!(!board.is_flagged((1, 0)));
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn finished_game_is_frozen() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.reveal((0, 0));
        let frozen = board.clone();

        assert_eq!(board.reveal((1, 1)), RevealOutcome::NoOp);
        assert_eq!(board.toggle_flag((0, 1)), FlagOutcome::NoOp);
        assert_eq!(board, frozen);
    }

    #[test]
    fn lost_board_shows_mines_and_wrong_flags() {
        let mut board = board((2, 3), &[(0, 0), (0, 2)]);

        board.toggle_flag((1, 2));
        board.reveal((0, 0));

        assert_eq!(board.cell((0, 0)), Some(CellView::Exploded));
        assert_eq!(board.cell((0, 2)), Some(CellView::Mine));
        assert_eq!(board.cell((1, 2)), Some(CellView::IncorrectFlag));
        assert_eq!(board.cell((1, 1)), Some(CellView::Hidden));
        assert_eq!(board.cell((2, 0)), None);
    }

    #[test]
    fn won_board_shows_remaining_mines_as_flags() {
        let mut board = board((1, 2), &[(0, 0)]);

        assert_eq!(board.reveal((0, 1)), RevealOutcome::Won);
        assert_eq!(board.cell((0, 0)), Some(CellView::Flagged));
        assert_eq!(board.triggered_mine(), None);
    }
}
