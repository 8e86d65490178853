use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a renderer may show for one frame, detached from the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: (Dim, Dim),
    pub state: GameState,
    pub mines_left: i64,
    pub cells: Array2<CellView>,
}

impl Snapshot {
    pub fn from_board(board: &Board) -> Self {
        let size = board.size();
        let cells = Array2::from_shape_fn(board.mine_layout().bounds(), |pos| {
            board.cell(to_coord2(pos)).unwrap_or_default()
        });

        Self {
            size,
            state: board.state(),
            mines_left: board.mines_left(),
            cells,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<CellView> {
        locate(coords, self.size).map(|pos| self.cells[pos.to_nd_index()])
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = CellView> + '_> + '_ {
        self.cells.rows().into_iter().map(|row| row.into_iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_board_maps_revealed_and_flagged_cells() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut board = Board::new(layout);

        board.reveal((1, 1));
        board.toggle_flag((0, 0));

        let snapshot = Snapshot::from_board(&board);

        assert_eq!(snapshot.mines_left, 0);
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.cell((1, 1)), Some(CellView::Open(1)));
        assert_eq!(snapshot.cell((0, 0)), Some(CellView::Flagged));
        assert_eq!(snapshot.cell((0, 1)), Some(CellView::Hidden));
        assert_eq!(snapshot.cell((2, 0)), None);
    }

    #[test]
    fn rows_walk_in_row_major_order() {
        let layout = MineLayout::from_mine_coords((2, 3), &[(1, 2)]).unwrap();
        let mut board = Board::new(layout);
        board.reveal((0, 0));

        let snapshot = Snapshot::from_board(&board);

        assert_eq!(snapshot.rows().count(), 2);
        assert!(snapshot.rows().all(|row| row.count() == 3));
        let first: [CellView; 3] = {
            let mut row = snapshot.rows().next().unwrap();
            [row.next().unwrap(), row.next().unwrap(), row.next().unwrap()]
        };
        assert_eq!(first, [CellView::Open(0), CellView::Open(1), CellView::Hidden]);
    }
}
