/// Signed cell coordinate. Callers map raw device positions into cell space, so values may fall outside the grid.
pub type Coord = i32;

/// Board dimension, used for row and column counts.
pub type Dim = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Cell coordinates `(row, col)`, possibly out of bounds.
pub type Coord2 = (Coord, Coord);

/// Bounds-checked `(row, col)` position inside a board.
pub type Pos = (usize, usize);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Pos {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0, self.1]
    }
}

pub const fn mult(a: Dim, b: Dim) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Resolves `coords` against a `(rows, cols)` grid, `None` when outside of it.
pub fn locate(coords: Coord2, (rows, cols): (Dim, Dim)) -> Option<Pos> {
    let row = usize::try_from(coords.0).ok()?;
    let col = usize::try_from(coords.1).ok()?;
    if row < usize::from(rows) && col < usize::from(cols) {
        Some((row, col))
    } else {
        None
    }
}

/// Converts an in-grid position back into signed coordinates.
pub fn to_coord2((row, col): Pos) -> Coord2 {
    // positions are bounded by `Dim`, which always fits a `Coord`
    (row as Coord, col as Coord)
}

/// Moore neighbourhood, in row-major order.
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Full 3x3 block around a cell, the cell itself included.
const SWEEP: [(Coord, Coord); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Pos, delta: (isize, isize), bounds: Pos) -> Option<Pos> {
    let (row, col) = pos;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the in-bounds Moore neighbours of a cell. Neighbours past an edge are skipped, never wrapped.
#[derive(Debug)]
pub struct NeighborIter {
    center: Pos,
    bounds: Pos,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Pos, bounds: Pos) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, *delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}

/// The unclipped 3x3 sweep around `coords`; results may lie outside the grid.
pub fn sweep((row, col): Coord2) -> impl Iterator<Item = Coord2> {
    SWEEP.into_iter().map(move |(dr, dc)| (row + dr, col + dc))
}
