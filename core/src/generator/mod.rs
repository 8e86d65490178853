use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// How a random generator picks mine cells. Both give every placement of `mines` cells the same probability.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Sample random cells, skipping ones that already hold a mine.
    #[default]
    Rejection,
    /// Draw distinct flat cell indices up front, bounded time even on dense boards.
    IndexSample,
}
