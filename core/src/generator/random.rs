use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, RngExt, SeedableRng};

use super::*;

/// Purely random generation, reproducible when built from a seed.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator<R> {
    rng: R,
    placement: Placement,
}

impl RandomMinefieldGenerator<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomMinefieldGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            placement: Placement::default(),
        }
    }

    pub fn with_placement(self, placement: Placement) -> Self {
        Self { placement, ..self }
    }
}

impl<R: Rng> MinefieldGenerator for RandomMinefieldGenerator<R> {
    fn generate(mut self, config: GameConfig) -> Result<MineLayout> {
        config.validate()?;

        let rows = usize::from(config.rows);
        let cols = usize::from(config.cols);
        // validated to be below the cell count, which comes from two `Dim`s
        let mines = config.mines as usize;
        let mut mine_mask: Array2<bool> = Array2::default([rows, cols]);

        match self.placement {
            Placement::Rejection => {
                let mut mines_placed = 0;
                let mut attempts: u64 = 0;
                while mines_placed < mines {
                    attempts += 1;
                    let row = self.rng.random_range(0..rows);
                    let col = self.rng.random_range(0..cols);
                    let cell = &mut mine_mask[[row, col]];
                    if !*cell {
                        *cell = true;
                        mines_placed += 1;
                    }
                }
                log::trace!("Placed {} mines in {} attempts", mines_placed, attempts);
            }
            Placement::IndexSample => {
                for index in rand::seq::index::sample(&mut self.rng, rows * cols, mines) {
                    mine_mask[[index / cols, index % cols]] = true;
                }
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask)?;

        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Generated {}x{} minefield with {} mines using {:?}",
            config.rows,
            config.cols,
            layout.mine_count(),
            self.placement
        );
        Ok(layout)
    }
}
