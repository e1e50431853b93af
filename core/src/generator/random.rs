use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Seeded uniform placement that can keep the start cell, or its whole
/// neighborhood, free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }

    fn effective_start_tile(&self, config: &GameConfig, reserved_zero: CellCount) -> StartTile {
        use StartTile::*;

        let total_cells = config.total_cells();
        match self.start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if config.mines + 1 > total_cells => {
                log::warn!("Cannot make start cell safe, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.mines + reserved_zero > total_cells => {
                log::warn!("Cannot make start cell zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use StartTile::*;

        let config = GameConfig::new(config.size, config.mines);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());

        let start = if mines.dim().0 > usize::from(self.start.0)
            && mines.dim().1 > usize::from(self.start.1)
        {
            self.start
        } else {
            log::warn!("Start cell {:?} is outside the board, using (0, 0)", self.start);
            (0, 0)
        };

        let start_area: Vec<Coord2> = core::iter::once(start)
            .chain(mines.iter_neighbors(start))
            .collect();
        let start_tile = self.effective_start_tile(&config, start_area.len() as CellCount);
        let reserved: Vec<Coord2> = match start_tile {
            Random => Vec::new(),
            SimpleSafe => Vec::from([start]),
            AlwaysZero => start_area,
        };

        // reserved cells are pre-filled so placement skips them
        for &coords in &reserved {
            mines[coords.to_nd_index()] = true;
        }

        let mut free_cells = config.total_cells() - reserved.len() as CellCount;
        let mut mines_placed = 0;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        if let Some(cells) = mines.as_slice_mut() {
            while mines_placed < config.mines && free_cells > 0 {
                // the `place`-th free cell, counting in row-major order
                let mut place = rng.random_range(0..free_cells);
                for cell in cells.iter_mut() {
                    if *cell {
                        continue;
                    }
                    if place == 0 {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                    place -= 1;
                }
            }
        }

        for &coords in &reserved {
            mines[coords.to_nd_index()] = false;
        }

        if mines_placed != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                mines_placed,
                config.mines
            );
        }

        MineLayout::from_mine_mask(mines).expect("config is clamped to at least 1x1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, start_tile: StartTile, config: GameConfig) -> MineLayout {
        RandomLayoutGenerator::new(seed, (2, 2), start_tile).generate(config)
    }

    #[test]
    fn places_requested_mine_count() {
        let layout = generate(7, StartTile::Random, GameConfig::new((9, 9), 10));

        assert_eq!(layout.size(), (9, 9));
        assert_eq!(layout.mine_count(), 10);
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::new((16, 30), 99);

        assert_eq!(
            generate(42, StartTile::Random, config),
            generate(42, StartTile::Random, config)
        );
    }

    #[test]
    fn simple_safe_keeps_start_clear() {
        for seed in 0..20 {
            let layout = generate(seed, StartTile::SimpleSafe, GameConfig::new((5, 5), 24));

            assert!(!layout.contains_mine((2, 2)));
            assert_eq!(layout.mine_count(), 24);
        }
    }

    #[test]
    fn always_zero_keeps_neighborhood_clear() {
        for seed in 0..20 {
            let layout = generate(seed, StartTile::AlwaysZero, GameConfig::new((6, 6), 20));

            assert!(!layout.contains_mine((2, 2)));
            assert_eq!(layout.adjacent_mine_count((2, 2)), 0);
            assert_eq!(layout.mine_count(), 20);
        }
    }

    #[test]
    fn always_zero_downgrades_on_crowded_board() {
        let layout = generate(3, StartTile::AlwaysZero, GameConfig::new((3, 3), 8));

        assert!(!layout.contains_mine((2, 2)));
        assert_eq!(layout.mine_count(), 8);
    }

    #[test]
    fn full_board_is_all_mines() {
        let layout = generate(1, StartTile::SimpleSafe, GameConfig::new((2, 3), 6));

        assert_eq!(layout.mine_count(), 6);
        assert_eq!(layout.safe_cell_count(), 0);
    }
}
