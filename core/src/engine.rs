use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Playing,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Counters reported when the game ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub state: EngineState,
    pub visited: CellCount,
    /// On a win every mine counts as marked, whether or not it was.
    pub marked: CellCount,
}

/// Authoritative game: owns the mine layout and everything revealed so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    board: Array2<EngineCell>,
    visited_count: Saturating<CellCount>,
    marked_mine_count: Saturating<CellCount>,
    state: EngineState,
    exploded_at: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            visited_count: Saturating(0),
            marked_mine_count: Saturating(0),
            state: Default::default(),
            exploded_at: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn visited_count(&self) -> CellCount {
        self.visited_count.0
    }

    pub fn marked_mine_count(&self) -> CellCount {
        self.marked_mine_count.0
    }

    /// Cells that are neither revealed nor marked, the exploded cell included.
    pub fn unsettled_count(&self) -> CellCount {
        self.board
            .iter()
            .filter(|cell| !matches!(cell, EngineCell::Revealed(_) | EngineCell::Marked))
            .count() as CellCount
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.board[coords.to_nd_index()]
    }

    /// The cell that lost the game: a detonated mine or a wrongly marked safe cell.
    pub fn exploded_at(&self) -> Option<Coord2> {
        self.exploded_at
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn summary(&self) -> Summary {
        let marked = match self.state {
            EngineState::Won => self.total_mines(),
            _ => self.marked_mine_count(),
        };
        Summary {
            state: self.state,
            visited: self.visited_count(),
            marked,
        }
    }

    /// Snapshot of what a player may see. Once won, every mine shows as marked.
    pub fn disclose(&self) -> Array2<Glyph> {
        let won = matches!(self.state, EngineState::Won);
        Array2::from_shape_fn(self.board.dim(), |(row, column)| {
            let coords = (row as Coord, column as Coord);
            if won && self.mine_layout[coords] {
                Glyph::Marked
            } else {
                Glyph::from(self.board[(row, column)])
            }
        })
    }

    pub fn apply(&mut self, mv: Move) -> Outcome {
        let outcome = match mv.kind {
            MoveKind::Visit => self.visit(mv.coords),
            MoveKind::Mark => self.mark(mv.coords),
            MoveKind::AutoExplore => self.auto_explore(mv.coords),
        };
        log::debug!("{:?} at {:?}: {:?}", mv.kind, mv.coords, outcome);
        outcome
    }

    pub fn visit(&mut self, coords: Coord2) -> Outcome {
        if let Err(ignored) = self.check_hidden(coords) {
            return Outcome::NoChange(ignored);
        }

        if self.mine_layout[coords] {
            self.board[coords.to_nd_index()] = EngineCell::Exploded;
            self.exploded_at = Some(coords);
            self.end_game(false);
            return Outcome::HitMine;
        }

        self.flood_reveal(coords);
        self.check_win(Outcome::Revealed)
    }

    /// Marking a cell without a mine loses the game on the spot.
    pub fn mark(&mut self, coords: Coord2) -> Outcome {
        if let Err(ignored) = self.check_hidden(coords) {
            return Outcome::NoChange(ignored);
        }

        if !self.mine_layout[coords] {
            self.board[coords.to_nd_index()] = EngineCell::Exploded;
            self.exploded_at = Some(coords);
            self.end_game(false);
            return Outcome::HitMine;
        }

        self.board[coords.to_nd_index()] = EngineCell::Marked;
        self.marked_mine_count += 1;
        self.check_win(Outcome::Marked)
    }

    pub fn auto_explore(&mut self, coords: Coord2) -> Outcome {
        if let Err(ignored) = self.check_playable(coords) {
            return Outcome::NoChange(ignored);
        }

        // revealed cells never hold a mine
        let EngineCell::Revealed(_) = self.board[coords.to_nd_index()] else {
            return Outcome::NoChange(Ignored::NotRevealed);
        };

        if self.count_marked_neighbors(coords) != self.mine_layout.adjacent_mine_count(coords) {
            return Outcome::NoChange(Ignored::MarkMismatch);
        }

        let mut outcome = Outcome::NoChange(Ignored::NothingHidden);
        for neighbor in self.mine_layout.iter_neighbors(coords) {
            if !self.board[neighbor.to_nd_index()].is_hidden() {
                continue;
            }
            outcome = outcome | self.visit(neighbor);
            if self.state.is_finished() {
                return outcome;
            }
        }

        self.check_win(outcome)
    }

    /// Reveals `start` and spreads through zero-count cells using an explicit
    /// work list. A cell is revealed at most once; stale entries are skipped.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit: Vec<Coord2> = Vec::from([start]);
        let mut revealed: CellCount = 0;

        while let Some(visit_coords) = to_visit.pop() {
            if !self.board[visit_coords.to_nd_index()].is_hidden() || self.mine_layout[visit_coords]
            {
                continue;
            }

            let adjacent_mines = self.mine_layout.adjacent_mine_count(visit_coords);
            self.board[visit_coords.to_nd_index()] = EngineCell::Revealed(adjacent_mines);
            self.visited_count += 1;
            revealed += 1;

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()].is_hidden()),
                );
            }
        }

        log::debug!("flood reveal from {:?} opened {} cells", start, revealed);
    }

    fn check_win(&mut self, outcome: Outcome) -> Outcome {
        if self.state.is_playing() && self.visited_count.0 == self.mine_layout.safe_cell_count() {
            self.end_game(true);
            Outcome::Won
        } else {
            outcome
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::debug!("game over: {:?}", self.state);
    }

    fn count_marked_neighbors(&self, coords: Coord2) -> u8 {
        self.mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos.to_nd_index()] == EngineCell::Marked)
            .count() as u8
    }

    fn check_playable(&self, coords: Coord2) -> core::result::Result<(), Ignored> {
        if self.state.is_finished() {
            return Err(Ignored::Finished);
        }
        if !self.mine_layout.contains(coords) {
            return Err(Ignored::OutOfBounds);
        }
        Ok(())
    }

    fn check_hidden(&self, coords: Coord2) -> core::result::Result<(), Ignored> {
        self.check_playable(coords)?;
        if self.board[coords.to_nd_index()].is_settled() {
            return Err(Ignored::Settled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    /// The 3x3 board with mines at (0, 1) and (1, 2).
    fn sample() -> PlayEngine {
        PlayEngine::new(layout((3, 3), &[(0, 1), (1, 2)]))
    }

    fn rendered(engine: &PlayEngine) -> String {
        let mut out = String::new();
        for row in engine.disclose().rows() {
            out.extend(row.iter().map(|glyph| glyph.to_char()));
            out.push('\n');
        }
        out
    }

    fn assert_counters(engine: &PlayEngine) {
        let (rows, columns) = engine.size();
        assert_eq!(
            engine.visited_count() + engine.marked_mine_count() + engine.unsettled_count(),
            mult(rows, columns)
        );
    }

    #[test]
    fn starts_hidden_and_playing() {
        let engine = sample();

        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.total_mines(), 2);
        assert_eq!(rendered(&engine), "???\n???\n???\n");
        assert_counters(&engine);
    }

    #[test]
    fn visit_zero_cell_floods_to_numbered_boundary() {
        let mut engine = sample();

        assert_eq!(engine.visit((2, 0)), Outcome::Revealed);

        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(rendered(&engine), "???\n12?\n01?\n");
        assert_eq!(engine.visited_count(), 4);
        assert_counters(&engine);
    }

    #[test]
    fn visiting_a_mine_loses() {
        let mut engine = sample();
        engine.visit((2, 0));

        assert_eq!(engine.visit((0, 1)), Outcome::HitMine);

        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.exploded_at(), Some((0, 1)));
        assert_eq!(rendered(&engine), "?X?\n12?\n01?\n");
        assert_counters(&engine);
    }

    #[test]
    fn visiting_every_safe_cell_wins_and_shows_mines_marked() {
        let mut engine = sample();

        assert_eq!(engine.visit((0, 0)), Outcome::Revealed);
        assert_eq!(engine.visit((0, 2)), Outcome::Revealed);
        assert_eq!(engine.visit((2, 0)), Outcome::Revealed);
        assert_eq!(engine.visit((2, 2)), Outcome::Won);

        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(rendered(&engine), "1@2\n12@\n011\n");
        assert_eq!(
            engine.summary(),
            Summary {
                state: EngineState::Won,
                visited: 7,
                marked: 2,
            }
        );
    }

    /// The 3x3 board with mines at (0, 1) and (2, 2).
    fn corner_sample() -> PlayEngine {
        PlayEngine::new(layout((3, 3), &[(0, 1), (2, 2)]))
    }

    #[test]
    fn corner_sample_visits_win() {
        let mut engine = corner_sample();

        assert_eq!(engine.visit((0, 0)), Outcome::Revealed);
        assert_eq!(rendered(&engine), "1??\n???\n???\n");
        assert_eq!(engine.visit((0, 2)), Outcome::Revealed);
        assert_eq!(engine.visit((2, 0)), Outcome::Revealed);
        assert_eq!(engine.visit((1, 2)), Outcome::Won);

        assert_eq!(rendered(&engine), "1@1\n122\n01@\n");
        assert_eq!(engine.summary().visited, 7);
        assert_counters(&engine);
    }

    #[test]
    fn corner_sample_mine_after_first_visit_loses() {
        let mut engine = corner_sample();
        engine.visit((0, 0));

        assert_eq!(engine.visit((0, 1)), Outcome::HitMine);
        assert_eq!(rendered(&engine), "1X?\n???\n???\n");
    }

    #[test]
    fn corner_sample_auto_explore_from_center_wins() {
        let mut engine = corner_sample();
        engine.visit((1, 1));
        engine.mark((0, 1));
        engine.mark((2, 2));
        assert_eq!(rendered(&engine), "?@?\n?2?\n??@\n");

        assert_eq!(engine.auto_explore((1, 1)), Outcome::Won);

        assert_eq!(rendered(&engine), "1@1\n122\n01@\n");
        assert_eq!(
            engine.summary(),
            Summary {
                state: EngineState::Won,
                visited: 7,
                marked: 2,
            }
        );
    }

    #[test]
    fn marking_a_mine_keeps_playing() {
        let mut engine = sample();

        assert_eq!(engine.mark((0, 1)), Outcome::Marked);

        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.marked_mine_count(), 1);
        assert_eq!(engine.cell_at((0, 1)), EngineCell::Marked);
        assert_counters(&engine);
    }

    #[test]
    fn marking_a_safe_cell_loses_without_counting() {
        let mut engine = sample();
        engine.visit((0, 0));
        engine.visit((0, 2));

        assert_eq!(engine.mark((1, 0)), Outcome::HitMine);

        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.marked_mine_count(), 0);
        assert_eq!(engine.exploded_at(), Some((1, 0)));
        assert!(!engine.has_mine_at((1, 0)));
        assert_eq!(rendered(&engine), "1?2\nX??\n???\n");
        assert_eq!(
            engine.summary(),
            Summary {
                state: EngineState::Lost,
                visited: 2,
                marked: 0,
            }
        );
        assert_counters(&engine);
    }

    #[test]
    fn settled_cells_ignore_further_moves() {
        let mut engine = sample();
        engine.visit((0, 0));
        engine.mark((0, 1));

        assert_eq!(engine.visit((0, 0)), Outcome::NoChange(Ignored::Settled));
        assert_eq!(engine.mark((0, 0)), Outcome::NoChange(Ignored::Settled));
        assert_eq!(engine.visit((0, 1)), Outcome::NoChange(Ignored::Settled));
        assert_eq!(engine.mark((0, 1)), Outcome::NoChange(Ignored::Settled));
        assert_eq!(engine.marked_mine_count(), 1);
        assert_eq!(engine.visited_count(), 1);
    }

    #[test]
    fn out_of_bounds_moves_are_ignored() {
        let mut engine = sample();

        assert_eq!(engine.visit((3, 0)), Outcome::NoChange(Ignored::OutOfBounds));
        assert_eq!(engine.mark((0, 3)), Outcome::NoChange(Ignored::OutOfBounds));
        assert_eq!(
            engine.auto_explore((9, 9)),
            Outcome::NoChange(Ignored::OutOfBounds)
        );
        assert_eq!(engine.state(), EngineState::Playing);
    }

    #[test]
    fn finished_games_ignore_moves() {
        let mut engine = sample();
        engine.visit((0, 1));
        let before = engine.clone();

        assert_eq!(engine.visit((2, 0)), Outcome::NoChange(Ignored::Finished));
        assert_eq!(engine.mark((1, 2)), Outcome::NoChange(Ignored::Finished));
        assert_eq!(engine, before);
    }

    #[test]
    fn auto_explore_reveals_remaining_neighbors_and_wins() {
        let mut engine = sample();
        engine.visit((1, 1));
        engine.mark((0, 1));
        engine.mark((1, 2));
        assert_eq!(rendered(&engine), "?@?\n?2@\n???\n");

        assert_eq!(engine.auto_explore((1, 1)), Outcome::Won);

        assert_eq!(rendered(&engine), "1@2\n12@\n011\n");
    }

    #[test]
    fn auto_explore_requires_matching_marks() {
        let mut engine = sample();
        engine.visit((1, 1));
        engine.mark((0, 1));

        assert_eq!(
            engine.auto_explore((1, 1)),
            Outcome::NoChange(Ignored::MarkMismatch)
        );
        assert_eq!(engine.visited_count(), 1);
    }

    #[test]
    fn auto_explore_requires_revealed_target() {
        let mut engine = sample();

        assert_eq!(
            engine.auto_explore((0, 0)),
            Outcome::NoChange(Ignored::NotRevealed)
        );
        engine.mark((0, 1));
        assert_eq!(
            engine.auto_explore((0, 1)),
            Outcome::NoChange(Ignored::NotRevealed)
        );
    }

    #[test]
    fn auto_explore_with_nothing_hidden_changes_nothing() {
        let mut engine = PlayEngine::new(layout((1, 5), &[(0, 2), (0, 4)]));
        engine.visit((0, 0));

        assert_eq!(engine.cell_at((0, 1)), EngineCell::Revealed(1));
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(
            engine.auto_explore((0, 0)),
            Outcome::NoChange(Ignored::NothingHidden)
        );
    }

    #[test]
    fn flood_never_reveals_mines_and_stops_at_numbers() {
        // 1 row of 5: mine at column 3
        let mut engine = PlayEngine::new(layout((1, 5), &[(0, 3)]));

        engine.visit((0, 0));

        assert_eq!(engine.cell_at((0, 0)), EngineCell::Revealed(0));
        assert_eq!(engine.cell_at((0, 1)), EngineCell::Revealed(0));
        assert_eq!(engine.cell_at((0, 2)), EngineCell::Revealed(1));
        assert_eq!(engine.cell_at((0, 3)), EngineCell::Hidden);
        assert_eq!(engine.cell_at((0, 4)), EngineCell::Hidden);
        assert_eq!(engine.state(), EngineState::Playing);
    }

    #[test]
    fn flood_skips_marked_cells() {
        let mut engine = PlayEngine::new(layout((2, 3), &[(1, 2)]));
        engine.mark((1, 2));

        engine.visit((0, 0));

        assert_eq!(engine.cell_at((1, 2)), EngineCell::Marked);
        assert_eq!(engine.cell_at((0, 2)), EngineCell::Hidden);
        assert_eq!(engine.visited_count(), 4);
        assert_counters(&engine);
    }

    #[test]
    fn large_open_board_floods_in_one_move() {
        let mut engine = PlayEngine::new(layout((300, 300), &[(299, 299)]));

        assert_eq!(engine.visit((0, 0)), Outcome::Won);
        assert_eq!(engine.visited_count(), 300 * 300 - 1);
    }

    #[test]
    fn board_without_mines_wins_on_first_visit() {
        let mut engine = PlayEngine::new(layout((2, 2), &[]));

        assert_eq!(engine.visit((1, 1)), Outcome::Won);
        assert_eq!(engine.summary().marked, 0);
    }

    #[test]
    fn apply_dispatches_on_move_kind() {
        let mut engine = sample();

        assert_eq!(engine.apply(Move::visit((2, 0))), Outcome::Revealed);
        assert_eq!(engine.apply(Move::mark((0, 1))), Outcome::Marked);
        assert_eq!(
            engine.apply(Move::auto_explore((1, 0))),
            Outcome::Revealed
        );
        assert_eq!(engine.cell_at((0, 0)), EngineCell::Revealed(1));
    }
}
