use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// What the solver side knows about one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownCell {
    Unknown,
    Number(u8),
    MarkedByMe,
    Exploded,
}

impl Default for KnownCell {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<Glyph> for KnownCell {
    fn from(glyph: Glyph) -> Self {
        match glyph {
            Glyph::Unknown => Self::Unknown,
            Glyph::Number(n) => Self::Number(n),
            Glyph::Marked => Self::MarkedByMe,
            Glyph::Exploded => Self::Exploded,
        }
    }
}

/// Marked and unknown neighbor counts around a clue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborTally {
    pub marked: u8,
    pub unknown: u8,
}

/// A clue that no assignment of the unknown neighbors can satisfy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub clue: Coord2,
    pub number: u8,
    pub tally: NeighborTally,
}

/// Solver-side mirror of a single disclosed snapshot. It is rebuilt from
/// scratch for every turn and never remembers an earlier snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeModel {
    cells: Array2<KnownCell>,
}

impl KnowledgeModel {
    pub fn from_glyphs(glyphs: &Array2<Glyph>) -> Result<Self> {
        let (rows, columns) = glyphs.dim();
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if Coord::try_from(rows).is_err() || Coord::try_from(columns).is_err() {
            return Err(GameError::InvalidDimensions);
        }

        Ok(Self {
            cells: glyphs.map(|&glyph| KnownCell::from(glyph)),
        })
    }

    /// A board where nothing has been disclosed yet.
    pub fn unknown(size: Coord2) -> Result<Self> {
        Self::from_glyphs(&Array2::default(size.to_nd_index()))
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.cells)
    }

    pub fn cell_at(&self, coords: Coord2) -> KnownCell {
        self.cells[coords.to_nd_index()]
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Unknown neighbors in neighbor order.
    pub fn unknown_neighbors(&self, coords: Coord2) -> SmallVec<[Coord2; 8]> {
        self.cells
            .iter_neighbor_cells_with_index(coords)
            .filter(|&(_, cell)| cell == KnownCell::Unknown)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn tally(&self, coords: Coord2) -> NeighborTally {
        let mut tally = NeighborTally::default();
        for cell in self.cells.iter_neighbor_cells(coords) {
            match cell {
                KnownCell::MarkedByMe => tally.marked += 1,
                KnownCell::Unknown => tally.unknown += 1,
                KnownCell::Number(_) | KnownCell::Exploded => {}
            }
        }
        tally
    }

    pub fn unknown_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| cell == KnownCell::Unknown)
            .count() as CellCount
    }

    /// True for the last board of a game: a cell exploded, or nothing is left
    /// to reveal. A running game always shows at least one unknown cell.
    pub fn is_final(&self) -> bool {
        self.unknown_count() == 0 || self.cells.iter().any(|&cell| cell == KnownCell::Exploded)
    }

    /// Numbered cells in row-major order.
    pub fn clues(&self) -> impl Iterator<Item = (Coord2, u8)> + '_ {
        iter_coords(self.size()).filter_map(|coords| match self.cell_at(coords) {
            KnownCell::Number(n) => Some((coords, n)),
            _ => None,
        })
    }

    pub fn first_unknown(&self) -> Option<Coord2> {
        iter_coords(self.size()).find(|&coords| self.cell_at(coords) == KnownCell::Unknown)
    }

    /// Clues whose number lies outside `marked..=marked + unknown`.
    pub fn contradictions(&self) -> Vec<Contradiction> {
        self.clues()
            .filter_map(|(clue, number)| {
                let tally = self.tally(clue);
                let possible = tally.marked..=tally.marked + tally.unknown;
                (!possible.contains(&number)).then_some(Contradiction {
                    clue,
                    number,
                    tally,
                })
            })
            .collect()
    }
}
