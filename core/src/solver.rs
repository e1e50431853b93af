use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Mine,
    Safe,
}

/// A certain conclusion about `target`, drawn from the clue at `clue` alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub clue: Coord2,
    pub target: Coord2,
    pub verdict: Verdict,
}

impl Deduction {
    pub const fn to_move(self) -> Move {
        match self.verdict {
            Verdict::Mine => Move::mark(self.target),
            Verdict::Safe => Move::visit(self.target),
        }
    }
}

/// Which rule produced a move, in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Deduced,
    Explore,
    Fallback,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub mv: Move,
    pub tier: Tier,
}

/// Anything that can pick the next move from a knowledge snapshot.
pub trait Player {
    fn next_move(&mut self, model: &KnowledgeModel) -> Option<Decision>;
}

/// Two-tier single-clue deduction with row-major exploration as a fallback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InferenceSolver;

impl Player for InferenceSolver {
    fn next_move(&mut self, model: &KnowledgeModel) -> Option<Decision> {
        decide(model)
    }
}

/// Verdict for every unknown neighbor of `clue`, if the clue settles them.
fn verdict_at(model: &KnowledgeModel, clue: Coord2, number: u8) -> Option<Verdict> {
    let tally = model.tally(clue);
    if tally.unknown == 0 {
        None
    } else if number == tally.marked + tally.unknown {
        Some(Verdict::Mine)
    } else if number == tally.marked {
        Some(Verdict::Safe)
    } else {
        None
    }
}

/// The first deduction in scan order: clues row-major, mine rule before the
/// safe rule, then the first unknown neighbor in neighbor order.
pub fn deduce(model: &KnowledgeModel) -> Option<Deduction> {
    model.clues().find_map(|(clue, number)| {
        let verdict = verdict_at(model, clue, number)?;
        let target = *model.unknown_neighbors(clue).first()?;
        Some(Deduction {
            clue,
            target,
            verdict,
        })
    })
}

/// Every single-clue deduction, in the same order `deduce` would find them.
pub fn deductions(model: &KnowledgeModel) -> Vec<Deduction> {
    let mut found = Vec::new();
    for (clue, number) in model.clues() {
        let Some(verdict) = verdict_at(model, clue, number) else {
            continue;
        };
        found.extend(model.unknown_neighbors(clue).into_iter().map(|target| Deduction {
            clue,
            target,
            verdict,
        }));
    }
    found
}

/// Picks exactly one move, or `None` when the board offers nothing to do.
pub fn decide(model: &KnowledgeModel) -> Option<Decision> {
    let contradictions = model.contradictions();
    if !contradictions.is_empty() {
        log::warn!("snapshot has {} impossible clues", contradictions.len());
    }

    if let Some(deduction) = deduce(model) {
        log::trace!("deduced {:?}", deduction);
        return Some(Decision {
            mv: deduction.to_move(),
            tier: Tier::Deduced,
        });
    }

    if let Some(coords) = model.first_unknown() {
        log::trace!("exploring {:?}", coords);
        return Some(Decision {
            mv: Move::visit(coords),
            tier: Tier::Explore,
        });
    }

    let satisfied = model
        .clues()
        .find(|&(clue, number)| number > 0 && model.tally(clue).marked == number);
    if let Some((clue, _)) = satisfied {
        log::trace!("falling back to auto-explore at {:?}", clue);
        return Some(Decision {
            mv: Move::auto_explore(clue),
            tier: Tier::Fallback,
        });
    }

    log::debug!("no move available");
    None
}
