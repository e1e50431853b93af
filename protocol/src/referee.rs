use serde::Serialize;
use sweepduel_core::*;

use crate::{Result, *};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RefereeConfig {
    /// Cell visited before the player is consulted, as a host would dictate.
    pub opening: Option<Coord2>,
    /// Defaults to `2 * rows * columns + 1`.
    pub max_turns: Option<usize>,
    pub keep_transcript: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Finish {
    Won,
    Lost,
    /// The player had no move while the game was running.
    Stalled,
    TurnLimit,
}

/// One exchange: the board the player saw and the line it sent back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Turn {
    pub number: usize,
    pub board: String,
    pub command: String,
    /// `None` for the dictated opening.
    pub tier: Option<Tier>,
    pub outcome: Outcome,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub opening: usize,
    pub deduced: usize,
    pub explore: usize,
    pub fallback: usize,
}

impl TierCounts {
    fn record(&mut self, tier: Option<Tier>) {
        match tier {
            None => self.opening += 1,
            Some(Tier::Deduced) => self.deduced += 1,
            Some(Tier::Explore) => self.explore += 1,
            Some(Tier::Fallback) => self.fallback += 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameReport {
    pub finish: Finish,
    pub summary: Summary,
    pub total_mines: CellCount,
    pub turns: usize,
    pub tiers: TierCounts,
    pub final_board: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<Turn>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Played(Turn),
    Stalled,
    Finished,
}

/// Plays an engine against a player. Every turn crosses the text protocol in
/// both directions: the board is rendered and parsed back before the player
/// sees it, and the player's move is encoded and decoded before the engine
/// applies it.
#[derive(Debug)]
pub struct Referee<P> {
    engine: PlayEngine,
    player: P,
    config: RefereeConfig,
    turns: usize,
    tiers: TierCounts,
    transcript: Vec<Turn>,
}

impl<P: Player> Referee<P> {
    pub fn new(layout: MineLayout, player: P, config: RefereeConfig) -> Self {
        Self {
            engine: PlayEngine::new(layout),
            player,
            config,
            turns: 0,
            tiers: TierCounts::default(),
            transcript: Vec::new(),
        }
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    fn max_turns(&self) -> usize {
        self.config.max_turns.unwrap_or_else(|| {
            let (rows, columns) = self.engine.size();
            2 * usize::from(rows) * usize::from(columns) + 1
        })
    }

    pub fn step(&mut self) -> Result<Step> {
        if self.engine.is_finished() {
            return Ok(Step::Finished);
        }

        let board = render_board(&self.engine.disclose());

        let (mv, tier) = match self.config.opening.filter(|_| self.turns == 0) {
            Some(coords) => (Move::visit(coords), None),
            None => {
                let glyphs = parse_board(self.engine.size(), &board)?;
                let model = KnowledgeModel::from_glyphs(&glyphs)?;
                match self.player.next_move(&model) {
                    Some(decision) => (decision.mv, Some(decision.tier)),
                    None => return Ok(Step::Stalled),
                }
            }
        };

        let command = Command::from(mv).to_string();
        let outcome = match parse_command(&command)?.to_move() {
            Some(mv) => self.engine.apply(mv),
            None => Outcome::NoChange(Ignored::OutOfBounds),
        };

        self.turns += 1;
        self.tiers.record(tier);
        log::trace!("turn {}: {} ({:?}) -> {:?}", self.turns, command, tier, outcome);

        Ok(Step::Played(Turn {
            number: self.turns,
            board,
            command,
            tier,
            outcome,
        }))
    }

    pub fn run(mut self) -> Result<GameReport> {
        let max_turns = self.max_turns();

        let finish = loop {
            if self.turns >= max_turns && !self.engine.is_finished() {
                log::warn!("stopping after {} turns", self.turns);
                break Finish::TurnLimit;
            }

            match self.step()? {
                Step::Played(turn) => {
                    if self.config.keep_transcript {
                        self.transcript.push(turn);
                    }
                }
                Step::Stalled => break Finish::Stalled,
                Step::Finished => {
                    break match self.engine.state() {
                        EngineState::Won => Finish::Won,
                        _ => Finish::Lost,
                    };
                }
            }
        };

        log::debug!("game finished after {} turns: {:?}", self.turns, finish);

        Ok(GameReport {
            finish,
            summary: self.engine.summary(),
            total_mines: self.engine.total_mines(),
            turns: self.turns,
            tiers: self.tiers,
            final_board: render_board(&self.engine.disclose()),
            transcript: self.transcript,
        })
    }
}
