use crate::battle::events::FrontierEvent;
use crate::frontier::BattleStyle;
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use crate::trainer::Trainer;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Win,
    Loss,
    Draw,
    /// The turn limit ran out with both sides still standing.
    Undecided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRules {
    pub style: BattleStyle,
    pub turn_limit: Option<u32>,
    /// Sides may withdraw a walled Pokemon for a benched one.
    pub allow_switching: bool,
    pub weather: Option<Weather>,
    /// Pokemon pick their own moves (Battle Palace).
    pub auto_commands: bool,
}

impl Default for BattleRules {
    fn default() -> Self {
        BattleRules {
            style: BattleStyle::Single,
            turn_limit: None,
            allow_switching: true,
            weather: None,
            auto_commands: false,
        }
    }
}

impl BattleRules {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: BattleStyle) -> Self {
        self.style = style;
        self
    }

    /// Battle Arena bouts: three turns, no switching.
    pub fn arena_bout() -> Self {
        BattleRules {
            turn_limit: Some(3),
            allow_switching: false,
            ..Self::default()
        }
    }

    pub fn palace() -> Self {
        BattleRules {
            auto_commands: true,
            ..Self::default()
        }
    }
}

/// What a battle produced, from the player's side. Index 0 is the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub turns: u32,
    pub damage_dealt: [u32; 2],
    pub offensive_moves_used: [u32; 2],
    pub events: Vec<FrontierEvent>,
}

impl BattleReport {
    pub fn new(outcome: BattleOutcome) -> Self {
        BattleReport {
            outcome,
            turns: 0,
            damage_dealt: [0, 0],
            offensive_moves_used: [0, 0],
            events: Vec::new(),
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome == BattleOutcome::Win
    }
}

/// The battle primitive every facility drives.
pub trait BattleEngine {
    fn run_battle(
        &mut self,
        party: &mut [PokemonInst],
        opponent: &mut Trainer,
        rules: &BattleRules,
        rng: &mut FrontierRng,
    ) -> BattleReport;
}

/// A battle the scripted engine was asked to fight.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBattle {
    pub opponent: String,
    pub opponent_species: Vec<String>,
    pub opponent_levels: Vec<u8>,
    pub party_species: Vec<String>,
    pub rules: BattleRules,
}

/// Replays queued reports in order, then wins, and records every battle it is given.
/// A win knocks out the opponent's party and a loss knocks out the player's.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    queue: VecDeque<BattleReport>,
    pub battles: Vec<RecordedBattle>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = BattleOutcome>) -> Self {
        let mut engine = Self::new();
        engine.queue.extend(outcomes.into_iter().map(BattleReport::new));
        engine
    }

    pub fn push_report(&mut self, report: BattleReport) {
        self.queue.push_back(report);
    }
}

impl BattleEngine for ScriptedEngine {
    fn run_battle(
        &mut self,
        party: &mut [PokemonInst],
        opponent: &mut Trainer,
        rules: &BattleRules,
        _rng: &mut FrontierRng,
    ) -> BattleReport {
        self.battles.push(RecordedBattle {
            opponent: opponent.name.clone(),
            opponent_species: opponent.party.iter().map(|p| p.species.clone()).collect(),
            opponent_levels: opponent.party.iter().map(|p| p.level).collect(),
            party_species: party.iter().map(|p| p.species.clone()).collect(),
            rules: rules.clone(),
        });

        let report = self
            .queue
            .pop_front()
            .unwrap_or_else(|| BattleReport::new(BattleOutcome::Win));
        match report.outcome {
            BattleOutcome::Win => {
                for pokemon in &mut opponent.party {
                    pokemon.current_hp = 0;
                }
            }
            BattleOutcome::Loss => {
                for pokemon in party.iter_mut() {
                    pokemon.current_hp = 0;
                }
            }
            BattleOutcome::Draw | BattleOutcome::Undecided => {}
        }
        report
    }
}
