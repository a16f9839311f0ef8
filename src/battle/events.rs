use crate::battle::engine::{BattleOutcome, Weather};
use crate::pokemon::StatusCondition;
use schema::{Item, Stat};
use serde::{Deserialize, Serialize};

/// Something that happened during an automatic battle. Side 0 is the player.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum FrontierEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnLimitReached {
        turns: u32,
    },

    // Pokemon Actions
    PokemonSentOut {
        side: usize,
        pokemon: String,
    },
    PokemonWithdrawn {
        side: usize,
        pokemon: String,
    },
    MoveUsed {
        side: usize,
        pokemon: String,
        move_used: String,
    },
    MoveMissed {
        attacker: String,
    },
    MoveBlocked {
        defender: String,
    },
    CriticalHit,
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        target: String,
        amount: u16,
    },
    PokemonFainted {
        side: usize,
        pokemon: String,
    },
    HungOn {
        pokemon: String,
        item: Item,
    },

    // Status Effects
    StatusApplied {
        target: String,
        status: StatusCondition,
    },
    StatusCured {
        target: String,
    },
    StatusDamage {
        target: String,
        status: StatusCondition,
        damage: u16,
    },
    CannotMove {
        pokemon: String,
        status: StatusCondition,
    },

    // Field and items
    WeatherDamage {
        target: String,
        weather: Weather,
        damage: u16,
    },
    ItemActivated {
        pokemon: String,
        item: Item,
    },
    StatStageChanged {
        target: String,
        stat: Stat,
        delta: i8,
    },

    // Battle End
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl FrontierEvent {
    /// Formats the event into narration. `names` holds the two trainers' names.
    /// Returns None for silent events.
    pub fn format(&self, names: &[String; 2]) -> Option<String> {
        match self {
            FrontierEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),
            FrontierEvent::TurnLimitReached { turns } => {
                Some(format!("The battle reached its {}-turn limit!", turns))
            }
            FrontierEvent::PokemonSentOut { side, pokemon } => {
                Some(format!("{} sent out {}!", names[*side], pokemon))
            }
            FrontierEvent::PokemonWithdrawn { side, pokemon } => {
                Some(format!("{} withdrew {}!", names[*side], pokemon))
            }
            FrontierEvent::MoveUsed { side, pokemon, move_used } => {
                Some(format!("{}'s {} used {}!", names[*side], pokemon, move_used))
            }
            FrontierEvent::MoveMissed { attacker } => Some(format!("{}'s attack missed!", attacker)),
            FrontierEvent::MoveBlocked { defender } => Some(format!("{} protected itself!", defender)),
            FrontierEvent::CriticalHit => Some("A critical hit!".to_string()),
            FrontierEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },
            FrontierEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            FrontierEvent::PokemonHealed { target, amount } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            FrontierEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),
            FrontierEvent::HungOn { pokemon, item } => {
                Some(format!("{} hung on using its {}!", pokemon, item))
            }
            FrontierEvent::StatusApplied { target, status } => {
                Some(format!("{} is {}!", target, status.name()))
            }
            FrontierEvent::StatusCured { target } => Some(format!("{} was cured!", target)),
            FrontierEvent::StatusDamage { target, status, damage } => Some(format!(
                "{} is hurt because it is {}! ({} damage)",
                target,
                status.name(),
                damage
            )),
            FrontierEvent::CannotMove { pokemon, status } => {
                Some(format!("{} can't move because it is {}!", pokemon, status.name()))
            }
            FrontierEvent::WeatherDamage { target, weather, damage } => {
                let source = match weather {
                    Weather::Sandstorm => "the sandstorm",
                    Weather::Hail => "the hail",
                    Weather::Sun | Weather::Rain => return None,
                };
                Some(format!("{} is buffeted by {}! ({} damage)", target, source, damage))
            }
            FrontierEvent::ItemActivated { pokemon, item } => {
                Some(format!("{}'s {} activated!", pokemon, item))
            }
            FrontierEvent::StatStageChanged { target, stat, delta } => {
                let stat_name = format_stat(*stat);
                match *delta {
                    0 => Some(format!("{}'s {} won't go any further!", target, stat_name)),
                    d if d > 0 => Some(format!("{}'s {} rose!", target, stat_name)),
                    _ => Some(format!("{}'s {} fell!", target, stat_name)),
                }
            }
            FrontierEvent::BattleEnded { outcome } => match outcome {
                BattleOutcome::Win => Some(format!("{} has won the battle!", names[0])),
                BattleOutcome::Loss => Some(format!("{} has won the battle!", names[1])),
                BattleOutcome::Draw => Some("The battle ended in a draw!".to_string()),
                BattleOutcome::Undecided => None,
            },
        }
    }
}

fn format_stat(stat: Stat) -> &'static str {
    match stat {
        Stat::Attack => "Attack",
        Stat::Defense => "Defense",
        Stat::SpAttack => "Sp. Atk",
        Stat::SpDefense => "Sp. Def",
        Stat::Speed => "Speed",
    }
}

#[derive(Debug, Default, Clone)]
pub struct EventBus {
    events: Vec<FrontierEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: FrontierEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[FrontierEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<FrontierEvent> {
        self.events
    }

    /// All non-silent events rendered as narration lines.
    pub fn format_all(events: &[FrontierEvent], names: &[String; 2]) -> Vec<String> {
        events.iter().filter_map(|e| e.format(names)).collect()
    }
}
