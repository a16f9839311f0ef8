use crate::PokemonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Poison,
    Paralysis,
    Sleep,
    Freeze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
}

/// Secondary effect attached to a move record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Inflict a status on the target with the given percent chance.
    Inflict(StatusKind, u8),
    RaiseOwn(Stat, i8),
    LowerTarget(Stat, i8),
    /// Restore a percentage of the user's max HP.
    Heal(u8),
    /// Restore a percentage of the damage dealt.
    Drain(u8),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    pub accuracy: u8,
    pub pp: u8,
    /// Protect-style moves count against a side's Mind rating in the Arena.
    #[serde(default)]
    pub protective: bool,
    #[serde(default)]
    pub effect: Option<MoveEffect>,
}

impl MoveRecord {
    pub fn is_offensive(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }
}
