use crate::PokemonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    /// Base stat total, used to group species into strength tiers.
    pub fn total(&self) -> u16 {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
        .iter()
        .map(|&s| s as u16)
        .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    /// Moves this species can be handed when it is generated as an opponent or rental.
    pub moves: Vec<String>,
}

impl SpeciesRecord {
    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    pub fn bst(&self) -> u16 {
        self.base_stats.total()
    }
}
