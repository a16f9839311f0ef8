//! The facility table and the cross-session frontier state.

use crate::errors::SaveError;
use crate::pokemon::PokemonInst;
use schema::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter)]
pub enum Facility {
    Tower,
    Palace,
    Factory,
    Arena,
    Dome,
    Pike,
    Pyramid,
    Hall,
    Castle,
    Arcade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleStyle {
    Single,
    Double,
    Multi,
}

/// Team rules checked when entrants are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamClause {
    /// No two entrants may share a species.
    Species,
    /// No two entrants may hold the same item. Empty hands never clash.
    Item,
}

impl TeamClause {
    /// True when `team` breaks this clause.
    pub fn violated_by(&self, team: &[&PokemonInst]) -> bool {
        team.iter().enumerate().any(|(i, a)| {
            team[i + 1..].iter().any(|b| match self {
                TeamClause::Species => a.species == b.species,
                TeamClause::Item => a.held_item.is_some() && a.held_item == b.held_item,
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolTier {
    Silver,
    Gold,
}

impl BattleStyle {
    pub fn label(&self) -> &'static str {
        match self {
            BattleStyle::Single => "Single Battle",
            BattleStyle::Double => "Double Battle",
            BattleStyle::Multi => "Multi Battle",
        }
    }
}

impl SymbolTier {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolTier::Silver => "Silver",
            SymbolTier::Gold => "Gold",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Facility {
    pub fn name(&self) -> &'static str {
        match self {
            Facility::Tower => "Battle Tower",
            Facility::Palace => "Battle Palace",
            Facility::Factory => "Battle Factory",
            Facility::Arena => "Battle Arena",
            Facility::Dome => "Battle Dome",
            Facility::Pike => "Battle Pike",
            Facility::Pyramid => "Battle Pyramid",
            Facility::Hall => "Battle Hall",
            Facility::Castle => "Battle Castle",
            Facility::Arcade => "Battle Arcade",
        }
    }

    /// Short lowercase key used for log targets and summaries.
    pub fn key(&self) -> &'static str {
        match self {
            Facility::Tower => "tower",
            Facility::Palace => "palace",
            Facility::Factory => "factory",
            Facility::Arena => "arena",
            Facility::Dome => "dome",
            Facility::Pike => "pike",
            Facility::Pyramid => "pyramid",
            Facility::Hall => "hall",
            Facility::Castle => "castle",
            Facility::Arcade => "arcade",
        }
    }

    pub fn brain_name(&self) -> &'static str {
        match self {
            Facility::Tower => "Anabel",
            Facility::Palace => "Spenser",
            Facility::Factory => "Noland",
            Facility::Arena => "Greta",
            Facility::Dome => "Tucker",
            Facility::Pike => "Lucy",
            Facility::Pyramid => "Brandon",
            Facility::Hall => "Argenta",
            Facility::Castle => "Darach",
            Facility::Arcade => "Dahlia",
        }
    }

    pub fn brain_title(&self) -> &'static str {
        match self {
            Facility::Tower => "Salon Maiden",
            Facility::Palace => "Palace Maven",
            Facility::Factory => "Factory Head",
            Facility::Arena => "Arena Tycoon",
            Facility::Dome => "Dome Ace",
            Facility::Pike => "Pike Queen",
            Facility::Pyramid => "Pyramid King",
            Facility::Hall => "Hall Matron",
            Facility::Castle => "Castle Valet",
            Facility::Arcade => "Arcade Star",
        }
    }

    /// Streak counts at which the Frontier Brain appears (silver, gold).
    pub fn brain_streaks(&self) -> [u32; 2] {
        match self {
            Facility::Tower => [21, 49],
            Facility::Palace => [21, 42],
            Facility::Factory => [21, 49],
            Facility::Arena => [27, 56],
            Facility::Dome => [5, 10],
            Facility::Pike => [28, 140],
            Facility::Pyramid => [21, 70],
            Facility::Hall => [7, 21],
            Facility::Castle => [10, 30],
            Facility::Arcade => [7, 21],
        }
    }

    pub fn battle_styles(&self) -> &'static [BattleStyle] {
        match self {
            Facility::Tower => &[BattleStyle::Single, BattleStyle::Double, BattleStyle::Multi],
            Facility::Dome => &[BattleStyle::Double],
            Facility::Factory => &[BattleStyle::Single, BattleStyle::Double],
            Facility::Palace
            | Facility::Arena
            | Facility::Pike
            | Facility::Pyramid
            | Facility::Hall
            | Facility::Castle
            | Facility::Arcade => &[BattleStyle::Single],
        }
    }

    /// Factory teams are rentals, so no clause applies to them.
    pub fn team_clauses(&self) -> &'static [TeamClause] {
        match self {
            Facility::Factory => &[],
            Facility::Tower
            | Facility::Palace
            | Facility::Arena
            | Facility::Dome
            | Facility::Pike
            | Facility::Pyramid
            | Facility::Hall
            | Facility::Castle
            | Facility::Arcade => &[TeamClause::Species, TeamClause::Item],
        }
    }

    /// The Brain's three Pokemon, all fought at the session's baseline level.
    pub fn brain_roster(&self) -> [&'static str; 3] {
        match self {
            Facility::Tower => ["Alakazam", "Snorlax", "Entei"],
            Facility::Palace => ["Arcanine", "Slaking", "Lapras"],
            Facility::Factory => ["Articuno", "Aggron", "Walrein"],
            Facility::Arena => ["Heracross", "Umbreon", "Shedinja"],
            Facility::Dome => ["Swampert", "Metagross", "Charizard"],
            Facility::Pike => ["Seviper", "Milotic", "Shuckle"],
            Facility::Pyramid => ["Regirock", "Regice", "Registeel"],
            Facility::Hall => ["Gardevoir", "Milotic", "Salamence"],
            Facility::Castle => ["Gallade", "Staraptor", "Lucario"],
            Facility::Arcade => ["Ludicolo", "Garchomp", "Dragonite"],
        }
    }

    /// Which symbol a Brain win at this streak earns: the highest threshold reached.
    pub fn symbol_for_streak(&self, streak: u32) -> Option<SymbolTier> {
        let [silver, gold] = self.brain_streaks();
        if streak >= gold {
            Some(SymbolTier::Gold)
        } else if streak >= silver {
            Some(SymbolTier::Silver)
        } else {
            None
        }
    }
}

/// Everything that outlives a single challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierState {
    pub battle_points: u32,
    pub streaks: BTreeMap<Facility, u32>,
    pub symbols: BTreeMap<Facility, BTreeSet<SymbolTier>>,
    pub last_hall_species: Option<String>,
    /// Lifetime Battle Hall wins, used for record milestones.
    pub hall_record: u32,
    pub claimed_hall_milestones: BTreeSet<u32>,
    /// Battle Hall rank per type, 1..=10. Missing entries are rank 1.
    pub hall_type_ranks: BTreeMap<PokemonType, u8>,
}

pub const HALL_MAX_RANK: u8 = 10;

impl FrontierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_points(&mut self, amount: u32) {
        self.battle_points = self.battle_points.saturating_add(amount);
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.battle_points >= cost
    }

    /// Deduct `amount` if affordable. Nothing changes otherwise.
    pub fn spend_points(&mut self, amount: u32) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.battle_points -= amount;
        true
    }

    pub fn award_symbol(&mut self, facility: Facility, tier: SymbolTier) -> bool {
        self.symbols.entry(facility).or_default().insert(tier)
    }

    pub fn has_symbol(&self, facility: Facility, tier: SymbolTier) -> bool {
        self.symbols
            .get(&facility)
            .is_some_and(|tiers| tiers.contains(&tier))
    }

    pub fn increment_streak(&mut self, facility: Facility) -> u32 {
        let streak = self.streaks.entry(facility).or_insert(0);
        *streak += 1;
        *streak
    }

    pub fn reset_streak(&mut self, facility: Facility) {
        self.streaks.insert(facility, 0);
    }

    pub fn streak(&self, facility: Facility) -> u32 {
        self.streaks.get(&facility).copied().unwrap_or(0)
    }

    /// True when the current streak sits exactly on a Brain threshold.
    pub fn can_face_brain(&self, facility: Facility) -> bool {
        facility.brain_streaks().contains(&self.streak(facility))
    }

    pub fn hall_rank(&self, pokemon_type: PokemonType) -> u8 {
        self.hall_type_ranks.get(&pokemon_type).copied().unwrap_or(1)
    }

    /// Raise a Hall type rank by one, stopping at 10. Returns the new rank.
    pub fn raise_hall_rank(&mut self, pokemon_type: PokemonType) -> u8 {
        let rank = (self.hall_rank(pokemon_type) + 1).min(HALL_MAX_RANK);
        self.hall_type_ranks.insert(pokemon_type, rank);
        rank
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        postcard::to_allocvec(self).map_err(|e| SaveError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        Ok(postcard::from_bytes(bytes)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| SaveError::Io(e.to_string()))
    }

    /// Load a saved state. A missing file yields a fresh state.
    pub fn load_from(path: &Path) -> Result<Self, SaveError> {
        match fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(SaveError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(Facility::Tower, 21, true)]
    #[case(Facility::Tower, 22, false)]
    #[case(Facility::Pike, 140, true)]
    #[case(Facility::Dome, 5, true)]
    #[case(Facility::Hall, 0, false)]
    fn test_can_face_brain(#[case] facility: Facility, #[case] streak: u32, #[case] expected: bool) {
        let mut state = FrontierState::new();
        for _ in 0..streak {
            state.increment_streak(facility);
        }
        assert_eq!(state.can_face_brain(facility), expected);
    }

    #[test]
    fn test_spend_points_requires_funds() {
        let mut state = FrontierState::new();
        state.add_points(10);
        assert!(!state.spend_points(11));
        assert_eq!(state.battle_points, 10);
        assert!(state.spend_points(4));
        assert_eq!(state.battle_points, 6);
    }

    #[test]
    fn test_symbols() {
        let mut state = FrontierState::new();
        assert!(state.award_symbol(Facility::Castle, SymbolTier::Silver));
        assert!(!state.award_symbol(Facility::Castle, SymbolTier::Silver));
        assert!(state.has_symbol(Facility::Castle, SymbolTier::Silver));
        assert!(!state.has_symbol(Facility::Castle, SymbolTier::Gold));
        assert_eq!(Facility::Arena.symbol_for_streak(56), Some(SymbolTier::Gold));
        assert_eq!(Facility::Arena.symbol_for_streak(30), Some(SymbolTier::Silver));
        assert_eq!(Facility::Arena.symbol_for_streak(26), None);
    }

    #[test]
    fn test_hall_rank_stops_at_ten() {
        let mut state = FrontierState::new();
        assert_eq!(state.hall_rank(PokemonType::Fire), 1);
        for _ in 0..12 {
            state.raise_hall_rank(PokemonType::Fire);
        }
        assert_eq!(state.hall_rank(PokemonType::Fire), HALL_MAX_RANK);
        assert_eq!(state.hall_rank(PokemonType::Water), 1);
    }

    #[test]
    fn test_postcard_round_trip() {
        let mut state = FrontierState::new();
        state.add_points(42);
        state.increment_streak(Facility::Pyramid);
        state.award_symbol(Facility::Hall, SymbolTier::Gold);
        state.last_hall_species = Some("Lucario".to_string());
        state.claimed_hall_milestones.insert(10);
        state.raise_hall_rank(PokemonType::Dragon);
        let bytes = state.to_bytes().expect("encode");
        assert_eq!(FrontierState::from_bytes(&bytes), Ok(state));
    }

    #[test]
    fn test_every_brain_roster_is_in_the_species_table() {
        for facility in Facility::iter() {
            for name in facility.brain_roster() {
                assert!(crate::species::get_species(name).is_ok(), "{} missing", name);
            }
        }
    }

    #[test]
    fn test_team_clauses() {
        let mut team: Vec<PokemonInst> = ["Pikachu", "Eevee", "Pikachu"]
            .iter()
            .map(|name| PokemonInst::from_name(name, 50).expect("species"))
            .collect();
        let refs: Vec<&PokemonInst> = team.iter().collect();
        assert!(TeamClause::Species.violated_by(&refs));
        assert!(!TeamClause::Item.violated_by(&refs));
        assert!(!TeamClause::Species.violated_by(&refs[..2]));

        team[0].held_item = Some(schema::Item::Leftovers);
        team[1].held_item = Some(schema::Item::Leftovers);
        let refs: Vec<&PokemonInst> = team.iter().collect();
        assert!(TeamClause::Item.violated_by(&refs[..2]));
        assert!(!TeamClause::Item.violated_by(&refs[1..]));
    }
}
