use crate::errors::DataResult;
use crate::frontier::Facility;
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use crate::species::{get_species, SpeciesFilter, SpeciesPool};
use serde::{Deserialize, Serialize};

pub const MALE_NAMES: [&str; 20] = [
    "Alex", "Brandon", "Cameron", "Daniel", "Ethan", "Felix", "Gregory", "Henry", "Isaac", "James",
    "Keith", "Lucas", "Marcus", "Nathan", "Owen", "Paul", "Quinn", "Ryan", "Scott", "Tyler",
];

pub const FEMALE_NAMES: [&str; 20] = [
    "Alice", "Beth", "Claire", "Diana", "Emma", "Fiona", "Grace", "Hannah", "Iris", "Julia",
    "Karen", "Lisa", "Maria", "Nina", "Olivia", "Penny", "Quinn", "Rachel", "Sarah", "Tara",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerClass {
    CooltrainerM,
    CooltrainerF,
    Scientist,
    Blackbelt,
    TypeExpert,
    FrontierBrain,
    /// A lone wild Pokemon wrapped as an opponent.
    Wild,
}

impl TrainerClass {
    pub fn title(&self) -> &'static str {
        match self {
            TrainerClass::CooltrainerM | TrainerClass::CooltrainerF => "Cooltrainer",
            TrainerClass::Scientist => "Scientist",
            TrainerClass::Blackbelt => "Black Belt",
            TrainerClass::TypeExpert => "Expert",
            TrainerClass::FrontierBrain => "Frontier Brain",
            TrainerClass::Wild => "Wild",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub name: String,
    pub class: TrainerClass,
    pub party: Vec<PokemonInst>,
}

impl Trainer {
    pub fn new(name: impl Into<String>, class: TrainerClass, party: Vec<PokemonInst>) -> Self {
        Trainer {
            name: name.into(),
            class,
            party,
        }
    }

    pub fn display_name(&self) -> String {
        match self.class {
            TrainerClass::TypeExpert | TrainerClass::FrontierBrain => self.name.clone(),
            _ => format!("{} {}", self.class.title(), self.name),
        }
    }

    pub fn heal_party(&mut self) {
        for pokemon in &mut self.party {
            pokemon.heal();
        }
    }
}

/// Builds opponent rosters at a target level.
pub struct RosterGenerator;

impl RosterGenerator {
    /// `size` Pokemon drawn through `filter` at `level`, each with four random moves.
    /// Falls back to the whole registry when the filter matches nothing.
    pub fn party(
        rng: &mut FrontierRng,
        level: u8,
        size: usize,
        filter: &SpeciesFilter,
    ) -> Vec<PokemonInst> {
        let pool = SpeciesPool::global();
        (0..size)
            .filter_map(|_| {
                pool.sample(rng, filter)
                    .or_else(|| pool.sample(rng, &SpeciesFilter::any()))
                    .map(|species| PokemonInst::rental(species, level, rng))
            })
            .collect()
    }

    pub fn trainer(
        rng: &mut FrontierRng,
        class: TrainerClass,
        name: impl Into<String>,
        level: u8,
        size: usize,
        filter: &SpeciesFilter,
    ) -> Trainer {
        let party = Self::party(rng, level, size, filter);
        Trainer::new(name, class, party)
    }

    /// A Cooltrainer of random gender, named from the matching pool.
    pub fn cooltrainer(rng: &mut FrontierRng, level: u8, size: usize) -> Trainer {
        let (class, names) = if rng.coin_flip("trainer gender") {
            (TrainerClass::CooltrainerM, &MALE_NAMES)
        } else {
            (TrainerClass::CooltrainerF, &FEMALE_NAMES)
        };
        let name = rng.choose("trainer name", names).copied().unwrap_or("Quinn");
        Self::trainer(rng, class, name, level, size, &SpeciesFilter::any())
    }

    /// Frontier Brain for `facility` with the signature roster at `level`.
    pub fn brain(facility: Facility, level: u8) -> DataResult<Trainer> {
        let party = facility
            .brain_roster()
            .iter()
            .map(|name| PokemonInst::from_name(name, level))
            .collect::<DataResult<Vec<_>>>()?;
        Ok(Trainer::new(
            facility.brain_name(),
            TrainerClass::FrontierBrain,
            party,
        ))
    }

    /// Single named species at `level`, used when a room or floor spawns one Pokemon.
    pub fn wild(rng: &mut FrontierRng, level: u8) -> Option<PokemonInst> {
        SpeciesPool::global()
            .sample(rng, &SpeciesFilter::any())
            .map(|species| PokemonInst::rental(species, level, rng))
    }

    pub fn named(species: &str, level: u8, rng: &mut FrontierRng) -> DataResult<PokemonInst> {
        let record = get_species(species)?;
        Ok(PokemonInst::rental(record, level, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::PokemonType;

    #[test]
    fn test_cooltrainer_roster() {
        let mut rng = FrontierRng::from_seed(5);
        let trainer = RosterGenerator::cooltrainer(&mut rng, 57, 3);
        assert_eq!(trainer.party.len(), 3);
        assert!(trainer.party.iter().all(|p| p.level == 57));
        let pool: &[&str] = match trainer.class {
            TrainerClass::CooltrainerM => &MALE_NAMES,
            _ => &FEMALE_NAMES,
        };
        assert!(pool.contains(&trainer.name.as_str()));
    }

    #[test]
    fn test_filtered_roster_uses_type() {
        let mut rng = FrontierRng::from_seed(9);
        let trainer = RosterGenerator::trainer(
            &mut rng,
            TrainerClass::TypeExpert,
            "Ice-type Expert",
            40,
            1,
            &SpeciesFilter::of_type(PokemonType::Ice),
        );
        assert!(trainer.party[0].types.contains(&PokemonType::Ice));
        assert_eq!(trainer.display_name(), "Ice-type Expert");
    }

    #[test]
    fn test_brain_roster() {
        let brain = RosterGenerator::brain(Facility::Pyramid, 62).expect("brain");
        let names: Vec<&str> = brain.party.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Regirock", "Regice", "Registeel"]);
        assert!(brain.party.iter().all(|p| p.level == 62));
        assert_eq!(brain.display_name(), "Brandon");
    }
}
