//! Species registry and the weighted selection primitive every facility
//! draws its opponents through.

use crate::errors::{DataError, DataResult};
use crate::rng::FrontierRng;
use schema::{PokemonType, SpeciesRecord};
use std::collections::HashMap;
use std::sync::LazyLock;

const SPECIES_RON: &str = include_str!("../data/species.ron");

struct SpeciesRegistry {
    records: Vec<SpeciesRecord>,
    by_name: HashMap<String, usize>,
}

static SPECIES: LazyLock<SpeciesRegistry> = LazyLock::new(|| {
    let records = match parse_species(SPECIES_RON) {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(target: "frontier.data", %err, "species table failed to load");
            Vec::new()
        }
    };
    let by_name = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name.to_lowercase(), i))
        .collect();
    SpeciesRegistry { records, by_name }
});

fn parse_species(source: &str) -> DataResult<Vec<SpeciesRecord>> {
    ron::from_str(source).map_err(|e| DataError::MalformedData(e.to_string()))
}

/// Look up a species by name, ignoring case.
pub fn get_species(name: &str) -> DataResult<&'static SpeciesRecord> {
    SPECIES
        .by_name
        .get(&name.to_lowercase())
        .map(|&i| &SPECIES.records[i])
        .ok_or_else(|| DataError::SpeciesNotFound(name.to_string()))
}

pub fn all_species() -> &'static [SpeciesRecord] {
    &SPECIES.records
}

/// Restricts which species a draw may return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesFilter {
    /// A record qualifies when it has at least one of these types.
    pub types: Option<Vec<PokemonType>>,
    pub min_bst: Option<u16>,
    pub max_bst: Option<u16>,
}

impl SpeciesFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of_type(pokemon_type: PokemonType) -> Self {
        Self {
            types: Some(vec![pokemon_type]),
            ..Self::default()
        }
    }

    pub fn with_bst(mut self, min_bst: Option<u16>, max_bst: Option<u16>) -> Self {
        self.min_bst = min_bst;
        self.max_bst = max_bst;
        self
    }

    pub fn matches(&self, record: &SpeciesRecord) -> bool {
        if let Some(types) = &self.types {
            if !types.iter().any(|&t| record.has_type(t)) {
                return false;
            }
        }
        let bst = record.bst();
        if self.min_bst.is_some_and(|min| bst < min) {
            return false;
        }
        if self.max_bst.is_some_and(|max| bst > max) {
            return false;
        }
        true
    }
}

/// Weighted draws over a set of species records.
pub struct SpeciesPool<'a> {
    records: &'a [SpeciesRecord],
}

impl SpeciesPool<'static> {
    /// Pool over the whole compiled-in registry.
    pub fn global() -> Self {
        Self {
            records: all_species(),
        }
    }
}

impl<'a> SpeciesPool<'a> {
    pub fn new(records: &'a [SpeciesRecord]) -> Self {
        Self { records }
    }

    pub fn candidates(&self, filter: &SpeciesFilter) -> Vec<&'a SpeciesRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Pick one record satisfying `filter`, with probability proportional to
    /// `weight(record)`. Returns `None` when nothing qualifies.
    pub fn sample_weighted<W>(
        &self,
        rng: &mut FrontierRng,
        filter: &SpeciesFilter,
        weight: W,
    ) -> Option<&'a SpeciesRecord>
    where
        W: Fn(&SpeciesRecord) -> u32,
    {
        let candidates = self.candidates(filter);
        let weights: Vec<u32> = candidates.iter().map(|r| weight(r)).collect();
        let index = rng.weighted_index("species draw", &weights)?;
        candidates.get(index).copied()
    }

    /// Uniform draw among records satisfying `filter`.
    pub fn sample(&self, rng: &mut FrontierRng, filter: &SpeciesFilter) -> Option<&'a SpeciesRecord> {
        self.sample_weighted(rng, filter, |_| 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[test]
    fn test_registry_loads_every_record() {
        assert!(all_species().len() > 100);
        assert_eq!(get_species("garchomp").map(|r| r.name.as_str()), Ok("Garchomp"));
        assert_eq!(
            get_species("Missingno").err(),
            Some(DataError::SpeciesNotFound("Missingno".to_string()))
        );
    }

    #[test]
    fn test_every_species_move_is_known() {
        for record in all_species() {
            assert!(record.moves.len() >= 4, "{} has too few moves", record.name);
            for move_name in &record.moves {
                assert!(
                    crate::moves::get_move(move_name).is_ok(),
                    "{} lists unknown move {}",
                    record.name,
                    move_name
                );
            }
        }
    }

    #[test]
    fn test_every_type_is_represented() {
        for pokemon_type in PokemonType::iter() {
            let filter = SpeciesFilter::of_type(pokemon_type);
            assert!(!SpeciesPool::global().candidates(&filter).is_empty());
        }
    }

    #[rstest]
    #[case(Some(500), None)]
    #[case(None, Some(339))]
    #[case(Some(440), Some(499))]
    fn test_sample_respects_bst_window(#[case] min: Option<u16>, #[case] max: Option<u16>) {
        let filter = SpeciesFilter::any().with_bst(min, max);
        let mut rng = FrontierRng::from_seed(7);
        for _ in 0..25 {
            let record = SpeciesPool::global().sample(&mut rng, &filter);
            let bst = record.map(|r| r.bst()).unwrap_or_default();
            assert!(min.map_or(true, |m| bst >= m));
            assert!(max.map_or(true, |m| bst <= m));
        }
    }

    #[test]
    fn test_sample_returns_none_when_nothing_matches() {
        let filter = SpeciesFilter::of_type(PokemonType::Fairy).with_bst(Some(700), None);
        let mut rng = FrontierRng::new_for_test(vec![0]);
        assert!(SpeciesPool::global().sample(&mut rng, &filter).is_none());
    }

    #[test]
    fn test_weights_exclude_zero_weight_records() {
        let filter = SpeciesFilter::of_type(PokemonType::Dragon);
        let mut rng = FrontierRng::from_seed(3);
        for _ in 0..20 {
            let record = SpeciesPool::global()
                .sample_weighted(&mut rng, &filter, |r| if r.name == "Dratini" { 1 } else { 0 });
            assert_eq!(record.map(|r| r.name.as_str()), Some("Dratini"));
        }
    }
}
