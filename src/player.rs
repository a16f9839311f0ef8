use crate::pokemon::PokemonInst;
use schema::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The human challenger: their party and their bag.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Player {
    pub name: String,
    pub party: Vec<PokemonInst>,
    pub bag: BTreeMap<Item, u32>,
}

impl Player {
    pub fn new(name: impl Into<String>, party: Vec<PokemonInst>) -> Self {
        Player {
            name: name.into(),
            party,
            bag: BTreeMap::new(),
        }
    }

    /// Floor of the average level of the first `count` party members.
    pub fn average_level(&self, count: usize) -> u32 {
        let members: Vec<u32> = self.party.iter().take(count).map(|p| p.level as u32).collect();
        if members.is_empty() {
            return 0;
        }
        members.iter().sum::<u32>() / members.len() as u32
    }

    /// True when at least `count` party members are at `min_level` or above.
    pub fn has_eligible(&self, count: usize, min_level: u8) -> bool {
        self.party.iter().filter(|p| p.level >= min_level).count() >= count
    }

    pub fn add_item(&mut self, item: Item, quantity: u32) {
        *self.bag.entry(item).or_insert(0) += quantity;
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.bag.get(&item).copied().unwrap_or(0)
    }

    /// Remove one of `item` from the bag. Returns false if there was none.
    pub fn take_item(&mut self, item: Item) -> bool {
        match self.bag.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.bag.remove(&item);
                }
                true
            }
            _ => false,
        }
    }

    /// Use a medicine from the bag on party member `member`. The item is
    /// only spent when it had an effect.
    pub fn use_medicine(&mut self, item: Item, member: usize) -> bool {
        if !item.is_medicine() || self.item_count(item) == 0 {
            return false;
        }
        let Some(pokemon) = self.party.get_mut(member) else {
            return false;
        };
        if !pokemon.use_medicine(item) {
            return false;
        }
        self.take_item(item)
    }

    /// Medicines in the bag, in bag order.
    pub fn medicines(&self) -> Vec<Item> {
        self.bag.keys().copied().filter(|item| item.is_medicine()).collect()
    }
}
