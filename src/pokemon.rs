use crate::errors::DataResult;
use crate::moves::{get_move, max_pp};
use crate::rng::FrontierRng;
use crate::species::get_species;
use schema::{BaseStats, Item, PokemonType, SpeciesRecord, Stat, StatusKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    /// Turns of sleep remaining.
    Sleep(u8),
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

impl StatusCondition {
    pub fn from_kind(kind: StatusKind, sleep_turns: u8) -> Self {
        match kind {
            StatusKind::Burn => StatusCondition::Burn,
            StatusKind::Poison => StatusCondition::Poison,
            StatusKind::Paralysis => StatusCondition::Paralysis,
            StatusKind::Sleep => StatusCondition::Sleep(sleep_turns.max(1)),
            StatusKind::Freeze => StatusCondition::Freeze,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusCondition::Sleep(_) => "asleep",
            StatusCondition::Poison => "poisoned",
            StatusCondition::Burn => "burned",
            StatusCondition::Freeze => "frozen",
            StatusCondition::Paralysis => "paralyzed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    /// Create a new move slot with max PP
    pub fn new(name: &str) -> Self {
        let max_pp = max_pp(name);
        MoveSlot {
            name: name.to_string(),
            pp: max_pp,
            max_pp,
        }
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_pp(&mut self, amount: u8) {
        self.pp = self.pp.saturating_add(amount).min(self.max_pp);
    }

    pub fn pp_used(&self) -> u32 {
        (self.max_pp - self.pp.min(self.max_pp)) as u32
    }
}

pub const STAT_STAGE_LIMIT: i8 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub species: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub ivs: [u8; 6],                    // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u8; 6],                    // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub curr_stats: [u16; 6],            // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub current_hp: u16,
    pub moves: Vec<MoveSlot>,            // Up to 4 moves
    pub status: Option<StatusCondition>,
    /// Attack, Defense, Sp. Atk, Sp. Def, Speed stages in -6..=6.
    pub stat_stages: [i8; 5],
    pub held_item: Option<Item>,
    /// Replaces the species typing until the next heal.
    pub type_override: Option<Vec<PokemonType>>,
}

impl PokemonInst {
    /// Create a new Pokemon instance from species data at full HP and PP.
    /// Without explicit moves the first four from the species list are used.
    pub fn new(
        species: &SpeciesRecord,
        level: u8,
        ivs: Option<[u8; 6]>,
        moves: Option<Vec<String>>,
    ) -> Self {
        let level = level.clamp(1, 100);
        let ivs = ivs.unwrap_or([31; 6]);
        let evs = [0; 6];
        let curr_stats = Self::calculate_stats(&species.base_stats, level, &ivs, &evs);

        let move_names = moves.unwrap_or_else(|| species.moves.iter().take(4).cloned().collect());
        let moves = move_names.iter().take(4).map(|m| MoveSlot::new(m)).collect();

        PokemonInst {
            species: species.name.clone(),
            level,
            types: species.types.clone(),
            base_stats: species.base_stats,
            ivs,
            evs,
            curr_stats,
            current_hp: curr_stats[0],
            moves,
            status: None,
            stat_stages: [0; 5],
            held_item: None,
            type_override: None,
        }
    }

    /// Build a Pokemon by species name with its default moveset.
    pub fn from_name(name: &str, level: u8) -> DataResult<Self> {
        let species = get_species(name)?;
        Ok(Self::new(species, level, None, None))
    }

    /// Rental-style Pokemon: four distinct moves drawn from the species list.
    pub fn rental(species: &SpeciesRecord, level: u8, rng: &mut FrontierRng) -> Self {
        let moves = Self::random_moves(species, rng);
        Self::new(species, level, None, Some(moves))
    }

    /// Four distinct moves picked at random from the species move list.
    pub fn random_moves(species: &SpeciesRecord, rng: &mut FrontierRng) -> Vec<String> {
        let mut pool = species.moves.clone();
        rng.shuffle("rental moves", &mut pool);
        pool.truncate(4);
        pool
    }

    /// Calculate current stats based on base stats, level, IVs, and EVs
    /// Uses Gen 3+ stat calculation formula without natures
    fn calculate_stats(base_stats: &BaseStats, level: u8, ivs: &[u8; 6], evs: &[u8; 6]) -> [u16; 6] {
        let base = [
            base_stats.hp,
            base_stats.attack,
            base_stats.defense,
            base_stats.sp_attack,
            base_stats.sp_defense,
            base_stats.speed,
        ];
        let level = level as u32;

        let mut stats = [0u16; 6];
        for i in 0..6 {
            let base_calculation = 2 * base[i] as u32 + ivs[i] as u32 + (evs[i] as u32 / 4);
            let stat = if i == 0 {
                // A base HP of 1 always means exactly 1 HP
                if base[i] == 1 {
                    1
                } else {
                    (base_calculation * level) / 100 + level + 10
                }
            } else {
                (base_calculation * level) / 100 + 5
            };
            stats[i] = stat.min(u16::MAX as u32) as u16;
        }
        stats
    }

    pub fn name(&self) -> &str {
        &self.species
    }

    pub fn max_hp(&self) -> u16 {
        self.curr_stats[0]
    }

    /// Change level and recompute stats, keeping the current HP ratio.
    pub fn set_level(&mut self, level: u8) {
        let level = level.clamp(1, 100);
        let old_max = self.max_hp().max(1) as u32;
        let old_hp = self.current_hp as u32;
        self.level = level;
        self.curr_stats = Self::calculate_stats(&self.base_stats, level, &self.ivs, &self.evs);
        if old_hp == 0 {
            self.current_hp = 0;
        } else {
            let scaled = (old_hp * self.max_hp() as u32 / old_max).max(1);
            self.current_hp = scaled.min(self.max_hp() as u32) as u16;
        }
    }

    /// Full restore: HP, PP, status, stat stages and any temporary typing.
    pub fn heal(&mut self) {
        self.current_hp = self.max_hp();
        for slot in &mut self.moves {
            slot.pp = slot.max_pp;
        }
        self.status = None;
        self.stat_stages = [0; 5];
        self.type_override = None;
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.current_hp >= self.max_hp()
    }

    /// Total PP spent across all moves.
    pub fn pp_used(&self) -> u32 {
        self.moves.iter().map(|m| m.pp_used()).sum()
    }

    /// Remaining HP as a whole percentage of max HP.
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp() == 0 {
            return 0;
        }
        self.current_hp as u32 * 100 / self.max_hp() as u32
    }

    /// Apply a status unless the Pokemon is fainted or already has one.
    pub fn apply_status(&mut self, status: StatusCondition) -> bool {
        if self.is_fainted() || self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        true
    }

    pub fn cure_status(&mut self) -> bool {
        self.status.take().is_some()
    }

    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restore HP on a conscious Pokemon. Returns the amount actually restored.
    pub fn restore_hp(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let restored = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += restored;
        restored
    }

    pub fn restore_all_pp(&mut self) {
        for slot in &mut self.moves {
            slot.pp = slot.max_pp;
        }
    }

    pub fn current_types(&self) -> &[PokemonType] {
        self.type_override.as_deref().unwrap_or(&self.types)
    }

    fn stage_index(stat: Stat) -> usize {
        match stat {
            Stat::Attack => 0,
            Stat::Defense => 1,
            Stat::SpAttack => 2,
            Stat::SpDefense => 3,
            Stat::Speed => 4,
        }
    }

    pub fn stat_stage(&self, stat: Stat) -> i8 {
        self.stat_stages[Self::stage_index(stat)]
    }

    /// Shift a stat stage, clamped to +/-6. Returns the change actually applied.
    pub fn change_stage(&mut self, stat: Stat, delta: i8) -> i8 {
        let index = Self::stage_index(stat);
        let old = self.stat_stages[index];
        let new = (old + delta).clamp(-STAT_STAGE_LIMIT, STAT_STAGE_LIMIT);
        self.stat_stages[index] = new;
        new - old
    }

    /// Stat value after stage multipliers.
    pub fn effective_stat(&self, stat: Stat) -> u32 {
        let raw = match stat {
            Stat::Attack => self.curr_stats[1],
            Stat::Defense => self.curr_stats[2],
            Stat::SpAttack => self.curr_stats[3],
            Stat::SpDefense => self.curr_stats[4],
            Stat::Speed => self.curr_stats[5],
        } as u32;
        let stage = self.stat_stage(stat) as i32;
        let (num, den) = if stage >= 0 {
            (2 + stage, 2)
        } else {
            (2, 2 - stage)
        };
        (raw * num as u32 / den as u32).max(1)
    }

    /// Use a medicine from the bag on this Pokemon. Returns false when it had no effect.
    pub fn use_medicine(&mut self, item: Item) -> bool {
        match item {
            Item::Potion => self.restore_hp(20) > 0,
            Item::SuperPotion => self.restore_hp(60) > 0,
            Item::HyperPotion => self.restore_hp(120) > 0,
            Item::MaxPotion => self.restore_hp(self.max_hp()) > 0,
            Item::FullRestore => {
                let cured = self.cure_status();
                self.restore_hp(self.max_hp()) > 0 || cured
            }
            Item::FullHeal => self.cure_status(),
            Item::Revive | Item::MaxRevive => {
                if !self.is_fainted() {
                    return false;
                }
                let hp = if item == Item::Revive {
                    (self.max_hp() / 2).max(1)
                } else {
                    self.max_hp()
                };
                self.current_hp = hp;
                true
            }
            Item::Ether | Item::MaxEther => {
                let amount = if item == Item::Ether { 10 } else { u8::MAX };
                match self.moves.iter_mut().find(|m| m.pp < m.max_pp) {
                    Some(slot) => {
                        slot.restore_pp(amount);
                        true
                    }
                    None => false,
                }
            }
            Item::Elixir | Item::MaxElixir => {
                let amount = if item == Item::Elixir { 10 } else { u8::MAX };
                let mut restored = false;
                for slot in self.moves.iter_mut().filter(|m| m.pp < m.max_pp) {
                    slot.restore_pp(amount);
                    restored = true;
                }
                restored
            }
            _ => false,
        }
    }

    /// Moves that deal direct damage.
    pub fn offensive_move_count(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| get_move(&m.name).map(|r| r.is_offensive()).unwrap_or(false))
            .count()
    }

    /// Protect-style moves in the moveset.
    pub fn protective_move_count(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| get_move(&m.name).map(|r| r.protective).unwrap_or(false))
            .count()
    }
}
