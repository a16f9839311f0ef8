//! Battle Hall: one Pokemon against a type expert per battle.
//!
//! Each type has a rank from 1 to 10 that only rises when the player loses
//! to that type. Ranks decide how strong the expert's Pokemon is, and they
//! carry over between visits until the player switches species.

use crate::battle::engine::BattleRules;
use crate::frontier::{Facility, FrontierState};
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use crate::session::{
    fight_brain, select_entrants, CancelReason, Challenge, ChallengeOutcome, FrontierContext, SessionCounters, DECLINED,
};
use crate::species::{SpeciesFilter, SpeciesPool};
use crate::trainer::{RosterGenerator, Trainer, TrainerClass};
use schema::PokemonType;
use strum::IntoEnumIterator;

pub const MIN_LEVEL: u8 = 30;
pub const ROUNDS: u32 = 3;
pub const BATTLES_PER_ROUND: u32 = 10;

/// Titles by wins this session.
pub const RANK_TITLES: [(u32, &str); 6] = [
    (0, "Beginner"),
    (10, "Novice"),
    (20, "Adept"),
    (30, "Expert"),
    (40, "Master"),
    (50, "Grand Master"),
];

/// Type ranks each BST band serves, first match wins: (ranks, min BST, max BST).
pub const SPECIES_GROUPS: [(u8, u8, Option<u16>, Option<u16>); 4] = [
    (1, 5, None, Some(339)),
    (3, 8, Some(340), Some(439)),
    (6, 10, Some(440), Some(499)),
    (9, 10, Some(500), None),
];

pub fn rank_title(wins: u32) -> &'static str {
    RANK_TITLES
        .iter()
        .rev()
        .find(|(min, _)| wins >= *min)
        .map(|(_, title)| *title)
        .unwrap_or("Beginner")
}

/// `min(L, L - 3L/10 + others/2 + (rank - 1) * (L/5))`, where `others` counts
/// the other types already at rank 2 or above.
pub fn hall_opponent_level(player_level: u8, rank: u8, others_ranked: u32) -> u8 {
    let level = player_level as u32;
    let base = level - 3 * level / 10;
    let scaled = base + others_ranked / 2 + (rank.max(1) as u32 - 1) * (level / 5);
    scaled.min(level) as u8
}

pub fn species_filter_for_rank(pokemon_type: PokemonType, rank: u8) -> SpeciesFilter {
    let filter = SpeciesFilter::of_type(pokemon_type);
    match SPECIES_GROUPS
        .iter()
        .find(|(low, high, _, _)| (*low..=*high).contains(&rank))
    {
        Some(&(_, _, min, max)) => filter.with_bst(min, max),
        None => filter,
    }
}

/// Last-resort species for each type.
pub fn default_species(pokemon_type: PokemonType) -> &'static str {
    match pokemon_type {
        PokemonType::Normal => "Rattata",
        PokemonType::Fire => "Charmander",
        PokemonType::Water => "Squirtle",
        PokemonType::Electric => "Pikachu",
        PokemonType::Grass => "Bulbasaur",
        PokemonType::Ice => "Spheal",
        PokemonType::Fighting => "Machop",
        PokemonType::Poison => "Ekans",
        PokemonType::Ground => "Sandshrew",
        PokemonType::Flying => "Pidgey",
        PokemonType::Psychic => "Abra",
        PokemonType::Bug => "Caterpie",
        PokemonType::Rock => "Geodude",
        PokemonType::Ghost => "Gastly",
        PokemonType::Dragon => "Dratini",
        PokemonType::Dark => "Poochyena",
        PokemonType::Steel => "Magnemite",
        PokemonType::Fairy => "Clefairy",
    }
}

/// Bonus BP when the lifetime Hall record lands on a milestone.
pub fn milestone_bonus(record: u32) -> Option<u32> {
    match record {
        10 => Some(1),
        30 => Some(3),
        50..=450 if record % 50 == 0 => Some(5),
        500..=1000 if record % 100 == 0 => Some(10),
        1200..=1800 if record % 200 == 0 => Some(30),
        2000 => Some(50),
        _ => None,
    }
}

fn others_ranked(state: &FrontierState, chosen: PokemonType) -> u32 {
    PokemonType::iter()
        .filter(|t| *t != chosen && state.hall_rank(*t) >= 2)
        .count() as u32
}

/// One-Pokemon expert: BST band for the rank, then any species of the type,
/// then the type's default species.
pub fn build_expert(rng: &mut FrontierRng, pokemon_type: PokemonType, rank: u8, level: u8) -> Trainer {
    let pool = SpeciesPool::global();
    let pokemon = pool
        .sample(rng, &species_filter_for_rank(pokemon_type, rank))
        .or_else(|| pool.sample(rng, &SpeciesFilter::of_type(pokemon_type)))
        .map(|species| PokemonInst::rental(species, level, rng))
        .or_else(|| RosterGenerator::named(default_species(pokemon_type), level, rng).ok());
    if pokemon.is_none() {
        tracing::warn!(target: "frontier.hall", %pokemon_type, "no species available for expert");
    }
    Trainer::new(
        format!("{}-type Expert", pokemon_type),
        TrainerClass::TypeExpert,
        pokemon.into_iter().collect(),
    )
}

#[derive(Debug, Default)]
pub struct HallChallenge {
    counters: SessionCounters,
}

impl HallChallenge {
    /// Check the entrant against the last Hall run. Switching species wipes
    /// the Hall streak and every type rank.
    fn confirm_species(ctx: &mut FrontierContext<'_>) -> bool {
        let species = ctx.player.party[0].species.clone();
        let switched = ctx
            .state
            .last_hall_species
            .as_deref()
            .is_some_and(|last| last != species);
        if switched {
            ctx.say("Warning: You're using a different Pokémon than last time.");
            ctx.say("Your streak will be lost if you continue.");
            if !ctx.dialog.confirm("Would you like to continue?") {
                ctx.say(DECLINED);
                return false;
            }
            ctx.state.reset_streak(Facility::Hall);
            ctx.state.hall_type_ranks.clear();
            tracing::info!(target: "frontier.hall", %species, "hall progress reset for new species");
        }
        ctx.state.last_hall_species = Some(species);
        true
    }

    fn claim_milestone(ctx: &mut FrontierContext<'_>, counters: &mut SessionCounters) {
        let record = ctx.state.hall_record;
        let Some(bonus) = milestone_bonus(record) else {
            return;
        };
        if ctx.state.claimed_hall_milestones.insert(record) {
            ctx.state.add_points(bonus);
            counters.bp_earned += bonus;
            ctx.say(format!("Your Hall record reached {}! You received {} BP!", record, bonus));
        }
    }
}

impl Challenge for HallChallenge {
    fn facility(&self) -> Facility {
        Facility::Hall
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Hall;
        ctx.say("Here, you'll battle with a single Pokémon.");
        if let Err(reason) = select_entrants(ctx, 1, MIN_LEVEL, Facility::Hall.team_clauses()) {
            return ChallengeOutcome::Cancelled(reason);
        }
        if !Self::confirm_species(ctx) {
            return ChallengeOutcome::Cancelled(CancelReason::Declined);
        }
        let player_level = ctx.player.party[0].level;
        let rules = BattleRules::single();

        for round in 1..=ROUNDS {
            self.counters.round = round;
            let mut used: Vec<PokemonType> = Vec::new();
            for battle in 1..=BATTLES_PER_ROUND {
                self.counters.battle = battle;
                ctx.say(format!("Round {}", round));
                ctx.say(format!("Battle {}", battle));
                ctx.say(format!("Current Rank: {}", rank_title(self.counters.wins)));

                let available: Vec<PokemonType> = PokemonType::iter().filter(|t| !used.contains(t)).collect();
                let options: Vec<String> = available
                    .iter()
                    .map(|t| format!("{}-type Expert (Rank {})", t, ctx.state.hall_rank(*t)))
                    .collect();
                let Some(&chosen) = ctx
                    .dialog
                    .choose("Select a type to battle:", &options)
                    .and_then(|i| available.get(i))
                else {
                    self.counters.quit = true;
                    return ChallengeOutcome::Quit;
                };
                used.push(chosen);

                let rank = ctx.state.hall_rank(chosen);
                let level = hall_opponent_level(player_level, rank, others_ranked(ctx.state, chosen));
                let mut expert = build_expert(ctx.rng, chosen, rank, level);
                ctx.say(format!("{} wants to battle!", expert.display_name()));
                let report = ctx.battle(1, &mut expert, &rules);
                ctx.heal_entrants(1);

                if !report.is_win() {
                    let new_rank = ctx.state.raise_hall_rank(chosen);
                    tracing::info!(target: "frontier.hall", pokemon_type = %chosen, rank = new_rank, "type rank raised");
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }

                let title_before = rank_title(self.counters.wins);
                ctx.award_win(&mut self.counters);
                ctx.state.hall_record += 1;
                Self::claim_milestone(ctx, &mut self.counters);
                ctx.state.increment_streak(facility);
                let title_after = rank_title(self.counters.wins);
                if title_after != title_before {
                    ctx.say(format!("Congratulations! You've reached {} rank!", title_after));
                }
            }
        }

        ctx.say("You've reached the final battle!");
        if !fight_brain(ctx, facility, &mut self.counters, 1, player_level, &rules) {
            ctx.record_loss(facility, &mut self.counters);
            return ChallengeOutcome::Lost;
        }
        ChallengeOutcome::Completed { brain_defeated: true }
    }
}
