//! A module for defining AI behaviors for automatic battles.

use crate::battle::engine::Weather;
use crate::moves::get_move;
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use ordered_float::OrderedFloat;
use schema::{MoveCategory, MoveEffect, PokemonType};

/// A trait for any system that can pick a move for the active Pokemon.
pub trait Behavior {
    /// Index into `attacker.moves`, or `None` when nothing has PP left.
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        weather: Option<Weather>,
        rng: &mut FrontierRng,
    ) -> Option<usize>;
}

fn usable_moves(attacker: &PokemonInst) -> Vec<usize> {
    attacker
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| m.pp > 0)
        .map(|(i, _)| i)
        .collect()
}

pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    /// The core scoring logic. Assigns a floating-point value to a given move.
    fn score_move(
        &self,
        move_index: usize,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        weather: Option<Weather>,
    ) -> f32 {
        let Some(slot) = attacker.moves.get(move_index) else {
            return -1.0;
        };
        let Ok(move_data) = get_move(&slot.name) else {
            return -1.0;
        };

        // --- Step 1: Damage ---
        let mut damage_score = 0.0;
        if move_data.is_offensive() {
            let effectiveness =
                PokemonType::effectiveness_against(move_data.move_type, defender.current_types());
            if effectiveness < 0.1 {
                return -1.0;
            }
            let stab = if attacker.current_types().contains(&move_data.move_type) {
                1.5
            } else {
                1.0
            };
            let weather_factor = match (weather, move_data.move_type) {
                (Some(Weather::Sun), PokemonType::Fire) | (Some(Weather::Rain), PokemonType::Water) => 1.5,
                (Some(Weather::Sun), PokemonType::Water) | (Some(Weather::Rain), PokemonType::Fire) => 0.5,
                _ => 1.0,
            };
            let attack_stat = match move_data.category {
                MoveCategory::Physical => attacker.effective_stat(schema::Stat::Attack),
                _ => attacker.effective_stat(schema::Stat::SpAttack),
            };
            let level_scalar = (attacker.level as f32 * 2.0).max(1.0);
            let normalized_power = attack_stat as f32 / level_scalar;

            damage_score =
                move_data.power as f32 * effectiveness * stab * weather_factor * normalized_power;
        }

        // --- Step 2: Utility ---
        let mut utility_score = 0.0;
        match move_data.effect {
            Some(MoveEffect::RaiseOwn(stat, stages)) => {
                let current = attacker.stat_stage(stat);
                if current < 6 {
                    let potential_gain = 1.0 - (current as f32 / 6.0);
                    utility_score += 20.0 * stages as f32 * potential_gain;
                }
            }
            Some(MoveEffect::LowerTarget(stat, stages)) => {
                if defender.stat_stage(stat) > -6 {
                    utility_score += 15.0 * stages.unsigned_abs() as f32;
                }
            }
            Some(MoveEffect::Inflict(_, chance)) => {
                if defender.status.is_none() {
                    utility_score += 45.0 * (chance as f32 / 100.0);
                }
            }
            Some(MoveEffect::Heal(percent)) => {
                let missing = 100 - attacker.hp_percent().min(100);
                if missing >= 40 {
                    utility_score += missing as f32 * percent as f32 / 50.0;
                }
            }
            Some(MoveEffect::Drain(_)) => {
                if !attacker.is_full_hp() {
                    utility_score += 10.0;
                }
            }
            None => {}
        }
        if move_data.protective {
            utility_score += 5.0;
        }

        // --- Step 3: Combine ---
        let mut final_score = damage_score + utility_score;
        if move_data.category == MoveCategory::Status && utility_score < 1.0 {
            return -1.0;
        }
        if move_data.category != MoveCategory::Status {
            final_score *= move_data.accuracy as f32 / 100.0;
        }
        final_score
    }
}

impl Default for ScoringAI {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for ScoringAI {
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        weather: Option<Weather>,
        rng: &mut FrontierRng,
    ) -> Option<usize> {
        usable_moves(attacker)
            .into_iter()
            .map(|index| {
                // +/- 5% so equal moves don't loop forever
                let jitter = 0.95 + rng.below("ai tiebreak", 11) as f32 * 0.01;
                let score = self.score_move(index, attacker, defender, weather) * jitter;
                (index, score)
            })
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(index, _)| index)
    }
}

/// Palace-style behavior: the Pokemon acts on its own, favouring attacks
/// while healthy and anything else once worn down.
pub struct PalaceAI;

impl Behavior for PalaceAI {
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        _defender: &PokemonInst,
        _weather: Option<Weather>,
        rng: &mut FrontierRng,
    ) -> Option<usize> {
        let usable = usable_moves(attacker);
        let healthy = attacker.hp_percent() >= 50;
        let weights: Vec<u32> = usable
            .iter()
            .map(|&i| {
                let offensive = get_move(&attacker.moves[i].name)
                    .map(|m| m.is_offensive())
                    .unwrap_or(false);
                match (offensive, healthy) {
                    (true, true) | (false, false) => 3,
                    _ => 1,
                }
            })
            .collect();
        rng.weighted_index("palace move", &weights)
            .and_then(|i| usable.get(i).copied())
    }
}
