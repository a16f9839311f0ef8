//! Automatic battle resolver used when no interactive battle engine is attached.
//!
//! Both sides are driven by a [`Behavior`]. One Pokemon per side is active at a
//! time and the next conscious party member comes in when it faints. Double
//! and Multi styles are fought the same way.

use crate::battle::ai::{Behavior, PalaceAI, ScoringAI};
use crate::battle::engine::{BattleEngine, BattleOutcome, BattleReport, BattleRules, Weather};
use crate::battle::events::{EventBus, FrontierEvent};
use crate::moves::get_move;
use crate::pokemon::{PokemonInst, StatusCondition};
use crate::rng::FrontierRng;
use crate::trainer::Trainer;
use schema::{Item, MoveCategory, MoveEffect, MoveRecord, PokemonType, Stat, StatusKind};

/// Safety net for battles where neither side can make progress.
const MAX_TURNS: u32 = 250;

const PLAYER: usize = 0;
const OPPONENT: usize = 1;

pub struct AutoBattle {
    scoring: ScoringAI,
}

impl AutoBattle {
    pub fn new() -> Self {
        Self {
            scoring: ScoringAI::new(),
        }
    }
}

impl Default for AutoBattle {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-turn flags for both sides.
#[derive(Default)]
struct TurnFlags {
    protected: [bool; 2],
    flinched: [bool; 2],
    acted: [bool; 2],
}

fn first_conscious(party: &[PokemonInst]) -> Option<usize> {
    party.iter().position(|p| !p.is_fainted())
}

fn wiped(party: &[PokemonInst]) -> bool {
    party.iter().all(|p| p.is_fainted())
}

/// Best multiplier any usable damaging move of `attacker` gets against `defender`.
fn best_effectiveness(attacker: &PokemonInst, defender: &PokemonInst) -> f32 {
    attacker
        .moves
        .iter()
        .filter(|slot| slot.pp > 0)
        .filter_map(|slot| get_move(&slot.name).ok())
        .filter(|record| record.is_offensive())
        .map(|record| PokemonType::effectiveness_against(record.move_type, defender.current_types()))
        .fold(0.0, f32::max)
}

/// A benched member worth switching to: only when the active Pokemon is walled
/// and someone on the bench hits the foe super effectively.
fn switch_target(party: &[PokemonInst], active: usize, foe: &PokemonInst) -> Option<usize> {
    if best_effectiveness(&party[active], foe) >= 1.0 {
        return None;
    }
    party
        .iter()
        .enumerate()
        .filter(|(i, p)| *i != active && !p.is_fainted())
        .find(|(_, p)| best_effectiveness(p, foe) >= 2.0)
        .map(|(i, _)| i)
}

fn struggle() -> MoveRecord {
    MoveRecord {
        name: "Struggle".to_string(),
        move_type: PokemonType::Normal,
        category: MoveCategory::Physical,
        power: 50,
        accuracy: 100,
        pp: 1,
        protective: false,
        effect: None,
    }
}

/// Attacker and defender for `side`, borrowed from the two separate parties.
fn combatants<'a>(
    party: &'a mut [PokemonInst],
    foes: &'a mut [PokemonInst],
    active: [usize; 2],
    side: usize,
) -> (&'a mut PokemonInst, &'a mut PokemonInst) {
    let mine = &mut party[active[PLAYER]];
    let theirs = &mut foes[active[OPPONENT]];
    if side == PLAYER {
        (mine, theirs)
    } else {
        (theirs, mine)
    }
}

fn status_blocked_by_type(kind: StatusKind, types: &[PokemonType]) -> bool {
    match kind {
        StatusKind::Burn => types.contains(&PokemonType::Fire),
        StatusKind::Poison => {
            types.contains(&PokemonType::Poison) || types.contains(&PokemonType::Steel)
        }
        StatusKind::Paralysis => types.contains(&PokemonType::Electric),
        StatusKind::Freeze => types.contains(&PokemonType::Ice),
        StatusKind::Sleep => false,
    }
}

fn try_inflict(
    target: &mut PokemonInst,
    kind: StatusKind,
    rng: &mut FrontierRng,
    bus: &mut EventBus,
) {
    if status_blocked_by_type(kind, target.current_types()) {
        return;
    }
    let sleep_turns = rng.range_inclusive("sleep turns", 1, 3) as u8;
    let status = StatusCondition::from_kind(kind, sleep_turns);
    if target.apply_status(status) {
        bus.push(FrontierEvent::StatusApplied {
            target: target.species.clone(),
            status,
        });
    }
}

fn effective_speed(pokemon: &PokemonInst) -> u32 {
    let mut speed = pokemon.effective_stat(Stat::Speed);
    if pokemon.status == Some(StatusCondition::Paralysis) {
        speed /= 4;
    }
    if pokemon.held_item == Some(Item::ChoiceScarf) {
        speed = speed * 3 / 2;
    }
    speed
}

/// Which side moves first this turn.
fn first_mover(player: &PokemonInst, opponent: &PokemonInst, rng: &mut FrontierRng) -> usize {
    let quick = |p: &PokemonInst, rng: &mut FrontierRng| {
        p.held_item == Some(Item::QuickClaw) && rng.chance("quick claw", 20)
    };
    let player_quick = quick(player, rng);
    let opponent_quick = quick(opponent, rng);
    if player_quick != opponent_quick {
        return if player_quick { PLAYER } else { OPPONENT };
    }
    let (a, b) = (effective_speed(player), effective_speed(opponent));
    if a == b {
        if rng.coin_flip("speed tie") {
            PLAYER
        } else {
            OPPONENT
        }
    } else if a > b {
        PLAYER
    } else {
        OPPONENT
    }
}

/// Sleep, freeze and paralysis checks. Returns false when the Pokemon loses its turn.
fn can_act(pokemon: &mut PokemonInst, rng: &mut FrontierRng, bus: &mut EventBus) -> bool {
    let name = pokemon.species.clone();
    match pokemon.status {
        Some(StatusCondition::Sleep(turns)) => {
            if turns > 1 {
                pokemon.status = Some(StatusCondition::Sleep(turns - 1));
                bus.push(FrontierEvent::CannotMove {
                    pokemon: name,
                    status: StatusCondition::Sleep(turns),
                });
                false
            } else {
                pokemon.cure_status();
                bus.push(FrontierEvent::StatusCured { target: name });
                true
            }
        }
        Some(StatusCondition::Freeze) => {
            if rng.chance("thaw", 20) {
                pokemon.cure_status();
                bus.push(FrontierEvent::StatusCured { target: name });
                true
            } else {
                bus.push(FrontierEvent::CannotMove {
                    pokemon: name,
                    status: StatusCondition::Freeze,
                });
                false
            }
        }
        Some(StatusCondition::Paralysis) => {
            if rng.chance("full paralysis", 25) {
                bus.push(FrontierEvent::CannotMove {
                    pokemon: name,
                    status: StatusCondition::Paralysis,
                });
                false
            } else {
                true
            }
        }
        _ => true,
    }
}

fn item_power_multiplier(attacker: &PokemonInst, record: &MoveRecord, effectiveness: f32) -> f32 {
    match (attacker.held_item, record.category) {
        (Some(Item::ChoiceBand), MoveCategory::Physical) => 1.5,
        (Some(Item::ChoiceSpecs), MoveCategory::Special) => 1.5,
        (Some(Item::MuscleBand), MoveCategory::Physical) => 1.1,
        (Some(Item::WiseGlasses), MoveCategory::Special) => 1.1,
        (Some(Item::LifeOrb), _) => 1.3,
        (Some(Item::ExpertBelt), _) if effectiveness > 1.0 => 1.2,
        (Some(Item::LightBall), _) if attacker.species == "Pikachu" => 2.0,
        (Some(Item::ThickClub), MoveCategory::Physical) if attacker.species == "Marowak" => 2.0,
        _ => 1.0,
    }
}

/// Damage for one hit and the type multiplier that applied.
fn calculate_damage(
    attacker: &PokemonInst,
    defender: &PokemonInst,
    record: &MoveRecord,
    weather: Option<Weather>,
    critical: bool,
    random_percent: u32,
) -> (u16, f32) {
    let effectiveness = PokemonType::effectiveness_against(record.move_type, defender.current_types());
    if effectiveness == 0.0 {
        return (0, 0.0);
    }
    let (attack, defense) = match record.category {
        MoveCategory::Physical => (
            attacker.effective_stat(Stat::Attack),
            defender.effective_stat(Stat::Defense),
        ),
        _ => (
            attacker.effective_stat(Stat::SpAttack),
            defender.effective_stat(Stat::SpDefense),
        ),
    };
    let level = attacker.level as u32;
    let base = ((2 * level / 5 + 2) * record.power as u32 * attack / defense.max(1)) / 50 + 2;

    let mut modifier = effectiveness;
    if attacker.current_types().contains(&record.move_type) {
        modifier *= 1.5;
    }
    modifier *= match (weather, record.move_type) {
        (Some(Weather::Sun), PokemonType::Fire) | (Some(Weather::Rain), PokemonType::Water) => 1.5,
        (Some(Weather::Sun), PokemonType::Water) | (Some(Weather::Rain), PokemonType::Fire) => 0.5,
        _ => 1.0,
    };
    if critical {
        modifier *= 1.5;
    }
    if record.category == MoveCategory::Physical && attacker.status == Some(StatusCondition::Burn) {
        modifier *= 0.5;
    }
    modifier *= item_power_multiplier(attacker, record, effectiveness);
    modifier *= random_percent as f32 / 100.0;

    let damage = (base as f32 * modifier).floor().max(1.0);
    (damage.min(u16::MAX as f32) as u16, effectiveness)
}

struct MoveContext<'a> {
    side: usize,
    weather: Option<Weather>,
    moves_last: bool,
    flags: &'a mut TurnFlags,
    report: &'a mut BattleReport,
    bus: &'a mut EventBus,
}

fn perform_move(
    attacker: &mut PokemonInst,
    defender: &mut PokemonInst,
    choice: Option<usize>,
    ctx: &mut MoveContext<'_>,
    rng: &mut FrontierRng,
) {
    let side = ctx.side;
    let record = match choice.and_then(|i| attacker.moves.get_mut(i)) {
        Some(slot) => {
            slot.use_move();
            match get_move(&slot.name) {
                Ok(record) => record.clone(),
                Err(_) => struggle(),
            }
        }
        None => struggle(),
    };

    ctx.bus.push(FrontierEvent::MoveUsed {
        side,
        pokemon: attacker.species.clone(),
        move_used: record.name.clone(),
    });

    if record.protective {
        ctx.flags.protected[side] = true;
        return;
    }

    let targets_foe = record.is_offensive()
        || matches!(
            record.effect,
            Some(MoveEffect::Inflict(..)) | Some(MoveEffect::LowerTarget(..))
        );

    if targets_foe {
        if ctx.flags.protected[1 - side] {
            ctx.bus.push(FrontierEvent::MoveBlocked {
                defender: defender.species.clone(),
            });
            return;
        }
        let mut accuracy = record.accuracy as f32;
        if attacker.held_item == Some(Item::WideLens) {
            accuracy *= 1.1;
        }
        if attacker.held_item == Some(Item::ZoomLens) && ctx.moves_last {
            accuracy *= 1.2;
        }
        if defender.held_item == Some(Item::BrightPowder) {
            accuracy *= 0.9;
        }
        let accuracy = accuracy.round().clamp(1.0, 100.0) as u8;
        if !rng.chance("accuracy", accuracy) {
            ctx.bus.push(FrontierEvent::MoveMissed {
                attacker: attacker.species.clone(),
            });
            return;
        }
    }

    if record.is_offensive() {
        ctx.report.offensive_moves_used[side] += 1;

        let crit_chance = if attacker.held_item == Some(Item::ScopeLens) { 12 } else { 6 };
        let critical = rng.chance("critical hit", crit_chance);
        let random_percent = rng.range_inclusive("damage roll", 85, 100);
        let (mut damage, effectiveness) =
            calculate_damage(attacker, defender, &record, ctx.weather, critical, random_percent);

        ctx.bus.push(FrontierEvent::AttackTypeEffectiveness {
            multiplier: effectiveness,
        });
        if effectiveness == 0.0 {
            return;
        }
        if critical {
            ctx.bus.push(FrontierEvent::CriticalHit);
        }

        if damage >= defender.current_hp {
            let hold_on = match defender.held_item {
                Some(Item::FocusSash) if defender.is_full_hp() && defender.current_hp > 1 => {
                    defender.held_item = None;
                    Some(Item::FocusSash)
                }
                Some(Item::FocusBand) if rng.chance("focus band", 10) => Some(Item::FocusBand),
                _ => None,
            };
            if let Some(item) = hold_on {
                damage = defender.current_hp.saturating_sub(1);
                ctx.bus.push(FrontierEvent::HungOn {
                    pokemon: defender.species.clone(),
                    item,
                });
            }
        }

        let dealt = defender.take_damage(damage);
        ctx.report.damage_dealt[side] += dealt as u32;
        ctx.bus.push(FrontierEvent::DamageDealt {
            target: defender.species.clone(),
            damage: dealt,
            remaining_hp: defender.current_hp,
        });

        if let Some(MoveEffect::Drain(percent)) = record.effect {
            let mut amount = dealt as u32 * percent as u32 / 100;
            if attacker.held_item == Some(Item::BigRoot) {
                amount = amount * 13 / 10;
            }
            heal_with_event(attacker, amount.max(1) as u16, ctx.bus);
        }
        if attacker.held_item == Some(Item::ShellBell) && dealt > 0 {
            heal_with_event(attacker, (dealt / 8).max(1), ctx.bus);
        }
        if record.name == "Struggle" {
            let recoil = (attacker.max_hp() / 4).max(1);
            attacker.take_damage(recoil);
        } else if attacker.held_item == Some(Item::LifeOrb) {
            let recoil = (attacker.max_hp() / 10).max(1);
            attacker.take_damage(recoil);
        }

        if !defender.is_fainted()
            && !ctx.flags.acted[1 - side]
            && attacker.held_item == Some(Item::KingsRock)
            && rng.chance("king's rock", 10)
        {
            ctx.flags.flinched[1 - side] = true;
        }
    }

    match record.effect {
        Some(MoveEffect::Inflict(kind, chance)) => {
            if !defender.is_fainted() && rng.chance("secondary effect", chance) {
                try_inflict(defender, kind, rng, ctx.bus);
            }
        }
        Some(MoveEffect::RaiseOwn(stat, stages)) => {
            let delta = attacker.change_stage(stat, stages);
            ctx.bus.push(FrontierEvent::StatStageChanged {
                target: attacker.species.clone(),
                stat,
                delta,
            });
        }
        Some(MoveEffect::LowerTarget(stat, stages)) => {
            if !defender.is_fainted() {
                let delta = defender.change_stage(stat, -stages);
                ctx.bus.push(FrontierEvent::StatStageChanged {
                    target: defender.species.clone(),
                    stat,
                    delta,
                });
                if delta < 0 && defender.held_item == Some(Item::WhiteHerb) {
                    defender.change_stage(stat, -delta);
                    defender.held_item = None;
                    ctx.bus.push(FrontierEvent::ItemActivated {
                        pokemon: defender.species.clone(),
                        item: Item::WhiteHerb,
                    });
                }
            }
        }
        Some(MoveEffect::Heal(percent)) => {
            let amount = (attacker.max_hp() as u32 * percent as u32 / 100) as u16;
            heal_with_event(attacker, amount, ctx.bus);
        }
        Some(MoveEffect::Drain(_)) | None => {}
    }

    if defender.is_fainted() {
        ctx.bus.push(FrontierEvent::PokemonFainted {
            side: 1 - side,
            pokemon: defender.species.clone(),
        });
    }
    if attacker.is_fainted() {
        ctx.bus.push(FrontierEvent::PokemonFainted {
            side,
            pokemon: attacker.species.clone(),
        });
    }
}

fn heal_with_event(pokemon: &mut PokemonInst, amount: u16, bus: &mut EventBus) {
    let restored = pokemon.restore_hp(amount);
    if restored > 0 {
        bus.push(FrontierEvent::PokemonHealed {
            target: pokemon.species.clone(),
            amount: restored,
        });
    }
}

fn consume_item(pokemon: &mut PokemonInst, item: Item, bus: &mut EventBus) {
    pokemon.held_item = None;
    bus.push(FrontierEvent::ItemActivated {
        pokemon: pokemon.species.clone(),
        item,
    });
}

/// Residual damage, weather and held items for one active Pokemon.
fn end_of_turn(
    pokemon: &mut PokemonInst,
    side: usize,
    weather: Option<Weather>,
    rng: &mut FrontierRng,
    bus: &mut EventBus,
) {
    if pokemon.is_fainted() {
        return;
    }
    let name = pokemon.species.clone();

    let residual = match pokemon.status {
        Some(StatusCondition::Burn) => Some(pokemon.max_hp() / 16),
        Some(StatusCondition::Poison) => Some(pokemon.max_hp() / 8),
        _ => None,
    };
    if let (Some(amount), Some(status)) = (residual, pokemon.status) {
        let damage = pokemon.take_damage(amount.max(1));
        bus.push(FrontierEvent::StatusDamage {
            target: name.clone(),
            status,
            damage,
        });
    }

    let types = pokemon.current_types().to_vec();
    let weather_hurts = match weather {
        Some(Weather::Sandstorm) => !types
            .iter()
            .any(|t| matches!(t, PokemonType::Rock | PokemonType::Ground | PokemonType::Steel)),
        Some(Weather::Hail) => !types.contains(&PokemonType::Ice),
        _ => false,
    };
    if let Some(weather) = weather.filter(|_| weather_hurts && !pokemon.is_fainted()) {
        let damage = pokemon.take_damage((pokemon.max_hp() / 16).max(1));
        bus.push(FrontierEvent::WeatherDamage {
            target: name.clone(),
            weather,
            damage,
        });
    }

    if pokemon.is_fainted() {
        bus.push(FrontierEvent::PokemonFainted { side, pokemon: name });
        return;
    }

    match pokemon.held_item {
        Some(Item::Leftovers) if !pokemon.is_full_hp() => {
            let amount = (pokemon.max_hp() / 16).max(1);
            heal_with_event(pokemon, amount, bus);
        }
        Some(Item::SitrusBerry) if pokemon.hp_percent() <= 50 => {
            let amount = (pokemon.max_hp() / 4).max(1);
            consume_item(pokemon, Item::SitrusBerry, bus);
            heal_with_event(pokemon, amount, bus);
        }
        Some(Item::OranBerry) if pokemon.hp_percent() <= 50 => {
            consume_item(pokemon, Item::OranBerry, bus);
            heal_with_event(pokemon, 10, bus);
        }
        Some(Item::LeppaBerry) if pokemon.moves.iter().any(|m| m.pp == 0) => {
            consume_item(pokemon, Item::LeppaBerry, bus);
            if let Some(slot) = pokemon.moves.iter_mut().find(|m| m.pp == 0) {
                slot.restore_pp(10);
            }
        }
        Some(item @ (Item::ToxicOrb | Item::FlameOrb)) if pokemon.status.is_none() => {
            let kind = if item == Item::ToxicOrb {
                StatusKind::Poison
            } else {
                StatusKind::Burn
            };
            try_inflict(pokemon, kind, rng, bus);
        }
        Some(item) if item.is_berry() => {
            let cures = match (item, pokemon.status) {
                (Item::LumBerry, Some(_)) => true,
                (Item::CheriBerry, Some(StatusCondition::Paralysis)) => true,
                (Item::ChestoBerry, Some(StatusCondition::Sleep(_))) => true,
                (Item::PechaBerry, Some(StatusCondition::Poison)) => true,
                (Item::RawstBerry, Some(StatusCondition::Burn)) => true,
                (Item::AspearBerry, Some(StatusCondition::Freeze)) => true,
                _ => false,
            };
            if cures {
                consume_item(pokemon, item, bus);
                pokemon.cure_status();
                bus.push(FrontierEvent::StatusCured { target: name });
            }
        }
        _ => {}
    }
}

impl AutoBattle {
    fn pick_move(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        auto_commands: bool,
        weather: Option<Weather>,
        rng: &mut FrontierRng,
    ) -> Option<usize> {
        if auto_commands {
            PalaceAI.choose_move(attacker, defender, weather, rng)
        } else {
            self.scoring.choose_move(attacker, defender, weather, rng)
        }
    }
}

impl BattleEngine for AutoBattle {
    fn run_battle(
        &mut self,
        party: &mut [PokemonInst],
        opponent: &mut Trainer,
        rules: &BattleRules,
        rng: &mut FrontierRng,
    ) -> BattleReport {
        let mut bus = EventBus::new();
        let mut report = BattleReport::new(BattleOutcome::Undecided);
        let weather = rules.weather;
        let foes = opponent.party.as_mut_slice();

        let (Some(lead), Some(foe_lead)) = (first_conscious(party), first_conscious(foes)) else {
            report.outcome = match (wiped(party), wiped(foes)) {
                (true, true) => BattleOutcome::Draw,
                (true, false) => BattleOutcome::Loss,
                _ => BattleOutcome::Win,
            };
            report.events = bus.into_events();
            return report;
        };
        let mut active = [lead, foe_lead];
        bus.push(FrontierEvent::PokemonSentOut {
            side: PLAYER,
            pokemon: party[lead].species.clone(),
        });
        bus.push(FrontierEvent::PokemonSentOut {
            side: OPPONENT,
            pokemon: foes[foe_lead].species.clone(),
        });

        let limit = rules.turn_limit.unwrap_or(MAX_TURNS).min(MAX_TURNS);
        let mut turn = 0;

        let outcome = loop {
            if turn >= limit {
                bus.push(FrontierEvent::TurnLimitReached { turns: turn });
                break BattleOutcome::Undecided;
            }
            turn += 1;
            bus.push(FrontierEvent::TurnStarted { turn_number: turn });

            let mut switched = [false; 2];
            if rules.allow_switching {
                for side in [PLAYER, OPPONENT] {
                    let (own, other) = if side == PLAYER {
                        (&*party, &foes[active[OPPONENT]])
                    } else {
                        (&*foes, &party[active[PLAYER]])
                    };
                    if let Some(next) = switch_target(own, active[side], other) {
                        bus.push(FrontierEvent::PokemonWithdrawn {
                            side,
                            pokemon: own[active[side]].species.clone(),
                        });
                        bus.push(FrontierEvent::PokemonSentOut {
                            side,
                            pokemon: own[next].species.clone(),
                        });
                        active[side] = next;
                        switched[side] = true;
                    }
                }
            }

            let player_choice = self.pick_move(
                &party[active[PLAYER]],
                &foes[active[OPPONENT]],
                rules.auto_commands,
                weather,
                rng,
            );
            let opponent_choice =
                self.pick_move(&foes[active[OPPONENT]], &party[active[PLAYER]], false, weather, rng);
            let choices = [player_choice, opponent_choice];

            let first = first_mover(&party[active[PLAYER]], &foes[active[OPPONENT]], rng);
            let mut flags = TurnFlags::default();

            for (position, side) in [first, 1 - first].into_iter().enumerate() {
                let (attacker, defender) = combatants(party, foes, active, side);
                if attacker.is_fainted() || defender.is_fainted() {
                    continue;
                }
                flags.acted[side] = true;
                if switched[side] || flags.flinched[side] {
                    continue;
                }
                if !can_act(attacker, rng, &mut bus) {
                    continue;
                }
                let mut ctx = MoveContext {
                    side,
                    weather,
                    moves_last: position == 1,
                    flags: &mut flags,
                    report: &mut report,
                    bus: &mut bus,
                };
                perform_move(attacker, defender, choices[side], &mut ctx, rng);
            }

            for side in [first, 1 - first] {
                let (pokemon, _) = combatants(party, foes, active, side);
                end_of_turn(pokemon, side, weather, rng, &mut bus);
            }

            match (wiped(party), wiped(foes)) {
                (true, true) => break BattleOutcome::Draw,
                (true, false) => break BattleOutcome::Loss,
                (false, true) => break BattleOutcome::Win,
                (false, false) => {}
            }

            if party[active[PLAYER]].is_fainted() {
                if let Some(next) = first_conscious(party) {
                    active[PLAYER] = next;
                    bus.push(FrontierEvent::PokemonSentOut {
                        side: PLAYER,
                        pokemon: party[next].species.clone(),
                    });
                }
            }
            if foes[active[OPPONENT]].is_fainted() {
                if let Some(next) = first_conscious(foes) {
                    active[OPPONENT] = next;
                    bus.push(FrontierEvent::PokemonSentOut {
                        side: OPPONENT,
                        pokemon: foes[next].species.clone(),
                    });
                }
            }
        };

        bus.push(FrontierEvent::BattleEnded { outcome });
        tracing::debug!(
            target: "frontier.battle",
            opponent = %opponent.name,
            ?outcome,
            turns = turn,
            damage_dealt = ?report.damage_dealt,
            "automatic battle finished"
        );
        report.outcome = outcome;
        report.turns = turn;
        report.events = bus.into_events();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::get_species;
    use crate::trainer::TrainerClass;
    use pretty_assertions::assert_eq;

    fn mon(species: &str, level: u8, moves: &[&str]) -> PokemonInst {
        PokemonInst::new(
            get_species(species).expect("species"),
            level,
            None,
            Some(moves.iter().map(|m| m.to_string()).collect()),
        )
    }

    fn trainer(party: Vec<PokemonInst>) -> Trainer {
        Trainer::new("Tess", TrainerClass::CooltrainerF, party)
    }

    #[test]
    fn test_overwhelming_side_wins() {
        let mut party = vec![mon("Garchomp", 100, &["Earthquake", "Outrage", "Dragon Claw", "Stone Edge"])];
        let mut foe = trainer(vec![
            mon("Caterpie", 5, &["Tackle", "String Shot"]),
            mon("Rattata", 5, &["Tackle", "Growl"]),
        ]);
        let mut rng = FrontierRng::from_seed(1);
        let report = AutoBattle::new().run_battle(&mut party, &mut foe, &BattleRules::single(), &mut rng);
        assert_eq!(report.outcome, BattleOutcome::Win);
        assert!(foe.party.iter().all(|p| p.is_fainted()));
        assert!(report.damage_dealt[PLAYER] > 0);
        assert!(report.offensive_moves_used[PLAYER] >= 2);
    }

    #[test]
    fn test_outmatched_side_loses() {
        let mut party = vec![mon("Caterpie", 5, &["Tackle", "String Shot"])];
        let mut foe = trainer(vec![mon("Salamence", 100, &["Outrage", "Earthquake", "Fire Blast", "Dragon Dance"])]);
        let mut rng = FrontierRng::from_seed(2);
        let report = AutoBattle::new().run_battle(&mut party, &mut foe, &BattleRules::single(), &mut rng);
        assert_eq!(report.outcome, BattleOutcome::Loss);
        assert!(party[0].is_fainted());
    }

    #[test]
    fn test_turn_limit_leaves_battle_undecided() {
        let mut party = vec![mon("Shuckle", 50, &["Withdraw", "Protect", "Toxic", "Rock Slide"])];
        party[0].moves.retain(|m| m.name == "Withdraw");
        let mut foe = trainer(vec![mon("Registeel", 50, &["Iron Defense", "Amnesia"])]);
        let mut rng = FrontierRng::from_seed(3);
        let report = AutoBattle::new().run_battle(&mut party, &mut foe, &BattleRules::arena_bout(), &mut rng);
        assert_eq!(report.outcome, BattleOutcome::Undecided);
        assert_eq!(report.turns, 3);
    }

    #[test]
    fn test_fainted_party_is_an_immediate_loss() {
        let mut party = vec![mon("Eevee", 50, &["Tackle"])];
        party[0].current_hp = 0;
        let mut foe = trainer(vec![mon("Eevee", 50, &["Tackle"])]);
        let mut rng = FrontierRng::new_for_test(vec![0]);
        let report = AutoBattle::new().run_battle(&mut party, &mut foe, &BattleRules::single(), &mut rng);
        assert_eq!(report.outcome, BattleOutcome::Loss);
        assert_eq!(report.turns, 0);
    }

    #[test]
    fn test_damage_formula_stab_and_effectiveness() {
        let attacker = mon("Lapras", 50, &["Ice Beam"]);
        let defender = mon("Garchomp", 50, &["Earthquake"]);
        let record = get_move("Ice Beam").expect("move").clone();
        let (damage, effectiveness) = calculate_damage(&attacker, &defender, &record, None, false, 100);
        assert_eq!(effectiveness, 4.0);
        // base = (22 * 90 * 105 / 105) / 50 + 2 = 41, then x1.5 STAB x4
        assert_eq!(damage, 246);
    }

    #[test]
    fn test_focus_sash_survives_from_full() {
        let mut attacker = mon("Garchomp", 100, &["Earthquake"]);
        let mut defender = mon("Pikachu", 5, &["Thunder Shock"]);
        defender.held_item = Some(Item::FocusSash);
        let mut flags = TurnFlags::default();
        let mut report = BattleReport::new(BattleOutcome::Undecided);
        let mut bus = EventBus::new();
        let mut ctx = MoveContext {
            side: PLAYER,
            weather: None,
            moves_last: false,
            flags: &mut flags,
            report: &mut report,
            bus: &mut bus,
        };
        let mut rng = FrontierRng::new_for_test(vec![0]);
        perform_move(&mut attacker, &mut defender, Some(0), &mut ctx, &mut rng);
        assert_eq!(defender.current_hp, 1);
        assert_eq!(defender.held_item, None);
    }

    fn withdrawals(report: &BattleReport) -> Vec<String> {
        report
            .events
            .iter()
            .filter_map(|e| match e {
                FrontierEvent::PokemonWithdrawn { pokemon, .. } => Some(pokemon.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_walled_lead_switches_out_when_allowed() {
        let mut party = vec![mon("Pikachu", 50, &["Thunderbolt"]), mon("Lapras", 50, &["Ice Beam"])];
        let mut foe = trainer(vec![mon("Garchomp", 50, &["Earthquake"])]);
        let rules = BattleRules {
            turn_limit: Some(1),
            ..BattleRules::single()
        };
        let mut rng = FrontierRng::new_for_test(vec![50]);
        let report = AutoBattle::new().run_battle(&mut party, &mut foe, &rules, &mut rng);
        assert_eq!(withdrawals(&report), vec!["Pikachu".to_string()]);
        assert!(!report.events.iter().any(|e| matches!(
            e,
            FrontierEvent::MoveUsed { side: PLAYER, pokemon, .. } if pokemon == "Pikachu"
        )));
    }

    #[test]
    fn test_no_switching_keeps_the_lead_in() {
        let mut party = vec![mon("Pikachu", 50, &["Thunderbolt"]), mon("Lapras", 50, &["Ice Beam"])];
        let mut foe = trainer(vec![mon("Garchomp", 50, &["Earthquake"])]);
        let mut rng = FrontierRng::new_for_test(vec![50]);
        let report = AutoBattle::new().run_battle(&mut party, &mut foe, &BattleRules::arena_bout(), &mut rng);
        assert!(withdrawals(&report).is_empty());
    }
}
