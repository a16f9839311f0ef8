//! Battle Arena: every battle is three one-on-one bouts of at most three turns.
//!
//! A bout that ends on its own keeps its result. One still going when the
//! turn limit hits is judged on Mind, Skill and Body.

use crate::battle::engine::{BattleOutcome, BattleReport, BattleRules};
use crate::frontier::Facility;
use crate::pokemon::PokemonInst;
use crate::session::{configure, fight_brain, Challenge, ChallengeOutcome, FrontierContext, SessionCounters};
use crate::species::SpeciesFilter;
use crate::trainer::{RosterGenerator, Trainer, TrainerClass, MALE_NAMES};
use std::cmp::Ordering;

pub const ENTRANTS: usize = 3;
pub const BOUT_WINS_NEEDED: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoutResult {
    PlayerWin,
    OpponentWin,
    /// Both Pokemon are out.
    Draw,
}

/// Points per side, index 0 is the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement {
    pub mind: [u32; 2],
    pub skill: [u32; 2],
    pub body: [u32; 2],
}

fn award(player: i64, opponent: i64) -> [u32; 2] {
    match player.cmp(&opponent) {
        Ordering::Greater => [2, 0],
        Ordering::Less => [0, 2],
        Ordering::Equal => [1, 1],
    }
}

impl Judgement {
    pub fn totals(&self) -> [u32; 2] {
        [
            self.mind[0] + self.skill[0] + self.body[0],
            self.mind[1] + self.skill[1] + self.body[1],
        ]
    }

    pub fn verdict(&self) -> BoutResult {
        let [player, opponent] = self.totals();
        match player.cmp(&opponent) {
            Ordering::Greater => BoutResult::PlayerWin,
            Ordering::Less => BoutResult::OpponentWin,
            Ordering::Equal => BoutResult::Draw,
        }
    }
}

fn mind_score(pokemon: &PokemonInst) -> i64 {
    pokemon.offensive_move_count() as i64 - pokemon.protective_move_count() as i64
}

/// Mind compares attacking moves against protect-style moves in each moveset,
/// Skill the damage each side dealt and Body the HP left.
pub fn judge(player: &PokemonInst, opponent: &PokemonInst, report: &BattleReport) -> Judgement {
    Judgement {
        mind: award(mind_score(player), mind_score(opponent)),
        skill: award(report.damage_dealt[0] as i64, report.damage_dealt[1] as i64),
        body: award(player.hp_percent() as i64, opponent.hp_percent() as i64),
    }
}

#[derive(Debug, Default)]
pub struct ArenaChallenge {
    counters: SessionCounters,
}

impl ArenaChallenge {
    /// One bout between the player's `slot` and the opponent's `slot`.
    fn bout(ctx: &mut FrontierContext<'_>, opponent: &Trainer, slot: usize) -> BoutResult {
        let Some(foe) = opponent.party.get(slot).cloned() else {
            return BoutResult::PlayerWin;
        };
        let Some(pokemon) = ctx.player.party.get_mut(slot) else {
            return BoutResult::OpponentWin;
        };
        let mut single = Trainer::new(opponent.name.clone(), opponent.class, vec![foe]);
        let report = ctx.engine.run_battle(
            std::slice::from_mut(pokemon),
            &mut single,
            &BattleRules::arena_bout(),
            ctx.rng,
        );

        let player_name = ctx.player.party[slot].name().to_string();
        let result = match report.outcome {
            BattleOutcome::Win => BoutResult::PlayerWin,
            BattleOutcome::Loss => BoutResult::OpponentWin,
            BattleOutcome::Draw => BoutResult::Draw,
            BattleOutcome::Undecided => {
                let judgement = judge(&ctx.player.party[slot], &single.party[0], &report);
                ctx.say("Time's up! The judges will decide.");
                ctx.say(format!("Mind Points: {} - {}", judgement.mind[0], judgement.mind[1]));
                ctx.say(format!("Skill Points: {} - {}", judgement.skill[0], judgement.skill[1]));
                ctx.say(format!("Body Points: {} - {}", judgement.body[0], judgement.body[1]));
                judgement.verdict()
            }
        };
        match result {
            BoutResult::PlayerWin => ctx.say(format!("{} won the bout!", player_name)),
            BoutResult::OpponentWin => ctx.say(format!("{} lost the bout...", player_name)),
            BoutResult::Draw => ctx.say("The bout is a draw. Both Pokémon are eliminated!"),
        }
        tracing::debug!(target: "frontier.arena", slot, outcome = ?report.outcome, result = ?result, "bout finished");
        ctx.player.party[slot].heal();
        result
    }
}

impl Challenge for ArenaChallenge {
    fn facility(&self) -> Facility {
        Facility::Arena
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Arena;
        let rule = match configure(ctx, facility, ENTRANTS, 1) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let level = ctx.baseline(rule);
        let mut brain_defeated = false;
        self.counters.round = 1;

        for battle in 1..=ctx.config.battles_per_set {
            self.counters.battle = battle;
            ctx.say(format!("Battle {} of {}", battle, ctx.config.battles_per_set));
            let name = ctx.rng.choose("black belt name", &MALE_NAMES).copied().unwrap_or("Keith");
            let opponent =
                RosterGenerator::trainer(ctx.rng, TrainerClass::Blackbelt, name, level, ENTRANTS, &SpeciesFilter::any());
            ctx.say(format!("{} wants to battle!", opponent.display_name()));

            let mut bout_wins = 0;
            for slot in 0..ENTRANTS {
                if bout_wins >= BOUT_WINS_NEEDED {
                    break;
                }
                if Self::bout(ctx, &opponent, slot) == BoutResult::PlayerWin {
                    bout_wins += 1;
                }
            }
            ctx.heal_entrants(ENTRANTS);

            if bout_wins < BOUT_WINS_NEEDED {
                ctx.record_loss(facility, &mut self.counters);
                return ChallengeOutcome::Lost;
            }
            ctx.award_win(&mut self.counters);
            let streak = ctx.state.increment_streak(facility);
            ctx.say(format!("You won! Current streak: {}", streak));

            if ctx.state.can_face_brain(facility) {
                if !fight_brain(ctx, facility, &mut self.counters, ENTRANTS, level, &BattleRules::single()) {
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }
                brain_defeated = true;
                ctx.heal_entrants(ENTRANTS);
            }
        }
        ChallengeOutcome::Completed { brain_defeated }
    }
}
