//! The challenge controller shared by every facility.
//!
//! A session runs NotStarted -> Configuring -> rounds of battles -> Brain ->
//! Finished. Facilities implement [`Challenge::run`] for the middle part;
//! [`run_challenge`] owns the bookends: it snapshots the party, restores it
//! afterwards and logs a summary.

use crate::battle::engine::{BattleEngine, BattleReport, BattleRules};
use crate::battle::events::EventBus;
use crate::config::FrontierConfig;
use crate::dialog::Dialog;
use crate::frontier::{Facility, FrontierState, TeamClause};
use crate::level::{self, LevelRule};
use crate::player::Player;
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use crate::trainer::{RosterGenerator, Trainer};
use serde::Serialize;

pub const NOT_ELIGIBLE: &str = "Your Pokémon are not eligible to participate!";
pub const DECLINED: &str = "You've decided not to participate.";
pub const CLAUSE_BROKEN: &str = "Entrants must be different species holding different items.";

/// Everything a facility may touch while it runs.
pub struct FrontierContext<'a> {
    pub state: &'a mut FrontierState,
    pub dialog: &'a mut dyn Dialog,
    pub engine: &'a mut dyn BattleEngine,
    pub rng: &'a mut FrontierRng,
    pub config: &'a FrontierConfig,
    pub player: &'a mut Player,
}

impl FrontierContext<'_> {
    pub fn say(&mut self, text: impl AsRef<str>) {
        self.dialog.message(text.as_ref());
    }

    /// The leading `count` party members, which is where entrants live.
    pub fn entrants(&mut self, count: usize) -> &mut [PokemonInst] {
        let count = count.min(self.player.party.len());
        &mut self.player.party[..count]
    }

    pub fn heal_entrants(&mut self, count: usize) {
        for pokemon in self.entrants(count) {
            pokemon.heal();
        }
    }

    /// Fight `opponent` with the leading `count` party members and narrate
    /// whatever the engine reported.
    pub fn battle(&mut self, count: usize, opponent: &mut Trainer, rules: &BattleRules) -> BattleReport {
        let count = count.min(self.player.party.len());
        let report = self
            .engine
            .run_battle(&mut self.player.party[..count], opponent, rules, self.rng);
        let names = [self.player.name.clone(), opponent.display_name()];
        for line in EventBus::format_all(&report.events, &names) {
            self.dialog.message(&line);
        }
        tracing::debug!(
            target: "frontier.session",
            opponent = %opponent.name,
            outcome = ?report.outcome,
            turns = report.turns,
            "battle finished"
        );
        report
    }

    /// Level opponents are built around for this session.
    pub fn baseline(&self, rule: LevelRule) -> u8 {
        level::baseline_with_floor(rule, &self.player, self.config.open_level_floor)
            .min(self.config.level_cap)
    }

    /// Battle Points and counters for a regular win.
    pub fn award_win(&mut self, counters: &mut SessionCounters) {
        let points = self.config.points_per_win;
        self.state.add_points(points);
        counters.wins += 1;
        counters.streak += 1;
        counters.bp_earned += points;
    }

    /// Ends the run: the session is lost and the facility streak starts over.
    pub fn record_loss(&mut self, facility: Facility, counters: &mut SessionCounters) {
        counters.lost = true;
        self.state.reset_streak(facility);
        self.say("You were defeated...");
        tracing::info!(
            target: "frontier.session",
            facility = facility.key(),
            wins = counters.wins,
            "challenge lost"
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub round: u32,
    pub battle: u32,
    /// Castle Points or Arcade points, depending on the facility.
    pub points: u32,
    /// Wins in a row this session.
    pub streak: u32,
    pub wins: u32,
    pub bp_earned: u32,
    pub quit: bool,
    pub lost: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CancelReason {
    Declined,
    Ineligible,
    /// The facility could not be set up.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChallengeOutcome {
    Cancelled(CancelReason),
    Lost,
    Quit,
    Completed { brain_defeated: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub facility: Facility,
    pub outcome: ChallengeOutcome,
    pub wins: u32,
    pub bp_earned: u32,
    pub frontier_streak: u32,
    pub battle_points: u32,
}

impl SessionSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub trait Challenge {
    fn facility(&self) -> Facility;

    fn counters(&self) -> &SessionCounters;

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome;
}

/// Run a challenge from start to teardown.
pub fn run_challenge(challenge: &mut dyn Challenge, ctx: &mut FrontierContext<'_>) -> SessionSummary {
    let facility = challenge.facility();
    let snapshot = ctx.player.party.clone();
    tracing::info!(target: "frontier.session", facility = facility.key(), "session started");

    let outcome = challenge.run(ctx);
    ctx.player.party = snapshot;

    if !matches!(outcome, ChallengeOutcome::Cancelled(_)) {
        ctx.say("Thank you for participating!");
    }

    let counters = challenge.counters();
    let summary = SessionSummary {
        facility,
        outcome,
        wins: counters.wins,
        bp_earned: counters.bp_earned,
        frontier_streak: ctx.state.streak(facility),
        battle_points: ctx.state.battle_points,
    };
    match summary.to_json() {
        Ok(json) => tracing::info!(target: "frontier.session", summary = %json, "session finished"),
        Err(err) => tracing::warn!(target: "frontier.session", %err, "could not render session summary"),
    }
    summary
}

/// The facility selection entry point.
pub fn start_facility(facility: Facility, ctx: &mut FrontierContext<'_>) -> SessionSummary {
    let mut challenge = crate::facilities::challenge_for(facility);
    run_challenge(challenge.as_mut(), ctx)
}

pub fn choose_level_rule(ctx: &mut FrontierContext<'_>) -> Result<LevelRule, CancelReason> {
    let fixed = LevelRule::Fixed(ctx.config.fixed_level);
    let options = vec![fixed.label(), LevelRule::Open.label(), "Cancel".to_string()];
    match ctx.dialog.choose("Choose a level rule.", &options) {
        Some(0) => Ok(fixed),
        Some(1) => Ok(LevelRule::Open),
        _ => {
            ctx.say(DECLINED);
            Err(CancelReason::Declined)
        }
    }
}

/// True when `chosen` plus members of `pool` can make a team of `count` that
/// keeps every clause.
fn completes_team(
    party: &[PokemonInst],
    chosen: &[usize],
    pool: &[usize],
    count: usize,
    clauses: &[TeamClause],
) -> bool {
    let team: Vec<&PokemonInst> = chosen.iter().map(|&i| &party[i]).collect();
    if clauses.iter().any(|clause| clause.violated_by(&team)) {
        return false;
    }
    if chosen.len() >= count {
        return true;
    }
    pool.iter().enumerate().any(|(n, &next)| {
        let mut extended = chosen.to_vec();
        extended.push(next);
        completes_team(party, &extended, &pool[n + 1..], count, clauses)
    })
}

/// Check eligibility and move the chosen entrants to the front of the party.
///
/// Members that would break a clause alongside the entrants already picked
/// are not offered. When exactly `count` members qualify they enter without
/// a prompt.
pub fn select_entrants(
    ctx: &mut FrontierContext<'_>,
    count: usize,
    min_level: u8,
    clauses: &[TeamClause],
) -> Result<(), CancelReason> {
    if !ctx.player.has_eligible(count, min_level) {
        ctx.say(NOT_ELIGIBLE);
        return Err(CancelReason::Ineligible);
    }
    let eligible: Vec<usize> = ctx
        .player
        .party
        .iter()
        .enumerate()
        .filter(|(_, p)| p.level >= min_level)
        .map(|(i, _)| i)
        .collect();
    if !completes_team(&ctx.player.party, &[], &eligible, count, clauses) {
        tracing::info!(target: "frontier.session", ?clauses, "no team keeps the clauses");
        ctx.say(NOT_ELIGIBLE);
        ctx.say(CLAUSE_BROKEN);
        return Err(CancelReason::Ineligible);
    }

    let chosen = if eligible.len() == count {
        eligible
    } else {
        let mut chosen: Vec<usize> = Vec::with_capacity(count);
        while chosen.len() < count {
            let remaining: Vec<usize> = eligible
                .iter()
                .copied()
                .filter(|i| !chosen.contains(i))
                .filter(|&i| {
                    let mut extended = chosen.clone();
                    extended.push(i);
                    let rest: Vec<usize> = eligible.iter().copied().filter(|j| !extended.contains(j)).collect();
                    completes_team(&ctx.player.party, &extended, &rest, count, clauses)
                })
                .collect();
            let options: Vec<String> = remaining
                .iter()
                .map(|&i| {
                    let pokemon = &ctx.player.party[i];
                    format!("{} Lv.{}", pokemon.name(), pokemon.level)
                })
                .collect();
            let prompt = format!("Choose entrant {} of {}.", chosen.len() + 1, count);
            match ctx.dialog.choose(&prompt, &options).and_then(|pick| remaining.get(pick)) {
                Some(&index) => chosen.push(index),
                None => {
                    ctx.say(DECLINED);
                    return Err(CancelReason::Declined);
                }
            }
        }
        chosen
    };

    let mut slots: Vec<Option<PokemonInst>> =
        std::mem::take(&mut ctx.player.party).into_iter().map(Some).collect();
    let mut party: Vec<PokemonInst> = chosen.iter().filter_map(|&i| slots[i].take()).collect();
    party.extend(slots.into_iter().flatten());
    ctx.player.party = party;
    Ok(())
}

/// Level rule, eligibility and entry. A fixed rule caps the entrants' levels.
pub fn configure(
    ctx: &mut FrontierContext<'_>,
    facility: Facility,
    entrants: usize,
    min_level: u8,
) -> Result<LevelRule, CancelReason> {
    let rule = choose_level_rule(ctx)?;
    select_entrants(ctx, entrants, min_level, facility.team_clauses())?;
    level::cap_entrants(rule, &mut ctx.player.party, entrants);
    tracing::info!(
        target: "frontier.session",
        facility = facility.key(),
        rule = %rule.label(),
        "challenge configured"
    );
    Ok(rule)
}

/// The Frontier Brain battle. A win pays the Brain bonus and, once the
/// facility streak has reached a threshold, its symbol.
pub fn fight_brain(
    ctx: &mut FrontierContext<'_>,
    facility: Facility,
    counters: &mut SessionCounters,
    entrants: usize,
    level: u8,
    rules: &BattleRules,
) -> bool {
    let mut brain = match RosterGenerator::brain(facility, level) {
        Ok(brain) => brain,
        Err(err) => {
            tracing::error!(target: "frontier.brain", facility = facility.key(), %err, "could not build brain roster");
            return false;
        }
    };
    ctx.say(format!("{}, the {}, appears!", facility.brain_name(), facility.brain_title()));

    let report = ctx.battle(entrants, &mut brain, rules);
    tracing::info!(
        target: "frontier.brain",
        facility = facility.key(),
        level,
        outcome = ?report.outcome,
        turns = report.turns,
        "brain battle finished"
    );
    if !report.is_win() {
        ctx.say(format!("{} was too strong...", facility.brain_name()));
        return false;
    }

    let bonus = match facility {
        Facility::Hall => ctx.config.hall_brain_bonus,
        _ => ctx.config.brain_bonus,
    };
    ctx.state.add_points(bonus);
    counters.bp_earned += bonus;
    ctx.say(format!("Congratulations! You've defeated {}!", facility.brain_name()));
    ctx.say(format!("You earned {} bonus BP!", bonus));

    if let Some(tier) = facility.symbol_for_streak(ctx.state.streak(facility)) {
        if ctx.state.award_symbol(facility, tier) {
            ctx.say(format!("You received the {} {} Symbol!", facility.name(), tier.name()));
            tracing::info!(target: "frontier.brain", facility = facility.key(), tier = tier.name(), "symbol awarded");
        }
    }
    true
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::battle::engine::ScriptedEngine;
    use crate::dialog::ScriptedDialog;

    /// Owns everything a [`FrontierContext`] borrows.
    pub struct Harness {
        pub state: FrontierState,
        pub dialog: ScriptedDialog,
        pub engine: ScriptedEngine,
        pub rng: FrontierRng,
        pub config: FrontierConfig,
        pub player: Player,
    }

    impl Harness {
        pub fn new(party: &[(&str, u8)]) -> Self {
            let party = party
                .iter()
                .map(|(name, level)| PokemonInst::from_name(name, *level).expect("species"))
                .collect();
            Harness {
                state: FrontierState::new(),
                dialog: ScriptedDialog::new(),
                engine: ScriptedEngine::new(),
                rng: FrontierRng::from_seed(7),
                config: FrontierConfig::default(),
                player: Player::new("Red", party),
            }
        }

        pub fn ctx(&mut self) -> FrontierContext<'_> {
            FrontierContext {
                state: &mut self.state,
                dialog: &mut self.dialog,
                engine: &mut self.engine,
                rng: &mut self.rng,
                config: &self.config,
                player: &mut self.player,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::battle::engine::BattleOutcome;
    use crate::dialog::ScriptedDialog;
    use pretty_assertions::assert_eq;
    use schema::Item;

    struct Bruiser {
        counters: SessionCounters,
    }

    impl Challenge for Bruiser {
        fn facility(&self) -> Facility {
            Facility::Tower
        }

        fn counters(&self) -> &SessionCounters {
            &self.counters
        }

        fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
            ctx.player.party[0].current_hp = 0;
            ctx.player.party.truncate(1);
            ctx.award_win(&mut self.counters);
            ChallengeOutcome::Completed { brain_defeated: false }
        }
    }

    #[test]
    fn test_run_challenge_restores_party() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Eevee", 40)]);
        let before = harness.player.party.clone();
        let mut challenge = Bruiser {
            counters: SessionCounters::default(),
        };
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(harness.player.party, before);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.bp_earned, 3);
        assert_eq!(harness.state.battle_points, 3);
        let json = summary.to_json().expect("json");
        assert!(json.contains("\"facility\":\"Tower\""));
    }

    #[test]
    fn test_cancel_choice_declines() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Eevee", 50), ("Lapras", 50)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(2)]);
        let result = configure(&mut harness.ctx(), Facility::Tower, 3, 1);
        assert_eq!(result, Err(CancelReason::Declined));
        assert!(harness.dialog.saw(DECLINED));
    }

    #[test]
    fn test_small_party_is_ineligible() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Eevee", 50)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0)]);
        let result = configure(&mut harness.ctx(), Facility::Tower, 3, 1);
        assert_eq!(result, Err(CancelReason::Ineligible));
        assert!(harness.dialog.saw(NOT_ELIGIBLE));
    }

    #[test]
    fn test_fixed_rule_caps_entrants_only() {
        let mut harness = Harness::new(&[("Pikachu", 70), ("Eevee", 60), ("Lapras", 55), ("Snorlax", 80)]);
        // Level 50, then pick Snorlax, Pikachu, Lapras.
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(3), Some(0), Some(1)]);
        let rule = configure(&mut harness.ctx(), Facility::Tower, 3, 1).expect("configured");
        assert_eq!(rule, LevelRule::Fixed(50));
        let party: Vec<(&str, u8)> = harness.player.party.iter().map(|p| (p.name(), p.level)).collect();
        assert_eq!(
            party,
            vec![("Snorlax", 50), ("Pikachu", 50), ("Lapras", 50), ("Eevee", 60)]
        );
    }

    #[test]
    fn test_open_baseline_uses_entrants() {
        let mut harness = Harness::new(&[("Pikachu", 62), ("Eevee", 62), ("Lapras", 62)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(1)]);
        let rule = configure(&mut harness.ctx(), Facility::Arena, 3, 1).expect("configured");
        assert_eq!(harness.ctx().baseline(rule), 62);
    }

    #[test]
    fn test_brain_win_pays_bonus_and_symbol() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Eevee", 50), ("Lapras", 50)]);
        for _ in 0..21 {
            harness.state.increment_streak(Facility::Tower);
        }
        let mut counters = SessionCounters::default();
        let won = fight_brain(&mut harness.ctx(), Facility::Tower, &mut counters, 3, 50, &BattleRules::single());
        assert!(won);
        assert_eq!(harness.state.battle_points, 10);
        assert!(harness.state.has_symbol(Facility::Tower, crate::frontier::SymbolTier::Silver));
        assert_eq!(harness.engine.battles[0].opponent, "Anabel");
    }

    #[test]
    fn test_brain_loss_pays_nothing() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Eevee", 50), ("Lapras", 50)]);
        harness.engine = crate::battle::engine::ScriptedEngine::with_outcomes([BattleOutcome::Loss]);
        let mut counters = SessionCounters::default();
        let won = fight_brain(&mut harness.ctx(), Facility::Hall, &mut counters, 1, 50, &BattleRules::single());
        assert!(!won);
        assert_eq!(harness.state.battle_points, 0);
        assert_eq!(harness.engine.battles[0].party_species, vec!["Pikachu".to_string()]);
    }

    #[test]
    fn test_duplicate_species_team_is_refused() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Pikachu", 50), ("Pikachu", 50)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0)]);
        let summary = start_facility(Facility::Tower, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Cancelled(CancelReason::Ineligible));
        assert!(harness.dialog.saw(CLAUSE_BROKEN));
        assert!(harness.engine.battles.is_empty());
    }

    #[test]
    fn test_shared_held_item_team_is_refused() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Eevee", 50), ("Lapras", 50)]);
        for pokemon in &mut harness.player.party {
            pokemon.held_item = Some(Item::Leftovers);
        }
        let result = select_entrants(&mut harness.ctx(), 3, 1, Facility::Tower.team_clauses());
        assert_eq!(result, Err(CancelReason::Ineligible));
    }

    #[test]
    fn test_clashing_members_are_not_offered() {
        let mut harness = Harness::new(&[("Pikachu", 50), ("Pikachu", 55), ("Eevee", 50), ("Lapras", 50)]);
        harness.player.party[2].held_item = Some(Item::Leftovers);
        harness.player.party[3].held_item = Some(Item::Leftovers);
        // Once a Pikachu is in, the other one is no longer offered.
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(0)]);
        select_entrants(&mut harness.ctx(), 2, 1, Facility::Dome.team_clauses()).expect("entered");
        let names: Vec<&str> = harness.player.party.iter().take(2).map(|p| p.name()).collect();
        assert_eq!(names, vec!["Pikachu", "Eevee"]);
        assert_eq!(harness.dialog.prompts.last().map(String::as_str), Some("Choose entrant 2 of 2."));
    }

    #[test]
    fn test_factory_ignores_clauses() {
        assert!(Facility::Factory.team_clauses().is_empty());
        assert_eq!(Facility::Pike.team_clauses(), &[TeamClause::Species, TeamClause::Item]);
    }
}
