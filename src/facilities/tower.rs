//! Battle Tower: seven-battle sets against Cooltrainers at the session level.
//!
//! The set runner here is shared with the Battle Palace, which only differs
//! in its battle rules.

use crate::battle::engine::BattleRules;
use crate::frontier::Facility;
use crate::session::{
    configure, fight_brain, CancelReason, Challenge, ChallengeOutcome, FrontierContext, SessionCounters,
};
use crate::trainer::RosterGenerator;

pub const ENTRANTS: usize = 3;

#[derive(Debug, Default)]
pub struct TowerChallenge {
    counters: SessionCounters,
}

impl Challenge for TowerChallenge {
    fn facility(&self) -> Facility {
        Facility::Tower
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        run_set(ctx, Facility::Tower, &mut self.counters, BattleRules::single())
    }
}

/// Offer the facility's battle styles when it has more than one.
fn choose_style(
    ctx: &mut FrontierContext<'_>,
    facility: Facility,
    rules: BattleRules,
) -> Result<BattleRules, CancelReason> {
    let styles = facility.battle_styles();
    if styles.len() < 2 {
        return Ok(rules);
    }
    let options: Vec<String> = styles.iter().map(|s| s.label().to_string()).collect();
    match ctx.dialog.choose("Which battle style will you take on?", &options) {
        Some(index) => Ok(rules.with_style(styles[index.min(styles.len() - 1)])),
        None => {
            ctx.say(crate::session::DECLINED);
            Err(CancelReason::Declined)
        }
    }
}

/// One set of battles against random trainers. The Brain steps in as soon
/// as the frontier streak lands on one of its thresholds.
pub(crate) fn run_set(
    ctx: &mut FrontierContext<'_>,
    facility: Facility,
    counters: &mut SessionCounters,
    rules: BattleRules,
) -> ChallengeOutcome {
    let rule = match configure(ctx, facility, ENTRANTS, 1) {
        Ok(rule) => rule,
        Err(reason) => return ChallengeOutcome::Cancelled(reason),
    };
    let rules = match choose_style(ctx, facility, rules) {
        Ok(rules) => rules,
        Err(reason) => return ChallengeOutcome::Cancelled(reason),
    };
    let level = ctx.baseline(rule);
    let mut brain_defeated = false;
    counters.round = 1;

    for battle in 1..=ctx.config.battles_per_set {
        counters.battle = battle;
        ctx.say(format!("Battle {} of {}", battle, ctx.config.battles_per_set));
        let mut opponent = RosterGenerator::cooltrainer(ctx.rng, level, ENTRANTS);
        ctx.say(format!("{} wants to battle!", opponent.display_name()));

        let report = ctx.battle(ENTRANTS, &mut opponent, &rules);
        ctx.heal_entrants(ENTRANTS);
        if !report.is_win() {
            ctx.record_loss(facility, counters);
            return ChallengeOutcome::Lost;
        }

        ctx.award_win(counters);
        let streak = ctx.state.increment_streak(facility);
        ctx.say(format!("You won! Current streak: {}", streak));
        tracing::info!(target: "frontier.tower", facility = facility.key(), battle, streak, "battle won");

        if ctx.state.can_face_brain(facility) {
            if !fight_brain(ctx, facility, counters, ENTRANTS, level, &rules) {
                ctx.record_loss(facility, counters);
                return ChallengeOutcome::Lost;
            }
            brain_defeated = true;
            ctx.heal_entrants(ENTRANTS);
        }
    }

    ctx.say("You've cleared the set!");
    ChallengeOutcome::Completed { brain_defeated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::{BattleOutcome, ScriptedEngine};
    use crate::dialog::ScriptedDialog;
    use crate::frontier::{BattleStyle, SymbolTier};
    use crate::session::run_challenge;
    use crate::session::test_support::Harness;
    use pretty_assertions::assert_eq;

    fn harness() -> Harness {
        let mut harness = Harness::new(&[("Garchomp", 50), ("Lapras", 50), ("Metagross", 50)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(1)]);
        harness
    }

    #[test]
    fn test_full_set_pays_for_every_win() {
        let mut harness = harness();
        let mut challenge = TowerChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: false });
        assert_eq!(harness.state.streak(Facility::Tower), 7);
        assert_eq!(harness.state.battle_points, 21);
        assert_eq!(harness.engine.battles.len(), 7);
        for battle in &harness.engine.battles {
            assert_eq!(battle.opponent_levels, vec![50, 50, 50]);
            assert_eq!(battle.rules.style, BattleStyle::Double);
        }
    }

    #[test]
    fn test_loss_resets_streak() {
        let mut harness = harness();
        harness.state.increment_streak(Facility::Tower);
        harness.engine = ScriptedEngine::with_outcomes([BattleOutcome::Win, BattleOutcome::Win, BattleOutcome::Loss]);
        let mut challenge = TowerChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Lost);
        assert_eq!(summary.wins, 2);
        assert_eq!(harness.state.streak(Facility::Tower), 0);
        assert_eq!(harness.state.battle_points, 6);
        assert!(harness.dialog.saw("You were defeated..."));
        assert!(harness.player.party.iter().all(|p| p.is_full_hp()));
    }

    #[test]
    fn test_brain_appears_on_threshold() {
        let mut harness = harness();
        for _ in 0..14 {
            harness.state.increment_streak(Facility::Tower);
        }
        let mut challenge = TowerChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: true });
        assert_eq!(harness.engine.battles.len(), 8);
        assert_eq!(harness.engine.battles[7].opponent, "Anabel");
        assert_eq!(harness.state.battle_points, 31);
        assert!(harness.state.has_symbol(Facility::Tower, SymbolTier::Silver));
    }

    #[test]
    fn test_backing_out_of_style_menu_cancels() {
        let mut harness = harness();
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), None]);
        let mut challenge = TowerChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Cancelled(CancelReason::Declined));
        assert!(harness.engine.battles.is_empty());
        assert!(!harness.dialog.saw("Thank you for participating!"));
    }
}
