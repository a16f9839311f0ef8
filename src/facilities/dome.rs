//! Battle Dome: a sixteen-entrant single-elimination tournament.
//!
//! The player takes a random slot. Their matches go to the battle engine and
//! every other pairing is a coin flip. Winning the final brings out Tucker.

use crate::battle::engine::BattleRules;
use crate::battle::resolver::PlayerMatchResolver;
use crate::bracket::Bracket;
use crate::frontier::{BattleStyle, Facility};
use crate::session::{
    configure, fight_brain, CancelReason, Challenge, ChallengeOutcome, FrontierContext, SessionCounters,
};

pub const BRACKET_SIZE: usize = 16;
pub const ENTRANTS: usize = 3;

pub const SCOUTED_STYLES: [&str; 5] = ["Offensive", "Defensive", "Balanced", "Speed-based", "Tactical"];
pub const SCOUTED_FOCUS: [&str; 7] = [
    "Attack",
    "Defense",
    "Speed",
    "Special Attack",
    "Special Defense",
    "HP",
    "Mixed",
];

#[derive(Debug, Default)]
pub struct DomeChallenge {
    counters: SessionCounters,
}

fn dome_rules() -> BattleRules {
    BattleRules::single().with_style(BattleStyle::Double)
}

impl Challenge for DomeChallenge {
    fn facility(&self) -> Facility {
        Facility::Dome
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Dome;
        let rule = match configure(ctx, facility, ENTRANTS, 1) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let level = ctx.baseline(rule);
        let mut bracket = match Bracket::generate(BRACKET_SIZE, ctx.rng, level) {
            Ok(bracket) => bracket,
            Err(err) => {
                tracing::error!(target: "frontier.dome", %err, "could not build bracket");
                ctx.say("The tournament could not be organised.");
                return ChallengeOutcome::Cancelled(CancelReason::Unavailable);
            }
        };
        let player_slot = bracket.place_player(ctx.rng);
        let player_name = ctx.player.name.clone();
        tracing::info!(target: "frontier.dome", player_slot, level, "tournament drawn");
        ctx.say("Tournament Bracket");
        for &(a, b) in bracket.current_matches() {
            let left = bracket.participant(a).map(|p| p.display_name(&player_name)).unwrap_or_default();
            let right = bracket.participant(b).map(|p| p.display_name(&player_name)).unwrap_or_default();
            ctx.say(format!("{} VS {}", left, right));
        }

        let points = ctx.config.points_per_win;
        let player_lost = {
            let mut resolver =
                PlayerMatchResolver::new(&mut ctx.player.party[..ENTRANTS], &mut *ctx.engine, dome_rules());
            while let Some(index) = bracket.next_match_index() {
                let round = bracket.current_round();
                self.counters.round = round as u32 + 1;
                self.counters.battle = index as u32 + 1;
                if index == 0 {
                    ctx.dialog.message(&format!("Round {}", round + 1));
                }
                let (a, b) = bracket.current_matches()[index];
                let player_match = a == player_slot || b == player_slot;
                if player_match {
                    let style = ctx.rng.choose("scouted style", &SCOUTED_STYLES).copied().unwrap_or("Balanced");
                    let focus = ctx.rng.choose("scouted focus", &SCOUTED_FOCUS).copied().unwrap_or("Mixed");
                    ctx.dialog.message(&format!("Match {}", index + 1));
                    ctx.dialog.message(&format!("Your opponent's Battle Style: {}", style));
                    ctx.dialog.message(&format!("Your opponent's Training Focus: {}", focus));
                }

                let Some(result) = bracket.resolve_next_match(&mut resolver, ctx.rng) else {
                    break;
                };
                if player_match {
                    if result.winner == player_slot {
                        ctx.dialog.message("You won the match!");
                        ctx.state.add_points(points);
                        self.counters.wins += 1;
                        self.counters.streak += 1;
                        self.counters.bp_earned += points;
                    } else {
                        ctx.dialog.message("You lost the match...");
                        break;
                    }
                } else {
                    let winner = bracket
                        .participant(result.winner)
                        .map(|p| p.display_name(&player_name))
                        .unwrap_or_default();
                    ctx.dialog.message(&format!("{} won the match!", winner));
                }
            }
            resolver.player_lost
        };

        if player_lost {
            ctx.record_loss(facility, &mut self.counters);
            return ChallengeOutcome::Lost;
        }
        if bracket.winner() != Some(player_slot) {
            tracing::warn!(target: "frontier.dome", "bracket finished without the player winning");
            ctx.record_loss(facility, &mut self.counters);
            return ChallengeOutcome::Lost;
        }

        ctx.say("You won the tournament!");
        let streak = ctx.state.increment_streak(facility);
        tracing::info!(target: "frontier.dome", streak, wins = self.counters.wins, "tournament won");
        if !fight_brain(ctx, facility, &mut self.counters, ENTRANTS, level, &dome_rules()) {
            ctx.record_loss(facility, &mut self.counters);
            return ChallengeOutcome::Lost;
        }
        ChallengeOutcome::Completed { brain_defeated: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::{BattleOutcome, ScriptedEngine};
    use crate::dialog::ScriptedDialog;
    use crate::rng::FrontierRng;
    use crate::session::run_challenge;
    use crate::session::test_support::Harness;
    use pretty_assertions::assert_eq;

    fn harness() -> Harness {
        let mut harness = Harness::new(&[("Swampert", 50), ("Metagross", 50), ("Charizard", 50)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0)]);
        harness
    }

    #[test]
    fn test_first_round_loss_ends_without_brain() {
        let mut harness = harness();
        harness.rng = FrontierRng::new_for_test(vec![0]);
        harness.engine = ScriptedEngine::with_outcomes([BattleOutcome::Loss]);
        let mut challenge = DomeChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Lost);
        assert_eq!(harness.engine.battles.len(), 1);
        assert!(harness.engine.battles.iter().all(|b| b.opponent != "Tucker"));
        assert!(harness.dialog.saw("You lost the match..."));
        assert_eq!(harness.state.battle_points, 0);
    }

    #[test]
    fn test_winning_the_tournament_brings_out_tucker() {
        let mut harness = harness();
        let mut challenge = DomeChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: true });
        assert_eq!(harness.engine.battles.len(), 5);
        assert_eq!(harness.engine.battles[4].opponent, "Tucker");
        assert!(harness
            .engine
            .battles
            .iter()
            .all(|b| b.rules.style == BattleStyle::Double));
        assert_eq!(summary.wins, 4);
        assert_eq!(harness.state.battle_points, 4 * 3 + 10);
        assert_eq!(harness.state.streak(Facility::Dome), 1);
    }
}
