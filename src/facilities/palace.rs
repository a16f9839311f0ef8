//! Battle Palace: a Tower set where the Pokemon choose their own moves.

use crate::battle::engine::BattleRules;
use crate::facilities::tower::run_set;
use crate::frontier::Facility;
use crate::session::{Challenge, ChallengeOutcome, FrontierContext, SessionCounters};

#[derive(Debug, Default)]
pub struct PalaceChallenge {
    counters: SessionCounters,
}

impl Challenge for PalaceChallenge {
    fn facility(&self) -> Facility {
        Facility::Palace
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        ctx.say("Your Pokémon will act on their own here. Trust their nature!");
        run_set(ctx, Facility::Palace, &mut self.counters, BattleRules::palace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::ScriptedDialog;
    use crate::session::run_challenge;
    use crate::session::test_support::Harness;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_battle_uses_auto_commands() {
        let mut harness = Harness::new(&[("Arcanine", 60), ("Slaking", 60), ("Lapras", 60)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(1)]);
        let mut challenge = PalaceChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: false });
        assert_eq!(harness.engine.battles.len(), 7);
        assert!(harness.engine.battles.iter().all(|b| b.rules.auto_commands));
        assert!(harness.engine.battles.iter().all(|b| b.opponent_levels == vec![60, 60, 60]));
    }
}
