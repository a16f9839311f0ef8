//! Battle Factory: rental Pokemon only.
//!
//! The player picks three of six rentals and may trade one of them for one of
//! the beaten opponent's Pokemon after every win. The player's own party sits
//! out; the session restores it when the challenge ends.

use crate::battle::engine::BattleRules;
use crate::frontier::Facility;
use crate::level::LevelRule;
use crate::pokemon::PokemonInst;
use crate::session::{
    choose_level_rule, fight_brain, CancelReason, Challenge, ChallengeOutcome, FrontierContext, SessionCounters,
    DECLINED,
};
use crate::species::SpeciesFilter;
use crate::trainer::{RosterGenerator, Trainer, TrainerClass, MALE_NAMES};

pub const RENTAL_CHOICES: usize = 6;
pub const TEAM_SIZE: usize = 3;

#[derive(Debug, Default)]
pub struct FactoryChallenge {
    counters: SessionCounters,
}

fn rental_label(pokemon: &PokemonInst) -> String {
    let moves: Vec<&str> = pokemon.moves.iter().map(|m| m.name.as_str()).collect();
    format!("{} Lv.{} ({})", pokemon.name(), pokemon.level, moves.join(", "))
}

/// Fixed rules rent at the fixed level. Open rentals come at the level cap.
fn rental_level(ctx: &FrontierContext<'_>, rule: LevelRule) -> u8 {
    match rule {
        LevelRule::Fixed(level) => level,
        LevelRule::Open => ctx.config.level_cap,
    }
}

fn choose_rentals(
    ctx: &mut FrontierContext<'_>,
    mut rentals: Vec<PokemonInst>,
) -> Result<Vec<PokemonInst>, CancelReason> {
    let mut team = Vec::with_capacity(TEAM_SIZE);
    while team.len() < TEAM_SIZE {
        let options: Vec<String> = rentals.iter().map(rental_label).collect();
        let prompt = format!("Choose rental {} of {}.", team.len() + 1, TEAM_SIZE);
        match ctx.dialog.choose(&prompt, &options) {
            Some(index) if index < rentals.len() => team.push(rentals.remove(index)),
            _ => {
                ctx.say(DECLINED);
                return Err(CancelReason::Declined);
            }
        }
    }
    Ok(team)
}

/// Trade one of the player's rentals for one of `opponent`'s. Backing out of
/// either menu keeps the team as it is.
fn offer_swap(ctx: &mut FrontierContext<'_>, opponent: &Trainer) {
    if !ctx.dialog.confirm("Would you like to swap a Pokémon?") {
        return;
    }
    let yours: Vec<String> = ctx.player.party.iter().map(rental_label).collect();
    let Some(give) = ctx.dialog.choose("Which Pokémon will you give up?", &yours) else {
        return;
    };
    let theirs: Vec<String> = opponent.party.iter().map(rental_label).collect();
    let Some(take) = ctx.dialog.choose("Which Pokémon will you take?", &theirs) else {
        return;
    };
    let (Some(slot), Some(incoming)) = (ctx.player.party.get_mut(give), opponent.party.get(take)) else {
        return;
    };
    let mut incoming = incoming.clone();
    incoming.heal();
    let took = incoming.species.clone();
    let outgoing = std::mem::replace(slot, incoming);
    ctx.say(format!("You swapped {} for {}.", outgoing.name(), took));
    tracing::info!(target: "frontier.factory", gave = %outgoing.species, %took, "rental swapped");
}

impl Challenge for FactoryChallenge {
    fn facility(&self) -> Facility {
        Facility::Factory
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Factory;
        let rule = match choose_level_rule(ctx) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let level = rental_level(ctx, rule);
        let rentals = RosterGenerator::party(ctx.rng, level, RENTAL_CHOICES, &SpeciesFilter::any());
        let team = match choose_rentals(ctx, rentals) {
            Ok(team) => team,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        ctx.player.party = team;

        let rules = BattleRules::single();
        let total = ctx.config.battles_per_set;
        let mut brain_defeated = false;
        self.counters.round = 1;

        for battle in 1..=total {
            self.counters.battle = battle;
            ctx.say(format!("Battle {} of {}", battle, total));
            let name = ctx.rng.choose("scientist name", &MALE_NAMES).copied().unwrap_or("Paul");
            let mut opponent = RosterGenerator::trainer(
                ctx.rng,
                TrainerClass::Scientist,
                name,
                level,
                TEAM_SIZE,
                &SpeciesFilter::any(),
            );
            ctx.say(format!("{} wants to battle!", opponent.display_name()));

            let report = ctx.battle(TEAM_SIZE, &mut opponent, &rules);
            ctx.heal_entrants(TEAM_SIZE);
            if !report.is_win() {
                ctx.record_loss(facility, &mut self.counters);
                return ChallengeOutcome::Lost;
            }
            ctx.award_win(&mut self.counters);
            let streak = ctx.state.increment_streak(facility);
            ctx.say(format!("You won! Current streak: {}", streak));

            if ctx.state.can_face_brain(facility) {
                if !fight_brain(ctx, facility, &mut self.counters, TEAM_SIZE, level, &rules) {
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }
                brain_defeated = true;
                ctx.heal_entrants(TEAM_SIZE);
            }

            if battle < total {
                opponent.heal_party();
                offer_swap(ctx, &opponent);
            }
        }

        ChallengeOutcome::Completed { brain_defeated }
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
    fn test_rentals_replace_the_party_for_the_session() {
        let mut harness = Harness::new(&[("Pikachu", 12)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(0), Some(0), Some(0)]);
        let before = harness.player.party.clone();
        let mut challenge = FactoryChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: false });
        assert_eq!(harness.engine.battles.len(), 7);
        let first = &harness.engine.battles[0];
        assert_eq!(first.party_species.len(), 3);
        assert!(!first.party_species.contains(&"Pikachu".to_string()));
        assert_eq!(first.opponent_levels, vec![50, 50, 50]);
        assert_eq!(harness.player.party, before);
    }

    #[test]
    fn test_open_rentals_use_level_cap() {
        let mut harness = Harness::new(&[("Pikachu", 12)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(1), Some(0), Some(0), Some(0)]);
        let mut challenge = FactoryChallenge::default();
        run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(harness.engine.battles[0].opponent_levels, vec![100, 100, 100]);
    }

    #[test]
    fn test_swap_takes_opponent_pokemon() {
        let mut harness = Harness::new(&[("Pikachu", 12)]);
        harness.dialog = ScriptedDialog::new()
            .with_choices([Some(0), Some(0), Some(0), Some(0), Some(0), Some(1)])
            .with_confirms([true]);
        let mut challenge = FactoryChallenge::default();
        run_challenge(&mut challenge, &mut harness.ctx());
        let taken = harness.engine.battles[0].opponent_species[1].clone();
        assert_eq!(harness.engine.battles[1].party_species[0], taken);
    }

    #[test]
    fn test_backing_out_of_rentals_declines() {
        let mut harness = Harness::new(&[("Pikachu", 12)]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(2), None]);
        let mut challenge = FactoryChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Cancelled(CancelReason::Declined));
        assert!(harness.engine.battles.is_empty());
    }
}
