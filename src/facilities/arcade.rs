//! Battle Arcade: a roulette of events rewrites each battle before it starts.

use crate::battle::engine::{BattleRules, Weather};
use crate::frontier::Facility;
use crate::level::opponent_level;
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use crate::session::{configure, fight_brain, Challenge, ChallengeOutcome, FrontierContext, SessionCounters};
use crate::species::SpeciesFilter;
use crate::trainer::{RosterGenerator, TrainerClass, MALE_NAMES};
use schema::PokemonType;
use strum::{EnumIter, IntoEnumIterator};

pub const ENTRANTS: usize = 3;
pub const ROUNDS: u32 = 3;
pub const EVENTS_OFFERED: usize = 3;
const MAX_STAGE: i8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum EventSide {
    /// Works in the player's favour.
    Player,
    /// Works in the opponent's favour.
    Opponent,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ArcadeEvent {
    PlayerHpHalve,
    PlayerStatBoost,
    PlayerTypeChange,
    PlayerHeal,
    OpponentHpHalve,
    OpponentStatBoost,
    OpponentTypeChange,
    OpponentHeal,
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

impl ArcadeEvent {
    pub fn side(&self) -> EventSide {
        match self {
            ArcadeEvent::PlayerHpHalve
            | ArcadeEvent::PlayerStatBoost
            | ArcadeEvent::PlayerTypeChange
            | ArcadeEvent::PlayerHeal => EventSide::Player,
            ArcadeEvent::OpponentHpHalve
            | ArcadeEvent::OpponentStatBoost
            | ArcadeEvent::OpponentTypeChange
            | ArcadeEvent::OpponentHeal => EventSide::Opponent,
            ArcadeEvent::Sun | ArcadeEvent::Rain | ArcadeEvent::Sandstorm | ArcadeEvent::Hail => EventSide::Field,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ArcadeEvent::PlayerHpHalve => "Halve opponent's HP",
            ArcadeEvent::PlayerStatBoost => "Boost all stats",
            ArcadeEvent::PlayerTypeChange => "Change opponent's type",
            ArcadeEvent::PlayerHeal => "Restore HP",
            ArcadeEvent::OpponentHpHalve => "Halve your HP",
            ArcadeEvent::OpponentStatBoost => "Boost opponent's stats",
            ArcadeEvent::OpponentTypeChange => "Change your type",
            ArcadeEvent::OpponentHeal => "Restore opponent's HP",
            ArcadeEvent::Sun => "Set Sunny Day",
            ArcadeEvent::Rain => "Set Rain Dance",
            ArcadeEvent::Sandstorm => "Set Sandstorm",
            ArcadeEvent::Hail => "Set Hail",
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            ArcadeEvent::PlayerHpHalve | ArcadeEvent::OpponentHpHalve => 5,
            ArcadeEvent::PlayerTypeChange | ArcadeEvent::OpponentTypeChange => 4,
            ArcadeEvent::PlayerStatBoost | ArcadeEvent::OpponentStatBoost => 3,
            _ => 2,
        }
    }

    pub fn weather(&self) -> Option<Weather> {
        match self {
            ArcadeEvent::Sun => Some(Weather::Sun),
            ArcadeEvent::Rain => Some(Weather::Rain),
            ArcadeEvent::Sandstorm => Some(Weather::Sandstorm),
            ArcadeEvent::Hail => Some(Weather::Hail),
            _ => None,
        }
    }
}

/// Pick a side, then an event from that side.
pub fn roll_event(rng: &mut FrontierRng) -> ArcadeEvent {
    let sides: Vec<EventSide> = EventSide::iter().collect();
    let side = rng.choose("arcade side", &sides).copied().unwrap_or(EventSide::Field);
    let events: Vec<ArcadeEvent> = ArcadeEvent::iter().filter(|e| e.side() == side).collect();
    rng.choose("arcade event", &events).copied().unwrap_or(ArcadeEvent::Sun)
}

fn halve_hp(team: &mut [PokemonInst]) {
    for pokemon in team.iter_mut().filter(|p| !p.is_fainted()) {
        pokemon.current_hp = (pokemon.max_hp() / 2).max(1);
    }
}

fn max_stages(team: &mut [PokemonInst]) {
    for pokemon in team {
        pokemon.stat_stages = [MAX_STAGE; 5];
    }
}

fn retype(team: &mut [PokemonInst], rng: &mut FrontierRng) {
    let types: Vec<PokemonType> = PokemonType::iter().collect();
    for pokemon in team {
        let new_type = rng.choose("arcade type", &types).copied().unwrap_or(PokemonType::Normal);
        pokemon.type_override = Some(vec![new_type]);
    }
}

fn restore(team: &mut [PokemonInst]) {
    for pokemon in team.iter_mut().filter(|p| !p.is_fainted()) {
        pokemon.current_hp = pokemon.max_hp();
    }
}

/// Apply `event` to the upcoming battle. Weather lands in `rules`.
pub fn apply_event(
    event: ArcadeEvent,
    player: &mut [PokemonInst],
    opponent: &mut [PokemonInst],
    rules: &mut BattleRules,
    rng: &mut FrontierRng,
) {
    match event {
        ArcadeEvent::PlayerHpHalve => halve_hp(opponent),
        ArcadeEvent::PlayerStatBoost => max_stages(player),
        ArcadeEvent::PlayerTypeChange => retype(opponent, rng),
        ArcadeEvent::PlayerHeal => restore(player),
        ArcadeEvent::OpponentHpHalve => halve_hp(player),
        ArcadeEvent::OpponentStatBoost => max_stages(opponent),
        ArcadeEvent::OpponentTypeChange => retype(player, rng),
        ArcadeEvent::OpponentHeal => restore(opponent),
        ArcadeEvent::Sun | ArcadeEvent::Rain | ArcadeEvent::Sandstorm | ArcadeEvent::Hail => {
            rules.weather = event.weather();
        }
    }
}

#[derive(Debug, Default)]
pub struct ArcadeChallenge {
    counters: SessionCounters,
}

impl Challenge for ArcadeChallenge {
    fn facility(&self) -> Facility {
        Facility::Arcade
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Arcade;
        let rule = match configure(ctx, facility, ENTRANTS, 1) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let baseline = ctx.baseline(rule);

        for round in 1..=ROUNDS {
            self.counters.round = round;
            self.counters.points = ctx.config.arcade_starting_points;
            for battle in 1..=ctx.config.battles_per_set {
                self.counters.battle = battle;
                ctx.say(format!("Round {}", round));
                ctx.say(format!("Battle {}", battle));
                let name = ctx.rng.choose("arcade trainer name", &MALE_NAMES).copied().unwrap_or("Keith");
                let mut opponent = RosterGenerator::trainer(
                    ctx.rng,
                    TrainerClass::CooltrainerM,
                    name,
                    opponent_level(baseline, round),
                    ENTRANTS,
                    &SpeciesFilter::any(),
                );
                let mut rules = BattleRules::single();

                ctx.say(format!("Current Points: {}", self.counters.points));
                let offered: Vec<ArcadeEvent> = (0..EVENTS_OFFERED).map(|_| roll_event(ctx.rng)).collect();
                let mut options: Vec<String> = offered
                    .iter()
                    .map(|e| format!("{} ({} points)", e.description(), e.cost()))
                    .collect();
                options.push("Start Battle".to_string());
                options.push("Quit".to_string());

                loop {
                    let choice = ctx.dialog.choose("Choose an event or start battle:", &options);
                    match choice {
                        Some(index) if index < offered.len() => {
                            let event = offered[index];
                            if self.counters.points < event.cost() {
                                ctx.say("You don't have enough points!");
                                continue;
                            }
                            self.counters.points -= event.cost();
                            ctx.say(format!("You selected: {}", event.description()));
                            tracing::debug!(target: "frontier.arcade", event = ?event, points = self.counters.points, "event applied");
                            let count = ENTRANTS.min(ctx.player.party.len());
                            apply_event(
                                event,
                                &mut ctx.player.party[..count],
                                &mut opponent.party,
                                &mut rules,
                                ctx.rng,
                            );
                            break;
                        }
                        Some(index) if index == offered.len() => break,
                        Some(_) if !ctx.dialog.confirm("Would you like to quit the challenge?") => continue,
                        _ => {
                            ctx.say("You've decided to quit...");
                            self.counters.quit = true;
                            return ChallengeOutcome::Quit;
                        }
                    }
                }

                ctx.say(format!("{} wants to battle!", opponent.display_name()));
                let report = ctx.battle(ENTRANTS, &mut opponent, &rules);
                for pokemon in ctx.entrants(ENTRANTS) {
                    pokemon.stat_stages = [0; 5];
                    pokemon.type_override = None;
                }
                if !report.is_win() {
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }
                ctx.award_win(&mut self.counters);
                ctx.state.increment_streak(facility);
            }
        }

        ctx.say("You've reached the final battle!");
        if !fight_brain(ctx, facility, &mut self.counters, ENTRANTS, baseline, &BattleRules::single()) {
            ctx.record_loss(facility, &mut self.counters);
            return ChallengeOutcome::Lost;
        }
        ChallengeOutcome::Completed { brain_defeated: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::ScriptedDialog;
    use crate::session::run_challenge;
    use crate::session::test_support::Harness;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn team() -> Vec<PokemonInst> {
        ["Jolteon", "Vaporeon"]
            .iter()
            .map(|name| PokemonInst::from_name(name, 50).expect("species"))
            .collect()
    }

    #[rstest]
    #[case(EventSide::Player, 4)]
    #[case(EventSide::Opponent, 4)]
    #[case(EventSide::Field, 4)]
    fn test_event_tables(#[case] side: EventSide, #[case] count: usize) {
        assert_eq!(ArcadeEvent::iter().filter(|e| e.side() == side).count(), count);
    }

    #[test]
    fn test_roll_picks_side_then_event() {
        // Field side, third field event.
        let mut rng = FrontierRng::new_for_test(vec![2, 2]);
        assert_eq!(roll_event(&mut rng), ArcadeEvent::Sandstorm);
    }

    #[test]
    fn test_halve_targets_the_other_side() {
        let mut player = team();
        let mut opponent = team();
        let mut rules = BattleRules::single();
        let mut rng = FrontierRng::new_for_test(vec![]);
        apply_event(ArcadeEvent::PlayerHpHalve, &mut player, &mut opponent, &mut rules, &mut rng);
        assert!(player.iter().all(|p| p.is_full_hp()));
        assert!(opponent.iter().all(|p| p.current_hp == p.max_hp() / 2));
    }

    #[test]
    fn test_boost_and_retype() {
        let mut player = team();
        let mut opponent = team();
        let mut rules = BattleRules::single();
        let mut rng = FrontierRng::new_for_test(vec![13]);
        apply_event(ArcadeEvent::PlayerStatBoost, &mut player, &mut opponent, &mut rules, &mut rng);
        assert_eq!(player[0].stat_stages, [6; 5]);
        apply_event(ArcadeEvent::OpponentTypeChange, &mut player, &mut opponent, &mut rules, &mut rng);
        assert_eq!(player[1].current_types(), &[PokemonType::Ghost]);
        assert_eq!(opponent[0].stat_stages, [0; 5]);
    }

    #[test]
    fn test_field_event_sets_weather() {
        let mut rules = BattleRules::single();
        let mut rng = FrontierRng::new_for_test(vec![]);
        apply_event(ArcadeEvent::Rain, &mut team(), &mut team(), &mut rules, &mut rng);
        assert_eq!(rules.weather, Some(Weather::Rain));
    }

    #[test]
    fn test_weather_reaches_the_engine_and_boosts_clear() {
        let mut harness = Harness::new(&[("Jolteon", 50), ("Vaporeon", 50), ("Lapras", 50)]);
        // Every roll is 2: the Field side, then its third event.
        harness.rng = FrontierRng::new_for_test(vec![2]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(0)]);
        let mut challenge = ArcadeChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Quit);
        assert_eq!(harness.engine.battles.len(), 1);
        assert_eq!(harness.engine.battles[0].rules.weather, Some(Weather::Sandstorm));
        assert!(harness.dialog.saw("You selected: Set Sandstorm"));
        assert_eq!(challenge.counters.points, 3);
    }

    #[test]
    fn test_unaffordable_event_is_refused() {
        let mut harness = Harness::new(&[("Jolteon", 50), ("Vaporeon", 50), ("Lapras", 50)]);
        harness.config.arcade_starting_points = 1;
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(0)]);
        let mut challenge = ArcadeChallenge::default();
        run_challenge(&mut challenge, &mut harness.ctx());
        assert!(harness.dialog.saw("You don't have enough points!"));
        assert!(harness.engine.battles.is_empty());
        assert_eq!(challenge.counters.points, 1);
    }

    #[test]
    fn test_full_run_meets_dahlia() {
        let mut harness = Harness::new(&[("Jolteon", 50), ("Vaporeon", 50), ("Lapras", 50)]);
        let choices = std::iter::once(Some(0)).chain(std::iter::repeat(Some(EVENTS_OFFERED)).take(21));
        harness.dialog = ScriptedDialog::new().with_choices(choices);
        let mut challenge = ArcadeChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: true });
        assert_eq!(harness.engine.battles.len(), 22);
        assert_eq!(harness.engine.battles[21].opponent, "Dahlia");
        assert_eq!(harness.state.streak(Facility::Arcade), 21);
    }
}
