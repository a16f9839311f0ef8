//! Battle Pyramid: climb seven dark floors without healing in between.
//!
//! Each floor hides two to four encounters in distinct directions, with stairs
//! in a free direction when one is left. Taking the stairs, or running out of
//! encounters, clears the floor.

use crate::battle::engine::BattleRules;
use crate::frontier::Facility;
use crate::level::opponent_level;
use crate::rng::FrontierRng;
use crate::session::{configure, fight_brain, Challenge, ChallengeOutcome, FrontierContext, SessionCounters};
use crate::species::SpeciesFilter;
use crate::trainer::{RosterGenerator, Trainer, TrainerClass, FEMALE_NAMES};
use schema::Item;
use std::collections::BTreeMap;
use strum::{EnumIter, IntoEnumIterator};

pub const ENTRANTS: usize = 3;
pub const FLOORS: u32 = 7;
pub const MIN_EVENTS: u32 = 2;
pub const MAX_EVENTS: u32 = 4;
pub const MENU: [&str; 4] = ["Look", "Move", "Bag", "Quit"];

pub const PYRAMID_ITEMS: [Item; 12] = [
    Item::Potion,
    Item::SuperPotion,
    Item::HyperPotion,
    Item::MaxPotion,
    Item::FullRestore,
    Item::FullHeal,
    Item::Revive,
    Item::MaxRevive,
    Item::Ether,
    Item::MaxEther,
    Item::Elixir,
    Item::MaxElixir,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyramidEvent {
    Item,
    Trainer,
    Wild,
    Stairs,
}

/// Encounters a floor can place before the stairs go down.
const PLACED_EVENTS: [PyramidEvent; 3] = [PyramidEvent::Item, PyramidEvent::Trainer, PyramidEvent::Wild];

impl PyramidEvent {
    pub fn hint(&self, direction: Direction) -> String {
        let direction = direction.name();
        match self {
            PyramidEvent::Item => format!("You see something shiny to the {}...", direction),
            PyramidEvent::Trainer => format!("You sense a trainer's presence to the {}...", direction),
            PyramidEvent::Wild => format!("You hear rustling in the darkness to the {}...", direction),
            PyramidEvent::Stairs => format!("You see stairs leading upward to the {}...", direction),
        }
    }
}

/// What is waiting in each direction of the current floor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorLayout {
    events: BTreeMap<Direction, PyramidEvent>,
}

impl FloorLayout {
    pub fn generate(rng: &mut FrontierRng) -> Self {
        let mut layout = FloorLayout::default();
        let count = rng.range_inclusive("pyramid event count", MIN_EVENTS, MAX_EVENTS);
        for _ in 0..count {
            let free = layout.free_directions();
            let Some(&direction) = rng.choose("pyramid event direction", &free) else {
                break;
            };
            let event = rng
                .choose("pyramid event", &PLACED_EVENTS)
                .copied()
                .unwrap_or(PyramidEvent::Item);
            layout.events.insert(direction, event);
        }
        let free = layout.free_directions();
        if let Some(&direction) = rng.choose("pyramid stairs", &free) {
            layout.events.insert(direction, PyramidEvent::Stairs);
        }
        layout
    }

    pub fn free_directions(&self) -> Vec<Direction> {
        Direction::iter().filter(|d| !self.events.contains_key(d)).collect()
    }

    pub fn event_at(&self, direction: Direction) -> Option<PyramidEvent> {
        self.events.get(&direction).copied()
    }

    /// Remove and return the encounter in `direction`.
    pub fn take(&mut self, direction: Direction) -> Option<PyramidEvent> {
        self.events.remove(&direction)
    }

    pub fn hints(&self) -> Vec<String> {
        self.events.iter().map(|(d, e)| e.hint(*d)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    FloorCleared,
    Lost,
}

#[derive(Debug, Default)]
pub struct PyramidChallenge {
    counters: SessionCounters,
    pub items_found: Vec<Item>,
    pub trainers_defeated: u32,
}

impl PyramidChallenge {
    /// Play out one encounter. `level` is the session baseline.
    pub fn resolve_event(
        &mut self,
        ctx: &mut FrontierContext<'_>,
        event: PyramidEvent,
        floor: u32,
        level: u8,
    ) -> EventResult {
        match event {
            PyramidEvent::Item => {
                let item = ctx.rng.choose("pyramid item", &PYRAMID_ITEMS).copied().unwrap_or(Item::Potion);
                ctx.player.add_item(item, 1);
                self.items_found.push(item);
                ctx.say(format!("You found a {}!", item.name()));
                EventResult::Continue
            }
            PyramidEvent::Trainer => {
                ctx.say("A trainer appears from the darkness!");
                let name = ctx.rng.choose("pyramid trainer name", &FEMALE_NAMES).copied().unwrap_or("Iris");
                let mut opponent = RosterGenerator::trainer(
                    ctx.rng,
                    TrainerClass::CooltrainerF,
                    name,
                    opponent_level(level, floor),
                    ENTRANTS,
                    &SpeciesFilter::any(),
                );
                let report = ctx.battle(ENTRANTS, &mut opponent, &BattleRules::single());
                if !report.is_win() {
                    return EventResult::Lost;
                }
                self.trainers_defeated += 1;
                ctx.award_win(&mut self.counters);
                EventResult::Continue
            }
            PyramidEvent::Wild => {
                ctx.say("A wild Pokémon attacks!");
                let Some(pokemon) = RosterGenerator::wild(ctx.rng, level) else {
                    return EventResult::Continue;
                };
                let mut wild = Trainer::new(pokemon.species.clone(), TrainerClass::Wild, vec![pokemon]);
                let report = ctx.battle(ENTRANTS, &mut wild, &BattleRules::single());
                if report.is_win() {
                    EventResult::Continue
                } else {
                    EventResult::Lost
                }
            }
            PyramidEvent::Stairs => {
                ctx.say("You've reached the stairs to the next floor!");
                EventResult::FloorCleared
            }
        }
    }

    /// Spend a medicine found on the way. The floor goes on either way.
    pub fn use_bag(&mut self, ctx: &mut FrontierContext<'_>) {
        let medicines = ctx.player.medicines();
        if medicines.is_empty() {
            ctx.say("There's nothing useful in your bag.");
            return;
        }
        let options: Vec<String> = medicines
            .iter()
            .map(|&item| format!("{} x{}", item.name(), ctx.player.item_count(item)))
            .collect();
        let Some(&item) = ctx.dialog.choose("Use which item?", &options).and_then(|i| medicines.get(i)) else {
            return;
        };
        let targets: Vec<String> = ctx
            .player
            .party
            .iter()
            .take(ENTRANTS)
            .map(|p| format!("{} ({}/{} HP)", p.name(), p.current_hp, p.max_hp()))
            .collect();
        let Some(member) = ctx.dialog.choose("Use it on which Pokémon?", &targets) else {
            return;
        };
        if ctx.player.use_medicine(item, member) {
            let name = ctx.player.party[member].name().to_string();
            ctx.say(format!("You used the {} on {}.", item.name(), name));
        } else {
            ctx.say("It won't have any effect.");
        }
    }

    /// Explore one floor until it is cleared, lost or abandoned.
    fn explore_floor(&mut self, ctx: &mut FrontierContext<'_>, floor: u32, level: u8) -> Option<EventResult> {
        let mut layout = FloorLayout::generate(ctx.rng);
        let menu: Vec<String> = MENU.iter().map(|m| m.to_string()).collect();
        let directions: Vec<String> = Direction::iter().map(|d| d.name().to_string()).collect();
        tracing::debug!(target: "frontier.pyramid", floor, events = layout.len(), "floor laid out");

        loop {
            match ctx.dialog.choose("What will you do?", &menu) {
                Some(0) => {
                    let hints = layout.hints();
                    if hints.is_empty() {
                        ctx.say("It's quiet... too quiet.");
                    }
                    for hint in hints {
                        ctx.say(hint);
                    }
                }
                Some(1) => {
                    let Some(index) = ctx.dialog.choose("Which way?", &directions) else {
                        continue;
                    };
                    let Some(direction) = Direction::iter().nth(index) else {
                        continue;
                    };
                    let Some(event) = layout.take(direction) else {
                        ctx.say("There's nothing in that direction.");
                        continue;
                    };
                    match self.resolve_event(ctx, event, floor, level) {
                        EventResult::Continue if layout.is_empty() => return Some(EventResult::FloorCleared),
                        EventResult::Continue => {}
                        result => return Some(result),
                    }
                }
                Some(2) => self.use_bag(ctx),
                Some(_) => {
                    if ctx.dialog.confirm("Would you like to quit the challenge?") {
                        ctx.say("You've decided to quit...");
                        return None;
                    }
                }
                None => return None,
            }
        }
    }
}

impl Challenge for PyramidChallenge {
    fn facility(&self) -> Facility {
        Facility::Pyramid
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Pyramid;
        let rule = match configure(ctx, facility, ENTRANTS, 1) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let level = ctx.baseline(rule);
        ctx.say("Be careful - your Pokémon won't be healed between floors!");

        for floor in 1..=FLOORS {
            self.counters.round = floor;
            ctx.say(format!("Floor {}", floor));
            match self.explore_floor(ctx, floor, level) {
                None => {
                    self.counters.quit = true;
                    ctx.say(format!("You reached floor {}!", floor));
                    return ChallengeOutcome::Quit;
                }
                Some(EventResult::Lost) => {
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }
                Some(_) => {
                    ctx.state.increment_streak(facility);
                    ctx.say(format!("Floor {} complete!", floor));
                }
            }
        }

        ctx.say("You've reached the top of the pyramid!");
        tracing::info!(
            target: "frontier.pyramid",
            items = self.items_found.len(),
            trainers = self.trainers_defeated,
            "pyramid climbed"
        );
        if !fight_brain(ctx, facility, &mut self.counters, ENTRANTS, level, &BattleRules::single()) {
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
    use crate::session::run_challenge;
    use crate::session::test_support::Harness;
    use pretty_assertions::assert_eq;

    fn harness() -> Harness {
        Harness::new(&[("Regirock", 50), ("Regice", 50), ("Registeel", 50)])
    }

    #[test]
    fn test_layouts_use_distinct_directions() {
        for seed in 0..30 {
            let mut rng = FrontierRng::from_seed(seed);
            let layout = FloorLayout::generate(&mut rng);
            let placed = Direction::iter()
                .filter_map(|d| layout.event_at(d))
                .filter(|e| *e != PyramidEvent::Stairs)
                .count();
            let stairs = Direction::iter()
                .filter(|d| layout.event_at(*d) == Some(PyramidEvent::Stairs))
                .count();
            assert!((2..=4).contains(&placed));
            assert_eq!(stairs, if placed < 4 { 1 } else { 0 });
        }
    }

    #[test]
    fn test_trainers_climb_two_levels_per_floor() {
        let mut harness = harness();
        let mut challenge = PyramidChallenge::default();
        let result = challenge.resolve_event(&mut harness.ctx(), PyramidEvent::Trainer, 3, 50);
        assert_eq!(result, EventResult::Continue);
        assert_eq!(harness.engine.battles[0].opponent_levels, vec![54, 54, 54]);
        assert_eq!(challenge.trainers_defeated, 1);
        assert_eq!(harness.state.battle_points, 3);
    }

    #[test]
    fn test_wild_loss_ends_the_run() {
        let mut harness = harness();
        harness.engine = ScriptedEngine::with_outcomes([BattleOutcome::Loss]);
        let mut challenge = PyramidChallenge::default();
        let result = challenge.resolve_event(&mut harness.ctx(), PyramidEvent::Wild, 5, 50);
        assert_eq!(result, EventResult::Lost);
        assert_eq!(harness.engine.battles[0].opponent_levels, vec![50]);
    }

    #[test]
    fn test_items_go_to_the_bag() {
        let mut harness = harness();
        harness.rng = FrontierRng::new_for_test(vec![6]);
        let mut challenge = PyramidChallenge::default();
        challenge.resolve_event(&mut harness.ctx(), PyramidEvent::Item, 1, 50);
        assert_eq!(harness.player.item_count(Item::Revive), 1);
        assert_eq!(challenge.items_found, vec![Item::Revive]);
    }

    #[test]
    fn test_bag_medicine_heals_between_encounters() {
        let mut harness = harness();
        harness.player.add_item(Item::Revive, 1);
        harness.player.add_item(Item::SuperPotion, 1);
        harness.player.party[1].take_damage(u16::MAX);
        // Super Potion on a fainted Regice does nothing; the Revive works.
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(1), Some(1), Some(1)]);
        let mut challenge = PyramidChallenge::default();
        challenge.use_bag(&mut harness.ctx());
        challenge.use_bag(&mut harness.ctx());
        assert!(harness.dialog.saw("It won't have any effect."));
        assert!(harness.dialog.saw("You used the Revive on Regice."));
        assert!(!harness.player.party[1].is_fainted());
        assert_eq!(harness.player.item_count(Item::SuperPotion), 1);
        assert_eq!(harness.player.item_count(Item::Revive), 0);
    }

    #[test]
    fn test_empty_bag_is_reported() {
        let mut harness = harness();
        PyramidChallenge::default().use_bag(&mut harness.ctx());
        assert!(harness.dialog.saw("There's nothing useful in your bag."));
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let mut harness = harness();
        harness.dialog = ScriptedDialog::new()
            .with_choices([Some(0), Some(0), Some(3), Some(3)])
            .with_confirms([false, true]);
        let mut challenge = PyramidChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Quit);
        assert!(harness.dialog.saw("You've decided to quit..."));
        assert!(harness.engine.battles.is_empty());
    }

    #[test]
    fn test_climbing_seven_floors_reaches_brandon() {
        let mut harness = harness();
        let moves = (0..40).flat_map(|i| [Some(1), Some(i % 4)]);
        harness.dialog = ScriptedDialog::new().with_choices(std::iter::once(Some(0)).chain(moves));
        let mut challenge = PyramidChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: true });
        assert_eq!(harness.state.streak(Facility::Pyramid), 7);
        assert_eq!(harness.engine.battles.last().map(|b| b.opponent.as_str()), Some("Brandon"));
    }
}
