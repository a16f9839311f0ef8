//! Battle Castle: spend Castle Points on advantages before each battle.
//!
//! CP resets at the start of every round and is earned back per win from how
//! well the entrants came through. The party is never healed for free.

use crate::battle::engine::BattleRules;
use crate::frontier::Facility;
use crate::level::{opponent_level, MAX_LEVEL};
use crate::pokemon::PokemonInst;
use crate::session::{configure, fight_brain, Challenge, ChallengeOutcome, FrontierContext, SessionCounters};
use crate::species::SpeciesFilter;
use crate::trainer::{RosterGenerator, Trainer, TrainerClass, FEMALE_NAMES};
use schema::Item;
use strum::{EnumIter, IntoEnumIterator};

pub const ENTRANTS: usize = 3;
pub const ROUNDS: u32 = 3;
pub const MAX_SCORE: u32 = 50;
pub const LEVEL_SHIFT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum CastleService {
    Examine,
    LevelUp,
    LevelDown,
    Strength,
    HpRecovery,
    Pass,
    Move,
    PpRecovery,
}

impl CastleService {
    pub fn name(&self) -> &'static str {
        match self {
            CastleService::Examine => "Examine",
            CastleService::LevelUp => "+5 Level",
            CastleService::LevelDown => "-5 Level",
            CastleService::Strength => "Strength/Stats",
            CastleService::HpRecovery => "HP Recovery",
            CastleService::Pass => "Pass",
            CastleService::Move => "Move",
            CastleService::PpRecovery => "PP Recovery",
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            CastleService::Examine | CastleService::LevelUp => 1,
            CastleService::LevelDown => 15,
            CastleService::Strength => 2,
            CastleService::HpRecovery => 10,
            CastleService::Pass => 50,
            CastleService::Move => 5,
            CastleService::PpRecovery => 8,
        }
    }

    /// Item rank needed before the service shows up.
    pub fn rank(&self) -> u8 {
        match self {
            CastleService::Move | CastleService::PpRecovery => 2,
            _ => 1,
        }
    }
}

/// Hold items and berries for rent: (item, CP, item rank).
pub const CASTLE_ITEMS: [(Item, u32, u8); 35] = [
    (Item::CheriBerry, 2, 1),
    (Item::ChestoBerry, 2, 1),
    (Item::PechaBerry, 2, 1),
    (Item::RawstBerry, 2, 1),
    (Item::AspearBerry, 2, 1),
    (Item::PersimBerry, 2, 1),
    (Item::LumBerry, 5, 1),
    (Item::SitrusBerry, 5, 1),
    (Item::KingsRock, 10, 2),
    (Item::QuickClaw, 15, 2),
    (Item::PowerHerb, 5, 2),
    (Item::ShellBell, 15, 2),
    (Item::Metronome, 10, 2),
    (Item::LightClay, 10, 2),
    (Item::GripClaw, 10, 2),
    (Item::BigRoot, 10, 2),
    (Item::ToxicOrb, 10, 2),
    (Item::FlameOrb, 10, 2),
    (Item::LightBall, 15, 2),
    (Item::ThickClub, 15, 2),
    (Item::WhiteHerb, 5, 3),
    (Item::FocusBand, 15, 3),
    (Item::FocusSash, 10, 3),
    (Item::Leftovers, 20, 3),
    (Item::BrightPowder, 20, 3),
    (Item::ScopeLens, 20, 3),
    (Item::WideLens, 20, 3),
    (Item::ZoomLens, 20, 3),
    (Item::ChoiceBand, 20, 3),
    (Item::ChoiceSpecs, 20, 3),
    (Item::ChoiceScarf, 20, 3),
    (Item::MuscleBand, 20, 3),
    (Item::WiseGlasses, 20, 3),
    (Item::ExpertBelt, 20, 3),
    (Item::LifeOrb, 20, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleAdvantage {
    Service(CastleService),
    Item { item: Item, cost: u32 },
}

impl CastleAdvantage {
    pub fn name(&self) -> &'static str {
        match self {
            CastleAdvantage::Service(service) => service.name(),
            CastleAdvantage::Item { item, .. } => item.name(),
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            CastleAdvantage::Service(service) => service.cost(),
            CastleAdvantage::Item { cost, .. } => *cost,
        }
    }
}

/// Everything on offer at the given item rank, services first.
pub fn advantages(item_rank: u8) -> Vec<CastleAdvantage> {
    let services = CastleService::iter()
        .filter(|s| s.rank() <= item_rank)
        .map(CastleAdvantage::Service);
    let items = CASTLE_ITEMS
        .iter()
        .filter(|(_, _, rank)| *rank <= item_rank)
        .map(|&(item, cost, _)| CastleAdvantage::Item { item, cost });
    services.chain(items).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum RankTrack {
    Recovery,
    Item,
    Info,
}

impl RankTrack {
    pub fn name(&self) -> &'static str {
        match self {
            RankTrack::Recovery => "Recovery",
            RankTrack::Item => "Items",
            RankTrack::Info => "Info",
        }
    }

    /// CP to move up from `current`, or None at the top.
    pub fn next_cost(&self, current: u8) -> Option<u32> {
        match (self, current) {
            (RankTrack::Recovery, 1 | 2) => Some(100),
            (RankTrack::Item, 1) => Some(100),
            (RankTrack::Item, 2) => Some(150),
            (RankTrack::Info, 1) => Some(50),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRanks {
    pub recovery: u8,
    pub item: u8,
    pub info: u8,
}

impl Default for CastleRanks {
    fn default() -> Self {
        CastleRanks {
            recovery: 1,
            item: 1,
            info: 1,
        }
    }
}

impl CastleRanks {
    pub fn get(&self, track: RankTrack) -> u8 {
        match track {
            RankTrack::Recovery => self.recovery,
            RankTrack::Item => self.item,
            RankTrack::Info => self.info,
        }
    }

    fn raise(&mut self, track: RankTrack) -> u8 {
        let rank = match track {
            RankTrack::Recovery => &mut self.recovery,
            RankTrack::Item => &mut self.item,
            RankTrack::Info => &mut self.info,
        };
        *rank += 1;
        *rank
    }
}

/// CP earned for a win, capped at 50.
pub fn castle_score(entrants: &[PokemonInst], opponents: &[PokemonInst], baseline: u8) -> u32 {
    let mut score = 0;
    for pokemon in entrants {
        let half = pokemon.max_hp() / 2;
        if !pokemon.is_fainted() {
            score += 3;
        }
        score += if pokemon.is_full_hp() {
            3
        } else if pokemon.current_hp >= half {
            2
        } else {
            1
        };
        if pokemon.status.is_none() {
            score += 1;
        }
    }
    score += match entrants.iter().map(|p| p.pp_used()).sum::<u32>() {
        0..=5 => 8,
        6..=10 => 6,
        11..=15 => 4,
        _ => 0,
    };
    let strong = baseline as u32 + LEVEL_SHIFT as u32;
    score += 7 * opponents.iter().filter(|p| p.level as u32 >= strong).count() as u32;
    score.min(MAX_SCORE)
}

enum MenuChoice {
    Fight,
    Passed,
    Quit,
}

#[derive(Debug, Default)]
pub struct CastleChallenge {
    counters: SessionCounters,
    pub ranks: CastleRanks,
}

impl CastleChallenge {
    fn describe_opponent(&self, ctx: &mut FrontierContext<'_>, opponent: &Trainer, service: CastleService) {
        match service {
            CastleService::Examine => {
                ctx.say("Opponent's Pokémon:");
                for pokemon in &opponent.party {
                    ctx.say(format!("{} (Level {})", pokemon.name(), pokemon.level));
                    if self.ranks.info >= 2 {
                        if let Some(item) = pokemon.held_item {
                            ctx.say(format!("  holding {}", item.name()));
                        }
                    }
                }
            }
            CastleService::Strength => {
                ctx.say("Opponent's Pokémon Stats:");
                for pokemon in &opponent.party {
                    let s = pokemon.curr_stats;
                    ctx.say(format!(
                        "{}: HP {}, Atk {}, Def {}, Spd {}, Sp.Atk {}, Sp.Def {}",
                        pokemon.name(),
                        s[0],
                        s[1],
                        s[2],
                        s[5],
                        s[3],
                        s[4]
                    ));
                }
            }
            CastleService::Move => {
                ctx.say("Opponent's Pokémon Moves:");
                for pokemon in &opponent.party {
                    ctx.say(format!("{}:", pokemon.name()));
                    for slot in &pokemon.moves {
                        ctx.say(format!("- {}", slot.name));
                    }
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, ctx: &mut FrontierContext<'_>, opponent: &mut Trainer, service: CastleService) -> Option<MenuChoice> {
        match service {
            CastleService::Examine | CastleService::Strength | CastleService::Move => {
                self.describe_opponent(ctx, opponent, service);
            }
            CastleService::LevelUp => {
                for pokemon in &mut opponent.party {
                    pokemon.set_level(pokemon.level.saturating_add(LEVEL_SHIFT).min(MAX_LEVEL));
                }
                ctx.say("The opponent's Pokémon grew stronger!");
            }
            CastleService::LevelDown => {
                for pokemon in &mut opponent.party {
                    pokemon.set_level(pokemon.level.saturating_sub(LEVEL_SHIFT).max(1));
                }
                ctx.say("The opponent's Pokémon grew weaker!");
            }
            CastleService::HpRecovery => {
                let rank = self.ranks.recovery;
                for pokemon in ctx.entrants(ENTRANTS) {
                    pokemon.current_hp = pokemon.max_hp();
                    if rank >= 2 {
                        pokemon.restore_all_pp();
                    }
                    if rank >= 3 {
                        pokemon.cure_status();
                    }
                }
                ctx.say("Your Pokémon recovered!");
            }
            CastleService::PpRecovery => {
                for pokemon in ctx.entrants(ENTRANTS) {
                    pokemon.restore_all_pp();
                }
                ctx.say("Your Pokémon's PP was restored!");
            }
            CastleService::Pass => return Some(MenuChoice::Passed),
        }
        None
    }

    fn pay(&mut self, ctx: &mut FrontierContext<'_>, advantage: CastleAdvantage) {
        let cost = advantage.cost();
        self.counters.points -= cost;
        ctx.say(format!("You bought {} for {} CP!", advantage.name(), cost));
        tracing::debug!(target: "frontier.castle", advantage = advantage.name(), cost, "advantage bought");
    }

    /// Entrant that will hold `item`: the first with empty hands, otherwise
    /// the player picks whose item to replace. None backs out of the purchase.
    fn item_holder(&self, ctx: &mut FrontierContext<'_>, item: Item) -> Option<usize> {
        let entrants = ctx.entrants(ENTRANTS);
        if let Some(free) = entrants.iter().position(|p| p.held_item.is_none()) {
            return Some(free);
        }
        let options: Vec<String> = entrants
            .iter()
            .map(|p| {
                let held = p.held_item.map(|i| i.name()).unwrap_or("nothing");
                format!("{} (holding {})", p.name(), held)
            })
            .collect();
        let prompt = format!("Which Pokémon should hold the {}?", item.name());
        ctx.dialog.choose(&prompt, &options).filter(|&i| i < options.len())
    }

    /// Shop until the player starts the battle, passes or quits.
    fn advantage_menu(&mut self, ctx: &mut FrontierContext<'_>, opponent: &mut Trainer) -> MenuChoice {
        loop {
            let offered = advantages(self.ranks.item);
            let tracks: Vec<(RankTrack, u32)> = RankTrack::iter()
                .filter_map(|t| t.next_cost(self.ranks.get(t)).map(|cost| (t, cost)))
                .collect();
            let mut options: Vec<String> = offered
                .iter()
                .map(|a| format!("{} ({} CP)", a.name(), a.cost()))
                .collect();
            options.extend(tracks.iter().map(|(t, cost)| format!("Rank Up {} ({} CP)", t.name(), cost)));
            options.push("Start Battle".to_string());
            options.push("Quit".to_string());

            let prompt = format!("Choose an advantage (You have {} CP):", self.counters.points);
            let Some(index) = ctx.dialog.choose(&prompt, &options) else {
                return MenuChoice::Quit;
            };

            if let Some(&advantage) = offered.get(index) {
                let cost = advantage.cost();
                if self.counters.points < cost {
                    ctx.say("You don't have enough CP!");
                    continue;
                }
                match advantage {
                    CastleAdvantage::Service(service) => {
                        self.pay(ctx, advantage);
                        if let Some(choice) = self.apply(ctx, opponent, service) {
                            return choice;
                        }
                    }
                    CastleAdvantage::Item { item, .. } => {
                        let Some(slot) = self.item_holder(ctx, item) else {
                            continue;
                        };
                        self.pay(ctx, advantage);
                        if let Some(pokemon) = ctx.entrants(ENTRANTS).get_mut(slot) {
                            pokemon.held_item = Some(item);
                            let name = pokemon.name().to_string();
                            ctx.say(format!("{} is now holding the {}!", name, item.name()));
                        }
                    }
                }
            } else if let Some(&(track, cost)) = tracks.get(index - offered.len()) {
                if self.counters.points < cost {
                    ctx.say("You don't have enough CP!");
                    continue;
                }
                self.counters.points -= cost;
                let rank = self.ranks.raise(track);
                ctx.say(format!("{} rank increased to {}!", track.name(), rank));
            } else if index == offered.len() + tracks.len() {
                return MenuChoice::Fight;
            } else if ctx.dialog.confirm("Would you like to quit the challenge?") {
                ctx.say("You've decided to quit...");
                return MenuChoice::Quit;
            }
        }
    }
}

impl Challenge for CastleChallenge {
    fn facility(&self) -> Facility {
        Facility::Castle
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Castle;
        let rule = match configure(ctx, facility, ENTRANTS, 1) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let baseline = ctx.baseline(rule);
        let rules = BattleRules::single();

        for round in 1..=ROUNDS {
            self.counters.round = round;
            self.counters.points = ctx.config.castle_starting_points;
            for battle in 1..=ctx.config.battles_per_set {
                self.counters.battle = battle;
                ctx.say(format!("Round {}", round));
                ctx.say(format!("Battle {}", battle));
                let name = ctx.rng.choose("castle trainer name", &FEMALE_NAMES).copied().unwrap_or("Alice");
                let mut opponent = RosterGenerator::trainer(
                    ctx.rng,
                    TrainerClass::CooltrainerF,
                    name,
                    opponent_level(baseline, round),
                    ENTRANTS,
                    &SpeciesFilter::any(),
                );

                match self.advantage_menu(ctx, &mut opponent) {
                    MenuChoice::Quit => {
                        self.counters.quit = true;
                        return ChallengeOutcome::Quit;
                    }
                    MenuChoice::Passed => {
                        ctx.say(format!("You passed on the battle against {}.", opponent.display_name()));
                        ctx.award_win(&mut self.counters);
                        ctx.state.increment_streak(facility);
                        continue;
                    }
                    MenuChoice::Fight => {}
                }

                ctx.say(format!("{} wants to battle!", opponent.display_name()));
                let report = ctx.battle(ENTRANTS, &mut opponent, &rules);
                if !report.is_win() {
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }
                ctx.award_win(&mut self.counters);
                ctx.state.increment_streak(facility);
                let earned = castle_score(ctx.entrants(ENTRANTS), &opponent.party, baseline);
                self.counters.points += earned;
                ctx.say(format!("You earned {} Castle Points!", earned));
                tracing::debug!(target: "frontier.castle", round, battle, earned, cp = self.counters.points, "castle battle won");
            }
        }

        ctx.say("You've reached the final battle!");
        if !fight_brain(ctx, facility, &mut self.counters, ENTRANTS, baseline, &rules) {
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
    use crate::pokemon::StatusCondition;
    use crate::session::run_challenge;
    use crate::session::test_support::Harness;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const START: usize = 14 + 3;

    fn team(level: u8) -> Vec<PokemonInst> {
        ["Gengar", "Snorlax", "Starmie"]
            .iter()
            .map(|name| PokemonInst::from_name(name, level).expect("species"))
            .collect()
    }

    fn harness() -> Harness {
        Harness::new(&[("Gengar", 50), ("Snorlax", 50), ("Starmie", 50)])
    }

    #[test]
    fn test_untouched_team_scores_pp_bonus() {
        // 3 standing, 3 at full HP, 3 without status, no PP spent.
        assert_eq!(castle_score(&team(50), &team(50), 50), 9 + 9 + 3 + 8);
    }

    #[test]
    fn test_spent_pp_lowers_bonus() {
        let mut entrants = team(50);
        for slot in entrants[0].moves.iter_mut().take(2) {
            slot.pp -= 4;
        }
        assert_eq!(castle_score(&entrants, &team(50), 50), 9 + 9 + 3 + 6);
    }

    #[test]
    fn test_score_caps_at_fifty() {
        assert_eq!(castle_score(&team(50), &team(55), 50), MAX_SCORE);
    }

    #[test]
    fn test_battered_team_stays_in_range() {
        let mut entrants = team(50);
        entrants[0].current_hp = 0;
        let hp = entrants[1].max_hp() / 2;
        entrants[1].take_damage(hp);
        entrants[2].take_damage(1);
        entrants[2].status = Some(StatusCondition::Burn);
        for pokemon in &mut entrants {
            for slot in &mut pokemon.moves {
                slot.pp = 0;
            }
        }
        // Fainted: 1 + 1. Half HP: 3 + 2 + 1. Chipped and burned: 3 + 2. No PP bonus.
        let score = castle_score(&entrants, &team(50), 50);
        assert_eq!(score, 1 + 1 + 3 + 2 + 1 + 3 + 2);
        assert!(score <= MAX_SCORE);
    }

    #[rstest]
    #[case(1, 14)]
    #[case(2, 28)]
    #[case(3, 43)]
    fn test_item_rank_unlocks_advantages(#[case] rank: u8, #[case] count: usize) {
        assert_eq!(advantages(rank).len(), count);
    }

    #[test]
    fn test_rank_up_costs() {
        assert_eq!(RankTrack::Recovery.next_cost(2), Some(100));
        assert_eq!(RankTrack::Item.next_cost(2), Some(150));
        assert_eq!(RankTrack::Info.next_cost(2), None);
        assert_eq!(RankTrack::Item.next_cost(3), None);
    }

    #[test]
    fn test_level_up_purchase_feeds_score() {
        let mut harness = harness();
        // Level 50, then "+5 Level", then start.
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(1), Some(START)]);
        let mut challenge = CastleChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Quit);
        assert_eq!(harness.engine.battles[0].opponent_levels, vec![55, 55, 55]);
        assert!(harness.dialog.saw("You earned 50 Castle Points!"));
        assert_eq!(challenge.counters.points, 10 - 1 + 50);
    }

    #[test]
    fn test_cannot_overspend() {
        let mut harness = harness();
        // Pass costs 50 with only 10 CP on hand.
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(5)]);
        let mut challenge = CastleChallenge::default();
        run_challenge(&mut challenge, &mut harness.ctx());
        assert!(harness.dialog.saw("You don't have enough CP!"));
        assert_eq!(challenge.counters.points, 10);
        assert!(harness.engine.battles.is_empty());
    }

    #[test]
    fn test_pass_counts_as_win_without_battle() {
        let mut harness = harness();
        harness.config.castle_starting_points = 60;
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(5)]);
        let mut challenge = CastleChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert!(harness.engine.battles.is_empty());
        assert_eq!(summary.wins, 1);
        assert_eq!(harness.state.battle_points, 3);
        assert_eq!(challenge.counters.points, 10);
    }

    #[test]
    fn test_berry_goes_to_first_free_holder() {
        let mut harness = harness();
        harness.player.party[0].held_item = Some(Item::Leftovers);
        // Sitrus Berry is the last rank-1 entry.
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(13)]);
        let mut challenge = CastleChallenge::default();
        let mut ctx = harness.ctx();
        let rule = configure(&mut ctx, Facility::Castle, ENTRANTS, 1).expect("rule");
        assert_eq!(rule, crate::level::LevelRule::Fixed(50));
        challenge.counters.points = 10;
        let mut opponent = Trainer::new("Alice", TrainerClass::CooltrainerF, team(50));
        let choice = challenge.advantage_menu(&mut ctx, &mut opponent);
        assert!(matches!(choice, MenuChoice::Quit));
        assert_eq!(harness.player.party[1].held_item, Some(Item::SitrusBerry));
        assert_eq!(challenge.counters.points, 5);
    }

    fn full_hands(harness: &mut Harness) {
        let held = [Item::Leftovers, Item::ScopeLens, Item::QuickClaw];
        for (pokemon, item) in harness.player.party.iter_mut().zip(held) {
            pokemon.held_item = Some(item);
        }
    }

    #[test]
    fn test_full_hands_ask_who_takes_the_item() {
        let mut harness = harness();
        full_hands(&mut harness);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(13), Some(2)]);
        let mut challenge = CastleChallenge::default();
        let mut ctx = harness.ctx();
        configure(&mut ctx, Facility::Castle, ENTRANTS, 1).expect("rule");
        challenge.counters.points = 10;
        let mut opponent = Trainer::new("Alice", TrainerClass::CooltrainerF, team(50));
        challenge.advantage_menu(&mut ctx, &mut opponent);
        assert_eq!(harness.player.party[0].held_item, Some(Item::Leftovers));
        assert_eq!(harness.player.party[2].held_item, Some(Item::SitrusBerry));
        assert_eq!(challenge.counters.points, 5);
    }

    #[test]
    fn test_backing_out_of_holder_keeps_cp() {
        let mut harness = harness();
        full_hands(&mut harness);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(13), None]);
        let mut challenge = CastleChallenge::default();
        let mut ctx = harness.ctx();
        configure(&mut ctx, Facility::Castle, ENTRANTS, 1).expect("rule");
        challenge.counters.points = 10;
        let mut opponent = Trainer::new("Alice", TrainerClass::CooltrainerF, team(50));
        challenge.advantage_menu(&mut ctx, &mut opponent);
        assert_eq!(challenge.counters.points, 10);
        let held: Vec<Option<Item>> = harness.player.party.iter().map(|p| p.held_item).collect();
        assert_eq!(held, vec![Some(Item::Leftovers), Some(Item::ScopeLens), Some(Item::QuickClaw)]);
    }

    #[test]
    fn test_full_run_meets_darach() {
        let mut harness = harness();
        let choices = std::iter::once(Some(0)).chain(std::iter::repeat(Some(START)).take(21));
        harness.dialog = ScriptedDialog::new().with_choices(choices);
        let mut challenge = CastleChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Completed { brain_defeated: true });
        assert_eq!(harness.engine.battles.len(), 22);
        assert_eq!(harness.engine.battles[7].opponent_levels, vec![52, 52, 52]);
        assert_eq!(harness.engine.battles[21].opponent, "Darach");
    }

    #[test]
    fn test_loss_ends_run() {
        let mut harness = harness();
        harness.engine = ScriptedEngine::with_outcomes([BattleOutcome::Loss]);
        harness.dialog = ScriptedDialog::new().with_choices([Some(0), Some(START)]);
        let mut challenge = CastleChallenge::default();
        let summary = run_challenge(&mut challenge, &mut harness.ctx());
        assert_eq!(summary.outcome, ChallengeOutcome::Lost);
    }
}
