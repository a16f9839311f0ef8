//! Battle Pike: pick one of three doors, deal with whatever is behind it.
//!
//! Nothing is healed between rooms unless a healing room turns up. Clearing
//! the 28th room brings out Lucy.

use crate::battle::engine::BattleRules;
use crate::frontier::{BattleStyle, Facility};
use crate::level::MAX_LEVEL;
use crate::pokemon::StatusCondition;
use crate::session::{configure, fight_brain, Challenge, ChallengeOutcome, FrontierContext, SessionCounters};
use crate::species::SpeciesFilter;
use crate::trainer::{RosterGenerator, TrainerClass, FEMALE_NAMES};
use schema::Item;
use strum::{EnumIter, IntoEnumIterator};

pub const ENTRANTS: usize = 3;
pub const ROOMS_TO_BRAIN: u32 = 28;
pub const TOUGH_TRAINER_BONUS: u8 = 5;
pub const DOORS: [&str; 3] = ["Left Room", "Center Room", "Right Room"];
pub const ROOM_ITEMS: [Item; 4] = [Item::Potion, Item::SuperPotion, Item::FullHeal, Item::Revive];

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum PikeRoom {
    Battle,
    DoubleBattle,
    Status,
    Heal,
    Item,
    ToughTrainer,
}

impl PikeRoom {
    pub fn opponent_count(&self) -> usize {
        match self {
            PikeRoom::DoubleBattle => 4,
            PikeRoom::Battle | PikeRoom::ToughTrainer => 3,
            PikeRoom::Status | PikeRoom::Heal | PikeRoom::Item => 0,
        }
    }

    pub fn level_bonus(&self) -> u8 {
        match self {
            PikeRoom::ToughTrainer => TOUGH_TRAINER_BONUS,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomResult {
    Cleared,
    Lost,
}

#[derive(Debug, Default)]
pub struct PikeChallenge {
    counters: SessionCounters,
}

fn status_message(status: StatusCondition) -> &'static str {
    match status {
        StatusCondition::Sleep(_) => "fell asleep!",
        StatusCondition::Poison => "was poisoned!",
        StatusCondition::Burn => "was burned!",
        StatusCondition::Paralysis => "was paralyzed!",
        StatusCondition::Freeze => "was frozen solid!",
    }
}

impl PikeChallenge {
    fn room_battle(&mut self, ctx: &mut FrontierContext<'_>, room: PikeRoom, level: u8) -> RoomResult {
        let level = (level as u32 + room.level_bonus() as u32).min(MAX_LEVEL as u32) as u8;
        let name = ctx.rng.choose("pike trainer name", &FEMALE_NAMES).copied().unwrap_or("Alice");
        let mut opponent = RosterGenerator::trainer(
            ctx.rng,
            TrainerClass::CooltrainerF,
            name,
            level,
            room.opponent_count(),
            &SpeciesFilter::any(),
        );
        let rules = match room {
            PikeRoom::DoubleBattle => BattleRules::single().with_style(BattleStyle::Double),
            _ => BattleRules::single(),
        };
        ctx.say(format!("{} wants to battle!", opponent.display_name()));
        let report = ctx.battle(ENTRANTS, &mut opponent, &rules);
        if !report.is_win() {
            return RoomResult::Lost;
        }
        ctx.award_win(&mut self.counters);
        RoomResult::Cleared
    }

    /// Resolve whatever waits behind the chosen door.
    pub fn enter_room(&mut self, ctx: &mut FrontierContext<'_>, room: PikeRoom, level: u8) -> RoomResult {
        tracing::debug!(target: "frontier.pike", room = ?room, "room entered");
        match room {
            PikeRoom::Battle | PikeRoom::DoubleBattle => self.room_battle(ctx, room, level),
            PikeRoom::ToughTrainer => {
                ctx.say("A strong trainer appears!");
                self.room_battle(ctx, room, level)
            }
            PikeRoom::Status => {
                ctx.say("This room is filled with a strange atmosphere...");
                let standing: Vec<usize> = ctx
                    .entrants(ENTRANTS)
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.is_fainted())
                    .map(|(i, _)| i)
                    .collect();
                let Some(&target) = ctx.rng.choose("pike status target", &standing) else {
                    return RoomResult::Cleared;
                };
                let status = match ctx.rng.below("pike status", 5) {
                    0 => StatusCondition::Sleep(ctx.rng.range_inclusive("sleep turns", 1, 3) as u8),
                    1 => StatusCondition::Poison,
                    2 => StatusCondition::Burn,
                    3 => StatusCondition::Paralysis,
                    _ => StatusCondition::Freeze,
                };
                let pokemon = &mut ctx.player.party[target];
                let name = pokemon.name().to_string();
                if pokemon.apply_status(status) {
                    ctx.say(format!("{} {}", name, status_message(status)));
                } else {
                    ctx.say("But nothing happened.");
                }
                RoomResult::Cleared
            }
            PikeRoom::Heal => {
                ctx.say("You found a healing room!");
                ctx.heal_entrants(ENTRANTS);
                ctx.say("Your Pokémon were fully healed!");
                RoomResult::Cleared
            }
            PikeRoom::Item => {
                let item = ctx.rng.choose("pike item", &ROOM_ITEMS).copied().unwrap_or(Item::Potion);
                ctx.player.add_item(item, 1);
                ctx.say(format!("You found a {}!", item.name()));
                RoomResult::Cleared
            }
        }
    }
}

impl Challenge for PikeChallenge {
    fn facility(&self) -> Facility {
        Facility::Pike
    }

    fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    fn run(&mut self, ctx: &mut FrontierContext<'_>) -> ChallengeOutcome {
        let facility = Facility::Pike;
        let rule = match configure(ctx, facility, ENTRANTS, 1) {
            Ok(rule) => rule,
            Err(reason) => return ChallengeOutcome::Cancelled(reason),
        };
        let level = ctx.baseline(rule);
        let rooms: Vec<PikeRoom> = PikeRoom::iter().collect();
        let doors: Vec<String> = DOORS.iter().map(|d| d.to_string()).collect();
        let mut rooms_cleared = 0;

        loop {
            if ctx.dialog.choose("Choose your next room:", &doors).is_none() {
                self.counters.quit = true;
                ctx.say(format!("You cleared {} rooms!", rooms_cleared));
                return ChallengeOutcome::Quit;
            }
            let room = ctx.rng.choose("pike room", &rooms).copied().unwrap_or(PikeRoom::Heal);
            self.counters.battle = rooms_cleared + 1;
            if self.enter_room(ctx, room, level) == RoomResult::Lost {
                ctx.record_loss(facility, &mut self.counters);
                return ChallengeOutcome::Lost;
            }
            rooms_cleared += 1;
            ctx.state.increment_streak(facility);

            if rooms_cleared == ROOMS_TO_BRAIN {
                ctx.say(format!("Incredible! You've cleared {} rooms!", ROOMS_TO_BRAIN));
                if !fight_brain(ctx, facility, &mut self.counters, ENTRANTS, level, &BattleRules::single()) {
                    ctx.record_loss(facility, &mut self.counters);
                    return ChallengeOutcome::Lost;
                }
                return ChallengeOutcome::Completed { brain_defeated: true };
            }
            ctx.say(format!("Rooms cleared: {}/{}", rooms_cleared, ROOMS_TO_BRAIN));
        }
    }
}
