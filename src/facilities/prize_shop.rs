//! The Exchange Service Corner: Battle Points for items.

use crate::frontier::FrontierState;
use crate::player::Player;
use crate::session::FrontierContext;
use schema::Item;
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum PrizeItem {
    CheriBerry,
    ChestoBerry,
    PechaBerry,
    RawstBerry,
    AspearBerry,
    LeppaBerry,
    OranBerry,
    PersimBerry,
    LumBerry,
    SitrusBerry,
    XAttack,
    XDefend,
    XSpAtk,
    XSpDef,
    XSpeed,
    XAccuracy,
    FocusBand,
    FocusSash,
    Leftovers,
    ShellBell,
    AbilityCapsule,
    BottleCap,
    GoldBottleCap,
}

impl PrizeItem {
    pub fn item(&self) -> Item {
        match self {
            PrizeItem::CheriBerry => Item::CheriBerry,
            PrizeItem::ChestoBerry => Item::ChestoBerry,
            PrizeItem::PechaBerry => Item::PechaBerry,
            PrizeItem::RawstBerry => Item::RawstBerry,
            PrizeItem::AspearBerry => Item::AspearBerry,
            PrizeItem::LeppaBerry => Item::LeppaBerry,
            PrizeItem::OranBerry => Item::OranBerry,
            PrizeItem::PersimBerry => Item::PersimBerry,
            PrizeItem::LumBerry => Item::LumBerry,
            PrizeItem::SitrusBerry => Item::SitrusBerry,
            PrizeItem::XAttack => Item::XAttack,
            PrizeItem::XDefend => Item::XDefend,
            PrizeItem::XSpAtk => Item::XSpAtk,
            PrizeItem::XSpDef => Item::XSpDef,
            PrizeItem::XSpeed => Item::XSpeed,
            PrizeItem::XAccuracy => Item::XAccuracy,
            PrizeItem::FocusBand => Item::FocusBand,
            PrizeItem::FocusSash => Item::FocusSash,
            PrizeItem::Leftovers => Item::Leftovers,
            PrizeItem::ShellBell => Item::ShellBell,
            PrizeItem::AbilityCapsule => Item::AbilityCapsule,
            PrizeItem::BottleCap => Item::BottleCap,
            PrizeItem::GoldBottleCap => Item::GoldBottleCap,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            PrizeItem::LumBerry | PrizeItem::SitrusBerry => 4,
            PrizeItem::XAttack
            | PrizeItem::XDefend
            | PrizeItem::XSpAtk
            | PrizeItem::XSpDef
            | PrizeItem::XSpeed
            | PrizeItem::XAccuracy => 3,
            PrizeItem::FocusBand | PrizeItem::FocusSash | PrizeItem::Leftovers | PrizeItem::ShellBell => 48,
            PrizeItem::AbilityCapsule => 200,
            PrizeItem::BottleCap => 25,
            PrizeItem::GoldBottleCap => 150,
            _ => 2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PrizeItem::CheriBerry => "Cures paralysis.",
            PrizeItem::ChestoBerry => "Cures sleep.",
            PrizeItem::PechaBerry => "Cures poison.",
            PrizeItem::RawstBerry => "Cures burn.",
            PrizeItem::AspearBerry => "Cures freeze.",
            PrizeItem::LeppaBerry => "Restores 10 PP.",
            PrizeItem::OranBerry => "Restores 10 HP.",
            PrizeItem::PersimBerry => "Cures confusion.",
            PrizeItem::LumBerry => "Cures any status condition.",
            PrizeItem::SitrusBerry => "Restores 30 HP.",
            PrizeItem::XAttack => "Raises Attack.",
            PrizeItem::XDefend => "Raises Defense.",
            PrizeItem::XSpAtk => "Raises Sp. Atk.",
            PrizeItem::XSpDef => "Raises Sp. Def.",
            PrizeItem::XSpeed => "Raises Speed.",
            PrizeItem::XAccuracy => "Raises accuracy.",
            PrizeItem::FocusBand => "May prevent fainting.",
            PrizeItem::FocusSash => "Prevents fainting from full HP.",
            PrizeItem::Leftovers => "Restores HP gradually.",
            PrizeItem::ShellBell => "Restores HP when attacking.",
            PrizeItem::AbilityCapsule => "Changes ability.",
            PrizeItem::BottleCap => "Maximizes one IV.",
            PrizeItem::GoldBottleCap => "Maximizes all IVs.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseResult {
    Purchased { item: Item, cost: u32 },
    InsufficientPoints { cost: u32, available: u32 },
}

/// Spend BP on `prize` and put it in the bag. Nothing changes when the
/// player can't afford it.
pub fn purchase(state: &mut FrontierState, player: &mut Player, prize: PrizeItem) -> PurchaseResult {
    let cost = prize.cost();
    if !state.spend_points(cost) {
        return PurchaseResult::InsufficientPoints {
            cost,
            available: state.battle_points,
        };
    }
    player.add_item(prize.item(), 1);
    tracing::info!(target: "frontier.shop", item = prize.item().name(), cost, remaining = state.battle_points, "prize bought");
    PurchaseResult::Purchased {
        item: prize.item(),
        cost,
    }
}

/// Browse and buy until the player backs out.
pub fn open_shop(ctx: &mut FrontierContext<'_>) {
    let prizes: Vec<PrizeItem> = PrizeItem::iter().collect();
    let mut options: Vec<String> = prizes
        .iter()
        .map(|p| format!("{} ({} BP)", p.item().name(), p.cost()))
        .collect();
    options.push("Cancel".to_string());

    loop {
        ctx.say(format!("You have {} BP.", ctx.state.battle_points));
        let Some(&prize) = ctx
            .dialog
            .choose("Select an item to buy:", &options)
            .and_then(|i| prizes.get(i))
        else {
            return;
        };
        if !ctx.state.can_afford(prize.cost()) {
            ctx.say("You don't have enough BP!");
            continue;
        }
        ctx.say(prize.description());
        let question = format!("Buy {} for {} BP?", prize.item().name(), prize.cost());
        if !ctx.dialog.confirm(&question) {
            continue;
        }
        if let PurchaseResult::Purchased { item, .. } = purchase(ctx.state, ctx.player, prize) {
            ctx.say(format!("You bought {}!", item.name()));
        }
    }
}
