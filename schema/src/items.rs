use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Every item the Frontier hands out, sells, or lets a Pokemon hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter)]
pub enum Item {
    // Berries
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

    // Battle items
    XAttack,
    XDefend,
    XSpAtk,
    XSpDef,
    XSpeed,
    XAccuracy,

    // Hold items
    FocusBand,
    FocusSash,
    Leftovers,
    ShellBell,
    KingsRock,
    QuickClaw,
    PowerHerb,
    Metronome,
    LightClay,
    GripClaw,
    BigRoot,
    ToxicOrb,
    FlameOrb,
    LightBall,
    ThickClub,
    WhiteHerb,
    BrightPowder,
    ScopeLens,
    WideLens,
    ZoomLens,
    ChoiceBand,
    ChoiceSpecs,
    ChoiceScarf,
    MuscleBand,
    WiseGlasses,
    ExpertBelt,
    LifeOrb,

    // Special
    AbilityCapsule,
    BottleCap,
    GoldBottleCap,

    // Medicine
    Potion,
    SuperPotion,
    HyperPotion,
    MaxPotion,
    FullRestore,
    FullHeal,
    Revive,
    MaxRevive,
    Ether,
    MaxEther,
    Elixir,
    MaxElixir,
}

impl Item {
    pub fn name(&self) -> &'static str {
        use Item::*;
        match self {
            CheriBerry => "Cheri Berry",
            ChestoBerry => "Chesto Berry",
            PechaBerry => "Pecha Berry",
            RawstBerry => "Rawst Berry",
            AspearBerry => "Aspear Berry",
            LeppaBerry => "Leppa Berry",
            OranBerry => "Oran Berry",
            PersimBerry => "Persim Berry",
            LumBerry => "Lum Berry",
            SitrusBerry => "Sitrus Berry",
            XAttack => "X Attack",
            XDefend => "X Defend",
            XSpAtk => "X Sp. Atk",
            XSpDef => "X Sp. Def",
            XSpeed => "X Speed",
            XAccuracy => "X Accuracy",
            FocusBand => "Focus Band",
            FocusSash => "Focus Sash",
            Leftovers => "Leftovers",
            ShellBell => "Shell Bell",
            KingsRock => "King's Rock",
            QuickClaw => "Quick Claw",
            PowerHerb => "Power Herb",
            Metronome => "Metronome",
            LightClay => "Light Clay",
            GripClaw => "Grip Claw",
            BigRoot => "Big Root",
            ToxicOrb => "Toxic Orb",
            FlameOrb => "Flame Orb",
            LightBall => "Light Ball",
            ThickClub => "Thick Club",
            WhiteHerb => "White Herb",
            BrightPowder => "Bright Powder",
            ScopeLens => "Scope Lens",
            WideLens => "Wide Lens",
            ZoomLens => "Zoom Lens",
            ChoiceBand => "Choice Band",
            ChoiceSpecs => "Choice Specs",
            ChoiceScarf => "Choice Scarf",
            MuscleBand => "Muscle Band",
            WiseGlasses => "Wise Glasses",
            ExpertBelt => "Expert Belt",
            LifeOrb => "Life Orb",
            AbilityCapsule => "Ability Capsule",
            BottleCap => "Bottle Cap",
            GoldBottleCap => "Gold Bottle Cap",
            Potion => "Potion",
            SuperPotion => "Super Potion",
            HyperPotion => "Hyper Potion",
            MaxPotion => "Max Potion",
            FullRestore => "Full Restore",
            FullHeal => "Full Heal",
            Revive => "Revive",
            MaxRevive => "Max Revive",
            Ether => "Ether",
            MaxEther => "Max Ether",
            Elixir => "Elixir",
            MaxElixir => "Max Elixir",
        }
    }

    pub fn is_berry(&self) -> bool {
        use Item::*;
        matches!(
            self,
            CheriBerry
                | ChestoBerry
                | PechaBerry
                | RawstBerry
                | AspearBerry
                | LeppaBerry
                | OranBerry
                | PersimBerry
                | LumBerry
                | SitrusBerry
        )
    }

    pub fn is_medicine(&self) -> bool {
        use Item::*;
        matches!(
            self,
            Potion
                | SuperPotion
                | HyperPotion
                | MaxPotion
                | FullRestore
                | FullHeal
                | Revive
                | MaxRevive
                | Ether
                | MaxEther
                | Elixir
                | MaxElixir
        )
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
