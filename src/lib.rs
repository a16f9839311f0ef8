//! Battle Frontier
//!
//! Ten post-game battle facilities, a Battle Point economy and the prize shop
//! that spends it. Facilities talk to the player through a [`Dialog`] and
//! hand battles to a [`BattleEngine`], so the whole frontier runs the same
//! way from a console, a test script or a game frontend.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod bracket;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod facilities;
pub mod frontier;
pub mod level;
pub mod moves;
pub mod player;
pub mod pokemon;
pub mod rng;
pub mod session;
pub mod species;
pub mod trainer;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{BaseStats, Item, MoveCategory, MoveEffect, MoveRecord, PokemonType, SpeciesRecord, Stat, StatusKind};

// --- From this crate's modules (`src/`) ---
pub use battle::{AutoBattle, BattleEngine, BattleOutcome, BattleReport, BattleRules};
pub use bracket::{Bracket, Participant};
pub use config::FrontierConfig;
pub use dialog::{Dialog, ScriptedDialog};
pub use facilities::prize_shop::{open_shop, PrizeItem};
pub use frontier::{BattleStyle, Facility, FrontierState, SymbolTier};
pub use level::LevelRule;
pub use player::Player;
pub use pokemon::{PokemonInst, StatusCondition};
pub use rng::FrontierRng;
pub use session::{run_challenge, start_facility, ChallengeOutcome, FrontierContext, SessionSummary};
pub use trainer::{Trainer, TrainerClass};

pub use errors::{BracketError, ConfigError, DataError, FrontierError, FrontierResult, SaveError};
