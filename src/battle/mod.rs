pub mod ai;
pub mod auto;
pub mod engine;
pub mod events;
pub mod resolver;

pub use auto::AutoBattle;
pub use engine::{BattleEngine, BattleOutcome, BattleReport, BattleRules, ScriptedEngine, Weather};
pub use events::{EventBus, FrontierEvent};
pub use resolver::{CoinFlip, MatchResolver, MatchSide, PlayerMatchResolver};
