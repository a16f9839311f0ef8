//! One module per Battle Frontier facility, plus the prize shop.

pub mod arcade;
pub mod arena;
pub mod castle;
pub mod dome;
pub mod factory;
pub mod hall;
pub mod palace;
pub mod pike;
pub mod prize_shop;
pub mod pyramid;
pub mod tower;

use crate::frontier::Facility;
use crate::session::Challenge;

/// The challenge behind each entry of the facility menu.
pub fn challenge_for(facility: Facility) -> Box<dyn Challenge> {
    match facility {
        Facility::Tower => Box::new(tower::TowerChallenge::default()),
        Facility::Palace => Box::new(palace::PalaceChallenge::default()),
        Facility::Factory => Box::new(factory::FactoryChallenge::default()),
        Facility::Arena => Box::new(arena::ArenaChallenge::default()),
        Facility::Dome => Box::new(dome::DomeChallenge::default()),
        Facility::Pike => Box::new(pike::PikeChallenge::default()),
        Facility::Pyramid => Box::new(pyramid::PyramidChallenge::default()),
        Facility::Hall => Box::new(hall::HallChallenge::default()),
        Facility::Castle => Box::new(castle::CastleChallenge::default()),
        Facility::Arcade => Box::new(arcade::ArcadeChallenge::default()),
    }
}
