//! Level rules and the opponent level curve.

use crate::player::Player;
use crate::pokemon::PokemonInst;
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u8 = 100;
pub const DEFAULT_FIXED_LEVEL: u8 = 50;
pub const DEFAULT_OPEN_FLOOR: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelRule {
    /// Everyone fights at this level; entrants above it are capped.
    Fixed(u8),
    /// Opponents match the challenger's entrants.
    Open,
}

impl LevelRule {
    pub fn label(&self) -> String {
        match self {
            LevelRule::Fixed(level) => format!("Level {}", level),
            LevelRule::Open => "Open Level".to_string(),
        }
    }
}

/// Session baseline with the default open-level floor.
pub fn baseline(rule: LevelRule, player: &Player) -> u8 {
    baseline_with_floor(rule, player, DEFAULT_OPEN_FLOOR)
}

/// Fixed rules use their level. Open uses the floored average of the first
/// three party members, never below `open_floor`.
pub fn baseline_with_floor(rule: LevelRule, player: &Player, open_floor: u8) -> u8 {
    match rule {
        LevelRule::Fixed(level) => level.min(MAX_LEVEL),
        LevelRule::Open => player
            .average_level(3)
            .max(open_floor as u32)
            .min(MAX_LEVEL as u32) as u8,
    }
}

/// Opponent level for a 1-based round: two levels per round, capped at 100.
pub fn opponent_level(baseline: u8, round: u32) -> u8 {
    let bonus = 2 * round.saturating_sub(1);
    (baseline as u32 + bonus).min(MAX_LEVEL as u32) as u8
}

/// Lower the first `count` entrants to the fixed level. Open leaves them alone.
pub fn cap_entrants(rule: LevelRule, party: &mut [PokemonInst], count: usize) {
    if let LevelRule::Fixed(cap) = rule {
        for pokemon in party.iter_mut().take(count) {
            if pokemon.level > cap {
                pokemon.set_level(cap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn party(levels: &[u8]) -> Vec<PokemonInst> {
        levels
            .iter()
            .map(|&l| PokemonInst::from_name("Machop", l).expect("species"))
            .collect()
    }

    #[rstest]
    #[case(&[62, 62, 62], 62)]
    #[case(&[60, 61, 66], 62)]
    #[case(&[30, 40, 45], 50)]
    #[case(&[100, 100, 100, 5], 100)]
    fn test_open_baseline(#[case] levels: &[u8], #[case] expected: u8) {
        assert_eq!(baseline(LevelRule::Open, &Player::new("Red", party(levels))), expected);
    }

    #[test]
    fn test_fixed_baseline_ignores_party() {
        assert_eq!(baseline(LevelRule::Fixed(50), &Player::new("Red", party(&[90, 90, 90]))), 50);
    }

    #[rstest]
    #[case(50, 1, 50)]
    #[case(50, 2, 52)]
    #[case(50, 7, 62)]
    #[case(97, 3, 100)]
    #[case(100, 10, 100)]
    fn test_opponent_level(#[case] base: u8, #[case] round: u32, #[case] expected: u8) {
        assert_eq!(opponent_level(base, round), expected);
    }

    #[test]
    fn test_opponent_level_is_non_decreasing() {
        for base in [1u8, 50, 75, 99] {
            let levels: Vec<u8> = (1..=60).map(|r| opponent_level(base, r)).collect();
            assert!(levels.windows(2).all(|w| w[0] <= w[1]));
            assert!(levels.iter().all(|&l| l <= MAX_LEVEL));
        }
    }

    #[test]
    fn test_cap_entrants() {
        let mut members = party(&[70, 40, 80, 90]);
        cap_entrants(LevelRule::Fixed(50), &mut members, 3);
        let levels: Vec<u8> = members.iter().map(|p| p.level).collect();
        assert_eq!(levels, vec![50, 40, 50, 90]);
    }
}
