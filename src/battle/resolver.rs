//! Turning a bracket pairing into a winner.

use crate::battle::engine::{BattleEngine, BattleOutcome, BattleReport, BattleRules};
use crate::bracket::Participant;
use crate::pokemon::PokemonInst;
use crate::rng::FrontierRng;
use crate::trainer::Trainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    First,
    Second,
}

/// Decides who wins a pairing. The bracket never looks past this seam.
pub trait MatchResolver {
    fn resolve(
        &mut self,
        first: &mut Participant,
        second: &mut Participant,
        rng: &mut FrontierRng,
    ) -> MatchSide;
}

/// Synthetic result: a fair coin, nothing else consulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoinFlip;

impl MatchResolver for CoinFlip {
    fn resolve(
        &mut self,
        _first: &mut Participant,
        _second: &mut Participant,
        rng: &mut FrontierRng,
    ) -> MatchSide {
        if rng.coin_flip("match coin flip") {
            MatchSide::First
        } else {
            MatchSide::Second
        }
    }
}

/// Sends the player's matches to the battle engine and coin-flips the rest.
///
/// Anything other than a win counts as a loss for the player. The player's
/// entrants are healed after every match they take part in.
pub struct PlayerMatchResolver<'a> {
    party: &'a mut [PokemonInst],
    engine: &'a mut dyn BattleEngine,
    rules: BattleRules,
    pub player_lost: bool,
    pub player_wins: u32,
    pub last_report: Option<BattleReport>,
}

impl<'a> PlayerMatchResolver<'a> {
    pub fn new(party: &'a mut [PokemonInst], engine: &'a mut dyn BattleEngine, rules: BattleRules) -> Self {
        PlayerMatchResolver {
            party,
            engine,
            rules,
            player_lost: false,
            player_wins: 0,
            last_report: None,
        }
    }

    fn player_battle(&mut self, opponent: &mut Trainer, rng: &mut FrontierRng) -> bool {
        let report = self.engine.run_battle(self.party, opponent, &self.rules, rng);
        let won = report.outcome == BattleOutcome::Win;
        tracing::debug!(
            target: "frontier.dome",
            opponent = %opponent.name,
            outcome = ?report.outcome,
            "player match resolved"
        );
        for pokemon in self.party.iter_mut() {
            pokemon.heal();
        }
        opponent.heal_party();
        if won {
            self.player_wins += 1;
        } else {
            self.player_lost = true;
        }
        self.last_report = Some(report);
        won
    }
}

impl MatchResolver for PlayerMatchResolver<'_> {
    fn resolve(
        &mut self,
        first: &mut Participant,
        second: &mut Participant,
        rng: &mut FrontierRng,
    ) -> MatchSide {
        match (first, second) {
            (Participant::Player, Participant::Opponent(trainer)) => {
                if self.player_battle(trainer, rng) {
                    MatchSide::First
                } else {
                    MatchSide::Second
                }
            }
            (Participant::Opponent(trainer), Participant::Player) => {
                if self.player_battle(trainer, rng) {
                    MatchSide::Second
                } else {
                    MatchSide::First
                }
            }
            (first, second) => CoinFlip.resolve(first, second, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::ScriptedEngine;
    use crate::trainer::TrainerClass;
    use pretty_assertions::assert_eq;

    fn opponent() -> Participant {
        let party = vec![PokemonInst::from_name("Eevee", 50).expect("species")];
        Participant::Opponent(Trainer::new("Beth", TrainerClass::CooltrainerF, party))
    }

    #[test]
    fn test_coin_flip_follows_rng() {
        let mut rng = FrontierRng::new_for_test(vec![0, 1]);
        let (mut a, mut b) = (opponent(), opponent());
        assert_eq!(CoinFlip.resolve(&mut a, &mut b, &mut rng), MatchSide::First);
        assert_eq!(CoinFlip.resolve(&mut a, &mut b, &mut rng), MatchSide::Second);
    }

    #[test]
    fn test_player_loss_heals_and_flags() {
        let mut party = vec![PokemonInst::from_name("Pikachu", 50).expect("species")];
        let mut engine = ScriptedEngine::with_outcomes([BattleOutcome::Loss]);
        let mut rng = FrontierRng::new_for_test(vec![0]);
        let mut resolver = PlayerMatchResolver::new(&mut party, &mut engine, BattleRules::single());
        let (mut a, mut b) = (Participant::Player, opponent());
        assert_eq!(resolver.resolve(&mut a, &mut b, &mut rng), MatchSide::Second);
        assert!(resolver.player_lost);
        assert_eq!(resolver.player_wins, 0);
        drop(resolver);
        assert!(party[0].is_full_hp());
        assert_eq!(engine.battles.len(), 1);
    }

    #[test]
    fn test_draw_counts_as_player_loss() {
        let mut party = vec![PokemonInst::from_name("Pikachu", 50).expect("species")];
        let mut engine = ScriptedEngine::with_outcomes([BattleOutcome::Draw]);
        let mut rng = FrontierRng::new_for_test(vec![0]);
        let mut resolver = PlayerMatchResolver::new(&mut party, &mut engine, BattleRules::single());
        let (mut a, mut b) = (opponent(), Participant::Player);
        assert_eq!(resolver.resolve(&mut a, &mut b, &mut rng), MatchSide::First);
        assert!(resolver.player_lost);
    }

    #[test]
    fn test_opponent_pairing_never_reaches_engine() {
        let mut party = vec![PokemonInst::from_name("Pikachu", 50).expect("species")];
        let mut engine = ScriptedEngine::new();
        let mut rng = FrontierRng::new_for_test(vec![1]);
        let mut resolver = PlayerMatchResolver::new(&mut party, &mut engine, BattleRules::single());
        let (mut a, mut b) = (opponent(), opponent());
        assert_eq!(resolver.resolve(&mut a, &mut b, &mut rng), MatchSide::Second);
        drop(resolver);
        assert!(engine.battles.is_empty());
    }
}
