//! Single-elimination tournament bracket.
//!
//! Entrants are referred to by index. Each round is a list of pairings and the
//! winners of round k, taken two at a time in order, are the pairings of round
//! k + 1. The next round only exists once the current one is fully resolved.

use crate::battle::resolver::{MatchResolver, MatchSide};
use crate::errors::{BracketError, BracketResult};
use crate::rng::FrontierRng;
use crate::trainer::{RosterGenerator, Trainer};

/// Roster size of generated bracket opponents.
pub const ENTRANT_PARTY_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Participant {
    Player,
    Opponent(Trainer),
}

impl Participant {
    pub fn is_player(&self) -> bool {
        matches!(self, Participant::Player)
    }

    pub fn display_name(&self, player_name: &str) -> String {
        match self {
            Participant::Player => player_name.to_string(),
            Participant::Opponent(trainer) => trainer.display_name(),
        }
    }

    pub fn trainer(&self) -> Option<&Trainer> {
        match self {
            Participant::Player => None,
            Participant::Opponent(trainer) => Some(trainer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// 0-based round.
    pub round: usize,
    /// 0-based position of the pairing within its round.
    pub match_index: usize,
    pub winner: usize,
    pub loser: usize,
}

#[derive(Debug, Clone)]
pub struct Bracket {
    entrants: Vec<Participant>,
    rounds: Vec<Vec<(usize, usize)>>,
    winners: Vec<Vec<usize>>,
    total_rounds: usize,
}

fn validate_size(size: usize) -> BracketResult<usize> {
    if size < 2 || !size.is_power_of_two() {
        return Err(BracketError::InvalidSize(size));
    }
    Ok(size.trailing_zeros() as usize)
}

/// Two distinct elements of a slice, mutably.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

impl Bracket {
    /// `size` freshly generated Cooltrainers at `level`.
    pub fn generate(size: usize, rng: &mut FrontierRng, level: u8) -> BracketResult<Self> {
        validate_size(size)?;
        let entrants = (0..size)
            .map(|_| Participant::Opponent(RosterGenerator::cooltrainer(rng, level, ENTRANT_PARTY_SIZE)))
            .collect();
        Self::from_entrants(entrants)
    }

    pub fn from_entrants(entrants: Vec<Participant>) -> BracketResult<Self> {
        let total_rounds = validate_size(entrants.len())?;
        let first_round = (0..entrants.len() / 2).map(|i| (2 * i, 2 * i + 1)).collect();
        Ok(Bracket {
            entrants,
            rounds: vec![first_round],
            winners: vec![Vec::new()],
            total_rounds,
        })
    }

    /// Put the player into a random slot, replacing the opponent there.
    pub fn place_player(&mut self, rng: &mut FrontierRng) -> usize {
        let slot = rng.below("bracket slot", self.entrants.len());
        self.entrants[slot] = Participant::Player;
        slot
    }

    pub fn place_player_at(&mut self, slot: usize) -> BracketResult<()> {
        let entrant = self
            .entrants
            .get_mut(slot)
            .ok_or(BracketError::InvalidParticipant(slot))?;
        *entrant = Participant::Player;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.entrants.len()
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// 0-based index of the round being played.
    pub fn current_round(&self) -> usize {
        self.rounds.len() - 1
    }

    pub fn current_matches(&self) -> &[(usize, usize)] {
        &self.rounds[self.current_round()]
    }

    pub fn round(&self, round: usize) -> Option<&[(usize, usize)]> {
        self.rounds.get(round).map(Vec::as_slice)
    }

    pub fn round_winners(&self, round: usize) -> Option<&[usize]> {
        self.winners.get(round).map(Vec::as_slice)
    }

    pub fn participant(&self, index: usize) -> BracketResult<&Participant> {
        self.entrants
            .get(index)
            .ok_or(BracketError::InvalidParticipant(index))
    }

    /// Index of the pairing that will be resolved next in the current round.
    pub fn next_match_index(&self) -> Option<usize> {
        let round = self.current_round();
        let resolved = self.winners[round].len();
        (resolved < self.rounds[round].len()).then_some(resolved)
    }

    /// Resolve a single pairing. Once a round completes and rounds remain, the
    /// next round is paired from its winners. `None` once the bracket is final.
    pub fn resolve_next_match(
        &mut self,
        resolver: &mut dyn MatchResolver,
        rng: &mut FrontierRng,
    ) -> Option<MatchResult> {
        let round = self.current_round();
        let match_index = self.next_match_index()?;
        let (a, b) = self.rounds[round][match_index];
        let (first, second) = pair_mut(&mut self.entrants, a, b);
        let (winner, loser) = match resolver.resolve(first, second, rng) {
            MatchSide::First => (a, b),
            MatchSide::Second => (b, a),
        };
        self.winners[round].push(winner);
        tracing::debug!(target: "frontier.bracket", round, match_index, winner, loser, "match resolved");

        if self.winners[round].len() == self.rounds[round].len() && round + 1 < self.total_rounds {
            let next = self.winners[round].chunks(2).map(|pair| (pair[0], pair[1])).collect();
            self.rounds.push(next);
            self.winners.push(Vec::new());
        }

        Some(MatchResult {
            round,
            match_index,
            winner,
            loser,
        })
    }

    /// Resolve every remaining pairing of the current round and return its
    /// winners. After the final round this does nothing and returns nothing.
    pub fn advance(&mut self, resolver: &mut dyn MatchResolver, rng: &mut FrontierRng) -> Vec<usize> {
        if self.is_final() {
            return Vec::new();
        }
        let round = self.current_round();
        while self.winners[round].len() < self.rounds[round].len() {
            if self.resolve_next_match(resolver, rng).is_none() {
                break;
            }
        }
        self.winners[round].clone()
    }

    pub fn is_final(&self) -> bool {
        self.rounds.len() == self.total_rounds
            && self
                .winners
                .last()
                .zip(self.rounds.last())
                .is_some_and(|(winners, pairs)| winners.len() == pairs.len())
    }

    pub fn winner(&self) -> Option<usize> {
        if !self.is_final() {
            return None;
        }
        self.winners.last().and_then(|w| w.first()).copied()
    }
}
