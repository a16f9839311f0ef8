//! Randomness source shared by every Frontier facility.
//!
//! Tests hand in a fixed list of outcomes so whole sessions replay the same
//! way; the game uses a `StdRng`, either seeded or drawn from the thread rng.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
enum Source {
    Scripted { outcomes: Vec<u32>, index: usize },
    Std(StdRng),
}

#[derive(Debug, Clone)]
pub struct FrontierRng {
    source: Source,
}

impl FrontierRng {
    /// Replays `outcomes` in order, wrapping around once exhausted.
    /// Each value is reduced modulo the requested range.
    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self {
            source: Source::Scripted { outcomes, index: 0 },
        }
    }

    pub fn new_random() -> Self {
        let mut thread_rng = rand::rng();
        Self {
            source: Source::Std(StdRng::from_rng(&mut thread_rng)),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Std(StdRng::seed_from_u64(seed)),
        }
    }

    fn next_raw(&mut self, reason: &str, bound: u32) -> u32 {
        let value = match &mut self.source {
            Source::Scripted { outcomes, index } => {
                if outcomes.is_empty() {
                    0
                } else {
                    let outcome = outcomes[*index % outcomes.len()];
                    *index += 1;
                    outcome % bound
                }
            }
            Source::Std(rng) => rng.random_range(0..bound),
        };
        tracing::trace!(target: "frontier.rng", reason, value, bound, "rng consumed");
        value
    }

    /// Uniform value in `0..bound`. Returns 0 for an empty range.
    pub fn below(&mut self, reason: &str, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.next_raw(reason, bound as u32) as usize
    }

    /// Uniform value in `low..=high`.
    pub fn range_inclusive(&mut self, reason: &str, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_raw(reason, high - low + 1)
    }

    /// Percentage roll in `1..=100`.
    pub fn percent(&mut self, reason: &str) -> u8 {
        (self.next_raw(reason, 100) + 1) as u8
    }

    /// True with probability `chance` percent.
    pub fn chance(&mut self, reason: &str, chance: u8) -> bool {
        self.percent(reason) <= chance
    }

    pub fn coin_flip(&mut self, reason: &str) -> bool {
        self.below(reason, 2) == 0
    }

    pub fn choose<'a, T>(&mut self, reason: &str, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.below(reason, items.len());
        items.get(index)
    }

    /// Index picked with probability proportional to its weight.
    /// `None` when every weight is zero.
    pub fn weighted_index(&mut self, reason: &str, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.next_raw(reason, total.min(u32::MAX as u64) as u32) as u64;
        for (index, &weight) in weights.iter().enumerate() {
            if roll < weight as u64 {
                return Some(index);
            }
            roll -= weight as u64;
        }
        weights.iter().rposition(|&w| w > 0)
    }

    pub fn shuffle<T>(&mut self, reason: &str, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(reason, i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripted_values_wrap() {
        let mut rng = FrontierRng::new_for_test(vec![3, 1]);
        assert_eq!(rng.below("a", 10), 3);
        assert_eq!(rng.below("b", 10), 1);
        assert_eq!(rng.below("c", 10), 3);
    }

    #[test]
    fn test_scripted_values_reduced_into_range() {
        let mut rng = FrontierRng::new_for_test(vec![7]);
        assert_eq!(rng.below("a", 4), 3);
        assert_eq!(rng.percent("b"), 8);
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = FrontierRng::new_for_test(vec![0, 4]);
        assert_eq!(rng.weighted_index("w", &[0, 3, 2]), Some(1));
        assert_eq!(rng.weighted_index("w", &[0, 3, 2]), Some(2));
        assert_eq!(rng.weighted_index("w", &[0, 0]), None);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = FrontierRng::from_seed(42);
        let mut b = FrontierRng::from_seed(42);
        let left: Vec<usize> = (0..10).map(|_| a.below("x", 1000)).collect();
        let right: Vec<usize> = (0..10).map(|_| b.below("x", 1000)).collect();
        assert_eq!(left, right);
    }
}
