//! Entropy sources for code generation.
//!
//! Codes are meant to be typed by people, so the default source favours speed
//! over unpredictability. Swap in [`SecureEntropy`] when a code must not be
//! guessable, or [`SeededEntropy`] when a test needs a reproducible sequence.

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed indices.
pub trait EntropySource {
    /// Return an index in `0..upper`. `upper` is never zero.
    fn next_index(&mut self, upper: usize) -> usize;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn next_index(&mut self, upper: usize) -> usize {
        (**self).next_index(upper)
    }
}

/// Fast, non-cryptographic source seeded from the thread RNG.
#[derive(Debug, Clone)]
pub struct FastEntropy(SmallRng);

impl FastEntropy {
    #[must_use]
    pub fn new() -> Self {
        Self(SmallRng::from_rng(&mut rand::rng()))
    }
}

impl Default for FastEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for FastEntropy {
    fn next_index(&mut self, upper: usize) -> usize {
        self.0.random_range(0..upper.max(1))
    }
}

/// Cryptographically secure source seeded from the operating system.
#[derive(Debug, Clone)]
pub struct SecureEntropy(StdRng);

impl SecureEntropy {
    #[must_use]
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl Default for SecureEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for SecureEntropy {
    fn next_index(&mut self, upper: usize) -> usize {
        self.0.random_range(0..upper.max(1))
    }
}

/// Deterministic source: the same seed always yields the same codes.
#[derive(Debug, Clone)]
pub struct SeededEntropy(StdRng);

impl SeededEntropy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl EntropySource for SeededEntropy {
    fn next_index(&mut self, upper: usize) -> usize {
        self.0.random_range(0..upper.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_stay_in_range() {
        let mut fast = FastEntropy::new();
        let mut secure = SecureEntropy::new();
        for _ in 0..1_000 {
            assert!(fast.next_index(36) < 36);
            assert!(secure.next_index(36) < 36);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededEntropy::new(94);
        let mut b = SeededEntropy::new(94);
        let left: Vec<usize> = (0..32).map(|_| a.next_index(36)).collect();
        let right: Vec<usize> = (0..32).map(|_| b.next_index(36)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_zero_upper_does_not_panic() {
        let mut fast = FastEntropy::new();
        assert_eq!(fast.next_index(0), 0);
    }
}
