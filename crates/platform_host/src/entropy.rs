//! Random-number seam for window id suffixes and game placement.

use std::cell::RefCell;

use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Source of uniformly distributed random values.
///
/// Methods take `&self` so a single source can be shared behind an `Rc` by UI callbacks.
pub trait EntropySource {
    /// Returns the next random `u64`.
    fn next_u64(&self) -> u64;

    /// Returns a value uniformly drawn from `0..upper`. Returns `0` when `upper` is `0`.
    fn below(&self, upper: u32) -> u32;
}

#[derive(Debug)]
/// [`EntropySource`] backed by [`SmallRng`].
pub struct SmallRngEntropy {
    rng: RefCell<SmallRng>,
}

impl SmallRngEntropy {
    /// Seeds from host entropy (`crypto.getRandomValues` on wasm32).
    pub fn from_entropy() -> Self {
        Self {
            rng: RefCell::new(SmallRng::from_entropy()),
        }
    }

    /// Creates a deterministic source for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SmallRngEntropy {
    fn next_u64(&self) -> u64 {
        self.rng.borrow_mut().gen()
    }

    fn below(&self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.rng.borrow_mut().gen_range(0..upper)
    }
}
