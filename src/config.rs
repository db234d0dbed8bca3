use rand::rngs::StdRng;
use rand::SeedableRng;

/// Construction options for a [`SkipList`](crate::SkipList).
///
/// The default draws node heights from system entropy. Setting a seed makes
/// height sampling deterministic: two lists built from the same seed and fed
/// the same sequence of `add` calls end up with identical layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    seed: Option<u64>,
}

impl Config {
    /// Use `seed` for height sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured seed, if any.
    pub fn seed_value(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
