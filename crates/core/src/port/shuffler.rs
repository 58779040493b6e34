// Shuffler Port (for deterministic testing)

use crate::domain::QueueIdentifier;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

/// Source of random order for fairly-ordered priority buckets
pub trait Shuffler: Send + Sync {
    /// Permute the bucket in place
    fn shuffle(&self, bucket: &mut Vec<QueueIdentifier>);
}

/// Thread-local RNG (production)
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn shuffle(&self, bucket: &mut Vec<QueueIdentifier>) {
        bucket.shuffle(&mut rand::thread_rng());
    }
}

/// Seeded RNG: same seed, same sequence of permutations
pub struct SeededShuffler {
    rng: Mutex<StdRng>,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&self, bucket: &mut Vec<QueueIdentifier>) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        bucket.shuffle(&mut *rng);
    }
}

pub mod mocks {
    use super::*;

    /// Reverses the bucket so tests can assert an exact "shuffled" order
    pub struct ReverseShuffler;

    impl Shuffler for ReverseShuffler {
        fn shuffle(&self, bucket: &mut Vec<QueueIdentifier>) {
            bucket.reverse();
        }
    }
}
