//! Tree configuration and the priority generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The type of node priorities.
/// Convention: a bigger number goes higher up the tree.
pub type Priority = u64;

/// Configuration used when creating a tree.
///
///```
/// use mergeable_treap::*;
/// use mergeable_treap::example_data::SeqNum;
///
/// let config = Config::default().seed(7);
/// let mut tree: SeqTree<SeqNum<i32>> = SeqTree::with_config(config);
/// tree.push_back(3);
/// assert_eq!(tree.to_sequence(), vec![3]);
///```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Seed for the priorities. Trees built with the same seed and the
    /// same sequence of operations have the same shape.
    /// When `None`, the generator is seeded from the operating system.
    pub seed: Option<u64>,
}

impl Config {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Draws an independent uniformly random priority for every new node.
#[derive(Clone, Debug)]
pub struct PriorityGenerator {
    rng: StdRng,
}

impl PriorityGenerator {
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => {
                log::trace!("seeding priorities with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => {
                log::trace!("seeding priorities from entropy");
                StdRng::from_entropy()
            }
        };
        PriorityGenerator { rng }
    }

    pub fn next_priority(&mut self) -> Priority {
        self.rng.gen()
    }

    /// A new generator, seeded from this one, for a tree split off from this generator's tree.
    pub fn fork(&mut self) -> Self {
        PriorityGenerator {
            rng: StdRng::seed_from_u64(self.rng.gen()),
        }
    }
}

impl Default for PriorityGenerator {
    fn default() -> Self {
        PriorityGenerator::new(&Config::default())
    }
}

#[test]
fn seeded_generators_agree() {
    let config = Config::default().seed(1234);
    let mut gen1 = PriorityGenerator::new(&config);
    let mut gen2 = PriorityGenerator::new(&config);
    for _ in 0..100 {
        assert_eq!(gen1.next_priority(), gen2.next_priority());
    }
}
