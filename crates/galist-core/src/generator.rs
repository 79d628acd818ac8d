//! Random exercise generation for competitive play.
//!
//! The generator keeps a pool of unique five-node exercises and hands them
//! out round-robin, reshuffling each time the pool wraps around.

use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{Circle, Template};

const SEQUENCE_LENGTH: usize = 5;
const MIN_VALUE: i64 = 1;
const MAX_VALUE: i64 = 50;

const ADDRESS_POOLS: [[&str; 8]; 6] = [
    ["aa", "bb", "cc", "dd", "ee", "ff", "gg", "hh"],
    ["x10", "y20", "z30", "a40", "b50", "c60", "d70", "e80"],
    ["m1", "n2", "o3", "p4", "q5", "r6", "s7", "t8"],
    ["f100", "g200", "h300", "i400", "j500", "k600", "l700", "m800"],
    ["u01", "v02", "w03", "x04", "y05", "z06", "a07", "b08"],
    ["ptr1", "ptr2", "ptr3", "ptr4", "ptr5", "ptr6", "ptr7", "ptr8"],
];

/// Source of randomly built exercise templates.
#[derive(Debug)]
pub struct ExerciseGenerator {
    rng: StdRng,
    pool_size: usize,
    pool: Vec<Template>,
    cursor: usize,
    serial: usize,
}

impl ExerciseGenerator {
    /// A generator seeded from the operating system.
    pub fn new(pool_size: usize) -> Self {
        Self::with_rng(StdRng::from_os_rng(), pool_size)
    }

    /// A reproducible generator.
    pub fn seeded(seed: u64, pool_size: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), pool_size)
    }

    fn with_rng(rng: StdRng, pool_size: usize) -> Self {
        let mut generator = Self {
            rng,
            pool_size: pool_size.max(1),
            pool: Vec::new(),
            cursor: 0,
            serial: 0,
        };
        generator.generate_pool();
        generator
    }

    /// Hand out the next exercise from the pool.
    pub fn next_exercise(&mut self) -> Template {
        let template = self.pool[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.pool.len();

        if self.cursor == 0 {
            self.pool.shuffle(&mut self.rng);
        }

        template
    }

    /// Start over with a freshly generated pool.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.generate_pool();
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Position of the next exercise in the pool.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    fn generate_pool(&mut self) {
        self.pool.clear();
        let mut used = HashSet::new();

        while self.pool.len() < self.pool_size {
            let sequence = self.random_sequence();
            let addresses = self.random_addresses(&sequence);

            let mut values = sequence.clone();
            values.sort_unstable();
            let mut assigned: Vec<String> = addresses.values().cloned().collect();
            assigned.sort();
            if !used.insert((values, assigned)) {
                continue;
            }

            self.serial += 1;
            let mut template = Template {
                key: format!("exercise_{}", self.serial),
                title: "Create this Linked List".to_string(),
                description: String::new(),
                sequence,
                addresses,
            };
            template.description = format!(
                "Create a linked list with the following values: {}",
                template.chain()
            );
            self.pool.push(template);
        }

        self.pool.shuffle(&mut self.rng);
        tracing::debug!("generated exercise pool of {}", self.pool.len());
    }

    fn random_sequence(&mut self) -> Vec<i64> {
        let mut sequence = Vec::with_capacity(SEQUENCE_LENGTH);
        while sequence.len() < SEQUENCE_LENGTH {
            let value = self.rng.random_range(MIN_VALUE..=MAX_VALUE);
            if !sequence.contains(&value) {
                sequence.push(value);
            }
        }
        sequence
    }

    fn random_addresses(&mut self, sequence: &[i64]) -> BTreeMap<i64, String> {
        let mut pool = ADDRESS_POOLS[self.rng.random_range(0..ADDRESS_POOLS.len())];
        pool.shuffle(&mut self.rng);
        sequence
            .iter()
            .zip(pool)
            .map(|(value, address)| (*value, address.to_string()))
            .collect()
    }
}

/// Pick between `min` and `max` distinct starter circles from a template.
pub fn initial_nodes<R: Rng>(
    template: &Template,
    rng: &mut R,
    min: usize,
    max: usize,
) -> Vec<Circle> {
    let len = template.sequence.len();
    if len == 0 {
        return Vec::new();
    }

    let upper = max.clamp(1, len);
    let count = rng.random_range(1..=upper).max(min).min(len);

    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices.truncate(count);

    indices
        .into_iter()
        .enumerate()
        .map(|(i, index)| {
            let value = template.sequence[index];
            Circle::new(
                format!("init_{i}"),
                value,
                template.address_of(value).unwrap_or_default(),
            )
        })
        .collect()
}
