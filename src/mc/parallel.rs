// src/mc/parallel.rs
//! Fork-join driver shared by the path engines.
//!
//! The loop range `0..iterations` is split into `num_workers` contiguous
//! blocks. Each block is one logical worker: it owns a single
//! [`NormalSampler`] and a private accumulator for the whole region. Rayon
//! decides which OS thread runs which block, but that choice never reaches
//! the numbers: the seed depends on the block index, and the partial
//! accumulators are merged in block order after the join.

use crate::mc::config::{SeedStrategy, SimulationConfig};
use crate::rng::{path_seed, worker_seed, NormalSampler};
use rayon::prelude::*;
use std::ops::Range;

/// Per-worker partial statistic, combined by a commutative, associative merge.
pub trait Accumulator: Default + Send {
    fn merge(self, other: Self) -> Self;
}

/// Running sums of payoff and squared payoff.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffSums {
    pub sum: f64,
    pub sum_sq: f64,
}

impl PayoffSums {
    #[inline]
    pub fn add(&mut self, payoff: f64) {
        self.sum += payoff;
        self.sum_sq += payoff * payoff;
    }
}

impl Accumulator for PayoffSums {
    fn merge(self, other: Self) -> Self {
        PayoffSums {
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }
}

/// Contiguous block of loop indices owned by `worker`.
pub fn worker_range(iterations: usize, workers: usize, worker: usize) -> Range<usize> {
    let workers = workers.max(1);
    let start = iterations * worker / workers;
    let end = iterations * (worker + 1) / workers;
    start..end
}

/// Run `body` once per loop index across the worker team and reduce.
///
/// `seed_offset` is added to every per-worker seed. It is ignored under
/// [`SeedStrategy::PerPath`], where each index derives its own stream.
pub fn fork_join<A, F>(config: &SimulationConfig, iterations: usize, seed_offset: u64, body: F) -> A
where
    A: Accumulator,
    F: Fn(&mut NormalSampler, &mut A) + Sync,
{
    let workers = config.num_workers.max(1);
    let base_seed = config.seed;
    let strategy = config.seed_strategy;

    let partials: Vec<A> = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let mut sampler = NormalSampler::new(worker_seed(base_seed, worker, seed_offset));
            let mut acc = A::default();

            match strategy {
                SeedStrategy::PerWorker => {
                    for _ in worker_range(iterations, workers, worker) {
                        body(&mut sampler, &mut acc);
                    }
                }
                SeedStrategy::PerPath => {
                    for i in worker_range(iterations, workers, worker) {
                        sampler.reseed(path_seed(base_seed, i as u64));
                        body(&mut sampler, &mut acc);
                    }
                }
            }
            acc
        })
        .collect();

    // Fixed merge order keeps the float sum independent of scheduling
    partials.into_iter().fold(A::default(), A::merge)
}
