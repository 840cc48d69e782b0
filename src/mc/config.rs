// src/mc/config.rs
use crate::error::{validation::*, McError, McResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How each worker's random stream is seeded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStrategy {
    /// One stream per logical worker, seeded `seed + worker_index + offset`.
    /// Reproducible for a fixed `num_workers` only.
    #[default]
    PerWorker,
    /// Each loop iteration reseeds from `(seed, index)`. Results do not depend
    /// on `num_workers`, at the cost of one reseed per iteration.
    PerPath,
}

/// Simulation settings shared by the GBM and Heston engines.
///
/// Missing keys in a TOML document take the [`Default`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_paths: usize,
    /// Time steps per path (Heston only)
    pub num_steps: usize,
    pub seed: u64,
    /// Antithetic pairing (GBM only)
    pub use_antithetic: bool,
    /// Size of the fork-join team
    pub num_workers: usize,
    pub seed_strategy: SeedStrategy,
}

pub const DEFAULT_NUM_STEPS: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_paths: 100_000,
            num_steps: DEFAULT_NUM_STEPS,
            seed: DEFAULT_SEED,
            use_antithetic: true,
            num_workers: num_cpus::get(),
            seed_strategy: SeedStrategy::PerWorker,
        }
    }
}

impl SimulationConfig {
    pub fn new(num_paths: usize) -> Self {
        SimulationConfig {
            num_paths,
            ..Default::default()
        }
    }

    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_antithetic(mut self, use_antithetic: bool) -> Self {
        self.use_antithetic = use_antithetic;
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_seed_strategy(mut self, seed_strategy: SeedStrategy) -> Self {
        self.seed_strategy = seed_strategy;
        self
    }

    /// Reseed between successive calls.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Opt-in check for callers; the engines never call it.
    pub fn validate(&self) -> McResult<()> {
        validate_paths(self.num_paths)?;
        validate_steps(self.num_steps)?;
        validate_workers(self.num_workers)?;
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> McResult<Self> {
        toml::from_str(source).map_err(|e| McError::Config(e.to_string()))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> McResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| McError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }
}
