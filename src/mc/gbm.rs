// src/mc/gbm.rs
//! Monte Carlo pricing under Geometric Brownian Motion
//!
//! # Math Framework
//!
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! S_T  = S_0 * exp((r - σ²/2)T + σ√T * Z),   Z ~ N(0,1)
//! ```
//!
//! Only the terminal spot is needed, so each path costs one normal draw.
//!
//! # Antithetic Variates
//!
//! With antithetic sampling every draw `Z` produces two paths, one from `Z`
//! and one from `-Z`. Both payoffs enter the running sums individually, so
//! `n` requested paths run `⌊n/2⌋` loop iterations and the statistic is
//! normalised by `2⌊n/2⌋` (an odd `n` drops one path).
//!
//! # Estimator
//!
//! ```text
//! mean     = Σ payoff / N
//! price    = mean * e^(-rT)
//! variance = max(0, Σ payoff² / N - mean²)
//! stderr   = √(variance / N) * e^(-rT)
//! ```

use crate::instruments::Instrument;
use crate::math_utils::Timer;
use crate::mc::config::SimulationConfig;
use crate::mc::parallel::{fork_join, PayoffSums};
use crate::models::GbmParams;
use tracing::debug;

/// Seed offset for GBM worker streams (`seed + worker + 1`).
const GBM_SEED_OFFSET: u64 = 1;

/// Discounted price estimate with its standard error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmEstimate {
    pub price: f64,
    pub std_error: f64,
    /// Paths actually used for normalisation
    pub paths: usize,
}

/// Number of paths the estimator is normalised by.
pub fn effective_paths(num_paths: usize, use_antithetic: bool) -> usize {
    if use_antithetic {
        2 * (num_paths / 2)
    } else {
        num_paths
    }
}

/// Price `instrument` by simulating terminal spots under GBM.
///
/// No validation is performed: zero paths, a non-positive maturity or a
/// negative volatility give whatever the arithmetic yields (NaN, ±inf, 0).
pub fn price_gbm<I>(instrument: &I, params: &GbmParams, config: &SimulationConfig) -> GbmEstimate
where
    I: Instrument + ?Sized,
{
    let timer = Timer::new();
    let t = instrument.maturity();
    let terminal = params.terminal_map(t);
    let discount = (-params.rate * t).exp();

    let use_antithetic = config.use_antithetic;
    let iterations = if use_antithetic {
        config.num_paths / 2
    } else {
        config.num_paths
    };
    let paths = effective_paths(config.num_paths, use_antithetic);

    let sums = fork_join(
        config,
        iterations,
        GBM_SEED_OFFSET,
        |sampler, acc: &mut PayoffSums| {
            let z = sampler.sample();
            acc.add(instrument.payoff(terminal.terminal_spot(z)));
            if use_antithetic {
                acc.add(instrument.payoff(terminal.terminal_spot(-z)));
            }
        },
    );

    let estimate = finish(sums, paths, discount);

    debug!(
        paths,
        workers = config.num_workers,
        antithetic = use_antithetic,
        price = estimate.price,
        std_error = estimate.std_error,
        elapsed_ms = timer.elapsed_ms(),
        "gbm pricing complete"
    );

    estimate
}

fn finish(sums: PayoffSums, paths: usize, discount: f64) -> GbmEstimate {
    let n = paths as f64;
    let mean = sums.sum / n;
    // Cancellation can push the raw second moment slightly below mean²
    let variance = (sums.sum_sq / n - mean * mean).max(0.0);

    GbmEstimate {
        price: mean * discount,
        std_error: (variance / n).sqrt() * discount,
        paths,
    }
}
