// src/mc/greeks.rs
//! Finite-difference Greeks with common random numbers
//!
//! # Central Differences
//!
//! ```text
//! Δ = [P(S+ε) - P(S-ε)] / 2ε
//! Γ = [P(S+ε) - 2P(S) + P(S-ε)] / ε²
//! ν = [P(σ+ε) - P(σ-ε)] / 2ε
//! ρ = [P(r+ε) - P(r-ε)] / 2ε
//! ```
//!
//! # Common Random Numbers
//!
//! Every bumped price is computed from the same seed, worker count and path
//! count, so each run consumes the identical sequence of normal draws in the
//! identical order. The sampling noise is then shared by the two sides of
//! each difference and largely cancels:
//! ```text
//! Var[P(S+ε) - P(S-ε)] << Var[P(S+ε)] + Var[P(S-ε)]
//! ```
//!
//! All bumped runs use antithetic sampling. The seed travels inside each
//! call's config rather than living in mutable engine state, so a single
//! [`FiniteDifferenceGreeks`] can be shared between threads.

use crate::instruments::Instrument;
use crate::mc::config::SimulationConfig;
use crate::mc::gbm::price_gbm;
use crate::models::GbmParams;
use bitflags::bitflags;
use tracing::debug;

pub const DEFAULT_SPOT_EPSILON: f64 = 0.01;
pub const DEFAULT_VOL_EPSILON: f64 = 0.001;
pub const DEFAULT_RATE_EPSILON: f64 = 0.001;

bitflags! {
    /// Selection of Greeks for [`FiniteDifferenceGreeks::compute`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GreekSet: u32 {
        const DELTA = 1 << 0;
        const GAMMA = 1 << 1;
        const VEGA  = 1 << 2;
        const RHO   = 1 << 3;
    }
}

/// Greeks requested through a [`GreekSet`]; unrequested entries are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Greeks {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub rho: Option<f64>,
}

/// Bump-and-reprice Greeks on top of the GBM engine.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceGreeks {
    config: SimulationConfig,
}

impl FiniteDifferenceGreeks {
    /// `num_paths` paths per bumped run, every run seeded with `seed`.
    pub fn new(num_paths: usize, seed: u64) -> Self {
        Self::from_config(SimulationConfig::new(num_paths).with_seed(seed))
    }

    /// Wrap an existing config. Antithetic sampling is forced on.
    pub fn from_config(config: SimulationConfig) -> Self {
        FiniteDifferenceGreeks {
            config: config.with_antithetic(true),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn with_num_paths(mut self, num_paths: usize) -> Self {
        self.config.num_paths = num_paths;
        self
    }

    /// One pricing call; every call reads the same seed.
    fn price<I>(&self, instrument: &I, params: &GbmParams) -> f64
    where
        I: Instrument + ?Sized,
    {
        price_gbm(instrument, params, &self.config).price
    }

    pub fn delta<I>(&self, instrument: &I, params: &GbmParams, epsilon: Option<f64>) -> f64
    where
        I: Instrument + ?Sized,
    {
        let eps = epsilon.unwrap_or(DEFAULT_SPOT_EPSILON);
        let p_up = self.price(instrument, &params.with_spot(params.spot + eps));
        let p_down = self.price(instrument, &params.with_spot(params.spot - eps));
        (p_up - p_down) / (2.0 * eps)
    }

    pub fn gamma<I>(&self, instrument: &I, params: &GbmParams, epsilon: Option<f64>) -> f64
    where
        I: Instrument + ?Sized,
    {
        let eps = epsilon.unwrap_or(DEFAULT_SPOT_EPSILON);
        let p_up = self.price(instrument, &params.with_spot(params.spot + eps));
        let p_base = self.price(instrument, params);
        let p_down = self.price(instrument, &params.with_spot(params.spot - eps));
        (p_up - 2.0 * p_base + p_down) / (eps * eps)
    }

    pub fn vega<I>(&self, instrument: &I, params: &GbmParams, epsilon: Option<f64>) -> f64
    where
        I: Instrument + ?Sized,
    {
        let eps = epsilon.unwrap_or(DEFAULT_VOL_EPSILON);
        let p_up = self.price(instrument, &params.with_volatility(params.volatility + eps));
        let p_down = self.price(instrument, &params.with_volatility(params.volatility - eps));
        (p_up - p_down) / (2.0 * eps)
    }

    pub fn rho<I>(&self, instrument: &I, params: &GbmParams, epsilon: Option<f64>) -> f64
    where
        I: Instrument + ?Sized,
    {
        let eps = epsilon.unwrap_or(DEFAULT_RATE_EPSILON);
        let p_up = self.price(instrument, &params.with_rate(params.rate + eps));
        let p_down = self.price(instrument, &params.with_rate(params.rate - eps));
        (p_up - p_down) / (2.0 * eps)
    }

    /// Compute the selected Greeks with their default bump sizes.
    pub fn compute<I>(&self, instrument: &I, params: &GbmParams, which: GreekSet) -> Greeks
    where
        I: Instrument + ?Sized,
    {
        let greeks = Greeks {
            delta: which
                .contains(GreekSet::DELTA)
                .then(|| self.delta(instrument, params, None)),
            gamma: which
                .contains(GreekSet::GAMMA)
                .then(|| self.gamma(instrument, params, None)),
            vega: which
                .contains(GreekSet::VEGA)
                .then(|| self.vega(instrument, params, None)),
            rho: which
                .contains(GreekSet::RHO)
                .then(|| self.rho(instrument, params, None)),
        };

        debug!(
            paths = self.config.num_paths,
            seed = self.config.seed,
            ?greeks,
            "finite-difference greeks complete"
        );

        greeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::black_scholes;
    use crate::instruments::EuropeanOption;

    fn engine(paths: usize) -> FiniteDifferenceGreeks {
        FiniteDifferenceGreeks::from_config(
            SimulationConfig::new(paths).with_seed(42).with_workers(4),
        )
    }

    #[test]
    fn test_antithetic_is_forced() {
        let fd = FiniteDifferenceGreeks::from_config(
            SimulationConfig::new(1_000).with_antithetic(false),
        );
        assert!(fd.config().use_antithetic);
        assert_eq!(FiniteDifferenceGreeks::new(10, 7).seed(), 7);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let call = EuropeanOption::call(100.0, 1.0);
        let params = GbmParams::new(100.0, 0.05, 0.2);
        let fd = engine(20_000);

        let first = fd.delta(&call, &params, None);
        let second = fd.delta(&call, &params, None);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_zero_bump_gives_zero_difference() {
        // Identical draws and identical inputs: the two legs cancel exactly
        let call = EuropeanOption::call(100.0, 1.0);
        let params = GbmParams::new(100.0, 0.05, 0.2);
        let fd = engine(10_000);

        let up = fd.price(&call, &params);
        let down = fd.price(&call, &params);
        assert_eq!(up, down);
    }

    #[test]
    fn test_compute_selected_only() {
        let call = EuropeanOption::call(100.0, 1.0);
        let params = GbmParams::new(100.0, 0.05, 0.2);
        let fd = engine(20_000);

        let greeks = fd.compute(&call, &params, GreekSet::DELTA | GreekSet::RHO);
        assert!(greeks.delta.is_some());
        assert!(greeks.rho.is_some());
        assert!(greeks.gamma.is_none());
        assert!(greeks.vega.is_none());
        assert_eq!(greeks.delta, Some(fd.delta(&call, &params, None)));
    }

    #[test]
    fn test_put_delta_sign_and_magnitude() {
        let put = EuropeanOption::put(100.0, 1.0);
        let params = GbmParams::new(100.0, 0.05, 0.2);
        let fd = engine(200_000);

        let delta = fd.delta(&put, &params, None);
        let analytic = black_scholes::put_delta(100.0, 100.0, 0.05, 0.2, 1.0);
        assert!(delta < 0.0);
        assert!((delta - analytic).abs() < 0.02, "{} vs {}", delta, analytic);
    }

    #[test]
    fn test_vega_and_rho_close_to_analytic() {
        let call = EuropeanOption::call(100.0, 1.0);
        let params = GbmParams::new(100.0, 0.05, 0.2);
        let fd = engine(200_000);

        let vega = fd.vega(&call, &params, None);
        let rho = fd.rho(&call, &params, None);
        let vega_bs = black_scholes::vega(100.0, 100.0, 0.05, 0.2, 1.0);
        let rho_bs = black_scholes::call_rho(100.0, 100.0, 0.05, 0.2, 1.0);

        assert!((vega - vega_bs).abs() / vega_bs < 0.03, "vega {} vs {}", vega, vega_bs);
        assert!((rho - rho_bs).abs() / rho_bs < 0.03, "rho {} vs {}", rho, rho_bs);
    }
}
