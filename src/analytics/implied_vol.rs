//! Newton-Raphson implied volatility
//!
//! ```text
//! σ_{n+1} = σ_n - (BS(σ_n) - price_mkt) / ν(σ_n)
//! ```
//!
//! Stops when `|BS(σ) - price_mkt| < tolerance`. Fails when vega collapses
//! (deep in/out of the money) or the iteration budget runs out.

use crate::analytics::black_scholes;
use crate::error::{McError, McResult};
use crate::instruments::OptionKind;
use tracing::warn;

/// Vega below this is treated as zero.
const MIN_VEGA: f64 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverSettings {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            initial_guess: 0.5,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Implied volatility with default solver settings.
pub fn implied_volatility(
    market_price: f64,
    kind: OptionKind,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
) -> McResult<f64> {
    implied_volatility_with(market_price, kind, s, k, r, t, &SolverSettings::default())
}

pub fn implied_volatility_with(
    market_price: f64,
    kind: OptionKind,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
    settings: &SolverSettings,
) -> McResult<f64> {
    let mut sigma = settings.initial_guess;

    for iteration in 0..settings.max_iterations {
        let diff = black_scholes::price(kind, s, k, r, sigma, t) - market_price;
        if diff.abs() < settings.tolerance {
            return Ok(sigma);
        }

        let vega = black_scholes::vega(s, k, r, sigma, t);
        if vega.is_nan() || vega.abs() < MIN_VEGA {
            warn!(iteration, sigma, vega, "vega too small, implied volatility solver stopped");
            return Err(McError::ConvergenceFailure {
                method: "Newton-Raphson implied volatility".to_string(),
                iterations: iteration + 1,
                reason: format!("vega {:.3e} below {:.0e}", vega, MIN_VEGA),
            });
        }

        sigma -= diff / vega;
    }

    warn!(
        iterations = settings.max_iterations,
        sigma, "implied volatility solver hit iteration limit"
    );
    Err(McError::ConvergenceFailure {
        method: "Newton-Raphson implied volatility".to_string(),
        iterations: settings.max_iterations,
        reason: format!("last sigma {}", sigma),
    })
}
