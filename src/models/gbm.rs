// src/models/gbm.rs
use crate::error::{validation::*, McResult};
use serde::{Deserialize, Serialize};

/// Market inputs for lognormal (Black-Scholes) dynamics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    pub spot: f64,
    pub rate: f64,
    pub volatility: f64,
}

impl GbmParams {
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Self {
        GbmParams {
            spot,
            rate,
            volatility,
        }
    }

    pub fn with_spot(self, spot: f64) -> Self {
        GbmParams { spot, ..self }
    }

    pub fn with_rate(self, rate: f64) -> Self {
        GbmParams { rate, ..self }
    }

    pub fn with_volatility(self, volatility: f64) -> Self {
        GbmParams { volatility, ..self }
    }

    /// Opt-in check for callers; the engines never call it.
    pub fn validate(&self) -> McResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// Exact one-shot terminal-spot map over horizon `t`.
    pub fn terminal_map(&self, t: f64) -> TerminalMap {
        TerminalMap {
            spot: self.spot,
            drift: (self.rate - 0.5 * self.volatility * self.volatility) * t,
            diffusion: self.volatility * t.sqrt(),
        }
    }
}

/// Precomputed `S_T = S_0 * exp(drift + diffusion * Z)`.
#[derive(Clone, Copy, Debug)]
pub struct TerminalMap {
    spot: f64,
    drift: f64,
    diffusion: f64,
}

impl TerminalMap {
    #[inline]
    pub fn terminal_spot(&self, z: f64) -> f64 {
        self.spot * (self.drift + self.diffusion * z).exp()
    }
}
