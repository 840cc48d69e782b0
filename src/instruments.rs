//! Instruments priced by the simulation engines
//!
//! The engines only ever see the [`Instrument`] capability: a terminal payoff
//! and a maturity. They never inspect which contract they are pricing.
//!
//! ## European Options
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability consumed by the path engines.
///
/// Implementations are shared by reference across all workers of a parallel
/// region, so they must be `Send + Sync`.
pub trait Instrument: Send + Sync {
    /// Payoff given the simulated spot at maturity
    fn payoff(&self, terminal_spot: f64) -> f64;

    /// Time to maturity in years
    fn maturity(&self) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Call => write!(f, "Call"),
            OptionKind::Put => write!(f, "Put"),
        }
    }
}

/// European option, exercisable only at maturity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EuropeanOption {
    pub strike: f64,
    pub maturity: f64,
    pub kind: OptionKind,
}

impl EuropeanOption {
    pub fn new(strike: f64, maturity: f64, kind: OptionKind) -> Self {
        Self {
            strike,
            maturity,
            kind,
        }
    }

    pub fn call(strike: f64, maturity: f64) -> Self {
        Self::new(strike, maturity, OptionKind::Call)
    }

    pub fn put(strike: f64, maturity: f64) -> Self {
        Self::new(strike, maturity, OptionKind::Put)
    }
}

impl Instrument for EuropeanOption {
    #[inline]
    fn payoff(&self, terminal_spot: f64) -> f64 {
        match self.kind {
            OptionKind::Call => (terminal_spot - self.strike).max(0.0),
            OptionKind::Put => (self.strike - terminal_spot).max(0.0),
        }
    }

    fn maturity(&self) -> f64 {
        self.maturity
    }
}
