//! # mc-greeks: Parallel Monte Carlo Pricing and Greeks
//!
//! Estimates European option prices and their sensitivities by simulation
//! when no closed form is available (Heston) or as a check against one (GBM).
//!
//! ## Key Features
//!
//! - **Fork-join parallelism**: paths are split across a fixed worker team
//!   with Rayon; each worker owns its random stream and a private accumulator
//! - **Reproducible**: bit-identical results for a fixed seed and worker count
//! - **GBM engine**: exact terminal sampling, antithetic variates, standard error
//! - **Heston engine**: full-truncation Euler with correlated increments
//! - **Greeks**: central finite differences with common random numbers
//!
//! ## Quick Start
//!
//! ```rust
//! use mc_greeks::instruments::EuropeanOption;
//! use mc_greeks::mc::{price_gbm, FiniteDifferenceGreeks, SimulationConfig};
//! use mc_greeks::models::GbmParams;
//!
//! let call = EuropeanOption::call(100.0, 1.0);
//! let market = GbmParams::new(100.0, 0.05, 0.2);
//! let config = SimulationConfig::new(100_000).with_seed(42);
//!
//! let estimate = price_gbm(&call, &market, &config);
//! println!("Option price: {:.4} ± {:.4}", estimate.price, estimate.std_error);
//!
//! let greeks = FiniteDifferenceGreeks::new(100_000, 42);
//! println!("Delta: {:.4}", greeks.delta(&call, &market, None));
//! ```
//!
//! ## Error Handling
//!
//! The engines never fail and never validate; bad inputs yield NaN or
//! infinities. Callers that want checks use the opt-in `validate` methods on
//! [`mc::SimulationConfig`] and the parameter structs, which return
//! [`McResult`].

pub mod analytics;
pub mod error;
pub mod instruments;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod rng;

pub use error::{McError, McResult};
