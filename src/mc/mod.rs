pub mod config;
pub mod gbm;
pub mod greeks;
pub mod heston;
pub mod parallel;

pub use config::{SeedStrategy, SimulationConfig};
pub use gbm::{price_gbm, GbmEstimate};
pub use greeks::{FiniteDifferenceGreeks, GreekSet, Greeks};
pub use heston::price_heston;
