pub mod gbm;
pub mod heston;

pub use gbm::GbmParams;
pub use heston::HestonParams;
