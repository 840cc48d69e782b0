// src/models/heston.rs
//! Heston Stochastic Volatility Model
//!
//! # Mathematical Framework
//!
//! ```text
//! dS_t = r S_t dt + √V_t S_t dW_t^(1)
//! dV_t = κ(θ - V_t) dt + ξ√V_t dW_t^(2)
//! ```
//!
//! Where:
//! - S_t: Asset price
//! - V_t: Instantaneous variance (volatility squared)
//! - κ: Mean reversion speed for variance
//! - θ: Long-term variance level
//! - ξ: Volatility of variance (vol-of-vol)
//! - ρ: Correlation between dW_t^(1) and dW_t^(2)
//!
//! # Feller Condition
//!
//! The continuous-time variance stays strictly positive when
//! ```text
//! 2κθ ≥ ξ²
//! ```
//!
//! The discretisation below does not need it to hold. Violating it only makes
//! the variance clamp fire more often, which increases the scheme's bias.
//!
//! # Full Truncation Euler
//!
//! ```text
//! V⁺      = max(V_n, 0)
//! V_{n+1} = V_n + κ(θ - V⁺)Δt + ξ√V⁺ ΔW_v
//! S_{n+1} = S_n * exp((r - V⁺/2)Δt + √V⁺ ΔW_s)
//! ```
//!
//! `V_{n+1}` itself may be negative; it is clamped again on the next step.

use crate::error::{validation::*, McResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HestonParams {
    pub spot: f64,  // Initial stock price
    pub rate: f64,  // Risk-free rate
    pub v0: f64,    // Initial variance
    pub kappa: f64, // Mean reversion speed
    pub theta: f64, // Long-term variance
    pub xi: f64,    // Volatility of variance (vol-of-vol)
    pub rho: f64,   // Correlation between stock and variance
}

impl HestonParams {
    /// `2κθ ≥ ξ²`
    pub fn feller_satisfied(&self) -> bool {
        2.0 * self.kappa * self.theta >= self.xi * self.xi
    }

    /// Opt-in parameter check for callers; the engine never calls it.
    pub fn validate(&self) -> McResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("v0", self.v0)?;
        validate_non_negative("kappa", self.kappa)?;
        validate_non_negative("theta", self.theta)?;
        validate_non_negative("xi", self.xi)?;
        validate_correlation("rho", self.rho)?;
        Ok(())
    }

    /// Discretisation constants for a step of size `dt`.
    pub fn stepper(&self, dt: f64) -> FullTruncationStepper {
        FullTruncationStepper {
            rate: self.rate,
            kappa: self.kappa,
            theta: self.theta,
            xi: self.xi,
            rho: self.rho,
            rho_bar: (1.0 - self.rho * self.rho).sqrt(),
            dt,
            sqrt_dt: dt.sqrt(),
        }
    }
}

/// Full-truncation Euler-Maruyama step for the (S, V) pair.
#[derive(Clone, Copy, Debug)]
pub struct FullTruncationStepper {
    rate: f64,
    kappa: f64,
    theta: f64,
    xi: f64,
    rho: f64,
    rho_bar: f64,
    dt: f64,
    sqrt_dt: f64,
}

impl FullTruncationStepper {
    /// Advance one step from two independent standard normals.
    ///
    /// `dW_v` is built by the Cholesky factor of the 2x2 correlation matrix:
    /// `dW_v = (ρ Z1 + √(1-ρ²) Z2) √Δt`.
    #[inline]
    pub fn step(&self, s: &mut f64, v: &mut f64, z1: f64, z2: f64) {
        let dw_s = z1 * self.sqrt_dt;
        let dw_v = (self.rho * z1 + self.rho_bar * z2) * self.sqrt_dt;

        let v_pos = v.max(0.0);
        let sqrt_v = v_pos.sqrt();

        *v += self.kappa * (self.theta - v_pos) * self.dt + self.xi * sqrt_v * dw_v;
        *s *= ((self.rate - 0.5 * v_pos) * self.dt + sqrt_v * dw_s).exp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::NormalSampler;
    use approx::assert_relative_eq;

    fn base_params() -> HestonParams {
        HestonParams {
            spot: 100.0,
            rate: 0.05,
            v0: 0.04,
            kappa: 2.0,
            theta: 0.04,
            xi: 0.3,
            rho: -0.7,
        }
    }

    #[test]
    fn test_feller_condition() {
        assert!(base_params().feller_satisfied());

        let violating = HestonParams {
            kappa: 0.1,
            xi: 1.5,
            ..base_params()
        };
        assert!(!violating.feller_satisfied());
        // Violation is documented behaviour, not a validation failure
        assert!(violating.validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters() {
        let bad_rho = HestonParams {
            rho: 1.5,
            ..base_params()
        };
        assert!(bad_rho.validate().is_err());

        let bad_spot = HestonParams {
            spot: -100.0,
            ..base_params()
        };
        assert!(bad_spot.validate().is_err());

        let bad_xi = HestonParams {
            xi: -0.3,
            ..base_params()
        };
        assert!(bad_xi.validate().is_err());
    }

    #[test]
    fn test_zero_noise_step_is_deterministic_drift() {
        let params = base_params();
        let stepper = params.stepper(0.01);

        let mut s = params.spot;
        let mut v = params.v0;
        stepper.step(&mut s, &mut v, 0.0, 0.0);

        // v0 = θ so the variance drift vanishes
        assert_relative_eq!(v, 0.04, epsilon = 1e-15);
        assert_relative_eq!(s, 100.0 * ((0.05 - 0.02) * 0.01f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_variance_is_clamped_inside_step() {
        let params = base_params();
        let stepper = params.stepper(0.01);

        let mut s = 100.0;
        let mut v = -0.5;
        stepper.step(&mut s, &mut v, 1.0, -2.0);

        // With V⁺ = 0 the diffusion terms vanish: only κθΔt is added to v
        assert_relative_eq!(v, -0.5 + 2.0 * 0.04 * 0.01, epsilon = 1e-15);
        assert_relative_eq!(s, 100.0 * (0.05f64 * 0.01).exp(), epsilon = 1e-12);
        assert!(s.is_finite());
    }

    #[test]
    fn test_adversarial_steps_stay_finite() {
        let params = HestonParams {
            kappa: 0.05,
            xi: 2.0,
            ..base_params()
        };
        let stepper = params.stepper(1.0 / 250.0);
        let mut sampler = NormalSampler::new(42);

        for _ in 0..200 {
            let mut s = params.spot;
            let mut v = params.v0;
            for _ in 0..250 {
                let z1 = sampler.sample();
                let z2 = sampler.sample();
                stepper.step(&mut s, &mut v, z1, z2);
                assert!(!s.is_nan(), "spot became NaN");
                assert!(!v.is_nan(), "variance became NaN");
            }
        }
    }
}
