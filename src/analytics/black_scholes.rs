//! Closed-form Black-Scholes prices and Greeks for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model the underlying follows
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//! and European prices are expressed through
//! ```text
//! d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! ```
//!
//! These are the reference values the Monte Carlo engines are tested against.

use crate::instruments::OptionKind;
use crate::math_utils::{norm_cdf, norm_pdf};

fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> (f64, f64) {
    let sig_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Call price
///
/// ```text
/// C = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
pub fn call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Put price
///
/// ```text
/// P = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

pub fn price(kind: OptionKind, s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    match kind {
        OptionKind::Call => call_price(s, k, r, sigma, t),
        OptionKind::Put => put_price(s, k, r, sigma, t),
    }
}

/// Δ = Φ(d₁) for a call
pub fn call_delta(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    norm_cdf(d1)
}

/// Δ = Φ(d₁) - 1 for a put
pub fn put_delta(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    call_delta(s, k, r, sigma, t) - 1.0
}

/// Γ = φ(d₁) / (S σ √T), identical for calls and puts
pub fn gamma(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    norm_pdf(d1) / (s * sigma * t.sqrt())
}

/// ν = S φ(d₁) √T, identical for calls and puts
pub fn vega(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, sigma, t);
    s * norm_pdf(d1) * t.sqrt()
}

/// Call theta
///
/// ```text
/// Θ = -S*φ(d₁)*σ/(2√T) - r*K*e^(-rT)*Φ(d₂)
/// ```
pub fn call_theta(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    -(s * norm_pdf(d1) * sigma) / (2.0 * t.sqrt()) - r * k * (-r * t).exp() * norm_cdf(d2)
}

pub fn put_theta(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    -(s * norm_pdf(d1) * sigma) / (2.0 * t.sqrt()) + r * k * (-r * t).exp() * norm_cdf(-d2)
}

/// ρ = K T e^(-rT) Φ(d₂) for a call
pub fn call_rho(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (_, d2) = d1_d2(s, k, r, sigma, t);
    k * t * (-r * t).exp() * norm_cdf(d2)
}

pub fn put_rho(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (_, d2) = d1_d2(s, k, r, sigma, t);
    -k * t * (-r * t).exp() * norm_cdf(-d2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const S: f64 = 100.0;
    const K: f64 = 100.0;
    const R: f64 = 0.05;
    const SIGMA: f64 = 0.2;
    const T: f64 = 1.0;

    #[test]
    fn test_reference_values() {
        assert_relative_eq!(call_price(S, K, R, SIGMA, T), 10.450583572185565, epsilon = 1e-9);
        assert_relative_eq!(put_price(S, K, R, SIGMA, T), 5.573526022256971, epsilon = 1e-9);
        assert_relative_eq!(call_delta(S, K, R, SIGMA, T), 0.6368306511756191, epsilon = 1e-9);
        assert_relative_eq!(gamma(S, K, R, SIGMA, T), 0.018762017345847, epsilon = 1e-9);
        assert_relative_eq!(vega(S, K, R, SIGMA, T), 37.524034691693792, epsilon = 1e-8);
        assert_relative_eq!(call_theta(S, K, R, SIGMA, T), -6.414027546438197, epsilon = 1e-8);
        assert_relative_eq!(call_rho(S, K, R, SIGMA, T), 53.232481545376345, epsilon = 1e-8);
    }

    #[test]
    fn test_put_call_parity() {
        let parity = call_price(S, K, R, SIGMA, T) - put_price(S, K, R, SIGMA, T);
        assert_relative_eq!(parity, S - K * (-R * T).exp(), epsilon = 1e-10);

        assert_relative_eq!(
            call_rho(S, K, R, SIGMA, T) - put_rho(S, K, R, SIGMA, T),
            K * T * (-R * T).exp(),
            epsilon = 1e-10
        );
        assert_relative_eq!(
            call_theta(S, K, R, SIGMA, T) - put_theta(S, K, R, SIGMA, T),
            -R * K * (-R * T).exp(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_price_dispatch() {
        assert_eq!(
            price(OptionKind::Call, S, K, R, SIGMA, T),
            call_price(S, K, R, SIGMA, T)
        );
        assert_eq!(
            price(OptionKind::Put, S, K, R, SIGMA, T),
            put_price(S, K, R, SIGMA, T)
        );
    }
}
