// src/error.rs
use thiserror::Error;

/// Errors raised by the caller-facing layers of mc-greeks.
///
/// The simulation engines themselves never fail: they return whatever the
/// arithmetic produces. These variants come from opt-in validation, config
/// loading and the implied volatility solver.
#[derive(Debug, Clone, Error)]
pub enum McError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid simulation configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Iterative solver did not converge
    #[error("{method} failed to converge after {iterations} iterations: {reason}")]
    ConvergenceFailure {
        method: String,
        iterations: usize,
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    Config(String),
}

/// Result type alias for mc-greeks operations
pub type McResult<T> = Result<T, McError>;

/// Checks shared by the `validate` methods on params and configs
pub mod validation {
    use super::{McError, McResult};

    /// Upper bound on `num_paths`
    pub const MAX_PATHS: usize = 1_000_000_000;
    /// Upper bound on `num_steps`
    pub const MAX_STEPS: usize = 100_000;

    fn invalid(name: &str, value: f64, constraint: impl Into<String>) -> McError {
        McError::InvalidParameters {
            parameter: name.to_string(),
            value,
            constraint: constraint.into(),
        }
    }

    fn check_count(field: &str, count: usize, max: Option<usize>) -> McResult<()> {
        let reason = match max {
            _ if count == 0 => "must be at least 1".to_string(),
            Some(max) if count > max => format!("{} exceeds the limit of {}", count, max),
            _ => return Ok(()),
        };
        Err(McError::InvalidConfiguration {
            field: field.to_string(),
            reason,
        })
    }

    /// `value > 0`; NaN is rejected
    pub fn validate_positive(name: &str, value: f64) -> McResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(invalid(name, value, "must be > 0"))
        }
    }

    /// `value >= 0`; NaN is rejected
    pub fn validate_non_negative(name: &str, value: f64) -> McResult<()> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(invalid(name, value, "must be >= 0"))
        }
    }

    /// `min <= value <= max`
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> McResult<()> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(invalid(name, value, format!("must lie in [{}, {}]", min, max)))
        }
    }

    pub fn validate_correlation(name: &str, rho: f64) -> McResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    pub fn validate_finite(name: &str, value: f64) -> McResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(invalid(name, value, "must be finite"))
        }
    }

    pub fn validate_paths(paths: usize) -> McResult<()> {
        check_count("num_paths", paths, Some(MAX_PATHS))
    }

    pub fn validate_steps(steps: usize) -> McResult<()> {
        check_count("num_steps", steps, Some(MAX_STEPS))
    }

    pub fn validate_workers(workers: usize) -> McResult<()> {
        check_count("num_workers", workers, None)
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_sign_checks_reject_nan() {
        assert!(validate_positive("volatility", 0.2).is_ok());
        assert!(validate_positive("volatility", 0.0).is_err());
        assert!(validate_positive("volatility", f64::NAN).is_err());
        assert!(validate_non_negative("xi", 0.0).is_ok());
        assert!(validate_non_negative("xi", -1e-12).is_err());
        assert!(validate_non_negative("xi", f64::NAN).is_err());
    }

    #[test]
    fn test_correlation_bounds_are_inclusive() {
        for rho in [-1.0, -0.7, 0.0, 1.0] {
            assert!(validate_correlation("rho", rho).is_ok(), "rho = {}", rho);
        }
        for rho in [-1.0001, 1.0001, f64::NAN] {
            assert!(validate_correlation("rho", rho).is_err(), "rho = {}", rho);
        }
    }

    #[test]
    fn test_finite_check() {
        assert!(validate_finite("spot", 100.0).is_ok());
        assert!(validate_finite("spot", f64::INFINITY).is_err());
        assert!(validate_finite("spot", f64::NAN).is_err());
    }

    #[test]
    fn test_count_checks() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_paths(MAX_PATHS + 1).is_err());
        assert!(validate_steps(MAX_STEPS).is_ok());
        assert!(validate_workers(64).is_ok());

        let err = validate_workers(0).unwrap_err();
        assert!(matches!(
            err,
            McError::InvalidConfiguration { ref field, .. } if field == "num_workers"
        ));
    }

    #[test]
    fn test_messages_name_the_offender() {
        let msg = validate_positive("kappa", -2.0).unwrap_err().to_string();
        assert!(msg.contains("kappa"));
        assert!(msg.contains("-2"));

        let msg = validate_steps(0).unwrap_err().to_string();
        assert!(msg.contains("num_steps"));

        let msg = McError::ConvergenceFailure {
            method: "Newton-Raphson implied volatility".to_string(),
            iterations: 100,
            reason: "vega collapsed".to_string(),
        }
        .to_string();
        assert!(msg.contains("after 100 iterations"));
    }
}
