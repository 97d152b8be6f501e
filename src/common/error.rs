//! Error types for rust_steering

use std::fmt;

/// Main error type for the steering library
#[derive(Debug)]
pub enum SteeringError {
    /// Invalid state-space parameter (non-finite or out of range)
    InvalidParameter(String),
    /// Numerical computation failed (matrix inversion, etc.)
    NumericalError(String),
}

impl fmt::Display for SteeringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SteeringError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            SteeringError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for SteeringError {}

/// Result type alias for steering operations
pub type SteeringResult<T> = Result<T, SteeringError>;

/// Validate the common state-space parameters shared by all families.
pub(crate) fn check_state_space_params(kappa: f64, discretization: f64) -> SteeringResult<()> {
    if !kappa.is_finite() || kappa <= 0.0 {
        return Err(SteeringError::InvalidParameter(format!(
            "maximum curvature must be finite and positive, got {}",
            kappa
        )));
    }
    if !discretization.is_finite() || discretization <= 0.0 {
        return Err(SteeringError::InvalidParameter(format!(
            "discretization must be finite and positive, got {}",
            discretization
        )));
    }
    Ok(())
}

/// Validate the sharpness parameter of the clothoid families.
pub(crate) fn check_sharpness(sigma: f64) -> SteeringResult<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SteeringError::InvalidParameter(format!(
            "maximum sharpness must be finite and positive, got {}",
            sigma
        )));
    }
    Ok(())
}
