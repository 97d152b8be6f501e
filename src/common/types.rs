//! Common types used throughout rust_steering

use nalgebra::Matrix4;

/// Planar pose of a car-like vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub x: f64,
    pub y: f64,
    /// Heading [rad]
    pub theta: f64,
    /// Signed curvature at the pose [1/m]
    pub kappa: f64,
    /// Direction of travel: +1.0 forwards, -1.0 backwards
    pub d: f64,
}

impl State {
    pub fn new(x: f64, y: f64, theta: f64, kappa: f64, d: f64) -> Self {
        Self { x, y, theta, kappa, d }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, theta: 0.0, kappa: 0.0, d: 0.0 }
    }

    /// Euclidean distance between the positions of two states
    pub fn distance(&self, other: &State) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::origin()
    }
}

/// Pose plus the three covariance matrices propagated by the EKF:
/// the state-estimate covariance, the information the closed-loop
/// controller is expected to gain, and their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct StateWithCovariance {
    pub state: State,
    /// State estimate covariance
    pub sigma: Matrix4<f64>,
    /// Expected information
    pub lambda: Matrix4<f64>,
    /// Total covariance (sigma + lambda)
    pub covariance: Matrix4<f64>,
}

impl StateWithCovariance {
    pub fn new(
        state: State,
        sigma: Matrix4<f64>,
        lambda: Matrix4<f64>,
        covariance: Matrix4<f64>,
    ) -> Self {
        Self { state, sigma, lambda, covariance }
    }

    /// Wrap a state with zero uncertainty
    pub fn from_state(state: State) -> Self {
        Self {
            state,
            sigma: Matrix4::zeros(),
            lambda: Matrix4::zeros(),
            covariance: Matrix4::zeros(),
        }
    }
}

/// Piecewise-constant-sharpness motion primitive.
///
/// The curvature along the primitive is `kappa + sgn(delta_s) * sigma * s`
/// for arc length `s` in `[0, |delta_s|]`; `sigma = 0` yields a circular
/// arc or a straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    /// Signed arc length [m]; the sign encodes the direction of travel
    pub delta_s: f64,
    /// Curvature at the start of the primitive [1/m]
    pub kappa: f64,
    /// Sharpness: rate of curvature change with arc length [1/m^2]
    pub sigma: f64,
}

impl Control {
    pub fn new(delta_s: f64, kappa: f64, sigma: f64) -> Self {
        Self { delta_s, kappa, sigma }
    }
}

/// Motion noise parameters of the EKF (control-space noise coefficients)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionNoise {
    pub alpha1: f64,
    pub alpha2: f64,
    pub alpha3: f64,
    pub alpha4: f64,
}

impl MotionNoise {
    pub fn new(alpha1: f64, alpha2: f64, alpha3: f64, alpha4: f64) -> Self {
        Self { alpha1, alpha2, alpha3, alpha4 }
    }
}

/// Measurement noise parameters of the EKF (pose measurement std-devs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementNoise {
    pub std_x: f64,
    pub std_y: f64,
    pub std_theta: f64,
}

impl MeasurementNoise {
    pub fn new(std_x: f64, std_y: f64, std_theta: f64) -> Self {
        Self { std_x, std_y, std_theta }
    }
}

/// Feedback gains of the trajectory-tracking controller the EKF models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerGains {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
}

impl ControllerGains {
    pub fn new(k1: f64, k2: f64, k3: f64) -> Self {
        Self { k1, k2, k3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_distance() {
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(3.0, 4.0, 1.0, 0.5, -1.0);
        assert!((s1.distance(&s2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_state_with_covariance_from_state() {
        let swc = StateWithCovariance::from_state(State::origin());
        assert_eq!(swc.sigma, Matrix4::zeros());
        assert_eq!(swc.covariance, Matrix4::zeros());
    }

    #[test]
    fn test_control_curvature_profile() {
        let control = Control::new(-2.0, 0.5, 0.25);
        // curvature at the far end of the primitive
        let kappa_end =
            control.kappa + control.delta_s.signum() * control.sigma * control.delta_s.abs();
        assert!((kappa_end - 0.0).abs() < 1e-12);
    }
}
