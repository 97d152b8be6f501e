//! Extended Kalman Filter for covariance propagation along a steered path.
//!
//! Propagates three matrices per pose: the state-estimate covariance
//! `sigma`, the information `lambda` a closed-loop tracking controller is
//! expected to gain, and their sum, the total covariance. The filter
//! linearises the clothoid unicycle (x, y, theta, kappa) around the
//! nominal trajectory produced by the steering solvers; the nominal pose
//! itself passes through unchanged.

use nalgebra::{Matrix2, Matrix2x4, Matrix3, Matrix3x4, Matrix4, Matrix4x2, Matrix4x3};

use crate::common::types::{Control, ControllerGains, MeasurementNoise, MotionNoise, StateWithCovariance};
use crate::utils::geometry::sgn;

/// EKF collaborator of the steering state spaces
#[derive(Debug, Clone)]
pub struct Ekf {
    motion_noise: MotionNoise,
    measurement_noise: MeasurementNoise,
    controller: ControllerGains,
}

impl Default for Ekf {
    fn default() -> Self {
        Self {
            motion_noise: MotionNoise::new(0.0, 0.0, 0.0, 0.0),
            measurement_noise: MeasurementNoise::new(0.0, 0.0, 0.0),
            controller: ControllerGains::new(0.0, 0.0, 0.0),
        }
    }
}

impl Ekf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    ) {
        self.motion_noise = *motion_noise;
        self.measurement_noise = *measurement_noise;
        self.controller = *controller;
    }

    /// Jacobian of the step motion with respect to the state
    fn motion_jacobian_state(state: &StateWithCovariance, control: &Control, step: f64) -> Matrix4<f64> {
        let d = sgn(control.delta_s);
        let theta = state.state.theta;
        let kappa = state.state.kappa;
        // heading at the middle of the step
        let theta_m = theta + 0.5 * d * kappa * step;
        Matrix4::new(
            1.0, 0.0, -d * step * theta_m.sin(), -0.5 * step * step * theta_m.sin(),
            0.0, 1.0, d * step * theta_m.cos(), 0.5 * step * step * theta_m.cos(),
            0.0, 0.0, 1.0, d * step,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Jacobian of the step motion with respect to the control (arc length, sharpness)
    fn motion_jacobian_control(state: &StateWithCovariance, control: &Control, step: f64) -> Matrix4x2<f64> {
        let d = sgn(control.delta_s);
        let kappa = state.state.kappa;
        let theta_m = state.state.theta + 0.5 * d * kappa * step;
        Matrix4x2::new(
            d * theta_m.cos(), 0.0,
            d * theta_m.sin(), 0.0,
            d * kappa, 0.5 * d * step * step,
            control.sigma, step,
        )
    }

    /// Control-space motion noise
    fn motion_covariance(&self, control: &Control, step: f64) -> Matrix2<f64> {
        let n = &self.motion_noise;
        Matrix2::new(
            n.alpha1 * step * step + n.alpha2 * control.sigma * control.sigma, 0.0,
            0.0, n.alpha3 * step * step + n.alpha4 * control.sigma * control.sigma,
        )
    }

    /// Feedback matrix of the modelled tracking controller
    fn controller_gain(&self) -> Matrix2x4<f64> {
        let g = &self.controller;
        Matrix2x4::new(
            g.k1, 0.0, 0.0, 0.0,
            0.0, g.k2, g.k3, 0.0,
        )
    }

    fn observation_jacobian() -> Matrix3x4<f64> {
        Matrix3x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        )
    }

    fn observation_covariance(&self) -> Matrix3<f64> {
        let m = &self.measurement_noise;
        Matrix3::new(
            m.std_x * m.std_x, 0.0, 0.0,
            0.0, m.std_y * m.std_y, 0.0,
            0.0, 0.0, m.std_theta * m.std_theta,
        )
    }

    /// Prediction step over one integration step of the given control.
    ///
    /// `pred.state` must already hold the integrated nominal pose; the
    /// matrices of `pred` are overwritten.
    pub fn predict(
        &self,
        state: &StateWithCovariance,
        control: &Control,
        integration_step: f64,
        pred: &mut StateWithCovariance,
    ) {
        let f = Self::motion_jacobian_state(state, control, integration_step);
        let g = Self::motion_jacobian_control(state, control, integration_step);
        let m = self.motion_covariance(control, integration_step);
        let k = self.controller_gain();

        pred.sigma = f * state.sigma * f.transpose() + g * m * g.transpose();
        let closed_loop = f - g * k;
        pred.lambda = closed_loop * state.lambda * closed_loop.transpose();
        pred.covariance = pred.sigma + pred.lambda;
    }

    /// Measurement update.
    ///
    /// Shrinks the estimate covariance and books the gained information
    /// into `lambda`; the total covariance is their sum. With a singular
    /// innovation (e.g. zero measurement noise and zero uncertainty) the
    /// matrices pass through unchanged.
    pub fn update(&self, pred: &StateWithCovariance, next: &mut StateWithCovariance) {
        let h = Self::observation_jacobian();
        let r = self.observation_covariance();
        let innovation = h * pred.sigma * h.transpose() + r;

        if let Some(innovation_inv) = innovation.try_inverse() {
            let gain: Matrix4x3<f64> = pred.sigma * h.transpose() * innovation_inv;
            next.sigma = (Matrix4::identity() - gain * h) * pred.sigma;
            next.lambda = pred.lambda + gain * h * pred.sigma;
        } else {
            next.sigma = pred.sigma;
            next.lambda = pred.lambda;
        }
        next.covariance = next.sigma + next.lambda;
    }
}
