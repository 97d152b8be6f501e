//! Common traits defining the interface shared by all steering families

use crate::common::types::*;

/// Uniform surface of a steering state space.
///
/// Every family computes from its inputs and immutable precomputed
/// parameters only; instances may be shared freely across threads once
/// the filter parameters are set.
pub trait StateSpace {
    /// Forward the EKF configuration to the covariance propagation
    fn set_filter_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    );

    /// Shortest path length between two states [m]
    fn get_distance(&self, state1: &State, state2: &State) -> f64;

    /// Ordered control sequence realising the shortest path
    fn get_controls(&self, state1: &State, state2: &State) -> Vec<Control>;

    /// Shortest path sampled at the discretization step
    fn get_path(&self, state1: &State, state2: &State) -> Vec<State>;

    /// Sampled path with covariance propagated through the EKF
    fn get_path_with_covariance(
        &self,
        state1: &StateWithCovariance,
        state2: &State,
    ) -> Vec<StateWithCovariance>;

    /// Pose at fractional arc length `t` in [0, 1] along the controls
    fn interpolate(&self, state: &State, controls: &[Control], t: f64) -> State;
}
