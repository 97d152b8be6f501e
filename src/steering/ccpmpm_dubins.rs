//! Continuous-curvature Dubins paths at maximum curvature on both ends.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::steering::cc00_dubins::CC_DUBINS_WORDS;
use crate::steering::hc_cc::{HcCcStateSpace, StraightMode};
use crate::steering::paths::{EndpointKind, HcCcPath};
use crate::steering::trajectory;

pub struct CcpmpmDubinsStateSpace {
    base: HcCcStateSpace,
}

impl CcpmpmDubinsStateSpace {
    pub fn new(kappa: f64, sigma: f64, discretization: f64) -> SteeringResult<Self> {
        Ok(Self { base: HcCcStateSpace::new(kappa, sigma, discretization)? })
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.base.epsilon = epsilon;
        self
    }

    fn shortest(&self, state1: &State, state2: &State) -> HcCcPath {
        self.base.shortest_path(
            state1,
            state2,
            EndpointKind::FullKappa,
            EndpointKind::FullKappa,
            &CC_DUBINS_WORDS,
            StraightMode::None,
            true,
        )
    }
}

impl StateSpace for CcpmpmDubinsStateSpace {
    fn set_filter_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    ) {
        self.base.ekf.set_parameters(motion_noise, measurement_noise, controller);
    }

    fn get_distance(&self, state1: &State, state2: &State) -> f64 {
        self.shortest(state1, state2).length
    }

    fn get_controls(&self, state1: &State, state2: &State) -> Vec<Control> {
        self.shortest(state1, state2)
            .controls(EndpointKind::FullKappa, EndpointKind::FullKappa)
    }

    fn get_path(&self, state1: &State, state2: &State) -> Vec<State> {
        let controls = self.get_controls(state1, state2);
        trajectory::integrate(state1, &controls, self.base.discretization)
    }

    fn get_path_with_covariance(
        &self,
        state1: &StateWithCovariance,
        state2: &State,
    ) -> Vec<StateWithCovariance> {
        let controls = self.get_controls(&state1.state, state2);
        trajectory::integrate_with_covariance(
            state1,
            &controls,
            self.base.discretization,
            &self.base.ekf,
        )
    }

    fn interpolate(&self, state: &State, controls: &[Control], t: f64) -> State {
        trajectory::interpolate(state, controls, t, self.base.discretization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::get_epsilon;

    #[test]
    fn test_keeps_both_endpoint_curvatures() {
        let space = CcpmpmDubinsStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let s2 = State::new(6.0, 3.0, 0.9, -1.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        assert!(!controls.is_empty());
        assert!((controls[0].kappa - 1.0).abs() < get_epsilon());
        let last = controls.last().unwrap();
        let kappa_end = last.kappa + last.sigma * last.delta_s.abs();
        assert!((kappa_end + 1.0).abs() < get_epsilon(), "end kappa {}", kappa_end);
    }

    #[test]
    fn test_endpoint_fidelity() {
        let space = CcpmpmDubinsStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let s2 = State::new(6.0, 3.0, 0.9, -1.0, 1.0);
        let path = space.get_path(&s1, &s2);
        let last = path.last().unwrap();
        let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
        assert!(position_error <= 1.0, "position error {}", position_error);
        assert!((last.theta - s2.theta).sin().abs() < 1e-3);
    }
}
