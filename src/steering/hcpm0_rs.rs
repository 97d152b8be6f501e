//! Hybrid-curvature Reeds-Shepp paths starting at maximum curvature and
//! ending with straight wheels.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::steering::hc_cc::{HcCcStateSpace, StraightMode};
use crate::steering::hcpmpm_rs::HC_RS_WORDS;
use crate::steering::paths::{EndpointKind, HcCcPath};
use crate::steering::trajectory;

pub struct Hcpm0ReedsSheppStateSpace {
    base: HcCcStateSpace,
}

impl Hcpm0ReedsSheppStateSpace {
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
            EndpointKind::ZeroKappa,
            &HC_RS_WORDS,
            StraightMode::None,
            false,
        )
    }
}

impl StateSpace for Hcpm0ReedsSheppStateSpace {
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
            .controls(EndpointKind::FullKappa, EndpointKind::ZeroKappa)
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

    fn space() -> Hcpm0ReedsSheppStateSpace {
        Hcpm0ReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap()
    }

    #[test]
    fn test_controls_bridge_the_curvature_classes() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, -1.0, 1.0);
        let s2 = State::new(4.0, -2.0, -0.8, 0.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        assert!(!controls.is_empty());
        assert!((controls[0].kappa + 1.0).abs() < get_epsilon(), "start kappa {}", controls[0].kappa);
        let last = controls.last().unwrap();
        let kappa_end = last.kappa + last.sigma * last.delta_s.abs();
        assert!(kappa_end.abs() < get_epsilon(), "end kappa {}", kappa_end);
    }

    #[test]
    fn test_endpoint_fidelity() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let s2 = State::new(3.0, 4.0, 1.5, 0.0, 1.0);
        let path = space.get_path(&s1, &s2);
        let last = path.last().unwrap();
        let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
        assert!(position_error <= 1.0, "position error {}", position_error);
        assert!((last.theta - s2.theta).sin().abs() < 1e-3);
    }

    #[test]
    fn test_length_controls_consistency() {
        let space = space();
        let s1 = State::new(-1.0, 2.0, 1.0, 1.0, 1.0);
        let s2 = State::new(5.0, -1.0, -0.4, 0.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
        assert!((total - space.get_distance(&s1, &s2)).abs() < 1e-9);
    }
}
