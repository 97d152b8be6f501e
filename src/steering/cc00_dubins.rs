//! Continuous-curvature Dubins paths with straight wheels at both ends.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::steering::hc_cc::{HcCcStateSpace, StraightMode};
use crate::steering::paths::{EndpointKind, HcCcPath};
use crate::steering::trajectory;
use crate::steering::words::WordTag;

pub(crate) const CC_DUBINS_WORDS: [WordTag; 3] = [WordTag::TT, WordTag::TST, WordTag::TTT];

pub struct Cc00DubinsStateSpace {
    base: HcCcStateSpace,
}

impl Cc00DubinsStateSpace {
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
            EndpointKind::ZeroKappa,
            EndpointKind::ZeroKappa,
            &CC_DUBINS_WORDS,
            StraightMode::Forward,
            true,
        )
    }
}

impl StateSpace for Cc00DubinsStateSpace {
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
            .controls(EndpointKind::ZeroKappa, EndpointKind::ZeroKappa)
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
    use crate::steering::dubins::DubinsStateSpace;
    use crate::utils::geometry::get_epsilon;
    use std::f64::consts::PI;

    fn space() -> Cc00DubinsStateSpace {
        Cc00DubinsStateSpace::new(1.0, 1.0, 0.1).unwrap()
    }

    #[test]
    fn test_longer_than_dubins_but_continuous() {
        let space = space();
        let dubins = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(5.0, 5.0, PI / 2.0, 0.0, 1.0);
        let cc_length = space.get_distance(&s1, &s2);
        let dubins_length = dubins.get_distance(&s1, &s2);
        assert!(
            cc_length > dubins_length,
            "cc {} should exceed dubins {}",
            cc_length,
            dubins_length
        );

        let controls = space.get_controls(&s1, &s2);
        let mut kappa = 0.0;
        for control in &controls {
            assert!((control.kappa - kappa).abs() < get_epsilon());
            assert!(control.delta_s > -1e-12, "forward-only family");
            kappa = control.kappa + control.sigma * control.delta_s.abs();
        }
        assert!(kappa.abs() < get_epsilon());
    }

    #[test]
    fn test_straight_ahead() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(4.0, 0.0, 0.0, 0.0, 1.0);
        assert!((space.get_distance(&s1, &s2) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoint_fidelity() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let targets = [
            State::new(5.0, 5.0, PI / 2.0, 0.0, 1.0),
            State::new(7.0, -2.0, -0.6, 0.0, 1.0),
            State::new(-4.0, 5.0, 2.5, 0.0, 1.0),
        ];
        for s2 in &targets {
            let path = space.get_path(&s1, s2);
            let last = path.last().unwrap();
            let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
            assert!(position_error <= 1.0, "position error {} to {:?}", position_error, s2);
            assert!((last.theta - s2.theta).sin().abs() < 1e-3);
        }
    }

    #[test]
    fn test_sharpness_is_bounded() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(5.0, 5.0, PI / 2.0, 0.0, 1.0);
        for control in space.get_controls(&s1, &s2) {
            // elementary two-clothoid pieces may sit exactly at the bound
            assert!(control.sigma.abs() <= 1.0 + 1e-6);
            assert!(control.kappa.abs() <= 1.0 + 1e-6);
        }
    }
}
