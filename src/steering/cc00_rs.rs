//! Continuous-curvature Reeds-Shepp paths: zero curvature at both ends
//! and at every direction switch, so the curvature profile has no jumps
//! anywhere.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::steering::hc_cc::{HcCcStateSpace, StraightMode};
use crate::steering::paths::{EndpointKind, HcCcPath};
use crate::steering::trajectory;
use crate::steering::words::WordTag;

const CC_RS_WORDS: [WordTag; 4] = [WordTag::TT, WordTag::TcTZero, WordTag::TST, WordTag::TTT];

pub struct Cc00ReedsSheppStateSpace {
    base: HcCcStateSpace,
}

impl Cc00ReedsSheppStateSpace {
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
            &CC_RS_WORDS,
            StraightMode::BothDirections,
            false,
        )
    }
}

impl StateSpace for Cc00ReedsSheppStateSpace {
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
    use crate::utils::geometry::get_epsilon;

    fn space() -> Cc00ReedsSheppStateSpace {
        Cc00ReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap()
    }

    fn assert_curvature_continuous(controls: &[Control]) {
        let mut kappa = 0.0;
        for control in controls {
            assert!(
                (control.kappa - kappa).abs() < get_epsilon(),
                "curvature jump {} -> {}",
                kappa,
                control.kappa
            );
            kappa = control.kappa + control.sigma * control.delta_s.abs();
        }
        assert!(kappa.abs() < get_epsilon(), "final curvature {}", kappa);
    }

    #[test]
    fn test_no_curvature_jumps() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let targets = [
            State::new(6.0, 4.0, 1.0, 0.0, 1.0),
            State::new(-5.0, 1.0, -0.5, 0.0, 1.0),
            State::new(1.0, 7.0, 2.8, 0.0, 1.0),
        ];
        for s2 in &targets {
            let controls = space.get_controls(&s1, s2);
            assert!(!controls.is_empty());
            assert_curvature_continuous(&controls);
        }
    }

    #[test]
    fn test_straight_words() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let ahead = State::new(2.5, 0.0, 0.0, 0.0, 1.0);
        let behind = State::new(-2.5, 0.0, 0.0, 0.0, -1.0);
        assert!((space.get_distance(&s1, &ahead) - 2.5).abs() < 1e-9);
        assert!((space.get_distance(&s1, &behind) - 2.5).abs() < 1e-9);
        let reverse = space.get_controls(&s1, &behind);
        assert_eq!(reverse.len(), 1);
        assert!(reverse[0].delta_s < 0.0);
    }

    #[test]
    fn test_endpoint_fidelity() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let targets = [State::new(6.0, 4.0, 1.0, 0.0, 1.0), State::new(-5.0, 1.0, -0.5, 0.0, 1.0)];
        for s2 in &targets {
            let path = space.get_path(&s1, s2);
            let last = path.last().unwrap();
            let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
            assert!(position_error <= 1.0, "position error {} to {:?}", position_error, s2);
            assert!((last.theta - s2.theta).sin().abs() < 1e-3);
        }
    }

    #[test]
    fn test_length_controls_consistency() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(4.0, -3.0, -1.1, 0.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
        assert!((total - space.get_distance(&s1, &s2)).abs() < 1e-9);
    }
}
