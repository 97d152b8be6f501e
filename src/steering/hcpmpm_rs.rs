//! Hybrid-curvature Reeds-Shepp paths arriving and leaving at maximum
//! curvature on both ends.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::steering::hc_cc::{HcCcStateSpace, StraightMode};
use crate::steering::paths::{EndpointKind, HcCcPath};
use crate::steering::trajectory;
use crate::steering::words::WordTag;

pub(crate) const HC_RS_WORDS: [WordTag; 15] = [
    WordTag::TT,
    WordTag::TcT,
    WordTag::TcTcT,
    WordTag::TcTT,
    WordTag::TTcT,
    WordTag::TST,
    WordTag::TSTcT,
    WordTag::TcTST,
    WordTag::TcTSTcT,
    WordTag::TTcTT,
    WordTag::TcTTcT,
    WordTag::TTT,
    WordTag::TcST,
    WordTag::TScT,
    WordTag::TcScT,
];

pub struct HcpmpmReedsSheppStateSpace {
    base: HcCcStateSpace,
}

impl HcpmpmReedsSheppStateSpace {
    pub fn new(kappa: f64, sigma: f64, discretization: f64) -> SteeringResult<Self> {
        Ok(Self { base: HcCcStateSpace::new(kappa, sigma, discretization)? })
    }

    /// Override the tolerance of the marginal word-existence predicates.
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
            &HC_RS_WORDS,
            StraightMode::None,
            false,
        )
    }
}

impl StateSpace for HcpmpmReedsSheppStateSpace {
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
    use std::f64::consts::PI;

    fn space() -> HcpmpmReedsSheppStateSpace {
        HcpmpmReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap()
    }

    #[test]
    fn test_first_control_keeps_start_curvature_sign() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let s2 = State::new(0.5, 0.3, 0.2, -1.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        assert!(!controls.is_empty());
        // curvature continuity at the start: the path begins on a left
        // circle
        assert!((controls[0].kappa - 1.0).abs() < 1e-9, "kappa {}", controls[0].kappa);
        let last = controls.last().unwrap();
        let kappa_end = last.kappa + last.sigma * last.delta_s.abs();
        assert!((kappa_end + 1.0).abs() < 1e-9, "end kappa {}", kappa_end);
    }

    #[test]
    fn test_distance_matches_control_lengths() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let targets = [
            State::new(4.0, 1.0, 0.5, 1.0, 1.0),
            State::new(-2.0, 3.0, -1.0, -1.0, 1.0),
            State::new(6.0, -2.0, PI / 2.0, 1.0, 1.0),
        ];
        for s2 in &targets {
            let controls = space.get_controls(&s1, s2);
            let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
            let distance = space.get_distance(&s1, s2);
            assert!((total - distance).abs() < 1e-9, "{} vs {}", total, distance);
        }
    }

    #[test]
    fn test_endpoint_fidelity() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let targets = [
            State::new(4.0, 1.0, 0.5, 1.0, 1.0),
            State::new(6.0, -2.0, PI / 2.0, -1.0, 1.0),
            State::new(-3.0, -3.0, -0.7, 1.0, 1.0),
        ];
        for s2 in &targets {
            let path = space.get_path(&s1, s2);
            let last = path.last().unwrap();
            let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
            assert!(position_error <= 1.0, "position error {} to {:?}", position_error, s2);
            assert!((last.theta - s2.theta).sin().abs() < 1e-3, "heading to {:?}", s2);
        }
    }

    #[test]
    fn test_degenerate_same_pose() {
        let space = space();
        let s = State::new(1.0, 2.0, 0.3, 1.0, 1.0);
        assert!(space.get_distance(&s, &s).abs() < 1e-12);
        let controls = space.get_controls(&s, &s);
        assert_eq!(controls.len(), 1);
        assert!(controls[0].delta_s.abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_idempotent_at_one() {
        let space = space();
        let s1 = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let s2 = State::new(5.0, 2.0, 1.2, -1.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        let sampled = space.get_path(&s1, &s2);
        let interpolated = space.interpolate(&s1, &controls, 1.0);
        let last = sampled.last().unwrap();
        assert!((interpolated.x - last.x).abs() < 1e-12);
        assert!((interpolated.y - last.y).abs() < 1e-12);
    }
}
