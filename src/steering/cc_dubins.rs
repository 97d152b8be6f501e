//! Continuous-curvature Dubins steering for arbitrary endpoint
//! curvatures: dispatches to the matching endpoint-curvature family.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::localization::ekf::Ekf;
use crate::steering::cc00_dubins::Cc00DubinsStateSpace;
use crate::steering::cc0pm_dubins::Cc0pmDubinsStateSpace;
use crate::steering::ccpm0_dubins::Ccpm0DubinsStateSpace;
use crate::steering::ccpmpm_dubins::CcpmpmDubinsStateSpace;
use crate::steering::paths::reverse_control;
use crate::steering::trajectory;
use crate::utils::geometry::get_epsilon;

/// Continuous-curvature Dubins state space; `forwards = false` solves
/// the swapped problem and reverses the controls.
pub struct CcDubinsStateSpace {
    discretization: f64,
    forwards: bool,
    cc00: Cc00DubinsStateSpace,
    cc0pm: Cc0pmDubinsStateSpace,
    ccpm0: Ccpm0DubinsStateSpace,
    ccpmpm: CcpmpmDubinsStateSpace,
    ekf: Ekf,
}

impl CcDubinsStateSpace {
    pub fn new(kappa: f64, sigma: f64, discretization: f64, forwards: bool) -> SteeringResult<Self> {
        Ok(Self {
            discretization,
            forwards,
            cc00: Cc00DubinsStateSpace::new(kappa, sigma, discretization)?,
            cc0pm: Cc0pmDubinsStateSpace::new(kappa, sigma, discretization)?,
            ccpm0: Ccpm0DubinsStateSpace::new(kappa, sigma, discretization)?,
            ccpmpm: CcpmpmDubinsStateSpace::new(kappa, sigma, discretization)?,
            ekf: Ekf::new(),
        })
    }

    /// Endpoint curvatures within epsilon of zero use the zero class.
    fn family_controls(&self, state1: &State, state2: &State) -> Vec<Control> {
        let zero1 = state1.kappa.abs() <= get_epsilon();
        let zero2 = state2.kappa.abs() <= get_epsilon();
        match (zero1, zero2) {
            (true, true) => self.cc00.get_controls(state1, state2),
            (true, false) => self.cc0pm.get_controls(state1, state2),
            (false, true) => self.ccpm0.get_controls(state1, state2),
            (false, false) => self.ccpmpm.get_controls(state1, state2),
        }
    }
}

impl StateSpace for CcDubinsStateSpace {
    fn set_filter_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    ) {
        self.ekf.set_parameters(motion_noise, measurement_noise, controller);
    }

    fn get_distance(&self, state1: &State, state2: &State) -> f64 {
        self.get_controls(state1, state2).iter().map(|c| c.delta_s.abs()).sum()
    }

    fn get_controls(&self, state1: &State, state2: &State) -> Vec<Control> {
        if self.forwards {
            self.family_controls(state1, state2)
        } else {
            let mut controls = self.family_controls(state2, state1);
            controls.reverse();
            for control in &mut controls {
                reverse_control(control);
            }
            controls
        }
    }

    fn get_path(&self, state1: &State, state2: &State) -> Vec<State> {
        let controls = self.get_controls(state1, state2);
        trajectory::integrate(state1, &controls, self.discretization)
    }

    fn get_path_with_covariance(
        &self,
        state1: &StateWithCovariance,
        state2: &State,
    ) -> Vec<StateWithCovariance> {
        let controls = self.get_controls(&state1.state, state2);
        trajectory::integrate_with_covariance(state1, &controls, self.discretization, &self.ekf)
    }

    fn interpolate(&self, state: &State, controls: &[Control], t: f64) -> State {
        trajectory::interpolate(state, controls, t, self.discretization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_dispatch_by_endpoint_curvature() {
        let space = CcDubinsStateSpace::new(1.0, 1.0, 0.1, true).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(5.0, 5.0, PI / 2.0, 0.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        assert!(controls[0].kappa.abs() < 1e-9);

        let s1_steered = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        let controls = space.get_controls(&s1_steered, &s2);
        assert!((controls[0].kappa - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_backwards_traverses_the_reversed_problem() {
        let forwards = CcDubinsStateSpace::new(1.0, 1.0, 0.1, true).unwrap();
        let backwards = CcDubinsStateSpace::new(1.0, 1.0, 0.1, false).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(4.0, 3.0, 0.8, 0.0, 1.0);
        assert!(
            (forwards.get_distance(&s2, &s1) - backwards.get_distance(&s1, &s2)).abs() < 1e-9
        );
        // the reversed control list drives from s1 to s2 in reverse gear
        let controls = backwards.get_controls(&s1, &s2);
        assert!(controls.iter().all(|c| c.delta_s <= 1e-12));
        let path = backwards.get_path(&s1, &s2);
        let last = path.last().unwrap();
        let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
        assert!(position_error <= 1.0, "position error {}", position_error);
    }
}
