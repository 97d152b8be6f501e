//! Hybrid-curvature Reeds-Shepp steering for arbitrary endpoint
//! curvatures: dispatches to the matching endpoint-curvature family.

use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::localization::ekf::Ekf;
use crate::steering::hc00_rs::Hc00ReedsSheppStateSpace;
use crate::steering::hc0pm_rs::Hc0pmReedsSheppStateSpace;
use crate::steering::hcpm0_rs::Hcpm0ReedsSheppStateSpace;
use crate::steering::hcpmpm_rs::HcpmpmReedsSheppStateSpace;
use crate::steering::trajectory;
use crate::utils::geometry::get_epsilon;

pub struct HcReedsSheppStateSpace {
    discretization: f64,
    hc00: Hc00ReedsSheppStateSpace,
    hc0pm: Hc0pmReedsSheppStateSpace,
    hcpm0: Hcpm0ReedsSheppStateSpace,
    hcpmpm: HcpmpmReedsSheppStateSpace,
    ekf: Ekf,
}

impl HcReedsSheppStateSpace {
    pub fn new(kappa: f64, sigma: f64, discretization: f64) -> SteeringResult<Self> {
        Ok(Self {
            discretization,
            hc00: Hc00ReedsSheppStateSpace::new(kappa, sigma, discretization)?,
            hc0pm: Hc0pmReedsSheppStateSpace::new(kappa, sigma, discretization)?,
            hcpm0: Hcpm0ReedsSheppStateSpace::new(kappa, sigma, discretization)?,
            hcpmpm: HcpmpmReedsSheppStateSpace::new(kappa, sigma, discretization)?,
            ekf: Ekf::new(),
        })
    }

    /// Endpoint curvatures within epsilon of zero use the zero class.
    fn family(&self, state1: &State, state2: &State) -> &dyn StateSpace {
        let zero1 = state1.kappa.abs() <= get_epsilon();
        let zero2 = state2.kappa.abs() <= get_epsilon();
        match (zero1, zero2) {
            (true, true) => &self.hc00,
            (true, false) => &self.hc0pm,
            (false, true) => &self.hcpm0,
            (false, false) => &self.hcpmpm,
        }
    }
}

impl StateSpace for HcReedsSheppStateSpace {
    fn set_filter_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    ) {
        self.ekf.set_parameters(motion_noise, measurement_noise, controller);
    }

    fn get_distance(&self, state1: &State, state2: &State) -> f64 {
        self.family(state1, state2).get_distance(state1, state2)
    }

    fn get_controls(&self, state1: &State, state2: &State) -> Vec<Control> {
        self.family(state1, state2).get_controls(state1, state2)
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

    #[test]
    fn test_dispatch_by_endpoint_curvature() {
        let space = HcReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let straight = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let steered = State::new(4.0, 2.0, 0.6, 1.0, 1.0);

        let controls = space.get_controls(&straight, &steered);
        assert!(controls[0].kappa.abs() < 1e-9);
        let last = controls.last().unwrap();
        let kappa_end = last.kappa + last.sigma * last.delta_s.abs();
        assert!((kappa_end - 1.0).abs() < 1e-6, "end kappa {}", kappa_end);

        let controls = space.get_controls(&steered, &straight);
        assert!((controls[0].kappa - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_positive_and_consistent() {
        let space = HcReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(-2.0, 5.0, 2.2, -1.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
        assert!((total - space.get_distance(&s1, &s2)).abs() < 1e-9);
        assert!(total > 0.0);
    }
}
