//! Shared core of the clothoid-based state spaces: precomputed circle
//! parameters, candidate circle construction at the two endpoints, and
//! the shortest-candidate selection over all circle pairs.

use itertools::iproduct;
use ordered_float::OrderedFloat;

use crate::common::error::{check_sharpness, check_state_space_params};
use crate::common::types::State;
use crate::common::SteeringResult;
use crate::localization::ekf::Ekf;
use crate::steering::circle::{CircleParam, HcCcCircle};
use crate::steering::configuration::{configuration_aligned, Configuration};
use crate::steering::paths::{EndpointKind, HcCcPath, HcCcWord};
use crate::steering::words::{WordSolver, WordTag};
use crate::utils::geometry::get_epsilon;

/// Whether a family admits straight words, and in which directions of
/// travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StraightMode {
    None,
    Forward,
    BothDirections,
}

/// Precomputed per-instance data shared by every clothoid family.
pub(crate) struct HcCcStateSpace {
    pub(crate) kappa: f64,
    pub(crate) sigma: f64,
    pub(crate) discretization: f64,
    /// Tolerance of the marginal word-existence predicates
    pub(crate) epsilon: f64,
    pub(crate) hc_param: CircleParam,
    pub(crate) rs_param: CircleParam,
    pub(crate) ekf: Ekf,
}

impl HcCcStateSpace {
    pub(crate) fn new(kappa: f64, sigma: f64, discretization: f64) -> SteeringResult<Self> {
        check_state_space_params(kappa, discretization)?;
        check_sharpness(sigma)?;
        Ok(Self {
            kappa,
            sigma,
            discretization,
            epsilon: get_epsilon(),
            hc_param: CircleParam::new(kappa, sigma),
            rs_param: CircleParam::rs(kappa),
            ekf: Ekf::new(),
        })
    }

    /// Candidate turning circles at a path endpoint.
    ///
    /// Full-curvature endpoints commit to the sign of the endpoint
    /// curvature (strictly compared against zero, so an exactly straight
    /// wheel keeps both orientations); zero-curvature endpoints keep all
    /// four circles. Forward-only families drop the circles of the
    /// opposite traversal sense.
    pub(crate) fn endpoint_circles(
        &self,
        state: &State,
        kind: EndpointKind,
        at_start: bool,
        forward_only: bool,
    ) -> Vec<HcCcCircle> {
        let mut circles = Vec::with_capacity(4);
        let forwards: &[bool] = if forward_only {
            if at_start {
                &[true]
            } else {
                &[false]
            }
        } else {
            &[true, false]
        };
        for &forward in forwards {
            for &left in &[true, false] {
                match kind {
                    EndpointKind::FullKappa => {
                        if left && state.kappa < 0.0 {
                            continue;
                        }
                        if !left && state.kappa > 0.0 {
                            continue;
                        }
                        let kappa = if left { self.kappa } else { -self.kappa };
                        let q = Configuration::new(state.x, state.y, state.theta, kappa);
                        circles.push(HcCcCircle::from_start(&q, left, forward, true, &self.rs_param));
                    }
                    EndpointKind::ZeroKappa => {
                        // forward-only families must not shorten turns by
                        // briefly reversing, so their circles are regular
                        let q = Configuration::new(state.x, state.y, state.theta, 0.0);
                        circles.push(HcCcCircle::from_start(
                            &q,
                            left,
                            forward,
                            forward_only,
                            &self.hc_param,
                        ));
                    }
                }
            }
        }
        circles
    }

    /// Shortest composite path over all endpoint circle pairs and the
    /// family's word set.
    pub(crate) fn shortest_path(
        &self,
        state1: &State,
        state2: &State,
        start_kind: EndpointKind,
        end_kind: EndpointKind,
        words: &[WordTag],
        straight: StraightMode,
        forward_only: bool,
    ) -> HcCcPath {
        let start_cfg = endpoint_configuration(state1, start_kind, self.kappa);
        let end_cfg = endpoint_configuration(state2, end_kind, self.kappa);

        // straight words bypass the circle machinery entirely
        if straight != StraightMode::None {
            let forward_aligned = configuration_aligned(&start_cfg, &end_cfg);
            let backward_aligned = configuration_aligned(&end_cfg, &start_cfg);
            if forward_aligned || (straight == StraightMode::BothDirections && backward_aligned) {
                let length = ((end_cfg.x - start_cfg.x).powi(2)
                    + (end_cfg.y - start_cfg.y).powi(2))
                .sqrt();
                return HcCcPath::new(start_cfg, end_cfg, self.kappa, self.sigma, length, HcCcWord::S);
            }
        }

        let start_circles = self.endpoint_circles(state1, start_kind, true, forward_only);
        let end_circles = self.endpoint_circles(state2, end_kind, false, forward_only);

        let mut solver = WordSolver::new(self, start_kind, end_kind, forward_only);
        let best = iproduct!(start_circles.iter(), end_circles.iter())
            .filter_map(|(c1, c2)| {
                solver
                    .circles_path(c1, c2, words)
                    .map(|(length, word)| (length, word, c1.start, c2.start))
            })
            .min_by_key(|(length, _, _, _)| OrderedFloat(*length));

        match best {
            Some((length, word, q1, q2)) => {
                HcCcPath::new(q1, q2, self.kappa, self.sigma, length, word)
            }
            // unreachable with the default tolerance; kept total for
            // deliberately tightened epsilons
            None => HcCcPath::new(start_cfg, end_cfg, self.kappa, self.sigma, f64::MAX, HcCcWord::E),
        }
    }
}

/// Endpoint configuration carrying the curvature class of the family.
fn endpoint_configuration(state: &State, kind: EndpointKind, kappa: f64) -> Configuration {
    match kind {
        EndpointKind::FullKappa => {
            let sign = if state.kappa < 0.0 { -1.0 } else { 1.0 };
            Configuration::new(state.x, state.y, state.theta, sign * kappa)
        }
        EndpointKind::ZeroKappa => Configuration::new(state.x, state.y, state.theta, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_kappa_circles_skip_by_sign() {
        let space = HcCcStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let straight_wheel = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let steering_left = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            space.endpoint_circles(&straight_wheel, EndpointKind::FullKappa, true, false).len(),
            4
        );
        let left_only = space.endpoint_circles(&steering_left, EndpointKind::FullKappa, true, false);
        assert_eq!(left_only.len(), 2);
        assert!(left_only.iter().all(|c| c.left));
    }

    #[test]
    fn test_zero_kappa_circles_keep_all() {
        let space = HcCcStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let state = State::new(0.0, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(space.endpoint_circles(&state, EndpointKind::ZeroKappa, true, false).len(), 4);
        assert_eq!(space.endpoint_circles(&state, EndpointKind::ZeroKappa, true, true).len(), 2);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(HcCcStateSpace::new(0.0, 1.0, 0.1).is_err());
        assert!(HcCcStateSpace::new(1.0, -1.0, 0.1).is_err());
        assert!(HcCcStateSpace::new(1.0, 1.0, f64::NAN).is_err());
    }
}
