//! Dubins paths: shortest bounded-curvature paths for a forward-only
//! (or backward-only) car.

use crate::common::error::check_state_space_params;
use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::localization::ekf::Ekf;
use crate::steering::trajectory;
use crate::utils::geometry::{twopify, TWO_PI};

const DUBINS_EPS: f64 = 1e-6;
const DUBINS_ZERO: f64 = -1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DubinsSegment {
    Left,
    Straight,
    Right,
}

use DubinsSegment::{Left, Right, Straight};

/// Segment triples in enumeration order: LSL, RSR, RSL, LSR, RLR, LRL.
const DUBINS_PATH_TYPE: [[DubinsSegment; 3]; 6] = [
    [Left, Straight, Left],
    [Right, Straight, Right],
    [Right, Straight, Left],
    [Left, Straight, Right],
    [Right, Left, Right],
    [Left, Right, Left],
];

/// One Dubins word with its three segment lengths in curvature-normalised
/// units.
#[derive(Debug, Clone, Copy)]
pub struct DubinsPath {
    pub segments: [DubinsSegment; 3],
    pub lengths: [f64; 3],
}

impl DubinsPath {
    fn new(type_index: usize, t: f64, p: f64, q: f64) -> Self {
        Self { segments: DUBINS_PATH_TYPE[type_index], lengths: [t, p, q] }
    }

    pub fn length(&self) -> f64 {
        self.lengths.iter().sum()
    }
}

fn dubins_lsl(d: f64, alpha: f64, beta: f64) -> Option<DubinsPath> {
    let (ca, sa, cb, sb) = (alpha.cos(), alpha.sin(), beta.cos(), beta.sin());
    let tmp = 2.0 + d * d - 2.0 * (ca * cb + sa * sb - d * (sa - sb));
    if tmp >= DUBINS_ZERO {
        let theta = (cb - ca).atan2(d + sa - sb);
        let t = twopify(-alpha + theta);
        let p = tmp.max(0.0).sqrt();
        let q = twopify(beta - theta);
        debug_assert!((p * (alpha + t).cos() - sa + sb - d).abs() < DUBINS_EPS);
        debug_assert!((p * (alpha + t).sin() + ca - cb).abs() < DUBINS_EPS);
        debug_assert!(twopify(alpha + t + q - beta + 0.5 * DUBINS_EPS) < DUBINS_EPS);
        return Some(DubinsPath::new(0, t, p, q));
    }
    None
}

fn dubins_rsr(d: f64, alpha: f64, beta: f64) -> Option<DubinsPath> {
    let (ca, sa, cb, sb) = (alpha.cos(), alpha.sin(), beta.cos(), beta.sin());
    let tmp = 2.0 + d * d - 2.0 * (ca * cb + sa * sb - d * (sb - sa));
    if tmp >= DUBINS_ZERO {
        let theta = (ca - cb).atan2(d - sa + sb);
        let t = twopify(alpha - theta);
        let p = tmp.max(0.0).sqrt();
        let q = twopify(-beta + theta);
        debug_assert!((p * (alpha - t).cos() + sa - sb - d).abs() < DUBINS_EPS);
        debug_assert!((p * (alpha - t).sin() - ca + cb).abs() < DUBINS_EPS);
        debug_assert!(twopify(alpha - t - q - beta + 0.5 * DUBINS_EPS) < DUBINS_EPS);
        return Some(DubinsPath::new(1, t, p, q));
    }
    None
}

fn dubins_rsl(d: f64, alpha: f64, beta: f64) -> Option<DubinsPath> {
    let (ca, sa, cb, sb) = (alpha.cos(), alpha.sin(), beta.cos(), beta.sin());
    let tmp = d * d - 2.0 + 2.0 * (ca * cb + sa * sb - d * (sa + sb));
    if tmp >= DUBINS_ZERO {
        let p = tmp.max(0.0).sqrt();
        let theta = (ca + cb).atan2(d - sa - sb) - 2.0_f64.atan2(p);
        let t = twopify(alpha - theta);
        let q = twopify(beta - theta);
        debug_assert!(
            (p * (alpha - t).cos() - 2.0 * (alpha - t).sin() + sa + sb - d).abs() < DUBINS_EPS
        );
        debug_assert!(
            (p * (alpha - t).sin() + 2.0 * (alpha - t).cos() - ca - cb).abs() < DUBINS_EPS
        );
        debug_assert!(twopify(alpha - t + q - beta + 0.5 * DUBINS_EPS) < DUBINS_EPS);
        return Some(DubinsPath::new(2, t, p, q));
    }
    None
}

fn dubins_lsr(d: f64, alpha: f64, beta: f64) -> Option<DubinsPath> {
    let (ca, sa, cb, sb) = (alpha.cos(), alpha.sin(), beta.cos(), beta.sin());
    let tmp = -2.0 + d * d + 2.0 * (ca * cb + sa * sb + d * (sa + sb));
    if tmp >= DUBINS_ZERO {
        let p = tmp.max(0.0).sqrt();
        let theta = (-ca - cb).atan2(d + sa + sb) - (-2.0_f64).atan2(p);
        let t = twopify(-alpha + theta);
        let q = twopify(-beta + theta);
        debug_assert!(
            (p * (alpha + t).cos() + 2.0 * (alpha + t).sin() - sa - sb - d).abs() < DUBINS_EPS
        );
        debug_assert!(
            (p * (alpha + t).sin() - 2.0 * (alpha + t).cos() + ca + cb).abs() < DUBINS_EPS
        );
        debug_assert!(twopify(alpha + t - q - beta + 0.5 * DUBINS_EPS) < DUBINS_EPS);
        return Some(DubinsPath::new(3, t, p, q));
    }
    None
}

fn dubins_rlr(d: f64, alpha: f64, beta: f64) -> Option<DubinsPath> {
    let (ca, sa, cb, sb) = (alpha.cos(), alpha.sin(), beta.cos(), beta.sin());
    let tmp = 0.125 * (6.0 - d * d + 2.0 * (ca * cb + sa * sb + d * (sa - sb)));
    if tmp.abs() < 1.0 {
        let p = TWO_PI - tmp.acos();
        let theta = (ca - cb).atan2(d - sa + sb);
        let t = twopify(alpha - theta + 0.5 * p);
        let q = twopify(alpha - beta - t + p);
        debug_assert!(
            (2.0 * (alpha - t + p).sin() - 2.0 * (alpha - t).sin() - d + sa - sb).abs()
                < DUBINS_EPS
        );
        debug_assert!(
            (-2.0 * (alpha - t + p).cos() + 2.0 * (alpha - t).cos() - ca + cb).abs() < DUBINS_EPS
        );
        debug_assert!(twopify(alpha - t + p - q - beta + 0.5 * DUBINS_EPS) < DUBINS_EPS);
        return Some(DubinsPath::new(4, t, p, q));
    }
    None
}

fn dubins_lrl(d: f64, alpha: f64, beta: f64) -> Option<DubinsPath> {
    let (ca, sa, cb, sb) = (alpha.cos(), alpha.sin(), beta.cos(), beta.sin());
    let tmp = 0.125 * (6.0 - d * d + 2.0 * (ca * cb + sa * sb - d * (sa - sb)));
    if tmp.abs() < 1.0 {
        let p = TWO_PI - tmp.acos();
        let theta = (-ca + cb).atan2(d + sa - sb);
        let t = twopify(-alpha + theta + 0.5 * p);
        let q = twopify(beta - alpha - t + p);
        debug_assert!(
            (-2.0 * (alpha + t - p).sin() + 2.0 * (alpha + t).sin() - d - sa + sb).abs()
                < DUBINS_EPS
        );
        debug_assert!(
            (2.0 * (alpha + t - p).cos() - 2.0 * (alpha + t).cos() + ca - cb).abs() < DUBINS_EPS
        );
        debug_assert!(twopify(alpha + t - p + q - beta + 0.5 * DUBINS_EPS) < DUBINS_EPS);
        return Some(DubinsPath::new(5, t, p, q));
    }
    None
}

/// Shortest Dubins word in the normalised frame; ties break in
/// enumeration order.
fn dubins(d: f64, alpha: f64, beta: f64) -> DubinsPath {
    if d < DUBINS_EPS && (alpha - beta).abs() < DUBINS_EPS {
        return DubinsPath::new(0, 0.0, d, 0.0);
    }

    let candidates = [
        dubins_lsl(d, alpha, beta),
        dubins_rsr(d, alpha, beta),
        dubins_rsl(d, alpha, beta),
        dubins_lsr(d, alpha, beta),
        dubins_rlr(d, alpha, beta),
        dubins_lrl(d, alpha, beta),
    ];
    let mut best: Option<DubinsPath> = None;
    for candidate in candidates.into_iter().flatten() {
        match best {
            Some(path) if path.length() <= candidate.length() => {}
            _ => best = Some(candidate),
        }
    }
    // at least one of the six words always exists
    best.unwrap_or(DubinsPath::new(0, 0.0, d, 0.0))
}

/// Dubins state space: motion restricted to one direction of travel.
pub struct DubinsStateSpace {
    kappa: f64,
    kappa_inv: f64,
    discretization: f64,
    forwards: bool,
    ekf: Ekf,
}

impl DubinsStateSpace {
    pub fn new(kappa: f64, discretization: f64, forwards: bool) -> SteeringResult<Self> {
        check_state_space_params(kappa, discretization)?;
        Ok(Self { kappa, kappa_inv: 1.0 / kappa, discretization, forwards, ekf: Ekf::new() })
    }

    /// Shortest word between two states in the normalised local frame.
    fn dubins(&self, state1: &State, state2: &State) -> DubinsPath {
        let dx = state2.x - state1.x;
        let dy = state2.y - state1.y;
        let th = dy.atan2(dx);
        let d = (dx * dx + dy * dy).sqrt() * self.kappa;
        let alpha = twopify(state1.theta - th);
        let beta = twopify(state2.theta - th);
        dubins(d, alpha, beta)
    }
}

impl StateSpace for DubinsStateSpace {
    fn set_filter_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    ) {
        self.ekf.set_parameters(motion_noise, measurement_noise, controller);
    }

    fn get_distance(&self, state1: &State, state2: &State) -> f64 {
        if self.forwards {
            self.kappa_inv * self.dubins(state1, state2).length()
        } else {
            self.kappa_inv * self.dubins(state2, state1).length()
        }
    }

    fn get_controls(&self, state1: &State, state2: &State) -> Vec<Control> {
        let path = if self.forwards {
            self.dubins(state1, state2)
        } else {
            self.dubins(state2, state1)
        };
        let mut controls = Vec::with_capacity(3);
        for (segment, length) in path.segments.iter().zip(path.lengths.iter()) {
            let kappa = match segment {
                Left => self.kappa,
                Straight => 0.0,
                Right => -self.kappa,
            };
            controls.push(Control::new(self.kappa_inv * length, kappa, 0.0));
        }
        if !self.forwards {
            controls.reverse();
            for control in &mut controls {
                control.delta_s = -control.delta_s;
            }
        }
        controls
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

    fn endpoint_of(space: &DubinsStateSpace, s1: &State, s2: &State) -> State {
        let path = space.get_path(s1, s2);
        *path.last().unwrap()
    }

    #[test]
    fn test_straight_line_is_lsl() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(4.0, 0.0, 0.0, 0.0, 1.0);
        let path = space.dubins(&s1, &s2);
        assert_eq!(path.segments, [Left, Straight, Left]);
        assert!(path.lengths[0].abs() < 1e-9);
        assert!((path.lengths[1] - 4.0).abs() < 1e-9);
        assert!(path.lengths[2].abs() < 1e-9);
        assert!((space.get_distance(&s1, &s2) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_turn_in_place_uses_ccc_word() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(0.0, 0.0, PI, 0.0, 1.0);
        let path = space.dubins(&s1, &s2);
        // RLR and LRL tie; the first in enumeration order wins
        assert_eq!(path.segments, [Right, Left, Right]);
        assert!((path.lengths[1] - 5.0 * PI / 3.0).abs() < 1e-9);
        let distance = space.get_distance(&s1, &s2);
        assert!((distance - 7.0 * PI / 3.0).abs() < 1e-9, "distance {}", distance);
    }

    #[test]
    fn test_endpoint_fidelity() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let targets = [
            State::new(5.0, 5.0, PI / 2.0, 0.0, 1.0),
            State::new(-3.0, 2.0, -PI / 3.0, 0.0, 1.0),
            State::new(0.5, -0.5, PI, 0.0, 1.0),
            State::new(1.0, 6.0, 2.5, 0.0, 1.0),
        ];
        for target in &targets {
            let end = endpoint_of(&space, &s1, target);
            let position_error =
                ((end.x - target.x).powi(2) + (end.y - target.y).powi(2)).sqrt();
            let heading_error = (end.theta - target.theta).sin().abs();
            assert!(position_error < 1.0, "position error {}", position_error);
            assert!(heading_error < 1e-3, "heading error {}", heading_error);
        }
    }

    #[test]
    fn test_distance_matches_control_lengths() {
        let space = DubinsStateSpace::new(0.5, 0.1, true).unwrap();
        let s1 = State::new(1.0, -2.0, 0.3, 0.0, 1.0);
        let s2 = State::new(7.0, 3.0, -1.2, 0.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
        assert!((total - space.get_distance(&s1, &s2)).abs() < 1e-9);
    }

    #[test]
    fn test_backwards_reverses_controls() {
        let forwards = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let backwards = DubinsStateSpace::new(1.0, 0.1, false).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(3.0, 1.0, 0.7, 0.0, 1.0);
        let fwd = forwards.get_controls(&s2, &s1);
        let bwd = backwards.get_controls(&s1, &s2);
        assert_eq!(fwd.len(), bwd.len());
        for (f, b) in fwd.iter().rev().zip(bwd.iter()) {
            assert!((f.delta_s + b.delta_s).abs() < 1e-12);
            assert!((f.kappa - b.kappa).abs() < 1e-12);
        }
        // a backwards path still ends at the goal
        let end = backwards.get_path(&s1, &s2);
        let last = end.last().unwrap();
        assert!((last.x - s2.x).abs() < 0.5);
        assert!((last.y - s2.y).abs() < 0.5);
    }

    #[test]
    fn test_interpolate_idempotent_at_one() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(4.0, 2.0, 1.0, 0.0, 1.0);
        let controls = space.get_controls(&s1, &s2);
        let sampled = space.get_path(&s1, &s2);
        let interpolated = space.interpolate(&s1, &controls, 1.0);
        let last = sampled.last().unwrap();
        assert!((interpolated.x - last.x).abs() < 1e-12);
        assert!((interpolated.y - last.y).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_same_pose() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let s = State::new(1.0, 1.0, 0.5, 0.0, 1.0);
        assert!(space.get_distance(&s, &s).abs() < 1e-9);
        let path = space.get_path(&s, &s);
        assert!(!path.is_empty());
    }
}
