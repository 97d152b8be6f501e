//! Arc-length integration of control sequences into sampled paths.
//!
//! Shared by every state space: walks each control in steps of at most
//! the discretization, truncates the last step so the cumulative arc
//! length is exact, and duplicates the boundary pose whenever the
//! curvature jumps between consecutive controls.

use crate::common::types::{Control, State, StateWithCovariance};
use crate::localization::ekf::Ekf;
use crate::utils::geometry::{
    end_of_circular_arc, end_of_clothoid, end_of_straight_line, get_epsilon, sgn,
};

/// One exact integration step along a control.
fn integrate_ode(state: &State, control: &Control, step: f64) -> State {
    let d = sgn(control.delta_s);
    if control.sigma.abs() > get_epsilon() {
        let (x, y, theta, kappa) =
            end_of_clothoid(state.x, state.y, state.theta, state.kappa, control.sigma, d, step);
        State::new(x, y, theta, kappa, d)
    } else if state.kappa.abs() > get_epsilon() {
        let (x, y, theta) =
            end_of_circular_arc(state.x, state.y, state.theta, state.kappa, d, step);
        State::new(x, y, theta, state.kappa, d)
    } else {
        let (x, y) = end_of_straight_line(state.x, state.y, state.theta, d, step);
        State::new(x, y, state.theta, state.kappa, d)
    }
}

fn capacity(controls: &[Control], discretization: f64) -> usize {
    controls
        .iter()
        .map(|control| (control.delta_s.abs() / discretization).ceil() as usize)
        .sum::<usize>()
        + 3
}

/// Sample the trajectory of a control sequence at the discretization step.
pub fn integrate(state: &State, controls: &[Control], discretization: f64) -> Vec<State> {
    let mut path = Vec::with_capacity(capacity(controls, discretization));
    let first = match controls.first() {
        Some(control) => control,
        None => return vec![*state],
    };
    let mut state_curr = State::new(state.x, state.y, state.theta, first.kappa, sgn(first.delta_s));
    path.push(state_curr);

    for control in controls {
        let delta_s = control.delta_s;
        let abs_delta_s = delta_s.abs();
        // duplicated pose marks a curvature discontinuity
        if (control.kappa - state_curr.kappa).abs() > get_epsilon() {
            state_curr.kappa = control.kappa;
            state_curr.d = sgn(delta_s);
            path.push(state_curr);
        }

        let n = (abs_delta_s / discretization).ceil() as usize;
        let mut s_seg = 0.0;
        for _ in 0..n {
            s_seg += discretization;
            let integration_step = if s_seg > abs_delta_s {
                let step = discretization - (s_seg - abs_delta_s);
                s_seg = abs_delta_s;
                step
            } else {
                discretization
            };
            state_curr = integrate_ode(&state_curr, control, integration_step);
            path.push(state_curr);
        }
    }
    path
}

/// Pose at fractional arc length `t` (clamped to [0, 1]) along the controls.
pub fn interpolate(state: &State, controls: &[Control], t: f64, discretization: f64) -> State {
    let first = match controls.first() {
        Some(control) => control,
        None => return *state,
    };
    let mut state_curr = State::new(state.x, state.y, state.theta, first.kappa, sgn(first.delta_s));

    let s_path: f64 = controls.iter().map(|control| control.delta_s.abs()).sum();
    if t <= 0.0 {
        return state_curr;
    }
    let s_inter = if t > 1.0 { s_path } else { t * s_path };

    let mut s = 0.0;
    for control in controls {
        let delta_s = control.delta_s;
        let mut abs_delta_s = delta_s.abs();
        if (control.kappa - state_curr.kappa).abs() > get_epsilon() {
            state_curr.kappa = control.kappa;
            state_curr.d = sgn(delta_s);
        }

        s += abs_delta_s;
        let interpolated = s > s_inter;
        if interpolated {
            abs_delta_s -= s - s_inter;
        }

        let n = (abs_delta_s / discretization).ceil() as usize;
        let mut s_seg = 0.0;
        for _ in 0..n {
            s_seg += discretization;
            let integration_step = if s_seg > abs_delta_s {
                let step = discretization - (s_seg - abs_delta_s);
                s_seg = abs_delta_s;
                step
            } else {
                discretization
            };
            state_curr = integrate_ode(&state_curr, control, integration_step);
        }
        if interpolated {
            break;
        }
    }
    state_curr
}

/// Like `integrate`, folding each step through the EKF's predict/update.
pub fn integrate_with_covariance(
    state: &StateWithCovariance,
    controls: &[Control],
    discretization: f64,
    ekf: &Ekf,
) -> Vec<StateWithCovariance> {
    let mut path = Vec::with_capacity(capacity(controls, discretization));
    let first = match controls.first() {
        Some(control) => control,
        None => return vec![state.clone()],
    };
    let mut state_curr = state.clone();
    state_curr.state.kappa = first.kappa;
    state_curr.state.d = sgn(first.delta_s);
    path.push(state_curr.clone());

    for control in controls {
        let delta_s = control.delta_s;
        let abs_delta_s = delta_s.abs();
        if (control.kappa - state_curr.state.kappa).abs() > get_epsilon() {
            state_curr.state.kappa = control.kappa;
            state_curr.state.d = sgn(delta_s);
            path.push(state_curr.clone());
        }

        let n = (abs_delta_s / discretization).ceil() as usize;
        let mut s_seg = 0.0;
        for _ in 0..n {
            s_seg += discretization;
            let integration_step = if s_seg > abs_delta_s {
                let step = discretization - (s_seg - abs_delta_s);
                s_seg = abs_delta_s;
                step
            } else {
                discretization
            };
            let mut state_pred = state_curr.clone();
            state_pred.state = integrate_ode(&state_curr.state, control, integration_step);
            ekf.predict(&state_curr, control, integration_step, &mut state_pred);

            let mut state_next = state_pred.clone();
            ekf.update(&state_pred, &mut state_next);

            path.push(state_next.clone());
            state_curr = state_next;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::HALF_PI;

    #[test]
    fn test_integrate_straight() {
        let start = State::origin();
        let controls = vec![Control::new(1.0, 0.0, 0.0)];
        let path = integrate(&start, &controls, 0.1);
        // initial pose plus ten steps
        assert_eq!(path.len(), 11);
        let last = path.last().unwrap();
        assert!((last.x - 1.0).abs() < 1e-12);
        assert!(last.y.abs() < 1e-12);
    }

    #[test]
    fn test_integrate_truncates_last_step() {
        let start = State::origin();
        let controls = vec![Control::new(0.25, 0.0, 0.0)];
        let path = integrate(&start, &controls, 0.1);
        // 0.1 + 0.1 + 0.05
        assert_eq!(path.len(), 4);
        assert!((path.last().unwrap().x - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_arc_endpoint() {
        let start = State::origin();
        let controls = vec![Control::new(HALF_PI, 1.0, 0.0)];
        let path = integrate(&start, &controls, 0.01);
        let last = path.last().unwrap();
        assert!((last.x - 1.0).abs() < 1e-9);
        assert!((last.y - 1.0).abs() < 1e-9);
        assert!((last.theta - HALF_PI).abs() < 1e-9);
    }

    #[test]
    fn test_discontinuity_duplicates_pose() {
        let start = State::origin();
        let controls = vec![Control::new(0.2, 1.0, 0.0), Control::new(-0.2, -1.0, 0.0)];
        let path = integrate(&start, &controls, 0.1);
        let mut duplicates = 0;
        for pair in path.windows(2) {
            if (pair[0].x - pair[1].x).abs() < 1e-15 && (pair[0].y - pair[1].y).abs() < 1e-15 {
                duplicates += 1;
            }
        }
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn test_interpolate_full_matches_integrate() {
        let start = State::origin();
        let controls = vec![
            Control::new(0.7, 1.0, 0.0),
            Control::new(0.4, 0.0, 0.0),
            Control::new(-0.5, -1.0, 0.0),
        ];
        let sampled = integrate(&start, &controls, 0.1);
        let end = interpolate(&start, &controls, 1.0, 0.1);
        let last = sampled.last().unwrap();
        assert!((end.x - last.x).abs() < 1e-12);
        assert!((end.y - last.y).abs() < 1e-12);
        assert!((end.theta - last.theta).abs() < 1e-12);
    }

    #[test]
    fn test_refinement_does_not_increase_endpoint_error() {
        let start = State::origin();
        let controls = vec![
            Control::new(1.3, 0.0, 1.0),
            Control::new(0.9, 1.3, 0.0),
            Control::new(1.3, 1.3, -1.0),
        ];
        // reference endpoint from a very fine discretisation
        let reference = *integrate(&start, &controls, 1e-4).last().unwrap();
        let error = |disc: f64| {
            let end = *integrate(&start, &controls, disc).last().unwrap();
            ((end.x - reference.x).powi(2) + (end.y - reference.y).powi(2)).sqrt()
        };
        assert!(error(0.05) <= error(0.1) + 1e-9);
        assert!(error(0.025) <= error(0.05) + 1e-9);
    }

    #[test]
    fn test_interpolate_clamps() {
        let start = State::origin();
        let controls = vec![Control::new(1.0, 0.0, 0.0)];
        let before = interpolate(&start, &controls, -0.5, 0.1);
        assert!((before.x - 0.0).abs() < 1e-12);
        let beyond = interpolate(&start, &controls, 2.0, 0.1);
        assert!((beyond.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_path_poses_match_plain() {
        let start = State::origin();
        let controls = vec![Control::new(0.5, 1.0, 0.0), Control::new(0.3, 0.0, 0.0)];
        let plain = integrate(&start, &controls, 0.1);
        let with_cov = integrate_with_covariance(
            &StateWithCovariance::from_state(start),
            &controls,
            0.1,
            &Ekf::new(),
        );
        assert_eq!(plain.len(), with_cov.len());
        for (a, b) in plain.iter().zip(with_cov.iter()) {
            assert!((a.x - b.state.x).abs() < 1e-12);
            assert!((a.y - b.state.y).abs() < 1e-12);
        }
    }
}
