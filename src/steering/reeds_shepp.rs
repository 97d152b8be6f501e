//! Reeds-Shepp paths: shortest bounded-curvature paths with reversals.
//!
//! The variable names follow the nomenclature of the Reeds & Shepp
//! paper; each canonical solver carries its closed-form verification
//! equations as debug assertions.

use std::f64::consts::PI;

use crate::common::error::check_state_space_params;
use crate::common::traits::StateSpace;
use crate::common::types::*;
use crate::common::SteeringResult;
use crate::localization::ekf::Ekf;
use crate::steering::trajectory;
use crate::utils::geometry::{pify, polar};

const RS_EPS: f64 = 1e-6;
const RS_ZERO: f64 = 10.0 * f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsSegment {
    Nop,
    Left,
    Straight,
    Right,
}

use RsSegment::{Left, Nop, Right, Straight};

/// The 18 canonical segment-type rows.
const RS_PATH_TYPE: [[RsSegment; 5]; 18] = [
    [Left, Right, Left, Nop, Nop],        // 0
    [Right, Left, Right, Nop, Nop],       // 1
    [Left, Right, Left, Right, Nop],      // 2
    [Right, Left, Right, Left, Nop],      // 3
    [Left, Right, Straight, Left, Nop],   // 4
    [Right, Left, Straight, Right, Nop],  // 5
    [Left, Straight, Right, Left, Nop],   // 6
    [Right, Straight, Left, Right, Nop],  // 7
    [Left, Right, Straight, Right, Nop],  // 8
    [Right, Left, Straight, Left, Nop],   // 9
    [Right, Straight, Right, Left, Nop],  // 10
    [Left, Straight, Left, Right, Nop],   // 11
    [Left, Straight, Right, Nop, Nop],    // 12
    [Right, Straight, Left, Nop, Nop],    // 13
    [Left, Straight, Left, Nop, Nop],     // 14
    [Right, Straight, Right, Nop, Nop],   // 15
    [Left, Right, Straight, Left, Right], // 16
    [Right, Left, Straight, Right, Left], // 17
];

/// One Reeds-Shepp word: up to five signed segment lengths in
/// curvature-normalised units.
#[derive(Debug, Clone, Copy)]
pub struct ReedsSheppPath {
    pub segments: [RsSegment; 5],
    pub lengths: [f64; 5],
    total_length: f64,
}

impl ReedsSheppPath {
    fn new(type_index: usize, t: f64, u: f64, v: f64, w: f64, x: f64) -> Self {
        Self {
            segments: RS_PATH_TYPE[type_index],
            lengths: [t, u, v, w, x],
            total_length: t.abs() + u.abs() + v.abs() + w.abs() + x.abs(),
        }
    }

    fn none() -> Self {
        Self { segments: [Nop; 5], lengths: [0.0; 5], total_length: f64::MAX }
    }

    pub fn length(&self) -> f64 {
        self.total_length
    }
}

fn tau_omega(u: f64, v: f64, xi: f64, eta: f64, phi: f64) -> (f64, f64) {
    let delta = pify(u - v);
    let a = u.sin() - delta.sin();
    let b = u.cos() - delta.cos() - 1.0;
    let t1 = (eta * a - xi * b).atan2(xi * a + eta * b);
    let t2 = 2.0 * (delta.cos() - v.cos() - u.cos()) + 3.0;
    let tau = if t2 < 0.0 { pify(t1 + PI) } else { pify(t1) };
    (tau, pify(tau - u + v - phi))
}

// formula 8.1 in the Reeds-Shepp paper
fn lp_sp_lp(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let (u, t) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if t >= -RS_ZERO {
        let v = pify(phi - t);
        if v >= -RS_ZERO {
            debug_assert!((u * t.cos() + phi.sin() - x).abs() < RS_EPS);
            debug_assert!((u * t.sin() - phi.cos() + 1.0 - y).abs() < RS_EPS);
            debug_assert!(pify(t + v - phi).abs() < RS_EPS);
            return Some((t, u, v));
        }
    }
    None
}

// formula 8.2
fn lp_sp_rp(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let (u1, t1) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u1_sq = u1 * u1;
    if u1_sq >= 4.0 {
        let u = (u1_sq - 4.0).sqrt();
        let theta = 2.0_f64.atan2(u);
        let t = pify(t1 + theta);
        let v = pify(t - phi);
        debug_assert!((2.0 * t.sin() + u * t.cos() - phi.sin() - x).abs() < RS_EPS);
        debug_assert!((-2.0 * t.cos() + u * t.sin() + phi.cos() + 1.0 - y).abs() < RS_EPS);
        debug_assert!(pify(t - v - phi).abs() < RS_EPS);
        if t >= -RS_ZERO && v >= -RS_ZERO {
            return Some((t, u, v));
        }
    }
    None
}

fn csc(x: f64, y: f64, phi: f64, path: &mut ReedsSheppPath) {
    let mut lmin = path.length();
    if let Some((t, u, v)) = lp_sp_lp(x, y, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(14, t, u, v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_lp(-x, y, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(14, -t, -u, -v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_lp(x, -y, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(15, t, u, v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_lp(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(15, -t, -u, -v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_rp(x, y, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(12, t, u, v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_rp(-x, y, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(12, -t, -u, -v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_rp(x, -y, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(13, t, u, v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_sp_rp(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(13, -t, -u, -v, 0.0, 0.0);
        }
    }
}

// formula 8.3 / 8.4, with the typo of the paper corrected
fn lp_rm_l(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let xi = x - phi.sin();
    let eta = y - 1.0 + phi.cos();
    let (u1, theta) = polar(xi, eta);
    if u1 <= 4.0 {
        let u = -2.0 * (0.25 * u1).asin();
        let t = pify(theta + 0.5 * u + PI);
        let v = pify(phi - t + u);
        debug_assert!((2.0 * (t.sin() - (t - u).sin()) + phi.sin() - x).abs() < RS_EPS);
        debug_assert!((2.0 * (-t.cos() + (t - u).cos()) - phi.cos() + 1.0 - y).abs() < RS_EPS);
        debug_assert!(pify(t - u + v - phi).abs() < RS_EPS);
        if t >= -RS_ZERO && u <= RS_ZERO {
            return Some((t, u, v));
        }
    }
    None
}

fn ccc(x: f64, y: f64, phi: f64, path: &mut ReedsSheppPath) {
    let mut lmin = path.length();
    if let Some((t, u, v)) = lp_rm_l(x, y, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(0, t, u, v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_l(-x, y, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(0, -t, -u, -v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_l(x, -y, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(1, t, u, v, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_l(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(1, -t, -u, -v, 0.0, 0.0);
            lmin = l;
        }
    }

    // backwards
    let xb = x * phi.cos() + y * phi.sin();
    let yb = x * phi.sin() - y * phi.cos();
    if let Some((t, u, v)) = lp_rm_l(xb, yb, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(0, v, u, t, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_l(-xb, yb, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(0, -v, -u, -t, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_l(xb, -yb, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(1, v, u, t, 0.0, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_l(-xb, -yb, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(1, -v, -u, -t, 0.0, 0.0);
        }
    }
}

// formula 8.7
fn lp_rup_lum_rm(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let xi = x + phi.sin();
    let eta = y - 1.0 - phi.cos();
    let rho = 0.25 * (2.0 + (xi * xi + eta * eta).sqrt());
    if rho <= 1.0 {
        let u = rho.acos();
        let (t, v) = tau_omega(u, -u, xi, eta, phi);
        debug_assert!(
            (2.0 * (t.sin() - (t - u).sin() + (t - 2.0 * u).sin()) - phi.sin() - x).abs() < RS_EPS
        );
        debug_assert!(
            (2.0 * (-t.cos() + (t - u).cos() - (t - 2.0 * u).cos()) + phi.cos() + 1.0 - y).abs()
                < RS_EPS
        );
        debug_assert!(pify(t - 2.0 * u - v - phi).abs() < RS_EPS);
        if t >= -RS_ZERO && v <= RS_ZERO {
            return Some((t, u, v));
        }
    }
    None
}

// formula 8.8
fn lp_rum_lum_rp(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let xi = x + phi.sin();
    let eta = y - 1.0 - phi.cos();
    let rho = (20.0 - xi * xi - eta * eta) / 16.0;
    if (0.0..=1.0).contains(&rho) {
        let u = -rho.acos();
        if u >= -0.5 * PI {
            let (t, v) = tau_omega(u, u, xi, eta, phi);
            debug_assert!((4.0 * t.sin() - 2.0 * (t - u).sin() - phi.sin() - x).abs() < RS_EPS);
            debug_assert!(
                (-4.0 * t.cos() + 2.0 * (t - u).cos() + phi.cos() + 1.0 - y).abs() < RS_EPS
            );
            debug_assert!(pify(t - v - phi).abs() < RS_EPS);
            if t >= -RS_ZERO && v >= -RS_ZERO {
                return Some((t, u, v));
            }
        }
    }
    None
}

fn cccc(x: f64, y: f64, phi: f64, path: &mut ReedsSheppPath) {
    let mut lmin = path.length();
    if let Some((t, u, v)) = lp_rup_lum_rm(x, y, phi) {
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(2, t, u, -u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rup_lum_rm(-x, y, -phi) {
        // timeflip
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(2, -t, -u, u, -v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rup_lum_rm(x, -y, -phi) {
        // reflect
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(3, t, u, -u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rup_lum_rm(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(3, -t, -u, u, -v, 0.0);
            lmin = l;
        }
    }

    if let Some((t, u, v)) = lp_rum_lum_rp(x, y, phi) {
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(2, t, u, u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rum_lum_rp(-x, y, -phi) {
        // timeflip
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(2, -t, -u, -u, -v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rum_lum_rp(x, -y, -phi) {
        // reflect
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(3, t, u, u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rum_lum_rp(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + 2.0 * u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(3, -t, -u, -u, -v, 0.0);
        }
    }
}

// formula 8.9
fn lp_rm_sm_lm(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let xi = x - phi.sin();
    let eta = y - 1.0 + phi.cos();
    let (rho, theta) = polar(xi, eta);
    if rho >= 2.0 {
        let r = (rho * rho - 4.0).sqrt();
        let u = 2.0 - r;
        let t = pify(theta + r.atan2(-2.0));
        let v = pify(phi - 0.5 * PI - t);
        debug_assert!(
            (2.0 * (t.sin() - t.cos()) - u * t.sin() + phi.sin() - x).abs() < RS_EPS
        );
        debug_assert!(
            (-2.0 * (t.sin() + t.cos()) + u * t.cos() - phi.cos() + 1.0 - y).abs() < RS_EPS
        );
        debug_assert!(pify(t + PI / 2.0 + v - phi).abs() < RS_EPS);
        if t >= -RS_ZERO && u <= RS_ZERO && v <= RS_ZERO {
            return Some((t, u, v));
        }
    }
    None
}

// formula 8.10
fn lp_rm_sm_rm(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let xi = x + phi.sin();
    let eta = y - 1.0 - phi.cos();
    let (rho, theta) = polar(-eta, xi);
    if rho >= 2.0 {
        let t = theta;
        let u = 2.0 - rho;
        let v = pify(t + 0.5 * PI - phi);
        debug_assert!((2.0 * t.sin() - (t - v).cos() - u * t.sin() - x).abs() < RS_EPS);
        debug_assert!((-2.0 * t.cos() - (t - v).sin() + u * t.cos() + 1.0 - y).abs() < RS_EPS);
        debug_assert!(pify(t + PI / 2.0 - v - phi).abs() < RS_EPS);
        if t >= -RS_ZERO && u <= RS_ZERO && v <= RS_ZERO {
            return Some((t, u, v));
        }
    }
    None
}

fn ccsc(x: f64, y: f64, phi: f64, path: &mut ReedsSheppPath) {
    // every CCSC word carries a fixed quarter-turn segment
    let mut lmin = path.length() - 0.5 * PI;
    if let Some((t, u, v)) = lp_rm_sm_lm(x, y, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(4, t, -0.5 * PI, u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_lm(-x, y, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(4, -t, 0.5 * PI, -u, -v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_lm(x, -y, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(5, t, -0.5 * PI, u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_lm(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(5, -t, 0.5 * PI, -u, -v, 0.0);
            lmin = l;
        }
    }

    if let Some((t, u, v)) = lp_rm_sm_rm(x, y, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(8, t, -0.5 * PI, u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_rm(-x, y, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(8, -t, 0.5 * PI, -u, -v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_rm(x, -y, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(9, t, -0.5 * PI, u, v, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_rm(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(9, -t, 0.5 * PI, -u, -v, 0.0);
            lmin = l;
        }
    }

    // backwards
    let xb = x * phi.cos() + y * phi.sin();
    let yb = x * phi.sin() - y * phi.cos();
    if let Some((t, u, v)) = lp_rm_sm_lm(xb, yb, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(6, v, u, -0.5 * PI, t, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_lm(-xb, yb, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(6, -v, -u, 0.5 * PI, -t, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_lm(xb, -yb, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(7, v, u, -0.5 * PI, t, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_lm(-xb, -yb, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(7, -v, -u, 0.5 * PI, -t, 0.0);
            lmin = l;
        }
    }

    if let Some((t, u, v)) = lp_rm_sm_rm(xb, yb, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(10, v, u, -0.5 * PI, t, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_rm(-xb, yb, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(10, -v, -u, 0.5 * PI, -t, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_rm(xb, -yb, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(11, v, u, -0.5 * PI, t, 0.0);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_sm_rm(-xb, -yb, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(11, -v, -u, 0.5 * PI, -t, 0.0);
        }
    }
}

// formula 8.11, with the typo of the paper corrected
fn lp_rm_s_lm_rp(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let xi = x + phi.sin();
    let eta = y - 1.0 - phi.cos();
    let (rho, _) = polar(xi, eta);
    if rho >= 2.0 {
        let u = 4.0 - (rho * rho - 4.0).sqrt();
        if u <= RS_ZERO {
            let t = pify(((4.0 - u) * xi - 2.0 * eta).atan2(-2.0 * xi + (u - 4.0) * eta));
            let v = pify(t - phi);
            debug_assert!(
                (4.0 * t.sin() - 2.0 * t.cos() - u * t.sin() - phi.sin() - x).abs() < RS_EPS
            );
            debug_assert!(
                (-4.0 * t.cos() - 2.0 * t.sin() + u * t.cos() + phi.cos() + 1.0 - y).abs()
                    < RS_EPS
            );
            debug_assert!(pify(t - v - phi).abs() < RS_EPS);
            if t >= -RS_ZERO && v >= -RS_ZERO {
                return Some((t, u, v));
            }
        }
    }
    None
}

fn ccscc(x: f64, y: f64, phi: f64, path: &mut ReedsSheppPath) {
    // every CCSCC word carries two fixed quarter-turn segments
    let mut lmin = path.length() - PI;
    if let Some((t, u, v)) = lp_rm_s_lm_rp(x, y, phi) {
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(16, t, -0.5 * PI, u, -0.5 * PI, v);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_s_lm_rp(-x, y, -phi) {
        // timeflip
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(16, -t, 0.5 * PI, -u, 0.5 * PI, -v);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_s_lm_rp(x, -y, -phi) {
        // reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(17, t, -0.5 * PI, u, -0.5 * PI, v);
            lmin = l;
        }
    }
    if let Some((t, u, v)) = lp_rm_s_lm_rp(-x, -y, phi) {
        // timeflip + reflect
        let l = t.abs() + u.abs() + v.abs();
        if lmin > l {
            *path = ReedsSheppPath::new(17, -t, 0.5 * PI, -u, 0.5 * PI, -v);
        }
    }
}

/// Shortest Reeds-Shepp word in the normalised local frame.
fn reeds_shepp(x: f64, y: f64, phi: f64) -> ReedsSheppPath {
    let mut path = ReedsSheppPath::none();
    csc(x, y, phi, &mut path);
    ccc(x, y, phi, &mut path);
    cccc(x, y, phi, &mut path);
    ccsc(x, y, phi, &mut path);
    ccscc(x, y, phi, &mut path);
    path
}

/// Reeds-Shepp state space: bounded curvature with reversals.
pub struct ReedsSheppStateSpace {
    kappa: f64,
    kappa_inv: f64,
    discretization: f64,
    ekf: Ekf,
}

impl ReedsSheppStateSpace {
    pub fn new(kappa: f64, discretization: f64) -> SteeringResult<Self> {
        check_state_space_params(kappa, discretization)?;
        Ok(Self { kappa, kappa_inv: 1.0 / kappa, discretization, ekf: Ekf::new() })
    }

    fn reeds_shepp(&self, state1: &State, state2: &State) -> ReedsSheppPath {
        let dx = state2.x - state1.x;
        let dy = state2.y - state1.y;
        let dth = state2.theta - state1.theta;
        let c = state1.theta.cos();
        let s = state1.theta.sin();
        let x = c * dx + s * dy;
        let y = -s * dx + c * dy;
        reeds_shepp(x * self.kappa, y * self.kappa, dth)
    }
}

impl StateSpace for ReedsSheppStateSpace {
    fn set_filter_parameters(
        &mut self,
        motion_noise: &MotionNoise,
        measurement_noise: &MeasurementNoise,
        controller: &ControllerGains,
    ) {
        self.ekf.set_parameters(motion_noise, measurement_noise, controller);
    }

    fn get_distance(&self, state1: &State, state2: &State) -> f64 {
        self.kappa_inv * self.reeds_shepp(state1, state2).length()
    }

    fn get_controls(&self, state1: &State, state2: &State) -> Vec<Control> {
        let path = self.reeds_shepp(state1, state2);
        let mut controls = Vec::with_capacity(5);
        for (segment, length) in path.segments.iter().zip(path.lengths.iter()) {
            let kappa = match segment {
                Nop => return controls,
                Left => self.kappa,
                Straight => 0.0,
                Right => -self.kappa,
            };
            controls.push(Control::new(self.kappa_inv * length, kappa, 0.0));
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
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_turn_in_place() {
        // L+ R- L+ with three sixth-turns
        let path = reeds_shepp(0.0, 0.0, PI);
        assert!((path.length() - PI).abs() < 1e-9, "length {}", path.length());
    }

    #[test]
    fn test_straight_back() {
        let space = ReedsSheppStateSpace::new(1.0, 0.1).unwrap();
        let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let s2 = State::new(-1.0, 0.0, 0.0, 0.0, -1.0);
        assert!((space.get_distance(&s1, &s2) - 1.0).abs() < 1e-9);
        let controls = space.get_controls(&s1, &s2);
        // the whole path is driven in reverse
        assert!(controls.iter().all(|c| c.delta_s <= 1e-12));
    }

    #[test]
    fn test_symmetries() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let x = rng.gen_range(-4.0..4.0);
            let y = rng.gen_range(-4.0..4.0);
            let phi = rng.gen_range(-PI..PI);
            let base = reeds_shepp(x, y, phi).length();
            let timeflip = reeds_shepp(-x, y, -phi).length();
            let reflect = reeds_shepp(x, -y, -phi).length();
            assert!((base - timeflip).abs() < 1e-9, "timeflip at ({}, {}, {})", x, y, phi);
            assert!((base - reflect).abs() < 1e-9, "reflect at ({}, {}, {})", x, y, phi);
        }
    }

    #[test]
    fn test_endpoint_fidelity_random() {
        let space = ReedsSheppStateSpace::new(1.0, 0.1).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let s1 = State::new(0.0, 0.0, 0.0, 0.0, 1.0);
            let s2 = State::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-PI..PI),
                0.0,
                1.0,
            );
            let path = space.get_path(&s1, &s2);
            let last = path.last().unwrap();
            let position_error = ((last.x - s2.x).powi(2) + (last.y - s2.y).powi(2)).sqrt();
            assert!(position_error < 1.0, "position error {} to {:?}", position_error, s2);
            assert!((last.theta - s2.theta).sin().abs() < 1e-3);
        }
    }

    #[test]
    fn test_distance_matches_control_lengths() {
        let space = ReedsSheppStateSpace::new(0.5, 0.1).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s1 = State::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-PI..PI),
                0.0,
                1.0,
            );
            let s2 = State::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-PI..PI),
                0.0,
                1.0,
            );
            let controls = space.get_controls(&s1, &s2);
            let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
            assert!((total - space.get_distance(&s1, &s2)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_never_longer_than_dubins_frame() {
        // allowing reversals can only shorten the optimum
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let x = rng.gen_range(-4.0..4.0);
            let y = rng.gen_range(-4.0..4.0);
            let phi = rng.gen_range(-PI..PI);
            let length = reeds_shepp(x, y, phi).length();
            assert!(length < f64::MAX);
            assert!(length + 1e-9 >= (x * x + y * y).sqrt());
        }
    }
}
