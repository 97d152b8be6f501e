//! Planar geometry helpers and kinematic integrators.

use std::f64::consts::PI;

use crate::utils::fresnel::clothoid_moment;

pub const TWO_PI: f64 = 2.0 * PI;
pub const HALF_PI: f64 = 0.5 * PI;

/// Geometric equality tolerance
pub fn get_epsilon() -> f64 {
    1e-6
}

/// Normalise an angle to [0, 2*pi)
pub fn twopify(theta: f64) -> f64 {
    theta - TWO_PI * (theta / TWO_PI).floor()
}

/// Normalise an angle to (-pi, pi]
pub fn pify(theta: f64) -> f64 {
    let theta = twopify(theta);
    if theta > PI {
        theta - TWO_PI
    } else {
        theta
    }
}

/// Cartesian to polar: returns (r, theta) with r >= 0
pub fn polar(x: f64, y: f64) -> (f64, f64) {
    ((x * x + y * y).sqrt(), y.atan2(x))
}

pub fn point_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Sign of x as a direction multiplier: -1.0, 0.0 or +1.0
pub fn sgn(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Express a local offset (dx, dy) in the global frame: rotate by theta,
/// then translate by (xc, yc).
pub fn global_frame_change(xc: f64, yc: f64, theta: f64, dx: f64, dy: f64) -> (f64, f64) {
    let (sin_th, cos_th) = theta.sin_cos();
    (xc + dx * cos_th - dy * sin_th, yc + dx * sin_th + dy * cos_th)
}

/// Endpoint of a straight segment of arc length s travelled in direction d.
pub fn end_of_straight_line(x: f64, y: f64, theta: f64, d: f64, s: f64) -> (f64, f64) {
    (x + d * s * theta.cos(), y + d * s * theta.sin())
}

/// Endpoint of a circular arc of constant curvature kappa, arc length s,
/// direction d. Returns (x, y, theta).
pub fn end_of_circular_arc(x: f64, y: f64, theta: f64, kappa: f64, d: f64, s: f64) -> (f64, f64, f64) {
    let theta_f = theta + d * kappa * s;
    (
        x + (theta_f.sin() - theta.sin()) / kappa,
        y - (theta_f.cos() - theta.cos()) / kappa,
        theta_f,
    )
}

/// Endpoint of a clothoid with initial curvature kappa and sharpness sigma
/// over arc length s in direction d. Returns (x, y, theta, kappa).
///
/// The curvature grows to `kappa + sigma*s` regardless of direction; the
/// heading rate is the direction times the curvature, so the heading
/// advances by `d*(kappa*s + sigma*s^2/2)`. The position follows from the
/// generalised Fresnel moment of the heading polynomial.
pub fn end_of_clothoid(
    x: f64,
    y: f64,
    theta: f64,
    kappa: f64,
    sigma: f64,
    d: f64,
    s: f64,
) -> (f64, f64, f64, f64) {
    let (mx, my) = clothoid_moment(d * sigma * s * s, d * kappa * s, theta);
    (
        x + d * s * mx,
        y + d * s * my,
        theta + d * (kappa * s + 0.5 * sigma * s * s),
        kappa + sigma * s,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twopify_range() {
        for &theta in &[-7.0, -PI, 0.0, PI, 3.0, 9.0] {
            let t = twopify(theta);
            assert!((0.0..TWO_PI).contains(&t), "twopify({}) = {}", theta, t);
            assert!((pify(theta) - t).abs() < 1e-12 || (pify(theta) - t + TWO_PI).abs() < 1e-12);
        }
        assert!((twopify(-0.5) - (TWO_PI - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_pify_range() {
        assert!((pify(PI) - PI).abs() < 1e-12);
        assert!((pify(-PI) - PI).abs() < 1e-12);
        assert!((pify(3.0 * PI) - PI).abs() < 1e-12);
        assert!((pify(0.1 - TWO_PI) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_polar() {
        let (r, theta) = polar(3.0, 4.0);
        assert!((r - 5.0).abs() < 1e-12);
        assert!((theta - (4.0_f64 / 3.0).atan()).abs() < 1e-12);
    }

    #[test]
    fn test_global_frame_change() {
        let (x, y) = global_frame_change(1.0, 2.0, HALF_PI, 1.0, 0.0);
        assert!((x - 1.0).abs() < 1e-12);
        assert!((y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_circular_arc_quarter_turn() {
        // quarter of a unit circle turning left
        let (x, y, theta) = end_of_circular_arc(0.0, 0.0, 0.0, 1.0, 1.0, HALF_PI);
        assert!((x - 1.0).abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
        assert!((theta - HALF_PI).abs() < 1e-12);
    }

    #[test]
    fn test_circular_arc_backwards() {
        let (x, y, theta) = end_of_circular_arc(0.0, 0.0, 0.0, 1.0, -1.0, HALF_PI);
        assert!((x + 1.0).abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
        assert!((theta + HALF_PI).abs() < 1e-12);
    }

    #[test]
    fn test_clothoid_zero_sharpness_matches_arc() {
        let (xa, ya, ta) = end_of_circular_arc(0.2, -0.1, 0.3, 0.8, 1.0, 1.5);
        let (xc, yc, tc, kc) = end_of_clothoid(0.2, -0.1, 0.3, 0.8, 0.0, 1.0, 1.5);
        assert!((xa - xc).abs() < 1e-9);
        assert!((ya - yc).abs() < 1e-9);
        assert!((ta - tc).abs() < 1e-12);
        assert!((kc - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_clothoid_small_length_taylor() {
        // from rest: x ~ s, y ~ sigma*s^3/6 for small s
        let s = 1e-2;
        let sigma = 1.0;
        let (x, y, theta, kappa) = end_of_clothoid(0.0, 0.0, 0.0, 0.0, sigma, 1.0, s);
        assert!((x - s).abs() < 1e-9);
        assert!((y - sigma * s * s * s / 6.0).abs() < 1e-9);
        assert!((theta - 0.5 * sigma * s * s).abs() < 1e-12);
        assert!((kappa - sigma * s).abs() < 1e-12);
    }

    #[test]
    fn test_clothoid_stepwise_composition() {
        // integrating one long clothoid equals composing many short ones
        let (mut x, mut y, mut theta, mut kappa) = (0.0, 0.0, 0.0, 0.0);
        let n = 100;
        let total = 2.0;
        for _ in 0..n {
            (x, y, theta, kappa) = end_of_clothoid(x, y, theta, kappa, 1.0, 1.0, total / n as f64);
        }
        let (xf, yf, tf, kf) = end_of_clothoid(0.0, 0.0, 0.0, 0.0, 1.0, 1.0, total);
        assert!((x - xf).abs() < 1e-8);
        assert!((y - yf).abs() < 1e-8);
        assert!((theta - tf).abs() < 1e-9);
        assert!((kappa - kf).abs() < 1e-9);
    }

    #[test]
    fn test_clothoid_backwards_reverses() {
        // driving forward then backwards along the same clothoid returns
        // to the start pose
        let (x1, y1, t1, k1) = end_of_clothoid(0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0);
        let (x0, y0, t0, k0) = end_of_clothoid(x1, y1, t1, k1, -0.5, -1.0, 1.0);
        assert!(x0.abs() < 1e-9, "x0 = {}", x0);
        assert!(y0.abs() < 1e-9, "y0 = {}", y0);
        assert!(t0.abs() < 1e-12);
        assert!(k0.abs() < 1e-12);
    }
}
