//! Turning circles: a clothoid-in / circular-arc / clothoid-out turn at
//! maximum curvature, represented by its outer circle of radius R.

use std::f64::consts::PI;

use crate::steering::configuration::Configuration;
use crate::utils::fresnel::fresnel;
use crate::utils::geometry::{
    end_of_clothoid, get_epsilon, global_frame_change, pify, point_distance, sgn, twopify, HALF_PI,
    TWO_PI,
};

/// Parameters shared by all turning circles of one state space.
#[derive(Debug, Clone, Copy)]
pub struct CircleParam {
    pub kappa: f64,
    pub sigma: f64,
    pub radius: f64,
    pub mu: f64,
    pub sin_mu: f64,
    pub cos_mu: f64,
    pub delta_min: f64,
}

impl CircleParam {
    /// Clothoid turning circle for maximum curvature kappa and sharpness
    /// sigma: drive the entry clothoid to full curvature, offset the arc
    /// centre, and measure the resulting outer radius and angular offset.
    pub fn new(kappa: f64, sigma: f64) -> Self {
        let length_min = kappa / sigma;
        let (x_i, y_i, theta_i) = if length_min > get_epsilon() {
            let (x, y, theta, _) = end_of_clothoid(0.0, 0.0, 0.0, 0.0, sigma, 1.0, length_min);
            (x, y, theta)
        } else {
            (0.0, 0.0, 0.0)
        };
        let xc = x_i - theta_i.sin() / kappa;
        let yc = y_i + theta_i.cos() / kappa;
        let radius = point_distance(xc, yc, 0.0, 0.0);
        let mu = (xc / yc).abs().atan();
        Self {
            kappa,
            sigma,
            radius,
            mu,
            sin_mu: mu.sin(),
            cos_mu: mu.cos(),
            delta_min: 0.5 * kappa * kappa / sigma,
        }
    }

    /// Degenerate circle of the Reeds-Shepp kind: no clothoid, the outer
    /// circle is the arc itself.
    pub fn rs(kappa: f64) -> Self {
        Self {
            kappa,
            sigma: f64::INFINITY,
            radius: 1.0 / kappa,
            mu: 0.0,
            sin_mu: 0.0,
            cos_mu: 1.0,
            delta_min: 0.0,
        }
    }
}

/// One turning circle: orientation, traversal sense and the start
/// configuration the turn is measured from.
#[derive(Debug, Clone)]
pub struct HcCcCircle {
    pub start: Configuration,
    pub left: bool,
    pub forward: bool,
    /// Regular circles admit deflections up to a full turn; irregular
    /// ones take the shorter of the two arcs.
    pub regular: bool,
    pub xc: f64,
    pub yc: f64,
    /// Signed curvature of the arc (+ for left circles)
    pub kappa: f64,
    pub kappa_inv: f64,
    /// Signed sharpness of the entry/exit clothoids
    pub sigma: f64,
    pub radius: f64,
    pub mu: f64,
    pub sin_mu: f64,
    pub cos_mu: f64,
    pub delta_min: f64,
}

impl HcCcCircle {
    pub fn from_start(
        start: &Configuration,
        left: bool,
        forward: bool,
        regular: bool,
        param: &CircleParam,
    ) -> Self {
        let delta_x = param.radius * param.sin_mu;
        let delta_y = param.radius * param.cos_mu;
        let (kappa, kappa_inv, sigma) = if left {
            (param.kappa, 1.0 / param.kappa, param.sigma)
        } else {
            (-param.kappa, -1.0 / param.kappa, -param.sigma)
        };
        let (dx, dy) = match (left, forward) {
            (true, true) => (delta_x, delta_y),
            (true, false) => (-delta_x, delta_y),
            (false, true) => (delta_x, -delta_y),
            (false, false) => (-delta_x, -delta_y),
        };
        let (xc, yc) = global_frame_change(start.x, start.y, start.theta, dx, dy);
        Self {
            start: *start,
            left,
            forward,
            regular,
            xc,
            yc,
            kappa,
            kappa_inv,
            sigma,
            radius: param.radius,
            mu: param.mu,
            sin_mu: param.sin_mu,
            cos_mu: param.cos_mu,
            delta_min: param.delta_min,
        }
    }

    /// Circle given by its centre only; the start configuration is unset.
    pub fn from_center(
        xc: f64,
        yc: f64,
        left: bool,
        forward: bool,
        regular: bool,
        param: &CircleParam,
    ) -> Self {
        let (kappa, kappa_inv, sigma) = if left {
            (param.kappa, 1.0 / param.kappa, param.sigma)
        } else {
            (-param.kappa, -1.0 / param.kappa, -param.sigma)
        };
        Self {
            start: Configuration::default(),
            left,
            forward,
            regular,
            xc,
            yc,
            kappa,
            kappa_inv,
            sigma,
            radius: param.radius,
            mu: param.mu,
            sin_mu: param.sin_mu,
            cos_mu: param.cos_mu,
            delta_min: param.delta_min,
        }
    }

    /// Heading change from the circle's start configuration to q,
    /// measured along the traversal sense of the circle.
    pub fn deflection(&self, q: &Configuration) -> f64 {
        let alpha_c = self.start.theta;
        let alpha_q = q.theta;
        match (self.left, self.forward) {
            (true, true) | (false, false) => twopify(alpha_q - alpha_c),
            (true, false) | (false, true) => twopify(alpha_c - alpha_q),
        }
    }

    pub(crate) fn rs_circular_deflection(&self, delta: f64) -> f64 {
        if self.regular {
            delta
        } else if delta < PI {
            delta
        } else {
            delta - TWO_PI
        }
    }

    /// Arc length of a pure circular turn reaching q.
    pub fn rs_turn_length(&self, q: &Configuration) -> f64 {
        debug_assert!((self.kappa.abs() - q.kappa.abs()).abs() < get_epsilon());
        let delta = self.deflection(q);
        self.kappa_inv.abs() * self.rs_circular_deflection(delta).abs()
    }

    pub(crate) fn hc_circular_deflection(&self, delta: f64) -> f64 {
        // one entry clothoid consumes delta_min of the deflection
        if self.regular {
            let delta_arc = delta - self.delta_min;
            if delta_arc >= 0.0 {
                delta_arc
            } else {
                delta_arc + TWO_PI
            }
        } else {
            let delta_arc1 = delta - self.delta_min;
            let delta_arc2 = delta_arc1 - TWO_PI;
            if delta_arc1.abs() < delta_arc2.abs() {
                delta_arc1
            } else {
                delta_arc2
            }
        }
    }

    /// Arc length of a clothoid-plus-arc turn reaching q at full curvature.
    pub fn hc_turn_length(&self, q: &Configuration) -> f64 {
        debug_assert!((self.kappa.abs() - q.kappa.abs()).abs() < get_epsilon());
        let delta = self.deflection(q);
        let length_min = if self.sigma.is_finite() {
            (self.kappa / self.sigma).abs()
        } else {
            0.0
        };
        length_min + self.kappa_inv.abs() * self.hc_circular_deflection(delta).abs()
    }

    pub(crate) fn cc_circular_deflection(&self, delta: f64) -> f64 {
        // both clothoids consume delta_min each
        if self.regular {
            let delta_arc = delta - 2.0 * self.delta_min;
            if delta_arc >= 0.0 {
                delta_arc
            } else {
                delta_arc + TWO_PI
            }
        } else {
            let delta_arc1 = delta - 2.0 * self.delta_min;
            let delta_arc2 = delta_arc1 - TWO_PI;
            if delta_arc1.abs() < delta_arc2.abs() {
                delta_arc1
            } else {
                delta_arc2
            }
        }
    }

    /// Arc length of a clothoid-arc-clothoid turn reaching q at zero
    /// curvature. Must stay consistent with `cc_turn_controls`.
    pub fn cc_turn_length(&self, q: &Configuration) -> f64 {
        debug_assert!(q.kappa.abs() < get_epsilon());
        let delta = self.deflection(q);
        if delta < get_epsilon() {
            return point_distance(self.start.x, self.start.y, q.x, q.y);
        }
        let length_default = 2.0 * (self.kappa / self.sigma).abs()
            + self.kappa_inv.abs() * self.cc_circular_deflection(delta).abs();
        if delta < 2.0 * self.delta_min {
            if let Some(sigma0) = self.cc_elementary_sharpness(q, delta) {
                let length_elementary = 2.0 * (delta / sigma0.abs()).sqrt();
                return length_elementary.min(length_default);
            }
        }
        length_default
    }

    /// Sharpness of the symmetric two-clothoid solution of total
    /// deflection delta from the circle start to q, if the chord admits
    /// one.
    pub fn cc_elementary_sharpness(&self, q: &Configuration, delta: f64) -> Option<f64> {
        let distance = point_distance(self.start.x, self.start.y, q.x, q.y);
        if distance < get_epsilon() || delta < get_epsilon() {
            return None;
        }
        // the chord of an elementary path bisects the two headings
        let bearing = (q.y - self.start.y).atan2(q.x - self.start.x);
        let side = if self.left { 1.0 } else { -1.0 };
        let expected = if self.forward {
            self.start.theta + side * 0.5 * delta
        } else {
            self.start.theta - side * 0.5 * delta + PI
        };
        if pify(bearing - expected).abs() >= get_epsilon() {
            return None;
        }
        let half = 0.5 * delta;
        let (fresnel_c, fresnel_s) = fresnel((delta / PI).sqrt());
        let d1 = half.cos() * fresnel_c + half.sin() * fresnel_s;
        Some(sgn(self.kappa) * 4.0 * PI * d1 * d1 / (distance * distance))
    }
}

pub fn center_distance(c1: &HcCcCircle, c2: &HcCcCircle) -> f64 {
    point_distance(c1.xc, c1.yc, c2.xc, c2.yc)
}

/// True if q can terminate a turn on c: it lies on the locus where the
/// turn leaves the circle (zero-curvature locus for clothoid circles,
/// the arc itself for Reeds-Shepp circles) with a tangent heading.
pub fn configuration_on_circle(c: &HcCcCircle, q: &Configuration) -> bool {
    if (point_distance(c.xc, c.yc, q.x, q.y) - c.radius).abs() > get_epsilon() {
        return false;
    }
    if c.sigma.is_finite() {
        if q.kappa.abs() > get_epsilon() {
            return false;
        }
    } else if (q.kappa - c.kappa).abs() > get_epsilon() {
        return false;
    }
    let angle = (q.y - c.yc).atan2(q.x - c.xc);
    let expected = match (c.left, c.forward) {
        (true, true) => angle + HALF_PI - c.mu,
        (true, false) => angle + HALF_PI + c.mu,
        (false, true) => angle - HALF_PI + c.mu,
        (false, false) => angle - HALF_PI - c.mu,
    };
    pify(expected - q.theta).abs() < get_epsilon()
}

/// True if q lies on the full-curvature arc of c with matching curvature
/// and a tangent heading.
pub fn configuration_on_turning_arc(c: &HcCcCircle, q: &Configuration) -> bool {
    if (point_distance(c.xc, c.yc, q.x, q.y) - c.kappa_inv.abs()).abs() > get_epsilon() {
        return false;
    }
    if (q.kappa - c.kappa).abs() > get_epsilon() {
        return false;
    }
    let angle = (q.y - c.yc).atan2(q.x - c.xc);
    let expected = if c.left { angle + HALF_PI } else { angle - HALF_PI };
    pify(expected - q.theta).abs() < get_epsilon()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rs_param() {
        let param = CircleParam::rs(2.0);
        assert!((param.radius - 0.5).abs() < 1e-12);
        assert!(param.mu.abs() < 1e-12);
        assert!(param.sigma.is_infinite());
        assert!(param.delta_min.abs() < 1e-12);
    }

    #[test]
    fn test_clothoid_param_geometry() {
        let param = CircleParam::new(1.0, 1.0);
        // the clothoid pushes the circle outwards
        assert!(param.radius > 1.0);
        assert!(param.mu > 0.0 && param.mu < HALF_PI);
        assert!((param.delta_min - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_circle_orientation_signs() {
        let param = CircleParam::new(1.0, 1.0);
        let q = Configuration::new(0.0, 0.0, 0.0, 0.0);
        let left = HcCcCircle::from_start(&q, true, true, true, &param);
        let right = HcCcCircle::from_start(&q, false, true, true, &param);
        assert!(left.kappa > 0.0 && left.sigma > 0.0);
        assert!(right.kappa < 0.0 && right.sigma < 0.0);
        assert!(left.yc > 0.0);
        assert!(right.yc < 0.0);
        assert!((left.yc + right.yc).abs() < 1e-12);
    }

    #[test]
    fn test_rs_turn_length_quarter_circle() {
        let param = CircleParam::rs(1.0);
        let start = Configuration::new(0.0, 0.0, 0.0, 1.0);
        let c = HcCcCircle::from_start(&start, true, true, true, &param);
        // quarter turn left on the unit circle ends at (1, 1, pi/2)
        let q = Configuration::new(1.0, 1.0, HALF_PI, 1.0);
        assert!((c.deflection(&q) - HALF_PI).abs() < 1e-12);
        assert!((c.rs_turn_length(&q) - HALF_PI).abs() < 1e-12);
    }

    #[test]
    fn test_hc_turn_length_includes_clothoid() {
        let param = CircleParam::new(1.0, 1.0);
        let start = Configuration::new(0.0, 0.0, 0.0, 0.0);
        let c = HcCcCircle::from_start(&start, true, true, true, &param);
        // a turn of deflection pi needs the entry clothoid plus an arc;
        // only the heading of q enters the length
        let q = Configuration::new(c.xc, c.yc + 1.0, PI, 1.0);
        let length = c.hc_turn_length(&q);
        let expected = 1.0 + (PI - 0.5);
        assert!((length - expected).abs() < 1e-12, "length {}", length);
    }

    #[test]
    fn test_cc_turn_straight_chord() {
        let param = CircleParam::new(1.0, 1.0);
        let start = Configuration::new(0.0, 0.0, 0.0, 0.0);
        let c = HcCcCircle::from_start(&start, true, true, true, &param);
        // zero deflection degenerates into the chord
        let q = Configuration::new(1.0, 0.0, 0.0, 0.0);
        assert!((c.cc_turn_length(&q) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_configuration_on_circle() {
        let param = CircleParam::rs(1.0);
        let start = Configuration::new(0.0, 0.0, 0.0, 1.0);
        let c = HcCcCircle::from_start(&start, true, true, true, &param);
        let q = Configuration::new(1.0, 1.0, HALF_PI, 1.0);
        assert!(configuration_on_circle(&c, &q));
        let q_off = Configuration::new(1.1, 1.0, HALF_PI, 1.0);
        assert!(!configuration_on_circle(&c, &q_off));
        let q_wrong_heading = Configuration::new(1.0, 1.0, 0.0, 1.0);
        assert!(!configuration_on_circle(&c, &q_wrong_heading));
    }
}
