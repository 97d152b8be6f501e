//! Configurations: oriented points with curvature, the junctions of
//! composite paths.

use crate::utils::geometry::{get_epsilon, pify, point_distance, twopify};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Configuration {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub kappa: f64,
}

impl Configuration {
    pub fn new(x: f64, y: f64, theta: f64, kappa: f64) -> Self {
        Self { x, y, theta, kappa }
    }
}

pub fn configuration_distance(q1: &Configuration, q2: &Configuration) -> f64 {
    point_distance(q1.x, q1.y, q2.x, q2.y)
}

pub fn configuration_equal(q1: &Configuration, q2: &Configuration) -> bool {
    if (q2.kappa - q1.kappa).abs() > get_epsilon() {
        return false;
    }
    if (twopify(q2.theta) - twopify(q1.theta)).abs() > get_epsilon() {
        return false;
    }
    configuration_distance(q1, q2) <= get_epsilon()
}

/// True if q2 lies ahead of q1 on q1's heading ray with the same heading.
pub fn configuration_aligned(q1: &Configuration, q2: &Configuration) -> bool {
    if (twopify(q2.theta) - twopify(q1.theta)).abs() > get_epsilon() {
        return false;
    }
    let distance = configuration_distance(q1, q2);
    if distance < get_epsilon() {
        return false;
    }
    let bearing = (q2.y - q1.y).atan2(q2.x - q1.x);
    pify(bearing - q1.theta).abs() < get_epsilon()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_configuration_equal() {
        let q1 = Configuration::new(1.0, 2.0, 0.5, 1.0);
        let q2 = Configuration::new(1.0, 2.0, 0.5 + 2.0 * PI, 1.0);
        assert!(configuration_equal(&q1, &q2));
        let q3 = Configuration::new(1.0, 2.0, 0.5, -1.0);
        assert!(!configuration_equal(&q1, &q3));
    }

    #[test]
    fn test_configuration_aligned() {
        let q1 = Configuration::new(0.0, 0.0, PI / 4.0, 0.0);
        let ahead = Configuration::new(1.0, 1.0, PI / 4.0, 0.0);
        let behind = Configuration::new(-1.0, -1.0, PI / 4.0, 0.0);
        assert!(configuration_aligned(&q1, &ahead));
        assert!(!configuration_aligned(&q1, &behind));
        // the reversed check covers the behind case
        assert!(configuration_aligned(&behind, &q1));
    }
}
