//! Word geometry of the clothoid families: existence predicates,
//! tangent-circle constructions and length assembly for the composite
//! words, shared by every family.
//!
//! The endpoint curvature class decides how a word meets the two path
//! ends: full-curvature endpoints use arc (rs) turns at direction
//! switches and arc-plus-clothoid (hc) turns elsewhere; zero-curvature
//! endpoints use hc turns at switches and clothoid-bracketed (cc) turns
//! elsewhere. Everything in between is endpoint-independent geometry on
//! the circle centres.

use std::f64::consts::PI;

use crate::steering::circle::{
    center_distance, configuration_on_circle, configuration_on_turning_arc, HcCcCircle,
};
use crate::steering::configuration::{
    configuration_distance, configuration_equal, Configuration,
};
use crate::steering::hc_cc::HcCcStateSpace;
use crate::steering::paths::{EndpointKind, HcCcWord};
use crate::utils::geometry::{global_frame_change, HALF_PI};

/// Word identifiers a family may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordTag {
    TT,
    TcT,
    /// Direction switch taken at zero curvature (continuous-curvature
    /// families)
    TcTZero,
    TcTcT,
    TcTT,
    TTcT,
    TST,
    TSTcT,
    TcTST,
    TcTSTcT,
    TTcTT,
    TcTTcT,
    TTT,
    TcST,
    TScT,
    TcScT,
}

fn safe_asin(x: f64) -> Option<f64> {
    if x.abs() <= 1.0 {
        Some(x.asin())
    } else {
        None
    }
}

pub(crate) struct WordSolver<'a> {
    space: &'a HcCcStateSpace,
    start_kind: EndpointKind,
    end_kind: EndpointKind,
    /// Regular turns only: forward-only families may not shorten a turn
    /// by briefly reversing along it.
    regular: bool,
    distance: f64,
    angle: f64,
}

impl<'a> WordSolver<'a> {
    pub(crate) fn new(
        space: &'a HcCcStateSpace,
        start_kind: EndpointKind,
        end_kind: EndpointKind,
        regular: bool,
    ) -> Self {
        Self { space, start_kind, end_kind, regular, distance: 0.0, angle: 0.0 }
    }

    fn eps(&self) -> f64 {
        self.space.epsilon
    }

    fn radius(&self) -> f64 {
        self.space.hc_param.radius
    }

    fn sin_mu(&self) -> f64 {
        self.space.hc_param.sin_mu
    }

    fn cos_mu(&self) -> f64 {
        self.space.hc_param.cos_mu
    }

    /// Shortest word between one pair of endpoint circles.
    pub(crate) fn circles_path(
        &mut self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
        words: &[WordTag],
    ) -> Option<(f64, HcCcWord)> {
        self.distance = center_distance(c1, c2);
        self.angle = (c2.yc - c1.yc).atan2(c2.xc - c1.xc);

        if configuration_equal(&c1.start, &c2.start) {
            return Some((0.0, HcCcWord::E));
        }
        if let Some(result) = self.t_word(c1, c2) {
            return Some(result);
        }

        let mut best: Option<(f64, HcCcWord)> = None;
        for tag in words {
            let candidate = match tag {
                WordTag::TT => self.tt(c1, c2),
                WordTag::TcT => self.tct(c1, c2),
                WordTag::TcTZero => self.tct_zero(c1, c2),
                WordTag::TcTcT => self.tctct(c1, c2),
                WordTag::TcTT => self.tctt(c1, c2),
                WordTag::TTcT => self.ttct(c1, c2),
                WordTag::TST => self.tst(c1, c2),
                WordTag::TSTcT => self.tstct(c1, c2),
                WordTag::TcTST => self.tctst(c1, c2),
                WordTag::TcTSTcT => self.tctstct(c1, c2),
                WordTag::TTcTT => self.ttctt(c1, c2),
                WordTag::TcTTcT => self.tcttct(c1, c2),
                WordTag::TTT => self.ttt(c1, c2),
                WordTag::TcST => self.tcst(c1, c2),
                WordTag::TScT => self.tsct(c1, c2),
                WordTag::TcScT => self.tcsct(c1, c2),
            };
            if let Some((length, word)) = candidate {
                let better = match &best {
                    Some((best_length, _)) => length < *best_length,
                    None => true,
                };
                if better {
                    best = Some((length, word));
                }
            }
        }
        best
    }

    // ----- endpoint turn pieces -------------------------------------

    /// First turn of a word without an adjacent direction switch.
    fn start_regular_piece(&self, c1: &HcCcCircle, tangent: &Configuration) -> (HcCcCircle, f64) {
        match self.start_kind {
            EndpointKind::FullKappa => {
                let cstart = HcCcCircle::from_start(
                    tangent,
                    c1.left,
                    !c1.forward,
                    self.regular,
                    &self.space.hc_param,
                );
                let length = cstart.hc_turn_length(&c1.start);
                (cstart, length)
            }
            EndpointKind::ZeroKappa => {
                let length = c1.cc_turn_length(tangent);
                (c1.clone(), length)
            }
        }
    }

    /// Last turn of a word without an adjacent direction switch.
    fn end_regular_piece(&self, c2: &HcCcCircle, tangent: &Configuration) -> (HcCcCircle, f64) {
        match self.end_kind {
            EndpointKind::FullKappa => {
                let cend = HcCcCircle::from_start(
                    tangent,
                    c2.left,
                    !c2.forward,
                    self.regular,
                    &self.space.hc_param,
                );
                let length = cend.hc_turn_length(&c2.start);
                (cend, length)
            }
            EndpointKind::ZeroKappa => {
                let length = c2.cc_turn_length(tangent);
                (c2.clone(), length)
            }
        }
    }

    /// First turn of a word running into a full-curvature direction
    /// switch at q.
    fn start_cusp_piece(&self, c1: &HcCcCircle, q: &Configuration) -> (HcCcCircle, f64) {
        let length = match self.start_kind {
            EndpointKind::FullKappa => c1.rs_turn_length(q),
            EndpointKind::ZeroKappa => c1.hc_turn_length(q),
        };
        (c1.clone(), length)
    }

    /// Last turn of a word leaving a full-curvature direction switch at q.
    fn end_cusp_piece(&self, c2: &HcCcCircle, q: &Configuration) -> (HcCcCircle, f64) {
        let length = match self.end_kind {
            EndpointKind::FullKappa => c2.rs_turn_length(q),
            EndpointKind::ZeroKappa => c2.hc_turn_length(q),
        };
        (c2.clone(), length)
    }

    // ----- E and T ---------------------------------------------------

    fn t_word(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let goal = &c2.start;
        match (self.start_kind, self.end_kind) {
            (EndpointKind::FullKappa, EndpointKind::FullKappa) => {
                if configuration_on_circle(c1, goal) {
                    let cstart = c1.clone();
                    let length = cstart.rs_turn_length(goal);
                    return Some((length, HcCcWord::T { cstart }));
                }
            }
            (EndpointKind::ZeroKappa, EndpointKind::ZeroKappa) => {
                if configuration_on_circle(c1, goal) {
                    let cstart = c1.clone();
                    let length = cstart.cc_turn_length(goal);
                    return Some((length, HcCcWord::T { cstart }));
                }
            }
            (EndpointKind::ZeroKappa, EndpointKind::FullKappa) => {
                if configuration_on_turning_arc(c1, goal) {
                    let cstart = c1.clone();
                    let length = cstart.hc_turn_length(goal);
                    return Some((length, HcCcWord::T { cstart }));
                }
            }
            (EndpointKind::FullKappa, EndpointKind::ZeroKappa) => {
                // the goal must sit where the turn leaves the circle
                let probe = HcCcCircle::from_center(
                    c1.xc,
                    c1.yc,
                    c1.left,
                    c1.forward,
                    self.regular,
                    &self.space.hc_param,
                );
                if configuration_on_circle(&probe, goal) {
                    let cstart = HcCcCircle::from_start(
                        goal,
                        c1.left,
                        !c1.forward,
                        self.regular,
                        &self.space.hc_param,
                    );
                    let length = cstart.hc_turn_length(&c1.start);
                    return Some((length, HcCcWord::T { cstart }));
                }
            }
        }
        None
    }

    // ----- TT --------------------------------------------------------

    fn tt_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        (self.distance - 2.0 * self.radius()).abs() < self.eps()
    }

    fn tt_tangent_circles(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Configuration {
        let x = 0.5 * (c1.xc + c2.xc);
        let y = 0.5 * (c1.yc + c2.yc);
        let angle = (c2.yc - c1.yc).atan2(c2.xc - c1.xc);
        // the angular offset is that of the clothoid circles, also when
        // the endpoint circle itself carries no clothoid
        let mu = self.space.hc_param.mu;
        let theta = match (c1.left, c1.forward) {
            (true, true) => angle + HALF_PI - mu,
            (true, false) => angle + HALF_PI + mu,
            (false, true) => angle - HALF_PI + mu,
            (false, false) => angle - HALF_PI - mu,
        };
        Configuration::new(x, y, theta, 0.0)
    }

    fn tt(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.tt_exists(c1, c2) {
            return None;
        }
        let q2 = self.tt_tangent_circles(c1, c2);
        let (cstart, length1) = self.start_regular_piece(c1, &q2);
        let (cend, length2) = self.end_regular_piece(c2, &q2);
        Some((
            length1 + length2,
            HcCcWord::TT { cstart, cend, q1: c1.start, q2, q3: c2.start },
        ))
    }

    // ----- TcT -------------------------------------------------------

    fn tct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        (self.distance - 2.0 * c1.kappa_inv.abs()).abs() < self.eps()
    }

    fn tct_tangent_circles(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Configuration {
        let distance = center_distance(c1, c2);
        let delta_x = 0.5 * distance;
        let delta_y = 0.0;
        let angle = (c2.yc - c1.yc).atan2(c2.xc - c1.xc);
        let (theta, x, y) = match (c1.left, c1.forward) {
            (true, true) => {
                let (x, y) = global_frame_change(c1.xc, c1.yc, angle, delta_x, delta_y);
                (angle + HALF_PI, x, y)
            }
            (true, false) => {
                let (x, y) = global_frame_change(c1.xc, c1.yc, angle, delta_x, -delta_y);
                (angle + HALF_PI, x, y)
            }
            (false, true) => {
                let (x, y) = global_frame_change(c1.xc, c1.yc, angle, delta_x, -delta_y);
                (angle - HALF_PI, x, y)
            }
            (false, false) => {
                let (x, y) = global_frame_change(c1.xc, c1.yc, angle, delta_x, delta_y);
                (angle - HALF_PI, x, y)
            }
        };
        Configuration::new(x, y, theta, c1.kappa)
    }

    fn tct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.tct_exists(c1, c2) {
            return None;
        }
        let q1 = self.tct_tangent_circles(c1, c2);
        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let (cend, length2) = self.end_cusp_piece(c2, &q1);
        Some((length1 + length2, HcCcWord::TcT { cstart, cend, q1 }))
    }

    // ----- TcT with the switch at zero curvature ---------------------

    fn tct_zero_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        (self.distance - 2.0 * self.radius() * self.cos_mu()).abs() < self.eps()
    }

    fn tct_zero_tangent_circles(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Configuration {
        let angle = (c2.yc - c1.yc).atan2(c2.xc - c1.xc);
        let mu = self.space.hc_param.mu;
        let (bearing, theta) = match (c1.left, c1.forward) {
            (true, true) => (angle + mu, angle + HALF_PI),
            (true, false) => (angle - mu, angle + HALF_PI),
            (false, true) => (angle - mu, angle - HALF_PI),
            (false, false) => (angle + mu, angle - HALF_PI),
        };
        Configuration::new(
            c1.xc + self.radius() * bearing.cos(),
            c1.yc + self.radius() * bearing.sin(),
            theta,
            0.0,
        )
    }

    fn tct_zero(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.tct_zero_exists(c1, c2) {
            return None;
        }
        let q1 = self.tct_zero_tangent_circles(c1, c2);
        let length = c1.cc_turn_length(&q1) + c2.cc_turn_length(&q1);
        Some((length, HcCcWord::TcT { cstart: c1.clone(), cend: c2.clone(), q1 }))
    }

    // ----- TcTcT -----------------------------------------------------

    fn tctct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance <= 4.0 * c1.kappa_inv.abs()
    }

    fn tctct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.tctct_exists(c1, c2) {
            return None;
        }
        let theta = self.angle;
        let r = 2.0 * c1.kappa_inv.abs();
        let delta_x = 0.5 * self.distance;
        let delta_y = (r * r - delta_x * delta_x).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, true, &self.space.rs_param);
        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, true, &self.space.rs_param);

        let qa = self.tct_tangent_circles(c1, &tgt1);
        let qb = self.tct_tangent_circles(&tgt1, c2);
        let qc = self.tct_tangent_circles(c1, &tgt2);
        let qd = self.tct_tangent_circles(&tgt2, c2);

        let middle1 =
            HcCcCircle::from_start(&qa, !c1.left, !c1.forward, true, &self.space.rs_param);
        let middle2 =
            HcCcCircle::from_start(&qc, !c1.left, !c1.forward, true, &self.space.rs_param);

        let (cstart1, start1) = self.start_cusp_piece(c1, &qa);
        let (cend1, end1) = self.end_cusp_piece(c2, &qb);
        let length1 = start1 + middle1.rs_turn_length(&qb) + end1;

        let (cstart2, start2) = self.start_cusp_piece(c1, &qc);
        let (cend2, end2) = self.end_cusp_piece(c2, &qd);
        let length2 = start2 + middle2.rs_turn_length(&qd) + end2;

        if length1 < length2 {
            Some((
                length1,
                HcCcWord::TcTcT { cstart: cstart1, cend: cend1, q1: qa, q2: qb, ci: middle1 },
            ))
        } else {
            Some((
                length2,
                HcCcWord::TcTcT { cstart: cstart2, cend: cend2, q1: qc, q2: qd, ci: middle2 },
            ))
        }
    }

    // ----- TcTT ------------------------------------------------------

    fn tctt_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        let two_r = 2.0 * self.radius();
        let two_kappa_inv = 2.0 * c1.kappa_inv.abs();
        self.distance <= two_r + two_kappa_inv && self.distance >= two_r - two_kappa_inv
    }

    fn tctt(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.tctt_exists(c1, c2) {
            return None;
        }
        let theta = self.angle;
        let r1 = 2.0 * c1.kappa_inv.abs();
        let r2 = 2.0 * self.radius();
        let delta_x = (r1 * r1 + self.distance * self.distance - r2 * r2) / (2.0 * self.distance);
        let delta_y = (r1 * r1 - delta_x * delta_x).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, c1.regular, &self.space.hc_param);

        let qa = self.tct_tangent_circles(c1, &tgt1);
        let qb = self.tt_tangent_circles(&tgt1, c2);
        let qc = self.tct_tangent_circles(c1, &tgt2);
        let qd = self.tt_tangent_circles(&tgt2, c2);

        let middle1 = HcCcCircle::from_start(&qb, !c1.left, c1.forward, true, &self.space.hc_param);
        let middle2 = HcCcCircle::from_start(&qd, !c1.left, c1.forward, true, &self.space.hc_param);

        let (cstart1, start1) = self.start_cusp_piece(c1, &qa);
        let (cend1, end1) = self.end_regular_piece(c2, &qb);
        let length1 = start1 + middle1.hc_turn_length(&qa) + end1;

        let (cstart2, start2) = self.start_cusp_piece(c1, &qc);
        let (cend2, end2) = self.end_regular_piece(c2, &qd);
        let length2 = start2 + middle2.hc_turn_length(&qc) + end2;

        if length1 < length2 {
            Some((
                length1,
                HcCcWord::TcTT {
                    cstart: cstart1,
                    cend: cend1,
                    q1: qa,
                    q2: c2.start,
                    qt: qb,
                    ci: middle1,
                },
            ))
        } else {
            Some((
                length2,
                HcCcWord::TcTT {
                    cstart: cstart2,
                    cend: cend2,
                    q1: qc,
                    q2: c2.start,
                    qt: qd,
                    ci: middle2,
                },
            ))
        }
    }

    // ----- TTcT ------------------------------------------------------

    fn ttct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        self.tctt_exists(c1, c2)
    }

    fn ttct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.ttct_exists(c1, c2) {
            return None;
        }
        let theta = self.angle;
        let r1 = 2.0 * self.radius();
        let r2 = 2.0 * c1.kappa_inv.abs();
        let delta_x = (r1 * r1 + self.distance * self.distance - r2 * r2) / (2.0 * self.distance);
        let delta_y = (r1 * r1 - delta_x * delta_x).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c1.left, c1.forward, c1.regular, &self.space.hc_param);

        let qa = self.tt_tangent_circles(c1, &tgt1);
        let qb = self.tct_tangent_circles(&tgt1, c2);
        let qc = self.tt_tangent_circles(c1, &tgt2);
        let qd = self.tct_tangent_circles(&tgt2, c2);

        let middle1 = HcCcCircle::from_start(&qa, !c1.left, c1.forward, true, &self.space.hc_param);
        let middle2 = HcCcCircle::from_start(&qc, !c1.left, c1.forward, true, &self.space.hc_param);

        let (cstart1, start1) = self.start_regular_piece(c1, &qa);
        let (cend1, end1) = self.end_cusp_piece(c2, &qb);
        let length1 = start1 + middle1.hc_turn_length(&qb) + end1;

        let (cstart2, start2) = self.start_regular_piece(c1, &qc);
        let (cend2, end2) = self.end_cusp_piece(c2, &qd);
        let length2 = start2 + middle2.hc_turn_length(&qd) + end2;

        if length1 < length2 {
            Some((
                length1,
                HcCcWord::TTcT {
                    cstart: cstart1,
                    cend: cend1,
                    q1: c1.start,
                    q2: qb,
                    qt: qa,
                    ci: middle1,
                },
            ))
        } else {
            Some((
                length2,
                HcCcWord::TTcT {
                    cstart: cstart2,
                    cend: cend2,
                    q1: c1.start,
                    q2: qd,
                    qt: qc,
                    ci: middle2,
                },
            ))
        }
    }

    // ----- TST -------------------------------------------------------

    fn tist_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance >= 2.0 * self.radius()
    }

    fn test_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance >= 2.0 * self.radius() * self.sin_mu()
    }

    fn tist_tangent_circles(
        &self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
    ) -> Option<(Configuration, Configuration)> {
        let distance = center_distance(c1, c2);
        let angle = (c2.yc - c1.yc).atan2(c2.xc - c1.xc);
        let alpha = safe_asin(2.0 * self.radius() * self.cos_mu() / distance)?;
        let delta_x = self.radius() * self.sin_mu();
        let delta_y = self.radius() * self.cos_mu();
        let (q1, q2) = match (c1.left, c1.forward) {
            (true, true) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
            (true, false) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
            (false, true) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
            (false, false) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
        };
        Some((q1, q2))
    }

    fn test_tangent_circles(
        &self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
    ) -> (Configuration, Configuration) {
        let delta_x = self.radius() * self.sin_mu();
        let delta_y = self.radius() * self.cos_mu();
        let theta = (c2.yc - c1.yc).atan2(c2.xc - c1.xc);
        match (c1.left, c1.forward) {
            (true, true) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
            (true, false) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
            (false, true) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
            (false, false) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
        }
    }

    fn tst(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tist_exists(c1, c2) {
            let (q2, q3) = self.tist_tangent_circles(c1, c2)?;
            return Some(self.tst_from_tangents(c1, c2, q2, q3));
        }
        if self.test_exists(c1, c2) {
            let (q2, q3) = self.test_tangent_circles(c1, c2);
            return Some(self.tst_from_tangents(c1, c2, q2, q3));
        }
        None
    }

    fn tst_from_tangents(
        &self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
        q2: Configuration,
        q3: Configuration,
    ) -> (f64, HcCcWord) {
        let (cstart, length1) = self.start_regular_piece(c1, &q2);
        let (cend, length3) = self.end_regular_piece(c2, &q3);
        let length = length1 + configuration_distance(&q2, &q3) + length3;
        (length, HcCcWord::TST { cstart, cend, q1: c1.start, q2, q3, q4: c2.start })
    }

    // ----- TSTcT -----------------------------------------------------

    fn tistct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        let a = 2.0 * self.radius() * self.sin_mu() + 2.0 * c1.kappa_inv.abs();
        let b = 2.0 * self.radius() * self.cos_mu();
        self.distance >= (a * a + b * b).sqrt()
    }

    fn testct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        self.distance >= 2.0 * (c1.kappa_inv.abs() + self.radius() * self.sin_mu())
    }

    fn tstct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tistct_exists(c1, c2) {
            return self.tistct_path(c1, c2);
        }
        if self.testct_exists(c1, c2) {
            return self.testct_path(c1, c2);
        }
        None
    }

    fn tistct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_y =
            (4.0 * self.radius() * self.cos_mu()) / (c2.kappa.abs() * self.distance);
        let r = 2.0 * c2.kappa_inv;
        let delta_x = (r * r - delta_y * delta_y).max(0.0).sqrt();

        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c2.left, c2.forward, c2.regular, &self.space.hc_param);

        let (q2, q3) = self.tist_tangent_circles(c1, &tgt1)?;
        let q4 = self.tct_tangent_circles(&tgt1, c2);

        let (cstart, length1) = self.start_regular_piece(c1, &q2);
        let ci = HcCcCircle::from_start(&q3, !c1.left, c1.forward, true, &self.space.hc_param);
        let (cend, length4) = self.end_cusp_piece(c2, &q4);
        let length =
            length1 + configuration_distance(&q2, &q3) + ci.hc_turn_length(&q4) + length4;
        Some((length, HcCcWord::TSTcT { cstart, cend, q1: c1.start, q2, q3, q4, ci }))
    }

    fn testct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_x = 2.0 * c2.kappa_inv.abs();
        let delta_y = 0.0;

        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c2.left, c2.forward, c2.regular, &self.space.hc_param);

        let (q2, q3) = self.test_tangent_circles(c1, &tgt1);
        let q4 = self.tct_tangent_circles(&tgt1, c2);

        let (cstart, length1) = self.start_regular_piece(c1, &q2);
        let ci = HcCcCircle::from_start(&q3, c1.left, c1.forward, true, &self.space.hc_param);
        let (cend, length4) = self.end_cusp_piece(c2, &q4);
        let length =
            length1 + configuration_distance(&q2, &q3) + ci.hc_turn_length(&q4) + length4;
        Some((length, HcCcWord::TSTcT { cstart, cend, q1: c1.start, q2, q3, q4, ci }))
    }

    // ----- TcTST -----------------------------------------------------

    fn tctist_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        self.tistct_exists(c1, c2)
    }

    fn tctest_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        self.testct_exists(c1, c2)
    }

    fn tctst(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tctist_exists(c1, c2) {
            return self.tctist_path(c1, c2);
        }
        if self.tctest_exists(c1, c2) {
            return self.tctest_path(c1, c2);
        }
        None
    }

    fn tctist_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_y =
            (4.0 * self.radius() * self.cos_mu()) / (c2.kappa.abs() * self.distance);
        let r = 2.0 * c2.kappa_inv;
        let delta_x = (r * r - delta_y * delta_y).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c2.left, !c2.forward, c2.regular, &self.space.hc_param);

        let q1 = self.tct_tangent_circles(c1, &tgt1);
        let (q2, q3) = self.tist_tangent_circles(&tgt1, c2)?;

        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let ci = HcCcCircle::from_start(&q2, !c1.left, c1.forward, true, &self.space.hc_param);
        let (cend, length4) = self.end_regular_piece(c2, &q3);
        let length =
            length1 + ci.hc_turn_length(&q1) + configuration_distance(&q2, &q3) + length4;
        Some((length, HcCcWord::TcTST { cstart, cend, q1, q2, q3, q4: c2.start, ci }))
    }

    fn tctest_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_x = 2.0 * c2.kappa_inv.abs();
        let delta_y = 0.0;

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, c2.left, !c2.forward, c2.regular, &self.space.hc_param);

        let q1 = self.tct_tangent_circles(c1, &tgt1);
        let (q2, q3) = self.test_tangent_circles(&tgt1, c2);

        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let ci = HcCcCircle::from_start(&q2, !c1.left, c1.forward, true, &self.space.hc_param);
        let (cend, length4) = self.end_regular_piece(c2, &q3);
        let length =
            length1 + ci.hc_turn_length(&q1) + configuration_distance(&q2, &q3) + length4;
        Some((length, HcCcWord::TcTST { cstart, cend, q1, q2, q3, q4: c2.start, ci }))
    }

    // ----- TcTSTcT ---------------------------------------------------

    fn tctistct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        let two_r = 2.0 * self.radius();
        let kappa_inv = c1.kappa_inv.abs();
        self.distance
            >= (two_r * two_r
                + 16.0 * self.radius() * self.sin_mu() * kappa_inv
                + 16.0 * kappa_inv * kappa_inv)
                .sqrt()
    }

    fn tctestct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance >= 4.0 * c1.kappa_inv.abs() + 2.0 * self.radius() * self.sin_mu()
    }

    fn tctstct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tctistct_exists(c1, c2) {
            return self.tctistct_path(c1, c2);
        }
        if self.tctestct_exists(c1, c2) {
            return self.tctestct_path(c1, c2);
        }
        None
    }

    fn tctistct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_y =
            (4.0 * self.radius() * self.cos_mu()) / (self.distance * c1.kappa.abs());
        let r = 2.0 * c1.kappa_inv;
        let delta_x = (r * r - delta_y * delta_y).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c2.left, c2.forward, c2.regular, &self.space.hc_param);

        let q1 = self.tct_tangent_circles(c1, &tgt1);
        let (q2, q3) = self.tist_tangent_circles(&tgt1, &tgt2)?;
        let q4 = self.tct_tangent_circles(&tgt2, c2);

        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let ci1 = HcCcCircle::from_start(&q2, !c1.left, c1.forward, true, &self.space.hc_param);
        let ci2 = HcCcCircle::from_start(&q3, !c2.left, c2.forward, true, &self.space.hc_param);
        let (cend, length5) = self.end_cusp_piece(c2, &q4);
        let length = length1
            + ci1.hc_turn_length(&q1)
            + configuration_distance(&q2, &q3)
            + ci2.hc_turn_length(&q4)
            + length5;
        Some((length, HcCcWord::TcTSTcT { cstart, cend, q1, q2, q3, q4, ci1, ci2 }))
    }

    fn tctestct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_x = 2.0 * c1.kappa_inv.abs();
        let delta_y = 0.0;

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c2.left, c2.forward, c2.regular, &self.space.hc_param);

        let q1 = self.tct_tangent_circles(c1, &tgt1);
        let (q2, q3) = self.test_tangent_circles(&tgt1, &tgt2);
        let q4 = self.tct_tangent_circles(&tgt2, c2);

        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let ci1 = HcCcCircle::from_start(&q2, !c1.left, c1.forward, true, &self.space.hc_param);
        let ci2 = HcCcCircle::from_start(&q3, !c2.left, c2.forward, true, &self.space.hc_param);
        let (cend, length5) = self.end_cusp_piece(c2, &q4);
        let length = length1
            + ci1.hc_turn_length(&q1)
            + configuration_distance(&q2, &q3)
            + ci2.hc_turn_length(&q4)
            + length5;
        Some((length, HcCcWord::TcTSTcT { cstart, cend, q1, q2, q3, q4, ci1, ci2 }))
    }

    // ----- TTcTT -----------------------------------------------------

    fn ttctt_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        self.distance <= 4.0 * self.radius() + 2.0 * c1.kappa_inv.abs()
    }

    fn ttctt(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.ttctt_exists(c1, c2) {
            return None;
        }
        let theta = self.angle;
        let r1 = 2.0 * c1.kappa_inv.abs();
        let r2 = 2.0 * self.radius();
        let delta_x = if self.distance < 4.0 * self.radius() - 2.0 * c1.kappa_inv.abs() {
            (self.distance + r1) / 2.0
        } else {
            (self.distance - r1) / 2.0
        };
        let delta_y = (r2 * r2 - delta_x * delta_x).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c2.left, !c2.forward, c2.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt3 =
            HcCcCircle::from_center(x, y, !c1.left, c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
        let tgt4 =
            HcCcCircle::from_center(x, y, !c2.left, !c2.forward, c2.regular, &self.space.hc_param);

        let qa = self.tt_tangent_circles(c1, &tgt1);
        let qb = self.tct_tangent_circles(&tgt1, &tgt2);
        let qc = self.tt_tangent_circles(&tgt2, c2);
        let qd = self.tt_tangent_circles(c1, &tgt3);
        let qe = self.tct_tangent_circles(&tgt3, &tgt4);
        let qf = self.tt_tangent_circles(&tgt4, c2);

        let middle1 = HcCcCircle::from_start(&qa, !c1.left, c1.forward, true, &self.space.hc_param);
        let middle2 = HcCcCircle::from_start(&qc, !c2.left, c2.forward, true, &self.space.hc_param);
        let middle3 = HcCcCircle::from_start(&qd, !c1.left, c1.forward, true, &self.space.hc_param);
        let middle4 = HcCcCircle::from_start(&qf, !c2.left, c2.forward, true, &self.space.hc_param);

        let (cstart1, start1) = self.start_regular_piece(c1, &qa);
        let (cend1, end1) = self.end_regular_piece(c2, &qc);
        let length1 =
            start1 + middle1.hc_turn_length(&qb) + middle2.hc_turn_length(&qb) + end1;

        let (cstart2, start2) = self.start_regular_piece(c1, &qd);
        let (cend2, end2) = self.end_regular_piece(c2, &qf);
        let length2 =
            start2 + middle3.hc_turn_length(&qe) + middle4.hc_turn_length(&qe) + end2;

        if length1 < length2 {
            Some((
                length1,
                HcCcWord::TTcTT {
                    cstart: cstart1,
                    cend: cend1,
                    q1: c1.start,
                    q2: qb,
                    q3: c2.start,
                    qt1: qa,
                    qt2: qc,
                    ci1: middle1,
                    ci2: middle2,
                },
            ))
        } else {
            Some((
                length2,
                HcCcWord::TTcTT {
                    cstart: cstart2,
                    cend: cend2,
                    q1: c1.start,
                    q2: qe,
                    q3: c2.start,
                    qt1: qd,
                    qt2: qf,
                    ci1: middle3,
                    ci2: middle4,
                },
            ))
        }
    }

    // ----- TcTTcT ----------------------------------------------------

    fn tcttct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        let four_kappa_inv = 4.0 * c1.kappa_inv.abs();
        let two_r = 2.0 * self.radius();
        self.distance <= four_kappa_inv + two_r && self.distance >= four_kappa_inv - two_r
    }

    fn tcttct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.tcttct_exists(c1, c2) {
            return None;
        }
        let theta = self.angle;
        let r1 = 2.0 * c1.kappa_inv.abs();
        let r2 = self.radius();
        let half_distance = 0.5 * self.distance;
        let delta_x = (r1 * r1 + half_distance * half_distance - r2 * r2) / self.distance;
        let delta_y = (r1 * r1 - delta_x * delta_x).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, -delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c2.left, c2.forward, c2.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt3 =
            HcCcCircle::from_center(x, y, !c1.left, !c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c2.xc, c2.yc, theta, -delta_x, delta_y);
        let tgt4 =
            HcCcCircle::from_center(x, y, !c2.left, c2.forward, c2.regular, &self.space.hc_param);

        let qa = self.tct_tangent_circles(c1, &tgt1);
        let qb = self.tt_tangent_circles(&tgt1, &tgt2);
        let qc = self.tct_tangent_circles(&tgt2, c2);
        let qd = self.tct_tangent_circles(c1, &tgt3);
        let qe = self.tt_tangent_circles(&tgt3, &tgt4);
        let qf = self.tct_tangent_circles(&tgt4, c2);

        let middle1 = HcCcCircle::from_start(&qb, !c1.left, c1.forward, true, &self.space.hc_param);
        let middle2 = HcCcCircle::from_start(&qb, c1.left, !c1.forward, true, &self.space.hc_param);
        let middle3 = HcCcCircle::from_start(&qe, !c1.left, c1.forward, true, &self.space.hc_param);
        let middle4 = HcCcCircle::from_start(&qe, c1.left, !c1.forward, true, &self.space.hc_param);

        let (cstart1, start1) = self.start_cusp_piece(c1, &qa);
        let (cend1, end1) = self.end_cusp_piece(c2, &qc);
        let length1 =
            start1 + middle1.hc_turn_length(&qa) + middle2.hc_turn_length(&qc) + end1;

        let (cstart2, start2) = self.start_cusp_piece(c1, &qd);
        let (cend2, end2) = self.end_cusp_piece(c2, &qf);
        let length2 =
            start2 + middle3.hc_turn_length(&qd) + middle4.hc_turn_length(&qf) + end2;

        if length1 < length2 {
            Some((
                length1,
                HcCcWord::TcTTcT {
                    cstart: cstart1,
                    cend: cend1,
                    q1: qa,
                    q2: qc,
                    ci1: middle1,
                    ci2: middle2,
                },
            ))
        } else {
            Some((
                length2,
                HcCcWord::TcTTcT {
                    cstart: cstart2,
                    cend: cend2,
                    q1: qd,
                    q2: qf,
                    ci1: middle3,
                    ci2: middle4,
                },
            ))
        }
    }

    // ----- TTT -------------------------------------------------------

    fn ttt_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance <= 4.0 * self.radius()
    }

    fn ttt(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if !self.ttt_exists(c1, c2) {
            return None;
        }
        let theta = self.angle;
        let r = 2.0 * self.radius();
        let delta_x = 0.5 * self.distance;
        let delta_y = (r * r - delta_x * delta_x).max(0.0).sqrt();

        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, delta_y);
        let tgt1 =
            HcCcCircle::from_center(x, y, !c1.left, c1.forward, c1.regular, &self.space.hc_param);
        let (x, y) = global_frame_change(c1.xc, c1.yc, theta, delta_x, -delta_y);
        let tgt2 =
            HcCcCircle::from_center(x, y, !c1.left, c1.forward, c1.regular, &self.space.hc_param);

        let qa = self.tt_tangent_circles(c1, &tgt1);
        let qb = self.tt_tangent_circles(&tgt1, c2);
        let qc = self.tt_tangent_circles(c1, &tgt2);
        let qd = self.tt_tangent_circles(&tgt2, c2);

        let middle1 =
            HcCcCircle::from_start(&qa, !c1.left, c1.forward, self.regular, &self.space.hc_param);
        let middle2 =
            HcCcCircle::from_start(&qc, !c1.left, c1.forward, self.regular, &self.space.hc_param);

        let (cstart1, start1) = self.start_regular_piece(c1, &qa);
        let (cend1, end1) = self.end_regular_piece(c2, &qb);
        let length1 = start1 + middle1.cc_turn_length(&qb) + end1;

        let (cstart2, start2) = self.start_regular_piece(c1, &qc);
        let (cend2, end2) = self.end_regular_piece(c2, &qd);
        let length2 = start2 + middle2.cc_turn_length(&qd) + end2;

        if length1 < length2 {
            Some((
                length1,
                HcCcWord::TTT {
                    cstart: cstart1,
                    cend: cend1,
                    q1: c1.start,
                    q2: qb,
                    q3: c2.start,
                    qt1: qa,
                    ci: middle1,
                },
            ))
        } else {
            Some((
                length2,
                HcCcWord::TTT {
                    cstart: cstart2,
                    cend: cend2,
                    q1: c1.start,
                    q2: qd,
                    q3: c2.start,
                    qt1: qc,
                    ci: middle2,
                },
            ))
        }
    }

    // ----- TcST ------------------------------------------------------

    fn tcist_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        let a = self.radius() * self.sin_mu();
        let b = self.radius() * self.cos_mu() + c1.kappa_inv.abs();
        self.distance >= (a * a + b * b).sqrt()
    }

    fn tcest_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward != c2.forward {
            return false;
        }
        let a = self.radius() * self.sin_mu();
        let b = self.radius() * self.cos_mu() - c1.kappa_inv.abs();
        self.distance >= (a * a + b * b).sqrt()
    }

    fn tcst(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tcist_exists(c1, c2) {
            return self.tcist_path(c1, c2);
        }
        if self.tcest_exists(c1, c2) {
            return self.tcest_path(c1, c2);
        }
        None
    }

    fn tcist_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let angle = self.angle;
        let alpha = safe_asin(
            (self.radius() * self.cos_mu() + c1.kappa_inv.abs()) / self.distance,
        )?;
        let delta_x1 = 0.0;
        let delta_y1 = c1.kappa_inv.abs();
        let delta_x2 = self.radius() * self.sin_mu();
        let delta_y2 = self.radius() * self.cos_mu();
        let (q1, q2) = match (c1.left, c1.forward) {
            (true, true) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
            (true, false) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
            (false, true) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
            (false, false) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
        };
        Some(self.tcst_from_tangents(c1, c2, q1, q2))
    }

    fn tcest_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let angle = self.angle;
        let alpha = safe_asin(
            (self.radius() * self.cos_mu() - c1.kappa_inv.abs()) / self.distance,
        )?;
        let delta_x1 = 0.0;
        let delta_y1 = c1.kappa_inv.abs();
        let delta_x2 = self.radius() * self.sin_mu();
        let delta_y2 = self.radius() * self.cos_mu();
        let (q1, q2) = match (c1.left, c1.forward) {
            (true, true) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
            (true, false) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
            (false, true) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, 0.0),
                )
            }
            (false, false) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, -delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, 0.0),
                )
            }
        };
        Some(self.tcst_from_tangents(c1, c2, q1, q2))
    }

    fn tcst_from_tangents(
        &self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
        q1: Configuration,
        q2: Configuration,
    ) -> (f64, HcCcWord) {
        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let (cend, length3) = self.end_regular_piece(c2, &q2);
        let length = length1 + configuration_distance(&q1, &q2) + length3;
        (length, HcCcWord::TcST { cstart, cend, q1, q2, q3: c2.start })
    }

    // ----- TScT ------------------------------------------------------

    fn tisct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        self.tcist_exists(c1, c2)
    }

    fn tesct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        self.tcest_exists(c1, c2)
    }

    fn tsct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tisct_exists(c1, c2) {
            return self.tisct_path(c1, c2);
        }
        if self.tesct_exists(c1, c2) {
            return self.tesct_path(c1, c2);
        }
        None
    }

    fn tisct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let angle = self.angle;
        let alpha = safe_asin(
            (self.radius() * self.cos_mu() + c1.kappa_inv.abs()) / self.distance,
        )?;
        let delta_x1 = self.radius() * self.sin_mu();
        let delta_y1 = self.radius() * self.cos_mu();
        let delta_x2 = 0.0;
        let delta_y2 = c1.kappa_inv.abs();
        let (q2, q3) = match (c1.left, c1.forward) {
            (true, true) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
            (true, false) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
            (false, true) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
            (false, false) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
        };
        Some(self.tsct_from_tangents(c1, c2, q2, q3))
    }

    fn tesct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let angle = self.angle;
        let alpha = safe_asin(
            (self.radius() * self.cos_mu() - c1.kappa_inv.abs()) / self.distance,
        )?;
        let delta_x1 = self.radius() * self.sin_mu();
        let delta_y1 = self.radius() * self.cos_mu();
        let delta_x2 = 0.0;
        let delta_y2 = c1.kappa_inv.abs();
        let (q2, q3) = match (c1.left, c1.forward) {
            (true, true) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
            (true, false) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
            (false, true) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, delta_y2);
                (
                    Configuration::new(x1, y1, theta, 0.0),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
            (false, false) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, delta_x1, -delta_y1);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x2, -delta_y2);
                (
                    Configuration::new(x1, y1, theta + PI, 0.0),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
        };
        Some(self.tsct_from_tangents(c1, c2, q2, q3))
    }

    fn tsct_from_tangents(
        &self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
        q2: Configuration,
        q3: Configuration,
    ) -> (f64, HcCcWord) {
        let (cstart, length1) = self.start_regular_piece(c1, &q2);
        let (cend, length3) = self.end_cusp_piece(c2, &q3);
        let length = length1 + configuration_distance(&q2, &q3) + length3;
        (length, HcCcWord::TScT { cstart, cend, q1: c1.start, q2, q3 })
    }

    // ----- TcScT -----------------------------------------------------

    fn tcisct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left == c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance > 2.0 * c1.kappa_inv.abs()
    }

    fn tcesct_exists(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> bool {
        if c1.left != c2.left {
            return false;
        }
        if c1.forward == c2.forward {
            return false;
        }
        self.distance >= self.eps()
    }

    fn tcsct(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        if self.tcisct_exists(c1, c2) {
            return self.tcisct_path(c1, c2);
        }
        if self.tcesct_exists(c1, c2) {
            return self.tcesct_path(c1, c2);
        }
        None
    }

    fn tcisct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let angle = self.angle;
        let alpha = safe_asin(2.0 / (c1.kappa.abs() * self.distance))?;
        let delta_x = 0.0;
        let delta_y = c1.kappa_inv.abs();
        let (q1, q2) = match (c1.left, c1.forward) {
            (true, true) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
            (true, false) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
            (false, true) => {
                let theta = angle + alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
            (false, false) => {
                let theta = angle - alpha;
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
        };
        Some(self.tcsct_from_tangents(c1, c2, q1, q2))
    }

    fn tcesct_path(&self, c1: &HcCcCircle, c2: &HcCcCircle) -> Option<(f64, HcCcWord)> {
        let theta = self.angle;
        let delta_x = 0.0;
        let delta_y = c1.kappa_inv.abs();
        let (q1, q2) = match (c1.left, c1.forward) {
            (true, true) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
            (true, false) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
            (false, true) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, -delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, -delta_y);
                (
                    Configuration::new(x1, y1, theta + PI, c1.kappa),
                    Configuration::new(x2, y2, theta + PI, c2.kappa),
                )
            }
            (false, false) => {
                let (x1, y1) = global_frame_change(c1.xc, c1.yc, theta, -delta_x, delta_y);
                let (x2, y2) = global_frame_change(c2.xc, c2.yc, theta, delta_x, delta_y);
                (
                    Configuration::new(x1, y1, theta, c1.kappa),
                    Configuration::new(x2, y2, theta, c2.kappa),
                )
            }
        };
        Some(self.tcsct_from_tangents(c1, c2, q1, q2))
    }

    fn tcsct_from_tangents(
        &self,
        c1: &HcCcCircle,
        c2: &HcCcCircle,
        q1: Configuration,
        q2: Configuration,
    ) -> (f64, HcCcWord) {
        let (cstart, length1) = self.start_cusp_piece(c1, &q1);
        let (cend, length2) = self.end_cusp_piece(c2, &q2);
        let length = length1 + configuration_distance(&q1, &q2) + length2;
        (length, HcCcWord::TcScT { cstart, cend, q1, q2 })
    }
}
