//! Composite paths of the clothoid families and their lowering into
//! control primitives.
//!
//! Each word variant carries exactly the intermediate configurations and
//! circles it populates, so the lowering switch never sees an unset
//! field; losing candidates are dropped by value.

use crate::common::types::Control;
use crate::steering::circle::HcCcCircle;
use crate::steering::configuration::Configuration;
use crate::utils::geometry::{get_epsilon, sgn};

/// Curvature class of a path endpoint: the path either meets its
/// endpoint at full curvature (Reeds-Shepp style circle) or at zero
/// curvature (through an end clothoid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    FullKappa,
    ZeroKappa,
}

/// Composite word of the clothoid families. `c` marks a direction
/// switch, `S` a straight, `T` a turn.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum HcCcWord {
    E,
    S,
    T {
        cstart: HcCcCircle,
    },
    TT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
    },
    TcT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
    },
    TcTcT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        ci: HcCcCircle,
    },
    TcTT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        qt: Configuration,
        ci: HcCcCircle,
    },
    TTcT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        qt: Configuration,
        ci: HcCcCircle,
    },
    TST {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
        q4: Configuration,
    },
    TSTcT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
        q4: Configuration,
        ci: HcCcCircle,
    },
    TcTST {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
        q4: Configuration,
        ci: HcCcCircle,
    },
    TcTSTcT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
        q4: Configuration,
        ci1: HcCcCircle,
        ci2: HcCcCircle,
    },
    TTcTT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
        qt1: Configuration,
        qt2: Configuration,
        ci1: HcCcCircle,
        ci2: HcCcCircle,
    },
    TcTTcT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        ci1: HcCcCircle,
        ci2: HcCcCircle,
    },
    TTT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
        qt1: Configuration,
        ci: HcCcCircle,
    },
    TcST {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
    },
    TScT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
        q3: Configuration,
    },
    TcScT {
        cstart: HcCcCircle,
        cend: HcCcCircle,
        q1: Configuration,
        q2: Configuration,
    },
}

/// Selected composite path: endpoints, family parameters, total length
/// and the winning word with its intermediates.
#[derive(Debug, Clone)]
pub struct HcCcPath {
    pub start: Configuration,
    pub end: Configuration,
    pub kappa: f64,
    pub sigma: f64,
    pub length: f64,
    pub word: HcCcWord,
}

impl HcCcPath {
    pub fn new(
        start: Configuration,
        end: Configuration,
        kappa: f64,
        sigma: f64,
        length: f64,
        word: HcCcWord,
    ) -> Self {
        Self { start, end, kappa, sigma, length, word }
    }

    /// Lower the word into an ordered control sequence. The endpoint
    /// kinds select between arc-first, clothoid-first and
    /// clothoid-bracketed turns at the two path ends.
    pub fn controls(&self, start_kind: EndpointKind, end_kind: EndpointKind) -> Vec<Control> {
        let mut controls = Vec::with_capacity(8);
        let v = &mut controls;
        match &self.word {
            HcCcWord::E => empty_controls(v),
            HcCcWord::S => straight_controls(&self.start, &self.end, v),
            HcCcWord::T { cstart } => match (start_kind, end_kind) {
                (EndpointKind::FullKappa, EndpointKind::FullKappa) => {
                    rs_turn_controls(cstart, &self.end, true, v)
                }
                (EndpointKind::ZeroKappa, EndpointKind::ZeroKappa) => {
                    cc_turn_controls(cstart, &self.end, true, v)
                }
                (EndpointKind::ZeroKappa, EndpointKind::FullKappa) => {
                    hc_turn_controls(cstart, &self.end, true, v)
                }
                (EndpointKind::FullKappa, EndpointKind::ZeroKappa) => {
                    // the turn circle is anchored at the zero-curvature goal
                    hc_turn_controls(cstart, &self.start, false, v)
                }
            },
            HcCcWord::TT { cstart, cend, q1, q2, q3 } => {
                start_regular(cstart, q1, q2, start_kind, v);
                end_regular(cend, q3, q2, end_kind, v);
            }
            HcCcWord::TcT { cstart, cend, q1 } => {
                if q1.kappa.abs() < get_epsilon() {
                    // the direction switch happens at zero curvature
                    cc_turn_controls(cstart, q1, true, v);
                    cc_turn_controls(cend, q1, false, v);
                } else {
                    start_cusp(cstart, q1, start_kind, v);
                    end_cusp(cend, q1, end_kind, v);
                }
            }
            HcCcWord::TcTcT { cstart, cend, q1, q2, ci } => {
                start_cusp(cstart, q1, start_kind, v);
                rs_turn_controls(ci, q2, true, v);
                end_cusp(cend, q2, end_kind, v);
            }
            HcCcWord::TcTT { cstart, cend, q1, q2, qt, ci } => {
                start_cusp(cstart, q1, start_kind, v);
                hc_turn_controls(ci, q1, false, v);
                end_regular(cend, q2, qt, end_kind, v);
            }
            HcCcWord::TTcT { cstart, cend, q1, q2, qt, ci } => {
                start_regular(cstart, q1, qt, start_kind, v);
                hc_turn_controls(ci, q2, true, v);
                end_cusp(cend, q2, end_kind, v);
            }
            HcCcWord::TST { cstart, cend, q1, q2, q3, q4 } => {
                start_regular(cstart, q1, q2, start_kind, v);
                straight_controls(q2, q3, v);
                end_regular(cend, q4, q3, end_kind, v);
            }
            HcCcWord::TSTcT { cstart, cend, q1, q2, q3, q4, ci } => {
                start_regular(cstart, q1, q2, start_kind, v);
                straight_controls(q2, q3, v);
                hc_turn_controls(ci, q4, true, v);
                end_cusp(cend, q4, end_kind, v);
            }
            HcCcWord::TcTST { cstart, cend, q1, q2, q3, q4, ci } => {
                start_cusp(cstart, q1, start_kind, v);
                hc_turn_controls(ci, q1, false, v);
                straight_controls(q2, q3, v);
                end_regular(cend, q4, q3, end_kind, v);
            }
            HcCcWord::TcTSTcT { cstart, cend, q1, q2, q3, q4, ci1, ci2 } => {
                start_cusp(cstart, q1, start_kind, v);
                hc_turn_controls(ci1, q1, false, v);
                straight_controls(q2, q3, v);
                hc_turn_controls(ci2, q4, true, v);
                end_cusp(cend, q4, end_kind, v);
            }
            HcCcWord::TTcTT { cstart, cend, q1, q2, q3, qt1, qt2, ci1, ci2 } => {
                start_regular(cstart, q1, qt1, start_kind, v);
                hc_turn_controls(ci1, q2, true, v);
                hc_turn_controls(ci2, q2, false, v);
                end_regular(cend, q3, qt2, end_kind, v);
            }
            HcCcWord::TcTTcT { cstart, cend, q1, q2, ci1, ci2 } => {
                start_cusp(cstart, q1, start_kind, v);
                hc_turn_controls(ci1, q1, false, v);
                hc_turn_controls(ci2, q2, true, v);
                end_cusp(cend, q2, end_kind, v);
            }
            HcCcWord::TTT { cstart, cend, q1, q2, q3, qt1, ci } => {
                start_regular(cstart, q1, qt1, start_kind, v);
                cc_turn_controls(ci, q2, true, v);
                end_regular(cend, q3, q2, end_kind, v);
            }
            HcCcWord::TcST { cstart, cend, q1, q2, q3 } => {
                start_cusp(cstart, q1, start_kind, v);
                straight_controls(q1, q2, v);
                end_regular(cend, q3, q2, end_kind, v);
            }
            HcCcWord::TScT { cstart, cend, q1, q2, q3 } => {
                start_regular(cstart, q1, q2, start_kind, v);
                straight_controls(q2, q3, v);
                end_cusp(cend, q3, end_kind, v);
            }
            HcCcWord::TcScT { cstart, cend, q1, q2 } => {
                start_cusp(cstart, q1, start_kind, v);
                straight_controls(q1, q2, v);
                end_cusp(cend, q2, end_kind, v);
            }
        }
        controls
    }
}

/// First turn of a word that leaves its endpoint without a direction
/// switch. `q_end` is the endpoint configuration, `q_tangent` the
/// zero-curvature junction the turn runs to.
fn start_regular(
    cstart: &HcCcCircle,
    q_end: &Configuration,
    q_tangent: &Configuration,
    kind: EndpointKind,
    controls: &mut Vec<Control>,
) {
    match kind {
        EndpointKind::FullKappa => hc_turn_controls(cstart, q_end, false, controls),
        EndpointKind::ZeroKappa => cc_turn_controls(cstart, q_tangent, true, controls),
    }
}

/// Last turn of a word that reaches its endpoint without a direction
/// switch.
fn end_regular(
    cend: &HcCcCircle,
    q_end: &Configuration,
    q_tangent: &Configuration,
    kind: EndpointKind,
    controls: &mut Vec<Control>,
) {
    match kind {
        EndpointKind::FullKappa => hc_turn_controls(cend, q_end, true, controls),
        EndpointKind::ZeroKappa => cc_turn_controls(cend, q_tangent, false, controls),
    }
}

/// First turn of a word whose far side is a direction switch at full
/// curvature.
fn start_cusp(cstart: &HcCcCircle, q_cusp: &Configuration, kind: EndpointKind, controls: &mut Vec<Control>) {
    match kind {
        EndpointKind::FullKappa => rs_turn_controls(cstart, q_cusp, true, controls),
        EndpointKind::ZeroKappa => hc_turn_controls(cstart, q_cusp, true, controls),
    }
}

/// Last turn of a word whose near side is a direction switch at full
/// curvature.
fn end_cusp(cend: &HcCcCircle, q_cusp: &Configuration, kind: EndpointKind, controls: &mut Vec<Control>) {
    match kind {
        EndpointKind::FullKappa => rs_turn_controls(cend, q_cusp, false, controls),
        EndpointKind::ZeroKappa => hc_turn_controls(cend, q_cusp, false, controls),
    }
}

pub fn empty_controls(controls: &mut Vec<Control>) {
    controls.push(Control::new(0.0, 0.0, 0.0));
}

pub fn straight_controls(q1: &Configuration, q2: &Configuration, controls: &mut Vec<Control>) {
    let length = ((q2.x - q1.x).powi(2) + (q2.y - q1.y).powi(2)).sqrt();
    let dot_product = q1.theta.cos() * (q2.x - q1.x) + q1.theta.sin() * (q2.y - q1.y);
    let d = sgn(dot_product);
    controls.push(Control::new(d * length, 0.0, 0.0));
}

fn direction(forward: bool, order: bool) -> f64 {
    if forward == order {
        1.0
    } else {
        -1.0
    }
}

/// Pure arc turn. The circular deflection keeps its sign: an irregular
/// turn may briefly run against the nominal direction.
pub fn rs_turn_controls(c: &HcCcCircle, q: &Configuration, order: bool, controls: &mut Vec<Control>) {
    debug_assert!((c.kappa.abs() - q.kappa.abs()).abs() < get_epsilon());
    debug_assert!(!c.sigma.is_finite());
    let delta = c.deflection(q);
    let length_arc = c.kappa_inv.abs() * c.rs_circular_deflection(delta);
    let d = direction(c.forward, order);
    controls.push(Control::new(d * length_arc, c.kappa, 0.0));
}

/// Clothoid plus arc; `order` places the clothoid before (true) or after
/// (false) the arc, keeping curvature continuous at the zero-curvature
/// end of the turn.
pub fn hc_turn_controls(c: &HcCcCircle, q: &Configuration, order: bool, controls: &mut Vec<Control>) {
    debug_assert!((c.kappa.abs() - q.kappa.abs()).abs() < get_epsilon());
    let delta = c.deflection(q);
    let length_min = (c.kappa / c.sigma).abs();
    let length_arc = c.kappa_inv.abs() * c.hc_circular_deflection(delta);
    let d = direction(c.forward, order);

    if order {
        controls.push(Control::new(d * length_min, 0.0, c.sigma));
    }
    controls.push(Control::new(d * length_arc, c.kappa, 0.0));
    if !order {
        controls.push(Control::new(d * length_min, c.kappa, -c.sigma));
    }
}

fn cc_elementary_controls(
    c: &HcCcCircle,
    q: &Configuration,
    delta: f64,
    order: bool,
    controls: &mut Vec<Control>,
) -> bool {
    if let Some(sigma0) = c.cc_elementary_sharpness(q, delta) {
        let length = (delta / sigma0.abs()).sqrt();
        let d = direction(c.forward, order);
        controls.push(Control::new(d * length, 0.0, sigma0));
        controls.push(Control::new(d * length, sigma0 * length, -sigma0));
        true
    } else {
        false
    }
}

fn cc_default_controls(
    c: &HcCcCircle,
    q: &Configuration,
    delta: f64,
    order: bool,
    controls: &mut Vec<Control>,
) {
    let length_min = (c.kappa / c.sigma).abs();
    let length_arc = c.kappa_inv.abs() * c.cc_circular_deflection(delta);
    let d = direction(c.forward, order);

    controls.push(Control::new(d * length_min, 0.0, c.sigma));
    controls.push(Control::new(d * length_arc, c.kappa, 0.0));
    controls.push(Control::new(d * length_min, c.kappa, -c.sigma));
}

/// Clothoid-bracketed turn ending at zero curvature. Small deflections
/// compare the symmetric two-clothoid solution against the default
/// three-part turn and keep the shorter.
pub fn cc_turn_controls(c: &HcCcCircle, q: &Configuration, order: bool, controls: &mut Vec<Control>) {
    debug_assert!(q.kappa.abs() < get_epsilon());
    let delta = c.deflection(q);
    if delta < get_epsilon() {
        if order {
            straight_controls(&c.start, q, controls);
        } else {
            straight_controls(q, &c.start, controls);
        }
        return;
    }
    if delta < 2.0 * c.delta_min {
        let mut elementary = Vec::new();
        if cc_elementary_controls(c, q, delta, order, &mut elementary) {
            let mut default = Vec::new();
            cc_default_controls(c, q, delta, order, &mut default);
            let sum = |cs: &[Control]| cs.iter().map(|ctrl| ctrl.delta_s.abs()).sum::<f64>();
            if sum(&elementary) < sum(&default) {
                controls.extend(elementary);
            } else {
                controls.extend(default);
            }
            return;
        }
    }
    cc_default_controls(c, q, delta, order, controls);
}

/// Transform a control into its reverse traversal.
pub fn reverse_control(control: &mut Control) {
    control.delta_s = -control.delta_s;
    control.kappa += control.delta_s.abs() * control.sigma;
    control.sigma = -control.sigma;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steering::circle::CircleParam;
    use crate::utils::geometry::HALF_PI;

    #[test]
    fn test_straight_controls_direction() {
        let q1 = Configuration::new(0.0, 0.0, 0.0, 0.0);
        let ahead = Configuration::new(2.0, 0.0, 0.0, 0.0);
        let behind = Configuration::new(-2.0, 0.0, 0.0, 0.0);
        let mut controls = Vec::new();
        straight_controls(&q1, &ahead, &mut controls);
        straight_controls(&q1, &behind, &mut controls);
        assert!((controls[0].delta_s - 2.0).abs() < 1e-12);
        assert!((controls[1].delta_s + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rs_turn_controls_quarter() {
        let param = CircleParam::rs(1.0);
        let start = Configuration::new(0.0, 0.0, 0.0, 1.0);
        let c = HcCcCircle::from_start(&start, true, true, true, &param);
        let q = Configuration::new(1.0, 1.0, HALF_PI, 1.0);
        let mut controls = Vec::new();
        rs_turn_controls(&c, &q, true, &mut controls);
        assert_eq!(controls.len(), 1);
        assert!((controls[0].delta_s - HALF_PI).abs() < 1e-12);
        assert!((controls[0].kappa - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hc_turn_controls_order() {
        let param = CircleParam::new(1.0, 1.0);
        let start = Configuration::new(0.0, 0.0, 0.0, 0.0);
        let c = HcCcCircle::from_start(&start, true, true, false, &param);
        let q = Configuration::new(c.xc, c.yc - 1.0, 2.0, 1.0);
        let mut with_clothoid_first = Vec::new();
        hc_turn_controls(&c, &q, true, &mut with_clothoid_first);
        assert_eq!(with_clothoid_first.len(), 2);
        // clothoid ramps from zero curvature up to the arc curvature
        assert!((with_clothoid_first[0].kappa).abs() < 1e-12);
        assert!((with_clothoid_first[0].sigma - 1.0).abs() < 1e-12);
        assert!((with_clothoid_first[1].kappa - 1.0).abs() < 1e-12);

        let mut with_clothoid_last = Vec::new();
        hc_turn_controls(&c, &q, false, &mut with_clothoid_last);
        assert_eq!(with_clothoid_last.len(), 2);
        assert!((with_clothoid_last[1].sigma + 1.0).abs() < 1e-12);
        // curvature is continuous at the arc-clothoid boundary
        assert!((with_clothoid_last[1].kappa - with_clothoid_last[0].kappa).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_control_roundtrip() {
        let mut control = Control::new(1.5, 0.0, 0.4);
        reverse_control(&mut control);
        assert!((control.delta_s + 1.5).abs() < 1e-12);
        assert!((control.kappa - 0.6).abs() < 1e-12);
        assert!((control.sigma + 0.4).abs() < 1e-12);
        reverse_control(&mut control);
        assert!((control.delta_s - 1.5).abs() < 1e-12);
        assert!(control.kappa.abs() < 1e-12);
        assert!((control.sigma - 0.4).abs() < 1e-12);
    }
}
