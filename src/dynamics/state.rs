//! The compound integration state (spec §3 "State Y", component C7).
//!
//! Grounded on `models/state.rs` in the teacher repo, which already treats the quaternion
//! as four independent reals under `Add`/`Mul<f64>` (spec §3's "Y supports vector-space
//! operations... the quaternion is treated as a 4-vector"); this generalizes that pattern
//! to the full compound state the spec requires, including the variable-length rod
//! magnetization tail, and adds the component-wise abs/inf-norm/resize operations the
//! adaptive stepper (component C9) needs but the teacher's fixed RK4 step never did.

use nalgebra as na;

use crate::numerics::quaternion::Quaternion;

/// `{r, v, q, omega, m_irr[N]}` (spec §3). Vector-space operations here are purely
/// algebraic — the quaternion's unit-norm constraint and each `m_irr` component's
/// saturation clamp are physical invariants restored at checkpoints, not enforced here
/// (spec §4.6 "No other invariants apply during intermediate stepper evaluations").
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub r: na::Vector3<f64>,
    pub v: na::Vector3<f64>,
    pub q: Quaternion,
    pub omega: na::Vector3<f64>,
    pub m_irr: Vec<f64>,
}

impl State {
    pub fn new(
        r: na::Vector3<f64>,
        v: na::Vector3<f64>,
        q: Quaternion,
        omega: na::Vector3<f64>,
        m_irr: Vec<f64>,
    ) -> Self {
        Self { r, v, q, omega, m_irr }
    }

    /// A same-shaped state with every component zero, used to build derivatives and as
    /// the stepper's accumulator. `rod_count` fixes `m_irr`'s length, per spec §4.9
    /// "State size is fixed for a given run".
    pub fn zeros(rod_count: usize) -> Self {
        Self {
            r: na::Vector3::zeros(),
            v: na::Vector3::zeros(),
            q: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            omega: na::Vector3::zeros(),
            m_irr: vec![0.0; rod_count],
        }
    }

    pub fn rod_count(&self) -> usize {
        self.m_irr.len()
    }

    /// Restores the geometric unit-norm constraint on `q`. Called only at checkpoint
    /// boundaries by the driver (spec §4.9, §9 "Quaternion drift") — never inside a
    /// derivative evaluation.
    pub fn renormalize_quaternion(&mut self) {
        self.q = self.q.normalize();
    }

    /// Clamps every `m_irr` component to `[-m_s, m_s]`, restoring the saturation
    /// invariant at checkpoint boundaries (spec §3, §8).
    pub fn clamp_magnetizations(&mut self, m_s: f64) {
        for m in &mut self.m_irr {
            *m = m.clamp(-m_s, m_s);
        }
    }

    /// Component-wise absolute value (spec §4.6), used by the stepper's error norm.
    pub fn abs(&self) -> Self {
        Self {
            r: self.r.abs(),
            v: self.v.abs(),
            q: self.q.abs(),
            omega: self.omega.abs(),
            m_irr: self.m_irr.iter().map(|m| m.abs()).collect(),
        }
    }

    /// Infinity norm across every component (spec §4.6): `r`, `v`, the four quaternion
    /// coefficients, `omega`, and (if N > 0) `m_irr`.
    pub fn inf_norm(&self) -> f64 {
        let mut norm = self
            .r
            .abs()
            .max()
            .max(self.v.abs().max())
            .max(self.q.inf_norm())
            .max(self.omega.abs().max());
        if let Some(m) = self.m_irr.iter().cloned().map(f64::abs).fold(None, |acc, x| {
            Some(acc.map_or(x, |a: f64| a.max(x)))
        }) {
            norm = norm.max(m);
        }
        norm
    }

    /// Resize hook (spec §4.6): match `self`'s rod count to `reference`'s, truncating or
    /// zero-extending as needed. Used to rebuild a `State` against a possibly different
    /// rod-count spacecraft config on checkpoint restart (spec §3 ADD 4.6.1).
    pub fn match_rod_count(&mut self, reference: &State) {
        self.m_irr.resize(reference.m_irr.len(), 0.0);
    }
}

impl std::ops::Add for State {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let m_irr = self
            .m_irr
            .iter()
            .zip(other.m_irr.iter())
            .map(|(a, b)| a + b)
            .collect();
        Self {
            r: self.r + other.r,
            v: self.v + other.v,
            q: self.q + other.q,
            omega: self.omega + other.omega,
            m_irr,
        }
    }
}

impl std::ops::Sub for State {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        let m_irr = self
            .m_irr
            .iter()
            .zip(other.m_irr.iter())
            .map(|(a, b)| a - b)
            .collect();
        Self {
            r: self.r - other.r,
            v: self.v - other.v,
            q: self.q - other.q,
            omega: self.omega - other.omega,
            m_irr,
        }
    }
}

impl std::ops::Mul<f64> for State {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            r: self.r * scalar,
            v: self.v * scalar,
            q: self.q * scalar,
            omega: self.omega * scalar,
            m_irr: self.m_irr.iter().map(|m| m * scalar).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> State {
        State::new(
            na::Vector3::new(1.0, 2.0, 3.0),
            na::Vector3::new(0.1, 0.2, 0.3),
            Quaternion::new(1.0, 0.0, 0.0, 0.0),
            na::Vector3::new(0.01, 0.02, 0.03),
            vec![100.0, -200.0],
        )
    }

    #[test]
    fn add_is_componentwise() {
        let a = sample();
        let b = sample();
        let sum = a.clone() + b;
        assert_abs_diff_eq!(sum.r, sample().r * 2.0, epsilon = 1e-12);
        assert_eq!(sum.m_irr, vec![200.0, -400.0]);
    }

    #[test]
    fn scalar_multiply_scales_every_component() {
        let s = sample() * 2.0;
        assert_abs_diff_eq!(s.v, sample().v * 2.0, epsilon = 1e-12);
        assert_eq!(s.m_irr, vec![200.0, -400.0]);
    }

    #[test]
    fn inf_norm_is_the_max_magnitude_component() {
        let s = sample();
        assert_abs_diff_eq!(s.inf_norm(), 200.0, epsilon = 1e-12);
    }

    #[test]
    fn inf_norm_excludes_m_irr_when_n_is_zero() {
        let mut s = sample();
        s.m_irr.clear();
        assert_abs_diff_eq!(s.inf_norm(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn match_rod_count_truncates_and_extends() {
        let mut s = sample();
        let short_ref = State::zeros(1);
        s.match_rod_count(&short_ref);
        assert_eq!(s.m_irr.len(), 1);

        let long_ref = State::zeros(4);
        s.match_rod_count(&long_ref);
        assert_eq!(s.m_irr, vec![100.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn clamp_restores_saturation_invariant() {
        let mut s = sample();
        s.clamp_magnetizations(150.0);
        assert_eq!(s.m_irr, vec![100.0, -150.0]);
    }
}
