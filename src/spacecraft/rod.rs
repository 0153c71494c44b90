//! Soft-magnetic hysteresis damping rod — Jiles-Atherton model (spec §4.4, component C5).

use crate::constants::{
    HYSTERESIS_CAUSALITY_EPSILON, HYSTERESIS_DENOM_EPSILON, HYSTERESIS_DHDT_EPSILON,
    HYSTERESIS_K_FLOOR, LANGEVIN_TAYLOR_THRESHOLD, MU_0,
};
use crate::errors::SimError;
use nalgebra as na;

/// Shared Jiles-Atherton parameters for a rod material (HyMu-80 et al.), spec §3.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HysteresisParams {
    /// Saturation magnetization (A/m).
    pub m_s: f64,
    /// Domain-wall shape parameter (A/m).
    pub a: f64,
    /// Pinning/coercivity-like parameter (A/m).
    pub k: f64,
    /// Reversibility fraction, in [0, 1].
    pub c: f64,
    /// Inter-domain coupling coefficient, >= 0.
    pub alpha: f64,
}

impl HysteresisParams {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.m_s <= 0.0 {
            return Err(SimError::ConfigurationError(
                "hysteresis M_s must be positive".into(),
            ));
        }
        if self.a <= 0.0 {
            return Err(SimError::ConfigurationError(
                "hysteresis a must be positive".into(),
            ));
        }
        if self.k <= 0.0 {
            return Err(SimError::ConfigurationError(
                "hysteresis k must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.c) {
            return Err(SimError::ConfigurationError(
                "hysteresis c must lie in [0, 1]".into(),
            ));
        }
        if self.alpha < 0.0 {
            return Err(SimError::ConfigurationError(
                "hysteresis alpha must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// A single rod: common volume, body-frame orientation (normalized at construction), and
/// the shared material parameters. The irreversible magnetization `m_irr` is carried
/// externally in `dynamics::State` (spec §3: M_irr lives in the state vector, not here) —
/// this struct only holds the immutable geometry/material data plus derivative logic.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisRod {
    volume: f64,
    orientation: na::Vector3<f64>,
    params: HysteresisParams,
}

impl HysteresisRod {
    pub fn new(
        volume: f64,
        orientation: na::Vector3<f64>,
        params: HysteresisParams,
    ) -> Result<Self, SimError> {
        if volume <= 0.0 {
            return Err(SimError::ConfigurationError(
                "rod volume must be positive".into(),
            ));
        }
        let norm = orientation.magnitude();
        if norm < 1e-12 {
            return Err(SimError::ConfigurationError(
                "rod orientation vector must be non-zero".into(),
            ));
        }
        params.validate()?;

        Ok(Self {
            volume,
            orientation: orientation / norm,
            params,
        })
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn orientation(&self) -> na::Vector3<f64> {
        self.orientation
    }

    pub fn params(&self) -> &HysteresisParams {
        &self.params
    }

    /// Langevin anhysteretic magnetization and its derivative w.r.t. H_eff (spec §4.4
    /// step 5). Branches at |x| = 1e-6 to avoid cancellation error in coth(x) - 1/x near
    /// the origin; the two branches agree to 1e-10 there (spec §8 branch-matching test).
    fn langevin(&self, h_eff: f64) -> (f64, f64) {
        let m_s = self.params.m_s;
        let a = self.params.a;
        let x = h_eff / a;

        if x.abs() < LANGEVIN_TAYLOR_THRESHOLD {
            let m_an = m_s * (x / 3.0 - x.powi(3) / 45.0);
            let dm_an_dh = (m_s / a) * (1.0 / 3.0 - x * x / 15.0);
            (m_an, dm_an_dh)
        } else {
            let coth_x = x.cosh() / x.sinh();
            let m_an = m_s * (coth_x - 1.0 / x);
            let csch_x = 1.0 / x.sinh();
            let dm_an_dh = (m_s / a) * (1.0 / (x * x) - csch_x * csch_x);
            (m_an, dm_an_dh)
        }
    }

    /// dM_irr/dt given the body-frame field and its body-frame time-derivative (spec
    /// §4.4 steps 1-10). `m_irr_in` is the current irreversible magnetization, clamped to
    /// [-M_s, M_s] on input per the invariant (it may be transiently out of range between
    /// checkpoints).
    pub fn dm_irr_dt(
        &self,
        m_irr_in: f64,
        b_body: &na::Vector3<f64>,
        b_dot_body: &na::Vector3<f64>,
    ) -> f64 {
        let m_s = self.params.m_s;
        let alpha = self.params.alpha;
        let k = self.params.k;
        let c = self.params.c;

        let h = b_body.dot(&self.orientation) / MU_0;
        let dh_dt = b_dot_body.dot(&self.orientation) / MU_0;

        if dh_dt.abs() < HYSTERESIS_DHDT_EPSILON {
            return 0.0; // static-field suppression
        }

        let m_tilde = m_irr_in.clamp(-m_s, m_s);
        if (m_tilde >= m_s && dh_dt > 0.0) || (m_tilde <= -m_s && dh_dt < 0.0) {
            return 0.0; // saturated and still being driven further
        }

        let h_eff = h + alpha * m_tilde;
        let (m_an, dm_an_dh) = self.langevin(h_eff);

        let delta = dh_dt.signum();
        let numerator = m_an - m_tilde;
        let denom = k * delta - alpha * numerator;
        let chi_irr = if denom.abs() < HYSTERESIS_DENOM_EPSILON {
            numerator.signum() * m_s / k.max(HYSTERESIS_K_FLOOR)
        } else {
            numerator / denom
        };

        let chi = (1.0 - c) * chi_irr + c * dm_an_dh;
        let rate = chi * dh_dt;

        if (dh_dt > 0.0 && rate < -HYSTERESIS_CAUSALITY_EPSILON)
            || (dh_dt < 0.0 && rate > HYSTERESIS_CAUSALITY_EPSILON)
        {
            return 0.0; // causality clamp
        }

        rate
    }

    /// Total magnetization M_total = (1-c)*M_irr + c*M_an(H_eff) (spec §4.4, "Dipole
    /// moment of a rod"; this is the reference full form, per the Open Question in §9).
    pub fn total_magnetization(&self, m_irr: f64, b_body: &na::Vector3<f64>) -> f64 {
        let m_s = self.params.m_s;
        let m_tilde = m_irr.clamp(-m_s, m_s);
        let h = b_body.dot(&self.orientation) / MU_0;
        let h_eff = h + self.params.alpha * m_tilde;
        let (m_an, _) = self.langevin(h_eff);
        (1.0 - self.params.c) * m_tilde + self.params.c * m_an
    }

    /// Body-frame dipole moment contributed to torque: M_total * V * u_i (spec §4.4).
    pub fn dipole_moment(&self, m_irr: f64, b_body: &na::Vector3<f64>) -> na::Vector3<f64> {
        self.total_magnetization(m_irr, b_body) * self.volume * self.orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn hymu80() -> HysteresisParams {
        HysteresisParams {
            m_s: 6.0e5,
            a: 6.5,
            k: 4.0,
            c: 0.05,
            alpha: 1.0e-5,
        }
    }

    fn axial_rod() -> HysteresisRod {
        HysteresisRod::new(1e-6, na::Vector3::new(1.0, 0.0, 0.0), hymu80()).unwrap()
    }

    #[test]
    fn static_field_yields_zero_derivative() {
        let rod = axial_rod();
        let b = na::Vector3::new(3e-5, 0.0, 0.0);
        let b_dot = na::Vector3::zeros();
        assert_abs_diff_eq!(rod.dm_irr_dt(0.0, &b, &b_dot), 0.0, epsilon = 0.0);
    }

    #[test]
    fn zero_angular_velocity_and_bdot_gives_zero_rate_for_any_rod_orientation() {
        // Universal invariant (spec §8): Bdot=0 in body frame (and omega=0, so no
        // transport term) implies dM_irr/dt = 0 for every rod, regardless of axis.
        for axis in [
            na::Vector3::new(1.0, 0.0, 0.0),
            na::Vector3::new(0.0, 1.0, 0.0),
            na::Vector3::new(0.0, 0.0, 1.0),
            na::Vector3::new(1.0, 1.0, 1.0),
        ] {
            let rod = HysteresisRod::new(1e-6, axis, hymu80()).unwrap();
            let b = na::Vector3::new(1e-5, -2e-5, 3e-5);
            assert_abs_diff_eq!(
                rod.dm_irr_dt(1000.0, &b, &na::Vector3::zeros()),
                0.0,
                epsilon = 0.0
            );
        }
    }

    #[test]
    fn saturated_and_driven_further_yields_zero() {
        let rod = axial_rod();
        let b = na::Vector3::new(1.0, 0.0, 0.0);
        let b_dot = na::Vector3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(rod.dm_irr_dt(rod.params.m_s, &b, &b_dot), 0.0, epsilon = 0.0);
    }

    #[test]
    fn langevin_branches_agree_near_origin() {
        // spec §8: the Taylor branch and the asymptotic coth(x) - 1/x branch must agree
        // to 1e-10 at x = 1e-6, the exact threshold `langevin` switches on. `langevin`
        // itself only ever evaluates one formula per call (x = 1e-6 takes the asymptotic
        // branch, since the Taylor branch is `|x| < 1e-6` strict), so both formulas are
        // reproduced directly here to compare them at the same point rather than
        // comparing the asymptotic branch to itself at two nearby x values.
        let rod = axial_rod();
        let m_s = rod.params.m_s;
        let a = rod.params.a;
        let x = 1e-6_f64;
        let h_eff = x * a;

        let m_an_taylor = m_s * (x / 3.0 - x.powi(3) / 45.0);
        let d_taylor = (m_s / a) * (1.0 / 3.0 - x * x / 15.0);

        let (m_an_asym, d_asym) = rod.langevin(h_eff);

        assert_abs_diff_eq!(m_an_taylor, m_an_asym, epsilon = 1e-10 * m_s);
        assert_abs_diff_eq!(d_taylor, d_asym, epsilon = 1e-10 * m_s / a);
    }

    #[test]
    fn total_magnetization_is_bounded_by_saturation() {
        let rod = axial_rod();
        let b = na::Vector3::new(1e3, 0.0, 0.0);
        let m_total = rod.total_magnetization(rod.params.m_s * 2.0, &b);
        assert!(m_total.abs() <= rod.params.m_s * (1.1));
    }
}
