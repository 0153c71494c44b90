//! Geomagnetic + gravity harmonic synthesis (spec §4.1, component C3).
//!
//! Grounded on `physics/environment.rs` (dipole mock) and `physics/gravity.rs`
//! (point-mass) in the teacher repo, generalized into the full algorithm of spec §4.1
//! steps 1-6: Earth-rotation rotation, reverse-geodetic conversion, spherical-harmonic
//! field synthesis via `legendre::legendre_schmidt`, zonal-harmonic gravity, and rotation
//! of both results from the local ENU basis into ECI.

use std::cell::RefCell;

use nalgebra as na;

use crate::constants::{
    EARTH_MU, EGM96_J2, EGM96_J3, EGM96_J4, GEOMAG_DEGREE, GEOMAG_REFERENCE_RADIUS,
    GEOMAG_YEAR_MAX, GEOMAG_YEAR_MIN, POSITION_SINGULARITY_RADIUS, SECONDS_PER_YEAR, WGS84_A,
};
use crate::coordinates::frames::{ecef_to_geodetic, r_ecef_to_eci, r_enu_to_ecef};
use crate::environment::coefficients::{coefficient_at_in, GAUSS_COEFFICIENTS};
use crate::environment::legendre::legendre_schmidt;
use crate::errors::SimError;

use super::{Environment, EnvironmentSample};

/// Scratch storage reused across calls (spec §4.1 "Caching"): rotation matrices are
/// expensive to rebuild, but every call recomputes them from its own `(t, r)` — nothing
/// here persists a *value* between calls, only the allocation.
#[derive(Default)]
struct Scratch {
    calls: u64,
}

/// Degree-gated zonal + low-degree spherical-harmonic environment. `gravity_degree < 2`
/// disables all zonal corrections (pure point mass); `>= 2` adds J2; `>= 3` adds J3;
/// `>= 4` adds J4 (spec §2 ADD 4.1.1).
pub struct HarmonicEnvironment {
    epoch_year0: f64,
    gravity_degree: usize,
    delta_grad: f64,
    gauss_table: Vec<(f64, f64, f64, f64)>,
    zonals: (f64, f64, f64),
    cache: RefCell<Scratch>,
}

impl HarmonicEnvironment {
    pub fn new(epoch_year0: f64, gravity_degree: usize) -> Self {
        Self {
            epoch_year0,
            gravity_degree,
            delta_grad: crate::constants::DEFAULT_DELTA_GRAD,
            gauss_table: GAUSS_COEFFICIENTS.to_vec(),
            zonals: (EGM96_J2, EGM96_J3, EGM96_J4),
            cache: RefCell::new(Scratch::default()),
        }
    }

    pub fn with_delta_grad(mut self, delta_grad: f64) -> Self {
        self.delta_grad = delta_grad;
        self
    }

    /// Overrides the built-in Gauss-coefficient table with one loaded from an on-disk WMM
    /// bundle (spec ADD 4.1.1, `coefficients::load_wmm_table`).
    pub fn with_gauss_table(mut self, table: Vec<(f64, f64, f64, f64)>) -> Self {
        self.gauss_table = table;
        self
    }

    /// Overrides the built-in `(J2, J3, J4)` zonal gravity coefficients with ones loaded
    /// from an on-disk EGM bundle (spec ADD 4.1.1, `coefficients::load_egm_zonals`).
    pub fn with_egm_zonals(mut self, zonals: (f64, f64, f64)) -> Self {
        self.zonals = zonals;
        self
    }

    /// One field evaluation at `(t, r_eci)`: spec §4.1 steps 1-6, minus the Bdot finite
    /// difference (performed by the caller in `compute_fields_at`). Returns `(B_eci,
    /// g_eci)`.
    fn evaluate(&self, t: f64, r_eci: &na::Vector3<f64>) -> Result<(na::Vector3<f64>, na::Vector3<f64>), SimError> {
        let r_mag = r_eci.magnitude();
        if r_mag < POSITION_SINGULARITY_RADIUS {
            return Err(SimError::NumericalAbort {
                at_t: t,
                detail: "environment queried at a position singularity (|r| < 1e-6 m)".into(),
            });
        }

        self.cache.borrow_mut().calls += 1;

        let r_ecef_to_eci = r_ecef_to_eci(t);
        let r_eci_to_ecef = r_ecef_to_eci.transpose();
        let r_ecef = r_eci_to_ecef * r_eci;

        let geo = ecef_to_geodetic(&r_ecef);

        let decimal_year = self.epoch_year0 + t / SECONDS_PER_YEAR;
        if !(GEOMAG_YEAR_MIN..=GEOMAG_YEAR_MAX).contains(&decimal_year) {
            eprintln!(
                "warning: geomagnetic model evaluated at decimal year {decimal_year:.1}, outside the model's validated range [{GEOMAG_YEAR_MIN}, {GEOMAG_YEAR_MAX}]"
            );
        }

        // Geocentric spherical coordinates, used for the harmonic synthesis itself
        // (the geodetic point above feeds the ENU basis and the epoch-year check).
        let geocentric_r = r_ecef.magnitude();
        let theta = (r_ecef.z / geocentric_r).acos(); // colatitude
        let phi = r_ecef.y.atan2(r_ecef.x); // geocentric longitude, equals geodetic longitude

        let b_enu = self.synthesize_field(geocentric_r, theta, phi, decimal_year);
        let g_enu = self.synthesize_gravity(geocentric_r, theta);

        let r_enu_to_ecef = r_enu_to_ecef(&geo);
        let r_enu_to_eci = r_ecef_to_eci * r_enu_to_ecef;

        Ok((r_enu_to_eci * b_enu, r_enu_to_eci * g_enu))
    }

    /// Spherical-harmonic magnetic field at geocentric `(r, theta, phi)`, ENU, tesla
    /// (spec §4.1 step 4). `b_east = (1/(r sin theta)) dV/dphi` etc., from the Gauss
    /// potential V = a * sum (a/r)^(n+1) sum_m (g cos(m phi) + h sin(m phi)) P_n^m(cos theta).
    fn synthesize_field(&self, r: f64, theta: f64, phi: f64, decimal_year: f64) -> na::Vector3<f64> {
        let a = GEOMAG_REFERENCE_RADIUS;
        let table = legendre_schmidt(theta);
        let sin_theta = theta.sin().max(1e-12);

        let mut b_up_nt = 0.0; // -dV/dr
        let mut b_north_nt = 0.0; // -(1/r) dV/dtheta
        let mut b_east_nt = 0.0; // -(1/(r sin theta)) dV/dphi

        for n in 1..=GEOMAG_DEGREE {
            let ratio = (a / r).powi(n as i32 + 2);
            for m in 0..=n {
                let (g, h) = coefficient_at_in(&self.gauss_table, n, m, decimal_year);
                let (p, dp) = table.get(n, m);
                let cos_m_phi = (m as f64 * phi).cos();
                let sin_m_phi = (m as f64 * phi).sin();

                b_up_nt += (n as f64 + 1.0) * ratio * (g * cos_m_phi + h * sin_m_phi) * p;
                b_north_nt += -ratio * (g * cos_m_phi + h * sin_m_phi) * dp;
                b_east_nt += ratio * (m as f64) * (g * sin_m_phi - h * cos_m_phi) * p / sin_theta;
            }
        }

        na::Vector3::new(b_east_nt, b_north_nt, b_up_nt) * 1e-9 // nT -> T
    }

    /// Zonal-harmonic gravity at geocentric `(r, theta)`, ENU, m/s^2 (spec §4.1 step 5):
    /// central term plus J2 (degree >= 2), J3 (degree >= 3), J4 (degree >= 4), derived
    /// from the potential V = (mu/r)[1 - sum J_n (Re/r)^n P_n(cos theta)] with P_n the
    /// ordinary (unnormalized) Legendre polynomials (zonal, m=0).
    fn synthesize_gravity(&self, r: f64, theta: f64) -> na::Vector3<f64> {
        let x = theta.cos();
        let sin_theta = theta.sin();
        let re = WGS84_A;

        let mut g_r = -EARTH_MU / (r * r);
        let mut g_theta = 0.0;

        let (j2, j3, j4) = self.zonals;
        let zonals: &[(usize, f64)] = &[(2, j2), (3, j3), (4, j4)];
        for &(n, j_n) in zonals {
            if self.gravity_degree < n {
                continue;
            }
            let (p_n, dp_n) = legendre_polynomial(n, x);
            let ratio = (re / r).powi(n as i32);
            g_r += EARTH_MU / (r * r) * (n as f64 + 1.0) * j_n * ratio * p_n;
            g_theta += EARTH_MU * sin_theta / (r * r) * j_n * ratio * dp_n;
        }

        // ENU: up is radially outward, north is -theta_hat, zonal terms carry no east
        // component.
        na::Vector3::new(0.0, -g_theta, g_r)
    }
}

/// Unnormalized Legendre polynomial P_n(x) and its derivative dP_n/dx, closed form for the
/// fixed degrees this model uses (n in 2..=4).
fn legendre_polynomial(n: usize, x: f64) -> (f64, f64) {
    match n {
        2 => (0.5 * (3.0 * x * x - 1.0), 3.0 * x),
        3 => (0.5 * (5.0 * x * x * x - 3.0 * x), 0.5 * (15.0 * x * x - 3.0)),
        4 => (
            (35.0 * x.powi(4) - 30.0 * x * x + 3.0) / 8.0,
            (140.0 * x.powi(3) - 60.0 * x) / 8.0,
        ),
        _ => unreachable!("only zonal degrees 2..=4 are synthesized"),
    }
}

impl Environment for HarmonicEnvironment {
    /// Spec §4.1: evaluate `B` at `(t, r)` and at `(t + delta_grad, r + v*delta_grad)`,
    /// forward-difference for the material derivative; gravity is evaluated once at `t`.
    fn compute_fields_at(
        &self,
        t: f64,
        r_eci: &na::Vector3<f64>,
        v_eci: &na::Vector3<f64>,
    ) -> Result<EnvironmentSample, SimError> {
        let (b1, g1) = self.evaluate(t, r_eci)?;
        let r2 = r_eci + v_eci * self.delta_grad;
        let (b2, _g2) = self.evaluate(t + self.delta_grad, &r2)?;
        let b_dot = (b2 - b1) / self.delta_grad;

        Ok(EnvironmentSample {
            b_eci: b1,
            b_dot_eci: b_dot,
            g_eci: g1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gravity_reduces_to_point_mass_at_degree_zero() {
        let env = HarmonicEnvironment::new(2025.0, 0);
        let r = na::Vector3::new(WGS84_A + 500_000.0, 0.0, 0.0);
        let (_, g) = env.evaluate(0.0, &r).unwrap();
        let expected = EARTH_MU / r.magnitude().powi(2);
        assert_abs_diff_eq!(g.magnitude(), expected, epsilon = 1e-9 * expected);
    }

    #[test]
    fn gravity_j2_correction_is_small_relative_to_central_term() {
        let env = HarmonicEnvironment::new(2025.0, 2);
        let r = na::Vector3::new(WGS84_A + 500_000.0, 0.0, 0.3);
        let (_, g) = env.evaluate(0.0, &r).unwrap();
        let central = EARTH_MU / r.magnitude().powi(2);
        assert!((g.magnitude() - central).abs() / central < 1e-2);
    }

    #[test]
    fn position_singularity_aborts() {
        let env = HarmonicEnvironment::new(2025.0, 2);
        let r = na::Vector3::new(1e-9, 0.0, 0.0);
        let v = na::Vector3::zeros();
        assert!(env.compute_fields_at(0.0, &r, &v).is_err());
    }

    #[test]
    fn out_of_range_year_warns_but_proceeds() {
        let env = HarmonicEnvironment::new(1850.0, 2);
        let r = na::Vector3::new(WGS84_A + 500_000.0, 0.0, 0.0);
        let v = na::Vector3::zeros();
        assert!(env.compute_fields_at(0.0, &r, &v).is_ok());
    }

    #[test]
    fn field_magnitude_is_plausible_at_leo_altitude() {
        // Order-of-magnitude check: LEO field strength is tens of microtesla.
        let env = HarmonicEnvironment::new(2025.0, 2);
        let r = na::Vector3::new(WGS84_A + 500_000.0, 0.0, 0.0);
        let v = na::Vector3::new(0.0, 7600.0, 0.0);
        let sample = env.compute_fields_at(0.0, &r, &v).unwrap();
        assert!(sample.b_eci.magnitude() > 1e-6 && sample.b_eci.magnitude() < 1e-4);
    }
}
