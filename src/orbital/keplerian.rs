//! Keplerian-to-Cartesian conversion (spec §4.2 / component C2).
//!
//! Grounded on `physics/orbital.rs` in the teacher repo (Newton-Raphson anomaly solve,
//! perifocal-to-ECI rotation sequence, apsis/period helpers), generalized to use the
//! spec-mandated Earth mu and mean-anomaly-driven construction.

use crate::constants::{EARTH_MU, PI};
use crate::errors::SimError;
use nalgebra as na;

/// The six classical orbital elements, frozen at t=0 per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeplerianElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_periapsis: f64,
    pub mean_anomaly: f64,
}

pub struct OrbitalMechanics;

impl OrbitalMechanics {
    /// Solve Kepler's equation M = E - e*sin(E) for the eccentric anomaly by
    /// Newton-Raphson, starting at E=M, tolerance 1e-9, capped at 100 iterations
    /// (spec §4.2). Returns `NumericalAbort` if the cap is reached without convergence.
    pub fn solve_eccentric_anomaly(mean_anomaly: f64, e: f64) -> Result<f64, SimError> {
        let mut ecc_anom = mean_anomaly;
        for _ in 0..100 {
            let f = ecc_anom - e * ecc_anom.sin() - mean_anomaly;
            let f_prime = 1.0 - e * ecc_anom.cos();
            let delta = f / f_prime;
            ecc_anom -= delta;
            if delta.abs() < 1e-9 {
                return Ok(ecc_anom);
            }
        }
        Err(SimError::NumericalAbort {
            at_t: 0.0,
            detail: "Kepler equation did not converge within 100 iterations".into(),
        })
    }

    pub fn true_anomaly_from_eccentric(ecc_anom: f64, e: f64) -> f64 {
        2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (ecc_anom / 2.0).tan()).atan()
    }

    /// Converts Keplerian elements to inertial position/velocity (spec §4.2): solves
    /// Kepler's equation for E, derives true anomaly nu, builds the perifocal state, and
    /// rotates through the 3-1-3 Euler sequence RAAN -> inclination -> argument-of-periapsis.
    pub fn keplerian_to_cartesian(
        elements: &KeplerianElements,
    ) -> Result<(na::Vector3<f64>, na::Vector3<f64>), SimError> {
        let KeplerianElements {
            semi_major_axis: a,
            eccentricity: e,
            inclination: i,
            raan,
            arg_periapsis,
            mean_anomaly,
        } = *elements;

        let ecc_anom = Self::solve_eccentric_anomaly(mean_anomaly, e)?;
        let nu = Self::true_anomaly_from_eccentric(ecc_anom, e);

        let r = a * (1.0 - e * e) / (1.0 + e * nu.cos());
        let r_pqw = na::Vector3::new(r * nu.cos(), r * nu.sin(), 0.0);

        let p = a * (1.0 - e * e);
        let h = (EARTH_MU / p).sqrt();
        let v_pqw = na::Vector3::new(-h * nu.sin(), h * (e + nu.cos()), 0.0);

        let rot_raan = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), raan);
        let rot_inc = na::Rotation3::from_axis_angle(&na::Vector3::x_axis(), i);
        let rot_argp = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), arg_periapsis);
        let transform = rot_raan * rot_inc * rot_argp;

        Ok((transform * r_pqw, transform * v_pqw))
    }

    pub fn compute_orbital_period(a: f64) -> f64 {
        2.0 * PI * (a.powi(3) / EARTH_MU).sqrt()
    }

    /// Specific angular momentum magnitude h = sqrt(mu * a * (1 - e^2)), used by the
    /// Kepler round-trip testable property in spec §8.
    pub fn specific_angular_momentum(a: f64, e: f64) -> f64 {
        (EARTH_MU * a * (1.0 - e * e)).sqrt()
    }

    pub fn eccentricity_vector(
        r: &na::Vector3<f64>,
        v: &na::Vector3<f64>,
    ) -> na::Vector3<f64> {
        let r_mag = r.magnitude();
        let v_mag = v.magnitude();
        ((v_mag * v_mag - EARTH_MU / r_mag) * r - r.dot(v) * v) / EARTH_MU
    }

    pub fn compute_apsides(r: &na::Vector3<f64>, v: &na::Vector3<f64>) -> (f64, f64) {
        let r_mag = r.magnitude();
        let v_mag = v.magnitude();
        let specific_energy = (v_mag * v_mag / 2.0) - EARTH_MU / r_mag;
        let h = r.cross(v);
        let h_mag2 = h.dot(&h);

        let a = -EARTH_MU / (2.0 * specific_energy);
        let e = (1.0 + (2.0 * specific_energy * h_mag2) / (EARTH_MU * EARTH_MU)).sqrt();

        (a * (1.0 + e), a * (1.0 - e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn iss_like() -> KeplerianElements {
        KeplerianElements {
            semi_major_axis: 6_918_137.0,
            eccentricity: 0.001,
            inclination: 51.6_f64.to_radians(),
            raan: 0.3,
            arg_periapsis: 0.2,
            mean_anomaly: 1.0,
        }
    }

    #[test]
    fn kepler_round_trip_conserves_specific_angular_momentum() {
        let elements = iss_like();
        let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements).unwrap();
        let h_expected =
            OrbitalMechanics::specific_angular_momentum(elements.semi_major_axis, elements.eccentricity);
        let h_actual = r.cross(&v).magnitude();
        assert_abs_diff_eq!(h_actual, h_expected, epsilon = 1e-6 * h_expected);
    }

    #[test]
    fn kepler_round_trip_conserves_eccentricity_vector_magnitude() {
        let elements = iss_like();
        let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements).unwrap();
        let e_vec = OrbitalMechanics::eccentricity_vector(&r, &v);
        assert_abs_diff_eq!(e_vec.magnitude(), elements.eccentricity, epsilon = 1e-9);
    }

    #[test]
    fn circular_orbit_has_constant_radius() {
        let elements = KeplerianElements {
            semi_major_axis: 7_000_000.0,
            eccentricity: 0.0,
            inclination: 0.5,
            raan: 0.0,
            arg_periapsis: 0.0,
            mean_anomaly: 0.0,
        };
        let (r, _v) = OrbitalMechanics::keplerian_to_cartesian(&elements).unwrap();
        assert_abs_diff_eq!(r.magnitude(), elements.semi_major_axis, epsilon = 1e-3);
    }

    #[test]
    fn period_matches_keplers_third_law() {
        let period = OrbitalMechanics::compute_orbital_period(7_000_000.0);
        let expected = 2.0 * PI * (7_000_000.0f64.powi(3) / EARTH_MU).sqrt();
        assert_abs_diff_eq!(period, expected, epsilon = 1e-6);
    }
}
