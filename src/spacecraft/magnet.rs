//! Permanent magnet model (spec §4.3, component C4).

use crate::constants::{MU_0, PI};
use crate::errors::SimError;
use nalgebra as na;

/// Immutable body-fixed dipole: magnitude derived from remanence and cylinder geometry,
/// orientation fixed at construction (spec §3, §4.3).
#[derive(Debug, Clone, Copy)]
pub struct PermanentMagnet {
    dipole: na::Vector3<f64>,
}

impl PermanentMagnet {
    /// `remanence_t` (T), `length_m`/`diameter_m` describe the magnet cylinder;
    /// `orientation` is the body-frame direction (normalized here). Magnitude =
    /// (B_r/mu_0) * pi * (D/2)^2 * L; dipole vector = magnitude * orientation.
    pub fn new(
        remanence_t: f64,
        length_m: f64,
        diameter_m: f64,
        orientation: na::Vector3<f64>,
    ) -> Result<Self, SimError> {
        if length_m <= 0.0 || diameter_m <= 0.0 {
            return Err(SimError::ConfigurationError(
                "magnet length and diameter must be positive".into(),
            ));
        }
        let orientation_norm = orientation.magnitude();
        if orientation_norm < 1e-12 {
            return Err(SimError::ConfigurationError(
                "magnet orientation vector must be non-zero".into(),
            ));
        }
        let unit = orientation / orientation_norm;

        let radius = diameter_m / 2.0;
        let volume = PI * radius * radius * length_m;
        let magnitude = (remanence_t / MU_0) * volume;

        Ok(Self {
            dipole: unit * magnitude,
        })
    }

    /// The body-frame dipole moment vector (A*m^2).
    pub fn dipole_moment(&self) -> na::Vector3<f64> {
        self.dipole
    }

    /// Torque contribution m_p x B_body (spec §4.8 step 7).
    pub fn torque(&self, b_body: &na::Vector3<f64>) -> na::Vector3<f64> {
        self.dipole.cross(b_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn dipole_moment_magnitude_matches_scenario_s4() {
        // S4: B_r = 1.45 T, L = 0.05 m, D = 0.01 m -> |m_p| ~= 4.53 A*m^2 (within 0.01).
        let magnet =
            PermanentMagnet::new(1.45, 0.05, 0.01, na::Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert_abs_diff_eq!(magnet.dipole_moment().magnitude(), 4.53, epsilon = 0.01);
    }

    #[test]
    fn rejects_zero_orientation() {
        assert!(PermanentMagnet::new(1.0, 0.05, 0.01, na::Vector3::zeros()).is_err());
    }

    #[test]
    fn rejects_zero_volume() {
        assert!(PermanentMagnet::new(1.0, 0.0, 0.01, na::Vector3::new(0.0, 0.0, 1.0)).is_err());
        assert!(PermanentMagnet::new(1.0, 0.05, 0.0, na::Vector3::new(0.0, 0.0, 1.0)).is_err());
    }

    #[test]
    fn orientation_is_normalized() {
        let magnet =
            PermanentMagnet::new(1.45, 0.05, 0.01, na::Vector3::new(0.0, 0.0, 5.0)).unwrap();
        assert_abs_diff_eq!(
            magnet.dipole_moment().normalize(),
            na::Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }
}
