//! Mock environments for the testable scenarios in spec §8 and for the orbit/attitude
//! verification sub-drivers (spec §4.11 / component C11), which need the dynamics functor
//! without a real harmonic model. Grounded on `physics/gravity.rs`/`physics/environment.rs`
//! in the teacher repo, which likewise kept a simplified dipole-plus-point-mass model
//! alongside the "real" one (spec §9 "Polymorphic environment").

use nalgebra as na;

use crate::constants::EARTH_MU;
use crate::errors::SimError;

use super::{Environment, EnvironmentSample};

/// A constant, inertially-fixed field (used by scenario S1: "prescribe a constant
/// inertial B"). Gravity is a plain point-mass term; Bdot is identically zero.
pub struct ConstantFieldEnvironment {
    pub b_eci: na::Vector3<f64>,
}

impl Environment for ConstantFieldEnvironment {
    fn compute_fields_at(
        &self,
        _t: f64,
        r_eci: &na::Vector3<f64>,
        _v_eci: &na::Vector3<f64>,
    ) -> Result<EnvironmentSample, SimError> {
        Ok(EnvironmentSample {
            b_eci: self.b_eci,
            b_dot_eci: na::Vector3::zeros(),
            g_eci: -r_eci.normalize() * (EARTH_MU / r_eci.magnitude().powi(2)),
        })
    }
}

/// Zero field everywhere, point-mass gravity only: isolates rigid-body dynamics from
/// magnetics (scenario S2, "pure gyroscopic"), and is the environment the attitude-only
/// verification sub-driver runs against.
pub struct ZeroFieldEnvironment;

impl Environment for ZeroFieldEnvironment {
    fn compute_fields_at(
        &self,
        _t: f64,
        r_eci: &na::Vector3<f64>,
        _v_eci: &na::Vector3<f64>,
    ) -> Result<EnvironmentSample, SimError> {
        let r_mag = r_eci.magnitude();
        let g_eci = if r_mag > 1e-9 {
            -r_eci.normalize() * (EARTH_MU / (r_mag * r_mag))
        } else {
            na::Vector3::zeros()
        };
        Ok(EnvironmentSample {
            b_eci: na::Vector3::zeros(),
            b_dot_eci: na::Vector3::zeros(),
            g_eci,
        })
    }
}

/// Pure point-mass gravity, zero field: the orbit-only verification sub-driver (Kepler
/// round-trip and apsis checks, spec §8) runs the dynamics functor against this so it
/// exercises the real orbital half of C8 without the magnetic half.
pub struct CentralGravityEnvironment;

impl Environment for CentralGravityEnvironment {
    fn compute_fields_at(
        &self,
        _t: f64,
        r_eci: &na::Vector3<f64>,
        _v_eci: &na::Vector3<f64>,
    ) -> Result<EnvironmentSample, SimError> {
        Ok(EnvironmentSample {
            b_eci: na::Vector3::zeros(),
            b_dot_eci: na::Vector3::zeros(),
            g_eci: -r_eci.normalize() * (EARTH_MU / r_eci.magnitude().powi(2)),
        })
    }
}
