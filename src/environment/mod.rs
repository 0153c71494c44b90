//! Environment model (spec §4.1, component C3): the capability the dynamics functor
//! queries once (twice, for Bdot) per derivative evaluation.

pub mod coefficients;
pub mod harmonic;
pub mod legendre;
pub mod mock;

use nalgebra as na;

use crate::errors::SimError;

/// One environment query's result: geomagnetic field, its material derivative along the
/// trajectory, and gravity acceleration, all in ECI (spec §4.1).
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentSample {
    pub b_eci: na::Vector3<f64>,
    pub b_dot_eci: na::Vector3<f64>,
    pub g_eci: na::Vector3<f64>,
}

/// Spec §9 "Polymorphic environment": a tagged capability rather than an inheritance
/// hierarchy, implemented by the full harmonic model and by the test/verification mocks.
pub trait Environment {
    fn compute_fields_at(
        &self,
        t: f64,
        r_eci: &na::Vector3<f64>,
        v_eci: &na::Vector3<f64>,
    ) -> Result<EnvironmentSample, SimError>;
}
