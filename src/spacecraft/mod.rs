pub mod magnet;
pub mod rod;

use crate::errors::SimError;
use magnet::PermanentMagnet;
use nalgebra as na;
use rod::{HysteresisParams, HysteresisRod};

/// Immutable post-construction spacecraft parameters (spec §3 "Spacecraft parameters",
/// component C6). Constructed once from `config::SpacecraftConfig`; the inertia tensor and
/// its inverse are computed and cached here rather than recomputed every derivative call.
#[derive(Debug, Clone)]
pub struct Spacecraft {
    mass: f64,
    inertia: na::Matrix3<f64>,
    inertia_inv: na::Matrix3<f64>,
    magnet: PermanentMagnet,
    rods: Vec<HysteresisRod>,
}

impl Spacecraft {
    /// `dimensions` are the box (a_x, a_y, a_z) used by the diagonal inertia formula
    /// I_x = (1/12) m (a_y^2 + a_z^2), cyclic (spec §3).
    pub fn new(
        mass_kg: f64,
        dimensions: (f64, f64, f64),
        magnet: PermanentMagnet,
        rods: Vec<HysteresisRod>,
    ) -> Result<Self, SimError> {
        if mass_kg <= 0.0 {
            return Err(SimError::ConfigurationError(format!(
                "spacecraft mass must be positive, got {mass_kg}"
            )));
        }
        let (ax, ay, az) = dimensions;
        if ax <= 0.0 || ay <= 0.0 || az <= 0.0 {
            return Err(SimError::ConfigurationError(
                "spacecraft dimensions must all be positive".into(),
            ));
        }

        let ix = (1.0 / 12.0) * mass_kg * (ay * ay + az * az);
        let iy = (1.0 / 12.0) * mass_kg * (ax * ax + az * az);
        let iz = (1.0 / 12.0) * mass_kg * (ax * ax + ay * ay);
        let inertia = na::Matrix3::new(ix, 0.0, 0.0, 0.0, iy, 0.0, 0.0, 0.0, iz);
        let inertia_inv = inertia.try_inverse().ok_or_else(|| {
            SimError::ConfigurationError("inertia tensor is not invertible".into())
        })?;

        Ok(Self {
            mass: mass_kg,
            inertia,
            inertia_inv,
            magnet,
            rods,
        })
    }

    /// Bypasses the box-dimensions formula to build a spacecraft with a directly
    /// specified inertia tensor, for scenarios (spec §8 S1, S2) that fix I by hand rather
    /// than via mass+dimensions.
    #[cfg(test)]
    pub fn from_inertia_for_test(
        mass_kg: f64,
        inertia: na::Matrix3<f64>,
        magnet: PermanentMagnet,
        rods: Vec<HysteresisRod>,
    ) -> Self {
        let inertia_inv = inertia.try_inverse().expect("test inertia must be invertible");
        Self {
            mass: mass_kg,
            inertia,
            inertia_inv,
            magnet,
            rods,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> &na::Matrix3<f64> {
        &self.inertia
    }

    pub fn inertia_inv(&self) -> &na::Matrix3<f64> {
        &self.inertia_inv
    }

    pub fn magnet(&self) -> &PermanentMagnet {
        &self.magnet
    }

    pub fn rods(&self) -> &[HysteresisRod] {
        &self.rods
    }

    pub fn rod_count(&self) -> usize {
        self.rods.len()
    }

    pub fn hysteresis_params(&self) -> Option<&HysteresisParams> {
        self.rods.first().map(|r| r.params())
    }
}
