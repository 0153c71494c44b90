//! The dynamics functor (spec §4.8, component C8) — assembles dY/dtau from the
//! environment (C3), spacecraft (C6), and state algebra (C7).
//!
//! Grounded on `physics/dynamics.rs`'s `EquationsOfMotion` trait in the teacher repo
//! (there: gravity + drag + a fixed external torque); here generalized to the spec's
//! full assembly — orbital motion under the environment's total gravity, quaternion
//! kinematics, Euler's equation with gyroscopic coupling, and gravity-gradient/permanent-
//! magnet/rod torques — and to report failure through `Result` rather than the teacher's
//! infallible `compute_derivative`, since environment queries can now fail (spec §4.1
//! "Failure").

use nalgebra as na;

use crate::environment::Environment;
use crate::errors::SimError;
use crate::numerics::quaternion::compute_quaternion_derivative;
use crate::spacecraft::Spacecraft;

use super::state::State;

/// Spec §9 "Numerical sensitivity of compute_net_torque": a named argument group instead
/// of a long positional list, so `omega`/`b_body`/`rod_torque`/`r_eci`/`q` can't be
/// transposed by accident at the call site.
struct NetTorqueInputs<'a> {
    spacecraft: &'a Spacecraft,
    omega: na::Vector3<f64>,
    b_body: na::Vector3<f64>,
    rod_torque: na::Vector3<f64>,
    r_eci: na::Vector3<f64>,
    r_eci_to_body: na::Matrix3<f64>,
}

/// Permanent-magnet + rod + gravity-gradient + gyroscopic torque (spec §4.8 steps 7-10).
fn compute_net_torque(inputs: &NetTorqueInputs) -> na::Vector3<f64> {
    let inertia = inputs.spacecraft.inertia();

    let tau_p = inputs.spacecraft.magnet().torque(&inputs.b_body);

    let r_body = inputs.r_eci_to_body * inputs.r_eci;
    let r_body_mag = r_body.magnitude();
    let tau_gg = if r_body_mag > 1e-9 {
        (3.0 * crate::constants::EARTH_MU / r_body_mag.powi(5))
            * r_body.cross(&(inertia * r_body))
    } else {
        na::Vector3::zeros()
    };

    let tau_gyro = -inputs.omega.cross(&(inertia * inputs.omega));

    tau_p + inputs.rod_torque + tau_gg + tau_gyro
}

/// Holds immutable references to spacecraft and environment (spec §3 "Ownership"), plus
/// the fixed global-time offset that lets a stepper restart at local time zero after a
/// checkpoint (spec §4.8 "t = t0 + tau").
pub struct DynamicsFunctor<'a> {
    spacecraft: &'a Spacecraft,
    environment: &'a dyn Environment,
    t0: f64,
}

impl<'a> DynamicsFunctor<'a> {
    pub fn new(spacecraft: &'a Spacecraft, environment: &'a dyn Environment, t0: f64) -> Self {
        Self {
            spacecraft,
            environment,
            t0,
        }
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// dY/dtau at local stepper time `tau` (spec §4.8, steps 1-12).
    pub fn derivative(&self, tau: f64, y: &State) -> Result<State, SimError> {
        let t = self.t0 + tau;

        // Step 1: a local normalized copy stabilises rotation-matrix construction; the
        // stepper owns Y, so this is never written back (spec §4.8 step 1, §9
        // "Quaternion drift").
        let q_norm = y.q.normalize();
        let r_eci_to_body = q_norm.to_rotation_matrix().transpose();

        // Step 3.
        let sample = self.environment.compute_fields_at(t, &y.r, &y.v)?;

        // Step 4.
        let dr = y.v;
        let dv = sample.g_eci;

        // Step 5: material derivative in inertial coords, transported into the rotating
        // body frame.
        let b_body = r_eci_to_body * sample.b_eci;
        let b_dot_body = r_eci_to_body * sample.b_dot_eci - y.omega.cross(&b_body);

        // Step 6: per-rod derivative and accumulated torque.
        let mut dm_irr = Vec::with_capacity(y.m_irr.len());
        let mut rod_torque = na::Vector3::zeros();
        for (rod, &m_irr_i) in self.spacecraft.rods().iter().zip(y.m_irr.iter()) {
            dm_irr.push(rod.dm_irr_dt(m_irr_i, &b_body, &b_dot_body));
            rod_torque += rod.dipole_moment(m_irr_i, &b_body).cross(&b_body);
        }

        // Steps 7-10.
        let net_torque = compute_net_torque(&NetTorqueInputs {
            spacecraft: self.spacecraft,
            omega: y.omega,
            b_body,
            rod_torque,
            r_eci: y.r,
            r_eci_to_body,
        });

        // Step 11.
        let domega = self.spacecraft.inertia_inv() * net_torque;

        // Step 12: uses the *unnormalized* y.q, not the local copy — the quaternion
        // kinematic derivative must not implicitly renormalize (spec §9).
        let dq = compute_quaternion_derivative(&y.q, &y.omega);

        Ok(State {
            r: dr,
            v: dv,
            q: dq,
            omega: domega,
            m_irr: dm_irr,
        })
    }
}
