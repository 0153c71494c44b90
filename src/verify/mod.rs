//! Verification modes (spec §4.4 "Verification mode", §8 testable properties;
//! component C11).
//!
//! Isolates pieces of the core engine for standalone testing: the Jiles-Atherton loop
//! driven by a prescribed H(t) bypasses the environment/orbit entirely (spec §4.4's
//! "Verification mode"); the orbit- and attitude-only sub-drivers run the full dynamics
//! functor (C8) through the adaptive driver (C9) against the zero-field/point-mass mock
//! environments in `environment::mock`, isolating one half of the coupled system from
//! the other without duplicating the stepper.

use nalgebra as na;

use crate::dynamics::State;
use crate::environment::mock::{CentralGravityEnvironment, ZeroFieldEnvironment};
use crate::errors::SimError;
use crate::integrators::{Driver, IntegratorSettings};
use crate::numerics::quaternion::Quaternion;
use crate::observers::Observer;
use crate::orbital::{KeplerianElements, OrbitalMechanics};
use crate::spacecraft::magnet::PermanentMagnet;
use crate::spacecraft::rod::{HysteresisParams, HysteresisRod};
use crate::spacecraft::Spacecraft;

/// One sample of the isolated B-H loop: elapsed time, field strength, magnetization,
/// flux density (spec §6 "Hysteresis verification output").
#[derive(Debug, Clone, Copy)]
pub struct HysteresisSample {
    pub t: f64,
    pub h_am: f64,
    pub m_am: f64,
    pub b_t: f64,
}

/// Drives dM_irr/dt (spec §4.4) under a prescribed sinusoidal field `H(t) = H_max sin(2 pi
/// f t)` for `cycles` periods, fixed-step RK4 at `steps_per_cycle` points per cycle.
/// Returns the traced loop; `B = mu_0 (H + M)` per spec §6. Volume and the orientation
/// axis don't matter here (only the rod's material derivative does), so the rod is built
/// on a nominal unit volume along +X.
pub fn run_hysteresis_loop(
    params: HysteresisParams,
    h_max: f64,
    f: f64,
    cycles: f64,
    steps_per_cycle: usize,
) -> Result<Vec<HysteresisSample>, SimError> {
    params.validate()?;
    let rod = HysteresisRod::new(1.0, na::Vector3::x(), params)?;

    let period = 1.0 / f;
    let dt = period / steps_per_cycle as f64;
    let n_steps = (cycles * steps_per_cycle as f64).round() as usize;

    let two_pi_f = 2.0 * crate::constants::PI * f;
    let h_of_t = |t: f64| h_max * (two_pi_f * t).sin();
    let dh_dt_of_t = |t: f64| two_pi_f * h_max * (two_pi_f * t).cos();

    let b_of = |t: f64| na::Vector3::new(crate::constants::MU_0 * h_of_t(t), 0.0, 0.0);
    let bdot_of = |t: f64| na::Vector3::new(crate::constants::MU_0 * dh_dt_of_t(t), 0.0, 0.0);
    let derivative = |t: f64, m: f64| rod.dm_irr_dt(m, &b_of(t), &bdot_of(t));

    let mut samples = Vec::with_capacity(n_steps + 1);
    let mut t = 0.0;
    let mut m = 0.0;
    samples.push(HysteresisSample {
        t,
        h_am: h_of_t(t),
        m_am: m,
        b_t: crate::constants::MU_0 * (h_of_t(t) + m),
    });

    for _ in 0..n_steps {
        let k1 = derivative(t, m);
        let k2 = derivative(t + dt / 2.0, m + dt / 2.0 * k1);
        let k3 = derivative(t + dt / 2.0, m + dt / 2.0 * k2);
        let k4 = derivative(t + dt, m + dt * k3);
        m += dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        t += dt;

        samples.push(HysteresisSample {
            t,
            h_am: h_of_t(t),
            m_am: m,
            b_t: crate::constants::MU_0 * (h_of_t(t) + m),
        });
    }

    Ok(samples)
}

/// Writes the hysteresis verification CSV: header `time,H_Am,M_Am,B_T` (spec §6).
pub fn write_hysteresis_csv(
    path: &std::path::Path,
    samples: &[HysteresisSample],
) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_writer(std::fs::File::create(path)?);
    writer.write_record(["time", "H_Am", "M_Am", "B_T"])?;
    for s in samples {
        writer.write_record([
            format!("{:.6}", s.t),
            format!("{:.6}", s.h_am),
            format!("{:.6}", s.m_am),
            format!("{:.10}", s.b_t),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Tracks the worst-case relative drift of a scalar invariant (specific angular momentum
/// for the orbit sub-driver, rotational energy for the attitude sub-driver) across a run,
/// instead of recording every sample (spec §8's "conserved to within integrator
/// tolerance" properties).
struct InvariantTracker<F: FnMut(&State) -> f64> {
    invariant: F,
    initial: Option<f64>,
    max_relative_drift: f64,
}

impl<F: FnMut(&State) -> f64> Observer for InvariantTracker<F> {
    fn observe(&mut self, _t_global: f64, y: &State) -> Result<(), SimError> {
        let value = (self.invariant)(y);
        let initial = *self.initial.get_or_insert(value);
        if initial.abs() > 1e-300 {
            let drift = (value - initial).abs() / initial.abs();
            if drift > self.max_relative_drift {
                self.max_relative_drift = drift;
            }
        }
        Ok(())
    }
}

/// Pure-orbit sub-driver (component C11): runs the full dynamics functor against
/// `CentralGravityEnvironment` (zero field, point-mass gravity only), tracking the
/// worst-case relative drift of specific angular momentum `|r x v|` across the run (spec
/// §8's Kepler round-trip / conservation properties, exercised under the real stepper
/// rather than the closed-form check in `orbital::keplerian`), then folding in the
/// relative error between the final state's apoapsis/periapsis radii
/// (`OrbitalMechanics::compute_apsides`) and the closed-form values for the starting
/// elements.
pub fn run_orbit_verification(
    elements: KeplerianElements,
    t_end: f64,
    settings: IntegratorSettings,
) -> Result<f64, SimError> {
    let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements)?;
    let magnet = PermanentMagnet::new(1.0, 0.05, 0.01, na::Vector3::z())?;
    let spacecraft = Spacecraft::new(1.0, (0.1, 0.1, 0.1), magnet, vec![])?;
    let env = CentralGravityEnvironment;
    let driver = Driver::new(&spacecraft, &env, settings);

    let y0 = State::new(r, v, Quaternion::identity(), na::Vector3::zeros(), vec![]);
    let mut tracker = InvariantTracker {
        invariant: |y: &State| y.r.cross(&y.v).magnitude(),
        initial: None,
        max_relative_drift: 0.0,
    };
    let y_final = driver.run_full_span(y0, 0.0, t_end, &mut tracker)?;

    // Cross-check against the closed-form apoapsis/periapsis radii for the starting
    // elements (spec §8 Kepler round-trip property), folded into the same drift metric
    // returned to the caller.
    let (r_apo, r_peri) = OrbitalMechanics::compute_apsides(&y_final.r, &y_final.v);
    let r_apo_expected = elements.semi_major_axis * (1.0 + elements.eccentricity);
    let r_peri_expected = elements.semi_major_axis * (1.0 - elements.eccentricity);
    let apsis_drift = ((r_apo - r_apo_expected).abs() / r_apo_expected)
        .max((r_peri - r_peri_expected).abs() / r_peri_expected);

    Ok(tracker.max_relative_drift.max(apsis_drift))
}

/// Pure-attitude sub-driver (component C11): runs the full dynamics functor against
/// `ZeroFieldEnvironment` with the spacecraft placed far enough out that gravity-gradient
/// torque is negligible, isolating torque-free rigid-body rotation (spec §8 S2 / the
/// rotational-energy-conservation property). `inertia_diag` is back-solved into the box
/// dimensions `Spacecraft::new` expects, so the same public constructor used everywhere
/// else builds the test article here too.
pub fn run_attitude_verification(
    inertia_diag: (f64, f64, f64),
    omega0: na::Vector3<f64>,
    t_end: f64,
    settings: IntegratorSettings,
) -> Result<f64, SimError> {
    let magnet = PermanentMagnet::new(1.0, 0.05, 0.01, na::Vector3::z())?;
    let (ix, iy, iz) = inertia_diag;
    let mass = 1.0;
    let ax = (6.0 * (iy + iz - ix) / mass).sqrt().max(1e-6);
    let ay = (6.0 * (ix + iz - iy) / mass).sqrt().max(1e-6);
    let az = (6.0 * (ix + iy - iz) / mass).sqrt().max(1e-6);
    let spacecraft = Spacecraft::new(mass, (ax, ay, az), magnet, vec![])?;

    let env = ZeroFieldEnvironment;
    let driver = Driver::new(&spacecraft, &env, settings);

    let r = na::Vector3::new(1.0e12, 0.0, 0.0);
    let v = na::Vector3::zeros();
    let y0 = State::new(r, v, Quaternion::identity(), omega0, vec![]);

    let inertia = *spacecraft.inertia();
    let mut tracker = InvariantTracker {
        invariant: move |y: &State| y.omega.dot(&(inertia * y.omega)),
        initial: None,
        max_relative_drift: 0.0,
    };
    driver.run_full_span(y0, 0.0, t_end, &mut tracker)?;
    Ok(tracker.max_relative_drift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hymu80() -> HysteresisParams {
        HysteresisParams {
            m_s: 6.0e5,
            a: 6.5,
            k: 4.0,
            c: 0.05,
            alpha: 1.0e-5,
        }
    }

    #[test]
    fn s5_loop_saturates_near_m_s_and_closes_after_two_cycles() {
        let samples = run_hysteresis_loop(hymu80(), 100.0, 1.0, 2.0, 2000).unwrap();
        let max_m = samples.iter().map(|s| s.m_am.abs()).fold(0.0, f64::max);
        assert!((max_m - 6.0e5).abs() / 6.0e5 < 0.1);

        let one_cycle = samples.len() / 2;
        let drift = (samples[one_cycle].m_am - samples.last().unwrap().m_am).abs();
        assert!(drift < 1e-4 * hymu80().m_s);
    }

    #[test]
    fn orbit_verification_conserves_angular_momentum() {
        let elements = KeplerianElements {
            semi_major_axis: 6_918_137.0,
            eccentricity: 0.001,
            inclination: 0.9,
            raan: 0.1,
            arg_periapsis: 0.2,
            mean_anomaly: 0.0,
        };
        let drift =
            run_orbit_verification(elements, 600.0, IntegratorSettings::default()).unwrap();
        assert!(drift < 1e-6);
    }

    #[test]
    fn attitude_verification_conserves_rotational_energy() {
        let drift = run_attitude_verification(
            (0.1, 0.2, 0.3),
            na::Vector3::new(0.1, 0.5, 0.3),
            60.0,
            IntegratorSettings::default(),
        )
        .unwrap();
        assert!(drift < 1e-4);
    }
}
