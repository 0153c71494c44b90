//! Adaptive integrator driver (spec §4.9, component C9): PI/classic step-size control
//! over the embedded pair in `tableau.rs`, in both full-span and checkpointed run modes.
//!
//! Grounded on `integrators/rk4.rs` in the teacher repo for the overall "own the loop,
//! hand derivatives to the functor" shape, generalized from its fixed-step non-adaptive
//! loop to the spec's error-controlled adaptive stepping with two run modes and
//! checkpoint-boundary invariant restoration.

use crate::constants::MIN_STEP_SIZE;
use crate::dynamics::{DynamicsFunctor, State};
use crate::environment::Environment;
use crate::errors::SimError;
use crate::observers::Observer;
use crate::spacecraft::Spacecraft;

use super::dopri5;
use super::fehlberg78;
use super::tableau::{embedded_step, Tableau};

const SAFETY: f64 = 0.9;
const MIN_GROWTH: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct IntegratorSettings {
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    pub higher_order: bool,
    pub initial_dt: f64,
    pub max_steps: u64,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            abs_tolerance: crate::constants::DEFAULT_ABS_TOLERANCE,
            rel_tolerance: crate::constants::DEFAULT_REL_TOLERANCE,
            higher_order: false,
            initial_dt: 1.0,
            max_steps: 1_000_000,
        }
    }
}

pub struct Driver<'a> {
    spacecraft: &'a Spacecraft,
    environment: &'a dyn Environment,
    settings: IntegratorSettings,
}

impl<'a> Driver<'a> {
    pub fn new(
        spacecraft: &'a Spacecraft,
        environment: &'a dyn Environment,
        settings: IntegratorSettings,
    ) -> Self {
        Self {
            spacecraft,
            environment,
            settings,
        }
    }

    fn tableau(&self) -> &'static Tableau {
        if self.settings.higher_order {
            &fehlberg78::TABLEAU
        } else {
            &dopri5::TABLEAU
        }
    }

    /// Scaled infinity-norm error estimate between the embedded pair's two solutions
    /// (spec §4.9: "Uses the component-wise norm and algebra from §4.6").
    fn error_norm(&self, y: &State, y_high: &State, y_low: &State) -> f64 {
        let scale = self.settings.abs_tolerance
            + self.settings.rel_tolerance * y.inf_norm().max(y_high.inf_norm());
        let diff = y_high.clone() - y_low.clone();
        diff.inf_norm() / scale.max(1e-300)
    }

    /// Integrates `y0` across a sub-span `[0, span]` of local stepper time, starting at
    /// step size `h`, accepting/rejecting against the embedded error estimate. Calls
    /// `on_accept(tau, &y)` after every accepted step when `emit_every_step` is set (the
    /// full-span run mode); the checkpointed mode instead only observes at the slice
    /// boundary (the caller does that). Returns the state and step size at `tau = span`.
    fn integrate_span(
        &self,
        functor: &DynamicsFunctor,
        y0: State,
        span: f64,
        mut h: f64,
        steps_budget: &mut u64,
        mut on_accept: impl FnMut(f64, &State) -> Result<(), SimError>,
        emit_every_step: bool,
    ) -> Result<(State, f64), SimError> {
        let tableau = self.tableau();
        let order = tableau.order as f64;
        let mut tau = 0.0_f64;
        let mut y = y0;

        while tau < span - 1e-15 {
            if *steps_budget == 0 {
                return Err(SimError::IntegrationNonConvergence(format!(
                    "tolerances unreachable within the configured step budget (tau={tau:.3}, span={span:.3})"
                )));
            }
            *steps_budget -= 1;

            let h_trial = h.min(span - tau);
            let (y_high, y_low) = embedded_step(tableau, functor, tau, &y, h_trial)?;
            let err = self.error_norm(&y, &y_high, &y_low);

            let raw_factor = if err > 0.0 {
                SAFETY * err.powf(-1.0 / (order + 1.0))
            } else {
                MAX_GROWTH
            };
            let factor = raw_factor.clamp(MIN_GROWTH, MAX_GROWTH);

            if err <= 1.0 {
                tau += h_trial;
                y = y_high;
                if emit_every_step {
                    on_accept(tau, &y)?;
                }
                h = h_trial * factor;
            } else {
                h = h_trial * factor;
                if h < MIN_STEP_SIZE {
                    return Err(SimError::NumericalAbort {
                        at_t: functor.t0() + tau,
                        detail: "adaptive step size underflowed below the minimum".into(),
                    });
                }
            }
        }

        Ok((y, h))
    }

    /// Full-span mode (spec §4.9): integrate continuously from `t_start` to `t_end`,
    /// observing every accepted step.
    pub fn run_full_span(
        &self,
        y0: State,
        t_start: f64,
        t_end: f64,
        observer: &mut dyn Observer,
    ) -> Result<State, SimError> {
        observer.observe(t_start, &y0)?;

        let functor = DynamicsFunctor::new(self.spacecraft, self.environment, t_start);
        let span = t_end - t_start;
        let mut steps_budget = self.settings.max_steps;

        let (y_final, _h) = self.integrate_span(
            &functor,
            y0,
            span,
            self.settings.initial_dt,
            &mut steps_budget,
            |tau, y| observer.observe(t_start + tau, y),
            true,
        )?;

        Ok(y_final)
    }

    /// Checkpointed mode (spec §4.9): integrate in slices of up to `checkpoint_interval`
    /// seconds, restoring the quaternion/magnetization invariants and advancing the
    /// functor's global-time offset at every slice boundary.
    pub fn run_checkpointed(
        &self,
        y0: State,
        t_start: f64,
        t_end: f64,
        checkpoint_interval: f64,
        observer: &mut dyn Observer,
    ) -> Result<State, SimError> {
        observer.observe(t_start, &y0)?;

        let m_s = self.spacecraft.hysteresis_params().map(|p| p.m_s);
        let mut y = y0;
        let mut t_global = t_start;
        let mut h = self.settings.initial_dt;
        let mut steps_budget = self.settings.max_steps;

        while t_global < t_end - 1e-9 {
            let slice = checkpoint_interval.min(t_end - t_global);
            let functor = DynamicsFunctor::new(self.spacecraft, self.environment, t_global);

            let (y_next, h_next) = self.integrate_span(
                &functor,
                y,
                slice,
                h,
                &mut steps_budget,
                |_, _| Ok(()),
                false,
            )?;

            y = y_next;
            h = h_next;
            t_global += slice;

            y.renormalize_quaternion();
            if let Some(m_s) = m_s {
                y.clamp_magnetizations(m_s);
            }
            observer.observe(t_global, &y)?;
        }

        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::mock::ZeroFieldEnvironment;
    use crate::numerics::quaternion::Quaternion;
    use crate::observers::Observer;
    use crate::spacecraft::magnet::PermanentMagnet;
    use approx::assert_abs_diff_eq;
    use nalgebra as na;

    struct RecordingObserver {
        samples: Vec<(f64, State)>,
    }

    impl Observer for RecordingObserver {
        fn observe(&mut self, t_global: f64, y: &State) -> Result<(), SimError> {
            self.samples.push((t_global, y.clone()));
            Ok(())
        }
    }

    fn sat() -> Spacecraft {
        let magnet =
            PermanentMagnet::new(1.0, 0.05, 0.01, na::Vector3::new(0.0, 0.0, 1.0)).unwrap();
        Spacecraft::new(1.3, (0.1, 0.1, 0.1), magnet, vec![]).unwrap()
    }

    #[test]
    fn quaternion_norm_preserved_within_tolerance_in_free_spin() {
        // Pure torque-free rotation: |q| should stay very close to 1 across the run even
        // without checkpoint renormalization, verifying the kinematic ODE itself is sane.
        let sc = sat();
        let env = ZeroFieldEnvironment;
        let driver = Driver::new(&sc, &env, IntegratorSettings::default());

        let y0 = State::new(
            na::Vector3::new(7_000_000.0, 0.0, 0.0),
            na::Vector3::new(0.0, 7500.0, 0.0),
            Quaternion::identity(),
            na::Vector3::new(0.2, 0.0, 0.0),
            vec![],
        );

        let mut obs = RecordingObserver { samples: vec![] };
        let y_final = driver.run_full_span(y0, 0.0, 5.0, &mut obs).unwrap();
        assert_abs_diff_eq!(y_final.q.norm(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn checkpointed_mode_restores_quaternion_unit_norm_exactly() {
        let sc = sat();
        let env = ZeroFieldEnvironment;
        let driver = Driver::new(&sc, &env, IntegratorSettings::default());

        let y0 = State::new(
            na::Vector3::new(7_000_000.0, 0.0, 0.0),
            na::Vector3::new(0.0, 7500.0, 0.0),
            Quaternion::identity(),
            na::Vector3::new(0.2, 0.1, 0.05),
            vec![],
        );

        let mut obs = RecordingObserver { samples: vec![] };
        let y_final = driver
            .run_checkpointed(y0, 0.0, 10.0, 5.0, &mut obs)
            .unwrap();
        assert_abs_diff_eq!(y_final.q.norm(), 1.0, epsilon = 1e-12);
        // initial + 2 checkpoint emissions.
        assert_eq!(obs.samples.len(), 3);
    }

    #[test]
    fn observer_times_are_monotone_non_decreasing() {
        let sc = sat();
        let env = ZeroFieldEnvironment;
        let driver = Driver::new(&sc, &env, IntegratorSettings::default());
        let y0 = State::new(
            na::Vector3::new(7_000_000.0, 0.0, 0.0),
            na::Vector3::new(0.0, 7500.0, 0.0),
            Quaternion::identity(),
            na::Vector3::new(0.1, 0.0, 0.0),
            vec![],
        );
        let mut obs = RecordingObserver { samples: vec![] };
        driver.run_full_span(y0, 0.0, 3.0, &mut obs).unwrap();
        let times: Vec<f64> = obs.samples.iter().map(|(t, _)| *t).collect();
        for w in times.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }
}
