//! Embedded Runge-Kutta tableau machinery shared by the Dormand-Prince 5(4) and
//! Fehlberg 7(8) pairs (spec §4.9, component C9).
//!
//! Grounded on the teacher's `integrators/rk4.rs` `RK4::integrate` (the stage-accumulation
//! pattern: `state + k_i * (h * a_ij)`), generalized from a fixed 4-stage tableau to an
//! arbitrary embedded pair so both the default and higher-order steppers share one
//! stage-evaluation routine.

use crate::dynamics::{DynamicsFunctor, State};
use crate::errors::SimError;

/// An explicit Runge-Kutta Butcher tableau with two weight rows for embedded error
/// estimation. `order` is the *lower* order of the pair (used by the step-size
/// controller's `1/(order+1)` exponent).
pub struct Tableau {
    pub c: &'static [f64],
    pub a: &'static [&'static [f64]],
    pub b_high: &'static [f64],
    pub b_low: &'static [f64],
    pub order: usize,
}

/// Evaluates every stage and returns `(y_high, y_low)`, the two embedded solutions at
/// `tau + h` (spec §4.9). The caller forms the error estimate from their difference.
pub fn embedded_step(
    tableau: &Tableau,
    functor: &DynamicsFunctor,
    tau: f64,
    y: &State,
    h: f64,
) -> Result<(State, State), SimError> {
    let stages = tableau.c.len();
    let mut k: Vec<State> = Vec::with_capacity(stages);

    for i in 0..stages {
        let mut y_stage = y.clone();
        for (j, k_j) in k.iter().enumerate().take(i) {
            let a_ij = tableau.a[i][j];
            if a_ij != 0.0 {
                y_stage = y_stage + k_j.clone() * (h * a_ij);
            }
        }
        let k_i = functor.derivative(tau + tableau.c[i] * h, &y_stage)?;
        k.push(k_i);
    }

    let mut y_high = y.clone();
    let mut y_low = y.clone();
    for (i, k_i) in k.into_iter().enumerate() {
        if tableau.b_high[i] != 0.0 {
            y_high = y_high + k_i.clone() * (h * tableau.b_high[i]);
        }
        if tableau.b_low[i] != 0.0 {
            y_low = y_low + k_i * (h * tableau.b_low[i]);
        }
    }

    Ok((y_high, y_low))
}
