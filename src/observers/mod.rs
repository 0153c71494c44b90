//! Observer/sink contract (spec §4.7, component C10).

pub mod csv_observer;

use crate::dynamics::State;
use crate::errors::SimError;

/// A read-only receiver of `(t_global, Y)` pairs (spec §4.7). The driver guarantees
/// monotone non-decreasing `t_global` (spec §3 "Observer sink"); an observer never
/// mutates state, so it is handed a shared reference.
pub trait Observer {
    fn observe(&mut self, t_global: f64, y: &State) -> Result<(), SimError>;
}
