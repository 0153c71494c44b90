//! Adaptive integrator driver (spec §4.9, component C9).

pub mod dopri5;
pub mod driver;
pub mod fehlberg78;
pub mod tableau;

pub use driver::{Driver, IntegratorSettings};
