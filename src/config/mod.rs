//! CLI collaborator (spec §6): argument parsing and validation into the core's
//! immutable construction types. Not part of the simulation core itself.

pub mod build;
pub mod cli;

pub use build::{RunMode, SimulationConfig};
pub use cli::Cli;
