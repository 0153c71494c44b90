//! Passive magnetic AOCS simulator: coupled orbit/attitude/hysteresis time-integration
//! engine (spec §1-§5), plus the CLI collaborator (`config`) and CSV/verification output
//! (`observers`, `verify`) described in spec §6.

pub mod config;
pub mod constants;
pub mod coordinates;
pub mod dynamics;
pub mod environment;
pub mod errors;
pub mod integrators;
pub mod numerics;
pub mod observers;
pub mod orbital;
pub mod spacecraft;
pub mod verify;
