pub mod keplerian;

pub use keplerian::{KeplerianElements, OrbitalMechanics};
