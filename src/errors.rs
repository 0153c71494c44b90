use std::fmt;

/// Error taxonomy for the simulator (spec §7). Every run-ending condition maps to exactly
/// one of these variants; the driver translates lower-level failures (CSV I/O, epoch
/// construction) into the category that matches their cause.
#[derive(Debug)]
pub enum SimError {
    /// Bad construction parameters: non-positive volume/mass, zero orientation vector,
    /// c outside [0, 1], a missing or malformed CLI value. Fatal before integration begins.
    ConfigurationError(String),
    /// A harmonic-model coefficient bundle was required but not found on disk.
    EnvironmentDataMissing(String),
    /// Position singularity, stepper step-size underflow, or Kepler-solver iteration cap.
    /// Carries the last good (t, state-description) pair for diagnosis.
    NumericalAbort { at_t: f64, detail: String },
    /// Tolerances unreachable within the configured max-step budget.
    IntegrationNonConvergence(String),
    /// The observer sink could not accept a sample.
    ObserverFailure(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigurationError(msg) => write!(f, "configuration error: {msg}"),
            SimError::EnvironmentDataMissing(msg) => {
                write!(f, "environment data missing: {msg}")
            }
            SimError::NumericalAbort { at_t, detail } => {
                write!(f, "numerical abort at t={at_t:.3}s: {detail}")
            }
            SimError::IntegrationNonConvergence(msg) => {
                write!(f, "integration did not converge: {msg}")
            }
            SimError::ObserverFailure(msg) => write!(f, "observer failure: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<csv::Error> for SimError {
    fn from(err: csv::Error) -> Self {
        SimError::ObserverFailure(err.to_string())
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::ObserverFailure(err.to_string())
    }
}

impl From<hifitime::errors::Errors> for SimError {
    fn from(err: hifitime::errors::Errors) -> Self {
        SimError::ConfigurationError(err.to_string())
    }
}
