//! Command-line surface (spec §6's "collaborator contract"), built with `clap`'s derive
//! API. The teacher repo has no argument surface at all (`main.rs` inlines one fixed
//! scenario); this generalizes that entry point into the flag table spec §6 specifies.
//! Defaults throughout reproduce scenario S6 (spec §8: 1U CubeSat, HyMu-80 rods, N35
//! magnet) so a bare invocation runs a representative mission.

use clap::Parser;

/// Passive magnetic attitude/orbit control system simulator.
#[derive(Debug, Parser)]
#[command(name = "maglock", version, about)]
pub struct Cli {
    /// CSV destination; parent directories are created on demand.
    #[arg(long, default_value = "output/simulation.csv")]
    pub output: String,

    /// Spacecraft mass, grams.
    #[arg(long, default_value_t = 1300.0)]
    pub mass: f64,
    /// Spacecraft width (X dimension), meters.
    #[arg(long, default_value_t = 0.1)]
    pub width: f64,
    /// Spacecraft height (Y dimension), meters.
    #[arg(long, default_value_t = 0.1)]
    pub height: f64,
    /// Spacecraft length (Z dimension), meters.
    #[arg(long, default_value_t = 0.1)]
    pub length: f64,

    /// Permanent magnet remanence, tesla. Orientation is fixed along the body +Z axis.
    #[arg(long = "magnet-remanence", default_value_t = 1.21)]
    pub magnet_remanence: f64,
    /// Permanent magnet length, meters.
    #[arg(long = "magnet-length", default_value_t = 0.05)]
    pub magnet_length: f64,
    /// Permanent magnet diameter, meters.
    #[arg(long = "magnet-diameter", default_value_t = 0.01)]
    pub magnet_diameter: f64,

    /// Shared hysteresis rod volume, cubic meters.
    #[arg(long = "rod-volume", default_value_t = 0.005 * 0.005 * std::f64::consts::PI * 0.1)]
    pub rod_volume: f64,
    /// Body-frame rod orientation "x,y,z"; repeatable. Defaults to four rods along
    /// +/-X and +/-Y (scenario S6) when none are given and `--no-rods` is absent.
    #[arg(long = "rod-orientation")]
    pub rod_orientations: Vec<String>,
    /// Disables all hysteresis rods regardless of `--rod-orientation`.
    #[arg(long = "no-rods", action = clap::ArgAction::SetTrue)]
    pub no_rods: bool,

    /// Jiles-Atherton saturation magnetization, A/m.
    #[arg(long = "hysteresis-ms", default_value_t = 6.0e5)]
    pub hysteresis_ms: f64,
    /// Jiles-Atherton domain-wall shape parameter, A/m.
    #[arg(long = "hysteresis-a", default_value_t = 6.5)]
    pub hysteresis_a: f64,
    /// Jiles-Atherton coercivity-like parameter, A/m.
    #[arg(long = "hysteresis-k", default_value_t = 4.0)]
    pub hysteresis_k: f64,
    /// Jiles-Atherton reversibility fraction, in [0, 1].
    #[arg(long = "hysteresis-c", default_value_t = 0.05)]
    pub hysteresis_c: f64,
    /// Jiles-Atherton inter-domain coupling coefficient.
    #[arg(long = "hysteresis-alpha", default_value_t = 1.0e-5)]
    pub hysteresis_alpha: f64,

    /// Orbit semi-major axis, meters.
    #[arg(long = "orbit-semi-major-axis", default_value_t = 6.818e6)]
    pub orbit_semi_major_axis: f64,
    /// Orbit eccentricity, in [0, 1).
    #[arg(long = "orbit-eccentricity", default_value_t = 0.001)]
    pub orbit_eccentricity: f64,
    /// Orbit inclination, radians.
    #[arg(long = "orbit-inclination", default_value_t = 1.3963)]
    pub orbit_inclination: f64,
    /// Orbit right ascension of ascending node, radians.
    #[arg(long = "orbit-raan", default_value_t = 0.0)]
    pub orbit_raan: f64,
    /// Orbit argument of periapsis, radians.
    #[arg(long = "orbit-arg-periapsis", default_value_t = 0.0)]
    pub orbit_arg_periapsis: f64,
    /// Orbit mean anomaly at t=0, radians.
    #[arg(long = "orbit-mean-anomaly", default_value_t = 0.0)]
    pub orbit_mean_anomaly: f64,

    /// Initial body angular velocity "x,y,z", rad/s.
    #[arg(long = "angular-velocity", default_value = "0.23,-0.23,0.0")]
    pub angular_velocity: String,

    /// Decimal-year epoch at t=0, for the geomagnetic secular-variation model.
    #[arg(long = "simulation-year", default_value_t = 2025.0)]
    pub simulation_year: f64,
    /// Gravity harmonic degree (0 = point mass, up to 4).
    #[arg(long = "gravity-model-degree", default_value_t = 4)]
    pub gravity_model_degree: usize,
    /// Micro-step for the environment's forward-difference material derivative of B,
    /// seconds (spec §4.1 "recommended 1 s").
    #[arg(long = "delta-grad", default_value_t = 1.0)]
    pub delta_grad: f64,
    /// Simulation start time, seconds since epoch.
    #[arg(long = "t-start", default_value_t = 0.0)]
    pub t_start: f64,
    /// Simulation end time, seconds since epoch.
    #[arg(long = "t-end", default_value_t = 6.3072e7)]
    pub t_end: f64,
    /// Initial stepper trial step size, seconds.
    #[arg(long = "dt", default_value_t = 1.0)]
    pub dt: f64,
    /// Adaptive stepper absolute tolerance.
    #[arg(long = "absolute-error", default_value_t = 1e-6)]
    pub absolute_error: f64,
    /// Adaptive stepper relative tolerance.
    #[arg(long = "relative-error", default_value_t = 1e-6)]
    pub relative_error: f64,
    /// Use the Fehlberg 7(8) embedded pair instead of Dormand-Prince 5(4).
    #[arg(long = "higher-order", action = clap::ArgAction::SetTrue)]
    pub higher_order: bool,
    /// Checkpoint interval, seconds; omit for full-span (every-accepted-step) emission.
    #[arg(long = "checkpoint-interval")]
    pub checkpoint_interval: Option<f64>,

    /// Suppress the 13 component columns (r,v,q,w) in the CSV output.
    #[arg(long = "no-observe-element", action = clap::ArgAction::SetTrue)]
    pub no_observe_element: bool,
    /// Suppress the r,v,w magnitude columns in the CSV output.
    #[arg(long = "no-observe-magnitude", action = clap::ArgAction::SetTrue)]
    pub no_observe_magnitude: bool,

    /// Run the isolated B-H hysteresis loop verification mode instead of a mission.
    #[arg(long = "verify-hysteresis", action = clap::ArgAction::SetTrue)]
    pub verify_hysteresis: bool,
    /// Run the pure-orbit verification sub-driver instead of a mission.
    #[arg(long = "verify-orbit", action = clap::ArgAction::SetTrue)]
    pub verify_orbit: bool,
    /// Run the pure-attitude verification sub-driver instead of a mission.
    #[arg(long = "verify-attitude", action = clap::ArgAction::SetTrue)]
    pub verify_attitude: bool,

    /// Path to an on-disk WMM Gauss-coefficient bundle; falls back to
    /// `dirs::data_dir()/maglock/wmm.cof`, then the built-in table (spec ADD 4.1.1).
    #[arg(long = "wmm-path")]
    pub wmm_path: Option<String>,
    /// Path to an on-disk EGM zonal-coefficient bundle ("J2 J3 J4"); falls back to
    /// `dirs::data_dir()/maglock/egm.cof`, then the built-in EGM96 constants.
    #[arg(long = "egm-path")]
    pub egm_path: Option<String>,
    /// Turn a missing WMM/EGM bundle into a configuration error instead of silently
    /// using the built-in fallback tables.
    #[arg(long = "require-external-models", action = clap::ArgAction::SetTrue)]
    pub require_external_models: bool,
}
