/// Earth's standard gravitational parameter (m^3/s^2); spec-mandated value (§4.2).
pub const EARTH_MU: f64 = 3.986004418e14;

// Environmental constants
pub const MU_0: f64 = 4.0 * std::f64::consts::PI * 1e-7; // Vacuum permeability
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.2921150e-5; // Earth's rotation rate (rad/s)
pub const WGS84_A: f64 = 6378137.0; // Semi-major axis [m]
pub const WGS84_F: f64 = 1.0 / 298.257223563; // Flattening
pub const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0; // Julian year

// Environment model numerics
pub const DEFAULT_DELTA_GRAD: f64 = 1.0; // micro-step for material derivative of B (s)
pub const POSITION_SINGULARITY_RADIUS: f64 = 1e-6; // m, below which environment aborts

// Jiles-Atherton hysteresis numerics (§4.4)
pub const HYSTERESIS_DHDT_EPSILON: f64 = 1e-9; // static-field suppression floor (A/m/s)
pub const HYSTERESIS_DENOM_EPSILON: f64 = 1e-9; // irreversible susceptibility denom floor
pub const HYSTERESIS_CAUSALITY_EPSILON: f64 = 1e-12; // causality-clamp tolerance
pub const HYSTERESIS_K_FLOOR: f64 = 1e-6; // floor on k when capping chi_irr
pub const LANGEVIN_TAYLOR_THRESHOLD: f64 = 1e-6; // |x| below which Taylor branch is used

// Adaptive integrator defaults
pub const DEFAULT_ABS_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_REL_TOLERANCE: f64 = 1e-6;
pub const MIN_STEP_SIZE: f64 = 1e-9;
pub const DEFAULT_MAX_STEPS_PER_SECOND: f64 = 1000.0;

// Environment harmonic models (§4.1)
pub const GEOMAG_REFERENCE_RADIUS: f64 = 6_371_200.0; // IGRF reference radius (m)
pub const GEOMAG_DEGREE: usize = 3; // built-in Gauss-coefficient truncation
pub const GEOMAG_EPOCH_YEAR: f64 = 2020.0; // epoch of the built-in coefficient table
pub const EGM96_J2: f64 = 1.082_626_68e-3; // unnormalized J2 zonal coefficient
pub const EGM96_J3: f64 = -2.5327e-6;
pub const EGM96_J4: f64 = -1.6196e-6;
pub const GEOMAG_YEAR_MIN: f64 = 1900.0;
pub const GEOMAG_YEAR_MAX: f64 = 2100.0;

// Math
pub const PI: f64 = std::f64::consts::PI;
