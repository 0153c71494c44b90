//! Validates `Cli` into the immutable construction types components C2/C4/C5/C6/C9
//! require, per spec §7's `ConfigurationError` contract. Grounded on the validation shape
//! already present in `spacecraft::Spacecraft::new`/`PermanentMagnet::new`/
//! `HysteresisRod::new` — this module is the single place that turns raw strings/floats
//! into those constructors' arguments, so CLI-shaped errors surface before any
//! integration begins (spec §7: "Reported, fatal, no integration begins").

use nalgebra as na;

use crate::errors::SimError;
use crate::integrators::IntegratorSettings;
use crate::orbital::KeplerianElements;
use crate::spacecraft::magnet::PermanentMagnet;
use crate::spacecraft::rod::{HysteresisParams, HysteresisRod};
use crate::spacecraft::Spacecraft;

use super::cli::Cli;

/// Which entry point `main` dispatches to (spec §6 "Modes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Mission,
    VerifyHysteresis,
    VerifyOrbit,
    VerifyAttitude,
}

/// Fully validated, ready-to-run configuration (spec §3 "Spacecraft parameters" /
/// "Keplerian elements", assembled from CLI input).
pub struct SimulationConfig {
    pub mode: RunMode,
    pub spacecraft: Spacecraft,
    pub hysteresis_params: HysteresisParams,
    pub elements: KeplerianElements,
    pub initial_angular_velocity: na::Vector3<f64>,
    pub settings: IntegratorSettings,
    pub simulation_year: f64,
    pub gravity_model_degree: usize,
    pub delta_grad: f64,
    pub t_start: f64,
    pub t_end: f64,
    pub checkpoint_interval: Option<f64>,
    pub output_path: String,
    pub observe_magnitudes: bool,
    pub observe_elements: bool,
    /// Loaded on-disk WMM override, if one was found (spec ADD 4.1.1).
    pub wmm_table: Option<Vec<(f64, f64, f64, f64)>>,
    /// Loaded on-disk EGM zonal override, if one was found (spec ADD 4.1.1).
    pub egm_zonals: Option<(f64, f64, f64)>,
}

/// Parses "x,y,z" into a `Vector3`, used for `--angular-velocity` and
/// `--rod-orientation` (spec §6).
fn parse_vector3(s: &str, field: &str) -> Result<na::Vector3<f64>, SimError> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(SimError::ConfigurationError(format!(
            "{field} must be \"x,y,z\", got \"{s}\""
        )));
    }
    let mut components = [0.0; 3];
    for (i, part) in parts.iter().enumerate() {
        components[i] = part.trim().parse::<f64>().map_err(|_| {
            SimError::ConfigurationError(format!("{field} component \"{part}\" is not a number"))
        })?;
    }
    Ok(na::Vector3::new(components[0], components[1], components[2]))
}

/// Scenario S6's four default rod orientations, used when `--rod-orientation` is omitted
/// and `--no-rods` is absent (spec §6, SPEC_FULL.md §3 "Configuration ergonomics").
fn default_rod_orientations() -> Vec<na::Vector3<f64>> {
    vec![
        na::Vector3::new(1.0, 0.0, 0.0),
        na::Vector3::new(-1.0, 0.0, 0.0),
        na::Vector3::new(0.0, 1.0, 0.0),
        na::Vector3::new(0.0, -1.0, 0.0),
    ]
}

impl Cli {
    pub fn into_config(self) -> Result<SimulationConfig, SimError> {
        let mode_flags = [
            self.verify_hysteresis,
            self.verify_orbit,
            self.verify_attitude,
        ];
        if mode_flags.iter().filter(|&&f| f).count() > 1 {
            return Err(SimError::ConfigurationError(
                "--verify-hysteresis, --verify-orbit, and --verify-attitude are mutually exclusive".into(),
            ));
        }
        let mode = if self.verify_hysteresis {
            RunMode::VerifyHysteresis
        } else if self.verify_orbit {
            RunMode::VerifyOrbit
        } else if self.verify_attitude {
            RunMode::VerifyAttitude
        } else {
            RunMode::Mission
        };

        let mass_kg = self.mass / 1000.0;
        let magnet = PermanentMagnet::new(
            self.magnet_remanence,
            self.magnet_length,
            self.magnet_diameter,
            na::Vector3::z(),
        )?;

        let hysteresis_params = HysteresisParams {
            m_s: self.hysteresis_ms,
            a: self.hysteresis_a,
            k: self.hysteresis_k,
            c: self.hysteresis_c,
            alpha: self.hysteresis_alpha,
        };
        hysteresis_params.validate()?;

        let rods = if self.no_rods {
            vec![]
        } else {
            let orientations = if self.rod_orientations.is_empty() {
                default_rod_orientations()
            } else {
                self.rod_orientations
                    .iter()
                    .map(|s| parse_vector3(s, "--rod-orientation"))
                    .collect::<Result<Vec<_>, _>>()?
            };
            orientations
                .into_iter()
                .map(|u| HysteresisRod::new(self.rod_volume, u, hysteresis_params))
                .collect::<Result<Vec<_>, _>>()?
        };

        let spacecraft = Spacecraft::new(mass_kg, (self.width, self.height, self.length), magnet, rods)?;

        let elements = KeplerianElements {
            semi_major_axis: self.orbit_semi_major_axis,
            eccentricity: self.orbit_eccentricity,
            inclination: self.orbit_inclination,
            raan: self.orbit_raan,
            arg_periapsis: self.orbit_arg_periapsis,
            mean_anomaly: self.orbit_mean_anomaly,
        };
        if !(0.0..1.0).contains(&elements.eccentricity) {
            return Err(SimError::ConfigurationError(
                "orbit eccentricity must lie in [0, 1)".into(),
            ));
        }
        if elements.semi_major_axis <= 0.0 {
            return Err(SimError::ConfigurationError(
                "orbit semi-major axis must be positive".into(),
            ));
        }

        let initial_angular_velocity = parse_vector3(&self.angular_velocity, "--angular-velocity")?;

        if self.t_end < self.t_start {
            return Err(SimError::ConfigurationError(
                "--t-end must not precede --t-start".into(),
            ));
        }
        if let Some(ckpt) = self.checkpoint_interval {
            if ckpt < 1.0 {
                return Err(SimError::ConfigurationError(
                    "--checkpoint-interval must be >= 1 s".into(),
                ));
            }
        }
        if self.delta_grad <= 0.0 {
            return Err(SimError::ConfigurationError(
                "--delta-grad must be positive".into(),
            ));
        }

        let wmm_table = crate::environment::coefficients::load_wmm_table(
            self.wmm_path.as_deref().map(std::path::Path::new),
            self.require_external_models,
        )?;
        let egm_zonals = crate::environment::coefficients::load_egm_zonals(
            self.egm_path.as_deref().map(std::path::Path::new),
            self.require_external_models,
        )?;

        let span = (self.t_end - self.t_start).max(1.0);
        let settings = IntegratorSettings {
            abs_tolerance: self.absolute_error,
            rel_tolerance: self.relative_error,
            higher_order: self.higher_order,
            initial_dt: self.dt,
            max_steps: (crate::constants::DEFAULT_MAX_STEPS_PER_SECOND * span) as u64,
        };

        Ok(SimulationConfig {
            mode,
            spacecraft,
            hysteresis_params,
            elements,
            initial_angular_velocity,
            settings,
            simulation_year: self.simulation_year,
            gravity_model_degree: self.gravity_model_degree,
            delta_grad: self.delta_grad,
            t_start: self.t_start,
            t_end: self.t_end,
            checkpoint_interval: self.checkpoint_interval,
            output_path: self.output,
            observe_magnitudes: !self.no_observe_magnitude,
            observe_elements: !self.no_observe_element,
            wmm_table,
            egm_zonals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["maglock"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn default_cli_builds_a_valid_config() {
        let cfg = parse(&[]).into_config().unwrap();
        assert_eq!(cfg.mode, RunMode::Mission);
        assert_eq!(cfg.spacecraft.rod_count(), 4);
    }

    #[test]
    fn no_rods_overrides_default_orientations() {
        let cfg = parse(&["--no-rods"]).into_config().unwrap();
        assert_eq!(cfg.spacecraft.rod_count(), 0);
    }

    #[test]
    fn explicit_rod_orientations_are_parsed() {
        let cfg = parse(&[
            "--rod-orientation",
            "1,0,0",
            "--rod-orientation",
            "0,1,0",
        ])
        .into_config()
        .unwrap();
        assert_eq!(cfg.spacecraft.rod_count(), 2);
    }

    #[test]
    fn malformed_angular_velocity_is_a_configuration_error() {
        let err = parse(&["--angular-velocity", "not-a-vector"]).into_config();
        assert!(matches!(err, Err(SimError::ConfigurationError(_))));
    }

    #[test]
    fn conflicting_verify_modes_are_rejected() {
        let err = parse(&["--verify-hysteresis", "--verify-orbit"]).into_config();
        assert!(matches!(err, Err(SimError::ConfigurationError(_))));
    }

    #[test]
    fn eccentricity_out_of_range_is_rejected() {
        let err = parse(&["--orbit-eccentricity", "1.0"]).into_config();
        assert!(matches!(err, Err(SimError::ConfigurationError(_))));
    }

    #[test]
    fn non_positive_delta_grad_is_rejected() {
        let err = parse(&["--delta-grad", "0.0"]).into_config();
        assert!(matches!(err, Err(SimError::ConfigurationError(_))));
    }

    #[test]
    fn delta_grad_defaults_to_one_second() {
        let cfg = parse(&[]).into_config().unwrap();
        assert_eq!(cfg.delta_grad, 1.0);
    }

    #[test]
    fn missing_external_models_is_fine_without_the_require_flag() {
        let cfg = parse(&["--wmm-path", "/no/such/file.cof"]).into_config().unwrap();
        assert!(cfg.wmm_table.is_none());
    }

    #[test]
    fn require_external_models_without_a_bundle_is_rejected() {
        let err = parse(&["--wmm-path", "/no/such/file.cof", "--require-external-models"])
            .into_config();
        assert!(matches!(err, Err(SimError::EnvironmentDataMissing(_))));
    }
}
