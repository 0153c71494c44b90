//! CLI entry point (spec §6): parses arguments, validates them into a
//! `config::SimulationConfig`, and dispatches to a mission run or one of the three
//! verification modes.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use maglock::config::{Cli, RunMode, SimulationConfig};
use maglock::dynamics::State;
use maglock::environment::harmonic::HarmonicEnvironment;
use maglock::errors::SimError;
use maglock::integrators::Driver;
use maglock::numerics::quaternion::Quaternion;
use maglock::observers::csv_observer::CsvObserver;
use maglock::orbital::OrbitalMechanics;
use maglock::verify;

/// Recommended hysteresis verification drive (spec §4.4): large enough relative to any
/// reasonable rod coercivity to exercise the full loop.
const VERIFY_HYSTERESIS_H_MAX: f64 = 100.0;
const VERIFY_HYSTERESIS_FREQ_HZ: f64 = 1.0;
const VERIFY_HYSTERESIS_CYCLES: f64 = 2.0;
const VERIFY_HYSTERESIS_STEPS_PER_CYCLE: usize = 2000;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("maglock: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimError> {
    let cli = Cli::parse();
    let config = cli.into_config()?;

    match config.mode {
        RunMode::Mission => run_mission(config),
        RunMode::VerifyHysteresis => run_verify_hysteresis(&config),
        RunMode::VerifyOrbit => run_verify_orbit(&config),
        RunMode::VerifyAttitude => run_verify_attitude(&config),
    }
}

/// The default entry point (spec §4.9 "Initial conditions"): build (r, v) from the
/// Keplerian elements, identity attitude, the configured angular velocity, M_irr=0 for
/// every rod, then integrate full-span or checkpointed depending on whether
/// `--checkpoint-interval` was given.
fn run_mission(config: SimulationConfig) -> Result<(), SimError> {
    let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&config.elements)?;
    let y0 = State::new(
        r,
        v,
        Quaternion::identity(),
        config.initial_angular_velocity,
        vec![0.0; config.spacecraft.rod_count()],
    );

    let mut environment =
        HarmonicEnvironment::new(config.simulation_year, config.gravity_model_degree)
            .with_delta_grad(config.delta_grad);
    if let Some(table) = config.wmm_table.clone() {
        environment = environment.with_gauss_table(table);
    }
    if let Some(zonals) = config.egm_zonals {
        environment = environment.with_egm_zonals(zonals);
    }
    let driver = Driver::new(&config.spacecraft, &environment, config.settings);

    let mut observer = CsvObserver::open(
        Path::new(&config.output_path),
        config.observe_magnitudes,
        config.observe_elements,
        3,
    )?;

    match config.checkpoint_interval {
        Some(interval) => {
            driver.run_checkpointed(y0, config.t_start, config.t_end, interval, &mut observer)?;
        }
        None => {
            driver.run_full_span(y0, config.t_start, config.t_end, &mut observer)?;
        }
    }

    println!("simulation complete: {} written", config.output_path);
    Ok(())
}

fn run_verify_hysteresis(config: &SimulationConfig) -> Result<(), SimError> {
    let samples = verify::run_hysteresis_loop(
        config.hysteresis_params,
        VERIFY_HYSTERESIS_H_MAX,
        VERIFY_HYSTERESIS_FREQ_HZ,
        VERIFY_HYSTERESIS_CYCLES,
        VERIFY_HYSTERESIS_STEPS_PER_CYCLE,
    )?;
    verify::write_hysteresis_csv(Path::new(&config.output_path), &samples)?;
    println!(
        "hysteresis verification complete: {} written",
        config.output_path
    );
    Ok(())
}

fn run_verify_orbit(config: &SimulationConfig) -> Result<(), SimError> {
    let drift = verify::run_orbit_verification(
        config.elements,
        config.t_end - config.t_start,
        config.settings,
    )?;
    println!(
        "orbit verification: max relative drift of specific angular momentum = {drift:.3e}"
    );
    Ok(())
}

fn run_verify_attitude(config: &SimulationConfig) -> Result<(), SimError> {
    let inertia = config.spacecraft.inertia();
    let diag = (inertia[(0, 0)], inertia[(1, 1)], inertia[(2, 2)]);
    let drift = verify::run_attitude_verification(
        diag,
        config.initial_angular_velocity,
        config.t_end - config.t_start,
        config.settings,
    )?;
    println!("attitude verification: max relative drift of rotational energy = {drift:.3e}");
    Ok(())
}
