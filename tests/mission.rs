//! End-to-end mission integration test (spec §8 scenario S6): a 1U CubeSat with four
//! HyMu-80 rods and an N35 magnet, integrated through the full coupled dynamics functor
//! and adaptive driver against the real harmonic environment, observed to CSV.
//!
//! Grounded on the teacher's `tests/integration.rs` shape (build a spacecraft, an orbit,
//! run it, assert the run produced plausible output) generalized to this crate's
//! public API. The full two-year duration spec §8 specifies is `#[ignore]`d; the default
//! run covers a few orbits so the test suite stays fast.

use nalgebra as na;

use maglock::dynamics::State;
use maglock::environment::harmonic::HarmonicEnvironment;
use maglock::integrators::{Driver, IntegratorSettings};
use maglock::numerics::quaternion::Quaternion;
use maglock::observers::csv_observer::CsvObserver;
use maglock::orbital::{KeplerianElements, OrbitalMechanics};
use maglock::spacecraft::magnet::PermanentMagnet;
use maglock::spacecraft::rod::{HysteresisParams, HysteresisRod};
use maglock::spacecraft::Spacecraft;

fn scratch_path(name: &str) -> std::path::PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("maglock_mission_test_{name}_{}.csv", std::process::id()));
    p
}

/// Scenario S6's spacecraft: 1.3 kg 1U CubeSat, N35 magnet along +Z, four HyMu-80 rods
/// along +/-X and +/-Y.
fn s6_spacecraft() -> Spacecraft {
    let magnet = PermanentMagnet::new(1.21, 0.05, 0.01, na::Vector3::z()).unwrap();

    let hymu80 = HysteresisParams {
        m_s: 6.0e5,
        a: 6.5,
        k: 4.0,
        c: 0.05,
        alpha: 1.0e-5,
    };
    let rod_volume = 0.005 * 0.005 * std::f64::consts::PI * 0.1;
    let orientations = [
        na::Vector3::new(1.0, 0.0, 0.0),
        na::Vector3::new(-1.0, 0.0, 0.0),
        na::Vector3::new(0.0, 1.0, 0.0),
        na::Vector3::new(0.0, -1.0, 0.0),
    ];
    let rods = orientations
        .into_iter()
        .map(|u| HysteresisRod::new(rod_volume, u, hymu80).unwrap())
        .collect();

    Spacecraft::new(1.3, (0.1, 0.1, 0.1), magnet, rods).unwrap()
}

fn s6_elements() -> KeplerianElements {
    KeplerianElements {
        semi_major_axis: 6.818e6,
        eccentricity: 0.001,
        inclination: 1.3963,
        raan: 0.0,
        arg_periapsis: 0.0,
        mean_anomaly: 0.0,
    }
}

#[test]
fn s6_reduced_duration_mission_runs_and_writes_plausible_csv() {
    let spacecraft = s6_spacecraft();
    let elements = s6_elements();
    let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements).unwrap();

    let y0 = State::new(
        r,
        v,
        Quaternion::identity(),
        na::Vector3::new(0.23, -0.23, 0.0),
        vec![0.0; spacecraft.rod_count()],
    );

    let environment = HarmonicEnvironment::new(2025.0, 4);
    let driver = Driver::new(&spacecraft, &environment, IntegratorSettings::default());

    let path = scratch_path("s6_reduced");
    let mut observer = CsvObserver::open(&path, true, true, 3).unwrap();

    // A few orbital periods rather than the full two-year S6 duration (see
    // `s6_full_two_year_mission` below for that).
    let three_orbits = 3.0 * OrbitalMechanics::compute_orbital_period(elements.semi_major_axis);
    let y_final = driver
        .run_full_span(y0, 0.0, three_orbits, &mut observer)
        .unwrap();

    assert!(y_final.q.norm() > 0.99 && y_final.q.norm() < 1.01);
    assert!(y_final.r.magnitude() > 6.0e6 && y_final.r.magnitude() < 8.0e6);

    let contents = std::fs::read_to_string(&path).unwrap();
    let rows = contents.lines().count();
    assert!(rows > 2, "expected at least one observed row beyond the header");
    std::fs::remove_file(&path).ok();
}

#[test]
#[ignore = "covers the full two-year S6 duration; run explicitly with --ignored"]
fn s6_full_two_year_mission() {
    let spacecraft = s6_spacecraft();
    let elements = s6_elements();
    let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements).unwrap();

    let y0 = State::new(
        r,
        v,
        Quaternion::identity(),
        na::Vector3::new(0.23, -0.23, 0.0),
        vec![0.0; spacecraft.rod_count()],
    );

    let environment = HarmonicEnvironment::new(2025.0, 4);
    let driver = Driver::new(&spacecraft, &environment, IntegratorSettings::default());

    let path = scratch_path("s6_full");
    let mut observer = CsvObserver::open(&path, true, true, 3).unwrap();

    let two_years = 2.0 * 365.25 * 86_400.0;
    let checkpoint_interval = 3600.0;
    let y_final = driver
        .run_checkpointed(y0, 0.0, two_years, checkpoint_interval, &mut observer)
        .unwrap();

    assert!((y_final.q.norm() - 1.0).abs() < 1e-9);
    std::fs::remove_file(&path).ok();
}

#[test]
fn checkpointed_and_full_span_modes_agree_on_a_short_run() {
    // Spec §4.9: checkpointing restores invariants at slice boundaries but should not
    // meaningfully change the trajectory on a run short enough that those restorations
    // barely matter.
    let spacecraft = s6_spacecraft();
    let elements = s6_elements();
    let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements).unwrap();
    let omega0 = na::Vector3::new(0.05, 0.02, -0.01);

    let settings = IntegratorSettings::default();
    let environment = HarmonicEnvironment::new(2025.0, 4);
    let driver = Driver::new(&spacecraft, &environment, settings);

    let y0_full = State::new(
        r,
        v,
        Quaternion::identity(),
        omega0,
        vec![0.0; spacecraft.rod_count()],
    );
    let y0_checkpointed = y0_full.clone();

    let path_full = scratch_path("agree_full");
    let path_checkpointed = scratch_path("agree_checkpointed");
    let mut obs_full = CsvObserver::open(&path_full, true, true, 10).unwrap();
    let mut obs_checkpointed = CsvObserver::open(&path_checkpointed, true, true, 10).unwrap();

    let span = 120.0;
    let y_full = driver.run_full_span(y0_full, 0.0, span, &mut obs_full).unwrap();
    let y_checkpointed = driver
        .run_checkpointed(y0_checkpointed, 0.0, span, 30.0, &mut obs_checkpointed)
        .unwrap();

    assert!((y_full.r - y_checkpointed.r).magnitude() / y_full.r.magnitude() < 1e-6);
    std::fs::remove_file(&path_full).ok();
    std::fs::remove_file(&path_checkpointed).ok();
}
