//! CSV emission (spec §6, §4.10 ADD): the external collaborator wired up against the
//! `Observer` contract. Column layout: `time`, optionally `r,v,w` magnitudes, optionally
//! the 13 component columns, then `M_1..M_N`.
//!
//! Grounded on the teacher's `csv::Writer` usage in `main.rs`/`tests/integration.rs`
//! (directory auto-creation, `Writer::from_writer`), generalized to the column-toggle and
//! fixed-point formatting spec §6 requires.

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::dynamics::State;
use crate::errors::SimError;

use super::Observer;

pub struct CsvObserver {
    writer: Writer<File>,
    observe_magnitudes: bool,
    observe_elements: bool,
    decimals: usize,
    header_written: bool,
}

impl CsvObserver {
    /// Opens `path` for writing, creating parent directories on demand (spec §6). Column
    /// toggles mirror `--no-observe-magnitude`/`--no-observe-element`; `decimals` is 3 by
    /// default, 10 for the "higher precision" option spec §6 allows.
    pub fn open(
        path: &Path,
        observe_magnitudes: bool,
        observe_elements: bool,
        decimals: usize,
    ) -> Result<Self, SimError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: Writer::from_writer(file),
            observe_magnitudes,
            observe_elements,
            decimals,
            header_written: false,
        })
    }

    fn write_header(&mut self, rod_count: usize) -> Result<(), SimError> {
        let mut cols = vec!["time".to_string()];
        if self.observe_magnitudes {
            cols.extend(["r".to_string(), "v".to_string(), "w".to_string()]);
        }
        if self.observe_elements {
            cols.extend(
                [
                    "r_x", "r_y", "r_z", "v_x", "v_y", "v_z", "q_w", "q_x", "q_y", "q_z", "w_x",
                    "w_y", "w_z",
                ]
                .map(String::from),
            );
        }
        for i in 1..=rod_count {
            cols.push(format!("M_{i}"));
        }
        self.writer.write_record(&cols)?;
        self.header_written = true;
        Ok(())
    }

    fn fmt(&self, x: f64) -> String {
        format!("{:.*}", self.decimals, x)
    }
}

impl Observer for CsvObserver {
    fn observe(&mut self, t_global: f64, y: &State) -> Result<(), SimError> {
        if !self.header_written {
            self.write_header(y.rod_count())?;
        }

        let mut row = vec![self.fmt(t_global)];
        if self.observe_magnitudes {
            row.push(self.fmt(y.r.magnitude()));
            row.push(self.fmt(y.v.magnitude()));
            row.push(self.fmt(y.omega.magnitude()));
        }
        if self.observe_elements {
            row.extend([
                self.fmt(y.r.x),
                self.fmt(y.r.y),
                self.fmt(y.r.z),
                self.fmt(y.v.x),
                self.fmt(y.v.y),
                self.fmt(y.v.z),
                self.fmt(y.q.scalar()),
                self.fmt(y.q.vector().x),
                self.fmt(y.q.vector().y),
                self.fmt(y.q.vector().z),
                self.fmt(y.omega.x),
                self.fmt(y.omega.y),
                self.fmt(y.omega.z),
            ]);
        }
        for &m in &y.m_irr {
            row.push(self.fmt(m));
        }

        self.writer.write_record(&row)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::quaternion::Quaternion;
    use nalgebra as na;
    use tempfile_free_tests::*;

    // Minimal scratch-dir helper so this test doesn't depend on a `tempfile` dev-dep the
    // teacher never carries.
    mod tempfile_free_tests {
        use std::path::PathBuf;

        pub fn scratch_path(name: &str) -> PathBuf {
            let mut p = std::env::temp_dir();
            p.push(format!("maglock_csv_observer_test_{name}_{}.csv", std::process::id()));
            p
        }
    }

    #[test]
    fn header_and_rows_match_requested_columns() {
        let path = scratch_path("basic");
        let mut obs = CsvObserver::open(&path, true, false, 3).unwrap();
        let y = State::new(
            na::Vector3::new(1.0, 0.0, 0.0),
            na::Vector3::new(0.0, 1.0, 0.0),
            Quaternion::identity(),
            na::Vector3::zeros(),
            vec![10.0],
        );
        obs.observe(0.0, &y).unwrap();
        obs.observe(1.0, &y).unwrap();
        drop(obs);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "time,r,v,w,M_1");
        assert_eq!(lines.next().unwrap(), "0.000,1.000,1.000,0.000,10.000");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn creates_parent_directories() {
        let mut path = std::env::temp_dir();
        path.push(format!("maglock_csv_observer_test_nested_{}", std::process::id()));
        path.push("out.csv");
        let y = State::new(
            na::Vector3::zeros(),
            na::Vector3::zeros(),
            Quaternion::identity(),
            na::Vector3::zeros(),
            vec![],
        );
        let mut obs = CsvObserver::open(&path, false, false, 3).unwrap();
        obs.observe(0.0, &y).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
