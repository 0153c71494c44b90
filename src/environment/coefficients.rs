//! Built-in Gauss-coefficient table for the geomagnetic harmonic model (spec §4.1 ADD
//! 4.1.1), degree <= 3, epoch 2020.0, with linear secular-variation terms. Values are the
//! IGRF-13 main-field coefficients and their 2020-2025 predictive secular variation (nT,
//! nT/yr) truncated to the degree this crate carries; used only as the fallback when no
//! on-disk WMM bundle is configured (see `harmonic::HarmonicEnvironment::new`).
//!
//! Indexed by the same flat triangular scheme as `legendre::index` (`n*(n+1)/2 + m`).

/// `(g, h, g_dot, h_dot)` at index `n*(n+1)/2 + m`. Index 0 (n=0) is unused (always zero).
pub const GAUSS_COEFFICIENTS: &[(f64, f64, f64, f64)] = &[
    (0.0, 0.0, 0.0, 0.0),         // n=0, m=0 (unused)
    (-29404.8, 0.0, 5.7, 0.0),    // n=1, m=0
    (-1450.9, 4652.5, 7.4, -25.9), // n=1, m=1
    (-2499.6, 0.0, -11.0, 0.0),   // n=2, m=0
    (2982.0, -2991.6, -7.0, -30.2), // n=2, m=1
    (1677.0, -734.6, -2.1, -22.4), // n=2, m=2
    (1363.2, 0.0, 2.2, 0.0),      // n=3, m=0
    (-2381.2, -82.1, -5.9, 6.0),  // n=3, m=1
    (1236.2, 241.9, 3.1, -1.1),   // n=3, m=2
    (525.7, -543.4, -12.0, 0.5),  // n=3, m=3
];

/// `(g, h)` at epoch-decimal-year `y0`, nT, linearly extrapolated from `GEOMAG_EPOCH_YEAR`,
/// reading from `table` (either `GAUSS_COEFFICIENTS` or a loaded on-disk bundle).
pub fn coefficient_at_in(table: &[(f64, f64, f64, f64)], n: usize, m: usize, decimal_year: f64) -> (f64, f64) {
    use crate::constants::GEOMAG_EPOCH_YEAR;
    let idx = n * (n + 1) / 2 + m;
    let (g0, h0, g_dot, h_dot) = table[idx];
    let dy = decimal_year - GEOMAG_EPOCH_YEAR;
    (g0 + g_dot * dy, h0 + h_dot * dy)
}

/// Parses an on-disk coefficient bundle: one `n m g h g_dot h_dot` record per line,
/// whitespace-separated, `#`-prefixed comments and blank lines ignored. Indexed by the
/// same flat triangular scheme as `GAUSS_COEFFICIENTS`, sized to `GEOMAG_DEGREE` (spec §6
/// "Required external geomagnetic/gravity data": the core consumes a conventional
/// system-path data file but does not define or ship one, so this accepts the simplest
/// format that carries the Gauss coefficients the harmonic synthesis needs).
pub fn parse_bundle(contents: &str) -> Result<Vec<(f64, f64, f64, f64)>, crate::errors::SimError> {
    use crate::constants::GEOMAG_DEGREE;

    let mut table = GAUSS_COEFFICIENTS.to_vec();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(crate::errors::SimError::EnvironmentDataMissing(format!(
                "coefficient bundle line {}: expected 6 fields \"n m g h g_dot h_dot\", got {}",
                lineno + 1,
                fields.len()
            )));
        }
        let parse = |s: &str| -> Result<f64, crate::errors::SimError> {
            s.parse::<f64>().map_err(|_| {
                crate::errors::SimError::EnvironmentDataMissing(format!(
                    "coefficient bundle line {}: \"{s}\" is not a number",
                    lineno + 1
                ))
            })
        };
        let n: usize = fields[0].parse().map_err(|_| {
            crate::errors::SimError::EnvironmentDataMissing(format!(
                "coefficient bundle line {}: \"{}\" is not a valid degree",
                lineno + 1,
                fields[0]
            ))
        })?;
        let m: usize = fields[1].parse().map_err(|_| {
            crate::errors::SimError::EnvironmentDataMissing(format!(
                "coefficient bundle line {}: \"{}\" is not a valid order",
                lineno + 1,
                fields[1]
            ))
        })?;
        if n > GEOMAG_DEGREE || m > n {
            continue; // higher degree/order than this build carries; ignore silently
        }
        let idx = n * (n + 1) / 2 + m;
        table[idx] = (parse(fields[2])?, parse(fields[3])?, parse(fields[4])?, parse(fields[5])?);
    }
    Ok(table)
}

/// Locates a coefficient bundle: an explicit CLI path if given, else
/// `dirs::data_dir()/maglock/<filename>` (spec §6's "conventional system path"), else
/// `None` if neither exists.
pub fn locate_bundle(explicit: Option<&std::path::Path>, filename: &str) -> Option<std::path::PathBuf> {
    if let Some(p) = explicit {
        if p.exists() {
            return Some(p.to_path_buf());
        }
        return None;
    }
    let conventional = dirs::data_dir()?.join("maglock").join(filename);
    conventional.exists().then_some(conventional)
}

/// Loads and parses the on-disk WMM Gauss-coefficient bundle if one can be located, per
/// `--wmm-path`/`dirs::data_dir()` (spec ADD 4.1.1). `require` turns a missing file into
/// `SimError::EnvironmentDataMissing` instead of the silent built-in fallback.
pub fn load_wmm_table(
    explicit: Option<&std::path::Path>,
    require: bool,
) -> Result<Option<Vec<(f64, f64, f64, f64)>>, crate::errors::SimError> {
    match locate_bundle(explicit, "wmm.cof") {
        Some(path) => {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                crate::errors::SimError::EnvironmentDataMissing(format!(
                    "could not read WMM bundle {}: {e}",
                    path.display()
                ))
            })?;
            Ok(Some(parse_bundle(&contents)?))
        }
        None if require => Err(crate::errors::SimError::EnvironmentDataMissing(
            "--require-external-models was given but no WMM bundle was found (checked --wmm-path and the conventional data directory)".into(),
        )),
        None => Ok(None),
    }
}

/// The three zonal gravity coefficients `(J2, J3, J4)`, one line `j2 j3 j4`
/// whitespace-separated, `#` comments and blank lines ignored (first data line wins).
pub fn parse_egm_bundle(contents: &str) -> Result<(f64, f64, f64), crate::errors::SimError> {
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(crate::errors::SimError::EnvironmentDataMissing(format!(
                "EGM bundle line {}: expected 3 fields \"J2 J3 J4\", got {}",
                lineno + 1,
                fields.len()
            )));
        }
        let parse = |s: &str| -> Result<f64, crate::errors::SimError> {
            s.parse::<f64>().map_err(|_| {
                crate::errors::SimError::EnvironmentDataMissing(format!(
                    "EGM bundle line {}: \"{s}\" is not a number",
                    lineno + 1
                ))
            })
        };
        return Ok((parse(fields[0])?, parse(fields[1])?, parse(fields[2])?));
    }
    Err(crate::errors::SimError::EnvironmentDataMissing(
        "EGM bundle contains no data line".into(),
    ))
}

/// Loads and parses the on-disk EGM zonal bundle if one can be located, per
/// `--egm-path`/`dirs::data_dir()` (spec ADD 4.1.1).
pub fn load_egm_zonals(
    explicit: Option<&std::path::Path>,
    require: bool,
) -> Result<Option<(f64, f64, f64)>, crate::errors::SimError> {
    match locate_bundle(explicit, "egm.cof") {
        Some(path) => {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                crate::errors::SimError::EnvironmentDataMissing(format!(
                    "could not read EGM bundle {}: {e}",
                    path.display()
                ))
            })?;
            Ok(Some(parse_egm_bundle(&contents)?))
        }
        None if require => Err(crate::errors::SimError::EnvironmentDataMissing(
            "--require-external-models was given but no EGM bundle was found (checked --egm-path and the conventional data directory)".into(),
        )),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bundle_overrides_only_named_entries() {
        let table = parse_bundle("# comment\n1 0 -29000.0 0.0 5.0 0.0\n").unwrap();
        assert_eq!(table[1], (-29000.0, 0.0, 5.0, 0.0));
        assert_eq!(table[2], GAUSS_COEFFICIENTS[2]);
    }

    #[test]
    fn parse_bundle_rejects_malformed_line() {
        assert!(parse_bundle("1 0 notanumber 0.0 5.0 0.0\n").is_err());
    }

    #[test]
    fn parse_egm_bundle_reads_first_data_line() {
        let zonals = parse_egm_bundle("# header\n1.08e-3 -2.5e-6 -1.6e-6\n").unwrap();
        assert_eq!(zonals, (1.08e-3, -2.5e-6, -1.6e-6));
    }
}
