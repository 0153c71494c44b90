//! Schmidt quasi-normalized associated Legendre functions, for the geomagnetic harmonic
//! synthesis in `harmonic.rs`. Grounded on the standard IGRF recursion (Davis, "Mathematical
//! modeling of Earth's magnetic field"); the quasi-normalization table is computed once via
//! `lazy_static` since it depends only on (n, m), not on the evaluation point.

use lazy_static::lazy_static;

use crate::constants::GEOMAG_DEGREE;

const N: usize = GEOMAG_DEGREE;

fn index(n: usize, m: usize) -> usize {
    n * (n + 1) / 2 + m
}

lazy_static! {
    static ref SCHMIDT_NORM: Vec<f64> = compute_schmidt_norm(N);
}

fn compute_schmidt_norm(n_max: usize) -> Vec<f64> {
    let mut s = vec![0.0; index(n_max, n_max) + 1];
    s[index(0, 0)] = 1.0;
    for n in 1..=n_max {
        s[index(n, 0)] = s[index(n - 1, 0)] * (2 * n - 1) as f64 / n as f64;
        for m in 1..=n {
            let factor = if m == 1 { 2.0 } else { 1.0 };
            s[index(n, m)] =
                s[index(n, m - 1)] * ((n - m + 1) as f64 * factor / (n + m) as f64).sqrt();
        }
    }
    s
}

/// Schmidt quasi-normalized P_n^m(cos theta) and d P_n^m / d theta, both indexed `[n][m]`
/// as flat triangular tables via `index`. `theta` is the geocentric colatitude.
pub struct LegendreTable {
    pub p: Vec<f64>,
    pub dp: Vec<f64>,
}

impl LegendreTable {
    pub fn get(&self, n: usize, m: usize) -> (f64, f64) {
        let i = index(n, m);
        (self.p[i], self.dp[i])
    }
}

pub fn legendre_schmidt(theta: f64) -> LegendreTable {
    let n_max = N;
    let len = index(n_max, n_max) + 1;
    let mut p = vec![0.0; len];
    let mut dp = vec![0.0; len];

    let cos_t = theta.cos();
    let sin_t = theta.sin();

    p[index(0, 0)] = 1.0;
    dp[index(0, 0)] = 0.0;
    if n_max >= 1 {
        p[index(1, 0)] = cos_t;
        dp[index(1, 0)] = -sin_t;
        p[index(1, 1)] = sin_t;
        dp[index(1, 1)] = cos_t;
    }

    for n in 2..=n_max {
        for m in 0..=n {
            if m == n {
                p[index(n, n)] = sin_t * p[index(n - 1, n - 1)];
                dp[index(n, n)] = sin_t * dp[index(n - 1, n - 1)] + cos_t * p[index(n - 1, n - 1)];
            } else {
                let (p_nm2, dp_nm2) = if m > n.saturating_sub(2) {
                    (0.0, 0.0)
                } else {
                    (p[index(n - 2, m)], dp[index(n - 2, m)])
                };
                let k = ((n - 1) * (n - 1) - m * m) as f64 / ((2 * n - 1) * (2 * n - 3)) as f64;
                p[index(n, m)] = cos_t * p[index(n - 1, m)] - k * p_nm2;
                dp[index(n, m)] =
                    cos_t * dp[index(n - 1, m)] - sin_t * p[index(n - 1, m)] - k * dp_nm2;
            }
        }
    }

    for n in 1..=n_max {
        for m in 0..=n {
            let s = SCHMIDT_NORM[index(n, m)];
            p[index(n, m)] *= s;
            dp[index(n, m)] *= s;
        }
    }

    LegendreTable { p, dp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn p00_is_always_one() {
        for theta in [0.0, 0.3, 1.2, std::f64::consts::FRAC_PI_2] {
            let table = legendre_schmidt(theta);
            let (p00, _) = table.get(0, 0);
            assert_abs_diff_eq!(p00, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn p10_matches_cos_theta() {
        let theta = 0.7;
        let table = legendre_schmidt(theta);
        let (p10, _) = table.get(1, 0);
        assert_abs_diff_eq!(p10, theta.cos(), epsilon = 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let theta = 0.9;
        let h = 1e-6;
        let fwd = legendre_schmidt(theta + h);
        let bwd = legendre_schmidt(theta - h);
        let mid = legendre_schmidt(theta);
        for n in 1..=N {
            for m in 0..=n {
                let (p_fwd, _) = fwd.get(n, m);
                let (p_bwd, _) = bwd.get(n, m);
                let (_, dp_mid) = mid.get(n, m);
                let fd = (p_fwd - p_bwd) / (2.0 * h);
                assert_abs_diff_eq!(dp_mid, fd, epsilon = 1e-5);
            }
        }
    }
}
