//! Fehlberg 7(8) embedded pair (spec §4.9 higher-order stepper), selected by
//! `--higher-order`. Coefficients from Fehlberg's classical 13-stage RK7(8) tableau.

use super::tableau::Tableau;

const C: &[f64] = &[
    0.0,
    2.0 / 27.0,
    1.0 / 9.0,
    1.0 / 6.0,
    5.0 / 12.0,
    1.0 / 2.0,
    5.0 / 6.0,
    1.0 / 6.0,
    2.0 / 3.0,
    1.0 / 3.0,
    1.0,
    0.0,
    1.0,
];

const A0: &[f64] = &[];
const A1: &[f64] = &[2.0 / 27.0];
const A2: &[f64] = &[1.0 / 36.0, 1.0 / 12.0];
const A3: &[f64] = &[1.0 / 24.0, 0.0, 1.0 / 8.0];
const A4: &[f64] = &[5.0 / 12.0, 0.0, -25.0 / 16.0, 25.0 / 16.0];
const A5: &[f64] = &[1.0 / 20.0, 0.0, 0.0, 1.0 / 4.0, 1.0 / 5.0];
const A6: &[f64] = &[
    -25.0 / 108.0,
    0.0,
    0.0,
    125.0 / 108.0,
    -65.0 / 27.0,
    125.0 / 54.0,
];
const A7: &[f64] = &[
    31.0 / 300.0,
    0.0,
    0.0,
    0.0,
    61.0 / 225.0,
    -2.0 / 9.0,
    13.0 / 900.0,
];
const A8: &[f64] = &[
    2.0, 0.0, 0.0, -53.0 / 6.0, 704.0 / 45.0, -107.0 / 9.0, 67.0 / 90.0, 3.0,
];
const A9: &[f64] = &[
    -91.0 / 108.0,
    0.0,
    0.0,
    23.0 / 108.0,
    -976.0 / 135.0,
    311.0 / 54.0,
    -19.0 / 60.0,
    17.0 / 6.0,
    -1.0 / 12.0,
];
const A10: &[f64] = &[
    2383.0 / 4100.0,
    0.0,
    0.0,
    -341.0 / 164.0,
    4496.0 / 1025.0,
    -301.0 / 82.0,
    2133.0 / 4100.0,
    45.0 / 82.0,
    45.0 / 164.0,
    18.0 / 41.0,
];
const A11: &[f64] = &[
    3.0 / 205.0,
    0.0,
    0.0,
    0.0,
    0.0,
    -6.0 / 41.0,
    -3.0 / 205.0,
    -3.0 / 41.0,
    3.0 / 41.0,
    6.0 / 41.0,
    0.0,
];
const A12: &[f64] = &[
    -1777.0 / 4100.0,
    0.0,
    0.0,
    -341.0 / 164.0,
    4496.0 / 1025.0,
    -289.0 / 82.0,
    2193.0 / 4100.0,
    51.0 / 82.0,
    33.0 / 164.0,
    12.0 / 41.0,
    0.0,
    1.0,
];

const A: &[&[f64]] = &[
    A0, A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12,
];

// 7th-order solution.
const B_HIGH: &[f64] = &[
    41.0 / 840.0,
    0.0,
    0.0,
    0.0,
    0.0,
    34.0 / 105.0,
    9.0 / 35.0,
    9.0 / 35.0,
    9.0 / 280.0,
    9.0 / 280.0,
    41.0 / 840.0,
    0.0,
    0.0,
];

// 8th-order embedded solution, for the error estimate.
const B_LOW: &[f64] = &[
    0.0,
    0.0,
    0.0,
    0.0,
    0.0,
    34.0 / 105.0,
    9.0 / 35.0,
    9.0 / 35.0,
    9.0 / 280.0,
    9.0 / 280.0,
    0.0,
    41.0 / 840.0,
    41.0 / 840.0,
];

pub const TABLEAU: Tableau = Tableau {
    c: C,
    a: A,
    b_high: B_HIGH,
    b_low: B_LOW,
    order: 7,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tableau_shapes_are_consistent() {
        assert_eq!(C.len(), A.len());
        assert_eq!(C.len(), B_HIGH.len());
        assert_eq!(C.len(), B_LOW.len());
        for (i, row) in A.iter().enumerate() {
            assert_eq!(row.len(), i);
        }
    }

    #[test]
    fn b_rows_sum_to_one() {
        assert!((B_HIGH.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!((B_LOW.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
