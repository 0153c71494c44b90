//! Dormand-Prince 5(4) embedded pair (spec §4.9 default stepper).

use super::tableau::Tableau;

const C: &[f64] = &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A0: &[f64] = &[];
const A1: &[f64] = &[1.0 / 5.0];
const A2: &[f64] = &[3.0 / 40.0, 9.0 / 40.0];
const A3: &[f64] = &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A4: &[f64] = &[
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A5: &[f64] = &[
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
const A6: &[f64] = &[
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

const A: &[&[f64]] = &[A0, A1, A2, A3, A4, A5, A6];

// 5th-order solution (shares coefficients with the final stage, i.e. first-same-as-last).
const B_HIGH: &[f64] = &[
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

// 4th-order embedded solution, for the error estimate.
const B_LOW: &[f64] = &[
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

pub const TABLEAU: Tableau = Tableau {
    c: C,
    a: A,
    b_high: B_HIGH,
    b_low: B_LOW,
    order: 4,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b_high_rows_sum_to_one() {
        assert!((B_HIGH.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((B_LOW.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tableau_shapes_are_consistent() {
        assert_eq!(C.len(), A.len());
        assert_eq!(C.len(), B_HIGH.len());
        assert_eq!(C.len(), B_LOW.len());
        for (i, row) in A.iter().enumerate() {
            assert_eq!(row.len(), i);
        }
    }
}
