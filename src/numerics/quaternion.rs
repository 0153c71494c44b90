use nalgebra as na;

#[cfg(test)]
use approx::AbsDiffEq;

/// Quaternion utilities for spacecraft attitude dynamics.
/// Following scalar-first convention: q = [q0; q1; q2; q3] = [w; x; y; z], rotating
/// inertial -> body (spec §3, State.q).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub data: na::Vector4<f64>,
}

#[cfg(test)]
impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.data.abs_diff_eq(&other.data, epsilon)
    }
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quaternion {
            data: na::Vector4::new(w, x, y, z),
        }
    }

    pub fn identity() -> Self {
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn scalar(&self) -> f64 {
        self.data[0]
    }

    pub fn vector(&self) -> na::Vector3<f64> {
        na::Vector3::new(self.data[1], self.data[2], self.data[3])
    }

    pub fn norm(&self) -> f64 {
        self.data.norm()
    }

    /// Returns the unit quaternion nearest `self`. The stepper deliberately does *not*
    /// call this between sub-stages (spec §4.8, §9 "Quaternion drift") — it is only
    /// invoked at checkpoint boundaries by the driver.
    pub fn normalize(&self) -> Self {
        Quaternion {
            data: self.data.normalize(),
        }
    }

    pub fn to_rotation_matrix(&self) -> na::Matrix3<f64> {
        let q0 = self.data[0];
        let q1 = self.data[1];
        let q2 = self.data[2];
        let q3 = self.data[3];

        na::Matrix3::new(
            1.0 - 2.0 * (q2 * q2 + q3 * q3),
            2.0 * (q1 * q2 - q0 * q3),
            2.0 * (q1 * q3 + q0 * q2),
            2.0 * (q1 * q2 + q0 * q3),
            1.0 - 2.0 * (q1 * q1 + q3 * q3),
            2.0 * (q2 * q3 - q0 * q1),
            2.0 * (q1 * q3 - q0 * q2),
            2.0 * (q2 * q3 + q0 * q1),
            1.0 - 2.0 * (q1 * q1 + q2 * q2),
        )
    }

    /// Hamilton product, followed by re-normalization — appropriate for composing two
    /// attitude rotations. Not used by the stepper's derivative (see
    /// `compute_quaternion_derivative`), which needs the unnormalized 4-vector result.
    pub fn multiply(&self, other: &Quaternion) -> Self {
        let q1 = self;
        let q2 = other;

        Quaternion::new(
            q1.scalar() * q2.scalar() - q1.vector().dot(&q2.vector()),
            q1.scalar() * q2.vector()[0]
                + q2.scalar() * q1.vector()[0]
                + (q1.vector()[1] * q2.vector()[2] - q1.vector()[2] * q2.vector()[1]),
            q1.scalar() * q2.vector()[1]
                + q2.scalar() * q1.vector()[1]
                + (q1.vector()[2] * q2.vector()[0] - q1.vector()[0] * q2.vector()[2]),
            q1.scalar() * q2.vector()[2]
                + q2.scalar() * q1.vector()[2]
                + (q1.vector()[0] * q2.vector()[1] - q1.vector()[1] * q2.vector()[0]),
        )
        .normalize()
    }

    /// Component-wise infinity norm, one of the terms in the stepper's error control
    /// (spec §4.6).
    pub fn inf_norm(&self) -> f64 {
        self.data.abs().max()
    }

    pub fn abs(&self) -> Self {
        Quaternion {
            data: self.data.abs(),
        }
    }
}

impl std::ops::Add for Quaternion {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Quaternion {
            data: self.data + other.data,
        }
    }
}

impl std::ops::Sub for Quaternion {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Quaternion {
            data: self.data - other.data,
        }
    }
}

impl std::ops::Mul<f64> for Quaternion {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Quaternion {
            data: self.data * scalar,
        }
    }
}

/// dq/dt = 1/2 * q (x) [0, w] — the 4-vector form used directly by the dynamics functor
/// (spec §4.8 step 12). Does *not* renormalize; the result is a plain 4-vector derivative.
pub fn compute_quaternion_derivative(q: &Quaternion, w: &na::Vector3<f64>) -> Quaternion {
    let wx = w[0];
    let wy = w[1];
    let wz = w[2];

    Quaternion::new(
        -0.5 * (q.data[1] * wx + q.data[2] * wy + q.data[3] * wz),
        0.5 * (q.data[0] * wx + q.data[2] * wz - q.data[3] * wy),
        0.5 * (q.data[0] * wy + q.data[3] * wx - q.data[1] * wz),
        0.5 * (q.data[0] * wz + q.data[1] * wy - q.data[2] * wx),
    )
}
