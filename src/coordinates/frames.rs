//! Frame math: ECI <-> ECEF rotation, WGS-84 geodetic conversion, and the local ENU basis.
//!
//! Grounded on `coordinates/coordinate_transformation.rs` in the teacher repo, simplified
//! to the rotation the spec actually asks for (Earth rotation angle only, spec §4.1 step 1)
//! — high-fidelity polar motion and precession-nutation are a named Non-goal (spec §1), so
//! the teacher's EOP pipeline is not carried forward (see DESIGN.md).

use crate::constants::{EARTH_ANGULAR_VELOCITY, PI, WGS84_A, WGS84_F};
use nalgebra as na;

/// Geodetic coordinates on the WGS-84 ellipsoid: latitude and longitude in radians,
/// height in meters above the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
}

/// Rotation matrix ECEF -> ECI for Earth rotation angle `theta = EARTH_ANGULAR_VELOCITY * t`
/// (spec §4.1 step 1): a right-handed rotation about +Z. Wraps `theta` to `[0, 2*pi)`
/// first via `earth_rotation_angle` so multi-year elapsed times (spec §8 S6: t up to
/// ~6.3e7 s) don't carry an unbounded argument into the trig functions.
pub fn r_ecef_to_eci(t: f64) -> na::Matrix3<f64> {
    let theta = earth_rotation_angle(t);
    na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), theta).into_inner()
}

/// Earth rotation angle at elapsed time `t` (seconds since simulation epoch), wrapped to
/// [0, 2*pi).
pub fn earth_rotation_angle(t: f64) -> f64 {
    (EARTH_ANGULAR_VELOCITY * t).rem_euclid(2.0 * PI)
}

/// Reverse-geodetic conversion (ECEF Cartesian -> WGS-84 geodetic), spec §4.1 step 3.
/// Bowring-style iterative solve, matching the teacher's `itrs_to_geodetic` in spirit but
/// returning radians (the caller needs radians for the harmonic synthesis, not degrees).
pub fn ecef_to_geodetic(r_ecef: &na::Vector3<f64>) -> Geodetic {
    let x = r_ecef.x;
    let y = r_ecef.y;
    let z = r_ecef.z;

    let a = WGS84_A;
    let f = WGS84_F;
    let b = a * (1.0 - f);
    let e2 = 2.0 * f - f * f;

    let p = (x * x + y * y).sqrt();

    if p < 1e-10 {
        let longitude = 0.0;
        let latitude = if z < 0.0 { -PI / 2.0 } else { PI / 2.0 };
        let height = (z.abs() - b).max(0.0);
        return Geodetic {
            latitude,
            longitude,
            height,
        };
    }

    let longitude = y.atan2(x);
    let mut latitude = z.atan2(p * (1.0 - e2));

    for _ in 0..10 {
        let sin_lat = latitude.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let h = p / latitude.cos() - n;
        let prev_lat = latitude;
        latitude = (z / p).atan2(1.0 - e2 * n / (n + h));
        if (latitude - prev_lat).abs() < 1e-12 {
            break;
        }
    }

    let sin_lat = latitude.sin();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let height = p / latitude.cos() - n;

    Geodetic {
        latitude,
        longitude,
        height,
    }
}

/// Forward geodetic -> ECEF, used by tests to check round-trip consistency and to pin down
/// the fixed point mentioned in spec §9 ("verify the library's convention against a known
/// fixed point").
pub fn geodetic_to_ecef(geo: &Geodetic) -> na::Vector3<f64> {
    let a = WGS84_A;
    let f = WGS84_F;
    let e2 = 2.0 * f - f * f;

    let sin_lat = geo.latitude.sin();
    let cos_lat = geo.latitude.cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    let x = (n + geo.height) * cos_lat * geo.longitude.cos();
    let y = (n + geo.height) * cos_lat * geo.longitude.sin();
    let z = (n * (1.0 - e2) + geo.height) * sin_lat;

    na::Vector3::new(x, y, z)
}

/// Rotation matrix local-ENU -> ECEF at a given geodetic latitude/longitude (spec §4.1
/// step 3). Columns are the East, North, Up unit vectors expressed in ECEF.
pub fn r_enu_to_ecef(geo: &Geodetic) -> na::Matrix3<f64> {
    let (sin_lat, cos_lat) = (geo.latitude.sin(), geo.latitude.cos());
    let (sin_lon, cos_lon) = (geo.longitude.sin(), geo.longitude.cos());

    let east = na::Vector3::new(-sin_lon, cos_lon, 0.0);
    let north = na::Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = na::Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    na::Matrix3::from_columns(&[east, north, up])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn geodetic_round_trip() {
        let geo = Geodetic {
            latitude: 0.7,
            longitude: -1.2,
            height: 500_000.0,
        };
        let ecef = geodetic_to_ecef(&geo);
        let back = ecef_to_geodetic(&ecef);
        assert_abs_diff_eq!(back.latitude, geo.latitude, epsilon = 1e-9);
        assert_abs_diff_eq!(back.longitude, geo.longitude, epsilon = 1e-9);
        assert_abs_diff_eq!(back.height, geo.height, epsilon = 1e-3);
    }

    #[test]
    fn equator_prime_meridian_fixed_point() {
        let geo = Geodetic {
            latitude: 0.0,
            longitude: 0.0,
            height: 500_000.0,
        };
        let ecef = geodetic_to_ecef(&geo);
        assert_abs_diff_eq!(ecef.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ecef.z, 0.0, epsilon = 1e-6);
        assert!(ecef.x > 0.0);
    }

    #[test]
    fn r_ecef_to_eci_is_a_pure_z_rotation() {
        let r = r_ecef_to_eci(3600.0);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        // Z axis is invariant under a rotation about Z.
        let z = na::Vector3::new(0.0, 0.0, 1.0);
        assert_abs_diff_eq!(r * z, z, epsilon = 1e-12);
    }

    #[test]
    fn enu_basis_is_orthonormal() {
        let geo = Geodetic {
            latitude: 0.4,
            longitude: 1.1,
            height: 0.0,
        };
        let r = r_enu_to_ecef(&geo);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-10);
        let should_be_identity = r.transpose() * r;
        assert_abs_diff_eq!(should_be_identity, na::Matrix3::identity(), epsilon = 1e-10);
    }
}
