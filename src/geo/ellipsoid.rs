//! WGS84 ellipsoid helpers.

use glam::DVec3;

/// WGS84 semi-major axis in meters
pub const WGS84_A: f64 = 6378137.0;
/// WGS84 first eccentricity squared
pub const WGS84_E2: f64 = 0.00669437999014;

/// Geodetic position: longitude/latitude in radians, height in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub lon: f64,
    pub lat: f64,
    pub height: f64,
}

/// Convert WGS84 geodetic coordinates to ECEF
pub fn geodetic_to_ecef(lon_rad: f64, lat_rad: f64, height: f64) -> DVec3 {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + height) * cos_lat * cos_lon;
    let y = (n + height) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84_E2) + height) * sin_lat;
    DVec3::new(x, y, z)
}

/// Convert ECEF to WGS84 geodetic coordinates (Bowring, single iteration).
///
/// The earth center has no defined direction; it maps to lon = lat = 0 with a
/// negative height of one semi-major axis.
pub fn ecef_to_geodetic(p: DVec3) -> Geodetic {
    let b = WGS84_A * (1.0 - WGS84_E2).sqrt();
    let ep2 = (WGS84_A * WGS84_A - b * b) / (b * b);
    let r = (p.x * p.x + p.y * p.y).sqrt();

    if r == 0.0 && p.z == 0.0 {
        return Geodetic { lon: 0.0, lat: 0.0, height: -WGS84_A };
    }

    let lon = p.y.atan2(p.x);
    let theta = (p.z * WGS84_A).atan2(r * b);
    let (sin_t, cos_t) = theta.sin_cos();
    let lat = (p.z + ep2 * b * sin_t.powi(3)).atan2(r - WGS84_E2 * WGS84_A * cos_t.powi(3));
    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let height = if lat.cos().abs() > 1e-12 {
        r / lat.cos() - n
    } else {
        p.z.abs() - n * (1.0 - WGS84_E2)
    };

    Geodetic { lon, lat, height }
}
