//! East-north-up frame at an earth-centered reference point.

use glam::{DMat4, DVec3};

use super::ellipsoid::ecef_to_geodetic;

/// Build the local east-north-up to ECEF transform at `origin`.
///
/// Columns are the east, north and up unit axes followed by the origin
/// itself, so the matrix maps local ENU coordinates into ECEF.
pub fn ecef_to_enu(origin: DVec3) -> DMat4 {
    let g = ecef_to_geodetic(origin);
    let (sin_lon, cos_lon) = g.lon.sin_cos();
    let (sin_lat, cos_lat) = g.lat.sin_cos();

    let east = DVec3::new(-sin_lon, cos_lon, 0.0);
    let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    DMat4::from_cols(
        east.extend(0.0),
        north.extend(0.0),
        up.extend(0.0),
        origin.extend(1.0),
    )
}

/// Root `transform` for a tileset whose content is expressed in ENU
/// coordinates around `origin`.
///
/// The 16 values follow the 3D Tiles layout: translation lands at indices
/// 12, 13 and 14.
pub fn enu_transform(origin: [f64; 3]) -> [f64; 16] {
    let mut m = ecef_to_enu(DVec3::from_array(origin)).to_cols_array();
    // -0.0 would serialize as "-0.0"
    for v in &mut m {
        if *v == 0.0 {
            *v = 0.0;
        }
    }
    m
}
