// src/geo/mod.rs
// Geographic math shared by the manifest builder and content assembly
// RELEVANT FILES: src/geo/region.rs, src/geo/enu.rs, src/tiles3d/builder.rs

mod ellipsoid;
mod enu;
mod region;

pub use ellipsoid::{ecef_to_geodetic, geodetic_to_ecef, Geodetic, WGS84_A, WGS84_E2};
pub use enu::{ecef_to_enu, enu_transform};
pub use region::{bbox_to_region, GeoBox};
