//! tiler3d: tileset manifests and tile content for OGC 3D Tiles.
//!
//! Two independent pipelines live here:
//!
//! * [`tiles3d`] turns a tile tree (or an implicit quadtree description) into a
//!   `tileset.json` object graph with bounding regions, refinement and
//!   per-level geometric errors.
//! * [`content`] aggregates per-feature geometry records into triangle groups
//!   plus a columnar attribute table and hands them to a [`content::TileEncoder`].
//!
//! [`geo`] holds the geographic math both sides share: degree boxes to
//! radian regions and the east-north-up frame used as the root transform.

pub mod content;
pub mod geo;
pub mod tiles3d;

pub use content::{
    aggregate_attributes, to_tile, AggregationOptions, AttributeTable, B3dmEncoder, ContentError,
    ContentResult, GeometryRecord, MissingAttributePolicy, ShaderColors, TileContentAssembler,
    TileEncoder, TileStyle, Triangle, Triangulator,
};
pub use geo::{bbox_to_region, ecef_to_enu, enu_transform, GeoBox};
pub use tiles3d::{
    to_implicit_tileset, to_json, to_tileset, BoundingVolume, GeometricErrorPolicy, TileNode,
    TileRefine, TileSet, Tiles3dError, Tiles3dResult, TilesetBuilder, TilesetOptions,
};

/// Name embedded in every `asset.generator` string.
pub const GENERATOR_NAME: &str = "tiler3d";
