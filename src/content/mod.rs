//! Tile content assembly
//!
//! Geometry records are triangulated one group per record, their attribute
//! maps are merged into a columnar [`AttributeTable`], and both are handed to
//! a [`TileEncoder`]. Triangulation and encoding sit behind traits; the crate
//! ships [`B3dmEncoder`] as the default encoder.

mod assembler;
mod attributes;
mod encoder;
mod error;
mod glb;
mod record;
mod style;

pub use assembler::{to_tile, TileContentAssembler, Triangulator};
pub use attributes::{
    aggregate_attributes, AggregationOptions, AttributeColumn, AttributeTable, MissingAttributePolicy,
};
pub use encoder::{B3dmEncoder, TileEncoder};
pub use error::{ContentError, ContentResult};
pub use glb::{write_glb, OUTLINE_EXTENSION};
pub use record::{recenter, GeometryRecord, ShaderColors, Triangle};
pub use style::{parse_hex_color, TileStyle};
