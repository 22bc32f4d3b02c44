//! 3D Tiles manifests and containers
//!
//! Builds `tileset.json` object graphs from tile trees (explicit) or from a
//! quadtree description (implicit), and reads/writes the b3dm container.

mod b3dm;
mod bounds;
mod builder;
mod error;
mod tile;
mod tileset;
mod walker;

pub use b3dm::{decode_b3dm, decode_glb, write_b3dm, B3dmHeader, B3dmPayload, GltfGeometry, B3DM_HEADER_LEN};
pub use bounds::BoundingVolume;
pub use builder::{
    implicit_content_uri, to_implicit_tileset, to_json, to_tileset, TilesetBuilder, TilesetOptions,
    QUADTREE, SUBTREE_URI_TEMPLATE,
};
pub use error::{Tiles3dError, Tiles3dResult};
pub use tile::{forest_depth, TileNode, TileRefine};
pub use tileset::{Asset, Child, Content, ImplicitTiling, Root, Subtrees, TileSet, TILESET_VERSION};
pub use walker::{content_uri, ErrorBudget, GeometricErrorPolicy, TileTreeWalker, TileVisit, CONTENT_DIR};
