//! Tileset manifest construction, explicit and implicit

use serde::{Deserialize, Serialize};

use super::bounds::BoundingVolume;
use super::error::Tiles3dResult;
use super::tile::{forest_depth, TileNode, TileRefine};
use super::tileset::{Asset, Content, ImplicitTiling, Root, Subtrees, TileSet, TILESET_VERSION};
use super::walker::{ErrorBudget, GeometricErrorPolicy, TileTreeWalker, CONTENT_DIR};
use crate::geo::enu_transform;
use crate::GENERATOR_NAME;

/// Subdivision scheme written for implicit tilesets
pub const QUADTREE: &str = "QUADTREE";
/// Subtree file template for implicit tilesets
pub const SUBTREE_URI_TEMPLATE: &str = "subtrees/{level}_{x}_{y}.subtree";

/// Builder settings shared by explicit and implicit manifests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesetOptions {
    /// Version token embedded in `asset.generator`
    pub generator_version: String,
    /// Root refinement strategy
    pub refine: TileRefine,
    /// Handling of tiles deeper than the geometric error sequence
    pub error_policy: GeometricErrorPolicy,
}

impl Default for TilesetOptions {
    fn default() -> Self {
        Self {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            refine: TileRefine::Add,
            error_policy: GeometricErrorPolicy::Strict,
        }
    }
}

impl TilesetOptions {
    /// Parse options from JSON; missing keys take their defaults
    pub fn from_json(json_str: &str) -> Tiles3dResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }
}

/// Produces `tileset.json` object graphs. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct TilesetBuilder {
    options: TilesetOptions,
}

impl TilesetBuilder {
    pub fn new(options: TilesetOptions) -> Self {
        Self { options }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.options.generator_version = version.into();
        self
    }

    pub fn refine(mut self, refine: TileRefine) -> Self {
        self.options.refine = refine;
        self
    }

    pub fn error_policy(mut self, policy: GeometricErrorPolicy) -> Self {
        self.options.error_policy = policy;
        self
    }

    pub fn options(&self) -> &TilesetOptions {
        &self.options
    }

    fn asset(&self) -> Asset {
        Asset {
            version: TILESET_VERSION.to_string(),
            generator: Some(format!("{} {}", GENERATOR_NAME, self.options.generator_version)),
        }
    }

    fn root(&self, geometric_error: f64, transform: [f64; 3], region: [f64; 6]) -> Root {
        Root {
            geometric_error,
            refine: Some(self.options.refine),
            transform: Some(enu_transform(transform)),
            bounding_volume: BoundingVolume::from_region(region),
            children: None,
            implicit_tiling: None,
            content: None,
        }
    }

    /// Explicit manifest for a tile forest.
    ///
    /// `region` is used verbatim for the root; every child region is derived
    /// from its degree box and the shared `min_height`/`max_height`.
    /// `geometric_errors[d]` applies to depth `d`, the root being depth 0.
    pub fn build_explicit(
        &self,
        tiles: &[TileNode],
        transform: [f64; 3],
        region: [f64; 6],
        geometric_errors: &[f64],
        min_height: f64,
        max_height: f64,
    ) -> Tiles3dResult<TileSet> {
        let budget = ErrorBudget::new(geometric_errors, self.options.error_policy)?;
        let walker = TileTreeWalker::new(budget, min_height, max_height);

        let mut root = self.root(budget.root(), transform, region);
        root.children = Some(walker.walk(tiles)?);

        let tileset = TileSet {
            asset: self.asset(),
            geometric_error: budget.root(),
            root,
        };
        log::debug!(
            "explicit tileset: {} of {} tiles emitted, depth {} (input depth {})",
            tileset.tile_count() - 1,
            tiles.iter().map(|t| t.count_tiles()).sum::<usize>(),
            tileset.max_depth(),
            forest_depth(tiles) + 1
        );
        Ok(tileset)
    }

    /// Implicit quadtree manifest. `bbox` becomes the root region verbatim.
    pub fn build_implicit(
        &self,
        transform: [f64; 3],
        bbox: [f64; 6],
        max_geometric_error: f64,
        available_levels: u32,
        subtree_levels: u32,
        create_gltf: bool,
    ) -> TileSet {
        let mut root = self.root(max_geometric_error, transform, bbox);
        root.content = Some(Content {
            uri: implicit_content_uri(create_gltf),
        });
        root.implicit_tiling = Some(ImplicitTiling {
            subdivision_scheme: QUADTREE.to_string(),
            available_levels,
            subtree_levels,
            subtrees: Subtrees {
                uri: SUBTREE_URI_TEMPLATE.to_string(),
            },
        });
        log::debug!(
            "implicit tileset: {} levels, {} per subtree",
            available_levels,
            subtree_levels
        );

        TileSet {
            asset: self.asset(),
            geometric_error: max_geometric_error,
            root,
        }
    }
}

/// Content template for implicit tiles
pub fn implicit_content_uri(create_gltf: bool) -> String {
    let ext = if create_gltf { ".glb" } else { ".b3dm" };
    format!("{}/{{level}}_{{x}}_{{y}}{}", CONTENT_DIR, ext)
}

/// Explicit tileset for `tiles`. See [`TilesetBuilder::build_explicit`].
#[allow(clippy::too_many_arguments)]
pub fn to_tileset(
    tiles: &[TileNode],
    transform: [f64; 3],
    region: [f64; 6],
    geometric_errors: &[f64],
    min_height: f64,
    max_height: f64,
    version: &str,
    refine: TileRefine,
) -> Tiles3dResult<TileSet> {
    TilesetBuilder::default()
        .with_version(version)
        .refine(refine)
        .build_explicit(tiles, transform, region, geometric_errors, min_height, max_height)
}

/// Implicit quadtree tileset. See [`TilesetBuilder::build_implicit`].
pub fn to_implicit_tileset(
    transform: [f64; 3],
    bbox: [f64; 6],
    max_geometric_error: f64,
    available_levels: u32,
    subtree_levels: u32,
    version: &str,
    create_gltf: bool,
) -> TileSet {
    TilesetBuilder::default().with_version(version).build_implicit(
        transform,
        bbox,
        max_geometric_error,
        available_levels,
        subtree_levels,
        create_gltf,
    )
}

/// Explicit tileset rendered as indented JSON.
#[allow(clippy::too_many_arguments)]
pub fn to_json(
    tiles: &[TileNode],
    transform: [f64; 3],
    region: [f64; 6],
    geometric_errors: &[f64],
    min_height: f64,
    max_height: f64,
    version: &str,
    refine: TileRefine,
) -> Tiles3dResult<String> {
    to_tileset(
        tiles,
        transform,
        region,
        geometric_errors,
        min_height,
        max_height,
        version,
        refine,
    )?
    .to_json_pretty()
}
