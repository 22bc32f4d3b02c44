//! Tileset manifest (`tileset.json`) object graph

use serde::{Deserialize, Serialize};

use super::bounds::BoundingVolume;
use super::error::Tiles3dResult;
use super::tile::TileRefine;

/// 3D Tiles version written to every manifest
pub const TILESET_VERSION: &str = "1.1";

/// Asset metadata for the tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// 3D Tiles version
    pub version: String,
    /// Tool name and version that produced the tileset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

/// Content description for a tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// URI to the tile content, or a `{level}/{x}/{y}` template for implicit tiling
    pub uri: String,
}

/// Subtree file location for implicit tiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtrees {
    pub uri: String,
}

/// Implicit tiling declaration on the root tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplicitTiling {
    pub subdivision_scheme: String,
    pub available_levels: u32,
    pub subtree_levels: u32,
    pub subtrees: Subtrees,
}

/// Root tile. Carries the tileset transform and refinement strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub geometric_error: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refine: Option<TileRefine>,
    /// 4x4 transform, translation at indices 12..15
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 16]>,
    pub bounding_volume: BoundingVolume,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Child>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_tiling: Option<ImplicitTiling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

/// A non-root tile in an explicit hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub geometric_error: f64,
    pub bounding_volume: BoundingVolume,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Child>>,
}

impl Child {
    pub fn content_uri(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.uri.as_str())
    }

    /// Child slice, empty when the field is absent
    pub fn child_tiles(&self) -> &[Child] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Count total tiles in this subtree
    pub fn count_tiles(&self) -> usize {
        1 + self.child_tiles().iter().map(|c| c.count_tiles()).sum::<usize>()
    }

    /// Get maximum depth of this subtree
    pub fn max_depth(&self) -> usize {
        1 + self.child_tiles().iter().map(|c| c.max_depth()).max().unwrap_or(0)
    }
}

/// Root tileset.json structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSet {
    /// Asset metadata
    pub asset: Asset,
    /// Geometric error of the tileset
    pub geometric_error: f64,
    /// Root tile
    pub root: Root,
}

impl TileSet {
    /// Load a tileset from a JSON string
    pub fn from_json(json_str: &str) -> Tiles3dResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Indented JSON with absent optional fields left out
    pub fn to_json_pretty(&self) -> Tiles3dResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get the tileset version
    pub fn version(&self) -> &str {
        &self.asset.version
    }

    /// Explicit children of the root, empty for implicit tilesets
    pub fn children(&self) -> &[Child] {
        self.root.children.as_deref().unwrap_or(&[])
    }

    /// Get total tile count, root included
    pub fn tile_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.count_tiles()).sum::<usize>()
    }

    /// Get maximum depth of the tile hierarchy, root included
    pub fn max_depth(&self) -> usize {
        1 + self.children().iter().map(|c| c.max_depth()).max().unwrap_or(0)
    }

    /// Whether the root declares implicit tiling
    pub fn is_implicit(&self) -> bool {
        self.root.implicit_tiling.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_tileset() {
        let json = r#"{
            "asset": { "version": "1.1" },
            "geometricError": 500.0,
            "root": {
                "boundingVolume": { "region": [0.0, 0.0, 0.1, 0.1, 0.0, 10.0] },
                "geometricError": 100.0,
                "refine": "REPLACE"
            }
        }"#;

        let tileset = TileSet::from_json(json).unwrap();
        assert_eq!(tileset.version(), "1.1");
        assert_eq!(tileset.geometric_error, 500.0);
        assert_eq!(tileset.root.refine, Some(TileRefine::Replace));
        assert_eq!(tileset.tile_count(), 1);
        assert_eq!(tileset.max_depth(), 1);
        assert!(!tileset.is_implicit());
    }

    #[test]
    fn test_none_fields_are_omitted() {
        let child = Child {
            geometric_error: 1.0,
            bounding_volume: BoundingVolume::from_region([0.0; 6]),
            content: None,
            children: None,
        };
        let json = serde_json::to_string(&child).unwrap();
        assert!(!json.contains("null"));
        assert!(!json.contains("children"));
        assert!(!json.contains("content"));
    }

    #[test]
    fn test_implicit_tiling_keys_are_camel_case() {
        let tiling = ImplicitTiling {
            subdivision_scheme: "QUADTREE".into(),
            available_levels: 6,
            subtree_levels: 3,
            subtrees: Subtrees { uri: "subtrees/{level}_{x}_{y}.subtree".into() },
        };
        let v = serde_json::to_value(&tiling).unwrap();
        assert_eq!(v["subdivisionScheme"], "QUADTREE");
        assert_eq!(v["availableLevels"], 6);
        assert_eq!(v["subtreeLevels"], 3);
    }
}
