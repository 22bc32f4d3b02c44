//! Input tile tree produced by an upstream tiling stage

use serde::{Deserialize, Serialize};

use crate::geo::GeoBox;

/// Refinement strategy for child tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TileRefine {
    /// Add children to parent tile
    Add,
    /// Replace parent tile with children
    Replace,
}

impl Default for TileRefine {
    fn default() -> Self {
        Self::Add
    }
}

impl TileRefine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Replace => "REPLACE",
        }
    }
}

/// One node of the tile tree handed to the manifest builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileNode {
    /// Whether the tile has content. Unavailable tiles are dropped together
    /// with their whole subtree.
    pub available: bool,
    /// Content path relative to the `content/` directory
    pub content_uri: String,
    /// Extent in degrees: [min_x, min_y, max_x, max_y]
    pub bounding_box: GeoBox,
    /// Child tiles, `None` for leaves that were never split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TileNode>>,
}

impl TileNode {
    /// Available leaf tile
    pub fn new(content_uri: impl Into<String>, bounding_box: [f64; 4]) -> Self {
        Self {
            available: true,
            content_uri: content_uri.into(),
            bounding_box: GeoBox::from(bounding_box),
            children: None,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn with_children(mut self, children: Vec<TileNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Child slice, empty when the node has no children sequence
    pub fn child_tiles(&self) -> &[TileNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Count total tiles in this subtree, available or not
    pub fn count_tiles(&self) -> usize {
        1 + self.child_tiles().iter().map(|c| c.count_tiles()).sum::<usize>()
    }

    /// Get maximum depth of this subtree (a leaf has depth 1)
    pub fn max_depth(&self) -> usize {
        1 + self.child_tiles().iter().map(|c| c.max_depth()).max().unwrap_or(0)
    }
}

/// Deepest level of a forest of top-level tiles; top-level tiles are depth 1.
pub fn forest_depth(tiles: &[TileNode]) -> usize {
    tiles.iter().map(|t| t.max_depth()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_tree() {
        let json = r#"{
            "available": true,
            "contentUri": "0_0.b3dm",
            "boundingBox": [4.0, 52.0, 5.0, 53.0],
            "children": [
                { "available": false, "contentUri": "1_0.b3dm", "boundingBox": [4.0, 52.0, 4.5, 52.5] }
            ]
        }"#;
        let tile: TileNode = serde_json::from_str(json).unwrap();
        assert!(tile.available);
        assert_eq!(tile.bounding_box.max_y, 53.0);
        assert_eq!(tile.child_tiles().len(), 1);
        assert!(tile.child_tiles()[0].children.is_none());
        assert_eq!(tile.count_tiles(), 2);
        assert_eq!(tile.max_depth(), 2);
    }

    #[test]
    fn test_refine_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TileRefine::Add).unwrap(), "\"ADD\"");
        assert_eq!(TileRefine::Replace.as_str(), "REPLACE");
        assert_eq!(TileRefine::default(), TileRefine::Add);
    }

    #[test]
    fn test_forest_depth() {
        let tiles = vec![
            TileNode::new("a", [0.0; 4]),
            TileNode::new("b", [0.0; 4]).with_children(vec![TileNode::new("c", [0.0; 4])]),
        ];
        assert_eq!(forest_depth(&tiles), 2);
        assert_eq!(forest_depth(&[]), 0);
    }
}
