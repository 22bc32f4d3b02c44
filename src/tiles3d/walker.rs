//! Depth-first conversion of a tile tree into manifest children

use serde::{Deserialize, Serialize};

use super::bounds::BoundingVolume;
use super::error::{Tiles3dError, Tiles3dResult};
use super::tile::TileNode;
use super::tileset::{Child, Content};

/// Directory every explicit tile's content is stored under
pub const CONTENT_DIR: &str = "content";

/// What to do when a tile sits deeper than the geometric error sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometricErrorPolicy {
    /// Fail with [`Tiles3dError::GeometricErrorExhausted`]
    #[default]
    Strict,
    /// Reuse the last entry of the sequence
    ClampToLast,
}

/// Per-depth geometric errors; index 0 belongs to the root.
#[derive(Debug, Clone, Copy)]
pub struct ErrorBudget<'a> {
    errors: &'a [f64],
    policy: GeometricErrorPolicy,
}

impl<'a> ErrorBudget<'a> {
    pub fn new(errors: &'a [f64], policy: GeometricErrorPolicy) -> Tiles3dResult<Self> {
        if errors.is_empty() {
            return Err(Tiles3dError::tileset("geometric error sequence is empty"));
        }
        Ok(Self { errors, policy })
    }

    pub fn root(&self) -> f64 {
        self.errors[0]
    }

    /// Geometric error for tiles at `depth`
    pub fn at(&self, depth: usize) -> Tiles3dResult<f64> {
        if let Some(e) = self.errors.get(depth) {
            return Ok(*e);
        }
        match self.policy {
            GeometricErrorPolicy::Strict => Err(Tiles3dError::GeometricErrorExhausted {
                depth,
                available: self.errors.len(),
            }),
            GeometricErrorPolicy::ClampToLast => {
                let last = self.errors[self.errors.len() - 1];
                log::warn!(
                    "no geometric error for depth {}, reusing last value {}",
                    depth,
                    last
                );
                Ok(last)
            }
        }
    }
}

/// A tile as seen by the walker. Unavailable tiles carry nothing, so their
/// subtree cannot be reached.
#[derive(Debug, Clone, Copy)]
pub enum TileVisit<'a> {
    Unavailable,
    Available {
        node: &'a TileNode,
        children: Option<&'a [TileNode]>,
    },
}

impl<'a> From<&'a TileNode> for TileVisit<'a> {
    fn from(node: &'a TileNode) -> Self {
        if node.available {
            TileVisit::Available {
                node,
                children: node.children.as_deref(),
            }
        } else {
            TileVisit::Unavailable
        }
    }
}

/// Walks a tile forest, emitting one [`Child`] per reachable available tile.
///
/// Every tile shares the same vertical extent: heights are not taken per node.
#[derive(Debug, Clone, Copy)]
pub struct TileTreeWalker<'a> {
    budget: ErrorBudget<'a>,
    min_height: f64,
    max_height: f64,
}

impl<'a> TileTreeWalker<'a> {
    pub fn new(budget: ErrorBudget<'a>, min_height: f64, max_height: f64) -> Self {
        Self {
            budget,
            min_height,
            max_height,
        }
    }

    /// Convert top-level tiles (depth 1) and everything reachable below them.
    pub fn walk(&self, tiles: &[TileNode]) -> Tiles3dResult<Vec<Child>> {
        self.walk_level(tiles, 1)
    }

    fn walk_level(&self, tiles: &[TileNode], depth: usize) -> Tiles3dResult<Vec<Child>> {
        let mut children = Vec::with_capacity(tiles.len());
        for tile in tiles {
            match TileVisit::from(tile) {
                TileVisit::Unavailable => {
                    log::debug!(
                        "pruning unavailable tile {} at depth {} ({} tiles)",
                        tile.content_uri,
                        depth,
                        tile.count_tiles()
                    );
                }
                TileVisit::Available { node, children: grand } => {
                    let mut child = self.child(node, depth)?;
                    if let Some(grand) = grand {
                        child.children = Some(self.walk_level(grand, depth + 1)?);
                    }
                    children.push(child);
                }
            }
        }
        Ok(children)
    }

    fn child(&self, node: &TileNode, depth: usize) -> Tiles3dResult<Child> {
        let bbox: [f64; 4] = node.bounding_box.into();
        Ok(Child {
            geometric_error: self.budget.at(depth)?,
            bounding_volume: BoundingVolume::from_degrees(bbox, self.min_height, self.max_height),
            content: Some(Content {
                uri: content_uri(&node.content_uri),
            }),
            children: None,
        })
    }
}

/// `content/<uri>` with forward slashes only
pub fn content_uri(uri: &str) -> String {
    let normalized = uri.replace('\\', "/");
    format!("{}/{}", CONTENT_DIR, normalized.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(uri: &str) -> TileNode {
        TileNode::new(uri, [0.0, 0.0, 1.0, 1.0])
    }

    #[test]
    fn test_content_uri_normalization() {
        assert_eq!(content_uri("1_0_0.b3dm"), "content/1_0_0.b3dm");
        assert_eq!(content_uri("a\\b\\c.glb"), "content/a/b/c.glb");
        assert_eq!(content_uri("/x.b3dm"), "content/x.b3dm");
    }

    #[test]
    fn test_empty_budget_rejected() {
        assert!(ErrorBudget::new(&[], GeometricErrorPolicy::Strict).is_err());
    }

    #[test]
    fn test_strict_budget_reports_depth() {
        let errors = [100.0, 50.0];
        let budget = ErrorBudget::new(&errors, GeometricErrorPolicy::Strict).unwrap();
        assert_eq!(budget.at(1).unwrap(), 50.0);
        match budget.at(2) {
            Err(Tiles3dError::GeometricErrorExhausted { depth, available }) => {
                assert_eq!(depth, 2);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_clamp_budget_reuses_last() {
        let errors = [100.0, 50.0];
        let budget = ErrorBudget::new(&errors, GeometricErrorPolicy::ClampToLast).unwrap();
        assert_eq!(budget.at(5).unwrap(), 50.0);
    }

    #[test]
    fn test_unavailable_subtree_needs_no_budget() {
        // depth 2 has no entry, but only an unavailable tile lives there
        let tiles = vec![leaf("a").with_children(vec![
            leaf("b").unavailable().with_children(vec![leaf("c")]),
        ])];
        let errors = [100.0, 50.0];
        let budget = ErrorBudget::new(&errors, GeometricErrorPolicy::Strict).unwrap();
        let walker = TileTreeWalker::new(budget, 0.0, 10.0);
        let children = walker.walk(&tiles).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].children.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_visit_tags() {
        let t = leaf("a");
        assert!(matches!(TileVisit::from(&t), TileVisit::Available { children: None, .. }));
        let u = leaf("b").unavailable();
        assert!(matches!(TileVisit::from(&u), TileVisit::Unavailable));
    }
}
