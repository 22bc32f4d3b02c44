// tests/test_tileset_implicit.rs
// Implicit quadtree tilesets: templates, extension selection, root box handling.
// RELEVANT FILES:src/tiles3d/builder.rs,src/tiles3d/tileset.rs

use tiler3d::tiles3d::{QUADTREE, SUBTREE_URI_TEMPLATE};
use tiler3d::{to_implicit_tileset, TileRefine, TileSet, TilesetBuilder, TilesetOptions};

const BOX: [f64; 6] = [4.0, 52.0, 5.0, 53.0, -10.0, 80.0];

fn implicit(create_gltf: bool) -> TileSet {
    to_implicit_tileset([0.0, 0.0, 0.0], BOX, 2000.0, 6, 3, "1.2.0", create_gltf)
}

#[test]
fn content_extension_follows_gltf_flag() {
    for create_gltf in [false, true] {
        let tileset = implicit(create_gltf);
        let uri = &tileset.root.content.as_ref().unwrap().uri;
        if create_gltf {
            assert_eq!(uri, "content/{level}_{x}_{y}.glb");
        } else {
            assert_eq!(uri, "content/{level}_{x}_{y}.b3dm");
        }
    }
}

#[test]
fn implicit_tiling_is_declared() {
    let tileset = implicit(false);
    assert!(tileset.is_implicit());
    let tiling = tileset.root.implicit_tiling.as_ref().unwrap();
    assert_eq!(tiling.subdivision_scheme, QUADTREE);
    assert_eq!(tiling.available_levels, 6);
    assert_eq!(tiling.subtree_levels, 3);
    assert_eq!(tiling.subtrees.uri, SUBTREE_URI_TEMPLATE);
    assert_eq!(tiling.subtrees.uri, "subtrees/{level}_{x}_{y}.subtree");
}

#[test]
fn root_box_is_not_converted() {
    let tileset = implicit(false);
    assert_eq!(tileset.root.bounding_volume.region, BOX);
}

#[test]
fn max_error_applies_to_root_and_tileset() {
    let tileset = implicit(true);
    assert_eq!(tileset.geometric_error, 2000.0);
    assert_eq!(tileset.root.geometric_error, 2000.0);
}

#[test]
fn asset_and_transform() {
    let tileset = implicit(false);
    assert_eq!(tileset.asset.version, "1.1");
    assert!(tileset.asset.generator.as_deref().unwrap().contains("1.2.0"));
    #[rustfmt::skip]
    let origin_frame = [
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    assert_eq!(tileset.root.transform, Some(origin_frame));
    assert_eq!(tileset.root.refine, Some(TileRefine::Add));
}

#[test]
fn json_has_no_children_field() {
    let json = implicit(false).to_json_pretty().unwrap();
    assert!(!json.contains("null"));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["root"].get("children").is_none());
    assert_eq!(value["root"]["implicitTiling"]["subdivisionScheme"], "QUADTREE");
    assert_eq!(value["root"]["content"]["uri"], "content/{level}_{x}_{y}.b3dm");
}

#[test]
fn builder_options_apply_to_implicit_root() {
    let options = TilesetOptions::from_json(r#"{ "generator_version": "9.9", "refine": "REPLACE" }"#).unwrap();
    let tileset = TilesetBuilder::new(options).build_implicit([0.0; 3], BOX, 10.0, 2, 2, true);
    assert_eq!(tileset.asset.generator.as_deref(), Some("tiler3d 9.9"));
    assert_eq!(tileset.root.refine, Some(TileRefine::Replace));
}
