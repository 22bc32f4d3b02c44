// tests/test_tile_content.rs
// End-to-end tile content: records -> triangles + attribute table -> b3dm / glb bytes.
// RELEVANT FILES:src/content/assembler.rs,src/content/attributes.rs,src/content/encoder.rs,src/tiles3d/b3dm.rs

use serde_json::{json, Value};
use tiler3d::content::recenter;
use tiler3d::tiles3d::{decode_b3dm, decode_glb};
use tiler3d::{
    aggregate_attributes, to_tile, AggregationOptions, B3dmEncoder, ContentResult, GeometryRecord,
    MissingAttributePolicy, ShaderColors, TileContentAssembler, TileStyle, Triangle,
};

/// Single closed ring, z-up world coordinates
#[derive(Debug, Clone)]
struct Ring(Vec<[f64; 3]>);

/// Fan triangulation standing in for the real geometry processor
fn fan(
    ring: &Ring,
    batch_id: u32,
    shader: Option<&ShaderColors>,
    center: Option<[f64; 3]>,
) -> ContentResult<Vec<Triangle>> {
    let pts: Vec<[f32; 3]> = ring.0.iter().map(|p| recenter(*p, center)).collect();
    Ok((1..pts.len().saturating_sub(1))
        .map(|i| Triangle::new(pts[0], pts[i], pts[i + 1], batch_id).with_shader(shader.cloned()))
        .collect())
}

fn square(x: f64, y: f64) -> Ring {
    Ring(vec![
        [x, y, 0.0],
        [x + 10.0, y, 0.0],
        [x + 10.0, y + 10.0, 0.0],
        [x, y + 10.0, 0.0],
    ])
}

fn records() -> Vec<GeometryRecord<Ring>> {
    vec![
        GeometryRecord::new(0, square(0.0, 0.0))
            .with_attribute("a", 1)
            .with_attribute("b", 2),
        GeometryRecord::new(1, square(20.0, 0.0)).with_attribute("a", 3),
    ]
}

#[test]
fn heterogeneous_keys_stay_ragged_by_default() {
    let table = aggregate_attributes(&records(), &AggregationOptions::default()).unwrap();
    assert_eq!(table.get("a").unwrap(), &[json!(1), json!(3)]);
    assert_eq!(table.get("b").unwrap(), &[json!(2)]);
    assert_eq!(table.get("a").unwrap().len(), 2);
    assert_eq!(table.get("b").unwrap().len(), 1);
}

#[test]
fn b3dm_carries_batch_table_and_geometry() {
    let _ = env_logger::builder().is_test(true).try_init();
    let bytes = to_tile(&records(), None, &TileStyle::default(), &fan, &B3dmEncoder).unwrap();
    assert_eq!(&bytes[0..4], b"b3dm");
    assert_eq!(bytes.len() % 8, 0);

    let payload = decode_b3dm(&bytes).unwrap();
    assert_eq!(payload.header.byte_length as usize, bytes.len());
    assert_eq!(payload.batch_length(), Some(2));
    assert_eq!(payload.batch_table, Some(json!({ "a": [1, 3], "b": [2] })));
    assert_eq!(payload.triangle_count(), 4);
    assert_eq!(payload.vertex_count(), 12);
    assert_eq!(payload.gltf.batch_ids.as_ref().unwrap(), &vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]);
}

#[test]
fn padded_aggregation_aligns_batch_table() {
    let assembler = TileContentAssembler::new(fan, B3dmEncoder).with_aggregation(AggregationOptions {
        missing: MissingAttributePolicy::Pad,
    });
    let bytes = assembler.assemble(&records(), None, &TileStyle::default()).unwrap();
    let payload = decode_b3dm(&bytes).unwrap();
    assert_eq!(payload.batch_table, Some(json!({ "a": [1, 3], "b": [2, Value::Null] })));
}

#[test]
fn triangle_groups_follow_record_order() {
    let assembler = TileContentAssembler::new(fan, B3dmEncoder);
    let mut recs = records();
    recs.reverse();
    let groups = assembler.triangle_groups(&recs, None).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].iter().all(|t| t.batch_id == 1));
    assert!(groups[1].iter().all(|t| t.batch_id == 0));
}

#[test]
fn recentring_shifts_positions() {
    let origin = [3_875_000.0, 332_000.0, 5_028_000.0];
    let ring = Ring(
        square(0.0, 0.0)
            .0
            .into_iter()
            .map(|p| [p[0] + origin[0], p[1] + origin[1], p[2] + origin[2]])
            .collect(),
    );
    let assembler = TileContentAssembler::new(fan, B3dmEncoder);
    let groups = assembler
        .triangle_groups(&[GeometryRecord::new(0, ring)], Some(origin))
        .unwrap();
    assert_eq!(groups[0][0].positions[1], [10.0, 0.0, 0.0]);
    assert_eq!(groups[0][0].positions[2], [10.0, 10.0, 0.0]);
}

#[test]
fn gltf_output_keeps_attributes_in_extras() {
    let style = TileStyle::from_json(r#"{ "create_gltf": true, "add_outlines": true }"#).unwrap();
    let bytes = to_tile(&records(), None, &style, &fan, &B3dmEncoder).unwrap();
    assert_eq!(&bytes[0..4], b"glTF");
    let geom = decode_glb(&bytes).unwrap();
    assert_eq!(geom.json["extras"]["attributes"], json!({ "a": [1, 3], "b": [2] }));
    assert_eq!(geom.json["extensionsUsed"][0], "CESIUM_primitive_outline");
    assert_eq!(geom.positions.len(), 12 * 3);
}

#[test]
fn shader_override_changes_material() {
    let red = ShaderColors {
        base_color: Some("#FF000080".into()),
        metallic_roughness: Some("#FF0000".into()),
        emissive: None,
    };
    let recs = vec![
        GeometryRecord::new(0, square(0.0, 0.0)),
        GeometryRecord::new(1, square(20.0, 0.0)).with_shader(red),
    ];
    let bytes = to_tile(&recs, None, &TileStyle::default(), &fan, &B3dmEncoder).unwrap();
    let payload = decode_b3dm(&bytes).unwrap();
    let materials = payload.gltf.json["materials"].as_array().unwrap();
    assert_eq!(materials.len(), 2);
    assert_eq!(materials[0]["alphaMode"], "OPAQUE");
    assert_eq!(materials[1]["alphaMode"], "BLEND");
    assert_eq!(materials[1]["pbrMetallicRoughness"]["metallicFactor"], 1.0);
    assert!(payload.batch_table.is_none());
}

#[test]
fn empty_tile_still_encodes() {
    let bytes = to_tile::<Ring, _, _>(&[], None, &TileStyle::default(), &fan, &B3dmEncoder).unwrap();
    let payload = decode_b3dm(&bytes).unwrap();
    assert_eq!(payload.batch_length(), Some(0));
    assert_eq!(payload.triangle_count(), 0);
}
