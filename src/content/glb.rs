//! Minimal glTF 2.0 binary writer for batched triangle groups

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use super::error::{ContentError, ContentResult};
use super::record::{ShaderColors, Triangle};
use super::style::{parse_hex_color, TileStyle};

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Extension name for outline edges
pub const OUTLINE_EXTENSION: &str = "CESIUM_primitive_outline";

/// Rotates z-up content into glTF's y-up frame (column-major)
#[rustfmt::skip]
const Z_UP_TO_Y_UP: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 0.0, -1.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct PbrMaterial {
    base_color: [f32; 4],
    metallic: f32,
    roughness: f32,
    emissive: [f32; 3],
}

impl PbrMaterial {
    fn resolve(shader: Option<&ShaderColors>, style: &TileStyle) -> ContentResult<Self> {
        let base = shader
            .and_then(|s| s.base_color.as_deref())
            .unwrap_or(&style.default_color);
        let mr = shader
            .and_then(|s| s.metallic_roughness.as_deref())
            .unwrap_or(&style.default_metallic_roughness);
        let emissive = match shader.and_then(|s| s.emissive.as_deref()) {
            Some(hex) => {
                let c = parse_hex_color(hex)?;
                [c[0], c[1], c[2]]
            }
            None => [0.0; 3],
        };
        let mr = parse_hex_color(mr)?;
        Ok(Self {
            base_color: parse_hex_color(base)?,
            metallic: mr[0],
            roughness: mr[1],
            emissive,
        })
    }

    fn to_json(&self, double_sided: bool) -> Value {
        let alpha_mode = if self.base_color[3] < 1.0 { "BLEND" } else { "OPAQUE" };
        json!({
            "pbrMetallicRoughness": {
                "baseColorFactor": self.base_color,
                "metallicFactor": self.metallic,
                "roughnessFactor": self.roughness,
            },
            "emissiveFactor": self.emissive,
            "alphaMode": alpha_mode,
            "doubleSided": double_sided,
        })
    }
}

/// Unindexed triangles sharing one material
#[derive(Default)]
struct Primitive {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    batch_ids: Vec<f32>,
}

impl Primitive {
    fn push(&mut self, t: &Triangle) {
        let n = t.normal();
        for p in t.positions {
            self.positions.push(p);
            self.normals.push(n);
            self.batch_ids.push(t.batch_id as f32);
        }
    }
}

#[derive(Default)]
struct BinBuffer {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BinBuffer {
    fn push_view(&mut self, bytes: Vec<u8>, target: u32) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
            "target": target,
        }));
        self.bin.extend(bytes);
        self.views.len() - 1
    }

    fn push_accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_vec3(&mut self, data: &[[f32; 3]], bounds: bool) -> usize {
        let bytes = data.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.push_view(bytes, ARRAY_BUFFER);
        let mut accessor = json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": data.len(),
            "type": "VEC3",
        });
        if bounds {
            let mut min = [f32::MAX; 3];
            let mut max = [f32::MIN; 3];
            for p in data {
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
            accessor["min"] = json!(min);
            accessor["max"] = json!(max);
        }
        self.push_accessor(accessor)
    }

    fn push_scalars(&mut self, data: &[f32]) -> usize {
        let bytes = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.push_view(bytes, ARRAY_BUFFER);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": data.len(),
            "type": "SCALAR",
        }))
    }

    fn push_indices(&mut self, data: &[u32]) -> usize {
        let bytes = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.push_view(bytes, ELEMENT_ARRAY_BUFFER);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": data.len(),
            "type": "SCALAR",
        }))
    }
}

/// Edges of every triangle in an unindexed vertex list
fn outline_indices(vertex_count: u32) -> Vec<u32> {
    (0..vertex_count / 3)
        .flat_map(|t| {
            let b = t * 3;
            [b, b + 1, b + 1, b + 2, b + 2, b]
        })
        .collect()
}

/// Encode triangle groups as a GLB. Triangles are grouped into one primitive
/// per distinct material; input order is kept within each primitive.
pub fn write_glb(
    groups: &[Vec<Triangle>],
    style: &TileStyle,
    extras: Option<Value>,
) -> ContentResult<Vec<u8>> {
    let mut materials: Vec<PbrMaterial> = Vec::new();
    let mut primitives: Vec<Primitive> = Vec::new();
    let mut resolved: HashMap<Option<&ShaderColors>, usize> = HashMap::new();

    for triangle in groups.iter().flatten() {
        let key = triangle.shader.as_ref();
        let slot = match resolved.get(&key).copied() {
            Some(slot) => slot,
            None => {
                let material = PbrMaterial::resolve(key, style)?;
                let slot = match materials.iter().position(|m| *m == material) {
                    Some(slot) => slot,
                    None => {
                        materials.push(material);
                        primitives.push(Primitive::default());
                        materials.len() - 1
                    }
                };
                resolved.insert(key, slot);
                slot
            }
        };
        primitives[slot].push(triangle);
    }

    let mut buffer = BinBuffer::default();
    let mut prim_json = Vec::with_capacity(primitives.len());
    for (material, prim) in primitives.iter().enumerate() {
        let count = prim.positions.len() as u32;
        let position = buffer.push_vec3(&prim.positions, true);
        let normal = buffer.push_vec3(&prim.normals, false);
        let batch_id = buffer.push_scalars(&prim.batch_ids);
        let indices = buffer.push_indices(&(0..count).collect::<Vec<_>>());
        let mut p = json!({
            "attributes": { "POSITION": position, "NORMAL": normal, "_BATCHID": batch_id },
            "indices": indices,
            "material": material,
            "mode": 4,
        });
        if style.add_outlines {
            let outline = buffer.push_indices(&outline_indices(count));
            p["extensions"] = json!({ OUTLINE_EXTENSION: { "indices": outline } });
        }
        prim_json.push(p);
    }

    let mut asset = Map::new();
    asset.insert("version".into(), json!("2.0"));
    asset.insert(
        "generator".into(),
        json!(format!("{} {}", crate::GENERATOR_NAME, env!("CARGO_PKG_VERSION"))),
    );
    if !style.copyright.is_empty() {
        asset.insert("copyright".into(), json!(style.copyright));
    }

    let mut gltf = json!({ "asset": asset, "scene": 0 });
    if prim_json.is_empty() {
        gltf["scenes"] = json!([{}]);
    } else {
        gltf["scenes"] = json!([{ "nodes": [0] }]);
        gltf["nodes"] = json!([{ "mesh": 0, "matrix": Z_UP_TO_Y_UP }]);
        gltf["meshes"] = json!([{ "primitives": prim_json }]);
        gltf["materials"] = Value::Array(materials.iter().map(|m| m.to_json(style.double_sided)).collect());
        gltf["accessors"] = Value::Array(buffer.accessors);
        gltf["bufferViews"] = Value::Array(buffer.views);
        gltf["buffers"] = json!([{ "byteLength": buffer.bin.len() }]);
        if style.add_outlines {
            gltf["extensionsUsed"] = json!([OUTLINE_EXTENSION]);
        }
    }
    if let Some(extras) = extras {
        gltf["extras"] = extras;
    }

    pack_glb(&serde_json::to_vec(&gltf)?, &buffer.bin)
}

fn pack_glb(json: &[u8], bin: &[u8]) -> ContentResult<Vec<u8>> {
    let mut json = json.to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut total = 12 + 8 + json.len();
    if !bin.is_empty() {
        total += 8 + bin.len();
    }
    let total = u32::try_from(total)
        .map_err(|_| ContentError::encoding(format!("glTF too large: {} bytes", total)))?;

    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
    }
    Ok(out)
}
