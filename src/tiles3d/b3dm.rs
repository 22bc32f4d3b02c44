//! B3DM (Batched 3D Model) container: writer and reader

use bytemuck::{Pod, Zeroable};
use serde_json::Value;

use super::error::{Tiles3dError, Tiles3dResult};

/// Header length in bytes
pub const B3DM_HEADER_LEN: usize = 28;

const GLB_JSON_CHUNK: u32 = 0x4E4F534A;
const GLB_BIN_CHUNK: u32 = 0x004E4942;

/// B3DM file header (28 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct B3dmHeader {
    /// Magic bytes "b3dm"
    pub magic: [u8; 4],
    /// Version (should be 1)
    pub version: u32,
    /// Total byte length of the file
    pub byte_length: u32,
    /// Feature table JSON byte length
    pub feature_table_json_byte_length: u32,
    /// Feature table binary byte length
    pub feature_table_binary_byte_length: u32,
    /// Batch table JSON byte length
    pub batch_table_json_byte_length: u32,
    /// Batch table binary byte length
    pub batch_table_binary_byte_length: u32,
}

/// Pad a JSON string with spaces so that it ends on an 8-byte boundary
/// when it starts at `offset`.
fn padded_json(json: &str, offset: usize) -> Vec<u8> {
    let mut bytes = json.as_bytes().to_vec();
    while (offset + bytes.len()) % 8 != 0 {
        bytes.push(b' ');
    }
    bytes
}

/// Wrap a GLB into a b3dm container.
///
/// `batch_table` is omitted from the file when `None`.
pub fn write_b3dm(
    feature_table: &Value,
    batch_table: Option<&Value>,
    glb: &[u8],
) -> Tiles3dResult<Vec<u8>> {
    let ft = padded_json(&serde_json::to_string(feature_table)?, B3DM_HEADER_LEN);
    let bt = match batch_table {
        Some(bt) => padded_json(&serde_json::to_string(bt)?, B3DM_HEADER_LEN + ft.len()),
        None => Vec::new(),
    };

    let mut body_len = B3DM_HEADER_LEN + ft.len() + bt.len() + glb.len();
    let glb_padding = (8 - body_len % 8) % 8;
    body_len += glb_padding;

    let byte_length = u32::try_from(body_len)
        .map_err(|_| Tiles3dError::b3dm(format!("payload too large: {} bytes", body_len)))?;

    let header = B3dmHeader {
        magic: *b"b3dm",
        version: 1,
        byte_length,
        feature_table_json_byte_length: ft.len() as u32,
        feature_table_binary_byte_length: 0,
        batch_table_json_byte_length: bt.len() as u32,
        batch_table_binary_byte_length: 0,
    };

    let mut out = Vec::with_capacity(body_len);
    out.extend_from_slice(bytemuck::bytes_of(&header));
    out.extend_from_slice(&ft);
    out.extend_from_slice(&bt);
    out.extend_from_slice(glb);
    out.resize(body_len, 0);
    Ok(out)
}

/// Geometry pulled out of a GLB: flat positions/normals, indices, batch ids
#[derive(Debug, Default)]
pub struct GltfGeometry {
    /// Parsed glTF JSON chunk
    pub json: Value,
    /// Vertex positions (3 floats per vertex)
    pub positions: Vec<f32>,
    /// Vertex normals (3 floats per vertex, optional)
    pub normals: Option<Vec<f32>>,
    /// Triangle indices, rebased across primitives
    pub indices: Vec<u32>,
    /// Batch IDs per vertex (optional)
    pub batch_ids: Option<Vec<u32>>,
}

/// Decoded B3DM payload
#[derive(Debug)]
pub struct B3dmPayload {
    /// Header information
    pub header: B3dmHeader,
    /// Feature table JSON (parsed)
    pub feature_table: Value,
    /// Batch table JSON (parsed, if present)
    pub batch_table: Option<Value>,
    /// Embedded glTF geometry
    pub gltf: GltfGeometry,
}

impl B3dmPayload {
    /// `BATCH_LENGTH` from the feature table
    pub fn batch_length(&self) -> Option<u64> {
        self.feature_table.get("BATCH_LENGTH").and_then(|v| v.as_u64())
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.gltf.positions.len() / 3
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.gltf.indices.len() / 3
    }
}

fn json_section(data: &[u8], start: usize, len: u32, what: &str) -> Tiles3dResult<Option<Value>> {
    if len == 0 {
        return Ok(None);
    }
    let end = start + len as usize;
    let bytes = data
        .get(start..end)
        .ok_or_else(|| Tiles3dError::b3dm(format!("{} runs past end of file", what)))?;
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Tiles3dError::b3dm(format!("Invalid UTF-8 in {}: {}", what, e)))?;
    Ok(Some(serde_json::from_str(text.trim_end())?))
}

/// Decode a B3DM file from bytes
pub fn decode_b3dm(data: &[u8]) -> Tiles3dResult<B3dmPayload> {
    if data.len() < B3DM_HEADER_LEN {
        return Err(Tiles3dError::b3dm("File too small for header"));
    }

    let header: B3dmHeader = bytemuck::pod_read_unaligned(&data[0..B3DM_HEADER_LEN]);

    if &header.magic != b"b3dm" {
        return Err(Tiles3dError::b3dm(format!("Invalid magic: {:?}", header.magic)));
    }
    if header.version != 1 {
        return Err(Tiles3dError::b3dm(format!("Unsupported version: {}", header.version)));
    }

    let mut offset = B3DM_HEADER_LEN;
    let feature_table = json_section(data, offset, header.feature_table_json_byte_length, "feature table")?
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    offset += header.feature_table_json_byte_length as usize;
    offset += header.feature_table_binary_byte_length as usize;

    let batch_table = json_section(data, offset, header.batch_table_json_byte_length, "batch table")?;
    offset += header.batch_table_json_byte_length as usize;
    offset += header.batch_table_binary_byte_length as usize;

    let gltf = data
        .get(offset..)
        .ok_or_else(|| Tiles3dError::b3dm("glTF section missing"))?;

    Ok(B3dmPayload {
        header,
        feature_table,
        batch_table,
        gltf: decode_glb(gltf)?,
    })
}

/// Parse GLB (binary glTF) geometry
pub fn decode_glb(data: &[u8]) -> Tiles3dResult<GltfGeometry> {
    if data.len() < 12 || &data[0..4] != b"glTF" {
        return Err(Tiles3dError::gltf("not a binary glTF"));
    }
    let version = read_u32(data, 4);
    if version != 2 {
        return Err(Tiles3dError::gltf(format!("Unsupported glTF version: {}", version)));
    }

    let mut offset = 12usize;
    let mut json: Option<Value> = None;
    let mut bin: &[u8] = &[];

    while offset + 8 <= data.len() {
        let chunk_length = read_u32(data, offset) as usize;
        let chunk_type = read_u32(data, offset + 4);
        offset += 8;
        let chunk = offset
            .checked_add(chunk_length)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| Tiles3dError::gltf("chunk runs past end of data"))?;

        match chunk_type {
            GLB_JSON_CHUNK => {
                let text = std::str::from_utf8(chunk)
                    .map_err(|e| Tiles3dError::gltf(format!("Invalid UTF-8: {}", e)))?;
                json = Some(serde_json::from_str(text.trim_end())?);
            }
            GLB_BIN_CHUNK => bin = chunk,
            _ => {}
        }
        offset += chunk_length;
    }

    let json = json.ok_or_else(|| Tiles3dError::gltf("No JSON chunk"))?;
    extract_mesh_data(json, bin)
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Extract mesh data from glTF JSON and binary buffer
fn extract_mesh_data(json: Value, bin: &[u8]) -> Tiles3dResult<GltfGeometry> {
    let mut out = GltfGeometry::default();
    {
        let accessors = Accessors::new(&json, bin);
        // a tile without features carries no meshes at all
        let meshes = json
            .get("meshes")
            .and_then(|m| m.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for prim in meshes
            .iter()
            .filter_map(|m| m.get("primitives").and_then(|p| p.as_array()))
            .flatten()
        {
            let attributes = prim
                .get("attributes")
                .and_then(|a| a.as_object())
                .ok_or_else(|| Tiles3dError::gltf("No attributes"))?;
            let base_vertex = (out.positions.len() / 3) as u32;

            if let Some(idx) = attributes.get("POSITION").and_then(|p| p.as_u64()) {
                out.positions.extend(accessors.read_f32(idx as usize)?);
            }
            if let Some(idx) = attributes.get("NORMAL").and_then(|n| n.as_u64()) {
                out.normals
                    .get_or_insert_with(Vec::new)
                    .extend(accessors.read_f32(idx as usize)?);
            }
            if let Some(idx) = attributes.get("_BATCHID").and_then(|b| b.as_u64()) {
                out.batch_ids
                    .get_or_insert_with(Vec::new)
                    .extend(accessors.read_f32(idx as usize)?.into_iter().map(|b| b as u32));
            }
            if let Some(idx) = prim.get("indices").and_then(|i| i.as_u64()) {
                let indices = accessors.read_u32(idx as usize)?;
                out.indices.extend(indices.iter().map(|i| i + base_vertex));
            }
        }
    }
    out.json = json;
    Ok(out)
}

struct Accessors<'a> {
    json: &'a Value,
    bin: &'a [u8],
}

impl<'a> Accessors<'a> {
    fn new(json: &'a Value, bin: &'a [u8]) -> Self {
        Self { json, bin }
    }

    /// Byte range, element count and component count of accessor `idx`
    fn locate(&self, idx: usize, component_size: usize) -> Tiles3dResult<(usize, usize)> {
        let accessor = self
            .json
            .get("accessors")
            .and_then(|a| a.get(idx))
            .ok_or_else(|| Tiles3dError::gltf("Accessor out of range"))?;
        let bv_idx = accessor.get("bufferView").and_then(|b| b.as_u64()).unwrap_or(0) as usize;
        let count = accessor.get("count").and_then(|c| c.as_u64()).unwrap_or(0) as usize;
        let byte_offset = accessor.get("byteOffset").and_then(|o| o.as_u64()).unwrap_or(0) as usize;
        let components = match accessor.get("type").and_then(|t| t.as_str()).unwrap_or("SCALAR") {
            "VEC2" => 2,
            "VEC3" => 3,
            "VEC4" => 4,
            _ => 1,
        };

        let bv = self
            .json
            .get("bufferViews")
            .and_then(|b| b.get(bv_idx))
            .ok_or_else(|| Tiles3dError::gltf("BufferView out of range"))?;
        let view_offset = bv.get("byteOffset").and_then(|o| o.as_u64()).unwrap_or(0) as usize;
        let overrun = || Tiles3dError::gltf("Buffer overrun");
        let start = view_offset.checked_add(byte_offset).ok_or_else(overrun)?;
        let values = count.checked_mul(components).ok_or_else(overrun)?;
        let end = values
            .checked_mul(component_size)
            .and_then(|len| start.checked_add(len))
            .ok_or_else(overrun)?;
        if end > self.bin.len() {
            return Err(overrun());
        }
        Ok((start, values))
    }

    fn component_type(&self, idx: usize) -> u64 {
        self.json
            .get("accessors")
            .and_then(|a| a.get(idx))
            .and_then(|a| a.get("componentType"))
            .and_then(|c| c.as_u64())
            .unwrap_or(5126)
    }

    fn read_f32(&self, idx: usize) -> Tiles3dResult<Vec<f32>> {
        let (start, values) = self.locate(idx, 4)?;
        Ok(self.bin[start..start + values * 4]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn read_u32(&self, idx: usize) -> Tiles3dResult<Vec<u32>> {
        match self.component_type(idx) {
            5121 => {
                let (start, n) = self.locate(idx, 1)?;
                Ok(self.bin[start..start + n].iter().map(|&b| b as u32).collect())
            }
            5123 => {
                let (start, n) = self.locate(idx, 2)?;
                Ok(self.bin[start..start + n * 2]
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                    .collect())
            }
            5125 => {
                let (start, n) = self.locate(idx, 4)?;
                Ok(self.bin[start..start + n * 4]
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect())
            }
            other => Err(Tiles3dError::gltf(format!("Unsupported component type: {}", other))),
        }
    }
}
