//! Styling options handed to the tile encoder

use serde::{Deserialize, Serialize};

use super::error::{ContentError, ContentResult};

/// Encoder styling. Every field has a default, so a partial JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileStyle {
    /// Written to the glTF `asset.copyright`, skipped when empty
    pub copyright: String,
    /// Emit `CESIUM_primitive_outline` edges
    pub add_outlines: bool,
    /// Base color for records without a shader override
    pub default_color: String,
    /// Metallic (red) and roughness (green) for records without an override
    pub default_metallic_roughness: String,
    pub double_sided: bool,
    /// Write a bare GLB instead of a b3dm container
    pub create_gltf: bool,
}

impl Default for TileStyle {
    fn default() -> Self {
        Self {
            copyright: String::new(),
            add_outlines: false,
            default_color: "#FFFFFF".to_string(),
            default_metallic_roughness: "#008000".to_string(),
            double_sided: true,
            create_gltf: false,
        }
    }
}

impl TileStyle {
    pub fn from_json(json_str: &str) -> ContentResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` into RGBA in 0..=1
pub fn parse_hex_color(hex: &str) -> ContentResult<[f32; 4]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !(digits.len() == 6 || digits.len() == 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ContentError::InvalidColor(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| ContentError::InvalidColor(hex.to_string()))
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}
