//! Tile encoders: the seam between content assembly and binary output

use serde_json::json;

use super::attributes::AttributeTable;
use super::error::ContentResult;
use super::glb::write_glb;
use super::record::Triangle;
use super::style::TileStyle;
use crate::tiles3d::write_b3dm;

/// Turns an attribute table and per-feature triangle groups into a payload.
pub trait TileEncoder {
    fn encode(
        &self,
        attributes: &AttributeTable,
        triangles: &[Vec<Triangle>],
        style: &TileStyle,
    ) -> ContentResult<Vec<u8>>;
}

impl<E: TileEncoder + ?Sized> TileEncoder for &E {
    fn encode(
        &self,
        attributes: &AttributeTable,
        triangles: &[Vec<Triangle>],
        style: &TileStyle,
    ) -> ContentResult<Vec<u8>> {
        (**self).encode(attributes, triangles, style)
    }
}

/// Writes b3dm, or a bare GLB when [`TileStyle::create_gltf`] is set.
///
/// The batch table is the attribute table; `BATCH_LENGTH` is the number of
/// triangle groups. In GLB mode the table goes to the root `extras.attributes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct B3dmEncoder;

impl TileEncoder for B3dmEncoder {
    fn encode(
        &self,
        attributes: &AttributeTable,
        triangles: &[Vec<Triangle>],
        style: &TileStyle,
    ) -> ContentResult<Vec<u8>> {
        let batch_length = triangles.len();
        for column in attributes.ragged_columns(batch_length) {
            log::warn!(
                "attribute '{}' has {} values for batch length {}",
                column.name,
                column.values.len(),
                batch_length
            );
        }

        if style.create_gltf {
            let extras = (!attributes.is_empty()).then(|| json!({ "attributes": attributes.to_json() }));
            return write_glb(triangles, style, extras);
        }

        let glb = write_glb(triangles, style, None)?;
        let feature_table = json!({ "BATCH_LENGTH": batch_length });
        let batch_table = (!attributes.is_empty()).then(|| attributes.to_json());
        Ok(write_b3dm(&feature_table, batch_table.as_ref(), &glb)?)
    }
}
