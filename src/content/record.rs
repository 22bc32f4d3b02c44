//! Per-feature geometry records and the triangles they turn into

use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-feature style override. Colors are `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShaderColors {
    pub base_color: Option<String>,
    /// Red channel is metallic, green channel is roughness
    pub metallic_roughness: Option<String>,
    pub emissive: Option<String>,
}

/// One feature of a tile: an opaque geometry plus its attributes.
///
/// `G` is whatever the geometry parser produced; the crate only hands it to
/// a [`Triangulator`](super::Triangulator).
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord<G> {
    pub batch_id: u32,
    pub geometry: G,
    pub attributes: Map<String, Value>,
    pub shader: Option<ShaderColors>,
}

impl<G> GeometryRecord<G> {
    pub fn new(batch_id: u32, geometry: G) -> Self {
        Self {
            batch_id,
            geometry,
            attributes: Map::new(),
            shader: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_shader(mut self, shader: ShaderColors) -> Self {
        self.shader = Some(shader);
        self
    }
}

/// A single output triangle tagged with its feature's batch id
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub positions: [[f32; 3]; 3],
    pub batch_id: u32,
    pub shader: Option<ShaderColors>,
}

impl Triangle {
    pub fn new(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3], batch_id: u32) -> Self {
        Self {
            positions: [p0, p1, p2],
            batch_id,
            shader: None,
        }
    }

    pub fn with_shader(mut self, shader: Option<ShaderColors>) -> Self {
        self.shader = shader;
        self
    }

    /// Unit face normal, zero for degenerate triangles
    pub fn normal(&self) -> [f32; 3] {
        let [a, b, c] = self.positions.map(Vec3::from_array);
        (b - a).cross(c - a).normalize_or_zero().to_array()
    }
}

/// Offset a world position by `center` and narrow to f32.
///
/// ECEF coordinates lose centimeters in single precision; subtracting a
/// nearby center first keeps them.
pub fn recenter(point: [f64; 3], center: Option<[f64; 3]>) -> [f32; 3] {
    let p = DVec3::from_array(point);
    let local = match center {
        Some(c) => p - DVec3::from_array(c),
        None => p,
    };
    local.as_vec3().to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal() {
        let t = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0);
        assert_eq!(t.normal(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let t = Triangle::new([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0], 0);
        assert_eq!(t.normal(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_recenter_keeps_precision() {
        let p = [3_875_123.456, 332_001.25, 5_028_000.5];
        let c = [3_875_000.0, 332_000.0, 5_028_000.0];
        let local = recenter(p, Some(c));
        assert!((local[0] - 123.456).abs() < 1e-3);
        assert!((local[1] - 1.25).abs() < 1e-6);
        assert_eq!(recenter([1.5, 2.0, 3.0], None), [1.5, 2.0, 3.0]);
    }

    #[test]
    fn test_record_builder() {
        let r = GeometryRecord::new(7, ())
            .with_attribute("name", "dam")
            .with_attribute("height", 12.5);
        assert_eq!(r.batch_id, 7);
        assert_eq!(r.attributes["name"], "dam");
        assert!(r.shader.is_none());
    }
}
