//! Degree bounding boxes and 3D Tiles bounding regions.

use serde::{Deserialize, Serialize};

/// Axis-aligned lon/lat box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct GeoBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl GeoBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Same box with every bound converted to radians.
    pub fn to_radians(&self) -> Self {
        Self {
            min_x: self.min_x.to_radians(),
            min_y: self.min_y.to_radians(),
            max_x: self.max_x.to_radians(),
            max_y: self.max_y.to_radians(),
        }
    }

    /// `[west, south, east, north, min_height, max_height]` using this box's
    /// units as-is. Inverted or empty boxes pass through untouched.
    pub fn to_region(&self, min_height: f64, max_height: f64) -> [f64; 6] {
        [self.min_x, self.min_y, self.max_x, self.max_y, min_height, max_height]
    }
}

impl From<[f64; 4]> for GeoBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<GeoBox> for [f64; 4] {
    fn from(b: GeoBox) -> Self {
        [b.min_x, b.min_y, b.max_x, b.max_y]
    }
}

/// Degree box plus height range to a radian bounding region.
pub fn bbox_to_region(bbox: [f64; 4], min_height: f64, max_height: f64) -> [f64; 6] {
    GeoBox::from(bbox).to_radians().to_region(min_height, max_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_degrees() {
        let r = bbox_to_region([10.0, 20.0, 30.0, 40.0], 0.0, 100.0);
        let expected = [0.1745, 0.3491, 0.5236, 0.6981, 0.0, 100.0];
        for (a, b) in r.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_inverted_box_passes_through() {
        let r = bbox_to_region([30.0, 40.0, 10.0, 20.0], 50.0, -5.0);
        assert!(r[0] > r[2]);
        assert!(r[1] > r[3]);
        assert_eq!(r[4], 50.0);
        assert_eq!(r[5], -5.0);
    }

    #[test]
    fn test_geobox_serializes_as_array() {
        let b = GeoBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(serde_json::to_string(&b).unwrap(), "[1.0,2.0,3.0,4.0]");
        let back: GeoBox = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(back, b);
    }
}
