//! Bounding volume types for 3D Tiles

use serde::{Deserialize, Serialize};

use crate::geo::bbox_to_region;

/// Bounding volume for a tile. Only the geographic `region` form is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    /// 6 doubles: [west, south, east, north, min_height, max_height]
    /// Longitude/latitude in radians, heights in the caller's linear unit
    pub region: [f64; 6],
}

impl BoundingVolume {
    /// Wrap an already computed region, no conversion applied
    pub fn from_region(region: [f64; 6]) -> Self {
        Self { region }
    }

    /// Region for a degree box `[min_x, min_y, max_x, max_y]` and a height range
    pub fn from_degrees(bbox: [f64; 4], min_height: f64, max_height: f64) -> Self {
        Self {
            region: bbox_to_region(bbox, min_height, max_height),
        }
    }

    pub fn min_height(&self) -> f64 {
        self.region[4]
    }

    pub fn max_height(&self) -> f64 {
        self.region[5]
    }

    /// True when `other` lies within this region horizontally and vertically
    pub fn contains(&self, other: &BoundingVolume) -> bool {
        let (a, b) = (&self.region, &other.region);
        b[0] >= a[0] && b[1] >= a[1] && b[2] <= a[2] && b[3] <= a[3] && b[4] >= a[4] && b[5] <= a[5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_json_shape() {
        let bv = BoundingVolume::from_region([0.1, 0.2, 0.3, 0.4, 0.0, 10.0]);
        let json = serde_json::to_value(bv).unwrap();
        assert_eq!(json["region"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_contains() {
        let outer = BoundingVolume::from_degrees([0.0, 0.0, 10.0, 10.0], 0.0, 50.0);
        let inner = BoundingVolume::from_degrees([2.0, 2.0, 5.0, 5.0], 0.0, 50.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
