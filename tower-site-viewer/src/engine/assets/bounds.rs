use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Spatial extents of the surveyed site in scene coordinates (metres).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl SiteBounds {
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            ((self.max_x + self.min_x) * 0.5) as f32,
            ((self.max_y + self.min_y) * 0.5) as f32,
            ((self.max_z + self.min_z) * 0.5) as f32,
        )
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(
            (self.max_x - self.min_x) as f32,
            (self.max_y - self.min_y) as f32,
            (self.max_z - self.min_z) as f32,
        )
    }

    pub fn ground_height(&self) -> f32 {
        self.min_y as f32
    }

    /// Horizontal containment test for heightmap addressing.
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        (x as f64) >= self.min_x
            && (x as f64) <= self.max_x
            && (z as f64) >= self.min_z
            && (z as f64) <= self.max_z
    }

    /// Grow to cover a point; used when accumulating building extents.
    pub fn expand_to(&mut self, p: Vec3) {
        self.min_x = self.min_x.min(p.x as f64);
        self.max_x = self.max_x.max(p.x as f64);
        self.min_y = self.min_y.min(p.y as f64);
        self.max_y = self.max_y.max(p.y as f64);
        self.min_z = self.min_z.min(p.z as f64);
        self.max_z = self.max_z.max(p.z as f64);
    }

    pub fn from_point(p: Vec3) -> Self {
        Self {
            min_x: p.x as f64,
            max_x: p.x as f64,
            min_y: p.y as f64,
            max_y: p.y as f64,
            min_z: p.z as f64,
            max_z: p.z as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_size() {
        let bounds = SiteBounds {
            min_x: -10.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 4.0,
            min_z: -6.0,
            max_z: 2.0,
        };
        assert_eq!(bounds.center(), Vec3::new(0.0, 2.0, -2.0));
        assert_eq!(bounds.size(), Vec3::new(20.0, 4.0, 8.0));
        assert!(bounds.contains_xz(9.9, 1.9));
        assert!(!bounds.contains_xz(10.1, 0.0));
    }

    #[test]
    fn expand_covers_new_points() {
        let mut bounds = SiteBounds::from_point(Vec3::ZERO);
        bounds.expand_to(Vec3::new(5.0, 22.0, -3.0));
        assert_eq!(bounds.max_y, 22.0);
        assert_eq!(bounds.min_z, -3.0);
        assert_eq!(bounds.min_x, 0.0);
    }
}
