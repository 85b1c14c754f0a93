use crate::engine::assets::bounds::SiteBounds;
use crate::engine::geo::{Geodetic, SiteFrame};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Site description as a Bevy asset. Mirrors the JSON structure exactly:
/// name, geodetic anchor of the local frame, heightmap texture path, and the
/// site's scene-space bounds.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct SiteManifest {
    pub name: String,
    pub origin_longitude_deg: f64,
    pub origin_latitude_deg: f64,
    pub heightmap_texture: String,
    pub bounds: SiteBounds,
}

impl SiteManifest {
    /// Local tangent frame anchored at the manifest's geodetic origin.
    pub fn site_frame(&self) -> SiteFrame {
        SiteFrame::new(Geodetic::from_degrees(
            self.origin_longitude_deg,
            self.origin_latitude_deg,
            0.0,
        ))
    }

    pub fn ground_height(&self) -> f32 {
        self.bounds.ground_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_round_trips_through_json() {
        let json = r#"{
            "name": "HMP Wandsworth",
            "origin_longitude_deg": -0.1774058,
            "origin_latitude_deg": 51.4482544,
            "heightmap_texture": "site/heightmap.dds",
            "bounds": {
                "min_x": -800.0, "max_x": 800.0,
                "min_y": 0.0, "max_y": 12.0,
                "min_z": -800.0, "max_z": 800.0
            }
        }"#;
        let manifest: SiteManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.name, "HMP Wandsworth");
        assert_eq!(manifest.ground_height(), 0.0);

        let back = serde_json::to_string(&manifest).unwrap();
        let again: SiteManifest = serde_json::from_str(&back).unwrap();
        assert_eq!(again.bounds, manifest.bounds);
    }
}
