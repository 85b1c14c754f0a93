//! Asynchronous load of the remote buildings tileset, referenced by asset
//! identifier. Arrivals are spawned as extruded footprint meshes and the
//! camera is flown to frame them. A failed fetch degrades to a warning
//! banner; the viewer stays usable without buildings.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::site::BUILDINGS_TILESET_ASSET_ID;
use serde::{Deserialize, Serialize};

use crate::engine::assets::bounds::SiteBounds;
use crate::engine::camera::ViewportCamera;
use crate::engine::geo::{Geodetic, SiteFrame};
use crate::engine::loading::manifest_loader::signed_asset_path;
use crate::engine::scene::extrusion::extruded_prism_mesh;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingFootprint {
    /// (longitude, latitude) degree pairs; open or closed ring.
    pub footprint_deg: Vec<[f64; 2]>,
    pub height_m: f64,
}

/// Buildings tileset as a Bevy asset. Mirrors the JSON structure exactly.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct BuildingTileset {
    pub name: String,
    pub buildings: Vec<BuildingFootprint>,
}

#[derive(Component)]
pub struct Building;

#[derive(Component)]
pub struct BuildingsWarningBanner;

#[derive(Resource, Default)]
pub struct BuildingsLoader {
    handle: Option<Handle<BuildingTileset>>,
    spawned: bool,
    failed: bool,
}

pub fn start_buildings_loading(
    mut loader: ResMut<BuildingsLoader>,
    asset_server: Res<AssetServer>,
) {
    let path = signed_asset_path(&format!(
        "tilesets/{BUILDINGS_TILESET_ASSET_ID}.tileset.json"
    ));
    info!("Loading buildings tileset {BUILDINGS_TILESET_ASSET_ID} from: {path}");
    loader.handle = Some(asset_server.load(path));
}

pub fn spawn_buildings_when_ready(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut loader: ResMut<BuildingsLoader>,
    mut viewport_camera: ResMut<ViewportCamera>,
    tilesets: Res<Assets<BuildingTileset>>,
    frame: Res<SiteFrame>,
) {
    if loader.spawned {
        return;
    }
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    let Some(tileset) = tilesets.get(handle) else {
        return;
    };

    // Cap winding follows the footprint ring, so render both faces.
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.62, 0.60, 0.57),
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let mut tileset_bounds: Option<SiteBounds> = None;
    let mut spawned = 0usize;

    for (index, building) in tileset.buildings.iter().enumerate() {
        let ring: Vec<Vec3> = building
            .footprint_deg
            .iter()
            .map(|&[lon, lat]| {
                let p = frame.world_from_geodetic(Geodetic::from_degrees(lon, lat, 0.0));
                Vec3::new(p.x, 0.0, p.z)
            })
            .collect();

        let Some(mesh) = extruded_prism_mesh(&ring, building.height_m as f32) else {
            warn!("skipping degenerate building footprint #{index}");
            continue;
        };

        for p in &ring {
            let top = *p + Vec3::Y * building.height_m as f32;
            match tileset_bounds.as_mut() {
                Some(bounds) => {
                    bounds.expand_to(*p);
                    bounds.expand_to(top);
                }
                None => {
                    let mut bounds = SiteBounds::from_point(*p);
                    bounds.expand_to(top);
                    tileset_bounds = Some(bounds);
                }
            }
        }

        commands.spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            NoFrustumCulling,
            Building,
            Name::new(format!("{}:{index}", tileset.name)),
        ));
        spawned += 1;
    }

    info!("Buildings tileset ready: {spawned} buildings spawned");
    if let Some(bounds) = tileset_bounds {
        viewport_camera.frame_bounds(&bounds, 2.0);
    }
    loader.spawned = true;
}

/// Non-fatal failure surface: log, banner, carry on without buildings.
pub fn watch_buildings_load_failure(
    mut commands: Commands,
    mut loader: ResMut<BuildingsLoader>,
    asset_server: Res<AssetServer>,
) {
    if loader.failed || loader.spawned {
        return;
    }
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) else {
        return;
    };

    warn!("buildings tileset {BUILDINGS_TILESET_ASSET_ID} failed to load: {err}");
    loader.failed = true;

    commands.spawn((
        BuildingsWarningBanner,
        Text::new("Buildings unavailable"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.72, 0.25)),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(12.0),
            padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
            ..default()
        },
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tileset_parses_from_json() {
        let json = r#"{
            "name": "osm-buildings-sample",
            "buildings": [
                {
                    "footprint_deg": [
                        [-0.1768, 51.4490],
                        [-0.1764, 51.4490],
                        [-0.1764, 51.4493]
                    ],
                    "height_m": 14.0
                }
            ]
        }"#;
        let tileset: BuildingTileset = serde_json::from_str(json).unwrap();
        assert_eq!(tileset.buildings.len(), 1);
        assert_eq!(tileset.buildings[0].height_m, 14.0);
    }
}
