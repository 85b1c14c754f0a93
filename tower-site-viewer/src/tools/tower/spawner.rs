//! Spawns one tower per "Add Tower" activation: cylinder marker at the point
//! under the viewport centre (fixed fallback coordinate on a sky miss),
//! derived overhead label, and translucent influence sphere.

use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::{
    TOWER_CYLINDER_LENGTH, TOWER_CYLINDER_RADIUS, TOWER_LABEL_FONT_SIZE, TOWER_SPHERE_RADIUS,
};
use constants::site::FALLBACK_SPAWN_DEGREES;

use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::assets::terrain_assets::TerrainAssets;
use crate::engine::camera::ViewportCamera;
use crate::engine::geo::{Geodetic, SiteFrame};
use crate::tools::tower::state::{TowerCounter, TowerLabel, TowerMarker, TowerSphere};

#[derive(Event)]
pub struct SpawnTowerEvent;

/// Fixed ground-level spawn point used when the centre ray hits nothing.
/// Deliberately a literal coordinate, not "wherever the camera is".
pub fn fallback_spawn_point(frame: &SiteFrame) -> Vec3 {
    frame.world_from_geodetic(Geodetic::from_degrees(
        FALLBACK_SPAWN_DEGREES[0],
        FALLBACK_SPAWN_DEGREES[1],
        0.0,
    ))
}

pub fn handle_spawn_tower_events(
    mut events: EventReader<SpawnTowerEvent>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut counter: ResMut<TowerCounter>,
    mut viewport_camera: ResMut<ViewportCamera>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    terrain_assets: Res<TerrainAssets>,
    images: Res<Assets<Image>>,
    manifests: Res<Assets<SiteManifest>>,
    frame: Res<SiteFrame>,
) {
    for _ in events.read() {
        let (index, tower_name) = counter.next_name();

        let spawn_point = viewport_center_hit(
            &mut viewport_camera,
            &windows,
            &cameras,
            &terrain_assets,
            &images,
            &manifests,
        )
        .unwrap_or_else(|| fallback_spawn_point(&frame));

        info!("{tower_name} spawned at {spawn_point:?}");

        let marker = commands
            .spawn((
                Mesh3d(meshes.add(Cylinder::new(TOWER_CYLINDER_RADIUS, TOWER_CYLINDER_LENGTH))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::BLACK,
                    ..default()
                })),
                Transform::from_translation(spawn_point),
                TowerMarker { index },
                Name::new(tower_name.clone()),
            ))
            .id();

        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(TOWER_SPHERE_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(0.68, 1.0, 0.18, 0.2),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(spawn_point),
            Wireframe,
            WireframeColor {
                color: Color::srgb(0.0, 0.5, 0.0),
            },
            TowerSphere { marker },
            Name::new(format!("{tower_name} influence")),
        ));

        commands.spawn((
            TowerLabel { marker },
            Text::new(tower_name),
            TextFont {
                font_size: TOWER_LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                ..default()
            },
            Visibility::Hidden,
        ));
    }
}

/// Ray-cast from the centre of the current viewport onto the terrain.
fn viewport_center_hit(
    viewport_camera: &mut ViewportCamera,
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    terrain_assets: &TerrainAssets,
    images: &Assets<Image>,
    manifests: &Assets<SiteManifest>,
) -> Option<Vec3> {
    let window = windows.single().ok()?;
    let (camera_transform, camera) = cameras.single().ok()?;
    let bounds = terrain_assets.get_bounds(manifests)?;
    let center = Vec2::new(window.width() * 0.5, window.height() * 0.5);

    viewport_camera.last_intersection = None;
    viewport_camera.mouse_to_terrain(
        center,
        camera,
        camera_transform,
        images.get(&terrain_assets.heightmap_texture),
        &bounds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_point_is_the_fixed_site_coordinate() {
        // The fallback coordinate coincides with the manifest origin, so in
        // the site frame it is the scene origin at ground level.
        let frame = SiteFrame::new(Geodetic::from_degrees(-0.1774058, 51.4482544, 0.0));
        let p = fallback_spawn_point(&frame);
        assert!(p.length() < 1e-3);
    }

    #[test]
    fn fallback_point_ignores_frame_independent_offsets() {
        // With a frame anchored elsewhere the fallback still lands on the
        // same geodetic spot, a fixed offset from that origin.
        let frame = SiteFrame::new(Geodetic::from_degrees(-0.18, 51.4482544, 0.0));
        let p = fallback_spawn_point(&frame);
        assert!(p.x > 100.0, "fallback sits east of a more-western origin");
    }
}
