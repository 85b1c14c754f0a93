//! Pointer-driven tower repositioning.
//!
//! Idle → Armed on pointer-down over a marker or sphere (nearest pick wins,
//! navigation lock acquired); Armed → Armed on pointer-move re-running the
//! terrain ray cast; Armed → Idle on pointer-up, which releases the lock
//! unconditionally. A miss while armed keeps the previous position.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::{TOWER_CYLINDER_LENGTH, TOWER_CYLINDER_RADIUS, TOWER_SPHERE_RADIUS};

use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::assets::terrain_assets::TerrainAssets;
use crate::engine::camera::{CameraNavLock, ViewportCamera};
use crate::tools::tower::ray::{ray_hits_obb, ray_hits_sphere};
use crate::tools::tower::state::{TowerDrag, TowerMarker, TowerSphere};

/// Pointer-down: pick the nearest tower marker or sphere under the cursor
/// and arm a drag on it. Picking anything else leaves the state Idle.
pub fn arm_tower_drag(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    markers: Query<(Entity, &GlobalTransform), With<TowerMarker>>,
    spheres: Query<(Entity, &GlobalTransform, &TowerSphere)>,
    ui_buttons: Query<&Interaction, With<Button>>,
    mut drag: ResMut<TowerDrag>,
    mut nav_lock: ResMut<CameraNavLock>,
    mut viewport_camera: ResMut<ViewportCamera>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || drag.is_armed() {
        return;
    }

    // Clicks captured by UI buttons must not also arm a world drag.
    if ui_buttons.iter().any(|i| *i != Interaction::None) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };
    let origin = ray.origin;
    let dir = ray.direction.as_vec3();

    // Nearest hit across every tower's cylinder and sphere.
    let cylinder_size = Vec3::new(
        TOWER_CYLINDER_RADIUS * 2.0,
        TOWER_CYLINDER_LENGTH,
        TOWER_CYLINDER_RADIUS * 2.0,
    );
    let mut best_hit: Option<(Entity, f32)> = None;

    for (entity, xf) in &markers {
        if let Some(t) = ray_hits_obb(origin, dir, xf, cylinder_size) {
            if t > 0.0 && (best_hit.is_none() || t < best_hit.unwrap().1) {
                best_hit = Some((entity, t));
            }
        }
    }
    for (_, xf, sphere) in &spheres {
        if let Some(t) = ray_hits_sphere(origin, dir, xf.translation(), TOWER_SPHERE_RADIUS) {
            if t > 0.0 && (best_hit.is_none() || t < best_hit.unwrap().1) {
                best_hit = Some((sphere.marker, t));
            }
        }
    }

    let Some((marker, _)) = best_hit else {
        return;
    };
    let Some(sphere) = spheres
        .iter()
        .find(|(_, _, s)| s.marker == marker)
        .map(|(e, _, _)| e)
    else {
        return;
    };

    if drag.arm(marker, sphere, &mut nav_lock) {
        // Fresh drag, fresh smoothing history: a stale smoothed intersection
        // from an earlier gesture must not bend the first move.
        viewport_camera.last_intersection = None;
        debug!("drag armed on {marker:?}");
    }
}

/// Pointer-move while armed: overwrite the marker's and sphere's positions
/// with the terrain hit under the cursor. The label is not touched; its
/// anchor derives from the marker.
pub fn drag_armed_tower(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    terrain_assets: Res<TerrainAssets>,
    images: Res<Assets<Image>>,
    manifests: Res<Assets<SiteManifest>>,
    drag: Res<TowerDrag>,
    mut transforms: Query<&mut Transform>,
) {
    let Some(armed) = drag.armed() else {
        return;
    };
    if !mouse_button.pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };
    let Some(bounds) = terrain_assets.get_bounds(&manifests) else {
        return;
    };

    let hit = viewport_camera.mouse_to_terrain(
        cursor_pos,
        camera,
        camera_transform,
        images.get(&terrain_assets.heightmap_texture),
        &bounds,
    );
    // Off-terrain pointer: no update, the previous position stands.
    let Some(new_pos) = hit else {
        return;
    };

    if let Ok(mut marker_transform) = transforms.get_mut(armed.marker) {
        marker_transform.translation = new_pos;
    }
    if let Ok(mut sphere_transform) = transforms.get_mut(armed.sphere) {
        sphere_transform.translation = new_pos;
    }
}

/// Pointer-up: back to Idle wherever the pointer is, releasing the
/// navigation lock unconditionally.
pub fn disarm_tower_drag(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut drag: ResMut<TowerDrag>,
    mut nav_lock: ResMut<CameraNavLock>,
) {
    if mouse_button.just_released(MouseButton::Left) {
        drag.disarm(&mut nav_lock);
    }
}
