//! Tower labels derive their position; they are never dragged directly.
//!
//! The anchor is a read-time projection of the marker's current translation,
//! recomputed on every sample and never cached, so it can not fall out of
//! sync with the marker, including mid-drag.

use bevy::prelude::*;
use constants::render_settings::{
    TOWER_CYLINDER_LENGTH, TOWER_LABEL_CLEARANCE, TOWER_LABEL_PIXEL_OFFSET,
};

use crate::tools::tower::state::{TowerLabel, TowerMarker};

/// World-space anchor for a label: cylinder top plus clearance. The world
/// origin is the sentinel when the marker has no resolvable position.
pub fn label_anchor(marker_translation: Option<Vec3>) -> Vec3 {
    match marker_translation {
        Some(pos) => pos + Vec3::Y * (TOWER_CYLINDER_LENGTH * 0.5 + TOWER_LABEL_CLEARANCE),
        None => Vec3::ZERO,
    }
}

/// Re-project every label to its marker's current anchor. Runs after the
/// drag systems so a drag-move is reflected in the same frame.
pub fn update_tower_labels(
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    markers: Query<&Transform, With<TowerMarker>>,
    mut labels: Query<(&TowerLabel, &mut Node, &mut Visibility)>,
) {
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    for (label, mut node, mut visibility) in &mut labels {
        let anchor = label_anchor(markers.get(label.marker).ok().map(|t| t.translation));

        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(screen) => {
                node.left = Val::Px(screen.x + TOWER_LABEL_PIXEL_OFFSET.x);
                // Bottom-anchored: the text block sits above the anchor point.
                node.top = Val::Px(screen.y + TOWER_LABEL_PIXEL_OFFSET.y - 24.0);
                *visibility = Visibility::Visible;
            }
            Err(_) => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_is_marker_plus_fixed_vertical_offset() {
        let marker = Vec3::new(12.0, 3.0, -40.0);
        let anchor = label_anchor(Some(marker));
        let expected_lift = TOWER_CYLINDER_LENGTH * 0.5 + TOWER_LABEL_CLEARANCE;
        assert_eq!(anchor, marker + Vec3::Y * expected_lift);
    }

    #[test]
    fn anchor_tracks_marker_moves_without_caching() {
        let before = label_anchor(Some(Vec3::ZERO));
        let after = label_anchor(Some(Vec3::new(100.0, 0.0, 100.0)));
        assert_ne!(before, after);
        assert_eq!(after.x, 100.0);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn missing_marker_uses_world_origin_sentinel() {
        assert_eq!(label_anchor(None), Vec3::ZERO);
    }
}
