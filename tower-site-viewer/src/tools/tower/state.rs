use bevy::prelude::*;

use crate::engine::camera::CameraNavLock;

/// Monotonic index used only to derive display names.
#[derive(Resource, Default)]
pub struct TowerCounter {
    next_index: u32,
}

impl TowerCounter {
    pub fn next_name(&mut self) -> (u32, String) {
        self.next_index += 1;
        (self.next_index, format!("Tower {}", self.next_index))
    }
}

/// The cylinder marker; its `Transform` is the tower's authoritative position.
#[derive(Component)]
pub struct TowerMarker {
    pub index: u32,
}

/// Influence sphere, mirroring its marker's position.
#[derive(Component)]
pub struct TowerSphere {
    pub marker: Entity,
}

/// Overhead label; its anchor derives from the marker every frame.
#[derive(Component)]
pub struct TowerLabel {
    pub marker: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTower {
    pub marker: Entity,
    pub sphere: Entity,
}

/// Drag state machine: `None` is Idle, `Some` is Armed. Movement is only
/// sampled while the button stays down, so there is no separate Dragging
/// state.
#[derive(Resource, Default)]
pub struct TowerDrag {
    armed: Option<ArmedTower>,
}

impl TowerDrag {
    pub fn armed(&self) -> Option<ArmedTower> {
        self.armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Idle → Armed. Takes the navigation lock; refused while any drag holds
    /// it, which keeps a single drag driving the shared camera flags.
    pub fn arm(&mut self, marker: Entity, sphere: Entity, lock: &mut CameraNavLock) -> bool {
        if self.armed.is_some() {
            return false;
        }
        if !lock.try_acquire(marker) {
            return false;
        }
        self.armed = Some(ArmedTower { marker, sphere });
        true
    }

    /// Armed → Idle, unconditionally: the lock is released whatever state
    /// the drag was in, so pointer-up can never strand the camera disabled.
    pub fn disarm(&mut self, lock: &mut CameraNavLock) {
        self.armed = None;
        lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower_entities(world: &mut World, n: usize) -> Vec<(Entity, Entity)> {
        (0..n)
            .map(|_| (world.spawn_empty().id(), world.spawn_empty().id()))
            .collect()
    }

    #[test]
    fn names_are_sequential_and_unique() {
        let mut counter = TowerCounter::default();
        let names: Vec<String> = (0..5).map(|_| counter.next_name().1).collect();
        assert_eq!(
            names,
            vec!["Tower 1", "Tower 2", "Tower 3", "Tower 4", "Tower 5"]
        );
    }

    #[test]
    fn arm_takes_the_nav_lock() {
        let mut world = World::new();
        let towers = tower_entities(&mut world, 1);
        let mut drag = TowerDrag::default();
        let mut lock = CameraNavLock::default();

        assert!(drag.arm(towers[0].0, towers[0].1, &mut lock));
        assert!(drag.is_armed());
        assert!(lock.is_locked());
        assert!(!lock.flags().all_enabled());
    }

    #[test]
    fn second_arm_is_refused_while_armed() {
        let mut world = World::new();
        let towers = tower_entities(&mut world, 2);
        let mut drag = TowerDrag::default();
        let mut lock = CameraNavLock::default();

        assert!(drag.arm(towers[0].0, towers[0].1, &mut lock));
        assert!(!drag.arm(towers[1].0, towers[1].1, &mut lock));
        assert_eq!(drag.armed().unwrap().marker, towers[0].0);
    }

    #[test]
    fn down_then_up_restores_pre_drag_flags() {
        let mut world = World::new();
        let towers = tower_entities(&mut world, 1);
        let mut drag = TowerDrag::default();
        let mut lock = CameraNavLock::default();
        let before = lock.flags();

        drag.arm(towers[0].0, towers[0].1, &mut lock);
        drag.disarm(&mut lock);

        assert!(!drag.is_armed());
        assert_eq!(lock.flags(), before);
    }

    #[test]
    fn disarm_without_arm_leaves_navigation_enabled() {
        let mut drag = TowerDrag::default();
        let mut lock = CameraNavLock::default();
        drag.disarm(&mut lock);
        assert!(lock.flags().all_enabled());
        assert!(!drag.is_armed());
    }

    #[test]
    fn towers_can_drag_again_after_disarm() {
        let mut world = World::new();
        let towers = tower_entities(&mut world, 2);
        let mut drag = TowerDrag::default();
        let mut lock = CameraNavLock::default();

        drag.arm(towers[0].0, towers[0].1, &mut lock);
        drag.disarm(&mut lock);
        assert!(drag.arm(towers[1].0, towers[1].1, &mut lock));
        assert_eq!(lock.holder(), Some(towers[1].0));
    }
}
