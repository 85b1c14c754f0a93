//! Shared camera-navigation flags behind an acquire/release lock.
//!
//! The five navigation modes are a single global resource: tools must not
//! toggle them directly. A drag acquires the lock on arm (disabling all
//! modes) and the lock is released unconditionally on pointer-up, so an
//! interrupted drag can never leave navigation wedged off.

use bevy::prelude::*;

/// Per-mode navigation enable flags, toggled as a unit by the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavModeFlags {
    pub rotate: bool,
    pub translate: bool,
    pub zoom: bool,
    pub tilt: bool,
    pub look: bool,
}

impl NavModeFlags {
    pub const ENABLED: Self = Self {
        rotate: true,
        translate: true,
        zoom: true,
        tilt: true,
        look: true,
    };

    pub const DISABLED: Self = Self {
        rotate: false,
        translate: false,
        zoom: false,
        tilt: false,
        look: false,
    };

    pub fn all_enabled(&self) -> bool {
        *self == Self::ENABLED
    }
}

impl Default for NavModeFlags {
    fn default() -> Self {
        Self::ENABLED
    }
}

#[derive(Resource, Debug)]
pub struct CameraNavLock {
    flags: NavModeFlags,
    holder: Option<Entity>,
}

impl Default for CameraNavLock {
    fn default() -> Self {
        Self {
            flags: NavModeFlags::ENABLED,
            holder: None,
        }
    }
}

impl CameraNavLock {
    pub fn flags(&self) -> NavModeFlags {
        self.flags
    }

    pub fn holder(&self) -> Option<Entity> {
        self.holder
    }

    pub fn is_locked(&self) -> bool {
        self.holder.is_some()
    }

    /// Take the lock for `holder`, disabling every navigation mode.
    /// Refused while any holder is active.
    pub fn try_acquire(&mut self, holder: Entity) -> bool {
        if self.holder.is_some() {
            return false;
        }
        self.holder = Some(holder);
        self.flags = NavModeFlags::DISABLED;
        true
    }

    /// Release regardless of holder and restore every navigation mode.
    /// Idempotent; safe to call from pointer-up even if no drag armed.
    pub fn release(&mut self) {
        self.holder = None;
        self.flags = NavModeFlags::ENABLED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn defaults_to_all_enabled_and_unlocked() {
        let lock = CameraNavLock::default();
        assert!(lock.flags().all_enabled());
        assert!(!lock.is_locked());
    }

    #[test]
    fn acquire_disables_all_modes() {
        let (a, _) = entities();
        let mut lock = CameraNavLock::default();
        assert!(lock.try_acquire(a));
        assert_eq!(lock.flags(), NavModeFlags::DISABLED);
        assert_eq!(lock.holder(), Some(a));
    }

    #[test]
    fn second_acquire_is_refused_while_held() {
        let (a, b) = entities();
        let mut lock = CameraNavLock::default();
        assert!(lock.try_acquire(a));
        assert!(!lock.try_acquire(b));
        assert_eq!(lock.holder(), Some(a));
    }

    #[test]
    fn release_restores_pre_acquire_flags() {
        let (a, _) = entities();
        let mut lock = CameraNavLock::default();
        let before = lock.flags();
        lock.try_acquire(a);
        lock.release();
        assert_eq!(lock.flags(), before);
        assert!(!lock.is_locked());
    }

    #[test]
    fn release_is_unconditional_and_idempotent() {
        let (a, _) = entities();
        let mut lock = CameraNavLock::default();
        lock.release();
        assert!(lock.flags().all_enabled());

        lock.try_acquire(a);
        lock.release();
        lock.release();
        assert!(lock.flags().all_enabled());
        assert!(!lock.is_locked());

        // Lock is reusable after an unconditional release.
        assert!(lock.try_acquire(a));
    }
}
