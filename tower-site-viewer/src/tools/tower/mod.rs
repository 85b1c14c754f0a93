//! Tower placement and drag tool.
//!
//! Each "Add Tower" press spawns an independent tower: a cylinder marker at
//! the point under the viewport centre, a label anchored above it, and a
//! translucent influence sphere around it.
//!
//! ## Data flow
//!
//! ```text
//! AddTowerButton press
//!   └─> SpawnTowerEvent
//!       └─> handle_spawn_tower_events()
//!           ├─> TowerCounter → "Tower N"
//!           ├─> viewport-centre ray cast (fallback coordinate on miss)
//!           └─> marker + sphere + label entities
//!
//! pointer-down over marker/sphere
//!   └─> TowerDrag::arm()  (takes CameraNavLock, all navigation off)
//! pointer-move while armed
//!   └─> terrain ray cast → marker & sphere translations (label derives)
//! pointer-up
//!   └─> TowerDrag::disarm() (lock released unconditionally)
//! ```
//!
//! Exactly one drag may be armed at a time: the navigation flags are a
//! single shared resource and the arm refuses while the lock is held.

/// Counter, components, and the Idle/Armed drag state machine.
pub mod state;

/// Ray–box and ray–sphere tests used by the pick on pointer-down.
pub mod ray;

/// Tower spawning from UI events, with the viewport-centre ray cast.
pub mod spawner;

/// The three pointer systems driving the drag state machine.
pub mod drag;

/// Derived label anchoring and screen-space projection.
pub mod label;

/// Panel and button wiring.
pub mod ui;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use drag::{arm_tower_drag, disarm_tower_drag, drag_armed_tower};
use label::update_tower_labels;
use spawner::{SpawnTowerEvent, handle_spawn_tower_events};
use state::{TowerCounter, TowerDrag};
use ui::{add_tower_button_interaction, spawn_tower_panel};

pub struct TowerToolPlugin;

impl Plugin for TowerToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TowerCounter>()
            .init_resource::<TowerDrag>()
            .add_event::<SpawnTowerEvent>()
            .add_systems(Startup, spawn_tower_panel)
            .add_systems(
                Update,
                (
                    add_tower_button_interaction,
                    handle_spawn_tower_events,
                    arm_tower_drag,
                    drag_armed_tower,
                    disarm_tower_drag,
                    update_tower_labels,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
