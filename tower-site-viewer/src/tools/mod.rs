//! Interactive tools layered over the scene: the fixed site overlay and the
//! tower placement/drag tool.

/// Extruded facility boundary polygon and ground-clamped outline.
pub mod site_overlay;

/// Tower spawning, dragging, and labelling.
pub mod tower;
