use bevy::math::Vec2;

/// Tower marker cylinder dimensions, metres.
pub const TOWER_CYLINDER_LENGTH: f32 = 20.0;
pub const TOWER_CYLINDER_RADIUS: f32 = 1.0;

/// Clearance between the cylinder top and the label anchor, metres.
pub const TOWER_LABEL_CLEARANCE: f32 = 1.0;

/// Influence sphere radius, metres.
pub const TOWER_SPHERE_RADIUS: f32 = 200.0;

/// Screen-space nudge applied to tower labels (x right, y down), pixels.
pub const TOWER_LABEL_PIXEL_OFFSET: Vec2 = Vec2::new(0.0, -5.0);

pub const TOWER_LABEL_FONT_SIZE: f32 = 18.0;

/// Startup camera flight over the site.
pub const CAMERA_FLY_DESTINATION_DEGREES: [f64; 2] = [-0.1774058, 51.4482544];
pub const CAMERA_FLY_HEIGHT_METRES: f64 = 150.0;
pub const CAMERA_FLY_HEADING_DEGREES: f32 = 0.0;
pub const CAMERA_FLY_PITCH_DEGREES: f32 = -30.0;
pub const CAMERA_FLY_DURATION_SECS: f32 = 3.0;

/// Subdivision of each boundary edge when clamping the outline to terrain.
pub const OUTLINE_SEGMENTS_PER_EDGE: usize = 16;

/// Lift applied to ground-clamped lines so they are not z-fought by terrain.
pub const OUTLINE_SURFACE_LIFT: f32 = 0.15;

/// Terrain surface mesh resolution (quads per side).
pub const TERRAIN_GRID_RESOLUTION: usize = 256;
