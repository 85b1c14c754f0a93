/// Heightmap sampling for terrain intersection and ground clamping.
pub mod heightmap;

/// Heightfield terrain surface generation.
pub mod terrain;

/// Extruded prism meshes for the boundary overlay and buildings.
pub mod extrusion;
