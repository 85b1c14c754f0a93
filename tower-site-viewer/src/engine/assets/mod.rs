/// Scene-space extents of the site and helpers over them.
pub mod bounds;

/// JSON site manifest: geodetic anchor, heightmap path, bounds.
pub mod site_manifest;

/// Runtime handles to the loaded terrain inputs.
pub mod terrain_assets;
