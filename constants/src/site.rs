/// HMP Wandsworth facility boundary as (longitude, latitude) degree pairs.
/// Closed ring: the last vertex repeats the first.
pub const SITE_BOUNDARY_DEGREES: &[[f64; 2]] = &[
    [-0.1774058, 51.4482544],
    [-0.1756854, 51.4491137],
    [-0.1761111, 51.4496076],
    [-0.1758669, 51.4496871],
    [-0.1760844, 51.4499424],
    [-0.1760117, 51.4500008],
    [-0.1760047, 51.4500172],
    [-0.1762307, 51.4503029],
    [-0.1764256, 51.4505693],
    [-0.1766609, 51.4506280],
    [-0.1765754, 51.4507691],
    [-0.1769525, 51.4512780],
    [-0.1771185, 51.4514967],
    [-0.1781567, 51.4511498],
    [-0.1794479, 51.4498498],
    [-0.1774058, 51.4482544],
];

/// Boundary extrusion above ground level, metres.
pub const BOUNDARY_EXTRUSION_METRES: f32 = 50.0;

/// Spawn point used when the viewport-centre ray hits no terrain
/// (longitude, latitude degrees, at ground level).
pub const FALLBACK_SPAWN_DEGREES: [f64; 2] = [-0.1774058, 51.4482544];

/// Remote asset identifier of the OSM buildings tileset.
pub const BUILDINGS_TILESET_ASSET_ID: u32 = 96188;
