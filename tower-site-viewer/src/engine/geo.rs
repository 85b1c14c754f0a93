//! WGS84 geodesy: geodetic → ECEF → local East-North-Up, and the site-local
//! scene frame used by the overlay, spawner and buildings loader.
//!
//! Scene axes: x = east, y = up, z = -north (Bevy's forward is -Z).

use bevy::prelude::*;

/// WGS84 semi-major axis (metres).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Geodetic coordinates in radians and metres.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_rad: f64, lon_rad: f64, alt_m: f64) -> Self {
        Self {
            lat_rad,
            lon_rad,
            alt_m,
        }
    }

    /// Convention used by the site tables: (longitude, latitude) degrees.
    pub fn from_degrees(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians(), alt_m)
    }
}

/// Earth-centered, Earth-fixed Cartesian coordinates (metres).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn geodetic_to_ecef(geo: Geodetic) -> Ecef {
    let sin_lat = geo.lat_rad.sin();
    let cos_lat = geo.lat_rad.cos();
    let sin_lon = geo.lon_rad.sin();
    let cos_lon = geo.lon_rad.cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    Ecef {
        x: (n + geo.alt_m) * cos_lat * cos_lon,
        y: (n + geo.alt_m) * cos_lat * sin_lon,
        z: (n * (1.0 - WGS84_E2) + geo.alt_m) * sin_lat,
    }
}

/// Local East-North-Up offsets from an origin (metres).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

pub fn ecef_to_enu(point: Ecef, origin: Geodetic) -> Enu {
    let origin_ecef = geodetic_to_ecef(origin);
    let dx = point.x - origin_ecef.x;
    let dy = point.y - origin_ecef.y;
    let dz = point.z - origin_ecef.z;

    let sin_lat = origin.lat_rad.sin();
    let cos_lat = origin.lat_rad.cos();
    let sin_lon = origin.lon_rad.sin();
    let cos_lon = origin.lon_rad.cos();

    Enu {
        east: -sin_lon * dx + cos_lon * dy,
        north: -sin_lat * cos_lon * dx - sin_lat * sin_lon * dy + cos_lat * dz,
        up: cos_lat * cos_lon * dx + cos_lat * sin_lon * dy + sin_lat * dz,
    }
}

/// Tangent-plane frame anchored at the site origin. All scene geometry is
/// expressed in this frame.
#[derive(Resource, Debug, Copy, Clone)]
pub struct SiteFrame {
    origin: Geodetic,
}

impl SiteFrame {
    pub fn new(origin: Geodetic) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> Geodetic {
        self.origin
    }

    /// Geodetic coordinate → scene-space point (x east, y up, z -north).
    pub fn world_from_geodetic(&self, geo: Geodetic) -> Vec3 {
        let enu = ecef_to_enu(geodetic_to_ecef(geo), self.origin);
        Vec3::new(enu.east as f32, enu.up as f32, -enu.north as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn geodetic_to_ecef_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(Geodetic::new(0.0, 0.0, 0.0));
        assert_close(ecef.x, WGS84_A, 1e-6);
        assert_close(ecef.y, 0.0, 1e-6);
        assert_close(ecef.z, 0.0, 1e-6);
    }

    #[test]
    fn enu_origin_is_zero() {
        let origin = Geodetic::from_degrees(-0.1774058, 51.4482544, 0.0);
        let enu = ecef_to_enu(geodetic_to_ecef(origin), origin);
        assert_close(enu.east, 0.0, 1e-6);
        assert_close(enu.north, 0.0, 1e-6);
        assert_close(enu.up, 0.0, 1e-6);
    }

    #[test]
    fn point_east_of_origin_has_positive_east() {
        let origin = Geodetic::from_degrees(0.0, 51.0, 0.0);
        let east_point = Geodetic::from_degrees(0.001, 51.0, 0.0);
        let enu = ecef_to_enu(geodetic_to_ecef(east_point), origin);
        assert!(enu.east > 0.0);
        assert_close(enu.north, 0.0, 1.0);
        // ~70 m per 0.001 deg longitude at this latitude
        assert_close(enu.east, 70.2, 1.0);
    }

    #[test]
    fn site_frame_maps_north_to_negative_z() {
        let frame = SiteFrame::new(Geodetic::from_degrees(0.0, 51.0, 0.0));
        let north_point = Geodetic::from_degrees(0.0, 51.001, 0.0);
        let world = frame.world_from_geodetic(north_point);
        assert!(world.z < -100.0, "north must map to -z, got {world:?}");
        assert!(world.x.abs() < 1.0);
    }

    #[test]
    fn site_frame_origin_maps_to_scene_origin() {
        let origin = Geodetic::from_degrees(-0.1774058, 51.4482544, 0.0);
        let frame = SiteFrame::new(origin);
        let world = frame.world_from_geodetic(origin);
        assert!(world.length() < 1e-3);
    }
}
