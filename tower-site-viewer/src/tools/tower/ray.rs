//! Ray intersection tests for arming a drag: slab-method OBB for the marker
//! cylinder's bounds, analytic sphere test for the influence sphere.

use bevy::prelude::*;

pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 {
            1.0 / ray_direction.x
        } else {
            f32::INFINITY
        },
        if ray_direction.y != 0.0 {
            1.0 / ray_direction.y
        } else {
            f32::INFINITY
        },
        if ray_direction.z != 0.0 {
            1.0 / ray_direction.z
        } else {
            f32::INFINITY
        },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax {
        std::mem::swap(&mut tmin, &mut tmax);
    }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax {
        std::mem::swap(&mut tymin, &mut tymax);
    }

    if (tmin > tymax) || (tymin > tmax) {
        return None;
    }
    if tymin > tmin {
        tmin = tymin;
    }
    if tymax < tmax {
        tmax = tymax;
    }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax {
        std::mem::swap(&mut tzmin, &mut tzmax);
    }

    if (tmin > tzmax) || (tzmin > tmax) {
        return None;
    }
    if tzmin > tmin {
        tmin = tzmin;
    }
    if tzmax < tmax {
        tmax = tzmax;
    }

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Nearest intersection of a ray with a sphere, or None when it misses or
/// the sphere lies entirely behind the origin.
pub fn ray_hits_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t_near = -b - sqrt_d;
    let t_far = -b + sqrt_d;
    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ray_hits_unit_box() {
        let t = ray_aabb_hit_t(
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::X,
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(t, Some(4.5));
    }

    #[test]
    fn offset_ray_misses_box() {
        let t = ray_aabb_hit_t(
            Vec3::new(-5.0, 2.0, 0.0),
            Vec3::X,
            Vec3::splat(-0.5),
            Vec3::splat(0.5),
        );
        assert_eq!(t, None);
    }

    #[test]
    fn ray_from_inside_box_still_hits() {
        let t = ray_aabb_hit_t(Vec3::ZERO, Vec3::X, Vec3::splat(-0.5), Vec3::splat(0.5));
        assert_eq!(t, Some(0.5));
    }

    #[test]
    fn sphere_hit_and_miss() {
        let center = Vec3::new(0.0, 0.0, -10.0);
        let hit = ray_hits_sphere(Vec3::ZERO, Vec3::NEG_Z, center, 2.0);
        assert_eq!(hit, Some(8.0));

        let miss = ray_hits_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(5.0, 0.0, -10.0), 2.0);
        assert_eq!(miss, None);
    }

    #[test]
    fn sphere_behind_origin_is_ignored() {
        let behind = ray_hits_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, 10.0), 2.0);
        assert_eq!(behind, None);
    }

    #[test]
    fn obb_respects_entity_transform() {
        let xf = GlobalTransform::from(Transform::from_translation(Vec3::new(0.0, 0.0, -10.0)));
        let size = Vec3::new(2.0, 20.0, 2.0);
        assert!(ray_hits_obb(Vec3::ZERO, Vec3::NEG_Z, &xf, size).is_some());
        assert!(ray_hits_obb(Vec3::ZERO, Vec3::Z, &xf, size).is_none());
    }
}
