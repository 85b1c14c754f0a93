//! Fixed facility boundary overlay: one extruded, semi-transparent polygon
//! plus a separate ground-clamped outline for a crisp edge. Added once when
//! the scene enters its running state; never mutated afterwards.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{OUTLINE_SEGMENTS_PER_EDGE, OUTLINE_SURFACE_LIFT};
use constants::site::{BOUNDARY_EXTRUSION_METRES, SITE_BOUNDARY_DEGREES};

use crate::engine::assets::bounds::SiteBounds;
use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::assets::terrain_assets::TerrainAssets;
use crate::engine::geo::{Geodetic, SiteFrame};
use crate::engine::scene::extrusion::{drop_closing_duplicate, extruded_prism_mesh};
use crate::engine::scene::heightmap::terrain_height_at;

#[derive(Component)]
pub struct SiteOverlay;

/// Boundary ring at ground level (height 0) in the site frame, closing
/// duplicate removed. The vertical component is pinned to the ground plane;
/// over a few hundred metres the tangent-frame curvature term is noise.
pub fn boundary_ground_ring(frame: &SiteFrame) -> Vec<Vec3> {
    let mut ring: Vec<Vec3> = SITE_BOUNDARY_DEGREES
        .iter()
        .map(|&[lon, lat]| {
            let p = frame.world_from_geodetic(Geodetic::from_degrees(lon, lat, 0.0));
            Vec3::new(p.x, 0.0, p.z)
        })
        .collect();
    drop_closing_duplicate(&mut ring);
    ring
}

pub fn spawn_site_overlay(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    terrain_assets: Res<TerrainAssets>,
    images: Res<Assets<Image>>,
    manifests: Res<Assets<SiteManifest>>,
    frame: Res<SiteFrame>,
) {
    let ring = boundary_ground_ring(&frame);

    let Some(polygon) = extruded_prism_mesh(&ring, BOUNDARY_EXTRUSION_METRES) else {
        warn!("site boundary ring is degenerate; overlay skipped");
        return;
    };

    commands.spawn((
        Mesh3d(meshes.add(polygon)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.0, 0.0, 0.3),
            alpha_mode: AlphaMode::Blend,
            cull_mode: None,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
        NoFrustumCulling,
        SiteOverlay,
        Name::new("SiteBoundary"),
    ));

    let bounds = terrain_assets.get_bounds(&manifests);
    let heightmap = images.get(&terrain_assets.heightmap_texture);
    let outline = ground_clamped_outline_mesh(&ring, heightmap, bounds.as_ref());

    commands.spawn((
        Mesh3d(meshes.add(outline)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::BLACK,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
        NoFrustumCulling,
        SiteOverlay,
        Name::new("SiteBoundaryOutline"),
    ));

    info!("Site overlay added ({} boundary vertices)", ring.len());
}

/// Line-list outline around the ring, each edge subdivided and every vertex
/// snapped onto the terrain surface plus a small lift.
pub fn ground_clamped_outline_mesh(
    ring: &[Vec3],
    heightmap: Option<&Image>,
    bounds: Option<&SiteBounds>,
) -> Mesh {
    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let clamp = |p: Vec3| -> Vec3 {
        let y = match bounds {
            Some(bounds) => terrain_height_at(heightmap, p.x, p.z, bounds),
            None => p.y,
        };
        Vec3::new(p.x, y + OUTLINE_SURFACE_LIFT, p.z)
    };

    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        for s in 0..OUTLINE_SEGMENTS_PER_EDGE {
            let t0 = s as f32 / OUTLINE_SEGMENTS_PER_EDGE as f32;
            let t1 = (s + 1) as f32 / OUTLINE_SEGMENTS_PER_EDGE as f32;
            let p0 = clamp(a.lerp(b, t0));
            let p1 = clamp(a.lerp(b, t1));
            let base = vertices.len() as u32;
            vertices.push(p0.to_array());
            vertices.push(p1.to_array());
            indices.extend_from_slice(&[base, base + 1]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_ring_is_open_and_near_origin() {
        let frame = SiteFrame::new(Geodetic::from_degrees(-0.1774058, 51.4482544, 0.0));
        let ring = boundary_ground_ring(&frame);

        // The source table closes the ring; conversion must drop the repeat.
        assert_eq!(ring.len(), SITE_BOUNDARY_DEGREES.len() - 1);

        // First vertex is the frame origin, everything at ground level and
        // within a few hundred metres of it.
        assert!(ring[0].length() < 1e-3);
        for p in &ring {
            assert_eq!(p.y, 0.0);
            assert!(p.length() < 500.0);
        }
    }

    #[test]
    fn outline_subdivides_every_edge() {
        let ring = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
        ];
        let mesh = ground_clamped_outline_mesh(&ring, None, None);
        let expected_vertices = ring.len() * OUTLINE_SEGMENTS_PER_EDGE * 2;
        assert_eq!(mesh.count_vertices(), expected_vertices);
    }
}
