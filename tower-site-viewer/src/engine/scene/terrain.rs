/// Heightfield terrain surface built from the loaded heightmap.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::TERRAIN_GRID_RESOLUTION;

use crate::engine::assets::bounds::SiteBounds;
use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::assets::terrain_assets::TerrainAssets;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::heightmap::terrain_height_at;

#[derive(Component)]
pub struct TerrainSurface;

#[derive(Resource, Default)]
pub struct TerrainCreated {
    pub created: bool,
}

/// Build the terrain surface once the manifest and heightmap have arrived.
pub fn create_terrain_when_ready(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut terrain_created: ResMut<TerrainCreated>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut terrain_assets: ResMut<TerrainAssets>,
    images: Res<Assets<Image>>,
    manifests: Res<Assets<SiteManifest>>,
) {
    if terrain_created.created {
        return;
    }
    let Some(bounds) = terrain_assets.get_bounds(&manifests) else {
        return;
    };
    let Some(heightmap) = images.get(&terrain_assets.heightmap_texture) else {
        return;
    };

    let mesh = heightfield_surface_mesh(heightmap, &bounds, TERRAIN_GRID_RESOLUTION);
    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.42, 0.33),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::IDENTITY,
        NoFrustumCulling,
        TerrainSurface,
        Name::new("TerrainSurface"),
    ));

    terrain_created.created = true;
    terrain_assets.is_loaded = true;
    loading_progress.terrain_created = true;
    info!("Terrain surface created ({0}x{0} quads)", TERRAIN_GRID_RESOLUTION);
}

/// Triangulated grid over the site bounds, vertices clamped to the sampled
/// heightfield, normals from central height differences.
pub fn heightfield_surface_mesh(
    heightmap: &Image,
    bounds: &SiteBounds,
    resolution: usize,
) -> Mesh {
    let resolution = resolution.max(1);
    let verts_per_side = resolution + 1;
    let size = bounds.size();
    let step_x = size.x / resolution as f32;
    let step_z = size.z / resolution as f32;

    let height_at = |x: f32, z: f32| terrain_height_at(Some(heightmap), x, z, bounds);

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(verts_per_side * verts_per_side);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(verts_per_side * verts_per_side);

    for zi in 0..verts_per_side {
        for xi in 0..verts_per_side {
            let x = bounds.min_x as f32 + xi as f32 * step_x;
            let z = bounds.min_z as f32 + zi as f32 * step_z;
            let y = height_at(x, z);
            positions.push([x, y, z]);

            let dx = height_at(x + step_x, z) - height_at(x - step_x, z);
            let dz = height_at(x, z + step_z) - height_at(x, z - step_z);
            let normal = Vec3::new(-dx, 2.0 * step_x.max(step_z), -dz).normalize_or_zero();
            normals.push(normal.to_array());
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(resolution * resolution * 6);
    for zi in 0..resolution {
        for xi in 0..resolution {
            let a = (zi * verts_per_side + xi) as u32;
            let b = a + 1;
            let c = a + verts_per_side as u32;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::heightmap::tests::test_heightmap;

    #[test]
    fn flat_heightmap_yields_flat_grid() {
        let image = test_heightmap(2, 2, &[0.0; 4]);
        let bounds = SiteBounds {
            min_x: -50.0,
            max_x: 50.0,
            min_y: 5.0,
            max_y: 15.0,
            min_z: -50.0,
            max_z: 50.0,
        };
        let mesh = heightfield_surface_mesh(&image, &bounds, 2);

        assert_eq!(mesh.count_vertices(), 9);
        assert_eq!(mesh.indices().unwrap().len(), 2 * 2 * 6);

        use bevy::render::mesh::VertexAttributeValues;
        let VertexAttributeValues::Float32x3(positions) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap()
        else {
            panic!("positions missing");
        };
        for p in positions {
            assert_eq!(p[1], 5.0, "flat normalised-zero terrain sits at min_y");
        }
    }
}
