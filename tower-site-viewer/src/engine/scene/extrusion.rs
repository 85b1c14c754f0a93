//! Extruded prism meshes built from a ground ring: side walls plus an
//! earcut-triangulated top cap. Used by the site boundary overlay and the
//! buildings tileset loader.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use earcutr::earcut;

/// Remove the closing vertex of a ring when it duplicates the first one.
pub fn drop_closing_duplicate(points: &mut Vec<Vec3>) {
    if points.len() >= 2 {
        let first = points[0];
        let last = *points.last().unwrap();
        if first.distance_squared(last) < 1e-9 {
            points.pop();
        }
    }
}

/// Build a closed prism from a ground ring extruded upward by `height`.
/// The ground ring may or may not repeat its first vertex; fewer than three
/// distinct vertices yields `None`. The top ring is the ground ring lifted by
/// `height`; it forms both the wall tops and the cap.
pub fn extruded_prism_mesh(ground_ring: &[Vec3], height: f32) -> Option<Mesh> {
    let mut ring = ground_ring.to_vec();
    drop_closing_duplicate(&mut ring);
    if ring.len() < 3 {
        return None;
    }

    let top_ring: Vec<Vec3> = ring.iter().map(|p| *p + Vec3::Y * height).collect();

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Side walls, one flat-shaded quad per edge.
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        let (g0, g1) = (ring[i], ring[j]);
        let (t0, t1) = (top_ring[i], top_ring[j]);

        let normal = (g1 - g0).cross(Vec3::Y).normalize_or_zero();
        let base = positions.len() as u32;
        for p in [g0, g1, t1, t0] {
            positions.push(p.to_array());
            normals.push(normal.to_array());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    // Top cap, triangulated in the horizontal plane.
    let coords_2d: Vec<f64> = ring
        .iter()
        .flat_map(|p| [p.x as f64, p.z as f64])
        .collect();
    let cap_base = positions.len() as u32;
    for p in &top_ring {
        positions.push(p.to_array());
        normals.push([0.0, 1.0, 0.0]);
    }
    if let Ok(cap_indices) = earcut(&coords_2d, &[], 2) {
        for idx in cap_indices {
            indices.push(cap_base + idx as u32);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn square_ring_closed() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 0.0),
        ]
    }

    fn positions(mesh: &Mesh) -> Vec<Vec3> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap() {
            VertexAttributeValues::Float32x3(values) => {
                values.iter().map(|v| Vec3::from_array(*v)).collect()
            }
            other => panic!("unexpected position format: {other:?}"),
        }
    }

    #[test]
    fn closing_duplicate_is_dropped() {
        let mut ring = square_ring_closed();
        drop_closing_duplicate(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn degenerate_rings_produce_no_mesh() {
        assert!(extruded_prism_mesh(&[], 50.0).is_none());
        let line = vec![Vec3::ZERO, Vec3::X, Vec3::ZERO];
        assert!(extruded_prism_mesh(&line, 50.0).is_none());
    }

    #[test]
    fn square_prism_has_walls_and_cap() {
        let mesh = extruded_prism_mesh(&square_ring_closed(), 50.0).unwrap();
        let positions = positions(&mesh);

        // 4 wall quads of 4 vertices each, plus the 4-vertex cap ring.
        assert_eq!(positions.len(), 4 * 4 + 4);

        // Cap vertices sit exactly at the extrusion height.
        for p in &positions[16..] {
            assert_eq!(p.y, 50.0);
        }

        // 6 indices per wall quad + 2 cap triangles for a convex square.
        let index_count = mesh.indices().unwrap().len();
        assert_eq!(index_count, 4 * 6 + 6);
    }

    #[test]
    fn top_ring_mirrors_ground_ring_horizontally() {
        let mesh = extruded_prism_mesh(&square_ring_closed(), 12.0).unwrap();
        let positions = positions(&mesh);
        let cap = &positions[16..];
        let mut ring = square_ring_closed();
        drop_closing_duplicate(&mut ring);
        for (top, ground) in cap.iter().zip(ring.iter()) {
            assert_eq!(top.x, ground.x);
            assert_eq!(top.z, ground.z);
            assert_eq!(top.y, ground.y + 12.0);
        }
    }
}
