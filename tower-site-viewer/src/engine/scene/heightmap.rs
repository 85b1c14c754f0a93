/// Heightmap sampling utilities for terrain intersection and ground clamping.
use crate::engine::assets::bounds::SiteBounds;
use bevy::prelude::*;

/// Sample the R32F heightmap at normalised coordinates with bilinear
/// interpolation. Texels hold heights normalised over the site's vertical
/// bounds; the result is denormalised into scene metres.
pub fn sample_heightmap_bilinear(
    heightmap_image: &Image,
    norm_x: f32,
    norm_z: f32,
    bounds: &SiteBounds,
) -> f32 {
    let Some(data) = heightmap_image.data.as_ref() else {
        return bounds.ground_height();
    };

    let size = heightmap_image.size();
    let (width, height) = (size.x as usize, size.y as usize);
    if width == 0 || height == 0 {
        return bounds.ground_height();
    }

    // Continuous pixel space
    let pixel_x_f = norm_x.clamp(0.0, 1.0) * (width - 1) as f32;
    let pixel_z_f = norm_z.clamp(0.0, 1.0) * (height - 1) as f32;

    let x0 = pixel_x_f.floor() as usize;
    let z0 = pixel_z_f.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let z1 = (z0 + 1).min(height - 1);

    let wx = pixel_x_f - x0 as f32;
    let wz = pixel_z_f - z0 as f32;

    let h00 = sample_height_at_pixel(data, width, x0, z0);
    let h10 = sample_height_at_pixel(data, width, x1, z0);
    let h01 = sample_height_at_pixel(data, width, x0, z1);
    let h11 = sample_height_at_pixel(data, width, x1, z1);

    let h_top = h00 * (1.0 - wx) + h10 * wx;
    let h_bottom = h01 * (1.0 - wx) + h11 * wx;
    let normalized_height = h_top * (1.0 - wz) + h_bottom * wz;

    bounds.ground_height()
        + normalized_height * (bounds.max_y - bounds.min_y) as f32
}

/// Sample the terrain height at a scene-space (x, z) position, or the ground
/// height when the position is outside the site or no heightmap is loaded.
pub fn terrain_height_at(
    heightmap_image: Option<&Image>,
    x: f32,
    z: f32,
    bounds: &SiteBounds,
) -> f32 {
    let Some(image) = heightmap_image else {
        return bounds.ground_height();
    };
    if !bounds.contains_xz(x, z) {
        return bounds.ground_height();
    }
    let norm_x = ((x as f64 - bounds.min_x) / (bounds.max_x - bounds.min_x)) as f32;
    let norm_z = ((z as f64 - bounds.min_z) / (bounds.max_z - bounds.min_z)) as f32;
    sample_heightmap_bilinear(image, norm_x, norm_z, bounds)
}

fn sample_height_at_pixel(data: &[u8], width: usize, x: usize, z: usize) -> f32 {
    let pixel_index = (z * width + x) * 4; // 4 bytes per f32 texel

    if pixel_index + 4 > data.len() {
        return 0.0;
    }

    let height_bytes = &data[pixel_index..pixel_index + 4];
    f32::from_le_bytes([
        height_bytes[0],
        height_bytes[1],
        height_bytes[2],
        height_bytes[3],
    ])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    pub fn test_heightmap(width: u32, height: u32, values: &[f32]) -> Image {
        assert_eq!(values.len(), (width * height) as usize);
        let mut data = Vec::with_capacity(values.len() * 4);
        for v in values {
            data.extend_from_slice(&v.to_le_bytes());
        }
        Image::new(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::R32Float,
            RenderAssetUsages::all(),
        )
    }

    fn unit_bounds() -> SiteBounds {
        SiteBounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 10.0,
            min_z: 0.0,
            max_z: 100.0,
        }
    }

    #[test]
    fn corners_sample_exact_texels() {
        let image = test_heightmap(2, 2, &[0.0, 1.0, 0.5, 0.25]);
        let bounds = unit_bounds();
        assert_eq!(sample_heightmap_bilinear(&image, 0.0, 0.0, &bounds), 0.0);
        assert_eq!(sample_heightmap_bilinear(&image, 1.0, 0.0, &bounds), 10.0);
        assert_eq!(sample_heightmap_bilinear(&image, 0.0, 1.0, &bounds), 5.0);
        assert_eq!(sample_heightmap_bilinear(&image, 1.0, 1.0, &bounds), 2.5);
    }

    #[test]
    fn center_is_bilinear_average() {
        let image = test_heightmap(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let bounds = unit_bounds();
        let center = sample_heightmap_bilinear(&image, 0.5, 0.5, &bounds);
        assert!((center - 5.0).abs() < 1e-4);
    }

    #[test]
    fn out_of_site_positions_fall_back_to_ground() {
        let image = test_heightmap(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let bounds = unit_bounds();
        assert_eq!(terrain_height_at(Some(&image), -5.0, 50.0, &bounds), 0.0);
        assert_eq!(terrain_height_at(None, 50.0, 50.0, &bounds), 0.0);
        assert_eq!(terrain_height_at(Some(&image), 50.0, 50.0, &bounds), 10.0);
    }
}
