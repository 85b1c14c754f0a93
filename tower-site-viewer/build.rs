// build.rs
//
// Stamps the local development assets (site manifest, placeholder heightmap,
// sample buildings tileset) into assets/ so a native run works against the
// file asset source. The terrain access token is injected at compile time
// via `option_env!`, so a token change must trigger a rebuild.

use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use std::{env, fs, path::PathBuf};

const HEIGHTMAP_SIZE: usize = 64;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SITE_TERRAIN_TOKEN");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let assets_dir = manifest_dir.join("assets");
    fs::create_dir_all(assets_dir.join("site")).expect("create assets/site");
    fs::create_dir_all(assets_dir.join("tilesets")).expect("create assets/tilesets");

    write_site_manifest(&assets_dir);
    write_placeholder_heightmap(&assets_dir);
    write_sample_tileset(&assets_dir);
}

fn write_site_manifest(assets_dir: &PathBuf) {
    let manifest = serde_json::json!({
        "name": "HMP Wandsworth",
        "origin_longitude_deg": -0.1774058,
        "origin_latitude_deg": 51.4482544,
        "heightmap_texture": "site/heightmap.dds",
        "bounds": {
            "min_x": -800.0,
            "max_x": 800.0,
            "min_y": 0.0,
            "max_y": 12.0,
            "min_z": -800.0,
            "max_z": 800.0
        }
    });

    let path = assets_dir.join("site/wandsworth.site.json");
    let json = serde_json::to_string_pretty(&manifest).unwrap();
    fs::write(&path, json).expect("write site manifest");
}

/// Gently undulating normalised heights (0..1), R32F, as the terrain
/// pre-processing pipeline would produce for a real survey.
fn write_placeholder_heightmap(assets_dir: &PathBuf) {
    let mut heights = Vec::with_capacity(HEIGHTMAP_SIZE * HEIGHTMAP_SIZE);
    for z in 0..HEIGHTMAP_SIZE {
        for x in 0..HEIGHTMAP_SIZE {
            let fx = x as f32 / (HEIGHTMAP_SIZE - 1) as f32;
            let fz = z as f32 / (HEIGHTMAP_SIZE - 1) as f32;
            let h = 0.5
                + 0.35 * (fx * std::f32::consts::TAU).sin() * (fz * std::f32::consts::TAU).cos();
            heights.push(h.clamp(0.0, 1.0));
        }
    }

    let mut bytes = Vec::with_capacity(heights.len() * 4);
    for h in &heights {
        bytes.extend_from_slice(&h.to_le_bytes());
    }

    let params = NewDxgiParams {
        height: HEIGHTMAP_SIZE as u32,
        width: HEIGHTMAP_SIZE as u32,
        depth: None,
        format: DxgiFormat::R32_Float,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params).expect("create heightmap dds");
    dds.data = bytes;
    let path = assets_dir.join("site/heightmap.dds");
    dds.write(&mut fs::File::create(&path).expect("create heightmap file"))
        .expect("write heightmap dds");
}

fn write_sample_tileset(assets_dir: &PathBuf) {
    let tileset = serde_json::json!({
        "name": "osm-buildings-sample",
        "buildings": [
            {
                "footprint_deg": [
                    [-0.1768, 51.4490],
                    [-0.1764, 51.4490],
                    [-0.1764, 51.4493],
                    [-0.1768, 51.4493]
                ],
                "height_m": 14.0
            },
            {
                "footprint_deg": [
                    [-0.1780, 51.4495],
                    [-0.1775, 51.4495],
                    [-0.1775, 51.4499],
                    [-0.1780, 51.4499]
                ],
                "height_m": 9.0
            },
            {
                "footprint_deg": [
                    [-0.1772, 51.4501],
                    [-0.1767, 51.4501],
                    [-0.1767, 51.4504],
                    [-0.1772, 51.4504]
                ],
                "height_m": 22.0
            }
        ]
    });

    let path = assets_dir.join("tilesets/96188.tileset.json");
    let json = serde_json::to_string_pretty(&tileset).unwrap();
    fs::write(&path, json).expect("write sample tileset");
}
