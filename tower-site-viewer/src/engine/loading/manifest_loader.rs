use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::assets::terrain_assets::TerrainAssets;
use crate::engine::loading::progress::LoadingProgress;

/// Access token for the terrain/imagery service, injected at build time.
pub const TERRAIN_ACCESS_TOKEN: Option<&str> = option_env!("SITE_TERRAIN_TOKEN");

pub const SITE_MANIFEST_PATH: &str = "site/wandsworth.site.json";

/// Asset path signed with the service token. The wasm asset source is the
/// terrain service's HTTP endpoint, which routes by token path segment; the
/// native asset source serves local files and takes the path as-is.
pub fn signed_asset_path(relative: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        match TERRAIN_ACCESS_TOKEN {
            Some(token) => format!("{token}/{relative}"),
            None => relative.to_string(),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        relative.to_string()
    }
}

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<SiteManifest>>,
}

impl ManifestLoader {
    pub fn handle(&self) -> Option<&Handle<SiteManifest>> {
        self.handle.as_ref()
    }
}

/// Kick off the terrain acquisition. A missing token is an external-service
/// failure and goes through the same fatal surface as a failed fetch.
pub fn start_loading(
    mut manifest_loader: ResMut<ManifestLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    if TERRAIN_ACCESS_TOKEN.is_none() {
        loading_progress.fail(
            "terrain access token not configured; rebuild with SITE_TERRAIN_TOKEN set",
        );
        return;
    }

    let manifest_path = signed_asset_path(SITE_MANIFEST_PATH);
    info!("Loading site manifest from: {manifest_path}");
    manifest_loader.handle = Some(asset_server.load(manifest_path));
}

/// Pick up the manifest when it arrives, then start the heightmap load it
/// names and anchor the site frame at the manifest's geodetic origin.
pub fn load_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    mut terrain_assets: ResMut<TerrainAssets>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<SiteManifest>>,
) {
    if loading_progress.manifest_loaded {
        return;
    }

    let Some(handle) = manifest_loader.handle() else {
        return;
    };
    let Some(manifest) = manifests.get(handle) else {
        return;
    };

    info!("Site manifest loaded: {}", manifest.name);
    terrain_assets.manifest = Some(handle.clone());
    commands.insert_resource(manifest.site_frame());

    let heightmap_path = signed_asset_path(&manifest.heightmap_texture);
    terrain_assets.heightmap_texture = asset_server.load(heightmap_path);

    loading_progress.manifest_loaded = true;
}

/// Flip the progress flag once the heightmap texture is in memory.
pub fn check_heightmap_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    terrain_assets: Res<TerrainAssets>,
    images: Res<Assets<Image>>,
) {
    if loading_progress.heightmap_loaded || !loading_progress.manifest_loaded {
        return;
    }
    if images.get(&terrain_assets.heightmap_texture).is_some() {
        info!("Heightmap texture loaded");
        loading_progress.heightmap_loaded = true;
    }
}

/// Surface failed terrain-path loads instead of idling on a dead handle.
pub fn watch_load_failures(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    terrain_assets: Res<TerrainAssets>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.fatal_error.is_some() {
        return;
    }

    if let Some(handle) = manifest_loader.handle() {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
            loading_progress.fail(format!("site manifest failed to load: {err}"));
            return;
        }
    }

    if loading_progress.manifest_loaded {
        if let Some(LoadState::Failed(err)) =
            asset_server.get_load_state(terrain_assets.heightmap_texture.id())
        {
            loading_progress.fail(format!("heightmap failed to load: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_paths_are_unsigned() {
        #[cfg(not(target_arch = "wasm32"))]
        assert_eq!(signed_asset_path("site/heightmap.dds"), "site/heightmap.dds");
    }
}
