use crate::engine::assets::bounds::SiteBounds;
use crate::engine::assets::site_manifest::SiteManifest;
use bevy::prelude::*;

/// Handles to the terrain inputs acquired during the loading phase.
#[derive(Resource, Default)]
pub struct TerrainAssets {
    pub manifest: Option<Handle<SiteManifest>>,
    pub heightmap_texture: Handle<Image>,
    pub is_loaded: bool,
}

impl TerrainAssets {
    /// Site bounds out of the loaded manifest, if it has arrived.
    pub fn get_bounds(&self, manifests: &Assets<SiteManifest>) -> Option<SiteBounds> {
        self.manifest
            .as_ref()
            .and_then(|handle| manifests.get(handle))
            .map(|manifest| manifest.bounds.clone())
    }
}
