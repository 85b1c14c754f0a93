use bevy::prelude::*;

/// Loading-phase progress and the first fatal error, if any.
#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub heightmap_loaded: bool,
    pub terrain_created: bool,
    pub fatal_error: Option<String>,
}

impl LoadingProgress {
    pub fn terrain_ready(&self) -> bool {
        self.manifest_loaded && self.heightmap_loaded && self.terrain_created
    }

    /// Record a fatal fault; the first one wins and is what the overlay shows.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.fatal_error.is_none() {
            let message = message.into();
            error!("startup load failed: {message}");
            self.fatal_error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_ready_requires_all_stages() {
        let mut progress = LoadingProgress::default();
        assert!(!progress.terrain_ready());
        progress.manifest_loaded = true;
        progress.heightmap_loaded = true;
        assert!(!progress.terrain_ready());
        progress.terrain_created = true;
        assert!(progress.terrain_ready());
    }

    #[test]
    fn first_fatal_error_wins() {
        let mut progress = LoadingProgress::default();
        progress.fail("terrain manifest missing");
        progress.fail("later fault");
        assert_eq!(
            progress.fatal_error.as_deref(),
            Some("terrain manifest missing")
        );
    }
}
