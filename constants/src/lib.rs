/// Fixed facility geometry: boundary ring, fallback spawn point, tileset id.
pub mod site;

/// Visual tuning values shared by the engine and tools.
pub mod render_settings;
