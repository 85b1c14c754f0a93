use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::{
    CAMERA_FLY_DESTINATION_DEGREES, CAMERA_FLY_DURATION_SECS, CAMERA_FLY_HEADING_DEGREES,
    CAMERA_FLY_HEIGHT_METRES, CAMERA_FLY_PITCH_DEGREES,
};

// Crate engine modules
use crate::engine::assets::site_manifest::SiteManifest;
use crate::engine::assets::terrain_assets::TerrainAssets;
use crate::engine::camera::{CameraNavLock, ViewportCamera, camera_controller};
use crate::engine::core::app_state::{
    AppState, FpsText, despawn_loading_text, spawn_load_error_overlay, spawn_loading_text,
    transition_to_load_failed, transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::geo::{Geodetic, SiteFrame};
use crate::engine::loading::buildings_loader::{
    BuildingTileset, BuildingsLoader, spawn_buildings_when_ready, start_buildings_loading,
    watch_buildings_load_failure,
};
use crate::engine::loading::manifest_loader::{
    ManifestLoader, check_heightmap_loading, load_manifest_system, start_loading,
    watch_load_failures,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::terrain::{TerrainCreated, create_terrain_when_ready};

// Crate tools modules
use crate::tools::site_overlay::spawn_site_overlay;
use crate::tools::tower::TowerToolPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the site manifest and buildings tileset as loadable
        // JSON asset types.
        .add_plugins(JsonAssetPlugin::<SiteManifest>::new(&["site.json"]))
        .add_plugins(JsonAssetPlugin::<BuildingTileset>::new(&["tileset.json"]))
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::WHITE,
        });

    // Plugin for tower placement and dragging
    app.add_plugins(TowerToolPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<TerrainAssets>()
        .init_resource::<TerrainCreated>()
        .init_resource::<BuildingsLoader>()
        .init_resource::<CameraNavLock>()
        .init_resource::<ViewportCamera>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, spawn_loading_text, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                load_manifest_system,
                check_heightmap_loading,
                create_terrain_when_ready,
                watch_load_failures,
                transition_to_load_failed,
                transition_to_running,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (
                despawn_loading_text,
                spawn_site_overlay,
                begin_site_flyover,
                start_buildings_loading,
            ),
        )
        .add_systems(
            OnEnter(AppState::LoadFailed),
            (despawn_loading_text, spawn_load_error_overlay),
        );

    // Runtime systems - only run when the terrain is up
    app.add_systems(
        Update,
        (
            camera_controller,
            spawn_buildings_when_ready,
            watch_buildings_load_failure,
        )
            .run_if(in_state(AppState::Running)),
    );

    // FPS overlay only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_viewer_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_viewer_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 150.0, 300.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// The startup flight over the site: fixed destination, heading, pitch and
/// duration.
fn begin_site_flyover(mut viewport_camera: ResMut<ViewportCamera>, frame: Res<SiteFrame>) {
    let destination = frame.world_from_geodetic(Geodetic::from_degrees(
        CAMERA_FLY_DESTINATION_DEGREES[0],
        CAMERA_FLY_DESTINATION_DEGREES[1],
        CAMERA_FLY_HEIGHT_METRES,
    ));
    viewport_camera.fly_to(
        destination,
        CAMERA_FLY_HEADING_DEGREES.to_radians(),
        CAMERA_FLY_PITCH_DEGREES.to_radians(),
        CAMERA_FLY_DURATION_SECS,
    );
}

fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

#[cfg(not(target_arch = "wasm32"))]
fn fps_text_update_system(
    diagnostics: Res<bevy::diagnostic::DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
