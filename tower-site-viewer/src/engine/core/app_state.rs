use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

/// Application lifecycle. `LoadFailed` is terminal: the viewer shows the
/// fault instead of running partially initialised.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    LoadFailed,
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct LoadingText;

#[derive(Component)]
pub struct LoadErrorOverlay;

pub fn spawn_loading_text(mut commands: Commands) {
    commands.spawn((
        LoadingText,
        Text::new("Loading terrain..."),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
    ));
}

pub fn despawn_loading_text(mut commands: Commands, query: Query<Entity, With<LoadingText>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.terrain_ready() {
        info!("terrain ready, transitioning to Running");
        next_state.set(AppState::Running);
    }
}

pub fn transition_to_load_failed(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.fatal_error.is_some() {
        next_state.set(AppState::LoadFailed);
    }
}

/// Full-screen failure surface shown instead of a half-initialised scene.
pub fn spawn_load_error_overlay(mut commands: Commands, loading_progress: Res<LoadingProgress>) {
    let message = loading_progress
        .fatal_error
        .clone()
        .unwrap_or_else(|| "startup load failed".to_string());

    commands
        .spawn((
            LoadErrorOverlay,
            Name::new("LoadErrorOverlay"),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Viewer failed to start"),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.3, 0.3)),
            ));
            parent.spawn((
                Text::new(message),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
        });
}
