use bevy::prelude::*;
use bevy::asset::AssetLoadFailedEvent;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::path::{SETTINGS_ASSET_PATH, SETTINGS_EXTENSION};

use crate::engine::context::SceneContext;
use crate::engine::settings::SceneSettings;

/// Loads `settings.scene.json` through the asset server and pushes it into the
/// controller once loaded and again on every hot reload. The controller runs
/// on defaults until then, and keeps them if the file fails to load.
pub struct SceneSettingsPlugin;

impl Plugin for SceneSettingsPlugin {
    fn build(&self, app: &mut App) {
        // Registers SceneSettings as a loadable asset type from *.scene.json files.
        app.add_plugins(JsonAssetPlugin::<SceneSettings>::new(&[SETTINGS_EXTENSION]))
            .insert_resource(ClearColor(SceneSettings::default().clear_color()))
            .init_resource::<SettingsLoader>()
            .add_systems(Startup, start_loading_settings)
            .add_systems(Update, (apply_loaded_settings, report_failed_settings));
    }
}

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<SceneSettings>>,
}

impl SettingsLoader {
    /// Track an already loaded or added settings asset instead of the file.
    pub fn from_handle(handle: Handle<SceneSettings>) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

fn start_loading_settings(mut loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    if loader.handle.is_none() {
        loader.handle = Some(asset_server.load(SETTINGS_ASSET_PATH));
    }
}

/// Push loaded or edited settings into the controller.
fn apply_loaded_settings(
    mut events: EventReader<AssetEvent<SceneSettings>>,
    loader: Res<SettingsLoader>,
    settings_assets: Res<Assets<SceneSettings>>,
    mut context: NonSendMut<SceneContext>,
    mut clear_color: ResMut<ClearColor>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id }
        | AssetEvent::LoadedWithDependencies { id }
        | AssetEvent::Modified { id }) = event
        else {
            continue;
        };
        if loader.handle.as_ref().map(Handle::id) != Some(*id) {
            continue;
        }
        let Some(settings) = settings_assets.get(*id) else {
            continue;
        };

        clear_color.0 = settings.clear_color();
        if let Some(controller) = context.get_mut() {
            if let Err(err) = controller.apply_settings(settings.clone()) {
                warn!("Ignoring invalid scene settings: {}", err);
            }
        }
    }
}

fn report_failed_settings(mut failures: EventReader<AssetLoadFailedEvent<SceneSettings>>) {
    for failure in failures.read() {
        warn!(
            "Scene settings {} failed to load, keeping defaults: {}",
            failure.path, failure.error
        );
    }
}
