use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;

use crate::engine::core::mesh_import::MeshImportPlugin;
use crate::engine::core::plugin::ScenePlugin;
use crate::engine::core::render_plugin::SceneRenderPlugin;
use crate::engine::core::settings_loader::SceneSettingsPlugin;
use crate::engine::core::window_config::create_window_config;
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        // Controller starts on defaults; the settings asset is applied once loaded.
        .add_plugins(ScenePlugin::default())
        .add_plugins(SceneSettingsPlugin)
        .add_plugins(MeshImportPlugin)
        .add_plugins(SceneRenderPlugin)
        .add_plugins(WebRpcPlugin);

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
