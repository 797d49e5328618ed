use bevy::gltf::Gltf;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_systems(PreStartup, load_models);
}

/// Handles to the GLTF models the game needs up front.
#[derive(Resource)]
pub struct Models {
    pub player: Handle<Gltf>,
}

fn load_models(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(Models {
        player: asset_server.load("models/knight.glb"),
    });
}

/// True once every tracked model (with dependencies) finished loading.
pub fn models_ready(models: Res<Models>, asset_server: Res<AssetServer>) -> bool {
    asset_server.is_loaded_with_dependencies(&models.player)
}
