use crate::*;
use bevy::anti_alias::fxaa::Fxaa;

#[cfg(feature = "third_person")]
mod third_person;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera);

    #[cfg(feature = "third_person")]
    app.add_plugins(third_person::plugin);
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        SceneCamera,
        IsDefaultUiCamera,
        Camera3d::default(),
        Camera::default(),
        Transform::from_xyz(10.0, 6.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        Fxaa::default(),
    ));
}
