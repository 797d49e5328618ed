//! Minimal arena — a flat lit floor with a faint grid to read movement
//! speed against.
use crate::*;
use avian3d::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default())
        .add_systems(OnEnter(Screen::Gameplay), setup_arena);
}

fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let floor_size = 200.0;
    let floor_mesh = meshes.add(Plane3d::default().mesh().size(floor_size, floor_size));

    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.12, 0.12, 0.14),
        perceptual_roughness: 0.9,
        metallic: 0.0,
        reflectance: 0.05,
        ..default()
    });

    commands.spawn((
        Name::new("ArenaFloor"),
        DespawnOnExit(Screen::Gameplay),
        Mesh3d(floor_mesh),
        MeshMaterial3d(floor_material),
        Transform::from_translation(Vec3::ZERO),
        Collider::half_space(Vec3::Y),
        RigidBody::Static,
    ));

    // Grid lines to make motion readable
    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.24),
        unlit: true,
        ..default()
    });
    let grid_extent = 60.0;
    let grid_spacing = 2.0;
    let line_mesh = meshes.add(Cuboid::new(0.025, 0.001, grid_extent * 2.0));
    let num_lines = (grid_extent / grid_spacing) as i32;

    for i in -num_lines..=num_lines {
        let offset = i as f32 * grid_spacing;
        commands.spawn((
            DespawnOnExit(Screen::Gameplay),
            Mesh3d(line_mesh.clone()),
            MeshMaterial3d(grid_material.clone()),
            Transform::from_xyz(offset, 0.01, 0.0),
        ));
        commands.spawn((
            DespawnOnExit(Screen::Gameplay),
            Mesh3d(line_mesh.clone()),
            MeshMaterial3d(grid_material.clone()),
            Transform::from_xyz(0.0, 0.01, offset)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        ));
    }

    commands.spawn((
        Name::new("Sun"),
        Sun,
        DespawnOnExit(Screen::Gameplay),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
}
