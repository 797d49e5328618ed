use crate::combat::{
    Combatant, ComboTracker, Health, PlayerCombatant, ShieldState, SuperGauge, Swing,
};
use crate::*;
use avian3d::prelude::*;
use bevy::scene::SceneInstanceReady;
use bevy_enhanced_input::prelude::*;
#[cfg(feature = "third_person")]
use bevy_third_person_camera::*;
use bevy_tnua::prelude::*;
use bevy_tnua_avian3d::*;
use std::time::Duration;

mod animation;
pub mod control;

pub use animation::*;
pub use control::{CharacterState, LatchedInput};

/// This plugin handles the player character: the behavior state machine,
/// movement integration and animation dispatch.
/// Player logic is only active during the State `Screen::Gameplay`
pub fn plugin(app: &mut App) {
    app.add_plugins((
        TnuaControllerPlugin::new(FixedUpdate),
        TnuaAvian3dPlugin::new(FixedUpdate),
        control::plugin,
    ));

    #[cfg(feature = "third_person")]
    app.add_plugins(ThirdPersonCameraPlugin).configure_sets(
        PostUpdate,
        bevy_third_person_camera::CameraSyncSet.before(TransformSystems::Propagate),
    );

    app.add_systems(OnEnter(Screen::Gameplay), spawn_player)
        .add_systems(
            Update,
            animating
                .in_set(TnuaUserControlsSystems)
                .run_if(in_state(Screen::Gameplay)),
        )
        .add_observer(player_post_spawn);
}

pub fn spawn_player(
    cfg: Res<Config>,
    models: Res<Models>,
    gltf_assets: Res<Assets<Gltf>>,
    mut commands: Commands,
) -> Result {
    let Some(gltf) = gltf_assets.get(&models.player) else {
        return Ok(());
    };

    let mesh = SceneRoot(gltf.scenes[0].clone());
    let pos = Vec3::from(cfg.player.spawn_pos);
    let pos = Transform::from_translation(pos);
    let collider = Collider::capsule(cfg.player.hitbox.radius, cfg.player.hitbox.height);

    commands
        .spawn((
            DespawnOnExit(Screen::Gameplay),
            pos,
            Player::default(),
            // camera target component
            #[cfg(feature = "third_person")]
            ThirdPersonCameraTarget,
            PlayerCtx,
            // tnua character control bundles
            (
                TnuaController::default(),
                // Tnua can fix the rotation, but the character will still get rotated before it can do so.
                // By locking the rotation we can prevent this.
                LockedAxes::ROTATION_LOCKED.unlock_rotation_y(),
                // A sensor shape is not strictly necessary, but without it we'll get weird results.
                TnuaAvian3dSensorShape(collider.clone()),
            ),
            // physics
            (
                collider,
                RigidBody::Dynamic,
                Friction::ZERO.with_combine_rule(CoefficientCombine::Multiply),
            ),
            // behavior state machine + animation dispatch
            (
                CharacterState::default(),
                CurrentClip::default(),
                Stamina::new(cfg.player.stamina.max),
            ),
            // combat components
            (
                Health::new(100.0),
                Swing::default(),
                ComboTracker::new(cfg.combo.multipliers.clone()),
                SuperGauge::new(
                    cfg.super_ability.max_charge,
                    cfg.super_ability.activation_window,
                ),
                ShieldState::new(cfg.shield.block_duration, cfg.shield.cooldown),
                Combatant,
                PlayerCombatant,
            ),
        ))
        // spawn character mesh as child to adjust mesh position relative to the player origin
        .with_children(|parent| {
            let mut e = parent.spawn((Transform::from_xyz(0.0, -1.0, 0.0), mesh));
            e.observe(prepare_animations);
        });

    Ok(())
}

fn player_post_spawn(on: On<Add, Player>, mut players: Query<&mut Player>) {
    if let Ok(mut p) = players.get_mut(on.entity) {
        p.id = on.entity; // update player id with spawned entity
    }
}
