use super::*;
use crate::models::{ClearEnemies, SpawnEnemy};
use avian3d::prelude::{Collider, LinearVelocity, LockedAxes, Mass, RigidBody};
use bevy_enhanced_input::prelude::Start;

const ENEMY_AGGRO_RANGE: f32 = 12.0;
const ENEMY_CHASE_SPEED: f32 = 3.0;
/// Fixed swing length; enemies have no animation layer to query.
const ENEMY_SWING_SECS: f32 = 0.8;
const ENEMY_HIT_FRACTION: f32 = 0.5;

pub fn plugin(app: &mut App) {
    app.register_type::<EnemyBehavior>()
        .add_observer(spawn_enemy_in_front)
        .add_observer(clear_enemies)
        .add_systems(
            Update,
            (enemy_behavior.in_set(AppSystems::Logic), enemy_swings.in_set(AppSystems::Combat))
                .run_if(in_state(Screen::Gameplay)),
        );
}

/// Current behavior state for enemy AI.
#[derive(Component, Default, Clone, Copy, PartialEq, Eq, Reflect, Debug)]
#[reflect(Component)]
pub enum EnemyBehavior {
    #[default]
    Idle,
    Chase,
    Attack,
}

/// Enemy attack bookkeeping: a cooldown between swings and the progress of
/// the swing in flight, if any.
#[derive(Component)]
pub struct EnemyAi {
    pub attack_cooldown: Timer,
    pub swing_elapsed: Option<f32>,
}

impl EnemyAi {
    fn new(cooldown_secs: f32) -> Self {
        let mut attack_cooldown = Timer::from_seconds(cooldown_secs, TimerMode::Once);
        attack_cooldown.tick(std::time::Duration::from_secs_f32(cooldown_secs));
        Self {
            attack_cooldown,
            swing_elapsed: None,
        }
    }
}

/// Spawn a test enemy in front of the player when E is pressed.
fn spawn_enemy_in_front(
    _on: On<Start<SpawnEnemy>>,
    cfg: Res<Config>,
    player: Query<&Transform, With<Player>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };

    let enemy_mesh = meshes.add(Capsule3d::new(0.5, 1.0));
    let enemy_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.2, 0.2),
        ..default()
    });

    // Spawn a few units in front of the player
    let spawn_pos = player_transform.translation + player_transform.forward() * 5.0;

    commands.spawn((
        Name::new("Enemy"),
        DespawnOnExit(Screen::Gameplay),
        Transform::from_translation(spawn_pos),
        Mesh3d(enemy_mesh),
        MeshMaterial3d(enemy_material),
        // Combat components
        Health::new(100.0),
        Enemy,
        Combatant,
        EnemyBehavior::default(),
        EnemyAi::new(cfg.combat.enemy_attack_cooldown),
        Swing::default(),
        // Physics - heavy so the player can't push them around easily
        Collider::capsule(0.5, 1.0),
        RigidBody::Dynamic,
        LockedAxes::ROTATION_LOCKED,
        Mass(500.0),
    ));

    info!("Spawned enemy at {:?}", spawn_pos);
}

fn clear_enemies(
    _on: On<Start<ClearEnemies>>,
    enemies: Query<Entity, With<Enemy>>,
    mut commands: Commands,
) {
    for entity in enemies.iter() {
        commands.entity(entity).despawn();
    }
}

/// Distance-based behavior selection plus chase movement. Enemies close
/// enough to strike stop and swing; the rest walk straight at the player.
fn enemy_behavior(
    cfg: Res<Config>,
    time: Res<Time>,
    player: Query<&Transform, With<PlayerCombatant>>,
    mut enemies: Query<
        (&mut EnemyBehavior, &mut EnemyAi, &mut Transform, &mut LinearVelocity),
        (With<Enemy>, Without<PlayerCombatant>),
    >,
) {
    let Ok(player_tf) = player.single() else {
        return;
    };

    for (mut behavior, mut ai, mut transform, mut velocity) in enemies.iter_mut() {
        ai.attack_cooldown.tick(time.delta());

        let to_player = player_tf.translation - transform.translation;
        let planar = Vec3::new(to_player.x, 0.0, to_player.z);
        let distance = planar.length();

        *behavior = if distance > ENEMY_AGGRO_RANGE {
            EnemyBehavior::Idle
        } else if distance > cfg.combat.enemy_attack_range {
            EnemyBehavior::Chase
        } else {
            EnemyBehavior::Attack
        };

        match *behavior {
            EnemyBehavior::Idle => {
                velocity.x = 0.0;
                velocity.z = 0.0;
            }
            EnemyBehavior::Chase => {
                // don't steer mid-swing
                if ai.swing_elapsed.is_none() {
                    let dir = planar.normalize_or_zero();
                    velocity.x = dir.x * ENEMY_CHASE_SPEED;
                    velocity.z = dir.z * ENEMY_CHASE_SPEED;
                    if dir.length_squared() > 0.0 {
                        transform.look_to(dir, Vec3::Y);
                    }
                }
            }
            EnemyBehavior::Attack => {
                velocity.x = 0.0;
                velocity.z = 0.0;
                let dir = planar.normalize_or_zero();
                if dir.length_squared() > 0.0 {
                    transform.look_to(dir, Vec3::Y);
                }
            }
        }
    }
}

/// Advance enemy swings: start one when in reach and off cooldown, connect
/// it against the player at the hit moment. The shared damage pipeline
/// applies the shield and invulnerability gates.
fn enemy_swings(
    cfg: Res<Config>,
    time: Res<Time>,
    player: Query<(Entity, &Transform), With<PlayerCombatant>>,
    mut enemies: Query<
        (Entity, &Transform, &EnemyBehavior, &mut EnemyAi, &mut Swing),
        With<Enemy>,
    >,
    mut commands: Commands,
) {
    let Ok((player_entity, player_tf)) = player.single() else {
        return;
    };

    for (entity, transform, behavior, mut ai, mut swing) in enemies.iter_mut() {
        match ai.swing_elapsed {
            None => {
                if *behavior == EnemyBehavior::Attack && ai.attack_cooldown.is_finished() {
                    ai.swing_elapsed = Some(0.0);
                    ai.attack_cooldown.reset();
                    swing.open();
                }
            }
            Some(elapsed) => {
                let elapsed = elapsed + time.delta_secs();
                ai.swing_elapsed = Some(elapsed);

                let hit_time = ENEMY_SWING_SECS * ENEMY_HIT_FRACTION;
                let in_reach = (player_tf.translation - transform.translation).length()
                    <= cfg.combat.enemy_attack_range + 0.5;

                if elapsed >= hit_time && in_reach && !swing.already_hit.contains(&player_entity)
                {
                    commands.trigger(SwingConnect {
                        attacker: entity,
                        target: player_entity,
                        power: cfg.combat.enemy_power,
                        kind: SwingKind::Melee,
                    });
                }

                if elapsed >= ENEMY_SWING_SECS {
                    ai.swing_elapsed = None;
                    swing.close();
                }
            }
        }
    }
}
