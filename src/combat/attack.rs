use super::*;
use crate::player::CharacterState;
use avian3d::prelude::LinearVelocity;

/// Swing timing, as fractions of the attack clip. The blade only deals
/// damage through the middle of the animation; wind-up and recovery are
/// safe. Fallbacks cover the no-clip-info case so no state can get stuck.
pub mod swing_timing {
    /// Damage window of a normal swing, as a fraction of clip duration.
    pub const HIT_START_FRACTION: f32 = 0.35;
    pub const HIT_END_FRACTION: f32 = 0.75;
    /// Moment of the super finisher's radial blast.
    pub const SUPER_HIT_FRACTION: f32 = 0.5;
    /// Fixed durations used when the animation layer has no active clip.
    pub const ATTACK_FALLBACK_SECS: f32 = 1.0;
    pub const SUPER_FALLBACK_SECS: f32 = 3.0;
    /// Real-time length of the finisher's slow-motion dip.
    pub const SUPER_SLOW_SECS: f32 = 0.8;
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (drive_swing_window, deal_swing_damage)
            .chain()
            .in_set(AppSystems::Combat)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// 2D cone check on the XZ plane. Returns true if target is within range
/// and arc.
pub fn cone_hit_check(
    origin: Vec2,
    forward: Vec2,
    target: Vec2,
    range: f32,
    half_arc_cos: f32,
) -> bool {
    let delta = target - origin;
    let dist = delta.length();

    if dist > range {
        return false;
    }

    if dist > 0.01 {
        let dir = delta / dist;
        if forward.dot(dir) < half_arc_cos {
            return false;
        }
    }

    true
}

/// Open and close the player's swing damage window from the attack state's
/// progress, and fire the super finisher's one-shot radial payload.
fn drive_swing_window(
    cfg: Res<Config>,
    mut slow_motion: ResMut<SlowMotion>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut player: Query<
        (Entity, &Transform, &mut CharacterState, &mut Swing),
        With<PlayerCombatant>,
    >,
    mut enemies: Query<(&Transform, &mut LinearVelocity), With<Enemy>>,
    enemy_entities: Query<(Entity, &Transform), (With<Enemy>, With<Health>)>,
    mut commands: Commands,
) {
    let Ok((entity, transform, mut state, mut swing)) = player.single_mut() else {
        return;
    };

    match &mut *state {
        CharacterState::Attacking {
            elapsed, duration, ..
        } => {
            let progress = *elapsed / duration.max(f32::EPSILON);
            let in_window = (swing_timing::HIT_START_FRACTION..swing_timing::HIT_END_FRACTION)
                .contains(&progress);
            if in_window && !swing.active {
                swing.open();
            } else if !in_window && swing.active {
                swing.close();
            }
        }
        CharacterState::SuperAttacking {
            elapsed,
            duration,
            payload_done,
        } => {
            let progress = *elapsed / duration.max(f32::EPSILON);

            // blade hits stay live through the same mid-clip window
            let in_window = (swing_timing::HIT_START_FRACTION..swing_timing::HIT_END_FRACTION)
                .contains(&progress);
            if in_window && !swing.active {
                swing.open();
            } else if !in_window && swing.active {
                swing.close();
            }

            if !*payload_done && progress >= swing_timing::SUPER_HIT_FRACTION {
                *payload_done = true;

                slow_motion.pulse(
                    swing_timing::SUPER_SLOW_SECS,
                    cfg.super_ability.time_slow_scale,
                    &mut virtual_time,
                );

                let blast_power = cfg.combat.weapon_power * cfg.super_ability.radius_multiplier;
                for (target, target_tf) in enemy_entities.iter() {
                    let offset = target_tf.translation - transform.translation;
                    if offset.length() > cfg.super_ability.radius_range {
                        continue;
                    }
                    commands.trigger(SwingConnect {
                        attacker: entity,
                        target,
                        power: blast_power,
                        kind: SwingKind::Shockwave,
                    });
                }

                push_back_in_range(
                    transform.translation,
                    cfg.super_ability.radius_range,
                    cfg.super_ability.radius_pushback,
                    &mut enemies,
                );
            }
        }
        _ => {
            if swing.active {
                swing.close();
            }
        }
    }
}

/// While the window is open, connect the swing against every enemy inside
/// the blade's cone. The resolved set on the swing keeps a target from being
/// hit twice even though the window spans many ticks.
fn deal_swing_damage(
    cfg: Res<Config>,
    player: Query<(Entity, &Transform, &Swing), With<PlayerCombatant>>,
    targets: Query<(Entity, &Transform), (With<Health>, With<Enemy>)>,
    mut commands: Commands,
) {
    let Ok((entity, transform, swing)) = player.single() else {
        return;
    };
    if !swing.active {
        return;
    }

    let origin = transform.translation;
    let forward = transform.forward().as_vec3();
    let forward_xz = Vec2::new(forward.x, forward.z).normalize_or_zero();
    let origin_xz = Vec2::new(origin.x, origin.z);
    let half_arc_cos = (cfg.combat.attack_arc / 2.0_f32).to_radians().cos();

    for (target, target_tf) in targets.iter() {
        if swing.already_hit.contains(&target) {
            continue;
        }

        let target_xz = Vec2::new(target_tf.translation.x, target_tf.translation.z);
        if !cone_hit_check(
            origin_xz,
            forward_xz,
            target_xz,
            cfg.combat.attack_range,
            half_arc_cos,
        ) {
            continue;
        }

        commands.trigger(SwingConnect {
            attacker: entity,
            target,
            power: cfg.combat.weapon_power,
            kind: SwingKind::Melee,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cone_check_respects_range_and_arc() {
        let origin = Vec2::ZERO;
        let forward = Vec2::new(0.0, 1.0);
        let half_arc_cos = (60.0_f32).to_radians().cos(); // 120 degree arc

        // dead ahead, in range
        assert!(cone_hit_check(origin, forward, Vec2::new(0.0, 2.0), 2.4, half_arc_cos));
        // out of range
        assert!(!cone_hit_check(origin, forward, Vec2::new(0.0, 3.0), 2.4, half_arc_cos));
        // behind the attacker
        assert!(!cone_hit_check(origin, forward, Vec2::new(0.0, -1.0), 2.4, half_arc_cos));
        // inside the arc edge (45° off-axis)
        assert!(cone_hit_check(origin, forward, Vec2::new(1.0, 1.0), 2.4, half_arc_cos));
        // point blank always hits
        assert!(cone_hit_check(origin, forward, Vec2::ZERO, 2.4, half_arc_cos));
    }
}
