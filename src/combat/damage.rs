use super::*;
use crate::player::CharacterState;

pub fn plugin(app: &mut App) {
    app.add_observer(on_swing_connect)
        .add_observer(on_damage_resolved)
        .add_observer(on_death);
}

// ── Resolution (pure) ───────────────────────────────────────────────

/// Binary gates read from the target before any math happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitGates {
    pub blocked: bool,
    pub invulnerable: bool,
}

/// Multiplier snapshot read from the attacker.
#[derive(Debug, Clone, Copy)]
pub struct HitModifiers {
    pub combo_multiplier: f32,
    /// Combo count before this hit registers, for the display category.
    pub combo_level: u32,
    pub super_active: bool,
    pub super_multiplier: f32,
}

impl Default for HitModifiers {
    fn default() -> Self {
        Self {
            combo_multiplier: 1.0,
            combo_level: 0,
            super_active: false,
            super_multiplier: 1.0,
        }
    }
}

/// Outcome of one hit resolution, including which side effects the caller
/// should run. Gated hits request none of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHit {
    pub amount: f32,
    pub category: DamageCategory,
    pub builds_combo: bool,
    pub adds_charge: bool,
    pub pulses_slow_motion: bool,
}

/// Resolve a potential hit into final damage, in gate order:
///
/// 1. Active shield block → zero damage, no combo, no slow-motion.
/// 2. Invulnerable target → same suppression.
/// 3. Otherwise multiply base power by either the combo multiplier or the
///    super multiplier — never both. An active super wins and forces the
///    combo multiplier to 1.0.
///
/// Combo building, charge gain and the slow-motion pulse only happen on a
/// clean non-super hit; the super has its own time control and must not
/// double-apply.
pub fn resolve_hit(power: f32, kind: SwingKind, gates: HitGates, mods: HitModifiers) -> ResolvedHit {
    if gates.blocked {
        return ResolvedHit {
            amount: 0.0,
            category: DamageCategory::Blocked,
            builds_combo: false,
            adds_charge: false,
            pulses_slow_motion: false,
        };
    }

    if gates.invulnerable {
        return ResolvedHit {
            amount: 0.0,
            category: DamageCategory::Invincible,
            builds_combo: false,
            adds_charge: false,
            pulses_slow_motion: false,
        };
    }

    if kind == SwingKind::Shockwave {
        return ResolvedHit {
            amount: power,
            category: DamageCategory::Special,
            builds_combo: false,
            adds_charge: false,
            pulses_slow_motion: false,
        };
    }

    let (combo_multiplier, super_multiplier) = if mods.super_active {
        (1.0, mods.super_multiplier)
    } else {
        (mods.combo_multiplier, 1.0)
    };

    let amount = power * combo_multiplier * super_multiplier;
    if mods.super_active {
        ResolvedHit {
            amount,
            category: DamageCategory::Special,
            builds_combo: false,
            adds_charge: false,
            pulses_slow_motion: false,
        }
    } else {
        ResolvedHit {
            amount,
            category: DamageCategory::Normal {
                combo_level: mods.combo_level,
            },
            builds_combo: true,
            adds_charge: true,
            pulses_slow_motion: true,
        }
    }
}

// ── Application (ECS) ───────────────────────────────────────────────

/// Observer: a swing's damage window reached a target. Runs the pipeline
/// once per (swing, target) pair and applies every side effect.
fn on_swing_connect(
    on: On<SwingConnect>,
    cfg: Res<Config>,
    mut slow_motion: ResMut<SlowMotion>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut attackers: Query<(
        &mut Swing,
        Option<&mut SuperGauge>,
        Option<&mut ComboTracker>,
        Option<&CharacterState>,
    )>,
    mut targets: Query<(&mut Health, &Transform, Has<Invulnerable>, Option<&ShieldState>)>,
    mut commands: Commands,
) {
    let event = on.event();

    let Ok((mut swing, gauge, combo, state)) = attackers.get_mut(event.attacker) else {
        return;
    };
    // one resolution per target per swing, however long the window overlaps
    if !swing.mark_resolved(event.target) {
        return;
    }

    let Ok((mut health, target_tf, invulnerable, shield)) = targets.get_mut(event.target) else {
        return;
    };

    let gates = HitGates {
        blocked: shield.map(|s| s.is_blocking()).unwrap_or(false),
        invulnerable,
    };
    let super_active = gauge.as_ref().map(|g| g.is_active()).unwrap_or(false);
    let mods = HitModifiers {
        combo_multiplier: combo.as_ref().map(|c| c.damage_multiplier()).unwrap_or(1.0),
        combo_level: combo.as_ref().map(|c| c.count()).unwrap_or(0),
        super_active,
        super_multiplier: cfg.super_ability.damage_multiplier,
    };

    let hit = resolve_hit(event.power, event.kind, gates, mods);

    let died = hit.amount > 0.0 && health.take_damage(hit.amount);

    if hit.builds_combo {
        if let Some(mut combo) = combo {
            // the follow-up window is whatever the current swing has left
            let window = match state {
                Some(CharacterState::Attacking {
                    elapsed, duration, ..
                }) => (duration - elapsed).max(0.0),
                _ => 0.0,
            };
            let mut signals = Vec::new();
            combo.register_hit(window, &mut signals);
            emit_combo_signals(signals, &mut commands);
        }
    }

    if hit.adds_charge {
        if let Some(mut gauge) = gauge {
            let mut signals = Vec::new();
            gauge.add_charge(cfg.super_ability.charge_per_hit, &mut signals);
            emit_super_signals(signals, &mut commands);
        }
    }

    if hit.pulses_slow_motion {
        slow_motion.pulse(
            cfg.slow_motion.duration,
            cfg.slow_motion.scale,
            &mut virtual_time,
        );
    }

    commands.trigger(DamageResolved {
        target: event.target,
        position: target_tf.translation + Vec3::Y,
        amount: hit.amount,
        category: hit.category,
    });

    if died {
        commands.trigger(Died {
            entity: event.target,
        });
    }
}

/// Observer: taking real damage force-resets the *target's* combo, even
/// mid-window. Blocked and invincible hits leave it untouched.
fn on_damage_resolved(
    on: On<DamageResolved>,
    mut combos: Query<&mut ComboTracker>,
    mut commands: Commands,
) {
    let event = on.event();
    if event.amount <= 0.0 {
        return;
    }
    let Ok(mut combo) = combos.get_mut(event.target) else {
        return;
    };

    let mut signals = Vec::new();
    combo.force_reset(&mut signals);
    emit_combo_signals(signals, &mut commands);
}

/// Observer: handle death. Enemies despawn; the player gets the respawn
/// treatment — full health and both meters back to their initial state.
fn on_death(
    on: On<Died>,
    enemies: Query<(), With<Enemy>>,
    mut players: Query<
        (&mut Health, &mut ComboTracker, &mut SuperGauge),
        With<PlayerCombatant>,
    >,
    mut commands: Commands,
) {
    let event = on.event();

    if enemies.get(event.entity).is_ok() {
        commands.entity(event.entity).despawn();
        return;
    }

    let Ok((mut health, mut combo, mut gauge)) = players.get_mut(event.entity) else {
        return;
    };

    info!("Player died, respawning");
    health.current = health.max;

    let mut combo_signals = Vec::new();
    combo.force_reset(&mut combo_signals);
    emit_combo_signals(combo_signals, &mut commands);

    let mut super_signals = Vec::new();
    gauge.reset(&mut super_signals);
    emit_super_signals(super_signals, &mut commands);

    commands.entity(event.entity).try_remove::<Invulnerable>();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(combo_multiplier: f32, combo_level: u32) -> HitModifiers {
        HitModifiers {
            combo_multiplier,
            combo_level,
            super_active: false,
            super_multiplier: 3.0,
        }
    }

    #[test]
    fn blocked_hit_suppresses_everything() {
        let gates = HitGates {
            blocked: true,
            invulnerable: false,
        };
        let hit = resolve_hit(10.0, SwingKind::Melee, gates, mods(2.5, 4));

        assert_eq!(hit.amount, 0.0);
        assert_eq!(hit.category, DamageCategory::Blocked);
        assert!(!hit.builds_combo);
        assert!(!hit.adds_charge);
        assert!(!hit.pulses_slow_motion);
    }

    #[test]
    fn invulnerable_hit_suppresses_everything() {
        let gates = HitGates {
            blocked: false,
            invulnerable: true,
        };
        let hit = resolve_hit(10.0, SwingKind::Melee, gates, mods(2.5, 4));

        assert_eq!(hit.amount, 0.0);
        assert_eq!(hit.category, DamageCategory::Invincible);
        assert!(!hit.pulses_slow_motion);
    }

    #[test]
    fn block_gate_wins_over_invulnerability() {
        let gates = HitGates {
            blocked: true,
            invulnerable: true,
        };
        let hit = resolve_hit(10.0, SwingKind::Melee, gates, mods(1.0, 0));
        assert_eq!(hit.category, DamageCategory::Blocked);
    }

    #[test]
    fn combo_scales_normal_damage() {
        // base 10, combo count 2 with table [1.0, 1.2, 1.5] → 15.0
        let hit = resolve_hit(10.0, SwingKind::Melee, HitGates::default(), mods(1.5, 2));

        assert_eq!(hit.amount, 15.0);
        assert_eq!(hit.category, DamageCategory::Normal { combo_level: 2 });
        assert!(hit.builds_combo);
        assert!(hit.adds_charge);
        assert!(hit.pulses_slow_motion);
    }

    #[test]
    fn super_bypasses_combo_entirely() {
        let mut m = mods(2.5, 5);
        m.super_active = true;
        let hit = resolve_hit(10.0, SwingKind::Melee, HitGates::default(), m);

        // 10 × 3.0, the 2.5 combo multiplier is forced to 1.0
        assert_eq!(hit.amount, 30.0);
        assert_eq!(hit.category, DamageCategory::Special);
        assert!(!hit.builds_combo);
        assert!(!hit.adds_charge);
        // the super carries its own time control
        assert!(!hit.pulses_slow_motion);
    }

    #[test]
    fn shockwave_is_flat_and_gated() {
        let hit = resolve_hit(50.0, SwingKind::Shockwave, HitGates::default(), mods(2.0, 3));
        assert_eq!(hit.amount, 50.0);
        assert_eq!(hit.category, DamageCategory::Special);
        assert!(!hit.builds_combo);

        let gated = resolve_hit(
            50.0,
            SwingKind::Shockwave,
            HitGates {
                blocked: true,
                invulnerable: false,
            },
            mods(2.0, 3),
        );
        assert_eq!(gated.amount, 0.0);
    }
}
