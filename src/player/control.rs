use super::*;
use crate::combat::swing_timing::{ATTACK_FALLBACK_SECS, SUPER_FALLBACK_SECS};
use crate::combat::{
    emit_combo_signals, emit_super_signals, ComboTracker, ShieldState, SuperGauge,
};
use bevy_tnua::builtins::TnuaBuiltinCrouch;

pub fn plugin(app: &mut App) {
    app.init_resource::<LatchedInput>()
        .register_type::<CharacterState>()
        .add_observer(on_attack_pressed)
        .add_observer(on_block_pressed)
        .add_observer(on_jump_pressed)
        .add_observer(on_super_pressed)
        .add_observer(on_draw_weapon_pressed)
        .add_observer(on_sprint_start)
        .add_observer(on_sprint_end)
        .add_observer(on_crouch_start)
        .add_observer(on_crouch_end)
        .add_systems(
            Update,
            (
                latch_move_axis.in_set(AppSystems::LatchInput),
                logic_update.in_set(AppSystems::Logic),
                movement
                    .in_set(TnuaUserControlsSystems)
                    .after(AppSystems::Logic),
                tick_stamina.in_set(AppSystems::TickTimers),
            )
                .run_if(in_state(Screen::Gameplay)),
        );
}

// ── Behavior states ─────────────────────────────────────────────────

/// The character's top-level behavior. Exactly one variant is active at a
/// time; each carries only the transient data it needs. Transitions are
/// decided once per logic tick, after the current state's logic has run.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub enum CharacterState {
    Standing,
    Crouching,
    Sprinting,
    /// Airborne from a normal jump; keeps the takeoff momentum so air
    /// control blends instead of replacing it. `was_airborne` arms the
    /// landing check only after the character actually left the ground.
    Jumping {
        momentum: Vec3,
        jump_fed: bool,
        was_airborne: bool,
    },
    /// Airborne from a sprint jump. Lands like a normal jump; the fixed
    /// duration is a fallback that returns to sprinting if ground contact
    /// is never detected.
    SprintJumping {
        elapsed: f32,
        momentum: Vec3,
        jump_fed: bool,
        was_airborne: bool,
    },
    Landing { elapsed: f32 },
    /// Weapon drawn, ready to attack, block or trigger the super.
    Combat,
    /// One swing of the attack chain. `duration` is the clip length at
    /// entry (or the fixed fallback); a buffered follow-up chains into the
    /// next swing when the clip runs out.
    Attacking {
        elapsed: f32,
        duration: f32,
        follow_up: bool,
        count: u32,
    },
    /// The committed finisher. Input and movement are suppressed for its
    /// whole duration; the radial payload fires once mid-clip.
    SuperAttacking {
        elapsed: f32,
        duration: f32,
        payload_done: bool,
    },
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::Standing
    }
}

// ── Latched input ───────────────────────────────────────────────────

/// Input snapshot for the current logic tick. Edges are set by input
/// observers as they arrive and cleared after the logic tick consumed (or
/// dropped) them, so logic only ever sees this tick's presses.
#[derive(Resource, Default)]
pub struct LatchedInput {
    pub move_axis: Vec2,
    pub attack: bool,
    pub block: bool,
    pub jump: bool,
    pub super_activate: bool,
    pub draw_weapon: bool,
    pub sprint_held: bool,
    pub crouch_held: bool,
}

impl LatchedInput {
    fn clear_edges(&mut self) {
        self.attack = false;
        self.block = false;
        self.jump = false;
        self.super_activate = false;
        self.draw_weapon = false;
    }
}

fn on_attack_pressed(_on: On<Start<Attack>>, mut input: ResMut<LatchedInput>) {
    input.attack = true;
}

fn on_block_pressed(_on: On<Start<Block>>, mut input: ResMut<LatchedInput>) {
    input.block = true;
}

fn on_jump_pressed(_on: On<Start<Jump>>, mut input: ResMut<LatchedInput>) {
    input.jump = true;
}

fn on_super_pressed(_on: On<Start<SuperActivate>>, mut input: ResMut<LatchedInput>) {
    input.super_activate = true;
}

fn on_draw_weapon_pressed(_on: On<Start<DrawWeapon>>, mut input: ResMut<LatchedInput>) {
    input.draw_weapon = true;
}

fn on_sprint_start(_on: On<Start<Sprint>>, mut input: ResMut<LatchedInput>) {
    input.sprint_held = true;
}

fn on_sprint_end(_on: On<Complete<Sprint>>, mut input: ResMut<LatchedInput>) {
    input.sprint_held = false;
}

fn on_crouch_start(_on: On<Start<Crouch>>, mut input: ResMut<LatchedInput>) {
    input.crouch_held = true;
}

fn on_crouch_end(_on: On<Complete<Crouch>>, mut input: ResMut<LatchedInput>) {
    input.crouch_held = false;
}

fn latch_move_axis(actions: Query<&Action<Navigate>>, mut input: ResMut<LatchedInput>) {
    input.move_axis = actions.single().map(|a| **a).unwrap_or_default();
}

// ── Per-tick decision ───────────────────────────────────────────────

/// Everything the transition logic needs to know about the world this tick.
/// Durations already include the no-clip fallbacks.
pub struct LogicCtx {
    pub grounded: bool,
    pub can_sprint: bool,
    pub blocking: bool,
    pub can_block: bool,
    pub super_active: bool,
    pub super_ready: bool,
    pub attack_duration: f32,
    pub super_duration: f32,
    pub landing_secs: f32,
    pub sprint_jump_secs: f32,
}

/// Side requests the decision makes besides (or instead of) a transition.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickDecision {
    pub next: Option<CharacterState>,
    /// Raise the shield this tick (block is a sub-behavior, not a state).
    pub raise_shield: bool,
    /// Ask the gauge to activate.
    pub activate_super: bool,
    /// The finisher's clip completed; leave the active window.
    pub super_finished: bool,
}

impl TickDecision {
    fn none() -> Self {
        Self::default()
    }

    fn to(next: CharacterState) -> Self {
        Self {
            next: Some(next),
            ..Self::default()
        }
    }
}

fn fresh_attack(duration: f32, count: u32) -> CharacterState {
    CharacterState::Attacking {
        elapsed: 0.0,
        duration,
        follow_up: false,
        count,
    }
}

/// Advance the active state by one logic tick and decide what happens next.
///
/// Pure with respect to the ECS: all world access comes through `ctx`, all
/// effects go out through the returned [`TickDecision`]. The caller applies
/// the transition after this returns, so no re-entrant state change can
/// happen inside a tick.
pub fn decide(
    state: &mut CharacterState,
    input: &LatchedInput,
    ctx: &LogicCtx,
    dt: f32,
) -> TickDecision {
    match state {
        CharacterState::Standing => {
            if input.draw_weapon {
                return TickDecision::to(CharacterState::Combat);
            }
            if input.jump && ctx.grounded {
                return TickDecision::to(CharacterState::Jumping {
                    momentum: Vec3::ZERO,
                    jump_fed: false,
                    was_airborne: false,
                });
            }
            if input.crouch_held {
                return TickDecision::to(CharacterState::Crouching);
            }
            if input.sprint_held && ctx.can_sprint && input.move_axis.length() > 0.1 {
                return TickDecision::to(CharacterState::Sprinting);
            }
            TickDecision::none()
        }

        CharacterState::Crouching => {
            if !input.crouch_held {
                return TickDecision::to(CharacterState::Standing);
            }
            TickDecision::none()
        }

        CharacterState::Sprinting => {
            if input.jump && ctx.grounded {
                return TickDecision::to(CharacterState::SprintJumping {
                    elapsed: 0.0,
                    momentum: Vec3::ZERO,
                    jump_fed: false,
                    was_airborne: false,
                });
            }
            if !input.sprint_held || !ctx.can_sprint {
                return TickDecision::to(CharacterState::Standing);
            }
            TickDecision::none()
        }

        CharacterState::Jumping { was_airborne, .. } => {
            // arm the landing check only once the character has left the
            // ground, otherwise we'd land on the takeoff frame
            if !ctx.grounded {
                *was_airborne = true;
            } else if *was_airborne {
                return TickDecision::to(CharacterState::Landing { elapsed: 0.0 });
            }
            TickDecision::none()
        }

        CharacterState::SprintJumping {
            elapsed,
            was_airborne,
            ..
        } => {
            if !ctx.grounded {
                *was_airborne = true;
            } else if *was_airborne {
                return TickDecision::to(CharacterState::Landing { elapsed: 0.0 });
            }

            *elapsed += dt;
            if *elapsed >= ctx.sprint_jump_secs {
                return TickDecision::to(CharacterState::Sprinting);
            }
            TickDecision::none()
        }

        CharacterState::Landing { elapsed } => {
            *elapsed += dt;
            if *elapsed >= ctx.landing_secs {
                return TickDecision::to(CharacterState::Standing);
            }
            TickDecision::none()
        }

        CharacterState::Combat => {
            let mut decision = TickDecision::none();

            if input.draw_weapon {
                return TickDecision::to(CharacterState::Standing);
            }

            if input.super_activate && ctx.super_ready {
                decision.activate_super = true;
            }

            if input.block && ctx.can_block {
                decision.raise_shield = true;
            }

            if input.attack {
                // an up shield wins over the attack request: drop the edge
                if ctx.blocking {
                    return decision;
                }
                if ctx.super_active {
                    decision.next = Some(CharacterState::SuperAttacking {
                        elapsed: 0.0,
                        duration: ctx.super_duration,
                        payload_done: false,
                    });
                } else {
                    decision.next = Some(fresh_attack(ctx.attack_duration, 0));
                }
            }

            decision
        }

        CharacterState::Attacking {
            elapsed,
            duration,
            follow_up,
            count,
        } => {
            if input.attack {
                *follow_up = true;
            }

            *elapsed += dt;
            if *elapsed >= *duration {
                if *follow_up {
                    return TickDecision::to(fresh_attack(ctx.attack_duration, *count + 1));
                }
                return TickDecision::to(CharacterState::Combat);
            }
            TickDecision::none()
        }

        CharacterState::SuperAttacking {
            elapsed, duration, ..
        } => {
            // non-interruptible: every input edge is ignored for the whole clip
            *elapsed += dt;
            if *elapsed >= *duration {
                let mut decision = TickDecision::to(CharacterState::Combat);
                decision.super_finished = true;
                return decision;
            }
            TickDecision::none()
        }
    }
}

// ── ECS glue ────────────────────────────────────────────────────────

fn is_grounded(controller: &TnuaController) -> bool {
    controller
        .concrete_basis::<TnuaBuiltinWalk>()
        .map(|(_, state)| state.standing_on_entity().is_some())
        .unwrap_or(false)
}

/// One logic tick of the behavior state machine: build the context, run the
/// decision, then apply the transition with its enter/exit side effects.
fn logic_update(
    time: Res<Time>,
    cfg: Res<Config>,
    mut input: ResMut<LatchedInput>,
    mut query: Query<
        (
            &Player,
            &mut CharacterState,
            &mut ComboTracker,
            &mut SuperGauge,
            &mut ShieldState,
            &Stamina,
            &TnuaController,
        ),
        With<PlayerCtx>,
    >,
    mut commands: Commands,
) {
    let Ok((player, mut state, mut combo, mut gauge, mut shield, stamina, controller)) =
        query.single_mut()
    else {
        return;
    };

    let ctx = LogicCtx {
        grounded: is_grounded(controller),
        can_sprint: stamina.can_sprint && stamina.current > 0.0,
        blocking: shield.is_blocking(),
        can_block: shield.can_block(),
        super_active: gauge.is_active(),
        super_ready: gauge.phase() == crate::combat::SuperPhase::Ready,
        attack_duration: player
            .clip_duration(Animation::SlashA)
            .unwrap_or(ATTACK_FALLBACK_SECS),
        super_duration: player
            .clip_duration(Animation::SuperSlam)
            .unwrap_or(SUPER_FALLBACK_SECS),
        landing_secs: cfg.timers.landing,
        sprint_jump_secs: cfg.timers.sprint_jump,
    };

    let decision = decide(&mut state, &input, &ctx, time.delta_secs());

    if decision.activate_super {
        let mut signals = Vec::new();
        gauge.try_activate(&mut signals);
        emit_super_signals(signals, &mut commands);
    }

    if decision.raise_shield {
        shield.try_block();
    }

    if decision.super_finished {
        let mut signals = Vec::new();
        gauge.finish_active(&mut signals);
        emit_super_signals(signals, &mut commands);
    }

    if let Some(next) = decision.next {
        apply_transition(next, &mut state, &mut combo, &mut gauge, &mut commands);
    }

    input.clear_edges();
}

/// Exit the old state, switch, run the new state's entry effects. Chaining
/// Attacking → Attacking goes through both, which is what re-arms the combo
/// window with the fresh clip duration.
fn apply_transition(
    next: CharacterState,
    state: &mut CharacterState,
    combo: &mut ComboTracker,
    gauge: &mut SuperGauge,
    commands: &mut Commands,
) {
    // exit effects
    match &*state {
        CharacterState::Attacking { .. } => {
            // always close the follow-up window, whichever branch exits
            let mut signals = Vec::new();
            combo.close_window(&mut signals);
            emit_combo_signals(signals, commands);
        }
        _ => {}
    }

    debug!("state {:?} -> {:?}", state, next);
    *state = next;

    // enter effects
    match &*state {
        CharacterState::Attacking { duration, .. } => {
            combo.open_window(*duration);
        }
        CharacterState::SuperAttacking { .. } => {
            // committing to the finisher stops the activation countdown
            let mut signals = Vec::new();
            gauge.trigger_finishing_attack(&mut signals);
            emit_super_signals(signals, commands);
        }
        _ => {}
    }
}

// ── Movement integration ────────────────────────────────────────────

/// Feed the movement integrator a desired velocity for the active state.
/// Tnua configuration is tricky to grasp from the get go, this is the best demo:
/// <https://github.com/idanarye/bevy-tnua/blob/main/demos/src/character_control_systems/platformer_control_systems.rs>
fn movement(
    time: Res<Time>,
    cfg: Res<Config>,
    camera: Query<&Transform, With<SceneCamera>>,
    mut query: Query<(&mut CharacterState, &mut TnuaController), With<PlayerCtx>>,
    input: Res<LatchedInput>,
) -> Result {
    let Ok((mut state, mut controller)) = query.single_mut() else {
        return Ok(());
    };
    let cam_transform = camera.single()?;
    let direction = cam_transform.movement_direction(input.move_axis);
    let movement = &cfg.player.movement;

    let float_height = 0.15; // Lower to reduce hovering
    let mut walk = TnuaBuiltinWalk {
        float_height,
        cling_distance: float_height + 0.05,
        spring_strength: 500.0,
        spring_dampening: 1.0,
        acceleration: 80.0,
        air_acceleration: 50.0,
        free_fall_extra_gravity: 70.0,
        turning_angvel: 12.0,
        desired_velocity: Vec3::ZERO,
        desired_forward: Dir3::new(direction).ok(),
        ..Default::default()
    };

    match &mut *state {
        CharacterState::Standing | CharacterState::Combat => {
            walk.desired_velocity = direction * movement.speed;
        }
        CharacterState::Crouching => {
            walk.desired_velocity = direction * movement.speed * movement.crouch_factor;
            controller.action(TnuaBuiltinCrouch {
                float_offset: 0.0,
                height_change_impulse_for_duration: 0.1,
                height_change_impulse_limit: 80.0,
                uncancellable: false,
            });
        }
        CharacterState::Sprinting => {
            walk.desired_velocity = direction * movement.speed * movement.sprint_factor;
        }
        CharacterState::Jumping {
            momentum, jump_fed, ..
        } => {
            if !*jump_fed {
                // capture takeoff momentum before the jump impulse
                if let Some((_, basis_state)) = controller.concrete_basis::<TnuaBuiltinWalk>() {
                    let velocity = basis_state.running_velocity;
                    *momentum = Vec3::new(velocity.x, 0.0, velocity.z);
                }
                controller.action(TnuaBuiltinJump {
                    height: movement.jump_height,
                    takeoff_extra_gravity: 40.0,
                    fall_extra_gravity: 35.0,
                    shorten_extra_gravity: 80.0,
                    ..Default::default()
                });
                *jump_fed = true;
            }

            // blend preserved momentum with air-control-weighted input
            let air_target = direction * movement.speed * movement.air_control;
            let blend = (movement.air_control * time.delta_secs() * 10.0).min(1.0);
            *momentum = momentum.lerp(air_target, blend);
            walk.desired_velocity = *momentum;
        }
        CharacterState::SprintJumping {
            momentum, jump_fed, ..
        } => {
            if !*jump_fed {
                if let Some((_, basis_state)) = controller.concrete_basis::<TnuaBuiltinWalk>() {
                    let velocity = basis_state.running_velocity;
                    *momentum = Vec3::new(velocity.x, 0.0, velocity.z);
                }
                controller.action(TnuaBuiltinJump {
                    height: movement.jump_height,
                    takeoff_extra_gravity: 40.0,
                    fall_extra_gravity: 35.0,
                    shorten_extra_gravity: 80.0,
                    ..Default::default()
                });
                *jump_fed = true;
            }

            let air_target =
                direction * movement.speed * movement.sprint_factor * movement.air_control * 0.5;
            let blend = (movement.air_control * time.delta_secs() * 10.0).min(1.0);
            *momentum = momentum.lerp(air_target, blend);
            walk.desired_velocity = *momentum;
        }
        CharacterState::Landing { .. } | CharacterState::Attacking { .. } => {
            // rooted: swings and landings don't slide
        }
        CharacterState::SuperAttacking { .. } => {
            // movement fully suppressed, facing frozen
            walk.desired_forward = None;
        }
    }

    controller.basis(walk);
    Ok(())
}

// ── Stamina ─────────────────────────────────────────────────────────

/// Drain while sprinting, regenerate after the configured delay otherwise.
fn tick_stamina(
    time: Res<Time>,
    cfg: Res<Config>,
    mut query: Query<(&CharacterState, &mut Stamina)>,
) {
    let preset = &cfg.player.stamina;
    for (state, mut stamina) in query.iter_mut() {
        let sprinting = matches!(
            state,
            CharacterState::Sprinting | CharacterState::SprintJumping { .. }
        );

        if sprinting {
            stamina.drain(preset.drain_rate * time.delta_secs());
        } else {
            stamina.since_drain += time.delta_secs();
            if stamina.since_drain >= preset.regen_delay {
                stamina.regen(
                    preset.regen_rate * time.delta_secs(),
                    preset.sprint_min_fraction,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LogicCtx {
        LogicCtx {
            grounded: true,
            can_sprint: true,
            blocking: false,
            can_block: true,
            super_active: false,
            super_ready: false,
            attack_duration: 1.0,
            super_duration: 3.0,
            landing_secs: 0.25,
            sprint_jump_secs: 1.0,
        }
    }

    fn attack_edge() -> LatchedInput {
        LatchedInput {
            attack: true,
            ..Default::default()
        }
    }

    #[test]
    fn combat_attack_edge_enters_attacking() {
        let mut state = CharacterState::Combat;
        let decision = decide(&mut state, &attack_edge(), &ctx(), 0.016);

        assert_eq!(
            decision.next,
            Some(CharacterState::Attacking {
                elapsed: 0.0,
                duration: 1.0,
                follow_up: false,
                count: 0,
            })
        );
    }

    #[test]
    fn shield_up_drops_the_attack_edge() {
        let mut state = CharacterState::Combat;
        let mut c = ctx();
        c.blocking = true;

        let decision = decide(&mut state, &attack_edge(), &c, 0.016);
        assert_eq!(decision.next, None);
    }

    #[test]
    fn active_super_routes_attack_to_finisher() {
        let mut state = CharacterState::Combat;
        let mut c = ctx();
        c.super_active = true;

        let decision = decide(&mut state, &attack_edge(), &c, 0.016);
        assert_eq!(
            decision.next,
            Some(CharacterState::SuperAttacking {
                elapsed: 0.0,
                duration: 3.0,
                payload_done: false,
            })
        );
    }

    #[test]
    fn buffered_follow_up_chains_the_attack() {
        let mut state = CharacterState::Attacking {
            elapsed: 0.0,
            duration: 0.5,
            follow_up: false,
            count: 0,
        };

        // press attack mid-swing: buffered, no transition yet
        let decision = decide(&mut state, &attack_edge(), &ctx(), 0.1);
        assert_eq!(decision.next, None);

        // clip runs out → chain into the next swing
        let decision = decide(&mut state, &LatchedInput::default(), &ctx(), 0.5);
        assert_eq!(
            decision.next,
            Some(CharacterState::Attacking {
                elapsed: 0.0,
                duration: 1.0,
                follow_up: false,
                count: 1,
            })
        );
    }

    #[test]
    fn unbuffered_attack_returns_to_combat() {
        let mut state = CharacterState::Attacking {
            elapsed: 0.0,
            duration: 0.5,
            follow_up: false,
            count: 2,
        };

        let decision = decide(&mut state, &LatchedInput::default(), &ctx(), 0.6);
        assert_eq!(decision.next, Some(CharacterState::Combat));
    }

    #[test]
    fn finisher_ignores_input_and_reports_completion() {
        let mut state = CharacterState::SuperAttacking {
            elapsed: 0.0,
            duration: 1.0,
            payload_done: true,
        };

        // spamming attack during the finisher changes nothing
        let decision = decide(&mut state, &attack_edge(), &ctx(), 0.5);
        assert_eq!(decision.next, None);
        assert!(!decision.super_finished);

        let decision = decide(&mut state, &attack_edge(), &ctx(), 0.6);
        assert_eq!(decision.next, Some(CharacterState::Combat));
        assert!(decision.super_finished);
    }

    #[test]
    fn super_activate_edge_requests_activation_only_when_ready() {
        let mut state = CharacterState::Combat;
        let input = LatchedInput {
            super_activate: true,
            ..Default::default()
        };

        let decision = decide(&mut state, &input, &ctx(), 0.016);
        assert!(!decision.activate_super);

        let mut c = ctx();
        c.super_ready = true;
        let decision = decide(&mut state, &input, &c, 0.016);
        assert!(decision.activate_super);
        assert_eq!(decision.next, None);
    }

    #[test]
    fn draw_weapon_toggles_between_standing_and_combat() {
        let input = LatchedInput {
            draw_weapon: true,
            ..Default::default()
        };

        let mut state = CharacterState::Standing;
        let decision = decide(&mut state, &input, &ctx(), 0.016);
        assert_eq!(decision.next, Some(CharacterState::Combat));

        let mut state = CharacterState::Combat;
        let decision = decide(&mut state, &input, &ctx(), 0.016);
        assert_eq!(decision.next, Some(CharacterState::Standing));
    }

    #[test]
    fn jump_lands_then_stands() {
        let mut c = ctx();
        c.grounded = false;
        let mut state = CharacterState::Jumping {
            momentum: Vec3::ZERO,
            jump_fed: true,
            was_airborne: false,
        };

        // leaves the ground first...
        let decision = decide(&mut state, &LatchedInput::default(), &c, 0.016);
        assert_eq!(decision.next, None);

        c.grounded = true;
        let decision = decide(&mut state, &LatchedInput::default(), &c, 0.016);
        assert_eq!(decision.next, Some(CharacterState::Landing { elapsed: 0.0 }));

        let mut state = CharacterState::Landing { elapsed: 0.0 };
        let decision = decide(&mut state, &LatchedInput::default(), &c, 0.3);
        assert_eq!(decision.next, Some(CharacterState::Standing));
    }

    #[test]
    fn sprint_needs_stamina() {
        let input = LatchedInput {
            sprint_held: true,
            move_axis: Vec2::new(0.0, 1.0),
            ..Default::default()
        };

        let mut c = ctx();
        c.can_sprint = false;
        let mut state = CharacterState::Standing;
        let decision = decide(&mut state, &input, &c, 0.016);
        assert_eq!(decision.next, None);

        // an exhausted sprinter drops back to standing
        let mut state = CharacterState::Sprinting;
        let decision = decide(&mut state, &input, &c, 0.016);
        assert_eq!(decision.next, Some(CharacterState::Standing));
    }
}
