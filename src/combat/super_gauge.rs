use super::*;
use crate::models::{Countdown, CountdownTick};
use avian3d::prelude::LinearVelocity;

pub fn plugin(app: &mut App) {
    app.register_type::<SuperGauge>()
        .add_observer(on_super_activated)
        .add_observer(on_super_ended)
        .add_systems(
            Update,
            tick_super
                .in_set(AppSystems::TickTimers)
                .run_if(in_state(Screen::Gameplay)),
        );
}

#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuperPhase {
    /// Charging from landed hits.
    #[default]
    Idle,
    /// Full charge banked, waiting for the player to activate.
    Ready,
    /// Activated: invulnerable, on the activation countdown until the
    /// finisher is committed.
    Active,
}

/// What changed inside the gauge during one call; converted into observer
/// events by the ECS layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuperSignal {
    ChargeChanged { current: f32, max: f32 },
    Ready,
    Activated,
    TimerChanged { remaining: f32, max: f32 },
    Ended,
}

/// The super meter: charges from hits while Idle, arms at full charge, and
/// once activated runs a use-it-or-lose-it countdown.
///
/// The countdown is ticked with real time — the activation window must not
/// stretch while the super's own slow-motion is running.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct SuperGauge {
    charge: f32,
    max_charge: f32,
    phase: SuperPhase,
    countdown: Countdown,
    activation_window: f32,
    /// Set once the finisher is committed; stops the countdown without
    /// ending the active phase.
    attack_triggered: bool,
}

impl Default for SuperGauge {
    fn default() -> Self {
        Self::new(100.0, 5.0)
    }
}

impl SuperGauge {
    pub fn new(max_charge: f32, activation_window: f32) -> Self {
        Self {
            charge: 0.0,
            max_charge,
            phase: SuperPhase::Idle,
            countdown: Countdown::default(),
            activation_window,
            attack_triggered: false,
        }
    }

    pub fn phase(&self) -> SuperPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SuperPhase::Active
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn attack_triggered(&self) -> bool {
        self.attack_triggered
    }

    /// Bank charge from a landed hit. Disabled entirely while Active; the
    /// Idle→Ready crossing fires [`SuperSignal::Ready`] exactly once.
    pub fn add_charge(&mut self, amount: f32, signals: &mut Vec<SuperSignal>) {
        if self.phase == SuperPhase::Active {
            return;
        }

        self.charge = (self.charge + amount).min(self.max_charge);
        signals.push(SuperSignal::ChargeChanged {
            current: self.charge,
            max: self.max_charge,
        });

        if self.charge >= self.max_charge && self.phase == SuperPhase::Idle {
            self.phase = SuperPhase::Ready;
            signals.push(SuperSignal::Ready);
        }
    }

    /// Activate iff Ready. Starts the activation countdown; the caller
    /// reacts to [`SuperSignal::Activated`] by granting invulnerability and
    /// pushing hostiles back.
    pub fn try_activate(&mut self, signals: &mut Vec<SuperSignal>) -> bool {
        if self.phase != SuperPhase::Ready {
            return false;
        }

        self.phase = SuperPhase::Active;
        self.attack_triggered = false;
        self.countdown.start(self.activation_window);
        signals.push(SuperSignal::Activated);
        signals.push(SuperSignal::TimerChanged {
            remaining: self.activation_window,
            max: self.activation_window,
        });
        true
    }

    /// Commit to the finishing attack. Settable once per active window —
    /// repeat calls are no-ops. Cancels the countdown: once committed the
    /// player is no longer on a timer.
    pub fn trigger_finishing_attack(&mut self, signals: &mut Vec<SuperSignal>) -> bool {
        if self.phase != SuperPhase::Active || self.attack_triggered {
            return false;
        }

        self.attack_triggered = true;
        self.countdown.cancel();
        signals.push(SuperSignal::TimerChanged {
            remaining: 0.0,
            max: self.activation_window,
        });
        true
    }

    /// The finisher's animation completed — leave Active through the
    /// completed path.
    pub fn finish_active(&mut self, signals: &mut Vec<SuperSignal>) {
        if self.phase == SuperPhase::Active {
            self.end_active(signals);
        }
    }

    /// Advance the activation countdown (real-time deltas). Timing out with
    /// no committed finisher auto-cancels the whole super.
    pub fn tick(&mut self, delta: f32, signals: &mut Vec<SuperSignal>) {
        if self.phase != SuperPhase::Active || self.attack_triggered {
            return;
        }

        match self.countdown.tick(delta) {
            CountdownTick::Idle => {}
            CountdownTick::Running { remaining, .. } => {
                signals.push(SuperSignal::TimerChanged {
                    remaining,
                    max: self.activation_window,
                });
            }
            CountdownTick::Finished => {
                debug!("Super activation window expired, cancelling");
                self.end_active(signals);
            }
        }
    }

    /// Respawn entry point: back to Idle with an empty meter, no end-of-super
    /// notification.
    pub fn reset(&mut self, signals: &mut Vec<SuperSignal>) {
        self.phase = SuperPhase::Idle;
        self.charge = 0.0;
        self.attack_triggered = false;
        self.countdown.cancel();
        signals.push(SuperSignal::ChargeChanged {
            current: 0.0,
            max: self.max_charge,
        });
        signals.push(SuperSignal::TimerChanged {
            remaining: 0.0,
            max: self.activation_window,
        });
    }

    /// Both exits from Active come through here, so invulnerability is
    /// revoked and the meter zeroed exactly once.
    fn end_active(&mut self, signals: &mut Vec<SuperSignal>) {
        self.phase = SuperPhase::Idle;
        self.attack_triggered = false;
        self.charge = 0.0;
        self.countdown.cancel();
        signals.push(SuperSignal::ChargeChanged {
            current: 0.0,
            max: self.max_charge,
        });
        signals.push(SuperSignal::TimerChanged {
            remaining: 0.0,
            max: self.activation_window,
        });
        signals.push(SuperSignal::Ended);
    }
}

/// Convert gauge signals into observer events for the HUD and the
/// invulnerability observers.
pub fn emit_super_signals(signals: Vec<SuperSignal>, commands: &mut Commands) {
    for signal in signals {
        match signal {
            SuperSignal::ChargeChanged { current, max } => {
                commands.trigger(SuperChargeChanged { current, max });
            }
            SuperSignal::Ready => commands.trigger(SuperReady),
            SuperSignal::Activated => commands.trigger(SuperActivated),
            SuperSignal::TimerChanged { remaining, max } => {
                commands.trigger(SuperTimerChanged { remaining, max });
            }
            SuperSignal::Ended => commands.trigger(SuperEnded),
        }
    }
}

/// Tick the activation countdown with unscaled time.
fn tick_super(
    real_time: Res<Time<Real>>,
    mut query: Query<&mut SuperGauge>,
    mut commands: Commands,
) {
    for mut gauge in query.iter_mut() {
        let mut signals = Vec::new();
        gauge.tick(real_time.delta_secs(), &mut signals);
        emit_super_signals(signals, &mut commands);
    }
}

/// Observer: entering the active window grants invulnerability and shoves
/// nearby hostiles away from the player.
fn on_super_activated(
    _on: On<SuperActivated>,
    cfg: Res<Config>,
    player: Query<(Entity, &Transform), With<PlayerCombatant>>,
    mut enemies: Query<(&Transform, &mut LinearVelocity), With<Enemy>>,
    mut commands: Commands,
) {
    let Ok((entity, player_tf)) = player.single() else {
        return;
    };

    commands.entity(entity).try_insert(Invulnerable);
    push_back_in_range(
        player_tf.translation,
        cfg.super_ability.radius_range,
        cfg.super_ability.initial_pushback,
        &mut enemies,
    );
    info!("Super activated");
}

/// Observer: leaving the active window revokes invulnerability.
fn on_super_ended(
    _on: On<SuperEnded>,
    player: Query<Entity, With<PlayerCombatant>>,
    mut commands: Commands,
) {
    let Ok(entity) = player.single() else {
        return;
    };
    commands.entity(entity).try_remove::<Invulnerable>();
    info!("Super ended");
}

/// Shove every enemy inside `range` directly away from `origin`, with a
/// slight upward lift so they unstick from the ground.
pub fn push_back_in_range(
    origin: Vec3,
    range: f32,
    force: f32,
    enemies: &mut Query<(&Transform, &mut LinearVelocity), With<Enemy>>,
) {
    for (enemy_tf, mut velocity) in enemies.iter_mut() {
        let offset = enemy_tf.translation - origin;
        if offset.length() > range {
            continue;
        }
        let mut direction = offset.normalize_or_zero();
        direction.y = 0.3;
        velocity.0 += direction.normalize_or_zero() * force;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> SuperGauge {
        SuperGauge::new(100.0, 5.0)
    }

    #[test]
    fn charge_clamps_and_ready_fires_once() {
        let mut gauge = gauge();
        let mut signals = Vec::new();

        for _ in 0..12 {
            gauge.add_charge(10.0, &mut signals);
        }

        assert_eq!(gauge.charge(), 100.0);
        let ready_count = signals
            .iter()
            .filter(|s| matches!(s, SuperSignal::Ready))
            .count();
        assert_eq!(ready_count, 1);
        assert_eq!(gauge.phase(), SuperPhase::Ready);
    }

    #[test]
    fn activate_only_from_ready() {
        let mut gauge = gauge();
        let mut signals = Vec::new();

        assert!(!gauge.try_activate(&mut signals));

        gauge.add_charge(100.0, &mut signals);
        assert!(gauge.try_activate(&mut signals));
        // second immediate attempt fails: already Active
        assert!(!gauge.try_activate(&mut signals));
    }

    #[test]
    fn no_charging_while_active() {
        let mut gauge = gauge();
        let mut signals = Vec::new();
        gauge.add_charge(100.0, &mut signals);
        gauge.try_activate(&mut signals);

        signals.clear();
        gauge.add_charge(50.0, &mut signals);
        assert!(signals.is_empty());
        assert_eq!(gauge.charge(), 100.0);
    }

    #[test]
    fn countdown_timeout_cancels_exactly_once() {
        let mut gauge = gauge();
        let mut signals = Vec::new();
        gauge.add_charge(100.0, &mut signals);
        gauge.try_activate(&mut signals);

        signals.clear();
        gauge.tick(6.0, &mut signals);

        let ended: Vec<_> = signals
            .iter()
            .filter(|s| matches!(s, SuperSignal::Ended))
            .collect();
        assert_eq!(ended.len(), 1);
        assert_eq!(gauge.phase(), SuperPhase::Idle);
        assert_eq!(gauge.charge(), 0.0);

        // no further end notifications after the cancel
        signals.clear();
        gauge.tick(1.0, &mut signals);
        assert!(signals.is_empty());
    }

    #[test]
    fn finisher_stops_the_countdown_without_ending_active() {
        let mut gauge = gauge();
        let mut signals = Vec::new();
        gauge.add_charge(100.0, &mut signals);
        gauge.try_activate(&mut signals);

        assert!(gauge.trigger_finishing_attack(&mut signals));
        // idempotent: a second trigger is a no-op
        assert!(!gauge.trigger_finishing_attack(&mut signals));
        assert!(gauge.is_active());

        // the countdown no longer runs out from under the finisher
        signals.clear();
        gauge.tick(100.0, &mut signals);
        assert!(signals.is_empty());
        assert!(gauge.is_active());

        gauge.finish_active(&mut signals);
        assert_eq!(gauge.phase(), SuperPhase::Idle);
        assert!(signals.contains(&SuperSignal::Ended));
    }

    #[test]
    fn full_cycle_allows_recharging() {
        let mut gauge = gauge();
        let mut signals = Vec::new();
        gauge.add_charge(100.0, &mut signals);
        gauge.try_activate(&mut signals);
        gauge.trigger_finishing_attack(&mut signals);
        gauge.finish_active(&mut signals);

        signals.clear();
        gauge.add_charge(100.0, &mut signals);
        assert_eq!(gauge.phase(), SuperPhase::Ready);
        assert!(signals.contains(&SuperSignal::Ready));
    }

    #[test]
    fn reset_returns_to_idle_without_end_notification() {
        let mut gauge = gauge();
        let mut signals = Vec::new();
        gauge.add_charge(100.0, &mut signals);
        gauge.try_activate(&mut signals);

        signals.clear();
        gauge.reset(&mut signals);
        assert_eq!(gauge.phase(), SuperPhase::Idle);
        assert_eq!(gauge.charge(), 0.0);
        assert!(!signals.contains(&SuperSignal::Ended));
    }
}
