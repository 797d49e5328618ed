use super::*;
use crate::models::{Countdown, CountdownTick};

pub fn plugin(app: &mut App) {
    app.insert_resource(SlowMotion::default())
        .add_systems(Update, tick_slow_motion.in_set(AppSystems::TickTimers));
}

/// Process-wide slow-motion pulse: a transient override of the virtual time
/// scale, measured in *real* seconds so it can never feed back into itself.
///
/// Requests don't queue — a new pulse replaces the countdown of an in-flight
/// one. The scale to restore is captured when the first pulse of a chain
/// begins; a preempting pulse inherits it, since the preempted pulse never
/// got to restore anything.
#[derive(Resource, Default)]
pub struct SlowMotion {
    countdown: Countdown,
    restore_scale: Option<f32>,
}

impl SlowMotion {
    pub fn pulse(&mut self, duration: f32, scale: f32, time: &mut Time<Virtual>) {
        if self.restore_scale.is_none() {
            self.restore_scale = Some(time.relative_speed());
        }
        self.countdown.start(duration);
        time.set_relative_speed(scale);
    }

    pub fn is_active(&self) -> bool {
        self.restore_scale.is_some()
    }

    pub fn tick(&mut self, delta: f32, time: &mut Time<Virtual>) {
        if self.countdown.tick(delta) == CountdownTick::Finished {
            if let Some(restore) = self.restore_scale.take() {
                time.set_relative_speed(restore);
            }
        }
    }
}

fn tick_slow_motion(
    real_time: Res<Time<Real>>,
    mut slow_motion: ResMut<SlowMotion>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    slow_motion.tick(real_time.delta_secs(), &mut virtual_time);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_slows_then_restores() {
        let mut time = Time::<Virtual>::default();
        let mut slow = SlowMotion::default();

        slow.pulse(0.1, 0.1, &mut time);
        assert_eq!(time.relative_speed(), 0.1);
        assert!(slow.is_active());

        slow.tick(0.05, &mut time);
        assert_eq!(time.relative_speed(), 0.1);

        slow.tick(0.06, &mut time);
        assert_eq!(time.relative_speed(), 1.0);
        assert!(!slow.is_active());
    }

    #[test]
    fn new_pulse_preempts_and_keeps_original_restore_target() {
        let mut time = Time::<Virtual>::default();
        time.set_relative_speed(0.8); // some pre-existing override
        let mut slow = SlowMotion::default();

        slow.pulse(0.1, 0.1, &mut time);
        slow.tick(0.05, &mut time);
        // second pulse replaces the first mid-flight
        slow.pulse(0.2, 0.05, &mut time);
        assert_eq!(time.relative_speed(), 0.05);

        // the first pulse's deadline passes without restoring anything
        slow.tick(0.06, &mut time);
        assert_eq!(time.relative_speed(), 0.05);

        // the chain restores to the pre-chain scale, not to 1.0
        slow.tick(0.2, &mut time);
        assert_eq!(time.relative_speed(), 0.8);
    }
}
