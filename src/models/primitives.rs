use super::*;

/// Macro to hide the derive trait boilerplate
macro_rules! markers {
  ( $( $name:ident ),* ) => {
        $(
            #[derive(Component, Reflect, Clone, Default)]
            #[reflect(Component)]
            pub struct $name;
        )*
    };
}

markers!(
    SceneCamera,
    // scene
    Sun,
    // user input contexts
    PlayerCtx,
    // UI: nodes or labels that have to change visibility or content at some point
    GameplayUi,
    TitleUi
);

// ── Countdown ───────────────────────────────────────────────────────

/// What a [`Countdown::tick`] call observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownTick {
    /// Not running; nothing happened.
    Idle,
    /// Still counting down.
    Running { remaining: f32, progress: f32 },
    /// Reached zero on this tick. Reported exactly once per start.
    Finished,
}

/// Reusable one-shot countdown, advanced by caller-supplied deltas.
///
/// Restarting while running discards the previous countdown, `cancel` is
/// idempotent, and completion is reported exactly once. The timebase is
/// whatever the caller feeds in — systems that must keep running while the
/// simulation is slowed tick it with `Time<Real>` deltas.
#[derive(Reflect, Debug, Clone, Default)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl Countdown {
    /// Begin counting down from `duration` seconds. A non-positive duration
    /// finishes on the next tick.
    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.remaining = self.duration;
        self.running = true;
    }

    /// Stop without finishing. Safe to call when not running.
    pub fn cancel(&mut self) {
        self.running = false;
        self.remaining = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Fraction of the countdown still left, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if !self.running || self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }

    pub fn tick(&mut self, delta: f32) -> CountdownTick {
        if !self.running {
            return CountdownTick::Idle;
        }

        self.remaining -= delta.max(0.0);
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return CountdownTick::Finished;
        }

        CountdownTick::Running {
            remaining: self.remaining,
            progress: self.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishes_exactly_once() {
        let mut countdown = Countdown::default();
        countdown.start(0.3);

        assert_eq!(
            countdown.tick(0.1),
            CountdownTick::Running {
                remaining: 0.2,
                progress: 0.2 / 0.3
            }
        );
        assert_eq!(countdown.tick(0.25), CountdownTick::Finished);
        assert_eq!(countdown.tick(0.1), CountdownTick::Idle);
    }

    #[test]
    fn zero_duration_finishes_on_next_tick() {
        let mut countdown = Countdown::default();
        countdown.start(0.0);
        assert!(countdown.is_running());
        assert_eq!(countdown.tick(0.016), CountdownTick::Finished);
    }

    #[test]
    fn restart_discards_previous() {
        let mut countdown = Countdown::default();
        countdown.start(1.0);
        countdown.tick(0.9);
        countdown.start(2.0);

        assert_eq!(
            countdown.tick(0.5),
            CountdownTick::Running {
                remaining: 1.5,
                progress: 0.75
            }
        );
    }

    #[test]
    fn cancel_is_idempotent_and_leaves_no_residue() {
        let mut countdown = Countdown::default();
        countdown.start(1.0);
        countdown.cancel();
        countdown.cancel();

        assert!(!countdown.is_running());
        assert_eq!(countdown.progress(), 0.0);
        assert_eq!(countdown.tick(10.0), CountdownTick::Idle);
    }
}
