use super::*;
use crate::models::{Countdown, CountdownTick};

pub fn plugin(app: &mut App) {
    app.register_type::<ComboTracker>().add_systems(
        Update,
        tick_combo
            .in_set(AppSystems::TickTimers)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// What changed inside the tracker during one call. The ECS layer converts
/// these into observer events; keeping them plain data keeps the tracker
/// testable without an `App`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComboSignal {
    Changed { count: u32, multiplier: f32 },
    WindowProgress(f32),
}

/// Consecutive-hit counter with a rolling follow-up window.
///
/// The window is not a fixed length: every landed hit re-arms it with the
/// remaining duration of the attack animation that scored the hit, so the
/// player has exactly until the current swing finishes to chain. Letting the
/// window lapse resets the count; so does taking damage.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ComboTracker {
    count: u32,
    /// Damage multiplier per count, index 0 = 1.0x; counts clamp to the end.
    multipliers: Vec<f32>,
    window: Countdown,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ComboTracker {
    pub fn new(multipliers: Vec<f32>) -> Self {
        let multipliers = if multipliers.is_empty() {
            vec![1.0]
        } else {
            multipliers
        };
        Self {
            count: 0,
            multipliers,
            window: Countdown::default(),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn damage_multiplier(&self) -> f32 {
        let level = (self.count as usize).min(self.multipliers.len() - 1);
        self.multipliers[level]
    }

    /// A hit landed: bump the count and re-arm the window with however long
    /// the current attack clip still has to play.
    pub fn register_hit(&mut self, window_secs: f32, signals: &mut Vec<ComboSignal>) {
        self.count += 1;
        self.window.start(window_secs);
        signals.push(ComboSignal::Changed {
            count: self.count,
            multiplier: self.damage_multiplier(),
        });
    }

    /// Called when an attack state begins; the count is kept, only the
    /// window is (re)armed.
    pub fn open_window(&mut self, window_secs: f32) {
        self.window.start(window_secs);
    }

    /// Called when an attack state ends, whichever branch it took. Cancels
    /// the countdown without touching the count and hides the window UI.
    pub fn close_window(&mut self, signals: &mut Vec<ComboSignal>) {
        self.window.cancel();
        signals.push(ComboSignal::WindowProgress(0.0));
    }

    /// External override (the character took damage): reset unconditionally,
    /// mid-countdown or not.
    pub fn force_reset(&mut self, signals: &mut Vec<ComboSignal>) {
        self.window.cancel();
        if self.count > 0 {
            self.count = 0;
            signals.push(ComboSignal::Changed {
                count: 0,
                multiplier: self.damage_multiplier(),
            });
        }
        signals.push(ComboSignal::WindowProgress(0.0));
    }

    /// Advance the window. Runs after hit registration within a tick, so a
    /// hit that lands on the same tick the window would lapse wins and
    /// re-arms it.
    pub fn tick(&mut self, delta: f32, signals: &mut Vec<ComboSignal>) {
        match self.window.tick(delta) {
            CountdownTick::Idle => {}
            CountdownTick::Running { progress, .. } => {
                signals.push(ComboSignal::WindowProgress(progress));
            }
            CountdownTick::Finished => {
                if self.count > 0 {
                    self.count = 0;
                    signals.push(ComboSignal::Changed {
                        count: 0,
                        multiplier: self.damage_multiplier(),
                    });
                }
                signals.push(ComboSignal::WindowProgress(0.0));
            }
        }
    }
}

/// Convert tracker signals into observer events for the HUD.
pub fn emit_combo_signals(signals: Vec<ComboSignal>, commands: &mut Commands) {
    for signal in signals {
        match signal {
            ComboSignal::Changed { count, multiplier } => {
                commands.trigger(ComboChanged { count, multiplier });
            }
            ComboSignal::WindowProgress(progress) => {
                commands.trigger(ComboWindowProgress { progress });
            }
        }
    }
}

/// Tick the follow-up window with scaled time, so the window stays in step
/// with animation playback during slow-motion.
fn tick_combo(
    time: Res<Time>,
    mut query: Query<&mut ComboTracker>,
    mut commands: Commands,
) {
    for mut combo in query.iter_mut() {
        let mut signals = Vec::new();
        combo.tick(time.delta_secs(), &mut signals);
        emit_combo_signals(signals, &mut commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ComboTracker {
        ComboTracker::new(vec![1.0, 1.2, 1.5])
    }

    #[test]
    fn multiplier_clamps_and_never_decreases() {
        let mut combo = tracker();
        let mut signals = Vec::new();

        let mut last = 0.0;
        for _ in 0..6 {
            combo.register_hit(1.0, &mut signals);
            let m = combo.damage_multiplier();
            assert!(m >= last);
            last = m;
        }
        // counts past the table end clamp to the last entry
        assert_eq!(combo.damage_multiplier(), 1.5);
    }

    #[test]
    fn hit_increments_by_exactly_one_and_rearms() {
        let mut combo = tracker();
        let mut signals = Vec::new();

        combo.register_hit(0.5, &mut signals);
        assert_eq!(combo.count(), 1);
        assert_eq!(
            signals,
            vec![ComboSignal::Changed {
                count: 1,
                multiplier: 1.2
            }]
        );

        // window nearly over, second hit re-arms it
        combo.tick(0.4, &mut Vec::new());
        combo.register_hit(0.5, &mut signals);
        combo.tick(0.4, &mut signals);
        assert_eq!(combo.count(), 2);
    }

    #[test]
    fn expiry_resets_count_exactly_once() {
        let mut combo = tracker();
        let mut signals = Vec::new();
        combo.register_hit(0.3, &mut signals);

        signals.clear();
        combo.tick(0.5, &mut signals);
        assert_eq!(
            signals,
            vec![
                ComboSignal::Changed {
                    count: 0,
                    multiplier: 1.0
                },
                ComboSignal::WindowProgress(0.0),
            ]
        );

        // a second lapse with count already zero stays silent
        signals.clear();
        combo.tick(0.5, &mut signals);
        assert!(signals.is_empty());
    }

    #[test]
    fn expiry_at_zero_count_only_hides_window() {
        let mut combo = tracker();
        let mut signals = Vec::new();

        combo.open_window(0.2);
        combo.tick(0.3, &mut signals);
        assert_eq!(signals, vec![ComboSignal::WindowProgress(0.0)]);
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn damage_taken_resets_mid_countdown() {
        let mut combo = tracker();
        let mut signals = Vec::new();
        combo.register_hit(10.0, &mut signals);
        combo.register_hit(10.0, &mut signals);

        signals.clear();
        combo.force_reset(&mut signals);
        assert_eq!(combo.count(), 0);
        assert_eq!(
            signals,
            vec![
                ComboSignal::Changed {
                    count: 0,
                    multiplier: 1.0
                },
                ComboSignal::WindowProgress(0.0),
            ]
        );
    }

    #[test]
    fn same_tick_hit_beats_expiry() {
        let mut combo = tracker();
        let mut signals = Vec::new();
        combo.register_hit(0.3, &mut signals);

        // hits are processed before the window ticks within a frame; the
        // re-arm means this tick must not reset
        combo.register_hit(0.5, &mut signals);
        signals.clear();
        combo.tick(0.3, &mut signals);
        assert_eq!(combo.count(), 2);
        assert!(matches!(signals[0], ComboSignal::WindowProgress(_)));
    }

    #[test]
    fn close_window_keeps_count() {
        let mut combo = tracker();
        let mut signals = Vec::new();
        combo.register_hit(0.5, &mut signals);

        signals.clear();
        combo.close_window(&mut signals);
        assert_eq!(combo.count(), 1);
        assert_eq!(signals, vec![ComboSignal::WindowProgress(0.0)]);

        // no lapse fires after the cancel
        signals.clear();
        combo.tick(1.0, &mut signals);
        assert!(signals.is_empty());
    }
}
