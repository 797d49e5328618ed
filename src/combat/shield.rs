use super::*;
use crate::models::{Countdown, CountdownTick};

pub fn plugin(app: &mut App) {
    app.register_type::<ShieldState>().add_systems(
        Update,
        tick_shields
            .in_set(AppSystems::TickTimers)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Raised-shield block. A block holds for a fixed duration, then the shield
/// goes on cooldown; while raised it is the hard damage gate the resolution
/// pipeline checks first. Blocking is a sub-behavior of the combat stance,
/// not a state of its own.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ShieldState {
    block: Countdown,
    cooldown: Countdown,
    block_duration: f32,
    cooldown_duration: f32,
}

impl Default for ShieldState {
    fn default() -> Self {
        Self::new(2.0, 3.0)
    }
}

impl ShieldState {
    pub fn new(block_duration: f32, cooldown_duration: f32) -> Self {
        Self {
            block: Countdown::default(),
            cooldown: Countdown::default(),
            block_duration,
            cooldown_duration,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.block.is_running()
    }

    pub fn can_block(&self) -> bool {
        !self.is_blocking() && !self.cooldown.is_running()
    }

    /// Raise the shield if allowed. Returns whether the block started.
    pub fn try_block(&mut self) -> bool {
        if !self.can_block() {
            return false;
        }
        self.block.start(self.block_duration);
        true
    }

    /// Drop the shield early and start the cooldown.
    pub fn lower(&mut self) {
        if self.is_blocking() {
            self.block.cancel();
            self.cooldown.start(self.cooldown_duration);
        }
    }

    pub fn tick(&mut self, delta: f32) {
        if self.block.tick(delta) == CountdownTick::Finished {
            self.cooldown.start(self.cooldown_duration);
        }
        self.cooldown.tick(delta);
    }
}

fn tick_shields(time: Res<Time>, mut shields: Query<&mut ShieldState>) {
    for mut shield in shields.iter_mut() {
        shield.tick(time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_runs_then_cools_down() {
        let mut shield = ShieldState::new(2.0, 3.0);
        assert!(shield.can_block());
        assert!(shield.try_block());
        assert!(shield.is_blocking());
        // already blocking → no restart
        assert!(!shield.try_block());

        shield.tick(2.1);
        assert!(!shield.is_blocking());
        assert!(!shield.can_block()); // on cooldown

        shield.tick(3.1);
        assert!(shield.can_block());
    }

    #[test]
    fn lowering_early_still_starts_cooldown() {
        let mut shield = ShieldState::new(2.0, 3.0);
        shield.try_block();
        shield.tick(0.5);
        shield.lower();

        assert!(!shield.is_blocking());
        assert!(!shield.can_block());
        shield.tick(3.1);
        assert!(shield.can_block());
    }
}
