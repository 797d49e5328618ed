use super::*;
use crate::player::Animation;
use std::collections::HashMap;

#[derive(Component, Reflect, Clone)]
#[reflect(Component)]
pub struct Player {
    pub id: Entity,
    pub animations: HashMap<Animation, AnimationNodeIndex>,
    /// Clip lengths in seconds, captured while building the animation graph.
    pub clip_durations: HashMap<Animation, f32>,
    /// Entity of the AnimationPlayer descendant (set during prepare_animations)
    pub anim_player_entity: Option<Entity>,
}

impl Player {
    /// Length of a clip if the model provided it. Callers fall back to fixed
    /// durations when the query comes back empty — a missing clip must never
    /// leave a timed state stuck.
    pub fn clip_duration(&self, animation: Animation) -> Option<f32> {
        self.clip_durations.get(&animation).copied()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            // u32::MAX is Entity::PLACEHOLDER and using placeholder leads to issues, while an
            // Option would unnecessarily complicate handling it in systems.
            // We replace it with the real id when the model is spawned anyway.
            id: Entity::from_raw_u32(u32::MAX - 1).unwrap(),
            animations: HashMap::new(),
            clip_durations: HashMap::new(),
            anim_player_entity: None,
        }
    }
}

/// Sprint fuel. Drains while sprinting, regenerates after a short delay once
/// sprinting stops. Sprinting locks out at empty and unlocks again once the
/// pool recovers past the configured fraction.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub can_sprint: bool,
    /// Seconds since the last drain, for the regen delay.
    pub since_drain: f32,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            can_sprint: true,
            since_drain: 0.0,
        }
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
        self.since_drain = 0.0;
        if self.current <= 0.0 {
            self.can_sprint = false;
        }
    }

    pub fn regen(&mut self, amount: f32, unlock_fraction: f32) {
        self.current = (self.current + amount).min(self.max);
        if self.fraction() >= unlock_fraction {
            self.can_sprint = true;
        }
    }
}
