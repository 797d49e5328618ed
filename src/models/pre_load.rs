use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

pub const CONFIG_PATH: &str = "assets/config.ron";

pub fn plugin(app: &mut App) {
    app.insert_resource(Config::load());
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{CONFIG_PATH}': {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse '{CONFIG_PATH}': {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Gameplay tuning, loaded from [`CONFIG_PATH`] with sane defaults as
/// fallback. Everything a designer would want to tweak lives here; code
/// holds no magic combat numbers.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Reflect, Resource)]
#[reflect(Resource)]
pub struct Config {
    pub player: PlayerPreset,
    pub combat: CombatPreset,
    pub combo: ComboPreset,
    pub super_ability: SuperPreset,
    pub shield: ShieldPreset,
    pub slow_motion: SlowMotionPreset,
    pub timers: TimersPreset,
}

impl Config {
    pub fn try_load() -> Result<Self, ConfigError> {
        let content = fs::read_to_string(CONFIG_PATH)?;
        Ok(ron::from_str(&content)?)
    }

    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => {
                info!("Loaded config from '{CONFIG_PATH}'");
                config
            }
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            }
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Reflect)]
pub struct PlayerPreset {
    pub movement: MovementPreset,
    pub stamina: StaminaPreset,
    pub hitbox: HitboxPreset,
    pub zoom: (f32, f32),
    pub fov: f32,
    pub spawn_pos: (f32, f32, f32),
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct MovementPreset {
    pub speed: f32,
    pub sprint_factor: f32,
    pub crouch_factor: f32,
    /// How much stick input steers the character mid-air, 0..1.
    pub air_control: f32,
    pub jump_height: f32,
    pub rotation_speed: f32,
    pub idle_to_run_threshold: f32,
}

impl Default for MovementPreset {
    fn default() -> Self {
        Self {
            speed: 5.0,
            sprint_factor: 1.4,
            crouch_factor: 0.4,
            air_control: 0.5,
            jump_height: 2.0,
            rotation_speed: 5.0,
            idle_to_run_threshold: 0.01,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct StaminaPreset {
    pub max: f32,
    /// Per second while sprinting.
    pub drain_rate: f32,
    /// Per second once the regen delay has passed.
    pub regen_rate: f32,
    pub regen_delay: f32,
    /// Sprinting is re-allowed once stamina recovers past this fraction.
    pub sprint_min_fraction: f32,
}

impl Default for StaminaPreset {
    fn default() -> Self {
        Self {
            max: 100.0,
            drain_rate: 20.0,
            regen_rate: 10.0,
            regen_delay: 1.0,
            sprint_min_fraction: 0.2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct HitboxPreset {
    pub radius: f32,
    pub height: f32,
}

impl Default for HitboxPreset {
    fn default() -> Self {
        Self {
            radius: 0.4,
            height: 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct CombatPreset {
    /// Base power of the player's weapon, before any multiplier.
    pub weapon_power: f32,
    pub attack_range: f32,
    pub attack_arc: f32,
    pub enemy_power: f32,
    pub enemy_attack_range: f32,
    pub enemy_attack_cooldown: f32,
}

impl Default for CombatPreset {
    fn default() -> Self {
        Self {
            weapon_power: 10.0,
            attack_range: 2.4,
            attack_arc: 120.0,
            enemy_power: 10.0,
            enemy_attack_range: 1.8,
            enemy_attack_cooldown: 1.8,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct ComboPreset {
    /// Damage multiplier per combo count; index 0 = no combo = 1.0x.
    /// Counts past the end clamp to the last entry.
    pub multipliers: Vec<f32>,
}

impl Default for ComboPreset {
    fn default() -> Self {
        Self {
            multipliers: vec![1.0, 1.2, 1.5, 1.8, 2.0, 2.5],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct SuperPreset {
    pub max_charge: f32,
    pub charge_per_hit: f32,
    /// Replaces the combo multiplier while the super is active.
    pub damage_multiplier: f32,
    pub radius_multiplier: f32,
    pub radius_range: f32,
    pub initial_pushback: f32,
    pub radius_pushback: f32,
    /// Seconds the player has to commit to the finisher once activated.
    pub activation_window: f32,
    pub time_slow_scale: f32,
}

impl Default for SuperPreset {
    fn default() -> Self {
        Self {
            max_charge: 100.0,
            charge_per_hit: 10.0,
            damage_multiplier: 3.0,
            radius_multiplier: 5.0,
            radius_range: 5.0,
            initial_pushback: 5.0,
            radius_pushback: 15.0,
            activation_window: 5.0,
            time_slow_scale: 0.1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct ShieldPreset {
    pub block_duration: f32,
    pub cooldown: f32,
}

impl Default for ShieldPreset {
    fn default() -> Self {
        Self {
            block_duration: 2.0,
            cooldown: 3.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct SlowMotionPreset {
    pub duration: f32,
    pub scale: f32,
}

impl Default for SlowMotionPreset {
    fn default() -> Self {
        Self {
            duration: 0.1,
            scale: 0.1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
pub struct TimersPreset {
    pub landing: f32,
    pub sprint_jump: f32,
}

impl Default for TimersPreset {
    fn default() -> Self {
        Self {
            landing: 0.25,
            sprint_jump: 1.0,
        }
    }
}
