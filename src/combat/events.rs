//! Combat event definitions — the complete hit chain.
//!
//! Hit chain:    [`SwingConnect`] → [`DamageResolved`] → [`Died`]
//! Combo chain:  [`ComboChanged`], [`ComboWindowProgress`]
//! Super chain:  [`SuperChargeChanged`] → [`SuperReady`] → [`SuperActivated`]
//!               → [`SuperTimerChanged`]* → [`SuperEnded`]
//!
//! Convention: intents use noun form (hasn't happened yet), mutations and
//! feedback use past tense (it happened). The tense tells you the event's
//! role. The combo/super events carry payloads only — the HUD and floaters
//! observe them, nothing in the core requires a subscriber.

use bevy::prelude::*;

// ── Intent ──────────────────────────────────────────────────────────

/// What kind of damage source a [`SwingConnect`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingKind {
    /// A weapon swing; attacker multipliers apply.
    Melee,
    /// The super finisher's radial blast; power arrives pre-multiplied and
    /// no further multiplier or side effect applies.
    Shockwave,
}

/// Intent: a swing's damage window reached a target. Resolved into
/// [`DamageResolved`] by the damage pipeline, at most once per
/// (swing, target) pair.
#[derive(Event, Clone, Debug)]
pub struct SwingConnect {
    pub attacker: Entity,
    pub target: Entity,
    /// Base power of the attack before gates and multipliers.
    pub power: f32,
    pub kind: SwingKind,
}

// ── Mutations ───────────────────────────────────────────────────────

/// How a resolved hit should be presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageCategory {
    /// Clean hit; carries the combo count *before* this hit registered.
    Normal { combo_level: u32 },
    /// Stopped by an active shield block. Zero damage.
    Blocked,
    /// Target is invulnerable (its super is active). Zero damage.
    Invincible,
    /// Dealt while the attacker's super is active.
    Special,
}

/// Mutation: one hit fully resolved — gates applied, multipliers folded in,
/// health already updated.
#[derive(Event, Clone, Debug)]
pub struct DamageResolved {
    pub target: Entity,
    /// World position for floating damage text.
    pub position: Vec3,
    pub amount: f32,
    pub category: DamageCategory,
}

/// Cross-domain mutation: an entity died.
/// Triggered by the damage pipeline when health reaches zero.
#[derive(Event, Debug, Clone)]
pub struct Died {
    pub entity: Entity,
}

// ── Combo feedback ──────────────────────────────────────────────────

/// The combo count changed (hit registered or reset to zero).
#[derive(Event, Clone, Debug)]
pub struct ComboChanged {
    pub count: u32,
    pub multiplier: f32,
}

/// Remaining fraction of the follow-up window, `1.0 → 0.0`.
/// `0.0` doubles as the hide signal.
#[derive(Event, Clone, Debug)]
pub struct ComboWindowProgress {
    pub progress: f32,
}

// ── Super feedback ──────────────────────────────────────────────────

#[derive(Event, Clone, Debug)]
pub struct SuperChargeChanged {
    pub current: f32,
    pub max: f32,
}

/// Charge crossed full — fired exactly once per crossing.
#[derive(Event, Clone, Debug)]
pub struct SuperReady;

#[derive(Event, Clone, Debug)]
pub struct SuperActivated;

/// The active window ended, by finisher completion or by timeout.
#[derive(Event, Clone, Debug)]
pub struct SuperEnded;

/// Activation countdown update; `remaining == 0` hides the timer.
#[derive(Event, Clone, Debug)]
pub struct SuperTimerChanged {
    pub remaining: f32,
    pub max: f32,
}
