use avian3d::prelude::PhysicsLayer;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.register_type::<Health>()
        .register_type::<Swing>()
        .register_type::<Invulnerable>();
}

/// Health component for any entity that can take damage.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.current = (self.current - amount).max(0.0);
        self.current <= 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Marker: damage against this entity resolves to zero. Inserted for the
/// whole super-active window, removed exactly once when it ends.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[component(storage = "SparseSet")]
pub struct Invulnerable;

/// One melee swing's damage window. Opened when the swing reaches its hit
/// frames, closed when they end. `already_hit` keeps a single overlap that
/// lasts several ticks from resolving against the same target twice; it is
/// cleared every time a new window opens.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct Swing {
    pub active: bool,
    pub already_hit: Vec<Entity>,
}

impl Swing {
    /// Open the damage window for a fresh swing.
    pub fn open(&mut self) {
        self.active = true;
        self.already_hit.clear();
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    /// True the first time `target` is seen during this window.
    pub fn mark_resolved(&mut self, target: Entity) -> bool {
        if self.already_hit.contains(&target) {
            return false;
        }
        self.already_hit.push(target);
        true
    }
}

/// Marker component for entities that can deal damage.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct Combatant;

/// Tag to identify the player for combat purposes.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct PlayerCombatant;

/// Tag to identify enemies.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct Enemy;

/// Physics collision layers for combat entities.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Ground,
    Player,
    Enemy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_resolves_each_target_once_per_window() {
        let mut swing = Swing::default();
        swing.open();

        let a = Entity::from_raw_u32(1).unwrap();
        let b = Entity::from_raw_u32(2).unwrap();

        assert!(swing.mark_resolved(a));
        assert!(!swing.mark_resolved(a));
        assert!(swing.mark_resolved(b));

        // a fresh window forgets previous targets
        swing.open();
        assert!(swing.mark_resolved(a));
    }
}
