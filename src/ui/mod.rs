use crate::*;

mod hud;

pub use hud::*;

pub fn plugin(app: &mut App) {
    app.add_plugins(hud::plugin);
}

/// Shared UI palette.
pub mod colors {
    use bevy::prelude::Color;

    pub const DAMAGE_WHITE: Color = Color::srgb(0.95, 0.95, 0.95);
    pub const COMBO_ORANGE: Color = Color::srgb(1.0, 0.62, 0.2);
    pub const COMBO_RED: Color = Color::srgb(1.0, 0.3, 0.2);
    pub const BLOCK_GRAY: Color = Color::srgb(0.6, 0.6, 0.65);
    pub const SUPER_GOLD: Color = Color::srgb(1.0, 0.84, 0.3);

    pub const HEALTH_RED: Color = Color::srgb(0.85, 0.2, 0.2);
    pub const STAMINA_GREEN: Color = Color::srgb(0.35, 0.75, 0.35);
    pub const SUPER_BLUE: Color = Color::srgb(0.35, 0.55, 0.95);

    pub const BAR_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.06, 0.8);
    pub const BAR_BORDER: Color = Color::srgba(0.4, 0.4, 0.45, 0.5);
    pub const LABEL_GRAY: Color = Color::srgb(0.7, 0.7, 0.7);
}
