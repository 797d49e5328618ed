use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

mod ext_traits;
mod input;
mod player;
mod pre_load;
mod primitives;
mod states;

pub use ext_traits::*;
pub use input::*;
pub use player::*;
pub use pre_load::*;
pub use primitives::*;
pub use states::*;

pub fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            AppSystems::LatchInput,
            AppSystems::Logic,
            AppSystems::Combat,
            AppSystems::TickTimers,
            AppSystems::ChangeUi,
        )
            .chain(),
    );

    app.add_plugins((pre_load::plugin, states::plugin, input::plugin));
}

/// High-level groupings of systems for the app in the [`Update`] schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Latch input edges and axes for this tick.
    LatchInput,
    /// Behavior state machine: transitions and per-state logic.
    Logic,
    /// Swing windows, hit resolution, damage application.
    Combat,
    /// Tick combo/super/slow-motion timers.
    TickTimers,
    /// Change UI.
    ChangeUi,
}
