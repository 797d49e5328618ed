use super::*;
use bevy_enhanced_input::prelude::Start;

pub fn plugin(app: &mut App) {
    app.add_observer(back_to_title);
}

/// Escape leaves the arena. Gameplay entities are scoped to the screen, so
/// everything combat-related despawns with the transition.
fn back_to_title(
    _on: On<Start<Escape>>,
    screen: Res<State<Screen>>,
    mut state: ResMut<GameState>,
    mut commands: Commands,
) {
    if *screen.get() != Screen::Gameplay {
        return;
    }
    state.last_screen = Screen::Gameplay;
    commands.trigger(GoTo(Screen::Title));
}
