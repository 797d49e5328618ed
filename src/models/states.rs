use super::*;

pub fn plugin(app: &mut App) {
    app.init_resource::<GameState>();
}

#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct GameState {
    pub last_screen: Screen,
    pub debug_ui: bool,
    pub paused: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            last_screen: Screen::Title,
            debug_ui: false, // Off by default
            paused: false,
        }
    }
}

impl GameState {
    pub fn reset(&mut self) {
        self.paused = false;
    }
}

/// The game's main screen states.
/// See <https://bevy-cheatbook.github.io/programming/states.html>
#[derive(States, Default, Clone, Eq, PartialEq, Debug, Hash, Reflect)]
pub enum Screen {
    // During the loading State the LoadingPlugin will load our assets
    #[default]
    Loading,
    // Here the menu is drawn and waiting for player interaction
    Title,
    // During this State the actual game logic is executed
    Gameplay,
}
