//! The game's main screen states and transitions between them.
use crate::*;

mod gameplay;
mod loading;
mod title;

pub fn plugin(app: &mut App) {
    app.init_state::<Screen>();

    app.add_plugins((camera::plugin, loading::plugin, title::plugin, gameplay::plugin));

    app.add_observer(on_go_to);
}

#[derive(Event)]
pub struct GoTo(pub Screen);

pub fn on_go_to(goto: On<GoTo>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(goto.event().0.clone());
}
