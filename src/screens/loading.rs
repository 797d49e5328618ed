use super::*;
use crate::asset_loading::models_ready;

/// Shows a loading message until the player model (and its animation clips)
/// are in memory, then moves on to the title.
pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Loading), setup_loading)
        .add_systems(
            Update,
            advance_when_ready
                .run_if(in_state(Screen::Loading))
                .run_if(models_ready),
        );
}

fn setup_loading(mut commands: Commands) {
    commands.spawn((
        DespawnOnExit(Screen::Loading),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        children![(
            Text::new("Loading..."),
            TextFont::from_font_size(28.0),
            TextColor(Color::WHITE),
        )],
    ));
}

fn advance_when_ready(mut commands: Commands) {
    commands.trigger(GoTo(Screen::Title));
}
