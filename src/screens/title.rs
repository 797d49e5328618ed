use super::*;

/// This plugin is responsible for the title menu.
/// The menu is only drawn during the State [`Screen::Title`] and is removed when that state is exited
pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Title), setup_menu)
        .add_systems(Update, start_on_enter.run_if(in_state(Screen::Title)));
}

fn setup_menu(mut commands: Commands, mut state: ResMut<GameState>) {
    commands.spawn((
        TitleUi,
        DespawnOnExit(Screen::Title),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(16.0),
            ..default()
        },
        children![
            (
                Text::new("STEELSONG"),
                TextFont::from_font_size(64.0),
                TextColor(Color::WHITE),
            ),
            (
                Text::new("Press Enter to play"),
                TextFont::from_font_size(22.0),
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ),
        ],
    ));

    state.reset();
}

fn start_on_enter(keys: Res<ButtonInput<KeyCode>>, mut commands: Commands) {
    if keys.just_pressed(KeyCode::Enter) {
        commands.trigger(GoTo(Screen::Gameplay));
    }
}
