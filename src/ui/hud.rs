use super::*;
use crate::combat::{
    ComboChanged, ComboWindowProgress, Health, SuperActivated, SuperChargeChanged, SuperEnded,
    SuperReady, SuperTimerChanged,
};
use crate::ui::colors::*;

const BAR_WIDTH: f32 = 260.0;
const BAR_HEIGHT: f32 = 14.0;

// ── Components ──────────────────────────────────────────────────────

#[derive(Component)]
struct HudHealthFill;

#[derive(Component)]
struct HudStaminaFill;

#[derive(Component)]
struct HudComboLabel;

#[derive(Component)]
struct HudComboWindowRow;

#[derive(Component)]
struct HudComboWindowFill;

#[derive(Component)]
struct HudSuperFill;

#[derive(Component)]
struct HudSuperLabel;

#[derive(Component)]
struct HudSuperTimerFill;

// ── Plugin ──────────────────────────────────────────────────────────

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud)
        .add_systems(
            Update,
            (tick_health_bar, tick_stamina_bar)
                .in_set(AppSystems::ChangeUi)
                .run_if(in_state(Screen::Gameplay)),
        )
        .add_observer(on_combo_changed)
        .add_observer(on_combo_window)
        .add_observer(on_super_charge)
        .add_observer(on_super_timer)
        .add_observer(on_super_ready)
        .add_observer(on_super_activated)
        .add_observer(on_super_ended);
}

// ── Spawn ───────────────────────────────────────────────────────────

fn bar(fill_marker: impl Bundle, color: Color) -> impl Bundle {
    (
        Node {
            width: Val::Px(BAR_WIDTH),
            height: Val::Px(BAR_HEIGHT),
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
        BackgroundColor(BAR_BACKGROUND),
        BorderColor::all(BAR_BORDER),
        children![(
            fill_marker,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(color),
        )],
    )
}

fn spawn_hud(mut commands: Commands) {
    // bottom-left: health + stamina
    commands.spawn((
        GameplayUi,
        DespawnOnExit(Screen::Gameplay),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(32.0),
            bottom: Val::Px(32.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        },
        GlobalZIndex(90),
        Pickable::IGNORE,
        children![
            bar(HudHealthFill, HEALTH_RED),
            bar(HudStaminaFill, STAMINA_GREEN),
        ],
    ));

    // bottom-center: combo counter and follow-up window
    commands.spawn((
        GameplayUi,
        DespawnOnExit(Screen::Gameplay),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            bottom: Val::Px(48.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(4.0),
            ..default()
        },
        GlobalZIndex(90),
        Pickable::IGNORE,
        children![
            (
                HudComboLabel,
                Text::new(""),
                TextFont::from_font_size(30.0),
                TextColor(COMBO_ORANGE),
            ),
            (
                HudComboWindowRow,
                Node {
                    width: Val::Px(120.0),
                    height: Val::Px(6.0),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(BAR_BACKGROUND),
                BorderColor::all(BAR_BORDER),
                Visibility::Hidden,
                children![(
                    HudComboWindowFill,
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(COMBO_ORANGE),
                )],
            ),
        ],
    ));

    // bottom-right: super meter
    commands.spawn((
        GameplayUi,
        DespawnOnExit(Screen::Gameplay),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(32.0),
            bottom: Val::Px(32.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            row_gap: Val::Px(6.0),
            ..default()
        },
        GlobalZIndex(90),
        Pickable::IGNORE,
        children![
            (
                HudSuperLabel,
                Text::new("SUPER"),
                TextFont::from_font_size(18.0),
                TextColor(LABEL_GRAY),
            ),
            bar(HudSuperFill, SUPER_BLUE),
            (
                Node {
                    width: Val::Px(BAR_WIDTH),
                    height: Val::Px(5.0),
                    ..default()
                },
                BackgroundColor(BAR_BACKGROUND),
                children![(
                    HudSuperTimerFill,
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(SUPER_GOLD),
                )],
            ),
        ],
    ));
}

// ── Query-driven bars ───────────────────────────────────────────────

fn tick_health_bar(
    player: Query<&Health, With<Player>>,
    mut fill: Query<&mut Node, With<HudHealthFill>>,
) {
    let (Ok(health), Ok(mut node)) = (player.single(), fill.single_mut()) else {
        return;
    };
    node.width = Val::Percent(health.fraction() * 100.0);
}

fn tick_stamina_bar(
    player: Query<&Stamina, With<Player>>,
    mut fill: Query<&mut Node, With<HudStaminaFill>>,
) {
    let (Ok(stamina), Ok(mut node)) = (player.single(), fill.single_mut()) else {
        return;
    };
    node.width = Val::Percent(stamina.fraction() * 100.0);
}

// ── Event-driven widgets ────────────────────────────────────────────

fn on_combo_changed(
    on: On<ComboChanged>,
    mut label: Query<(&mut Text, &mut TextColor), With<HudComboLabel>>,
) {
    let Ok((mut text, mut color)) = label.single_mut() else {
        return;
    };
    let event = on.event();

    if event.count == 0 {
        text.0.clear();
        return;
    }
    text.0 = format!("{} HITS  x{:.1}", event.count, event.multiplier);
    color.0 = if event.count >= 4 {
        COMBO_RED
    } else {
        COMBO_ORANGE
    };
}

fn on_combo_window(
    on: On<ComboWindowProgress>,
    mut row: Query<&mut Visibility, With<HudComboWindowRow>>,
    mut fill: Query<&mut Node, With<HudComboWindowFill>>,
) {
    let (Ok(mut visibility), Ok(mut node)) = (row.single_mut(), fill.single_mut()) else {
        return;
    };
    let progress = on.event().progress;

    // zero doubles as the hide signal
    *visibility = if progress > 0.0 {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    node.width = Val::Percent(progress * 100.0);
}

fn on_super_charge(on: On<SuperChargeChanged>, mut fill: Query<&mut Node, With<HudSuperFill>>) {
    let Ok(mut node) = fill.single_mut() else {
        return;
    };
    let event = on.event();
    node.width = Val::Percent((event.current / event.max).clamp(0.0, 1.0) * 100.0);
}

fn on_super_timer(
    on: On<SuperTimerChanged>,
    mut fill: Query<&mut Node, With<HudSuperTimerFill>>,
) {
    let Ok(mut node) = fill.single_mut() else {
        return;
    };
    let event = on.event();
    node.width = Val::Percent((event.remaining / event.max).clamp(0.0, 1.0) * 100.0);
}

fn on_super_ready(
    _on: On<SuperReady>,
    mut label: Query<(&mut Text, &mut TextColor), With<HudSuperLabel>>,
) {
    if let Ok((mut text, mut color)) = label.single_mut() {
        text.0 = "SUPER READY".to_string();
        color.0 = SUPER_GOLD;
    }
}

fn on_super_activated(
    _on: On<SuperActivated>,
    mut label: Query<(&mut Text, &mut TextColor), With<HudSuperLabel>>,
) {
    if let Ok((mut text, mut color)) = label.single_mut() {
        text.0 = "UNLEASH!".to_string();
        color.0 = SUPER_GOLD;
    }
}

fn on_super_ended(
    _on: On<SuperEnded>,
    mut label: Query<(&mut Text, &mut TextColor), With<HudSuperLabel>>,
) {
    if let Ok((mut text, mut color)) = label.single_mut() {
        text.0 = "SUPER".to_string();
        color.0 = LABEL_GRAY;
    }
}
