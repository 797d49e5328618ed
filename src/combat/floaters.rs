use super::*;
use crate::ui::colors::{BLOCK_GRAY, COMBO_ORANGE, COMBO_RED, DAMAGE_WHITE, SUPER_GOLD};

pub fn plugin(app: &mut App) {
    app.add_observer(on_damage_number).add_systems(
        Update,
        tick_damage_numbers
            .in_set(AppSystems::ChangeUi)
            .run_if(in_state(Screen::Gameplay)),
    );
}

// ── Damage Numbers ──────────────────────────────────────────────────

#[derive(Component)]
pub struct DamageNumber {
    pub timer: f32,
    pub world_pos: Vec3,
    pub offset: Vec2,
}

const DISPLAY_DURATION: f32 = 0.8;
const HOLD_END: f32 = 0.5;
const RISE_PIXELS: f32 = 70.0;

/// Text and color for one resolved hit. Combo hits heat up with the count;
/// gated hits show their gate instead of a number.
fn number_style(amount: f32, category: DamageCategory) -> (String, Color, f32) {
    match category {
        DamageCategory::Normal { combo_level } => {
            let color = match combo_level {
                0..=1 => DAMAGE_WHITE,
                2..=3 => COMBO_ORANGE,
                _ => COMBO_RED,
            };
            (format!("{}", amount as i32), color, 20.0)
        }
        DamageCategory::Blocked => ("BLOCKED".to_string(), BLOCK_GRAY, 18.0),
        DamageCategory::Invincible => ("IMMUNE".to_string(), BLOCK_GRAY, 18.0),
        DamageCategory::Special => (format!("{}", amount as i32), SUPER_GOLD, 28.0),
    }
}

fn on_damage_number(on: On<DamageResolved>, mut commands: Commands) {
    let event = on.event();
    let (text, color, font_size) = number_style(event.amount, event.category);

    let mut rng = rand::rng();
    let offset = Vec2::new(
        rand::Rng::random_range(&mut rng, -40.0..40.0),
        rand::Rng::random_range(&mut rng, -20.0..20.0),
    );

    commands.spawn((
        DamageNumber {
            timer: 0.0,
            world_pos: event.position,
            offset,
        },
        DespawnOnExit(Screen::Gameplay),
        Text::new(text),
        TextFont::from_font_size(font_size),
        TextColor(color),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(-9999.0),
            top: Val::Px(-9999.0),
            ..default()
        },
        GlobalZIndex(100),
        Pickable::IGNORE,
    ));
}

/// Project each number back to the screen, rise and fade it out.
fn tick_damage_numbers(
    time: Res<Time>,
    mut commands: Commands,
    camera: Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
    mut numbers: Query<(Entity, &mut DamageNumber, &mut Node, &mut TextColor)>,
) {
    let delta = time.delta_secs();

    let Ok((cam, cam_global)) = camera.single() else {
        return;
    };

    for (entity, mut dmg, mut node, mut color) in numbers.iter_mut() {
        dmg.timer += delta;
        let t = (dmg.timer / DISPLAY_DURATION).min(1.0);

        if t >= 1.0 {
            commands.entity(entity).despawn();
            continue;
        }

        let Some(base_screen) = cam.world_to_viewport(cam_global, dmg.world_pos).ok() else {
            node.left = Val::Px(-9999.0);
            node.top = Val::Px(-9999.0);
            continue;
        };

        let y_offset = -RISE_PIXELS * t.sqrt();
        node.left = Val::Px(base_screen.x + dmg.offset.x - 24.0);
        node.top = Val::Px(base_screen.y + dmg.offset.y + y_offset);

        let alpha = if t < HOLD_END {
            1.0
        } else {
            let fade_t = (t - HOLD_END) / (1.0 - HOLD_END);
            1.0 - fade_t * fade_t
        };
        color.0 = color.0.with_alpha(alpha);
    }
}
