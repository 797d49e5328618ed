use super::*;

pub fn plugin(app: &mut App) {
    app.add_plugins(EnhancedInputPlugin)
        .add_input_context::<PlayerCtx>()
        .add_observer(add_player_ctx)
        .add_observer(rm_player_ctx)
        .add_observer(log_attack)
        .add_observer(log_block)
        .add_observer(log_super);
}

fn log_attack(_on: On<Start<Attack>>) {
    debug!("Attack");
}

fn log_block(_on: On<Start<Block>>) {
    debug!("Block");
}

fn log_super(_on: On<Start<SuperActivate>>) {
    debug!("SuperActivate");
}

#[derive(InputAction)]
#[action_output(Vec2)]
pub struct Navigate;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Attack;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Block;

#[derive(InputAction)]
#[action_output(bool)]
pub struct SuperActivate;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Jump;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Sprint;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Crouch;

#[derive(InputAction)]
#[action_output(bool)]
pub struct DrawWeapon;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Escape;

#[derive(InputAction)]
#[action_output(bool)]
pub struct SpawnEnemy;

#[derive(InputAction)]
#[action_output(bool)]
pub struct ClearEnemies;

pub fn add_player_ctx(add: On<Add, PlayerCtx>, mut commands: Commands) {
    debug!("PlayerCtx added to {:?}", add.entity);
    let mut e = commands.entity(add.entity);

    e.insert(actions!(PlayerCtx[
        (
            Action::<Navigate>::new(),
            DeadZone::default(),
            Bindings::spawn(( Cardinal::wasd_keys(), Cardinal::arrows(), Axial::left_stick() )),
        ),
        (
            Action::<Attack>::new(),
            bindings![MouseButton::Left, GamepadButton::West],
        ),
        (
            Action::<Block>::new(),
            bindings![MouseButton::Right, GamepadButton::East],
        ),
        (
            Action::<SuperActivate>::new(),
            bindings![KeyCode::KeyR, GamepadButton::North],
        ),
        (
            Action::<Jump>::new(),
            bindings![KeyCode::Space, GamepadButton::South],
        ),
        (
            Action::<Sprint>::new(),
            bindings![KeyCode::ShiftLeft, GamepadButton::LeftTrigger],
        ),
        (
            Action::<Crouch>::new(),
            bindings![KeyCode::ControlLeft, GamepadButton::LeftTrigger2],
        ),
        (
            Action::<DrawWeapon>::new(),
            bindings![KeyCode::KeyF, GamepadButton::RightTrigger],
        ),
        (
            Action::<Escape>::new(),
            ActionSettings {
                require_reset: true,
                ..Default::default()
            },
            bindings![KeyCode::Escape, GamepadButton::Start],
        ),
        (
            Action::<SpawnEnemy>::new(),
            bindings![KeyCode::KeyE, GamepadButton::RightThumb],
        ),
        (
            Action::<ClearEnemies>::new(),
            bindings![KeyCode::KeyQ],
        ),
    ]));
}

fn rm_player_ctx(rm: On<Remove, PlayerCtx>, mut commands: Commands) {
    commands
        .entity(rm.entity)
        .despawn_related::<Actions<PlayerCtx>>();
}
