use super::*;
use crate::combat::ShieldState;
use crate::player::control::CharacterState;

/// GLTF animation clips the game uses. Single source of truth for clip
/// naming; unused clips in the model are skipped during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Animation {
    Idle,
    JogFwd,
    Sprint,
    JumpLoop,
    JumpLand,
    CrouchIdle,
    CrouchFwd,
    CombatIdle,
    Block,
    SlashA,
    SlashB,
    SuperSlam,
}

impl Animation {
    /// All variants — used for loading and validation.
    pub const ALL: &[Animation] = &[
        Self::Idle,
        Self::JogFwd,
        Self::Sprint,
        Self::JumpLoop,
        Self::JumpLand,
        Self::CrouchIdle,
        Self::CrouchFwd,
        Self::CombatIdle,
        Self::Block,
        Self::SlashA,
        Self::SlashB,
        Self::SuperSlam,
    ];

    /// Maps to the clip name inside the GLTF file.
    pub fn clip_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle_Loop",
            Self::JogFwd => "Jog_Fwd_Loop",
            Self::Sprint => "Sprint_Loop",
            Self::JumpLoop => "Jump_Loop",
            Self::JumpLand => "Jump_Land",
            Self::CrouchIdle => "Crouch_Idle_Loop",
            Self::CrouchFwd => "Crouch_Fwd_Loop",
            Self::CombatIdle => "Combat_Idle_Loop",
            Self::Block => "Shield_Block",
            Self::SlashA => "Slash_A",
            Self::SlashB => "Slash_B",
            Self::SuperSlam => "Super_Slam",
        }
    }

    /// Reverse lookup: GLTF clip name → enum variant.
    pub fn from_clip_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|a| a.clip_name() == name).copied()
    }

    /// Whether the clip loops when selected.
    pub fn looping(self) -> bool {
        !matches!(self, Self::JumpLand | Self::SlashA | Self::SlashB | Self::SuperSlam)
    }
}

/// The clip the dispatcher last requested, to avoid restarting a playing
/// animation every frame.
#[derive(Component, Default)]
pub struct CurrentClip(pub Option<Animation>);

/// Recursively find the first entity with AnimationPlayer in a subtree.
pub fn find_animation_player_descendant(
    entity: Entity,
    children_q: &Query<&Children>,
    anim_players: &Query<Entity, With<AnimationPlayer>>,
) -> Option<Entity> {
    if anim_players.get(entity).is_ok() {
        return Some(entity);
    }
    if let Ok(children) = children_q.get(entity) {
        for child in children.iter() {
            if let Some(found) = find_animation_player_descendant(child, children_q, anim_players) {
                return Some(found);
            }
        }
    }
    None
}

/// Build the player's animation graph once the model's scene is ready, and
/// record every clip's length — the behavior logic times its states off
/// those lengths.
pub fn prepare_animations(
    on: On<SceneInstanceReady>,
    models: Res<Models>,
    gltf_assets: Res<Assets<Gltf>>,
    children_q: Query<&Children>,
    anim_players: Query<Entity, With<AnimationPlayer>>,
    parents: Query<&ChildOf>,
    mut player: Query<&mut Player>,
    mut commands: Commands,
    mut animation_graphs: ResMut<Assets<AnimationGraph>>,
    animation_clips: Res<Assets<AnimationClip>>,
) {
    let Some(gltf) = gltf_assets.get(&models.player) else {
        return;
    };

    // Find AnimationPlayer as descendant of the scene entity that just loaded
    let scene_entity = on.entity;
    let Some(animation_player) =
        find_animation_player_descendant(scene_entity, &children_q, &anim_players)
    else {
        return;
    };

    // Walk up to find the Player entity (scene entity -> player entity)
    let player_entity = if let Ok(parent) = parents.get(scene_entity) {
        parent.parent()
    } else {
        scene_entity
    };
    let Ok(mut player) = player.get_mut(player_entity) else {
        return;
    };

    let mut graph = AnimationGraph::new();
    let root_node = graph.root;

    // Flat animation graph; only load animations we actually use
    for (name, clip_handle) in gltf.named_animations.iter() {
        let Some(anim) = Animation::from_clip_name(name) else {
            continue;
        };

        let Some(clip) = animation_clips.get(clip_handle) else {
            continue;
        };

        player.clip_durations.insert(anim, clip.duration());
        let node_index = graph.add_clip(clip_handle.clone(), 1.0, root_node);
        player.animations.insert(anim, node_index);
    }

    info!("Loaded {} animations", player.animations.len());

    #[cfg(debug_assertions)]
    for anim in Animation::ALL {
        if !player.animations.contains_key(anim) {
            warn!(
                "Animation {:?} ({}) not found in player model",
                anim,
                anim.clip_name()
            );
        }
    }

    player.anim_player_entity = Some(animation_player);

    let idle_node = player.animations.get(&Animation::Idle).copied();
    let graph_handle = animation_graphs.add(graph);

    commands.entity(animation_player).insert((
        AnimationGraphHandle(graph_handle),
        AnimationTransitions::new(),
    ));

    // Start idle animation immediately to avoid T-pose on first frame
    if let Some(index) = idle_node {
        commands
            .entity(animation_player)
            .queue(move |mut entity: EntityWorldMut| {
                let Some(mut transitions) = entity.take::<AnimationTransitions>() else {
                    return;
                };
                if let Some(mut player) = entity.get_mut::<AnimationPlayer>() {
                    transitions
                        .play(&mut player, index, Duration::ZERO)
                        .repeat();
                }
                entity.insert(transitions);
            });
    }
}

/// Map the behavior state to a clip and request it when it changes. This is
/// the whole "set animation trigger" surface — the behavior logic never
/// touches the animation player directly.
pub fn animating(
    cfg: Res<Config>,
    mut player_q: Query<(
        &CharacterState,
        &ShieldState,
        &Player,
        &mut CurrentClip,
        &TnuaController,
    )>,
    mut animation_query: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
) {
    let Ok((state, shield, player, mut current, controller)) = player_q.single_mut() else {
        return;
    };

    let Some(anim_entity) = player.anim_player_entity else {
        return;
    };
    let Ok((mut animation_player, mut transitions)) = animation_query.get_mut(anim_entity) else {
        return;
    };

    let moving = controller
        .concrete_basis::<TnuaBuiltinWalk>()
        .map(|(_, basis_state)| {
            basis_state.running_velocity.length() > cfg.player.movement.idle_to_run_threshold
        })
        .unwrap_or(false);

    let desired = match state {
        CharacterState::Standing => {
            if moving {
                Animation::JogFwd
            } else {
                Animation::Idle
            }
        }
        CharacterState::Crouching => {
            if moving {
                Animation::CrouchFwd
            } else {
                Animation::CrouchIdle
            }
        }
        CharacterState::Sprinting => Animation::Sprint,
        CharacterState::Jumping { .. } | CharacterState::SprintJumping { .. } => {
            Animation::JumpLoop
        }
        CharacterState::Landing { .. } => Animation::JumpLand,
        CharacterState::Combat => {
            if shield.is_blocking() {
                Animation::Block
            } else if moving {
                Animation::JogFwd
            } else {
                Animation::CombatIdle
            }
        }
        CharacterState::Attacking { count, .. } => {
            // alternate the two slashes along the chain
            if count % 2 == 0 {
                Animation::SlashA
            } else {
                Animation::SlashB
            }
        }
        CharacterState::SuperAttacking { .. } => Animation::SuperSlam,
    };

    if current.0 == Some(desired) {
        return;
    }
    current.0 = Some(desired);

    const BLEND_DURATION: Duration = Duration::from_millis(150);
    if let Some(index) = player.animations.get(&desired) {
        let active = transitions.play(&mut animation_player, *index, BLEND_DURATION);
        if desired.looping() {
            active.repeat();
        }
    }
}
