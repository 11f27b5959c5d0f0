use bevy::prelude::*;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            player_movement
                .in_set(FrameSet::Act)
                .run_if(in_state(GameState::Playing)),
        );
        app.add_systems(
            Update,
            (end_interaction, begin_interaction)
                .chain()
                .in_set(FrameSet::Resolve)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Facing for a movement axis. Horizontal input wins on diagonals.
pub fn facing_for(axis: Vec2) -> Option<Facing> {
    if axis.x > 0.0 {
        Some(Facing::Right)
    } else if axis.x < 0.0 {
        Some(Facing::Left)
    } else if axis.y < 0.0 {
        Some(Facing::Up)
    } else if axis.y > 0.0 {
        Some(Facing::Down)
    } else {
        None
    }
}

/// Zero each velocity component that would push further into a solid the
/// player is already touching on that side.
pub fn blocked_velocity(mut velocity: Vec2, touch: SideFlags) -> Vec2 {
    if touch.left && velocity.x > 0.0 {
        velocity.x = 0.0;
    }
    if touch.right && velocity.x < 0.0 {
        velocity.x = 0.0;
    }
    if touch.top && velocity.y > 0.0 {
        velocity.y = 0.0;
    }
    if touch.bottom && velocity.y < 0.0 {
        velocity.y = 0.0;
    }
    velocity
}

/// Move each player one step along the input axis.
///
/// Stands still while a prompt is open. Contacts from this frame's collision
/// pass stop movement into NPCs and slots, and the result is kept inside the
/// viewport.
pub fn player_movement(
    input: Res<PlayerInput>,
    viewport: Res<Viewport>,
    registry: Res<ObjectRegistry>,
    solids: Query<(), With<Solid>>,
    mut players: Query<(&Player, &mut GameObject, &mut SpriteAnimation, &CollisionEvents)>,
) {
    for (player, mut object, mut animation, events) in &mut players {
        if player.is_interacting {
            object.velocity = Vec2::ZERO;
            continue;
        }

        if let Some(direction) = facing_for(input.move_axis) {
            animation.face(direction);
        }

        let mut velocity = input.move_axis * object.step;
        for contact in &events.contacts {
            let is_solid = registry
                .get(&contact.id)
                .is_some_and(|entity| solids.contains(entity));
            if is_solid {
                velocity = blocked_velocity(velocity, contact.touch.this);
            }
        }
        object.velocity = velocity;

        if velocity == Vec2::ZERO {
            continue;
        }
        let max = (viewport.size - Vec2::new(object.width, object.height)).max(Vec2::ZERO);
        object.position = (object.position + velocity).clamp(Vec2::ZERO, max);
    }
}

/// A quiz prompt freezes every player in place until it closes.
pub fn begin_interaction(
    mut prompts: EventReader<QuizPromptEvent>,
    mut players: Query<(&mut Player, &mut GameObject)>,
) {
    if prompts.read().count() == 0 {
        return;
    }
    for (mut player, mut object) in &mut players {
        player.is_interacting = true;
        object.velocity = Vec2::ZERO;
    }
}

pub fn end_interaction(
    mut closed: EventReader<PromptClosedEvent>,
    mut players: Query<&mut Player>,
) {
    if closed.read().count() == 0 {
        return;
    }
    for mut player in &mut players {
        player.is_interacting = false;
    }
}
