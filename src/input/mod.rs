use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            .add_systems(PreUpdate, reset_and_read_input);
    }
}

/// The single point where keyboard state becomes game actions.
///
/// Movement is held-key, one step per axis per frame. Every other action is a
/// just-pressed edge, so a press is seen by exactly one frame.
pub fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    // Canvas space: up is negative y.
    let mut axis = Vec2::ZERO;
    if keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp) {
        axis.y -= 1.0;
    }
    if keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown) {
        axis.y += 1.0;
    }
    if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    input.move_axis = axis;

    input.interact = keys.just_pressed(bindings.interact);
    input.give = keys.just_pressed(bindings.give);
    input.confirm = keys.just_pressed(bindings.confirm);
    input.cancel = keys.just_pressed(bindings.cancel);
    input.restart = keys.just_pressed(bindings.restart);
}
