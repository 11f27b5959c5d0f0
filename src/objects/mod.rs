mod draw;
mod lifecycle;

pub use draw::{animate_objects, canvas_to_world};
pub use lifecycle::{destroy_object, register_object};

use bevy::prelude::*;
use bevy::window::WindowResized;
use crate::shared::*;

pub struct ObjectsPlugin;

impl Plugin for ObjectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>();
        app.init_resource::<ObjectRegistry>();

        app.configure_sets(
            Update,
            (
                FrameSet::Draw,
                FrameSet::Collide,
                FrameSet::Act,
                FrameSet::Resolve,
            )
                .chain(),
        );

        // Window size is tracked in every state so a resize during the
        // victory screen is not lost.
        app.add_systems(
            Update,
            (track_window_size, resize_objects)
                .chain()
                .before(FrameSet::Draw),
        );

        app.add_systems(
            Update,
            animate_objects
                .in_set(FrameSet::Draw)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Copy the latest primary-window size into `Viewport`.
pub fn track_window_size(
    mut events: EventReader<WindowResized>,
    mut viewport: ResMut<Viewport>,
) {
    let Some(ev) = events.read().last() else {
        return;
    };
    let size = Vec2::new(ev.width, ev.height);
    if size.x <= 0.0 || size.y <= 0.0 || viewport.size == size {
        return;
    }
    info!("Viewport resized to {}x{}", size.x, size.y);
    viewport.size = size;
}

/// Rescale position, size, and step of every object to the current viewport.
pub fn resize_objects(viewport: Res<Viewport>, mut query: Query<&mut GameObject>) {
    if !viewport.is_changed() {
        return;
    }
    for mut object in &mut query {
        if object.scale != viewport.size {
            object.resize(viewport.size);
        }
    }
}
