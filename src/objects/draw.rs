use bevy::prelude::*;
use crate::config::GameConfig;
use crate::shared::*;

/// Map a canvas box (top-left origin, y down) to the centre of the same box in
/// world space for a camera centred on the viewport.
pub fn canvas_to_world(position: Vec2, size: Vec2, viewport: Vec2, page_offset: f32) -> Vec2 {
    Vec2::new(
        position.x + size.x * 0.5 - viewport.x * 0.5,
        viewport.y * 0.5 - (position.y + page_offset) - size.y * 0.5,
    )
}

/// Draw pass: show the current frame at the object's size and place, then
/// count the draw towards the next frame.
pub fn animate_objects(
    config: Res<GameConfig>,
    viewport: Res<Viewport>,
    mut query: Query<(
        &GameObject,
        &mut SpriteAnimation,
        &mut Transform,
        Option<&mut Sprite>,
    )>,
) {
    for (object, mut animation, mut transform, sprite) in &mut query {
        let size = Vec2::new(object.width, object.height);

        if let Some(mut sprite) = sprite {
            sprite.custom_size = Some(size);
            if let Some(atlas) = sprite.texture_atlas.as_mut() {
                atlas.index = animation.atlas_index();
            }
        }

        let world = canvas_to_world(object.position, size, viewport.size, config.page_offset);
        transform.translation.x = world.x;
        transform.translation.y = world.y;

        animation.advance();
    }
}
