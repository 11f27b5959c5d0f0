//! Axis-aligned hitbox collision between level objects.
//!
//! Each box is shrunk inward by its own hitbox percentages before testing:
//! left and right by `width * width_percentage`, the top by
//! `height * height_percentage`. The bottom edge is never reduced, which keeps
//! ground contact forgiving.

use bevy::prelude::*;
use crate::shared::*;

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            collision_checks
                .in_set(FrameSet::Collide)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Screen-space box after hitbox reduction.
pub fn hitbox_rect(rect: Rect, hitbox: &Hitbox) -> Rect {
    let width_reduction = rect.width() * hitbox.width_percentage;
    let height_reduction = rect.height() * hitbox.height_percentage;
    Rect {
        min: Vec2::new(rect.min.x + width_reduction, rect.min.y + height_reduction),
        max: Vec2::new(rect.max.x - width_reduction, rect.max.y),
    }
}

/// Strict overlap on both axes. Boxes that only share an edge do not hit.
pub fn is_hit(this: Rect, other: Rect) -> bool {
    this.min.x < other.max.x
        && this.max.x > other.min.x
        && this.min.y < other.max.y
        && this.max.y > other.min.y
}

/// Edges of `other` that `this` is pressing on. Y grows downward, so
/// `top` means `this` sits above `other` with its bottom edge at or past
/// `other`'s top edge.
pub fn side_flags(this: Rect, other: Rect) -> SideFlags {
    SideFlags {
        top: this.max.y >= other.min.y && this.min.y < other.min.y,
        bottom: this.min.y <= other.max.y && this.max.y > other.max.y,
        left: this.max.x >= other.min.x && this.min.x < other.min.x,
        right: this.min.x <= other.max.x && this.max.x > other.max.x,
    }
}

pub fn touch_points(this: Rect, other: Rect) -> TouchPoints {
    TouchPoints {
        this: side_flags(this, other),
        other: side_flags(other, this),
    }
}

/// Snapshot every object's reduced box, then fold each object's hits into its
/// `CollisionEvents`. The snapshot keeps the pass independent of query order.
pub fn collision_checks(
    mut query: Query<(&GameObject, Option<&Hitbox>, &mut CollisionEvents)>,
) {
    let boxes: Vec<(String, Rect)> = query
        .iter()
        .map(|(object, hitbox, _)| {
            let hitbox = hitbox.copied().unwrap_or_default();
            (object.id.clone(), hitbox_rect(object.rect(), &hitbox))
        })
        .collect();

    for (object, _, mut events) in &mut query {
        let Some((_, this_rect)) = boxes.iter().find(|(id, _)| *id == object.id) else {
            continue;
        };

        let contacts: Vec<Contact> = boxes
            .iter()
            .filter(|(id, _)| *id != object.id)
            .filter(|(_, other_rect)| is_hit(*this_rect, *other_rect))
            .map(|(id, other_rect)| Contact {
                id: id.clone(),
                touch: touch_points(*this_rect, *other_rect),
            })
            .collect();

        for id in contacts.iter().map(|c| &c.id) {
            if !events.contains(id) {
                debug!("{} touched {}", object.id, id);
            }
        }
        events.record_frame(contacts);
    }
}
