use bevy::prelude::*;
use crate::shared::*;

/// Add a freshly spawned object to the live registry.
///
/// Returns false, leaving the registry untouched, when the id is taken.
pub fn register_object(registry: &mut ObjectRegistry, id: &str, entity: Entity) -> bool {
    if registry.contains(id) {
        warn!("Object id '{}' is already live; not registering {:?}", id, entity);
        return false;
    }
    registry.objects.insert(id.to_string(), entity);
    true
}

/// Remove an object from the level: drop it from the registry, despawn its
/// entity tree, and announce it so owned UI (hint toasts) goes with it.
///
/// Idempotent. Returns false when the id is no longer live.
pub fn destroy_object(
    commands: &mut Commands,
    registry: &mut ObjectRegistry,
    destroyed: &mut EventWriter<ObjectDestroyedEvent>,
    id: &str,
) -> bool {
    let Some(entity) = registry.objects.remove(id) else {
        return false;
    };
    commands.entity(entity).despawn_recursive();
    destroyed.send(ObjectDestroyedEvent { id: id.to_string() });
    debug!("Destroyed object '{}'", id);
    true
}
