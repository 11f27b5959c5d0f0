use bevy::prelude::*;
use crate::config::GameConfig;
use crate::objects::destroy_object;
use crate::save::{save_collected_item, save_inventory, DurableStore};
use crate::shared::*;

pub struct ItemsPlugin;

impl Plugin for ItemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            item_pickup
                .in_set(FrameSet::Act)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Items touching a player go into the inventory and leave the level.
///
/// Only a player overlapping the item this frame picks it up. The registry
/// check makes consumption single-shot even if two players reach an item in
/// the same frame, and the collected record keeps it gone after a reload. A
/// full inventory leaves the item in place and hints once per contact.
pub fn item_pickup(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut registry: ResMut<ObjectRegistry>,
    mut progress: ResMut<Progress>,
    mut durable: ResMut<DurableStore>,
    items: Query<(&GameObject, &Item, &CollisionEvents)>,
    mut pickups: EventWriter<ItemPickupEvent>,
    mut destroyed: EventWriter<ObjectDestroyedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for (object, item, events) in &items {
        if !events.touching_player_now() || !registry.contains(&object.id) {
            continue;
        }

        if !progress.add_item(&item.item_type) {
            if events.entered.iter().any(|id| is_player_id(id)) {
                toasts.send(ToastEvent {
                    message: "Inventory full!".into(),
                    duration_secs: config.hint_secs,
                    tone: ToastTone::Warning,
                    owner: Some(object.id.clone()),
                });
            }
            continue;
        }

        save_inventory(durable.store_mut(), progress.inventory());
        save_collected_item(durable.store_mut(), &object.id);
        pickups.send(ItemPickupEvent {
            item_type: item.item_type.clone(),
        });
        destroy_object(&mut commands, &mut registry, &mut destroyed, &object.id);
        info!(
            "Picked up '{}' from {} ({} held)",
            item.item_type,
            object.id,
            progress.player_item()
        );
    }
}
