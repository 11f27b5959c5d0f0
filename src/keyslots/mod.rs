//! Key slots: locks that take keys from the player one at a time.
//!
//! Each accepted key counts toward the level tally in `LevelProgress`; the
//! slot itself is filled once it holds `required_keys`. A filled slot never
//! takes another key. Keys inserted are saved per slot.

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::save::{save_inventory, save_slot_keys, DurableStore};
use crate::shared::*;

pub struct KeySlotPlugin;

impl Plugin for KeySlotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (slot_approach_hints, place_key_in_slot)
                .in_set(FrameSet::Act)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

pub fn slot_approach_hints(
    config: Res<GameConfig>,
    slots: Query<(&GameObject, &KeySlot, &CollisionEvents)>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for (object, slot, events) in &slots {
        if slot.filled || !events.entered.iter().any(|id| is_player_id(id)) {
            continue;
        }
        toasts.send(ToastEvent {
            message: "Press Q to place key".into(),
            duration_secs: config.hint_secs,
            tone: ToastTone::Neutral,
            owner: Some(object.id.clone()),
        });
    }
}

/// On the give key, the slot the press resolves to takes one key.
pub fn place_key_in_slot(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    registry: Res<ObjectRegistry>,
    mut progress: ResMut<Progress>,
    mut level_progress: ResMut<LevelProgress>,
    mut durable: ResMut<DurableStore>,
    players: Query<&CollisionEvents, With<Player>>,
    npcs: Query<(), With<Npc>>,
    mut slots: Query<(&GameObject, &mut KeySlot)>,
    mut removed: EventWriter<ItemRemovedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.give {
        return;
    }

    let npcs_take_keys = level_progress.rule.npcs_take_keys();
    let target = give_target(&players, &registry, |entity| {
        slots.contains(entity) || (npcs_take_keys && npcs.contains(entity))
    });
    let Some(target) = target else {
        return;
    };
    let Some((object, mut slot)) = slots.iter_mut().find(|(object, _)| object.id == target) else {
        return;
    };

    let (message, tone) = match slot.take_key_from(&mut progress) {
        KeyTransfer::Accepted {
            held,
            wanted,
            completed,
        } => {
            level_progress.filled_slots += 1;
            save_inventory(durable.store_mut(), progress.inventory());
            save_slot_keys(durable.store_mut(), &object.id, slot.keys_inserted);
            removed.send(ItemRemovedEvent {
                item_type: KEY_ITEM.to_string(),
            });
            info!(
                "Slot {} took a key ({}/{}), level tally {}/{}",
                slot.slot_index,
                held,
                wanted,
                level_progress.filled_slots,
                level_progress.required_total
            );
            if completed {
                ("Key slot unlocked!".to_string(), ToastTone::Success)
            } else {
                (format!("Key placed! {}/{}", held, wanted), ToastTone::Success)
            }
        }
        KeyTransfer::AlreadyComplete => {
            ("This slot is already filled.".to_string(), ToastTone::Warning)
        }
        KeyTransfer::NoKey => ("You need a key to unlock this!".to_string(), ToastTone::Error),
    };

    toasts.send(ToastEvent {
        message,
        duration_secs: config.message_secs,
        tone,
        owner: Some(object.id.clone()),
    });
}
