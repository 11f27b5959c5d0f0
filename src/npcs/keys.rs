//! Key exchange: the give key moves one key from the player to an NPC.

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::save::{save_inventory, save_npc_keys, DurableStore};
use crate::shared::*;
use super::touched_by_player;

/// Show an NPC's key status when a player first walks into it, in levels
/// where NPCs collect keys.
pub fn npc_approach_hints(
    config: Res<GameConfig>,
    progress: Res<Progress>,
    level_progress: Res<LevelProgress>,
    npcs: Query<(&GameObject, &Npc, &CollisionEvents)>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !level_progress.rule.npcs_take_keys() {
        return;
    }
    for (object, npc, events) in &npcs {
        if !events.entered.iter().any(|id| is_player_id(id)) {
            continue;
        }
        toasts.send(ToastEvent {
            message: format!(
                "{} has {}/{} keys. Press Q to give a key.",
                npc.greeting.text(&progress),
                npc.keys_received,
                npc.max_keys
            ),
            duration_secs: config.hint_secs,
            tone: ToastTone::Neutral,
            owner: Some(object.id.clone()),
        });
    }
}

/// On the give key, the NPC the press resolves to takes one key.
///
/// Both durable records are written straight after a successful transfer. In
/// levels won through slots NPCs refuse keys outright.
pub fn give_key_to_npc(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    level_progress: Res<LevelProgress>,
    registry: Res<ObjectRegistry>,
    mut progress: ResMut<Progress>,
    mut durable: ResMut<DurableStore>,
    players: Query<&CollisionEvents, With<Player>>,
    slots: Query<(), With<KeySlot>>,
    mut npcs: Query<(&GameObject, &mut Npc)>,
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

    if !npcs_take_keys {
        if target.is_some() {
            return;
        }
        if let Some((object, _)) = npcs
            .iter()
            .find(|(object, _)| touched_by_player(&players, &object.id))
        {
            toasts.send(ToastEvent {
                message: "This NPC does not need keys.".into(),
                duration_secs: config.message_secs,
                tone: ToastTone::Neutral,
                owner: Some(object.id.clone()),
            });
        }
        return;
    }

    let Some(target) = target else {
        return;
    };
    let Some((object, mut npc)) = npcs.iter_mut().find(|(object, _)| object.id == target) else {
        return;
    };

    let (message, tone) = match npc.take_key_from(&mut progress) {
        KeyTransfer::Accepted { held, wanted, .. } => {
            save_inventory(durable.store_mut(), progress.inventory());
            save_npc_keys(durable.store_mut(), &object.id, npc.keys_received);
            removed.send(ItemRemovedEvent {
                item_type: KEY_ITEM.to_string(),
            });
            info!("{} received a key ({}/{})", object.id, held, wanted);
            (
                format!("Key given! NPC has {}/{} keys", held, wanted),
                ToastTone::Success,
            )
        }
        KeyTransfer::NoKey => ("You don't have any keys!".to_string(), ToastTone::Error),
        KeyTransfer::AlreadyComplete => (
            format!("This NPC already has {} keys!", npc.max_keys),
            ToastTone::Warning,
        ),
    };

    toasts.send(ToastEvent {
        message,
        duration_secs: config.message_secs,
        tone,
        owner: Some(object.id.clone()),
    });
}
