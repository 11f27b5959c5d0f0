//! Durable progress: the held inventory and per-NPC key counts.
//!
//! Four records, read when a level is built and written straight after every
//! successful mutation:
//!
//! - `inventoryItems`: JSON array of item tags
//! - `npcKeyStates`: JSON object mapping NPC id to keys received
//! - `keySlotStates`: JSON object mapping slot id to keys inserted
//! - `collectedItems`: JSON array of item ids already picked up
//!
//! An absent or unreadable record means "no prior progress". The format has no
//! version; changing it requires clearing saved progress.

mod store;

pub use store::{KeyValueStore, MemoryStore};
#[cfg(target_arch = "wasm32")]
pub use store::BrowserStore;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::GameConfig;

pub const INVENTORY_KEY: &str = "inventoryItems";
pub const NPC_KEY_STATES_KEY: &str = "npcKeyStates";
pub const SLOT_KEY_STATES_KEY: &str = "keySlotStates";
pub const COLLECTED_ITEMS_KEY: &str = "collectedItems";

const ALL_KEYS: [&str; 4] = [
    INVENTORY_KEY,
    NPC_KEY_STATES_KEY,
    SLOT_KEY_STATES_KEY,
    COLLECTED_ITEMS_KEY,
];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The durable key-value backend for this session.
#[derive(Resource)]
pub struct DurableStore(pub Box<dyn KeyValueStore>);

impl DurableStore {
    pub fn memory() -> Self {
        Self(Box::new(MemoryStore::default()))
    }

    /// localStorage in the browser, a saves directory on native builds.
    pub fn platform_default(config: &GameConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = config;
            Self(Box::new(BrowserStore))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let dir = config
                .save_dir
                .as_ref()
                .map(std::path::PathBuf::from)
                .unwrap_or_else(FileStore::default_dir);
            Self(Box::new(FileStore::new(dir)))
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.0.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.0.as_mut()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

fn write_json<T: serde::Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

/// A saved record, or its empty value when absent or unreadable.
fn load_record<T: serde::de::DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match read_json::<T>(store, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring saved {}: {}", key, e);
            T::default()
        }
    }
}

fn save_record<T: serde::Serialize + std::fmt::Debug>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) {
    match write_json(store, key, value) {
        Ok(()) => debug!("Saved {}: {:?}", key, value),
        Err(e) => warn!("Could not save {}: {}", key, e),
    }
}

pub fn load_inventory(store: &dyn KeyValueStore) -> Vec<String> {
    load_record(store, INVENTORY_KEY)
}

pub fn save_inventory(store: &mut dyn KeyValueStore, items: &[String]) {
    save_record(store, INVENTORY_KEY, &items);
}

/// Saved key counts for every NPC.
pub fn load_npc_key_states(store: &dyn KeyValueStore) -> HashMap<String, u8> {
    load_record(store, NPC_KEY_STATES_KEY)
}

/// Update one NPC's entry, keeping every other NPC's count.
pub fn save_npc_keys(store: &mut dyn KeyValueStore, npc_id: &str, keys: u8) {
    let mut states = load_npc_key_states(store);
    states.insert(npc_id.to_string(), keys);
    save_record(store, NPC_KEY_STATES_KEY, &states);
}

/// Saved keys inserted into every slot.
pub fn load_slot_key_states(store: &dyn KeyValueStore) -> HashMap<String, u32> {
    load_record(store, SLOT_KEY_STATES_KEY)
}

pub fn save_slot_keys(store: &mut dyn KeyValueStore, slot_id: &str, keys: u32) {
    let mut states = load_slot_key_states(store);
    states.insert(slot_id.to_string(), keys);
    save_record(store, SLOT_KEY_STATES_KEY, &states);
}

/// Ids of items that were picked up and must not spawn again.
pub fn load_collected_items(store: &dyn KeyValueStore) -> HashSet<String> {
    load_record::<Vec<String>>(store, COLLECTED_ITEMS_KEY)
        .into_iter()
        .collect()
}

pub fn save_collected_item(store: &mut dyn KeyValueStore, item_id: &str) {
    let mut collected = load_record::<Vec<String>>(store, COLLECTED_ITEMS_KEY);
    if collected.iter().any(|id| id == item_id) {
        return;
    }
    collected.push(item_id.to_string());
    save_record(store, COLLECTED_ITEMS_KEY, &collected);
}

/// Forget all saved progress.
pub fn clear_progress(store: &mut dyn KeyValueStore) {
    for key in ALL_KEYS {
        if let Err(e) = store.remove(key) {
            warn!("Could not clear {}: {}", key, e);
        }
    }
    info!("Saved progress cleared");
}
