//! Headless integration tests for the adventure core.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic plugins (skipping input sampling and UI), and drive the player by
//! writing `PlayerInput` directly.
//!
//! Run with: `cargo test --test headless`

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::window::WindowResized;
use keyslot_adventure::collision::CollisionPlugin;
use keyslot_adventure::config::GameConfig;
use keyslot_adventure::items::ItemsPlugin;
use keyslot_adventure::keyslots::KeySlotPlugin;
use keyslot_adventure::level::*;
use keyslot_adventure::npcs::NpcPlugin;
use keyslot_adventure::objects::{destroy_object, ObjectsPlugin};
use keyslot_adventure::player::PlayerPlugin;
use keyslot_adventure::save::{
    DurableStore, KeyValueStore, COLLECTED_ITEMS_KEY, INVENTORY_KEY, NPC_KEY_STATES_KEY,
    SLOT_KEY_STATES_KEY,
};
use keyslot_adventure::shared::*;
use keyslot_adventure::ui::toast::{
    dismiss_owned_toasts, handle_toast_events, spawn_toast_container, update_toasts, ToastItem,
};
use keyslot_adventure::victory::VictoryPlugin;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with every gameplay plugin registered but NO
/// rendering, windowing, asset loading, or keyboard sampling.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.insert_resource(GameConfig::default())
        .insert_resource(DurableStore::memory())
        .insert_resource(LevelRng::from_seed(Some(7)))
        .init_resource::<PlayerInput>()
        .init_resource::<KeyBindings>()
        .init_resource::<VictoryCount>()
        .init_resource::<ToastLog>();

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<ItemPickupEvent>()
        .add_event::<ItemRemovedEvent>()
        .add_event::<ToastEvent>()
        .add_event::<ObjectDestroyedEvent>()
        .add_event::<VictoryEvent>()
        .add_event::<QuizPromptEvent>()
        .add_event::<PromptClosedEvent>()
        .add_event::<RestartEvent>();

    // Normally registered by WindowPlugin.
    app.add_event::<WindowResized>();

    // ── Gameplay Plugins ─────────────────────────────────────────────────
    app.add_plugins((
        ObjectsPlugin,
        CollisionPlugin,
        LevelPlugin,
        PlayerPlugin,
        ItemsPlugin,
        NpcPlugin,
        KeySlotPlugin,
        VictoryPlugin,
    ));

    app.add_systems(Update, (count_victories, record_toasts).after(FrameSet::Resolve));
    app
}

#[derive(Resource, Default)]
struct VictoryCount(usize);

fn count_victories(mut events: EventReader<VictoryEvent>, mut count: ResMut<VictoryCount>) {
    count.0 += events.read().count();
}

/// Every toast requested so far, in send order.
#[derive(Resource, Default)]
struct ToastLog(Vec<ToastEvent>);

fn record_toasts(mut events: EventReader<ToastEvent>, mut log: ResMut<ToastLog>) {
    log.0.extend(events.read().cloned());
}

fn last_toast(app: &App) -> Option<(String, Option<String>)> {
    app.world()
        .resource::<ToastLog>()
        .0
        .last()
        .map(|toast| (toast.message.clone(), toast.owner.clone()))
}

fn toasted(app: &App, message: &str) -> bool {
    app.world()
        .resource::<ToastLog>()
        .0
        .iter()
        .any(|toast| toast.message.contains(message))
}

/// Builds the app around `level`, then ticks twice: once to spawn it in
/// `Loading`, once to enter `Playing` and run the first frame.
fn boot(level: LevelDef) -> App {
    boot_with_store(level, |_| {})
}

fn boot_with_store(level: LevelDef, seed: impl FnOnce(&mut dyn KeyValueStore)) -> App {
    let mut app = build_test_app();
    app.insert_resource(ActiveLevel(level));
    seed(app.world_mut().resource_mut::<DurableStore>().store_mut());
    app.update();
    app.update();
    app
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn set_input(app: &mut App, input: PlayerInput) {
    *app.world_mut().resource_mut::<PlayerInput>() = input;
}

/// Holds `input` for exactly one frame.
fn press(app: &mut App, input: PlayerInput) {
    set_input(app, input);
    app.update();
    set_input(app, PlayerInput::default());
}

fn give() -> PlayerInput {
    PlayerInput {
        give: true,
        ..default()
    }
}

fn object_of(app: &mut App, id: &str) -> Option<GameObject> {
    let world = app.world_mut();
    let mut query = world.query::<&GameObject>();
    query.iter(world).find(|object| object.id == id).cloned()
}

/// Teleports a live object; the next frame's collision pass sees it there.
fn place(app: &mut App, id: &str, position: Vec2) {
    let world = app.world_mut();
    let mut query = world.query::<&mut GameObject>();
    for mut object in query.iter_mut(world) {
        if object.id == id {
            object.position = position;
        }
    }
}

fn slot_of(app: &mut App, id: &str) -> Option<KeySlot> {
    let world = app.world_mut();
    let mut query = world.query::<(&GameObject, &KeySlot)>();
    query
        .iter(world)
        .find(|(object, _)| object.id == id)
        .map(|(_, slot)| slot.clone())
}

fn npc_of(app: &mut App, id: &str) -> Option<Npc> {
    let world = app.world_mut();
    let mut query = world.query::<(&GameObject, &Npc)>();
    query
        .iter(world)
        .find(|(object, _)| object.id == id)
        .map(|(_, npc)| npc.clone())
}

fn stored(app: &App, key: &str) -> Option<String> {
    app.world()
        .resource::<DurableStore>()
        .store()
        .get(key)
        .expect("memory store reads")
}

// ─────────────────────────────────────────────────────────────────────────────
// Level Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// Objects are 72px squares on the default 1280x720 viewport.
fn sprite(id: &str, x: f32, y: f32) -> SpriteData {
    SpriteData {
        id: id.into(),
        greeting: None,
        src: "images/test.png".into(),
        pixels: PixelSize {
            width: 32.0,
            height: 32.0,
        },
        grid: SheetGrid {
            rows: 1,
            columns: 1,
        },
        frames: DirectionFrames {
            down: Some(FrameRange {
                row: 0,
                start: 0,
                columns: 1,
            }),
            ..default()
        },
        scale_factor: 10.0,
        step_factor: STEP_FACTOR,
        animation_rate: ANIMATION_RATE,
        position: CanvasPoint::new(x, y),
        hitbox: Hitbox::default(),
    }
}

fn player_at(x: f32, y: f32) -> ObjectDescriptor {
    ObjectDescriptor {
        kind: ObjectKind::Player,
        data: sprite("player", x, y),
    }
}

fn key_at(id: &str, x: f32, y: f32) -> ObjectDescriptor {
    ObjectDescriptor {
        kind: ObjectKind::Item(ItemDef::default()),
        data: sprite(id, x, y),
    }
}

fn npc_at(id: &str, x: f32, y: f32) -> ObjectDescriptor {
    ObjectDescriptor {
        kind: ObjectKind::Npc(NpcDef::default()),
        data: sprite(id, x, y),
    }
}

fn slot_at(id: &str, x: f32, y: f32, required_keys: u32) -> ObjectDescriptor {
    ObjectDescriptor {
        kind: ObjectKind::KeySlot(KeySlotDef {
            slot_index: 0,
            required_keys,
        }),
        data: sprite(id, x, y),
    }
}

fn level(victory: VictoryRule, objects: Vec<ObjectDescriptor>) -> LevelDef {
    LevelDef {
        name: "test".into(),
        authored_size: CanvasPoint::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        victory,
        objects,
    }
}

fn four_npc_rule() -> VictoryRule {
    VictoryRule::NpcKeys {
        keys_per_npc: 2,
        min_npcs: 4,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot & Loading
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_spawns_level_and_enters_playing() {
    let mut app = boot(prison_level());

    assert_eq!(state(&app), GameState::Playing);
    let registry = app.world().resource::<ObjectRegistry>();
    assert_eq!(registry.len(), prison_level().objects.len());
    assert!(registry.contains("player"));
    assert!(registry.contains("cell_door"));

    let slot_keys = app.world().resource::<LevelProgress>().required_total;
    assert_eq!(slot_keys, 2);
    assert!(object_of(&mut app, "key_1").is_some());
}

#[test]
fn test_missing_sprite_aborts_the_load() {
    let mut broken = key_at("key_1", 400.0, 400.0);
    broken.data.src = String::new();
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(0.0, 0.0), broken],
    ));
    app.update();
    app.update();

    assert_eq!(state(&app), GameState::Loading, "an invalid level never plays");
    assert!(app.world().resource::<ObjectRegistry>().is_empty());
    assert!(object_of(&mut app, "player").is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Keys, Slots & Victory
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_two_keys_in_a_two_key_slot_win_exactly_once() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![
            player_at(100.0, 100.0),
            key_at("key_1", 100.0, 100.0),
            key_at("key_2", 120.0, 100.0),
            slot_at("door", 150.0, 100.0, 2),
        ],
    ));

    // Both keys were touching on the first Playing frame.
    assert_eq!(app.world().resource::<Progress>().player_item(), 2);
    let registry = app.world().resource::<ObjectRegistry>();
    assert!(!registry.contains("key_1"));
    assert!(!registry.contains("key_2"));
    assert_eq!(
        stored(&app, INVENTORY_KEY).as_deref(),
        Some("[\"key\",\"key\"]")
    );

    press(&mut app, give());
    assert_eq!(app.world().resource::<LevelProgress>().filled_slots, 1);
    assert_eq!(app.world().resource::<VictoryCount>().0, 0);
    assert_eq!(state(&app), GameState::Playing);

    press(&mut app, give());
    assert_eq!(app.world().resource::<LevelProgress>().filled_slots, 2);
    assert!(app.world().resource::<LevelProgress>().victory_achieved);
    assert_eq!(app.world().resource::<Progress>().player_item(), 0);

    app.update();
    assert_eq!(state(&app), GameState::Victory);

    // Further giving and ticking never fires again.
    press(&mut app, give());
    app.update();
    assert_eq!(app.world().resource::<VictoryCount>().0, 1);
}

#[test]
fn test_single_key_slot_alone_is_not_a_victory() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![
            player_at(100.0, 100.0),
            key_at("key_1", 100.0, 100.0),
            slot_at("door", 150.0, 100.0, 1),
        ],
    ));
    press(&mut app, give());
    app.update();

    let level_progress = app.world().resource::<LevelProgress>();
    assert_eq!(level_progress.filled_slots, 1);
    assert!(!level_progress.victory_achieved);
    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn test_giving_without_a_key_changes_nothing() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(100.0, 100.0), slot_at("door", 150.0, 100.0, 2)],
    ));
    press(&mut app, give());

    assert_eq!(app.world().resource::<LevelProgress>().filled_slots, 0);
    assert_eq!(app.world().resource::<Progress>().player_item(), 0);
    assert_eq!(
        last_toast(&app),
        Some(("You need a key to unlock this!".to_string(), Some("door".to_string())))
    );
}

#[test]
fn test_giving_to_a_filled_slot_keeps_the_key() {
    let mut app = boot_with_store(
        level(
            VictoryRule::SlotsFilled,
            vec![
                player_at(100.0, 100.0),
                slot_at("door", 150.0, 100.0, 1),
                slot_at("gate", 900.0, 500.0, 1),
            ],
        ),
        |store| {
            store
                .set(INVENTORY_KEY, "[\"key\",\"key\"]")
                .expect("memory store writes");
        },
    );

    press(&mut app, give());
    assert_eq!(
        last_toast(&app),
        Some(("Key slot unlocked!".to_string(), Some("door".to_string())))
    );

    press(&mut app, give());
    assert_eq!(
        last_toast(&app),
        Some(("This slot is already filled.".to_string(), Some("door".to_string())))
    );
    assert_eq!(slot_of(&mut app, "door").map(|slot| slot.keys_inserted), Some(1));
    assert_eq!(app.world().resource::<LevelProgress>().filled_slots, 1);
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);
}

#[test]
fn test_one_press_feeds_only_one_receiver() {
    let mut app = boot_with_store(
        level(
            four_npc_rule(),
            vec![
                player_at(100.0, 100.0),
                npc_at("a", 150.0, 100.0),
                slot_at("door", 100.0, 150.0, 2),
            ],
        ),
        |store| {
            store
                .set(INVENTORY_KEY, "[\"key\",\"key\"]")
                .expect("memory store writes");
        },
    );

    press(&mut app, give());

    let npc_keys = npc_of(&mut app, "a").map_or(0, |npc| u32::from(npc.keys_received));
    let slot_keys = slot_of(&mut app, "door").map_or(0, |slot| slot.keys_inserted);
    assert_eq!(npc_keys + slot_keys, 1, "npc took {npc_keys}, slot took {slot_keys}");
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);
    assert_eq!(stored(&app, INVENTORY_KEY).as_deref(), Some("[\"key\"]"));
}

#[test]
fn test_npcs_refuse_keys_in_a_slot_level() {
    let mut app = boot_with_store(prison_level(), |store| {
        store
            .set(INVENTORY_KEY, "[\"key\",\"key\"]")
            .expect("memory store writes");
    });
    assert_eq!(app.world().resource::<LevelProgress>().rule, VictoryRule::SlotsFilled);

    let questgiver = object_of(&mut app, "Questgiver").expect("questgiver is live");
    place(&mut app, "player", questgiver.position);
    app.update();

    press(&mut app, give());
    press(&mut app, give());

    assert_eq!(
        npc_of(&mut app, "Questgiver").map(|npc| npc.keys_received),
        Some(0)
    );
    assert_eq!(app.world().resource::<Progress>().player_item(), 2);
    assert_eq!(app.world().resource::<LevelProgress>().filled_slots, 0);
    assert_eq!(stored(&app, NPC_KEY_STATES_KEY), None);
    assert_eq!(
        last_toast(&app),
        Some(("This NPC does not need keys.".to_string(), Some("Questgiver".to_string())))
    );
    assert!(!toasted(&app, "Press Q to give a key"));
    assert!(!toasted(&app, "Key given!"));
}

#[test]
fn test_three_of_four_full_npcs_is_not_a_victory() {
    let mut app = boot_with_store(
        level(
            four_npc_rule(),
            vec![
                player_at(100.0, 100.0),
                npc_at("a", 600.0, 100.0),
                npc_at("b", 800.0, 100.0),
                npc_at("c", 1000.0, 100.0),
                npc_at("d", 150.0, 100.0),
            ],
        ),
        |store| {
            store
                .set(NPC_KEY_STATES_KEY, "{\"a\":2,\"b\":2,\"c\":2}")
                .expect("memory store writes");
        },
    );

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(npc_of(&mut app, "a").map(|npc| npc.keys_received), Some(2));
    assert_eq!(npc_of(&mut app, "d").map(|npc| npc.keys_received), Some(0));
    assert!(!app.world().resource::<LevelProgress>().victory_achieved);
    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn test_giving_to_an_npc_without_keys() {
    let mut app = boot(level(
        four_npc_rule(),
        vec![player_at(100.0, 100.0), npc_at("a", 150.0, 100.0)],
    ));
    assert!(toasted(&app, "has 0/2 keys. Press Q to give a key."));

    press(&mut app, give());

    assert_eq!(
        last_toast(&app),
        Some(("You don't have any keys!".to_string(), Some("a".to_string())))
    );
    assert_eq!(npc_of(&mut app, "a").map(|npc| npc.keys_received), Some(0));
}

#[test]
fn test_a_full_npc_turns_keys_away() {
    let mut app = boot_with_store(
        level(
            four_npc_rule(),
            vec![player_at(100.0, 100.0), npc_at("a", 150.0, 100.0)],
        ),
        |store| {
            store
                .set(NPC_KEY_STATES_KEY, "{\"a\":2}")
                .expect("memory store writes");
            store
                .set(INVENTORY_KEY, "[\"key\"]")
                .expect("memory store writes");
        },
    );

    press(&mut app, give());

    assert_eq!(
        last_toast(&app),
        Some(("This NPC already has 2 keys!".to_string(), Some("a".to_string())))
    );
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);
    assert_eq!(npc_of(&mut app, "a").map(|npc| npc.keys_received), Some(2));
}

#[test]
fn test_last_npc_receiving_its_keys_wins() {
    let mut app = boot_with_store(
        level(
            four_npc_rule(),
            vec![
                player_at(100.0, 100.0),
                npc_at("a", 600.0, 100.0),
                npc_at("b", 800.0, 100.0),
                npc_at("c", 1000.0, 100.0),
                npc_at("d", 150.0, 100.0),
            ],
        ),
        |store| {
            store
                .set(NPC_KEY_STATES_KEY, "{\"a\":2,\"b\":2,\"c\":2}")
                .expect("memory store writes");
            store
                .set(INVENTORY_KEY, "[\"key\",\"key\",\"key\"]")
                .expect("memory store writes");
        },
    );
    assert_eq!(app.world().resource::<Progress>().player_item(), 3);

    press(&mut app, give());
    assert_eq!(npc_of(&mut app, "d").map(|npc| npc.keys_received), Some(1));
    assert!(!app.world().resource::<LevelProgress>().victory_achieved);

    press(&mut app, give());
    assert!(app.world().resource::<LevelProgress>().victory_achieved);
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);

    let states = stored(&app, NPC_KEY_STATES_KEY).expect("npc states saved");
    assert!(states.contains("\"d\":2"), "saved states were {states}");
    assert!(states.contains("\"a\":2"));
    assert_eq!(stored(&app, INVENTORY_KEY).as_deref(), Some("[\"key\"]"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence & Restart
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_saved_inventory_survives_a_reload() {
    let mut app = boot_with_store(
        level(
            VictoryRule::SlotsFilled,
            vec![player_at(100.0, 100.0), npc_at("a", 600.0, 100.0)],
        ),
        |store| {
            store
                .set(INVENTORY_KEY, "[\"key\",\"spoon\"]")
                .expect("memory store writes");
            store
                .set(NPC_KEY_STATES_KEY, "{\"a\":9}")
                .expect("memory store writes");
        },
    );

    let progress = app.world().resource::<Progress>();
    assert_eq!(progress.inventory(), &["key".to_string(), "spoon".to_string()]);
    assert_eq!(progress.player_item(), 2);
    assert_eq!(
        npc_of(&mut app, "a").map(|npc| npc.keys_received),
        Some(KEYS_PER_NPC),
        "saved counts are clamped to the NPC's maximum"
    );

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Loading);
    app.update();
    app.update();

    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<Progress>().player_item(), 2);
    assert_eq!(app.world().resource::<ObjectRegistry>().len(), 2);
}

fn reload(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Loading);
    app.update();
    app.update();
}

#[test]
fn test_collected_items_stay_gone_after_a_reload() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![
            player_at(100.0, 100.0),
            key_at("key_1", 100.0, 100.0),
            slot_at("door", 150.0, 100.0, 2),
        ],
    ));
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);
    assert_eq!(
        stored(&app, COLLECTED_ITEMS_KEY).as_deref(),
        Some("[\"key_1\"]")
    );

    reload(&mut app);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);
    assert!(!app.world().resource::<ObjectRegistry>().contains("key_1"));
    assert!(object_of(&mut app, "key_1").is_none());

    press(&mut app, give());
    assert_eq!(stored(&app, SLOT_KEY_STATES_KEY).as_deref(), Some("{\"door\":1}"));

    reload(&mut app);
    assert_eq!(app.world().resource::<Progress>().player_item(), 0);
    assert_eq!(slot_of(&mut app, "door").map(|slot| slot.keys_inserted), Some(1));
    assert_eq!(app.world().resource::<LevelProgress>().filled_slots, 1);
    assert!(!app.world().resource::<ObjectRegistry>().contains("key_1"));
}

#[test]
fn test_restart_clears_saved_progress_and_respawns() {
    let mut app = boot_with_store(
        level(
            VictoryRule::SlotsFilled,
            vec![player_at(100.0, 100.0), key_at("key_1", 100.0, 400.0)],
        ),
        |store| {
            store
                .set(INVENTORY_KEY, "[\"key\"]")
                .expect("memory store writes");
        },
    );
    assert_eq!(app.world().resource::<Progress>().player_item(), 1);

    app.world_mut().send_event(RestartEvent);
    app.update();
    app.update();
    app.update();

    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<Progress>().player_item(), 0);
    assert_eq!(stored(&app, INVENTORY_KEY), None);
    assert_eq!(stored(&app, NPC_KEY_STATES_KEY), None);
    assert_eq!(stored(&app, COLLECTED_ITEMS_KEY), None);
    assert!(app.world().resource::<ObjectRegistry>().contains("key_1"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Object Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_destroying_an_object_twice_is_harmless() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(100.0, 100.0), key_at("key_1", 600.0, 400.0)],
    ));

    let result = app.world_mut().run_system_once(
        |mut commands: Commands,
         mut registry: ResMut<ObjectRegistry>,
         mut destroyed: EventWriter<ObjectDestroyedEvent>| {
            let first = destroy_object(&mut commands, &mut registry, &mut destroyed, "key_1");
            let second = destroy_object(&mut commands, &mut registry, &mut destroyed, "key_1");
            (first, second)
        },
    );
    assert_eq!(result.expect("system runs"), (true, false));

    assert!(!app.world().resource::<ObjectRegistry>().contains("key_1"));
    assert!(object_of(&mut app, "key_1").is_none());
    let destroyed = app.world().resource::<Events<ObjectDestroyedEvent>>();
    assert_eq!(destroyed.len(), 1);
}

#[test]
fn test_destroying_an_owner_dismisses_its_toast() {
    let mut app = build_test_app();
    app.add_systems(Startup, spawn_toast_container);
    app.add_systems(
        Update,
        (dismiss_owned_toasts, handle_toast_events, update_toasts)
            .chain()
            .after(FrameSet::Resolve),
    );
    app.insert_resource(ActiveLevel(level(
        VictoryRule::SlotsFilled,
        vec![
            player_at(100.0, 100.0),
            key_at("key_1", 100.0, 100.0),
            npc_at("a", 600.0, 400.0),
        ],
    )));
    app.world_mut()
        .resource_mut::<DurableStore>()
        .store_mut()
        .set(INVENTORY_KEY, "[\"key\",\"key\",\"key\",\"key\"]")
        .expect("memory store writes");
    app.update();
    app.update();

    fn toasts_owned_by(app: &mut App, id: &str) -> usize {
        let world = app.world_mut();
        let mut query = world.query::<&ToastItem>();
        query
            .iter(world)
            .filter(|toast| toast.owner.as_deref() == Some(id))
            .count()
    }

    assert_eq!(
        last_toast(&app),
        Some(("Inventory full!".to_string(), Some("key_1".to_string())))
    );
    assert_eq!(toasts_owned_by(&mut app, "key_1"), 1);

    let destroyed = app.world_mut().run_system_once(
        |mut commands: Commands,
         mut registry: ResMut<ObjectRegistry>,
         mut destroyed: EventWriter<ObjectDestroyedEvent>| {
            destroy_object(&mut commands, &mut registry, &mut destroyed, "key_1")
        },
    );
    assert!(destroyed.expect("system runs"));
    app.update();

    assert_eq!(toasts_owned_by(&mut app, "key_1"), 0);
}

#[test]
fn test_window_resize_rescales_objects() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(640.0, 360.0)],
    ));

    app.world_mut().send_event(WindowResized {
        window: Entity::PLACEHOLDER,
        width: 640.0,
        height: 1440.0,
    });
    app.update();

    assert_eq!(
        app.world().resource::<Viewport>().size,
        Vec2::new(640.0, 1440.0)
    );
    let player = object_of(&mut app, "player").expect("player is live");
    assert_eq!(player.position, Vec2::new(320.0, 720.0));
    assert_eq!(player.size, 1440.0 / 10.0);
    assert_eq!(player.step, Vec2::new(640.0, 1440.0) / STEP_FACTOR);
}

// ─────────────────────────────────────────────────────────────────────────────
// Player Movement & Prompts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_item_ignores_a_player_that_walked_away() {
    let mut app = boot_with_store(
        level(
            VictoryRule::SlotsFilled,
            vec![
                player_at(100.0, 100.0),
                key_at("key_1", 150.0, 100.0),
                npc_at("rock", 200.0, 100.0),
            ],
        ),
        |store| {
            store
                .set(INVENTORY_KEY, "[\"key\",\"key\",\"key\",\"key\"]")
                .expect("memory store writes");
        },
    );
    assert!(app.world().resource::<ObjectRegistry>().contains("key_1"));

    // The key keeps touching the rock, so its contact list never empties.
    place(&mut app, "player", Vec2::new(900.0, 500.0));
    app.update();
    *app.world_mut().resource_mut::<Progress>() = Progress::with_capacity(4);
    app.update();
    app.update();

    assert!(app.world().resource::<ObjectRegistry>().contains("key_1"));
    assert_eq!(app.world().resource::<Progress>().player_item(), 0);
}

#[test]
fn test_movement_is_blocked_by_a_solid_npc() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(200.0, 100.0), npc_at("guard", 260.0, 100.0)],
    ));

    let walk_right = PlayerInput {
        move_axis: Vec2::new(1.0, 0.0),
        ..default()
    };
    set_input(&mut app, walk_right);
    app.update();
    app.update();
    let player = object_of(&mut app, "player").expect("player is live");
    assert_eq!(player.position.x, 200.0, "walking into the NPC goes nowhere");

    let walk_left = PlayerInput {
        move_axis: Vec2::new(-1.0, 0.0),
        ..default()
    };
    set_input(&mut app, walk_left);
    app.update();
    let player = object_of(&mut app, "player").expect("player is live");
    assert!(player.position.x < 200.0, "walking away is allowed");
}

#[test]
fn test_player_stays_inside_the_viewport() {
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(0.0, 0.0)],
    ));

    set_input(
        &mut app,
        PlayerInput {
            move_axis: Vec2::new(-1.0, -1.0),
            ..default()
        },
    );
    for _ in 0..3 {
        app.update();
    }
    let player = object_of(&mut app, "player").expect("player is live");
    assert_eq!(player.position, Vec2::ZERO);
}

#[test]
fn test_quiz_prompt_freezes_player_until_exhausted() {
    let mut quizzer = npc_at("map", 150.0, 100.0);
    quizzer.kind = ObjectKind::Npc(NpcDef {
        quiz: Some(QuizDef {
            title: "Linux".into(),
            questions: vec!["ls?".into(), "cd?".into()],
        }),
        ..default()
    });
    let mut app = boot(level(
        VictoryRule::SlotsFilled,
        vec![player_at(100.0, 100.0), quizzer],
    ));

    press(
        &mut app,
        PlayerInput {
            interact: true,
            ..default()
        },
    );
    assert_eq!(
        app.world().resource::<PromptState>().open.as_deref(),
        Some("map")
    );
    let frozen = {
        let world = app.world_mut();
        let mut query = world.query::<&Player>();
        query.iter(world).all(|player| player.is_interacting)
    };
    assert!(frozen);

    let confirm = PlayerInput {
        confirm: true,
        ..default()
    };
    press(&mut app, confirm.clone());
    assert!(app.world().resource::<PromptState>().open.is_some(), "second question shown");

    press(&mut app, confirm);
    assert!(app.world().resource::<PromptState>().open.is_none());
    let frozen = {
        let world = app.world_mut();
        let mut query = world.query::<&Player>();
        query.iter(world).any(|player| player.is_interacting)
    };
    assert!(!frozen);

    // Exhausted: interacting again only greets.
    press(
        &mut app,
        PlayerInput {
            interact: true,
            ..default()
        },
    );
    assert!(app.world().resource::<PromptState>().open.is_none());
}
