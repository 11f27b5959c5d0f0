//! Level lifecycle: validate the active level, spawn its objects, tear them
//! down again, and restart from scratch.

mod def;
mod prison;

pub use def::*;
pub use prison::prison_level;

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::objects::register_object;
use crate::save::{
    clear_progress, load_collected_items, load_inventory, load_npc_key_states,
    load_slot_key_states, DurableStore,
};
use crate::shared::*;

const Z_ITEM: f32 = 1.0;
const Z_SLOT: f32 = 2.0;
const Z_NPC: f32 = 3.0;
const Z_PLAYER: f32 = 4.0;

/// The level spawned on every entry into `GameState::Loading`.
#[derive(Resource, Debug, Clone)]
pub struct ActiveLevel(pub LevelDef);

impl Default for ActiveLevel {
    fn default() -> Self {
        Self(prison_level())
    }
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveLevel>()
            .init_resource::<GameConfig>()
            .init_resource::<Progress>()
            .init_resource::<LevelProgress>()
            .init_resource::<PromptState>()
            .init_resource::<LevelRng>();

        app.add_systems(
            OnEnter(GameState::Loading),
            (teardown_level, spawn_level).chain(),
        );
        app.add_systems(Update, handle_restart);
    }
}

/// Despawn everything the previous level left behind.
pub fn teardown_level(
    mut commands: Commands,
    query: Query<Entity, With<LevelEntity>>,
    mut registry: ResMut<ObjectRegistry>,
    mut prompt: ResMut<PromptState>,
) {
    let mut count = 0;
    for entity in &query {
        commands.entity(entity).despawn_recursive();
        count += 1;
    }
    if count > 0 {
        debug!("Tore down {} level entities", count);
    }
    registry.objects.clear();
    prompt.open = None;
}

/// Build every object of the active level and enter `Playing`.
///
/// Progress is restored from durable storage first so the inventory, NPCs and
/// slots resume where the last session stopped, and items already picked up
/// stay gone. An invalid level spawns nothing and the game stays in `Loading`.
pub fn spawn_level(
    mut commands: Commands,
    level: Res<ActiveLevel>,
    config: Res<GameConfig>,
    viewport: Res<Viewport>,
    durable: Res<DurableStore>,
    mut rng: ResMut<LevelRng>,
    mut registry: ResMut<ObjectRegistry>,
    mut progress: ResMut<Progress>,
    mut level_progress: ResMut<LevelProgress>,
    mut next_state: ResMut<NextState<GameState>>,
    asset_server: Option<Res<AssetServer>>,
    mut layouts: Option<ResMut<Assets<TextureAtlasLayout>>>,
) {
    let level = &level.0;
    if let Err(e) = level.validate() {
        error!("Level '{}' not loaded: {}", level.name, e);
        return;
    }

    *progress = Progress::restore(load_inventory(durable.store()), config.inventory_capacity);
    *level_progress = LevelProgress::new(level.victory, level.required_slot_keys());
    let npc_keys = load_npc_key_states(durable.store());
    let slot_keys = load_slot_key_states(durable.store());
    let collected = load_collected_items(durable.store());

    let authored = Vec2::from(level.authored_size);
    for descriptor in &level.objects {
        let data = &descriptor.data;
        if matches!(descriptor.kind, ObjectKind::Item(_)) && collected.contains(&data.id) {
            continue;
        }
        let mut object = GameObject::new(
            data.id.clone(),
            data.position.into(),
            authored,
            data.scale_factor,
            data.step_factor,
        );
        if viewport.size != authored {
            object.resize(viewport.size);
        }

        let animation = data.animation();
        let z = match descriptor.kind {
            ObjectKind::Player => Z_PLAYER,
            ObjectKind::Npc(_) => Z_NPC,
            ObjectKind::KeySlot(_) => Z_SLOT,
            ObjectKind::Item(_) => Z_ITEM,
        };

        let mut entity = commands.spawn((
            LevelEntity,
            data.hitbox,
            CollisionEvents::default(),
            Transform::from_xyz(0.0, 0.0, z),
            Visibility::default(),
        ));

        if let (Some(server), Some(layouts)) = (asset_server.as_deref(), layouts.as_deref_mut()) {
            entity.insert(sprite_for(&animation, &object, server, layouts));
        }
        entity.insert((object, animation));

        match &descriptor.kind {
            ObjectKind::Player => {
                entity.insert(Player::default());
            }
            ObjectKind::Npc(npc) => {
                let quiz = npc
                    .quiz
                    .as_ref()
                    .map(|quiz| Quiz::shuffled(quiz.title.clone(), quiz.questions.clone(), &mut rng.0));
                let keys_received = npc_keys
                    .get(&data.id)
                    .copied()
                    .unwrap_or(0)
                    .min(npc.max_keys);
                entity.insert((
                    Npc {
                        greeting: descriptor.greeting(),
                        quiz,
                        keys_received,
                        max_keys: npc.max_keys,
                    },
                    Solid,
                ));
            }
            ObjectKind::KeySlot(slot) => {
                let saved = slot_keys.get(&data.id).copied().unwrap_or(0);
                let slot = KeySlot::restored(slot.slot_index, slot.required_keys, saved);
                level_progress.filled_slots += slot.keys_inserted;
                entity.insert((slot, Solid));
            }
            ObjectKind::Item(item) => {
                entity.insert(Item {
                    item_type: item.item_type.clone(),
                });
            }
        }

        let entity = entity.id();
        register_object(&mut registry, &data.id, entity);
    }

    info!(
        "Spawned level '{}': {} objects, {} held items",
        level.name,
        registry.len(),
        progress.player_item()
    );
    next_state.set(GameState::Playing);
}

fn sprite_for(
    animation: &SpriteAnimation,
    object: &GameObject,
    asset_server: &AssetServer,
    layouts: &mut Assets<TextureAtlasLayout>,
) -> Sprite {
    let frame = animation.frame_size();
    let layout = layouts.add(TextureAtlasLayout::from_grid(
        UVec2::new(frame.x as u32, frame.y as u32),
        animation.grid.columns,
        animation.grid.rows,
        None,
        None,
    ));
    let mut sprite = Sprite::from_atlas_image(
        asset_server.load(animation.src.clone()),
        TextureAtlas {
            layout,
            index: animation.atlas_index(),
        },
    );
    sprite.custom_size = Some(Vec2::new(object.width, object.height));
    sprite
}

/// Forget saved progress and load the level again.
pub fn handle_restart(
    mut events: EventReader<RestartEvent>,
    config: Res<GameConfig>,
    mut durable: ResMut<DurableStore>,
    mut progress: ResMut<Progress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if events.read().count() == 0 {
        return;
    }
    clear_progress(durable.store_mut());
    *progress = Progress::with_capacity(config.inventory_capacity);
    info!("Restarting level");
    next_state.set(GameState::Loading);
}
