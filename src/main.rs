use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use keyslot_adventure::config::GameConfig;
use keyslot_adventure::save::DurableStore;
use keyslot_adventure::shared::*;
use keyslot_adventure::{
    collision, input, items, keyslots, level, npcs, objects, player, ui, victory,
};

fn main() {
    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Keyslot Adventure".into(),
                    resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                    present_mode: PresentMode::AutoVsync,
                    resizable: true,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    // Read after LogPlugin is installed so config problems reach the log.
    let config = GameConfig::load();
    let store = DurableStore::platform_default(&config);
    let rng = LevelRng::from_seed(config.rng_seed);

    app
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .insert_resource(config)
        .insert_resource(store)
        .insert_resource(rng)
        .init_resource::<Progress>()
        .init_resource::<LevelProgress>()
        .init_resource::<PromptState>()
        // Events
        .add_event::<ItemPickupEvent>()
        .add_event::<ItemRemovedEvent>()
        .add_event::<ToastEvent>()
        .add_event::<ObjectDestroyedEvent>()
        .add_event::<VictoryEvent>()
        .add_event::<QuizPromptEvent>()
        .add_event::<PromptClosedEvent>()
        .add_event::<RestartEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(objects::ObjectsPlugin)
        .add_plugins(collision::CollisionPlugin)
        .add_plugins(level::LevelPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(items::ItemsPlugin)
        .add_plugins(npcs::NpcPlugin)
        .add_plugins(keyslots::KeySlotPlugin)
        .add_plugins(victory::VictoryPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
