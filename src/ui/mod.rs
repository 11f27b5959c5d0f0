//! Overlays: hint toasts, the inventory bar, the quiz panel, and the victory
//! screen. Everything here is driven by shared events; the core never reads
//! UI state back.

pub mod inventory_bar;
pub mod quiz_prompt;
pub mod toast;
pub mod victory_screen;

use bevy::prelude::*;
use crate::shared::*;

pub use inventory_bar::InventoryView;
pub use victory_screen::VictoryMessage;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InventoryView>()
            .init_resource::<VictoryMessage>();

        // ─── TOASTS — live in every state ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (
                toast::dismiss_owned_toasts,
                toast::handle_toast_events,
                toast::update_toasts,
            )
                .chain()
                .after(FrameSet::Resolve),
        );
        app.add_systems(OnEnter(GameState::Loading), toast::clear_toasts);

        // ─── INVENTORY BAR ───
        app.add_systems(Startup, inventory_bar::spawn_inventory_bar);
        app.add_systems(OnEnter(GameState::Playing), inventory_bar::sync_inventory_view);
        app.add_systems(
            Update,
            (
                inventory_bar::apply_inventory_events,
                inventory_bar::refresh_inventory_slots,
            )
                .chain()
                .after(FrameSet::Resolve),
        );

        // ─── QUIZ PANEL ───
        app.add_systems(
            Update,
            (quiz_prompt::hide_quiz_prompt, quiz_prompt::show_quiz_prompt)
                .chain()
                .after(FrameSet::Resolve),
        );
        app.add_systems(OnExit(GameState::Playing), quiz_prompt::clear_quiz_prompt);

        // ─── VICTORY SCREEN ───
        app.add_systems(
            Update,
            victory_screen::record_victory_message.after(FrameSet::Resolve),
        );
        app.add_systems(OnEnter(GameState::Victory), victory_screen::spawn_victory_screen);
        app.add_systems(OnExit(GameState::Victory), victory_screen::despawn_victory_screen);
        app.add_systems(
            Update,
            victory_screen::victory_input.run_if(in_state(GameState::Victory)),
        );
    }
}
