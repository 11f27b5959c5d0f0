//! NPC domain: key giving, approach hints, greetings, and quiz prompts.
//!
//! Communicates exclusively through shared resources and events.

use bevy::prelude::*;
use crate::shared::*;

mod keys;
mod quiz;

pub use keys::{give_key_to_npc, npc_approach_hints};
pub use quiz::{advance_quiz, interact_with_npc};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                npc_approach_hints,
                // An open prompt consumes confirm/cancel before a new one
                // can be opened in the same frame.
                (advance_quiz, interact_with_npc).chain(),
                give_key_to_npc,
            )
                .in_set(FrameSet::Act)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Whether any player overlaps `id` this frame.
pub(crate) fn touched_by_player(
    players: &Query<&CollisionEvents, With<Player>>,
    id: &str,
) -> bool {
    players.iter().any(|events| events.touching_now(id))
}
