use bevy::prelude::*;
use crate::shared::*;

pub struct VictoryPlugin;

impl Plugin for VictoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            check_victory
                .in_set(FrameSet::Resolve)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Whether every NPC holds `keys_per_npc` and there are enough of them.
pub fn npcs_complete<'a>(
    npcs: impl IntoIterator<Item = &'a Npc>,
    keys_per_npc: u8,
    min_npcs: usize,
) -> bool {
    let mut count = 0;
    for npc in npcs {
        if npc.keys_received < keys_per_npc {
            return false;
        }
        count += 1;
    }
    count >= min_npcs
}

pub fn victory_message(rule: VictoryRule) -> String {
    match rule {
        VictoryRule::SlotsFilled => "You have unlocked every key slot and escaped!".into(),
        VictoryRule::NpcKeys { keys_per_npc, .. } => {
            format!("All NPCs have received their {} keys!", keys_per_npc)
        }
    }
}

/// Evaluate the level's victory rule once per frame, firing at most once.
///
/// Leaving `Playing` halts every frame system, so nothing else mutates the
/// level after this fires.
pub fn check_victory(
    mut level_progress: ResMut<LevelProgress>,
    npcs: Query<&Npc>,
    mut victory: EventWriter<VictoryEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if level_progress.victory_achieved {
        return;
    }

    let won = match level_progress.rule {
        VictoryRule::SlotsFilled => level_progress.slots_complete(),
        VictoryRule::NpcKeys {
            keys_per_npc,
            min_npcs,
        } => npcs_complete(npcs.iter(), keys_per_npc, min_npcs),
    };
    if !won {
        return;
    }

    level_progress.victory_achieved = true;
    let message = victory_message(level_progress.rule);
    info!("Victory: {}", message);
    victory.send(VictoryEvent { message });
    next_state.set(GameState::Victory);
}
