//! Greetings and quiz prompts on the interact key.
//!
//! A quiz walks through its shuffled questions once. Confirm moves to the
//! next question, cancel closes the prompt where it is, and running out of
//! questions closes it for good; after that the NPC only greets.

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::shared::*;
use super::touched_by_player;

pub fn interact_with_npc(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    progress: Res<Progress>,
    mut prompt: ResMut<PromptState>,
    players: Query<&CollisionEvents, With<Player>>,
    npcs: Query<(&GameObject, &Npc)>,
    mut prompts: EventWriter<QuizPromptEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.interact || prompt.open.is_some() {
        return;
    }

    let Some((object, npc)) = npcs
        .iter()
        .find(|(object, _)| touched_by_player(&players, &object.id))
    else {
        return;
    };

    let open_question = npc
        .quiz
        .as_ref()
        .and_then(|quiz| quiz.current_question().map(|question| (quiz, question)));

    match open_question {
        Some((quiz, question)) => {
            prompt.open = Some(object.id.clone());
            prompts.send(QuizPromptEvent {
                npc_id: object.id.clone(),
                title: quiz.title.clone(),
                question: question.to_string(),
            });
            debug!("Opened '{}' for {}", quiz.title, object.id);
        }
        None => {
            toasts.send(ToastEvent {
                message: npc.greeting.text(&progress).to_string(),
                duration_secs: config.message_secs,
                tone: ToastTone::Neutral,
                owner: Some(object.id.clone()),
            });
        }
    }
}

pub fn advance_quiz(
    input: Res<PlayerInput>,
    mut prompt: ResMut<PromptState>,
    mut npcs: Query<(&GameObject, &mut Npc)>,
    mut prompts: EventWriter<QuizPromptEvent>,
    mut closed: EventWriter<PromptClosedEvent>,
) {
    let Some(npc_id) = prompt.open.clone() else {
        return;
    };
    if !input.confirm && !input.cancel {
        return;
    }

    let owner = npcs
        .iter_mut()
        .find(|(object, _)| object.id == npc_id)
        .map(|(_, npc)| npc);

    let next = match owner {
        Some(mut npc) if !input.cancel => npc.quiz.as_mut().and_then(|quiz| {
            let question = quiz.advance()?.to_string();
            Some((quiz.title.clone(), question))
        }),
        _ => None,
    };

    match next {
        Some((title, question)) => {
            prompts.send(QuizPromptEvent {
                npc_id,
                title,
                question,
            });
        }
        None => {
            prompt.open = None;
            closed.send(PromptClosedEvent { npc_id });
        }
    }
}
