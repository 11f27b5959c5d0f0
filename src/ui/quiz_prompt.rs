use bevy::prelude::*;
use crate::shared::*;

#[derive(Component)]
pub struct QuizPanel;

/// Replace the panel with the latest question.
pub fn show_quiz_prompt(
    mut commands: Commands,
    mut events: EventReader<QuizPromptEvent>,
    panels: Query<Entity, With<QuizPanel>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    despawn_quiz_panels(&mut commands, &panels);

    commands
        .spawn((
            QuizPanel,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(20.0),
                right: Val::Percent(20.0),
                top: Val::Percent(30.0),
                padding: UiRect::all(Val::Px(16.0)),
                border: UiRect::all(Val::Px(2.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.08, 0.08, 0.12, 0.95)),
            BorderColor(Color::srgb(0.6, 0.55, 0.4)),
            GlobalZIndex(50),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(event.title.clone()),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.84, 0.0)),
            ));
            parent.spawn((
                Text::new(event.question.clone()),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Enter: next question   Esc: close"),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
            ));
        });
}

pub fn hide_quiz_prompt(
    mut commands: Commands,
    mut events: EventReader<PromptClosedEvent>,
    panels: Query<Entity, With<QuizPanel>>,
) {
    if events.read().count() == 0 {
        return;
    }
    despawn_quiz_panels(&mut commands, &panels);
}

pub fn clear_quiz_prompt(mut commands: Commands, panels: Query<Entity, With<QuizPanel>>) {
    despawn_quiz_panels(&mut commands, &panels);
}

fn despawn_quiz_panels(commands: &mut Commands, panels: &Query<Entity, With<QuizPanel>>) {
    for entity in panels {
        commands.entity(entity).despawn_recursive();
    }
}
