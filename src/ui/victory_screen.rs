use bevy::prelude::*;
use crate::shared::*;

#[derive(Component)]
pub struct VictoryScreenRoot;

/// Text of the last victory, shown by the overlay.
#[derive(Resource, Debug, Clone, Default)]
pub struct VictoryMessage(pub String);

pub fn record_victory_message(
    mut events: EventReader<VictoryEvent>,
    mut message: ResMut<VictoryMessage>,
) {
    if let Some(event) = events.read().last() {
        message.0 = event.message.clone();
    }
}

pub fn spawn_victory_screen(mut commands: Commands, message: Res<VictoryMessage>) {
    commands
        .spawn((
            VictoryScreenRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            GlobalZIndex(100),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("VICTORY!"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.84, 0.0)),
            ));
            parent.spawn((
                Text::new(message.0.clone()),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Press R or Enter to play again"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.8, 0.4)),
            ));
        });
}

pub fn despawn_victory_screen(
    mut commands: Commands,
    query: Query<Entity, With<VictoryScreenRoot>>,
) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn victory_input(input: Res<PlayerInput>, mut restart: EventWriter<RestartEvent>) {
    if input.restart || input.confirm {
        restart.send(RestartEvent);
    }
}
