use bevy::prelude::*;
use crate::shared::*;

const MAX_TOASTS: usize = 3;
const FADE_SECS: f32 = 0.5;
const TOAST_ALPHA: f32 = 0.75;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Marker for the toast container node (top-center of screen).
#[derive(Component)]
pub struct ToastContainer;

#[derive(Component)]
pub struct ToastItem {
    pub timer: Timer,
    pub fade_timer: Option<Timer>,
    /// Object whose destruction takes this toast with it.
    pub owner: Option<String>,
}

pub fn tone_color(tone: ToastTone) -> Color {
    match tone {
        ToastTone::Neutral => Color::srgba(0.5, 0.5, 0.5, 0.5),
        ToastTone::Success => Color::srgb(0.2, 0.8, 0.3),
        ToastTone::Error => Color::srgb(0.9, 0.25, 0.2),
        ToastTone::Warning => Color::srgb(1.0, 0.6, 0.1),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONTAINER
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_toast_container(mut commands: Commands) {
    commands.spawn((
        ToastContainer,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(24.0),
            left: Val::Percent(50.0),
            width: Val::Px(420.0),
            margin: UiRect {
                left: Val::Px(-210.0),
                ..default()
            },
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            align_items: AlignItems::Center,
            ..default()
        },
        PickingBehavior::IGNORE,
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN — one child node per event
// ═══════════════════════════════════════════════════════════════════════

/// A new toast from an owner replaces that owner's previous toast, so an
/// object only ever has one message up.
pub fn handle_toast_events(
    mut commands: Commands,
    mut events: EventReader<ToastEvent>,
    container_query: Query<Entity, With<ToastContainer>>,
    existing_toasts: Query<(Entity, &ToastItem)>,
) {
    let Ok(container) = container_query.get_single() else {
        return;
    };

    let mut live: Vec<(Entity, Option<String>)> = existing_toasts
        .iter()
        .map(|(entity, toast)| (entity, toast.owner.clone()))
        .collect();

    for event in events.read() {
        if event.owner.is_some() {
            live.retain(|(entity, owner)| {
                if *owner == event.owner {
                    commands.entity(*entity).despawn_recursive();
                    false
                } else {
                    true
                }
            });
        }
        if live.len() >= MAX_TOASTS {
            let (oldest, _) = live.remove(0);
            commands.entity(oldest).despawn_recursive();
        }

        let toast_entity = commands
            .spawn((
                ToastItem {
                    timer: Timer::from_seconds(event.duration_secs, TimerMode::Once),
                    fade_timer: None,
                    owner: event.owner.clone(),
                },
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(5.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, TOAST_ALPHA)),
                BorderColor(tone_color(event.tone)),
                PickingBehavior::IGNORE,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(event.message.clone()),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    PickingBehavior::IGNORE,
                ));
            })
            .id();

        commands.entity(container).add_child(toast_entity);
        live.push((toast_entity, event.owner.clone()));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE — tick timers, fade out, despawn
// ═══════════════════════════════════════════════════════════════════════

pub fn update_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toast_query: Query<(Entity, &mut ToastItem, &mut BackgroundColor, Option<&Children>)>,
    mut text_color_query: Query<&mut TextColor>,
) {
    for (entity, mut toast, mut bg_color, children) in &mut toast_query {
        if toast.fade_timer.is_none() {
            toast.timer.tick(time.delta());
            if toast.timer.finished() {
                toast.fade_timer = Some(Timer::from_seconds(FADE_SECS, TimerMode::Once));
            }
            continue;
        }

        let Some(fade) = toast.fade_timer.as_mut() else {
            continue;
        };
        fade.tick(time.delta());
        if fade.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let alpha = 1.0 - fade.fraction();
        bg_color.0 = bg_color.0.with_alpha(TOAST_ALPHA * alpha);
        if let Some(children) = children {
            for &child in children.iter() {
                if let Ok(mut text_color) = text_color_query.get_mut(child) {
                    text_color.0 = text_color.0.with_alpha(alpha);
                }
            }
        }
    }
}

/// Toasts go with the object that raised them.
pub fn dismiss_owned_toasts(
    mut commands: Commands,
    mut destroyed: EventReader<ObjectDestroyedEvent>,
    toasts: Query<(Entity, &ToastItem)>,
) {
    for event in destroyed.read() {
        for (entity, toast) in &toasts {
            if toast.owner.as_deref() == Some(event.id.as_str()) {
                commands.entity(entity).despawn_recursive();
            }
        }
    }
}

pub fn clear_toasts(mut commands: Commands, toasts: Query<Entity, With<ToastItem>>) {
    for entity in &toasts {
        commands.entity(entity).despawn_recursive();
    }
}
