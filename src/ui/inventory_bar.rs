use bevy::prelude::*;
use crate::config::GameConfig;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// VIEW MODEL — driven only by pickup/removed events
// ═══════════════════════════════════════════════════════════════════════

/// What the inventory bar shows. The core never reads it back.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InventoryView {
    pub items: Vec<String>,
    pub capacity: usize,
}

impl InventoryView {
    pub fn add(&mut self, item_type: &str) {
        if self.items.len() < self.capacity {
            self.items.push(item_type.to_string());
        }
    }

    /// Drop one matching entry, or the newest one when none match.
    pub fn remove(&mut self, item_type: &str) {
        match self.items.iter().position(|held| held == item_type) {
            Some(index) => {
                self.items.remove(index);
            }
            None => {
                self.items.pop();
            }
        }
    }
}

fn slot_label(item_type: &str) -> String {
    let mut chars = item_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Component)]
pub struct InventoryBarRoot;

#[derive(Component)]
pub struct InventorySlot {
    pub index: usize,
}

#[derive(Component)]
pub struct InventorySlotText {
    pub index: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_inventory_bar(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut view: ResMut<InventoryView>,
) {
    view.capacity = config.inventory_capacity;

    commands
        .spawn((
            InventoryBarRoot,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(16.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(6.0),
                ..default()
            },
            PickingBehavior::IGNORE,
        ))
        .with_children(|bar| {
            for index in 0..config.inventory_capacity {
                bar.spawn((
                    InventorySlot { index },
                    Node {
                        width: Val::Px(56.0),
                        height: Val::Px(56.0),
                        border: UiRect::all(Val::Px(2.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.15, 0.12, 0.1, 0.85)),
                    BorderColor(Color::srgba(0.4, 0.35, 0.3, 0.8)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|slot| {
                    slot.spawn((
                        InventorySlotText { index },
                        Text::new(""),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        PickingBehavior::IGNORE,
                    ));
                });
            }
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

/// Seed the bar from restored progress when a level starts.
pub fn sync_inventory_view(progress: Res<Progress>, mut view: ResMut<InventoryView>) {
    view.items = progress.inventory().to_vec();
}

pub fn apply_inventory_events(
    mut pickups: EventReader<ItemPickupEvent>,
    mut removals: EventReader<ItemRemovedEvent>,
    mut view: ResMut<InventoryView>,
) {
    for event in pickups.read() {
        view.add(&event.item_type);
    }
    for event in removals.read() {
        view.remove(&event.item_type);
    }
}

pub fn refresh_inventory_slots(
    view: Res<InventoryView>,
    mut slots: Query<(&InventorySlot, &mut BorderColor)>,
    mut texts: Query<(&InventorySlotText, &mut Text)>,
) {
    if !view.is_changed() {
        return;
    }
    for (slot, mut border) in &mut slots {
        *border = if slot.index < view.items.len() {
            BorderColor(Color::srgb(1.0, 0.84, 0.0))
        } else {
            BorderColor(Color::srgba(0.4, 0.35, 0.3, 0.8))
        };
    }
    for (label, mut text) in &mut texts {
        **text = view
            .items
            .get(label.index)
            .map(|item| slot_label(item))
            .unwrap_or_default();
    }
}
