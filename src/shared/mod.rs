//! Shared components, resources, events, and states for the adventure core.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

/// 1/nth of the viewport height.
pub const SCALE_FACTOR: f32 = 25.0;
/// 1/nth of the viewport, i.e. N steps up and across.
pub const STEP_FACTOR: f32 = 100.0;
/// Draws per animation frame.
pub const ANIMATION_RATE: u32 = 1;

/// Canvas ids that count as a player.
pub const PLAYER_IDS: [&str; 2] = ["player", "player2"];

/// Inventory tag for keys.
pub const KEY_ITEM: &str = "key";

/// Keys an NPC holds when it is done.
pub const KEYS_PER_NPC: u8 = 2;

pub fn is_player_id(id: &str) -> bool {
    PLAYER_IDS.contains(&id)
}

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    /// Tear down whatever level is live and spawn the active one.
    #[default]
    Loading,
    Playing,
    /// Terminal until restart. No frame systems run here.
    Victory,
}

/// Per-frame ordering of the game loop while Playing.
///
/// Mirrors the per-object `update()` contract: draw, then collide, then act on
/// the collision results, then evaluate victory.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Draw,
    Collide,
    Act,
    Resolve,
}

// ═══════════════════════════════════════════════════════════════════════
// FACING
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

// ═══════════════════════════════════════════════════════════════════════
// GAME OBJECT — position, size, and scaling
// ═══════════════════════════════════════════════════════════════════════

/// Every live sprite entity in a level carries one of these.
///
/// Coordinates are canvas pixels with the origin at the top-left and y growing
/// downward, the same space the level data is authored in.
#[derive(Component, Debug, Clone)]
pub struct GameObject {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Per-frame movement step, derived from the viewport.
    pub step: Vec2,
    pub size: f32,
    pub width: f32,
    pub height: f32,
    /// Viewport size the position was last expressed in.
    pub scale: Vec2,
    pub scale_factor: f32,
    pub step_factor: f32,
}

impl GameObject {
    pub fn new(
        id: impl Into<String>,
        position: Vec2,
        scale: Vec2,
        scale_factor: f32,
        step_factor: f32,
    ) -> Self {
        let mut object = Self {
            id: id.into(),
            position,
            velocity: Vec2::ZERO,
            step: Vec2::ZERO,
            size: 0.0,
            width: 0.0,
            height: 0.0,
            scale,
            scale_factor,
            step_factor,
        };
        object.apply_scale(scale);
        object
    }

    /// Rescale to a new viewport, keeping relative placement.
    pub fn resize(&mut self, new_scale: Vec2) {
        if self.scale.x > 0.0 && self.scale.y > 0.0 {
            self.position = self.position / self.scale * new_scale;
        }
        self.apply_scale(new_scale);
    }

    fn apply_scale(&mut self, new_scale: Vec2) {
        self.scale = new_scale;
        self.size = new_scale.y / self.scale_factor;
        self.step = new_scale / self.step_factor;

        // Objects are square.
        self.width = self.size;
        self.height = self.size;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position, self.position + Vec2::new(self.width, self.height))
    }
}

/// Fractional shrink applied to the rendered box before collision tests.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    #[serde(default)]
    pub width_percentage: f32,
    #[serde(default)]
    pub height_percentage: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// SPRITE SHEETS & ANIMATION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f32,
    pub height: f32,
}

/// Rows and columns of the whole sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetGrid {
    pub rows: u32,
    pub columns: u32,
}

/// Cells used by one direction: a row, a starting column, and a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub row: u32,
    #[serde(default)]
    pub start: u32,
    pub columns: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionFrames {
    #[serde(default)]
    pub down: Option<FrameRange>,
    #[serde(default)]
    pub up: Option<FrameRange>,
    #[serde(default)]
    pub left: Option<FrameRange>,
    #[serde(default)]
    pub right: Option<FrameRange>,
}

impl DirectionFrames {
    /// Frame range for a direction, falling back to `down` for sheets that
    /// only draw one side.
    pub fn get(&self, direction: Facing) -> Option<FrameRange> {
        let range = match direction {
            Facing::Down => self.down,
            Facing::Up => self.up,
            Facing::Left => self.left,
            Facing::Right => self.right,
        };
        range.or(self.down)
    }
}

#[derive(Component, Debug, Clone)]
pub struct SpriteAnimation {
    pub src: String,
    pub pixels: PixelSize,
    pub grid: SheetGrid,
    pub frames: DirectionFrames,
    pub direction: Facing,
    pub frame_index: u32,
    pub frame_counter: u32,
    pub animation_rate: u32,
}

impl SpriteAnimation {
    /// Cell size of one frame in sheet pixels.
    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(
            self.pixels.width / self.grid.columns as f32,
            self.pixels.height / self.grid.rows as f32,
        )
    }

    /// Linear atlas index of the frame currently shown.
    pub fn atlas_index(&self) -> usize {
        let Some(range) = self.frames.get(self.direction) else {
            return 0;
        };
        (range.row * self.grid.columns + range.start + self.frame_index) as usize
    }

    /// Count one draw and step the frame every `animation_rate` draws.
    pub fn advance(&mut self) {
        let columns = self
            .frames
            .get(self.direction)
            .map(|range| range.columns.max(1))
            .unwrap_or(1);

        self.frame_counter = self.frame_counter.wrapping_add(1);
        if self.frame_counter % self.animation_rate.max(1) == 0 {
            self.frame_index = (self.frame_index + 1) % columns;
        }
    }

    /// Change facing. The frame index restarts so it never points past the
    /// new direction's range.
    pub fn face(&mut self, direction: Facing) {
        if self.direction != direction {
            self.direction = direction;
            self.frame_index = 0;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COLLISION
// ═══════════════════════════════════════════════════════════════════════

/// Which edges of a pair of boxes are in contact, seen from one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchPoints {
    pub this: SideFlags,
    pub other: SideFlags,
}

/// One partner this object overlapped during the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: String,
    pub touch: TouchPoints,
}

/// Ids of objects currently touching this one.
///
/// An id is added on its first hit and stays until a frame in which this
/// object hits nothing at all; then the whole list resets.
#[derive(Component, Debug, Clone, Default)]
pub struct CollisionEvents {
    pub ids: Vec<String>,
    /// Ids that joined the list this frame.
    pub entered: Vec<String>,
    /// Every overlap found this frame, with touch detail.
    pub contacts: Vec<Contact>,
}

impl CollisionEvents {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Whether `id` overlaps this object in the current frame. Unlike
    /// `contains`, this ignores ids kept only because something else is still
    /// touching.
    pub fn touching_now(&self, id: &str) -> bool {
        self.contacts.iter().any(|contact| contact.id == id)
    }

    pub fn touching_player_now(&self) -> bool {
        self.contacts.iter().any(|contact| is_player_id(&contact.id))
    }

    /// Ids overlapping this frame, in the order they first touched.
    pub fn current_ids(&self) -> impl Iterator<Item = &str> {
        self.ids
            .iter()
            .map(String::as_str)
            .filter(move |id| self.touching_now(id))
    }

    /// Fold one frame of hits into the list.
    pub fn record_frame(&mut self, contacts: Vec<Contact>) {
        self.entered.clear();
        if contacts.is_empty() {
            self.ids.clear();
        } else {
            for contact in &contacts {
                if !self.contains(&contact.id) {
                    self.ids.push(contact.id.clone());
                    self.entered.push(contact.id.clone());
                }
            }
        }
        self.contacts = contacts;
    }
}

/// Objects the player cannot walk through.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Solid;

/// Everything spawned for the current level; despawned on teardown.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LevelEntity;

// ═══════════════════════════════════════════════════════════════════════
// ENTITY KINDS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player {
    /// Set while a prompt is open; movement is suppressed.
    pub is_interacting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Greeting {
    Static(String),
    /// `complete` once the player holds at least `threshold` items.
    Progress {
        base: String,
        threshold: u32,
        complete: String,
    },
}

impl Greeting {
    pub fn text(&self, progress: &Progress) -> &str {
        match self {
            Greeting::Static(text) => text,
            Greeting::Progress {
                base,
                threshold,
                complete,
            } => {
                if progress.player_item() >= *threshold {
                    complete
                } else {
                    base
                }
            }
        }
    }
}

/// A finite question sequence, shuffled once when the NPC is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<String>,
    pub current: usize,
}

impl Quiz {
    pub fn shuffled(title: impl Into<String>, mut questions: Vec<String>, rng: &mut StdRng) -> Self {
        use rand::seq::SliceRandom;
        questions.shuffle(rng);
        Self {
            title: title.into(),
            questions,
            current: 0,
        }
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current).map(String::as_str)
    }

    pub fn has_remaining(&self) -> bool {
        self.current < self.questions.len()
    }

    /// Move past the current question. Returns the next one, if any.
    pub fn advance(&mut self) -> Option<&str> {
        if self.has_remaining() {
            self.current += 1;
        }
        self.current_question()
    }
}

#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub greeting: Greeting,
    pub quiz: Option<Quiz>,
    pub keys_received: u8,
    pub max_keys: u8,
}

impl Npc {
    pub fn has_all_keys(&self) -> bool {
        self.keys_received >= self.max_keys
    }
}

#[derive(Component, Debug, Clone)]
pub struct KeySlot {
    pub slot_index: u32,
    pub required_keys: u32,
    pub keys_inserted: u32,
    pub filled: bool,
}

impl KeySlot {
    pub fn new(slot_index: u32, required_keys: u32) -> Self {
        Self {
            slot_index,
            required_keys: required_keys.max(1),
            keys_inserted: 0,
            filled: false,
        }
    }

    /// A slot that already holds `keys_inserted` keys, capped at what it needs.
    pub fn restored(slot_index: u32, required_keys: u32, keys_inserted: u32) -> Self {
        let mut slot = Self::new(slot_index, required_keys);
        slot.keys_inserted = keys_inserted.min(slot.required_keys);
        slot.filled = slot.keys_inserted >= slot.required_keys;
        slot
    }
}

#[derive(Component, Debug, Clone)]
pub struct Item {
    pub item_type: String,
}

// ═══════════════════════════════════════════════════════════════════════
// KEY RECEIVERS — NPCs and slots both take keys from the player
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransfer {
    /// One key moved from the player; `completed` when that was the last one
    /// the receiver wanted.
    Accepted { held: u32, wanted: u32, completed: bool },
    NoKey,
    AlreadyComplete,
}

pub trait KeyReceiver {
    /// Whether a completed receiver is reported before a missing key.
    const COMPLETE_CHECKED_FIRST: bool;

    fn keys_held(&self) -> u32;
    fn keys_wanted(&self) -> u32;
    fn receive_key(&mut self);

    fn is_complete(&self) -> bool {
        self.keys_held() >= self.keys_wanted()
    }

    /// Move one key from `progress` into this receiver. Nothing changes
    /// unless the result is `Accepted`.
    fn take_key_from(&mut self, progress: &mut Progress) -> KeyTransfer {
        let has_key = progress.has_item(KEY_ITEM);
        let complete = self.is_complete();
        let refusal = match (Self::COMPLETE_CHECKED_FIRST, complete, has_key) {
            (true, true, _) => Some(KeyTransfer::AlreadyComplete),
            (_, _, false) => Some(KeyTransfer::NoKey),
            (false, true, true) => Some(KeyTransfer::AlreadyComplete),
            _ => None,
        };
        if let Some(refusal) = refusal {
            return refusal;
        }
        if !progress.remove_item(KEY_ITEM) {
            return KeyTransfer::NoKey;
        }
        self.receive_key();
        KeyTransfer::Accepted {
            held: self.keys_held(),
            wanted: self.keys_wanted(),
            completed: self.is_complete(),
        }
    }
}

impl KeyReceiver for Npc {
    const COMPLETE_CHECKED_FIRST: bool = false;

    fn keys_held(&self) -> u32 {
        self.keys_received as u32
    }

    fn keys_wanted(&self) -> u32 {
        self.max_keys as u32
    }

    fn receive_key(&mut self) {
        self.keys_received = self.keys_received.saturating_add(1);
    }
}

impl KeyReceiver for KeySlot {
    const COMPLETE_CHECKED_FIRST: bool = true;

    fn keys_held(&self) -> u32 {
        self.keys_inserted
    }

    fn keys_wanted(&self) -> u32 {
        self.required_keys
    }

    fn is_complete(&self) -> bool {
        self.filled
    }

    fn receive_key(&mut self) {
        self.keys_inserted += 1;
        if self.keys_inserted >= self.required_keys {
            self.filled = true;
        }
    }
}

/// The one receiver a give press goes to: the first object a player touched
/// that still overlaps it this frame and takes keys.
///
/// NPC and slot systems both resolve the press through this, so a single
/// press never spends more than one key.
pub fn give_target<'a>(
    players: impl IntoIterator<Item = &'a CollisionEvents>,
    registry: &ObjectRegistry,
    takes_keys: impl Fn(Entity) -> bool,
) -> Option<&'a str> {
    players.into_iter().find_map(|events| {
        events
            .current_ids()
            .find(|id| registry.get(id).is_some_and(&takes_keys))
    })
}

// ═══════════════════════════════════════════════════════════════════════
// PROGRESS STORE — held keys and inventory for one level session
// ═══════════════════════════════════════════════════════════════════════

/// The player's held items.
///
/// `inventory.len() == player_item` holds after every mutation. Replaced at
/// each level load; every system reaches it through `Res`/`ResMut`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Progress {
    player_item: u32,
    inventory: Vec<String>,
    capacity: usize,
}

impl Default for Progress {
    fn default() -> Self {
        Self::with_capacity(4)
    }
}

impl Progress {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            player_item: 0,
            inventory: Vec::new(),
            capacity,
        }
    }

    /// Rebuild from a persisted inventory list. Entries past capacity are
    /// dropped.
    pub fn restore(mut items: Vec<String>, capacity: usize) -> Self {
        items.truncate(capacity);
        Self {
            player_item: items.len() as u32,
            inventory: items,
            capacity,
        }
    }

    pub fn player_item(&self) -> u32 {
        self.player_item
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.inventory.len() >= self.capacity
    }

    pub fn has_item(&self, item_type: &str) -> bool {
        self.inventory.iter().any(|held| held == item_type)
    }

    /// Push one item. Returns false when the inventory is full.
    pub fn add_item(&mut self, item_type: &str) -> bool {
        if self.is_full() {
            return false;
        }
        self.player_item += 1;
        self.inventory.push(item_type.to_string());
        true
    }

    pub fn add_key(&mut self) -> bool {
        self.add_item(KEY_ITEM)
    }

    /// Drop one item of `item_type`, or the newest item when none of that
    /// type is held. Returns false, unchanged, when nothing is held.
    pub fn remove_item(&mut self, item_type: &str) -> bool {
        if self.player_item == 0 {
            return false;
        }
        match self.inventory.iter().position(|held| held == item_type) {
            Some(index) => {
                self.inventory.remove(index);
            }
            None => {
                self.inventory.pop();
            }
        }
        self.player_item -= 1;
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LEVEL PROGRESS — slot tally and victory guard
// ═══════════════════════════════════════════════════════════════════════

/// How a level is won. Exactly one rule is active per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryRule {
    /// Every key position in every slot is filled (and there is more than one).
    SlotsFilled,
    /// Every NPC holds `keys_per_npc` keys and there are at least `min_npcs`.
    NpcKeys { keys_per_npc: u8, min_npcs: usize },
}

impl Default for VictoryRule {
    fn default() -> Self {
        VictoryRule::SlotsFilled
    }
}

impl VictoryRule {
    /// NPCs only collect keys in levels that are won through them.
    pub fn npcs_take_keys(&self) -> bool {
        matches!(self, VictoryRule::NpcKeys { .. })
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct LevelProgress {
    pub rule: VictoryRule,
    pub filled_slots: u32,
    pub required_total: u32,
    pub victory_achieved: bool,
}

impl LevelProgress {
    pub fn new(rule: VictoryRule, required_total: u32) -> Self {
        Self {
            rule,
            filled_slots: 0,
            required_total,
            victory_achieved: false,
        }
    }

    pub fn slots_complete(&self) -> bool {
        self.required_total > 1 && self.filled_slots >= self.required_total
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LIVE-OBJECT REGISTRY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct ObjectRegistry {
    pub objects: HashMap<String, Entity>,
}

impl ObjectRegistry {
    pub fn get(&self, id: &str) -> Option<Entity> {
        self.objects.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Viewport size in pixels. Objects rescale whenever it changes.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }
}

/// Seedable RNG for level construction (quiz order).
#[derive(Resource, Debug, Clone)]
pub struct LevelRng(pub StdRng);

impl LevelRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl Default for LevelRng {
    fn default() -> Self {
        Self::from_seed(None)
    }
}

/// Which NPC, if any, has its quiz prompt open.
#[derive(Resource, Debug, Clone, Default)]
pub struct PromptState {
    pub open: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub give: KeyCode,
    pub confirm: KeyCode,
    pub cancel: KeyCode,
    pub restart: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::KeyE,
            give: KeyCode::KeyQ,
            confirm: KeyCode::Enter,
            cancel: KeyCode::Escape,
            restart: KeyCode::KeyR,
        }
    }
}

/// One frame of game actions, sampled from the keyboard in `PreUpdate`.
///
/// `move_axis` is in canvas space (y down). Every other field is a
/// just-pressed edge.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub interact: bool,
    pub give: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub restart: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Inventory UI: add one item of this type.
#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_type: String,
}

/// Inventory UI: remove one item of this type.
#[derive(Event, Debug, Clone)]
pub struct ItemRemovedEvent {
    pub item_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastTone {
    #[default]
    Neutral,
    Success,
    Error,
    Warning,
}

/// Toast notification for player feedback.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
    pub tone: ToastTone,
    /// Object whose destruction dismisses this toast early.
    pub owner: Option<String>,
}

/// An object left the registry.
#[derive(Event, Debug, Clone)]
pub struct ObjectDestroyedEvent {
    pub id: String,
}

#[derive(Event, Debug, Clone)]
pub struct VictoryEvent {
    pub message: String,
}

/// Open the quiz panel on one question.
#[derive(Event, Debug, Clone)]
pub struct QuizPromptEvent {
    pub npc_id: String,
    pub title: String,
    pub question: String,
}

#[derive(Event, Debug, Clone)]
pub struct PromptClosedEvent {
    pub npc_id: String,
}

/// Clear saved progress and reload the level.
#[derive(Event, Debug, Clone, Default)]
pub struct RestartEvent;
