//! Declarative level data: an ordered list of `{ kind, data }` descriptors.
//!
//! Descriptors can be built in code or parsed from RON. Asset existence is not
//! checked here; a sprite path is only required to be non-empty.

use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::*;

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("object '{id}' has no sprite source")]
    MissingSprite { id: String },
    #[error("object '{id}' has an empty sprite grid ({rows}x{columns})")]
    EmptyGrid { id: String, rows: u32, columns: u32 },
    #[error("object '{id}' has no `down` frame range")]
    MissingDownFrames { id: String },
    #[error("object id '{id}' is used more than once")]
    DuplicateId { id: String },
    #[error("level '{name}' has a non-positive authored size")]
    InvalidSize { name: String },
    #[error("could not parse level: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// A canvas point, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(point: CanvasPoint) -> Self {
        Vec2::new(point.x, point.y)
    }
}

fn default_scale_factor() -> f32 {
    SCALE_FACTOR
}

fn default_step_factor() -> f32 {
    STEP_FACTOR
}

fn default_animation_rate() -> u32 {
    ANIMATION_RATE
}

/// Sprite and placement data shared by every object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub id: String,
    #[serde(default)]
    pub greeting: Option<String>,
    pub src: String,
    pub pixels: PixelSize,
    pub grid: SheetGrid,
    pub frames: DirectionFrames,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
    #[serde(default = "default_step_factor")]
    pub step_factor: f32,
    #[serde(default = "default_animation_rate")]
    pub animation_rate: u32,
    pub position: CanvasPoint,
    #[serde(default)]
    pub hitbox: Hitbox,
}

impl SpriteData {
    pub fn animation(&self) -> SpriteAnimation {
        SpriteAnimation {
            src: self.src.clone(),
            pixels: self.pixels,
            grid: self.grid,
            frames: self.frames.clone(),
            direction: Facing::Down,
            frame_index: 0,
            frame_counter: 0,
            animation_rate: self.animation_rate,
        }
    }

    fn validate(&self) -> Result<(), LevelError> {
        if self.src.trim().is_empty() {
            return Err(LevelError::MissingSprite { id: self.id.clone() });
        }
        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(LevelError::EmptyGrid {
                id: self.id.clone(),
                rows: self.grid.rows,
                columns: self.grid.columns,
            });
        }
        if self.frames.down.is_none() {
            return Err(LevelError::MissingDownFrames { id: self.id.clone() });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDef {
    pub title: String,
    pub questions: Vec<String>,
}

/// Greeting that switches once the player holds `threshold` items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressGreetingDef {
    pub threshold: u32,
    pub complete: String,
}

fn default_max_keys() -> u8 {
    KEYS_PER_NPC
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    #[serde(default)]
    pub progress_greeting: Option<ProgressGreetingDef>,
    #[serde(default)]
    pub quiz: Option<QuizDef>,
    #[serde(default = "default_max_keys")]
    pub max_keys: u8,
}

impl Default for NpcDef {
    fn default() -> Self {
        Self {
            progress_greeting: None,
            quiz: None,
            max_keys: KEYS_PER_NPC,
        }
    }
}

fn default_required_keys() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySlotDef {
    pub slot_index: u32,
    #[serde(default = "default_required_keys")]
    pub required_keys: u32,
}

fn default_item_type() -> String {
    KEY_ITEM.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    #[serde(default = "default_item_type")]
    pub item_type: String,
}

impl Default for ItemDef {
    fn default() -> Self {
        Self {
            item_type: default_item_type(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Player,
    Npc(NpcDef),
    KeySlot(KeySlotDef),
    Item(ItemDef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub kind: ObjectKind,
    pub data: SpriteData,
}

impl ObjectDescriptor {
    /// The greeting an NPC built from this descriptor would use.
    pub fn greeting(&self) -> Greeting {
        let base = self
            .data
            .greeting
            .clone()
            .unwrap_or_else(|| self.data.id.clone());
        match &self.kind {
            ObjectKind::Npc(NpcDef {
                progress_greeting: Some(progress),
                ..
            }) => Greeting::Progress {
                base,
                threshold: progress.threshold,
                complete: progress.complete.clone(),
            },
            _ => Greeting::Static(base),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    /// Viewport size the positions were written for.
    pub authored_size: CanvasPoint,
    #[serde(default)]
    pub victory: VictoryRule,
    pub objects: Vec<ObjectDescriptor>,
}

impl LevelDef {
    pub fn from_ron(text: &str) -> Result<Self, LevelError> {
        let level: LevelDef = ron::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Check every descriptor before anything is spawned.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.authored_size.x <= 0.0 || self.authored_size.y <= 0.0 {
            return Err(LevelError::InvalidSize {
                name: self.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        for descriptor in &self.objects {
            descriptor.data.validate()?;
            if !seen.insert(descriptor.data.id.as_str()) {
                return Err(LevelError::DuplicateId {
                    id: descriptor.data.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Sum of key positions over every slot in the level.
    pub fn required_slot_keys(&self) -> u32 {
        self.objects
            .iter()
            .filter_map(|descriptor| match &descriptor.kind {
                ObjectKind::KeySlot(slot) => Some(slot.required_keys.max(1)),
                _ => None,
            })
            .sum()
    }
}
