//! Keyslot adventure library crate: re-exports all modules for integration
//! testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point. This library
//! exposes the same modules so that `tests/` can drive the game loop without a
//! window or GPU.

pub mod shared;
pub mod config;
pub mod input;
pub mod objects;
pub mod collision;
pub mod level;
pub mod player;
pub mod items;
pub mod npcs;
pub mod keyslots;
pub mod victory;
pub mod save;
pub mod ui;
