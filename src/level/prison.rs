//! The prison level: two keys on the floor, two NPCs, and a two-key lock.

use super::def::*;
use crate::shared::*;

const AUTHORED_WIDTH: f32 = SCREEN_WIDTH;
const AUTHORED_HEIGHT: f32 = SCREEN_HEIGHT;

fn key_item(id: &str, position: CanvasPoint) -> ObjectDescriptor {
    ObjectDescriptor {
        kind: ObjectKind::Item(ItemDef::default()),
        data: SpriteData {
            id: id.into(),
            greeting: None,
            src: "images/gamify/koy.png".into(),
            pixels: PixelSize { width: 64.0, height: 64.0 },
            grid: SheetGrid { rows: 1, columns: 1 },
            frames: DirectionFrames {
                down: Some(FrameRange { row: 0, start: 0, columns: 1 }),
                ..Default::default()
            },
            scale_factor: 10.0,
            step_factor: 1000.0,
            animation_rate: 50,
            position,
            hitbox: Hitbox {
                width_percentage: 0.2,
                height_percentage: 0.2,
            },
        },
    }
}

pub fn prison_level() -> LevelDef {
    let (width, height) = (AUTHORED_WIDTH, AUTHORED_HEIGHT);

    let player_scale = 8.0;
    let player = ObjectDescriptor {
        kind: ObjectKind::Player,
        data: SpriteData {
            id: "player".into(),
            greeting: Some("Hello, please help me escape this prison.".into()),
            src: "images/gamify/Dora.png".into(),
            pixels: PixelSize { width: 192.0, height: 256.0 },
            grid: SheetGrid { rows: 4, columns: 3 },
            frames: DirectionFrames {
                down: Some(FrameRange { row: 0, start: 0, columns: 3 }),
                up: Some(FrameRange { row: 1, start: 0, columns: 3 }),
                right: Some(FrameRange { row: 2, start: 0, columns: 3 }),
                left: Some(FrameRange { row: 3, start: 0, columns: 3 }),
            },
            scale_factor: player_scale,
            step_factor: 1000.0,
            animation_rate: 12,
            position: CanvasPoint::new(0.0, height - height / player_scale),
            hitbox: Hitbox {
                width_percentage: 0.45,
                height_percentage: 0.2,
            },
        },
    };

    let questgiver = ObjectDescriptor {
        kind: ObjectKind::Npc(NpcDef {
            progress_greeting: Some(ProgressGreetingDef {
                threshold: 2,
                complete: "Thank you for finding both keys! You are now free to leave.".into(),
            }),
            ..Default::default()
        }),
        data: SpriteData {
            id: "Questgiver".into(),
            greeting: Some(
                "I am boots! Find a key nearby and pick it up... \
                 Maybe go and ask that map thing over there!"
                    .into(),
            ),
            src: "images/gamify/bots.png".into(),
            pixels: PixelSize { width: 2048.0, height: 512.0 },
            grid: SheetGrid { rows: 1, columns: 4 },
            frames: DirectionFrames {
                down: Some(FrameRange { row: 0, start: 0, columns: 3 }),
                ..Default::default()
            },
            scale_factor: 6.0,
            step_factor: 1000.0,
            animation_rate: 50,
            position: CanvasPoint::new(width / 3.0, height / 3.0),
            hitbox: Hitbox {
                width_percentage: 0.1,
                height_percentage: 0.2,
            },
        },
    };

    let map = ObjectDescriptor {
        kind: ObjectKind::Npc(NpcDef {
            quiz: Some(QuizDef {
                title: "Linux Command Quiz".into(),
                questions: vec![
                    "Which command lists the files in a directory?".into(),
                    "Which command changes the current directory?".into(),
                    "Which command prints the working directory?".into(),
                ],
            }),
            ..Default::default()
        }),
        data: SpriteData {
            id: "Map".into(),
            greeting: Some(
                "Hi I am Map. Walk over a key to pick it up, then bring two to the lock.".into(),
            ),
            src: "images/gamify/Map.png".into(),
            pixels: PixelSize { width: 256.0, height: 64.0 },
            grid: SheetGrid { rows: 1, columns: 4 },
            frames: DirectionFrames {
                down: Some(FrameRange { row: 0, start: 0, columns: 3 }),
                ..Default::default()
            },
            scale_factor: 10.0,
            step_factor: 1000.0,
            animation_rate: 50,
            position: CanvasPoint::new(width / 2.0, height / 2.0),
            hitbox: Hitbox {
                width_percentage: 0.1,
                height_percentage: 0.2,
            },
        },
    };

    let lock = ObjectDescriptor {
        kind: ObjectKind::KeySlot(KeySlotDef {
            slot_index: 0,
            required_keys: 2,
        }),
        data: SpriteData {
            id: "cell_door".into(),
            greeting: None,
            src: "images/gamify/keyslot.png".into(),
            pixels: PixelSize { width: 64.0, height: 64.0 },
            grid: SheetGrid { rows: 1, columns: 1 },
            frames: DirectionFrames {
                down: Some(FrameRange { row: 0, start: 0, columns: 1 }),
                ..Default::default()
            },
            scale_factor: 10.0,
            step_factor: 1000.0,
            animation_rate: 50,
            position: CanvasPoint::new(width * 0.8, height / 4.0),
            hitbox: Hitbox::default(),
        },
    };

    let item_scale = 10.0;
    LevelDef {
        name: "prison".into(),
        authored_size: CanvasPoint::new(width, height),
        victory: VictoryRule::SlotsFilled,
        objects: vec![
            player,
            key_item("key_1", CanvasPoint::new(200.0, height - height / item_scale - 100.0)),
            key_item("key_2", CanvasPoint::new(400.0, height - height / item_scale - 300.0)),
            questgiver,
            map,
            lock,
        ],
    }
}
