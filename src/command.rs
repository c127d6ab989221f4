use glam::Vec2;

use crate::input::MoveKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Remove the targeted block.
    Primary,
    /// Place a block on top of the targeted block.
    Secondary,
}

/// Raw host input, queued and drained in order at the start of each frame.
/// Cursor positions are in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(MoveKey),
    KeyUp(MoveKey),
    Jump,
    MouseDown { action: Interaction, cursor: Vec2 },
    ContextMenu { cursor: Vec2 },
    Click,
    PointerLocked,
    PointerUnlocked,
    Look { dx: f32, dy: f32 },
}
