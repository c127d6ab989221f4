use glam::{IVec3, Vec2, Vec3};

use crate::block::BlockId;
use crate::camera::Camera;
use crate::command::Interaction;
use crate::world::{RayHit, World};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Pointer not engaged.
    Ignored,
    /// Nothing under the cursor.
    Missed,
    Removed { block: BlockId, position: IVec3 },
    Placed { block: BlockId, position: IVec3 },
}

/// Pixel position to [-1, 1] on both axes, Y up.
pub fn cursor_to_ndc(cursor: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        cursor.x / viewport.width * 2.0 - 1.0,
        -(cursor.y / viewport.height) * 2.0 + 1.0,
    )
}

/// Everything needed to aim a click.
#[derive(Debug, Clone, Copy)]
pub struct Aim<'a> {
    pub camera: &'a Camera,
    pub eye: Vec3,
    pub viewport: Viewport,
    pub engaged: bool,
}

pub fn resolve(action: Interaction, cursor: Vec2, aim: Aim<'_>, world: &mut World) -> InteractionOutcome {
    match action {
        Interaction::Primary => resolve_primary(cursor, aim, world),
        Interaction::Secondary => resolve_secondary(cursor, aim, world),
    }
}

/// Removes the nearest block under the cursor.
pub fn resolve_primary(cursor: Vec2, aim: Aim<'_>, world: &mut World) -> InteractionOutcome {
    if !aim.engaged {
        return InteractionOutcome::Ignored;
    }
    let Some(hit) = pick(cursor, aim, world) else {
        return InteractionOutcome::Missed;
    };
    world.remove_block(hit.block);
    InteractionOutcome::Removed {
        block: hit.block,
        position: hit.position,
    }
}

/// Stacks a new block directly above the nearest block under the cursor,
/// whichever face was struck.
pub fn resolve_secondary(cursor: Vec2, aim: Aim<'_>, world: &mut World) -> InteractionOutcome {
    if !aim.engaged {
        return InteractionOutcome::Ignored;
    }
    let Some(hit) = pick(cursor, aim, world) else {
        return InteractionOutcome::Missed;
    };
    let position = hit.position + IVec3::Y;
    let block = world.add_block(position);
    InteractionOutcome::Placed { block, position }
}

fn pick(cursor: Vec2, aim: Aim<'_>, world: &World) -> Option<RayHit> {
    let ndc = cursor_to_ndc(cursor, aim.viewport);
    let ray = aim.camera.ray_through(aim.eye, ndc)?;
    world.first_hit(&ray)
}
