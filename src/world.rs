use std::ops::RangeInclusive;

use glam::IVec3;

use crate::block::{Block, BlockId};
use crate::ray::Ray;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub block: BlockId,
    pub position: IVec3,
    pub distance: f32,
}

/// Flat list of placed blocks. Linear scans are fine at a few hundred
/// blocks; a spatial hash could sit behind the same API for larger worlds.
#[derive(Debug, Default)]
pub struct World {
    blocks: Vec<Block>,
    next_id: u64,
    dirty: bool,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floor(extent_x: u32, extent_z: u32) -> Self {
        let mut world = Self::new();
        world.initialize(extent_x, extent_z);
        world
    }

    /// Fills `[-extent_x, extent_x] x [-extent_z, extent_z]` at y = 0,
    /// bounds inclusive.
    pub fn initialize(&mut self, extent_x: u32, extent_z: u32) {
        for x in floor_span(extent_x) {
            for z in floor_span(extent_z) {
                self.add_block(IVec3::new(x, 0, z));
            }
        }
    }

    /// Overlapping placements are allowed.
    pub fn add_block(&mut self, position: IVec3) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.push(Block::new(id, position));
        self.dirty = true;
        id
    }

    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let Some(index) = self.blocks.iter().position(|b| b.id == id) else {
            return false;
        };
        self.blocks.remove(index);
        self.dirty = true;
        true
    }

    #[cfg(test)]
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    #[cfg(test)]
    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    #[cfg(test)]
    pub fn blocks_at(&self, position: IVec3) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().filter(move |b| b.position == position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns whether the world changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// All blocks the ray enters, nearest first. Equal distances keep
    /// insertion order.
    pub fn raycast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .blocks
            .iter()
            .filter_map(|b| {
                ray.intersect_unit_cube(b.center()).map(|distance| RayHit {
                    block: b.id,
                    position: b.position,
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn first_hit(&self, ray: &Ray) -> Option<RayHit> {
        self.raycast(ray).into_iter().next()
    }
}

/// Extents past `i32::MAX` saturate instead of wrapping negative.
fn floor_span(extent: u32) -> RangeInclusive<i32> {
    let e = i32::try_from(extent).unwrap_or(i32::MAX);
    -e..=e
}
