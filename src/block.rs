use glam::IVec3;

/// Stable handle for a placed block. Ids are never reused within a world,
/// so a handle to a removed block stays absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// Unit cube centred on an integer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub position: IVec3,
}

impl Block {
    pub const HALF_EXTENT: f32 = 0.5;

    pub fn new(id: BlockId, position: IVec3) -> Self {
        Self { id, position }
    }

    pub fn center(&self) -> glam::Vec3 {
        self.position.as_vec3()
    }
}
