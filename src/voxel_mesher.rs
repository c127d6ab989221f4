use std::collections::HashSet;

use glam::{IVec3, Vec3};

use crate::block::Block;
use crate::mesh::Vertex;
use crate::world::World;

/// Block colour, sRGB `#1ec876`.
const BLOCK_SRGB: [u8; 3] = [0x1e, 0xc8, 0x76];
/// Ambient term, sRGB `#404040`.
const AMBIENT: f32 = 0x40 as f32 / 255.0;
/// Point light far enough away to treat as directional.
const LIGHT_POS: Vec3 = Vec3::new(-100.0, 200.0, 100.0);

struct Face {
    normal: IVec3,
    // Corner offsets from the block's min corner, counter-clockwise from outside.
    corners: [[f32; 3]; 4],
}

const FACES: [Face; 6] = [
    Face {
        normal: IVec3::X,
        corners: [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    },
    Face {
        normal: IVec3::NEG_X,
        corners: [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
    },
    Face {
        normal: IVec3::Y,
        corners: [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    },
    Face {
        normal: IVec3::NEG_Y,
        corners: [[1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
    },
    Face {
        normal: IVec3::Z,
        corners: [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
    },
    Face {
        normal: IVec3::NEG_Z,
        corners: [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
    },
];

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn face_color(normal: IVec3) -> [f32; 3] {
    let light_dir = LIGHT_POS.normalize();
    let diffuse = normal.as_vec3().dot(light_dir).max(0.0);
    let shade = (AMBIENT + diffuse).min(1.0);
    BLOCK_SRGB.map(|c| srgb_to_linear(c) * shade)
}

/// Builds one mesh for the whole world. Faces shared with a neighbouring
/// block are skipped, and overlapping blocks are drawn once.
pub fn mesh_world(world: &World) -> (Vec<Vertex>, Vec<u32>) {
    let mut verts: Vec<Vertex> = Vec::new();
    let mut inds: Vec<u32> = Vec::new();
    if world.is_empty() {
        return (verts, inds);
    }

    let mut occupied: HashSet<IVec3> = HashSet::with_capacity(world.len());
    let mut order: Vec<IVec3> = Vec::with_capacity(world.len());
    for b in world.iter() {
        if occupied.insert(b.position) {
            order.push(b.position);
        }
    }

    for pos in order {
        let min = pos.as_vec3() - Vec3::splat(Block::HALF_EXTENT);
        for face in &FACES {
            if occupied.contains(&(pos + face.normal)) {
                continue;
            }
            let color = face_color(face.normal);
            let corners = face.corners.map(|c| (min + Vec3::from_array(c)).to_array());
            push_face(&mut verts, &mut inds, color, corners);
        }
    }

    (verts, inds)
}

#[inline]
fn push_face(verts: &mut Vec<Vertex>, inds: &mut Vec<u32>, color: [f32; 3], corners: [[f32; 3]; 4]) {
    let base = verts.len() as u32;

    verts.extend(corners.into_iter().map(|pos| Vertex { pos, color }));

    // two triangles (0,1,2) and (0,2,3)
    inds.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_world_has_empty_mesh() {
        let (v, i) = mesh_world(&World::new());
        assert!(v.is_empty());
        assert!(i.is_empty());
    }

    #[test]
    fn lone_block_has_six_faces() {
        let mut world = World::new();
        world.add_block(IVec3::new(3, 1, -2));
        let (v, i) = mesh_world(&world);
        assert_eq!(v.len(), 24);
        assert_eq!(i.len(), 36);

        for vert in &v {
            let p = Vec3::from_array(vert.pos);
            assert!((p.x - 3.0).abs() <= 0.5 + 1e-6);
            assert!((p.y - 1.0).abs() <= 0.5 + 1e-6);
            assert!((p.z + 2.0).abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn shared_faces_are_culled() {
        let mut world = World::new();
        world.add_block(IVec3::ZERO);
        world.add_block(IVec3::X);
        let (v, _) = mesh_world(&world);
        assert_eq!(v.len(), 10 * 4);
    }

    #[test]
    fn overlapping_blocks_draw_once() {
        let mut world = World::new();
        world.add_block(IVec3::ZERO);
        world.add_block(IVec3::ZERO);
        let (v, _) = mesh_world(&world);
        assert_eq!(v.len(), 24);
    }

    #[test]
    fn default_floor_shows_tops_and_rim() {
        let world = World::with_floor(5, 5);
        let (v, _) = mesh_world(&world);
        // 121 tops + 121 bottoms + 4 * 11 rim faces
        assert_eq!(v.len() / 4, 121 * 2 + 44);
    }

    #[test]
    fn top_faces_are_lit_brighter_than_bottoms() {
        let top = face_color(IVec3::Y);
        let bottom = face_color(IVec3::NEG_Y);
        assert!(top[1] > bottom[1]);
    }
}
