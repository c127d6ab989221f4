use glam::Vec3;

use crate::block::Block;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always unit length.
    pub dir: Vec3,
}

impl Ray {
    /// Returns `None` for a zero direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        let dir = dir.try_normalize()?;
        Some(Self { origin, dir })
    }

    #[cfg(test)]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Entry distance into the unit cube around `center`.
    ///
    /// Only faces looking toward the ray count, so a cube containing the
    /// origin (or lying behind it) is not hit.
    pub fn intersect_unit_cube(&self, center: Vec3) -> Option<f32> {
        let min = center - Vec3::splat(Block::HALF_EXTENT);
        let max = center + Vec3::splat(Block::HALF_EXTENT);

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.dir[axis];
            if dir.abs() < 1e-8 {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (min[axis] - origin) * inv;
            let mut t1 = (max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_far < t_near {
                return None;
            }
        }

        if t_near < 0.0 {
            return None;
        }
        Some(t_near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_cube_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        let t = ray.intersect_unit_cube(Vec3::ZERO).unwrap();
        assert!((t - 4.5).abs() < 1e-6);
        assert!((ray.at(t).z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn misses_cube_to_the_side() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        assert_eq!(ray.intersect_unit_cube(Vec3::ZERO), None);
    }

    #[test]
    fn ignores_cube_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).unwrap();
        assert_eq!(ray.intersect_unit_cube(Vec3::ZERO), None);
    }

    #[test]
    fn ignores_cube_containing_origin() {
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::new(1.0, 0.3, 0.2)).unwrap();
        assert_eq!(ray.intersect_unit_cube(Vec3::ZERO), None);
    }

    #[test]
    fn oblique_ray_enters_top_face() {
        let ray = Ray::new(Vec3::new(-3.0, 3.5, 0.0), Vec3::new(1.0, -1.0, 0.0)).unwrap();
        let t = ray.intersect_unit_cube(Vec3::ZERO).unwrap();
        let p = ray.at(t);
        assert!((p.y - 0.5).abs() < 1e-5);
        assert!(p.x.abs() < 1e-5);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Vec3::ONE, Vec3::ZERO).is_none());
    }
}
