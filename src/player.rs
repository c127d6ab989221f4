use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct Player {
    /// Eye position; the camera sits here.
    pub position: Vec3,

    pub velocity_y: f32,
    pub grounded: bool,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity_y: 0.0,
            grounded: false,
        }
    }

    /// Jump gate. Returns whether the impulse was applied.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity_y += impulse;
        self.grounded = false;
        true
    }
}
