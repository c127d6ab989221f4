#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// Held movement keys, sampled once per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub move_fwd: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
}

impl InputState {
    pub fn set(&mut self, key: MoveKey, down: bool) {
        match key {
            MoveKey::Forward => self.move_fwd = down,
            MoveKey::Backward => self.move_back = down,
            MoveKey::Left => self.move_left = down,
            MoveKey::Right => self.move_right = down,
        }
    }

    pub fn any(&self) -> bool {
        self.move_fwd || self.move_back || self.move_left || self.move_right
    }
}
