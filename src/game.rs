use glam::{Mat4, Vec2};

use crate::camera::Camera;
use crate::command::{InputEvent, Interaction};
use crate::config::{MovementSettings, Settings};
use crate::input::InputState;
use crate::interaction::{self, Aim, InteractionOutcome, Viewport};
use crate::movement;
use crate::player::Player;
use crate::world::World;

/// All sandbox state. The host queues input and calls [`Game::frame`] once
/// per tick.
pub struct Game {
    frame: u64,
    world: World,
    player: Player,
    camera: Camera,
    input: InputState,
    pointer_engaged: bool,
    pointer_lock_requested: bool,
    pending: Vec<InputEvent>,
    viewport: Viewport,
    movement: MovementSettings,
    mouse_sensitivity: f32,
    log_every: u64,
}

impl Game {
    pub fn new(settings: &Settings) -> Self {
        let viewport = Viewport::new(settings.window.width, settings.window.height);
        let world = World::with_floor(settings.world.extent_x, settings.world.extent_z);
        log::info!("world initialized with {} blocks", world.len());

        Self {
            frame: 0,
            world,
            player: Player::new(settings.camera.start_position),
            camera: Camera::new(&settings.camera, viewport.aspect()),
            input: InputState::default(),
            pointer_engaged: false,
            pointer_lock_requested: false,
            pending: Vec::new(),
            viewport,
            movement: settings.movement,
            mouse_sensitivity: settings.camera.mouse_sensitivity,
            log_every: u64::from(settings.tick_rate.max(1)),
        }
    }

    pub fn queue(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Applies queued input in arrival order, then integrates one frame.
    pub fn frame(&mut self) {
        let events = std::mem::take(&mut self.pending);
        for event in events {
            self.dispatch(event);
        }

        self.frame += 1;
        movement::integrate(&mut self.player, &self.camera, self.input, &self.movement);

        if self.frame % self.log_every == 0 {
            let p = self.player.position;
            log::debug!(
                "POS x={:.2} y={:.2} z={:.2} vy={:.2} ground={} moving={} blocks={}",
                p.x,
                p.y,
                p.z,
                self.player.velocity_y,
                self.player.grounded,
                self.input.any(),
                self.world.len()
            );
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.input.set(key, true),
            InputEvent::KeyUp(key) => self.input.set(key, false),
            InputEvent::Jump => {
                if self.player.jump(self.movement.jump_impulse) {
                    log::debug!("jump");
                }
            }
            InputEvent::MouseDown { action, cursor } => {
                self.interact(action, cursor);
            }
            InputEvent::ContextMenu { cursor } => {
                if self.pointer_engaged {
                    self.interact(Interaction::Secondary, cursor);
                }
            }
            InputEvent::Click => self.pointer_lock_requested = true,
            InputEvent::PointerLocked => {
                self.pointer_engaged = true;
                log::info!("pointer engaged");
            }
            InputEvent::PointerUnlocked => {
                self.pointer_engaged = false;
                log::info!("pointer released");
            }
            InputEvent::Look { dx, dy } => {
                if self.pointer_engaged {
                    let s = self.mouse_sensitivity;
                    self.camera.add_look(-dx * s, -dy * s);
                }
            }
        }
    }

    fn interact(&mut self, action: Interaction, cursor: Vec2) {
        let aim = Aim {
            camera: &self.camera,
            eye: self.player.position,
            viewport: self.viewport,
            engaged: self.pointer_engaged,
        };
        match interaction::resolve(action, cursor, aim, &mut self.world) {
            InteractionOutcome::Removed { position, .. } => {
                log::info!("removed block at {position}");
            }
            InteractionOutcome::Placed { position, .. } => {
                log::info!("placed block at {position}");
            }
            InteractionOutcome::Missed => log::debug!("{action:?}: no target"),
            InteractionOutcome::Ignored => {}
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.aspect = self.viewport.aspect();
    }

    /// True once after a click asked for pointer engagement.
    pub fn take_pointer_lock_request(&mut self) -> bool {
        std::mem::take(&mut self.pointer_lock_requested)
    }

    pub fn take_world_dirty(&mut self) -> bool {
        self.world.take_dirty()
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.view_proj(self.player.position)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[cfg(test)]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[cfg(test)]
    pub fn pointer_engaged(&self) -> bool {
        self.pointer_engaged
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MoveKey;
    use glam::{IVec3, Vec3};

    fn game() -> Game {
        Game::new(&Settings::default())
    }

    /// Lets the player drop onto the floor from the start position.
    fn landed() -> Game {
        let mut g = game();
        while !g.player().grounded {
            g.frame();
            assert!(g.frame_count() < 200);
        }
        g
    }

    fn aim_down(g: &mut Game) {
        g.camera.yaw = 0.0;
        g.camera.pitch = -std::f32::consts::FRAC_PI_2;
    }

    #[test]
    fn starts_with_default_floor_and_falls() {
        let mut g = game();
        assert_eq!(g.world().len(), 121);
        assert!(!g.pointer_engaged());
        assert_eq!(g.player().position, Vec3::new(0.0, 6.0, 10.0));

        g.frame();
        assert!(g.player().position.y < 6.0);
        assert!(!g.player().grounded);
    }

    #[test]
    fn lands_on_ground_height() {
        let g = landed();
        assert_eq!(g.player().position.y, 2.0);
        assert_eq!(g.player().velocity_y, 0.0);
    }

    #[test]
    fn jump_is_applied_before_integration() {
        let mut g = landed();
        g.queue(InputEvent::Jump);
        g.frame();
        assert!((g.player().position.y - 2.66).abs() < 1e-5);
        assert!(!g.player().grounded);

        // A second jump in mid-air is ignored.
        g.queue(InputEvent::Jump);
        g.frame();
        assert!((g.player().velocity_y - 0.62).abs() < 1e-5);
    }

    #[test]
    fn held_keys_persist_until_released() {
        let mut g = landed();
        let z0 = g.player().position.z;
        g.camera.yaw = 0.0;

        g.queue(InputEvent::KeyDown(MoveKey::Forward));
        g.frame();
        g.frame();
        assert!((g.player().position.z - (z0 - 0.2)).abs() < 1e-5);

        g.queue(InputEvent::KeyUp(MoveKey::Forward));
        g.frame();
        assert!((g.player().position.z - (z0 - 0.2)).abs() < 1e-5);
        assert!(!g.input().any());
    }

    #[test]
    fn click_requests_lock_once() {
        let mut g = game();
        g.queue(InputEvent::Click);
        g.frame();
        assert!(g.take_pointer_lock_request());
        assert!(!g.take_pointer_lock_request());
        assert!(!g.pointer_engaged());

        g.queue(InputEvent::PointerLocked);
        g.frame();
        assert!(g.pointer_engaged());

        // Clicking while engaged still asks again; the host treats it as a no-op.
        g.queue(InputEvent::Click);
        g.frame();
        assert!(g.take_pointer_lock_request());
    }

    #[test]
    fn clicks_before_lock_do_nothing() {
        let mut g = landed();
        aim_down(&mut g);
        let center = g.viewport().center();
        g.queue(InputEvent::MouseDown {
            action: Interaction::Primary,
            cursor: center,
        });
        g.queue(InputEvent::ContextMenu { cursor: center });
        g.frame();
        assert_eq!(g.world().len(), 121);
    }

    #[test]
    fn engaged_clicks_edit_the_world() {
        let mut g = landed();
        g.player.position = Vec3::new(0.0, 2.0, 0.0);
        aim_down(&mut g);
        let center = g.viewport().center();

        g.queue(InputEvent::PointerLocked);
        g.queue(InputEvent::MouseDown {
            action: Interaction::Secondary,
            cursor: center,
        });
        g.frame();
        assert_eq!(g.world().len(), 122);
        assert_eq!(g.world().blocks_at(IVec3::new(0, 1, 0)).count(), 1);

        g.queue(InputEvent::MouseDown {
            action: Interaction::Primary,
            cursor: center,
        });
        g.frame();
        assert_eq!(g.world().len(), 121);
        assert_eq!(g.world().blocks_at(IVec3::new(0, 1, 0)).count(), 0);
    }

    #[test]
    fn context_menu_places_when_engaged() {
        let mut g = landed();
        g.player.position = Vec3::new(0.0, 2.0, 0.0);
        aim_down(&mut g);
        let center = g.viewport().center();

        g.queue(InputEvent::PointerLocked);
        g.queue(InputEvent::ContextMenu { cursor: center });
        g.frame();
        assert_eq!(g.world().len(), 122);

        g.queue(InputEvent::PointerUnlocked);
        g.queue(InputEvent::ContextMenu { cursor: center });
        g.frame();
        assert_eq!(g.world().len(), 122);
    }

    #[test]
    fn look_needs_engagement() {
        let mut g = game();
        let yaw = g.camera().yaw;
        g.queue(InputEvent::Look { dx: 100.0, dy: 0.0 });
        g.frame();
        assert_eq!(g.camera().yaw, yaw);

        g.queue(InputEvent::PointerLocked);
        g.queue(InputEvent::Look { dx: 100.0, dy: 50.0 });
        let pitch = g.camera().pitch;
        g.frame();
        assert!((g.camera().yaw - (yaw - 0.2)).abs() < 1e-5);
        assert!((g.camera().pitch - (pitch - 0.1)).abs() < 1e-5);
    }

    #[test]
    fn viewport_updates_aspect() {
        let mut g = game();
        g.set_viewport(1000, 500);
        assert_eq!(g.camera().aspect, 2.0);
        assert_eq!(g.viewport().center(), Vec2::new(500.0, 250.0));
    }

    #[test]
    fn world_dirty_after_edit() {
        let mut g = landed();
        assert!(g.take_world_dirty());
        assert!(!g.take_world_dirty());

        g.player.position = Vec3::new(0.0, 2.0, 0.0);
        aim_down(&mut g);
        let center = g.viewport().center();
        g.queue(InputEvent::PointerLocked);
        g.queue(InputEvent::MouseDown {
            action: Interaction::Primary,
            cursor: center,
        });
        g.frame();
        assert!(g.take_world_dirty());
    }
}
