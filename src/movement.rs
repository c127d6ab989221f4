use crate::camera::Camera;
use crate::config::MovementSettings;
use crate::input::InputState;
use crate::player::Player;

/// One frame of walking and vertical physics.
///
/// Walking ignores blocks entirely; only the flat floor at
/// `ground_height` stops a fall. Opposing keys both apply and cancel out.
pub fn integrate(player: &mut Player, camera: &Camera, input: InputState, cfg: &MovementSettings) {
    if !player.grounded {
        player.velocity_y -= cfg.gravity;
    }

    let forward = camera.forward_flat();
    let right = camera.right();

    if input.move_fwd {
        player.position += forward * cfg.speed;
    }
    if input.move_back {
        player.position += forward * -cfg.speed;
    }
    if input.move_left {
        player.position += right * -cfg.speed;
    }
    if input.move_right {
        player.position += right * cfg.speed;
    }

    player.position.y += player.velocity_y;

    if player.position.y <= cfg.ground_height {
        player.velocity_y = 0.0;
        player.position.y = cfg.ground_height;
        player.grounded = true;
    } else {
        player.grounded = false;
    }
}
