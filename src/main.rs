mod block;
mod camera;
mod command;
mod config;
mod error;
mod game;
mod gfx;
mod input;
mod interaction;
mod mesh;
mod movement;
mod player;
mod ray;
mod voxel_mesher;
mod world;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use command::{InputEvent, Interaction};
use config::Settings;
use game::Game;
use gfx::Gfx;
use input::MoveKey;

fn load_settings() -> anyhow::Result<Settings> {
    let path = Settings::path_from_env();
    match Settings::load(&path)? {
        Some(settings) => {
            log::info!("loaded settings from {}", path.display());
            Ok(settings)
        }
        None => {
            log::info!("no settings at {}, using defaults", path.display());
            Ok(Settings::default().sanitize())
        }
    }
}

fn grab_pointer(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(e) => {
            log::warn!("cursor grab failed: {e}");
            false
        }
    }
}

fn release_pointer(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        log::warn!("cursor release failed: {e}");
    }
    window.set_cursor_visible(true);
}

fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Backward),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        _ => None,
    }
}

/// Escape is not mapped here; the host releases the cursor itself.
fn key_event(code: KeyCode, down: bool, repeat: bool) -> Option<InputEvent> {
    match code {
        KeyCode::Space => (down && !repeat).then_some(InputEvent::Jump),
        _ => move_key(code).map(|key| {
            if down {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            }
        }),
    }
}

/// A right click yields both a secondary press and a context-menu request,
/// so an engaged right click places twice.
fn mouse_event(button: MouseButton, state: ElementState, cursor: Vec2) -> Option<InputEvent> {
    match (button, state) {
        (MouseButton::Left, ElementState::Pressed) => Some(InputEvent::MouseDown {
            action: Interaction::Primary,
            cursor,
        }),
        (MouseButton::Left, ElementState::Released) => Some(InputEvent::Click),
        (MouseButton::Right, ElementState::Pressed) => Some(InputEvent::MouseDown {
            action: Interaction::Secondary,
            cursor,
        }),
        (MouseButton::Right, ElementState::Released) => Some(InputEvent::ContextMenu { cursor }),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;

    let event_loop = EventLoop::new().context("create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(settings.window.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                settings.window.width,
                settings.window.height,
            ))
            .build(&event_loop)
            .context("create window")?,
    );

    let mut gfx = pollster::block_on(Gfx::new(window.clone()))?;
    let mut game = Game::new(&settings);
    game.set_viewport(gfx.size.width, gfx.size.height);

    let mut cursor = game.viewport().center();
    // Host-side cursor grab; the game learns about it through queued events.
    let mut grabbed = false;

    let tick_dt = Duration::from_secs(1) / settings.tick_rate;
    let mut next_tick = Instant::now() + tick_dt;

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::WaitUntil(next_tick));

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!(
                        "exiting after {} frames with {} blocks, player at {}",
                        game.frame_count(),
                        game.world().len(),
                        game.player().position
                    );
                    elwt.exit();
                }

                WindowEvent::Resized(size) => {
                    gfx.resize(size);
                    game.set_viewport(size.width, size.height);
                }

                WindowEvent::Focused(false) if grabbed => {
                    release_pointer(&window);
                    grabbed = false;
                    game.queue(InputEvent::PointerUnlocked);
                }

                WindowEvent::RedrawRequested => {
                    if game.take_world_dirty() {
                        let (verts, inds) = voxel_mesher::mesh_world(game.world());
                        gfx.set_mesh(&verts, &inds);
                    }
                    gfx.set_camera(game.view_proj());

                    match gfx.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gfx.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("surface out of memory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("render: {e}"),
                    }
                }

                WindowEvent::KeyboardInput { event, .. } => {
                    let down = event.state == ElementState::Pressed;
                    let PhysicalKey::Code(code) = event.physical_key else {
                        return;
                    };

                    if code == KeyCode::Escape {
                        if down && grabbed {
                            release_pointer(&window);
                            grabbed = false;
                            game.queue(InputEvent::PointerUnlocked);
                        }
                    } else if let Some(ev) = key_event(code, down, event.repeat) {
                        game.queue(ev);
                    }
                }

                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Vec2::new(position.x as f32, position.y as f32);
                }

                WindowEvent::MouseInput { state, button, .. } => {
                    if let Some(ev) = mouse_event(button, state, cursor) {
                        game.queue(ev);
                    }
                }

                _ => {}
            },

            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                if grabbed {
                    let (dx, dy) = delta;
                    game.queue(InputEvent::Look {
                        dx: dx as f32,
                        dy: dy as f32,
                    });
                }
            }

            Event::AboutToWait => {
                let now = Instant::now();
                if now >= next_tick {
                    game.frame();

                    // Engagement is granted after the frame, like the host's lock callback.
                    if game.take_pointer_lock_request() && !grabbed && grab_pointer(&window) {
                        grabbed = true;
                        game.queue(InputEvent::PointerLocked);
                    }

                    window.request_redraw();
                    next_tick += tick_dt;
                    if next_tick < now {
                        next_tick = now + tick_dt;
                    }
                }
            }

            _ => {}
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_held_keys() {
        assert_eq!(
            key_event(KeyCode::KeyW, true, false),
            Some(InputEvent::KeyDown(MoveKey::Forward))
        );
        assert_eq!(
            key_event(KeyCode::KeyS, false, false),
            Some(InputEvent::KeyUp(MoveKey::Backward))
        );
        assert_eq!(
            key_event(KeyCode::KeyA, true, true),
            Some(InputEvent::KeyDown(MoveKey::Left))
        );
        assert_eq!(
            key_event(KeyCode::KeyD, false, false),
            Some(InputEvent::KeyUp(MoveKey::Right))
        );
        assert_eq!(key_event(KeyCode::KeyQ, true, false), None);
    }

    #[test]
    fn space_jumps_on_fresh_press_only() {
        assert_eq!(key_event(KeyCode::Space, true, false), Some(InputEvent::Jump));
        assert_eq!(key_event(KeyCode::Space, true, true), None);
        assert_eq!(key_event(KeyCode::Space, false, false), None);
    }

    #[test]
    fn escape_is_left_to_the_host() {
        assert_eq!(key_event(KeyCode::Escape, true, false), None);
    }

    #[test]
    fn mouse_buttons_map_to_interactions() {
        let cursor = Vec2::new(10.0, 20.0);
        assert_eq!(
            mouse_event(MouseButton::Left, ElementState::Pressed, cursor),
            Some(InputEvent::MouseDown {
                action: Interaction::Primary,
                cursor
            })
        );
        assert_eq!(
            mouse_event(MouseButton::Left, ElementState::Released, cursor),
            Some(InputEvent::Click)
        );
        assert_eq!(
            mouse_event(MouseButton::Right, ElementState::Pressed, cursor),
            Some(InputEvent::MouseDown {
                action: Interaction::Secondary,
                cursor
            })
        );
        assert_eq!(
            mouse_event(MouseButton::Right, ElementState::Released, cursor),
            Some(InputEvent::ContextMenu { cursor })
        );
        assert_eq!(mouse_event(MouseButton::Middle, ElementState::Pressed, cursor), None);
    }

    #[test]
    fn engaged_right_click_places_twice() {
        let mut settings = Settings::default();
        settings.camera.start_position = glam::Vec3::new(0.0, 6.0, 0.0);
        settings.camera.look_at = glam::Vec3::new(0.0, 0.0, -1.0);
        let mut game = Game::new(&settings);
        let cursor = game.viewport().center();
        game.queue(InputEvent::PointerLocked);
        game.frame();
        // Look straight down at the centre block.
        game.queue(InputEvent::Look {
            dx: 0.0,
            dy: 10_000.0,
        });
        game.frame();

        let before = game.world().len();
        for state in [ElementState::Pressed, ElementState::Released] {
            if let Some(ev) = mouse_event(MouseButton::Right, state, cursor) {
                game.queue(ev);
            }
        }
        game.frame();
        assert_eq!(game.world().len(), before + 2);
        assert_eq!(game.world().blocks_at(glam::IVec3::new(0, 1, 0)).count(), 1);
        assert_eq!(game.world().blocks_at(glam::IVec3::new(0, 2, 0)).count(), 1);
    }
}
