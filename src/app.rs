//! Application shell: window, event loop, and per-frame driving
//!
//! Owns the winit event loop and wires input to the orbit camera. The "o"
//! key toggles orbit control on and off; while disabled, pointer input is
//! dropped rather than queued.

use cgmath::Vector3;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::Key,
    window::{Window, WindowAttributes},
};

use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::OrbitCamera,
    },
    rendering::RenderEngine,
    scene::Scene,
};

const INITIAL_WIDTH: u32 = 1200;
const INITIAL_HEIGHT: u32 = 800;

/// Initial camera eye position, looking down at center court
const CAMERA_EYE: Vector3<f32> = Vector3::new(0.0, 15.0, 30.0);

/// Errors that can occur while setting up or running the application
#[derive(Debug, thiserror::Error)]
pub enum AppInitError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Top-level application object
///
/// Created once in `main`, populated with the scene, then consumed by
/// [`CourtApp::run`] which drives the event loop until exit.
pub struct CourtApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    orbit_enabled: bool,
}

impl AppState {
    fn toggle_orbit(&mut self) {
        self.orbit_enabled = !self.orbit_enabled;
        log::info!(
            "Orbit camera {}",
            if self.orbit_enabled { "enabled" } else { "disabled" }
        );
    }
}

impl CourtApp {
    /// Creates the application with the default camera pose
    pub fn new() -> Result<Self, AppInitError> {
        let event_loop = EventLoop::new()?;

        let aspect = INITIAL_WIDTH as f32 / INITIAL_HEIGHT as f32;
        let mut camera = OrbitCamera::looking_at(CAMERA_EYE, Vector3::new(0.0, 0.0, 0.0), aspect);
        camera.bounds.min_distance = Some(1.0);
        let controller = CameraController::new(0.005, 0.1);

        let camera_manager = CameraManager::new(camera, controller);
        let scene = Scene::new(camera_manager);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                scene,
                orbit_enabled: true,
            },
        })
    }

    /// Mutable access to the scene for construction before `run`
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.app_state.scene
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }

    /// Runs the application (consumes self and starts the event loop)
    pub fn run(mut self) -> Result<(), AppInitError> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Basketball Court")
                .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            })
            .expect("Failed to initialize the render engine");

            self.scene
                .init_gpu_resources(renderer.device(), renderer.queue());
            self.scene
                .camera_manager
                .camera
                .resize_projection(width, height);

            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    match &event.logical_key {
                        Key::Character(text) if matches!(text.as_str(), "o" | "O") => {
                            self.toggle_orbit();
                        }
                        Key::Named(winit::keyboard::NamedKey::Escape) => {
                            event_loop.exit();
                        }
                        _ => (),
                    }
                }
                self.scene.camera_manager.process_keyboard_event(&event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.scene
                    .camera_manager
                    .controller
                    .set_enabled(self.orbit_enabled);
                self.scene.camera_manager.update();
                self.scene.update();

                render_engine.update(self.scene.camera_manager.camera.uniform);
                render_engine.render_frame(&self.scene);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        self.scene.camera_manager.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless_state() -> AppState {
        let camera = OrbitCamera::looking_at(CAMERA_EYE, Vector3::new(0.0, 0.0, 0.0), 1.5);
        let controller = CameraController::new(0.005, 0.1);
        AppState {
            window: None,
            render_engine: None,
            scene: Scene::new(CameraManager::new(camera, controller)),
            orbit_enabled: true,
        }
    }

    #[test]
    fn orbit_starts_enabled() {
        let state = headless_state();
        assert!(state.orbit_enabled);
    }

    #[test]
    fn toggle_flips_on_every_press() {
        let mut state = headless_state();

        for presses in 1..=5 {
            state.toggle_orbit();
            assert_eq!(state.orbit_enabled, presses % 2 == 0);
        }
    }

    #[test]
    fn disabled_orbit_freezes_the_camera() {
        let mut state = headless_state();
        state.toggle_orbit();
        state.scene.camera_manager.controller.set_enabled(state.orbit_enabled);

        let yaw_before = state.scene.camera_manager.camera.yaw;
        state
            .scene
            .camera_manager
            .process_event(&winit::event::DeviceEvent::Button {
                button: 0,
                state: ElementState::Pressed,
            });
        state
            .scene
            .camera_manager
            .process_event(&winit::event::DeviceEvent::MouseMotion { delta: (40.0, 0.0) });
        state.scene.camera_manager.update();

        assert_eq!(state.scene.camera_manager.camera.yaw, yaw_before);
    }
}
