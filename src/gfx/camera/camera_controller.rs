use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Accumulates pointer input and applies it to the camera once per frame
///
/// Drag orbits, shift-drag pans, scroll dollies. When `enabled` is false both
/// accumulation and application stop, matching the stock orbit-control
/// contract: pointer input during a disabled stretch is discarded, not
/// deferred.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    enabled: bool,
    is_shift_held: bool,
    is_mouse_pressed: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: (f32, f32),
    pending_zoom: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enabled: true,
            is_shift_held: false,
            is_mouse_pressed: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: (0.0, 0.0),
            pending_zoom: 0.0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Accumulates a pointer event into the pending deltas
    pub fn process_events(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                if !self.enabled {
                    return;
                }
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.pending_zoom += scroll_amount * self.zoom_speed;
            }
            DeviceEvent::MouseMotion { delta } => {
                if !self.enabled || !self.is_mouse_pressed {
                    return;
                }
                if self.is_shift_held {
                    // SHIFT + DRAG = PAN (move focus point)
                    self.pending_pan.0 += -delta.0 as f32 * self.pan_speed;
                    self.pending_pan.1 += delta.1 as f32 * self.pan_speed;
                } else {
                    // NORMAL DRAG = ROTATE (orbit around focus)
                    self.pending_yaw += -delta.0 as f32 * self.rotate_speed;
                    self.pending_pitch += delta.1 as f32 * self.rotate_speed;
                }
            }
            _ => (),
        }
    }

    /// Tracks modifier keys (shift switches drag from orbit to pan)
    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            self.is_shift_held = *state == ElementState::Pressed;
        }
    }

    /// Applies the accumulated deltas to the camera and clears them
    ///
    /// A no-op for pointer input when disabled; pending sums are dropped so
    /// a re-enable does not replay stale input.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if !self.enabled {
            self.clear_pending();
            return;
        }

        if self.pending_yaw != 0.0 {
            camera.add_yaw(self.pending_yaw);
        }
        if self.pending_pitch != 0.0 {
            camera.add_pitch(self.pending_pitch);
        }
        if self.pending_pan != (0.0, 0.0) {
            camera.pan(self.pending_pan);
        }
        if self.pending_zoom != 0.0 {
            camera.add_distance(self.pending_zoom);
        }
        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan = (0.0, 0.0);
        self.pending_zoom = 0.0;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn drag(controller: &mut CameraController, dx: f64, dy: f64) {
        controller.process_events(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        });
        controller.process_events(&DeviceEvent::MouseMotion { delta: (dx, dy) });
    }

    #[test]
    fn drag_orbits_the_camera() {
        let mut camera = OrbitCamera::new(10.0, 0.3, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut controller = CameraController::new(0.005, 0.1);

        drag(&mut controller, 40.0, -20.0);
        controller.update(&mut camera);

        assert!((camera.yaw - (0.2 - 40.0 * 0.005)).abs() < 1e-5);
        assert!((camera.pitch - (0.3 - 20.0 * 0.005)).abs() < 1e-5);
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let mut camera = OrbitCamera::new(10.0, 0.3, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut controller = CameraController::new(0.005, 0.1);

        controller.set_enabled(false);
        drag(&mut controller, 40.0, -20.0);
        controller.update(&mut camera);

        assert!((camera.yaw - 0.2).abs() < 1e-6);
        assert!((camera.pitch - 0.3).abs() < 1e-6);
    }

    #[test]
    fn re_enable_does_not_replay_stale_input(){
        let mut camera = OrbitCamera::new(10.0, 0.3, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut controller = CameraController::new(0.005, 0.1);

        // Input while disabled must not leak into the next enabled frame
        controller.set_enabled(false);
        drag(&mut controller, 100.0, 100.0);
        controller.update(&mut camera);
        controller.set_enabled(true);
        controller.update(&mut camera);

        assert!((camera.yaw - 0.2).abs() < 1e-6);
        assert!((camera.pitch - 0.3).abs() < 1e-6);
    }

    #[test]
    fn wheel_input_accumulates_into_zoom() {
        let mut camera = OrbitCamera::new(10.0, 0.3, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut controller = CameraController::new(0.005, 0.1);

        controller.process_events(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, -2.0),
        });
        controller.update(&mut camera);

        assert!(camera.distance > 10.0);
    }
}
