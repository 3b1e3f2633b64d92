//! Global uniform bindings for camera and lighting data
//!
//! Manages the GPU uniform buffer and bind group for per-frame global state
//! shared by every mesh: camera matrices, the directional light, and the
//! light's view-projection for shadow mapping.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the GlobalUniform struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    light_position: [f32; 3],
    ambient_intensity: f32,
    light_color: [f32; 3],
    light_intensity: f32,
    light_view_proj: [[f32; 4]; 4],
}
// Total: 16 + 64 + 12 + 4 + 12 + 4 + 64 = 176 bytes

unsafe impl bytemuck::Pod for GlobalUBOContent {}
unsafe impl bytemuck::Zeroable for GlobalUBOContent {}

/// Directional light configuration
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: f32,
}

impl Default for LightConfig {
    /// White directional light over the court plus a flat ambient term
    fn default() -> Self {
        Self {
            position: [10.0, 20.0, 15.0],
            color: [1.0, 1.0, 1.0],
            intensity: 0.8,
            ambient: 0.5,
        }
    }
}

/// The light's orthographic view-projection used for shadow mapping
///
/// Bounds cover the whole court (30 x 15 slab plus hoops at x = ±15.5).
pub fn light_view_projection(light: &LightConfig) -> cgmath::Matrix4<f32> {
    let light_pos = cgmath::Point3::new(light.position[0], light.position[1], light.position[2]);
    let light_view = cgmath::Matrix4::look_at_rh(
        light_pos,
        cgmath::Point3::new(0.0, 0.0, 0.0),
        cgmath::Vector3::unit_y(),
    );
    let light_proj = cgmath::ortho(-25.0, 25.0, -25.0, 25.0, 1.0, 60.0);
    light_proj * light_view
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called each frame so the shaders see the current camera pose; the light
/// is static in this scene but the path supports changing it.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: LightConfig,
) {
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,

        light_position: light.position,
        ambient_intensity: light.ambient,
        light_color: light.color,
        light_intensity: light.intensity,
        light_view_proj: light_view_projection(&light).into(),
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // Camera + light
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Creates the bind group with the provided uniform buffer
    ///
    /// Must be called before any rendering operation that needs globals.
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    /// Returns the bind group layout for pipeline creation
    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Returns the bind group for rendering
    ///
    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_groups(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn default_light_matches_scene_setup() {
        let light = LightConfig::default();
        assert_eq!(light.position, [10.0, 20.0, 15.0]);
        assert!((light.intensity - 0.8).abs() < 1e-6);
        assert!((light.ambient - 0.5).abs() < 1e-6);
    }

    #[test]
    fn light_view_projection_is_invertible() {
        let vp = light_view_projection(&LightConfig::default());
        assert!(vp.invert().is_some());
    }
}
