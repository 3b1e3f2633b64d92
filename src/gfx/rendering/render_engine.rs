//! WGPU-based rendering engine
//!
//! Provides high-level rendering functionality built on top of wgpu, including
//! pipeline management, depth testing, and cached shadow mapping. Each frame
//! draws the scene in three buckets (opaque, lines, transparent) so blended
//! surfaces composite over everything behind them.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
            texture_resource::TextureResource,
        },
        scene::{node::node_bind_group_layout, DrawMesh, MeshNode, Scene},
    },
    wgpu_utils::{binding_builder::BindGroupLayoutBuilder, binding_types},
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::shadow_cache::ShadowCache;

const SHADOW_MAP_SIZE: u32 = 2048;

/// Errors that can occur while bringing up the GPU context
#[derive(Debug, thiserror::Error)]
pub enum RenderInitError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles all low-level graphics operations including:
/// - Surface and device management
/// - Pipeline creation and management
/// - Depth buffer handling
/// - Shadow mapping with caching for static scenes
/// - Camera uniform updates
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,

    light_config: LightConfig,
    shadow_cache: ShadowCache,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, creates depth and shadow buffers, and registers the
    /// shadow, opaque, line, and transparent pipelines.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface configured: {:?} at {}x{}", format, width, height);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map = TextureResource::create_shadow_map(&device, SHADOW_MAP_SIZE);

        // Group 3: shadow map with comparison sampler for hardware PCF
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group Layout");

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Bind Group"),
            layout: &shadow_layout.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let light_config = LightConfig::default();
        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        // Group 1: per-node transform, must match Scene::init_gpu_resources
        let node_layout = node_bind_group_layout(&device);

        // Group 2: material uniforms, same structure MaterialBindings builds
        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(&device, "Material Bind Group Layout");

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("shaders/scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shaders/shadow.wgsl"));

        let scene_layouts = vec![
            global_bindings.bind_group_layouts().clone(),
            node_layout.layout.clone(),
            material_layout.layout.clone(),
            shadow_layout.layout.clone(),
        ];

        // Shadow depth pass: no culling so thin geometry still occludes
        pipeline_manager.register_pipeline(
            "Shadow",
            PipelineConfig::default()
                .with_label("Shadow Pipeline")
                .with_shader("shadow")
                .with_vertex_only()
                .with_depth_stencil(shadow_map.texture.clone())
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    node_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            "Opaque",
            PipelineConfig::default()
                .with_label("Opaque Pipeline")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_bind_group_layouts(scene_layouts.clone())
                .with_surface_target(format),
        );

        pipeline_manager.register_pipeline(
            "Line",
            PipelineConfig::default()
                .with_label("Line Pipeline")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_depth_stencil(depth_texture.texture.clone())
                .with_bind_group_layouts(scene_layouts.clone())
                .with_surface_target(format),
        );

        // Transparent surfaces blend over the scene; depth writes stay off so
        // geometry behind the backboard still shows through
        pipeline_manager.register_pipeline(
            "Transparent",
            PipelineConfig::default()
                .with_label("Transparent Pipeline")
                .with_cull_mode(None)
                .with_depth_stencil(depth_texture.texture.clone())
                .with_depth_write(false)
                .with_blend(Some(wgpu::BlendState::ALPHA_BLENDING))
                .with_bind_group_layouts(scene_layouts)
                .with_surface_target(format),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("{}", error);
            }
        }

        Ok(RenderEngine {
            device: device_handle,
            config,
            format,
            surface,
            queue: queue_handle,
            depth_texture,
            pipeline_manager,
            global_bindings,
            global_ubo,
            shadow_map,
            shadow_bind_group,
            light_config,
            shadow_cache: ShadowCache::new(),
        })
    }

    /// Renders one frame of the scene
    ///
    /// Regenerates the shadow map if the cache is stale, then draws the scene
    /// in three buckets: opaque triangles, line markings, and finally
    /// transparent surfaces.
    pub fn render_frame(&mut self, scene: &Scene) {
        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to get surface texture!");

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let meshes = scene.meshes();

        // PASS 1: Shadow map, only when the cached map is stale
        if self.shadow_cache.needs_update(&self.light_config) {
            log::debug!("Regenerating shadow map");

            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);

            if let Some(shadow_pipeline) = self.pipeline_manager.get_pipeline("Shadow") {
                shadow_pass.set_pipeline(shadow_pipeline);

                for mesh in meshes.iter().copied().filter(|m| m.cast_shadow) {
                    if let Some(node_bind_group) = mesh.node_bind_group() {
                        shadow_pass.set_bind_group(1, node_bind_group, &[]);
                        shadow_pass.draw_mesh(mesh);
                    }
                }
            }

            drop(shadow_pass);
            self.shadow_cache.mark_valid(self.light_config);
        }

        // PASS 2: Main rendering with shadows
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            let opaque = meshes.iter().copied().filter(|&m| {
                m.topology == wgpu::PrimitiveTopology::TriangleList
                    && !scene.material_for_mesh(m).is_transparent()
            });
            let lines = meshes
                .iter()
                .copied()
                .filter(|m| m.topology == wgpu::PrimitiveTopology::LineList);
            let transparent = meshes.iter().copied().filter(|&m| {
                m.topology == wgpu::PrimitiveTopology::TriangleList
                    && scene.material_for_mesh(m).is_transparent()
            });

            Self::draw_bucket(
                &mut self.pipeline_manager,
                &mut render_pass,
                scene,
                "Opaque",
                opaque,
            );
            Self::draw_bucket(
                &mut self.pipeline_manager,
                &mut render_pass,
                scene,
                "Line",
                lines,
            );
            Self::draw_bucket(
                &mut self.pipeline_manager,
                &mut render_pass,
                scene,
                "Transparent",
                transparent,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Draws one pipeline's worth of meshes with their material bind groups
    fn draw_bucket<'a>(
        pipeline_manager: &mut PipelineManager,
        render_pass: &mut wgpu::RenderPass<'_>,
        scene: &Scene,
        pipeline_name: &str,
        meshes: impl Iterator<Item = &'a MeshNode>,
    ) {
        let Some(pipeline) = pipeline_manager.get_pipeline(pipeline_name) else {
            log::error!("Pipeline '{}' not found", pipeline_name);
            return;
        };
        render_pass.set_pipeline(pipeline);

        for mesh in meshes {
            let material = scene.material_for_mesh(mesh);
            let (Some(node_bind_group), Some(material_bind_group)) =
                (mesh.node_bind_group(), material.get_bind_group())
            else {
                log::warn!("Skipping '{}': GPU resources missing", mesh.name);
                continue;
            };

            render_pass.set_bind_group(1, node_bind_group, &[]);
            render_pass.set_bind_group(2, material_bind_group, &[]);
            render_pass.draw_mesh(mesh);
        }
    }

    /// Updates camera and light uniform buffers
    ///
    /// Should be called each frame with the current camera pose.
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            self.light_config,
        );
    }

    /// Updates the light configuration
    ///
    /// Invalidates the shadow cache so the map regenerates next frame.
    pub fn set_light(&mut self, light_config: LightConfig) {
        if self.light_config != light_config {
            self.light_config = light_config;
            self.shadow_cache.invalidate();
        }
    }

    /// Gets the current light configuration
    pub fn get_light(&self) -> LightConfig {
        self.light_config
    }

    /// Resizes the render engine surface and recreates the depth buffer
    ///
    /// Zero-sized dimensions (minimized window) are ignored. The shadow map
    /// keeps its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Forces shadow map regeneration on the next frame
    pub fn invalidate_shadow_cache(&mut self) {
        self.shadow_cache.invalidate();
    }

    /// Whether the cached shadow map is still usable
    pub fn is_shadow_cache_valid(&self) -> bool {
        self.shadow_cache.is_valid()
    }

    /// Toggles vertical synchronization
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = if enable {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::Immediate
        };
        self.surface.configure(&self.device, &self.config);
    }
}
