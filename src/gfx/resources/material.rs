//! Material system
//!
//! Provides material definitions and centralized management with GPU resource
//! handling. Materials are stored in MaterialManager and meshes reference them
//! by id. Alpha below 1 routes a mesh to the transparent pipeline; `unlit`
//! selects flat shading in the fragment shader.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub unlit: f32,
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group management
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group Layout");

        MaterialBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &Device, ubo: &MaterialUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group"),
        );
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_groups(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

/// Material definition
///
/// Contains surface properties and GPU resources. Materials are stored
/// centrally in MaterialManager and shared between meshes.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// Flat shading: the fragment shader returns base_color untouched
    pub unlit: bool,

    // GPU resources - shared by all meshes using this material
    material_ubo: Option<MaterialUBO>,
    material_bindings: Option<MaterialBindings>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            unlit: false,
            material_ubo: None,
            material_bindings: None,
        }
    }
}

impl Material {
    /// Creates a new lit material
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            unlit: false,
            material_ubo: None,
            material_bindings: None,
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Disable lighting for this material
    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    /// Transparent materials render through the blended pipeline
    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            unlit: if self.unlit { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }

    /// Updates GPU resources for this material
    pub fn update_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        if self.material_ubo.is_none() {
            self.material_ubo = Some(MaterialUBO::new(device));
        }

        if self.material_bindings.is_none() {
            let mut bindings = MaterialBindings::new(device);
            if let Some(ubo) = &self.material_ubo {
                bindings.create_bind_group(device, ubo);
            }
            self.material_bindings = Some(bindings);
        }

        let uniform_data = self.to_uniform();
        if let Some(ubo) = &mut self.material_ubo {
            ubo.update_content(queue, uniform_data);
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.material_bindings
            .as_ref()
            .map(|bindings| bindings.bind_groups())
    }

    /// Gets the bind group layout for pipeline creation
    pub fn get_bind_group_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.material_bindings
            .as_ref()
            .map(|b| b.bind_group_layouts())
    }
}

/// Manages all materials in the scene
///
/// Centralized storage keyed by name with a default fallback. Meshes
/// reference materials by id rather than storing material data directly.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: "default".to_string(),
        };

        manager
            .materials
            .insert("default".to_string(), Material::default());

        manager
    }

    /// Adds a material to the library
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Gets a material by ID
    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets a mutable material by ID
    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Gets the default material
    pub fn get_default_material(&self) -> &Material {
        self.materials
            .get(&self.default_material_id)
            .expect("default material is always registered")
    }

    /// Gets material for a mesh with fallback to default
    pub fn get_material_for_node(&self, material_id: Option<&MaterialId>) -> &Material {
        match material_id {
            Some(id) => self
                .get_material(id)
                .unwrap_or_else(|| self.get_default_material()),
            None => self.get_default_material(),
        }
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue);
        }
    }

    /// Gets the material bind group layout for pipeline creation
    ///
    /// All materials share the same layout, so the default's is used.
    pub fn get_bind_group_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.get_default_material().get_bind_group_layout()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_routes_to_transparent() {
        let backboard = Material::new("backboard", [1.0, 1.0, 1.0, 0.6], 0.0, 0.5);
        assert!(backboard.is_transparent());

        let slab = Material::new("court_floor", [0.78, 0.53, 0.26, 1.0], 0.0, 0.6);
        assert!(!slab.is_transparent());
    }

    #[test]
    fn unlit_flag_reaches_the_uniform() {
        let line = Material::new("court_line", [1.0, 1.0, 1.0, 1.0], 0.0, 1.0).unlit();
        let uniform = line.to_uniform();
        assert_eq!(uniform.unlit, 1.0);
        assert_eq!(uniform.base_color, [1.0, 1.0, 1.0, 1.0]);

        let lit = Material::default().to_uniform();
        assert_eq!(lit.unlit, 0.0);
    }

    #[test]
    fn manager_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("rim", [1.0, 0.4, 0.0, 1.0], 0.0, 0.5));

        let id = "rim".to_string();
        assert_eq!(manager.get_material_for_node(Some(&id)).name, "rim");

        let missing = "no_such_material".to_string();
        assert_eq!(manager.get_material_for_node(Some(&missing)).name, "Default");
        assert_eq!(manager.get_material_for_node(None).name, "Default");
    }
}
