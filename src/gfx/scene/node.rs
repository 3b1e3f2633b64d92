//! Scene graph nodes
//!
//! A scene is a tree of [`SceneNode`]s: mesh leaves carrying geometry and a
//! material reference, and transform groups aggregating children. Nodes are
//! built once during scene construction and never removed.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use wgpu::Device;

use crate::{
    gfx::geometry::GeometryData,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Per-node uniform data uploaded once the world transform is known
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub receive_shadow: f32,
    pub _padding: [f32; 3],
}

type NodeUBO = UniformBuffer<NodeUniform>;

/// Creates the bind group layout shared by every mesh node
///
/// Used both when initializing mesh GPU resources and when building render
/// pipelines, so the two always agree.
pub fn node_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Node Bind Group Layout")
}

/// GPU resources owned by a mesh node once uploaded
pub struct MeshGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    node_ubo: NodeUBO,
    bind_group: wgpu::BindGroup,
}

/// A drawable leaf in the scene graph
///
/// Pairs generated geometry with a material id, a primitive topology and
/// shadow flags. Immutable after construction apart from the transform.
pub struct MeshNode {
    pub name: String,
    pub geometry: GeometryData,
    pub material_id: Option<String>,
    pub topology: wgpu::PrimitiveTopology,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Local transform relative to the parent node
    pub transform: Matrix4<f32>,
    /// World transform composed by [`Scene::propagate_transforms`]
    ///
    /// [`Scene::propagate_transforms`]: crate::gfx::scene::Scene::propagate_transforms
    pub world_transform: Matrix4<f32>,
    pub gpu: Option<MeshGpuResources>,
}

impl MeshNode {
    pub fn new(name: &str, geometry: GeometryData) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material_id: None,
            topology: wgpu::PrimitiveTopology::TriangleList,
            cast_shadow: false,
            receive_shadow: false,
            transform: Matrix4::identity(),
            world_transform: Matrix4::identity(),
            gpu: None,
        }
    }

    /// Builder pattern: assign a material by id
    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    /// Builder pattern: set the primitive topology
    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Builder pattern: mark this mesh as a shadow caster
    pub fn cast_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    /// Builder pattern: mark this mesh as shadow receiving
    pub fn receive_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }

    /// Builder pattern: translate the node
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = Matrix4::from_translation(Vector3::new(x, y, z)) * self.transform;
        self
    }

    /// Builder pattern: post-multiply a rotation about the x axis
    ///
    /// Rotations post-multiply, so `.at(..).rotated_x(..).rotated_z(..)`
    /// yields T * Rx * Rz (intrinsic rotation order).
    pub fn rotated_x(mut self, angle: Deg<f32>) -> Self {
        self.transform = self.transform * Matrix4::from_angle_x(angle);
        self
    }

    /// Builder pattern: post-multiply a rotation about the y axis
    pub fn rotated_y(mut self, angle: Deg<f32>) -> Self {
        self.transform = self.transform * Matrix4::from_angle_y(angle);
        self
    }

    /// Builder pattern: post-multiply a rotation about the z axis
    pub fn rotated_z(mut self, angle: Deg<f32>) -> Self {
        self.transform = self.transform * Matrix4::from_angle_z(angle);
        self
    }

    /// World-space position of the node's origin
    pub fn world_position(&self) -> Vector3<f32> {
        Vector3::new(
            self.world_transform[3][0],
            self.world_transform[3][1],
            self.world_transform[3][2],
        )
    }

    /// Uploads vertex/index buffers and the per-node uniform
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        let vertices = self.geometry.to_vertices();

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", self.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", self.name)),
                contents: bytemuck::cast_slice(&self.geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let uniform = NodeUniform {
            model: self.world_transform.into(),
            receive_shadow: if self.receive_shadow { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        };
        let node_ubo = NodeUBO::new_with_data(device, &uniform);

        let bind_group = BindGroupBuilder::new(layout)
            .resource(node_ubo.binding_resource())
            .create(device, &format!("{} Node Bind Group", self.name));

        self.gpu = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            index_count: self.geometry.indices.len() as u32,
            node_ubo,
            bind_group,
        });
    }

    /// Re-uploads the world transform after a change
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = NodeUniform {
            model: self.world_transform.into(),
            receive_shadow: if self.receive_shadow { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        };
        if let Some(gpu) = &mut self.gpu {
            gpu.node_ubo.update_content(queue, uniform);
        }
    }

    /// Gets the node bind group for rendering
    pub fn node_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// A transform group with no geometry of its own
///
/// Applies one transform to all children collectively. A `cast_shadow` flag
/// set on a group is inherited by every mesh beneath it.
pub struct GroupNode {
    pub name: String,
    pub transform: Matrix4<f32>,
    pub cast_shadow: bool,
    pub children: Vec<SceneNode>,
}

impl GroupNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Matrix4::identity(),
            cast_shadow: false,
            children: Vec::new(),
        }
    }

    /// Builder pattern: translate the group
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = Matrix4::from_translation(Vector3::new(x, y, z)) * self.transform;
        self
    }

    /// Builder pattern: all meshes under this group cast shadows
    pub fn cast_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    /// Builder pattern: append a child node
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }
}

/// A node in the scene graph: either a drawable mesh or a transform group
pub enum SceneNode {
    Mesh(MeshNode),
    Group(GroupNode),
}

impl SceneNode {
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Mesh(mesh) => &mesh.name,
            SceneNode::Group(group) => &group.name,
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match self {
            SceneNode::Mesh(mesh) => Some(mesh),
            SceneNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            SceneNode::Group(group) => Some(group),
            SceneNode::Mesh(_) => None,
        }
    }
}

impl From<MeshNode> for SceneNode {
    fn from(mesh: MeshNode) -> Self {
        SceneNode::Mesh(mesh)
    }
}

impl From<GroupNode> for SceneNode {
    fn from(group: GroupNode) -> Self {
        SceneNode::Group(group)
    }
}

/// Draw helpers binding a mesh's buffers into a render pass
pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &MeshNode);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &MeshNode) {
        let Some(gpu) = &mesh.gpu else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..gpu.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn builder_rotations_post_multiply() {
        // T * Rx(-90) maps local +z to world +y
        let mesh = MeshNode::new("ring", generate_box(1.0, 1.0, 1.0))
            .at(3.0, 0.11, 0.0)
            .rotated_x(Deg(-90.0));

        let v = mesh.transform * cgmath::Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!((v.x - 3.0).abs() < 1e-5);
        assert!((v.y - 1.11).abs() < 1e-5);
        assert!(v.z.abs() < 1e-5);
    }

    #[test]
    fn group_builder_collects_children() {
        let group = GroupNode::new("hoop")
            .cast_shadow()
            .with_child(MeshNode::new("pole", generate_box(1.0, 1.0, 1.0)).into())
            .with_child(GroupNode::new("net").into());

        assert_eq!(group.children.len(), 2);
        assert!(group.cast_shadow);
        assert_eq!(group.children[0].name(), "pole");
        assert!(group.children[1].as_group().is_some());
    }
}
