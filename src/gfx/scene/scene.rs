use cgmath::Matrix4;
use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    resources::material::{Material, MaterialManager},
};

use super::node::{node_bind_group_layout, GroupNode, MeshNode, SceneNode};

/// Main scene: an ownership tree of nodes plus camera and materials
///
/// Nodes inserted during construction stay reachable from the root for the
/// life of the process; nothing is ever removed.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub material_manager: MaterialManager,
    nodes: Vec<SceneNode>,
}

impl Scene {
    /// Creates a new empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            material_manager: MaterialManager::new(),
            nodes: Vec::new(),
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Inserts a node under the scene root and returns its root index
    pub fn add_node(&mut self, node: impl Into<SceneNode>) -> usize {
        self.nodes.push(node.into());
        self.nodes.len() - 1
    }

    /// Root-level nodes
    pub fn roots(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Total node count, groups included
    pub fn node_count(&self) -> usize {
        fn count(node: &SceneNode) -> usize {
            match node {
                SceneNode::Mesh(_) => 1,
                SceneNode::Group(group) => 1 + group.children.iter().map(count).sum::<usize>(),
            }
        }
        self.nodes.iter().map(count).sum()
    }

    /// Number of mesh leaves in the tree
    pub fn mesh_count(&self) -> usize {
        self.meshes().len()
    }

    /// Structural lookup: first node matching `name`, depth first
    pub fn find_node(&self, name: &str) -> Option<&SceneNode> {
        fn find<'a>(nodes: &'a [SceneNode], name: &str) -> Option<&'a SceneNode> {
            for node in nodes {
                if node.name() == name {
                    return Some(node);
                }
                if let SceneNode::Group(group) = node {
                    if let Some(found) = find(&group.children, name) {
                        return Some(found);
                    }
                }
            }
            None
        }
        find(&self.nodes, name)
    }

    /// Flattened view of every mesh leaf, depth first
    pub fn meshes(&self) -> Vec<&MeshNode> {
        fn collect<'a>(node: &'a SceneNode, out: &mut Vec<&'a MeshNode>) {
            match node {
                SceneNode::Mesh(mesh) => out.push(mesh),
                SceneNode::Group(group) => {
                    for child in &group.children {
                        collect(child, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        for node in &self.nodes {
            collect(node, &mut out);
        }
        out
    }

    fn meshes_mut(&mut self) -> Vec<&mut MeshNode> {
        fn collect<'a>(node: &'a mut SceneNode, out: &mut Vec<&'a mut MeshNode>) {
            match node {
                SceneNode::Mesh(mesh) => out.push(mesh),
                SceneNode::Group(group) => {
                    for child in &mut group.children {
                        collect(child, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        for node in &mut self.nodes {
            collect(node, &mut out);
        }
        out
    }

    /// Composes world transforms parent-to-child and resolves inherited
    /// shadow-cast flags
    ///
    /// Headless: safe to call without a GPU. Group transforms are set once at
    /// construction, so one pass before upload is sufficient.
    pub fn propagate_transforms(&mut self) {
        fn walk(node: &mut SceneNode, parent: Matrix4<f32>, inherited_cast: bool) {
            match node {
                SceneNode::Mesh(mesh) => {
                    mesh.world_transform = parent * mesh.transform;
                    mesh.cast_shadow |= inherited_cast;
                }
                SceneNode::Group(group) => {
                    let world = parent * group.transform;
                    let cast = inherited_cast || group.cast_shadow;
                    for child in &mut group.children {
                        walk(child, world, cast);
                    }
                }
            }
        }
        for node in &mut self.nodes {
            walk(node, Matrix4::from_scale(1.0), false);
        }
    }

    /// Registers a material with the material manager
    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    /// Gets material for rendering a mesh, falling back to the default
    pub fn material_for_mesh(&self, mesh: &MeshNode) -> &Material {
        self.material_manager
            .get_material_for_node(mesh.material_id.as_ref())
    }

    /// Initializes GPU resources for all meshes and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        self.propagate_transforms();

        let layout = node_bind_group_layout(device);
        for mesh in self.meshes_mut() {
            mesh.init_gpu_resources(device, &layout);
        }

        self.material_manager.update_all_gpu_resources(device, queue);
    }

    /// Gets statistics about the scene for the startup log line
    pub fn statistics(&self) -> SceneStatistics {
        let meshes = self.meshes();
        let total_triangles: u32 = meshes
            .iter()
            .filter(|m| m.topology == wgpu::PrimitiveTopology::TriangleList)
            .map(|m| m.geometry.triangle_count() as u32)
            .sum();
        let total_vertices: u32 = meshes.iter().map(|m| m.geometry.vertex_count() as u32).sum();

        SceneStatistics {
            root_count: self.nodes.len(),
            mesh_count: meshes.len(),
            material_count: self.material_manager.list_materials().len(),
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for debugging and logging
#[derive(Debug)]
pub struct SceneStatistics {
    pub root_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager,
        orbit_camera::OrbitCamera,
    };
    use crate::gfx::geometry::generate_box;
    use cgmath::Vector3;

    fn empty_scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.5);
        let controller = CameraController::new(0.005, 0.1);
        Scene::new(CameraManager::new(camera, controller))
    }

    #[test]
    fn census_counts_groups_and_meshes() {
        let mut scene = empty_scene();
        scene.add_node(MeshNode::new("slab", generate_box(30.0, 0.2, 15.0)));
        scene.add_node(
            GroupNode::new("hoop")
                .with_child(MeshNode::new("pole", generate_box(0.3, 6.0, 0.3)).into())
                .with_child(MeshNode::new("rim", generate_box(0.5, 0.1, 0.5)).into()),
        );

        assert_eq!(scene.roots().len(), 2);
        assert_eq!(scene.node_count(), 4);
        assert_eq!(scene.mesh_count(), 3);
    }

    #[test]
    fn find_node_reaches_nested_children() {
        let mut scene = empty_scene();
        scene.add_node(
            GroupNode::new("hoop").with_child(
                GroupNode::new("net")
                    .with_child(MeshNode::new("net_segment_3", generate_box(1.0, 1.0, 1.0)).into())
                    .into(),
            ),
        );

        assert!(scene.find_node("net_segment_3").is_some());
        assert!(scene.find_node("net").is_some());
        assert!(scene.find_node("backboard").is_none());
    }

    #[test]
    fn world_transforms_compose_parent_to_child() {
        let mut scene = empty_scene();
        scene.add_node(
            GroupNode::new("ball")
                .at(0.0, 0.34, 0.0)
                .with_child(MeshNode::new("sphere", generate_box(1.0, 1.0, 1.0)).at(1.0, 0.0, 0.0).into()),
        );
        scene.propagate_transforms();

        let meshes = scene.meshes();
        let pos = meshes[0].world_position();
        assert!((pos.x - 1.0).abs() < 1e-6);
        assert!((pos.y - 0.34).abs() < 1e-6);
        assert!(pos.z.abs() < 1e-6);
    }

    #[test]
    fn group_cast_shadow_is_inherited() {
        let mut scene = empty_scene();
        scene.add_node(
            GroupNode::new("ball")
                .cast_shadow()
                .with_child(MeshNode::new("sphere", generate_box(1.0, 1.0, 1.0)).into()),
        );
        scene.add_node(MeshNode::new("line", generate_box(1.0, 1.0, 1.0)));
        scene.propagate_transforms();

        let meshes = scene.meshes();
        assert!(meshes[0].cast_shadow);
        assert!(!meshes[1].cast_shadow);
    }
}
