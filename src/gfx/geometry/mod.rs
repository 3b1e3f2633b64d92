//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the 3D primitive shapes used to
//! assemble the court scene, eliminating the need for external model files.
//!
//! ## Supported Primitives
//!
//! - **Box**: rectangular solid with per-axis dimensions
//! - **Sphere**: UV sphere with configurable resolution
//! - **Cylinder**: capped cylinder along the y axis
//! - **Torus**: ring in the xy plane
//! - **Ring**: flat annulus sector in the xy plane
//! - **Line**: two-vertex segment for line-list meshes

pub mod primitives;

pub use primitives::*;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Indices (counter-clockwise winding for triangle lists)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleave positions and normals into the GPU vertex format
    pub fn to_vertices(&self) -> Vec<crate::gfx::scene::vertex::Vertex3D> {
        use crate::gfx::scene::vertex::Vertex3D;

        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
