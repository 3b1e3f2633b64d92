//! # Scene Management Module
//!
//! This module provides the retained scene graph: a tree of mesh leaves and
//! transform groups composited into one renderable frame.
//!
//! ## Key Components
//!
//! - [`Scene`] - The scene container managing the node tree, camera, and materials
//! - [`MeshNode`] / [`GroupNode`] - Drawable leaves and transform groups
//! - [`Vertex3D`] - GPU vertex format with position and normal

pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{DrawMesh, GroupNode, MeshNode, SceneNode};
pub use scene::Scene;
pub use vertex::Vertex3D;
