//! # Graphics Module
//!
//! Contains all graphics-related functionality: the camera system, rendering
//! pipelines, the scene graph, and GPU resource handling.
//!
//! - **Camera System** ([`camera`]) - Orbit camera with per-frame input application
//! - **Geometry** ([`geometry`]) - Procedural primitive generators
//! - **Rendering Pipeline** ([`rendering`]) - Lit rendering with cached shadow mapping
//! - **Scene Management** ([`scene`]) - Node hierarchy and world transforms
//! - **Resource Management** ([`resources`]) - Materials, textures, and global uniforms

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
