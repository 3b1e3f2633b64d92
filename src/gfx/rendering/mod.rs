// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, shadow map caching, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod shadow_cache;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::{RenderEngine, RenderInitError};
pub use shadow_cache::ShadowCache;
