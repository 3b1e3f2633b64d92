// src/lib.rs
//! Courtside
//!
//! A static basketball court scene viewer built on wgpu and winit: a
//! procedurally constructed court with mirrored hoop assemblies and a
//! seamed ball, rendered with cached shadow mapping under an orbit camera.

pub mod app;
pub mod court;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::CourtApp;
pub use court::{build_court, CourtNodes};
