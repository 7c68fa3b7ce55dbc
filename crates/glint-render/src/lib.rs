//! glint rendering layer.
//!
//! Turns `glint_layout` descriptions into wgpu objects: vertex buffer
//! layouts, validated shader stages, and a small indexed-quad renderer that
//! draws into caller-supplied targets.

pub mod config;
pub mod device;
pub mod logging;
pub mod render;
pub mod shader;
pub mod vertex;

pub use config::{GpuInit, PipelineConfig};
pub use shader::{ShaderProgram, ShaderStage};
