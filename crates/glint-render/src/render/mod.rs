//! GPU rendering.
//!
//! Renderers own their GPU resources (pipelines, buffers) and draw into a
//! caller-provided encoder/view; surfaces and windows live elsewhere.

mod ctx;
mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{QuadRenderer, QuadVertex, QUAD_INDICES, QUAD_VERTICES};
