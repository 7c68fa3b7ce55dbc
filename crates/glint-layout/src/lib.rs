//! Vertex attribute layouts and `#shader` source splitting.
//!
//! This crate is dependency-free so tools can describe vertex records and
//! split shader files without pulling in wgpu.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`attribute`] | `ScalarKind`, `AttributeDescriptor`, `VertexScalar` |
//! | [`layout`] | `AttributeLayout` builder, offsets |
//! | [`shader_source`] | `split_lines`, `parse_shader`, `ShaderSources` |
//! | [`error`] | `LayoutError`, `ShaderSourceError` |
//!
//! # Quick start
//!
//! ```rust
//! use glint_layout::{split_str, AttributeLayout};
//!
//! let mut layout = AttributeLayout::new();
//! layout.push::<f32>(2).unwrap().push::<u8>(4).unwrap();
//! assert_eq!(layout.stride(), 12);
//!
//! let src = "#shader vertex\nA\n#shader fragment\nB\n";
//! let sources = split_str(src);
//! assert_eq!(sources.vertex, "A\n");
//! ```

pub mod attribute;
pub mod error;
pub mod layout;
pub mod shader_source;

pub use attribute::{size_of_gl_type, AttributeDescriptor, ScalarKind, VertexScalar};
pub use error::{LayoutError, ShaderSourceError};
pub use layout::{AttributeLayout, PlacedAttribute};
pub use shader_source::{parse_shader, split_lines, split_reader, split_str, ShaderSources};
