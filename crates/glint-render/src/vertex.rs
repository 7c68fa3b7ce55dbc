//! Maps `glint_layout` attribute layouts onto wgpu vertex buffer layouts.

use std::fmt;

use glint_layout::{AttributeDescriptor, AttributeLayout, ScalarKind};

/// An attribute shape that has no wgpu vertex format (e.g. three `u8`s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedFormat {
    pub kind: ScalarKind,
    pub component_count: u32,
    pub normalized: bool,
}

impl fmt::Display for UnsupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no wgpu vertex format for {} x {:?}{}",
            self.component_count,
            self.kind,
            if self.normalized { " (normalized)" } else { "" }
        )
    }
}

impl std::error::Error for UnsupportedFormat {}

/// wgpu vertex format for one attribute.
pub fn vertex_format(desc: &AttributeDescriptor) -> Result<wgpu::VertexFormat, UnsupportedFormat> {
    use wgpu::VertexFormat as F;
    use ScalarKind::*;

    let format = match (desc.kind(), desc.normalized(), desc.component_count()) {
        (Float32, _, 1) => F::Float32,
        (Float32, _, 2) => F::Float32x2,
        (Float32, _, 3) => F::Float32x3,
        (Float32, _, 4) => F::Float32x4,

        (UInt32, false, 1) => F::Uint32,
        (UInt32, false, 2) => F::Uint32x2,
        (UInt32, false, 3) => F::Uint32x3,
        (UInt32, false, 4) => F::Uint32x4,

        (UInt8, true, 1) => F::Unorm8,
        (UInt8, true, 2) => F::Unorm8x2,
        (UInt8, true, 4) => F::Unorm8x4,

        _ => {
            return Err(UnsupportedFormat {
                kind: desc.kind(),
                component_count: desc.component_count(),
                normalized: desc.normalized(),
            });
        }
    };
    Ok(format)
}

/// Owned wgpu attribute list for one vertex buffer.
///
/// Shader locations follow append order (0, 1, ...); offsets are the running
/// byte sum of preceding attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuVertexLayout {
    stride: wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl GpuVertexLayout {
    pub fn from_layout(
        layout: &AttributeLayout,
        step_mode: wgpu::VertexStepMode,
    ) -> Result<Self, UnsupportedFormat> {
        let attributes = layout
            .attributes()
            .map(|a| {
                Ok(wgpu::VertexAttribute {
                    format: vertex_format(a.descriptor)?,
                    offset: a.offset as wgpu::BufferAddress,
                    shader_location: a.location,
                })
            })
            .collect::<Result<Vec<_>, UnsupportedFormat>>()?;

        Ok(Self {
            stride: layout.stride() as wgpu::BufferAddress,
            step_mode,
            attributes,
        })
    }

    pub fn stride(&self) -> wgpu::BufferAddress {
        self.stride
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    /// Borrowed layout for `wgpu::VertexState::buffers`.
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}
