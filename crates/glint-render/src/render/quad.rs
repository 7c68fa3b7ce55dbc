use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glint_layout::AttributeLayout;
use wgpu::util::DeviceExt;

use crate::config::PipelineConfig;
use crate::render::{RenderCtx, RenderTarget};
use crate::shader::ShaderProgram;
use crate::vertex::GpuVertexLayout;

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],   // NDC
    pub color: [u8; 4], // RGBA, normalized by the GPU
}

impl QuadVertex {
    /// `pos` then `color`, matching the struct field order.
    pub fn attribute_layout() -> AttributeLayout {
        let mut layout = AttributeLayout::new();
        layout
            .push::<f32>(2)
            .and_then(|l| l.push::<u8>(4))
            .expect("QuadVertex attributes have non-zero component counts");
        layout
    }
}

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-0.5, -0.5], color: [255, 0, 0, 255] },
    QuadVertex { pos: [0.5, -0.5], color: [0, 255, 0, 255] },
    QuadVertex { pos: [0.5, 0.5], color: [0, 0, 255, 255] },
    QuadVertex { pos: [-0.5, 0.5], color: [255, 255, 255, 255] },
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws [`QUAD_VERTICES`] with a user-supplied shader program.
///
/// The pipeline is created lazily and rebuilt when the target format changes.
#[derive(Debug)]
pub struct QuadRenderer {
    program: ShaderProgram,
    config: PipelineConfig,
    vertex_layout: GpuVertexLayout,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
}

impl QuadRenderer {
    /// Fails if the shader interfaces do not match the quad vertex, so
    /// pipeline creation in [`render`](Self::render) cannot hit a wgpu
    /// validation error for them.
    pub fn new(program: ShaderProgram, config: PipelineConfig) -> Result<Self> {
        let layout = QuadVertex::attribute_layout();
        program
            .check_layout(&layout)
            .context("shader does not fit the quad vertex")?;

        let vertex_layout = GpuVertexLayout::from_layout(&layout, wgpu::VertexStepMode::Vertex)
            .context("quad vertex layout has no wgpu equivalent")?;

        Ok(Self {
            program,
            config,
            vertex_layout,
            pipeline_format: None,
            pipeline: None,
            vbo: None,
            ibo: None,
        })
    }

    pub fn vertex_layout(&self) -> &GpuVertexLayout {
        &self.vertex_layout
    }

    /// Clears `target` and draws the quad.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        let label = self.config.label("quad pass");
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label.as_str()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("creating quad pipeline for {:?}", ctx.target_format);

        let vs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.config.label("vertex shader").as_str()),
            source: wgpu::ShaderSource::Wgsl(self.program.vertex.source.as_str().into()),
        });
        let fs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.config.label("fragment shader").as_str()),
            source: wgpu::ShaderSource::Wgsl(self.program.fragment.source.as_str().into()),
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.config.label("quad pipeline").as_str()),
            // No bind groups; let wgpu derive the (empty) layout.
            layout: None,

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(self.program.vertex.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &[self.vertex_layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(self.program.fragment.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: self.config.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.target_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.config.label("quad vbo").as_str()),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.config.label("quad ibo").as_str()),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}
