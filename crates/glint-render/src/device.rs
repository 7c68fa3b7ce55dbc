//! Headless wgpu device + offscreen color target.
//!
//! Used by tools that need a real pipeline without a window or surface.

use anyhow::{Context, Result};

use crate::config::GpuInit;
use crate::render::{RenderCtx, RenderTarget};

/// Owns a wgpu device/queue that is not bound to any surface.
pub struct HeadlessGpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("glint headless device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        Ok(Self { adapter, device, queue })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Records one frame into `target` via `draw` and submits it.
    pub fn render_offscreen<F>(&self, target: &OffscreenTarget, draw: F)
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glint offscreen encoder"),
            });

        {
            let ctx = RenderCtx::new(&self.device, &self.queue, target.format);
            let mut rt = RenderTarget::new(&mut encoder, &target.view);
            draw(&ctx, &mut rt);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// A 2D texture usable as a render attachment.
pub struct OffscreenTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
}

impl OffscreenTarget {
    pub fn new(gpu: &HeadlessGpu, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glint offscreen target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, format }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::QuadRenderer;
    use crate::{PipelineConfig, ShaderProgram};

    /// `None` on machines without any adapter (CI without a software rasterizer).
    fn gpu() -> Option<HeadlessGpu> {
        match pollster::block_on(HeadlessGpu::new(GpuInit::default())) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                eprintln!("skipping GPU test: {err:#}");
                None
            }
        }
    }

    #[test]
    fn quad_renders_offscreen() {
        let Some(gpu) = gpu() else { return };

        let program = ShaderProgram::new(
            &glint_layout::split_str(include_str!("../../../res/shaders/basic.shader")),
            &PipelineConfig::default(),
        )
        .unwrap();
        let mut renderer = QuadRenderer::new(program, PipelineConfig::default()).unwrap();

        // wgpu's default error handler panics on validation errors.
        let target = OffscreenTarget::new(&gpu, 64, 64, wgpu::TextureFormat::Rgba8UnormSrgb);
        gpu.render_offscreen(&target, |ctx, rt| renderer.render(ctx, rt));

        // Format change rebuilds the pipeline.
        let target = OffscreenTarget::new(&gpu, 64, 64, wgpu::TextureFormat::Bgra8Unorm);
        gpu.render_offscreen(&target, |ctx, rt| renderer.render(ctx, rt));
    }
}
