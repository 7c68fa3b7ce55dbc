/// Device handles a renderer needs to build pipelines and upload buffers.
///
/// `target_format` is part of the pipeline key; renderers rebuild their
/// pipelines when it changes between frames.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        Self { device, queue, target_format }
    }
}

/// The frame being recorded: passes go into `encoder` and draw to `color_view`.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
