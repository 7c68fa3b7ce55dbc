use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glint_layout::parse_shader;
use glint_render::device::{HeadlessGpu, OffscreenTarget};
use glint_render::logging::{init_logging, LoggingConfig};
use glint_render::render::{QuadRenderer, QuadVertex};
use glint_render::{GpuInit, PipelineConfig, ShaderProgram};

const DEFAULT_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../res/shaders/basic.shader");

/// Splits a `#shader` file, compiles both stages and checks them against the quad vertex.
#[derive(Parser, Debug)]
#[command(name = "glint-cli", version)]
struct Args {
    /// Shader file with `#shader vertex` and `#shader fragment` sections.
    shader: Option<PathBuf>,

    /// Also draw the quad on a headless GPU.
    #[arg(long)]
    gpu: bool,

    /// Offscreen target width in pixels.
    #[arg(long, default_value = "640", value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Offscreen target height in pixels.
    #[arg(long, default_value = "480", value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,
}

impl Args {
    fn shader_path(&self) -> PathBuf {
        self.shader.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SHADER))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let args = Args::parse();
    let shader = args.shader_path();
    let config = PipelineConfig::default();

    let sources = parse_shader(&shader)
        .with_context(|| format!("failed to load {}", shader.display()))?;
    log::debug!(
        "split {}: vertex {} bytes, fragment {} bytes",
        shader.display(),
        sources.vertex.len(),
        sources.fragment.len()
    );

    println!("{}", shader.display());
    println!("  vertex   {:>6} bytes", sources.vertex.len());
    println!("  fragment {:>6} bytes", sources.fragment.len());

    let program = ShaderProgram::new(&sources, &config)?;
    println!("  compiled `{}` + `{}`", program.vertex.entry_point, program.fragment.entry_point);

    let layout = QuadVertex::attribute_layout();
    println!();
    println!("  loc  offset  kind      count  normalized");
    for a in layout.attributes() {
        println!(
            "  {:>3}  {:>6}  {:<8}  {:>5}  {}",
            a.location,
            a.offset,
            format!("{:?}", a.descriptor.kind()),
            a.descriptor.component_count(),
            a.descriptor.normalized()
        );
    }
    println!("  stride {} bytes", layout.stride());

    let mut renderer = QuadRenderer::new(program, config)?;

    if args.gpu {
        let gpu = pollster::block_on(HeadlessGpu::new(GpuInit::default()))?;
        let target = OffscreenTarget::new(&gpu, args.width, args.height, wgpu::TextureFormat::Rgba8UnormSrgb);
        gpu.render_offscreen(&target, |ctx, rt| renderer.render(ctx, rt));
        println!();
        println!("  drew quad at {}x{} on {}", args.width, args.height, gpu.adapter_info().name);
    }

    Ok(())
}
