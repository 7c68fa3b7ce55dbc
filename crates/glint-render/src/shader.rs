//! Shader stage compilation.
//!
//! Each stage split out of a `#shader` file is a standalone WGSL module. It is
//! parsed and validated with naga up front so a broken stage is reported by
//! name before any pipeline is created.

use std::fmt;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use glint_layout::{parse_shader, AttributeDescriptor, AttributeLayout, ScalarKind, ShaderSources};

use crate::config::PipelineConfig;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// A stage failed to parse, validate, or lacks its entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCompileError {
    pub stage: ShaderStage,
    pub message: String,
}

impl fmt::Display for ShaderCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to compile {} shader: {}", self.stage.name(), self.message)
    }
}

impl std::error::Error for ShaderCompileError {}

/// One `@location` varying of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Varying {
    pub location: u32,
    /// Scalar kind of the scalar or vector type; `None` for anything else.
    pub kind: Option<naga::ScalarKind>,
}

/// A validated shader stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub source: String,
    module: naga::Module,
}

impl CompiledStage {
    fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module.entry_points.iter().find(|ep| ep.name == self.entry_point)
    }

    /// `@location` inputs of the entry point, sorted by location.
    ///
    /// Struct arguments are flattened into their members.
    pub fn inputs(&self) -> Vec<Varying> {
        let mut out = Vec::new();
        if let Some(ep) = self.entry() {
            for arg in &ep.function.arguments {
                collect_varyings(&self.module, arg.binding.as_ref(), arg.ty, &mut out);
            }
        }
        out.sort_unstable_by_key(|v| v.location);
        out
    }

    /// `@location` outputs of the entry point, sorted by location.
    pub fn outputs(&self) -> Vec<Varying> {
        let mut out = Vec::new();
        if let Some(result) = self.entry().and_then(|ep| ep.function.result.as_ref()) {
            collect_varyings(&self.module, result.binding.as_ref(), result.ty, &mut out);
        }
        out.sort_unstable_by_key(|v| v.location);
        out
    }

    pub fn input_locations(&self) -> Vec<u32> {
        self.inputs().into_iter().map(|v| v.location).collect()
    }
}

fn collect_varyings(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(Varying {
            location: *location,
            kind: scalar_kind(&module.types[ty].inner),
        }),
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.push(Varying {
                            location: *location,
                            kind: scalar_kind(&module.types[member.ty].inner),
                        });
                    }
                }
            }
        }
    }
}

fn scalar_kind(inner: &naga::TypeInner) -> Option<naga::ScalarKind> {
    match inner {
        naga::TypeInner::Scalar(scalar) => Some(scalar.kind),
        naga::TypeInner::Vector { scalar, .. } => Some(scalar.kind),
        _ => None,
    }
}

/// Scalar kind the vertex shader sees for an attribute.
///
/// Normalized integers arrive as floats.
fn attribute_shader_kind(desc: &AttributeDescriptor) -> naga::ScalarKind {
    if desc.normalized() || desc.kind() == ScalarKind::Float32 {
        naga::ScalarKind::Float
    } else {
        naga::ScalarKind::Uint
    }
}

/// Parses and validates one WGSL stage and checks its entry point exists.
pub fn compile_stage(
    stage: ShaderStage,
    source: &str,
    entry_point: &str,
) -> Result<CompiledStage, ShaderCompileError> {
    let fail = |message: String| {
        let err = ShaderCompileError { stage, message };
        log::debug!("{err}");
        err
    };

    let module = naga::front::wgsl::parse_str(source).map_err(|e| fail(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| fail(format!("validation error: {e}")))?;

    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry_point && ep.stage == stage.naga());
    if !found {
        return Err(fail(format!("no @{} entry point named `{entry_point}`", stage.name())));
    }

    Ok(CompiledStage {
        stage,
        entry_point: entry_point.to_string(),
        source: source.to_string(),
        module,
    })
}

/// Vertex + fragment stages ready for pipeline creation.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
}

impl ShaderProgram {
    pub fn new(sources: &ShaderSources, config: &PipelineConfig) -> Result<Self> {
        let vertex = compile_stage(ShaderStage::Vertex, &sources.vertex, &config.vertex_entry)?;
        let fragment =
            compile_stage(ShaderStage::Fragment, &sources.fragment, &config.fragment_entry)?;
        log::debug!(
            "compiled shader program ({} + {} bytes)",
            sources.vertex.len(),
            sources.fragment.len()
        );
        Ok(Self { vertex, fragment })
    }

    /// Reads a `#shader` file and compiles both stages.
    pub fn load(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<Self> {
        let path = path.as_ref();
        let sources = parse_shader(path)
            .with_context(|| format!("failed to load shader file {}", path.display()))?;
        Self::new(&sources, config)
            .with_context(|| format!("failed to build shader program from {}", path.display()))
    }

    /// Vertex inputs the layout does not provide.
    pub fn missing_inputs(&self, layout: &AttributeLayout) -> Vec<u32> {
        let provided = layout.len() as u32;
        self.vertex
            .input_locations()
            .into_iter()
            .filter(|&loc| loc >= provided)
            .collect()
    }

    /// Checks the stage interfaces against `layout`.
    ///
    /// Every vertex input must be provided by an attribute of the same scalar
    /// kind, and every fragment input must be written by the vertex stage
    /// with the same kind.
    pub fn check_layout(&self, layout: &AttributeLayout) -> Result<()> {
        let missing = self.missing_inputs(layout);
        ensure!(
            missing.is_empty(),
            "vertex shader reads locations {missing:?} but the layout has {} attributes",
            layout.len()
        );

        for input in self.vertex.inputs() {
            let desc = &layout.elements()[input.location as usize];
            let expected = attribute_shader_kind(desc);
            ensure!(
                input.kind == Some(expected),
                "vertex input @location({}) is {:?} but the attribute ({} x {:?}) supplies {expected:?}",
                input.location,
                input.kind,
                desc.component_count(),
                desc.kind()
            );
        }

        let outputs = self.vertex.outputs();
        for input in self.fragment.inputs() {
            let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
                bail!("fragment input @location({}) is not written by the vertex stage", input.location);
            };
            ensure!(
                output.kind == input.kind,
                "@location({}) is {:?} in the vertex stage but {:?} in the fragment stage",
                input.location,
                output.kind,
                input.kind
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct VertexIn {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    var result: VertexOut;
    result.clip = vec4<f32>(v.position, 0.0, 1.0);
    result.color = v.color;
    return result;
}
"#;

    const FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

    fn sources() -> ShaderSources {
        ShaderSources { vertex: VS.to_string(), fragment: FS.to_string() }
    }

    // ── compile_stage ─────────────────────────────────────────────────────

    #[test]
    fn valid_vertex_stage() {
        let stage = compile_stage(ShaderStage::Vertex, VS, "vs_main").unwrap();
        assert_eq!(stage.input_locations(), vec![0, 1]);
    }

    #[test]
    fn argument_locations_collected() {
        let stage = compile_stage(ShaderStage::Fragment, FS, "fs_main").unwrap();
        assert_eq!(stage.input_locations(), vec![0]);
    }

    #[test]
    fn syntax_error_names_stage() {
        let err = compile_stage(ShaderStage::Fragment, "fn fs_main( {", "fs_main").unwrap_err();
        assert_eq!(err.stage, ShaderStage::Fragment);
        assert!(err.to_string().starts_with("failed to compile fragment shader"), "{err}");
    }

    #[test]
    fn wrong_stage_entry_point_rejected() {
        // vs_main exists but is not a fragment entry point.
        let err = compile_stage(ShaderStage::Fragment, VS, "vs_main").unwrap_err();
        assert!(err.message.contains("vs_main"), "{err}");
    }

    #[test]
    fn missing_entry_point_rejected() {
        assert!(compile_stage(ShaderStage::Vertex, VS, "main").is_err());
    }

    // ── ShaderProgram ─────────────────────────────────────────────────────

    #[test]
    fn program_from_sources() {
        let program = ShaderProgram::new(&sources(), &PipelineConfig::default()).unwrap();
        assert_eq!(program.vertex.entry_point, "vs_main");
        assert_eq!(program.fragment.stage, ShaderStage::Fragment);
    }

    #[test]
    fn empty_fragment_section_fails() {
        let src = ShaderSources { vertex: VS.to_string(), fragment: String::new() };
        let err = ShaderProgram::new(&src, &PipelineConfig::default()).unwrap_err();
        let compile = err.downcast_ref::<ShaderCompileError>().unwrap();
        assert_eq!(compile.stage, ShaderStage::Fragment);
    }

    #[test]
    fn missing_inputs_against_layout() {
        let program = ShaderProgram::new(&sources(), &PipelineConfig::default()).unwrap();

        let mut layout = AttributeLayout::new();
        layout.push::<f32>(2).unwrap();
        assert_eq!(program.missing_inputs(&layout), vec![1]);

        layout.push::<u8>(4).unwrap();
        assert!(program.missing_inputs(&layout).is_empty());
    }

    #[test]
    fn stage_outputs_collected() {
        let stage = compile_stage(ShaderStage::Vertex, VS, "vs_main").unwrap();
        assert_eq!(
            stage.outputs(),
            vec![Varying { location: 0, kind: Some(naga::ScalarKind::Float) }]
        );
    }

    // ── check_layout ──────────────────────────────────────────────────────

    fn position_color() -> AttributeLayout {
        let mut layout = AttributeLayout::new();
        layout.push::<f32>(2).unwrap().push::<u8>(4).unwrap();
        layout
    }

    #[test]
    fn matching_interfaces_pass() {
        let program = ShaderProgram::new(&sources(), &PipelineConfig::default()).unwrap();
        program.check_layout(&position_color()).unwrap();
    }

    #[test]
    fn uint_input_for_normalized_bytes_rejected() {
        let vs = VS.replace("@location(1) color: vec4<f32>", "@location(1) color: vec4<u32>")
            .replace("result.color = v.color;", "result.color = vec4<f32>(v.color);");
        let src = ShaderSources { vertex: vs, fragment: FS.to_string() };
        let program = ShaderProgram::new(&src, &PipelineConfig::default()).unwrap();

        let err = program.check_layout(&position_color()).unwrap_err();
        assert!(err.to_string().contains("@location(1)"), "{err}");
    }

    #[test]
    fn uint_input_for_u32_attribute_accepted() {
        let vs = r#"
@vertex
fn vs_main(@location(0) id: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(f32(id), 0.0, 0.0, 1.0);
}
"#;
        let fs = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let src = ShaderSources { vertex: vs.to_string(), fragment: fs.to_string() };
        let program = ShaderProgram::new(&src, &PipelineConfig::default()).unwrap();

        let mut layout = AttributeLayout::new();
        layout.push::<u32>(1).unwrap();
        program.check_layout(&layout).unwrap();
    }

    #[test]
    fn fragment_input_not_written_rejected() {
        let fs = FS.replace("@location(0) color", "@location(3) color");
        let src = ShaderSources { vertex: VS.to_string(), fragment: fs };
        let program = ShaderProgram::new(&src, &PipelineConfig::default()).unwrap();

        let err = program.check_layout(&position_color()).unwrap_err();
        assert!(err.to_string().contains("@location(3)"), "{err}");
    }

    #[test]
    fn load_missing_file() {
        let err = ShaderProgram::load("nope/basic.shader", &PipelineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("nope/basic.shader"), "{err}");
    }
}
