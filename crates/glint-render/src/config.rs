/// Pipeline configuration for [`QuadRenderer`](crate::render::QuadRenderer).
///
/// Entry point names must match the functions in the split shader stages.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Vertex stage entry point.
    pub vertex_entry: String,

    /// Fragment stage entry point.
    pub fragment_entry: String,

    pub topology: wgpu::PrimitiveTopology,

    /// Color the target is cleared to before drawing.
    pub clear_color: wgpu::Color,

    /// Prefix for wgpu debug labels.
    pub label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            clear_color: wgpu::Color::BLACK,
            label: "glint".to_string(),
        }
    }
}

impl PipelineConfig {
    pub(crate) fn label(&self, what: &str) -> String {
        format!("{} {what}", self.label)
    }
}

/// Initialization parameters for a headless GPU context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features. Favor an empty set for portability.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Use a software adapter even when hardware is available.
    pub force_fallback_adapter: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            force_fallback_adapter: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_entry_points() {
        let c = PipelineConfig::default();
        assert_eq!(c.vertex_entry, "vs_main");
        assert_eq!(c.fragment_entry, "fs_main");
        assert_eq!(c.topology, wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn labels_are_prefixed() {
        let c = PipelineConfig { label: "demo".into(), ..Default::default() };
        assert_eq!(c.label("pipeline"), "demo pipeline");
    }
}
