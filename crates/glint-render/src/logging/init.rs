use std::sync::Once;

/// wgpu backends are noisy at info.
const QUIET_WGPU: &str = "wgpu_core=warn,wgpu_hal=warn";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` directives, e.g. `"glint_render=debug,wgpu=warn"`.
    /// Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,
    /// Level used when neither `filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Directive string handed to `env_logger`.
fn filter_directives(config: &LoggingConfig, rust_log: Option<String>) -> String {
    config
        .filter
        .clone()
        .or(rust_log)
        .unwrap_or_else(|| format!("{},{QUIET_WGPU}", config.default_level))
}

static INIT: Once = Once::new();

/// Installs `env_logger` on the first call. Does nothing if another logger
/// is already registered.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directives = filter_directives(&config, std::env::var("RUST_LOG").ok());
        let installed = env_logger::Builder::new()
            .parse_filters(&directives)
            .write_style(config.write_style)
            .try_init()
            .is_ok();
        if installed {
            log::debug!("logger installed with `{directives}`");
        }
    });
}
