use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while describing a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A raw GL type code outside `GL_FLOAT`, `GL_UNSIGNED_INT`, `GL_UNSIGNED_BYTE`.
    UnsupportedScalarKind(u32),
    /// An attribute was appended with zero components.
    ZeroComponentCount,
    /// An attribute or the record stride does not fit in `u32` bytes.
    StrideOverflow,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedScalarKind(code) => {
                write!(f, "unsupported scalar kind: GL type 0x{code:04x}")
            }
            Self::ZeroComponentCount => write!(f, "vertex attribute must have at least one component"),
            Self::StrideOverflow => write!(f, "vertex stride exceeds u32::MAX bytes"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Errors raised while reading a `#shader` source file.
#[derive(Debug)]
pub enum ShaderSourceError {
    /// The source location could not be opened.
    ResourceNotFound { path: PathBuf, source: io::Error },
    /// The source was opened but reading a line failed.
    Read(io::Error),
}

impl fmt::Display for ShaderSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceNotFound { path, source } => {
                write!(f, "shader source not found at {}: {source}", path.display())
            }
            Self::Read(e) => write!(f, "failed to read shader source: {e}"),
        }
    }
}

impl std::error::Error for ShaderSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceNotFound { source, .. } => Some(source),
            Self::Read(e) => Some(e),
        }
    }
}
