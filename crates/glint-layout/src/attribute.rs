use crate::error::LayoutError;

// ── GL type codes ─────────────────────────────────────────────────────────

pub const GL_UNSIGNED_BYTE: u32 = 0x1401;
pub const GL_UNSIGNED_INT: u32 = 0x1405;
pub const GL_FLOAT: u32 = 0x1406;

// ── ScalarKind ────────────────────────────────────────────────────────────

/// Scalar type of a single vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Float32,
    UInt32,
    UInt8,
}

impl ScalarKind {
    /// Size of one component in bytes.
    pub const fn size_of(self) -> u32 {
        match self {
            Self::Float32 => 4,
            Self::UInt32 => 4,
            Self::UInt8 => 1,
        }
    }

    /// Whether integer data of this kind is rescaled to `[0, 1]` by the consumer.
    ///
    /// Fixed per kind: bytes are normalized, everything else is not.
    pub const fn normalized(self) -> bool {
        matches!(self, Self::UInt8)
    }

    /// Converts a raw GL type code.
    pub fn from_gl(code: u32) -> Result<Self, LayoutError> {
        match code {
            GL_FLOAT => Ok(Self::Float32),
            GL_UNSIGNED_INT => Ok(Self::UInt32),
            GL_UNSIGNED_BYTE => Ok(Self::UInt8),
            other => Err(LayoutError::UnsupportedScalarKind(other)),
        }
    }

    /// The GL type code for this kind.
    pub const fn gl_code(self) -> u32 {
        match self {
            Self::Float32 => GL_FLOAT,
            Self::UInt32 => GL_UNSIGNED_INT,
            Self::UInt8 => GL_UNSIGNED_BYTE,
        }
    }
}

/// Byte size of a raw GL type code.
///
/// Unknown codes fail instead of reporting a size of 0, which would silently
/// corrupt every stride computed afterwards.
pub fn size_of_gl_type(code: u32) -> Result<u32, LayoutError> {
    ScalarKind::from_gl(code).map(ScalarKind::size_of)
}

// ── VertexScalar ──────────────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for u32 {}
    impl Sealed for u8 {}
}

/// Rust scalar types that can back a vertex attribute.
pub trait VertexScalar: sealed::Sealed {
    const KIND: ScalarKind;
}

impl VertexScalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float32;
}

impl VertexScalar for u32 {
    const KIND: ScalarKind = ScalarKind::UInt32;
}

impl VertexScalar for u8 {
    const KIND: ScalarKind = ScalarKind::UInt8;
}

// ── AttributeDescriptor ───────────────────────────────────────────────────

/// One attribute (position, color, ...) within a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    component_count: u32,
    kind: ScalarKind,
    normalized: bool,
}

impl AttributeDescriptor {
    pub(crate) fn new(kind: ScalarKind, component_count: u32) -> Result<Self, LayoutError> {
        if component_count == 0 {
            return Err(LayoutError::ZeroComponentCount);
        }
        component_count
            .checked_mul(kind.size_of())
            .ok_or(LayoutError::StrideOverflow)?;
        Ok(Self { component_count, kind, normalized: kind.normalized() })
    }

    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    /// Bytes occupied by this attribute in one vertex record.
    ///
    /// Cannot overflow: construction rejects counts whose size exceeds `u32`.
    pub fn size_in_bytes(&self) -> u32 {
        self.component_count * self.kind.size_of()
    }
}
