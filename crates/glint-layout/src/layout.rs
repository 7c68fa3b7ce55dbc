use crate::attribute::{AttributeDescriptor, ScalarKind, VertexScalar};
use crate::error::LayoutError;

/// Ordered list of vertex attributes plus the byte stride of one record.
///
/// Attributes are appended in the order they appear in the vertex record;
/// insertion order defines shader locations and byte offsets. The stride is
/// kept in step with the element list on every append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeLayout {
    elements: Vec<AttributeDescriptor>,
    stride: u32,
}

impl AttributeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one attribute of `component_count` scalars of `kind`.
    ///
    /// On error the layout is left unchanged.
    pub fn append(&mut self, kind: ScalarKind, component_count: u32) -> Result<&mut Self, LayoutError> {
        let element = AttributeDescriptor::new(kind, component_count)?;
        self.stride = self
            .stride
            .checked_add(element.size_in_bytes())
            .ok_or(LayoutError::StrideOverflow)?;
        self.elements.push(element);
        Ok(self)
    }

    /// Typed form of [`append`](Self::append): `layout.push::<f32>(2)`.
    pub fn push<T: VertexScalar>(&mut self, component_count: u32) -> Result<&mut Self, LayoutError> {
        self.append(T::KIND, component_count)
    }

    pub fn elements(&self) -> &[AttributeDescriptor] {
        &self.elements
    }

    /// Total byte size of one vertex record.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Byte offset of each attribute within a record (running prefix sum).
    pub fn offsets(&self) -> Vec<u32> {
        self.attributes().map(|a| a.offset).collect()
    }

    /// Iterates attributes with their shader location and byte offset.
    pub fn attributes(&self) -> impl Iterator<Item = PlacedAttribute<'_>> + '_ {
        self.elements.iter().enumerate().scan(0u32, |offset, (location, descriptor)| {
            let placed = PlacedAttribute {
                location: location as u32,
                offset: *offset,
                descriptor,
            };
            *offset += descriptor.size_in_bytes();
            Some(placed)
        })
    }
}

/// An attribute together with where it lives in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedAttribute<'a> {
    pub location: u32,
    pub offset: u32,
    pub descriptor: &'a AttributeDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summed(layout: &AttributeLayout) -> u32 {
        layout.elements().iter().map(|e| e.component_count() * e.kind().size_of()).sum()
    }

    // ── stride ────────────────────────────────────────────────────────────

    #[test]
    fn empty_layout_has_zero_stride() {
        let layout = AttributeLayout::new();
        assert_eq!(layout.stride(), 0);
        assert!(layout.is_empty());
    }

    #[test]
    fn position_then_color() {
        let mut layout = AttributeLayout::new();
        layout.append(ScalarKind::Float32, 2).unwrap();
        layout.append(ScalarKind::UInt8, 4).unwrap();

        assert_eq!(layout.stride(), 12); // 2*4 + 4*1
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.elements()[0].kind(), ScalarKind::Float32);
        assert_eq!(layout.elements()[1].kind(), ScalarKind::UInt8);
    }

    #[test]
    fn stride_matches_element_sum_in_any_order() {
        let kinds = [ScalarKind::UInt8, ScalarKind::Float32, ScalarKind::UInt32];
        let mut layout = AttributeLayout::new();
        for i in 0..12u32 {
            layout.append(kinds[(i * 7 % 3) as usize], i % 4 + 1).unwrap();
            assert_eq!(layout.stride(), summed(&layout));
        }
    }

    #[test]
    fn typed_push_chains() {
        let mut layout = AttributeLayout::new();
        layout.push::<f32>(3).unwrap().push::<f32>(2).unwrap().push::<u32>(1).unwrap();
        assert_eq!(layout.stride(), 12 + 8 + 4);
    }

    #[test]
    fn zero_count_leaves_layout_untouched() {
        let mut layout = AttributeLayout::new();
        layout.push::<f32>(2).unwrap();
        let before = layout.clone();

        assert_eq!(layout.push::<u8>(0).unwrap_err(), LayoutError::ZeroComponentCount);
        assert_eq!(layout, before);
    }

    #[test]
    fn oversized_attribute_leaves_layout_untouched() {
        let mut layout = AttributeLayout::new();
        layout.push::<u8>(4).unwrap();
        let before = layout.clone();

        assert_eq!(layout.push::<f32>(u32::MAX / 2).unwrap_err(), LayoutError::StrideOverflow);
        assert_eq!(layout, before);
    }

    #[test]
    fn stride_overflow_leaves_layout_untouched() {
        let mut layout = AttributeLayout::new();
        layout.push::<u8>(u32::MAX).unwrap();
        let before = layout.clone();

        assert_eq!(layout.push::<u8>(1).unwrap_err(), LayoutError::StrideOverflow);
        assert_eq!(layout, before);
        assert_eq!(layout.stride(), u32::MAX);
    }

    // ── offsets ───────────────────────────────────────────────────────────

    #[test]
    fn offsets_are_prefix_sums() {
        let mut layout = AttributeLayout::new();
        layout.push::<f32>(3).unwrap().push::<u8>(4).unwrap().push::<f32>(2).unwrap();
        assert_eq!(layout.offsets(), vec![0, 12, 16]);
    }

    #[test]
    fn attributes_carry_locations() {
        let mut layout = AttributeLayout::new();
        layout.push::<f32>(2).unwrap().push::<u8>(4).unwrap();

        let placed: Vec<_> = layout.attributes().map(|a| (a.location, a.offset)).collect();
        assert_eq!(placed, vec![(0, 0), (1, 8)]);
    }
}
