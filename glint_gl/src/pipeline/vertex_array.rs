/// Vertex array (attribute binding context)
///
/// Owns the durable attribute-to-buffer records of one binding context,
/// mirrored host-side so draw-time readiness can be checked without a
/// context round trip. Records are written only inside an
/// [`AttributeRecorder`] scope, which binds the vertex array on entry and
/// restores the prior binding on drop; enabling a location and binding it
/// to a buffer remain two explicit, separate steps, as in the underlying
/// API.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::{
    ArrayBufferScope, AttributeType, BufferId, GlContext, VertexArrayId,
};
use crate::error::Result;
use crate::pipeline::{AttributeLocation, VertexBuffer};

const SOURCE: &str = "glintgl::VertexArray";

/// How an attribute reads its components out of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    /// Component numeric type
    pub attrib_type: AttributeType,
    /// Whether integer data is normalized to [0, 1] / [-1, 1]
    pub normalized: bool,
    /// Byte distance between consecutive vertices (0 = tightly packed)
    pub stride: u32,
    /// Byte offset of the first component
    pub offset: u32,
}

impl Default for AttributeLayout {
    fn default() -> Self {
        Self {
            attrib_type: AttributeType::Float,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }
}

/// One recorded attribute-to-buffer binding
#[derive(Debug, Clone, Copy)]
pub struct AttributeBinding {
    /// Captured buffer identity (by value, not "whatever is bound later")
    pub buffer: BufferId,
    /// Components read per vertex (1..=4)
    pub component_count: u32,
    /// Read layout
    pub layout: AttributeLayout,
}

/// A vertex array with a host-side mirror of its records
#[derive(Debug)]
pub struct VertexArray {
    id: VertexArrayId,
    bindings: FxHashMap<u32, AttributeBinding>,
    enabled: FxHashSet<u32>,
}

impl VertexArray {
    /// Allocate an empty vertex array
    pub fn new(ctx: &mut dyn GlContext) -> Result<Self> {
        let id = ctx.create_vertex_array()?;
        Ok(Self {
            id,
            bindings: FxHashMap::default(),
            enabled: FxHashSet::default(),
        })
    }

    /// Bind this vertex array as the active recording target
    ///
    /// The returned recorder is the only way to register bindings; it
    /// restores the previously bound vertex array when dropped.
    pub fn record<'a>(
        &'a mut self,
        ctx: &'a mut dyn GlContext,
    ) -> Result<AttributeRecorder<'a>> {
        let previous = ctx.vertex_array_binding();
        ctx.bind_vertex_array(Some(self.id))?;
        Ok(AttributeRecorder {
            ctx,
            bindings: &mut self.bindings,
            enabled: &mut self.enabled,
            previous,
        })
    }

    /// Context handle of the vertex array object
    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Whether `location` has been explicitly enabled
    pub fn is_enabled(&self, location: AttributeLocation) -> bool {
        self.enabled.contains(&location.index())
    }

    /// The recorded binding for `location`, if any
    pub fn binding(&self, location: AttributeLocation) -> Option<&AttributeBinding> {
        self.bindings.get(&location.index())
    }

    /// Number of recorded bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn index_enabled(&self, index: u32) -> bool {
        self.enabled.contains(&index)
    }

    pub(crate) fn binding_for_index(&self, index: u32) -> Option<&AttributeBinding> {
        self.bindings.get(&index)
    }

    /// Delete the vertex array object
    pub fn release(self, ctx: &mut dyn GlContext) -> Result<()> {
        ctx.delete_vertex_array(self.id)
    }
}

/// Recording scope over a bound vertex array
///
/// Holds the vertex array bound for its lifetime and keeps the host-side
/// mirror in sync with every record it writes.
pub struct AttributeRecorder<'a> {
    ctx: &'a mut dyn GlContext,
    bindings: &'a mut FxHashMap<u32, AttributeBinding>,
    enabled: &'a mut FxHashSet<u32>,
    previous: Option<VertexArrayId>,
}

impl AttributeRecorder<'_> {
    /// Mark `location` as reading from a buffer rather than a constant
    ///
    /// Enablement is deliberately separate from
    /// [`bind_attribute`](Self::bind_attribute): a location bound but not
    /// enabled is not honored at draw time.
    pub fn enable_attribute(&mut self, location: AttributeLocation) -> Result<()> {
        self.ctx.enable_vertex_attrib_array(location.index())?;
        self.enabled.insert(location.index());
        Ok(())
    }

    /// Record that `location` reads `component_count` components per
    /// vertex from `buffer` with the given layout
    ///
    /// The buffer is bound to the array-data target only for the duration
    /// of this call; the record captures its identity. Recording the same
    /// location again overwrites the prior record.
    pub fn bind_attribute(
        &mut self,
        location: AttributeLocation,
        component_count: u32,
        buffer: &VertexBuffer,
        layout: AttributeLayout,
    ) -> Result<()> {
        {
            let mut scope = ArrayBufferScope::bind(&mut *self.ctx, buffer.id())?;
            scope.ctx().vertex_attrib_pointer(
                location.index(),
                component_count,
                layout.attrib_type,
                layout.normalized,
                layout.stride,
                layout.offset,
            )?;
        }
        self.bindings.insert(
            location.index(),
            AttributeBinding {
                buffer: buffer.id(),
                component_count,
                layout,
            },
        );
        crate::glint_trace!(
            SOURCE,
            "location {} bound: {} components per vertex",
            location.index(),
            component_count
        );
        Ok(())
    }
}

impl Drop for AttributeRecorder<'_> {
    fn drop(&mut self) {
        let _ = self.ctx.bind_vertex_array(self.previous);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vertex_array_tests.rs"]
mod tests;
