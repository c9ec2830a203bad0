/// Scoped binding guards
///
/// The context's "currently bound" slots are ambient mutable state. Every
/// component that needs a binding acquires it through one of these guards:
/// the guard captures the prior binding, installs the new one, and restores
/// the prior binding on drop — on success and on error paths alike. No
/// component observes a binding left behind by another.

use crate::context::{BufferId, GlContext, ProgramId, VertexArrayId};
use crate::error::Result;

// ============================================================================
// Array-data target
// ============================================================================

/// Binds a buffer to the array-data target for the guard's lifetime
pub struct ArrayBufferScope<'a> {
    ctx: &'a mut dyn GlContext,
    previous: Option<BufferId>,
}

impl<'a> ArrayBufferScope<'a> {
    /// Bind `buffer`, remembering the prior binding
    pub fn bind(ctx: &'a mut dyn GlContext, buffer: BufferId) -> Result<Self> {
        let previous = ctx.array_buffer_binding();
        ctx.bind_array_buffer(Some(buffer))?;
        Ok(Self { ctx, previous })
    }

    /// Access the context while the binding is held
    pub fn ctx(&mut self) -> &mut dyn GlContext {
        self.ctx
    }
}

impl Drop for ArrayBufferScope<'_> {
    fn drop(&mut self) {
        let _ = self.ctx.bind_array_buffer(self.previous);
    }
}

// ============================================================================
// Vertex-array target
// ============================================================================

/// Binds a vertex array for the guard's lifetime
pub struct VertexArrayScope<'a> {
    ctx: &'a mut dyn GlContext,
    previous: Option<VertexArrayId>,
}

impl<'a> VertexArrayScope<'a> {
    /// Bind `vertex_array`, remembering the prior binding
    pub fn bind(ctx: &'a mut dyn GlContext, vertex_array: VertexArrayId) -> Result<Self> {
        let previous = ctx.vertex_array_binding();
        ctx.bind_vertex_array(Some(vertex_array))?;
        Ok(Self { ctx, previous })
    }

    /// Access the context while the binding is held
    pub fn ctx(&mut self) -> &mut dyn GlContext {
        self.ctx
    }
}

impl Drop for VertexArrayScope<'_> {
    fn drop(&mut self) {
        let _ = self.ctx.bind_vertex_array(self.previous);
    }
}

// ============================================================================
// Program target
// ============================================================================

/// Selects a program for drawing for the guard's lifetime
pub struct ProgramScope<'a> {
    ctx: &'a mut dyn GlContext,
    previous: Option<ProgramId>,
}

impl<'a> ProgramScope<'a> {
    /// Select `program`, remembering the prior selection
    pub fn bind(ctx: &'a mut dyn GlContext, program: ProgramId) -> Result<Self> {
        let previous = ctx.program_binding();
        ctx.use_program(Some(program))?;
        Ok(Self { ctx, previous })
    }

    /// Access the context while the program is selected
    pub fn ctx(&mut self) -> &mut dyn GlContext {
        self.ctx
    }
}

impl Drop for ProgramScope<'_> {
    fn drop(&mut self) {
        let _ = self.ctx.use_program(self.previous);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "scoped_tests.rs"]
mod tests;
