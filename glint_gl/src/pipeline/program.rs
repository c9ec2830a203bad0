/// Linked GPU program
///
/// Links one vertex and one fragment stage into an executable program.
/// Link status is checked unconditionally; a program that failed to link
/// is deleted before the error escapes, so a `Program` value is always
/// usable for drawing.

use rustc_hash::FxHashMap;

use crate::context::{GlContext, ProgramId, ShaderStage};
use crate::error::{Error, Result};
use crate::glint_bail;
use crate::pipeline::Shader;

const SOURCE: &str = "glintgl::Program";

/// Location of a named program input
///
/// Only constructed from a successful lookup; the underlying API's
/// "not found" sentinel is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLocation(u32);

impl AttributeLocation {
    /// Raw location index
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// A linked, executable GPU program
#[derive(Debug)]
pub struct Program {
    id: ProgramId,
    /// Resolved input locations, cached per name
    locations: FxHashMap<String, AttributeLocation>,
}

impl Program {
    /// Link a vertex and a fragment stage into a program
    ///
    /// Both arguments are proof of successful compilation; this method
    /// additionally verifies that the stage kinds match the slots.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidResource`] for mismatched stage kinds,
    /// [`Error::ProgramLink`] with the verbatim linker log when linking
    /// fails. A failed program object is deleted before returning.
    pub fn link(
        ctx: &mut dyn GlContext,
        vertex_shader: &Shader,
        fragment_shader: &Shader,
    ) -> Result<Self> {
        if vertex_shader.stage() != ShaderStage::Vertex {
            glint_bail!(SOURCE, Error::InvalidResource(format!(
                "link: expected a vertex stage, got {}",
                vertex_shader.stage()
            )));
        }
        if fragment_shader.stage() != ShaderStage::Fragment {
            glint_bail!(SOURCE, Error::InvalidResource(format!(
                "link: expected a fragment stage, got {}",
                fragment_shader.stage()
            )));
        }

        let id = ctx.create_program()?;
        if let Err(err) = Self::link_inner(ctx, id, vertex_shader, fragment_shader) {
            let _ = ctx.delete_program(id);
            return Err(err);
        }
        crate::glint_debug!(SOURCE, "program linked");
        Ok(Self {
            id,
            locations: FxHashMap::default(),
        })
    }

    fn link_inner(
        ctx: &mut dyn GlContext,
        id: ProgramId,
        vertex_shader: &Shader,
        fragment_shader: &Shader,
    ) -> Result<()> {
        ctx.attach_shader(id, vertex_shader.id())?;
        ctx.attach_shader(id, fragment_shader.id())?;
        ctx.link_program(id)?;
        if !ctx.program_link_status(id)? {
            let log = ctx.program_info_log(id)?;
            glint_bail!(SOURCE, Error::ProgramLink { log });
        }
        Ok(())
    }

    /// Context handle of the program object
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Resolve a named input to its location, caching the result
    ///
    /// # Errors
    ///
    /// [`Error::AttributeLocationNotFound`] when the program declares no
    /// such input (commonly an unused input optimized away, or a name
    /// mismatch).
    pub fn attribute_location(
        &mut self,
        ctx: &dyn GlContext,
        name: &str,
    ) -> Result<AttributeLocation> {
        if let Some(location) = self.locations.get(name) {
            return Ok(*location);
        }
        match ctx.attrib_location(self.id, name)? {
            Some(index) => {
                let location = AttributeLocation(index);
                self.locations.insert(name.to_string(), location);
                Ok(location)
            }
            None => {
                glint_bail!(SOURCE, Error::AttributeLocationNotFound(name.to_string()));
            }
        }
    }

    /// Names of the program's active per-vertex inputs
    pub fn active_attributes(&self, ctx: &dyn GlContext) -> Result<Vec<String>> {
        ctx.active_attributes(self.id)
    }

    /// Delete the program object
    pub fn release(self, ctx: &mut dyn GlContext) -> Result<()> {
        ctx.delete_program(self.id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
