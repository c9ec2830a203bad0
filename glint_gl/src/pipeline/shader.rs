/// Compiled shader stage
///
/// A `Shader` value exists only for a stage that compiled successfully:
/// compile status is checked unconditionally and a failure deletes the
/// just-created shader object before the error is returned, carrying the
/// compiler's diagnostic log verbatim.

use crate::context::{GlContext, ShaderId, ShaderStage};
use crate::error::{Error, Result};
use crate::glint_bail;

const SOURCE: &str = "glintgl::Shader";

/// One successfully compiled shader stage
#[derive(Debug)]
pub struct Shader {
    id: ShaderId,
    stage: ShaderStage,
}

impl Shader {
    /// Compile `source` as a shader of the given stage
    ///
    /// # Errors
    ///
    /// [`Error::ShaderCompilation`] with the stage kind and the verbatim
    /// compiler log when compilation fails. The shader object is deleted
    /// before returning; no unusable handle escapes.
    pub fn compile(
        ctx: &mut dyn GlContext,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self> {
        let id = ctx.create_shader(stage)?;
        if let Err(err) = Self::compile_inner(ctx, id, stage, source) {
            let _ = ctx.delete_shader(id);
            return Err(err);
        }
        crate::glint_debug!(SOURCE, "{} stage compiled", stage);
        Ok(Self { id, stage })
    }

    fn compile_inner(
        ctx: &mut dyn GlContext,
        id: ShaderId,
        stage: ShaderStage,
        source: &str,
    ) -> Result<()> {
        ctx.shader_source(id, source)?;
        ctx.compile_shader(id)?;
        if !ctx.shader_compile_status(id)? {
            let log = ctx.shader_info_log(id)?;
            glint_bail!(SOURCE, Error::ShaderCompilation { stage, log });
        }
        Ok(())
    }

    /// Context handle of the shader object
    pub fn id(&self) -> ShaderId {
        self.id
    }

    /// Stage this shader was compiled for
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Delete the shader object
    ///
    /// Safe to call once the shader has been attached and linked into a
    /// program; the program keeps what it needs.
    pub fn release(self, ctx: &mut dyn GlContext) -> Result<()> {
        ctx.delete_shader(self.id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
