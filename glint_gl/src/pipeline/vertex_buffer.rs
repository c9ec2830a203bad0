/// GPU-resident vertex buffer
///
/// Owns a write-once copy of flat f32 host data. The upload happens under
/// an ArrayBufferScope, so the array-data target is left exactly as the
/// caller had it; content is immutable after upload by design, not merely
/// by usage.

use crate::context::{ArrayBufferScope, BufferId, BufferUsage, GlContext};
use crate::error::{Error, Result};
use crate::glint_bail;

const SOURCE: &str = "glintgl::VertexBuffer";

/// A static (write-once, read-many) vertex buffer
#[derive(Debug)]
pub struct VertexBuffer {
    id: BufferId,
    len: usize,
}

impl VertexBuffer {
    /// Allocate a buffer and upload `data` into it
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBufferData`] for empty data or non-finite values;
    /// those fail fast, before any GPU allocation.
    pub fn with_data(ctx: &mut dyn GlContext, data: &[f32]) -> Result<Self> {
        if data.is_empty() {
            glint_bail!(SOURCE, Error::InvalidBufferData("empty vertex data".to_string()));
        }
        if let Some(index) = data.iter().position(|value| !value.is_finite()) {
            glint_bail!(SOURCE, Error::InvalidBufferData(format!(
                "non-finite value {} at index {}",
                data[index], index
            )));
        }

        let id = ctx.create_buffer()?;
        let upload = {
            match ArrayBufferScope::bind(&mut *ctx, id) {
                Ok(mut scope) => scope
                    .ctx()
                    .array_buffer_data(bytemuck::cast_slice(data), BufferUsage::StaticDraw),
                Err(err) => Err(err),
            }
        };
        if let Err(err) = upload {
            let _ = ctx.delete_buffer(id);
            return Err(err);
        }

        crate::glint_trace!(SOURCE, "uploaded {} floats ({} bytes)", data.len(), data.len() * 4);
        Ok(Self { id, len: data.len() })
    }

    /// Context handle of the buffer object
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of f32 values stored
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no values (never true for a constructed buffer)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the GPU allocation in bytes
    pub fn size_bytes(&self) -> u64 {
        self.len as u64 * 4
    }

    /// Delete the buffer object and its GPU memory
    pub fn release(self, ctx: &mut dyn GlContext) -> Result<()> {
        ctx.delete_buffer(self.id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
