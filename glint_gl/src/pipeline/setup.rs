/// One-time pipeline setup and the repeatable draw
///
/// `setup_pipeline` walks the one-way sequence the underlying API imposes
/// (compile stages → link program → upload buffers → register bindings)
/// and returns a [`ReadyPipeline`] on success. Drawing is a separate
/// operation taking the ready value; it re-checks, before issuing the
/// call, that every active program input has an enabled binding, so an
/// unsatisfied input fails loudly instead of sampling garbage.
///
/// Every resource created during a failed setup is released before the
/// error is returned.

use crate::context::{ClearMask, DrawMode, GlContext, ProgramScope, ShaderStage, VertexArrayScope};
use crate::error::{Error, Result};
use crate::glint_bail;
use crate::pipeline::{
    AttributeLayout, AttributeLocation, Program, Shader, VertexArray, VertexBuffer,
};

const SOURCE: &str = "glintgl::setup";

/// One named per-vertex input and its host data
#[derive(Debug, Clone)]
pub struct AttributeSource<'a> {
    /// Program input name (e.g. "vertexPosition")
    pub name: &'a str,
    /// Components per vertex (1..=4; e.g. 2 for xy position, 3 for rgb)
    pub component_count: u32,
    /// Flat f32 data, `component_count` values per vertex
    pub data: &'a [f32],
}

/// Everything needed to set up one drawable pipeline
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    /// Vertex stage source text
    pub vertex_source: &'a str,
    /// Fragment stage source text
    pub fragment_source: &'a str,
    /// Per-vertex inputs to upload and bind
    pub attributes: Vec<AttributeSource<'a>>,
    /// Color used to clear the target before each draw
    pub clear_color: [f32; 4],
}

/// A fully set-up pipeline, usable for drawing
#[derive(Debug)]
pub struct ReadyPipeline {
    program: Program,
    vertex_array: VertexArray,
    vertex_buffers: Vec<VertexBuffer>,
    vertex_count: u32,
}

/// Validate host data shape before touching the context
///
/// Returns the common vertex count.
fn validate_attributes(attributes: &[AttributeSource<'_>]) -> Result<u32> {
    if attributes.is_empty() {
        glint_bail!(SOURCE, Error::InvalidBufferData(
            "a pipeline needs at least one attribute".to_string()
        ));
    }
    let mut vertex_count: Option<u32> = None;
    for attribute in attributes {
        if !(1..=4).contains(&attribute.component_count) {
            glint_bail!(SOURCE, Error::InvalidBufferData(format!(
                "attribute '{}': component count {} out of range 1..=4",
                attribute.name, attribute.component_count
            )));
        }
        if attribute.data.is_empty() {
            glint_bail!(SOURCE, Error::InvalidBufferData(format!(
                "attribute '{}': empty vertex data",
                attribute.name
            )));
        }
        if attribute.data.len() % attribute.component_count as usize != 0 {
            glint_bail!(SOURCE, Error::InvalidBufferData(format!(
                "attribute '{}': {} values do not divide into {}-component vertices",
                attribute.name,
                attribute.data.len(),
                attribute.component_count
            )));
        }
        let count = (attribute.data.len() / attribute.component_count as usize) as u32;
        match vertex_count {
            None => vertex_count = Some(count),
            Some(expected) if expected != count => {
                glint_bail!(SOURCE, Error::InvalidBufferData(format!(
                    "attribute '{}' holds {} vertices, expected {}",
                    attribute.name, count, expected
                )));
            }
            Some(_) => {}
        }
    }
    for (index, attribute) in attributes.iter().enumerate() {
        if attributes[..index].iter().any(|other| other.name == attribute.name) {
            glint_bail!(SOURCE, Error::InvalidBufferData(format!(
                "duplicate attribute '{}'",
                attribute.name
            )));
        }
    }
    // attributes is non-empty here
    Ok(vertex_count.unwrap_or(0))
}

/// Release everything a partially built pipeline created
fn abort_setup(
    ctx: &mut dyn GlContext,
    program: Program,
    vertex_array: Option<VertexArray>,
    vertex_buffers: Vec<VertexBuffer>,
) {
    for buffer in vertex_buffers {
        let _ = buffer.release(ctx);
    }
    if let Some(vertex_array) = vertex_array {
        let _ = vertex_array.release(ctx);
    }
    let _ = program.release(ctx);
}

/// Run the one-time setup sequence
///
/// # Errors
///
/// Any failure of the component operations aborts the sequence; partially
/// created resources are released and the component's error is returned
/// unchanged.
pub fn setup_pipeline(ctx: &mut dyn GlContext, desc: &PipelineDesc<'_>) -> Result<ReadyPipeline> {
    let vertex_count = validate_attributes(&desc.attributes)?;

    // Shaders compiled
    let vertex_shader = Shader::compile(ctx, ShaderStage::Vertex, desc.vertex_source)?;
    let fragment_shader = match Shader::compile(ctx, ShaderStage::Fragment, desc.fragment_source) {
        Ok(shader) => shader,
        Err(err) => {
            let _ = vertex_shader.release(ctx);
            return Err(err);
        }
    };

    // Program linked
    let mut program = match Program::link(ctx, &vertex_shader, &fragment_shader) {
        Ok(program) => program,
        Err(err) => {
            let _ = vertex_shader.release(ctx);
            let _ = fragment_shader.release(ctx);
            return Err(err);
        }
    };

    // The linked program no longer needs the stage objects
    let released = vertex_shader.release(ctx).and(fragment_shader.release(ctx));
    if let Err(err) = released {
        abort_setup(ctx, program, None, Vec::new());
        return Err(err);
    }

    // Buffers uploaded
    let mut vertex_buffers = Vec::with_capacity(desc.attributes.len());
    for attribute in &desc.attributes {
        match VertexBuffer::with_data(ctx, attribute.data) {
            Ok(buffer) => vertex_buffers.push(buffer),
            Err(err) => {
                abort_setup(ctx, program, None, vertex_buffers);
                return Err(err);
            }
        }
    }

    // Input locations resolved before any binding is recorded
    let mut locations: Vec<AttributeLocation> = Vec::with_capacity(desc.attributes.len());
    for attribute in &desc.attributes {
        match program.attribute_location(&*ctx, attribute.name) {
            Ok(location) => locations.push(location),
            Err(err) => {
                abort_setup(ctx, program, None, vertex_buffers);
                return Err(err);
            }
        }
    }

    // Bindings registered
    let mut vertex_array = match VertexArray::new(ctx) {
        Ok(vertex_array) => vertex_array,
        Err(err) => {
            abort_setup(ctx, program, None, vertex_buffers);
            return Err(err);
        }
    };
    let recorded = match vertex_array.record(ctx) {
        Ok(mut recorder) => {
            let mut result = Ok(());
            for (index, attribute) in desc.attributes.iter().enumerate() {
                result = recorder.enable_attribute(locations[index]).and_then(|_| {
                    recorder.bind_attribute(
                        locations[index],
                        attribute.component_count,
                        &vertex_buffers[index],
                        AttributeLayout::default(),
                    )
                });
                if result.is_err() {
                    break;
                }
            }
            result
        }
        Err(err) => Err(err),
    };
    if let Err(err) = recorded {
        abort_setup(ctx, program, Some(vertex_array), vertex_buffers);
        return Err(err);
    }

    // Ready
    let [r, g, b, a] = desc.clear_color;
    ctx.clear_color(r, g, b, a);

    crate::glint_info!(
        SOURCE,
        "pipeline ready: {} attributes, {} vertices",
        desc.attributes.len(),
        vertex_count
    );
    Ok(ReadyPipeline {
        program,
        vertex_array,
        vertex_buffers,
        vertex_count,
    })
}

impl ReadyPipeline {
    /// Clear the target and draw the whole uploaded vertex range as a
    /// triangle list
    pub fn draw(&self, ctx: &mut dyn GlContext) -> Result<()> {
        self.draw_range(ctx, 0, self.vertex_count)
    }

    /// Clear the target and draw `count` vertices starting at `first`
    ///
    /// # Errors
    ///
    /// [`Error::UnsatisfiedAttribute`] when an active program input has
    /// no enabled binding; the draw is not issued in that case.
    pub fn draw_range(&self, ctx: &mut dyn GlContext, first: u32, count: u32) -> Result<()> {
        self.ensure_inputs_satisfied(&*ctx)?;

        let mut program_scope = ProgramScope::bind(ctx, self.program.id())?;
        let mut vertex_array_scope =
            VertexArrayScope::bind(program_scope.ctx(), self.vertex_array.id())?;
        let ctx = vertex_array_scope.ctx();
        ctx.clear(ClearMask::COLOR);
        ctx.draw_arrays(DrawMode::Triangles, first, count)
    }

    /// Check that every active program input has an enabled, bound record
    fn ensure_inputs_satisfied(&self, ctx: &dyn GlContext) -> Result<()> {
        for name in self.program.active_attributes(ctx)? {
            let satisfied = match ctx.attrib_location(self.program.id(), &name)? {
                Some(index) => {
                    self.vertex_array.index_enabled(index)
                        && self.vertex_array.binding_for_index(index).is_some()
                }
                None => false,
            };
            if !satisfied {
                glint_bail!(SOURCE, Error::UnsatisfiedAttribute(name));
            }
        }
        Ok(())
    }

    /// Number of vertices uploaded at setup time
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// The linked program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The binding context
    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    /// The uploaded buffers, in attribute order
    pub fn vertex_buffers(&self) -> &[VertexBuffer] {
        &self.vertex_buffers
    }

    /// Release every GPU resource the pipeline owns
    pub fn release(self, ctx: &mut dyn GlContext) -> Result<()> {
        let mut first_error = None;
        for buffer in self.vertex_buffers {
            if let Err(err) = buffer.release(ctx) {
                first_error.get_or_insert(err);
            }
        }
        if let Err(err) = self.vertex_array.release(ctx) {
            first_error.get_or_insert(err);
        }
        if let Err(err) = self.program.release(ctx) {
            first_error.get_or_insert(err);
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "setup_tests.rs"]
mod tests;
