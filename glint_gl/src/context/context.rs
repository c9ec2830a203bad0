/// GlContext trait - the GPU context capability object
///
/// The sole external dependency of the setup layer. It exposes the
/// primitive GL-family operations (create/compile/link/bind/upload/draw)
/// that the pipeline components orchestrate. Any conformant implementation
/// works: a real GPU backend or the in-tree [`SoftwareContext`].
///
/// The context owns three global "currently bound" slots (array buffer,
/// vertex array, program). Components never leave a binding behind: every
/// mutation of a slot happens under a scope guard from [`crate::context::scoped`]
/// that restores the prior binding on all exit paths.
///
/// [`SoftwareContext`]: crate::context::SoftwareContext

use std::fmt;

use crate::context::{BufferId, ProgramId, ShaderId, VertexArrayId};
use crate::error::Result;

// ============================================================================
// Value types
// ============================================================================

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Buffer usage hint given to the context at upload time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once by the host, read many times by the GPU
    StaticDraw,
}

/// Numeric type of a vertex attribute component
///
/// Per-vertex data in this layer is 32-bit float; host data is validated
/// and truncated to f32 precision before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// 32-bit IEEE float
    Float,
}

impl AttributeType {
    /// Size of one component in bytes
    pub fn size_bytes(&self) -> u32 {
        match self {
            AttributeType::Float => 4,
        }
    }
}

/// Primitive assembly mode for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Independent points
    Points,
    /// Independent line segments (pairs of vertices)
    Lines,
    /// Independent triangles (triples of vertices)
    Triangles,
}

bitflags::bitflags! {
    /// Target surface planes selected by [`GlContext::clear`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR   = 1 << 0;
        const DEPTH   = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Context statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextStats {
    /// Number of draw calls issued
    pub draw_calls: u32,
    /// Number of triangles drawn
    pub triangles: u32,
    /// GPU memory held by live buffers (bytes)
    pub buffer_memory_used: u64,
}

// ============================================================================
// GlContext trait
// ============================================================================

/// Main GPU context trait
///
/// Object-safe; consumed as `&mut dyn GlContext`. The context is owned by
/// one logical thread and all operations complete synchronously from the
/// caller's point of view.
pub trait GlContext {
    // ----- Shaders -----

    /// Allocate a shader object for the given stage
    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId>;

    /// Attach source text to a shader object
    fn shader_source(&mut self, shader: ShaderId, source: &str) -> Result<()>;

    /// Invoke compilation of the attached source
    ///
    /// Compilation failure is reported through
    /// [`shader_compile_status`](Self::shader_compile_status), not through
    /// this call's `Result`.
    fn compile_shader(&mut self, shader: ShaderId) -> Result<()>;

    /// Whether the last compilation of this shader succeeded
    fn shader_compile_status(&self, shader: ShaderId) -> Result<bool>;

    /// Human-readable diagnostic log from the last compilation
    fn shader_info_log(&self, shader: ShaderId) -> Result<String>;

    /// Release a shader object
    fn delete_shader(&mut self, shader: ShaderId) -> Result<()>;

    // ----- Programs -----

    /// Allocate a program object
    fn create_program(&mut self) -> Result<ProgramId>;

    /// Attach a compiled stage to a program
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<()>;

    /// Invoke linking of the attached stages
    ///
    /// Link failure is reported through
    /// [`program_link_status`](Self::program_link_status). Attached stages
    /// may be deleted after a successful link without invalidating the
    /// program.
    fn link_program(&mut self, program: ProgramId) -> Result<()>;

    /// Whether the last link of this program succeeded
    fn program_link_status(&self, program: ProgramId) -> Result<bool>;

    /// Human-readable diagnostic log from the last link
    fn program_info_log(&self, program: ProgramId) -> Result<String>;

    /// Resolve a named program input to its location
    ///
    /// `None` is the "not found" sentinel; callers must never enable or
    /// bind a location they did not resolve.
    fn attrib_location(&self, program: ProgramId, name: &str) -> Result<Option<u32>>;

    /// Names of the program's active per-vertex inputs, post-link
    fn active_attributes(&self, program: ProgramId) -> Result<Vec<String>>;

    /// Select the program used by subsequent draws (`None` deselects)
    fn use_program(&mut self, program: Option<ProgramId>) -> Result<()>;

    /// Program currently selected for drawing
    fn program_binding(&self) -> Option<ProgramId>;

    /// Release a program object
    fn delete_program(&mut self, program: ProgramId) -> Result<()>;

    // ----- Buffers -----

    /// Allocate a buffer object
    fn create_buffer(&mut self) -> Result<BufferId>;

    /// Bind a buffer to the array-data target (`None` unbinds)
    fn bind_array_buffer(&mut self, buffer: Option<BufferId>) -> Result<()>;

    /// Buffer currently bound to the array-data target
    fn array_buffer_binding(&self) -> Option<BufferId>;

    /// Upload bytes into the buffer bound to the array-data target
    fn array_buffer_data(&mut self, data: &[u8], usage: BufferUsage) -> Result<()>;

    /// Release a buffer object and its GPU memory
    fn delete_buffer(&mut self, buffer: BufferId) -> Result<()>;

    // ----- Vertex arrays -----

    /// Allocate a vertex array (attribute binding context)
    fn create_vertex_array(&mut self) -> Result<VertexArrayId>;

    /// Bind a vertex array as the active recording target (`None` unbinds)
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> Result<()>;

    /// Vertex array currently bound
    fn vertex_array_binding(&self) -> Option<VertexArrayId>;

    /// Mark a location in the bound vertex array as reading from a buffer
    /// rather than a constant
    ///
    /// Requires a bound vertex array.
    fn enable_vertex_attrib_array(&mut self, location: u32) -> Result<()>;

    /// Record, in the bound vertex array, that `location` reads from the
    /// buffer currently bound to the array-data target with the given
    /// layout
    ///
    /// The record captures the buffer identity by value: later changes to
    /// the array-data target do not affect it. Requires a bound vertex
    /// array and a bound array buffer.
    fn vertex_attrib_pointer(
        &mut self,
        location: u32,
        component_count: u32,
        attrib_type: AttributeType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) -> Result<()>;

    /// Release a vertex array object
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) -> Result<()>;

    // ----- Drawing -----

    /// Set the color used by [`clear`](Self::clear) for the color plane
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);

    /// Clear the selected planes of the target surface
    fn clear(&mut self, mask: ClearMask);

    /// Draw `count` vertices starting at `first` using the bound program
    /// and vertex array
    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) -> Result<()>;

    /// Get statistics about the context
    fn stats(&self) -> ContextStats;
}
