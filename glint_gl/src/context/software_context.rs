/// Software GPU context (no GPU required)
///
/// A complete, validating implementation of [`GlContext`] that models the
/// context's binding slots and resource arenas on the CPU. It enforces
/// every precondition the trait documents, records a human-readable
/// command trace, and supports buffer read-back, which makes it the
/// backend for the test suite and for headless tooling.
///
/// Shader "compilation" is deliberately shallow: a stage compiles when its
/// source contains a `void main` entry point and no `#error` directive,
/// and the active vertex attributes of a linked program are the `in`
/// declarations of its vertex stage, located in declaration order.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::context::{
    AttributeType, BufferId, BufferUsage, ClearMask, ContextStats, DrawMode, GlContext,
    ProgramId, ShaderId, ShaderStage, VertexArrayId,
};
use crate::error::{Error, Result};

// ============================================================================
// Resource state
// ============================================================================

#[derive(Debug)]
struct ShaderState {
    stage: ShaderStage,
    source: String,
    compile_status: bool,
    info_log: String,
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<ShaderId>,
    linked: bool,
    link_status: bool,
    info_log: String,
    /// Active vertex inputs captured at link time, in location order
    attributes: Vec<String>,
}

#[derive(Debug, Default)]
struct BufferState {
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Clone)]
struct AttributeRecord {
    buffer: BufferId,
    component_count: u32,
    attrib_type: AttributeType,
    normalized: bool,
    stride: u32,
    offset: u32,
}

#[derive(Debug, Default)]
struct VertexArrayState {
    bindings: FxHashMap<u32, AttributeRecord>,
    enabled: FxHashSet<u32>,
}

// ============================================================================
// SoftwareContext
// ============================================================================

/// Software implementation of [`GlContext`]
pub struct SoftwareContext {
    shaders: SlotMap<ShaderId, ShaderState>,
    programs: SlotMap<ProgramId, ProgramState>,
    buffers: SlotMap<BufferId, BufferState>,
    vertex_arrays: SlotMap<VertexArrayId, VertexArrayState>,

    bound_array_buffer: Option<BufferId>,
    bound_vertex_array: Option<VertexArrayId>,
    active_program: Option<ProgramId>,
    clear_color: [f32; 4],

    trace: Vec<String>,
    stats: ContextStats,
}

impl SoftwareContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            shaders: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            buffers: SlotMap::with_key(),
            vertex_arrays: SlotMap::with_key(),
            bound_array_buffer: None,
            bound_vertex_array: None,
            active_program: None,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            trace: Vec::new(),
            stats: ContextStats::default(),
        }
    }

    // ===== TEST / TOOLING SURFACE =====

    /// Recorded command trace, in issue order
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Read back a buffer's contents as f32 values
    ///
    /// Returns `None` for a stale handle or contents that are not a whole
    /// number of f32 values.
    pub fn buffer_data_f32(&self, buffer: BufferId) -> Option<Vec<f32>> {
        let state = self.buffers.get(buffer)?;
        if state.data.len() % 4 != 0 {
            return None;
        }
        Some(bytemuck::pod_collect_to_vec(&state.data))
    }

    /// Current clear color
    pub fn clear_color_state(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Number of live shader objects
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of live program objects
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Number of live buffer objects
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live vertex array objects
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    // ===== INTERNAL HELPERS =====

    fn shader(&self, id: ShaderId) -> Result<&ShaderState> {
        self.shaders
            .get(id)
            .ok_or_else(|| Error::InvalidResource("stale shader handle".to_string()))
    }

    fn shader_mut(&mut self, id: ShaderId) -> Result<&mut ShaderState> {
        self.shaders
            .get_mut(id)
            .ok_or_else(|| Error::InvalidResource("stale shader handle".to_string()))
    }

    fn program(&self, id: ProgramId) -> Result<&ProgramState> {
        self.programs
            .get(id)
            .ok_or_else(|| Error::InvalidResource("stale program handle".to_string()))
    }

    fn program_mut(&mut self, id: ProgramId) -> Result<&mut ProgramState> {
        self.programs
            .get_mut(id)
            .ok_or_else(|| Error::InvalidResource("stale program handle".to_string()))
    }

    fn linked_program(&self, id: ProgramId) -> Result<&ProgramState> {
        let state = self.program(id)?;
        if !state.linked {
            return Err(Error::InvalidResource("program has not been linked".to_string()));
        }
        Ok(state)
    }

    /// Shallow compile model: an entry point is required and `#error`
    /// always fails the stage.
    fn run_compiler(source: &str) -> (bool, String) {
        if source.trim().is_empty() {
            return (false, "ERROR: 0:1: '' : empty shader source".to_string());
        }
        if let Some(line_index) = source.lines().position(|line| line.contains("#error")) {
            return (
                false,
                format!("ERROR: 0:{}: '#error' : preprocessor error", line_index + 1),
            );
        }
        if !source.contains("void main") {
            return (
                false,
                "ERROR: 0:1: 'main' : function definition not found".to_string(),
            );
        }
        (true, String::new())
    }

    /// Extract `in <type> <name>;` declarations from vertex stage source,
    /// in declaration order. Location = index.
    fn parse_vertex_inputs(source: &str) -> Vec<String> {
        let mut names = Vec::new();
        for line in source.lines() {
            let line = line.trim().trim_end_matches(';');
            let mut parts = line.split_whitespace();
            if parts.next() != Some("in") {
                continue;
            }
            if let (Some(_ty), Some(name)) = (parts.next(), parts.next()) {
                names.push(name.to_string());
            }
        }
        names
    }

    fn record(&mut self, command: String) {
        self.trace.push(command);
    }
}

impl Default for SoftwareContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GlContext implementation
// ============================================================================

impl GlContext for SoftwareContext {
    // ----- Shaders -----

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId> {
        let id = self.shaders.insert(ShaderState {
            stage,
            source: String::new(),
            compile_status: false,
            info_log: String::new(),
        });
        self.record(format!("create_shader({:?})", stage));
        Ok(id)
    }

    fn shader_source(&mut self, shader: ShaderId, source: &str) -> Result<()> {
        self.shader_mut(shader)?.source = source.to_string();
        self.record("shader_source".to_string());
        Ok(())
    }

    fn compile_shader(&mut self, shader: ShaderId) -> Result<()> {
        let state = self.shader_mut(shader)?;
        let (status, log) = Self::run_compiler(&state.source);
        state.compile_status = status;
        state.info_log = log;
        let stage = state.stage;
        self.record(format!("compile_shader({:?})", stage));
        Ok(())
    }

    fn shader_compile_status(&self, shader: ShaderId) -> Result<bool> {
        Ok(self.shader(shader)?.compile_status)
    }

    fn shader_info_log(&self, shader: ShaderId) -> Result<String> {
        Ok(self.shader(shader)?.info_log.clone())
    }

    fn delete_shader(&mut self, shader: ShaderId) -> Result<()> {
        self.shaders
            .remove(shader)
            .ok_or_else(|| Error::InvalidResource("stale shader handle".to_string()))?;
        self.record("delete_shader".to_string());
        Ok(())
    }

    // ----- Programs -----

    fn create_program(&mut self) -> Result<ProgramId> {
        let id = self.programs.insert(ProgramState::default());
        self.record("create_program".to_string());
        Ok(id)
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<()> {
        self.shader(shader)?;
        let state = self.program_mut(program)?;
        state.attached.push(shader);
        self.record("attach_shader".to_string());
        Ok(())
    }

    fn link_program(&mut self, program: ProgramId) -> Result<()> {
        let attached = self.program(program)?.attached.clone();

        let mut vertex_source: Option<String> = None;
        let mut stages: Vec<ShaderStage> = Vec::new();
        let mut failure: Option<String> = None;

        for shader_id in &attached {
            match self.shaders.get(*shader_id) {
                Some(shader) => {
                    if !shader.compile_status {
                        failure = Some(format!(
                            "ERROR: attached {} shader is not successfully compiled",
                            shader.stage
                        ));
                        break;
                    }
                    if shader.stage == ShaderStage::Vertex {
                        vertex_source = Some(shader.source.clone());
                    }
                    stages.push(shader.stage);
                }
                None => {
                    failure = Some("ERROR: attached shader was deleted before link".to_string());
                    break;
                }
            }
        }

        if failure.is_none() {
            let vertex_count = stages.iter().filter(|s| **s == ShaderStage::Vertex).count();
            let fragment_count = stages.iter().filter(|s| **s == ShaderStage::Fragment).count();
            if vertex_count != 1 || fragment_count != 1 {
                failure = Some(format!(
                    "ERROR: program requires exactly one vertex and one fragment stage \
                     (got {} vertex, {} fragment)",
                    vertex_count, fragment_count
                ));
            }
        }

        let state = self.program_mut(program)?;
        state.linked = true;
        match failure {
            Some(log) => {
                state.link_status = false;
                state.info_log = log;
                state.attributes.clear();
            }
            None => {
                state.link_status = true;
                state.info_log = String::new();
                state.attributes =
                    Self::parse_vertex_inputs(vertex_source.as_deref().unwrap_or(""));
            }
        }
        self.record("link_program".to_string());
        Ok(())
    }

    fn program_link_status(&self, program: ProgramId) -> Result<bool> {
        Ok(self.linked_program(program)?.link_status)
    }

    fn program_info_log(&self, program: ProgramId) -> Result<String> {
        Ok(self.program(program)?.info_log.clone())
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Result<Option<u32>> {
        let state = self.linked_program(program)?;
        Ok(state
            .attributes
            .iter()
            .position(|attr| attr == name)
            .map(|index| index as u32))
    }

    fn active_attributes(&self, program: ProgramId) -> Result<Vec<String>> {
        Ok(self.linked_program(program)?.attributes.clone())
    }

    fn use_program(&mut self, program: Option<ProgramId>) -> Result<()> {
        if let Some(id) = program {
            if !self.linked_program(id)?.link_status {
                return Err(Error::InvalidResource(
                    "use_program: program did not link successfully".to_string(),
                ));
            }
        }
        self.active_program = program;
        self.record(format!("use_program({})", program.is_some()));
        Ok(())
    }

    fn program_binding(&self) -> Option<ProgramId> {
        self.active_program
    }

    fn delete_program(&mut self, program: ProgramId) -> Result<()> {
        self.programs
            .remove(program)
            .ok_or_else(|| Error::InvalidResource("stale program handle".to_string()))?;
        if self.active_program == Some(program) {
            self.active_program = None;
        }
        self.record("delete_program".to_string());
        Ok(())
    }

    // ----- Buffers -----

    fn create_buffer(&mut self) -> Result<BufferId> {
        let id = self.buffers.insert(BufferState::default());
        self.record("create_buffer".to_string());
        Ok(id)
    }

    fn bind_array_buffer(&mut self, buffer: Option<BufferId>) -> Result<()> {
        if let Some(id) = buffer {
            if !self.buffers.contains_key(id) {
                return Err(Error::InvalidResource("stale buffer handle".to_string()));
            }
        }
        self.bound_array_buffer = buffer;
        self.record(format!("bind_array_buffer({})", buffer.is_some()));
        Ok(())
    }

    fn array_buffer_binding(&self) -> Option<BufferId> {
        self.bound_array_buffer
    }

    fn array_buffer_data(&mut self, data: &[u8], usage: BufferUsage) -> Result<()> {
        let bound = self.bound_array_buffer.ok_or_else(|| {
            Error::InvalidResource(
                "array_buffer_data: no buffer bound to the array-data target".to_string(),
            )
        })?;
        let state = self
            .buffers
            .get_mut(bound)
            .ok_or_else(|| Error::InvalidResource("stale buffer handle".to_string()))?;
        self.stats.buffer_memory_used -= state.data.len() as u64;
        state.data = data.to_vec();
        state.usage = Some(usage);
        self.stats.buffer_memory_used += data.len() as u64;
        self.record(format!("array_buffer_data({} bytes, {:?})", data.len(), usage));
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferId) -> Result<()> {
        let state = self
            .buffers
            .remove(buffer)
            .ok_or_else(|| Error::InvalidResource("stale buffer handle".to_string()))?;
        self.stats.buffer_memory_used -= state.data.len() as u64;
        // GL semantics: deleting a bound buffer unbinds it
        if self.bound_array_buffer == Some(buffer) {
            self.bound_array_buffer = None;
        }
        self.record("delete_buffer".to_string());
        Ok(())
    }

    // ----- Vertex arrays -----

    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let id = self.vertex_arrays.insert(VertexArrayState::default());
        self.record("create_vertex_array".to_string());
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> Result<()> {
        if let Some(id) = vertex_array {
            if !self.vertex_arrays.contains_key(id) {
                return Err(Error::InvalidResource("stale vertex array handle".to_string()));
            }
        }
        self.bound_vertex_array = vertex_array;
        self.record(format!("bind_vertex_array({})", vertex_array.is_some()));
        Ok(())
    }

    fn vertex_array_binding(&self) -> Option<VertexArrayId> {
        self.bound_vertex_array
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) -> Result<()> {
        let bound = self.bound_vertex_array.ok_or(Error::NoActiveBindingContext)?;
        let state = self
            .vertex_arrays
            .get_mut(bound)
            .ok_or_else(|| Error::InvalidResource("stale vertex array handle".to_string()))?;
        state.enabled.insert(location);
        self.record(format!("enable_vertex_attrib_array({})", location));
        Ok(())
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: u32,
        component_count: u32,
        attrib_type: AttributeType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) -> Result<()> {
        let vertex_array = self.bound_vertex_array.ok_or(Error::NoActiveBindingContext)?;
        let buffer = self.bound_array_buffer.ok_or_else(|| {
            Error::InvalidResource(
                "vertex_attrib_pointer: no buffer bound to the array-data target".to_string(),
            )
        })?;
        if !(1..=4).contains(&component_count) {
            return Err(Error::InvalidResource(format!(
                "vertex_attrib_pointer: component count {} out of range 1..=4",
                component_count
            )));
        }
        let state = self
            .vertex_arrays
            .get_mut(vertex_array)
            .ok_or_else(|| Error::InvalidResource("stale vertex array handle".to_string()))?;
        // Last write wins: one record per location
        state.bindings.insert(
            location,
            AttributeRecord {
                buffer,
                component_count,
                attrib_type,
                normalized,
                stride,
                offset,
            },
        );
        self.record(format!(
            "vertex_attrib_pointer({}, {}, {:?})",
            location, component_count, attrib_type
        ));
        Ok(())
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) -> Result<()> {
        self.vertex_arrays
            .remove(vertex_array)
            .ok_or_else(|| Error::InvalidResource("stale vertex array handle".to_string()))?;
        if self.bound_vertex_array == Some(vertex_array) {
            self.bound_vertex_array = None;
        }
        self.record("delete_vertex_array".to_string());
        Ok(())
    }

    // ----- Drawing -----

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
        self.record(format!("clear_color({}, {}, {}, {})", r, g, b, a));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.record(format!("clear({:?})", mask));
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) -> Result<()> {
        let program_id = self.active_program.ok_or_else(|| {
            Error::InvalidResource("draw_arrays: no program in use".to_string())
        })?;
        let vertex_array_id = self.bound_vertex_array.ok_or(Error::NoActiveBindingContext)?;

        let program = self.linked_program(program_id)?;
        let vertex_array = self
            .vertex_arrays
            .get(vertex_array_id)
            .ok_or_else(|| Error::InvalidResource("stale vertex array handle".to_string()))?;

        // Every active program input needs an enabled, bound record, and
        // the drawn range must stay inside the backing buffer.
        for (index, name) in program.attributes.iter().enumerate() {
            let location = index as u32;
            if !vertex_array.enabled.contains(&location) {
                return Err(Error::UnsatisfiedAttribute(name.clone()));
            }
            let record = vertex_array
                .bindings
                .get(&location)
                .ok_or_else(|| Error::UnsatisfiedAttribute(name.clone()))?;
            let buffer = self.buffers.get(record.buffer).ok_or_else(|| {
                Error::InvalidResource(format!("attribute '{}' reads from a deleted buffer", name))
            })?;
            let vertex_size = record.component_count * record.attrib_type.size_bytes();
            let per_vertex = if record.stride == 0 { vertex_size } else { record.stride };
            let needed =
                record.offset as u64 + (first as u64 + count as u64) * per_vertex as u64;
            if needed > buffer.data.len() as u64 {
                return Err(Error::InvalidResource(format!(
                    "draw_arrays: range [{}, {}) overruns the buffer behind attribute '{}' \
                     ({} bytes needed, {} available)",
                    first,
                    first + count,
                    name,
                    needed,
                    buffer.data.len()
                )));
            }
        }

        self.stats.draw_calls += 1;
        if mode == DrawMode::Triangles {
            self.stats.triangles += count / 3;
        }
        self.record(format!("draw_arrays({:?}, {}, {})", mode, first, count));
        Ok(())
    }

    fn stats(&self) -> ContextStats {
        self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "software_context_tests.rs"]
mod tests;
