/// Opaque GPU resource handles
///
/// Handles are arena keys: the context that created a resource owns its
/// backing state, and a handle stays cheap to copy and safe to hold after
/// the resource is deleted (use after delete is reported as an error, not
/// undefined behavior). Deletion is explicit and deterministic; there is
/// no automatic reclamation.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a shader object (one compiled stage)
    pub struct ShaderId;

    /// Handle to a linked GPU program
    pub struct ProgramId;

    /// Handle to a GPU-resident vertex buffer
    pub struct BufferId;

    /// Handle to a vertex array (attribute binding context)
    pub struct VertexArrayId;
}
