/// Pipeline module - the setup components built on top of GlContext

// Module declarations
pub mod shader;
pub mod program;
pub mod vertex_buffer;
pub mod vertex_array;
pub mod setup;

// Re-exports
pub use shader::*;
pub use program::*;
pub use vertex_buffer::*;
pub use vertex_array::*;
pub use setup::*;
