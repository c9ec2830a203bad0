/// Context module - the GPU context capability trait and its in-tree
/// software implementation

// Module declarations
pub mod context;
pub mod handles;
pub mod scoped;
pub mod software_context;

// Re-export everything from context.rs
pub use context::*;

// Re-export from other modules
pub use handles::*;
pub use scoped::*;
pub use software_context::*;
