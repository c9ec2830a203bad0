/*!
# Glint GL

A minimal, verified setup layer for a GL-family rendering pipeline: compile
and link a GPU program from shader source, upload per-vertex data into
GPU-resident buffers, register attribute-to-buffer bindings in a vertex
array, and issue a draw call over a vertex range.

The GPU itself is reached through the [`context::GlContext`] capability
trait. Any conformant implementation works; the crate ships
[`context::SoftwareContext`], a validating, trace-recording implementation
that needs no GPU and backs the test suite and headless tooling.

## Architecture

- **GlContext**: the fixed GL operation set the crate orchestrates
- **Shader / Program**: stage compilation and linking with mandatory status
  checks and verbatim diagnostic logs
- **VertexBuffer**: write-once upload of flat `f32` data
- **VertexArray / AttributeRecorder**: the attribute-to-buffer binding
  contract, recorded inside an explicit scope
- **setup_pipeline / ReadyPipeline**: one-time setup composed from the
  above, separated from the repeatable draw
*/

// Internal modules
mod error;
pub mod context;
pub mod log;
pub mod pipeline;

// Main glintgl namespace module
pub mod glintgl {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Context sub-module with the capability trait and handles
    pub mod context {
        pub use crate::context::*;
    }

    // Pipeline sub-module with the setup components
    pub mod pipeline {
        pub use crate::pipeline::*;
    }
}
