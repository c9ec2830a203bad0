//! Error types for the Glint GL setup layer
//!
//! Every failure mode of the pipeline setup sequence has a dedicated
//! variant. Compiler and linker diagnostic logs are carried verbatim:
//! they originate from the shading-language toolchain and are the
//! primary debugging signal in this domain.

use std::fmt;

use crate::context::ShaderStage;

/// Result type for Glint GL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Glint GL errors
///
/// All variants are terminal for the resource being set up: a failed
/// compile or link is not retryable without corrected source, and the
/// setup sequence must abort before any draw is attempted.
#[derive(Debug, Clone)]
pub enum Error {
    /// A shader stage failed to compile; carries the compiler log
    ShaderCompilation { stage: ShaderStage, log: String },

    /// The program failed to link; carries the linker log
    ProgramLink { log: String },

    /// Host-side vertex data rejected before upload (empty, non-finite,
    /// or inconsistent with the declared component layout)
    InvalidBufferData(String),

    /// A named program input does not exist in the linked program
    /// (typically optimized away when unused, or a name mismatch)
    AttributeLocationNotFound(String),

    /// Attribute binding attempted with no vertex array bound as the
    /// active recording target
    NoActiveBindingContext,

    /// A program input has no enabled attribute binding at draw time
    UnsatisfiedAttribute(String),

    /// A handle is stale or foreign, or an operation was issued against
    /// the wrong target state
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShaderCompilation { stage, log } => {
                write!(f, "{} shader compilation failed: {}", stage, log)
            }
            Error::ProgramLink { log } => write!(f, "program link failed: {}", log),
            Error::InvalidBufferData(msg) => write!(f, "invalid buffer data: {}", msg),
            Error::AttributeLocationNotFound(name) => {
                write!(f, "attribute '{}' not found in linked program", name)
            }
            Error::NoActiveBindingContext => {
                write!(f, "no vertex array bound while recording attribute bindings")
            }
            Error::UnsatisfiedAttribute(name) => {
                write!(f, "program input '{}' has no enabled attribute binding", name)
            }
            Error::InvalidResource(msg) => write!(f, "invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
