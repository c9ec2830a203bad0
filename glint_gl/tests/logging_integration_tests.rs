//! Integration tests for the logging system
//!
//! These tests verify the replaceable global logger and the log entries
//! the pipeline layer emits on its error paths. No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use glint_gl::glintgl::context::{ShaderStage, SoftwareContext};
use glint_gl::glintgl::log::{LogEntry, Logger, LogSeverity};
use glint_gl::glintgl::pipeline::Shader;
use glint_gl::log::{reset_logger, set_logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger_captures_macro_output() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);

    glint_gl::glint_info!("test::module", "setup took {} ms", 12);
    glint_gl::glint_warn!("test::module", "running without color output");

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 2);

    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].source, "test::module");
    assert_eq!(captured[0].message, "setup took 12 ms");
    assert_eq!(captured[0].file, None);

    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert_eq!(captured[1].message, "running without color output");
    drop(captured);

    reset_logger();
}

#[test]
#[serial]
fn test_integration_error_path_logs_with_location() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);

    // A failed compile goes through the error-logging path
    let mut ctx = SoftwareContext::new();
    let result = Shader::compile(&mut ctx, ShaderStage::Vertex, "");
    assert!(result.is_err());

    let captured = entries.lock().unwrap();
    let error_entry = captured
        .iter()
        .find(|entry| entry.severity == LogSeverity::Error)
        .expect("a failed compile should log at ERROR severity");

    assert_eq!(error_entry.source, "glintgl::Shader");
    assert!(error_entry.message.contains("empty shader source"));
    assert!(error_entry.file.is_some());
    assert!(error_entry.line.is_some());
    drop(captured);

    reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset_detaches_capture() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);

    glint_gl::glint_info!("test", "before reset");
    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
    }

    reset_logger();

    // Goes to the default logger, not the capture
    glint_gl::glint_info!("test", "after reset");
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
}

#[test]
#[serial]
fn test_integration_all_severities_pass_through() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);

    glint_gl::glint_trace!("test", "trace message");
    glint_gl::glint_debug!("test", "debug message");
    glint_gl::glint_info!("test", "info message");
    glint_gl::glint_warn!("test", "warn message");
    glint_gl::glint_error!("test", "error message");

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 5);
    assert_eq!(captured[0].severity, LogSeverity::Trace);
    assert_eq!(captured[1].severity, LogSeverity::Debug);
    assert_eq!(captured[2].severity, LogSeverity::Info);
    assert_eq!(captured[3].severity, LogSeverity::Warn);
    assert_eq!(captured[4].severity, LogSeverity::Error);

    // Only the ERROR entry carries location information
    assert!(captured[3].file.is_none());
    assert!(captured[4].file.is_some());
    drop(captured);

    reset_logger();
}
