//! Unit tests for setup.rs
//!
//! The one-time sequence must leave nothing behind on any failure path,
//! and a successful setup must yield a pipeline that draws repeatably
//! without disturbing the context's binding slots.

use super::*;
use crate::context::{GlContext, ShaderStage, SoftwareContext};
use crate::error::Error;

const VERTEX_SOURCE: &str = "\
in vec2 vertexPosition;
in vec3 vertexColor;
void main() {}";
const FRAGMENT_SOURCE: &str = "out vec4 fragColor;\nvoid main() {}";

const POSITIONS: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];
const COLORS: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

fn triangle_desc() -> PipelineDesc<'static> {
    PipelineDesc {
        vertex_source: VERTEX_SOURCE,
        fragment_source: FRAGMENT_SOURCE,
        attributes: vec![
            AttributeSource {
                name: "vertexPosition",
                component_count: 2,
                data: &POSITIONS,
            },
            AttributeSource {
                name: "vertexColor",
                component_count: 3,
                data: &COLORS,
            },
        ],
        clear_color: [0.1, 0.2, 0.3, 1.0],
    }
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_setup_and_draw_triangle() {
    let mut ctx = SoftwareContext::new();

    let pipeline = setup_pipeline(&mut ctx, &triangle_desc()).unwrap();
    assert_eq!(pipeline.vertex_count(), 3);
    // Stage objects are released once the program holds the link
    assert_eq!(ctx.shader_count(), 0);
    assert_eq!(ctx.program_count(), 1);
    assert_eq!(ctx.buffer_count(), 2);
    assert_eq!(ctx.vertex_array_count(), 1);
    assert_eq!(ctx.clear_color_state(), [0.1, 0.2, 0.3, 1.0]);

    pipeline.draw(&mut ctx).unwrap();
    assert_eq!(ctx.stats().draw_calls, 1);
    assert_eq!(ctx.stats().triangles, 1);
    assert!(ctx.trace().iter().any(|c| c == "draw_arrays(Triangles, 0, 3)"));

    // The draw leaves every binding slot as it found it
    assert_eq!(ctx.program_binding(), None);
    assert_eq!(ctx.vertex_array_binding(), None);
    assert_eq!(ctx.array_buffer_binding(), None);
}

#[test]
fn test_draw_is_repeatable() {
    let mut ctx = SoftwareContext::new();
    let pipeline = setup_pipeline(&mut ctx, &triangle_desc()).unwrap();

    pipeline.draw(&mut ctx).unwrap();
    pipeline.draw(&mut ctx).unwrap();
    pipeline.draw(&mut ctx).unwrap();
    assert_eq!(ctx.stats().draw_calls, 3);
    assert_eq!(ctx.stats().triangles, 3);
}

#[test]
fn test_uploaded_data_round_trips() {
    let mut ctx = SoftwareContext::new();
    let pipeline = setup_pipeline(&mut ctx, &triangle_desc()).unwrap();

    let buffers = pipeline.vertex_buffers();
    assert_eq!(ctx.buffer_data_f32(buffers[0].id()).unwrap(), POSITIONS);
    assert_eq!(ctx.buffer_data_f32(buffers[1].id()).unwrap(), COLORS);
}

#[test]
fn test_release_frees_every_resource() {
    let mut ctx = SoftwareContext::new();
    let pipeline = setup_pipeline(&mut ctx, &triangle_desc()).unwrap();

    pipeline.release(&mut ctx).unwrap();
    assert_eq!(ctx.program_count(), 0);
    assert_eq!(ctx.buffer_count(), 0);
    assert_eq!(ctx.vertex_array_count(), 0);
    assert_eq!(ctx.stats().buffer_memory_used, 0);
}

// ============================================================================
// Host data validation
// ============================================================================

#[test]
fn test_setup_rejects_empty_attribute_list() {
    let mut ctx = SoftwareContext::new();
    let mut desc = triangle_desc();
    desc.attributes.clear();

    let result = setup_pipeline(&mut ctx, &desc);
    assert!(matches!(result, Err(Error::InvalidBufferData(_))));
    // Validation fails before the context is touched
    assert!(ctx.trace().is_empty());
}

#[test]
fn test_setup_rejects_mismatched_vertex_counts() {
    let mut ctx = SoftwareContext::new();
    let short_colors = [1.0_f32, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mut desc = triangle_desc();
    desc.attributes[1].data = &short_colors;

    let result = setup_pipeline(&mut ctx, &desc);
    match result {
        Err(Error::InvalidBufferData(message)) => {
            assert!(message.contains("vertexColor"), "unexpected message: {}", message);
        }
        other => panic!("expected rejected data, got {:?}", other),
    }
    assert!(ctx.trace().is_empty());
}

#[test]
fn test_setup_rejects_non_divisible_data() {
    let mut ctx = SoftwareContext::new();
    let ragged = [0.0_f32; 7];
    let mut desc = triangle_desc();
    desc.attributes[0].data = &ragged;

    assert!(matches!(
        setup_pipeline(&mut ctx, &desc),
        Err(Error::InvalidBufferData(_))
    ));
}

#[test]
fn test_setup_rejects_component_count_out_of_range() {
    let mut ctx = SoftwareContext::new();
    let mut desc = triangle_desc();
    desc.attributes[0].component_count = 5;

    assert!(matches!(
        setup_pipeline(&mut ctx, &desc),
        Err(Error::InvalidBufferData(_))
    ));
}

#[test]
fn test_setup_rejects_duplicate_attribute_names() {
    let mut ctx = SoftwareContext::new();
    let mut desc = triangle_desc();
    desc.attributes[1].name = "vertexPosition";
    desc.attributes[1].component_count = 2;
    desc.attributes[1].data = &POSITIONS;

    let result = setup_pipeline(&mut ctx, &desc);
    match result {
        Err(Error::InvalidBufferData(message)) => {
            assert!(message.contains("duplicate"), "unexpected message: {}", message);
        }
        other => panic!("expected rejected data, got {:?}", other),
    }
}

// ============================================================================
// Failure paths release partial resources
// ============================================================================

#[test]
fn test_vertex_compile_failure_cleans_up() {
    let mut ctx = SoftwareContext::new();
    let mut desc = triangle_desc();
    desc.vertex_source = "in vec2 vertexPosition;";

    let result = setup_pipeline(&mut ctx, &desc);
    assert!(matches!(
        result,
        Err(Error::ShaderCompilation { stage: ShaderStage::Vertex, .. })
    ));
    assert_eq!(ctx.shader_count(), 0);
    assert_eq!(ctx.program_count(), 0);
    assert_eq!(ctx.buffer_count(), 0);
}

#[test]
fn test_fragment_compile_failure_releases_vertex_stage() {
    let mut ctx = SoftwareContext::new();
    let mut desc = triangle_desc();
    desc.fragment_source = "#error deliberately broken";

    let result = setup_pipeline(&mut ctx, &desc);
    assert!(matches!(
        result,
        Err(Error::ShaderCompilation { stage: ShaderStage::Fragment, .. })
    ));
    assert_eq!(ctx.shader_count(), 0);
    assert_eq!(ctx.program_count(), 0);
}

#[test]
fn test_unknown_attribute_name_cleans_up() {
    let mut ctx = SoftwareContext::new();
    let mut desc = triangle_desc();
    desc.attributes[1].name = "vertexNormal";

    let result = setup_pipeline(&mut ctx, &desc);
    match result {
        Err(Error::AttributeLocationNotFound(name)) => assert_eq!(name, "vertexNormal"),
        other => panic!("expected a lookup failure, got {:?}", other),
    }
    assert_eq!(ctx.shader_count(), 0);
    assert_eq!(ctx.program_count(), 0);
    assert_eq!(ctx.buffer_count(), 0);
    assert_eq!(ctx.vertex_array_count(), 0);
    assert_eq!(ctx.stats().buffer_memory_used, 0);
}

// ============================================================================
// Draw-time readiness
// ============================================================================

#[test]
fn test_unsupplied_program_input_fails_at_draw_not_setup() {
    let mut ctx = SoftwareContext::new();
    // The program declares vertexColor, the host supplies only positions
    let mut desc = triangle_desc();
    desc.attributes.truncate(1);

    let pipeline = setup_pipeline(&mut ctx, &desc).unwrap();

    let result = pipeline.draw(&mut ctx);
    match result {
        Err(Error::UnsatisfiedAttribute(name)) => assert_eq!(name, "vertexColor"),
        other => panic!("expected an unsatisfied input, got {:?}", other),
    }
    // The draw was never issued and no binding was disturbed
    assert_eq!(ctx.stats().draw_calls, 0);
    assert_eq!(ctx.program_binding(), None);
    assert_eq!(ctx.vertex_array_binding(), None);
}

#[test]
fn test_draw_range_overrun_fails_and_restores_bindings() {
    let mut ctx = SoftwareContext::new();
    let pipeline = setup_pipeline(&mut ctx, &triangle_desc()).unwrap();

    let result = pipeline.draw_range(&mut ctx, 0, 6);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(ctx.stats().draw_calls, 0);
    assert_eq!(ctx.program_binding(), None);
    assert_eq!(ctx.vertex_array_binding(), None);
}
