//! Glint GL demo: set up and draw a colored triangle headlessly
//!
//! Runs the full setup sequence (compile, link, upload, bind) against the
//! software context, draws a frame, and logs the recorded command trace
//! and context statistics.

use glint_gl::glint_info;
use glint_gl::glintgl::context::{GlContext, SoftwareContext};
use glint_gl::glintgl::pipeline::{setup_pipeline, AttributeSource, PipelineDesc};
use glint_gl::glintgl::Result;

const SOURCE: &str = "glint_demo";

const VERTEX_SOURCE: &str = "\
in vec2 vertexPosition;
in vec3 vertexColor;
out vec3 color;
void main() {
    color = vertexColor;
    gl_Position = vec4(vertexPosition, 0.0, 1.0);
}";

const FRAGMENT_SOURCE: &str = "\
in vec3 color;
out vec4 fragColor;
void main() {
    fragColor = vec4(color, 1.0);
}";

fn main() -> Result<()> {
    let mut ctx = SoftwareContext::new();

    let positions = [0.0_f32, 0.5, -0.5, -0.5, 0.5, -0.5];
    let colors = [1.0_f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    let desc = PipelineDesc {
        vertex_source: VERTEX_SOURCE,
        fragment_source: FRAGMENT_SOURCE,
        attributes: vec![
            AttributeSource {
                name: "vertexPosition",
                component_count: 2,
                data: &positions,
            },
            AttributeSource {
                name: "vertexColor",
                component_count: 3,
                data: &colors,
            },
        ],
        clear_color: [0.05, 0.05, 0.08, 1.0],
    };

    let pipeline = setup_pipeline(&mut ctx, &desc)?;
    pipeline.draw(&mut ctx)?;

    glint_info!(SOURCE, "command trace:");
    for command in ctx.trace() {
        glint_info!(SOURCE, "  {}", command);
    }

    let stats = ctx.stats();
    glint_info!(
        SOURCE,
        "frame complete: {} draw call(s), {} triangle(s), {} bytes of buffer memory",
        stats.draw_calls,
        stats.triangles,
        stats.buffer_memory_used
    );

    pipeline.release(&mut ctx)?;
    Ok(())
}
