//! Shader assembly
//!
//! Wraps the generated subassembly functions in the fixed raymarching
//! template. The template calls `SDF(vec3)`, so one root subassembly has
//! to carry that name for the result to link.

use carve_scene::{NodeId, Scene};
use thiserror::Error;
use tracing::debug;

use crate::generator::GlslGenerator;

/// Function name the raymarching template calls
pub const ENTRY_POINT: &str = "SDF";

/// Errors found while checking a scene against the template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// No root subassembly is named after the entry point
    #[error("No root subassembly is named '{0}'; the shader template calls it")]
    MissingEntryPoint(&'static str),
}

/// Vertex and fragment source for one program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// Macro constants, precision and interface declarations
pub fn preamble() -> &'static str {
    include_str!("shaders/preamble.glsl")
}

/// Camera rays, raymarching loop, normals, shading and shadows
pub fn epilogue() -> &'static str {
    include_str!("shaders/raymarch.glsl")
}

/// Full-screen quad vertex shader
pub fn vertex_shader() -> &'static str {
    include_str!("shaders/fullscreen.vert")
}

/// The root subassembly the template will call
pub fn find_entry_point(scene: &Scene) -> Result<NodeId, AssembleError> {
    scene
        .root_named(ENTRY_POINT)
        .ok_or(AssembleError::MissingEntryPoint(ENTRY_POINT))
}

/// Assemble the complete fragment shader.
///
/// Always re-generates every root from scratch.
pub fn build_fragment_shader(scene: &Scene) -> String {
    let functions = GlslGenerator::new(scene).functions();
    let mut source =
        String::with_capacity(preamble().len() + functions.len() + epilogue().len());
    source.push_str(preamble());
    source.push_str(&functions);
    source.push_str(epilogue());

    debug!(
        roots = scene.roots().len(),
        nodes = scene.len(),
        bytes = source.len(),
        "assembled fragment shader"
    );
    source
}

/// Assemble both shader stages
pub fn build_shader(scene: &Scene) -> ShaderSource {
    ShaderSource {
        vertex: vertex_shader().to_string(),
        fragment: build_fragment_shader(scene),
    }
}
