//! Shader compilation seam
//!
//! Compiling and linking GLSL belongs to whatever owns the GPU context.
//! The engine only hands it source text and keeps what it returns.

use carve_glsl::ShaderSource;

/// Compiles and links a vertex/fragment pair into a usable program
pub trait ShaderBackend {
    type Program;

    /// Returns the driver's info log on failure
    fn link(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program, String>;
}

/// Backend with no GPU behind it: accepts any source and keeps it as the program
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceBackend;

impl ShaderBackend for SourceBackend {
    type Program = ShaderSource;

    fn link(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program, String> {
        Ok(ShaderSource {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        })
    }
}
