//! Errors surfaced by the editing session

use carve_glsl::AssembleError;
use carve_scene::SceneError;
use thiserror::Error;

/// Result type alias using the engine's Error type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while editing or recompiling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Lookup or edit rejected by the scene
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Scene cannot satisfy the shader template
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    /// The shader backend rejected the generated source.
    /// The previously linked program stays in effect.
    #[error("Generated shader source was rejected: {0}")]
    GeneratedSourceInvalid(String),
}
