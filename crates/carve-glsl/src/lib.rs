//! Carve GLSL - Distance-function generation for raymarching shaders
//!
//! Turns a [`carve_scene::Scene`] into GLSL ES 1.00 source: one
//! `float <name>(vec3 p)` function per root subassembly, placed between a
//! fixed preamble and a raymarching epilogue that calls `SDF(vec3)`.
//!
//! ## Key Types
//!
//! - [`GlslGenerator`] - Per-node distance expressions and subassembly functions
//! - [`ShaderSource`] - Assembled vertex and fragment stages
//! - [`float_literal`] - The one place numbers become shader text
//!
//! ## Example
//!
//! ```rust
//! use carve_glsl::build_shader;
//! use carve_scene::{Scene, Sphere};
//!
//! let mut scene = Scene::new();
//! let root = scene.add_subassembly("SDF")?;
//! scene.add_sphere(root, Sphere::default())?;
//!
//! let shader = build_shader(&scene);
//! assert!(shader.fragment.contains("float SDF(vec3 p)"));
//! # Ok::<(), carve_scene::SceneError>(())
//! ```

mod assemble;
mod generator;
mod literal;

pub use assemble::{
    AssembleError, ENTRY_POINT, ShaderSource, build_fragment_shader, build_shader, epilogue,
    find_entry_point, preamble, vertex_shader,
};
pub use generator::GlslGenerator;
pub use literal::{HIGHP_MAX, float_literal};
