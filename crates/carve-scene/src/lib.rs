//! Carve Scene - CSG scene graph with dense node identity
//!
//! This crate holds the editable model behind Carve: a forest of named
//! subassemblies built from spheres, boxes, unions and intersections.
//!
//! ## Key Types
//!
//! - [`Scene`] - Arena that owns every node and keeps ids dense
//! - [`Node`] / [`NodeKind`] - A scene element and its variant data
//! - [`SceneError`] - Lookup and edit failures
//!
//! ## Example
//!
//! ```rust
//! use carve_scene::{Cuboid, Scene, Sphere};
//!
//! let mut scene = Scene::new();
//! let root = scene.add_subassembly("SDF")?;
//! let union = scene.add_union(root)?;
//! let sphere = scene.add_sphere(union, Sphere::default())?;
//! scene.add_box(union, Cuboid::default())?;
//!
//! // Leaves can go; the id range is compacted afterwards
//! scene.delete(sphere)?;
//! assert_eq!(scene.len(), 3);
//! # Ok::<(), carve_scene::SceneError>(())
//! ```

mod error;
mod eval;
mod node;
mod outline;
mod scene;

pub use error::{DeleteRefusal, Result, SceneError};
pub use eval::{SENTINEL_DISTANCE, box_distance, sphere_distance};
pub use node::{
    Cuboid, ElementKind, Node, NodeId, NodeKind, Param, Sphere, TEMPLATE_NAMES, is_identifier,
    is_reserved_name,
};
pub use outline::{Outline, OutlineEntry};
pub use scene::Scene;

/// Re-exported so callers can evaluate distances without a direct glam dependency
pub use glam::DVec3;
