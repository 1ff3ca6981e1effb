//! CPU-side distance evaluation
//!
//! Evaluates the scene with the same semantics the generated shader has:
//! empty containers and instances are the sentinel distance, and a
//! subassembly is the union of its children folded onto the sentinel.

// Single-letter names follow the usual SDF notation
#![allow(clippy::many_single_char_names)]

use glam::DVec3;

use crate::node::{Cuboid, NodeId, NodeKind, Sphere};
use crate::scene::Scene;

/// Distance reported for "no geometry here"
pub const SENTINEL_DISTANCE: f64 = 1000.0;

/// Signed distance from `p` to a sphere
pub fn sphere_distance(sphere: &Sphere, p: DVec3) -> f64 {
    (p - DVec3::from_array(sphere.center)).length() - sphere.radius
}

/// Exact signed distance from `p` to an axis-aligned box
pub fn box_distance(cuboid: &Cuboid, p: DVec3) -> f64 {
    let q = (p - DVec3::from_array(cuboid.center)).abs() - DVec3::from_array(cuboid.half_extents());
    q.max(DVec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
}

impl Scene {
    /// Signed distance from `p` to the geometry of node `id`.
    ///
    /// Dead ids evaluate to the sentinel, like any other absent geometry.
    pub fn distance(&self, id: NodeId, p: DVec3) -> f64 {
        let Some(node) = self.get(id) else {
            return SENTINEL_DISTANCE;
        };

        match node.kind() {
            NodeKind::Sphere(sphere) => sphere_distance(sphere, p),
            NodeKind::Box(cuboid) => box_distance(cuboid, p),
            NodeKind::Subassembly { children, .. } => children
                .iter()
                .fold(SENTINEL_DISTANCE, |d, &c| d.min(self.distance(c, p))),
            NodeKind::Union { children } => self.fold_children(children, p, f64::min),
            NodeKind::Intersection { children } => self.fold_children(children, p, f64::max),
            NodeKind::SubassemblyInstance { .. } => SENTINEL_DISTANCE,
        }
    }

    fn fold_children(&self, children: &[NodeId], p: DVec3, op: fn(f64, f64) -> f64) -> f64 {
        children
            .iter()
            .map(|&c| self.distance(c, p))
            .reduce(op)
            .unwrap_or(SENTINEL_DISTANCE)
    }
}
