//! Dense node registry and structural edits
//!
//! The [`Scene`] is the arena that owns every live node. A node's id is its
//! index in the arena, so ids always form the range `[0, len)`. Deleting a
//! node splices its slot out and shifts every later id (and every handle that
//! points at one) down by one.

use tracing::{debug, warn};

use crate::error::{DeleteRefusal, Result, SceneError};
use crate::node::{
    Cuboid, ElementKind, Node, NodeId, NodeKind, Param, Sphere, is_identifier, is_reserved_name,
};

/// A forest of root subassemblies plus the registry of all their nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    protected_root: Option<String>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse deletion of any root subassembly with this name
    pub fn with_protected_root(mut self, name: impl Into<String>) -> Self {
        self.protected_root = Some(name.into());
        self
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root subassemblies, in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All live nodes, in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a live node, failing with `OutOfRange` for a dead id
    pub fn lookup(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(SceneError::OutOfRange {
            id,
            len: self.nodes.len(),
        })
    }

    /// Find a root subassembly by name
    pub fn root_named(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.nodes.get(id).and_then(Node::name) == Some(name))
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Register a node under the next sequential id
    fn allocate(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        debug!(id, tag = kind.tag(), ?parent, "allocated node");
        self.nodes.push(Node { id, parent, kind });
        id
    }

    /// Append a new root subassembly.
    ///
    /// The name becomes a shader function name, so it must be an identifier
    /// that the generated source does not already use.
    pub fn add_subassembly(&mut self, name: impl Into<String>) -> Result<NodeId> {
        let name = name.into();
        if !is_identifier(&name) || is_reserved_name(&name) || self.root_named(&name).is_some() {
            return Err(SceneError::InvalidName(name));
        }

        let id = self.allocate(
            None,
            NodeKind::Subassembly {
                name,
                children: Vec::new(),
            },
        );
        self.roots.push(id);
        Ok(id)
    }

    /// Walk parent links from `id` to the nearest node that is a container
    pub fn nearest_container(&self, id: NodeId) -> Result<NodeId> {
        let mut current = self.lookup(id)?;
        while !current.is_container() {
            let Some(parent) = current.parent else {
                return Err(SceneError::OutOfRange {
                    id,
                    len: self.nodes.len(),
                });
            };
            current = self.lookup(parent)?;
        }
        Ok(current.id)
    }

    /// Append `kind` to the nearest container at or above `target`
    fn attach(&mut self, target: NodeId, kind: NodeKind) -> Result<NodeId> {
        let parent = self.nearest_container(target)?;
        let id = self.allocate(Some(parent), kind);
        if let Some(children) = self.nodes[parent].kind.children_mut() {
            children.push(id);
        }
        Ok(id)
    }

    pub fn add_sphere(&mut self, target: NodeId, sphere: Sphere) -> Result<NodeId> {
        self.attach(target, NodeKind::Sphere(sphere))
    }

    pub fn add_box(&mut self, target: NodeId, cuboid: Cuboid) -> Result<NodeId> {
        self.attach(target, NodeKind::Box(cuboid))
    }

    pub fn add_union(&mut self, target: NodeId) -> Result<NodeId> {
        self.attach(
            target,
            NodeKind::Union {
                children: Vec::new(),
            },
        )
    }

    pub fn add_intersection(&mut self, target: NodeId) -> Result<NodeId> {
        self.attach(
            target,
            NodeKind::Intersection {
                children: Vec::new(),
            },
        )
    }

    /// Add a placeholder reference to the subassembly called `name`
    pub fn add_instance(&mut self, target: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.attach(target, NodeKind::SubassemblyInstance { name: name.into() })
    }

    /// Add an element of `kind` with the given primitive defaults
    pub fn add_element(
        &mut self,
        target: NodeId,
        kind: ElementKind,
        sphere: Sphere,
        cuboid: Cuboid,
    ) -> Result<NodeId> {
        match kind {
            ElementKind::Sphere => self.add_sphere(target, sphere),
            ElementKind::Box => self.add_box(target, cuboid),
            ElementKind::Union => self.add_union(target),
            ElementKind::Intersection => self.add_intersection(target),
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    fn refuse(id: NodeId, reason: DeleteRefusal) -> SceneError {
        warn!(id, %reason, "delete refused");
        SceneError::DeleteRefused { id, reason }
    }

    /// Delete a node and compact the id range.
    ///
    /// Refused (scene unchanged) for node 0, for a container that still has
    /// children, and for the protected root subassembly. On success returns
    /// the node that should become active next: the parent if it is now
    /// empty, otherwise the parent's last child. Deleting a root selects the
    /// last remaining root.
    pub fn delete(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.lookup(id)?;

        if id == 0 {
            return Err(Self::refuse(id, DeleteRefusal::ProtectedRoot));
        }
        if node.is_container() && !node.children().is_empty() {
            return Err(Self::refuse(id, DeleteRefusal::NonEmptyContainer));
        }
        if node.parent.is_none()
            && let Some(protected) = &self.protected_root
            && node.name() == Some(protected.as_str())
        {
            return Err(Self::refuse(id, DeleteRefusal::EntryPoint));
        }

        let parent = node.parent;
        match parent {
            Some(p) => {
                if let Some(children) = self.nodes[p].kind.children_mut() {
                    children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        self.nodes.remove(id);
        for node in &mut self.nodes {
            shift_down(&mut node.id, id);
            if let Some(p) = node.parent.as_mut() {
                shift_down(p, id);
            }
            if let Some(children) = node.kind.children_mut() {
                for child in children {
                    shift_down(child, id);
                }
            }
        }
        for root in &mut self.roots {
            shift_down(root, id);
        }
        debug!(id, len = self.nodes.len(), "deleted node");

        let next = match parent {
            Some(mut p) => {
                shift_down(&mut p, id);
                self.nodes
                    .get(p)
                    .and_then(|n| n.children().last().copied())
                    .unwrap_or(p)
            }
            None => self.roots.last().copied().unwrap_or(0),
        };
        Ok(next)
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Set one scalar parameter of a primitive. Any real value is accepted.
    pub fn set_param(&mut self, id: NodeId, param: Param, value: f64) -> Result<()> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(SceneError::OutOfRange { id, len })?;
        let tag = node.kind.tag();
        let slot = node
            .kind
            .param_mut(param)
            .ok_or_else(|| SceneError::NoSuchParameter {
                kind: tag,
                param: param.to_string(),
            })?;
        *slot = value;
        debug!(id, %param, value, "parameter updated");
        Ok(())
    }

    /// Check the structural invariants: dense ids, mutual parent/child
    /// links, exclusive ownership and parentless roots.
    pub fn is_consistent(&self) -> bool {
        let mut owners = vec![0usize; self.nodes.len()];

        for (index, node) in self.nodes.iter().enumerate() {
            if node.id != index {
                return false;
            }
            if !node.is_container() && !node.children().is_empty() {
                return false;
            }
            for &child in node.children() {
                match self.nodes.get(child) {
                    Some(c) if c.parent == Some(index) => owners[child] += 1,
                    _ => return false,
                }
            }
        }

        for &root in &self.roots {
            match self.nodes.get(root) {
                Some(r) if r.parent.is_none() => owners[root] += 1,
                _ => return false,
            }
        }

        owners.iter().all(|&count| count == 1)
    }
}

fn shift_down(handle: &mut NodeId, removed: NodeId) {
    if *handle > removed {
        *handle -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_root() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let root = scene.add_subassembly("SDF").unwrap();
        (scene, root)
    }

    #[test]
    fn test_allocate_sequential_ids() {
        let (mut scene, root) = scene_with_root();
        let a = scene.add_sphere(root, Sphere::default()).unwrap();
        let b = scene.add_box(root, Cuboid::default()).unwrap();
        assert_eq!((root, a, b), (0, 1, 2));
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.lookup(0).unwrap().children(), &[1, 2]);
        assert!(scene.is_consistent());
    }

    #[test]
    fn test_lookup_out_of_range() {
        let (scene, _) = scene_with_root();
        assert_eq!(
            scene.lookup(5),
            Err(SceneError::OutOfRange { id: 5, len: 1 })
        );
    }

    #[test]
    fn test_add_under_leaf_uses_enclosing_container() {
        let (mut scene, root) = scene_with_root();
        let union = scene.add_union(root).unwrap();
        let sphere = scene.add_sphere(union, Sphere::default()).unwrap();
        let sibling = scene.add_box(sphere, Cuboid::default()).unwrap();

        assert_eq!(scene.lookup(sibling).unwrap().parent(), Some(union));
        assert_eq!(scene.lookup(union).unwrap().children(), &[sphere, sibling]);
        assert!(scene.lookup(sphere).unwrap().children().is_empty());
    }

    #[test]
    fn test_delete_refuses_node_zero() {
        let (mut scene, root) = scene_with_root();
        let before = scene.clone();
        let err = scene.delete(root).unwrap_err();
        assert_eq!(err.refusal(), Some(DeleteRefusal::ProtectedRoot));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_delete_refuses_non_empty_container() {
        let (mut scene, root) = scene_with_root();
        let union = scene.add_union(root).unwrap();
        scene.add_sphere(union, Sphere::default()).unwrap();
        let before = scene.clone();

        let err = scene.delete(union).unwrap_err();
        assert_eq!(err.refusal(), Some(DeleteRefusal::NonEmptyContainer));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_delete_renumbers_later_nodes() {
        let (mut scene, root) = scene_with_root();
        let union = scene.add_union(root).unwrap();
        let a = scene.add_sphere(union, Sphere::default()).unwrap();
        let b = scene.add_box(union, Cuboid::default()).unwrap();
        let c = scene.add_sphere(root, Sphere::default()).unwrap();

        let next = scene.delete(a).unwrap();

        assert_eq!(scene.len(), 4);
        assert!(scene.is_consistent());
        assert_eq!(scene.lookup(union).unwrap().children(), &[b - 1]);
        assert!(matches!(scene.lookup(b - 1).unwrap().kind(), NodeKind::Box(_)));
        assert!(matches!(
            scene.lookup(c - 1).unwrap().kind(),
            NodeKind::Sphere(_)
        ));
        assert_eq!(scene.lookup(0).unwrap().children(), &[union, c - 1]);
        // parent still has a child, so its last child becomes active
        assert_eq!(next, b - 1);
    }

    #[test]
    fn test_delete_last_child_selects_parent() {
        let (mut scene, root) = scene_with_root();
        let union = scene.add_union(root).unwrap();
        let a = scene.add_sphere(union, Sphere::default()).unwrap();
        assert_eq!(scene.delete(a).unwrap(), union);
        // the union is empty now and can go too
        assert_eq!(scene.delete(union).unwrap(), root);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_delete_empty_root() {
        let (mut scene, _) = scene_with_root();
        let extra = scene.add_subassembly("wheel").unwrap();
        assert_eq!(scene.delete(extra).unwrap(), 0);
        assert_eq!(scene.roots(), &[0]);
    }

    #[test]
    fn test_protected_root_name() {
        let mut scene = Scene::new().with_protected_root("SDF");
        scene.add_subassembly("first").unwrap();
        let sdf = scene.add_subassembly("SDF").unwrap();
        let err = scene.delete(sdf).unwrap_err();
        assert_eq!(err.refusal(), Some(DeleteRefusal::EntryPoint));
    }

    #[test]
    fn test_subassembly_names_validated() {
        let (mut scene, _) = scene_with_root();
        assert!(matches!(
            scene.add_subassembly("SDF"),
            Err(SceneError::InvalidName(_))
        ));
        assert!(matches!(
            scene.add_subassembly("not valid"),
            Err(SceneError::InvalidName(_))
        ));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_names_taken_by_the_shader_are_rejected() {
        let (mut scene, _) = scene_with_root();
        let taken = [
            "float",
            "return",
            "min",
            "length",
            "EPSILON",
            "MAX_ITERATIONS",
            "main",
            "surface_normal",
            "get_camera_ray",
            "min_dist_raymarch",
            "gl_Pos",
            "a__b",
        ];
        for name in taken {
            assert_eq!(
                scene.add_subassembly(name),
                Err(SceneError::InvalidName(name.to_string())),
                "{name}"
            );
        }
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.roots(), &[0]);
        assert!(scene.add_subassembly("wheel").is_ok());
    }

    #[test]
    fn test_set_param() {
        let (mut scene, root) = scene_with_root();
        let s = scene.add_sphere(root, Sphere::default()).unwrap();
        scene.set_param(s, Param::Radius, 2.5).unwrap();
        assert_eq!(
            scene.lookup(s).unwrap().kind(),
            &NodeKind::Sphere(Sphere {
                center: [0.0, 0.0, 4.0],
                radius: 2.5
            })
        );

        let err = scene.set_param(s, Param::Width, 1.0).unwrap_err();
        assert!(matches!(err, SceneError::NoSuchParameter { kind: "sphere", .. }));
        assert!(matches!(
            scene.set_param(root, Param::X, 1.0),
            Err(SceneError::NoSuchParameter { .. })
        ));
    }
}
