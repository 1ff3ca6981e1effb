//! Scene to GLSL distance-expression generator
//!
//! Every node compiles to a single side-effect-free expression in `p`.
//! Nothing is hoisted into temporaries, so the text of a subtree is the
//! same wherever it appears.

use carve_scene::{Cuboid, Node, NodeId, NodeKind, SENTINEL_DISTANCE, Scene, Sphere};

use crate::literal::float_literal;

/// Generate GLSL distance expressions for the nodes of a scene
pub struct GlslGenerator<'a> {
    scene: &'a Scene,
    sentinel: String,
}

impl<'a> GlslGenerator<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            sentinel: float_literal(SENTINEL_DISTANCE),
        }
    }

    /// Distance expression for node `id`; dead ids compile to the sentinel
    pub fn expression(&self, id: NodeId) -> String {
        match self.scene.get(id) {
            Some(node) => self.node_expr(node),
            None => self.sentinel.clone(),
        }
    }

    fn node_expr(&self, node: &Node) -> String {
        match node.kind() {
            NodeKind::Sphere(sphere) => sphere_expr(sphere),
            NodeKind::Box(cuboid) => box_expr(cuboid),
            NodeKind::Union { children } => self.fold("min", children),
            NodeKind::Intersection { children } => self.fold("max", children),
            // Instances carry no geometry, and a nested subassembly cannot
            // be built through the scene API
            NodeKind::SubassemblyInstance { .. } | NodeKind::Subassembly { .. } => {
                self.sentinel.clone()
            }
        }
    }

    /// `func(c0, func(c1, ... func(c_{k-2}, c_{k-1})...))`
    fn fold(&self, func: &str, children: &[NodeId]) -> String {
        let Some((last, init)) = children.split_last() else {
            return self.sentinel.clone();
        };

        let mut code = String::new();
        for &child in init {
            code.push_str(func);
            code.push('(');
            code.push_str(&self.expression(child));
            code.push_str(", ");
        }
        code.push_str(&self.expression(*last));
        code.push_str(&")".repeat(init.len()));
        code
    }

    /// The `float <name>(vec3 p)` function for a root subassembly.
    ///
    /// Direct children are always unioned onto the sentinel, in child order.
    pub fn subassembly_function(&self, root: &Node) -> String {
        let name = root.name().unwrap_or_default();
        let mut code = format!(
            "float {}(vec3 p) {{\n    float d = {};\n",
            name, self.sentinel
        );
        for &child in root.children() {
            code.push_str(&format!("    d = min(d, {});\n", self.expression(child)));
        }
        code.push_str("    return d;\n}\n");
        code
    }

    /// One function per root subassembly, in root order
    pub fn functions(&self) -> String {
        self.scene
            .roots()
            .iter()
            .filter_map(|&id| self.scene.get(id))
            .map(|root| self.subassembly_function(root))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `(length(p - c) - r)`
fn sphere_expr(sphere: &Sphere) -> String {
    let [x, y, z] = sphere.center.map(float_literal);
    format!(
        "(length(p - vec3({}, {}, {})) - {})",
        x,
        y,
        z,
        float_literal(sphere.radius)
    )
}

/// `length(max(q, 0)) + min(0, max(q.x, max(q.y, q.z)))` with
/// `q = abs(p - c) - size / 2`, written out per axis
fn box_expr(cuboid: &Cuboid) -> String {
    let half = cuboid.half_extents();
    let q: Vec<String> = ["x", "y", "z"]
        .iter()
        .enumerate()
        .map(|(axis, component)| {
            format!(
                "abs(p.{} - {}) - {}",
                component,
                float_literal(cuboid.center[axis]),
                float_literal(half[axis])
            )
        })
        .collect();

    format!(
        "(length(vec3(max({qx}, 0.0), max({qy}, 0.0), max({qz}, 0.0))) + min(0.0, max({qx}, max({qy}, {qz}))))",
        qx = q[0],
        qy = q[1],
        qz = q[2]
    )
}
