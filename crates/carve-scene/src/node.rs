//! Scene node types
//!
//! A node is one element of the CSG scene: a primitive shape, a boolean
//! combinator or a named subassembly. Nodes never own each other directly;
//! containers hold the [`NodeId`]s of their children and every node keeps a
//! non-owning handle to its parent. The [`Scene`](crate::Scene) owns all of
//! them in a single dense arena.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Dense node identifier, doubling as the node's slot in the scene arena
pub type NodeId = usize;

/// Sphere primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: [f64; 3],
    pub radius: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 4.0],
            radius: 1.0,
        }
    }
}

/// Axis-aligned box primitive
///
/// `size` holds the full extents (width, height, depth), not half-extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub center: [f64; 3],
    pub size: [f64; 3],
}

impl Cuboid {
    pub fn half_extents(&self) -> [f64; 3] {
        self.size.map(|s| s / 2.0)
    }
}

impl Default for Cuboid {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 4.0],
            size: [1.0, 1.0, 1.0],
        }
    }
}

/// The variant-specific part of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Named group of nodes; compiled to a function of the same name
    Subassembly { name: String, children: Vec<NodeId> },
    /// Reference to a subassembly by name (carries no geometry yet)
    SubassemblyInstance { name: String },
    Sphere(Sphere),
    Box(Cuboid),
    Union { children: Vec<NodeId> },
    Intersection { children: Vec<NodeId> },
}

impl NodeKind {
    /// Whether this variant owns children
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Subassembly { .. } | Self::Union { .. } | Self::Intersection { .. }
        )
    }

    /// Short lowercase type tag, as shown in outlines
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Subassembly { .. } => "subassembly",
            Self::SubassemblyInstance { .. } => "subassembly_instance",
            Self::Sphere(_) => "sphere",
            Self::Box(_) => "box",
            Self::Union { .. } => "union",
            Self::Intersection { .. } => "intersection",
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            Self::Subassembly { children, .. }
            | Self::Union { children }
            | Self::Intersection { children } => children,
            Self::SubassemblyInstance { .. } | Self::Sphere(_) | Self::Box(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Self::Subassembly { children, .. }
            | Self::Union { children }
            | Self::Intersection { children } => Some(children),
            Self::SubassemblyInstance { .. } | Self::Sphere(_) | Self::Box(_) => None,
        }
    }
}

/// A live scene node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning container; `None` only for root subassemblies
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn children(&self) -> &[NodeId] {
        self.kind.children()
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Subassembly or instance name
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Subassembly { name, .. } | NodeKind::SubassemblyInstance { name } => {
                Some(name)
            }
            _ => None,
        }
    }
}

/// Element kinds the editor can add under a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Sphere,
    Box,
    Union,
    Intersection,
}

impl FromStr for ElementKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sphere" => Ok(Self::Sphere),
            "box" => Ok(Self::Box),
            "union" => Ok(Self::Union),
            "intersection" => Ok(Self::Intersection),
            _ => Err(SceneError::UnknownElement(s.to_string())),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Union => "union",
            Self::Intersection => "intersection",
        };
        f.write_str(name)
    }
}

/// Editable scalar parameter of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    X,
    Y,
    Z,
    /// Sphere radius
    Radius,
    /// Box width (x extent)
    Width,
    /// Box height (y extent)
    Height,
    /// Box depth (z extent)
    Depth,
}

impl FromStr for Param {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            "r" | "radius" => Ok(Self::Radius),
            "w" | "width" => Ok(Self::Width),
            "h" | "height" => Ok(Self::Height),
            "d" | "depth" => Ok(Self::Depth),
            _ => Err(SceneError::NoSuchParameter {
                kind: "shape",
                param: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Radius => "r",
            Self::Width => "w",
            Self::Height => "h",
            Self::Depth => "d",
        };
        f.write_str(name)
    }
}

impl NodeKind {
    /// Mutable handle to a scalar parameter, if this variant has it
    pub(crate) fn param_mut(&mut self, param: Param) -> Option<&mut f64> {
        match (self, param) {
            (Self::Sphere(s), Param::X) => Some(&mut s.center[0]),
            (Self::Sphere(s), Param::Y) => Some(&mut s.center[1]),
            (Self::Sphere(s), Param::Z) => Some(&mut s.center[2]),
            (Self::Sphere(s), Param::Radius) => Some(&mut s.radius),
            (Self::Box(b), Param::X) => Some(&mut b.center[0]),
            (Self::Box(b), Param::Y) => Some(&mut b.center[1]),
            (Self::Box(b), Param::Z) => Some(&mut b.center[2]),
            (Self::Box(b), Param::Width) => Some(&mut b.size[0]),
            (Self::Box(b), Param::Height) => Some(&mut b.size[1]),
            (Self::Box(b), Param::Depth) => Some(&mut b.size[2]),
            _ => None,
        }
    }
}

/// Whether `name` can be used as a shader function identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// GLSL ES 1.00 keywords, including those reserved for future use
const GLSL_KEYWORDS: &[&str] = &[
    "attribute", "const", "uniform", "varying", "break", "continue", "do", "for", "while",
    "if", "else", "in", "out", "inout", "float", "int", "void", "bool", "true", "false",
    "lowp", "mediump", "highp", "precision", "invariant", "discard", "return", "mat2",
    "mat3", "mat4", "vec2", "vec3", "vec4", "ivec2", "ivec3", "ivec4", "bvec2", "bvec3",
    "bvec4", "sampler2D", "samplerCube", "struct", "asm", "class", "union", "enum",
    "typedef", "template", "this", "packed", "goto", "switch", "default", "inline",
    "noinline", "volatile", "public", "static", "extern", "external", "interface", "flat",
    "long", "short", "double", "half", "fixed", "unsigned", "superp", "input", "output",
    "hvec2", "hvec3", "hvec4", "dvec2", "dvec3", "dvec4", "fvec2", "fvec3", "fvec4",
    "sampler1D", "sampler3D", "sampler1DShadow", "sampler2DShadow", "sampler2DRect",
    "sampler3DRect", "sampler2DRectShadow", "sizeof", "cast", "namespace", "using",
];

/// GLSL ES 1.00 built-in functions, which user code may not redefine
const GLSL_BUILTINS: &[&str] = &[
    "radians", "degrees", "sin", "cos", "tan", "asin", "acos", "atan", "pow", "exp", "log",
    "exp2", "log2", "sqrt", "inversesqrt", "abs", "sign", "floor", "ceil", "fract", "mod",
    "min", "max", "clamp", "mix", "step", "smoothstep", "length", "distance", "dot",
    "cross", "normalize", "faceforward", "reflect", "refract", "matrixCompMult",
    "lessThan", "lessThanEqual", "greaterThan", "greaterThanEqual", "equal", "notEqual",
    "any", "all", "not", "texture2D", "texture2DProj", "texture2DLod", "texture2DProjLod",
    "textureCube", "textureCubeLod",
];

/// Globals, macros and functions defined by the raymarching template
pub const TEMPLATE_NAMES: &[&str] = &[
    "MAX_ITERATIONS",
    "EPSILON",
    "uv",
    "resolution",
    "get_camera_ray",
    "min_dist_raymarch",
    "surface_normal",
    "main",
];

/// Whether `name` is already taken in the generated shader: a keyword, a
/// built-in, a template definition, or one of the reserved `gl_` and `__`
/// forms.
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with("gl_")
        || name.contains("__")
        || GLSL_KEYWORDS.contains(&name)
        || GLSL_BUILTINS.contains(&name)
        || TEMPLATE_NAMES.contains(&name)
}
