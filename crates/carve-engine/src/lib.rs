//! Carve Engine - Editing session for CSG scenes
//!
//! The Engine is a thin orchestration layer over carve-scene and carve-glsl.
//! It owns the scene, tracks the active node the way an editor UI does, and
//! recompiles the whole scene into shader source on request.
//!
//! ## Example
//!
//! ```rust
//! use carve_engine::{ElementKind, Engine, Param};
//!
//! let mut engine = Engine::new();
//!
//! // The session starts with a root "SDF" holding one sphere
//! let cuboid = engine.add_element(ElementKind::Box)?;
//! engine.set_param(Param::Width, 2.0)?;
//! engine.recompile()?;
//!
//! engine.delete_element(cuboid)?;
//! engine.recompile()?;
//! # Ok::<(), carve_engine::EngineError>(())
//! ```

pub mod backend;
pub mod config;

mod error;

use carve_glsl::{ENTRY_POINT, ShaderSource, build_shader, find_entry_point};
use carve_scene::{DVec3, Node, NodeId, Scene};
use tracing::{debug, info, warn};

// Re-export commonly used types from dependencies
pub use carve_scene::{ElementKind, Outline, Param, SceneError};

// Re-export our own types
pub use backend::{ShaderBackend, SourceBackend};
pub use config::EngineConfig;
pub use error::{EngineError, Result};

/// The Carve editing session
///
/// Provides:
/// - The scene graph and the currently active node
/// - Structural and parameter edits
/// - Full recompilation through a [`ShaderBackend`]
pub struct Engine<B: ShaderBackend = SourceBackend> {
    scene: Scene,
    active: NodeId,
    config: EngineConfig,
    backend: B,

    /// Last program the backend accepted
    program: Option<B::Program>,

    /// Number of successful recompiles
    generation: u64,
}

impl Engine<SourceBackend> {
    /// Create a session with the default configuration and no GPU backend
    pub fn new() -> Self {
        Self::with_backend(SourceBackend, EngineConfig::default())
    }
}

impl Default for Engine<SourceBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ShaderBackend> Engine<B> {
    /// Create a session holding the initial scene: a root subassembly
    /// named after the entry point with the default sphere in it.
    pub fn with_backend(backend: B, config: EngineConfig) -> Self {
        let mut scene = Scene::new();
        if config.protect_entry_point {
            scene = scene.with_protected_root(ENTRY_POINT);
        }

        // Neither edit can fail: the scene is empty and the entry point is a
        // valid, unreserved root name.
        let root = scene.add_subassembly(ENTRY_POINT).unwrap_or_default();
        let _ = scene.add_sphere(root, config.default_sphere);

        Self {
            scene,
            active: root,
            config,
            backend,
            program: None,
            generation: 0,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id of the active node
    pub fn active(&self) -> NodeId {
        self.active
    }

    pub fn active_node(&self) -> Result<&Node> {
        Ok(self.scene.lookup(self.active)?)
    }

    /// Look up any live node
    pub fn lookup(&self, id: NodeId) -> Result<&Node> {
        Ok(self.scene.lookup(id)?)
    }

    /// Roots and all descendants, for menus
    pub fn outline(&self) -> Outline {
        self.scene.outline()
    }

    /// Distance from `p` to the entry point subassembly, evaluated on the CPU
    pub fn probe(&self, p: DVec3) -> Result<f64> {
        let root = find_entry_point(&self.scene)?;
        Ok(self.scene.distance(root, p))
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Make `id` the active node
    pub fn select(&mut self, id: NodeId) -> Result<&Node> {
        let node = self.scene.lookup(id)?;
        self.active = id;
        debug!(id, tag = node.tag(), "selected node");
        Ok(node)
    }

    /// Add an element next to the active node and make it active.
    ///
    /// The element lands in the active node if it is a container, otherwise
    /// in the active node's nearest enclosing container.
    pub fn add_element(&mut self, kind: ElementKind) -> Result<NodeId> {
        let id = self.scene.add_element(
            self.active,
            kind,
            self.config.default_sphere,
            self.config.default_box,
        )?;
        debug!(id, %kind, "added element");
        self.active = id;
        Ok(id)
    }

    /// Add a new root subassembly and make it active
    pub fn add_subassembly(&mut self, name: &str) -> Result<NodeId> {
        let id = self.scene.add_subassembly(name)?;
        debug!(id, name, "added subassembly");
        self.active = id;
        Ok(id)
    }

    /// Add an instance of the subassembly `name` and make it active
    pub fn add_instance(&mut self, name: &str) -> Result<NodeId> {
        let id = self.scene.add_instance(self.active, name)?;
        debug!(id, name, "added subassembly instance");
        self.active = id;
        Ok(id)
    }

    /// Delete `id` and move the selection as the scene dictates.
    ///
    /// On refusal nothing changes, including the active node.
    pub fn delete_element(&mut self, id: NodeId) -> Result<NodeId> {
        let next = self.scene.delete(id)?;
        self.active = next;
        Ok(next)
    }

    /// Delete the active node
    pub fn delete_active(&mut self) -> Result<NodeId> {
        self.delete_element(self.active)
    }

    /// Set a parameter of the active node
    pub fn set_param(&mut self, param: Param, value: f64) -> Result<()> {
        Ok(self.scene.set_param(self.active, param, value)?)
    }

    // ========================================================================
    // Compilation
    // ========================================================================

    /// Assemble shader source for the current scene without linking it
    pub fn shader_source(&self) -> ShaderSource {
        build_shader(&self.scene)
    }

    /// Regenerate the full shader and hand it to the backend.
    ///
    /// On failure the previous program, if any, remains current.
    pub fn recompile(&mut self) -> Result<&B::Program> {
        find_entry_point(&self.scene)?;
        let source = build_shader(&self.scene);

        match self.backend.link(&source.vertex, &source.fragment) {
            Ok(program) => {
                self.generation += 1;
                info!(
                    generation = self.generation,
                    nodes = self.scene.len(),
                    "recompiled shader"
                );
                Ok(&*self.program.insert(program))
            }
            Err(log) => {
                warn!(%log, "shader backend rejected generated source");
                Err(EngineError::GeneratedSourceInvalid(log))
            }
        }
    }

    /// Program currently in effect
    pub fn program(&self) -> Option<&B::Program> {
        self.program.as_ref()
    }

    /// Number of successful recompiles so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
