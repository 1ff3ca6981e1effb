//! Session configuration

use carve_scene::{Cuboid, Sphere};
use serde::{Deserialize, Serialize};

/// Settings that shape a new editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sphere used by `add_element(Sphere)` and the initial scene
    pub default_sphere: Sphere,
    /// Box used by `add_element(Box)`
    pub default_box: Cuboid,
    /// Refuse to delete the root subassembly the shader template calls
    pub protect_entry_point: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_sphere: Sphere::default(),
            default_box: Cuboid::default(),
            protect_entry_point: true,
        }
    }
}
