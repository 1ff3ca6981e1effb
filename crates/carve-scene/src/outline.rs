//! Pre-order outline of the scene, for menus and listings

use std::fmt;

use crate::node::NodeId;
use crate::scene::Scene;

/// Indentation drawn once per nesting level
const INDENT: &str = "|    ";

/// One row of the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: NodeId,
    /// 0 for root subassemblies
    pub depth: usize,
    pub tag: &'static str,
    pub is_container: bool,
    /// Root name for subassemblies, type tag otherwise
    pub label: String,
}

/// Every node reachable from the roots, depth-first in child order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub entries: Vec<OutlineEntry>,
}

impl Scene {
    /// Enumerate roots and all their descendants
    pub fn outline(&self) -> Outline {
        let mut entries = Vec::with_capacity(self.len());
        for &root in self.roots() {
            self.push_entries(root, 0, &mut entries);
        }
        Outline { entries }
    }

    fn push_entries(&self, id: NodeId, depth: usize, entries: &mut Vec<OutlineEntry>) {
        let Some(node) = self.get(id) else {
            return;
        };

        let label = match node.name() {
            Some(name) if depth == 0 => name.to_string(),
            _ => node.tag().to_string(),
        };
        entries.push(OutlineEntry {
            id,
            depth,
            tag: node.tag(),
            is_container: node.is_container(),
            label,
        });

        for &child in node.children() {
            self.push_entries(child, depth + 1, entries);
        }
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{:>3}  {}{}",
                entry.id,
                INDENT.repeat(entry.depth),
                entry.label
            )?;
        }
        Ok(())
    }
}
