//! Edit commands shared by `carve shader -e` and the REPL

use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use carve_engine::{ElementKind, Engine, Param};
use carve_scene::NodeId;

/// One structural or parameter edit
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Add an element next to the active node
    Add(ElementKind),
    /// Add a root subassembly
    Subassembly(String),
    /// Add a subassembly instance next to the active node
    Instance(String),
    /// Delete a node, or the active node when no id is given
    Delete(Option<NodeId>),
    Select(NodeId),
    /// Set a parameter of the active node
    Set(Param, f64),
}

impl FromStr for EditCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let command = words.next().ok_or_else(|| anyhow!("empty edit command"))?;
        let args: Vec<&str> = words.collect();

        let edit = match (command, args.as_slice()) {
            ("add", [kind]) => Self::Add(kind.parse()?),
            ("sub", [name]) => Self::Subassembly((*name).to_string()),
            ("instance", [name]) => Self::Instance((*name).to_string()),
            ("delete", []) => Self::Delete(None),
            ("delete", [id]) => Self::Delete(Some(parse_id(id)?)),
            ("select", [id]) => Self::Select(parse_id(id)?),
            ("set", [param, value]) => {
                let value = value
                    .parse()
                    .with_context(|| format!("'{}' is not a number", value))?;
                Self::Set(param.parse()?, value)
            }
            _ => bail!("Unrecognised edit '{}'. Type help for usage.", s.trim()),
        };
        Ok(edit)
    }
}

fn parse_id(text: &str) -> Result<NodeId> {
    text.parse()
        .with_context(|| format!("'{}' is not a node id", text))
}

impl EditCommand {
    /// Apply the edit and describe what happened
    pub fn apply(&self, engine: &mut Engine) -> Result<String> {
        let message = match self {
            Self::Add(kind) => {
                let id = engine.add_element(*kind)?;
                format!("added {} #{}", kind, id)
            }
            Self::Subassembly(name) => {
                let id = engine.add_subassembly(name)?;
                format!("added subassembly {} #{}", name, id)
            }
            Self::Instance(name) => {
                let id = engine.add_instance(name)?;
                format!("added instance of {} #{}", name, id)
            }
            Self::Delete(target) => {
                let target = target.unwrap_or(engine.active());
                let next = engine.delete_element(target)?;
                format!("deleted #{}, selected #{}", target, next)
            }
            Self::Select(id) => {
                let node = engine.select(*id)?;
                format!("selected {} #{}", node.tag(), id)
            }
            Self::Set(param, value) => {
                engine.set_param(*param, *value)?;
                format!("set {} = {}", param, value)
            }
        };
        Ok(message)
    }
}
