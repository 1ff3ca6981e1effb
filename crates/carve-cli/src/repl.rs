//! Interactive editing session
//!
//! Every successful edit is followed by a full recompile, the same way an
//! editor UI would refresh its preview.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use carve_engine::{Engine, EngineError, SourceBackend};
use carve_scene::{DVec3, NodeKind};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode, Editor};

use crate::commands::EditCommand;
use crate::settings::Settings;

/// REPL state
pub struct Repl {
    engine: Engine,
    editor: Editor<(), DefaultHistory>,
    history_path: Option<PathBuf>,
}

/// Result of handling a line
enum CommandResult {
    Continue,
    Exit,
    Error(String),
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(settings: &Settings) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;

        let history_path = if settings.save_history {
            history_file()
        } else {
            None
        };
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }

        let mut engine = Engine::with_backend(SourceBackend, settings.engine.clone());
        engine.recompile()?;

        Ok(Self {
            engine,
            editor,
            history_path,
        })
    }

    /// Run the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", WELCOME_MESSAGE);
        print!("{}", self.engine.outline());

        loop {
            let prompt = format!("carve #{}> ", self.engine.active());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(trimmed);

                    match self.handle_line(trimmed) {
                        CommandResult::Continue => {}
                        CommandResult::Exit => break,
                        CommandResult::Error(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use quit or Ctrl+D to exit");
                }
                Err(ReadlineError::Eof) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            if let Some(dir) = path.parent() {
                let _ = fs::create_dir_all(dir);
            }
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> CommandResult {
        let line = line.strip_prefix(':').unwrap_or(line);
        let parts: Vec<&str> = line.splitn(2, ' ').collect();
        let command = parts[0];
        let args = parts.get(1).map(|s| s.trim());

        match command {
            "help" | "h" | "?" => {
                println!("{}", HELP_MESSAGE);
                CommandResult::Continue
            }
            "quit" | "q" | "exit" => CommandResult::Exit,
            "tree" | "t" => {
                print!("{}", self.engine.outline());
                CommandResult::Continue
            }
            "show" => self.show_active(),
            "shader" => {
                println!("{}", self.engine.shader_source().fragment);
                CommandResult::Continue
            }
            "vertex" => {
                println!("{}", self.engine.shader_source().vertex);
                CommandResult::Continue
            }
            "write" => match args {
                Some(path) => self.write_shader(path),
                None => {
                    println!("Usage: write <file>");
                    CommandResult::Continue
                }
            },
            "probe" => match args.map(parse_point) {
                Some(Ok(p)) => self.probe(p),
                Some(Err(e)) => CommandResult::Error(format!("{:#}", e)),
                None => {
                    println!("Usage: probe <x> <y> <z>");
                    CommandResult::Continue
                }
            },
            _ => match line.parse::<EditCommand>() {
                Ok(edit) => self.edit(&edit),
                Err(e) => CommandResult::Error(e.to_string()),
            },
        }
    }

    /// Apply an edit, then recompile
    fn edit(&mut self, edit: &EditCommand) -> CommandResult {
        let message = match edit.apply(&mut self.engine) {
            Ok(message) => message,
            Err(e) => return CommandResult::Error(e.to_string()),
        };
        println!("{}", message);

        match self.engine.recompile() {
            Ok(_) => CommandResult::Continue,
            Err(EngineError::GeneratedSourceInvalid(log)) => CommandResult::Error(format!(
                "shader rejected, keeping previous program:\n{}",
                log
            )),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn show_active(&self) -> CommandResult {
        let node = match self.engine.active_node() {
            Ok(node) => node,
            Err(e) => return CommandResult::Error(e.to_string()),
        };

        match node.kind() {
            NodeKind::Sphere(s) => println!(
                "#{} sphere  x={} y={} z={} r={}",
                node.id(),
                s.center[0],
                s.center[1],
                s.center[2],
                s.radius
            ),
            NodeKind::Box(b) => println!(
                "#{} box  x={} y={} z={} w={} h={} d={}",
                node.id(),
                b.center[0],
                b.center[1],
                b.center[2],
                b.size[0],
                b.size[1],
                b.size[2]
            ),
            NodeKind::Subassembly { name, children } => {
                println!("#{} subassembly {} ({} children)", node.id(), name, children.len());
            }
            NodeKind::SubassemblyInstance { name } => {
                println!("#{} instance of {}", node.id(), name);
            }
            NodeKind::Union { children } | NodeKind::Intersection { children } => {
                println!("#{} {} ({} children)", node.id(), node.tag(), children.len());
            }
        }
        CommandResult::Continue
    }

    fn write_shader(&self, path: &str) -> CommandResult {
        match fs::write(path, self.engine.shader_source().fragment) {
            Ok(()) => {
                println!("Wrote fragment shader to {}", path);
                CommandResult::Continue
            }
            Err(e) => CommandResult::Error(format!("Failed to write {}: {}", path, e)),
        }
    }

    fn probe(&self, p: DVec3) -> CommandResult {
        match self.engine.probe(p) {
            Ok(d) => {
                println!("SDF({}, {}, {}) = {}", p.x, p.y, p.z, d);
                CommandResult::Continue
            }
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }
}

fn parse_point(args: &str) -> Result<DVec3> {
    let coords = args
        .split_whitespace()
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("'{}' is not a number", s))
        })
        .collect::<Result<Vec<_>>>()?;
    let [x, y, z] = coords.as_slice() else {
        bail!("expected three coordinates");
    };
    Ok(DVec3::new(*x, *y, *z))
}

/// Get the history file path
fn history_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("carve").join("repl_history"))
}

const WELCOME_MESSAGE: &str = r#"
Carve interactive scene editor
Type help for commands. The prompt shows the active node.
"#;

const HELP_MESSAGE: &str = r#"
Edits (each one recompiles the shader):
  add <sphere|box|union|intersection>
                      - Add an element in the active container
                        (or next to the active leaf)
  sub <name>          - Add a root subassembly
  instance <name>     - Add an instance of a subassembly
  delete [id]         - Delete a node (default: the active node)
  select <id>         - Make a node active
  set <param> <value> - Set x, y, z, r (sphere) or x, y, z, w, h, d (box)

Queries:
  tree, t             - Show the scene outline
  show                - Show the active node's parameters
  shader              - Print the fragment shader
  vertex              - Print the vertex shader
  write <file>        - Write the fragment shader to a file
  probe <x> <y> <z>   - Evaluate SDF at a point on the CPU

  help, h, ?          - Show this help message
  quit, q, exit       - Exit
"#;

/// Entry point for the REPL command
pub fn run_repl(settings: &Settings) -> Result<()> {
    let mut repl = Repl::new(settings)?;
    repl.run()
}
