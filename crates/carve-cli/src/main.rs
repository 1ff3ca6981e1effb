//! Carve CLI - Build CSG scenes and emit raymarching shaders

mod commands;
mod repl;
mod settings;

use anyhow::{Context, Result};
use carve_engine::{Engine, SourceBackend};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use commands::EditCommand;
use settings::Settings;

#[derive(Parser)]
#[command(name = "carve")]
#[command(about = "Constructive solid geometry compiled to GLSL", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply edits to the default scene and print the generated shader
    Shader {
        /// Edit to apply, in order (e.g. -e "add box" -e "set w 2")
        #[arg(short, long = "edit")]
        edits: Vec<String>,

        /// Write the shader to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the vertex shader instead of the fragment shader
        #[arg(long)]
        vertex: bool,
    },

    /// Apply edits to the default scene and print its outline
    Tree {
        /// Edit to apply, in order
        #[arg(short, long = "edit")]
        edits: Vec<String>,
    },

    /// Interactive scene editor
    Repl,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = settings::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Shader {
            edits,
            output,
            vertex,
        } => {
            run_shader(&settings, &edits, output.as_deref(), vertex)?;
        }
        Commands::Tree { edits } => {
            let engine = build_scene(&settings, &edits)?;
            print!("{}", engine.outline());
        }
        Commands::Repl => {
            repl::run_repl(&settings)?;
        }
    }

    Ok(())
}

/// Start from the default scene and apply `edits` in order
fn build_scene(settings: &Settings, edits: &[String]) -> Result<Engine> {
    let mut engine = Engine::with_backend(SourceBackend, settings.engine.clone());

    for (index, text) in edits.iter().enumerate() {
        let edit: EditCommand = text
            .parse()
            .with_context(|| format!("edit {} ('{}')", index + 1, text))?;
        let message = edit
            .apply(&mut engine)
            .with_context(|| format!("edit {} ('{}')", index + 1, text))?;
        tracing::debug!("{}", message);
    }

    Ok(engine)
}

fn run_shader(
    settings: &Settings,
    edits: &[String],
    output: Option<&Path>,
    vertex: bool,
) -> Result<()> {
    let mut engine = build_scene(settings, edits)?;
    let program = engine.recompile()?;
    let source = if vertex {
        &program.vertex
    } else {
        &program.fragment
    };

    match output {
        Some(path) => {
            fs::write(path, source)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", source),
    }

    Ok(())
}
