use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;
use strata_editor::{demo_names, DemoKind, EditorConfig, EditorError, Session};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Headless driver for the Strata scene editor")]
struct Cli {
    /// JSON configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the saved worlds.
    List,
    /// Render a saved world and print the last frame as JSON.
    Render {
        world: String,
        /// Frames to run; the configured count when omitted.
        frames: Option<u32>,
    },
    /// Build a demo world and save it under a filename.
    Demo { name: String, out: String },
    /// Answer one JSON remote call and print the response.
    Call { json: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), EditorError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut session = Session::open(config)?;

    match cli.command {
        Command::List => {
            for entry in session.catalog.entries() {
                println!("{}\t{}", entry.label, entry.filename);
            }
        }
        Command::Render { world, frames } => {
            println!("{}", session.render_world(&world, frames)?);
        }
        Command::Demo { name, out } => {
            let kind = DemoKind::from_name(&name).ok_or_else(|| {
                log::info!("available demos: {}", demo_names().join(", "));
                EditorError::UnknownDemo(name.clone())
            })?;
            session.load_demo(kind);
            session.save_world(&out)?;
            println!("saved demo '{}' as {}", kind.name(), out);
        }
        Command::Call { json } => {
            println!("{}", session.call(&json));
        }
    }
    Ok(())
}
