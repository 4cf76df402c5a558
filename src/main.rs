//! Trellis CLI
//!
//! Usage:
//!   trellis [OPTIONS] <COMMAND> [SCENE]
//!
//! Commands:
//!   check   Report constraint cycles in a scene
//!   render  Render a scene to SVG
//!   audit   Report reads a constraint performs without declaring them
//!
//! The scene is read from stdin when no file is given.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trellis::render::svg::render_window;
use trellis::resolution::{audit_dependencies, describe_cycles, ConstraintResolver, ConstraintResolverV2};
use trellis::{Scene, SvgConfig, Window};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Inspect and render constraint-driven component scenes")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report constraint cycles
    Check {
        /// Scene file (reads from stdin if not provided)
        scene: Option<PathBuf>,

        /// Trace a real evaluation instead of walking declared dependencies
        #[arg(short, long)]
        dynamic: bool,
    },

    /// Render the scene to SVG
    Render {
        /// Scene file (reads from stdin if not provided)
        scene: Option<PathBuf>,

        /// Animation frames to advance before drawing
        #[arg(short, long, default_value_t = 0)]
        ticks: u32,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Padding around the viewBox
        #[arg(long, default_value_t = 0.0)]
        padding: f32,
    },

    /// Report undeclared dependencies
    Audit {
        /// Scene file (reads from stdin if not provided)
        scene: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { scene, dynamic } => {
            let window = load(scene.as_deref());
            let cycles = if dynamic {
                ConstraintResolverV2::new(&window).cycles()
            } else {
                match ConstraintResolver::new(&window) {
                    Ok(resolver) => resolver.cyclic_nodes().into_iter().collect(),
                    Err(e) => fail(&format!("Error building dependency graph: {}", e)),
                }
            };
            println!("{}", describe_cycles(&window, &cycles));
            if !cycles.is_empty() {
                process::exit(1);
            }
        }
        Command::Render {
            scene,
            ticks,
            output,
            padding,
        } => {
            let mut window = load(scene.as_deref());
            for _ in 0..ticks {
                window.animation_frame();
            }
            let config = SvgConfig::default().with_viewbox_padding(padding);
            let svg = render_window(&window, &config);
            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, svg) {
                        fail(&format!("Error writing '{}': {}", path.display(), e));
                    }
                    info!(path = %path.display(), ticks, "wrote svg");
                }
                None => print!("{}", svg),
            }
        }
        Command::Audit { scene } => {
            let window = load(scene.as_deref());
            let missing = audit_dependencies(&window);
            if missing.is_empty() {
                println!("all reads are declared");
                return;
            }
            for dependency in &missing {
                println!("{}", dependency.describe(&window));
            }
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "trellis=debug",
        _ => "trellis=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(path: Option<&Path>) -> Window {
    let scene = match path {
        Some(path) => Scene::from_file(path),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                fail(&format!("Error reading from stdin: {}", e));
            }
            Scene::from_str(&buffer)
        }
    };
    match scene.and_then(|scene| scene.build()) {
        Ok(window) => window,
        Err(e) => fail(&e.report()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}
