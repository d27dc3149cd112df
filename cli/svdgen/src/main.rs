//! svdgen CLI: generate CMSIS-SVD device descriptions from register maps.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::{InputArgs, Project};

#[derive(Parser)]
#[command(name = "svdgen", version, about = "Register map to SVD generator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an SVD document
    Generate {
        #[command(flatten)]
        input: InputSources,
        /// Device version (default: 1.0)
        #[arg(long)]
        device_version: Option<String>,
        /// Device description (default: "<name> device")
        #[arg(long)]
        description: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip structural validation of the generated document
        #[arg(long)]
        no_verify: bool,
    },
    /// Convert and validate without writing, then print a summary
    Check {
        #[command(flatten)]
        input: InputSources,
    },
}

#[derive(Args)]
struct InputSources {
    /// Top-level configuration JSON
    #[arg(long)]
    top: Option<PathBuf>,
    /// Directory of block definition JSON files (repeatable)
    #[arg(long = "ip-dir")]
    ip_dirs: Vec<PathBuf>,
    /// Single block definition JSON file (repeatable)
    #[arg(long = "ip")]
    ip_files: Vec<PathBuf>,
}

impl From<InputSources> for InputArgs {
    fn from(sources: InputSources) -> Self {
        InputArgs {
            top: sources.top,
            ip_dirs: sources.ip_dirs,
            ip_files: sources.ip_files,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Global level from `-v`; `RUST_LOG` adds per-target directives.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let project = Project::discover(&cwd)?;

    match cli.command {
        Commands::Generate {
            input,
            device_version,
            description,
            output,
            no_verify,
        } => commands::generate::run(
            &project,
            &input.into(),
            device_version.as_deref(),
            description.as_deref(),
            output.as_deref(),
            no_verify,
        ),
        Commands::Check { input } => commands::check::run(&project, &input.into()),
    }
}
