mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flare", about = "Lens flare quantification and synthesis tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute flare indices of a CSV sensor frame
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Synthesize flare test frames
    Generate(commands::generate::GenerateArgs),
    /// Evaluate every CSV frame in a directory
    Batch(commands::batch::BatchArgs),
    /// Explain the metrics and list typical pixel pitches
    Info(commands::info::InfoArgs),
    /// Print or save a default configuration file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Evaluate(args) => commands::evaluate::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
