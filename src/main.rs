//! figma-organizer CLI entry point.

use clap::Parser;
use figma_organizer::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    cli::init_logging(cli.log_level.as_deref().unwrap_or(default_level));

    let result = match &cli.command {
        Commands::Analyze(args) => cli::run_analyze(args),
        Commands::Serve(args) => cli::run_serve(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
