// ddeps/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ValidateCommands};

fn init_tracing(verbose: u8) {
    // RUST_LOG=debug ddeps validate ... pour voir les détails
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stderr: stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        // --- USE CASE: VALIDATE DATA DEPENDENCIES ---
        Commands::Validate {
            target:
                ValidateCommands::DataDependencies {
                    file,
                    output,
                    recommended_formats,
                    config,
                },
        } => commands::validate::execute(file, output, recommended_formats, config),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
