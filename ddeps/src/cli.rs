// ddeps/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use ddeps_core::infrastructure::config::OutputFormat;

#[derive(Parser)]
#[command(name = "ddeps")]
#[command(about = "Validator for data_dependencies.yml descriptions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔎 Validates a description file
    Validate {
        #[command(subcommand)]
        target: ValidateCommands,
    },
}

#[derive(Subcommand)]
pub enum ValidateCommands {
    /// Checks a data_dependencies.yml file (schema + rules)
    DataDependencies {
        /// Path to the data_dependencies.yml file
        file: PathBuf,

        /// Report format: text | json
        #[arg(long)]
        output: Option<OutputFormat>,

        /// Comma-separated formats that do not draw a warning (ex: "table,dictionary")
        #[arg(long, value_delimiter = ',')]
        recommended_formats: Option<Vec<String>>,

        /// Validator config file (default: ./ddeps.yaml or ./.ddeps.yaml)
        #[arg(long, env = "DDEPS_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_validate_defaults() -> Result<()> {
        let args = Cli::try_parse_from(["ddeps", "validate", "data-dependencies", "deps.yml"])?;
        assert_eq!(args.verbose, 0);
        match args.command {
            Commands::Validate {
                target:
                    ValidateCommands::DataDependencies {
                        file,
                        output,
                        recommended_formats,
                        ..
                    },
            } => {
                assert_eq!(file.to_string_lossy(), "deps.yml");
                assert_eq!(output, None);
                assert_eq!(recommended_formats, None);
                Ok(())
            }
        }
    }

    #[test]
    fn test_cli_parse_validate_options() -> Result<()> {
        let args = Cli::try_parse_from([
            "ddeps",
            "validate",
            "data-dependencies",
            "deps.yml",
            "--output",
            "json",
            "--recommended-formats",
            "table,dictionary",
            "-vv",
        ])?;
        assert_eq!(args.verbose, 2);
        let Commands::Validate {
            target:
                ValidateCommands::DataDependencies {
                    output,
                    recommended_formats,
                    ..
                },
        } = args.command;
        assert_eq!(output, Some(OutputFormat::Json));
        assert_eq!(
            recommended_formats,
            Some(vec!["table".to_string(), "dictionary".to_string()])
        );
        Ok(())
    }

    #[test]
    fn test_cli_rejects_unknown_output() -> Result<()> {
        match Cli::try_parse_from([
            "ddeps",
            "validate",
            "data-dependencies",
            "deps.yml",
            "--output",
            "xml",
        ]) {
            Ok(_) => bail!("Expected a parse error"),
            Err(_) => Ok(()),
        }
    }

    #[test]
    fn test_cli_requires_file() {
        assert!(Cli::try_parse_from(["ddeps", "validate", "data-dependencies"]).is_err());
    }
}
