// ddeps/src/commands/validate.rs
//
// USE CASE: Validate a data_dependencies.yml file.

use std::path::PathBuf;

use anyhow::Context;
use ddeps_core::application::validate_file;
use ddeps_core::infrastructure::config::{OutputFormat, load_validator_config};
use tracing::debug;

/// Renders a core error with its miette code and help.
fn diagnostic(err: impl miette::Diagnostic + Send + Sync + 'static) -> anyhow::Error {
    anyhow::anyhow!("{:?}", miette::Report::new(err))
}

pub fn execute(
    file: PathBuf,
    output: Option<OutputFormat>,
    recommended_formats: Option<Vec<String>>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    // A. Config layering: file + ENV (core), then CLI flags
    let cwd = std::env::current_dir().context("Failed to resolve the working directory")?;
    let mut config = load_validator_config(&cwd, config_path.as_deref()).map_err(diagnostic)?;

    if let Some(formats) = recommended_formats {
        config.recommended_formats = Some(formats);
    }
    if let Some(output) = output {
        config.output = output;
    }
    debug!(?config, "Effective validator config");

    let options = config.to_rule_options().map_err(diagnostic)?;

    // B. Run the validation (Application Layer)
    if config.output == OutputFormat::Text {
        println!("Validating data dependencies file: {}", file.display());
    }
    let report = validate_file(&file, &options).map_err(diagnostic)?;

    // C. Output Report
    match config.output {
        OutputFormat::Text => println!("{}", report.summary()),
        OutputFormat::Json => {
            let json = report
                .to_json()
                .context("Failed to serialize the report as JSON")?;
            println!("{}", json);
        }
    }

    if !report.is_valid() {
        // Exit with error code for CI/CD
        std::process::exit(1);
    }

    Ok(())
}
