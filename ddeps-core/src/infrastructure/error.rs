// ddeps-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

fn at(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("Cannot read '{path}': {source}")]
    #[diagnostic(
        code(ddeps::infra::file_access),
        help("Check that the path exists, is a regular file and is readable.")
    )]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // --- DOCUMENT ---
    #[error("{message}")]
    #[diagnostic(
        code(ddeps::infra::parse),
        help("Check your YAML syntax (indentation, brackets, quoting).")
    )]
    Parse {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("Duplicate key '{key}' found{}", at(.line, .column))]
    #[diagnostic(
        code(ddeps::infra::duplicate_key),
        help("Each key may appear only once inside the same mapping.")
    )]
    DuplicateKey {
        key: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    // --- CONFIG ---
    #[error("Configuration Error: {0}")]
    #[diagnostic(
        code(ddeps::infra::config),
        help("Allowed keys: recommended_formats (list of formats), output (text | json).")
    )]
    ConfigError(String),

    #[error("Configuration file not found at '{0}'")]
    #[diagnostic(code(ddeps::infra::config_missing))]
    ConfigNotFound(String),
}
