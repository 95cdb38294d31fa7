// ddeps-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unknown data format '{0}'")]
    #[diagnostic(
        code(ddeps::domain::format),
        help("Allowed values are: binary, dictionary, document, list, single, table.")
    )]
    UnknownFormat(String),

    #[error("Invalid validator configuration: {0}")]
    #[diagnostic(code(ddeps::domain::config))]
    InvalidConfig(String),
}
