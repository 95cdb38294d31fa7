// ddeps-core/src/domain/mod.rs

pub mod document;
pub mod error;
pub mod node;
pub mod report;
pub mod rules;
pub mod schema;
pub mod violation;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use document::{DataFormat, Document};
pub use error::DomainError;
pub use node::Node;
pub use report::ValidationReport;
pub use violation::{DocPath, Severity, Violation};
