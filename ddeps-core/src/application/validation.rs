// ddeps-core/src/application/validation.rs

use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::domain::document::Document;
use crate::domain::node::Node;
use crate::domain::report::ValidationReport;
use crate::domain::rules::{RuleOptions, RuleSet};
use crate::domain::schema::{DataDependenciesSchema, DocumentSchema};
use crate::domain::violation::DocPath;
use crate::error::DdepsError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::loader::{check_duplicate_keys, parse_document, read_source};

/// Shape schema first; rules only when it passes. The two never mix in one
/// report.
pub fn run_validation<S: DocumentSchema>(
    node: &Node,
    schema: &S,
    rules: &RuleSet<S::Output>,
    report: &mut ValidationReport,
) {
    let document = match schema.conform(node) {
        Ok(document) => document,
        Err(violations) => {
            report.extend(violations);
            return;
        }
    };

    for rule in rules.iter() {
        let before = (report.errors.len(), report.warnings.len());
        rule.apply(&document, report);
        debug!(
            rule = rule.name,
            errors = report.errors.len() - before.0,
            warnings = report.warnings.len() - before.1,
            "Rule applied"
        );
    }
}

/// Validates `data_dependencies.yml` text. `origin` only labels messages.
pub fn validate_source(source: &str, origin: &str, options: &RuleOptions) -> ValidationReport {
    let mut report = ValidationReport::new(origin);

    let node = match parse_document(source) {
        Ok(node) => node,
        Err(e) => {
            warn!(error = %e, "YAML parsing failed");
            report.add_error(
                DocPath::root(),
                format!("Error parsing YAML file {}: {}", origin, e),
            );
            return report;
        }
    };
    debug!(root = node.kind(), "Document parsed");

    // Recorded, but the document is still checked with last-value-wins content.
    match check_duplicate_keys(source) {
        Ok(()) => {}
        Err(e @ InfrastructureError::DuplicateKey { .. }) => {
            report.add_error(DocPath::root(), format!("YAML parsing error: {}", e));
        }
        Err(e) => {
            report.add_error(
                DocPath::root(),
                format!("YAML parsing error during duplicate check: {}", e),
            );
        }
    }

    let rules: RuleSet<Document> = RuleSet::data_dependencies(options);
    run_validation(&node, &DataDependenciesSchema, &rules, &mut report);
    report
}

/// Reads and validates one file. Only an unreadable file is a hard failure.
#[instrument(skip(options))]
pub fn validate_file(path: &Path, options: &RuleOptions) -> Result<ValidationReport, DdepsError> {
    let source = read_source(path)?;
    let report = validate_source(&source, &path.display().to_string(), options);
    info!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Validation finished"
    );
    Ok(report)
}
