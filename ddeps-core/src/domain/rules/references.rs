// ddeps-core/src/domain/rules/references.rs

use crate::doc_path;
use crate::domain::document::Document;
use crate::domain::report::ValidationReport;
use crate::domain::violation::DocPath;

/// `target`, `required_data` and `required_parameter` must resolve.
pub fn references(doc: &Document, report: &mut ValidationReport) {
    for target in &doc.target {
        if !doc.has_data(target) {
            report.add_error(
                doc_path!["target"],
                format!(
                    "Target data '{}' is not defined in the 'data' section.",
                    target
                ),
            );
        }
    }

    for data in &doc.data {
        let name = data.name.as_str();

        for required in data.required_data.iter().flatten() {
            if !doc.has_data(required) {
                report.add_error(
                    doc_path!["data", name, "required_data"],
                    format!(
                        "Required data '{}' is not defined in the 'data' section.",
                        required
                    ),
                );
            }
        }

        let Some(required_params) = &data.required_parameter else {
            continue;
        };
        if doc.parameter.is_none() {
            report.add_error(
                doc_path!["data", name, "required_parameter"],
                "`required_parameter` is specified, but the 'parameter' section is missing.",
            );
            continue;
        }
        for param in required_params {
            if !doc.has_parameter(param) {
                report.add_error(
                    doc_path!["data", name, "required_parameter"],
                    format!(
                        "Required parameter '{}' is not defined in the 'parameter' section.",
                        param
                    ),
                );
            }
        }
    }
}

/// `data` and `parameter` share one namespace.
pub fn uniqueness(doc: &Document, report: &mut ValidationReport) {
    for data in &doc.data {
        if doc.has_parameter(&data.name) {
            report.add_error(
                DocPath::root(),
                format!(
                    "Key '{}' is defined in both 'data' and 'parameter' sections.",
                    data.name
                ),
            );
        }
    }
}
