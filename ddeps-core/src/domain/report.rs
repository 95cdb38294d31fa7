// ddeps-core/src/domain/report.rs
//
// Result Reporter: ordered errors and warnings plus the pass/fail verdict.

use serde::Serialize;

use crate::domain::violation::{DocPath, Severity, Violation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Human label of the validated input (usually the file path).
    pub source: String,
    pub errors: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    violation: &'a Violation,
    rendered: String,
}

fn entries(list: &[Violation]) -> Vec<JsonEntry<'_>> {
    list.iter()
        .map(|v| JsonEntry {
            violation: v,
            rendered: v.render(),
        })
        .collect()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    valid: bool,
    errors: Vec<JsonEntry<'a>>,
    warnings: Vec<JsonEntry<'a>>,
}

impl ValidationReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Warnings never invalidate.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Routes by severity.
    pub fn push(&mut self, violation: Violation) {
        match violation.severity {
            Severity::Error => self.errors.push(violation),
            Severity::Warning => self.warnings.push(violation),
        }
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        for v in violations {
            self.push(v);
        }
    }

    pub fn add_error(&mut self, path: DocPath, message: impl Into<String>) {
        self.errors.push(Violation::error(path, message));
    }

    pub fn add_warning(&mut self, path: DocPath, message: impl Into<String>) {
        self.warnings.push(Violation::warning(path, message));
    }

    pub fn rendered_errors(&self) -> Vec<String> {
        self.errors.iter().map(Violation::render).collect()
    }

    pub fn rendered_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(Violation::render).collect()
    }

    /// Human-readable summary: warnings first, then errors, then the verdict.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return format!("Validation successful for {}", self.source);
        }

        let mut lines = vec![format!("Validation finished for {}:", self.source)];

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push("--- Warnings ---".to_string());
            lines.extend(self.warnings.iter().map(|w| format!("- {}", w)));
        }

        if !self.errors.is_empty() {
            lines.push(String::new());
            lines.push("--- Errors ---".to_string());
            lines.extend(self.errors.iter().map(|e| format!("- {}", e)));
            lines.push(String::new());
            lines.push("Validation failed.".to_string());
        } else {
            lines.push(String::new());
            lines.push("Validation successful (with warnings).".to_string());
        }

        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let report = JsonReport {
            source: &self.source,
            valid: self.is_valid(),
            errors: entries(&self.errors),
            warnings: entries(&self.warnings),
        };
        serde_json::to_string_pretty(&report)
    }
}
