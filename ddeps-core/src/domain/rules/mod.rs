// ddeps-core/src/domain/rules/mod.rs
//
// Rule Engine. A rule scans the whole typed document and appends errors or
// warnings to the shared report. Every rule of a set runs, whatever earlier
// rules found.

pub mod columns;
pub mod cycles;
pub mod format;
pub mod recommendations;
pub mod references;

use crate::domain::document::{DataFormat, Document};
use crate::domain::report::ValidationReport;

type Check<D> = Box<dyn Fn(&D, &mut ValidationReport) + Send + Sync>;

pub struct Rule<D> {
    pub name: &'static str,
    check: Check<D>,
}

impl<D> Rule<D> {
    pub fn new(name: &'static str, check: impl Fn(&D, &mut ValidationReport) + Send + Sync + 'static) -> Self {
        Self {
            name,
            check: Box::new(check),
        }
    }

    pub fn apply(&self, doc: &D, report: &mut ValidationReport) {
        (self.check)(doc, report)
    }
}

/// Ordered list of rules for one document type.
pub struct RuleSet<D> {
    rules: Vec<Rule<D>>,
}

impl<D> Default for RuleSet<D> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<D> RuleSet<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        name: &'static str,
        check: impl Fn(&D, &mut ValidationReport) + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule::new(name, check));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<D>> {
        self.rules.iter()
    }
}

/// Tunables of the data-dependencies rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOptions {
    /// When set, an allowed format outside this list draws a warning.
    pub recommended_formats: Option<Vec<DataFormat>>,
}

impl RuleSet<Document> {
    /// The fixed rule set for `data_dependencies.yml`, errors first, warnings last.
    pub fn data_dependencies(options: &RuleOptions) -> Self {
        let recommended = options.recommended_formats.clone();

        RuleSet::new()
            .with("format_and_columns", format::format_and_columns)
            .with("emptiness", format::emptiness)
            .with("references", references::references)
            .with("uniqueness", references::uniqueness)
            .with("circular_dependencies", cycles::circular_dependencies)
            .with("variable_columns", columns::variable_columns)
            .with("recommendations", recommendations::recommendations)
            .with("recommended_formats", move |doc, report| {
                if let Some(formats) = &recommended {
                    recommendations::recommended_formats(doc, formats, report);
                }
            })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::document::*;

    pub fn data(name: &str, format: &str) -> DataDefinition {
        DataDefinition {
            name: name.into(),
            descriptions: vec!["desc".into()],
            format: format.into(),
            unit: "-".into(),
            columns: None,
            keys: None,
            process: None,
            required_data: None,
            required_parameter: None,
        }
    }

    pub fn column(name: &str, key_source: Option<&str>) -> Column {
        Column {
            name: name.into(),
            description: "col".into(),
            key_source: key_source.map(Into::into),
        }
    }

    pub fn param(name: &str) -> ParameterDefinition {
        ParameterDefinition {
            name: name.into(),
            descriptions: vec!["p".into()],
            unit: "-".into(),
        }
    }

    pub fn doc(data: Vec<DataDefinition>) -> Document {
        Document {
            metadata: Metadata {
                title: "T".into(),
                purposes: vec!["p".into()],
                terms: None,
                note: None,
            },
            target: data.first().map(|d| d.name.clone()).into_iter().collect(),
            data,
            parameter: None,
        }
    }
}
