// ddeps-core/src/domain/rules/cycles.rs
//
// Cycle detection over `data name -> required_data` edges.
// Depth-first with an explicit stack and three colours; the first back-edge
// met while walking the `data` keys in document order is the one reported,
// and the pass stops there.

use std::collections::HashMap;

use crate::doc_path;
use crate::domain::document::Document;
use crate::domain::report::ValidationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the active path.
    InProgress,
    Done,
}

pub struct DependencyGraph<'a> {
    /// Start order = document order of the `data` keys.
    order: Vec<&'a str>,
    edges: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn from_document(doc: &'a Document) -> Self {
        let mut order = Vec::with_capacity(doc.data.len());
        let mut edges = HashMap::new();

        for data in &doc.data {
            order.push(data.name.as_str());
            if let Some(required) = &data.required_data {
                edges.insert(
                    data.name.as_str(),
                    required.iter().map(String::as_str).collect(),
                );
            }
        }

        Self { order, edges }
    }

    /// First back-edge `(from, to)` found, if any.
    pub fn first_cycle(&self) -> Option<(&'a str, &'a str)> {
        let mut colors: HashMap<&'a str, Color> = HashMap::new();

        for &start in &self.order {
            if colors.contains_key(start) {
                continue;
            }

            // (node, index of the next neighbour to look at)
            let mut stack: Vec<(&'a str, usize)> = vec![(start, 0)];
            colors.insert(start, Color::InProgress);

            while let Some(top) = stack.last_mut() {
                let node = top.0;
                let next = self
                    .edges
                    .get(node)
                    .and_then(|neighbours| neighbours.get(top.1))
                    .copied();
                top.1 += 1;

                match next {
                    Some(neighbour) => match colors.get(neighbour) {
                        None => {
                            colors.insert(neighbour, Color::InProgress);
                            stack.push((neighbour, 0));
                        }
                        Some(Color::InProgress) => return Some((node, neighbour)),
                        Some(Color::Done) => {}
                    },
                    None => {
                        colors.insert(node, Color::Done);
                        stack.pop();
                    }
                }
            }
        }

        None
    }
}

pub fn circular_dependencies(doc: &Document, report: &mut ValidationReport) {
    if let Some((from, to)) = DependencyGraph::from_document(doc).first_cycle() {
        report.add_error(
            doc_path!["data"],
            format!(
                "Circular dependency detected involving '{}' and '{}'.",
                from, to
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::DataDefinition;
    use crate::domain::rules::fixtures::*;

    fn node(name: &str, requires: &[&str]) -> DataDefinition {
        let mut d = data(name, "list");
        d.required_data = Some(requires.iter().map(|s| s.to_string()).collect());
        d
    }

    #[test]
    fn test_dag_has_no_cycle() {
        let d = doc(vec![
            node("c", &["b"]),
            node("b", &["a"]),
            data("a", "list"),
            node("d", &["a", "b", "c"]),
        ]);
        assert_eq!(DependencyGraph::from_document(&d).first_cycle(), None);
    }

    #[test]
    fn test_mutual_reference_either_order() {
        let ab = doc(vec![node("A", &["B"]), node("B", &["A"])]);
        assert_eq!(
            DependencyGraph::from_document(&ab).first_cycle(),
            Some(("B", "A"))
        );

        let ba = doc(vec![node("B", &["A"]), node("A", &["B"])]);
        assert_eq!(
            DependencyGraph::from_document(&ba).first_cycle(),
            Some(("A", "B"))
        );
    }

    #[test]
    fn test_self_reference() {
        let d = doc(vec![node("loop", &["loop"])]);
        assert_eq!(
            DependencyGraph::from_document(&d).first_cycle(),
            Some(("loop", "loop"))
        );
    }

    #[test]
    fn test_only_first_cycle_reported() {
        let d = doc(vec![
            node("a", &["b"]),
            node("b", &["a"]),
            node("x", &["y"]),
            node("y", &["x"]),
        ]);
        let mut report = ValidationReport::new("t");
        circular_dependencies(&d, &mut report);
        assert_eq!(
            report.rendered_errors(),
            vec!["Error at 'data': Circular dependency detected involving 'b' and 'a'."]
        );
    }

    #[test]
    fn test_undefined_reference_is_a_leaf() {
        let d = doc(vec![node("a", &["ghost"]), node("b", &["ghost", "a"])]);
        assert_eq!(DependencyGraph::from_document(&d).first_cycle(), None);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let names: Vec<String> = (0..10_000).map(|i| format!("n{i}")).collect();
        let mut defs: Vec<DataDefinition> = names
            .windows(2)
            .map(|w| node(&w[0], &[w[1].as_str()]))
            .collect();
        defs.push(node("n9999", &["n0"]));
        let d = doc(defs);
        assert_eq!(
            DependencyGraph::from_document(&d).first_cycle(),
            Some(("n9999", "n0"))
        );
    }
}
