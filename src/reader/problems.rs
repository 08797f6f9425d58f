//! Accumulate-and-continue problem reporting.
//!
//! A single bad element never aborts a document pass: every structural,
//! resolution, or registry fault is recorded here and processing moves on
//! to the next sibling. Callers inspect the collector afterwards and
//! decide for themselves whether any problem is fatal.

use std::fmt;

use roxmltree::Node;

use crate::error::LoaderError;
use crate::types::SourcePosition;
use crate::xml::text_pos;

/// A single reported problem, with source context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// What went wrong.
    pub message: String,
    /// Location of the document that contained the offending element.
    pub resource: String,
    /// Position of the offending element, if known.
    pub position: Option<SourcePosition>,
    /// Underlying error text, if any.
    pub cause: Option<String>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.message, self.resource)?;
        if let Some(pos) = self.position {
            write!(f, " at {pos}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

/// Collector the reader context reports problems through.
#[derive(Debug, Default)]
pub struct ProblemCollector {
    problems: Vec<Problem>,
}

impl ProblemCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a problem tied to an element.
    pub fn report(&mut self, message: impl Into<String>, resource: &str, node: Node<'_, '_>) {
        self.push(Problem {
            message: message.into(),
            resource: resource.to_string(),
            position: Some(position_of(node)),
            cause: None,
        });
    }

    /// Report a problem tied to an element, with an underlying error.
    pub fn report_caused(
        &mut self,
        message: impl Into<String>,
        resource: &str,
        node: Node<'_, '_>,
        cause: &LoaderError,
    ) {
        self.push(Problem {
            message: message.into(),
            resource: resource.to_string(),
            position: Some(position_of(node)),
            cause: Some(cause.to_string()),
        });
    }

    /// Report a problem with no element context.
    pub fn report_plain(&mut self, message: impl Into<String>, resource: &str) {
        self.push(Problem {
            message: message.into(),
            resource: resource.to_string(),
            position: None,
            cause: None,
        });
    }

    fn push(&mut self, problem: Problem) {
        tracing::warn!(problem = %problem, "Configuration problem");
        self.problems.push(problem);
    }

    /// All problems reported so far, in report order.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Number of reported problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

fn position_of(node: Node<'_, '_>) -> SourcePosition {
    let pos = text_pos(node);
    SourcePosition {
        row: pos.row,
        col: pos.col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_report_records_position() {
        let xml = "<definitions>\n  <import/>\n</definitions>";
        let doc = Document::parse(xml).unwrap();
        let import = doc.root_element().first_element_child().unwrap();

        let mut collector = ProblemCollector::new();
        collector.report("import resource location must not be empty", "app.xml", import);

        assert_eq!(collector.len(), 1);
        let problem = &collector.problems()[0];
        assert_eq!(problem.resource, "app.xml");
        assert_eq!(problem.position.unwrap().row, 2);
    }

    #[test]
    fn test_problem_display() {
        let problem = Problem {
            message: "Name must not be empty".to_string(),
            resource: "app.xml".to_string(),
            position: Some(SourcePosition { row: 3, col: 5 }),
            cause: Some("boom".to_string()),
        };
        assert_eq!(
            problem.to_string(),
            "Name must not be empty in app.xml at 3:5: boom"
        );
    }

    #[test]
    fn test_report_plain() {
        let mut collector = ProblemCollector::new();
        collector.report_plain("cyclic import of 'a.xml'", "a.xml");

        assert!(!collector.is_empty());
        assert!(collector.problems()[0].position.is_none());
    }
}
