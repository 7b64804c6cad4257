//! Validation and compilation diagnostics.
//!
//! Neither the validator nor the compiler fails with a Rust error on bad
//! input: both return every problem they found as a list of
//! [`Diagnostic`]s. A graph compiles only when its list carries no
//! Error-severity entry; warnings surface to authoring tools and never
//! block anything.

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational for content authors; never blocks compilation.
    Warning,
    /// Blocks compilation.
    Error,
}

/// Stable machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagCode {
    EmptyGraphId,
    EmptyEntryId,
    EmptyNodeId,
    DuplicateNodeId,
    UnknownOpcode,
    UnknownEntry,
    DanglingNext,
    DanglingInput,
    ControlFlowCycle,
    DataCycle,
    UnreachableNode,
    RegisterBudget,
    TypeMismatch,
    MissingInput,
    MissingLiteral,
    MissingSymbol,
    TooManyEffectArgs,
    TooManyInputs,
}

impl DiagCode {
    /// The stable code string, for tooling and log filtering.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagCode::EmptyGraphId => "empty-graph-id",
            DiagCode::EmptyEntryId => "empty-entry-id",
            DiagCode::EmptyNodeId => "empty-node-id",
            DiagCode::DuplicateNodeId => "duplicate-node-id",
            DiagCode::UnknownOpcode => "unknown-opcode",
            DiagCode::UnknownEntry => "unknown-entry",
            DiagCode::DanglingNext => "dangling-next",
            DiagCode::DanglingInput => "dangling-input",
            DiagCode::ControlFlowCycle => "control-flow-cycle",
            DiagCode::DataCycle => "data-cycle",
            DiagCode::UnreachableNode => "unreachable-node",
            DiagCode::RegisterBudget => "register-budget",
            DiagCode::TypeMismatch => "type-mismatch",
            DiagCode::MissingInput => "missing-input",
            DiagCode::MissingLiteral => "missing-literal",
            DiagCode::MissingSymbol => "missing-symbol",
            DiagCode::TooManyEffectArgs => "too-many-effect-args",
            DiagCode::TooManyInputs => "too-many-inputs",
        }
    }
}

/// One validation or compilation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagCode,
    /// Human-readable explanation.
    pub message: String,
    /// Id of the graph the finding is about.
    pub graph: String,
    /// Offending node, when the finding is node-scoped.
    pub node: Option<String>,
}

impl Diagnostic {
    pub fn error(
        code: DiagCode,
        graph: impl Into<String>,
        node: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message: message.into(),
            graph: graph.into(),
            node: node.map(str::to_owned),
        }
    }

    pub fn warning(
        code: DiagCode,
        graph: impl Into<String>,
        node: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code,
            message: message.into(),
            graph: graph.into(),
            node: node.map(str::to_owned),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{sev}[{}] {}: ", self.code.as_str(), self.graph)?;
        if let Some(node) = &self.node {
            write!(f, "node '{node}': ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// True when any diagnostic in the list blocks compilation.
pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_node() {
        let d = Diagnostic::error(
            DiagCode::DanglingNext,
            "fire_bolt",
            Some("a"),
            "next references unknown node 'b'",
        );
        assert_eq!(
            d.to_string(),
            "error[dangling-next] fire_bolt: node 'a': next references unknown node 'b'"
        );
    }

    #[test]
    fn display_without_node() {
        let d = Diagnostic::warning(DiagCode::UnreachableNode, "g", None, "msg");
        assert_eq!(d.to_string(), "warning[unreachable-node] g: msg");
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let warn = Diagnostic::warning(DiagCode::UnreachableNode, "g", Some("n"), "w");
        let err = Diagnostic::error(DiagCode::DataCycle, "g", Some("n"), "e");
        assert!(!has_errors(&[]));
        assert!(!has_errors(&[warn.clone()]));
        assert!(has_errors(&[warn, err]));
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn codes_are_stable_and_distinct() {
        let codes = [
            DiagCode::EmptyGraphId,
            DiagCode::EmptyEntryId,
            DiagCode::EmptyNodeId,
            DiagCode::DuplicateNodeId,
            DiagCode::UnknownOpcode,
            DiagCode::UnknownEntry,
            DiagCode::DanglingNext,
            DiagCode::DanglingInput,
            DiagCode::ControlFlowCycle,
            DiagCode::DataCycle,
            DiagCode::UnreachableNode,
            DiagCode::RegisterBudget,
            DiagCode::TypeMismatch,
            DiagCode::MissingInput,
            DiagCode::MissingLiteral,
            DiagCode::MissingSymbol,
            DiagCode::TooManyEffectArgs,
            DiagCode::TooManyInputs,
        ];
        let mut strs: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
        strs.sort();
        strs.dedup();
        assert_eq!(strs.len(), codes.len());
    }
}
