//! Advisory findings about a definition.
//!
//! A [`Diagnostic`] reports a structural problem in a
//! [`Definition`](crate::definition::Definition): a dangling source reference,
//! a combination that reaches into its own or a later layer, duplicated ids
//! and so on. Diagnostics never stop a graph from being built; hosts decide
//! whether to surface them or to reject the definition.

use std::fmt;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The graph can be built but will look incomplete or odd.
    Warning,

    /// The definition breaks a structural invariant.
    Error,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Codes identifying each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// The same id names more than one node.
    D001,

    /// A source id does not name any part or combination.
    D002,

    /// A source id names a combination of the same or a later layer.
    D003,

    /// Combination references form a cycle.
    D004,

    /// The final layer does not hold exactly one combination.
    D005,

    /// The final combination does not spell the analyzed word.
    D006,

    /// The definition has no parts.
    D007,
}

impl DiagnosticCode {
    /// Returns the code as written in reports (e.g. `D002`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::D001 => "D001",
            DiagnosticCode::D002 => "D002",
            DiagnosticCode::D003 => "D003",
            DiagnosticCode::D004 => "D004",
            DiagnosticCode::D005 => "D005",
            DiagnosticCode::D006 => "D006",
            DiagnosticCode::D007 => "D007",
        }
    }

    /// Returns a short description of the finding.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticCode::D001 => "duplicate id",
            DiagnosticCode::D002 => "dangling source reference",
            DiagnosticCode::D003 => "source is not from an earlier layer",
            DiagnosticCode::D004 => "cyclic combination references",
            DiagnosticCode::D005 => "final layer is not a single combination",
            DiagnosticCode::D006 => "final combination does not match the word",
            DiagnosticCode::D007 => "definition has no parts",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding with optional help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use etymon_core::diagnostic::{Diagnostic, DiagnosticCode};
    /// let diag = Diagnostic::error(DiagnosticCode::D001, "id `de` is used twice")
    ///     .with_help("rename one of the entries");
    /// assert!(diag.severity().is_error());
    /// assert_eq!(diag.to_string(), "error[D001]: id `de` is used twice");
    /// ```
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_predicates() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Error.is_warning());
        assert!(Severity::Warning.is_warning());
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_code_display() {
        assert_eq!(DiagnosticCode::D002.to_string(), "D002");
        assert_eq!(
            DiagnosticCode::D003.description(),
            "source is not from an earlier layer"
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning(DiagnosticCode::D002, "`xyz` is not defined");
        assert_eq!(diag.to_string(), "warning[D002]: `xyz` is not defined");
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_with_help() {
        let diag = Diagnostic::error(DiagnosticCode::D004, "cycle").with_help("break the cycle");
        assert_eq!(diag.help(), Some("break the cycle"));
        assert_eq!(diag.code(), DiagnosticCode::D004);
    }
}
