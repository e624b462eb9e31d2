//! User-friendly diagnostic messages.
//!
//! Every declaration-level failure is reported with enough context (line,
//! declaration snippet, message) for a human to fix the header or extend the
//! mapping policy. The generator never guesses a mapping.

use std::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// A diagnostic attached to one declaration (or statement) in a header.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// 1-based source line the diagnostic refers to
    pub line: Option<u32>,
    /// Best-effort snippet of the offending declaration
    pub snippet: Option<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            line: None,
            snippet: None,
            suggestions: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            line: None,
            snippet: None,
            suggestions: Vec::new(),
        }
    }

    /// Attach the source line.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach a snippet of the offending declaration.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        let mut snippet = snippet.into();
        if snippet.chars().count() > 60 {
            snippet = snippet.chars().take(57).collect();
            snippet.push_str("...");
        }
        self.snippet = Some(snippet);
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
                Severity::Help => "\x1b[1;32mhelp\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
                Severity::Help => "help",
            }
        };

        match self.line {
            Some(line) => output.push_str(&format!(
                "{}: line {}: {}\n",
                severity_str, line, self.message
            )),
            None => output.push_str(&format!("{}: {}\n", severity_str, self.message)),
        }

        if let Some(ref snippet) = self.snippet {
            output.push_str(&format!("  --> {}\n", snippet));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  help: {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("unknown type `sqlite3`")
            .with_line(12)
            .with_snippet("sqlite3 *db_open(const char *path)")
            .with_suggestion("declare `typedef struct sqlite3 sqlite3;` before the first use");

        let output = diag.format(false);
        assert!(output.contains("error: line 12: unknown type `sqlite3`"));
        assert!(output.contains("--> sqlite3 *db_open(const char *path)"));
        assert!(output.contains("help: declare"));
    }

    #[test]
    fn test_snippet_truncation() {
        let long = "x".repeat(100);
        let diag = Diagnostic::error("bad").with_snippet(long);
        let snippet = diag.snippet.unwrap();
        assert_eq!(snippet.len(), 60);
        assert!(snippet.ends_with("..."));
    }
}
