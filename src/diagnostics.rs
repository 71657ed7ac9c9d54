//! Advisory diagnostics reported by generators.
//!
//! Diagnostics are a side channel: reporting one never halts a transform, and
//! everything reported before an abort stays in the sink.

use std::fmt;
use std::sync::Mutex;

use proc_macro2::Span;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// 1-based line, 0-based column, as reported by `proc-macro2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        let start = span.start();
        Location {
            line: start.line,
            column: start.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short stable identifier chosen by the reporting generator, e.g. `GEN001`
    pub id: String,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(severity: Severity, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            id: id.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, id, message)
    }

    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, id, message)
    }

    pub fn info(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, id, message)
    }

    /// Attach the start of `span` as the location.
    ///
    /// Spans produced by `syn::parse_file` carry real positions; spans from
    /// `quote!` resolve to line 1, column 0 outside of a proc-macro.
    pub fn at(mut self, span: Span) -> Self {
        self.location = Some(span.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{}[{}] {}:{}: {}",
                self.severity, self.id, loc.line, loc.column, self.message
            ),
            None => write!(f, "{}[{}]: {}", self.severity, self.id, self.message),
        }
    }
}

/// Append-only receiver of diagnostics, in emission order.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Collects every reported diagnostic in memory.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    items: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics()
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&self, diagnostic: Diagnostic) {
        match self.items.lock() {
            Ok(mut items) => items.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        let level = match diagnostic.severity {
            Severity::Error => log::Level::Error,
            Severity::Warning => log::Level::Warn,
            Severity::Info => log::Level::Info,
            Severity::Hidden => log::Level::Trace,
        };
        log::log!(level, "{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_keeps_emission_order() {
        let bag = DiagnosticBag::new();
        bag.report(Diagnostic::info("A1", "first"));
        bag.report(Diagnostic::error("A2", "second"));
        bag.report(Diagnostic::warning("A3", "third"));

        let ids: Vec<_> = bag.diagnostics().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
        assert!(bag.has_errors());
    }

    #[test]
    fn test_display() {
        let mut diag = Diagnostic::warning("GEN7", "field is unused");
        assert_eq!(diag.to_string(), "warning[GEN7]: field is unused");

        diag.location = Some(Location { line: 3, column: 4 });
        assert_eq!(diag.to_string(), "warning[GEN7] 3:4: field is unused");
    }

    #[test]
    fn test_location_from_parsed_span() {
        let file = syn::parse_file("\n\nstruct Foo;").unwrap();
        let syn::Item::Struct(item) = &file.items[0] else {
            panic!("expected struct");
        };
        let diag = Diagnostic::info("X", "found").at(item.ident.span());
        assert_eq!(diag.location, Some(Location { line: 3, column: 7 }));
    }
}
