use crate::ids::SourceId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub source: SourceId,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, source: SourceId, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            source,
            message: message.into(),
        }
    }

    pub fn warning(source: SourceId, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, source, message)
    }

    pub fn error(source: SourceId, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, source, message)
    }

    pub fn fatal(source: SourceId, message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, source, message)
    }
}

/// Sink for diagnostics raised anywhere in the pipeline. Non-fatal
/// diagnostics accumulate; fatal ones are reported then surfaced to the
/// caller as a `FatalError` (see `crate::error`) which propagates via `?`
/// instead of the donor's longjmp-based `error_exit`.
pub trait ErrorSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn has_errors(&self) -> bool;
}

/// Accumulates every diagnostic reported to it. Used by tests and by
/// non-interactive driver invocations that want to inspect results after the
/// fact rather than print as-you-go.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity >= Severity::Error {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    fn has_errors(&self) -> bool {
        self.has_errors
    }
}

/// Prints each diagnostic to stderr as it is reported, using
/// `annotate-snippets` for the rendering, mirroring the donor CLI's
/// immediate-print diagnostic behaviour.
#[derive(Debug, Default)]
pub struct PrintingSink {
    has_errors: bool,
}

impl PrintingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorSink for PrintingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        use annotate_snippets::{Group, Level, Renderer};

        if diagnostic.severity >= Severity::Error {
            self.has_errors = true;
        }
        let level = match diagnostic.severity {
            Severity::Warning => Level::WARNING,
            Severity::Error | Severity::Fatal => Level::ERROR,
        };
        let title = format!(
            "{} (source {})",
            diagnostic.message,
            diagnostic.source.as_u32()
        );
        let report: Vec<Group> = vec![level.primary_title(&title)];
        let renderer = Renderer::styled();
        eprintln!("{}", renderer.render(&report));
    }

    fn has_errors(&self) -> bool {
        self.has_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_tracks_error_flag_only_for_error_and_fatal() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::warning(SourceId::INVALID, "just a warning"));
        assert!(!sink.has_errors());
        sink.report(Diagnostic::error(SourceId::INVALID, "oops"));
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 2);
    }
}
