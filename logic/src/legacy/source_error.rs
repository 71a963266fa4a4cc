use miette::{LabeledSpan, NamedSource, Severity, miette};
use std::ops::Range;
use um_env_base::result::MietteReportError;

/// Byte range into the legacy source text.
pub type Span = Range<usize>;

/// Syntax or evaluation error located in the legacy source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
    pub code: &'static str,
    pub message: String,
    pub span: Span,
    pub label: String,
    pub help: Option<String>,
}

impl SourceError {
    pub fn syntax(message: impl Into<String>, span: Span, label: impl Into<String>) -> Self {
        Self {
            code: "legacy::syntax",
            message: message.into(),
            span,
            label: label.into(),
            help: None,
        }
    }

    pub fn unsupported(message: impl Into<String>, span: Span, label: impl Into<String>) -> Self {
        Self {
            code: "legacy::unsupported",
            message: message.into(),
            span,
            label: label.into(),
            help: Some(
                "Only literal assignments are supported: strings, numbers, booleans, None, lists, tuples and dicts"
                    .to_string(),
            ),
        }
    }

    pub fn evaluation(message: impl Into<String>, span: Span, label: impl Into<String>) -> Self {
        Self {
            code: "legacy::evaluation",
            message: message.into(),
            span,
            label: label.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn into_report(self, filename: &str, source: &str) -> MietteReportError {
        let labels = vec![LabeledSpan::new_primary_with_span(
            Some(self.label),
            self.span,
        )];
        let report = match self.help {
            Some(help) => miette!(
                code = self.code,
                severity = Severity::Error,
                labels = labels,
                help = help,
                "{}",
                self.message
            ),
            None => miette!(
                code = self.code,
                severity = Severity::Error,
                labels = labels,
                "{}",
                self.message
            ),
        };
        MietteReportError::from(
            report.with_source_code(NamedSource::new(filename, source.to_string())),
        )
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
