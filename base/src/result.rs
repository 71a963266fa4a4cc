pub type UmEnvError = anyhow::Error;

pub use anyhow::{Context, bail};
use std::fmt::{Debug, Display, Formatter};

pub type UmEnvResult<T> = Result<T, UmEnvError>;

/// Wraps a source-located [`miette::Report`] so it can travel through an `anyhow` cause chain
/// and be rendered graphically when the error is reported.
pub struct MietteReportError {
    report: miette::Report,
}

impl MietteReportError {
    pub fn report(&self) -> &miette::Report {
        &self.report
    }

    /// Diagnostic code such as `legacy::syntax`, if the report has one.
    pub fn code(&self) -> Option<String> {
        self.report.code().map(|code| code.to_string())
    }
}

impl From<miette::Report> for MietteReportError {
    fn from(report: miette::Report) -> Self {
        Self { report }
    }
}

impl Debug for MietteReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.report, f)
    }
}

impl Display for MietteReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.report, f)
    }
}

impl std::error::Error for MietteReportError {}
