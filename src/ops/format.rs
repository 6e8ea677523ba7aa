//! Formatting of generated source.
//!
//! The generator's correctness does not depend on the formatter: generated
//! text is valid Dart before formatting. Formatting is a swappable
//! collaborator so it can be skipped or faked.

use std::io::{self, Write};
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::util::process::{find_executable, ProcessBuilder, ProcessError};

/// Error while formatting generated code.
#[derive(Debug, Error, Diagnostic)]
pub enum FormatError {
    #[error("formatter `{program}` not found in PATH")]
    #[diagnostic(
        code(dartbind::format::not_found),
        help("install the Dart SDK, set [format] command in .dartbind/config.toml, or pass --no-format")
    )]
    NotFound { program: String },

    #[error(transparent)]
    #[diagnostic(code(dartbind::format::failed))]
    Process(#[from] ProcessError),

    #[error("failed to stage code for formatting")]
    #[diagnostic(code(dartbind::format::io))]
    Io(#[from] io::Error),
}

/// Something that can reformat generated source text.
pub trait SourceFormatter {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Format `source`, returning the formatted text.
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Returns source unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn name(&self) -> &str {
        "none"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}

/// Formats through `dart format`.
///
/// The source is staged in a temporary `.dart` file which `dart format`
/// rewrites in place.
#[derive(Debug, Clone)]
pub struct DartFormat {
    program: String,
}

impl DartFormat {
    /// Use the given `dart` executable (a name looked up in PATH, or a path).
    pub fn new(program: impl Into<String>) -> Self {
        DartFormat {
            program: program.into(),
        }
    }

    fn resolve_program(&self) -> Result<PathBuf, FormatError> {
        find_executable(&self.program).ok_or_else(|| FormatError::NotFound {
            program: self.program.clone(),
        })
    }
}

impl SourceFormatter for DartFormat {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let program = self.resolve_program()?;

        let mut staged = tempfile::Builder::new()
            .prefix("dartbind")
            .suffix(".dart")
            .tempfile()?;
        staged.write_all(source.as_bytes())?;
        staged.flush()?;

        ProcessBuilder::new(program)
            .arg("format")
            .arg(staged.path())
            .exec_and_check()?;

        Ok(std::fs::read_to_string(staged.path())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let text = "class A{}\n";
        assert_eq!(Passthrough.format(text).unwrap(), text);
    }

    #[test]
    fn test_dart_format_missing_program() {
        let err = DartFormat::new("dartbind-no-such-formatter")
            .format("class A {}\n")
            .unwrap_err();
        assert!(matches!(err, FormatError::NotFound { ref program } if program == "dartbind-no-such-formatter"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dart_format_reports_failure() {
        // `false` ignores its arguments and exits non-zero
        let err = DartFormat::new("false").format("class A {}\n").unwrap_err();
        assert!(matches!(err, FormatError::Process(ProcessError::Failed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_dart_format_reads_back_staged_file() {
        // `true` leaves the staged file untouched
        let text = "class A {}\n";
        assert_eq!(DartFormat::new("true").format(text).unwrap(), text);
    }
}
