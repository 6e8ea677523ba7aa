//! Implementation of `dartbind generate`.
//!
//! Reads one Zig source file, extracts its exports, generates the Dart
//! bindings, formats them and writes them out. Any failure aborts before the
//! output file is touched.

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::bindings::{BindingError, DartGenerator, ExportParser, FunctionSignature};
use crate::ops::format::{FormatError, SourceFormatter};
use crate::util::config::Config;
use crate::util::fs::write_atomic;

/// Process exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Process exit code when input, configuration or output I/O fails.
pub const EXIT_IO: i32 = 1;
/// Process exit code when bindings cannot be generated from the exports.
pub const EXIT_GENERATE: i32 = 2;
/// Process exit code when the formatter fails.
pub const EXIT_FORMAT: i32 = 3;

/// Error from a generation run.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(dartbind::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    #[error("failed to write `{}`", path.display())]
    #[diagnostic(code(dartbind::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// The process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Read { .. } | GenerateError::Write { .. } => EXIT_IO,
            GenerateError::Binding(_) => EXIT_GENERATE,
            GenerateError::Format(_) => EXIT_FORMAT,
        }
    }
}

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Zig source to scan
    pub input: PathBuf,

    /// Output file; the bindings are only returned when unset
    pub output: Option<PathBuf>,

    /// Namespace prefix of exported symbols
    pub prefix: String,

    /// Name of the generated state class
    pub class_name: String,

    /// Name of the configuration string field
    pub config_field: String,

    /// Bootstrap export suffix
    pub bootstrap: String,

    /// Abort when formatting fails instead of emitting unformatted code
    pub format_required: bool,
}

impl GenerateOptions {
    /// Build options from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        GenerateOptions {
            input: config.input(),
            output: config.generate.output.clone(),
            prefix: config.prefix().to_string(),
            class_name: config.class_name().to_string(),
            config_field: config.config_field().to_string(),
            bootstrap: config.bootstrap().to_string(),
            format_required: config.format_required(),
        }
    }

    /// The export scanner for these options.
    pub fn parser(&self) -> ExportParser {
        ExportParser::new().with_prefix(&self.prefix)
    }

    /// The Dart generator for these options.
    pub fn generator(&self) -> DartGenerator {
        DartGenerator::new()
            .with_prefix(&self.prefix)
            .with_class_name(&self.class_name)
            .with_config_field(&self.config_field)
            .with_bootstrap(&self.bootstrap)
    }
}

/// Read a source file.
pub fn read_source(path: &Path) -> Result<String, GenerateError> {
    std::fs::read_to_string(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the input and extract its exports.
///
/// Returns the source text alongside the signatures so errors can quote it.
pub fn extract(opts: &GenerateOptions) -> Result<(String, Vec<FunctionSignature>), GenerateError> {
    let source = read_source(&opts.input)?;
    let functions = opts.parser().parse_content(&source);

    tracing::info!(
        "found {} `{}_*` exports in {}",
        functions.len(),
        opts.prefix,
        opts.input.display()
    );

    Ok((source, functions))
}

/// Generate bindings for the input file.
///
/// Returns the (formatted) Dart source. When `opts.output` is set the
/// source is also written there atomically.
pub fn generate(
    opts: &GenerateOptions,
    formatter: &dyn SourceFormatter,
) -> Result<String, GenerateError> {
    let (source, functions) = extract(opts)?;

    let dart = opts
        .generator()
        .generate(&functions)
        .map_err(|e| e.with_source(&opts.input.display().to_string(), &source))?;

    let dart = match formatter.format(&dart) {
        Ok(formatted) => formatted,
        Err(e) if !opts.format_required => {
            tracing::warn!(
                "formatting with `{}` failed, emitting unformatted code: {}",
                formatter.name(),
                e
            );
            dart
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref path) = opts.output {
        write_atomic(path, &dart).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!("wrote {}", path.display());
    }

    Ok(dart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use tempfile::TempDir;

    use crate::ops::format::Passthrough;

    const SOURCE: &str = r#"
const std = @import("std");

export fn rr_start(path: [*c]const u8, len: c_int) *anyopaque {
    return std.heap.c_allocator.create(u8) catch unreachable;
}

export fn rr_get_data_path(ctx: *anyopaque) [*:0]const u8 {
    _ = ctx;
    return "data";
}
"#;

    /// Records its input and returns it upper-cased, or fails.
    struct FakeFormatter {
        seen: RefCell<Vec<String>>,
        fail: bool,
    }

    impl FakeFormatter {
        fn new(fail: bool) -> Self {
            FakeFormatter {
                seen: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl SourceFormatter for FakeFormatter {
        fn name(&self) -> &str {
            "fake"
        }

        fn format(&self, source: &str) -> Result<String, FormatError> {
            self.seen.borrow_mut().push(source.to_string());
            if self.fail {
                return Err(FormatError::NotFound {
                    program: "fake".to_string(),
                });
            }
            Ok(source.to_uppercase())
        }
    }

    fn options(dir: &Path, source: &str) -> GenerateOptions {
        let input = dir.join("main.zig");
        std::fs::write(&input, source).unwrap();

        let mut config = Config::default();
        config.generate.input = Some(input);
        GenerateOptions::from_config(&config)
    }

    #[test]
    fn test_generate_returns_text() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path(), SOURCE);

        let dart = generate(&opts, &Passthrough).unwrap();
        assert!(dart.contains(r#"lib.lookupFunction<RRStartNative, RRStart>("rr_start")"#));
        assert!(dart.contains(
            "typedef RRGetDataPathNative = Pointer<Utf8> Function(Pointer<Void>);"
        ));
    }

    #[test]
    fn test_formatter_receives_generated_text() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path(), SOURCE);
        let fake = FakeFormatter::new(false);

        let dart = generate(&opts, &fake).unwrap();

        let seen = fake.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("import 'dart:developer';"));
        assert_eq!(dart, seen[0].to_uppercase());
    }

    #[test]
    fn test_writes_output_file() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options(tmp.path(), SOURCE);
        let out = tmp.path().join("lib").join("bindings.dart");
        opts.output = Some(out.clone());

        let dart = generate(&opts, &Passthrough).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), dart);
    }

    #[test]
    fn test_missing_input() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options(tmp.path(), SOURCE);
        opts.input = tmp.path().join("missing.zig");

        let err = generate(&opts, &Passthrough).unwrap_err();
        assert!(matches!(err, GenerateError::Read { .. }));
        assert_eq!(err.exit_code(), EXIT_IO);
    }

    #[test]
    fn test_unknown_type_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = format!("{}\nexport fn rr_scale(x: f32) void {{}}\n", SOURCE);
        let mut opts = options(tmp.path(), &source);
        let out = tmp.path().join("bindings.dart");
        opts.output = Some(out.clone());
        let fake = FakeFormatter::new(false);

        let err = generate(&opts, &fake).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_GENERATE);
        assert!(err.to_string().contains("f32"));
        assert!(fake.seen.borrow().is_empty());
        assert!(!out.exists());

        // The error quotes the scanned file
        match err {
            GenerateError::Binding(BindingError::UnknownType { src, span, .. }) => {
                assert!(src.is_some());
                assert!(span.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_formatter_failure() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options(tmp.path(), SOURCE);
        let out = tmp.path().join("bindings.dart");
        opts.output = Some(out.clone());

        let err = generate(&opts, &FakeFormatter::new(true)).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_FORMAT);
        assert!(!out.exists());
    }

    #[test]
    fn test_formatter_failure_tolerated_when_not_required() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options(tmp.path(), SOURCE);
        opts.format_required = false;

        let dart = generate(&opts, &FakeFormatter::new(true)).unwrap();
        assert_eq!(dart, generate(&opts, &Passthrough).unwrap());
    }

    #[test]
    fn test_runs_are_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path(), SOURCE);

        assert_eq!(
            generate(&opts, &Passthrough).unwrap(),
            generate(&opts, &Passthrough).unwrap()
        );
    }
}
