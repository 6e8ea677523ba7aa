//! Binding generation error types.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::types::Span;

/// A semantic failure while turning signatures into bindings.
///
/// Every variant aborts the run; no partial bindings are produced.
#[derive(Debug, Error, Diagnostic)]
pub enum BindingError {
    #[error("unsupported FFI type `{token}`{}", owner_suffix(.function))]
    #[diagnostic(
        code(dartbind::bindings::unknown_type),
        help("supported types: [*c]const u8, [*:0]const u8, *anyopaque, void, c_int, u8..u64, i8..i64")
    )]
    UnknownType {
        token: String,
        function: Option<String>,
        #[source_code]
        src: Option<NamedSource<String>>,
        #[label("not a supported FFI type")]
        span: Option<SourceSpan>,
    },

    #[error("no bootstrap export `{symbol}` found")]
    #[diagnostic(
        code(dartbind::bindings::missing_bootstrap),
        help("declare `export fn {symbol}(path: [*c]const u8, len: c_int) *anyopaque` or pass --bootstrap")
    )]
    MissingBootstrap { symbol: String },

    #[error("bootstrap export `{symbol}` has signature ({args}) -> {ret}")]
    #[diagnostic(
        code(dartbind::bindings::bootstrap_shape),
        help("the bootstrap export must take a C string and its length and return *anyopaque")
    )]
    BootstrapShape {
        symbol: String,
        args: String,
        ret: String,
        #[source_code]
        src: Option<NamedSource<String>>,
        #[label("declared here")]
        span: Option<SourceSpan>,
    },

    #[error("`{name}` cannot be used as the {role}: {reason}")]
    #[diagnostic(
        code(dartbind::bindings::invalid_name),
        help("use a Dart identifier that is not a reserved word, `lib`, `ctx`, or an export's field")
    )]
    InvalidName {
        name: String,
        role: &'static str,
        reason: String,
    },

    #[error("`{first}` and `{second}` both generate the Dart identifier `{ident}`")]
    #[diagnostic(
        code(dartbind::bindings::duplicate_identifier),
        help("rename one of the exports")
    )]
    DuplicateIdentifier {
        ident: String,
        first: String,
        second: String,
    },
}

fn owner_suffix(function: &Option<String>) -> String {
    match function {
        Some(name) => format!(" in `{}`", name),
        None => String::new(),
    }
}

impl BindingError {
    /// An unknown type token with no location yet.
    pub fn unknown_type(token: impl Into<String>) -> Self {
        BindingError::UnknownType {
            token: token.into(),
            function: None,
            src: None,
            span: None,
        }
    }

    /// Record the function that owns the failing token.
    pub fn in_function(mut self, name: &str) -> Self {
        if let BindingError::UnknownType { function, .. } = &mut self {
            function.get_or_insert_with(|| name.to_string());
        }
        self
    }

    /// Point the error at a location in the scanned source.
    pub fn with_span(mut self, at: Span) -> Self {
        match &mut self {
            BindingError::UnknownType { span, .. } | BindingError::BootstrapShape { span, .. } => {
                *span = Some(at.into());
            }
            _ => {}
        }
        self
    }

    /// Attach the scanned source so the span can be rendered.
    pub fn with_source(mut self, name: &str, text: &str) -> Self {
        match &mut self {
            BindingError::UnknownType { src, .. } | BindingError::BootstrapShape { src, .. } => {
                *src = Some(NamedSource::new(name, text.to_string()));
            }
            _ => {}
        }
        self
    }
}
