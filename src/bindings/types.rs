//! Type definitions for extracted Zig exports.
//!
//! These types represent the FFI-relevant information scanned out of a Zig
//! source file, plus the mapping from Zig type tokens to `dart:ffi` types.

use std::fmt;

use serde::Serialize;

use super::errors::BindingError;

/// A byte range in the scanned source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Byte offset of the first character
    pub offset: usize,

    /// Length in bytes
    pub len: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(offset: usize, len: usize) -> Self {
        Span { offset, len }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.offset, span.len).into()
    }
}

/// A raw Zig type as written in the source, e.g. `[*c]const u8` or `?*anyopaque`.
///
/// Serializes as its text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeToken {
    /// Token text with whitespace runs collapsed to one space
    pub text: String,

    /// Location of the token in the source
    #[serde(skip)]
    pub span: Span,
}

impl TypeToken {
    /// Create a token without a meaningful source location.
    pub fn new(text: impl Into<String>) -> Self {
        TypeToken {
            text: text.into(),
            span: Span::default(),
        }
    }

    /// Create a token located at `span`.
    pub fn at(text: impl Into<String>, span: Span) -> Self {
        TypeToken {
            text: text.into(),
            span,
        }
    }

    /// Classify the token, attaching its location to any failure.
    pub fn classify(&self) -> Result<FfiType, BindingError> {
        FfiType::parse(&self.text).map_err(|e| e.with_span(self.span))
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An exported function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    /// Symbol name, including the namespace prefix
    pub name: String,

    /// Parameter types in declaration order
    pub args: Vec<TypeToken>,

    /// Return type
    pub return_type: TypeToken,

    /// Location of the function name in the source
    #[serde(skip)]
    pub span: Span,
}

impl FunctionSignature {
    /// Create a new signature with no parameters.
    pub fn new(name: impl Into<String>, return_type: TypeToken) -> Self {
        FunctionSignature {
            name: name.into(),
            args: Vec::new(),
            return_type,
            span: Span::default(),
        }
    }

    /// Add a parameter.
    pub fn with_arg(mut self, arg: TypeToken) -> Self {
        self.args.push(arg);
        self
    }

    /// Parameter type texts in order.
    pub fn arg_types(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.text.as_str()).collect()
    }

    /// Classify the return type and every parameter type.
    ///
    /// Failures name this function as the owner of the bad token.
    pub fn classify(&self) -> Result<(Vec<FfiType>, FfiType), BindingError> {
        let owned = |e: BindingError| e.in_function(&self.name);

        let args = self
            .args
            .iter()
            .map(|a| a.classify().map_err(owned))
            .collect::<Result<Vec<_>, _>>()?;
        let ret = self.return_type.classify().map_err(owned)?;

        Ok((args, ret))
    }
}

/// Widths with a matching `dart:ffi` native integer.
const INT_WIDTHS: [u16; 4] = [8, 16, 32, 64];

/// The closed set of types that can cross the generated FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FfiType {
    /// `[*c]const u8` or `[*:0]const u8`
    CString,

    /// `*anyopaque`
    OpaquePointer,

    /// `void`
    Void,

    /// `c_int`
    CInt,

    /// `u8`, `u16`, `u32`, `u64`
    Unsigned(u16),

    /// `i8`, `i16`, `i32`, `i64`
    Signed(u16),
}

impl FfiType {
    /// Parse a Zig type token.
    ///
    /// Optional markers (`?`) are removed before classification; nullability
    /// is not represented in the generated bindings.
    pub fn parse(token: &str) -> Result<Self, BindingError> {
        let stripped: String = token.chars().filter(|&c| c != '?').collect();

        let ty = match stripped.as_str() {
            "[*c]const u8" | "[*:0]const u8" => FfiType::CString,
            "*anyopaque" => FfiType::OpaquePointer,
            "void" => FfiType::Void,
            "c_int" => FfiType::CInt,
            other => parse_fixed_int(other).ok_or_else(|| BindingError::unknown_type(token))?,
        };

        Ok(ty)
    }

    /// The `dart:ffi` native type used in `...Native` typedefs.
    pub fn dart_native(&self) -> String {
        match self {
            FfiType::CString => "Pointer<Utf8>".to_string(),
            FfiType::OpaquePointer => "Pointer<Void>".to_string(),
            FfiType::Void => "Void".to_string(),
            FfiType::CInt => "Int".to_string(),
            FfiType::Unsigned(bits) => format!("Uint{}", bits),
            FfiType::Signed(bits) => format!("Int{}", bits),
        }
    }

    /// The Dart type used in the callable typedefs.
    pub fn dart(&self) -> &'static str {
        match self {
            FfiType::CString => "Pointer<Utf8>",
            FfiType::OpaquePointer => "Pointer<Void>",
            FfiType::Void => "void",
            FfiType::CInt | FfiType::Unsigned(_) | FfiType::Signed(_) => "int",
        }
    }

    /// Whether this is an integer type of any width.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FfiType::CInt | FfiType::Unsigned(_) | FfiType::Signed(_)
        )
    }
}

impl fmt::Display for FfiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiType::CString => write!(f, "c-string"),
            FfiType::OpaquePointer => write!(f, "opaque pointer"),
            FfiType::Void => write!(f, "void"),
            FfiType::CInt => write!(f, "c_int"),
            FfiType::Unsigned(bits) => write!(f, "u{}", bits),
            FfiType::Signed(bits) => write!(f, "i{}", bits),
        }
    }
}

/// Parse `u<N>` / `i<N>` where `N` is a width `dart:ffi` supports.
fn parse_fixed_int(s: &str) -> Option<FfiType> {
    let (signed, digits) = if let Some(d) = s.strip_prefix('i') {
        (true, d)
    } else if let Some(d) = s.strip_prefix('u') {
        (false, d)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let bits: u16 = digits.parse().ok()?;
    if !INT_WIDTHS.contains(&bits) {
        return None;
    }

    Some(if signed {
        FfiType::Signed(bits)
    } else {
        FfiType::Unsigned(bits)
    })
}

/// Map a Zig type token to its `dart:ffi` native type name.
pub fn native_type(token: &str) -> Result<String, BindingError> {
    FfiType::parse(token).map(|t| t.dart_native())
}

/// Map a Zig type token to its Dart type name.
pub fn high_level_type(token: &str) -> Result<&'static str, BindingError> {
    FfiType::parse(token).map(|t| t.dart())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_maps_to_both_representations() {
        let cases = [
            ("[*c]const u8", "Pointer<Utf8>", "Pointer<Utf8>"),
            ("[*:0]const u8", "Pointer<Utf8>", "Pointer<Utf8>"),
            ("*anyopaque", "Pointer<Void>", "Pointer<Void>"),
            ("void", "Void", "void"),
            ("c_int", "Int", "int"),
            ("u8", "Uint8", "int"),
            ("u16", "Uint16", "int"),
            ("u32", "Uint32", "int"),
            ("u64", "Uint64", "int"),
            ("i8", "Int8", "int"),
            ("i16", "Int16", "int"),
            ("i32", "Int32", "int"),
            ("i64", "Int64", "int"),
        ];

        for (token, native, dart) in cases {
            assert_eq!(native_type(token).unwrap(), native, "native for {}", token);
            assert_eq!(high_level_type(token).unwrap(), dart, "dart for {}", token);
        }
    }

    #[test]
    fn test_optional_marker_is_ignored() {
        assert_eq!(native_type("u8?").unwrap(), native_type("u8").unwrap());
        assert_eq!(
            native_type("?*anyopaque").unwrap(),
            native_type("*anyopaque").unwrap()
        );
        assert_eq!(
            high_level_type("?[*:0]const u8").unwrap(),
            high_level_type("[*:0]const u8").unwrap()
        );
    }

    #[test]
    fn test_tokens_outside_grammar_fail() {
        for token in ["f32", "bool", "usize", "u7", "u128", "i", "u", "[]const u8", "*u8", ""] {
            assert!(native_type(token).is_err(), "native accepted {:?}", token);
            assert!(high_level_type(token).is_err(), "dart accepted {:?}", token);
        }
    }

    #[test]
    fn test_unknown_type_names_token() {
        let err = FfiType::parse("f32").unwrap_err();
        assert!(err.to_string().contains("f32"));
    }

    #[test]
    fn test_classify_reports_owning_function() {
        let sig = FunctionSignature::new("rr_scale", TypeToken::new("void"))
            .with_arg(TypeToken::new("u32"))
            .with_arg(TypeToken::at("f32", Span::new(40, 3)));

        let err = sig.classify().unwrap_err();
        match err {
            BindingError::UnknownType {
                token,
                function,
                span,
                ..
            } => {
                assert_eq!(token, "f32");
                assert_eq!(function.as_deref(), Some("rr_scale"));
                assert_eq!(span, Some(Span::new(40, 3).into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signature_serializes_token_text() {
        let sig = FunctionSignature::new("rr_start", TypeToken::new("*anyopaque"))
            .with_arg(TypeToken::new("[*c]const u8"));
        let json = serde_json::to_value(&sig).unwrap();

        assert_eq!(json["name"], "rr_start");
        assert_eq!(json["args"][0], "[*c]const u8");
        assert_eq!(json["return_type"], "*anyopaque");
        assert!(json.get("span").is_none());
    }
}
