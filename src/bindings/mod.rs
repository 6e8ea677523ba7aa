//! FFI binding generation from Zig exports.
//!
//! This module scans Zig source for exported functions and generates
//! Dart `dart:ffi` bindings that load them from a dynamic library.

pub mod dart;
pub mod errors;
pub mod naming;
pub mod parser;
pub mod types;

pub use dart::DartGenerator;
pub use errors::BindingError;
pub use naming::{to_lower_camel, to_upper_camel, DartNames};
pub use parser::ExportParser;
pub use types::{high_level_type, native_type, FfiType, FunctionSignature, Span, TypeToken};
