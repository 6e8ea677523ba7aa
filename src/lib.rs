//! dartbind - Dart FFI bindings from Zig exports
//!
//! This crate scans a Zig source file for `export fn` declarations carrying a
//! namespace prefix, maps their types onto `dart:ffi`, and generates a Dart
//! module that resolves every export from a `DynamicLibrary`.

pub mod bindings;
pub mod ops;
pub mod util;

pub use bindings::{BindingError, DartGenerator, ExportParser, FfiType, FunctionSignature};
pub use ops::generate::{generate, GenerateError, GenerateOptions};
pub use util::config::Config;
