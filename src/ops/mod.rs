//! High-level operations.
//!
//! This module contains the implementation of dartbind commands.

pub mod format;
pub mod generate;
pub mod inspect;

pub use format::{DartFormat, FormatError, Passthrough, SourceFormatter};
pub use generate::{generate, GenerateError, GenerateOptions};
pub use inspect::{format_reports, inspect, ExportReport};
