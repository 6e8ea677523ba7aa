//! Dart binding generator.
//!
//! Generates a `dart:ffi` module from extracted export signatures: a pair of
//! typedefs per export, and a state class that resolves every export from a
//! `DynamicLibrary` and calls the bootstrap export to obtain a context handle.

use std::collections::HashMap;
use std::fmt::Write as _;

use super::errors::BindingError;
use super::naming::{to_upper_camel, DartNames};
use super::parser::DEFAULT_PREFIX;
use super::types::{FfiType, FunctionSignature};

/// Default name of the generated state class.
pub const DEFAULT_CLASS_NAME: &str = "ActiveAppState";

/// Default name of the caller-supplied configuration string field.
pub const DEFAULT_CONFIG_FIELD: &str = "dataPath";

/// Default suffix of the bootstrap export (`<prefix>_start`).
pub const DEFAULT_BOOTSTRAP: &str = "start";

/// Dart reserved words, which cannot name a class or field.
const DART_RESERVED: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with",
];

const HEADER: &str = "import 'dart:developer';
import 'dart:ffi';

import 'package:ffi/ffi.dart';

";

/// One export with its resolved types and identifiers.
struct Binding<'a> {
    sig: &'a FunctionSignature,
    names: DartNames,
    args: Vec<FfiType>,
    ret: FfiType,
}

/// Generator for Dart FFI bindings.
#[derive(Debug, Clone)]
pub struct DartGenerator {
    /// Namespace prefix of the exports
    prefix: String,

    /// Name of the generated state class
    class_name: String,

    /// Name of the configuration string field passed to the bootstrap export
    config_field: String,

    /// Bootstrap export suffix
    bootstrap: String,

    /// Name of the field holding the bootstrap result
    context_field: String,
}

impl Default for DartGenerator {
    fn default() -> Self {
        DartGenerator {
            prefix: DEFAULT_PREFIX.to_string(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            config_field: DEFAULT_CONFIG_FIELD.to_string(),
            bootstrap: DEFAULT_BOOTSTRAP.to_string(),
            context_field: "ctx".to_string(),
        }
    }
}

impl DartGenerator {
    /// Create a generator with the default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the state class name.
    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    /// Set the configuration string field name.
    pub fn with_config_field(mut self, name: impl Into<String>) -> Self {
        self.config_field = name.into();
        self
    }

    /// Set the bootstrap export suffix.
    pub fn with_bootstrap(mut self, suffix: impl Into<String>) -> Self {
        self.bootstrap = suffix.into();
        self
    }

    /// Full symbol name of the bootstrap export.
    pub fn bootstrap_symbol(&self) -> String {
        format!("{}_{}", self.prefix, self.bootstrap)
    }

    /// Generate the Dart module.
    ///
    /// Fails before producing any text if a type is unsupported, the
    /// bootstrap export is missing or mis-shaped, or two exports collide.
    pub fn generate(&self, functions: &[FunctionSignature]) -> Result<String, BindingError> {
        self.check_names()?;
        let bindings = self.resolve(functions)?;
        let bootstrap = self.find_bootstrap(&bindings)?;

        let mut output = String::from(HEADER);
        for b in &bindings {
            self.write_typedefs(&mut output, b);
        }
        self.write_class(&mut output, &bindings, bootstrap);

        tracing::info!(
            "generated {} bindings for `{}`",
            bindings.len(),
            self.class_name
        );

        Ok(output)
    }

    /// Check the class and configuration field names are usable in Dart.
    fn check_names(&self) -> Result<(), BindingError> {
        check_identifier(&self.class_name, CLASS_ROLE)?;
        check_identifier(&self.config_field, CONFIG_ROLE)?;

        if self.config_field == "lib" || self.config_field == self.context_field {
            return Err(invalid_name(
                &self.config_field,
                CONFIG_ROLE,
                "the generated class already has this member",
            ));
        }
        if self.config_field == self.class_name {
            return Err(invalid_name(&self.config_field, CONFIG_ROLE, "it matches the class name"));
        }
        Ok(())
    }

    /// Classify every signature and derive its identifiers.
    fn resolve<'a>(&self, functions: &'a [FunctionSignature]) -> Result<Vec<Binding<'a>>, BindingError> {
        let mut seen: HashMap<String, &'a str> = HashMap::new();
        let mut bindings = Vec::with_capacity(functions.len());

        for sig in functions {
            let (args, ret) = sig.classify()?;
            let names = DartNames::derive(&sig.name, &self.prefix);

            if names.field == self.config_field {
                return Err(invalid_name(
                    &self.config_field,
                    CONFIG_ROLE,
                    format!("export `{}` generates the same field", sig.name),
                ));
            }
            if names.alias == self.class_name || names.native_alias == self.class_name {
                return Err(invalid_name(
                    &self.class_name,
                    CLASS_ROLE,
                    format!("export `{}` generates the same typedef", sig.name),
                ));
            }

            for ident in [&names.alias, &names.native_alias, &names.field] {
                if let Some(first) = seen.insert(ident.clone(), sig.name.as_str()) {
                    return Err(BindingError::DuplicateIdentifier {
                        ident: ident.clone(),
                        first: first.to_string(),
                        second: sig.name.clone(),
                    });
                }
            }

            tracing::debug!("{} -> {} / {}", sig.name, names.alias, names.field);
            bindings.push(Binding {
                sig,
                names,
                args,
                ret,
            });
        }

        Ok(bindings)
    }

    /// Locate the bootstrap export and check it can be called with a string
    /// and its length, returning an opaque handle.
    fn find_bootstrap<'b, 'a>(&self, bindings: &'b [Binding<'a>]) -> Result<&'b Binding<'a>, BindingError> {
        let symbol = self.bootstrap_symbol();
        let b = bindings
            .iter()
            .find(|b| b.sig.name == symbol)
            .ok_or_else(|| BindingError::MissingBootstrap {
                symbol: symbol.clone(),
            })?;

        let shape_ok = matches!(
            b.args.as_slice(),
            [FfiType::CString, len] if len.is_integer()
        ) && b.ret == FfiType::OpaquePointer;

        if !shape_ok {
            let err = BindingError::BootstrapShape {
                symbol,
                args: b.sig.arg_types().join(", "),
                ret: b.sig.return_type.text.clone(),
                src: None,
                span: None,
            };
            return Err(err.with_span(b.sig.span));
        }

        Ok(b)
    }

    fn write_typedefs(&self, out: &mut String, b: &Binding<'_>) {
        let native_args: Vec<String> = b.args.iter().map(FfiType::dart_native).collect();
        let dart_args: Vec<&str> = b.args.iter().map(FfiType::dart).collect();

        writeln!(
            out,
            "typedef {} = {} Function({});",
            b.names.native_alias,
            b.ret.dart_native(),
            native_args.join(", ")
        )
        .unwrap();
        writeln!(
            out,
            "typedef {} = {} Function({});",
            b.names.alias,
            b.ret.dart(),
            dart_args.join(", ")
        )
        .unwrap();
    }

    fn write_class(&self, out: &mut String, bindings: &[Binding<'_>], bootstrap: &Binding<'_>) {
        let class = &self.class_name;
        let config = &self.config_field;
        let ctx = &self.context_field;

        writeln!(out).unwrap();
        writeln!(out, "class {} {{", class).unwrap();
        writeln!(out, "  final DynamicLibrary lib;").unwrap();
        writeln!(out, "  final String {};", config).unwrap();
        writeln!(out).unwrap();

        for b in bindings {
            writeln!(out, "  late final {} {};", b.names.alias, b.names.field).unwrap();
        }

        writeln!(out).unwrap();
        writeln!(out, "  late final Pointer<Void> {};", ctx).unwrap();
        writeln!(out).unwrap();
        writeln!(
            out,
            "  {}({{required this.lib, required this.{}}}) {{",
            class, config
        )
        .unwrap();

        for b in bindings {
            writeln!(
                out,
                "    {} = lib.lookupFunction<{}, {}>(\"{}\");",
                b.names.field, b.names.native_alias, b.names.alias, b.sig.name
            )
            .unwrap();
        }

        let native = format!("native{}", to_upper_camel(config));
        writeln!(out).unwrap();
        writeln!(out, "    final {} = {}.toNativeUtf8();", native, config).unwrap();
        writeln!(
            out,
            "    {} = {}({}, {}.length);",
            ctx, bootstrap.names.field, native, native
        )
        .unwrap();
        writeln!(out, "    if ({}.address == 0) {{", ctx).unwrap();
        writeln!(out, "      log('{} returned a null context');", bootstrap.sig.name).unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out, "  }}").unwrap();
        writeln!(out, "}}").unwrap();
    }
}

const CLASS_ROLE: &str = "class name";
const CONFIG_ROLE: &str = "configuration field";

fn invalid_name(name: &str, role: &'static str, reason: impl Into<String>) -> BindingError {
    BindingError::InvalidName {
        name: name.to_string(),
        role,
        reason: reason.into(),
    }
}

/// Require `[A-Za-z_][A-Za-z0-9_]*` that is not a reserved word.
fn check_identifier(name: &str, role: &'static str) -> Result<(), BindingError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(invalid_name(name, role, "it is not a Dart identifier"));
    }
    if DART_RESERVED.contains(&name) {
        return Err(invalid_name(name, role, "it is a reserved word"));
    }
    Ok(())
}
