//! Implementation of `dartbind inspect`.

use std::fmt::Write as _;

use serde::Serialize;

use crate::bindings::{DartNames, FfiType, FunctionSignature, TypeToken};
use crate::ops::generate::{extract, GenerateError, GenerateOptions};

/// How one type token maps to Dart, if it maps at all.
#[derive(Debug, Clone, Serialize)]
pub struct TypeReport {
    pub zig: String,
    pub native: Option<String>,
    pub dart: Option<String>,
}

impl TypeReport {
    fn new(token: &TypeToken) -> Self {
        let mapped = FfiType::parse(&token.text).ok();
        TypeReport {
            zig: token.text.clone(),
            native: mapped.map(|t| t.dart_native()),
            dart: mapped.map(|t| t.dart().to_string()),
        }
    }

    fn supported(&self) -> bool {
        self.native.is_some()
    }
}

/// One extracted export and the identifiers it would generate.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub name: String,
    pub alias: String,
    pub field: String,
    pub args: Vec<TypeReport>,
    pub return_type: TypeReport,
}

impl ExportReport {
    fn new(sig: &FunctionSignature, prefix: &str) -> Self {
        let names = DartNames::derive(&sig.name, prefix);
        ExportReport {
            name: sig.name.clone(),
            alias: names.alias,
            field: names.field,
            args: sig.args.iter().map(TypeReport::new).collect(),
            return_type: TypeReport::new(&sig.return_type),
        }
    }

    /// Whether every type in the signature is supported.
    pub fn supported(&self) -> bool {
        self.return_type.supported() && self.args.iter().all(TypeReport::supported)
    }
}

/// Extract the exports of the input file without generating bindings.
///
/// Unsupported types are reported rather than treated as errors.
pub fn inspect(opts: &GenerateOptions) -> Result<Vec<ExportReport>, GenerateError> {
    let (_, functions) = extract(opts)?;
    Ok(functions
        .iter()
        .map(|sig| ExportReport::new(sig, &opts.prefix))
        .collect())
}

/// Format export reports for display (human-readable).
pub fn format_reports(reports: &[ExportReport]) -> String {
    let mut output = String::new();

    if reports.is_empty() {
        writeln!(output, "No exports found.").unwrap();
        return output;
    }

    for report in reports {
        let status = if report.supported() { "[OK]" } else { "[UNSUPPORTED]" };
        let args: Vec<&str> = report.args.iter().map(|a| a.zig.as_str()).collect();
        writeln!(
            output,
            "{} {}({}) {}",
            status,
            report.name,
            args.join(", "),
            report.return_type.zig
        )
        .unwrap();
        writeln!(output, "      typedef {} / field {}", report.alias, report.field).unwrap();

        for ty in report.args.iter().chain(std::iter::once(&report.return_type)) {
            if !ty.supported() {
                writeln!(output, "      unsupported type: {}", ty.zig).unwrap();
            }
        }
    }

    let unsupported = reports.iter().filter(|r| !r.supported()).count();
    writeln!(output).unwrap();
    writeln!(
        output,
        "{} exports, {} unsupported",
        reports.len(),
        unsupported
    )
    .unwrap();

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::ExportParser;

    fn report(source: &str) -> Vec<ExportReport> {
        ExportParser::new()
            .parse_content(source)
            .iter()
            .map(|sig| ExportReport::new(sig, "rr"))
            .collect()
    }

    #[test]
    fn test_report_maps_types() {
        let reports = report("export fn rr_start(path: [*c]const u8, len: c_int) *anyopaque {}");
        assert_eq!(reports.len(), 1);

        let r = &reports[0];
        assert!(r.supported());
        assert_eq!(r.alias, "RRStart");
        assert_eq!(r.field, "rrStart");
        assert_eq!(r.args[1].native.as_deref(), Some("Int"));
        assert_eq!(r.args[1].dart.as_deref(), Some("int"));
        assert_eq!(r.return_type.native.as_deref(), Some("Pointer<Void>"));
    }

    #[test]
    fn test_report_flags_unsupported() {
        let reports = report("export fn rr_scale(x: f32) void {}");
        assert!(!reports[0].supported());

        let text = format_reports(&reports);
        assert!(text.contains("[UNSUPPORTED] rr_scale(f32) void"));
        assert!(text.contains("unsupported type: f32"));
        assert!(text.contains("1 exports, 1 unsupported"));
    }

    #[test]
    fn test_report_json_shape() {
        let reports = report("export fn rr_tick(dt: u64) void {}");
        let json = serde_json::to_value(&reports).unwrap();

        assert_eq!(json[0]["name"], "rr_tick");
        assert_eq!(json[0]["args"][0]["zig"], "u64");
        assert_eq!(json[0]["args"][0]["native"], "Uint64");
        assert_eq!(json[0]["return_type"]["dart"], "void");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_reports(&[]), "No exports found.\n");
    }
}
