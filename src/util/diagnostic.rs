//! User-facing error rendering.
//!
//! Library errors implement [`miette::Diagnostic`]; this module turns them
//! into terminal text, with a labelled source snippet when the error carries
//! one.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

/// Render a diagnostic for terminal output.
pub fn render(diagnostic: &dyn Diagnostic, color: bool) -> String {
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };

    let mut output = String::new();
    let handler = GraphicalReportHandler::new_themed(theme);
    if handler.render_report(&mut output, diagnostic).is_err() {
        // Fall back to the plain message
        output = format!("error: {}\n", diagnostic);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{BindingError, Span};

    #[test]
    fn test_render_unknown_type_with_snippet() {
        let source = "export fn rr_scale(x: f32) void {}";
        let err = BindingError::unknown_type("f32")
            .in_function("rr_scale")
            .with_span(Span::new(22, 3))
            .with_source("main.zig", source);

        let output = render(&err, false);
        assert!(output.contains("unsupported FFI type `f32` in `rr_scale`"));
        assert!(output.contains("main.zig"));
        assert!(output.contains("not a supported FFI type"));
        assert!(output.contains("dartbind::bindings::unknown_type"));
    }

    #[test]
    fn test_render_without_source() {
        let err = BindingError::MissingBootstrap {
            symbol: "rr_start".to_string(),
        };

        let output = render(&err, false);
        assert!(output.contains("no bootstrap export `rr_start` found"));
    }
}
