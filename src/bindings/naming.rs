//! Identifier conventions for generated Dart code.
//!
//! The case transforms are pinned here rather than delegated to an
//! inflection library: the generated identifiers are part of the output
//! contract and must not drift between versions.

/// Capitalize a word: first character upper-case, the rest lower-case.
fn capitalize(word: &str, out: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.extend(chars.flat_map(char::to_lowercase));
    }
}

/// Rewrite every `_word` segment of `s` as `Word`.
///
/// A segment is the run of ASCII alphanumerics following an underscore.
/// Everything else is copied through unchanged.
fn join_segments(s: &str, out: &mut String) {
    let mut rest = s;
    while let Some(idx) = rest.find('_') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let end = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        capitalize(&after[..end], out);
        rest = &after[end..];
    }
    out.push_str(rest);
}

/// Convert to upper camel case.
///
/// A leading run of lower-case letters and digits is capitalized, then each
/// `_word` segment becomes `Word`. Leading upper-case text is preserved, so
/// `RR_start` becomes `RRStart`.
pub fn to_upper_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    let head_end = s
        .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .unwrap_or(s.len());
    capitalize(&s[..head_end], &mut out);

    join_segments(&s[head_end..], &mut out);
    out
}

/// Convert to lower camel case.
///
/// The first character is lower-cased, then each `_word` segment becomes
/// `Word`, so `rr_get_data_path` becomes `rrGetDataPath`.
pub fn to_lower_camel(s: &str) -> String {
    let mut chars = s.chars();
    let lowered: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => return String::new(),
    };

    let mut out = String::with_capacity(lowered.len());
    join_segments(&lowered, &mut out);
    out
}

/// Replace a leading `prefix` with its upper-case form.
fn upper_prefix(name: &str, prefix: &str) -> String {
    match name.strip_prefix(prefix) {
        Some(rest) => format!("{}{}", prefix.to_uppercase(), rest),
        None => name.to_string(),
    }
}

/// The Dart identifiers derived from one exported symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DartNames {
    /// Callable typedef, e.g. `RRStart`
    pub alias: String,

    /// Native typedef, e.g. `RRStartNative`
    pub native_alias: String,

    /// Class field, e.g. `rrStart`
    pub field: String,
}

impl DartNames {
    /// Derive the identifiers for `symbol`, whose namespace prefix is `prefix`.
    pub fn derive(symbol: &str, prefix: &str) -> Self {
        let alias = to_upper_camel(&upper_prefix(symbol, prefix));
        DartNames {
            native_alias: format!("{}Native", alias),
            alias,
            field: to_lower_camel(symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_camel() {
        assert_eq!(to_upper_camel("RR_start"), "RRStart");
        assert_eq!(to_upper_camel("RR_get_data_path"), "RRGetDataPath");
        assert_eq!(to_upper_camel("rr_start"), "RrStart");
        assert_eq!(to_upper_camel("active_app_state"), "ActiveAppState");
        assert_eq!(to_upper_camel("RR_getDATA"), "RRGetdata");
        assert_eq!(to_upper_camel("RR_v2_init"), "RRV2Init");
    }

    #[test]
    fn test_lower_camel() {
        assert_eq!(to_lower_camel("rr_start"), "rrStart");
        assert_eq!(to_lower_camel("rr_get_data_path"), "rrGetDataPath");
        assert_eq!(to_lower_camel("Data_path"), "dataPath");
        assert_eq!(to_lower_camel("rr_a__b"), "rrAB");
        assert_eq!(to_lower_camel(""), "");
    }

    #[test]
    fn test_derive_names() {
        let names = DartNames::derive("rr_start", "rr");
        assert_eq!(names.alias, "RRStart");
        assert_eq!(names.native_alias, "RRStartNative");
        assert_eq!(names.field, "rrStart");

        let names = DartNames::derive("rr_get_data_path", "rr");
        assert_eq!(names.alias, "RRGetDataPath");
        assert_eq!(names.native_alias, "RRGetDataPathNative");
        assert_eq!(names.field, "rrGetDataPath");
    }

    #[test]
    fn test_derive_names_custom_prefix() {
        let names = DartNames::derive("app_open_db", "app");
        assert_eq!(names.alias, "APPOpenDb");
        assert_eq!(names.field, "appOpenDb");
    }
}
