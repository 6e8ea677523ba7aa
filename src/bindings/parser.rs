//! Zig export scanner for FFI binding generation.
//!
//! Scans Zig source for `export fn` declarations carrying a namespace prefix
//! and extracts each one's name, parameter types and return type. This is a
//! top-level pattern scan over a fixed declaration shape, not a Zig parser:
//!
//! ```text
//! export fn <prefix>_<name>(<ident>: <type>, ...) <type> {
//! ```
//!
//! Declarations that do not fit the shape are skipped. Type tokens are
//! captured verbatim; whether they are supported is decided later, when the
//! bindings are generated.

use super::types::{FunctionSignature, Span, TypeToken};

/// Default namespace prefix for exported symbols.
pub const DEFAULT_PREFIX: &str = "rr";

/// Attributes that may sit between the parameter list and the return type.
const HEADER_ATTRIBUTES: &[&str] = &["callconv", "align", "linksection", "addrspace"];

/// Qualifiers that may precede a parameter name.
const PARAM_QUALIFIERS: &[&str] = &["noalias", "comptime"];

/// Scanner for exported function declarations.
#[derive(Debug, Clone)]
pub struct ExportParser {
    /// Symbols must start with `<prefix>_`
    prefix: String,
}

impl Default for ExportParser {
    fn default() -> Self {
        ExportParser {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl ExportParser {
    /// Create a parser using the default prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Extract every matching declaration, in source order.
    pub fn parse_content(&self, content: &str) -> Vec<FunctionSignature> {
        let text = blank_comments_and_literals(content);
        let mut functions = Vec::new();
        let mut from = 0;

        while let Some(rel) = text[from..].find("export") {
            let start = from + rel;
            from = start + "export".len();

            if !is_word_start(&text, start) {
                continue;
            }

            match self.parse_declaration(&text, start) {
                Ok((sig, end)) => {
                    tracing::debug!("found export `{}` ({} params)", sig.name, sig.args.len());
                    functions.push(sig);
                    from = end;
                }
                Err(Skip::NotFunction) => {}
                Err(Skip::Malformed(reason)) => {
                    tracing::debug!("skipping export at byte {}: {}", start, reason);
                }
            }
        }

        functions
    }

    /// Parse one declaration starting at the `export` keyword.
    ///
    /// Returns the signature and the byte offset just past the opening `{`.
    fn parse_declaration(
        &self,
        text: &str,
        start: usize,
    ) -> Result<(FunctionSignature, usize), Skip> {
        let mut cur = Cursor::new(text, start + "export".len());

        if cur.skip_ws() == 0 || !cur.eat("fn") || cur.skip_ws() == 0 {
            return Err(Skip::NotFunction);
        }

        let (name_at, name) = cur.ident().ok_or(Skip::Malformed("missing function name"))?;
        let has_prefix = name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|rest| !rest.is_empty());
        if !has_prefix {
            return Err(Skip::Malformed("name lacks the namespace prefix"));
        }

        cur.skip_ws();
        if !cur.eat("(") {
            return Err(Skip::Malformed("expected `(` after name"));
        }

        let params_start = cur.pos;
        let params_end = find_closing_paren(text, params_start)
            .ok_or(Skip::Malformed("unterminated parameter list"))?;
        let args = parse_params(text, params_start, params_end)?;

        cur.pos = params_end + 1;
        cur.skip_ws();
        while HEADER_ATTRIBUTES.iter().any(|attr| cur.keyword(attr)) {
            cur.skip_ws();
            if !cur.eat("(") {
                return Err(Skip::Malformed("expected `(` after attribute"));
            }
            let close = find_closing_paren(text, cur.pos)
                .ok_or(Skip::Malformed("unterminated attribute"))?;
            cur.pos = close + 1;
            cur.skip_ws();
        }

        let ret_start = cur.pos;
        let brace = text[ret_start..]
            .find(['{', ';', '}', '='])
            .map(|i| ret_start + i)
            .filter(|&i| text.as_bytes()[i] == b'{')
            .ok_or(Skip::Malformed("expected return type followed by `{`"))?;
        let return_type = token_in(text, ret_start, brace)
            .ok_or(Skip::Malformed("missing return type"))?;

        let mut sig = FunctionSignature::new(name, return_type);
        sig.args = args;
        sig.span = Span::new(name_at, name.len());

        Ok((sig, brace + 1))
    }
}

/// Why a candidate `export` was not extracted.
#[derive(Debug)]
enum Skip {
    /// `export` of something other than a function
    NotFunction,
    /// An `export fn` that does not fit the declaration shape
    Malformed(&'static str),
}

/// Byte cursor over the scanned text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Cursor { text, pos }
    }

    /// Skip whitespace, returning how many bytes were skipped.
    fn skip_ws(&mut self) -> usize {
        let rest = &self.text[self.pos..];
        let n = rest.len() - rest.trim_start().len();
        self.pos += n;
        n
    }

    fn eat(&mut self, lit: &str) -> bool {
        if self.text[self.pos..].starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Consume `word` if it appears here as a whole identifier.
    fn keyword(&mut self, word: &str) -> bool {
        let rest = &self.text[self.pos..];
        if rest.starts_with(word) && ident_len(rest) == word.len() {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Consume `[A-Za-z0-9_]+`, returning its offset and text.
    fn ident(&mut self) -> Option<(usize, &'a str)> {
        let start = self.pos;
        let len = ident_len(&self.text[start..]);
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some((start, &self.text[start..start + len]))
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn ident_len(s: &str) -> usize {
    s.bytes().take_while(|&b| is_ident_byte(b)).count()
}

fn is_word_start(text: &str, at: usize) -> bool {
    at == 0 || !is_ident_byte(text.as_bytes()[at - 1])
}

/// Find the `)` closing a list that opens just before `from`.
///
/// Nested `()` and `[]` are skipped.
fn find_closing_paren(text: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(from) {
        match b {
            b'(' | b'[' => depth += 1,
            b']' => depth = depth.checked_sub(1)?,
            b')' if depth == 0 => return Some(i),
            b')' => depth -= 1,
            b'{' | b';' => return None,
            _ => {}
        }
    }
    None
}

/// Split `text[start..end]` at top-level commas, yielding byte ranges.
fn split_top_level(text: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = start;

    for (i, b) in text[start..end].bytes().enumerate() {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                pieces.push((piece_start, start + i));
                piece_start = start + i + 1;
            }
            _ => {}
        }
    }
    pieces.push((piece_start, end));
    pieces
}

/// Parse `name: Type, ...`, keeping only the types.
fn parse_params(text: &str, start: usize, end: usize) -> Result<Vec<TypeToken>, Skip> {
    let pieces = split_top_level(text, start, end);
    let last = pieces.len() - 1;
    let mut types = Vec::new();

    for (i, &(p_start, p_end)) in pieces.iter().enumerate() {
        let piece = &text[p_start..p_end];
        if piece.trim().is_empty() {
            // An empty list, or a trailing comma
            if i == last {
                continue;
            }
            return Err(Skip::Malformed("empty parameter"));
        }

        let mut cur = Cursor::new(text, p_start);
        cur.skip_ws();
        while PARAM_QUALIFIERS.iter().any(|q| cur.keyword(q)) {
            cur.skip_ws();
        }
        if cur.ident().is_none() {
            return Err(Skip::Malformed("parameter without a name"));
        }
        cur.skip_ws();
        if !cur.eat(":") {
            return Err(Skip::Malformed("parameter without a type"));
        }

        let ty = token_in(text, cur.pos, p_end).ok_or(Skip::Malformed("empty parameter type"))?;
        types.push(ty);
    }

    Ok(types)
}

/// The trimmed text of `text[start..end]` as a type token, if non-empty.
fn token_in(text: &str, start: usize, end: usize) -> Option<TypeToken> {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let offset = start + (raw.len() - raw.trim_start().len());
    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");

    Some(TypeToken::at(collapsed, Span::new(offset, trimmed.len())))
}

/// Replace comments and string/char literal contents with spaces.
///
/// Byte offsets are preserved so spans still point into the input text.
/// Zig multiline string lines (`\\...`) are blanked like comments.
fn blank_comments_and_literals(content: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        Str,
        Char,
    }

    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut chars = content.chars().peekable();

    let blank = |c: char, out: &mut String| {
        for _ in 0..c.len_utf8() {
            out.push(' ');
        }
    };

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    state = State::LineComment;
                    blank(c, &mut out);
                }
                '\\' if chars.peek() == Some(&'\\') => {
                    state = State::LineComment;
                    blank(c, &mut out);
                }
                '"' => {
                    state = State::Str;
                    out.push(c);
                }
                '\'' => {
                    state = State::Char;
                    out.push(c);
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(c, &mut out);
                }
            }
            State::Str | State::Char => {
                let close = if state == State::Str { '"' } else { '\'' };
                if c == '\\' {
                    blank(c, &mut out);
                    if let Some(escaped) = chars.next() {
                        if escaped == '\n' {
                            state = State::Code;
                            out.push(escaped);
                        } else {
                            blank(escaped, &mut out);
                        }
                    }
                } else if c == close || c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(c, &mut out);
                }
            }
        }
    }

    out
}
