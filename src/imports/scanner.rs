//! Import specifier scanner.
//!
//! Walks TypeScript/TSX source byte by byte, skipping comments, string
//! literals and template literals, and reports every module specifier that
//! appears in an `import` or `export ... from` statement together with its
//! byte span. The spans let the rewriter replace only the quoted text and
//! keep the rest of the statement untouched.
//!
//! Known blind spot: regular expression literals are not recognised, so a
//! quote character inside one may hide the rest of that line.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from "spec"`, `import { a } from "spec"`, `import type ...`
    Static,
    /// `import "spec"`
    SideEffect,
    /// `export { a } from "spec"`, `export * from "spec"`
    ReExport,
    /// `import("spec")`
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub specifier: String,
    /// Byte range of the specifier inside the source, quotes excluded.
    pub span: Range<usize>,
    pub kind: ImportKind,
}

/// Scan source text for import sites in order of appearance.
pub fn scan_import_sites(source: &str) -> Vec<ImportSite> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut sites = Vec::new();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if peek(bytes, i + 1) == Some(b'/') || peek(bytes, i + 1) == Some(b'*') => {
                i = skip_comment(bytes, i);
            }
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b if is_ident_byte(b) => {
                let end = ident_end(bytes, i);
                let member = i > 0 && bytes[i - 1] == b'.';
                let parsed = match &bytes[i..end] {
                    b"import" if !member => parse_import(bytes, end),
                    b"export" if !member => parse_export(bytes, end),
                    _ => None,
                };
                match parsed {
                    Some((span, kind, next)) => {
                        sites.push(ImportSite {
                            specifier: source[span.clone()].to_string(),
                            span,
                            kind,
                        });
                        i = next;
                    }
                    None => i = end,
                }
            }
            _ => i += 1,
        }
    }

    sites
}

/// Distinct specifiers of a source file in first-appearance order.
pub fn extract_specifiers(source: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    scan_import_sites(source)
        .into_iter()
        .filter_map(|site| {
            if seen.insert(site.specifier.clone()) {
                Some(site.specifier)
            } else {
                None
            }
        })
        .collect()
}

type Parsed = (Range<usize>, ImportKind, usize);

/// Parse what follows the `import` keyword.
fn parse_import(bytes: &[u8], start: usize) -> Option<Parsed> {
    let i = skip_trivia(bytes, start);
    match peek(bytes, i)? {
        b'"' | b'\'' => {
            let (span, next) = read_string(bytes, i)?;
            Some((span, ImportKind::SideEffect, next))
        }
        b'(' => {
            let j = skip_trivia(bytes, i + 1);
            let (span, next) = read_string(bytes, j)?;
            let k = skip_trivia(bytes, next);
            match peek(bytes, k)? {
                b')' | b',' => Some((span, ImportKind::Dynamic, next)),
                _ => None,
            }
        }
        // import.meta
        b'.' => None,
        _ => {
            let (span, next) = parse_clause(bytes, i)?;
            Some((span, ImportKind::Static, next))
        }
    }
}

/// Parse what follows the `export` keyword; only re-exports carry a specifier.
fn parse_export(bytes: &[u8], start: usize) -> Option<Parsed> {
    let mut i = skip_trivia(bytes, start);
    if peek(bytes, i).is_some_and(is_ident_byte) {
        let end = ident_end(bytes, i);
        if &bytes[i..end] != b"type" {
            return None;
        }
        i = skip_trivia(bytes, end);
    }
    match peek(bytes, i)? {
        b'{' | b'*' => {
            let (span, next) = parse_clause(bytes, i)?;
            Some((span, ImportKind::ReExport, next))
        }
        _ => None,
    }
}

/// Walk an import/export clause up to `from "<spec>"`.
///
/// The clause may span any number of lines. Gives up on any token that
/// cannot appear in a clause (`;`, `=`, `(` ...) or on a new statement
/// keyword.
fn parse_clause(bytes: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    let mut i = start;
    loop {
        i = skip_trivia(bytes, i);
        match peek(bytes, i)? {
            b'{' => {
                i = skip_braced(bytes, i + 1);
                if i >= bytes.len() {
                    return None;
                }
            }
            b'*' | b',' => i += 1,
            b if is_ident_byte(b) => {
                let end = ident_end(bytes, i);
                match &bytes[i..end] {
                    b"from" => {
                        let j = skip_trivia(bytes, end);
                        if matches!(peek(bytes, j), Some(b'"' | b'\'')) {
                            return read_string(bytes, j);
                        }
                    }
                    b"import" | b"export" => return None,
                    _ => {}
                }
                i = end;
            }
            _ => return None,
        }
    }
}

/// Read a single- or double-quoted string starting at `start`.
/// Returns the content span and the index just past the closing quote.
fn read_string(bytes: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    let quote = peek(bytes, start)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some((start + 1..i, i + 1)),
            _ => i += 1,
        }
    }
    None
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            // unterminated: stop at end of line
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_template(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if peek(bytes, i + 1) == Some(b'{') => i = skip_braced(bytes, i + 2),
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip code up to and including the `}` that closes an already-open brace.
fn skip_braced(bytes: &[u8], start: usize) -> usize {
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'/' if peek(bytes, i + 1) == Some(b'/') || peek(bytes, i + 1) == Some(b'*') => {
                i = skip_comment(bytes, i);
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip a `//` or `/* */` comment starting at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> usize {
    if peek(bytes, start + 1) == Some(b'/') {
        let mut i = start + 2;
        while i < bytes.len() && bytes[i] != b'\n' {
            i += 1;
        }
        i
    } else {
        let mut i = start + 2;
        while i + 1 < bytes.len() {
            if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                return i + 2;
            }
            i += 1;
        }
        bytes.len()
    }
}

/// Skip whitespace and comments.
fn skip_trivia(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b'/' if peek(bytes, i + 1) == Some(b'/') || peek(bytes, i + 1) == Some(b'*') => {
                i = skip_comment(bytes, i);
            }
            _ => break,
        }
    }
    i
}

fn peek(bytes: &[u8], i: usize) -> Option<u8> {
    bytes.get(i).copied()
}

// Non-ASCII bytes count as identifier bytes so multi-byte characters are
// never split.
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn ident_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    i
}
