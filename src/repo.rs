//! Helm repository declarations
//!
//! Repositories are declared as `name=url` strings, optionally wrapped in a
//! quoted literal, e.g. `"stable=https://charts.helm.sh/stable"`.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static REPO_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9_-]+)=(?P<url>(?:http|https)://[A-Za-z0-9_\-./:]+)")
        .expect("repository pattern is valid")
});

/// A parsed `name=url` repository declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDeclaration {
    pub name: String,
    pub url: String,
}

impl std::str::FromStr for RepositoryDeclaration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse a repository declaration.
///
/// The input is unquoted first (see [`unquote`]). Only the leading
/// `name=scheme://...` portion has to match; the URL stops at the first
/// character outside `[\w\-./:]`. The URL is not otherwise validated.
pub fn parse(spec: &str) -> Result<RepositoryDeclaration> {
    let unquoted = unquote(spec);
    let caps = REPO_SPEC.captures(&unquoted).ok_or_else(|| Error::Parse {
        input: unquoted.clone(),
    })?;

    Ok(RepositoryDeclaration {
        name: caps["name"].to_string(),
        url: caps["url"].to_string(),
    })
}

/// Strip one layer of quoting from a quoted literal.
///
/// Accepts double-quoted strings with backslash escapes, single-quoted
/// single characters and backtick raw strings. Anything that is not a valid
/// quoted literal is returned unchanged.
///
/// The result must be valid UTF-8, so a literal whose `\xHH` or octal
/// escapes spell out invalid UTF-8 (e.g. `"a\xffb"`) is also returned
/// unchanged, quotes included.
pub fn unquote(s: &str) -> String {
    try_unquote(s).unwrap_or_else(|| s.to_string())
}

fn try_unquote(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let quote = bytes[0];
    if bytes[bytes.len() - 1] != quote {
        return None;
    }
    let inner = &s[1..s.len() - 1];

    match quote {
        b'`' => {
            if inner.contains('`') {
                return None;
            }
            Some(inner.replace('\r', ""))
        }
        b'"' | b'\'' => {
            if inner.contains('\n') {
                return None;
            }
            let unescaped = unescape(inner, quote as char)?;
            if quote == b'\'' && unescaped.chars().count() != 1 {
                return None;
            }
            Some(unescaped)
        }
        _ => None,
    }
}

fn unescape(inner: &str, quote: char) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == quote {
            return None;
        }
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let escaped = chars.next()?;
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '\'' | '"' if escaped == quote => Some(escaped as u8),
            _ => None,
        };
        if let Some(byte) = simple {
            out.push(byte);
            continue;
        }

        match escaped {
            'x' => out.push(u8::from_str_radix(&take(&mut chars, 2)?, 16).ok()?),
            '0'..='7' => {
                let digits = format!("{}{}", escaped, take(&mut chars, 2)?);
                let value = u32::from_str_radix(&digits, 8).ok()?;
                out.push(u8::try_from(value).ok()?);
            }
            'u' | 'U' => {
                let width = if escaped == 'u' { 4 } else { 8 };
                let code = u32::from_str_radix(&take(&mut chars, width)?, 16).ok()?;
                let ch = char::from_u32(code)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            _ => return None,
        }
    }

    String::from_utf8(out).ok()
}

fn take(chars: &mut std::str::Chars<'_>, n: usize) -> Option<String> {
    let taken: String = chars.by_ref().take(n).collect();
    (taken.chars().count() == n).then_some(taken)
}
