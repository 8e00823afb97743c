//! Canonical relative path handling.
//!
//! Every path that leaves the walker is a root-relative, forward-slash
//! separated string with no leading `./`. This module produces those strings
//! and defines the order they are reported in.

use std::cmp::Ordering;
use std::path::{Component, Path};

/// Normalize a relative path string to canonical POSIX form.
///
/// Backslashes become `/`, leading `./` segments are stripped, repeated
/// separators collapse and a trailing separator is dropped.
pub fn normalize_path_str(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut out = String::with_capacity(unified.len());

    for segment in unified.split('/') {
        if segment.is_empty() || (segment == "." && out.is_empty()) {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }

    out
}

/// Express `path` relative to `root` as a canonical POSIX string.
///
/// Returns `None` when `path` is not located under `root` or when one of
/// its components is not valid UTF-8. The root itself maps to the empty
/// string.
pub fn relative_posix(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}

/// Order two relative paths the way discovery reports them.
///
/// Runs of ASCII digits compare by numeric value and other characters
/// compare case-insensitively, so `src/file2.ts` sorts before
/// `src/File10.ts`. Paths that are equal under those rules fall back to
/// plain byte order, which keeps the ordering total.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let mut left = tokens(a);
    let mut right = tokens(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_tokens(&x, &y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Number(&'a str),
    Char(char),
}

fn tokens(s: &str) -> impl Iterator<Item = Token<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        if c.is_ascii_digit() {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let (digits, tail) = rest.split_at(end);
            rest = tail;
            Some(Token::Number(digits))
        } else {
            rest = &rest[c.len_utf8()..];
            Some(Token::Char(c))
        }
    })
}

fn compare_tokens(a: &Token<'_>, b: &Token<'_>) -> Ordering {
    match (a, b) {
        (Token::Number(x), Token::Number(y)) => compare_numeric(x, y),
        (Token::Char(x), Token::Char(y)) => fold(*x).cmp(&fold(*y)),
        // A digit run against a single character: compare its leading digit.
        (Token::Number(x), Token::Char(y)) => leading_digit(x).cmp(&fold(*y)),
        (Token::Char(x), Token::Number(y)) => fold(*x).cmp(&leading_digit(y)),
    }
}

fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

fn leading_digit(digits: &str) -> char {
    digits.chars().next().unwrap_or('0')
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
