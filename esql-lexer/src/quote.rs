//! Quoted-literal preservation.
//!
//! Splits a raw query into a normalised scan string — lower-cased and
//! whitespace-collapsed outside quotes — and the list of quoted spans (with
//! their surrounding quote characters and original casing intact), keyed by
//! the placeholder that stands in for them in the scan string.

use std::iter::Peekable;
use std::str::Chars;

/// A single quoted literal extracted from the source text, including its
/// surrounding quote characters, casing preserved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotedSpan(pub String);

/// The placeholder prefix substituted for each quoted span. Not alphanumeric
/// on either side so it never straddles a keyword's word boundary.
const PLACEHOLDER_PREFIX: &str = "\u{0}q";
const PLACEHOLDER_SUFFIX: char = '\u{0}';

/// Scans `query`, replacing every single- or double-quoted literal with an
/// opaque placeholder, lower-casing and whitespace-collapsing everything
/// else. Returns the placeholder-bearing scan string and the original
/// quoted spans in order of appearance.
pub fn extract_quotes(query: &str) -> (String, Vec<QuotedSpan>) {
    let mut iter: Peekable<Chars<'_>> = query.chars().peekable();
    let mut scan = String::with_capacity(query.len());
    let mut spans = Vec::new();
    let mut last_was_space = false;

    while let Some(ch) = iter.next() {
        match ch {
            '\'' | '"' => {
                let quote = ch;
                let mut literal = String::new();
                literal.push(quote);
                for inner in iter.by_ref() {
                    literal.push(inner);
                    if inner == quote {
                        break;
                    }
                }
                scan.push_str(PLACEHOLDER_PREFIX);
                scan.push_str(&spans.len().to_string());
                scan.push(PLACEHOLDER_SUFFIX);
                spans.push(QuotedSpan(literal));
                last_was_space = false;
            }
            c if c.is_whitespace() => {
                if !last_was_space {
                    scan.push(' ');
                    last_was_space = true;
                }
            }
            c => {
                for lower in c.to_lowercase() {
                    scan.push(lower);
                }
                last_was_space = false;
            }
        }
    }

    (scan.trim().to_string(), spans)
}

/// Substitutes placeholders in `text` back with their original quoted spans.
pub fn restore_quotes(text: &str, spans: &[QuotedSpan]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{0}' && chars.peek() == Some(&'q') {
            chars.next(); // consume 'q'
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            chars.next(); // consume the trailing NUL terminator
            let index: usize = digits.parse().expect("placeholder index is always digits");
            out.push_str(&spans[index].0);
        } else {
            out.push(ch);
        }
    }
    out
}
