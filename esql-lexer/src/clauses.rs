use esql_core::EsqlError;

use crate::quote::{extract_quotes, restore_quotes};

/// One keyword body per fixed ESQL clause. A field is the empty string when
/// its keyword was omitted from the query (`spec.md` §4.1).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClauseSet {
    /// The `SELECT` clause body. Never empty: `SELECT` is mandatory.
    pub select: String,
    /// The `FROM` clause body.
    pub from: String,
    /// The `OVER` clause body, empty if omitted.
    pub over: String,
    /// The `WHERE` clause body, empty if omitted.
    pub where_clause: String,
    /// The `SUCH THAT` clause body, empty if omitted.
    pub such_that: String,
    /// The `HAVING` clause body, empty if omitted.
    pub having: String,
    /// The `ORDER BY` clause body, empty if omitted.
    pub order_by: String,
}

/// The fixed keywords, in the order they must appear (`spec.md` §4.1).
const KEYWORDS: [&str; 7] = ["select", "from", "over", "where", "such that", "having", "order by"];

fn display_name(keyword: &str) -> String {
    keyword.to_uppercase()
}

/// Splits `query` into its clause bodies.
///
/// Quoted literals are preserved verbatim (including casing); everything
/// else is case-folded and whitespace-collapsed. Keywords are located as
/// whole words, must appear at most once, in the listed order, with
/// `SELECT` at position 0. A keyword present with an empty body is an
/// error; a missing optional clause yields an empty body.
pub fn split_clauses(query: &str) -> Result<ClauseSet, EsqlError> {
    let (scan, spans) = extract_quotes(query);
    if scan.is_empty() {
        return Err(EsqlError::parse("SELECT", "query is empty"));
    }

    let chars: Vec<char> = scan.chars().collect();

    let mut present: Vec<(usize, usize, usize)> = Vec::new(); // (keyword index, start, end)
    for (i, keyword) in KEYWORDS.iter().enumerate() {
        if let Some((start, end)) = find_keyword(&chars, keyword)? {
            present.push((i, start, end));
        }
    }

    match present.first() {
        Some((0, 0, _)) => {}
        Some((0, _, _)) => {
            return Err(EsqlError::parse("SELECT", "SELECT must be first in the query"))
        }
        _ => return Err(EsqlError::parse("SELECT", "query must start with SELECT")),
    }

    for window in present.windows(2) {
        let (_, _, prev_end) = window[0];
        let (next_i, next_start, _) = window[1];
        if next_start < prev_end {
            return Err(EsqlError::parse(
                display_name(KEYWORDS[next_i]),
                format!("unexpected position of '{}'", display_name(KEYWORDS[next_i])),
            ));
        }
    }

    let mut bodies = vec![String::new(); KEYWORDS.len()];
    for (idx, (i, _, end)) in present.iter().enumerate() {
        let body_end = present
            .get(idx + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(chars.len());
        let body: String = chars[*end..body_end].iter().collect();
        let body = body.trim();
        if body.is_empty() {
            return Err(EsqlError::parse(
                display_name(KEYWORDS[*i]),
                format!("empty {}", display_name(KEYWORDS[*i])),
            ));
        }
        bodies[*i] = restore_quotes(body, &spans);
    }

    Ok(ClauseSet {
        select: std::mem::take(&mut bodies[0]),
        from: std::mem::take(&mut bodies[1]),
        over: std::mem::take(&mut bodies[2]),
        where_clause: std::mem::take(&mut bodies[3]),
        such_that: std::mem::take(&mut bodies[4]),
        having: std::mem::take(&mut bodies[5]),
        order_by: std::mem::take(&mut bodies[6]),
    })
}

/// Finds the unique word-boundary occurrence of `keyword` in `chars`.
/// Returns an error if `keyword` occurs more than once.
fn find_keyword(chars: &[char], keyword: &str) -> Result<Option<(usize, usize)>, EsqlError> {
    let needle: Vec<char> = keyword.chars().collect();
    let mut occurrences = Vec::new();
    if needle.is_empty() || needle.len() > chars.len() {
        return Ok(None);
    }
    for start in 0..=(chars.len() - needle.len()) {
        if chars[start..start + needle.len()] != needle[..] {
            continue;
        }
        let before_ok = start == 0 || !is_word_char(chars[start - 1]);
        let end = start + needle.len();
        let after_ok = end == chars.len() || !is_word_char(chars[end]);
        if before_ok && after_ok {
            occurrences.push((start, end));
        }
    }
    match occurrences.len() {
        0 => Ok(None),
        1 => Ok(Some(occurrences[0])),
        _ => Err(EsqlError::parse(
            display_name(keyword),
            format!("'{}' may appear at most once", display_name(keyword)),
        )),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
