//! tag normalization helpers
//!
//! danbooru tag fields are space-delimited. tags destined for captions keep
//! their underscores and escape literal parentheses so downstream prompt
//! parsers treat them as text rather than grouping.

/// normalize a single tag token
///
/// spaces become underscores, then every unescaped `(` and `)` gains a
/// preceding backslash. already-escaped parentheses are left alone, so the
/// function is idempotent.
pub fn normalize_tag(raw: &str) -> String {
    let underscored = raw.replace(' ', "_");
    let mut out = String::with_capacity(underscored.len());
    let mut escaped = false;
    for c in underscored.chars() {
        if (c == '(' || c == ')') && !escaped {
            out.push('\\');
        }
        escaped = c == '\\';
        out.push(c);
    }
    out
}

/// split a space-delimited tag field into normalized tags
///
/// order is preserved and empty tokens survive redundant separators; the
/// api emits single spaces, so anything else passes through untouched.
pub fn split_tag_string(field: &str) -> Vec<String> {
    field.split(' ').map(normalize_tag).collect()
}

/// percent-encode a search tag for url embedding
///
/// spaces are substituted with underscores before encoding; parentheses are
/// handled by the percent-encoding itself.
pub fn encode_tag(tag: &str) -> String {
    urlencoding::encode(&tag.replace(' ', "_")).into_owned()
}
