// src/core/sanitize.rs

/// ASCII-only lowercasing; non-ASCII (CJK labels) passes through untouched.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Remove every occurrence of every pattern, then trim the ends.
pub fn strip_all<S: AsRef<str>>(s: &str, patterns: &[S]) -> String {
    let mut out = s!(s);
    for p in patterns {
        let p = p.as_ref();
        if !p.is_empty() && out.contains(p) {
            out = out.replace(p, "");
        }
    }
    s!(out.trim())
}

/// Split a comma list into trimmed, non-empty, lower-cased entries.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| to_lower(p.trim()))
        .filter(|p| !p.is_empty())
        .collect()
}
