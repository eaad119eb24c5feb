//! Reconciliation of PATH-like list values.
//!
//! A PATH-like value is a list of directories joined by a separator
//! (`;` for the Windows user environment). Merging appends missing entries,
//! drops blank segments and always ends the value with a separator.

/// Separator used by the persistent user environment.
pub const DEFAULT_SEPARATOR: char = ';';

/// Split a PATH-like value into its raw segments (blank segments included).
pub fn split(value: &str, sep: char) -> Vec<String> {
    value.split(sep).map(str::to_string).collect()
}

/// Append every entry of `additions` that is not already present in
/// `current`, drop blank segments, and rejoin with a trailing separator.
///
/// Existing entries keep their order and spelling.
pub fn merge(current: &str, additions: &[String], sep: char) -> String {
    let mut entries = split(current, sep);

    for addition in additions {
        if !entries.iter().any(|e| e == addition) {
            entries.push(addition.clone());
        }
    }

    let kept: Vec<String> = entries
        .into_iter()
        .filter(|e| !e.trim().is_empty())
        .collect();

    let mut joined = kept.join(&sep.to_string());
    joined.push(sep);
    joined
}

/// Entries of `additions` that `merge` would actually append.
pub fn missing(current: &str, additions: &[String], sep: char) -> Vec<String> {
    let entries = split(current, sep);
    let mut out: Vec<String> = Vec::new();
    for addition in additions {
        if !entries.contains(addition) && !out.contains(addition) {
            out.push(addition.clone());
        }
    }
    out
}
