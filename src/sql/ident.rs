//! SQL identifier sanitization

use std::collections::HashSet;

/// Characters replaced with underscores in identifiers.
const INVALID_CHARS: &[char] = &[
    ' ', '\n', '\r', '\t', ',', '.', '/', '\\', '[', ']', '(', ')', '{', '}', '"', '\'', '`', ';',
    ':', '-',
];

/// Maximum identifier length in bytes.
const MAX_IDENT_LEN: usize = 128;

/// Sanitize a column name into a safe SQL identifier.
pub fn sanitize_column_name(name: &str) -> String {
    sanitize(name, "col")
}

/// Sanitize a table name into a safe SQL identifier.
pub fn sanitize_table_name(name: &str) -> String {
    sanitize(name, "table")
}

fn sanitize(name: &str, prefix: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return format!("{prefix}_unknown");
    }

    let mut sanitized: String = trimmed
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    // Identifiers must start with a letter or underscore.
    let first = sanitized.chars().next().unwrap_or('_');
    if !first.is_alphabetic() && first != '_' {
        sanitized = format!("{prefix}_{sanitized}");
    }

    truncate_to_boundary(&mut sanitized, MAX_IDENT_LEN);
    sanitized
}

/// Make `base` unique against `existing` (case-insensitive) by appending a
/// numeric suffix; records the chosen name in `existing`.
pub fn unique_name(base: &str, existing: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut counter = 1;
    while existing.contains(&candidate.to_lowercase()) {
        candidate = format!("{base}_{counter}");
        counter += 1;
    }
    existing.insert(candidate.to_lowercase());
    candidate
}

fn truncate_to_boundary(s: &mut String, max_bytes: usize) {
    if s.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
