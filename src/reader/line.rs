//! Quote-aware scanner for delimited text lines

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::{Result, TabportError};

/// Split one line of delimited text into fields.
///
/// Fields may be wrapped in double quotes; inside a quoted field the
/// delimiter is data and a doubled quote is an escaped literal quote.
/// An unterminated quote consumes the rest of the line.
pub fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    fields.push(current);
    fields
}

/// Read a delimited text file into raw field rows.
///
/// Blank lines are skipped with a warning. Returns each parsed row together
/// with its 1-indexed source line number. A UTF-8 BOM on the first line is
/// stripped.
pub fn read_rows(path: &Path, delimiter: char) -> Result<Vec<(Vec<String>, usize)>> {
    let file = File::open(path)
        .map_err(|e| TabportError::file_read(path, "open", e))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let mut line = line.map_err(|e| TabportError::file_read(path, "read", e))?;

        if line_number == 1 {
            if let Some(stripped) = line.strip_prefix('\u{feff}') {
                line = stripped.to_string();
            }
        }

        if line.trim().is_empty() {
            warn!(line = line_number, "skipping blank line");
            continue;
        }

        rows.push((parse_line(&line, delimiter), line_number));
    }

    Ok(rows)
}
