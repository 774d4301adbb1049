//! CSV loading for labeled datasets.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled correctly
//! - The last column is an integer class id (0-based); every other column is
//!   an input feature

use crate::data::records::Sample;
use crate::error::{NnError, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses CSV bytes into labeled samples.
///
/// # Arguments
/// - `data`:      raw CSV bytes (UTF-8)
/// - `n_classes`: width of the network's output layer; ids must be below it,
///                 or be `0`/`1` when it is `1`
pub fn parse_csv(data: &[u8], n_classes: usize) -> Result<Vec<Sample>> {
    if n_classes == 0 {
        return Err(NnError::config("n_classes must be at least 1"));
    }
    let text = std::str::from_utf8(data)
        .map_err(|_| NnError::Csv("CSV file is not valid UTF-8".into()))?;

    // Line numbers are 1-based positions in the source text.
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line)).peekable();

    // Auto-detect header: skip first line if any cell is non-numeric.
    if let Some((_, first)) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let class_limit = n_classes.max(2);
    let mut samples: Vec<Sample> = Vec::new();

    for (line_no, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        let Some((label_cell, feature_cells)) = cells.split_last() else {
            continue;
        };
        if feature_cells.is_empty() {
            return Err(NnError::Csv(format!(
                "Line {}: expected at least 2 columns (features + class id), got {}",
                line_no,
                cells.len()
            )));
        }

        let input = parse_floats(feature_cells, line_no)?;
        if let Some(first) = samples.first() {
            if input.len() != first.input.len() {
                return Err(NnError::Csv(format!(
                    "Line {}: feature count {} does not match first row's {}",
                    line_no,
                    input.len(),
                    first.input.len()
                )));
            }
        }

        let id: usize = label_cell.trim().parse::<usize>().map_err(|_| {
            NnError::Csv(format!(
                "Line {}: class id '{}' is not a non-negative integer",
                line_no, label_cell
            ))
        })?;
        if id >= class_limit {
            return Err(NnError::Csv(format!(
                "Line {}: class id {} >= {}",
                line_no, id, class_limit
            )));
        }

        samples.push(Sample::labeled(input, id, n_classes));
    }

    if samples.is_empty() {
        return Err(NnError::Csv("CSV contains no data rows after parsing".into()));
    }

    Ok(samples)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], line_no: usize) -> Result<Vec<f64>> {
    cells
        .iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                NnError::Csv(format!("Line {}: '{}' is not a valid number", line_no, c))
            })
        })
        .collect()
}
