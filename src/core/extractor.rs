// Cerebro - core/extractor.rs
//
// Best-effort extraction of issue records from hand-maintained spreadsheet
// exports. Rows have no fixed schema: each row is anchored on its first
// month/year cell pair, and everything to the right is read as
// (issue number, collection, format) triples.
//
// Core layer: operates on text already read by the app layer.

use crate::core::model::{is_plausible_year, IssueRecord, Month};
use crate::util::constants;
use rayon::prelude::*;

/// Result of extracting one input text.
#[derive(Debug, Default)]
pub struct ExtractResult {
    /// Records in line order, then column order within a line.
    pub records: Vec<IssueRecord>,
    /// Total lines processed.
    pub lines_processed: usize,
    /// Lines where a month/year anchor was found.
    pub lines_anchored: usize,
}

impl ExtractResult {
    /// True when the input yielded no records ("no data found").
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extract all issue records from raw CSV text.
///
/// Never fails: lines without a valid anchor are skipped.
pub fn extract(raw: &str) -> Vec<IssueRecord> {
    extract_with_stats(raw).records
}

/// Extract records and report line statistics.
///
/// Inputs above `PARALLEL_LINE_THRESHOLD` lines are processed on the rayon
/// pool; per-line blocks are collected in line order before flattening, so
/// output order is identical to the sequential path.
pub fn extract_with_stats(raw: &str) -> ExtractResult {
    let lines: Vec<&str> = raw.split('\n').collect();

    let per_line: Vec<Option<Vec<IssueRecord>>> =
        if lines.len() > constants::PARALLEL_LINE_THRESHOLD {
            lines.par_iter().map(|line| extract_line(line)).collect()
        } else {
            lines.iter().map(|line| extract_line(line)).collect()
        };

    let mut result = ExtractResult {
        lines_processed: lines.len(),
        ..Default::default()
    };
    for block in per_line.into_iter().flatten() {
        result.lines_anchored += 1;
        result.records.extend(block);
    }

    tracing::debug!(
        lines = result.lines_processed,
        anchored = result.lines_anchored,
        records = result.records.len(),
        "Extraction complete"
    );
    result
}

/// Extract the records of a single line.
///
/// Returns `None` when the line has no month/year anchor, and `Some` (possibly
/// empty) when it does.
fn extract_line(line: &str) -> Option<Vec<IssueRecord>> {
    let row = split_row(line);
    let (anchor, month, year) = find_anchor(&row)?;
    Some(scan_issues(&row, anchor + 2, month, year))
}

/// Split a line on commas that are not inside a quoted field.
///
/// A comma is a delimiter when the number of `"` characters after it on the
/// line is even. Each cell is trimmed and loses one leading and one trailing
/// quote.
pub fn split_row(line: &str) -> Vec<String> {
    let total_quotes = line.matches('"').count();
    let mut quotes_seen = 0;
    let mut cells = Vec::new();
    let mut start = 0;

    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => quotes_seen += 1,
            ',' if (total_quotes - quotes_seen) % 2 == 0 => {
                cells.push(clean_cell(&line[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    cells.push(clean_cell(&line[start..]));
    cells
}

fn clean_cell(raw: &str) -> String {
    let cell = raw.trim();
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    let cell = cell.strip_suffix('"').unwrap_or(cell);
    cell.to_string()
}

/// Find the leftmost month cell immediately followed by a plausible year,
/// within the first `ANCHOR_SEARCH_WINDOW` cells.
///
/// Returns the month's cell index, the month, and the year.
fn find_anchor(row: &[String]) -> Option<(usize, Month, i32)> {
    let limit = constants::ANCHOR_SEARCH_WINDOW.min(row.len().saturating_sub(1));
    (0..limit).find_map(|j| {
        let month = Month::from_name(&row[j])?;
        let year = parse_leading_int(&row[j + 1])?;
        if is_plausible_year(year) {
            // Bounds above guarantee the value fits in i32.
            Some((j, month, year as i32))
        } else {
            None
        }
    })
}

/// Parse the leading integer prefix of a cell: optional sign, then digits.
///
/// Trailing text is ignored, so `"1995x"` parses as 1995.
pub fn parse_leading_int(cell: &str) -> Option<i64> {
    let s = cell.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long digit runs; they fail the year bounds anyway.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Scan issue triples starting at `start`.
///
/// A non-empty issue cell consumes a full triple; an empty one advances a
/// single cell so stray padding does not shift later triples out of line.
fn scan_issues(row: &[String], start: usize, month: Month, year: i32) -> Vec<IssueRecord> {
    let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
    let mut records = Vec::new();
    let mut col = start;

    while col < row.len() {
        let issue_number = cell(col);
        if issue_number.is_empty() {
            col += 1;
            continue;
        }
        records.push(IssueRecord::from_cells(
            month,
            year,
            issue_number,
            cell(col + 1),
            cell(col + 2),
        ));
        col += 3;
    }
    records
}
