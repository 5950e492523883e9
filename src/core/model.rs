// Cerebro - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use serde::{Deserialize, Serialize};

// =============================================================================
// Month
// =============================================================================

/// Canonical publication month.
///
/// Declaration order is calendar order, so the derived `Ord` is the
/// catalog's month ordering (January first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Returns all variants in calendar order.
    pub fn all() -> &'static [Month] {
        &[
            Month::January,
            Month::February,
            Month::March,
            Month::April,
            Month::May,
            Month::June,
            Month::July,
            Month::August,
            Month::September,
            Month::October,
            Month::November,
            Month::December,
        ]
    }

    /// Canonical, properly cased month name.
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Zero-based calendar index (January = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Month for a zero-based index; `None` outside 0..12.
    pub fn from_index(index: usize) -> Option<Month> {
        Self::all().get(index).copied()
    }

    /// Case-insensitive match against the full month names only.
    /// Abbreviations ("Jan") are not months.
    pub fn from_name(name: &str) -> Option<Month> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Issue record
// =============================================================================

/// One catalogued issue, normalised from a spreadsheet row.
///
/// Fields are private: `is_uncollected` and `search_index` are derived.
/// Deserialised records are rebuilt through `from_parts`, so a stored
/// `searchIndex` is ignored, and a year outside the plausible range is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredIssue")]
pub struct IssueRecord {
    month: Month,
    year: i32,
    issue_number: String,
    collection: String,
    format: String,
    is_uncollected: bool,
    search_index: String,
}

/// Wire shape accepted when deserialising a record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredIssue {
    month: Month,
    year: i32,
    issue_number: String,
    collection: String,
    format: String,
    is_uncollected: bool,
}

impl TryFrom<StoredIssue> for IssueRecord {
    type Error = String;

    fn try_from(s: StoredIssue) -> Result<Self, Self::Error> {
        if !is_plausible_year(i64::from(s.year)) {
            return Err(format!(
                "year {} is outside {}..{}",
                s.year,
                constants::MIN_YEAR_EXCLUSIVE,
                constants::MAX_YEAR_EXCLUSIVE
            ));
        }
        Ok(IssueRecord::from_parts(
            s.month,
            s.year,
            s.issue_number,
            s.collection,
            s.format,
            s.is_uncollected,
        ))
    }
}

/// True when `year` lies strictly between the publication-year bounds.
pub fn is_plausible_year(year: i64) -> bool {
    year > constants::MIN_YEAR_EXCLUSIVE && year < constants::MAX_YEAR_EXCLUSIVE
}

impl IssueRecord {
    /// Build a record from one scanned issue triple.
    ///
    /// An empty `collection_cell`, or one that already holds the uncollected
    /// sentinel, marks the issue uncollected and substitutes the sentinel
    /// collection and format; a collected issue with a blank `format_cell`
    /// gets the "Unknown" format.
    pub fn from_cells(
        month: Month,
        year: i32,
        issue_number: &str,
        collection_cell: &str,
        format_cell: &str,
    ) -> Self {
        if collection_cell.is_empty() || collection_cell == constants::UNCOLLECTED_COLLECTION {
            Self::from_parts(
                month,
                year,
                issue_number.to_string(),
                constants::UNCOLLECTED_COLLECTION.to_string(),
                constants::NOT_PRINTED_FORMAT.to_string(),
                true,
            )
        } else {
            let format = if format_cell.is_empty() {
                constants::UNKNOWN_FORMAT
            } else {
                format_cell
            };
            Self::from_parts(
                month,
                year,
                issue_number.to_string(),
                collection_cell.to_string(),
                format.to_string(),
                false,
            )
        }
    }

    /// Build a record from already-normalised fields, deriving the search index.
    ///
    /// An uncollected record always carries the sentinel collection and
    /// format, whatever was passed in.
    pub fn from_parts(
        month: Month,
        year: i32,
        issue_number: String,
        collection: String,
        format: String,
        is_uncollected: bool,
    ) -> Self {
        let (collection, format) = if is_uncollected {
            (
                constants::UNCOLLECTED_COLLECTION.to_string(),
                constants::NOT_PRINTED_FORMAT.to_string(),
            )
        } else {
            (collection, format)
        };
        let search_index =
            build_search_index(month, year, &issue_number, &collection, &format, is_uncollected);
        Self {
            month,
            year,
            issue_number,
            collection,
            format,
            is_uncollected,
            search_index,
        }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn issue_number(&self) -> &str {
        &self.issue_number
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn is_uncollected(&self) -> bool {
        self.is_uncollected
    }

    /// Lower-cased text blob used for substring search.
    pub fn search_index(&self) -> &str {
        &self.search_index
    }
}

/// Lower-cased concatenation of the record fields, in the order
/// month, year, issue, collection, format, uncollected tokens.
pub fn build_search_index(
    month: Month,
    year: i32,
    issue_number: &str,
    collection: &str,
    format: &str,
    is_uncollected: bool,
) -> String {
    let tokens = if is_uncollected {
        constants::UNCOLLECTED_SEARCH_TOKENS
    } else {
        ""
    };
    format!("{month} {year} {issue_number} {collection} {format} {tokens}").to_lowercase()
}

// =============================================================================
// Query descriptor
// =============================================================================

/// Structured search request. All set fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    /// Exact publication year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Month name, compared case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    /// Substring matched against the search index (case-insensitive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl QueryDescriptor {
    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Default::default()
        }
    }

    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Returns true if no filters are set.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.text.is_none()
    }
}

impl std::fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("(everything)");
        }
        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(format!("year={year}"));
        }
        if let Some(ref month) = self.month {
            parts.push(format!("month={month}"));
        }
        if let Some(ref text) = self.text {
            parts.push(format!("text=\"{text}\""));
        }
        f.write_str(&parts.join(" "))
    }
}

// =============================================================================
// Daily feature
// =============================================================================

/// The date-rotated highlight: one year, and that year's issues for the
/// current calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFeature {
    pub month: Month,
    pub year: i32,
    pub issues: Vec<IssueRecord>,
}
