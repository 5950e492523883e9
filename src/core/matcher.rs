// Cerebro - core/matcher.rs
//
// Ordering, filtering, and daily-feature selection over the catalog.
// All descriptor fields are AND-combined.
// Core layer: pure logic, no I/O; the current date is always injected.

use crate::core::model::{DailyFeature, IssueRecord, Month, QueryDescriptor};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Sort records into canonical catalog order: year, then calendar month.
///
/// The sort is stable, so records sharing a year and month keep their
/// extraction order.
pub fn sort_catalog(records: &mut [IssueRecord]) {
    records.sort_by_key(|r| (r.year(), r.month().index()));
}

/// Apply a descriptor to `records`, returning the matching subset in input
/// order. An empty descriptor returns every record.
pub fn apply_filter(records: &[IssueRecord], descriptor: &QueryDescriptor) -> Vec<IssueRecord> {
    if descriptor.is_empty() {
        return records.to_vec();
    }

    let month_lower = descriptor.month.as_deref().map(str::to_lowercase);
    let text_lower = descriptor.text.as_deref().map(str::to_lowercase);

    records
        .iter()
        .filter(|r| matches_all(r, descriptor.year, month_lower.as_deref(), text_lower.as_deref()))
        .cloned()
        .collect()
}

/// Check if a single record matches all active filters.
fn matches_all(
    record: &IssueRecord,
    year: Option<i32>,
    month_lower: Option<&str>,
    text_lower: Option<&str>,
) -> bool {
    if let Some(year) = year {
        if record.year() != year {
            return false;
        }
    }

    if let Some(month) = month_lower {
        if record.month().name().to_lowercase() != month {
            return false;
        }
    }

    if let Some(text) = text_lower {
        if !record.search_index().contains(text) {
            return false;
        }
    }

    true
}

/// Distinct years present in the catalog, ascending.
pub fn unique_years(records: &[IssueRecord]) -> Vec<i32> {
    records
        .iter()
        .map(IssueRecord::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Select the featured year and its issues for `date`.
///
/// The featured year rotates through the catalog's distinct years by
/// 1-based day of year, so it is stable for a calendar day and a given
/// catalog. Featured issues are those from that year published in the
/// date's calendar month; the list may be empty. Returns `None` for an
/// empty catalog.
pub fn daily_feature(records: &[IssueRecord], date: NaiveDate) -> Option<DailyFeature> {
    let years = unique_years(records);
    if years.is_empty() {
        return None;
    }

    let day_of_year = date.ordinal() as usize;
    let year = years[day_of_year % years.len()];
    let month = Month::from_index(date.month0() as usize)?;

    let issues = records
        .iter()
        .filter(|r| r.month() == month && r.year() == year)
        .cloned()
        .collect();

    Some(DailyFeature {
        month,
        year,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(month: Month, year: i32, number: &str, collection: &str) -> IssueRecord {
        IssueRecord::from_cells(month, year, number, collection, "TPB")
    }

    fn sample_catalog() -> Vec<IssueRecord> {
        vec![
            make_record(Month::March, 1991, "275", "Muir Island Saga"),
            make_record(Month::January, 1995, "1", "X-Men Omnibus Vol 1"),
            make_record(Month::January, 1991, "272", "X-Tinction Agenda"),
            make_record(Month::October, 2023, "1", "Fall of X"),
            make_record(Month::October, 2023, "2", ""),
        ]
    }

    fn numbers(records: &[IssueRecord]) -> Vec<(i32, String)> {
        records
            .iter()
            .map(|r| (r.year(), r.issue_number().to_string()))
            .collect()
    }

    #[test]
    fn test_sort_by_year_then_month() {
        let mut records = sample_catalog();
        sort_catalog(&mut records);
        assert_eq!(
            numbers(&records),
            vec![
                (1991, "272".to_string()),
                (1991, "275".to_string()),
                (1995, "1".to_string()),
                (2023, "1".to_string()),
                (2023, "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut once = sample_catalog();
        sort_catalog(&mut once);
        let mut twice = once.clone();
        sort_catalog(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_descriptor_returns_all() {
        let records = sample_catalog();
        let result = apply_filter(&records, &QueryDescriptor::default());
        assert_eq!(result, records);
    }

    #[test]
    fn test_year_filter() {
        let result = apply_filter(&sample_catalog(), &QueryDescriptor::for_year(1991));
        assert_eq!(
            numbers(&result),
            vec![(1991, "275".to_string()), (1991, "272".to_string())]
        );
    }

    #[test]
    fn test_year_and_month_are_and_combined() {
        let descriptor = QueryDescriptor {
            year: Some(1991),
            month: Some("JANUARY".to_string()),
            text: None,
        };
        let result = apply_filter(&sample_catalog(), &descriptor);
        assert_eq!(numbers(&result), vec![(1991, "272".to_string())]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let result = apply_filter(&sample_catalog(), &QueryDescriptor::for_text("Fall Of X"));
        assert_eq!(numbers(&result), vec![(2023, "1".to_string())]);
    }

    #[test]
    fn test_text_filter_matches_uncollected_tokens() {
        let result = apply_filter(&sample_catalog(), &QueryDescriptor::for_text("uncollected"));
        assert_eq!(numbers(&result), vec![(2023, "2".to_string())]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample_catalog();
        let descriptor = QueryDescriptor {
            year: Some(2023),
            month: None,
            text: Some("october".to_string()),
        };
        let once = apply_filter(&records, &descriptor);
        let twice = apply_filter(&once, &descriptor);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_month_matches_nothing() {
        let descriptor = QueryDescriptor {
            month: Some("Smarch".to_string()),
            ..Default::default()
        };
        assert!(apply_filter(&sample_catalog(), &descriptor).is_empty());
    }

    #[test]
    fn test_unique_years_sorted() {
        assert_eq!(unique_years(&sample_catalog()), vec![1991, 1995, 2023]);
    }

    #[test]
    fn test_daily_feature_rotation() {
        let records = sample_catalog();
        // 2024-01-01: day 1 -> years[1 % 3] = 1995, January.
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feature = daily_feature(&records, date).unwrap();
        assert_eq!(feature.year, 1995);
        assert_eq!(feature.month, Month::January);
        assert_eq!(numbers(&feature.issues), vec![(1995, "1".to_string())]);

        // 2024-01-03: day 3 -> years[0] = 1991.
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let feature = daily_feature(&records, date).unwrap();
        assert_eq!(feature.year, 1991);
        assert_eq!(numbers(&feature.issues), vec![(1991, "272".to_string())]);
    }

    #[test]
    fn test_daily_feature_may_have_no_issues() {
        // 2024-10-20 is day 294 -> 294 % 3 = 0 -> 1991, which has no October issues.
        let date = NaiveDate::from_ymd_opt(2024, 10, 20).unwrap();
        let feature = daily_feature(&sample_catalog(), date).unwrap();
        assert_eq!(feature.year, 1991);
        assert_eq!(feature.month, Month::October);
        assert!(feature.issues.is_empty());
    }

    #[test]
    fn test_daily_feature_is_deterministic() {
        let records = sample_catalog();
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        assert_eq!(daily_feature(&records, date), daily_feature(&records, date));
    }

    #[test]
    fn test_daily_feature_empty_catalog() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        assert!(daily_feature(&[], date).is_none());
    }
}
