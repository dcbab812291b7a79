// Aggregate computations over a fetched expense collection
//
// Both aggregates are a linear filter-then-sum. Dates are compared as calendar
// dates, never as raw strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::Expense;

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse a calendar date (supports YYYY-MM-DD, MM/DD/YYYY and ISO-8601 timestamps)
///
/// Timestamps are reduced to the date they were written with; time of day and
/// offset do not take part in range comparison.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    // Try YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // Try MM/DD/YYYY
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Some(date);
    }

    // Try RFC 3339 (2024-01-05T10:00:00.000Z, 2024-01-05T10:00:00+07:00)
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    // Try a timestamp without offset
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.date());
    }

    None
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive calendar-date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both bounds must be present and parse, otherwise there is no range
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let start = parse_calendar_date(start?)?;
        let end = parse_calendar_date(end?)?;
        Some(Self::new(start, end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ============================================================================
// TOTALS
// ============================================================================

/// Sum `nominal` over records dated within [start, end], both ends inclusive.
///
/// A missing or unparsable bound matches nothing, as does a record whose own
/// date is missing or does not parse. An inverted range is empty.
pub fn total_in_date_range(expenses: &[Expense], start: Option<&str>, end: Option<&str>) -> f64 {
    let range = match DateRange::parse(start, end) {
        Some(range) => range,
        None => return 0.0,
    };

    expenses
        .iter()
        .filter(|e| {
            e.date
                .as_deref()
                .and_then(parse_calendar_date)
                .map(|date| range.contains(date))
                .unwrap_or(false)
        })
        .fold(0.0, |sum, e| sum + e.amount())
}

/// Sum `nominal` over records whose category is exactly `category`.
///
/// No case folding or trimming; an unrecognised value simply totals 0.
pub fn total_for_category(expenses: &[Expense], category: &str) -> f64 {
    expenses
        .iter()
        .filter(|e| e.category.as_deref() == Some(category))
        .fold(0.0, |sum, e| sum + e.amount())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(nominal: f64, category: &str, date: &str) -> Expense {
        Expense {
            nominal: Some(nominal),
            category: Some(category.to_string()),
            date: Some(date.to_string()),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(100.0, "food", "2024-01-05"),
            expense(50.0, "transport", "2024-02-01"),
        ]
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        assert_eq!(parse_calendar_date("2024-01-05"), Some(jan5));
        assert_eq!(parse_calendar_date("01/05/2024"), Some(jan5));
        assert_eq!(parse_calendar_date("2024-01-05T23:10:00.000Z"), Some(jan5));
        assert_eq!(parse_calendar_date("2024-01-05T08:00:00+07:00"), Some(jan5));
        assert_eq!(parse_calendar_date("2024-01-05T08:00:00"), Some(jan5));
        assert_eq!(parse_calendar_date(" 2024-01-05 "), Some(jan5));
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }

    #[test]
    fn test_date_range_example() {
        let total = total_in_date_range(&sample(), Some("2024-01-01"), Some("2024-01-31"));
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let expenses = sample();

        assert_eq!(
            total_in_date_range(&expenses, Some("2024-01-05"), Some("2024-02-01")),
            150.0
        );
        assert_eq!(
            total_in_date_range(&expenses, Some("2024-02-01"), Some("2024-02-01")),
            50.0
        );
    }

    #[test]
    fn test_range_covering_everything_sums_whole_collection() {
        let expenses = vec![
            expense(100.0, "food", "2024-01-05"),
            expense(-25.5, "salary", "12/31/2023"),
            expense(40.0, "transport", "2024-03-10T09:30:00.000Z"),
        ];
        let everything: f64 = expenses.iter().map(|e| e.amount()).sum();

        assert_eq!(
            total_in_date_range(&expenses, Some("2023-12-31"), Some("2024-03-10")),
            everything
        );
    }

    #[test]
    fn test_non_sortable_formats_compare_as_dates() {
        // "12/31/2023" sorts after "01/15/2024" as a string but is earlier as a date
        let expenses = vec![
            expense(10.0, "food", "12/31/2023"),
            expense(20.0, "food", "01/15/2024"),
        ];

        assert_eq!(
            total_in_date_range(&expenses, Some("01/01/2024"), Some("01/31/2024")),
            20.0
        );
    }

    #[test]
    fn test_date_range_without_matches_is_zero() {
        assert_eq!(
            total_in_date_range(&sample(), Some("2023-01-01"), Some("2023-12-31")),
            0.0
        );
        assert_eq!(total_in_date_range(&[], Some("2024-01-01"), Some("2024-12-31")), 0.0);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert_eq!(
            total_in_date_range(&sample(), Some("2024-12-31"), Some("2024-01-01")),
            0.0
        );
    }

    #[test]
    fn test_missing_or_invalid_bounds_match_nothing() {
        let expenses = sample();

        assert_eq!(total_in_date_range(&expenses, None, Some("2024-12-31")), 0.0);
        assert_eq!(total_in_date_range(&expenses, Some("2024-01-01"), None), 0.0);
        assert_eq!(
            total_in_date_range(&expenses, Some("not-a-date"), Some("2024-12-31")),
            0.0
        );
    }

    #[test]
    fn test_unparsable_record_date_is_skipped() {
        let mut expenses = sample();
        expenses.push(expense(999.0, "food", "sometime in january"));

        assert_eq!(
            total_in_date_range(&expenses, Some("2024-01-01"), Some("2024-01-31")),
            100.0
        );
    }

    #[test]
    fn test_record_without_date_is_skipped() {
        let mut expenses = sample();
        expenses.push(Expense {
            nominal: Some(5.0),
            category: Some("food".to_string()),
            date: None,
        });

        assert_eq!(
            total_in_date_range(&expenses, Some("2024-01-01"), Some("2024-12-31")),
            150.0
        );
    }

    #[test]
    fn test_category_example() {
        let expenses = sample();

        assert_eq!(total_for_category(&expenses, "food"), 100.0);
        assert_eq!(total_for_category(&expenses, "transport"), 50.0);
        assert_eq!(total_for_category(&expenses, "salary"), 0.0);
    }

    #[test]
    fn test_category_match_is_exact() {
        let expenses = sample();

        assert_eq!(total_for_category(&expenses, "Food"), 0.0);
        assert_eq!(total_for_category(&expenses, " food"), 0.0);
        assert_eq!(total_for_category(&expenses, "groceries"), 0.0);
    }

    #[test]
    fn test_category_sums_signed_amounts() {
        let expenses = vec![
            expense(3000.0, "salary", "2024-01-01"),
            expense(-200.0, "salary", "2024-01-15"),
            expense(12.0, "food", "2024-01-16"),
        ];

        assert_eq!(total_for_category(&expenses, "salary"), 2800.0);
    }

    #[test]
    fn test_category_outside_known_set_is_summed() {
        let mut expenses = sample();
        expenses.push(expense(20.0, "gifts", "2024-01-20"));
        expenses.push(Expense {
            nominal: None,
            category: Some("gifts".to_string()),
            date: None,
        });

        assert_eq!(total_for_category(&expenses, "gifts"), 20.0);
        assert_eq!(total_for_category(&expenses, "food"), 100.0);
    }
}
