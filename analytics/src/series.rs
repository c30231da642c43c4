use chrono::{Datelike, Duration, NaiveDate};
use shared_types::{DailyPoint, Expense};
use std::collections::HashMap;

/// `yyyy-mm-dd` built from the calendar components, never via a UTC
/// timestamp, so the key is the same in every timezone.
pub fn day_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Short chart label such as `Nov 20`
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Every calendar day from `start` to `end`, both included
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let span = (end - start).num_days();
    (0..=span).map(move |offset| start + Duration::days(offset))
}

/// One bucket per day in `[start, end]` with the day's spend and the running
/// total. Expenses outside the range are ignored; an inverted range yields
/// an empty series.
pub fn daily_series(expenses: &[Expense], start: NaiveDate, end: NaiveDate) -> Vec<DailyPoint> {
    if start > end {
        return Vec::new();
    }

    let mut buckets: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        if expense.date >= start && expense.date <= end {
            *buckets.entry(day_key(expense.date)).or_insert(0.0) += expense.amount;
        }
    }

    let mut cumulative = 0.0;
    days_in_range(start, end)
        .map(|date| {
            let key = day_key(date);
            let amount = buckets.get(&key).copied().unwrap_or(0.0);
            cumulative += amount;
            DailyPoint {
                key,
                date,
                amount,
                cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn expense(date: &str, amount: f64) -> Expense {
        Expense {
            id: date.to_string(),
            date: day(date),
            category: "Food".to_string(),
            amount,
            notes: "Expense".to_string(),
        }
    }

    #[test]
    fn test_day_key_is_zero_padded() {
        assert_eq!(day_key(day("2025-01-05")), "2025-01-05");
        assert_eq!(day_key(NaiveDate::from_ymd_opt(987, 3, 9).unwrap()), "0987-03-09");
    }

    #[test]
    fn test_daily_series_buckets_and_cumulates() {
        let expenses = vec![
            expense("2025-11-18", 10.0),
            expense("2025-11-18", 5.0),
            expense("2025-11-20", 20.0),
            expense("2025-11-25", 99.0),
        ];
        let series = daily_series(&expenses, day("2025-11-18"), day("2025-11-20"));

        let keys: Vec<_> = series.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["2025-11-18", "2025-11-19", "2025-11-20"]);
        let amounts: Vec<_> = series.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![15.0, 0.0, 20.0]);
        let cumulative: Vec<_> = series.iter().map(|p| p.cumulative).collect();
        assert_eq!(cumulative, vec![15.0, 15.0, 35.0]);
    }

    #[test]
    fn test_cumulative_never_decreases() {
        let expenses: Vec<_> = (1..=28)
            .map(|d| expense(&format!("2025-02-{:02}", d), (d % 5) as f64 * 3.5))
            .collect();
        let series = daily_series(&expenses, day("2025-02-01"), day("2025-03-03"));
        assert_eq!(series.len(), 31);
        assert!(series.windows(2).all(|w| w[1].cumulative >= w[0].cumulative));
    }

    #[test]
    fn test_month_boundary_and_inverted_range() {
        let series = daily_series(&[], day("2024-02-28"), day("2024-03-01"));
        let keys: Vec<_> = series.iter().map(|p| p.key.clone()).collect();
        assert_eq!(keys, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);

        assert!(daily_series(&[], day("2025-03-01"), day("2025-02-01")).is_empty());
    }
}
