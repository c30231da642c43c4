use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared_types::{CategoryBreakdown, CategoryTotal, Expense, SpendingSummary};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Placeholder shown when there is nothing to rank
pub const NO_DATA: &str = "No data yet";

/// Fixed denominator of [`average_daily`]
pub const WEEK_DAYS: f64 = 7.0;

/// How the average-daily figure is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AverageMode {
    /// Total divided by 7 whatever the range
    #[default]
    FixedWeek,
    /// Total divided by the number of days in the selected range
    RangeDays,
}

/// Category selector of a [`RangeFilter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) or an empty string selects every category
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(raw.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Inclusive date range plus optional category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub category: CategoryFilter,
}

impl RangeFilter {
    /// The trailing `days` days ending at `today`, all categories. The start
    /// saturates at the earliest representable date.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let span = days.max(1) as i64 - 1;
        Self {
            start: today
                .checked_sub_signed(Duration::days(span))
                .unwrap_or(NaiveDate::MIN),
            end: today,
            category: CategoryFilter::All,
        }
    }

    pub fn contains(&self, expense: &Expense) -> bool {
        expense.date >= self.start && expense.date <= self.end && self.category.matches(&expense.category)
    }

    /// Number of calendar days covered, 0 when the range is inverted
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }
}

pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Total divided by seven, or 0 for an empty collection.
///
/// The denominator does not depend on the span of the data.
pub fn average_daily(expenses: &[Expense]) -> f64 {
    if expenses.is_empty() {
        0.0
    } else {
        total(expenses) / WEEK_DAYS
    }
}

/// Total divided by `days`, or 0 when either side is empty
pub fn average_daily_over(expenses: &[Expense], days: i64) -> f64 {
    if expenses.is_empty() || days <= 0 {
        0.0
    } else {
        total(expenses) / days as f64
    }
}

pub fn average_for(mode: AverageMode, expenses: &[Expense], range: &RangeFilter) -> f64 {
    match mode {
        AverageMode::FixedWeek => average_daily(expenses),
        AverageMode::RangeDays => average_daily_over(expenses, range.days()),
    }
}

/// Expenses dated within the seven calendar days ending at `today`
pub fn count_this_week(expenses: &[Expense], today: NaiveDate) -> usize {
    let start = today - Duration::days(6);
    expenses
        .iter()
        .filter(|e| e.date >= start && e.date <= today)
        .count()
}

/// Per-category sums, largest first. Equal sums keep first-seen order.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        match index.get(expense.category.as_str()) {
            Some(&i) => totals[i].amount += expense.amount,
            None => {
                index.insert(expense.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    amount: expense.amount,
                });
            }
        }
    }

    // sort_by is stable, which keeps encounter order on ties
    totals.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    totals
}

/// Category totals with share of the overall total and entry counts
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryBreakdown> {
    let grand_total = total(expenses);

    category_totals(expenses)
        .into_iter()
        .map(|ct| {
            let transaction_count = expenses
                .iter()
                .filter(|e| e.category == ct.category)
                .count() as i32;
            CategoryBreakdown {
                percentage: percent_of(ct.amount, grand_total),
                category: ct.category,
                amount: ct.amount,
                transaction_count,
            }
        })
        .collect()
}

/// Largest category and its share of the total, in percent
pub fn top_category_share(expenses: &[Expense]) -> Option<(String, f64)> {
    let grand_total = total(expenses);
    category_totals(expenses)
        .into_iter()
        .next()
        .map(|top| (top.category, percent_of(top.amount, grand_total)))
}

/// Display text for the top category card
pub fn describe_top_category(expenses: &[Expense]) -> String {
    match top_category_share(expenses) {
        Some((category, share)) => format!("{} ({:.0}%)", category, share),
        None => NO_DATA.to_string(),
    }
}

pub fn filter_by_range(expenses: &[Expense], filter: &RangeFilter) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| filter.contains(e))
        .cloned()
        .collect()
}

/// Spending so far in the calendar month of `today`
pub fn month_to_date_total(expenses: &[Expense], today: NaiveDate) -> f64 {
    expenses
        .iter()
        .filter(|e| e.date.year() == today.year() && e.date.month() == today.month() && e.date <= today)
        .map(|e| e.amount)
        .sum()
}

/// Spent amount as a percentage of budget; 0 when there is no budget
pub fn budget_usage_percent(spent: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        0.0
    } else {
        spent / budget * 100.0
    }
}

/// `n` most recent expenses, newest date first
pub fn recent(expenses: &[Expense], n: usize) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

pub fn summary(expenses: &[Expense], today: NaiveDate) -> SpendingSummary {
    SpendingSummary {
        total: total(expenses),
        average_daily: average_daily(expenses),
        week_count: count_this_week(expenses, today) as i32,
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
