//! Analytics Crate
//!
//! Pure aggregation over expense and split collections. Nothing here touches
//! storage; callers load collections, pass them in and render the results.
//!
//! - [`aggregate`]: totals, averages, week counts, category totals and range filters
//! - [`series`]: daily and cumulative series keyed by calendar day
//! - [`balances`]: who owes whom across unsettled split expenses
//! - [`export`]: CSV and one-line summary text
//! - [`format`]: currency formatting

pub mod aggregate;
pub mod balances;
pub mod export;
pub mod format;
pub mod series;

// Re-export commonly used items
pub use aggregate::{
    average_daily, average_daily_over, category_breakdown, category_totals, count_this_week,
    filter_by_range, total, AverageMode, CategoryFilter, RangeFilter, NO_DATA,
};
pub use balances::{participant_balances, split_balances, visible_balances, BalanceDirection};
pub use export::{expenses_to_csv, summary_text, ExportError};
pub use format::format_currency;
pub use series::{daily_series, day_key};
