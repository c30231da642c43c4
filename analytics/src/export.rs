use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use shared_types::{Currency, Expense};

use crate::aggregate;
use crate::format::format_currency;

pub const CSV_HEADER: [&str; 4] = ["Date", "Category", "Amount", "Notes"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expenses as CSV text with a `Date,Category,Amount,Notes` header.
/// Fields holding quotes, commas or line breaks are quoted with inner
/// quotes doubled.
pub fn expenses_to_csv(expenses: &[Expense]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for expense in expenses {
        writer.write_record([
            expense.date.format("%Y-%m-%d").to_string(),
            expense.category.clone(),
            format!("{:.2}", expense.amount),
            expense.notes.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Suggested file name for a CSV export made on `today`
pub fn csv_file_name(today: NaiveDate) -> String {
    format!("edufinance-expenses-{}.csv", today.format("%Y-%m-%d"))
}

/// One-line text for sharing or the clipboard
pub fn summary_text(expenses: &[Expense], today: NaiveDate, currency: Currency) -> String {
    let summary = aggregate::summary(expenses, today);
    format!(
        "EduFinance summary: total spent {}, average daily {}, {} transaction{} this week",
        format_currency(summary.total, currency),
        format_currency(summary.average_daily, currency),
        summary.week_count,
        if summary.week_count == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn expense(date: &str, category: &str, amount: f64, notes: &str) -> Expense {
        Expense {
            id: date.to_string(),
            date: day(date),
            category: category.to_string(),
            amount,
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = expenses_to_csv(&[
            expense("2025-11-20", "Food", 120.0, "Lunch"),
            expense("2025-11-19", "Transport", 80.5, "Bus, then taxi"),
        ])
        .unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Category,Amount,Notes");
        assert_eq!(lines[1], "2025-11-20,Food,120.00,Lunch");
        assert_eq!(lines[2], "2025-11-19,Transport,80.50,\"Bus, then taxi\"");
    }

    #[test]
    fn test_csv_doubles_embedded_quotes() {
        let csv = expenses_to_csv(&[expense("2025-11-20", "Books", 15.0, "The \"Rust\" book")]).unwrap();
        assert!(csv.contains("\"The \"\"Rust\"\" book\""));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(expenses_to_csv(&[]).unwrap(), "Date,Category,Amount,Notes\n");
    }

    #[test]
    fn test_summary_text() {
        let text = summary_text(
            &[
                expense("2025-11-20", "Food", 120.0, "x"),
                expense("2025-11-19", "Transport", 80.0, "y"),
            ],
            day("2025-11-20"),
            Currency::Usd,
        );
        assert_eq!(
            text,
            "EduFinance summary: total spent $200.00, average daily $28.57, 2 transactions this week"
        );
        assert!(!text.contains('\n'));
    }
}
