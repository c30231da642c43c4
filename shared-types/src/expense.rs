use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{parse_positive_amount, ValidationError};

/// Categories offered by the expense form. Users may type others.
pub const KNOWN_CATEGORIES: [&str; 4] = ["Food", "Transport", "Books", "Entertainment"];

/// Notes stored when the user leaves the field blank
pub const DEFAULT_NOTES: &str = "Expense";

fn default_notes() -> String {
    DEFAULT_NOTES.to_string()
}

/// A single spending entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    #[serde(default = "default_notes")]
    pub notes: String,
}

impl Expense {
    pub fn from_draft(id: String, draft: ExpenseDraft) -> Self {
        Self {
            id,
            date: draft.date,
            category: draft.category,
            amount: draft.amount,
            notes: draft.notes,
        }
    }
}

/// Raw values as typed into an expense form
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub date: Option<NaiveDate>,
    pub category: String,
    pub amount: String,
    pub notes: String,
}

/// A validated expense without an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub notes: String,
}

impl ExpenseForm {
    /// Validate the form. `fallback_date` fills in a missing date (the
    /// selected date, or today).
    pub fn validate(&self, fallback_date: NaiveDate) -> Result<ExpenseDraft, ValidationError> {
        let amount = parse_positive_amount(&self.amount)?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }

        let notes = self.notes.trim();
        let notes = if notes.is_empty() {
            default_notes()
        } else {
            notes.to_string()
        };

        Ok(ExpenseDraft {
            date: self.date.unwrap_or(fallback_date),
            category: category.to_string(),
            amount,
            notes,
        })
    }
}
