use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Upcoming bill the user wants to be reminded about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub paid: bool,
}

impl Reminder {
    /// Unpaid and due within `days` of `today` (overdue ones included)
    pub fn is_upcoming(&self, today: NaiveDate, days: i64) -> bool {
        !self.paid && (self.due_date - today).num_days() <= days
    }
}
