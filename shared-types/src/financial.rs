use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Sum of spending in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Breakdown by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: i32,
}

/// One day in a daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// `yyyy-mm-dd`
    pub key: String,
    pub date: NaiveDate,
    pub amount: f64,
    /// Running sum up to and including this day
    pub cumulative: f64,
}

/// Net position of a friend relative to the user.
/// Positive: the friend owes the user. Negative: the user owes the friend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct FriendBalance {
    pub friend_id: String,
    pub name: String,
    pub avatar: String,
    pub balance: f64,
}

/// Financial summary/overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub total: f64,
    pub average_daily: f64,
    pub week_count: i32,
}
