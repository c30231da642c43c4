//! Seed and demo data used when nothing has been stored yet.

use chrono::{Duration, NaiveDate};

use crate::expense::{Expense, KNOWN_CATEGORIES};
use crate::split::Friend;
use crate::tip::Tip;
use crate::user::{Currency, User};

/// Default monthly budget for a new profile
pub const DEFAULT_BUDGET: f64 = 5000.0;

pub fn default_user() -> User {
    User {
        name: "Student".to_string(),
        email: "student@edufinance.app".to_string(),
        budget: DEFAULT_BUDGET,
        currency: Currency::Birr,
        notifications: true,
        phone: None,
        avatar: None,
    }
}

pub fn demo_friends() -> Vec<Friend> {
    [
        ("f1", "Abebe", "🧑‍🎓"),
        ("f2", "Sara", "👩‍💻"),
        ("f3", "Dawit", "🧑‍🔬"),
        ("f4", "Hanna", "👩‍🎨"),
    ]
    .into_iter()
    .map(|(id, name, avatar)| Friend {
        id: id.to_string(),
        name: name.to_string(),
        avatar: avatar.to_string(),
    })
    .collect()
}

const SAMPLE_AMOUNTS: [f64; 7] = [45.0, 120.0, 80.0, 60.0, 150.0, 35.0, 95.0];

/// Longest span of generated sample spending, in days
pub const MAX_SAMPLE_DAYS: u32 = 366;

/// Deterministic sample spending, one entry per day for the trailing `days`
/// days ending at `today`, capped at [`MAX_SAMPLE_DAYS`]. Ids are derived
/// from the date so reseeding is idempotent.
pub fn sample_expenses(today: NaiveDate, days: u32) -> Vec<Expense> {
    (0..days.min(MAX_SAMPLE_DAYS))
        .map_while(|offset| {
            let date = today.checked_sub_signed(Duration::days(offset as i64))?;
            let category = KNOWN_CATEGORIES[offset as usize % KNOWN_CATEGORIES.len()];
            Some(Expense {
                id: format!("sample-{}", date.format("%Y-%m-%d")),
                date,
                category: category.to_string(),
                amount: SAMPLE_AMOUNTS[offset as usize % SAMPLE_AMOUNTS.len()],
                notes: format!("Sample {}", category.to_lowercase()),
            })
        })
        .collect()
}

pub fn tips() -> Vec<Tip> {
    vec![
        tip(
            "budget-basics",
            "📊",
            "Build a simple monthly budget",
            "Know where every birr goes before the month starts.",
            &[
                "Write down your monthly income",
                "List fixed costs like rent and transport",
                "Set a limit for food and entertainment",
                "Review your budget at the end of the month",
            ],
        ),
        tip(
            "track-daily",
            "📝",
            "Track spending every day",
            "Small purchases add up faster than you think.",
            &[
                "Log every expense the same day",
                "Check your weekly total every Sunday",
                "Spot your top spending category",
            ],
        ),
        tip(
            "emergency-fund",
            "🛟",
            "Start an emergency fund",
            "A small cushion keeps surprises from becoming debt.",
            &[
                "Open a separate savings account",
                "Save a fixed amount each month",
                "Aim for one month of expenses first",
            ],
        ),
        tip(
            "smart-books",
            "📚",
            "Save on books and supplies",
            "Study materials do not have to be new.",
            &[
                "Ask seniors for used books",
                "Use the library before buying",
                "Share costly references with classmates",
            ],
        ),
        tip(
            "split-fairly",
            "🤝",
            "Split shared costs fairly",
            "Clear records keep friendships and wallets healthy.",
            &[
                "Record shared bills right away",
                "Agree on who pays before ordering",
                "Settle balances at least weekly",
            ],
        ),
    ]
}

fn tip(id: &str, icon: &str, title: &str, preview: &str, checklist: &[&str]) -> Tip {
    Tip {
        id: id.to_string(),
        icon: icon.to_string(),
        title: title.to_string(),
        preview: preview.to_string(),
        checklist: checklist.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_expenses_cover_trailing_days() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let samples = sample_expenses(today, 7);

        assert_eq!(samples.len(), 7);
        assert_eq!(samples[0].date, today);
        assert_eq!(samples[6].date, NaiveDate::from_ymd_opt(2025, 11, 14).unwrap());
        assert!(samples.iter().all(|e| e.amount > 0.0));
        assert_eq!(samples, sample_expenses(today, 7));
    }

    #[test]
    fn test_sample_expenses_bounded() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        assert_eq!(sample_expenses(today, u32::MAX).len(), MAX_SAMPLE_DAYS as usize);

        // Nothing before the earliest representable date
        let earliest = NaiveDate::MIN + Duration::days(2);
        assert_eq!(sample_expenses(earliest, 10).len(), 3);
    }

    #[test]
    fn test_tip_ids_unique() {
        let tips = tips();
        let mut ids: Vec<_> = tips.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tips.len());
    }
}
