//! Storage key namespace. Every persisted value lives under one of these.

pub const THEME: &str = "edufinance_theme";
pub const USER: &str = "edufinance_user";
pub const EXPENSES: &str = "edufinance_expenses";
pub const SPLIT_EXPENSES: &str = "edufinance_split_expenses";
pub const FRIENDS: &str = "edufinance_friends";
pub const SESSION: &str = "edufinance_session";
pub const TIPS_PROGRESS: &str = "edufinance_tips_progress";
pub const REMINDERS: &str = "edufinance_reminders";
pub const SELECTED_DATE: &str = "edufinance_selected_date";
pub const ACCOUNTS: &str = "edufinance_accounts";

pub const ALL: [&str; 10] = [
    THEME,
    USER,
    EXPENSES,
    SPLIT_EXPENSES,
    FRIENDS,
    SESSION,
    TIPS_PROGRESS,
    REMINDERS,
    SELECTED_DATE,
    ACCOUNTS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let unique: HashSet<_> = ALL.iter().collect();
        assert_eq!(unique.len(), ALL.len());
        assert!(ALL.iter().all(|k| k.starts_with("edufinance_")));
    }
}
