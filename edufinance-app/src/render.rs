//! Plain-text rendering of page views for the terminal

use analytics::balances::BalanceDirection;
use analytics::format_currency;
use shared_types::{Currency, Expense, FriendBalance, Reminder, SplitExpense, Tip, User};
use std::fmt::Write;

use crate::chart::ChartRenderer;
use crate::controllers::analysis::AnalysisView;
use crate::controllers::dashboard::DashboardView;

pub fn dashboard(view: &DashboardView, renderer: &dyn ChartRenderer) -> String {
    let currency = view.user.currency;
    let money = |amount: f64| format_currency(amount, currency);

    let mut out = String::new();
    let _ = writeln!(out, "Hello, {}", view.user.name);
    let _ = writeln!(out, "  Total spent      {}", money(view.total));
    let _ = writeln!(out, "  Average daily    {}", money(view.average_daily));
    let _ = writeln!(out, "  This week        {} transactions", view.week_count);
    let _ = writeln!(
        out,
        "  This month       {} of {} ({:.0}%)",
        money(view.month_to_date),
        money(view.user.budget),
        view.budget_used_percent
    );
    let _ = writeln!(out, "  Remaining        {}", money(view.remaining_budget));
    let _ = writeln!(out, "  Top category     {}", view.top_category);

    out.push('\n');
    out.push_str(&renderer.render(&view.daily_chart));

    if !view.recent.is_empty() {
        out.push_str("\nRecent expenses\n");
        out.push_str(&expense_table(&view.recent, currency));
    }
    if !view.upcoming_reminders.is_empty() {
        out.push_str("\nUpcoming bills\n");
        out.push_str(&reminders(&view.upcoming_reminders, currency));
    }
    out
}

pub fn expense_table(expenses: &[Expense], currency: Currency) -> String {
    if expenses.is_empty() {
        return "  No expenses yet\n".to_string();
    }

    let mut out = String::new();
    for expense in expenses {
        let _ = writeln!(
            out,
            "  {}  {:<14} {:>14}  {}  [{}]",
            expense.date,
            expense.category,
            format_currency(expense.amount, currency),
            expense.notes,
            expense.id
        );
    }
    out
}

pub fn reminders(reminders: &[Reminder], currency: Currency) -> String {
    let mut out = String::new();
    for reminder in reminders {
        let _ = writeln!(
            out,
            "  {}  {:<20} {:>14}{}  [{}]",
            reminder.due_date,
            reminder.title,
            format_currency(reminder.amount, currency),
            if reminder.paid { "  paid" } else { "" },
            reminder.id
        );
    }
    out
}

pub fn analysis(view: &AnalysisView, currency: Currency, renderer: &dyn ChartRenderer) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} to {}", view.range.start, view.range.end);
    let _ = writeln!(out, "  Total            {}", format_currency(view.total, currency));
    let _ = writeln!(out, "  Average daily    {}", format_currency(view.average_daily, currency));
    let _ = writeln!(out, "  Transactions     {}", view.transaction_count);
    let _ = writeln!(out, "  Top category     {}", view.top_category);

    for chart in &view.charts {
        out.push('\n');
        out.push_str(&renderer.render(chart));
    }
    out
}

pub fn balances(balances: &[(FriendBalance, BalanceDirection)], currency: Currency) -> String {
    if balances.is_empty() {
        return "  All settled up\n".to_string();
    }

    let mut out = String::new();
    for (balance, direction) in balances {
        let amount = format_currency(balance.balance.abs(), currency);
        let line = match direction {
            BalanceDirection::OwesYou => format!("{} owes you {}", balance.name, amount),
            BalanceDirection::YouOwe => format!("You owe {} {}", balance.name, amount),
            BalanceDirection::Settled => format!("{} is settled", balance.name),
        };
        let _ = writeln!(out, "  {} {}", balance.avatar, line);
    }
    out
}

pub fn split_history(
    splits: &[SplitExpense],
    currency: Currency,
    name_of: impl Fn(&str) -> String,
) -> String {
    if splits.is_empty() {
        return "  No shared expenses yet\n".to_string();
    }

    let mut out = String::new();
    for split in splits {
        let between: Vec<String> = split.split_between.iter().map(|p| name_of(p)).collect();
        let _ = writeln!(
            out,
            "  {}  {:<16} {:>14}  paid by {}, split with {}{}  [{}]",
            split.date,
            split.description,
            format_currency(split.total_amount, currency),
            name_of(&split.paid_by),
            between.join(", "),
            if split.settled { "  settled" } else { "" },
            split.id
        );
    }
    out
}

pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Name           {}", user.name);
    let _ = writeln!(out, "  Email          {}", user.email);
    let _ = writeln!(out, "  Budget         {}", format_currency(user.budget, user.currency));
    let _ = writeln!(out, "  Currency       {}", user.currency.code());
    let _ = writeln!(out, "  Notifications  {}", if user.notifications { "on" } else { "off" });
    if let Some(phone) = &user.phone {
        let _ = writeln!(out, "  Phone          {}", phone);
    }
    if user.avatar.is_some() {
        let _ = writeln!(out, "  Avatar         set");
    }
    out
}

pub fn tips(tips: &[Tip], is_completed: impl Fn(&str) -> bool, percent: f64) -> String {
    let mut out = format!("Progress: {:.0}%\n", percent);
    for tip in tips {
        let mark = if is_completed(&tip.id) { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {} {}  ({})", mark, tip.icon, tip.title, tip.id);
        let _ = writeln!(out, "      {}", tip.preview);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_lines() {
        let rows = vec![
            (
                FriendBalance {
                    friend_id: "f1".to_string(),
                    name: "Abebe".to_string(),
                    avatar: "A".to_string(),
                    balance: 150.0,
                },
                BalanceDirection::OwesYou,
            ),
            (
                FriendBalance {
                    friend_id: "f3".to_string(),
                    name: "Dawit".to_string(),
                    avatar: "D".to_string(),
                    balance: -45.0,
                },
                BalanceDirection::YouOwe,
            ),
        ];
        let text = balances(&rows, Currency::Usd);
        assert!(text.contains("Abebe owes you $150.00"));
        assert!(text.contains("You owe Dawit $45.00"));
        assert_eq!(balances(&[], Currency::Usd), "  All settled up\n");
    }

    #[test]
    fn test_profile_lines() {
        let user = shared_types::defaults::default_user();
        let text = profile(&user);
        assert!(text.contains("Br 5,000.00"));
        assert!(text.contains("ETB"));
        assert!(!text.contains("Phone"));
    }
}
