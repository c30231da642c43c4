use analytics::aggregate::{self, AverageMode, RangeFilter};
use analytics::series::daily_series;
use chrono::{Duration, NaiveDate};
use shared_types::validation::parse_positive_amount;
use shared_types::{defaults, keys, new_id, Expense, ExpenseForm, Reminder, User, ValidationError};

use super::{expense_ops, Page};
use crate::chart::ChartSpec;
use crate::context::AppContext;
use crate::sync::{PageKind, SyncKind};

/// Figures shown on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub user: User,
    pub total: f64,
    pub average_daily: f64,
    pub week_count: usize,
    pub month_to_date: f64,
    pub budget_used_percent: f64,
    pub remaining_budget: f64,
    pub top_category: String,
    pub recent: Vec<Expense>,
    pub upcoming_reminders: Vec<Reminder>,
    pub daily_chart: ChartSpec,
    pub category_chart: ChartSpec,
}

pub struct DashboardPage {
    ctx: AppContext,
    pub user: User,
    pub expenses: Vec<Expense>,
    pub reminders: Vec<Reminder>,
}

impl DashboardPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user: defaults::default_user(),
            expenses: Vec::new(),
            reminders: Vec::new(),
        }
    }

    pub fn view(&self) -> DashboardView {
        let today = self.ctx.today();
        let settings = &self.ctx.settings;

        let average_daily = match settings.average_mode {
            AverageMode::FixedWeek => aggregate::average_daily(&self.expenses),
            AverageMode::RangeDays => {
                let start = self.expenses.iter().map(|e| e.date).min().unwrap_or(today);
                aggregate::average_daily_over(&self.expenses, (today - start).num_days() + 1)
            }
        };

        let month_to_date = aggregate::month_to_date_total(&self.expenses, today);
        let week = RangeFilter::trailing(today, 7);
        let series = daily_series(&self.expenses, week.start, week.end);

        let mut upcoming: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|r| r.is_upcoming(today, settings.reminder_window_days))
            .cloned()
            .collect();
        upcoming.sort_by_key(|r| r.due_date);

        DashboardView {
            user: self.user.clone(),
            total: aggregate::total(&self.expenses),
            average_daily,
            week_count: aggregate::count_this_week(&self.expenses, today),
            month_to_date,
            budget_used_percent: aggregate::budget_usage_percent(month_to_date, self.user.budget),
            remaining_budget: self.user.budget - month_to_date,
            top_category: aggregate::describe_top_category(&self.expenses),
            recent: aggregate::recent(&self.expenses, settings.recent_limit),
            upcoming_reminders: upcoming,
            daily_chart: ChartSpec::daily_bar(&series),
            category_chart: ChartSpec::category_doughnut(&aggregate::category_breakdown(&self.expenses)),
        }
    }

    pub fn quick_add(&mut self, form: &ExpenseForm) -> Result<Expense, ValidationError> {
        expense_ops::add_expense(&self.ctx, Self::KIND, &mut self.expenses, form)
    }

    pub fn add_reminder(
        &mut self,
        title: &str,
        amount: &str,
        due_date: NaiveDate,
    ) -> Result<Reminder, ValidationError> {
        let amount = parse_positive_amount(amount)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let reminder = Reminder {
            id: new_id(),
            title: title.to_string(),
            amount,
            due_date,
            paid: false,
        };
        self.reminders.push(reminder.clone());
        self.persist_reminders("Reminder added");
        Ok(reminder)
    }

    /// Mark a reminder paid. Unknown ids are ignored.
    pub fn pay_reminder(&mut self, id: &str) -> bool {
        let Some(reminder) = self.reminders.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        reminder.paid = true;
        self.persist_reminders("Reminder marked as paid");
        true
    }

    pub fn delete_reminder(&mut self, id: &str) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            return false;
        }
        self.persist_reminders("Reminder deleted");
        true
    }

    /// Days until the next unpaid reminder, negative when overdue
    pub fn days_until_next_due(&self) -> Option<i64> {
        let today = self.ctx.today();
        self.reminders
            .iter()
            .filter(|r| !r.paid)
            .map(|r| r.due_date)
            .min()
            .map(|due| (due - today).num_days())
    }

    fn persist_reminders(&self, message: &str) {
        if self.ctx.store.save(keys::REMINDERS, &self.reminders) {
            self.ctx.emit(SyncKind::RemindersUpdated, Self::KIND);
            self.ctx.toaster.success(message);
        } else {
            self.ctx
                .toaster
                .warning(format!("{message} for now, but it could not be saved on this device"));
        }
    }
}

impl Page for DashboardPage {
    const KIND: PageKind = PageKind::Dashboard;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::USER, keys::EXPENSES, keys::REMINDERS];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn seed(&mut self) {
        expense_ops::seed_expenses(&self.ctx, Self::KIND);
    }

    fn load(&mut self) {
        self.user = self.ctx.store.load(keys::USER, &defaults::default_user());
        self.expenses = expense_ops::load_expenses(&self.ctx);
        self.reminders = self.ctx.store.load(keys::REMINDERS, &Vec::new());
    }
}

/// Default due date offered by the reminder form
pub fn default_due_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(7)
}
