use analytics::export::{self, ExportError};
use chrono::NaiveDate;
use shared_types::{defaults, keys, Currency, Expense, ExpenseForm, User, ValidationError};

use super::{expense_ops, Page};
use crate::context::AppContext;
use crate::sync::PageKind;

pub struct ExpensesPage {
    ctx: AppContext,
    pub expenses: Vec<Expense>,
    pub selected_date: NaiveDate,
    currency: Currency,
}

impl ExpensesPage {
    pub fn new(ctx: AppContext) -> Self {
        let selected_date = ctx.today();
        Self {
            ctx,
            expenses: Vec::new(),
            selected_date,
            currency: Currency::default(),
        }
    }

    /// Every expense, newest first
    pub fn list(&self) -> Vec<Expense> {
        analytics::aggregate::recent(&self.expenses, self.expenses.len())
    }

    pub fn add(&mut self, form: &ExpenseForm) -> Result<Expense, ValidationError> {
        expense_ops::add_expense(&self.ctx, Self::KIND, &mut self.expenses, form)
    }

    pub fn edit(&mut self, id: &str, form: &ExpenseForm) -> Result<bool, ValidationError> {
        expense_ops::edit_expense(&self.ctx, Self::KIND, &mut self.expenses, id, form)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        expense_ops::delete_expense(&self.ctx, Self::KIND, &mut self.expenses, id)
    }

    /// Remember the date picked in the form for later entries
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        self.selected_date = date;
        self.ctx.store.save(keys::SELECTED_DATE, &date)
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        let csv = export::expenses_to_csv(&self.list())?;
        tracing::info!("Exported {} expenses as CSV", self.expenses.len());
        Ok(csv)
    }

    pub fn csv_file_name(&self) -> String {
        export::csv_file_name(self.ctx.today())
    }

    pub fn summary_text(&self) -> String {
        export::summary_text(&self.expenses, self.ctx.today(), self.currency)
    }
}

impl Page for ExpensesPage {
    const KIND: PageKind = PageKind::Expenses;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::EXPENSES, keys::SELECTED_DATE, keys::USER];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn load(&mut self) {
        self.expenses = expense_ops::load_expenses(&self.ctx);
        self.selected_date = expense_ops::selected_date(&self.ctx);
        self.currency = self
            .ctx
            .store
            .load::<User>(keys::USER, &defaults::default_user())
            .currency;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, test_context};

    fn form(date: &str, category: &str, amount: &str, notes: &str) -> ExpenseForm {
        ExpenseForm {
            date: Some(day(date)),
            category: category.to_string(),
            amount: amount.to_string(),
            notes: notes.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let mut page = ExpensesPage::new(test_context(day("2025-11-20")));
        page.load();
        page.add(&form("2025-11-18", "Food", "10", "")).unwrap();
        page.add(&form("2025-11-20", "Books", "30", "")).unwrap();
        page.add(&form("2025-11-19", "Transport", "20", "")).unwrap();

        let dates: Vec<_> = page.list().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day("2025-11-20"), day("2025-11-19"), day("2025-11-18")]);
    }

    #[tokio::test]
    async fn test_select_date_persists() {
        let ctx = test_context(day("2025-11-20"));
        let mut page = ExpensesPage::new(ctx.clone());
        page.load();
        assert_eq!(page.selected_date, day("2025-11-20"));

        assert!(page.select_date(day("2025-11-01")));
        let mut reopened = ExpensesPage::new(ctx);
        reopened.load();
        assert_eq!(reopened.selected_date, day("2025-11-01"));
    }

    #[tokio::test]
    async fn test_csv_export_quotes_notes() {
        let mut page = ExpensesPage::new(test_context(day("2025-11-20")));
        page.load();
        page.add(&form("2025-11-20", "Food", "12.5", "Lunch, \"big\" one")).unwrap();

        let csv = page.export_csv().unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines, vec![
            "Date,Category,Amount,Notes",
            "2025-11-20,Food,12.50,\"Lunch, \"\"big\"\" one\"",
        ]);
        assert_eq!(page.csv_file_name(), "edufinance-expenses-2025-11-20.csv");
    }

    #[tokio::test]
    async fn test_summary_uses_profile_currency() {
        let ctx = test_context(day("2025-11-20"));
        let mut user = defaults::default_user();
        user.currency = Currency::Usd;
        ctx.store.save(keys::USER, &user);

        let mut page = ExpensesPage::new(ctx);
        page.load();
        page.add(&form("2025-11-20", "Food", "120", "")).unwrap();
        page.add(&form("2025-11-19", "Transport", "80", "")).unwrap();

        assert_eq!(
            page.summary_text(),
            "EduFinance summary: total spent $200.00, average daily $28.57, 2 transactions this week"
        );
    }
}
