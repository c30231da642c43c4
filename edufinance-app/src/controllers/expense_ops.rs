//! Expense mutations shared by every page with an expense form

use chrono::NaiveDate;
use shared_types::{defaults, keys, new_id, Expense, ExpenseForm, ValidationError};

use crate::context::AppContext;
use crate::sync::{PageKind, SyncKind};

pub fn load_expenses(ctx: &AppContext) -> Vec<Expense> {
    ctx.store.load(keys::EXPENSES, &Vec::new())
}

/// Write deterministic demo spending for the trailing days when the stored
/// collection is empty and seeding is enabled. Other pages are notified of
/// the write. Returns whether a seed was persisted.
pub fn seed_expenses(ctx: &AppContext, source: PageKind) -> bool {
    if !ctx.settings.seed_demo_data || !load_expenses(ctx).is_empty() {
        return false;
    }

    let seeded = defaults::sample_expenses(ctx.today(), ctx.settings.seed_days);
    if seeded.is_empty() || !ctx.store.save(keys::EXPENSES, &seeded) {
        return false;
    }
    tracing::info!("Seeded {} sample expenses", seeded.len());
    ctx.emit(SyncKind::ExpensesUpdated, source);
    true
}

/// Date preselected in expense forms: the last picked date, else today
pub fn selected_date(ctx: &AppContext) -> NaiveDate {
    ctx.store
        .load_optional(keys::SELECTED_DATE)
        .unwrap_or_else(|| ctx.today())
}

pub fn add_expense(
    ctx: &AppContext,
    source: PageKind,
    expenses: &mut Vec<Expense>,
    form: &ExpenseForm,
) -> Result<Expense, ValidationError> {
    let draft = form.validate(selected_date(ctx))?;
    let expense = Expense::from_draft(new_id(), draft);

    expenses.push(expense.clone());
    persist(ctx, source, expenses, "Expense added");
    Ok(expense)
}

/// Replace the expense with `id`, keeping its id. Returns `Ok(false)` when no
/// such expense exists.
pub fn edit_expense(
    ctx: &AppContext,
    source: PageKind,
    expenses: &mut [Expense],
    id: &str,
    form: &ExpenseForm,
) -> Result<bool, ValidationError> {
    let Some(index) = expenses.iter().position(|e| e.id == id) else {
        tracing::debug!("Edit of unknown expense {} ignored", id);
        // Still reject bad input so the form shows the message
        form.validate(selected_date(ctx))?;
        return Ok(false);
    };

    let draft = form.validate(expenses[index].date)?;
    expenses[index] = Expense::from_draft(id.to_string(), draft);
    persist(ctx, source, expenses, "Expense updated");
    Ok(true)
}

pub fn delete_expense(
    ctx: &AppContext,
    source: PageKind,
    expenses: &mut Vec<Expense>,
    id: &str,
) -> bool {
    let before = expenses.len();
    expenses.retain(|e| e.id != id);
    if expenses.len() == before {
        tracing::debug!("Delete of unknown expense {} ignored", id);
        return false;
    }

    persist(ctx, source, expenses, "Expense deleted");
    true
}

/// Write the collection, notify the other pages and tell the user whether
/// the change actually reached storage
fn persist(ctx: &AppContext, source: PageKind, expenses: &[Expense], message: &str) -> bool {
    let saved = ctx.store.save(keys::EXPENSES, expenses);
    if saved {
        ctx.emit(SyncKind::ExpensesUpdated, source);
        ctx.toaster.success(message);
    } else {
        ctx.toaster
            .warning(format!("{message} for now, but it could not be saved on this device"));
    }
    saved
}
