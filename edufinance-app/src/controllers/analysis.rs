use analytics::aggregate::{self, CategoryFilter, RangeFilter};
use analytics::series::daily_series;
use chrono::NaiveDate;
use shared_types::{keys, CategoryBreakdown, DailyPoint, Expense, ValidationError};

use super::{expense_ops, Page};
use crate::chart::ChartSpec;
use crate::context::AppContext;
use crate::sync::PageKind;

/// Range presets offered next to the date pickers
pub const PRESET_DAYS: [u32; 3] = [7, 30, 90];

/// Longest trailing range a preset may select, about a century
pub const MAX_RANGE_DAYS: u32 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub range: RangeFilter,
    pub total: f64,
    pub average_daily: f64,
    pub transaction_count: usize,
    pub top_category: String,
    pub breakdown: Vec<CategoryBreakdown>,
    pub series: Vec<DailyPoint>,
    pub charts: Vec<ChartSpec>,
}

pub struct AnalysisPage {
    ctx: AppContext,
    pub expenses: Vec<Expense>,
    range: RangeFilter,
}

impl AnalysisPage {
    pub fn new(ctx: AppContext) -> Self {
        let range = RangeFilter::trailing(ctx.today(), 7);
        Self {
            ctx,
            expenses: Vec::new(),
            range,
        }
    }

    pub fn range(&self) -> &RangeFilter {
        &self.range
    }

    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange);
        }
        self.range.start = start;
        self.range.end = end;
        Ok(())
    }

    /// Trailing `days` ending today, keeping the category selection
    pub fn preset(&mut self, days: u32) -> Result<(), ValidationError> {
        if days == 0 || days > MAX_RANGE_DAYS {
            return Err(ValidationError::InvalidRange);
        }
        let category = self.range.category.clone();
        self.range = RangeFilter {
            category,
            ..RangeFilter::trailing(self.ctx.today(), days)
        };
        Ok(())
    }

    pub fn set_category(&mut self, raw: &str) {
        self.range.category = CategoryFilter::parse(raw);
    }

    pub fn view(&self) -> AnalysisView {
        let filtered = aggregate::filter_by_range(&self.expenses, &self.range);
        let breakdown = aggregate::category_breakdown(&filtered);
        let series = daily_series(&filtered, self.range.start, self.range.end);

        let charts = vec![
            ChartSpec::category_doughnut(&breakdown),
            ChartSpec::daily_bar(&series),
            ChartSpec::cumulative_line(&series),
        ];

        AnalysisView {
            range: self.range.clone(),
            total: aggregate::total(&filtered),
            average_daily: aggregate::average_for(self.ctx.settings.average_mode, &filtered, &self.range),
            transaction_count: filtered.len(),
            top_category: aggregate::describe_top_category(&filtered),
            breakdown,
            series,
            charts,
        }
    }
}

impl Page for AnalysisPage {
    const KIND: PageKind = PageKind::Analysis;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::EXPENSES];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn seed(&mut self) {
        expense_ops::seed_expenses(&self.ctx, Self::KIND);
    }

    fn load(&mut self) {
        self.expenses = expense_ops::load_expenses(&self.ctx);
    }
}
