//! Chart capability
//!
//! Pages describe a chart as a kind plus labelled series; drawing is left to
//! a [`ChartRenderer`]. The CLI uses [`TextChartRenderer`].

use analytics::series::short_label;
use shared_types::{CategoryBreakdown, DailyPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    pub fn category_doughnut(breakdown: &[CategoryBreakdown]) -> Self {
        Self {
            kind: ChartKind::Doughnut,
            title: "Spending by category".to_string(),
            labels: breakdown.iter().map(|b| b.category.clone()).collect(),
            values: breakdown.iter().map(|b| b.amount).collect(),
        }
    }

    pub fn daily_bar(series: &[DailyPoint]) -> Self {
        Self {
            kind: ChartKind::Bar,
            title: "Daily spending".to_string(),
            labels: series.iter().map(|p| short_label(p.date)).collect(),
            values: series.iter().map(|p| p.amount).collect(),
        }
    }

    pub fn cumulative_line(series: &[DailyPoint]) -> Self {
        Self {
            kind: ChartKind::Line,
            title: "Cumulative spending".to_string(),
            labels: series.iter().map(|p| short_label(p.date)).collect(),
            values: series.iter().map(|p| p.cumulative).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec) -> String;
}

/// Horizontal bars scaled to the largest value
pub struct TextChartRenderer {
    pub width: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self { width: 30 }
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, spec: &ChartSpec) -> String {
        let mut out = format!("{}\n", spec.title);
        if spec.is_empty() {
            out.push_str("  (no data)\n");
            return out;
        }

        let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = spec.values.iter().cloned().fold(0.0_f64, f64::max);
        let total: f64 = spec.values.iter().sum();

        for (label, value) in spec.labels.iter().zip(&spec.values) {
            let filled = if max > 0.0 {
                ((value / max) * self.width as f64).round() as usize
            } else {
                0
            };
            let glyph = match spec.kind {
                ChartKind::Doughnut => '●',
                ChartKind::Bar => '█',
                ChartKind::Line => '─',
            };
            let bar: String = std::iter::repeat(glyph).take(filled).collect();
            let suffix = match spec.kind {
                ChartKind::Doughnut if total > 0.0 => format!(" {:.2} ({:.0}%)", value, value / total * 100.0),
                _ => format!(" {:.2}", value),
            };
            out.push_str(&format!("  {:<width$} {}{}\n", label, bar, suffix, width = label_width));
        }
        out
    }
}
