use cashflow_core::formatting::{format_currency, format_month, format_optional_currency};
use cashflow_core::models::KpiSet;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Width the labels are padded to so values line up in one column.
const LABEL_WIDTH: usize = 22;

/// KPI labels and formatted values in display order.
pub fn kpi_entries(k: &KpiSet, currency: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Total income", format_currency(k.income_total, currency)),
        ("Total expense", format_currency(k.expense_total, currency)),
        ("Net flow", format_currency(k.net_flow, currency)),
        (
            "Average ticket",
            format_optional_currency(k.avg_income_ticket, currency),
        ),
        ("Average daily net", format_currency(k.avg_daily_net, currency)),
        ("Transactions", k.transaction_count.to_string()),
        ("Best income month", format_month(k.best_income_month)),
        ("Worst expense month", format_month(k.worst_expense_month)),
    ]
}

// ── KpiPanel ─────────────────────────────────────────────────────────────────

/// Eight KPI readouts, one per line, as `"<label>  <value>"`.
///
/// Missing values (no income, no expenses) render as `n/a`.
pub struct KpiPanel<'a> {
    pub kpis: &'a KpiSet,
    /// Currency symbol appended to amounts.
    pub currency: &'a str,
    pub theme: &'a Theme,
}

impl<'a> KpiPanel<'a> {
    pub fn new(kpis: &'a KpiSet, currency: &'a str, theme: &'a Theme) -> Self {
        Self {
            kpis,
            currency,
            theme,
        }
    }

    /// Label/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        kpi_entries(self.kpis, self.currency)
    }

    fn value_style(&self, label: &str) -> Style {
        match label {
            "Total income" => self.theme.income,
            "Total expense" => self.theme.expense,
            "Net flow" => self.theme.amount_style(self.kpis.net_flow),
            "Average daily net" => self.theme.amount_style(self.kpis.avg_daily_net),
            _ => self.theme.value,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        self.entries()
            .into_iter()
            .map(|(label, value)| {
                let style = self.value_style(label);
                Line::from(vec![
                    Span::styled(format!("{label:<LABEL_WIDTH$}"), self.theme.label),
                    Span::styled(value, style),
                ])
            })
            .collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
