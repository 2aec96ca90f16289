//! Monthly income/expense bars and the net-flow line.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use cashflow_core::formatting;
use cashflow_core::models::MonthlySummary;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::themes::Theme;

pub const CHART_TITLE: &str = "Income, Expense and Net Flow by Month";

/// Bar heights for one month in whole currency units.
///
/// Expenses are drawn upwards by magnitude; the bar text keeps the sign.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBars {
    pub label: String,
    pub income: u64,
    pub expense: u64,
}

pub fn month_bars(months: &[MonthlySummary]) -> Vec<MonthBars> {
    months
        .iter()
        .map(|m| MonthBars {
            label: m.month.short_label(),
            income: whole_units(m.income_total.max(Decimal::ZERO)),
            expense: whole_units(m.expense_total.min(Decimal::ZERO).abs()),
        })
        .collect()
}

fn whole_units(amount: Decimal) -> u64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// `(index, net_flow)` points for the line chart, one per month.
///
/// Plot coordinates only; every label is formatted from the exact totals.
pub fn net_flow_points(months: &[MonthlySummary]) -> Vec<(f64, f64)> {
    months
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, m.net_flow.to_f64().unwrap_or_default()))
        .collect()
}

/// Y-axis range covering every point and zero, padded by 10 %.
pub fn y_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let (lo, hi) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let pad = ((hi - lo) * 0.1).max(1.0);
    [lo - pad, hi + pad]
}

/// Render the grouped bar chart above the net-flow line inside one block.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    months: &[MonthlySummary],
    currency: &str,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {CHART_TITLE} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [bars_area, line_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    render_bars(frame, bars_area, months, currency, theme);
    render_net_line(frame, line_area, months, currency, theme);
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    months: &[MonthlySummary],
    currency: &str,
    theme: &Theme,
) {
    let mut chart = BarChart::default()
        .bar_width(6)
        .bar_gap(1)
        .group_gap(3)
        .value_style(theme.bold);

    for (summary, bars) in months.iter().zip(month_bars(months)) {
        let group = [
            Bar::default()
                .value(bars.income)
                .text_value(formatting::format_number(summary.income_total, 0))
                .style(theme.income),
            Bar::default()
                .value(bars.expense)
                .text_value(formatting::format_number(summary.expense_total, 0))
                .style(theme.expense),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(bars.label))
                .bars(&group),
        );
    }

    let legend = format!(" Income / Expense ({currency}) ");
    frame.render_widget(chart.block(Block::default().title(legend)), area);
}

fn render_net_line(
    frame: &mut Frame,
    area: Rect,
    months: &[MonthlySummary],
    currency: &str,
    theme: &Theme,
) {
    let points = net_flow_points(months);
    let [y_lo, y_hi] = y_bounds(&points);
    let x_hi = points.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .name("Net flow")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.net_line)
        .data(&points);

    let x_labels: Vec<Line> = match (months.first(), months.last()) {
        (Some(first), Some(last)) if months.len() > 1 => vec![
            Line::from(first.month.short_label()),
            Line::from(last.month.short_label()),
        ],
        (Some(only), _) => vec![Line::from(only.month.short_label())],
        _ => Vec::new(),
    };
    let y_label = |y: f64| {
        let amount = Decimal::from_f64(y).unwrap_or_default();
        Line::from(formatting::format_currency(amount, currency))
    };
    let y_labels = vec![y_label(y_lo), y_label(y_hi)];

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(theme.dim)
                .bounds([0.0, x_hi])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.dim)
                .bounds([y_lo, y_hi])
                .labels(y_labels),
        )
        .style(Style::default());

    frame.render_widget(chart, area);
}
