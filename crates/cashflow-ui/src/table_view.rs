//! Monthly summary and transaction tables for the cash-flow TUI.
//!
//! The monthly table has one row per month plus a highlighted totals row;
//! the transaction table is a scrollable window over the retained rows.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use cashflow_core::formatting;
use cashflow_core::models::{MonthlySummary, Transaction};
use cashflow_data::aggregator::CashFlowAggregator;

use crate::themes::Theme;

/// Width of the concept column in the transaction table.
pub const CONCEPT_WIDTH: usize = 36;

/// Truncate `s` to at most `max` display columns, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ── Monthly table ─────────────────────────────────────────────────────────────

/// Render the monthly summary table into `area`.
pub fn render_monthly_table(
    frame: &mut Frame,
    area: Rect,
    months: &[MonthlySummary],
    currency: &str,
    theme: &Theme,
) {
    let header_cells = ["Month", "Income", "Expense", "Net flow"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = months
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(m.month.label()),
                Cell::from(formatting::format_currency(m.income_total, currency))
                    .style(theme.income),
                Cell::from(formatting::format_currency(m.expense_total, currency))
                    .style(theme.expense),
                Cell::from(formatting::format_currency(m.net_flow, currency))
                    .style(theme.amount_style(m.net_flow)),
            ])
            .style(style)
        })
        .collect();

    let totals = CashFlowAggregator::calculate_totals(months);
    let total_row = Row::new(vec![
        Cell::from("TOTAL"),
        Cell::from(formatting::format_currency(totals.income_total, currency)),
        Cell::from(formatting::format_currency(totals.expense_total, currency)),
        Cell::from(formatting::format_currency(totals.net_flow(), currency)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(18),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Monthly Summary "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Transaction table ─────────────────────────────────────────────────────────

/// Number of body rows that fit in `area` once borders and header are drawn.
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

/// Render the cleaned transactions starting at `offset`.
pub fn render_transactions_table(
    frame: &mut Frame,
    area: Rect,
    transactions: &[Transaction],
    offset: usize,
    currency: &str,
    theme: &Theme,
) {
    let header_cells = ["Value date", "Concept", "Office", "Amount", "Balance"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let offset = offset.min(transactions.len().saturating_sub(1));
    let rows: Vec<Row> = transactions
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows(area))
        .map(|(i, tx)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let balance = tx
                .balance
                .map(|b| formatting::format_currency(b, currency))
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(tx.value_date.format("%d/%m/%Y").to_string()),
                Cell::from(truncate_to_width(&tx.concept, CONCEPT_WIDTH)),
                Cell::from(tx.office.clone()),
                Cell::from(formatting::format_currency(tx.amount, currency))
                    .style(theme.kind_style(tx.kind())),
                Cell::from(balance),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(CONCEPT_WIDTH as u16 + 1),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(16),
    ];

    let title = format!(
        " Transactions {}-{} of {} ",
        (offset + 1).min(transactions.len()),
        (offset + visible_rows(area)).min(transactions.len()),
        transactions.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Placeholders ──────────────────────────────────────────────────────────────

/// Render a "no data" placeholder when cleaning kept no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, lines_read: usize, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            format!("None of the {lines_read} lines had a valid value date and amount."),
            theme.dim,
        )),
        Line::from(Span::styled(
            "Check the export format and try another file.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cash Flow Report "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
