//! Plain-text report for non-interactive output.

use std::fmt::Write;

use cashflow_core::formatting::format_currency;
use cashflow_data::aggregator::CashFlowAggregator;
use cashflow_data::analysis::{AnalysisMetadata, AnalysisOutcome, CashFlowReport};

use crate::components::header::{period_label, TITLE};
use crate::components::metrics::kpi_entries;

/// Render `outcome` as a multi-line text report.
pub fn render_text(outcome: &AnalysisOutcome, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(60));
    out.push('\n');

    match outcome {
        AnalysisOutcome::Report(report) => write_report(&mut out, report, currency),
        AnalysisOutcome::Empty(empty) => {
            write_source(&mut out, &empty.metadata);
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "No data: none of the {} lines had a valid value date and amount.",
                empty.metadata.stats.lines_read
            );
        }
    }
    out
}

fn write_source(out: &mut String, metadata: &AnalysisMetadata) {
    let source = metadata.source.as_deref().unwrap_or("stdin");
    let _ = writeln!(out, "Source: {source}");
}

fn write_report(out: &mut String, report: &CashFlowReport, currency: &str) {
    write_source(out, &report.metadata);
    let _ = writeln!(out, "Period: {}", period_label(&report.monthly));
    let _ = writeln!(out);

    for (label, value) in kpi_entries(&report.kpis, currency) {
        let _ = writeln!(out, "{label:<22}{value}");
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<16}{:>18}{:>18}{:>18}",
        "Month", "Income", "Expense", "Net flow"
    );
    for m in &report.monthly {
        let _ = writeln!(
            out,
            "{:<16}{:>18}{:>18}{:>18}",
            m.month.label(),
            format_currency(m.income_total, currency),
            format_currency(m.expense_total, currency),
            format_currency(m.net_flow, currency)
        );
    }
    let totals = CashFlowAggregator::calculate_totals(&report.monthly);
    let _ = writeln!(
        out,
        "{:<16}{:>18}{:>18}{:>18}",
        "TOTAL",
        format_currency(totals.income_total, currency),
        format_currency(totals.expense_total, currency),
        format_currency(totals.net_flow(), currency)
    );
    let _ = writeln!(out);

    let stats = &report.metadata.stats;
    let _ = writeln!(
        out,
        "Lines read: {}, retained: {}, dropped: {}",
        stats.lines_read,
        stats.rows_retained,
        stats.rows_dropped()
    );
}
