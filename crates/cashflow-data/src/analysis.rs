//! Main analysis pipeline for the cash-flow report.
//!
//! Orchestrates parsing, monthly aggregation and KPI computation, returning
//! an [`AnalysisOutcome`] ready for the presentation layer.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use cashflow_core::error::Result;
use cashflow_core::models::{KpiSet, MonthlySummary, Transaction};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::CashFlowAggregator;
use crate::kpi::KpiCalculator;
use crate::reader::{self, ParseStats, ParsedStatement, ReaderOptions};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
///
/// The timestamp and timings differ on every run. They are left out of the
/// serialized form once cleared with [`AnalysisOutcome::without_run_details`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// File the statement was read from, or `None` for in-memory/stdin input.
    pub source: Option<String>,
    /// Per-reason line counters from the reader.
    pub stats: ParseStats,
    /// Wall-clock seconds spent parsing and cleaning rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_time_seconds: Option<f64>,
    /// Wall-clock seconds spent aggregating and computing KPIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_time_seconds: Option<f64>,
}

impl AnalysisMetadata {
    fn clear_run_details(&mut self) {
        self.generated_at = None;
        self.parse_time_seconds = None;
        self.aggregate_time_seconds = None;
    }
}

/// A statement with at least one retained transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Retained transactions in input order.
    pub transactions: Vec<Transaction>,
    /// One row per month with data, ascending.
    pub monthly: Vec<MonthlySummary>,
    pub kpis: KpiSet,
    pub metadata: AnalysisMetadata,
}

/// A readable statement in which no row survived cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyReport {
    pub metadata: AnalysisMetadata,
}

/// Result of a successful run. Unreadable input is reported as `Err` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Report(CashFlowReport),
    Empty(EmptyReport),
}

impl AnalysisOutcome {
    pub fn metadata(&self) -> &AnalysisMetadata {
        match self {
            AnalysisOutcome::Report(r) => &r.metadata,
            AnalysisOutcome::Empty(e) => &e.metadata,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AnalysisOutcome::Empty(_))
    }

    /// Drop the timestamp and timings so the same input always serializes
    /// to the same document.
    pub fn without_run_details(mut self) -> Self {
        match &mut self {
            AnalysisOutcome::Report(r) => r.metadata.clear_run_details(),
            AnalysisOutcome::Empty(e) => e.metadata.clear_run_details(),
        }
        self
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline over an in-memory export.
///
/// 1. Parse and clean rows via [`reader::parse_statement`].
/// 2. Build the monthly summary via [`CashFlowAggregator`].
/// 3. Compute KPIs via [`KpiCalculator`].
///
/// The same bytes always produce the same transactions, summary and KPIs.
pub fn analyze_bytes(bytes: &[u8], options: &ReaderOptions) -> Result<AnalysisOutcome> {
    let parse_start = Instant::now();
    let parsed = reader::parse_statement(bytes, options)?;
    let parse_time = parse_start.elapsed().as_secs_f64();

    build_outcome(parsed, None, parse_time)
}

/// Read everything from `input` and run [`analyze_bytes`] on it.
pub fn analyze_reader<R: Read>(input: R, options: &ReaderOptions) -> Result<AnalysisOutcome> {
    let parse_start = Instant::now();
    let parsed = reader::parse_statement_from_reader(input, options)?;
    let parse_time = parse_start.elapsed().as_secs_f64();

    build_outcome(parsed, None, parse_time)
}

/// Read an export from disk and run the pipeline on it.
pub fn analyze_file(path: &Path, options: &ReaderOptions) -> Result<AnalysisOutcome> {
    let parse_start = Instant::now();
    let parsed = reader::load_statement_file(path, options)?;
    let parse_time = parse_start.elapsed().as_secs_f64();

    build_outcome(parsed, Some(path.display().to_string()), parse_time)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn build_outcome(
    parsed: ParsedStatement,
    source: Option<String>,
    parse_time_seconds: f64,
) -> Result<AnalysisOutcome> {
    let ParsedStatement {
        transactions,
        stats,
    } = parsed;

    if transactions.is_empty() {
        info!(
            "No usable transactions after cleaning ({} lines read)",
            stats.lines_read
        );
        return Ok(AnalysisOutcome::Empty(EmptyReport {
            metadata: AnalysisMetadata {
                generated_at: Some(Utc::now().to_rfc3339()),
                source,
                stats,
                parse_time_seconds: Some(parse_time_seconds),
                aggregate_time_seconds: Some(0.0),
            },
        }));
    }

    let aggregate_start = Instant::now();
    let monthly = CashFlowAggregator::aggregate_monthly(&transactions);
    let kpis = KpiCalculator::calculate(&transactions, &monthly)?;
    let aggregate_time_seconds = aggregate_start.elapsed().as_secs_f64();

    info!(
        "Analysed {} transactions across {} months ({} lines dropped)",
        transactions.len(),
        monthly.len(),
        stats.rows_dropped()
    );

    Ok(AnalysisOutcome::Report(CashFlowReport {
        transactions,
        monthly,
        kpis,
        metadata: AnalysisMetadata {
            generated_at: Some(Utc::now().to_rfc3339()),
            source,
            stats,
            parse_time_seconds: Some(parse_time_seconds),
            aggregate_time_seconds: Some(aggregate_time_seconds),
        },
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_core::models::{Month, TextEncoding};
    use cashflow_core::CashFlowError;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::TempDir;

    const SALARY: &str = "01/01/2024;01/01/2024;001;Nomina;Enero;0001;1000,00;1000,00;R1";
    const RENT: &str = "02/01/2024;02/01/2024;002;Alquiler;;0001;-400,00;600,00;R2";
    const FEB_SHOP: &str = "03/02/2024;03/02/2024;003;Compra;;0001;-55,20;544,80;R3";

    fn bytes(rows: &[&str]) -> Vec<u8> {
        let mut out = rows.join("\n").into_bytes();
        out.push(b'\n');
        out
    }

    fn report(rows: &[&str]) -> CashFlowReport {
        match analyze_bytes(&bytes(rows), &ReaderOptions::default()).unwrap() {
            AnalysisOutcome::Report(r) => r,
            AnalysisOutcome::Empty(_) => panic!("expected a report"),
        }
    }

    #[test]
    fn test_analyze_concrete_scenario() {
        let r = report(&[SALARY, RENT]);

        assert_eq!(r.transactions.len(), 2);
        assert_eq!(r.monthly.len(), 1);
        assert_eq!(r.monthly[0].month, Month::new(2024, 1).unwrap());
        assert_eq!(r.monthly[0].net_flow, dec!(600));
        assert_eq!(r.kpis.income_total, dec!(1000));
        assert_eq!(r.kpis.expense_total, dec!(-400));
        assert_eq!(r.kpis.transaction_count, 2);
        assert_eq!(r.kpis.avg_income_ticket, Some(dec!(1000)));
        assert_eq!(r.metadata.stats.rows_retained, 2);
        assert!(r.metadata.source.is_none());
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let input = bytes(&["Fecha;Valor;...", SALARY, RENT, FEB_SHOP, "garbage"]);
        let first = analyze_bytes(&input, &ReaderOptions::default()).unwrap();
        let second = analyze_bytes(&input, &ReaderOptions::default()).unwrap();

        match (first, second) {
            (AnalysisOutcome::Report(a), AnalysisOutcome::Report(b)) => {
                assert_eq!(a.transactions, b.transactions);
                assert_eq!(a.monthly, b.monthly);
                assert_eq!(a.kpis, b.kpis);
                assert_eq!(a.metadata.stats, b.metadata.stats);
            }
            other => panic!("expected two reports, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_all_rows_dropped_is_empty_outcome() {
        let input = bytes(&[
            "Fecha;Valor;Codigo;Concepto;Notas;Oficina;Importe;Saldo;Remesa",
            "01/01/2024;not-a-date;001;X;;O;10,00;;R",
        ]);
        let outcome = analyze_bytes(&input, &ReaderOptions::default()).unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.metadata().stats.lines_read, 2);
        assert_eq!(outcome.metadata().stats.rows_retained, 0);
    }

    #[test]
    fn test_analyze_empty_input_is_fatal() {
        let err = analyze_bytes(b"", &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, CashFlowError::UnrecoverableInput(_)));
    }

    #[test]
    fn test_analyze_undelimited_input_is_fatal() {
        let err = analyze_bytes(b"just some text\nmore text\n", &ReaderOptions::default())
            .unwrap_err();
        assert!(matches!(err, CashFlowError::UnrecoverableInput(_)));
        assert!(err.user_message().starts_with("Error processing the file:"));
    }

    #[test]
    fn test_analyze_reader() {
        let input = bytes(&[SALARY, FEB_SHOP]);
        let outcome = analyze_reader(input.as_slice(), &ReaderOptions::default()).unwrap();
        match outcome {
            AnalysisOutcome::Report(r) => assert_eq!(r.monthly.len(), 2),
            AnalysisOutcome::Empty(_) => panic!("expected a report"),
        }
    }

    #[test]
    fn test_analyze_file_records_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movements.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        // Latin-1 "Nómina".
        f.write_all(b"01/01/2024;01/01/2024;001;N\xf3mina;;0001;1000,00;;R1\n")
            .unwrap();
        drop(f);

        let outcome = analyze_file(&path, &ReaderOptions::with_encoding(TextEncoding::Latin1))
            .unwrap();
        assert_eq!(
            outcome.metadata().source.as_deref(),
            Some(path.display().to_string().as_str())
        );
        match outcome {
            AnalysisOutcome::Report(r) => assert_eq!(r.transactions[0].concept, "Nómina"),
            AnalysisOutcome::Empty(_) => panic!("expected a report"),
        }
    }

    #[test]
    fn test_analyze_file_missing_is_file_read_error() {
        let dir = TempDir::new().unwrap();
        let err = analyze_file(&dir.path().join("absent.csv"), &ReaderOptions::default())
            .unwrap_err();
        assert!(matches!(err, CashFlowError::FileRead { .. }));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = analyze_bytes(&bytes(&[SALARY]), &ReaderOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "report");
        assert_eq!(json["monthly"][0]["month"], "2024-01");
        assert_eq!(json["kpis"]["best_income_month"], "2024-01");
        assert!(json["kpis"]["worst_expense_month"].is_null());

        let empty = analyze_bytes(b"a;b\n", &ReaderOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["status"], "empty");
    }

    #[test]
    fn test_cent_amounts_serialize_exactly() {
        let input = bytes(&[
            "01/01/2024;01/01/2024;001;A;;0001;0,10;0,10;R1",
            "02/01/2024;02/01/2024;002;B;;0001;0,20;0,30;R2",
        ]);
        let outcome = analyze_bytes(&input, &ReaderOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["kpis"]["income_total"], serde_json::json!(0.3));
        assert_eq!(json["monthly"][0]["income_total"], serde_json::json!(0.3));
        assert_eq!(json["transactions"][1]["balance"], serde_json::json!(0.3));
    }

    #[test]
    fn test_without_run_details_is_reproducible() {
        let input = bytes(&[SALARY, RENT, FEB_SHOP]);
        let render = || {
            let outcome = analyze_bytes(&input, &ReaderOptions::default())
                .unwrap()
                .without_run_details();
            serde_json::to_string_pretty(&outcome).unwrap()
        };

        let first = render();
        assert_eq!(first, render());
        assert!(!first.contains("generated_at"));
        assert!(!first.contains("time_seconds"));
        assert!(first.contains("\"stats\""));
    }

    #[test]
    fn test_run_details_present_by_default() {
        let outcome = analyze_bytes(&bytes(&[SALARY]), &ReaderOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();
        assert!(json["metadata"]["generated_at"].is_string());
        assert!(json["metadata"]["parse_time_seconds"].is_number());

        let empty = analyze_bytes(b"a;b\n", &ReaderOptions::default())
            .unwrap()
            .without_run_details();
        assert!(empty.metadata().generated_at.is_none());
    }
}
