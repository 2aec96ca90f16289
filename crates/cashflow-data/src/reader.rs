//! Statement export parsing and row cleaning.
//!
//! Splits a `;`-delimited byte stream into records, decodes each field with
//! the configured single-byte or UTF-8 encoding, maps the nine positional
//! columns and keeps only the rows whose value date and amount both parse.

use std::io::Read;
use std::path::Path;

use cashflow_core::data_processors::{AmountParser, DateParser};
use cashflow_core::error::{CashFlowError, Result};
use cashflow_core::models::{TextEncoding, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of positional columns in a statement export.
pub const COLUMN_COUNT: usize = 9;

/// Field separator used by the exports.
pub const DEFAULT_DELIMITER: u8 = b';';

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

// ── Options ───────────────────────────────────────────────────────────────────

/// How to split and decode a statement export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    pub encoding: TextEncoding,
    pub delimiter: u8,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Latin1,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ReaderOptions {
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }
}

// ── Row rejections ────────────────────────────────────────────────────────────

/// Why a single line did not become a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    /// The line does not have exactly [`COLUMN_COUNT`] fields.
    FieldCount(usize),
    /// A field is not valid in the configured encoding.
    Encoding,
    /// The amount column is not a number.
    Amount,
    /// The value-date column is not a day-first date.
    ValueDate,
}

/// Per-run counters of kept and dropped lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Non-blank lines seen.
    pub lines_read: usize,
    /// Lines that became transactions.
    pub rows_retained: usize,
    /// Lines with the wrong number of fields.
    pub wrong_field_count: usize,
    /// Lines that failed to decode.
    pub encoding_errors: usize,
    /// Rows dropped for an unparseable amount.
    pub invalid_amount: usize,
    /// Rows dropped for an unparseable value date.
    pub invalid_value_date: usize,
}

impl ParseStats {
    fn record(&mut self, rejection: RowRejection) {
        match rejection {
            RowRejection::FieldCount(_) => self.wrong_field_count += 1,
            RowRejection::Encoding => self.encoding_errors += 1,
            RowRejection::Amount => self.invalid_amount += 1,
            RowRejection::ValueDate => self.invalid_value_date += 1,
        }
    }

    /// Total number of lines that were read but not retained.
    pub fn rows_dropped(&self) -> usize {
        self.lines_read - self.rows_retained
    }
}

/// Cleaned output of [`parse_statement`].
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    /// Retained rows in input order.
    pub transactions: Vec<Transaction>,
    pub stats: ParseStats,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a statement export held in memory.
///
/// Row-level problems are counted in [`ParseStats`] and never fail the call.
/// Returns [`CashFlowError::UnrecoverableInput`] when the stream as a whole
/// is unusable: empty, binary, not delimited, or undecodable on every line.
pub fn parse_statement(bytes: &[u8], options: &ReaderOptions) -> Result<ParsedStatement> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CashFlowError::UnrecoverableInput(
            "the file is empty".to_string(),
        ));
    }
    if bytes.contains(&0) {
        return Err(CashFlowError::UnrecoverableInput(
            "the file is not text (binary or UTF-16 content)".to_string(),
        ));
    }

    // Quotes are ordinary text in these exports; an unbalanced `"` must not
    // merge the following lines into one field.
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(bytes);

    let mut stats = ParseStats::default();
    let mut transactions = Vec::new();
    let mut delimited_lines = 0usize;

    for result in rdr.byte_records() {
        stats.lines_read += 1;

        let record = result.map_err(|e| {
            CashFlowError::UnrecoverableInput(format!(
                "line {} could not be split into fields: {e}",
                stats.lines_read
            ))
        })?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(stats.lines_read as u64);

        if record.len() > 1 {
            delimited_lines += 1;
        }

        match map_record(&record, options.encoding) {
            Ok(tx) => {
                stats.rows_retained += 1;
                transactions.push(tx);
            }
            Err(rejection) => {
                debug!("Dropping line {}: {:?}", line, rejection);
                stats.record(rejection);
            }
        }
    }

    if delimited_lines == 0 {
        return Err(CashFlowError::UnrecoverableInput(format!(
            "no line contains the '{}' delimiter",
            options.delimiter as char
        )));
    }
    if stats.encoding_errors == stats.lines_read {
        return Err(CashFlowError::UnrecoverableInput(format!(
            "no line could be decoded as {:?}",
            options.encoding
        )));
    }

    if stats.rows_retained == 0 {
        warn!(
            "All {} lines were dropped during cleaning",
            stats.lines_read
        );
    }

    debug!(
        "Parsed statement: {} read, {} retained, {} dropped",
        stats.lines_read,
        stats.rows_retained,
        stats.rows_dropped()
    );

    Ok(ParsedStatement {
        transactions,
        stats,
    })
}

/// Read everything from `reader` and parse it.
pub fn parse_statement_from_reader<R: Read>(
    mut reader: R,
    options: &ReaderOptions,
) -> Result<ParsedStatement> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_statement(&buf, options)
}

/// Read and parse a statement export from disk.
pub fn load_statement_file(path: &Path, options: &ReaderOptions) -> Result<ParsedStatement> {
    let bytes = std::fs::read(path).map_err(|source| CashFlowError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    parse_statement(&bytes, options)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map one record onto the fixed nine-column schema.
///
/// Columns: process date, value date, code, concept, notes, office, amount,
/// balance, remittance.
fn map_record(
    record: &csv::ByteRecord,
    encoding: TextEncoding,
) -> std::result::Result<Transaction, RowRejection> {
    if record.len() != COLUMN_COUNT {
        return Err(RowRejection::FieldCount(record.len()));
    }

    let fields = record
        .iter()
        .map(|raw| encoding.decode(raw).ok_or(RowRejection::Encoding))
        .collect::<std::result::Result<Vec<String>, _>>()?;

    let [process_raw, value_raw, code, concept, notes, office, amount_raw, balance_raw, remittance]: [String; COLUMN_COUNT] =
        fields
            .try_into()
            .map_err(|f: Vec<String>| RowRejection::FieldCount(f.len()))?;

    let value_date = DateParser::parse_day_first(&value_raw).ok_or(RowRejection::ValueDate)?;
    let amount = AmountParser::parse(&amount_raw).ok_or(RowRejection::Amount)?;

    let process_date = DateParser::parse_day_first(&process_raw);
    let balance = AmountParser::parse(&balance_raw);

    Ok(Transaction {
        process_date,
        value_date,
        code,
        concept,
        notes,
        office,
        amount,
        balance,
        remittance,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
