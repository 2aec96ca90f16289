use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income or expense, derived from the sign of a transaction amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Strictly positive amount.
    Income,
    /// Negative or zero amount.
    Expense,
}

impl Kind {
    /// Classify an amount. Zero is an expense.
    pub fn classify(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Kind::Income
        } else {
            Kind::Expense
        }
    }
}

/// A calendar month (day component dropped).
///
/// Ordering is chronological. Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// Returns `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month `date` falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Long label, e.g. `"January 2024"`.
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Short label, e.g. `"Jan 24"`, used on chart axes.
    pub fn short_label(&self) -> String {
        self.first_day().format("%b %y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

impl TryFrom<String> for Month {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid month key: {s}"))?;
        let year: i32 = y.parse().map_err(|_| format!("invalid year in {s}"))?;
        let month: u32 = m.parse().map_err(|_| format!("invalid month in {s}"))?;
        Month::new(year, month).ok_or_else(|| format!("month out of range: {s}"))
    }
}

/// Text encoding of the statement export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// ISO-8859-1: every byte maps to the code point of the same value.
    #[default]
    Latin1,
    /// UTF-8; lines that are not valid UTF-8 are skipped.
    Utf8,
}

impl TextEncoding {
    /// Decode one line. Returns `None` when the bytes are not valid in this
    /// encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
        }
    }
}

/// One cleaned statement row.
///
/// Only rows with both a parseable value date and a parseable amount become
/// transactions; the text columns are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date the movement was processed/posted, when parseable.
    pub process_date: Option<NaiveDate>,
    /// Date the movement is effective for balance purposes.
    pub value_date: NaiveDate,
    pub code: String,
    pub concept: String,
    pub notes: String,
    pub office: String,
    /// Signed amount; expenses are negative.
    pub amount: Decimal,
    /// Running balance after the movement, when parseable.
    pub balance: Option<Decimal>,
    pub remittance: String,
}

impl Transaction {
    pub fn kind(&self) -> Kind {
        Kind::classify(self.amount)
    }

    pub fn month(&self) -> Month {
        Month::from_date(self.value_date)
    }
}

/// Income, expense and net flow for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: Month,
    /// Sum of income amounts (always `>= 0`).
    pub income_total: Decimal,
    /// Sum of expense amounts (always `<= 0`).
    pub expense_total: Decimal,
    /// `income_total + expense_total`.
    pub net_flow: Decimal,
}

/// Whole-dataset statistics.
///
/// Fields that need a non-empty subset are `None` when that subset is empty,
/// so "no data" never looks like a real zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub net_flow: Decimal,
    pub transaction_count: usize,
    /// Mean of per-day net sums over the days that have transactions.
    pub avg_daily_net: Decimal,
    /// Mean income amount; `None` without income transactions.
    pub avg_income_ticket: Option<Decimal>,
    /// Month with the highest income total; `None` without income.
    pub best_income_month: Option<Month>,
    /// Month with the most negative expense total; `None` without expenses.
    pub worst_expense_month: Option<Month>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── Kind ──────────────────────────────────────────────────────────────

    #[test]
    fn test_kind_positive_is_income() {
        assert_eq!(Kind::classify(dec!(0.01)), Kind::Income);
        assert_eq!(Kind::classify(dec!(1000)), Kind::Income);
    }

    #[test]
    fn test_kind_zero_is_expense() {
        assert_eq!(Kind::classify(Decimal::ZERO), Kind::Expense);
        assert_eq!(Kind::classify(dec!(-0.00)), Kind::Expense);
    }

    #[test]
    fn test_kind_negative_is_expense() {
        assert_eq!(Kind::classify(dec!(-400)), Kind::Expense);
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Kind::Income).unwrap(), r#""income""#);
        let back: Kind = serde_json::from_str(r#""expense""#).unwrap();
        assert_eq!(back, Kind::Expense);
    }

    // ── Month ─────────────────────────────────────────────────────────────

    #[test]
    fn test_month_from_date_drops_day() {
        let m = Month::from_date(date(2024, 3, 31));
        assert_eq!(m, Month::new(2024, 3).unwrap());
        assert_eq!(m.first_day(), date(2024, 3, 1));
    }

    #[test]
    fn test_month_new_rejects_out_of_range() {
        assert!(Month::new(2024, 0).is_none());
        assert!(Month::new(2024, 13).is_none());
    }

    #[test]
    fn test_month_ordering_is_chronological() {
        let dec = Month::new(2023, 12).unwrap();
        let jan = Month::new(2024, 1).unwrap();
        let feb = Month::new(2024, 2).unwrap();
        let mut months = vec![feb, dec, jan];
        months.sort();
        assert_eq!(months, vec![dec, jan, feb]);
    }

    #[test]
    fn test_month_labels() {
        let m = Month::new(2024, 1).unwrap();
        assert_eq!(m.to_string(), "2024-01");
        assert_eq!(m.label(), "January 2024");
        assert_eq!(m.short_label(), "Jan 24");
    }

    #[test]
    fn test_month_serde_as_key() {
        let m = Month::new(2024, 11).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#""2024-11""#);
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_month_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Month>(r#""2024-13""#).is_err());
        assert!(serde_json::from_str::<Month>(r#""january""#).is_err());
    }

    // ── TextEncoding ──────────────────────────────────────────────────────

    #[test]
    fn test_latin1_decodes_every_byte() {
        // "Nómina" in ISO-8859-1.
        let bytes = [0x4e, 0xf3, 0x6d, 0x69, 0x6e, 0x61];
        assert_eq!(TextEncoding::Latin1.decode(&bytes).unwrap(), "Nómina");
    }

    #[test]
    fn test_utf8_rejects_latin1_bytes() {
        let bytes = [0x4e, 0xf3, 0x6d, 0x69, 0x6e, 0x61];
        assert!(TextEncoding::Utf8.decode(&bytes).is_none());
        assert_eq!(TextEncoding::Utf8.decode("Nómina".as_bytes()).unwrap(), "Nómina");
    }

    // ── Transaction ───────────────────────────────────────────────────────

    #[test]
    fn test_transaction_derived_fields() {
        let tx = Transaction {
            process_date: None,
            value_date: date(2024, 2, 14),
            code: "C".to_string(),
            concept: "Rent".to_string(),
            notes: String::new(),
            office: "O".to_string(),
            amount: dec!(-400.00),
            balance: Some(dec!(600.00)),
            remittance: "R".to_string(),
        };
        assert_eq!(tx.kind(), Kind::Expense);
        assert_eq!(tx.month(), Month::new(2024, 2).unwrap());
    }
}
