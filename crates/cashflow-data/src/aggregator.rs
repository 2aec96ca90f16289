//! Cash-flow aggregation over monthly and daily windows.

use std::collections::BTreeMap;

use cashflow_core::models::{Kind, Month, MonthlySummary, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── PeriodTotals ──────────────────────────────────────────────────────────────

/// Income and expense totals accumulated across multiple transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

impl PeriodTotals {
    /// Add a single transaction to the running totals.
    pub fn add_transaction(&mut self, tx: &Transaction) {
        match tx.kind() {
            Kind::Income => self.income_total += tx.amount,
            Kind::Expense => self.expense_total += tx.amount,
        }
    }

    /// `income_total + expense_total`.
    pub fn net_flow(&self) -> Decimal {
        self.income_total + self.expense_total
    }
}

// ── DailyNet ──────────────────────────────────────────────────────────────────

/// Net amount of all transactions on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNet {
    pub date: NaiveDate,
    pub net: Decimal,
}

// ── CashFlowAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups transactions by time period.
pub struct CashFlowAggregator;

impl CashFlowAggregator {
    /// Group by calendar month of the value date, then by kind.
    ///
    /// A month with no income (or no expense) transactions gets zero for
    /// that total rather than being left out. Sorted by month ascending.
    pub fn aggregate_monthly(transactions: &[Transaction]) -> Vec<MonthlySummary> {
        let mut map: BTreeMap<Month, PeriodTotals> = BTreeMap::new();

        for tx in transactions {
            map.entry(tx.month()).or_default().add_transaction(tx);
        }

        map.into_iter()
            .map(|(month, totals)| MonthlySummary {
                month,
                income_total: totals.income_total,
                expense_total: totals.expense_total,
                net_flow: totals.net_flow(),
            })
            .collect()
    }

    /// Net amount per calendar day of the value date.
    ///
    /// Only days with at least one transaction appear. Sorted ascending.
    pub fn aggregate_daily(transactions: &[Transaction]) -> Vec<DailyNet> {
        let mut map: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

        for tx in transactions {
            *map.entry(tx.value_date).or_default() += tx.amount;
        }

        map.into_iter()
            .map(|(date, net)| DailyNet { date, net })
            .collect()
    }

    /// Sum the monthly rows into a single [`PeriodTotals`] for a totals row.
    pub fn calculate_totals(months: &[MonthlySummary]) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        for month in months {
            totals.income_total += month.income_total;
            totals.expense_total += month.expense_total;
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
