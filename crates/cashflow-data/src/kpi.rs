//! Whole-dataset KPIs computed from cleaned transactions.

use cashflow_core::error::{CashFlowError, Result};
use cashflow_core::models::{Kind, KpiSet, Month, MonthlySummary, Transaction};
use rust_decimal::Decimal;

use crate::aggregator::CashFlowAggregator;

/// Stateless KPI calculator.
pub struct KpiCalculator;

impl KpiCalculator {
    /// Compute the [`KpiSet`] for `transactions`.
    ///
    /// Totals are taken from the transactions themselves; best and worst
    /// months come from `monthly`, with the earliest month winning ties.
    pub fn calculate(transactions: &[Transaction], monthly: &[MonthlySummary]) -> Result<KpiSet> {
        if transactions.is_empty() {
            return Err(CashFlowError::EmptyDataset(
                "no transactions to compute KPIs from".to_string(),
            ));
        }

        let mut income_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;
        let mut income_count = 0usize;
        for tx in transactions {
            match tx.kind() {
                Kind::Income => {
                    income_total += tx.amount;
                    income_count += 1;
                }
                // Zero-amount rows are expenses but add nothing.
                Kind::Expense => expense_total += tx.amount,
            }
        }

        let days = CashFlowAggregator::aggregate_daily(transactions);
        let avg_daily_net =
            days.iter().map(|d| d.net).sum::<Decimal>() / Decimal::from(days.len());

        let avg_income_ticket =
            (income_count > 0).then(|| income_total / Decimal::from(income_count));

        Ok(KpiSet {
            income_total,
            expense_total,
            net_flow: income_total + expense_total,
            transaction_count: transactions.len(),
            avg_daily_net,
            avg_income_ticket,
            best_income_month: Self::best_income_month(monthly),
            worst_expense_month: Self::worst_expense_month(monthly),
        })
    }

    /// Month with the strictly highest positive income total.
    pub fn best_income_month(monthly: &[MonthlySummary]) -> Option<Month> {
        let mut best: Option<&MonthlySummary> = None;
        for m in monthly.iter().filter(|m| m.income_total > Decimal::ZERO) {
            if best.map_or(true, |b| m.income_total > b.income_total) {
                best = Some(m);
            }
        }
        best.map(|m| m.month)
    }

    /// Month with the strictly lowest negative expense total.
    pub fn worst_expense_month(monthly: &[MonthlySummary]) -> Option<Month> {
        let mut worst: Option<&MonthlySummary> = None;
        for m in monthly.iter().filter(|m| m.expense_total < Decimal::ZERO) {
            if worst.map_or(true, |w| m.expense_total < w.expense_total) {
                worst = Some(m);
            }
        }
        worst.map(|m| m.month)
    }
}
