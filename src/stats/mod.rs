//! Aggregations behind the statistics and dashboard views.
//!
//! Everything here is pure arithmetic over the transactions and accounts the
//! client already holds in memory. Nothing is fetched or stored.

mod breakdown;
mod period;
mod summary;
mod trend;

pub use breakdown::{Breakdown, CategoryShare, HiddenCategories, category_breakdown};
pub use period::Period;
pub use summary::{CashFlow, NetWorth, cash_flow, group_by_date, net_worth};
pub use trend::{MonthlyTrend, month_over_month, month_total, monthly_trend, percent_change};

use crate::transaction::{Transaction, TransactionKind};

/// The transactions of `kind` that fall within `period`.
pub fn matching<'a>(
    transactions: &'a [Transaction],
    period: Period,
    kind: TransactionKind,
) -> impl Iterator<Item = &'a Transaction> {
    transactions
        .iter()
        .filter(move |transaction| transaction.kind == kind && period.contains(transaction.time))
}

/// The sum of the amounts of the transactions of `kind` within `period`.
pub fn total(transactions: &[Transaction], period: Period, kind: TransactionKind) -> f64 {
    matching(transactions, period, kind)
        .map(|transaction| transaction.amount)
        .sum()
}
