//! Month by month totals for the trend chart.

use time::Month;

use crate::{
    stats::{Period, total},
    transaction::{Transaction, TransactionKind},
};

/// The months of a year in calendar order.
const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The monthly totals of one kind of transaction over a calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    /// The calendar year.
    pub year: i32,
    /// The total for each month, January first.
    pub totals: [f64; 12],
    /// The largest monthly total, but never less than 1 so the chart can
    /// scale bars by it.
    pub max: f64,
}

impl MonthlyTrend {
    /// The total for `month`.
    pub fn get(&self, month: Month) -> f64 {
        self.totals[month as usize - 1]
    }
}

/// The total of transactions of `kind` in the given month.
pub fn month_total(
    transactions: &[Transaction],
    year: i32,
    month: Month,
    kind: TransactionKind,
) -> f64 {
    total(transactions, Period::Month { year, month }, kind)
}

/// Compute the 12 monthly totals of `year`.
pub fn monthly_trend(
    transactions: &[Transaction],
    year: i32,
    kind: TransactionKind,
) -> MonthlyTrend {
    let totals = MONTHS.map(|month| month_total(transactions, year, month, kind));
    let max = totals.iter().copied().fold(1.0, f64::max);

    MonthlyTrend { year, totals, max }
}

/// The change from `previous` to `current` as a percentage of `previous`.
///
/// Growth from nothing counts as 100% and no change from nothing as 0%.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// The percentage change of the given month's total over the month before.
///
/// The month before January is December of the previous year.
pub fn month_over_month(
    transactions: &[Transaction],
    year: i32,
    month: Month,
    kind: TransactionKind,
) -> f64 {
    let current = month_total(transactions, year, month, kind);
    let (previous_year, previous_month) = match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    };
    let previous = month_total(transactions, previous_year, previous_month, kind);

    percent_change(previous, current)
}
