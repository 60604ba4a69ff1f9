//! Per-category shares of a total.

use std::collections::{HashMap, HashSet};

use crate::{
    stats::{Period, matching},
    transaction::{Transaction, TransactionKind},
};

/// The number of days the daily average is spread over.
pub const DAYS_PER_AVERAGE: f64 = 30.0;

/// The category labels the user has switched off in the breakdown chart.
///
/// Hiding a category only changes what is displayed, the transactions are
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenCategories(HashSet<String>);

impl HiddenCategories {
    /// Hide `label` if it is shown, or show it if it is hidden.
    pub fn toggle(&mut self, label: &str) {
        if !self.0.remove(label) {
            self.0.insert(label.to_owned());
        }
    }

    /// Whether `label` is hidden.
    pub fn is_hidden(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Show every category again.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// The total of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The category label.
    pub label: String,
    /// The color of the first transaction seen in the category.
    pub color: String,
    /// The icon of the first transaction seen in the category.
    pub icon: String,
    /// The sum of the category's amounts.
    pub amount: f64,
    /// The rounded share of the visible total, 0 when hidden.
    pub percent: u32,
    /// Whether the category is switched off.
    pub hidden: bool,
}

/// Category totals for one period and kind, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    /// The categories, sorted by descending amount.
    pub shares: Vec<CategoryShare>,
    /// The sum over every category.
    pub total: f64,
    /// The sum over the categories that are not hidden.
    pub visible_total: f64,
}

impl Breakdown {
    /// The visible total spread over [DAYS_PER_AVERAGE] days.
    pub fn average_per_day(&self) -> f64 {
        self.visible_total / DAYS_PER_AVERAGE
    }
}

/// Group the transactions of `kind` within `period` by category label.
///
/// Percentages are taken of the visible total so that hiding a category
/// redistributes its share among the rest. If nothing is visible every
/// percentage is 0.
pub fn category_breakdown(
    transactions: &[Transaction],
    period: Period,
    kind: TransactionKind,
    hidden: &HiddenCategories,
) -> Breakdown {
    let mut shares: Vec<CategoryShare> = Vec::new();
    let mut index_by_label: HashMap<&str, usize> = HashMap::new();

    for transaction in matching(transactions, period, kind) {
        match index_by_label.get(transaction.category.as_str()) {
            Some(&index) => shares[index].amount += transaction.amount,
            None => {
                index_by_label.insert(&transaction.category, shares.len());
                shares.push(CategoryShare {
                    label: transaction.category.clone(),
                    color: transaction.category_color.clone(),
                    icon: transaction.category_icon.clone(),
                    amount: transaction.amount,
                    percent: 0,
                    hidden: hidden.is_hidden(&transaction.category),
                });
            }
        }
    }

    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let total = shares.iter().map(|share| share.amount).sum();
    let visible_total: f64 = shares
        .iter()
        .filter(|share| !share.hidden)
        .map(|share| share.amount)
        .sum();

    if visible_total > 0.0 {
        for share in shares.iter_mut().filter(|share| !share.hidden) {
            share.percent = (share.amount / visible_total * 100.0).round() as u32;
        }
    }

    Breakdown {
        shares,
        total,
        visible_total,
    }
}
