//! Totals for the dashboard, the transaction list and the assets view.

use std::collections::BTreeMap;

use time::Date;

use crate::{
    account::Account,
    stats::Period,
    transaction::{Transaction, TransactionKind},
};

/// Money in and out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CashFlow {
    /// The sum of income.
    pub income: f64,
    /// The sum of expenses.
    pub expense: f64,
}

impl CashFlow {
    /// Income less expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Sum income and expenses, either over all transactions or only those in `period`.
pub fn cash_flow(transactions: &[Transaction], period: Option<Period>) -> CashFlow {
    transactions
        .iter()
        .filter(|transaction| period.is_none_or(|period| period.contains(transaction.time)))
        .fold(CashFlow::default(), |mut flow, transaction| {
            match transaction.kind {
                TransactionKind::Income => flow.income += transaction.amount,
                TransactionKind::Expense => flow.expense += transaction.amount,
            }
            flow
        })
}

/// What the user owns and owes across their accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetWorth {
    /// The sum of positive balances.
    pub assets: f64,
    /// The sum of the magnitudes of negative balances.
    pub liabilities: f64,
    /// The sum of every balance.
    pub total: f64,
}

/// Split the account balances into assets and liabilities.
pub fn net_worth(accounts: &[Account]) -> NetWorth {
    accounts
        .iter()
        .fold(NetWorth::default(), |mut worth, account| {
            if account.balance > 0.0 {
                worth.assets += account.balance;
            } else if account.balance < 0.0 {
                worth.liabilities += account.balance.abs();
            }
            worth.total += account.balance;
            worth
        })
}

/// Group transactions by date, newest date first.
///
/// Transactions keep their relative order within a day.
pub fn group_by_date(transactions: &[Transaction]) -> Vec<(Date, Vec<&Transaction>)> {
    let mut groups: BTreeMap<Date, Vec<&Transaction>> = BTreeMap::new();

    for transaction in transactions {
        groups.entry(transaction.time).or_default().push(transaction);
    }

    groups.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        account::NewAccount,
        stats::{
            CashFlow, NetWorth, Period, cash_flow, group_by_date, net_worth,
            test_data::{expense, transaction},
        },
        transaction::TransactionKind,
    };

    #[test]
    fn cash_flow_splits_by_kind() {
        let transactions = vec![
            transaction("1", TransactionKind::Income, 4200.0, "薪资", date!(2026 - 02 - 21)),
            expense("2", 85.2, "餐饮", date!(2026 - 02 - 26)),
            expense("3", 14.8, "交通", date!(2026 - 01 - 26)),
        ];

        let all = cash_flow(&transactions, None);
        let february = cash_flow(&transactions, Some(Period::month_of(date!(2026 - 02 - 01))));

        assert_eq!(
            all,
            CashFlow {
                income: 4200.0,
                expense: 100.0
            }
        );
        assert_eq!(all.net(), 4100.0);
        assert_eq!(february.expense, 85.2);
    }

    #[test]
    fn net_worth_separates_debts() {
        let mut bank = NewAccount::named("招商银行").with_id("a1".to_owned());
        bank.balance = 86400.0;
        let mut card = NewAccount::named("信用卡").with_id("a2".to_owned());
        card.balance = -2400.0;
        let empty = NewAccount::named("现金").with_id("a3".to_owned());

        let worth = net_worth(&[bank, card, empty]);

        assert_eq!(
            worth,
            NetWorth {
                assets: 86400.0,
                liabilities: 2400.0,
                total: 84000.0
            }
        );
    }

    #[test]
    fn groups_newest_date_first() {
        let transactions = vec![
            expense("1", 1.0, "餐饮", date!(2026 - 02 - 20)),
            expense("2", 2.0, "餐饮", date!(2026 - 02 - 26)),
            expense("3", 3.0, "餐饮", date!(2026 - 02 - 20)),
        ];

        let groups = group_by_date(&transactions);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, date!(2026 - 02 - 26));
        let ids: Vec<_> = groups[1].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }
}
