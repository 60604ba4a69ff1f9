//! Defines the transaction models: the storage row, the client-facing shape and
//! the request bodies for creating and updating transactions.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    money::{deserialize_amount, null_to_default},
    timezone::iso_date,
    user::UserID,
};

/// Transaction IDs are assigned by the remote store.
pub type TransactionId = String;

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
}

impl TransactionKind {
    /// The effect of a transaction of this kind and `amount` on an account balance.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Expense => -amount,
            TransactionKind::Income => amount,
        }
    }

    /// The name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

// ============================================================================
// STORAGE
// ============================================================================

/// A row of the `transactions` table, with the store's snake_case column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Expense or income.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The magnitude of the transaction; the sign comes from `kind`.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// The category label copied at creation.
    pub category: String,
    /// The category icon copied at creation.
    #[serde(default, deserialize_with = "null_to_default")]
    pub category_icon: String,
    /// The category color copied at creation.
    #[serde(default, deserialize_with = "null_to_default")]
    pub category_color: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The name of the account the transaction was recorded against.
    #[serde(default, deserialize_with = "null_to_default")]
    pub account: String,
    /// The ID of the account, if known.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// A free-text note.
    #[serde(default, deserialize_with = "null_to_default")]
    pub note: String,
}

/// The values to insert for a new transaction row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransactionRow {
    pub user_id: UserID,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub category_icon: String,
    pub category_color: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub note: String,
}

/// The columns to change on an existing transaction row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionChanges {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    #[serde(with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// `Some(None)` unlinks the transaction from its account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Option<AccountId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransactionChanges {
    /// Whether applying the changes would leave the row untouched.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// An expense or income as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Expense or income.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The magnitude of the transaction.
    pub amount: f64,
    /// The category label.
    pub category: String,
    /// The category icon.
    #[serde(default)]
    pub category_icon: String,
    /// The category color.
    #[serde(default)]
    pub category_color: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Mirrors `date`; the client filters by this field.
    #[serde(with = "iso_date")]
    pub time: Date,
    /// The name of the account.
    #[serde(default)]
    pub account: String,
    /// The ID of the account, if known.
    #[serde(default, rename = "account_id")]
    pub account_id: Option<AccountId>,
    /// A free-text note.
    #[serde(default)]
    pub note: String,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            amount: row.amount,
            category: row.category,
            category_icon: row.category_icon,
            category_color: row.category_color,
            date: row.date,
            time: row.date,
            account: row.account,
            account_id: row.account_id,
            note: row.note,
        }
    }
}

/// The data a client sends to record a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub category_icon: String,
    pub category_color: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub account: String,
    #[serde(
        default,
        rename = "account_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<AccountId>,
    pub note: String,
}

impl NewTransaction {
    /// Turn the new transaction into a local [Transaction] with the given ID.
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            category_icon: self.category_icon,
            category_color: self.category_color,
            date: self.date,
            time: self.date,
            account: self.account,
            account_id: self.account_id,
            note: self.note,
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// The JSON body for creating or updating a transaction.
///
/// The date may be sent as either `date` or `time`, with `date` taking
/// precedence. Unknown fields, such as `id`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub time: Option<Date>,
    pub account: Option<String>,
    /// `null` unlinks the account; a missing field leaves it unchanged.
    #[serde(
        default,
        rename = "account_id",
        alias = "accountId",
        deserialize_with = "present_or_null"
    )]
    pub account_id: Option<Option<AccountId>>,
    pub note: Option<String>,
}

impl TransactionRequest {
    /// Build the row for a new transaction owned by `user_id`.
    ///
    /// `today` is used when no date is given.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::MissingField] if the type, amount or category is missing,
    /// - or [Error::InvalidField] if the amount is negative or not finite.
    pub fn into_new_row(self, user_id: UserID, today: Date) -> Result<NewTransactionRow, Error> {
        let kind = self.kind.ok_or(Error::MissingField("type"))?;
        let amount = self.amount.ok_or(Error::MissingField("amount"))?;
        validate_amount(amount)?;
        let category = self
            .category
            .filter(|category| !category.is_empty())
            .ok_or(Error::MissingField("category"))?;

        Ok(NewTransactionRow {
            user_id,
            kind,
            amount,
            category,
            category_icon: self.category_icon.unwrap_or_default(),
            category_color: self.category_color.unwrap_or_default(),
            date: self.date.or(self.time).unwrap_or(today),
            account: self.account.unwrap_or_default(),
            account_id: self.account_id.flatten().filter(|id| !id.is_empty()),
            note: self.note.unwrap_or_default(),
        })
    }

    /// The column changes requested by the body.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::MissingField] if the category is blanked,
    /// - or [Error::InvalidField] if the amount is negative or not finite.
    pub fn into_changes(self) -> Result<TransactionChanges, Error> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if self.category.as_deref() == Some("") {
            return Err(Error::MissingField("category"));
        }

        Ok(TransactionChanges {
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            category_icon: self.category_icon,
            category_color: self.category_color,
            date: self.date.or(self.time),
            account: self.account,
            account_id: self
                .account_id
                .map(|id| id.filter(|id| !id.is_empty())),
            note: self.note,
        })
    }
}

/// Keeps an explicit `null` apart from a missing field.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<AccountId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<AccountId>::deserialize(deserializer).map(Some)
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidField {
            field: "amount",
            reason: "amount must be a non-negative number".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        transaction::core::{
            Transaction, TransactionKind, TransactionRequest, TransactionRow,
        },
        user::UserID,
    };

    #[test]
    fn kind_gives_sign() {
        assert_eq!(TransactionKind::Expense.signed(12.5), -12.5);
        assert_eq!(TransactionKind::Income.signed(12.5), 12.5);
    }

    #[test]
    fn new_row_defaults_optional_fields() {
        let request: TransactionRequest = serde_json::from_value(json!({
            "type": "expense",
            "amount": 85.2,
            "category": "餐饮",
        }))
        .unwrap();

        let row = request
            .into_new_row(UserID::new("u1"), date!(2026 - 02 - 26))
            .unwrap();

        assert_eq!(row.kind, TransactionKind::Expense);
        assert_eq!(row.date, date!(2026 - 02 - 26));
        assert_eq!(row.category_icon, "");
        assert_eq!(row.account, "");
        assert_eq!(row.account_id, None);
        assert_eq!(row.note, "");
    }

    #[test]
    fn new_row_accepts_time_as_date() {
        let request: TransactionRequest = serde_json::from_value(json!({
            "type": "income",
            "amount": 4200,
            "category": "薪资转帐",
            "time": "2026-02-21",
        }))
        .unwrap();

        let row = request
            .into_new_row(UserID::new("u1"), date!(2026 - 03 - 01))
            .unwrap();

        assert_eq!(row.date, date!(2026 - 02 - 21));
    }

    #[test]
    fn new_row_requires_type_amount_and_category() {
        let missing_type = TransactionRequest {
            amount: Some(1.0),
            category: Some("Food".to_owned()),
            ..Default::default()
        };
        let missing_amount = TransactionRequest {
            kind: Some(TransactionKind::Expense),
            category: Some("Food".to_owned()),
            ..Default::default()
        };
        let missing_category = TransactionRequest {
            kind: Some(TransactionKind::Expense),
            amount: Some(1.0),
            ..Default::default()
        };
        let today = date!(2026 - 02 - 26);

        assert_eq!(
            missing_type.into_new_row(UserID::new("u1"), today),
            Err(Error::MissingField("type"))
        );
        assert_eq!(
            missing_amount.into_new_row(UserID::new("u1"), today),
            Err(Error::MissingField("amount"))
        );
        assert_eq!(
            missing_category.into_new_row(UserID::new("u1"), today),
            Err(Error::MissingField("category"))
        );
    }

    #[test]
    fn changes_tell_missing_account_id_from_null() {
        let parse = |body| {
            serde_json::from_value::<TransactionRequest>(body)
                .unwrap()
                .into_changes()
                .unwrap()
                .account_id
        };

        assert_eq!(parse(json!({"note": "x"})), None);
        assert_eq!(parse(json!({"account_id": null})), Some(None));
        assert_eq!(parse(json!({"account_id": ""})), Some(None));
        assert_eq!(
            parse(json!({"account_id": "a1"})),
            Some(Some("a1".to_owned()))
        );
        assert_eq!(
            parse(json!({"accountId": "a1"})),
            Some(Some("a1".to_owned()))
        );
    }

    #[test]
    fn changes_reject_blank_category() {
        let request = TransactionRequest {
            category: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(request.into_changes(), Err(Error::MissingField("category")));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let request = TransactionRequest {
            amount: Some(-5.0),
            ..Default::default()
        };

        assert!(matches!(
            request.into_changes(),
            Err(Error::InvalidField { field: "amount", .. })
        ));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<TransactionRequest>(json!({"type": "transfer"}));

        assert!(result.is_err());
    }

    #[test]
    fn row_is_reshaped_with_time_mirroring_date() {
        let row: TransactionRow = serde_json::from_value(json!({
            "id": "t1",
            "user_id": "u1",
            "type": "expense",
            "amount": "85.20",
            "category": "餐饮",
            "category_icon": "restaurant",
            "category_color": "#fb923c",
            "date": "2026-02-26",
            "account": "招商银行",
            "note": "晚餐",
            "created_at": "2026-02-26T12:00:00Z"
        }))
        .unwrap();

        let json = serde_json::to_value(Transaction::from(row)).unwrap();

        assert_eq!(
            json,
            json!({
                "id": "t1",
                "type": "expense",
                "amount": 85.2,
                "category": "餐饮",
                "categoryIcon": "restaurant",
                "categoryColor": "#fb923c",
                "date": "2026-02-26",
                "time": "2026-02-26",
                "account": "招商银行",
                "note": "晚餐",
            })
        );
    }
}
