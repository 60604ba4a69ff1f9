//! Defines the account models: the storage row, the client-facing shape and
//! the request bodies for creating and updating accounts.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    money::{deserialize_amount, null_to_default},
    profile::Language,
    user::UserID,
};

/// Account IDs are assigned by the remote store.
pub type AccountId = String;

/// The account type used when none is given.
pub const DEFAULT_ACCOUNT_TYPE: &str = "Custom";
/// The account icon used when none is given.
pub const DEFAULT_ACCOUNT_ICON: &str = "account_balance_wallet";
/// The account color used when none is given.
pub const DEFAULT_ACCOUNT_COLOR: &str = "#137fec";
/// The account status used when none is given.
pub const DEFAULT_ACCOUNT_STATUS: &str = "Active";

// ============================================================================
// STORAGE
// ============================================================================

/// A row of the `accounts` table, with the store's snake_case column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    /// The ID of the account.
    pub id: AccountId,
    /// The user that owns the account.
    pub user_id: UserID,
    /// The Chinese display name.
    pub name: String,
    /// The English display name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub name_en: String,
    /// A free-form type label, e.g. "Savings".
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub account_type: String,
    /// The balance, kept in step with the transactions by the store.
    #[serde(deserialize_with = "deserialize_amount")]
    pub balance: f64,
    /// The icon token.
    #[serde(default, deserialize_with = "null_to_default")]
    pub icon: String,
    /// The color token.
    #[serde(default, deserialize_with = "null_to_default")]
    pub color: String,
    /// A description, e.g. the card number.
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    /// A status label, e.g. "Active".
    #[serde(default, deserialize_with = "null_to_default")]
    pub status: String,
}

/// The values to insert for a new account row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAccountRow {
    pub user_id: UserID,
    pub name: String,
    pub name_en: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: f64,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub status: String,
}

/// The columns to change on an existing account row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl AccountChanges {
    /// Whether applying the changes would leave the row untouched.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// An account as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The Chinese display name.
    pub name: String,
    /// The English display name.
    #[serde(default)]
    pub name_en: String,
    /// A free-form type label.
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// The current balance.
    pub balance: f64,
    /// The icon token.
    #[serde(default)]
    pub icon: String,
    /// The color token.
    #[serde(default)]
    pub color: String,
    /// A description, e.g. the card number.
    #[serde(default)]
    pub description: String,
    /// A status label.
    #[serde(default)]
    pub status: String,
    /// The balance change last applied locally after recording a transaction.
    ///
    /// This is never sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change: Option<f64>,
}

impl Account {
    /// The name to display in `language`.
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Zh => &self.name,
            Language::En => &self.name_en,
        }
    }
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            name_en: row.name_en,
            account_type: row.account_type,
            balance: row.balance,
            icon: row.icon,
            color: row.color,
            description: row.description,
            status: row.status,
            last_change: None,
        }
    }
}

/// The data a client sends to create an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub name_en: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: f64,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub status: String,
}

impl NewAccount {
    /// An account named `name` with every other field left at its default.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            name_en: name.to_owned(),
            account_type: DEFAULT_ACCOUNT_TYPE.to_owned(),
            balance: 0.0,
            icon: DEFAULT_ACCOUNT_ICON.to_owned(),
            color: DEFAULT_ACCOUNT_COLOR.to_owned(),
            description: String::new(),
            status: DEFAULT_ACCOUNT_STATUS.to_owned(),
        }
    }

    /// Turn the new account into a local [Account] with the given ID.
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            name: self.name,
            name_en: self.name_en,
            account_type: self.account_type,
            balance: self.balance,
            icon: self.icon,
            color: self.color,
            description: self.description,
            status: self.status,
            last_change: None,
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// The JSON body for creating or updating an account.
///
/// Every field is optional so that the same body can be used for partial
/// updates. Unknown fields, such as `id` or `lastChange`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub name: Option<String>,
    pub name_en: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub balance: Option<f64>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl AccountRequest {
    /// Build the row for a new account owned by `user_id`, filling in defaults.
    ///
    /// Empty strings count as omitted.
    ///
    /// # Errors
    /// Returns [Error::MissingField] if the name is missing.
    pub fn into_new_row(self, user_id: UserID) -> Result<NewAccountRow, Error> {
        let name = non_empty(self.name).ok_or(Error::MissingField("name"))?;

        Ok(NewAccountRow {
            user_id,
            name_en: non_empty(self.name_en).unwrap_or_else(|| name.clone()),
            name,
            account_type: or_default(self.account_type, DEFAULT_ACCOUNT_TYPE),
            balance: self.balance.unwrap_or(0.0),
            icon: or_default(self.icon, DEFAULT_ACCOUNT_ICON),
            color: or_default(self.color, DEFAULT_ACCOUNT_COLOR),
            description: self.description.unwrap_or_default(),
            status: or_default(self.status, DEFAULT_ACCOUNT_STATUS),
        })
    }

    /// The column changes requested by the body.
    ///
    /// # Errors
    /// Returns [Error::MissingField] if the name is blanked.
    pub fn into_changes(self) -> Result<AccountChanges, Error> {
        if self.name.as_deref() == Some("") {
            return Err(Error::MissingField("name"));
        }

        Ok(AccountChanges {
            name: self.name,
            name_en: self.name_en,
            account_type: self.account_type,
            balance: self.balance,
            icon: self.icon,
            color: self.color,
            description: self.description,
            status: self.status,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    non_empty(value).unwrap_or_else(|| default.to_owned())
}
