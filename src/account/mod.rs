//! Accounts hold money: bank cards, cash, e-wallets and the like.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Account, AccountChanges, AccountId, AccountRequest, AccountRow, DEFAULT_ACCOUNT_COLOR,
    DEFAULT_ACCOUNT_ICON, DEFAULT_ACCOUNT_STATUS, DEFAULT_ACCOUNT_TYPE, NewAccount, NewAccountRow,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
