//! An embedded remote store backed by SQLite.
//!
//! It mirrors the hosted store closely enough that the gateway cannot tell the
//! two apart: users sign up with an email and password, receive opaque bearer
//! tokens, and every row is owned by exactly one user. Account balances are
//! kept in step with the transactions by triggers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bcrypt::{hash, verify};
use rusqlite::{
    Connection, OptionalExtension, Row, ToSql, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    account::{AccountChanges, AccountId, AccountRow, NewAccountRow},
    auth::{AuthResponse, Session},
    profile::{DEFAULT_MEMBERSHIP, Language, Profile, ProfileUpdate},
    store::{RemoteStore, SignUp, StoreError, UserClient},
    transaction::{
        NewTransactionRow, TransactionChanges, TransactionId, TransactionKind, TransactionRow,
    },
    user::{User, UserID},
};

/// How long an access token stays valid.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::hours(1);

/// The shortest password the store accepts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const ACCOUNT_COLUMNS: &str =
    "id, user_id, name, name_en, type, balance, icon, color, description, status";

const TRANSACTION_COLUMNS: &str = "id, user_id, type, amount, category, category_icon, \
     category_color, date, account, account_id, note";

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS sessions (
    access_token_hash TEXT PRIMARY KEY,
    refresh_token_hash TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    expires_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL DEFAULT '',
    avatar TEXT NOT NULL DEFAULT '',
    membership TEXT NOT NULL DEFAULT '',
    language TEXT NOT NULL DEFAULT 'zh' CHECK (language IN ('zh', 'en'))
);

CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    name_en TEXT NOT NULL DEFAULT '',
    type TEXT NOT NULL DEFAULT '',
    balance REAL NOT NULL DEFAULT 0,
    icon TEXT NOT NULL DEFAULT '',
    color TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
    amount REAL NOT NULL CHECK (amount >= 0),
    category TEXT NOT NULL,
    category_icon TEXT NOT NULL DEFAULT '',
    category_color TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    account TEXT NOT NULL DEFAULT '',
    account_id TEXT,
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS accounts_user_id ON accounts(user_id);
CREATE INDEX IF NOT EXISTS transactions_user_id ON transactions(user_id);

-- A transaction moves the balance of the account it references by ID, or
-- failing that, every account of the same user whose name matches.
CREATE TRIGGER IF NOT EXISTS apply_transaction_to_balance
AFTER INSERT ON transactions
BEGIN
    UPDATE accounts
    SET balance = balance + (CASE NEW.type WHEN 'income' THEN NEW.amount ELSE -NEW.amount END)
    WHERE user_id = NEW.user_id
      AND (id = NEW.account_id
           OR (NEW.account_id IS NULL AND NEW.account <> ''
               AND (name = NEW.account OR name_en = NEW.account)));
END;

CREATE TRIGGER IF NOT EXISTS revert_transaction_from_balance
AFTER DELETE ON transactions
BEGIN
    UPDATE accounts
    SET balance = balance - (CASE OLD.type WHEN 'income' THEN OLD.amount ELSE -OLD.amount END)
    WHERE user_id = OLD.user_id
      AND (id = OLD.account_id
           OR (OLD.account_id IS NULL AND OLD.account <> ''
               AND (name = OLD.account OR name_en = OLD.account)));
END;

CREATE TRIGGER IF NOT EXISTS reapply_transaction_to_balance
AFTER UPDATE OF type, amount, account, account_id ON transactions
BEGIN
    UPDATE accounts
    SET balance = balance - (CASE OLD.type WHEN 'income' THEN OLD.amount ELSE -OLD.amount END)
    WHERE user_id = OLD.user_id
      AND (id = OLD.account_id
           OR (OLD.account_id IS NULL AND OLD.account <> ''
               AND (name = OLD.account OR name_en = OLD.account)));

    UPDATE accounts
    SET balance = balance + (CASE NEW.type WHEN 'income' THEN NEW.amount ELSE -NEW.amount END)
    WHERE user_id = NEW.user_id
      AND (id = NEW.account_id
           OR (NEW.account_id IS NULL AND NEW.account <> ''
               AND (name = NEW.account OR name_en = NEW.account)));
END;
";

/// Create the tables and triggers of the embedded store if they do not exist.
///
/// # Errors
/// Returns an error if an SQL statement fails.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(SCHEMA)
}

/// A remote store that keeps everything in a local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
    password_cost: u32,
    session_duration: Duration,
}

impl SqliteStore {
    /// Create a store from an open connection, creating the schema if needed.
    ///
    /// # Errors
    /// Returns an error if the schema could not be created.
    pub fn new(connection: Connection) -> Result<Self, StoreError> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            password_cost: bcrypt::DEFAULT_COST,
            session_duration: DEFAULT_SESSION_DURATION,
        })
    }

    /// Open or create the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file could not be opened or the schema could not be created.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        Self::new(Connection::open(path)?)
    }

    /// Create a store that lives only in memory.
    ///
    /// # Errors
    /// Returns an error if the schema could not be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Set the bcrypt cost used for new password hashes.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Set how long new access tokens stay valid.
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        lock(&self.connection)
    }

    fn issue_session(&self, connection: &Connection, user_id: &str) -> Result<Session, StoreError> {
        let access_token = new_token();
        let refresh_token = new_token();
        let expires_at = (OffsetDateTime::now_utc() + self.session_duration).unix_timestamp();

        connection.execute(
            "INSERT INTO sessions (access_token_hash, refresh_token_hash, user_id, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                hash_token(&access_token),
                hash_token(&refresh_token),
                user_id,
                expires_at
            ],
        )?;

        Ok(Session {
            expires_in: Some(self.session_duration.whole_seconds()),
            expires_at: Some(expires_at),
            ..Session::new(access_token, refresh_token)
        })
    }
}

/// Run a bcrypt operation on the blocking thread pool.
async fn run_hashing<T, F>(operation: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|error| StoreError::Hashing(error.to_string()))?
        .map_err(|error| StoreError::Hashing(error.to_string()))
}

#[async_trait]
impl RemoteStore for SqliteStore {
    async fn sign_up(&self, credentials: &SignUp) -> Result<AuthResponse, StoreError> {
        let email = normalize_email(&credentials.email);
        validate_email(&email)?;

        if credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(StoreError::Rejected {
                status: 422,
                message: format!("Password should be at least {MIN_PASSWORD_LENGTH} characters."),
            });
        }

        let password = credentials.password.clone();
        let cost = self.password_cost;
        let password_hash = run_hashing(move || hash(password, cost)).await?;

        let mut connection = self.lock()?;
        let tx = connection.transaction()?;

        let is_taken = tx
            .query_row("SELECT 1 FROM users WHERE email = ?1", [&email], |_| Ok(()))
            .optional()?
            .is_some();

        if is_taken {
            return Err(StoreError::Rejected {
                status: 422,
                message: "User already registered".to_owned(),
            });
        }

        let user_id = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO users (id, email, password) VALUES (?1, ?2, ?3)",
            params![user_id, email, password_hash],
        )?;
        tx.execute(
            "INSERT INTO profiles (id, name, membership) VALUES (?1, ?2, ?3)",
            params![user_id, credentials.name, DEFAULT_MEMBERSHIP],
        )?;
        let session = self.issue_session(&tx, &user_id)?;
        tx.commit()?;

        tracing::info!("Registered user {user_id}");

        Ok(AuthResponse {
            user: User {
                id: UserID::new(user_id),
                email,
            },
            session: Some(session),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, StoreError> {
        let email = normalize_email(email);

        let stored: Option<(String, String)> = self
            .lock()?
            .query_row(
                "SELECT id, password FROM users WHERE email = ?1",
                [&email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let invalid_credentials = || StoreError::Unauthorized("Invalid login credentials".to_owned());

        let Some((user_id, password_hash)) = stored else {
            return Err(invalid_credentials());
        };

        let password = password.to_owned();
        let is_match = run_hashing(move || verify(password, &password_hash)).await?;

        if !is_match {
            return Err(invalid_credentials());
        }

        let session = self.issue_session(&*self.lock()?, &user_id)?;

        Ok(AuthResponse {
            user: User {
                id: UserID::new(user_id),
                email,
            },
            session: Some(session),
        })
    }

    fn with_token(&self, access_token: &str) -> Box<dyn UserClient> {
        Box::new(SqliteUserClient {
            connection: self.connection.clone(),
            token_hash: hash_token(access_token),
        })
    }
}

/// A client of the embedded store acting for the holder of one access token.
///
/// Besides the `user_id` filters passed in by the caller, every query is
/// restricted to the rows of the user the token belongs to.
struct SqliteUserClient {
    connection: Arc<Mutex<Connection>>,
    token_hash: String,
}

impl SqliteUserClient {
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let connection = lock(&self.connection)?;
        f(&connection)
    }

    /// Run `f` only if the token belongs to `user_id`, otherwise return `denied`.
    fn as_owner<T>(
        &self,
        user_id: &UserID,
        denied: impl FnOnce() -> Result<T, StoreError>,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.with_connection(|connection| {
            let owner = token_owner(connection, &self.token_hash)?;

            if owner.id == *user_id {
                f(connection)
            } else {
                denied()
            }
        })
    }
}

#[async_trait]
impl UserClient for SqliteUserClient {
    async fn get_user(&self) -> Result<User, StoreError> {
        self.with_connection(|connection| token_owner(connection, &self.token_hash))
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.with_connection(|connection| {
            connection.execute(
                "DELETE FROM sessions WHERE access_token_hash = ?1",
                [&self.token_hash],
            )?;
            Ok(())
        })
    }

    async fn get_profile(&self, user_id: &UserID) -> Result<Profile, StoreError> {
        self.as_owner(
            user_id,
            || Err(StoreError::NotFound),
            |connection| {
                connection
                    .query_row(
                        "SELECT id, name, avatar, membership, language FROM profiles WHERE id = ?1",
                        [user_id.as_str()],
                        map_profile_row,
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn update_profile(
        &self,
        user_id: &UserID,
        update: &ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        self.as_owner(
            user_id,
            || Err(StoreError::NotFound),
            |connection| {
                connection
                    .query_row(
                        "UPDATE profiles SET
                            name = COALESCE(?1, name),
                            avatar = COALESCE(?2, avatar),
                            membership = COALESCE(?3, membership),
                            language = COALESCE(?4, language)
                        WHERE id = ?5
                        RETURNING id, name, avatar, membership, language",
                        params![
                            update.name,
                            update.avatar,
                            update.membership,
                            update.language,
                            user_id.as_str()
                        ],
                        map_profile_row,
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn list_accounts(&self, user_id: &UserID) -> Result<Vec<AccountRow>, StoreError> {
        self.as_owner(
            user_id,
            || Ok(Vec::new()),
            |connection| {
                connection
                    .prepare(&format!(
                        "SELECT {ACCOUNT_COLUMNS} FROM accounts
                        WHERE user_id = ?1
                        ORDER BY created_at ASC, rowid ASC"
                    ))?
                    .query_map([user_id.as_str()], map_account_row)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(StoreError::from)
            },
        )
    }

    async fn insert_account(&self, account: &NewAccountRow) -> Result<AccountRow, StoreError> {
        self.as_owner(
            &account.user_id,
            || Err(row_level_security_violation("accounts")),
            |connection| {
                connection
                    .query_row(
                        &format!(
                            "INSERT INTO accounts
                            (id, user_id, name, name_en, type, balance, icon, color, description, status)
                            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                            RETURNING {ACCOUNT_COLUMNS}"
                        ),
                        params![
                            Uuid::new_v4().to_string(),
                            account.user_id.as_str(),
                            account.name,
                            account.name_en,
                            account.account_type,
                            account.balance,
                            account.icon,
                            account.color,
                            account.description,
                            account.status
                        ],
                        map_account_row,
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn update_account(
        &self,
        user_id: &UserID,
        account_id: &AccountId,
        changes: &AccountChanges,
    ) -> Result<AccountRow, StoreError> {
        self.as_owner(
            user_id,
            || Err(StoreError::NotFound),
            |connection| {
                connection
                    .query_row(
                        &format!(
                            "UPDATE accounts SET
                                name = COALESCE(?1, name),
                                name_en = COALESCE(?2, name_en),
                                type = COALESCE(?3, type),
                                balance = COALESCE(?4, balance),
                                icon = COALESCE(?5, icon),
                                color = COALESCE(?6, color),
                                description = COALESCE(?7, description),
                                status = COALESCE(?8, status)
                            WHERE id = ?9 AND user_id = ?10
                            RETURNING {ACCOUNT_COLUMNS}"
                        ),
                        params![
                            changes.name,
                            changes.name_en,
                            changes.account_type,
                            changes.balance,
                            changes.icon,
                            changes.color,
                            changes.description,
                            changes.status,
                            account_id,
                            user_id.as_str()
                        ],
                        map_account_row,
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn delete_account(
        &self,
        user_id: &UserID,
        account_id: &AccountId,
    ) -> Result<usize, StoreError> {
        self.as_owner(
            user_id,
            || Ok(0),
            |connection| {
                connection
                    .execute(
                        "DELETE FROM accounts WHERE id = ?1 AND user_id = ?2",
                        params![account_id, user_id.as_str()],
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn list_transactions(
        &self,
        user_id: &UserID,
    ) -> Result<Vec<TransactionRow>, StoreError> {
        self.as_owner(
            user_id,
            || Ok(Vec::new()),
            |connection| {
                connection
                    .prepare(&format!(
                        "SELECT {TRANSACTION_COLUMNS} FROM transactions
                        WHERE user_id = ?1
                        ORDER BY created_at DESC, rowid DESC"
                    ))?
                    .query_map([user_id.as_str()], map_transaction_row)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(StoreError::from)
            },
        )
    }

    async fn insert_transaction(
        &self,
        transaction: &NewTransactionRow,
    ) -> Result<TransactionRow, StoreError> {
        self.as_owner(
            &transaction.user_id,
            || Err(row_level_security_violation("transactions")),
            |connection| {
                connection
                    .query_row(
                        &format!(
                            "INSERT INTO transactions
                            (id, user_id, type, amount, category, category_icon, category_color,
                             date, account, account_id, note)
                            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                            RETURNING {TRANSACTION_COLUMNS}"
                        ),
                        params![
                            Uuid::new_v4().to_string(),
                            transaction.user_id.as_str(),
                            transaction.kind,
                            transaction.amount,
                            transaction.category,
                            transaction.category_icon,
                            transaction.category_color,
                            transaction.date,
                            transaction.account,
                            transaction.account_id,
                            transaction.note
                        ],
                        map_transaction_row,
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn update_transaction(
        &self,
        user_id: &UserID,
        transaction_id: &TransactionId,
        changes: &TransactionChanges,
    ) -> Result<TransactionRow, StoreError> {
        self.as_owner(
            user_id,
            || Err(StoreError::NotFound),
            |connection| {
                connection
                    .query_row(
                        &format!(
                            "UPDATE transactions SET
                                type = COALESCE(?1, type),
                                amount = COALESCE(?2, amount),
                                category = COALESCE(?3, category),
                                category_icon = COALESCE(?4, category_icon),
                                category_color = COALESCE(?5, category_color),
                                date = COALESCE(?6, date),
                                account = COALESCE(?7, account),
                                account_id = CASE WHEN ?12 THEN ?8 ELSE account_id END,
                                note = COALESCE(?9, note)
                            WHERE id = ?10 AND user_id = ?11
                            RETURNING {TRANSACTION_COLUMNS}"
                        ),
                        params![
                            changes.kind,
                            changes.amount,
                            changes.category,
                            changes.category_icon,
                            changes.category_color,
                            changes.date,
                            changes.account,
                            changes.account_id.as_ref().and_then(Option::as_ref),
                            changes.note,
                            transaction_id,
                            user_id.as_str(),
                            changes.account_id.is_some()
                        ],
                        map_transaction_row,
                    )
                    .map_err(StoreError::from)
            },
        )
    }

    async fn delete_transaction(
        &self,
        user_id: &UserID,
        transaction_id: &TransactionId,
    ) -> Result<usize, StoreError> {
        self.as_owner(
            user_id,
            || Ok(0),
            |connection| {
                connection
                    .execute(
                        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
                        params![transaction_id, user_id.as_str()],
                    )
                    .map_err(StoreError::from)
            },
        )
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

fn lock(
    connection: &Mutex<Connection>,
) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        StoreError::DatabaseLock
    })
}

/// Get the user an unexpired access token belongs to.
fn token_owner(connection: &Connection, token_hash: &str) -> Result<User, StoreError> {
    connection
        .query_row(
            "SELECT users.id, users.email FROM sessions
            INNER JOIN users ON users.id = sessions.user_id
            WHERE sessions.access_token_hash = ?1 AND sessions.expires_at > ?2",
            params![token_hash, OffsetDateTime::now_utc().unix_timestamp()],
            |row| {
                Ok(User {
                    id: UserID::new(row.get::<_, String>(0)?),
                    email: row.get(1)?,
                })
            },
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => StoreError::Unauthorized(
                "invalid JWT: unable to parse or verify signature, token is unauthorized or expired"
                    .to_owned(),
            ),
            error => StoreError::from(error),
        })
}

fn map_profile_row(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        id: UserID::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        avatar: row.get(2)?,
        membership: row.get(3)?,
        language: row.get(4)?,
    })
}

fn map_account_row(row: &Row) -> Result<AccountRow, rusqlite::Error> {
    Ok(AccountRow {
        id: row.get(0)?,
        user_id: UserID::new(row.get::<_, String>(1)?),
        name: row.get(2)?,
        name_en: row.get(3)?,
        account_type: row.get(4)?,
        balance: row.get(5)?,
        icon: row.get(6)?,
        color: row.get(7)?,
        description: row.get(8)?,
        status: row.get(9)?,
    })
}

fn map_transaction_row(row: &Row) -> Result<TransactionRow, rusqlite::Error> {
    Ok(TransactionRow {
        id: row.get(0)?,
        user_id: UserID::new(row.get::<_, String>(1)?),
        kind: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        category_icon: row.get(5)?,
        category_color: row.get(6)?,
        date: row.get(7)?,
        account: row.get(8)?,
        account_id: row.get(9)?,
        note: row.get(10)?,
    })
}

fn row_level_security_violation(table: &str) -> StoreError {
    StoreError::Rejected {
        status: 403,
        message: format!("new row violates row-level security policy for table \"{table}\""),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), StoreError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(StoreError::Rejected {
            status: 400,
            message: "Unable to validate email address: invalid format".to_owned(),
        }),
    }
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Only digests of tokens are stored.
fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type {other:?}").into(),
            )),
        }
    }
}

impl ToSql for Language {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.pick("zh", "en").into())
    }
}

impl FromSql for Language {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "en" => Ok(Language::En),
            _ => Ok(Language::Zh),
        }
    }
}
