//! The client-side application state.
//!
//! [AppShell] holds everything the user interface renders: the mode, the
//! profile, the accounts and the transactions. Mutations go to the server
//! first. If the server call fails the change is still applied locally, and
//! nothing is reconciled later unless [ShellOptions::reload_after_failed_mutation]
//! is set.

use uuid::Uuid;

use crate::{
    account::{Account, AccountId, NewAccount},
    auth::Session,
    client::{ClientError, LedgerApi},
    profile::{DEFAULT_MEMBERSHIP, Language, Profile, ProfileUpdate},
    transaction::{NewTransaction, Transaction, TransactionId},
};

/// What the user interface should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The log in screen.
    LoggedOut,
    /// A spinner while the user's data is fetched.
    Loading,
    /// The user's data.
    Ready,
}

/// Behaviour switches for [AppShell].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellOptions {
    /// Reload everything from the server after a mutation fails, throwing
    /// away any change that was only applied locally.
    pub reload_after_failed_mutation: bool,
}

/// How a mutation ended.
#[derive(Debug)]
#[must_use]
pub enum MutationOutcome {
    /// The server accepted the change and the local state follows it.
    Saved,
    /// The server call failed and the change was only applied locally.
    LocalOnly(ClientError),
    /// The server call failed and the local state was left alone.
    Failed(ClientError),
}

impl MutationOutcome {
    /// Whether the server accepted the change.
    pub fn is_saved(&self) -> bool {
        matches!(self, MutationOutcome::Saved)
    }
}

/// The state of the application for one user session.
pub struct AppShell<A: LedgerApi> {
    api: A,
    options: ShellOptions,
    mode: Mode,
    session: Option<Session>,
    profile: Option<Profile>,
    language: Language,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    amounts_visible: bool,
}

impl<A: LedgerApi> AppShell<A> {
    /// Create a logged out shell.
    pub fn new(api: A, options: ShellOptions) -> Self {
        Self {
            api,
            options,
            mode: Mode::LoggedOut,
            session: None,
            profile: None,
            language: Language::default(),
            accounts: Vec::new(),
            transactions: Vec::new(),
            amounts_visible: true,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn amounts_visible(&self) -> bool {
        self.amounts_visible
    }

    /// Pick up a saved session and load the user's data with it.
    ///
    /// Stays logged out if there is no saved session.
    pub async fn resume(&mut self) -> Result<Mode, ClientError> {
        match self.api.sessions().load()? {
            Some(session) => {
                self.start(session).await;
                Ok(self.mode)
            }
            None => Ok(Mode::LoggedOut),
        }
    }

    /// Log in and load the user's data.
    pub async fn log_in(&mut self, email: &str, password: &str) -> Result<Mode, ClientError> {
        let response = self.api.log_in(email, password).await?;

        match response.session {
            Some(session) => self.start(session).await,
            None => tracing::warn!("Log in for {} did not return a session", response.user.id),
        }

        Ok(self.mode)
    }

    /// Register and, if the server issued a session, load the user's data.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Mode, ClientError> {
        let response = self.api.register(email, password, name).await?;

        match response.session {
            Some(session) => self.start(session).await,
            None => tracing::info!("User {} must confirm their email first", response.user.id),
        }

        Ok(self.mode)
    }

    async fn start(&mut self, session: Session) {
        self.session = Some(session);
        self.mode = Mode::Loading;

        if let Err(error) = self.load().await {
            tracing::error!("Failed to load data: {error}");
            self.forget_session();
        }
    }

    /// Fetch the profile, accounts and transactions at the same time and
    /// replace the local state with them.
    ///
    /// Fails if any of the three requests fails, leaving the state untouched.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotLoggedIn)?;

        let (mut profile, accounts, transactions) = tokio::try_join!(
            self.api.get_profile(session),
            self.api.list_accounts(session),
            self.api.list_transactions(session),
        )?;

        if profile.membership.is_empty() {
            profile.membership = DEFAULT_MEMBERSHIP.to_owned();
        }

        self.language = profile.language;
        self.profile = Some(profile);
        self.accounts = accounts;
        self.transactions = transactions;
        self.mode = Mode::Ready;

        Ok(())
    }

    /// Reload everything, logging and otherwise ignoring a failure.
    async fn reload(&mut self) {
        if let Err(error) = self.load().await {
            tracing::warn!("Failed to reload data, it may be out of date: {error}");
        }
    }

    async fn after_failure(&mut self, outcome: MutationOutcome) -> MutationOutcome {
        if self.options.reload_after_failed_mutation {
            self.reload().await;
        }

        outcome
    }

    /// Log out at the server if possible, then forget the session and all data.
    pub async fn log_out(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(error) = self.api.log_out(&session).await {
                tracing::error!("Logout error: {error}");
            }
        }

        self.forget_session();
    }

    fn forget_session(&mut self) {
        if let Err(error) = self.api.sessions().clear() {
            tracing::error!("Could not clear the saved session: {error}");
        }

        self.session = None;
        self.mode = Mode::LoggedOut;
        self.profile = None;
        self.accounts.clear();
        self.transactions.clear();
    }

    /// Show or hide monetary amounts.
    pub fn toggle_amount_visibility(&mut self) {
        self.amounts_visible = !self.amounts_visible;
    }

    /// Switch language and save the preference to the profile if possible.
    pub async fn toggle_language(&mut self) -> MutationOutcome {
        self.language = self.language.toggled();
        if let Some(profile) = &mut self.profile {
            profile.language = self.language;
        }

        let update = ProfileUpdate {
            language: Some(self.language),
            ..Default::default()
        };

        match self.send_profile_update(&update).await {
            Ok(()) => MutationOutcome::Saved,
            Err(error) => {
                tracing::error!("Failed to save language preference: {error}");
                MutationOutcome::LocalOnly(error)
            }
        }
    }

    /// Update the profile at the server. The local profile is updated either way.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> MutationOutcome {
        let result = self.send_profile_update(&update).await;

        if let Some(profile) = &mut self.profile {
            apply_profile_update(profile, update);
            self.language = profile.language;
        }

        match result {
            Ok(()) => MutationOutcome::Saved,
            Err(error) => {
                tracing::error!("Failed to update profile: {error}");
                self.after_failure(MutationOutcome::LocalOnly(error)).await
            }
        }
    }

    async fn send_profile_update(&self, update: &ProfileUpdate) -> Result<(), ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotLoggedIn)?;

        self.api.update_profile(session, update).await.map(|_| ())
    }

    /// Create an account. On failure the account is kept locally with a local ID.
    pub async fn add_account(&mut self, account: NewAccount) -> MutationOutcome {
        let result = match &self.session {
            Some(session) => self.api.create_account(session, &account).await,
            None => Err(ClientError::NotLoggedIn),
        };

        match result {
            Ok(created) => {
                self.accounts.push(created);
                MutationOutcome::Saved
            }
            Err(error) => {
                tracing::error!("Failed to create account: {error}");
                self.accounts.push(account.with_id(local_id()));
                self.after_failure(MutationOutcome::LocalOnly(error)).await
            }
        }
    }

    /// Update an account. On failure the change is applied locally.
    pub async fn update_account(&mut self, account: Account) -> MutationOutcome {
        let result = match &self.session {
            Some(session) => self.api.update_account(session, &account).await,
            None => Err(ClientError::NotLoggedIn),
        };

        match result {
            Ok(updated) => {
                replace_by_id(&mut self.accounts, updated, |account| &account.id);
                MutationOutcome::Saved
            }
            Err(error) => {
                tracing::error!("Failed to update account: {error}");
                replace_by_id(&mut self.accounts, account, |account| &account.id);
                self.after_failure(MutationOutcome::LocalOnly(error)).await
            }
        }
    }

    /// Delete an account and reload. On failure nothing changes.
    pub async fn delete_account(&mut self, id: &AccountId) -> MutationOutcome {
        let result = match &self.session {
            Some(session) => self.api.delete_account(session, id).await,
            None => Err(ClientError::NotLoggedIn),
        };

        match result {
            Ok(()) => {
                self.accounts.retain(|account| &account.id != id);
                self.reload().await;
                MutationOutcome::Saved
            }
            Err(error) => {
                tracing::error!("Failed to delete account: {error}");
                self.after_failure(MutationOutcome::Failed(error)).await
            }
        }
    }

    /// Record a transaction.
    ///
    /// On success the balance of the account it was recorded against is
    /// adjusted locally. On failure the transaction is kept locally with a
    /// local ID and no balance changes.
    pub async fn add_transaction(&mut self, transaction: NewTransaction) -> MutationOutcome {
        let result = match &self.session {
            Some(session) => self.api.create_transaction(session, &transaction).await,
            None => Err(ClientError::NotLoggedIn),
        };

        match result {
            Ok(created) => {
                self.apply_balance_change(&created);
                self.transactions.insert(0, created);
                MutationOutcome::Saved
            }
            Err(error) => {
                tracing::error!("Failed to create transaction: {error}");
                self.transactions
                    .insert(0, transaction.with_id(local_id()));
                self.after_failure(MutationOutcome::LocalOnly(error)).await
            }
        }
    }

    // Matches accounts by display name in the current language, the way the
    // account was picked when the transaction was entered.
    fn apply_balance_change(&mut self, transaction: &Transaction) {
        let change = transaction.kind.signed(transaction.amount);
        let language = self.language;

        for account in self
            .accounts
            .iter_mut()
            .filter(|account| account.display_name(language) == transaction.account)
        {
            account.balance += change;
            account.last_change = Some(change);
        }
    }

    /// Update a transaction and reload. On failure the change is applied locally.
    pub async fn update_transaction(&mut self, transaction: Transaction) -> MutationOutcome {
        let result = match &self.session {
            Some(session) => self.api.update_transaction(session, &transaction).await,
            None => Err(ClientError::NotLoggedIn),
        };

        match result {
            Ok(updated) => {
                replace_by_id(&mut self.transactions, updated, |transaction| &transaction.id);
                self.reload().await;
                MutationOutcome::Saved
            }
            Err(error) => {
                tracing::error!("Failed to update transaction: {error}");
                replace_by_id(&mut self.transactions, transaction, |transaction| {
                    &transaction.id
                });
                self.after_failure(MutationOutcome::LocalOnly(error)).await
            }
        }
    }

    /// Delete a transaction and reload. On failure nothing changes.
    pub async fn delete_transaction(&mut self, id: &TransactionId) -> MutationOutcome {
        let result = match &self.session {
            Some(session) => self.api.delete_transaction(session, id).await,
            None => Err(ClientError::NotLoggedIn),
        };

        match result {
            Ok(()) => {
                self.transactions.retain(|transaction| &transaction.id != id);
                self.reload().await;
                MutationOutcome::Saved
            }
            Err(error) => {
                tracing::error!("Failed to delete transaction: {error}");
                self.after_failure(MutationOutcome::Failed(error)).await
            }
        }
    }
}

/// An ID for a row that only exists locally.
fn local_id() -> String {
    format!("local-{}", Uuid::new_v4())
}

fn replace_by_id<T>(items: &mut [T], replacement: T, id: impl Fn(&T) -> &String) {
    if let Some(item) = items.iter_mut().find(|item| id(item) == id(&replacement)) {
        *item = replacement;
    }
}

fn apply_profile_update(profile: &mut Profile, update: ProfileUpdate) {
    if let Some(name) = update.name {
        profile.name = name;
    }
    if let Some(avatar) = update.avatar {
        profile.avatar = avatar;
    }
    if let Some(membership) = update.membership {
        profile.membership = membership;
    }
    if let Some(language) = update.language {
        profile.language = language;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use time::macros::date;

    use crate::{
        account::{Account, AccountId, NewAccount},
        auth::{AuthResponse, Session},
        client::{ClientError, LedgerApi, MemorySessionStore, SessionStore},
        profile::{Language, Profile, ProfileUpdate},
        shell::{AppShell, Mode, MutationOutcome, ShellOptions},
        transaction::{NewTransaction, Transaction, TransactionId, TransactionKind},
        user::{User, UserID},
    };

    /// An API that keeps rows in memory and can be told to fail.
    #[derive(Default)]
    struct FakeApi {
        sessions: MemorySessionStore,
        fail_loads: AtomicBool,
        fail_mutations: AtomicBool,
        loads: AtomicUsize,
        profile_updates: Mutex<Vec<ProfileUpdate>>,
        accounts: Mutex<Vec<Account>>,
        transactions: Mutex<Vec<Transaction>>,
    }

    impl FakeApi {
        fn with_account(name: &str, balance: f64) -> Self {
            let mut account = NewAccount::named(name).with_id("a1".to_owned());
            account.name_en = "Cash".to_owned();
            account.balance = balance;

            Self {
                accounts: Mutex::new(vec![account]),
                ..Default::default()
            }
        }

        fn load_check(&self) -> Result<(), ClientError> {
            if self.fail_loads.load(Ordering::SeqCst) {
                Err(ClientError::Network("offline".to_owned()))
            } else {
                Ok(())
            }
        }

        fn mutation_check(&self) -> Result<(), ClientError> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                Err(ClientError::Api {
                    status: Some(400),
                    message: "store unavailable".to_owned(),
                })
            } else {
                Ok(())
            }
        }

        fn auth(&self) -> Result<AuthResponse, ClientError> {
            let session = Session::new("access", "refresh");
            self.sessions.save(&session)?;

            Ok(AuthResponse {
                user: test_user(),
                session: Some(session),
            })
        }
    }

    fn test_user() -> User {
        User {
            id: UserID::new("u1"),
            email: "ann@example.com".to_owned(),
        }
    }

    fn test_profile() -> Profile {
        Profile {
            id: UserID::new("u1"),
            name: "Ann".to_owned(),
            avatar: String::new(),
            membership: String::new(),
            language: Language::Zh,
        }
    }

    #[async_trait]
    impl LedgerApi for FakeApi {
        fn sessions(&self) -> &dyn SessionStore {
            &self.sessions
        }

        async fn register(
            &self,
            _email: &str,
            _password: &str,
            _name: Option<&str>,
        ) -> Result<AuthResponse, ClientError> {
            self.auth()
        }

        async fn log_in(&self, _email: &str, _password: &str) -> Result<AuthResponse, ClientError> {
            self.auth()
        }

        async fn log_out(&self, _session: &Session) -> Result<(), ClientError> {
            self.sessions.clear()?;
            self.mutation_check()
        }

        async fn current_user(&self, _session: &Session) -> Result<User, ClientError> {
            Ok(test_user())
        }

        async fn get_profile(&self, _session: &Session) -> Result<Profile, ClientError> {
            self.load_check()?;
            self.loads.fetch_add(1, Ordering::SeqCst);

            Ok(test_profile())
        }

        async fn update_profile(
            &self,
            _session: &Session,
            update: &ProfileUpdate,
        ) -> Result<Profile, ClientError> {
            self.mutation_check()?;
            self.profile_updates.lock().unwrap().push(update.clone());

            Ok(test_profile())
        }

        async fn list_accounts(&self, _session: &Session) -> Result<Vec<Account>, ClientError> {
            self.load_check()?;

            Ok(self.accounts.lock().unwrap().clone())
        }

        async fn create_account(
            &self,
            _session: &Session,
            account: &NewAccount,
        ) -> Result<Account, ClientError> {
            self.mutation_check()?;
            let mut accounts = self.accounts.lock().unwrap();
            let created = account.clone().with_id(format!("a{}", accounts.len() + 1));
            accounts.push(created.clone());

            Ok(created)
        }

        async fn update_account(
            &self,
            _session: &Session,
            account: &Account,
        ) -> Result<Account, ClientError> {
            self.mutation_check()?;
            let mut accounts = self.accounts.lock().unwrap();
            for existing in accounts.iter_mut().filter(|existing| existing.id == account.id) {
                *existing = account.clone();
            }

            Ok(account.clone())
        }

        async fn delete_account(
            &self,
            _session: &Session,
            id: &AccountId,
        ) -> Result<(), ClientError> {
            self.mutation_check()?;
            self.accounts.lock().unwrap().retain(|account| &account.id != id);

            Ok(())
        }

        async fn list_transactions(
            &self,
            _session: &Session,
        ) -> Result<Vec<Transaction>, ClientError> {
            self.load_check()?;

            Ok(self.transactions.lock().unwrap().clone())
        }

        async fn create_transaction(
            &self,
            _session: &Session,
            transaction: &NewTransaction,
        ) -> Result<Transaction, ClientError> {
            self.mutation_check()?;
            let mut transactions = self.transactions.lock().unwrap();
            let created = transaction
                .clone()
                .with_id(format!("t{}", transactions.len() + 1));
            transactions.insert(0, created.clone());

            Ok(created)
        }

        async fn update_transaction(
            &self,
            _session: &Session,
            transaction: &Transaction,
        ) -> Result<Transaction, ClientError> {
            self.mutation_check()?;
            let mut transactions = self.transactions.lock().unwrap();
            for existing in transactions
                .iter_mut()
                .filter(|existing| existing.id == transaction.id)
            {
                *existing = transaction.clone();
            }

            Ok(transaction.clone())
        }

        async fn delete_transaction(
            &self,
            _session: &Session,
            id: &TransactionId,
        ) -> Result<(), ClientError> {
            self.mutation_check()?;
            self.transactions
                .lock()
                .unwrap()
                .retain(|transaction| &transaction.id != id);

            Ok(())
        }
    }

    fn expense(amount: f64, account: &str) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount,
            category: "餐饮".to_owned(),
            category_icon: "restaurant".to_owned(),
            category_color: "#fb923c".to_owned(),
            date: date!(2026 - 02 - 26),
            account: account.to_owned(),
            account_id: None,
            note: String::new(),
        }
    }

    async fn ready_shell(api: FakeApi, options: ShellOptions) -> AppShell<FakeApi> {
        let mut shell = AppShell::new(api, options);
        let mode = shell.log_in("ann@example.com", "hunter22").await.unwrap();
        assert_eq!(mode, Mode::Ready);

        shell
    }

    #[tokio::test]
    async fn log_in_loads_profile_accounts_and_transactions() {
        let shell = ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;

        assert_eq!(shell.mode(), Mode::Ready);
        let profile = shell.profile().unwrap();
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.membership, "普通会员");
        assert_eq!(shell.language(), Language::Zh);
        assert_eq!(shell.accounts().len(), 1);
        assert!(shell.transactions().is_empty());
    }

    #[tokio::test]
    async fn failed_load_logs_out_and_clears_session() {
        let api = FakeApi::default();
        api.fail_loads.store(true, Ordering::SeqCst);
        let mut shell = AppShell::new(api, ShellOptions::default());

        let mode = shell.log_in("ann@example.com", "hunter22").await.unwrap();

        assert_eq!(mode, Mode::LoggedOut);
        assert!(shell.session().is_none());
        assert_eq!(shell.api().sessions().load().unwrap(), None);
    }

    #[tokio::test]
    async fn resume_uses_saved_session() {
        let api = FakeApi::default();
        api.sessions.save(&Session::new("access", "refresh")).unwrap();
        let mut shell = AppShell::new(api, ShellOptions::default());

        assert_eq!(shell.resume().await.unwrap(), Mode::Ready);
    }

    #[tokio::test]
    async fn resume_without_session_stays_logged_out() {
        let mut shell = AppShell::new(FakeApi::default(), ShellOptions::default());

        assert_eq!(shell.resume().await.unwrap(), Mode::LoggedOut);
        assert_eq!(shell.api().loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn add_transaction_adjusts_matching_account_balance() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;

        let outcome = shell.add_transaction(expense(30.0, "现金")).await;

        assert!(outcome.is_saved());
        assert_eq!(shell.transactions()[0].id, "t1");
        assert_eq!(shell.accounts()[0].balance, 70.0);
        assert_eq!(shell.accounts()[0].last_change, Some(-30.0));
    }

    #[tokio::test]
    async fn balance_update_matches_name_in_current_language() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;

        let _ = shell.add_transaction(expense(30.0, "Cash")).await;
        assert_eq!(shell.accounts()[0].balance, 100.0);

        let _ = shell.toggle_language().await;
        let mut income = expense(50.0, "Cash");
        income.kind = TransactionKind::Income;
        let _ = shell.add_transaction(income).await;

        assert_eq!(shell.accounts()[0].balance, 150.0);
        assert_eq!(shell.accounts()[0].last_change, Some(50.0));
    }

    #[tokio::test]
    async fn failed_add_transaction_keeps_local_copy() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        let outcome = shell.add_transaction(expense(30.0, "现金")).await;

        assert!(matches!(outcome, MutationOutcome::LocalOnly(_)));
        assert!(shell.transactions()[0].id.starts_with("local-"));
        assert_eq!(shell.accounts()[0].balance, 100.0);
    }

    #[tokio::test]
    async fn failed_add_account_keeps_local_copy() {
        let mut shell = ready_shell(FakeApi::default(), ShellOptions::default()).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        let outcome = shell.add_account(NewAccount::named("支付宝")).await;

        assert!(matches!(outcome, MutationOutcome::LocalOnly(_)));
        assert_eq!(shell.accounts().len(), 1);
        assert!(shell.accounts()[0].id.starts_with("local-"));
    }

    #[tokio::test]
    async fn failed_update_account_is_applied_locally() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);
        let mut account = shell.accounts()[0].clone();
        account.status = "Frozen".to_owned();

        let _ = shell.update_account(account).await;

        assert_eq!(shell.accounts()[0].status, "Frozen");
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;
        let _ = shell.add_transaction(expense(30.0, "现金")).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        let transaction_outcome = shell.delete_transaction(&"t1".to_owned()).await;
        let account_outcome = shell.delete_account(&"a1".to_owned()).await;

        assert!(matches!(transaction_outcome, MutationOutcome::Failed(_)));
        assert!(matches!(account_outcome, MutationOutcome::Failed(_)));
        assert_eq!(shell.transactions().len(), 1);
        assert_eq!(shell.accounts().len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_transaction_reload() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;
        let _ = shell.add_transaction(expense(30.0, "现金")).await;
        let loads_before = shell.api().loads.load(Ordering::SeqCst);

        let mut transaction = shell.transactions()[0].clone();
        transaction.note = "午餐".to_owned();
        assert!(shell.update_transaction(transaction).await.is_saved());
        assert_eq!(shell.transactions()[0].note, "午餐");
        assert!(shell.delete_transaction(&"t1".to_owned()).await.is_saved());

        assert!(shell.transactions().is_empty());
        assert_eq!(shell.api().loads.load(Ordering::SeqCst), loads_before + 2);
    }

    #[tokio::test]
    async fn failed_reload_after_mutation_keeps_state_ready() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;
        let _ = shell.add_transaction(expense(30.0, "现金")).await;
        shell.api().fail_loads.store(true, Ordering::SeqCst);

        assert!(shell.delete_transaction(&"t1".to_owned()).await.is_saved());

        assert_eq!(shell.mode(), Mode::Ready);
        assert!(shell.session().is_some());
        assert!(shell.transactions().is_empty());
    }

    #[tokio::test]
    async fn reload_after_failed_mutation_discards_local_rows() {
        let options = ShellOptions {
            reload_after_failed_mutation: true,
        };
        let mut shell = ready_shell(FakeApi::default(), options).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        let outcome = shell.add_account(NewAccount::named("支付宝")).await;

        assert!(matches!(outcome, MutationOutcome::LocalOnly(_)));
        assert!(shell.accounts().is_empty());
    }

    #[tokio::test]
    async fn toggle_language_persists_preference() {
        let mut shell = ready_shell(FakeApi::default(), ShellOptions::default()).await;

        assert!(shell.toggle_language().await.is_saved());

        assert_eq!(shell.language(), Language::En);
        assert_eq!(shell.profile().unwrap().language, Language::En);
        let updates = shell.api().profile_updates.lock().unwrap().clone();
        assert_eq!(updates[0].language, Some(Language::En));
    }

    #[tokio::test]
    async fn toggle_language_flips_even_when_save_fails() {
        let mut shell = ready_shell(FakeApi::default(), ShellOptions::default()).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        let outcome = shell.toggle_language().await;

        assert!(matches!(outcome, MutationOutcome::LocalOnly(_)));
        assert_eq!(shell.language(), Language::En);
    }

    #[tokio::test]
    async fn profile_update_applies_locally_when_save_fails() {
        let mut shell = ready_shell(FakeApi::default(), ShellOptions::default()).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        let _ = shell
            .update_profile(ProfileUpdate {
                name: Some("Annie".to_owned()),
                ..Default::default()
            })
            .await;

        assert_eq!(shell.profile().unwrap().name, "Annie");
    }

    #[tokio::test]
    async fn log_out_clears_everything_even_when_server_fails() {
        let mut shell =
            ready_shell(FakeApi::with_account("现金", 100.0), ShellOptions::default()).await;
        shell.api().fail_mutations.store(true, Ordering::SeqCst);

        shell.log_out().await;

        assert_eq!(shell.mode(), Mode::LoggedOut);
        assert!(shell.accounts().is_empty());
        assert!(shell.profile().is_none());
        assert_eq!(shell.api().sessions().load().unwrap(), None);
    }

    #[test]
    fn amount_visibility_toggles() {
        let mut shell = AppShell::new(FakeApi::default(), ShellOptions::default());

        assert!(shell.amounts_visible());
        shell.toggle_amount_visibility();
        assert!(!shell.amounts_visible());
    }
}
