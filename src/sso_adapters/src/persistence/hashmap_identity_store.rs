use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use secrecy::Secret;
use sso_core::{
    Account, AccountProvider, Email, IdentityStore, IdentityStoreError, IdentityTransaction, User,
    UserId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    emails: HashMap<Email, UserId>,
    accounts: HashMap<(UserId, AccountProvider), Account>,
}

impl Tables {
    fn user_by_email(&self, email: &Email) -> Result<User, IdentityStoreError> {
        self.emails
            .get(email)
            .and_then(|id| self.users.get(id))
            .cloned()
            .ok_or(IdentityStoreError::UserNotFound)
    }

    fn user_by_id(&self, user_id: UserId) -> Result<User, IdentityStoreError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or(IdentityStoreError::UserNotFound)
    }

    fn account(
        &self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        self.accounts
            .get(&(user_id, provider))
            .cloned()
            .ok_or(IdentityStoreError::AccountNotFound)
    }
}

/// In-memory identity store.
///
/// Transactions are serializable: `begin` takes the store lock and works on a
/// private copy of the tables, which replaces the shared tables on commit.
/// Dropping or rolling back the transaction discards the copy.
#[derive(Clone, Default)]
pub struct HashMapIdentityStore {
    tables: Arc<Mutex<Tables>>,
}

impl HashMapIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct HashMapIdentityTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait::async_trait]
impl IdentityStore for HashMapIdentityStore {
    type Transaction = HashMapIdentityTransaction;

    async fn begin(&self) -> Result<Self::Transaction, IdentityStoreError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        Ok(HashMapIdentityTransaction { guard, working })
    }

    async fn get_by_email(&self, email: &Email) -> Result<User, IdentityStoreError> {
        self.tables.lock().await.user_by_email(email)
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<User, IdentityStoreError> {
        self.tables.lock().await.user_by_id(user_id)
    }

    async fn account_by_id(
        &self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        self.tables.lock().await.account(user_id, provider)
    }
}

#[async_trait::async_trait]
impl IdentityTransaction for HashMapIdentityTransaction {
    async fn get_by_email(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        self.working.user_by_email(email)
    }

    async fn create(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        if self.working.emails.contains_key(email) {
            return Err(IdentityStoreError::AlreadyExists);
        }

        let user = User::new(UserId::new(), email.clone(), Utc::now());
        self.working.emails.insert(email.clone(), user.id());
        self.working.users.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&mut self, user_id: UserId) -> Result<User, IdentityStoreError> {
        self.working.user_by_id(user_id)
    }

    async fn add_account(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
        password_hash: Option<Secret<String>>,
    ) -> Result<Account, IdentityStoreError> {
        if !self.working.users.contains_key(&user_id) {
            return Err(IdentityStoreError::UnexpectedError(format!(
                "account references unknown user {user_id}"
            )));
        }
        if self.working.accounts.contains_key(&(user_id, provider)) {
            return Err(IdentityStoreError::AlreadyExists);
        }

        let account = Account::new(user_id, provider, password_hash);
        self.working
            .accounts
            .insert((user_id, provider), account.clone());
        Ok(account)
    }

    async fn account_by_id(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        self.working.account(user_id, provider)
    }

    async fn commit(self) -> Result<(), IdentityStoreError> {
        let HashMapIdentityTransaction { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), IdentityStoreError> {
        Ok(())
    }
}
