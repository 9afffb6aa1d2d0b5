//! In-memory fakes shared by the use case tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::Secret;
use sso_core::{
    ACCESS_TOKEN_TTL, Account, AccountProvider, AccessTokenClaims, Email, EventPublisher,
    EventPublisherError, IdentityStore, IdentityStoreError, IdentityTransaction, SessionStore,
    SessionStoreError, TOKEN_ISSUER, TokenError, TokenSigner, User, UserId, UserLoggedIn,
    UserRegistered,
};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Clone, Default)]
struct IdentityState {
    users: HashMap<UserId, User>,
    accounts: HashMap<(UserId, AccountProvider), Account>,
}

impl IdentityState {
    fn by_email(&self, email: &Email) -> Option<&User> {
        self.users.values().find(|u| u.email() == email)
    }
}

/// Identity store whose transactions are fully serialized.
#[derive(Clone, Default)]
pub struct FakeIdentityStore {
    state: Arc<Mutex<IdentityState>>,
}

impl FakeIdentityStore {
    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }
}

pub struct FakeTransaction {
    guard: OwnedMutexGuard<IdentityState>,
    working: IdentityState,
}

#[async_trait]
impl IdentityStore for FakeIdentityStore {
    type Transaction = FakeTransaction;

    async fn begin(&self) -> Result<Self::Transaction, IdentityStoreError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(FakeTransaction { guard, working })
    }

    async fn get_by_email(&self, email: &Email) -> Result<User, IdentityStoreError> {
        let state = self.state.lock().await;
        state
            .by_email(email)
            .cloned()
            .ok_or(IdentityStoreError::UserNotFound)
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<User, IdentityStoreError> {
        let state = self.state.lock().await;
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(IdentityStoreError::UserNotFound)
    }

    async fn account_by_id(
        &self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        let state = self.state.lock().await;
        state
            .accounts
            .get(&(user_id, provider))
            .cloned()
            .ok_or(IdentityStoreError::AccountNotFound)
    }
}

#[async_trait]
impl IdentityTransaction for FakeTransaction {
    async fn get_by_email(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        self.working
            .by_email(email)
            .cloned()
            .ok_or(IdentityStoreError::UserNotFound)
    }

    async fn create(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        if self.working.by_email(email).is_some() {
            return Err(IdentityStoreError::AlreadyExists);
        }
        let user = User::new(UserId::new(), email.clone(), Utc::now());
        self.working.users.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&mut self, user_id: UserId) -> Result<User, IdentityStoreError> {
        self.working
            .users
            .get(&user_id)
            .cloned()
            .ok_or(IdentityStoreError::UserNotFound)
    }

    async fn add_account(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
        password_hash: Option<Secret<String>>,
    ) -> Result<Account, IdentityStoreError> {
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
        self.working
            .accounts
            .get(&(user_id, provider))
            .cloned()
            .ok_or(IdentityStoreError::AccountNotFound)
    }

    async fn commit(self) -> Result<(), IdentityStoreError> {
        let FakeTransaction { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), IdentityStoreError> {
        Ok(())
    }
}

/// Identity store where a concurrent caller wins the next `races` inserts.
///
/// A lost `create` commits the competitor's user (and its Registered event)
/// before failing with `AlreadyExists`; a lost `add_account` commits the
/// competitor's account. The losing transaction never sees those rows, only
/// transactions begun afterwards do.
#[derive(Clone)]
pub struct RacingIdentityStore {
    inner: FakeIdentityStore,
    publisher: RecordingPublisher,
    races: Arc<AtomicUsize>,
}

impl RacingIdentityStore {
    pub fn new(inner: FakeIdentityStore, publisher: RecordingPublisher, races: usize) -> Self {
        Self {
            inner,
            publisher,
            races: Arc::new(AtomicUsize::new(races)),
        }
    }

    fn lose_race(&self) -> bool {
        self.races
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

pub struct RacingTransaction {
    inner: FakeTransaction,
    store: RacingIdentityStore,
}

#[async_trait]
impl IdentityStore for RacingIdentityStore {
    type Transaction = RacingTransaction;

    async fn begin(&self) -> Result<Self::Transaction, IdentityStoreError> {
        Ok(RacingTransaction {
            inner: self.inner.begin().await?,
            store: self.clone(),
        })
    }

    async fn get_by_email(&self, email: &Email) -> Result<User, IdentityStoreError> {
        self.inner.get_by_email(email).await
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<User, IdentityStoreError> {
        self.inner.get_by_id(user_id).await
    }

    async fn account_by_id(
        &self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        self.inner.account_by_id(user_id, provider).await
    }
}

#[async_trait]
impl IdentityTransaction for RacingTransaction {
    async fn get_by_email(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        self.inner.get_by_email(email).await
    }

    async fn create(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        if self.store.lose_race() {
            let winner = User::new(UserId::new(), email.clone(), Utc::now());
            self.store
                .publisher
                .registered
                .lock()
                .unwrap()
                .push(UserRegistered::new(winner.id(), email.as_str()));
            self.inner.guard.users.insert(winner.id(), winner);
            return Err(IdentityStoreError::AlreadyExists);
        }
        self.inner.create(email).await
    }

    async fn get_by_id(&mut self, user_id: UserId) -> Result<User, IdentityStoreError> {
        self.inner.get_by_id(user_id).await
    }

    async fn add_account(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
        password_hash: Option<Secret<String>>,
    ) -> Result<Account, IdentityStoreError> {
        if self.store.lose_race() {
            self.inner
                .guard
                .accounts
                .insert((user_id, provider), Account::new(user_id, provider, None));
            return Err(IdentityStoreError::AlreadyExists);
        }
        self.inner.add_account(user_id, provider, password_hash).await
    }

    async fn account_by_id(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        self.inner.account_by_id(user_id, provider).await
    }

    async fn commit(self) -> Result<(), IdentityStoreError> {
        self.inner.commit().await
    }

    async fn rollback(self) -> Result<(), IdentityStoreError> {
        self.inner.rollback().await
    }
}

#[derive(Clone, Default)]
pub struct FakeSessionStore {
    tokens: Arc<RwLock<HashMap<String, UserId>>>,
    counter: Arc<AtomicU64>,
}

#[async_trait]
impl SessionStore for FakeSessionStore {
    async fn create(&self, user_id: UserId) -> Result<String, SessionStoreError> {
        let token = format!("refresh-{}", self.counter.fetch_add(1, Ordering::SeqCst));
        self.tokens.write().await.insert(token.clone(), user_id);
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> Result<UserId, SessionStoreError> {
        self.tokens
            .read()
            .await
            .get(token)
            .copied()
            .ok_or(SessionStoreError::InvalidToken)
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError> {
        self.tokens.write().await.remove(token);
        Ok(())
    }
}

impl FakeSessionStore {
    pub async fn live_tokens(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub registered: Arc<std::sync::Mutex<Vec<UserRegistered>>>,
    pub logged_in: Arc<std::sync::Mutex<Vec<UserLoggedIn>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingPublisher {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn registered(&self) -> Vec<UserRegistered> {
        self.registered.lock().unwrap().clone()
    }

    pub fn logged_in(&self) -> Vec<UserLoggedIn> {
        self.logged_in.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), EventPublisherError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventPublisherError::PublishFailed("broker down".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_registered(&self, event: UserRegistered) -> Result<(), EventPublisherError> {
        self.check()?;
        self.registered.lock().unwrap().push(event);
        Ok(())
    }

    async fn publish_logged_in(&self, event: UserLoggedIn) -> Result<(), EventPublisherError> {
        self.check()?;
        self.logged_in.lock().unwrap().push(event);
        Ok(())
    }
}

/// Signs tokens as `access.<user id>`, which keeps assertions readable.
#[derive(Clone, Default)]
pub struct FakeSigner;

impl TokenSigner for FakeSigner {
    fn sign(&self, user_id: UserId) -> Result<String, TokenError> {
        Ok(format!("access.{user_id}"))
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let user_id = token
            .strip_prefix("access.")
            .ok_or(TokenError::InvalidToken)?;
        let now = Utc::now().timestamp() as u64;
        Ok(AccessTokenClaims {
            user_id: user_id.to_owned(),
            iss: TOKEN_ISSUER.to_owned(),
            iat: now,
            exp: now + ACCESS_TOKEN_TTL.as_secs(),
        })
    }
}
