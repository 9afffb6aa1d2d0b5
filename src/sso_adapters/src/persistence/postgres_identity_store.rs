use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use sso_core::{
    Account, AccountProvider, Email, IdentityStore, IdentityStoreError, IdentityTransaction, User,
    UserId,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresIdentityStore { pool }
    }
}

pub struct PostgresIdentityTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait::async_trait]
impl IdentityStore for PostgresIdentityStore {
    type Transaction = PostgresIdentityTransaction;

    async fn begin(&self) -> Result<Self::Transaction, IdentityStoreError> {
        let tx = self.pool.begin().await.map_err(unexpected)?;
        Ok(PostgresIdentityTransaction { tx })
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn get_by_email(&self, email: &Email) -> Result<User, IdentityStoreError> {
        select_user_by_email(&self.pool, email).await
    }

    #[tracing::instrument(name = "Retrieving user by id from PostgreSQL", skip_all)]
    async fn get_by_id(&self, user_id: UserId) -> Result<User, IdentityStoreError> {
        select_user_by_id(&self.pool, user_id).await
    }

    #[tracing::instrument(name = "Retrieving account from PostgreSQL", skip_all)]
    async fn account_by_id(
        &self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        select_account(&self.pool, user_id, provider).await
    }
}

#[async_trait::async_trait]
impl IdentityTransaction for PostgresIdentityTransaction {
    async fn get_by_email(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        select_user_by_email(&mut *self.tx, email).await
    }

    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create(&mut self, email: &Email) -> Result<User, IdentityStoreError> {
        let row: UserRow = sqlx::query_as(
            r#"
                INSERT INTO users (email)
                VALUES ($1)
                RETURNING user_id, email, registered_at
            "#,
        )
        .bind(email.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(write_error)?;

        row.try_into()
    }

    async fn get_by_id(&mut self, user_id: UserId) -> Result<User, IdentityStoreError> {
        select_user_by_id(&mut *self.tx, user_id).await
    }

    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn add_account(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
        password_hash: Option<Secret<String>>,
    ) -> Result<Account, IdentityStoreError> {
        let row: AccountRow = sqlx::query_as(
            r#"
                INSERT INTO accounts (user_id, provider, password)
                VALUES ($1, $2, $3)
                RETURNING user_id, provider, password
            "#,
        )
        .bind(*user_id.as_uuid())
        .bind(provider.as_str())
        .bind(password_hash.as_ref().map(|hash| hash.expose_secret().as_str()))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(write_error)?;

        row.try_into()
    }

    async fn account_by_id(
        &mut self,
        user_id: UserId,
        provider: AccountProvider,
    ) -> Result<Account, IdentityStoreError> {
        select_account(&mut *self.tx, user_id, provider).await
    }

    async fn commit(self) -> Result<(), IdentityStoreError> {
        self.tx.commit().await.map_err(unexpected)
    }

    async fn rollback(self) -> Result<(), IdentityStoreError> {
        self.tx.rollback().await.map_err(unexpected)
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    registered_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = IdentityStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::try_from(Secret::from(row.email))
            .map_err(|e| IdentityStoreError::UnexpectedError(e.to_string()))?;
        Ok(User::new(row.user_id.into(), email, row.registered_at))
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    user_id: Uuid,
    provider: String,
    password: Option<String>,
}

impl TryFrom<AccountRow> for Account {
    type Error = IdentityStoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let provider = row
            .provider
            .parse::<AccountProvider>()
            .map_err(|e| IdentityStoreError::UnexpectedError(e.to_string()))?;
        Ok(Account::new(
            row.user_id.into(),
            provider,
            row.password.map(Secret::from),
        ))
    }
}

async fn select_user_by_email<'e, E>(executor: E, email: &Email) -> Result<User, IdentityStoreError>
where
    E: PgExecutor<'e>,
{
    let row: Option<UserRow> = sqlx::query_as(
        r#"
            SELECT user_id, email, registered_at
            FROM users
            WHERE email = $1
        "#,
    )
    .bind(email.as_str())
    .fetch_optional(executor)
    .await
    .map_err(unexpected)?;

    let Some(row) = row else {
        return Err(IdentityStoreError::UserNotFound);
    };
    row.try_into()
}

async fn select_user_by_id<'e, E>(executor: E, user_id: UserId) -> Result<User, IdentityStoreError>
where
    E: PgExecutor<'e>,
{
    let row: Option<UserRow> = sqlx::query_as(
        r#"
            SELECT user_id, email, registered_at
            FROM users
            WHERE user_id = $1
        "#,
    )
    .bind(*user_id.as_uuid())
    .fetch_optional(executor)
    .await
    .map_err(unexpected)?;

    let Some(row) = row else {
        return Err(IdentityStoreError::UserNotFound);
    };
    row.try_into()
}

async fn select_account<'e, E>(
    executor: E,
    user_id: UserId,
    provider: AccountProvider,
) -> Result<Account, IdentityStoreError>
where
    E: PgExecutor<'e>,
{
    let row: Option<AccountRow> = sqlx::query_as(
        r#"
            SELECT user_id, provider, password
            FROM accounts
            WHERE user_id = $1 AND provider = $2
        "#,
    )
    .bind(*user_id.as_uuid())
    .bind(provider.as_str())
    .fetch_optional(executor)
    .await
    .map_err(unexpected)?;

    let Some(row) = row else {
        return Err(IdentityStoreError::AccountNotFound);
    };
    row.try_into()
}

fn write_error(e: sqlx::Error) -> IdentityStoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return IdentityStoreError::AlreadyExists;
        }
    }
    IdentityStoreError::UnexpectedError(e.to_string())
}

fn unexpected(e: sqlx::Error) -> IdentityStoreError {
    IdentityStoreError::UnexpectedError(e.to_string())
}
