//! Building blocks of the account-linking state machine. Every "ensure" is
//! composed here from a lookup plus an insert, never hidden in a store.

use sso_core::{Account, AccountProvider, Email, IdentityStoreError, IdentityTransaction, User};

/// Resolves the user for `email`, creating it if absent. The flag is `true`
/// when this call created the row.
pub(crate) async fn ensure_user<T>(
    tx: &mut T,
    email: &Email,
) -> Result<(User, bool), IdentityStoreError>
where
    T: IdentityTransaction,
{
    match tx.get_by_email(email).await {
        Ok(user) => Ok((user, false)),
        Err(IdentityStoreError::UserNotFound) => {
            let user = tx.create(email).await?;
            Ok((user, true))
        }
        Err(e) => Err(e),
    }
}

/// Resolves the `(user, provider)` account, creating a password-less one if
/// absent.
pub(crate) async fn ensure_account<T>(
    tx: &mut T,
    user: &User,
    provider: AccountProvider,
) -> Result<Account, IdentityStoreError>
where
    T: IdentityTransaction,
{
    match tx.account_by_id(user.id(), provider).await {
        Ok(account) => Ok(account),
        Err(IdentityStoreError::AccountNotFound) => {
            tx.add_account(user.id(), provider, None).await
        }
        Err(e) => Err(e),
    }
}
