use std::fmt;
use std::str::FromStr;

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user::UserId;

/// Authentication method bound to a user.
///
/// New OAuth providers are added as variants; the linking algorithm only
/// distinguishes `Credentials` from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountProvider {
    Credentials,
    Google,
}

impl AccountProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountProvider::Credentials => "credentials",
            AccountProvider::Google => "google",
        }
    }

    pub fn is_oauth(&self) -> bool {
        !matches!(self, AccountProvider::Credentials)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown account provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for AccountProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials" => Ok(AccountProvider::Credentials),
            "google" => Ok(AccountProvider::Google),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}

impl fmt::Display for AccountProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential binding between a user and one provider.
///
/// At most one account exists per `(user_id, provider)`. Only `credentials`
/// accounts carry a password hash.
#[derive(Debug, Clone)]
pub struct Account {
    user_id: UserId,
    provider: AccountProvider,
    password_hash: Option<Secret<String>>,
}

impl Account {
    pub fn new(
        user_id: UserId,
        provider: AccountProvider,
        password_hash: Option<Secret<String>>,
    ) -> Self {
        Self {
            user_id,
            provider,
            password_hash,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn provider(&self) -> AccountProvider {
        self.provider
    }

    pub fn password_hash(&self) -> Option<&Secret<String>> {
        self.password_hash.as_ref()
    }
}
