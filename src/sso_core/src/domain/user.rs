use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::email::Email;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be between 6 and 128 characters")]
    InvalidPassword,
    #[error("Invalid user id")]
    InvalidUserId,
}

/// Stable identifier of a user, generated when the user row is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<UserId> for Uuid {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| UserError::InvalidUserId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity anchor. One row per unique email, whichever provider created it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    registered_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, email: Email, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            registered_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}
