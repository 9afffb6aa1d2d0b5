//! Identity lifecycle events consumed by the profile and notification services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{account::AccountProvider, user::UserId};

pub const USER_EXCHANGE: &str = "user_exchange";
pub const REGISTER_ROUTING_KEY: &str = "register";
pub const LOGIN_ROUTING_KEY: &str = "login";

/// Fired exactly once per user, by whichever flow creates the user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserRegistered {
    pub fn new(id: UserId, email: &str) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_owned(),
            name: None,
            avatar: None,
        }
    }

    /// Attaches profile data, dropping empty values.
    pub fn with_profile(mut self, name: &str, avatar: &str) -> Self {
        self.name = Some(name.to_owned()).filter(|n| !n.is_empty());
        self.avatar = Some(avatar.to_owned()).filter(|a| !a.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoggedIn {
    pub id: String,
    pub ip: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub method: String,
}

impl UserLoggedIn {
    pub fn now(id: UserId, ip: &str, method: AccountProvider) -> Self {
        Self {
            id: id.to_string(),
            ip: ip.to_owned(),
            time: Utc::now(),
            method: method.as_str().to_owned(),
        }
    }
}
