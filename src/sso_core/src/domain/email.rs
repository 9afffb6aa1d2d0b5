use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

use super::user::UserError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Validated email address.
///
/// Stored as a secret so it never ends up in logs through `Debug`. Comparison
/// is case-sensitive, the address is kept exactly as the user typed it.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn parse(email: Secret<String>) -> Result<Self, UserError> {
        let candidate = email.expose_secret().trim();
        if candidate.len() > 254 || !EMAIL_PATTERN.is_match(candidate) {
            return Err(UserError::InvalidEmail);
        }
        Ok(Self(Secret::from(candidate.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = UserError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(Secret::from(value.to_owned()))
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
