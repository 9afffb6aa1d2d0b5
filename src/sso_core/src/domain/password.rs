use secrecy::{ExposeSecret, Secret};

use super::user::UserError;

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Plain-text password as submitted by the user. Only ever hashed, never stored.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(password: Secret<String>) -> Result<Self, UserError> {
        let length = password.expose_secret().chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(UserError::InvalidPassword);
        }
        Ok(Self(password))
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Password {
    type Error = UserError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(Secret::from(value.to_owned()))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
