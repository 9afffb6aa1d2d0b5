pub mod auth_service;
pub mod error;
pub mod password;
pub mod transaction;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use auth_service::{AuthOperations, AuthService};
pub use error::AuthError;
pub use password::{PasswordHashError, compute_password_hash, verify_password_hash};
pub use transaction::TransactionCoordinator;
pub use use_cases::{LoginUseCase, LogoutUseCase, OAuthUseCase, RefreshUseCase, RegisterUseCase};
