pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountProvider, UnknownProvider},
    email::Email,
    events::{
        LOGIN_ROUTING_KEY, REGISTER_ROUTING_KEY, USER_EXCHANGE, UserLoggedIn, UserRegistered,
    },
    oauth::OAuthUserInfo,
    password::Password,
    token::{
        ACCESS_TOKEN_TTL, AccessTokenClaims, REFRESH_TOKEN_TTL, RefreshTokenRecord, TOKEN_ISSUER,
        Tokens,
    },
    user::{User, UserError, UserId},
};

pub use ports::{
    repositories::{
        IdentityStore, IdentityStoreError, IdentityTransaction, SessionStore, SessionStoreError,
    },
    services::{EventPublisher, EventPublisherError, TokenError, TokenSigner},
};
