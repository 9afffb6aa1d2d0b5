//! # SSO - Identity & Session Service
//!
//! Facade crate re-exporting the public API of every layer of the service.
//!
//! ## Structure
//!
//! - **Domain types**: `Email`, `Password`, `User`, `Account`, `Tokens`, events
//! - **Ports**: `IdentityStore`, `SessionStore`, `EventPublisher`, `TokenSigner`
//! - **Application**: `AuthService`, the use cases and `TransactionCoordinator`
//! - **Adapters**: PostgreSQL, Redis, RabbitMQ, JWT, Google OAuth, HTTP routes
//! - **Service**: `SsoService`, the HTTP entry point

// ============================================================================
// Domain Types
// ============================================================================

/// Domain types and value objects
pub mod domain {
    pub use sso_core::domain::*;
}

pub use sso_core::{
    Account, AccountProvider, Email, OAuthUserInfo, Password, Tokens, User, UserError, UserId,
    UserLoggedIn, UserRegistered,
};

// ============================================================================
// Ports
// ============================================================================

/// Capability traits implemented by the adapters
pub mod ports {
    pub use sso_core::{
        EventPublisher, EventPublisherError, IdentityStore, IdentityStoreError,
        IdentityTransaction, SessionStore, SessionStoreError, TokenError, TokenSigner,
    };
}

pub use ports::{EventPublisher, IdentityStore, SessionStore, TokenSigner};

// ============================================================================
// Application Layer
// ============================================================================

/// Use cases, the auth facade and transaction handling
pub mod application {
    pub use sso_application::*;
}

pub use sso_application::{AuthError, AuthOperations, AuthService, TransactionCoordinator};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    pub mod config {
        pub use sso_adapters::config::*;
    }

    pub mod events {
        pub use sso_adapters::events::*;
    }

    pub mod http {
        pub use sso_adapters::http::*;
    }

    pub mod oauth {
        pub use sso_adapters::oauth::*;
    }

    pub mod persistence {
        pub use sso_adapters::persistence::*;
    }

    pub mod token {
        pub use sso_adapters::token::*;
    }
}

pub use sso_adapters::{
    events::{RabbitMqEventPublisher, RecordingEventPublisher},
    persistence::{
        HashMapIdentityStore, HashMapSessionStore, PostgresIdentityStore, RedisSessionStore,
    },
    token::JwtTokenSigner,
};

// ============================================================================
// Service (Main Entry Point)
// ============================================================================

pub use sso_service::{
    SsoService,
    helpers::{configure_postgresql, configure_rabbitmq, configure_redis},
    init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
