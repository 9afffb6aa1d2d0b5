pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    JwtSettings, OAuthSettings, PostgresSettings, RabbitMqSettings, RedisSettings, SsoSettings,
};
