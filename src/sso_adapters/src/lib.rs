pub mod config;
pub mod events;
pub mod http;
pub mod oauth;
pub mod persistence;
pub mod token;
