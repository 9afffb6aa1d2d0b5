pub mod account;
pub mod email;
pub mod events;
pub mod oauth;
pub mod password;
pub mod token;
pub mod user;
