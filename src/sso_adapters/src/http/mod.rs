pub mod client_ip;
pub mod routes;
pub mod state;

pub use client_ip::ClientIp;
pub use state::AppState;
