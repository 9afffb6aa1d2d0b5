pub mod helpers;
pub mod service;
mod tracing;

pub use crate::tracing::init_tracing;
pub use service::SsoService;
