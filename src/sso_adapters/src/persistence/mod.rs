pub mod hashmap_identity_store;
pub mod hashmap_session_store;
pub mod postgres_identity_store;
pub mod redis_session_store;

pub use hashmap_identity_store::HashMapIdentityStore;
pub use hashmap_session_store::HashMapSessionStore;
pub use postgres_identity_store::PostgresIdentityStore;
pub use redis_session_store::RedisSessionStore;
