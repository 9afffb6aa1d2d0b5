pub mod jwt_token_signer;
pub mod refresh_token;

pub use jwt_token_signer::JwtTokenSigner;
pub use refresh_token::generate_refresh_token;
