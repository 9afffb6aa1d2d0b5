use rand::Rng;

const REFRESH_TOKEN_LENGTH: usize = 64;

/// Opaque refresh token: 64 random alphanumeric characters from the thread
/// local CSPRNG.
pub fn generate_refresh_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
